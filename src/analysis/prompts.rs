//! Instruction templates for the three operations.

use crate::backend::{OracleRequest, Query};
use crate::model::{AlternativeReport, AnalysisResult, InteractionReport};
use crate::schema::SchemaType;

use super::{PatientProfile, PrescriptionInput};

fn analysis_instruction(profile: &str) -> String {
    format!(
        "\
Analyze the following medical prescription based on the provided patient profile. The prescription may be in text or image format.
Identify all drugs, check for interactions, provide dosage recommendations, and suggest alternatives for high-risk interactions.

Patient Profile: {profile}

Based on this information, provide a comprehensive analysis.
- Identify each drug mentioned. For each drug, extract its name, its dosage (e.g., '500mg'), and its frequency (e.g., 'every 6 hours') if mentioned.
- List all potential drug-drug interactions with their severity and a clear explanation.
- For each identified drug, provide a dosage recommendation appropriate for the patient's age and weight. Include any specific warnings.
- If any 'high' or 'moderate' severity interactions are found, suggest a safer alternative medication for one of the interacting drugs.

Return the analysis strictly in the provided JSON format. Do not add any commentary before or after the JSON object."
    )
}

fn interaction_instruction(drugs: &str) -> String {
    format!(
        "\
Analyze the following list of drugs for potential drug-drug interactions.
The list of drugs is: \"{drugs}\".

For each interaction found, provide the pair of drugs, the severity level (low, moderate, or high), and a clear explanation of the interaction.
If no interactions are found, return an empty array for \"interactions\".

Return the analysis strictly in the provided JSON format. Do not add any commentary before or after the JSON object."
    )
}

fn alternative_instruction(drug: &str, condition: &str, context: &str) -> String {
    format!(
        "\
Act as a clinical pharmacologist. A patient needs an alternative to a specific medication.

- Original Drug: {drug}
- Condition Being Treated: {condition}
- Patient Context: \"{context}\"

Based on this, suggest one or two suitable alternative medications. For each suggestion, provide:
1.  'suggestedDrug': The name of the alternative drug.
2.  'reasoning': A clear rationale explaining why this is a good alternative, considering the patient's context (e.g., avoids a specific interaction, better side-effect profile).
3.  'benefits': Key benefits of choosing this alternative over the original drug.
4.  'considerations': Important things to consider, such as common side effects or monitoring requirements.

If the original drug is appropriate and no alternative is needed based on the context, you can return an empty list of suggestions.
Return the analysis strictly in the provided JSON format."
    )
}

/// `Patient Age: 45 years, Patient Weight: 70 kg.`
pub fn patient_profile_line(patient: &PatientProfile) -> String {
    match patient.weight.filter(|w| *w > 0.0) {
        Some(weight) => format!(
            "Patient Age: {} years, Patient Weight: {} kg.",
            patient.age, weight
        ),
        None => format!("Patient Age: {} years.", patient.age),
    }
}

/// Split a comma-separated drug list into trimmed, non-empty names.
pub fn split_drug_list(drug_list: &str) -> Vec<String> {
    drug_list
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// The full-analysis request: instruction first, then the prescription as
/// quoted text or as an inline image.
pub fn analysis_request(input: &PrescriptionInput, patient: &PatientProfile) -> OracleRequest {
    let instruction = analysis_instruction(&patient_profile_line(patient));
    let request = OracleRequest::new(AnalysisResult::schema()).text(instruction);
    let (request, text) = match input {
        PrescriptionInput::Text(text) => (
            request.text(format!("Prescription Text: \"{}\"", text)),
            Some(text.clone()),
        ),
        PrescriptionInput::Image(media) => (request.image(media.clone()), None),
    };
    request.query(Query::Prescription {
        text,
        age: patient.age,
        weight: patient.weight,
    })
}

pub fn interaction_request(drug_list: &str) -> OracleRequest {
    OracleRequest::new(InteractionReport::schema())
        .text(interaction_instruction(drug_list))
        .query(Query::Interactions {
            drugs: split_drug_list(drug_list),
        })
}

pub fn alternative_request(
    original_drug: &str,
    condition: &str,
    patient_context: &str,
) -> OracleRequest {
    OracleRequest::new(AlternativeReport::schema())
        .text(alternative_instruction(
            original_drug,
            condition,
            patient_context,
        ))
        .query(Query::Alternatives {
            drug: original_drug.to_string(),
            condition: condition.to_string(),
            context: patient_context.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MediaFile, RequestPart};

    #[test]
    fn profile_line_with_and_without_weight() {
        let adult = PatientProfile::new(45.0).with_weight(70.5);
        assert_eq!(
            patient_profile_line(&adult),
            "Patient Age: 45 years, Patient Weight: 70.5 kg."
        );
        assert_eq!(
            patient_profile_line(&PatientProfile::new(8.0)),
            "Patient Age: 8 years."
        );
        // A zero weight is treated as not provided
        assert_eq!(
            patient_profile_line(&PatientProfile::new(8.0).with_weight(0.0)),
            "Patient Age: 8 years."
        );
    }

    #[test]
    fn text_prescription_is_quoted_second_part() {
        let input = PrescriptionInput::Text("Paracetamol 500 mg".to_string());
        let request = analysis_request(&input, &PatientProfile::new(30.0));

        assert_eq!(request.parts.len(), 2);
        match &request.parts[0] {
            RequestPart::Text(text) => assert!(text.contains("Patient Profile: Patient Age: 30 years.")),
            other => panic!("unexpected part {:?}", other),
        }
        assert_eq!(
            request.parts[1],
            RequestPart::Text("Prescription Text: \"Paracetamol 500 mg\"".to_string())
        );
        assert_eq!(request.schema, AnalysisResult::schema());
    }

    #[test]
    fn image_prescription_is_inline_part() {
        let media = MediaFile::from_bytes(b"png", "image/png");
        let request = analysis_request(
            &PrescriptionInput::Image(media.clone()),
            &PatientProfile::new(30.0),
        );
        assert_eq!(request.parts[1], RequestPart::Image(media));
    }

    #[test]
    fn interaction_prompt_embeds_list() {
        let request = interaction_request("Warfarin, Ibuprofen");
        assert!(request
            .text_content()
            .contains("The list of drugs is: \"Warfarin, Ibuprofen\"."));
        assert_eq!(request.schema.required_fields(), vec!["interactions"]);
    }

    #[test]
    fn alternative_prompt_embeds_fields() {
        let request = alternative_request("Ibuprofen", "Headache", "Takes warfarin");
        let text = request.text_content();
        assert!(text.contains("- Original Drug: Ibuprofen"));
        assert!(text.contains("- Condition Being Treated: Headache"));
        assert!(text.contains("- Patient Context: \"Takes warfarin\""));
        assert_eq!(request.schema.required_fields(), vec!["suggestions"]);
    }

    #[test]
    fn user_text_is_embedded_verbatim() {
        let request = alternative_request("Drug {condition}", "Headache", "{drug} and {context}");
        let text = request.text_content();
        assert!(text.contains("- Original Drug: Drug {condition}"));
        assert!(text.contains("- Condition Being Treated: Headache"));
        assert!(text.contains("- Patient Context: \"{drug} and {context}\""));

        let request = interaction_request("{drugs}, Aspirin");
        assert!(request
            .text_content()
            .contains("The list of drugs is: \"{drugs}, Aspirin\"."));

        let request = analysis_request(
            &PrescriptionInput::Text("{profile}".to_string()),
            &PatientProfile::new(30.0),
        );
        let text = request.text_content();
        assert!(text.contains("Patient Profile: Patient Age: 30 years."));
        assert!(text.ends_with("Prescription Text: \"{profile}\""));
    }

    #[test]
    fn requests_carry_structured_query() {
        let request = interaction_request(" Warfarin, ,ibuprofen ,");
        assert_eq!(
            request.query,
            Some(Query::Interactions {
                drugs: vec!["Warfarin".to_string(), "ibuprofen".to_string()]
            })
        );

        let media = MediaFile::from_bytes(b"png", "image/png");
        let request = analysis_request(
            &PrescriptionInput::Image(media),
            &PatientProfile::new(8.0).with_weight(20.0),
        );
        assert_eq!(
            request.query,
            Some(Query::Prescription {
                text: None,
                age: 8.0,
                weight: Some(20.0)
            })
        );
    }
}
