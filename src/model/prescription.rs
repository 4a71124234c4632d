//! Value objects parsed from the oracle's replies, and the response schemas
//! that declare their shape.
//!
//! Field names on the wire are camelCase. Schema descriptions are part of the
//! contract and are sent verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::severity::Severity;
use super::structured::Checked;
use crate::error::{Result, RxVerifyError};
use crate::schema::{Schema, SchemaBuilder, SchemaType};

/// A drug identified in a prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drug {
    pub name: String,
    pub description: String,
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

/// A potential interaction between two drugs, as reported by the oracle.
///
/// Pairs are not deduplicated or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugInteraction {
    pub pair: [String; 2],
    pub severity: Severity,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DosageRecommendation {
    pub drug: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeSuggestion {
    pub for_drug: String,
    pub reason: String,
    pub suggestion: String,
    pub suggested_drug: String,
}

/// The aggregate produced by one full prescription analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub drugs: Vec<Drug>,
    pub interactions: Vec<DrugInteraction>,
    pub dosage_recommendations: Vec<DosageRecommendation>,
    pub alternative_suggestions: Vec<AlternativeSuggestion>,
}

impl AnalysisResult {
    /// Number of interactions classified as `high`.
    pub fn high_risk_count(&self) -> usize {
        self.interactions
            .iter()
            .filter(|i| i.severity == Severity::High)
            .count()
    }
}

/// One suggestion from the standalone alternative finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeFinderResult {
    pub suggested_drug: String,
    pub reasoning: String,
    pub benefits: String,
    pub considerations: String,
}

/// Envelope of the interaction-only reply.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionReport {
    pub interactions: Vec<DrugInteraction>,
}

/// Envelope of the alternative-finder reply.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlternativeReport {
    pub suggestions: Vec<AlternativeFinderResult>,
}

fn string(description: &str) -> Value {
    SchemaBuilder::string().description(description).into_value()
}

fn string_list(description: &str) -> Value {
    SchemaBuilder::array(SchemaBuilder::string().into_value())
        .description(description)
        .into_value()
}

fn drug_items() -> Value {
    SchemaBuilder::object()
        .property("name", string("The normalized name of the drug."), true)
        .property(
            "description",
            string("A brief description of the drug's purpose."),
            true,
        )
        .property(
            "classes",
            string_list("Pharmacological classes of the drug."),
            true,
        )
        .property(
            "dosage",
            string("The dosage extracted from the text, e.g., '500 mg'."),
            false,
        )
        .property(
            "frequency",
            string("The frequency of administration, e.g., 'every 6 hours'."),
            false,
        )
        .into_value()
}

fn interactions_property() -> Value {
    let items = SchemaBuilder::object()
        .property("pair", string_list("The pair of interacting drugs."), true)
        .property(
            "severity",
            SchemaBuilder::string_enum(Severity::ALLOWED)
                .description("The severity of the interaction.")
                .into_value(),
            true,
        )
        .property(
            "explanation",
            string("An explanation of the interaction's mechanism and risks."),
            true,
        )
        .into_value();

    SchemaBuilder::array(items)
        .description("List of potential drug-drug interactions.")
        .into_value()
}

fn dosage_items() -> Value {
    SchemaBuilder::object()
        .property(
            "drug",
            string("The drug for which the dosage is recommended."),
            true,
        )
        .property(
            "recommendation",
            string("The specific dosage recommendation."),
            true,
        )
        .property(
            "warning",
            string("Any warnings or contraindications based on age or weight. Can be null."),
            false,
        )
        .into_value()
}

fn alternative_items() -> Value {
    SchemaBuilder::object()
        .property(
            "forDrug",
            string("The original drug that should be replaced."),
            true,
        )
        .property(
            "reason",
            string("The reason for suggesting an alternative (e.g., interaction)."),
            true,
        )
        .property(
            "suggestion",
            string("A full sentence suggesting an alternative, like 'Consider replacing with...'"),
            true,
        )
        .property(
            "suggestedDrug",
            string("The name of the suggested alternative drug."),
            true,
        )
        .into_value()
}

fn finder_items() -> Value {
    SchemaBuilder::object()
        .property(
            "suggestedDrug",
            string("The name of the suggested alternative drug."),
            true,
        )
        .property(
            "reasoning",
            string("Detailed reasoning for why this drug is a suitable alternative."),
            true,
        )
        .property(
            "benefits",
            string("Specific benefits of the suggested drug over the original one for this patient."),
            true,
        )
        .property(
            "considerations",
            string("Important considerations or potential side effects for this alternative."),
            true,
        )
        .into_value()
}

impl SchemaType for AnalysisResult {
    fn schema() -> Schema {
        SchemaBuilder::object()
            .property(
                "drugs",
                SchemaBuilder::array(drug_items())
                    .description("List of identified drugs with their descriptions and classes.")
                    .into_value(),
                true,
            )
            .property("interactions", interactions_property(), true)
            .property(
                "dosageRecommendations",
                SchemaBuilder::array(dosage_items())
                    .description("Dosage recommendations based on patient profile.")
                    .into_value(),
                true,
            )
            .property(
                "alternativeSuggestions",
                SchemaBuilder::array(alternative_items())
                    .description(
                        "Safer alternative medications for drugs with high-risk interactions.",
                    )
                    .into_value(),
                true,
            )
            .build()
    }
}

impl SchemaType for InteractionReport {
    fn schema() -> Schema {
        SchemaBuilder::object()
            .property("interactions", interactions_property(), true)
            .build()
    }
}

impl SchemaType for AlternativeReport {
    fn schema() -> Schema {
        SchemaBuilder::object()
            .property(
                "suggestions",
                SchemaBuilder::array(finder_items())
                    .description("A list of suggested alternative medications.")
                    .into_value(),
                true,
            )
            .build()
    }
}

fn check_pairs(interactions: &[DrugInteraction]) -> Result<()> {
    for interaction in interactions {
        if interaction.pair.iter().any(|name| name.trim().is_empty()) {
            return Err(RxVerifyError::SchemaViolation(format!(
                "interaction pair {:?} contains an empty drug name",
                interaction.pair
            )));
        }
    }
    Ok(())
}

impl Checked for AnalysisResult {
    fn check(&self) -> Result<()> {
        check_pairs(&self.interactions)
    }
}

impl Checked for InteractionReport {
    fn check(&self) -> Result<()> {
        check_pairs(&self.interactions)
    }
}

impl Checked for AlternativeReport {}
