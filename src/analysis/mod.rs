//! The analysis client: turns validated inputs into oracle requests and the
//! replies into typed results.
//!
//! Every operation performs exactly one outbound call. A failed call, a reply
//! that is not JSON, or a reply of the wrong shape all end the operation with
//! an [`AnalysisFailure`]; there is no retry and no partial result.

mod failure;
pub mod prompts;

pub use failure::{AnalysisFailure, FailureKind, Operation};

use tracing::{debug, error, info, instrument};

use crate::backend::{MediaFile, Oracle, OracleRequest};
use crate::error::{Result, RxVerifyError};
use crate::model::{
    AlternativeFinderResult, AlternativeReport, AnalysisResult, DrugInteraction,
    InteractionReport, SeverityPolicy, StructuredResponse,
};

/// A prescription as typed text or as a photographed/scanned image.
#[derive(Debug, Clone, PartialEq)]
pub enum PrescriptionInput {
    Text(String),
    Image(MediaFile),
}

impl PrescriptionInput {
    fn validate(&self) -> Result<()> {
        match self {
            PrescriptionInput::Text(text) if text.trim().is_empty() => Err(
                RxVerifyError::ValidationError("Prescription text cannot be empty.".to_string()),
            ),
            PrescriptionInput::Text(_) => Ok(()),
            PrescriptionInput::Image(media) => media.validate(),
        }
    }
}

/// The minimal patient profile embedded in the analysis instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatientProfile {
    /// Age in years
    pub age: f64,
    /// Weight in kilograms
    pub weight: Option<f64>,
}

impl PatientProfile {
    pub fn new(age: f64) -> Self {
        Self { age, weight: None }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.age.is_finite() || self.age < 0.0 {
            return Err(RxVerifyError::ValidationError(
                "Patient age must be a non-negative number.".to_string(),
            ));
        }
        if let Some(weight) = self.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RxVerifyError::ValidationError(
                    "Patient weight must be a non-negative number.".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Client for the three prescription operations over any [`Oracle`].
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use rxverify::{AnalysisClient, GeminiClient};
///
/// let client = AnalysisClient::new(GeminiClient::new("your-api-key")?);
/// let interactions = client.check_drug_interactions("Warfarin, Ibuprofen").await?;
/// for interaction in &interactions {
///     println!("{} + {}: {}", interaction.pair[0], interaction.pair[1], interaction.severity);
/// }
/// # Ok(())
/// # }
/// ```
pub struct AnalysisClient<O> {
    oracle: O,
    severity_policy: SeverityPolicy,
}

impl<O: Oracle> AnalysisClient<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            severity_policy: SeverityPolicy::default(),
        }
    }

    pub fn with_severity_policy(mut self, policy: SeverityPolicy) -> Self {
        self.severity_policy = policy;
        self
    }

    pub fn severity_policy(&self) -> SeverityPolicy {
        self.severity_policy
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Identify drugs, interactions, dosage advice, and alternatives for a
    /// prescription given the patient's age and optional weight.
    #[instrument(
        name = "analyze_prescription",
        skip(self, input),
        fields(provider = self.oracle.provider_name(), image = matches!(input, PrescriptionInput::Image(_)))
    )]
    pub async fn analyze_prescription(
        &self,
        input: &PrescriptionInput,
        patient: &PatientProfile,
    ) -> std::result::Result<AnalysisResult, AnalysisFailure> {
        let operation = Operation::AnalyzePrescription;
        guard(operation, input.validate().and_then(|_| patient.validate()))?;

        let request = prompts::analysis_request(input, patient);
        let result: AnalysisResult = self.run(operation, &request).await?;
        guard(
            operation,
            self.severity_policy
                .enforce(result.interactions.iter().map(|i| &i.severity)),
        )?;

        info!(
            drugs = result.drugs.len(),
            interactions = result.interactions.len(),
            high_risk = result.high_risk_count(),
            "Prescription analysis complete"
        );
        Ok(result)
    }

    /// Check a free-form list of drug names (comma-separated by convention)
    /// for pairwise interactions. An empty list means none were found.
    #[instrument(
        name = "check_drug_interactions",
        skip(self, drug_list),
        fields(provider = self.oracle.provider_name(), list_len = drug_list.len())
    )]
    pub async fn check_drug_interactions(
        &self,
        drug_list: &str,
    ) -> std::result::Result<Vec<DrugInteraction>, AnalysisFailure> {
        let operation = Operation::CheckInteractions;
        if drug_list.trim().is_empty() {
            return Err(rejected(operation, "Please enter a list of drugs to check."));
        }

        let request = prompts::interaction_request(drug_list);
        let report: InteractionReport = self.run(operation, &request).await?;
        guard(
            operation,
            self.severity_policy
                .enforce(report.interactions.iter().map(|i| &i.severity)),
        )?;

        info!(interactions = report.interactions.len(), "Interaction check complete");
        Ok(report.interactions)
    }

    /// Ask for alternatives to `original_drug` for `condition`. An empty list
    /// means the oracle considers the original drug appropriate.
    #[instrument(
        name = "find_alternative_medication",
        skip(self, original_drug, condition, patient_context),
        fields(provider = self.oracle.provider_name())
    )]
    pub async fn find_alternative_medication(
        &self,
        original_drug: &str,
        condition: &str,
        patient_context: &str,
    ) -> std::result::Result<Vec<AlternativeFinderResult>, AnalysisFailure> {
        let operation = Operation::FindAlternatives;
        if original_drug.trim().is_empty() || condition.trim().is_empty() {
            return Err(rejected(
                operation,
                "Please enter the drug and the condition it's treating.",
            ));
        }

        let request = prompts::alternative_request(original_drug, condition, patient_context);
        let report: AlternativeReport = self.run(operation, &request).await?;

        info!(suggestions = report.suggestions.len(), "Alternative search complete");
        Ok(report.suggestions)
    }

    async fn run<T>(
        &self,
        operation: Operation,
        request: &OracleRequest,
    ) -> std::result::Result<T, AnalysisFailure>
    where
        T: StructuredResponse + Send + 'static,
    {
        debug!(%operation, parts = request.parts.len(), "Sending request to oracle");
        let reply = self.oracle.materialize::<T>(request).await;
        guard(operation, reply)
    }
}

fn rejected(operation: Operation, message: &str) -> AnalysisFailure {
    debug!(%operation, reason = message, "Rejected before sending a request");
    AnalysisFailure::new(
        operation,
        RxVerifyError::ValidationError(message.to_string()),
    )
}

/// Wrap an error into an [`AnalysisFailure`], logging it at the level its
/// category deserves.
fn guard<T>(operation: Operation, result: Result<T>) -> std::result::Result<T, AnalysisFailure> {
    result.map_err(|cause| {
        let failure = AnalysisFailure::new(operation, cause);
        match failure.kind() {
            FailureKind::Validation => {
                debug!(%operation, reason = %failure.cause(), "Invalid input");
            }
            kind => {
                error!(%operation, ?kind, error = %failure.cause(), "Error calling oracle");
            }
        }
        failure
    })
}
