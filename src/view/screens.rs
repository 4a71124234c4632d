//! The three screens: an input form plus a [`ViewController`] each.

use async_trait::async_trait;
use tracing::debug;

use super::state::{Ticket, ViewController, ViewState};
use crate::analysis::{AnalysisClient, AnalysisFailure, PatientProfile, PrescriptionInput};
use crate::backend::{MediaFile, Oracle};
use crate::model::{AlternativeFinderResult, AnalysisResult, DrugInteraction};

/// Raw field values of a screen, validated before anything is sent.
#[async_trait]
pub trait Form: Default + Send + Sync {
    /// The validated request this form produces.
    type Request: Send + Sync;
    /// What a successful submission displays.
    type Output: Send;

    /// Check required fields, returning the user-facing message on failure.
    fn validate(&self) -> Result<Self::Request, String>;

    async fn execute<O: Oracle>(
        client: &AnalysisClient<O>,
        request: &Self::Request,
    ) -> Result<Self::Output, AnalysisFailure>;
}

/// Inputs of the prescription verifier. Age and weight are kept as entered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifierForm {
    pub age: String,
    pub weight: String,
    pub prescription: String,
    /// When set, the image is analyzed instead of the text.
    pub image: Option<MediaFile>,
}

impl VerifierForm {
    pub const SAMPLE_PRESCRIPTION: &'static str = "Take Paracetamol 500 mg every 6 hours for fever. \
Ibuprofen 400 mg three times daily with food. Patient is also on Warfarin 5 mg once daily.";

    /// The form pre-filled with a sample adult patient and prescription.
    pub fn sample() -> Self {
        Self {
            age: "45".to_string(),
            weight: "70".to_string(),
            prescription: Self::SAMPLE_PRESCRIPTION.to_string(),
            image: None,
        }
    }
}

#[async_trait]
impl Form for VerifierForm {
    type Request = (PrescriptionInput, PatientProfile);
    type Output = AnalysisResult;

    fn validate(&self) -> Result<Self::Request, String> {
        let input = match &self.image {
            Some(media) => {
                media.validate().map_err(|_| "Please upload a valid image.".to_string())?;
                PrescriptionInput::Image(media.clone())
            }
            None if self.prescription.trim().is_empty() => {
                return Err("Please enter a prescription or upload an image.".to_string());
            }
            None => PrescriptionInput::Text(self.prescription.trim().to_string()),
        };

        let age = self
            .age
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|age| age.is_finite() && *age >= 0.0)
            .ok_or_else(|| "Please enter a valid patient age.".to_string())?;

        let mut patient = PatientProfile::new(age);
        let weight = self.weight.trim();
        if !weight.is_empty() {
            let weight = weight
                .parse::<f64>()
                .ok()
                .filter(|w| w.is_finite() && *w >= 0.0)
                .ok_or_else(|| "Please enter a valid weight in kg.".to_string())?;
            patient = patient.with_weight(weight);
        }

        Ok((input, patient))
    }

    async fn execute<O: Oracle>(
        client: &AnalysisClient<O>,
        request: &Self::Request,
    ) -> Result<Self::Output, AnalysisFailure> {
        let (input, patient) = request;
        client.analyze_prescription(input, patient).await
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionForm {
    pub drug_list: String,
}

#[async_trait]
impl Form for InteractionForm {
    type Request = String;
    type Output = Vec<DrugInteraction>;

    fn validate(&self) -> Result<Self::Request, String> {
        if self.drug_list.trim().is_empty() {
            return Err("Please enter a list of drugs to check.".to_string());
        }
        Ok(self.drug_list.clone())
    }

    async fn execute<O: Oracle>(
        client: &AnalysisClient<O>,
        request: &Self::Request,
    ) -> Result<Self::Output, AnalysisFailure> {
        client.check_drug_interactions(request).await
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlternativeForm {
    pub original_drug: String,
    pub condition: String,
    /// Optional
    pub patient_context: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeQuery {
    pub original_drug: String,
    pub condition: String,
    pub patient_context: String,
}

#[async_trait]
impl Form for AlternativeForm {
    type Request = AlternativeQuery;
    type Output = Vec<AlternativeFinderResult>;

    fn validate(&self) -> Result<Self::Request, String> {
        if self.original_drug.trim().is_empty() || self.condition.trim().is_empty() {
            return Err("Please enter the drug and the condition it's treating.".to_string());
        }
        Ok(AlternativeQuery {
            original_drug: self.original_drug.clone(),
            condition: self.condition.clone(),
            patient_context: self.patient_context.clone(),
        })
    }

    async fn execute<O: Oracle>(
        client: &AnalysisClient<O>,
        request: &Self::Request,
    ) -> Result<Self::Output, AnalysisFailure> {
        client
            .find_alternative_medication(
                &request.original_drug,
                &request.condition,
                &request.patient_context,
            )
            .await
    }
}

/// A form and the state of its result area.
///
/// [`Screen::submit`] runs a whole submission. Callers that overlap
/// submissions use [`Screen::begin`] and [`Screen::finish`] directly; only the
/// reply to the latest ticket is ever displayed.
pub struct Screen<F: Form> {
    pub form: F,
    view: ViewController<F::Output>,
}

impl<F: Form> Default for Screen<F> {
    fn default() -> Self {
        Self::with_form(F::default())
    }
}

pub type VerifierScreen = Screen<VerifierForm>;
pub type InteractionScreen = Screen<InteractionForm>;
pub type AlternativeScreen = Screen<AlternativeForm>;

impl<F: Form> Screen<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: F) -> Self {
        Self {
            form,
            view: ViewController::new(),
        }
    }

    pub fn state(&self) -> &ViewState<F::Output> {
        self.view.state()
    }

    /// Validate the form and, if it passes, enter `Loading`.
    ///
    /// Invalid input moves the screen to `ValidationError` and returns `None`;
    /// no request is to be sent.
    pub fn begin(&mut self) -> Option<(Ticket, F::Request)> {
        match self.form.validate() {
            Ok(request) => Some((self.view.begin(), request)),
            Err(message) => {
                debug!(reason = %message, "Submission rejected");
                self.view.reject(message);
                None
            }
        }
    }

    /// Deliver the outcome for `ticket`. Returns false if it was stale.
    pub fn finish(
        &mut self,
        ticket: Ticket,
        outcome: Result<F::Output, AnalysisFailure>,
    ) -> bool {
        self.view.resolve(ticket, outcome)
    }

    pub async fn submit<O: Oracle>(&mut self, client: &AnalysisClient<O>) -> &ViewState<F::Output> {
        if let Some((ticket, request)) = self.begin() {
            let outcome = F::execute(client, &request).await;
            self.finish(ticket, outcome);
        }
        self.view.state()
    }

    /// Clear the form and the result area.
    pub fn reset(&mut self) {
        self.form = F::default();
        self.view.reset();
    }
}
