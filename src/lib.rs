//! rxverify: prescription verification on top of a structured-output LLM
//!
//! # Overview
//!
//! rxverify sends a prescription (typed text or a photo), a drug list, or a
//! drug/condition pair to a generative model together with a response schema,
//! and turns the JSON reply into typed results:
//!
//! - [`AnalysisClient::analyze_prescription`]: drugs, pairwise interactions,
//!   dosage advice, and alternatives for one patient
//! - [`AnalysisClient::check_drug_interactions`]: interactions among a list of drugs
//! - [`AnalysisClient::find_alternative_medication`]: substitutes for a drug
//!
//! The model is reached through the [`Oracle`] trait. [`GeminiClient`] is the
//! production implementation. [`KnowledgeBase`] answers offline from a small
//! rule table, and tests plug in scripted oracles. The [`view`] module
//! holds the per-screen forms, the result-area state machine, and the
//! rendering of results into display models.
//!
//! # Quick Start
//!
//! ```no_run
//! use rxverify::{AnalysisClient, GeminiClient, PatientProfile, PrescriptionInput};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AnalysisClient::new(GeminiClient::new("your-api-key")?);
//!
//!     let result = client
//!         .analyze_prescription(
//!             &PrescriptionInput::Text("Warfarin 5 mg daily; Ibuprofen 400 mg tid".into()),
//!             &PatientProfile::new(67.0).with_weight(72.0),
//!         )
//!         .await?;
//!
//!     for interaction in &result.interactions {
//!         println!("{}: {}", interaction.pair.join(" + "), interaction.severity);
//!     }
//!     Ok(())
//! }
//! ```
pub mod analysis;
pub mod backend;
pub mod config;
mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod model;
pub mod schema;
pub mod view;

// Re-exports for convenience
pub use analysis::{
    AnalysisClient, AnalysisFailure, FailureKind, Operation, PatientProfile, PrescriptionInput,
};
pub use backend::{Backend, KnowledgeBase, MediaFile, Oracle, OracleRequest, Query, RequestPart};
#[cfg(feature = "gemini")]
pub use backend::{GeminiClient, GeminiModel};
pub use config::{BackendKind, Config};
pub use error::{ApiErrorKind, Result, RxVerifyError};
pub use model::{
    AlternativeFinderResult, AlternativeReport, AlternativeSuggestion, AnalysisResult, Checked,
    DosageRecommendation, Drug, DrugInteraction, InteractionReport, Severity, SeverityPolicy,
    StructuredResponse,
};
pub use schema::{Schema, SchemaBuilder, SchemaType};
pub use view::{
    AlternativeScreen, InteractionScreen, Listing, Panel, Screen, SeverityStyle, VerifierScreen,
    ViewState,
};
