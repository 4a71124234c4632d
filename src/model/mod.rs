mod prescription;
mod severity;
mod structured;

pub use prescription::{
    AlternativeFinderResult, AlternativeReport, AlternativeSuggestion, AnalysisResult,
    DosageRecommendation, Drug, DrugInteraction, InteractionReport,
};
pub use severity::{Severity, SeverityPolicy};
pub use structured::{Checked, StructuredResponse};
