use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::schema::SchemaType;

/// The `StructuredResponse` trait ties a response schema to the type the
/// oracle's JSON is parsed into.
///
/// It is implemented for every type that is `SchemaType + DeserializeOwned +
/// Serialize`. Types with shape rules the schema language cannot express
/// implement [`Checked`] and run them through [`StructuredResponse::validate`].
///
/// # Example
///
/// ```
/// use rxverify::{AnalysisResult, StructuredResponse, SchemaType};
///
/// let parsed: AnalysisResult = serde_json::from_str(
///     r#"{"drugs":[],"interactions":[],"dosageRecommendations":[],"alternativeSuggestions":[]}"#,
/// ).unwrap();
/// assert!(parsed.validate().is_ok());
/// assert_eq!(AnalysisResult::schema().required_fields().len(), 4);
/// ```
pub trait StructuredResponse: SchemaType + DeserializeOwned + Serialize {
    /// Validation beyond type checking, run after every successful parse.
    fn validate(&self) -> Result<()>;
}

/// Extra validation hook for response types.
///
/// The default accepts everything.
pub trait Checked {
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

impl<T: SchemaType + DeserializeOwned + Serialize + Checked> StructuredResponse for T {
    fn validate(&self) -> Result<()> {
        self.check()
    }
}
