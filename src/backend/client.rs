use async_trait::async_trait;
use tracing::{debug, error, trace};

use crate::backend::{MediaFile, extract_json_from_markdown};
use crate::error::{Result, RxVerifyError};
use crate::model::StructuredResponse;
use crate::schema::Schema;

/// One content part of an outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPart {
    Text(String),
    Image(MediaFile),
}

/// The inputs a request was built from, for oracles that answer from rules
/// rather than from the prompt text.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// `text` is `None` when the prescription was sent as an image
    Prescription {
        text: Option<String>,
        age: f64,
        weight: Option<f64>,
    },
    Interactions {
        drugs: Vec<String>,
    },
    Alternatives {
        drug: String,
        condition: String,
        context: String,
    },
}

/// Everything the oracle receives for a single call: ordered content parts and
/// the schema its JSON reply must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    pub parts: Vec<RequestPart>,
    pub schema: Schema,
    pub query: Option<Query>,
}

impl OracleRequest {
    pub fn new(schema: Schema) -> Self {
        Self {
            parts: Vec::new(),
            schema,
            query: None,
        }
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(RequestPart::Text(text.into()));
        self
    }

    pub fn image(mut self, media: MediaFile) -> Self {
        self.parts.push(RequestPart::Image(media));
        self
    }

    /// Concatenated text parts, for logging and inspection.
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                RequestPart::Text(text) => Some(text.as_str()),
                RequestPart::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_image(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, RequestPart::Image(_)))
    }
}

/// The seam between this crate and the external model.
///
/// An oracle turns an [`OracleRequest`] into raw reply text that is expected,
/// but not guaranteed, to be a JSON document matching the request's schema.
/// [`GeminiClient`](crate::GeminiClient) is the production implementation;
/// tests substitute scripted ones.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use rxverify::{Oracle, OracleRequest, Result};
///
/// struct Canned(&'static str);
///
/// #[async_trait]
/// impl Oracle for Canned {
///     fn provider_name(&self) -> &str {
///         "canned"
///     }
///
///     async fn complete(&self, _request: &OracleRequest) -> Result<String> {
///         Ok(self.0.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Short provider name used in logs and API errors.
    fn provider_name(&self) -> &str;

    /// Send one request and return the reply text. Exactly one outbound call.
    async fn complete(&self, request: &OracleRequest) -> Result<String>;

    /// Send one request and parse the reply into `T`.
    ///
    /// Markdown code fences around the JSON are tolerated. A reply that is not
    /// JSON, does not match `T`, or fails `T::validate` is reported as a
    /// schema violation. There is no retry.
    async fn materialize<T>(&self, request: &OracleRequest) -> Result<T>
    where
        T: StructuredResponse + Send + 'static,
    {
        let text = self.complete(request).await?;
        parse_structured::<T>(&text)
    }
}

/// Parse raw reply text into `T` and run its validation.
pub fn parse_structured<T: StructuredResponse>(text: &str) -> Result<T> {
    let json_content = extract_json_from_markdown(text);
    trace!(json = %json_content, "Attempting to parse response as JSON");

    let parsed: T = serde_json::from_str(&json_content).map_err(|e| {
        error!(error = %e, "Oracle reply does not match the declared schema");
        RxVerifyError::SchemaViolation(format!("Failed to parse response: {}", e))
    })?;

    if let Err(e) = parsed.validate() {
        error!(error = ?e, "Parsed reply failed validation");
        return Err(e);
    }

    debug!("Successfully parsed and validated structured reply");
    Ok(parsed)
}
