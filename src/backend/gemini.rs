use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::backend::{
    MediaFile, Oracle, OracleRequest, RequestPart, check_response_status, handle_http_error,
};
use crate::error::{ApiErrorKind, Result, RxVerifyError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const PROVIDER: &str = "Gemini";

/// Gemini models available for completion
///
/// Any other model name can be used through `Custom` or `FromStr`:
///
/// ```rust
/// use rxverify::GeminiModel;
/// use std::str::FromStr;
///
/// let model = GeminiModel::from_str("gemini-custom").unwrap();
/// assert_eq!(model, GeminiModel::Custom("gemini-custom".to_string()));
/// assert_eq!(GeminiModel::default().as_str(), "gemini-2.5-flash");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Model {
    /// Gemini 2.5 Pro
    Gemini25Pro,
    /// Gemini 2.5 Flash (the model the prescription prompts are written for)
    #[default]
    Gemini25Flash,
    /// Gemini 2.5 Flash Lite
    Gemini25FlashLite,
    /// Gemini 2.0 Flash
    Gemini20Flash,
    /// Custom model name (for new models or Gemini-compatible endpoints)
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Custom(name) => name,
        }
    }

    /// Create a model from a string. Unknown names become `Custom(name)`.
    pub fn from_string(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.as_str() {
            "gemini-2.5-pro" => Model::Gemini25Pro,
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            _ => Model::Custom(name),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from_string(s))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::from_string(s)
    }
}

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: Model,
    /// Unset means the model's own default
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Unset means no local timeout
    pub timeout: Option<Duration>,
    /// Custom base URL for Gemini-compatible APIs
    pub base_url: Option<String>,
}

/// Gemini `generateContent` client, the production [`Oracle`].
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: MediaFile,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a new Gemini client with the provided API key.
    ///
    /// ```no_run
    /// # use rxverify::GeminiClient;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiClient::new("your-gemini-api-key")?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new", skip(api_key))]
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RxVerifyError::api_error(
                PROVIDER,
                ApiErrorKind::AuthenticationFailed,
            ));
        }

        let config = GeminiConfig {
            api_key,
            model: Model::default(),
            temperature: None,
            max_tokens: None,
            timeout: None,
            base_url: None,
        };

        info!(model = %config.model.as_str(), "Created Gemini client");
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Set the model to use
    #[instrument(skip(self))]
    pub fn model(mut self, model: impl Into<Model> + std::fmt::Debug) -> Self {
        let model = model.into();
        debug!(previous_model = ?self.config.model, new_model = ?model, "Setting Gemini model");
        self.config.model = model;
        self
    }

    /// Set the sampling temperature
    #[instrument(skip(self))]
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the maximum tokens to generate
    #[instrument(skip(self))]
    pub fn max_tokens(mut self, max: u32) -> Self {
        // Zero would be rejected by the API
        self.config.max_tokens = Some(max.max(1));
        self
    }

    /// Set the timeout for each HTTP request.
    #[instrument(skip(self))]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        debug!(previous_timeout = ?self.config.timeout, new_timeout = ?timeout, "Setting timeout");
        self.config.timeout = Some(timeout);
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build reqwest client with timeout, using default");
                reqwest::Client::new()
            });
        self
    }

    /// Set a custom base URL for Gemini-compatible APIs, without trailing slash.
    #[instrument(skip(self, base_url))]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        debug!(previous_base_url = ?self.config.base_url, new_base_url = %base_url, "Setting custom base URL");
        self.config.base_url = Some(base_url);
        self
    }

    fn endpoint(&self) -> String {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        format!(
            "{}/models/{}:generateContent",
            base_url,
            self.config.model.as_str()
        )
    }

    fn build_request(&self, request: &OracleRequest) -> GenerateContentRequest {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) => Part::Text { text: text.clone() },
                RequestPart::Image(media) => Part::InlineData {
                    inline_data: media.clone(),
                },
            })
            .collect();

        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
                response_mime_type: "application/json".to_string(),
                response_schema: request.schema.to_json().clone(),
            },
        }
    }
}

/// Join the text parts of the first candidate, the way the SDK's `text`
/// accessor does.
fn reply_text(response: GenerateContentResponse) -> Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        error!("Gemini API returned empty candidates array");
        return Err(RxVerifyError::api_error(
            PROVIDER,
            ApiErrorKind::UnexpectedResponse {
                details: "No completion candidates returned".to_string(),
            },
        ));
    };
    trace!(finish_reason = ?candidate.finish_reason, "Completion finish reason");

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        error!("No text content in Gemini response");
        return Err(RxVerifyError::api_error(
            PROVIDER,
            ApiErrorKind::UnexpectedResponse {
                details: "No text content in response".to_string(),
            },
        ));
    }
    Ok(text)
}

#[async_trait]
impl Oracle for GeminiClient {
    fn provider_name(&self) -> &str {
        PROVIDER
    }

    #[instrument(
        name = "gemini_complete",
        skip(self, request),
        fields(
            model = %self.config.model.as_str(),
            parts = request.parts.len(),
            has_image = request.has_image()
        )
    )]
    async fn complete(&self, request: &OracleRequest) -> Result<String> {
        let body = self.build_request(request);
        let url = self.endpoint();
        debug!(url = %url, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| handle_http_error(e, PROVIDER))?;

        let response = check_response_status(response, PROVIDER).await?;

        debug!("Successfully received response from Gemini API");
        let completion: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse JSON envelope from Gemini API");
            RxVerifyError::api_error(
                PROVIDER,
                ApiErrorKind::UnexpectedResponse {
                    details: e.to_string(),
                },
            )
        })?;

        let text = reply_text(completion)?;
        debug!(content_len = text.len(), "Extracted reply text");
        Ok(text.trim().to_string())
    }
}
