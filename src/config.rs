//! Startup configuration read from the environment.
//!
//! Loading is an explicit step: call [`Config::from_env`] once at startup and
//! treat an error as fatal. Nothing in the crate reads the environment
//! implicitly.

use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, info};

use crate::analysis::AnalysisClient;
use crate::backend::{Backend, KnowledgeBase};
use crate::error::{Result, RxVerifyError};
use crate::model::SeverityPolicy;

pub const API_KEY_VAR: &str = "API_KEY";
pub const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "RXVERIFY_MODEL";
pub const BASE_URL_VAR: &str = "RXVERIFY_BASE_URL";
pub const TIMEOUT_VAR: &str = "RXVERIFY_TIMEOUT_SECS";
pub const SEVERITY_POLICY_VAR: &str = "RXVERIFY_SEVERITY_POLICY";
pub const BACKEND_VAR: &str = "RXVERIFY_BACKEND";

/// Which oracle answers the three operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Gemini,
    /// The offline rule-based table; needs no API key
    KnowledgeBase,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Gemini => "gemini",
            BackendKind::KnowledgeBase => "knowledge-base",
        }
    }
}

impl FromStr for BackendKind {
    type Err = RxVerifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(BackendKind::Gemini),
            "knowledge-base" | "kb" => Ok(BackendKind::KnowledgeBase),
            other => Err(RxVerifyError::ConfigError(format!(
                "unknown backend '{}', expected 'gemini' or 'knowledge-base'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend: BackendKind,
    /// Required for the Gemini backend only
    pub api_key: Option<String>,
    /// Model name; `None` keeps the client default
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub severity_policy: SeverityPolicy,
}

impl Config {
    /// Read configuration from process environment variables.
    ///
    /// ```no_run
    /// use rxverify::Config;
    ///
    /// let config = Config::from_env().unwrap_or_else(|e| {
    ///     eprintln!("{}", e);
    ///     std::process::exit(1);
    /// });
    /// ```
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_backend(None)
    }

    /// Like [`Config::from_env`], with `backend` taking precedence over
    /// `RXVERIFY_BACKEND` when given.
    pub fn from_env_with_backend(backend: Option<BackendKind>) -> Result<Self> {
        Self::from_lookup(|name| match backend {
            Some(kind) if name == BACKEND_VAR => Some(kind.as_str().to_string()),
            _ => std::env::var(name).ok(),
        })
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let backend = non_empty(BACKEND_VAR)
            .map(|value| value.parse::<BackendKind>())
            .transpose()?
            .unwrap_or_default();

        let api_key = non_empty(API_KEY_VAR).or_else(|| non_empty(FALLBACK_API_KEY_VAR));
        if backend == BackendKind::Gemini && api_key.is_none() {
            return Err(RxVerifyError::ConfigError(format!(
                "{} environment variable not set",
                API_KEY_VAR
            )));
        }

        let timeout = non_empty(TIMEOUT_VAR)
            .map(|value| match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(RxVerifyError::ConfigError(format!(
                    "{} must be a positive number of seconds, got '{}'",
                    TIMEOUT_VAR, value
                ))),
            })
            .transpose()?;

        let severity_policy = non_empty(SEVERITY_POLICY_VAR)
            .map(|value| value.parse::<SeverityPolicy>())
            .transpose()?
            .unwrap_or_default();

        let config = Self {
            backend,
            api_key,
            model: non_empty(MODEL_VAR),
            base_url: non_empty(BASE_URL_VAR),
            timeout,
            severity_policy,
        };
        debug!(
            backend = config.backend.as_str(),
            model = ?config.model,
            base_url = ?config.base_url,
            timeout = ?config.timeout,
            severity_policy = ?config.severity_policy,
            "Loaded configuration"
        );
        Ok(config)
    }
}

impl Config {
    /// Build a Gemini client from this configuration.
    #[cfg(feature = "gemini")]
    pub fn gemini_client(&self) -> Result<crate::backend::GeminiClient> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            RxVerifyError::ConfigError(format!("{} environment variable not set", API_KEY_VAR))
        })?;
        let mut client = crate::backend::GeminiClient::new(api_key)?;
        if let Some(model) = &self.model {
            client = client.model(model.as_str());
        }
        if let Some(base_url) = &self.base_url {
            client = client.base_url(base_url.clone());
        }
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        info!(model = %client.config().model.as_str(), "Configured Gemini client");
        Ok(client)
    }

    /// The oracle for the configured backend.
    pub fn backend(&self) -> Result<Backend> {
        match self.backend {
            #[cfg(feature = "gemini")]
            BackendKind::Gemini => Ok(Backend::Gemini(self.gemini_client()?)),
            #[cfg(not(feature = "gemini"))]
            BackendKind::Gemini => Err(RxVerifyError::ConfigError(
                "built without the gemini feature".to_string(),
            )),
            BackendKind::KnowledgeBase => {
                info!("Using the built-in knowledge base");
                Ok(Backend::KnowledgeBase(KnowledgeBase::new()))
            }
        }
    }

    /// The analysis client for all three screens.
    pub fn analysis_client(&self) -> Result<AnalysisClient<Backend>> {
        Ok(AnalysisClient::new(self.backend()?).with_severity_policy(self.severity_policy))
    }
}
