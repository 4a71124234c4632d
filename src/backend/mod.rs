pub mod client;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod knowledge_base;
pub mod media;
pub mod utils;

use async_trait::async_trait;

pub use client::{Oracle, OracleRequest, Query, RequestPart, parse_structured};
#[cfg(feature = "gemini")]
pub use gemini::{GeminiClient, GeminiConfig, Model as GeminiModel};
pub use knowledge_base::KnowledgeBase;
pub use media::MediaFile;
pub use utils::extract_json_from_markdown;
#[cfg(feature = "gemini")]
pub use utils::{check_response_status, handle_http_error};

use crate::error::Result;

/// The oracle selected at startup by [`Config`](crate::Config).
pub enum Backend {
    #[cfg(feature = "gemini")]
    Gemini(GeminiClient),
    KnowledgeBase(KnowledgeBase),
}

#[async_trait]
impl Oracle for Backend {
    fn provider_name(&self) -> &str {
        match self {
            #[cfg(feature = "gemini")]
            Backend::Gemini(client) => client.provider_name(),
            Backend::KnowledgeBase(kb) => kb.provider_name(),
        }
    }

    async fn complete(&self, request: &OracleRequest) -> Result<String> {
        match self {
            #[cfg(feature = "gemini")]
            Backend::Gemini(client) => client.complete(request).await,
            Backend::KnowledgeBase(kb) => kb.complete(request).await,
        }
    }
}
