#[cfg(feature = "gemini")]
use tracing::error;

#[cfg(feature = "gemini")]
use crate::error::{ApiErrorKind, Result, RxVerifyError};

/// Extract JSON from markdown code blocks if present, otherwise return the content as-is.
///
/// Handles replies wrapped as ```json ... ``` or ``` ... ``` even when the
/// schema asked for bare JSON.
pub fn extract_json_from_markdown(content: &str) -> String {
    let trimmed = content.trim();

    if trimmed.starts_with("```") {
        if let Some(start_idx) = trimmed.find('\n') {
            let after_start = &trimmed[start_idx + 1..];
            if let Some(end_idx) = after_start.rfind("```") {
                return after_start[..end_idx].trim().to_string();
            }
        }
    }

    trimmed.to_string()
}

/// Convert a reqwest error to a RxVerifyError, handling timeout errors specially.
#[cfg(feature = "gemini")]
pub fn handle_http_error(e: reqwest::Error, provider_name: &str) -> RxVerifyError {
    error!(error = %e, "HTTP request to {} failed", provider_name);
    if e.is_timeout() {
        RxVerifyError::Timeout
    } else {
        RxVerifyError::HttpError(e)
    }
}

/// Check HTTP response status and classify the failure if unsuccessful.
#[cfg(feature = "gemini")]
pub async fn check_response_status(
    response: reqwest::Response,
    provider_name: &str,
) -> Result<reqwest::Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        error!(
            status = %status,
            error = %error_text,
            "{} API returned error response", provider_name
        );
        return Err(RxVerifyError::api_error(
            provider_name,
            ApiErrorKind::from_status(status.as_u16(), error_text),
        ));
    }
    Ok(response)
}
