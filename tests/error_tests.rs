#[cfg(test)]
mod error_tests {
    use rxverify::{AnalysisFailure, ApiErrorKind, FailureKind, Operation, Result, RxVerifyError};
    use serde_json::json;
    use std::error::Error;

    #[test]
    fn test_api_error_display() {
        let err = RxVerifyError::api_error("Gemini", ApiErrorKind::AuthenticationFailed);
        assert_eq!(err.to_string(), "Gemini API error: authentication failed");

        let err = RxVerifyError::api_error(
            "Gemini",
            ApiErrorKind::ServerError {
                status: 500,
                details: "internal".to_string(),
            },
        );
        assert_eq!(err.to_string(), "Gemini API error: server error (500): internal");
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiErrorKind::from_status(401, ""), ApiErrorKind::AuthenticationFailed);
        assert_eq!(ApiErrorKind::from_status(403, ""), ApiErrorKind::AuthenticationFailed);
        assert_eq!(ApiErrorKind::from_status(429, ""), ApiErrorKind::RateLimited);
        assert_eq!(
            ApiErrorKind::from_status(400, "bad schema"),
            ApiErrorKind::BadRequest {
                details: "bad schema".to_string()
            }
        );
        assert!(matches!(
            ApiErrorKind::from_status(502, "gateway"),
            ApiErrorKind::ServerError { status: 502, .. }
        ));
    }

    #[test]
    fn test_validation_and_config_errors() {
        let err = RxVerifyError::ValidationError("Invalid data".to_string());
        assert_eq!(err.to_string(), "Validation error: Invalid data");

        let err = RxVerifyError::ConfigError("API_KEY environment variable not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: API_KEY environment variable not set"
        );
    }

    #[test]
    fn test_json_error_counts_as_schema_violation() {
        let json_err = serde_json::from_value::<String>(json!(42)).unwrap_err();
        let err: RxVerifyError = json_err.into();
        assert!(matches!(err, RxVerifyError::JsonError(_)));
        assert!(err.is_schema_violation());
        assert!(RxVerifyError::SchemaViolation("x".into()).is_schema_violation());
        assert!(!RxVerifyError::Timeout.is_schema_violation());
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert_eq!(ok_result, Ok(42));

        let err_result: Result<i32> = Err(RxVerifyError::Timeout);
        assert_eq!(err_result, Err(RxVerifyError::Timeout));
    }

    #[test]
    fn test_failure_messages_per_operation() {
        let cases = [
            (
                Operation::AnalyzePrescription,
                "Failed to get analysis from AI. The model may have returned an invalid response.",
            ),
            (
                Operation::CheckInteractions,
                "Failed to get interaction analysis from AI. The model may have returned an invalid response.",
            ),
            (
                Operation::FindAlternatives,
                "Failed to get alternative suggestions from AI. The model may have returned an invalid response.",
            ),
        ];
        for (operation, message) in cases {
            let failure = AnalysisFailure::new(operation, RxVerifyError::Timeout);
            assert_eq!(failure.kind(), FailureKind::Transport);
            assert_eq!(failure.user_message(), message);
            assert_eq!(failure.source().unwrap().to_string(), "Timeout error");
        }
    }
}
