use std::fmt;

use crate::error::RxVerifyError;

/// The three oracle-backed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AnalyzePrescription,
    CheckInteractions,
    FindAlternatives,
}

impl Operation {
    /// The generic, user-facing message shown when the operation fails for
    /// any reason other than invalid input.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::AnalyzePrescription => {
                "Failed to get analysis from AI. The model may have returned an invalid response."
            }
            Operation::CheckInteractions => {
                "Failed to get interaction analysis from AI. The model may have returned an invalid response."
            }
            Operation::FindAlternatives => {
                "Failed to get alternative suggestions from AI. The model may have returned an invalid response."
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::AnalyzePrescription => "analyze_prescription",
            Operation::CheckInteractions => "check_drug_interactions",
            Operation::FindAlternatives => "find_alternative_medication",
        };
        f.write_str(name)
    }
}

/// Root-cause category of an [`AnalysisFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Required input missing; no request was sent.
    Validation,
    /// The call to the oracle failed (network, auth, quota, timeout).
    Transport,
    /// The oracle answered with something that is not the declared shape.
    SchemaViolation,
}

/// Failure of one analysis operation.
///
/// `Display` renders the message meant for the user: the validation message
/// for invalid input, otherwise the operation's generic failure text. The
/// underlying error is available through [`AnalysisFailure::cause`] and
/// `Error::source` for diagnostics.
#[derive(Debug)]
pub struct AnalysisFailure {
    operation: Operation,
    cause: RxVerifyError,
}

impl AnalysisFailure {
    pub fn new(operation: Operation, cause: RxVerifyError) -> Self {
        Self { operation, cause }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn cause(&self) -> &RxVerifyError {
        &self.cause
    }

    pub fn kind(&self) -> FailureKind {
        match &self.cause {
            RxVerifyError::ValidationError(_) => FailureKind::Validation,
            cause if cause.is_schema_violation() => FailureKind::SchemaViolation,
            _ => FailureKind::Transport,
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            RxVerifyError::ValidationError(msg) => f.write_str(msg),
            _ => f.write_str(self.operation.failure_message()),
        }
    }
}

impl std::error::Error for AnalysisFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}
