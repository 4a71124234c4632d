use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::error::{Result, RxVerifyError};

/// Risk classification of a drug-drug interaction.
///
/// The schema restricts the oracle to `low`, `moderate`, or `high`, but the
/// reply is not guaranteed to honour it; anything else is kept verbatim in
/// `Unrecognized` and handled according to a [`SeverityPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Unrecognized(String),
}

impl Severity {
    /// The values the response schema allows.
    pub const ALLOWED: [&'static str; 3] = ["low", "moderate", "high"];

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Severity::Unrecognized(_))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "low" => Severity::Low,
            "moderate" => Severity::Moderate,
            "high" => Severity::High,
            other => Severity::Unrecognized(other.to_string()),
        })
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|never| match never {})
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Severity::from(raw.as_str()))
    }
}

/// What to do with a severity outside the declared enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityPolicy {
    /// Keep the interaction, log a warning, render it in the neutral bucket.
    #[default]
    Lenient,
    /// Treat the whole reply as a schema violation.
    Strict,
}

impl SeverityPolicy {
    /// Apply the policy to every severity in `severities`.
    pub fn enforce<'a, I>(self, severities: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Severity>,
    {
        for severity in severities {
            if let Severity::Unrecognized(raw) = severity {
                match self {
                    SeverityPolicy::Lenient => {
                        warn!(severity = %raw, "Oracle returned a severity outside the schema enum");
                    }
                    SeverityPolicy::Strict => {
                        return Err(RxVerifyError::SchemaViolation(format!(
                            "severity '{}' is not one of {:?}",
                            raw,
                            Severity::ALLOWED
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl FromStr for SeverityPolicy {
    type Err = RxVerifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(SeverityPolicy::Lenient),
            "strict" => Ok(SeverityPolicy::Strict),
            other => Err(RxVerifyError::ConfigError(format!(
                "unknown severity policy '{}', expected 'lenient' or 'strict'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(Severity::from("low"), Severity::Low);
        assert_eq!(Severity::from("moderate"), Severity::Moderate);
        assert_eq!(Severity::from("high"), Severity::High);
    }

    #[test]
    fn keeps_unknown_levels_verbatim() {
        let severity: Severity = serde_json::from_str("\"severe\"").unwrap();
        assert_eq!(severity, Severity::Unrecognized("severe".to_string()));
        assert_eq!(serde_json::to_string(&severity).unwrap(), "\"severe\"");
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!Severity::from("High").is_recognized());
    }

    #[test]
    fn lenient_policy_accepts_unknown() {
        let severities = [Severity::High, Severity::from("critical")];
        assert!(SeverityPolicy::Lenient.enforce(&severities).is_ok());
    }

    #[test]
    fn strict_policy_rejects_unknown() {
        let severities = [Severity::Low, Severity::from("critical")];
        let err = SeverityPolicy::Strict.enforce(&severities).unwrap_err();
        assert!(err.is_schema_violation());
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("Strict".parse::<SeverityPolicy>().unwrap(), SeverityPolicy::Strict);
        assert_eq!(" lenient ".parse::<SeverityPolicy>().unwrap(), SeverityPolicy::Lenient);
        assert!("loose".parse::<SeverityPolicy>().is_err());
    }
}
