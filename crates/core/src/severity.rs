use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Canonical severity scale shared by all scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Info => "INFO",
        }
    }

    /// Numeric score persisted next to the canonical label.
    pub fn score(&self) -> u32 {
        match self {
            Self::Critical => 100,
            Self::High => 80,
            Self::Medium => 50,
            Self::Low => 20,
            Self::Info => 5,
        }
    }

    /// Weight used by the readiness score and the risk aggregations.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Critical => 4.0,
            Self::High => 3.0,
            Self::Medium => 2.0,
            Self::Low => 1.0,
            Self::Info => 0.5,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deserialization goes through the canonicalization table, so aliased or
/// unknown labels in scanner outputs and knowledge bases land on the
/// canonical scale instead of failing.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(canonicalize_severity(Some(&raw)).0)
    }
}

/// Map any scanner-reported severity onto the canonical scale.
///
/// Aliases: WARN/WARNING map to MEDIUM, SEVERE maps to HIGH. Unknown or
/// missing values fall back to MEDIUM.
pub fn canonicalize_severity(value: Option<&str>) -> (Severity, u32) {
    let severity = match value {
        None => Severity::Medium,
        Some(raw) => match raw.trim().to_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" | "SEVERE" => Severity::High,
            "MEDIUM" | "WARN" | "WARNING" => Severity::Medium,
            "LOW" => Severity::Low,
            "INFO" => Severity::Info,
            _ => Severity::Medium,
        },
    };
    (severity, severity.score())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_labels_map_to_themselves() {
        assert_eq!(canonicalize_severity(Some("HIGH")).0, Severity::High);
        assert_eq!(canonicalize_severity(Some("critical")).0, Severity::Critical);
        assert_eq!(canonicalize_severity(Some("Info")).0, Severity::Info);
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(canonicalize_severity(Some("warning")).0, Severity::Medium);
        assert_eq!(canonicalize_severity(Some("WARN")).0, Severity::Medium);
        assert_eq!(canonicalize_severity(Some("severe")).0, Severity::High);
    }

    #[test]
    fn unknown_and_missing_fall_back_to_medium() {
        assert_eq!(canonicalize_severity(Some("bogus")).0, Severity::Medium);
        assert_eq!(canonicalize_severity(None), (Severity::Medium, 50));
    }

    #[test]
    fn deserialization_canonicalizes_aliases() {
        let severity: Severity = serde_json::from_str("\"WARNING\"").unwrap();
        assert_eq!(severity, Severity::Medium);
        let severity: Severity = serde_json::from_str("\"SEVERE\"").unwrap();
        assert_eq!(severity, Severity::High);
    }

    #[test]
    fn scores_match_labels() {
        assert_eq!(Severity::Critical.score(), 100);
        assert_eq!(Severity::High.score(), 80);
        assert_eq!(Severity::Medium.score(), 50);
        assert_eq!(Severity::Low.score(), 20);
        assert_eq!(Severity::Info.score(), 5);
    }
}
