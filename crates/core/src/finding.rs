use crate::Severity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Which engine produced a normalized finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScannerType {
    #[serde(rename = "SAST")]
    Sast,
    #[serde(rename = "SCA")]
    Sca,
    #[serde(rename = "CONFIG")]
    Config,
}

impl ScannerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sast => "SAST",
            Self::Sca => "SCA",
            Self::Config => "CONFIG",
        }
    }
}

impl fmt::Display for ScannerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized finding, the unit of the persisted stream.
///
/// The identity tuple `(scanner_type, rule_id, file_path, line_start,
/// line_end, sha256(evidence))` drives deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub scanner_type: ScannerType,
    pub rule_id: String,
    pub severity: Severity,
    pub severity_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    pub file_path: Option<String>,
    pub line_start: Option<usize>,
    pub line_end: Option<usize>,
    pub evidence: Option<String>,
    /// Free-form tag map; always carries `scanner_type`, `rule_id` and
    /// `message`, plus `duplicate_count` once deduplicated.
    pub meta: Map<String, Value>,
}

impl Finding {
    /// `meta.duplicate_count`, defaulting to 1 for a never-duplicated finding.
    pub fn duplicate_count(&self) -> u64 {
        self.meta
            .get("duplicate_count")
            .and_then(Value::as_u64)
            .unwrap_or(1)
    }
}
