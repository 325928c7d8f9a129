use crate::{Language, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One vulnerable usage emitted by a SAST analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SastVulnerability {
    /// Scanner-local rule identifier, e.g. `rsa_generation`.
    #[serde(rename = "type")]
    pub rule: String,
    /// 1-based line of the match.
    pub line: usize,
    /// Exact matched substring, or the source line for structural hits.
    pub code: String,
    pub severity: Severity,
    pub algorithm: String,
    pub description: String,
    pub recommendation: String,
}

/// Per-file SAST result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SastFileResult {
    pub file_path: String,
    pub language: Language,
    pub vulnerabilities: Vec<SastVulnerability>,
    pub total_issues: usize,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl SastFileResult {
    pub fn skipped(file_path: String, language: Language, reason: String) -> Self {
        Self {
            file_path,
            language,
            vulnerabilities: Vec::new(),
            total_issues: 0,
            skipped: true,
            skip_reason: Some(reason),
        }
    }
}

/// Aggregate SAST report for one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SastReport {
    pub total_files_scanned: usize,
    pub total_vulnerabilities: usize,
    pub severity_breakdown: BTreeMap<Severity, usize>,
    pub algorithm_breakdown: BTreeMap<String, usize>,
    pub detailed_results: Vec<SastFileResult>,
    pub scanned_at: DateTime<Utc>,
}

/// How a dependency name matched a knowledge-base key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Partial,
}

/// One dependency flagged by the SCA engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerableDependency {
    /// Normalized knowledge-base key that matched.
    pub rule_id: String,
    pub name: String,
    pub version: String,
    pub dependency_type: String,
    pub matched_name: String,
    pub match_type: MatchType,
    pub severity: Severity,
    pub reason: String,
    pub pqc_classification: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pqc_support: Option<String>,
    pub alternatives: Vec<String>,
    pub language: Language,
}

/// Per-manifest SCA result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaFileResult {
    pub file_path: String,
    pub total_dependencies: usize,
    pub vulnerable_dependencies: Vec<VulnerableDependency>,
    pub total_vulnerabilities: usize,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl ScaFileResult {
    pub fn skipped(file_path: String, reason: String) -> Self {
        Self {
            file_path,
            total_dependencies: 0,
            vulnerable_dependencies: Vec::new(),
            total_vulnerabilities: 0,
            skipped: true,
            skip_reason: Some(reason),
        }
    }
}

/// Aggregate SCA report for one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaReport {
    pub total_files_scanned: usize,
    pub total_dependencies: usize,
    pub total_vulnerable: usize,
    pub detailed_results: Vec<ScaFileResult>,
    pub scanned_at: DateTime<Utc>,
}

/// One finding emitted by the configuration scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFinding {
    #[serde(rename = "type")]
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
    pub severity: Severity,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Extra tags, e.g. `skip_reason` on `cert_skipped` findings.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

/// Per-file configuration-scan result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFileResult {
    pub file_path: String,
    pub total_findings: usize,
    pub findings: Vec<ConfigFinding>,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

/// Aggregate configuration report for one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigReport {
    pub total_files_scanned: usize,
    pub total_findings: usize,
    pub detailed_results: Vec<ConfigFileResult>,
    pub scanned_at: DateTime<Utc>,
}
