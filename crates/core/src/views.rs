use crate::{ConfigReport, Finding, LanguageStats, SastReport, ScaReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One observed source location for an inventoried algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryLocation {
    pub file_path: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_start_line: Option<usize>,
    pub detected_pattern: String,
}

/// One row of the inventory table, grouped by algorithm tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub algorithm: String,
    pub count: usize,
    pub locations: Vec<InventoryLocation>,
    /// Accumulated weighted risk, capped at 10.
    pub risk_score: f64,
}

/// Pie-chart slice: share of SAST findings per algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmRatio {
    pub name: String,
    pub ratio: f64,
}

/// Inventory view persisted once per scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Integer in [1, 10]; 10 means no weighted risk observed.
    pub pqc_readiness_score: i32,
    pub algorithm_ratios: Vec<AlgorithmRatio>,
    pub inventory_table: Vec<InventoryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapNodeType {
    Dir,
    File,
}

/// Recursive risk tree over the repository layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapNode {
    pub name: String,
    /// Repository-relative path; empty for the root node.
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: HeatmapNodeType,
    pub risk_score: f64,
    pub children: Vec<HeatmapNode>,
}

impl HeatmapNode {
    pub fn dir(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            node_type: HeatmapNodeType::Dir,
            risk_score: 0.0,
            children: Vec::new(),
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>, risk_score: f64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            node_type: HeatmapNodeType::File,
            risk_score,
            children: Vec::new(),
        }
    }
}

/// Ranked remediation item; at most five per scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based, dense, ascending importance.
    pub priority_rank: usize,
    pub estimated_effort: String,
    /// Markdown; the first line is an `## <issue>` heading.
    pub ai_recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Language-analysis summary carried into the final outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageAnalysisSummary {
    pub total_files: usize,
    pub language_stats: Vec<LanguageStats>,
}

/// Everything a completed scan hands to persistence and to the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub target: String,
    pub repository_path: PathBuf,
    pub language_analysis: LanguageAnalysisSummary,
    pub sast_report: SastReport,
    pub sca_report: ScaReport,
    pub config_report: ConfigReport,
    pub total_issues: usize,
    pub inventory: InventorySnapshot,
    pub heatmap: HeatmapNode,
    pub recommendations: Vec<Recommendation>,
    pub findings: Vec<Finding>,
    pub scanned_at: DateTime<Utc>,
}
