pub mod weights;
pub mod score;
pub mod inventory;
pub mod heatmap;
pub mod recommend;
pub mod findings;

use pqc_scan_core::{
    ConfigReport, Finding, HeatmapNode, InventorySnapshot, Recommendation, SastReport, ScaReport,
    ScanConfig,
};
use std::path::Path;

/// The four derived views produced from the scanner reports.
#[derive(Debug, Clone)]
pub struct FusionOutput {
    pub inventory: InventorySnapshot,
    pub heatmap: HeatmapNode,
    pub recommendations: Vec<Recommendation>,
    pub findings: Vec<Finding>,
}

/// Fuse the three scanner reports into the inventory snapshot, heatmap
/// tree, recommendation list and normalized finding stream.
pub fn fuse(
    repo_path: &Path,
    sast_report: &SastReport,
    sca_report: &ScaReport,
    config_report: &ConfigReport,
    config: &ScanConfig,
) -> FusionOutput {
    let weighted_risk = score::weighted_risk(sast_report, sca_report);
    let inventory = InventorySnapshot {
        pqc_readiness_score: score::pqc_readiness_score(weighted_risk),
        algorithm_ratios: inventory::algorithm_ratios(sast_report),
        inventory_table: inventory::build_inventory_table(repo_path, sast_report, config),
    };

    FusionOutput {
        inventory,
        heatmap: heatmap::build_heatmap(repo_path, sast_report, config),
        recommendations: recommend::build_recommendations(sast_report, config),
        findings: findings::normalize_findings(sast_report, sca_report, config_report),
    }
}
