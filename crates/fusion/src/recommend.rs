use pqc_scan_core::{Recommendation, SastReport, ScanConfig};

/// Turn the highest-priority SAST findings into ranked remediation items,
/// in emission order, capped by configuration (five by default).
pub fn build_recommendations(
    sast_report: &SastReport,
    config: &ScanConfig,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    'outer: for result in sast_report.detailed_results.iter().filter(|r| !r.skipped) {
        for vuln in &result.vulnerabilities {
            recommendations.push(Recommendation {
                priority_rank: recommendations.len() + 1,
                estimated_effort: config.fusion.default_effort.clone(),
                ai_recommendation: format!("## {}\n{}", vuln.description, vuln.recommendation),
                algorithm: Some(vuln.algorithm.clone()),
                context: Some(result.file_path.clone()),
            });
            if recommendations.len() >= config.fusion.max_recommendations {
                break 'outer;
            }
        }
    }

    recommendations
}
