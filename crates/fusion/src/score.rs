use crate::weights::algorithm_weight;
use pqc_scan_core::{SastReport, ScaReport};

/// Total weighted risk over every SAST vulnerability and every vulnerable
/// dependency. SCA entries infer their algorithm from the library name.
pub fn weighted_risk(sast_report: &SastReport, sca_report: &ScaReport) -> f64 {
    let sast: f64 = sast_report
        .detailed_results
        .iter()
        .filter(|r| !r.skipped)
        .flat_map(|r| &r.vulnerabilities)
        .map(|v| v.severity.weight() * algorithm_weight(&v.algorithm))
        .sum();

    let sca: f64 = sca_report
        .detailed_results
        .iter()
        .filter(|r| !r.skipped)
        .flat_map(|r| &r.vulnerable_dependencies)
        .map(|d| d.severity.weight() * algorithm_weight(&d.name))
        .sum();

    sast + sca
}

/// Readiness score on a 1..=10 scale; 10 means no weighted risk at all and
/// the score never reaches 0.
pub fn pqc_readiness_score(weighted_risk: f64) -> i32 {
    if weighted_risk == 0.0 {
        return 10;
    }
    let score = (10.0 - (weighted_risk / 3.0).min(9.0)).floor() as i32;
    score.max(1)
}
