use pqc_scan_core::{
    ConfigReport, EvidenceHash, Finding, SastReport, ScaReport, ScannerType,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::warn;

/// Flatten the three scanner reports into one normalized, validated and
/// deduplicated finding stream, preserving first-seen order.
pub fn normalize_findings(
    sast_report: &SastReport,
    sca_report: &ScaReport,
    config_report: &ConfigReport,
) -> Vec<Finding> {
    let mut raw = Vec::new();
    collect_sast(sast_report, &mut raw);
    collect_sca(sca_report, &mut raw);
    collect_config(config_report, &mut raw);
    deduplicate(raw.into_iter().filter(validate).collect())
}

fn collect_sast(report: &SastReport, out: &mut Vec<Finding>) {
    for result in report.detailed_results.iter().filter(|r| !r.skipped) {
        for vuln in &result.vulnerabilities {
            let mut meta = Map::new();
            meta.insert("scanner_type".into(), json!("SAST"));
            meta.insert("rule_id".into(), json!(vuln.rule));
            meta.insert("message".into(), json!(vuln.description));
            meta.insert("recommendation".into(), json!(vuln.recommendation));

            out.push(Finding {
                scanner_type: ScannerType::Sast,
                rule_id: vuln.rule.clone(),
                severity: vuln.severity,
                severity_score: vuln.severity.score(),
                algorithm: Some(vuln.algorithm.clone()),
                file_path: Some(result.file_path.clone()),
                line_start: Some(vuln.line),
                line_end: Some(vuln.line),
                evidence: Some(vuln.code.clone()),
                meta,
            });
        }
    }
}

fn collect_sca(report: &ScaReport, out: &mut Vec<Finding>) {
    for result in report.detailed_results.iter().filter(|r| !r.skipped) {
        for dep in &result.vulnerable_dependencies {
            let mut meta = Map::new();
            meta.insert("scanner_type".into(), json!("SCA"));
            meta.insert("rule_id".into(), json!(dep.name));
            meta.insert("message".into(), json!(dep.reason));
            meta.insert("matched_name".into(), json!(dep.matched_name));
            meta.insert("match_type".into(), json!(dep.match_type));
            meta.insert("dependency_type".into(), json!(dep.dependency_type));
            meta.insert("pqc_classification".into(), json!(dep.pqc_classification));
            if let Some(support) = &dep.pqc_support {
                meta.insert("pqc_support".into(), json!(support));
            }
            if !dep.alternatives.is_empty() {
                meta.insert("alternatives".into(), json!(dep.alternatives));
            }

            out.push(Finding {
                scanner_type: ScannerType::Sca,
                rule_id: dep.name.clone(),
                severity: dep.severity,
                severity_score: dep.severity.score(),
                algorithm: None,
                file_path: Some(result.file_path.clone()),
                line_start: None,
                line_end: None,
                evidence: Some(format!("{}@{}", dep.name, dep.version)),
                meta,
            });
        }
    }
}

fn collect_config(report: &ConfigReport, out: &mut Vec<Finding>) {
    for result in report.detailed_results.iter().filter(|r| !r.skipped) {
        for finding in &result.findings {
            let mut meta = Map::new();
            meta.insert("scanner_type".into(), json!("CONFIG"));
            meta.insert("rule_id".into(), json!(finding.rule));
            meta.insert("message".into(), json!(finding.description));
            if let Some(rec) = &finding.recommendation {
                meta.insert("recommendation".into(), json!(rec));
            }
            for (key, value) in &finding.meta {
                meta.insert(key.clone(), json!(value));
            }

            out.push(Finding {
                scanner_type: ScannerType::Config,
                rule_id: finding.rule.clone(),
                severity: finding.severity,
                severity_score: finding.severity.score(),
                algorithm: config_algorithm(&finding.rule),
                file_path: Some(result.file_path.clone()),
                line_start: finding.line,
                line_end: finding.line,
                evidence: finding.matched_text.clone(),
                meta,
            });
        }
    }
}

fn config_algorithm(rule: &str) -> Option<String> {
    match rule {
        "rsa_cipher" | "rsa_certificate" => Some("RSA".to_string()),
        "ecdsa_cipher" | "ecc_certificate" => Some("ECC".to_string()),
        _ => None,
    }
}

/// A finding must carry the canonical meta tags to be persistable; anything
/// else is dropped with a warning rather than failing the scan.
fn validate(finding: &Finding) -> bool {
    for key in ["scanner_type", "rule_id", "message"] {
        if !finding.meta.contains_key(key) {
            warn!(
                rule = finding.rule_id,
                missing = key,
                "dropping finding without required meta tag"
            );
            return false;
        }
    }
    if finding.rule_id.is_empty() {
        warn!("dropping finding with empty rule id");
        return false;
    }
    true
}

/// Keep the first occurrence of each identity tuple and count duplicates
/// into `meta.duplicate_count`; N identical raw findings collapse to one
/// stored finding with a count of N.
fn deduplicate(findings: Vec<Finding>) -> Vec<Finding> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut deduplicated: Vec<Finding> = Vec::new();

    for mut finding in findings {
        let key = identity_key(&finding);
        match seen.get(&key) {
            Some(&index) => {
                let count = deduplicated[index].duplicate_count() + 1;
                deduplicated[index]
                    .meta
                    .insert("duplicate_count".into(), json!(count));
            }
            None => {
                finding.meta.insert("duplicate_count".into(), json!(1));
                seen.insert(key, deduplicated.len());
                deduplicated.push(finding);
            }
        }
    }

    deduplicated
}

fn identity_key(finding: &Finding) -> String {
    let evidence_hash = EvidenceHash::from_string(finding.evidence.as_deref().unwrap_or(""));
    format!(
        "{}|{}|{}|{}|{}|{}",
        finding.scanner_type,
        finding.rule_id,
        finding.file_path.as_deref().unwrap_or(""),
        finding
            .line_start
            .map(|l| l.to_string())
            .unwrap_or_default(),
        finding.line_end.map(|l| l.to_string()).unwrap_or_default(),
        evidence_hash
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pqc_scan_core::{
        ConfigFileResult, ConfigFinding, Language, MatchType, SastFileResult, SastVulnerability,
        ScaFileResult, Severity, VulnerableDependency,
    };
    use std::collections::BTreeMap;

    fn sast_vuln() -> SastVulnerability {
        SastVulnerability {
            rule: "rsa_generation".to_string(),
            line: 10,
            code: "RSA.generate(2048)".to_string(),
            severity: Severity::High,
            algorithm: "RSA".to_string(),
            description: "RSA key generation detected".to_string(),
            recommendation: "Use PQC-safe alternatives".to_string(),
        }
    }

    fn sast_report(vulnerabilities: Vec<SastVulnerability>) -> SastReport {
        SastReport {
            total_files_scanned: 1,
            total_vulnerabilities: vulnerabilities.len(),
            severity_breakdown: BTreeMap::new(),
            algorithm_breakdown: BTreeMap::new(),
            detailed_results: vec![SastFileResult {
                file_path: "src/a.py".to_string(),
                language: Language::Python,
                total_issues: vulnerabilities.len(),
                vulnerabilities,
                skipped: false,
                skip_reason: None,
            }],
            scanned_at: Utc::now(),
        }
    }

    fn empty_sca() -> ScaReport {
        ScaReport {
            total_files_scanned: 0,
            total_dependencies: 0,
            total_vulnerable: 0,
            detailed_results: vec![],
            scanned_at: Utc::now(),
        }
    }

    fn empty_config() -> ConfigReport {
        ConfigReport {
            total_files_scanned: 0,
            total_findings: 0,
            detailed_results: vec![],
            scanned_at: Utc::now(),
        }
    }

    #[test]
    fn identical_findings_collapse_with_a_count() {
        let report = sast_report(vec![sast_vuln(), sast_vuln()]);
        let findings = normalize_findings(&report, &empty_sca(), &empty_config());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].duplicate_count(), 2);
    }

    #[test]
    fn distinct_rules_on_the_same_line_are_kept() {
        let mut other = sast_vuln();
        other.rule = "weak_random".to_string();
        let report = sast_report(vec![sast_vuln(), other]);
        let findings = normalize_findings(&report, &empty_sca(), &empty_config());
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn dedup_is_idempotent_over_repeats() {
        let n = 4;
        let report = sast_report((0..n).map(|_| sast_vuln()).collect());
        let findings = normalize_findings(&report, &empty_sca(), &empty_config());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].duplicate_count(), n as u64);
    }

    #[test]
    fn all_three_sources_are_normalized_with_required_meta() {
        let sast = sast_report(vec![sast_vuln()]);

        let sca = ScaReport {
            total_files_scanned: 1,
            total_dependencies: 1,
            total_vulnerable: 1,
            detailed_results: vec![ScaFileResult {
                file_path: "requirements.txt".to_string(),
                total_dependencies: 1,
                vulnerable_dependencies: vec![VulnerableDependency {
                    rule_id: "pycrypto".to_string(),
                    name: "pycrypto".to_string(),
                    version: "2.6.1".to_string(),
                    dependency_type: "runtime".to_string(),
                    matched_name: "pycrypto".to_string(),
                    match_type: MatchType::Exact,
                    severity: Severity::High,
                    reason: "RSA/DSA library without PQC support.".to_string(),
                    pqc_classification: "Traditional Crypto Library".to_string(),
                    pqc_support: None,
                    alternatives: vec![],
                    language: Language::Python,
                }],
                total_vulnerabilities: 1,
                skipped: false,
                skip_reason: None,
            }],
            scanned_at: Utc::now(),
        };

        let config = ConfigReport {
            total_files_scanned: 1,
            total_findings: 1,
            detailed_results: vec![ConfigFileResult {
                file_path: "nginx.conf".to_string(),
                total_findings: 1,
                findings: vec![ConfigFinding {
                    rule: "outdated_tls".to_string(),
                    line: Some(1),
                    matched_text: Some("TLSv1.0".to_string()),
                    severity: Severity::High,
                    description: "Outdated TLS version".to_string(),
                    recommendation: Some("Upgrade to TLS 1.3".to_string()),
                    meta: BTreeMap::new(),
                }],
                skipped: false,
                skip_reason: None,
            }],
            scanned_at: Utc::now(),
        };

        let findings = normalize_findings(&sast, &sca, &config);
        assert_eq!(findings.len(), 3);

        for finding in &findings {
            assert!(finding.meta.contains_key("scanner_type"));
            assert!(finding.meta.contains_key("rule_id"));
            assert!(finding.meta.contains_key("message"));
        }

        let sca_finding = findings
            .iter()
            .find(|f| f.scanner_type == ScannerType::Sca)
            .unwrap();
        assert_eq!(sca_finding.evidence.as_deref(), Some("pycrypto@2.6.1"));
        assert_eq!(sca_finding.line_start, None);
        assert_eq!(sca_finding.algorithm, None);

        let config_finding = findings
            .iter()
            .find(|f| f.scanner_type == ScannerType::Config)
            .unwrap();
        assert_eq!(config_finding.algorithm, None);
        assert_eq!(config_finding.line_start, Some(1));
    }

    #[test]
    fn config_cipher_rules_map_to_algorithms() {
        assert_eq!(config_algorithm("rsa_cipher").as_deref(), Some("RSA"));
        assert_eq!(config_algorithm("rsa_certificate").as_deref(), Some("RSA"));
        assert_eq!(config_algorithm("ecdsa_cipher").as_deref(), Some("ECC"));
        assert_eq!(config_algorithm("ecc_certificate").as_deref(), Some("ECC"));
        assert_eq!(config_algorithm("outdated_tls"), None);
    }

    #[test]
    fn order_is_first_seen() {
        let mut second = sast_vuln();
        second.rule = "weak_hash".to_string();
        second.line = 20;
        let report = sast_report(vec![sast_vuln(), second, sast_vuln()]);
        let findings = normalize_findings(&report, &empty_sca(), &empty_config());
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].rule_id, "rsa_generation");
        assert_eq!(findings[1].rule_id, "weak_hash");
        assert_eq!(findings[0].duplicate_count(), 2);
    }
}
