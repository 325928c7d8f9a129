use crate::weights::algorithm_weight;
use pqc_scan_core::{
    AlgorithmRatio, InventoryEntry, InventoryLocation, SastReport, ScanConfig,
};
use std::collections::HashMap;
use std::path::Path;

/// SAST finding counts per algorithm, normalized and rounded to two
/// decimals, sorted by share descending. SCA and config findings carry no
/// normalized algorithm tag and are deliberately excluded.
pub fn algorithm_ratios(sast_report: &SastReport) -> Vec<AlgorithmRatio> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut total = 0usize;
    for result in sast_report.detailed_results.iter().filter(|r| !r.skipped) {
        for vuln in &result.vulnerabilities {
            *counts.entry(vuln.algorithm.as_str()).or_default() += 1;
            total += 1;
        }
    }
    if total == 0 {
        return Vec::new();
    }

    let mut ratios: Vec<AlgorithmRatio> = counts
        .into_iter()
        .map(|(name, count)| AlgorithmRatio {
            name: name.to_string(),
            ratio: (count as f64 / total as f64 * 100.0).round() / 100.0,
        })
        .collect();
    ratios.sort_by(|a, b| b.ratio.total_cmp(&a.ratio).then(a.name.cmp(&b.name)));
    ratios
}

/// Group SAST vulnerabilities by algorithm, attaching a short source
/// snippet around each location when the file is still readable.
pub fn build_inventory_table(
    repo_path: &Path,
    sast_report: &SastReport,
    config: &ScanConfig,
) -> Vec<InventoryEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut entries: HashMap<String, InventoryEntry> = HashMap::new();

    for result in sast_report.detailed_results.iter().filter(|r| !r.skipped) {
        for vuln in &result.vulnerabilities {
            let snippet = read_snippet(
                repo_path,
                &result.file_path,
                vuln.line,
                config.fusion.snippet_context_lines,
            );

            let entry = entries
                .entry(vuln.algorithm.clone())
                .or_insert_with(|| {
                    order.push(vuln.algorithm.clone());
                    InventoryEntry {
                        algorithm: vuln.algorithm.clone(),
                        count: 0,
                        locations: Vec::new(),
                        risk_score: 0.0,
                    }
                });

            entry.count += 1;
            entry.risk_score = (entry.risk_score
                + vuln.severity.weight() * algorithm_weight(&vuln.algorithm))
            .min(10.0);
            entry.locations.push(InventoryLocation {
                file_path: result.file_path.clone(),
                line: vuln.line,
                code_snippet: snippet.as_ref().map(|(text, _)| text.clone()),
                snippet_start_line: snippet.as_ref().map(|(_, start)| *start),
                detected_pattern: vuln.code.clone(),
            });
        }
    }

    order
        .into_iter()
        .filter_map(|algorithm| entries.remove(&algorithm))
        .collect()
}

/// Context snippet around a 1-based line, with its 1-based start line.
/// Missing files and out-of-range lines yield nothing, silently.
fn read_snippet(
    repo_path: &Path,
    file_path: &str,
    line: usize,
    context_lines: usize,
) -> Option<(String, usize)> {
    let contents = std::fs::read_to_string(repo_path.join(file_path)).ok()?;
    let lines: Vec<&str> = contents.lines().collect();
    if line == 0 || line > lines.len() {
        return None;
    }

    let start = line.saturating_sub(context_lines + 1);
    let end = (line + context_lines).min(lines.len());
    Some((lines[start..end].join("\n"), start + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pqc_scan_core::{Language, SastFileResult, SastVulnerability, Severity};
    use std::collections::BTreeMap;
    use std::fs;

    fn vuln(rule: &str, line: usize, severity: Severity, algorithm: &str) -> SastVulnerability {
        SastVulnerability {
            rule: rule.to_string(),
            line,
            code: format!("{}()", rule),
            severity,
            algorithm: algorithm.to_string(),
            description: "d".to_string(),
            recommendation: "r".to_string(),
        }
    }

    fn report(results: Vec<SastFileResult>) -> SastReport {
        SastReport {
            total_files_scanned: results.len(),
            total_vulnerabilities: results.iter().map(|r| r.total_issues).sum(),
            severity_breakdown: BTreeMap::new(),
            algorithm_breakdown: BTreeMap::new(),
            detailed_results: results,
            scanned_at: Utc::now(),
        }
    }

    fn file_result(path: &str, vulnerabilities: Vec<SastVulnerability>) -> SastFileResult {
        SastFileResult {
            file_path: path.to_string(),
            language: Language::Python,
            total_issues: vulnerabilities.len(),
            vulnerabilities,
            skipped: false,
            skip_reason: None,
        }
    }

    #[test]
    fn ratios_sum_to_at_most_one_and_sort_descending() {
        let report = report(vec![file_result(
            "a.py",
            vec![
                vuln("rsa_generation", 1, Severity::High, "RSA"),
                vuln("rsa_generation", 2, Severity::High, "RSA"),
                vuln("weak_hash", 3, Severity::Medium, "Weak Hash"),
            ],
        )]);

        let ratios = algorithm_ratios(&report);
        assert_eq!(ratios[0].name, "RSA");
        assert_eq!(ratios[0].ratio, 0.67);
        assert_eq!(ratios[1].ratio, 0.33);
        let sum: f64 = ratios.iter().map(|r| r.ratio).sum();
        assert!(sum <= 1.0 + 1e-9);
    }

    #[test]
    fn no_findings_no_ratios() {
        let report = report(vec![file_result("a.py", vec![])]);
        assert!(algorithm_ratios(&report).is_empty());
    }

    #[test]
    fn inventory_groups_by_algorithm_and_caps_risk() {
        let many: Vec<SastVulnerability> = (1..=20)
            .map(|i| vuln("rsa_generation", i, Severity::High, "RSA"))
            .collect();
        let report = report(vec![file_result("a.py", many)]);

        let dir = tempfile::tempdir().unwrap();
        let table = build_inventory_table(dir.path(), &report, &ScanConfig::default());
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].count, 20);
        assert_eq!(table[0].locations.len(), 20);
        assert_eq!(table[0].risk_score, 10.0);
    }

    #[test]
    fn snippet_read_back_tolerates_missing_files() {
        let report = report(vec![file_result(
            "gone.py",
            vec![vuln("rsa_generation", 1, Severity::High, "RSA")],
        )]);

        let dir = tempfile::tempdir().unwrap();
        let table = build_inventory_table(dir.path(), &report, &ScanConfig::default());
        assert_eq!(table[0].locations[0].code_snippet, None);
        assert_eq!(table[0].locations[0].snippet_start_line, None);
    }

    #[test]
    fn snippet_covers_context_around_the_line() {
        let dir = tempfile::tempdir().unwrap();
        let source = (1..=10).map(|i| format!("line{}", i)).collect::<Vec<_>>().join("\n");
        fs::write(dir.path().join("a.py"), &source).unwrap();

        let report = report(vec![file_result(
            "a.py",
            vec![vuln("rsa_generation", 5, Severity::High, "RSA")],
        )]);

        let table = build_inventory_table(dir.path(), &report, &ScanConfig::default());
        let location = &table[0].locations[0];
        assert_eq!(location.snippet_start_line, Some(2));
        let snippet = location.code_snippet.as_ref().unwrap();
        assert!(snippet.starts_with("line2"));
        assert!(snippet.ends_with("line8"));
        assert!(location.snippet_start_line.unwrap() <= location.line);
    }
}
