use crate::knowledge::{lookup, LibraryMatch};
use crate::parsers::{parser_for, Dependency};
use crate::version::is_version_vulnerable;
use chrono::Utc;
use pqc_scan_core::{FileMetadata, Language, ScaFileResult, ScaReport, VulnerableDependency};
use tracing::{debug, info};

/// Matches declared dependencies against the vulnerable-library knowledge
/// base, one manifest at a time.
pub struct ScaScanner;

impl ScaScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan_file(&self, metadata: &FileMetadata) -> ScaFileResult {
        let Some(parser) = parser_for(&metadata.file_name) else {
            return ScaFileResult::skipped(
                metadata.file_path.clone(),
                format!("Unsupported dependency file: {}", metadata.file_name),
            );
        };

        let dependencies = match parser.parse(&metadata.absolute_path) {
            Ok(dependencies) => dependencies,
            Err(e) => {
                return ScaFileResult::skipped(
                    metadata.file_path.clone(),
                    format!("Parse error: {}", e),
                );
            }
        };

        let vulnerable_dependencies: Vec<VulnerableDependency> = dependencies
            .iter()
            .filter_map(|dep| check_dependency(dep, metadata.language))
            .collect();

        ScaFileResult {
            file_path: metadata.file_path.clone(),
            total_dependencies: dependencies.len(),
            total_vulnerabilities: vulnerable_dependencies.len(),
            vulnerable_dependencies,
            skipped: false,
            skip_reason: None,
        }
    }

    pub fn scan_repository(&self, sca_targets: &[FileMetadata]) -> ScaReport {
        info!(files = sca_targets.len(), "running SCA scanner");

        let mut detailed_results = Vec::with_capacity(sca_targets.len());
        for metadata in sca_targets {
            debug!(file = %metadata.file_path, "scanning");
            detailed_results.push(self.scan_file(metadata));
        }

        let scanned = detailed_results.iter().filter(|r| !r.skipped);
        let total_dependencies = scanned.clone().map(|r| r.total_dependencies).sum();
        let total_vulnerable = scanned.clone().map(|r| r.total_vulnerabilities).sum();

        info!(
            vulnerable = total_vulnerable,
            dependencies = total_dependencies,
            "SCA scan completed"
        );

        ScaReport {
            total_files_scanned: scanned.count(),
            total_dependencies,
            total_vulnerable,
            detailed_results,
            scanned_at: Utc::now(),
        }
    }
}

impl Default for ScaScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn check_dependency(dep: &Dependency, language: Language) -> Option<VulnerableDependency> {
    let LibraryMatch {
        rule_id,
        matched_name,
        match_type,
        rule,
    } = lookup(language, &dep.name)?;

    let vulnerable = rule.all_versions_vulnerable
        || is_version_vulnerable(&dep.version, &rule.vulnerable_versions);
    if !vulnerable {
        return None;
    }

    Some(VulnerableDependency {
        rule_id,
        name: dep.name.clone(),
        version: dep.version.clone(),
        dependency_type: dep.dep_type.clone(),
        matched_name,
        match_type,
        severity: rule.severity,
        reason: rule.reason.clone(),
        pqc_classification: rule.classification(),
        pqc_support: rule.pqc_support.clone(),
        alternatives: rule.alternatives.clone(),
        language,
    })
}
