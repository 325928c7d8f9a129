use crate::AnalyzerRegistry;
use chrono::Utc;
use pqc_scan_core::{FileMetadata, SastFileResult, SastReport};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Drives the per-language analyzers over the SAST target set.
pub struct SastScanner {
    registry: AnalyzerRegistry,
}

impl SastScanner {
    pub fn new() -> Self {
        Self {
            registry: AnalyzerRegistry::new(),
        }
    }

    pub fn scan_file(&self, metadata: &FileMetadata) -> SastFileResult {
        let language = metadata.language;

        let Some(analyzer) = self.registry.get(language) else {
            return SastFileResult::skipped(
                metadata.file_path.clone(),
                language,
                format!("Unsupported language: {}", language),
            );
        };

        let source = match std::fs::read_to_string(&metadata.absolute_path) {
            Ok(source) => source,
            Err(e) => {
                return SastFileResult::skipped(
                    metadata.file_path.clone(),
                    language,
                    format!("Read error: {}", e),
                );
            }
        };

        let vulnerabilities = analyzer.analyze(&metadata.file_path, &source);
        let total_issues = vulnerabilities.len();

        SastFileResult {
            file_path: metadata.file_path.clone(),
            language,
            vulnerabilities,
            total_issues,
            skipped: false,
            skip_reason: None,
        }
    }

    pub fn scan_repository(&self, sast_targets: &[FileMetadata]) -> SastReport {
        info!(files = sast_targets.len(), "running SAST scanner");

        let mut detailed_results = Vec::with_capacity(sast_targets.len());
        for metadata in sast_targets {
            debug!(file = %metadata.file_path, "scanning");
            detailed_results.push(self.scan_file(metadata));
        }

        let mut severity_breakdown = BTreeMap::new();
        let mut algorithm_breakdown: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_vulnerabilities = 0;

        for result in detailed_results.iter().filter(|r| !r.skipped) {
            total_vulnerabilities += result.total_issues;
            for vuln in &result.vulnerabilities {
                *severity_breakdown.entry(vuln.severity).or_default() += 1;
                *algorithm_breakdown.entry(vuln.algorithm.clone()).or_default() += 1;
            }
        }

        info!(vulnerabilities = total_vulnerabilities, "SAST scan completed");

        SastReport {
            total_files_scanned: detailed_results.iter().filter(|r| !r.skipped).count(),
            total_vulnerabilities,
            severity_breakdown,
            algorithm_breakdown,
            detailed_results,
            scanned_at: Utc::now(),
        }
    }
}

impl Default for SastScanner {
    fn default() -> Self {
        Self::new()
    }
}
