use crate::acquire::{acquire, WorkingCopy};
use crate::job::{checkpoint, JobStore};
use crate::persist::ScanStore;
use chrono::Utc;
use pqc_scan_classifier::RepositoryAnalyzer;
use pqc_scan_confscan::ConfigScanner;
use pqc_scan_core::{
    LanguageAnalysisSummary, Result, ScanConfig, ScanError, ScanOutcome,
};
use pqc_scan_fusion::fuse;
use pqc_scan_sast::SastScanner;
use pqc_scan_sca::ScaScanner;
use tracing::{error, info};
use uuid::Uuid;

/// Orchestrates one scan: acquire, classify, run the three scanners, fuse
/// the results and publish them. Progress lands on the job record at fixed
/// checkpoints; the working copy is removed on every exit path when the
/// acquirer owns it.
pub struct ScanPipeline {
    config: ScanConfig,
}

impl ScanPipeline {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub async fn run(
        &self,
        scan_id: Uuid,
        target: &str,
        job_store: &dyn JobStore,
        scan_store: &dyn ScanStore,
    ) -> Result<ScanOutcome> {
        info!(%scan_id, target, "starting scan");

        job_store.update_progress(scan_id, checkpoint::CLONE, "Cloning repository...")?;
        let working_copy = match acquire(target, &self.config.acquirer).await {
            Ok(copy) => copy,
            Err(e) => {
                error!(%scan_id, error = %e, "acquisition failed");
                job_store.fail(scan_id, &format!("Error: {}", e), Some(&e.to_string()))?;
                return Err(e);
            }
        };

        let result = self
            .run_stages(scan_id, target, &working_copy, job_store, scan_store)
            .await;
        working_copy.cleanup();

        match result {
            Ok(outcome) => {
                job_store.complete(scan_id, "Completed")?;
                info!(%scan_id, issues = outcome.total_issues, "scan completed");
                Ok(outcome)
            }
            Err(e) => {
                error!(%scan_id, error = %e, "scan failed");
                job_store.fail(scan_id, &format!("Error: {}", e), Some(&e.to_string()))?;
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        scan_id: Uuid,
        target: &str,
        working_copy: &WorkingCopy,
        job_store: &dyn JobStore,
        scan_store: &dyn ScanStore,
    ) -> Result<ScanOutcome> {
        job_store.update_progress(
            scan_id,
            checkpoint::LANGUAGE_ANALYSIS,
            "Analyzing languages...",
        )?;
        let analyzer = RepositoryAnalyzer::new(&self.config)?;
        let analysis = analyzer.analyze(&working_copy.path)?;

        job_store.update_progress(scan_id, checkpoint::SAST, "Running SAST scanner...")?;
        let sast_report = SastScanner::new().scan_repository(&analysis.scanner_targets.sast_targets);

        job_store.update_progress(scan_id, checkpoint::SCA, "Running SCA scanner...")?;
        let sca_report = ScaScanner::new().scan_repository(&analysis.scanner_targets.sca_targets);

        job_store.update_progress(scan_id, checkpoint::CONFIG, "Running config scanner...")?;
        let config_report = ConfigScanner::new(self.config.certificates.clone())
            .scan_repository(&analysis.scanner_targets.config_targets)
            .await;

        job_store.update_progress(scan_id, checkpoint::PROCESSING, "Processing results...")?;
        let fusion = fuse(
            &working_copy.path,
            &sast_report,
            &sca_report,
            &config_report,
            &self.config,
        );

        let total_issues = sast_report.total_vulnerabilities
            + sca_report.total_vulnerable
            + config_report.total_findings;

        let outcome = ScanOutcome {
            target: target.to_string(),
            repository_path: working_copy.path.clone(),
            language_analysis: LanguageAnalysisSummary {
                total_files: analysis.total_files,
                language_stats: analysis.language_stats,
            },
            sast_report,
            sca_report,
            config_report,
            total_issues,
            inventory: fusion.inventory,
            heatmap: fusion.heatmap,
            recommendations: fusion.recommendations,
            findings: fusion.findings,
            scanned_at: Utc::now(),
        };

        job_store.update_progress(scan_id, checkpoint::FINALIZING, "Finalizing...")?;
        scan_store
            .replace_scan(scan_id, &outcome)
            .map_err(|e| ScanError::Persistence {
                message: e.to_string(),
            })?;

        Ok(outcome)
    }
}
