use crate::constants::manifest_language;
use crate::{FileClassifier, LanguageDetector};
use pqc_scan_core::{
    FileCategory, FileMetadata, LanguageStats, RepositoryAnalysis, Result, ScanConfig, ScanError,
    ScannerTargets,
};
use regex::RegexSet;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const BINARY_PROBE_BYTES: usize = 1024;

/// Walks a working copy, classifies every surviving file and derives the
/// scanner target sets and language statistics.
pub struct RepositoryAnalyzer {
    ignore_directories: Vec<String>,
    ignore_files: RegexSet,
}

impl RepositoryAnalyzer {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let ignore_files =
            RegexSet::new(&config.classifier.ignore_file_patterns).map_err(|e| {
                ScanError::Config {
                    message: format!("Invalid ignore pattern: {}", e),
                }
            })?;
        Ok(Self {
            ignore_directories: config.classifier.ignore_directories.clone(),
            ignore_files,
        })
    }

    pub fn analyze(&self, repo_path: &Path) -> Result<RepositoryAnalysis> {
        info!(path = %repo_path.display(), "analyzing repository");

        let mut files = Vec::new();
        let walker = WalkDir::new(repo_path).into_iter().filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !(entry.file_type().is_dir() && self.ignore_directories.iter().any(|d| d == &*name))
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if self.ignore_files.is_match(&file_name) {
                continue;
            }
            match self.analyze_file(entry.path(), repo_path) {
                Ok(metadata) => files.push(metadata),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "skipping file");
                }
            }
        }

        let language_stats = generate_language_stats(&files);
        let scanner_targets = classify_for_scanners(&files);

        debug!(
            sast = scanner_targets.sast_targets.len(),
            sca = scanner_targets.sca_targets.len(),
            config = scanner_targets.config_targets.len(),
            "scanner targets selected"
        );

        Ok(RepositoryAnalysis {
            repository_path: repo_path.to_path_buf(),
            total_files: files.len(),
            files,
            language_stats,
            scanner_targets,
        })
    }

    fn analyze_file(&self, path: &Path, repo_path: &Path) -> Result<FileMetadata> {
        let size_bytes = path.metadata()?.len();
        let relative = path
            .strip_prefix(repo_path)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let contents = read_probe(path)?;
        let is_binary = contents
            .iter()
            .take(BINARY_PROBE_BYTES)
            .any(|&b| b == 0);

        let (line_count, encoding) = if is_binary {
            (0, "binary".to_string())
        } else {
            decode_text(&contents)
        };

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default();

        let mut metadata = FileMetadata {
            file_path: relative,
            absolute_path: path.to_path_buf(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            extension,
            language: LanguageDetector::detect(path),
            category: FileCategory::Unknown,
            size_bytes,
            line_count,
            encoding,
            is_binary,
        };

        metadata.category = FileClassifier::classify(&metadata);
        // SCA dispatches by manifest name, so the manifest's ecosystem
        // overrides the extension-derived language.
        if metadata.category == FileCategory::DependencyManifest {
            if let Some(language) = manifest_language(&metadata.file_name) {
                metadata.language = language;
            }
        }

        Ok(metadata)
    }
}

fn read_probe(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Count lines and name the decoding that succeeded: utf-8 first, then
/// latin-1, which accepts any byte sequence.
fn decode_text(contents: &[u8]) -> (usize, String) {
    if std::str::from_utf8(contents).is_ok() {
        return (count_lines(contents), "utf-8".to_string());
    }
    (count_lines(contents), "latin-1".to_string())
}

fn count_lines(contents: &[u8]) -> usize {
    if contents.is_empty() {
        return 0;
    }
    let newlines = contents.iter().filter(|&&b| b == b'\n').count();
    if contents.ends_with(b"\n") {
        newlines
    } else {
        newlines + 1
    }
}

fn generate_language_stats(files: &[FileMetadata]) -> Vec<LanguageStats> {
    let mut by_language: HashMap<_, (usize, usize, u64)> = HashMap::new();
    for metadata in files {
        let entry = by_language.entry(metadata.language).or_default();
        entry.0 += 1;
        entry.1 += metadata.line_count;
        entry.2 += metadata.size_bytes;
    }

    let total_bytes: u64 = by_language.values().map(|(_, _, bytes)| bytes).sum();

    let mut stats: Vec<LanguageStats> = by_language
        .into_iter()
        .map(|(language, (file_count, total_lines, bytes))| {
            let percentage = if total_bytes > 0 {
                (bytes as f64 / total_bytes as f64 * 100.0 * 100.0).round() / 100.0
            } else {
                0.0
            };
            LanguageStats {
                language,
                file_count,
                total_lines,
                total_bytes: bytes,
                percentage,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    stats
}

fn classify_for_scanners(files: &[FileMetadata]) -> ScannerTargets {
    let mut targets = ScannerTargets::default();

    for metadata in files {
        match metadata.category {
            FileCategory::SourceCode => targets.sast_targets.push(metadata.clone()),
            FileCategory::DependencyManifest => targets.sca_targets.push(metadata.clone()),
            FileCategory::Configuration => {
                if FileClassifier::is_crypto_related_config(metadata) {
                    targets.config_targets.push(metadata.clone());
                }
            }
            _ => {}
        }
    }

    targets
}
