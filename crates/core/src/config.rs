use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub engine: EngineConfig,
    pub acquirer: AcquirerConfig,
    pub classifier: ClassifierConfig,
    pub certificates: CertificateConfig,
    pub fusion: FusionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquirerConfig {
    /// Hard timeout for the shallow clone.
    pub clone_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Directory names pruned at any depth during enumeration and in the
    /// heatmap walk.
    pub ignore_directories: Vec<String>,
    /// Regex patterns for file names excluded from enumeration.
    pub ignore_file_patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateConfig {
    /// Hard timeout for the external certificate-parsing tool.
    pub tool_timeout_secs: u64,
    /// Bytes peeked from a candidate certificate before any subprocess runs.
    pub peek_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionConfig {
    pub max_recommendations: usize,
    pub default_effort: String,
    /// Lines of context on each side of an inventory snippet.
    pub snippet_context_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl ScanConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ScanConfig = toml::from_str(&content).map_err(|e| {
            crate::ScanError::Config {
                message: format!("Failed to parse config: {}", e),
            }
        })?;
        Ok(config)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                name: "pqc-scan".to_string(),
            },
            acquirer: AcquirerConfig {
                clone_timeout_secs: 300,
            },
            classifier: ClassifierConfig {
                ignore_directories: [
                    ".git",
                    "node_modules",
                    "__pycache__",
                    ".venv",
                    "venv",
                    "env",
                    ".pytest_cache",
                    ".mypy_cache",
                    "build",
                    "dist",
                    "target",
                    ".gradle",
                    "vendor",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                ignore_file_patterns: [
                    r".*\.pyc$",
                    r".*\.pyo$",
                    r".*\.pyd$",
                    r".*\.so$",
                    r".*\.dll$",
                    r".*\.dylib$",
                    r".*\.exe$",
                    r".*\.zip$",
                    r".*\.tar\.gz$",
                    r".*\.jpg$",
                    r".*\.jpeg$",
                    r".*\.png$",
                    r".*\.gif$",
                    r".*\.pdf$",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            },
            certificates: CertificateConfig {
                tool_timeout_secs: 5,
                peek_bytes: 4096,
            },
            fusion: FusionConfig {
                max_recommendations: 5,
                default_effort: "1-2 M/D".to_string(),
                snippet_context_lines: 3,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.engine.name, "pqc-scan");
        assert_eq!(cfg.acquirer.clone_timeout_secs, 300);
        assert_eq!(cfg.certificates.tool_timeout_secs, 5);
        assert_eq!(cfg.certificates.peek_bytes, 4096);
        assert_eq!(cfg.fusion.max_recommendations, 5);
        assert!(cfg.classifier.ignore_directories.iter().any(|d| d == ".git"));
        assert!(cfg.classifier.ignore_directories.iter().any(|d| d == "node_modules"));
    }

    #[test]
    fn from_file_parses_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let toml = r#"
            [engine]
            name = "pqc-scan-test"

            [acquirer]
            clone_timeout_secs = 60

            [classifier]
            ignore_directories = [".git"]
            ignore_file_patterns = [".*\\.png$"]

            [certificates]
            tool_timeout_secs = 2
            peek_bytes = 1024

            [fusion]
            max_recommendations = 3
            default_effort = "1 M/D"
            snippet_context_lines = 2

            [logging]
            level = "debug"
            format = "json"
        "#;
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(toml.as_bytes()).unwrap();

        let cfg = ScanConfig::from_file(&path).expect("parsed");
        assert_eq!(cfg.engine.name, "pqc-scan-test");
        assert_eq!(cfg.acquirer.clone_timeout_secs, 60);
        assert_eq!(cfg.fusion.max_recommendations, 3);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        let err = ScanConfig::from_file(&path).unwrap_err();
        assert!(format!("{}", err).contains("Failed to parse config"));
    }
}
