use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Closed language vocabulary used by the classifier and the scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Go,
    C,
    Cpp,
    CHeader,
    CppHeader,
    CSharp,
    Ruby,
    Php,
    Rust,
    Kotlin,
    Swift,
    Shell,
    Yaml,
    Json,
    Xml,
    Toml,
    Ini,
    Config,
    Env,
    Certificate,
    PrivateKey,
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::Go => "go",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CHeader => "c_header",
            Self::CppHeader => "cpp_header",
            Self::CSharp => "csharp",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Rust => "rust",
            Self::Kotlin => "kotlin",
            Self::Swift => "swift",
            Self::Shell => "shell",
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Toml => "toml",
            Self::Ini => "ini",
            Self::Config => "config",
            Self::Env => "env",
            Self::Certificate => "certificate",
            Self::PrivateKey => "private_key",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// File category, assigned with a fixed priority: dependency manifest >
/// configuration > source code > binary > documentation > unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    SourceCode,
    Configuration,
    DependencyManifest,
    Documentation,
    Binary,
    Unknown,
}

/// Per-file metadata produced by the classifier. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Repository-relative path, POSIX separators.
    pub file_path: String,
    pub absolute_path: PathBuf,
    pub file_name: String,
    /// Lower-cased extension including the leading dot, empty when absent.
    pub extension: String,
    pub language: Language,
    pub category: FileCategory,
    pub size_bytes: u64,
    /// Text files only; 0 for binary files.
    pub line_count: usize,
    pub encoding: String,
    pub is_binary: bool,
}

/// Per-language aggregate over the classified files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageStats {
    pub language: Language,
    pub file_count: usize,
    pub total_lines: usize,
    pub total_bytes: u64,
    /// Share of total bytes, rounded to two decimals.
    pub percentage: f64,
}

/// Disjoint scanner input sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannerTargets {
    pub sast_targets: Vec<FileMetadata>,
    pub sca_targets: Vec<FileMetadata>,
    pub config_targets: Vec<FileMetadata>,
}

/// Classifier output for one working copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryAnalysis {
    pub repository_path: PathBuf,
    pub total_files: usize,
    pub files: Vec<FileMetadata>,
    pub language_stats: Vec<LanguageStats>,
    pub scanner_targets: ScannerTargets,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_round_trips_through_serde() {
        let json = serde_json::to_string(&Language::CHeader).unwrap();
        assert_eq!(json, "\"c_header\"");
        let back: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Language::CHeader);
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&FileCategory::DependencyManifest).unwrap();
        assert_eq!(json, "\"dependency_manifest\"");
    }
}
