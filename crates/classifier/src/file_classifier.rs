use crate::constants::{
    CERTIFICATE_EXTENSIONS, CONFIG_EXTENSIONS, CONFIG_FILE_NAMES, CONFIG_PATH_KEYWORDS,
    CRYPTO_PATH_KEYWORDS, DEPENDENCY_FILES, DOCUMENTATION_EXTENSIONS, SOURCE_CODE_EXTENSIONS,
};
use pqc_scan_core::{FileCategory, FileMetadata};

/// Assigns each file exactly one category, in priority order: dependency
/// manifest, configuration, source code, binary, documentation, unknown.
pub struct FileClassifier;

impl FileClassifier {
    pub fn classify(metadata: &FileMetadata) -> FileCategory {
        let path_lower = metadata.file_path.to_lowercase();
        let ext = metadata.extension.as_str();

        if DEPENDENCY_FILES.contains(&metadata.file_name.as_str()) {
            return FileCategory::DependencyManifest;
        }

        if Self::is_config_file(&path_lower, ext) {
            return FileCategory::Configuration;
        }

        if SOURCE_CODE_EXTENSIONS.contains(&ext) {
            return FileCategory::SourceCode;
        }

        if metadata.is_binary {
            return FileCategory::Binary;
        }

        if DOCUMENTATION_EXTENSIONS.contains(&ext) {
            return FileCategory::Documentation;
        }

        FileCategory::Unknown
    }

    fn is_config_file(path_lower: &str, ext: &str) -> bool {
        if CONFIG_PATH_KEYWORDS.iter().any(|kw| path_lower.contains(kw)) {
            return true;
        }
        if CONFIG_EXTENSIONS.contains(&ext) || CERTIFICATE_EXTENSIONS.contains(&ext) {
            return true;
        }
        let file_name = path_lower.rsplit('/').next().unwrap_or(path_lower);
        CONFIG_FILE_NAMES.contains(&file_name)
    }

    /// Whether a configuration file belongs in the crypto scanner's target
    /// set: certificate extensions or a crypto-related path keyword.
    pub fn is_crypto_related_config(metadata: &FileMetadata) -> bool {
        if CERTIFICATE_EXTENSIONS.contains(&metadata.extension.as_str()) {
            return true;
        }
        let path_lower = metadata.file_path.to_lowercase();
        CRYPTO_PATH_KEYWORDS.iter().any(|kw| path_lower.contains(kw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqc_scan_core::Language;
    use std::path::PathBuf;

    fn metadata(file_path: &str, extension: &str, is_binary: bool) -> FileMetadata {
        let file_name = file_path.rsplit('/').next().unwrap().to_string();
        FileMetadata {
            file_path: file_path.to_string(),
            absolute_path: PathBuf::from(format!("/repo/{}", file_path)),
            file_name,
            extension: extension.to_string(),
            language: Language::Unknown,
            category: FileCategory::Unknown,
            size_bytes: 1,
            line_count: 1,
            encoding: "utf-8".to_string(),
            is_binary,
        }
    }

    #[test]
    fn dependency_manifest_wins_over_source_and_config() {
        let meta = metadata("package.json", ".json", false);
        assert_eq!(FileClassifier::classify(&meta), FileCategory::DependencyManifest);

        let meta = metadata("setup.py", ".py", false);
        assert_eq!(FileClassifier::classify(&meta), FileCategory::DependencyManifest);
    }

    #[test]
    fn config_beats_source_extension() {
        let meta = metadata("config/app.py", ".py", false);
        assert_eq!(FileClassifier::classify(&meta), FileCategory::Configuration);
    }

    #[test]
    fn source_extension_classifies_source() {
        let meta = metadata("src/main.py", ".py", false);
        assert_eq!(FileClassifier::classify(&meta), FileCategory::SourceCode);
    }

    #[test]
    fn binary_and_documentation_and_unknown() {
        assert_eq!(
            FileClassifier::classify(&metadata("blob.bin", ".bin", true)),
            FileCategory::Binary
        );
        assert_eq!(
            FileClassifier::classify(&metadata("README.md", ".md", false)),
            FileCategory::Documentation
        );
        assert_eq!(
            FileClassifier::classify(&metadata("data.dat", ".dat", false)),
            FileCategory::Unknown
        );
    }

    #[test]
    fn dockerfile_is_configuration() {
        let meta = metadata("Dockerfile", "", false);
        assert_eq!(FileClassifier::classify(&meta), FileCategory::Configuration);
    }

    #[test]
    fn crypto_related_configs_are_selected() {
        assert!(FileClassifier::is_crypto_related_config(&metadata(
            "certs/server.pem",
            ".pem",
            false
        )));
        assert!(FileClassifier::is_crypto_related_config(&metadata(
            "nginx/nginx.conf",
            ".conf",
            false
        )));
        assert!(!FileClassifier::is_crypto_related_config(&metadata(
            "settings/app.ini",
            ".ini",
            false
        )));
    }
}
