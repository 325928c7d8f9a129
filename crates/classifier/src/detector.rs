use crate::constants::language_for_extension;
use pqc_scan_core::Language;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Detects the language of a file from its extension, falling back to the
/// shebang line for extensionless files.
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn detect(path: &Path) -> Language {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()));

        match extension {
            Some(ext) => language_for_extension(&ext),
            None => Self::detect_by_shebang(path).unwrap_or(Language::Unknown),
        }
    }

    fn detect_by_shebang(path: &Path) -> Option<Language> {
        let file = File::open(path).ok()?;
        let mut first_line = String::new();
        BufReader::new(file).read_line(&mut first_line).ok()?;
        Self::shebang_language(first_line.trim())
    }

    fn shebang_language(first_line: &str) -> Option<Language> {
        if !first_line.starts_with("#!") {
            return None;
        }
        if first_line.contains("python") {
            Some(Language::Python)
        } else if first_line.contains("node") || first_line.contains("javascript") {
            Some(Language::JavaScript)
        } else if first_line.contains("bash") || first_line.contains("sh") {
            Some(Language::Shell)
        } else if first_line.contains("ruby") {
            Some(Language::Ruby)
        } else if first_line.contains("php") {
            Some(Language::Php)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_by_extension() {
        assert_eq!(LanguageDetector::detect(&PathBuf::from("test.py")), Language::Python);
        assert_eq!(LanguageDetector::detect(&PathBuf::from("test.Java")), Language::Java);
        assert_eq!(LanguageDetector::detect(&PathBuf::from("cert.PEM")), Language::Certificate);
    }

    #[test]
    fn detects_by_shebang() {
        assert_eq!(
            LanguageDetector::shebang_language("#!/usr/bin/env python3"),
            Some(Language::Python)
        );
        assert_eq!(
            LanguageDetector::shebang_language("#!/usr/bin/env node"),
            Some(Language::JavaScript)
        );
        assert_eq!(LanguageDetector::shebang_language("#!/bin/bash"), Some(Language::Shell));
        assert_eq!(LanguageDetector::shebang_language("#!/usr/bin/ruby"), Some(Language::Ruby));
        assert_eq!(LanguageDetector::shebang_language("plain text"), None);
    }

    #[test]
    fn extensionless_without_shebang_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LICENSE");
        std::fs::write(&path, "MIT License").unwrap();
        assert_eq!(LanguageDetector::detect(&path), Language::Unknown);
    }

    #[test]
    fn extensionless_with_shebang_detects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy");
        std::fs::write(&path, "#!/usr/bin/env python\nprint('hi')\n").unwrap();
        assert_eq!(LanguageDetector::detect(&path), Language::Python);
    }
}
