use crate::java::JavaAnalyzer;
use crate::javascript::JavaScriptAnalyzer;
use crate::python::PythonAnalyzer;
use pqc_scan_core::{Language, SastVulnerability};
use std::collections::HashMap;

/// A per-language static analyzer over raw source text.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, file_path: &str, source: &str) -> Vec<SastVulnerability>;
}

/// Registry mapping a language to its analyzer. TypeScript shares the
/// JavaScript rules; languages without an entry are skipped by the scanner.
pub struct AnalyzerRegistry {
    analyzers: HashMap<Language, Box<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        let mut analyzers: HashMap<Language, Box<dyn Analyzer>> = HashMap::new();
        analyzers.insert(Language::Python, Box::new(PythonAnalyzer));
        analyzers.insert(Language::JavaScript, Box::new(JavaScriptAnalyzer));
        analyzers.insert(Language::TypeScript, Box::new(JavaScriptAnalyzer));
        analyzers.insert(Language::Java, Box::new(JavaAnalyzer));
        Self { analyzers }
    }

    pub fn get(&self, language: Language) -> Option<&dyn Analyzer> {
        self.analyzers.get(&language).map(|a| a.as_ref())
    }

    pub fn supports(&self, language: Language) -> bool {
        self.analyzers.contains_key(&language)
    }

    pub fn supported_languages(&self) -> Vec<Language> {
        self.analyzers.keys().copied().collect()
    }

    pub fn register(&mut self, language: Language, analyzer: Box<dyn Analyzer>) {
        self.analyzers.insert(language, analyzer);
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
