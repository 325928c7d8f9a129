use crate::analyzer::Analyzer;
use crate::rules::match_patterns;
use pqc_scan_core::SastVulnerability;

/// Regex-based analyzer for Java sources.
pub struct JavaAnalyzer;

impl Analyzer for JavaAnalyzer {
    fn analyze(&self, _file_path: &str, source: &str) -> Vec<SastVulnerability> {
        match_patterns("java", source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_keypair_generator_and_signature() {
        let source = r#"
KeyPairGenerator kpg = KeyPairGenerator.getInstance("EC");
Signature sig = Signature.getInstance("SHA256withECDSA");
"#;
        let vulns = JavaAnalyzer.analyze("Main.java", source);
        assert_eq!(
            vulns.iter().filter(|v| v.rule == "ecdsa_keygen").count(),
            2
        );
    }
}
