use crate::analyzer::Analyzer;
use crate::rules::match_patterns;
use pqc_scan_core::SastVulnerability;

/// Regex-based analyzer for JavaScript and TypeScript sources.
pub struct JavaScriptAnalyzer;

impl Analyzer for JavaScriptAnalyzer {
    fn analyze(&self, _file_path: &str, source: &str) -> Vec<SastVulnerability> {
        match_patterns("javascript", source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_rsa_and_ec_keypair_generation() {
        let source = r#"const crypto = require('crypto');
const { publicKey } = crypto.generateKeyPairSync('rsa', { modulusLength: 2048 });
const ec = crypto.generateKeyPairSync('ec', { namedCurve: 'P-256' });
"#;
        let vulns = JavaScriptAnalyzer.analyze("app.js", source);
        let rules: Vec<_> = vulns.iter().map(|v| v.rule.as_str()).collect();
        assert!(rules.contains(&"rsa_generation"));
        assert!(rules.contains(&"ecdsa_generation"));
        assert!(rules.contains(&"crypto_require"));
    }

    #[test]
    fn clean_source_has_no_findings() {
        let vulns = JavaScriptAnalyzer.analyze("app.js", "const x = 1;\n");
        assert!(vulns.is_empty());
    }
}
