use pqc_scan_core::{SastVulnerability, Severity};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// One rule of the crypto-pattern knowledge base, as shipped in
/// `data/crypto_patterns.json`.
#[derive(Debug, Deserialize)]
struct RawRule {
    patterns: Vec<String>,
    severity: Severity,
    algorithm: String,
    description: String,
    recommendation: String,
}

/// A rule with its patterns compiled once per process.
pub struct CompiledRule {
    pub patterns: Vec<Regex>,
    pub severity: Severity,
    pub algorithm: String,
    pub description: String,
    pub recommendation: String,
}

pub type RuleSet = BTreeMap<String, CompiledRule>;

static CRYPTO_PATTERNS: LazyLock<BTreeMap<String, RuleSet>> = LazyLock::new(|| {
    let raw: BTreeMap<String, BTreeMap<String, RawRule>> =
        serde_json::from_str(include_str!("../data/crypto_patterns.json"))
            .expect("crypto_patterns.json is valid");

    raw.into_iter()
        .map(|(language, rules)| {
            let compiled = rules
                .into_iter()
                .map(|(rule_id, rule)| {
                    let patterns = rule
                        .patterns
                        .iter()
                        .map(|p| Regex::new(p).expect("crypto pattern regex is valid"))
                        .collect();
                    (
                        rule_id,
                        CompiledRule {
                            patterns,
                            severity: rule.severity,
                            algorithm: rule.algorithm,
                            description: rule.description,
                            recommendation: rule.recommendation,
                        },
                    )
                })
                .collect();
            (language, compiled)
        })
        .collect()
});

static VULNERABLE_APIS: LazyLock<BTreeMap<String, Vec<String>>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../data/vulnerable_apis.json"))
        .expect("vulnerable_apis.json is valid")
});

/// Rule set for a language key, e.g. `"python"`.
pub fn rules_for(language_key: &str) -> Option<&'static RuleSet> {
    CRYPTO_PATTERNS.get(language_key)
}

/// Known-vulnerable API identifiers for a language key.
pub fn vulnerable_apis(language_key: &str) -> &'static [String] {
    VULNERABLE_APIS
        .get(language_key)
        .map(|apis| apis.as_slice())
        .unwrap_or(&[])
}

/// Apply every pattern of a language's rule set to the raw source and emit
/// one vulnerability per match, with 1-based line numbers derived from the
/// match offset.
pub fn match_patterns(language_key: &str, source: &str) -> Vec<SastVulnerability> {
    let Some(rules) = rules_for(language_key) else {
        return Vec::new();
    };

    let mut vulnerabilities = Vec::new();
    for (rule_id, rule) in rules {
        for pattern in &rule.patterns {
            for m in pattern.find_iter(source) {
                let line = source[..m.start()].matches('\n').count() + 1;
                vulnerabilities.push(SastVulnerability {
                    rule: rule_id.clone(),
                    line,
                    code: m.as_str().to_string(),
                    severity: rule.severity,
                    algorithm: rule.algorithm.clone(),
                    description: rule.description.clone(),
                    recommendation: rule.recommendation.clone(),
                });
            }
        }
    }
    vulnerabilities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knowledge_base_loads_all_languages() {
        for language in ["python", "javascript", "java", "go"] {
            assert!(rules_for(language).is_some(), "missing rules for {}", language);
        }
        assert!(rules_for("cobol").is_none());
    }

    #[test]
    fn vulnerable_api_sets_load() {
        assert!(vulnerable_apis("python").contains(&"Crypto.PublicKey.RSA".to_string()));
        assert!(vulnerable_apis("cobol").is_empty());
    }

    #[test]
    fn match_patterns_reports_line_and_code() {
        let source = "const crypto = require('crypto');\ncrypto.generateKeyPairSync('rsa', {});\n";
        let vulns = match_patterns("javascript", source);

        let rsa = vulns.iter().find(|v| v.rule == "rsa_generation").unwrap();
        assert_eq!(rsa.line, 2);
        assert!(rsa.code.starts_with("generateKeyPairSync"));
        assert_eq!(rsa.severity, Severity::High);

        assert!(vulns.iter().any(|v| v.rule == "crypto_require" && v.line == 1));
    }

    #[test]
    fn java_keygen_matches() {
        let source = "KeyPairGenerator kpg = KeyPairGenerator.getInstance(\"RSA\");";
        let vulns = match_patterns("java", source);
        assert!(vulns.iter().any(|v| v.rule == "rsa_keygen"));
    }
}
