use pqc_scan_core::{ConfigFinding, Severity};
use regex::RegexBuilder;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

#[derive(Debug, Deserialize)]
struct RawRule {
    patterns: Vec<String>,
    severity: Severity,
    description: String,
    recommendation: String,
}

pub struct CompiledRule {
    pub patterns: Vec<regex::Regex>,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

static CONFIG_CRYPTO_PATTERNS: LazyLock<BTreeMap<String, CompiledRule>> = LazyLock::new(|| {
    let raw: BTreeMap<String, RawRule> =
        serde_json::from_str(include_str!("../data/config_crypto_patterns.json"))
            .expect("config_crypto_patterns.json is valid");

    raw.into_iter()
        .map(|(rule_id, rule)| {
            let patterns = rule
                .patterns
                .iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .expect("config pattern regex is valid")
                })
                .collect();
            (
                rule_id,
                CompiledRule {
                    patterns,
                    severity: rule.severity,
                    description: rule.description,
                    recommendation: rule.recommendation,
                },
            )
        })
        .collect()
});

/// Case-insensitive rule matching over a configuration file's text, with
/// 1-based line numbers and the exact matched text preserved.
pub fn pattern_match(content: &str) -> Vec<ConfigFinding> {
    let mut findings = Vec::new();
    for (rule_id, rule) in CONFIG_CRYPTO_PATTERNS.iter() {
        for pattern in &rule.patterns {
            for m in pattern.find_iter(content) {
                let line = content[..m.start()].matches('\n').count() + 1;
                findings.push(ConfigFinding {
                    rule: rule_id.clone(),
                    line: Some(line),
                    matched_text: Some(m.as_str().to_string()),
                    severity: rule.severity,
                    description: rule.description.clone(),
                    recommendation: Some(rule.recommendation.clone()),
                    meta: BTreeMap::new(),
                });
            }
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nginx_tls_and_cipher_findings() {
        let content = "ssl_protocols TLSv1 TLSv1.1 TLSv1.2;\nssl_ciphers ECDHE-RSA-AES256-GCM-SHA384;\n";
        let findings = pattern_match(content);
        let rules: Vec<_> = findings.iter().map(|f| f.rule.as_str()).collect();

        assert!(rules.contains(&"outdated_tls"));
        assert!(rules.contains(&"ecdsa_cipher"));
        assert!(rules.contains(&"rsa_cipher"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let findings = pattern_match("ciphers = tls_rsa_with_aes_128\n");
        assert!(findings.iter().any(|f| f.rule == "rsa_cipher"));
    }

    #[test]
    fn weak_ciphers_are_critical() {
        let findings = pattern_match("cipher RC4-SHA\n");
        let weak = findings.iter().find(|f| f.rule == "weak_cipher").unwrap();
        assert_eq!(weak.severity, Severity::Critical);
        assert_eq!(weak.line, Some(1));
    }

    #[test]
    fn clean_config_yields_nothing() {
        assert!(pattern_match("worker_processes 4;\n").is_empty());
    }
}
