use pqc_scan_core::{Language, MatchType, Severity};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// One knowledge-base entry for a vulnerable library.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryRule {
    pub severity: Severity,
    pub reason: String,
    #[serde(default)]
    pub pqc_support: Option<String>,
    #[serde(default)]
    pub pqc_classification: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub all_versions_vulnerable: bool,
    #[serde(default)]
    pub vulnerable_versions: Vec<String>,
}

impl LibraryRule {
    pub fn classification(&self) -> String {
        self.pqc_classification
            .clone()
            .unwrap_or_else(|| "Traditional Crypto Library".to_string())
    }
}

struct IndexEntry {
    key: String,
    norm_key: String,
    rule: LibraryRule,
}

static LIBRARY_INDEX: LazyLock<BTreeMap<String, Vec<IndexEntry>>> = LazyLock::new(|| {
    let raw: BTreeMap<String, BTreeMap<String, LibraryRule>> =
        serde_json::from_str(include_str!("../data/pqc_vulnerable_libraries.json"))
            .expect("pqc_vulnerable_libraries.json is valid");

    raw.into_iter()
        .map(|(language, entries)| {
            let index = entries
                .into_iter()
                .map(|(key, rule)| IndexEntry {
                    norm_key: normalize_dependency_name(&key),
                    key,
                    rule,
                })
                .collect();
            (language, index)
        })
        .collect()
});

/// Knowledge-base language key for an SCA target's language.
pub fn knowledge_base_key(language: Language) -> &'static str {
    match language {
        // TypeScript manifests share the npm ecosystem.
        Language::TypeScript => "javascript",
        other => other.as_str(),
    }
}

/// Normalize a dependency name for matching: lowercase, strip an npm scope,
/// collapse non-alphanumerics to `-`, strip common ecosystem prefixes.
pub fn normalize_dependency_name(name: &str) -> String {
    let mut raw = name.trim().to_lowercase();
    if raw.starts_with('@') {
        if let Some((_, rest)) = raw.split_once('/') {
            raw = rest.to_string();
        }
    }
    raw = raw.replace('\\', "/");

    let mut collapsed = String::with_capacity(raw.len());
    let mut last_dash = true;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            collapsed.push(c);
            last_dash = false;
        } else if !last_dash {
            collapsed.push('-');
            last_dash = true;
        }
    }
    let mut result = collapsed.trim_matches('-').to_string();

    for prefix in ["python", "py", "node", "js", "java", "lib"] {
        let prefixed = format!("{}-", prefix);
        if let Some(rest) = result.strip_prefix(&prefixed) {
            result = rest.to_string();
        }
    }
    result
}

/// A successful knowledge-base lookup, before version filtering.
pub struct LibraryMatch {
    pub rule_id: String,
    pub matched_name: String,
    pub match_type: MatchType,
    pub rule: &'static LibraryRule,
}

/// Three-stage lookup: exact normalized match, case-insensitive raw match,
/// then bidirectional substring with both sides at least four characters.
pub fn lookup(language: Language, dependency_name: &str) -> Option<LibraryMatch> {
    let entries = LIBRARY_INDEX.get(knowledge_base_key(language))?;
    let dep_norm = normalize_dependency_name(dependency_name);

    for entry in entries {
        if entry.norm_key == dep_norm {
            return Some(found(entry, MatchType::Exact));
        }
    }

    let dep_lower = dependency_name.to_lowercase();
    for entry in entries {
        if entry.key.to_lowercase() == dep_lower {
            return Some(found(entry, MatchType::Exact));
        }
    }

    for entry in entries {
        if is_partial_match(&dep_norm, &entry.norm_key) {
            return Some(found(entry, MatchType::Partial));
        }
    }

    None
}

fn found(entry: &'static IndexEntry, match_type: MatchType) -> LibraryMatch {
    LibraryMatch {
        rule_id: entry.norm_key.clone(),
        matched_name: entry.key.clone(),
        match_type,
        rule: &entry.rule,
    }
}

fn is_partial_match(dep_norm: &str, vuln_norm: &str) -> bool {
    if dep_norm.is_empty() || vuln_norm.is_empty() {
        return false;
    }
    if dep_norm == vuln_norm {
        return true;
    }
    if dep_norm.len() < 4 || vuln_norm.len() < 4 {
        return false;
    }
    dep_norm.contains(vuln_norm) || vuln_norm.contains(dep_norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_scope_prefix_and_punctuation() {
        assert_eq!(normalize_dependency_name("@scope/Node-RSA"), "rsa");
        assert_eq!(normalize_dependency_name("python-rsa"), "rsa");
        assert_eq!(normalize_dependency_name("PyCrypto"), "pycrypto");
        assert_eq!(normalize_dependency_name("py-crypto"), "crypto");
        assert_eq!(normalize_dependency_name("lib_sodium"), "sodium");
        assert_eq!(normalize_dependency_name("cryptography"), "cryptography");
    }

    #[test]
    fn exact_normalized_match_wins() {
        let m = lookup(Language::Python, "python-rsa").unwrap();
        assert_eq!(m.matched_name, "rsa");
        assert_eq!(m.match_type, MatchType::Exact);
    }

    #[test]
    fn raw_case_insensitive_match() {
        let m = lookup(Language::Python, "ECDSA").unwrap();
        assert_eq!(m.matched_name, "ecdsa");
        assert_eq!(m.match_type, MatchType::Exact);
    }

    #[test]
    fn partial_match_requires_four_characters() {
        let m = lookup(Language::JavaScript, "jsrsasign-util").unwrap();
        assert_eq!(m.matched_name, "jsrsasign");
        assert_eq!(m.match_type, MatchType::Partial);

        assert!(lookup(Language::JavaScript, "rc4").is_none());
    }

    #[test]
    fn unrelated_names_do_not_match() {
        assert!(lookup(Language::Python, "requests").is_none());
        assert!(lookup(Language::JavaScript, "left-pad").is_none());
    }

    #[test]
    fn typescript_uses_javascript_knowledge_base() {
        assert!(lookup(Language::TypeScript, "node-rsa").is_some());
    }

    #[test]
    fn classification_defaults() {
        let m = lookup(Language::Python, "pycrypto").unwrap();
        assert_eq!(m.rule.classification(), "Traditional Crypto Library");
    }
}
