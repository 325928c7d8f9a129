use crate::analyzer::Analyzer;
use crate::rules::{match_patterns, vulnerable_apis};
use pqc_scan_core::{SastVulnerability, Severity};
use tracing::debug;
use tree_sitter::{Node, Parser};

/// Two-pass Python analyzer: a structural pass over the syntax tree for
/// imports and key-generation calls, then the regex rules over the raw
/// source, dropping regex hits on lines the first pass already flagged.
pub struct PythonAnalyzer;

impl Analyzer for PythonAnalyzer {
    fn analyze(&self, file_path: &str, source: &str) -> Vec<SastVulnerability> {
        let mut vulnerabilities = structural_pass(file_path, source);

        for vuln in match_patterns("python", source) {
            if vulnerabilities.iter().any(|v| v.line == vuln.line) {
                continue;
            }
            vulnerabilities.push(vuln);
        }

        vulnerabilities
    }
}

fn structural_pass(file_path: &str, source: &str) -> Vec<SastVulnerability> {
    let mut parser = Parser::new();
    if parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .is_err()
    {
        return Vec::new();
    }

    let Some(tree) = parser.parse(source, None) else {
        debug!(file = file_path, "structural pass skipped: parse failure");
        return Vec::new();
    };

    let mut visitor = StructuralVisitor {
        source,
        lines: source.lines().collect(),
        vulnerabilities: Vec::new(),
    };
    visitor.visit(tree.root_node());
    visitor.vulnerabilities
}

struct StructuralVisitor<'a> {
    source: &'a str,
    lines: Vec<&'a str>,
    vulnerabilities: Vec<SastVulnerability>,
}

impl<'a> StructuralVisitor<'a> {
    fn visit(&mut self, node: Node) {
        match node.kind() {
            "import_statement" => self.visit_import(node),
            "import_from_statement" => self.visit_import_from(node),
            "call" => self.visit_call(node),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child);
        }
    }

    /// `import a.b.c [as alias]`: flag modules in the vulnerable-API set.
    fn visit_import(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let module = match child.kind() {
                "dotted_name" => self.text(child),
                "aliased_import" => child
                    .child_by_field_name("name")
                    .map(|name| self.text(name))
                    .unwrap_or_default(),
                _ => continue,
            };
            if module.is_empty() {
                continue;
            }
            if vulnerable_apis("python").iter().any(|api| api == &module) {
                let line = child.start_position().row + 1;
                self.flag_import(line, &module);
            }
        }
    }

    /// `from a.b import c`: flag when any vulnerable API is contained in
    /// the joined `a.b.c` path.
    fn visit_import_from(&mut self, node: Node) {
        let Some(module_node) = node.child_by_field_name("module_name") else {
            return;
        };
        let module = self.text(module_node);

        let mut cursor = node.walk();
        for name_node in node.children_by_field_name("name", &mut cursor) {
            let name = match name_node.kind() {
                "aliased_import" => name_node
                    .child_by_field_name("name")
                    .map(|n| self.text(n))
                    .unwrap_or_default(),
                _ => self.text(name_node),
            };
            if name.is_empty() {
                continue;
            }
            let full_import = format!("{}.{}", module, name);
            if vulnerable_apis("python")
                .iter()
                .any(|api| full_import.contains(api.as_str()))
            {
                let line = node.start_position().row + 1;
                self.flag_import(line, &full_import);
            }
        }
    }

    /// `RSA.generate(...)` call shape.
    fn visit_call(&mut self, node: Node) {
        let Some(function) = node.child_by_field_name("function") else {
            return;
        };
        if function.kind() != "attribute" {
            return;
        }
        let receiver = function
            .child_by_field_name("object")
            .filter(|obj| obj.kind() == "identifier")
            .map(|obj| self.text(obj));
        let attribute = function
            .child_by_field_name("attribute")
            .map(|attr| self.text(attr));

        if receiver.as_deref() == Some("RSA") && attribute.as_deref() == Some("generate") {
            let line = node.start_position().row + 1;
            self.vulnerabilities.push(SastVulnerability {
                rule: "rsa_generation".to_string(),
                line,
                code: self.line_text(line),
                severity: Severity::High,
                algorithm: "RSA".to_string(),
                description: "RSA key generation detected - vulnerable to quantum attacks."
                    .to_string(),
                recommendation: "Consider Kyber (KEM) or Dilithium (signatures).".to_string(),
            });
        }
    }

    fn flag_import(&mut self, line: usize, import_path: &str) {
        self.vulnerabilities.push(SastVulnerability {
            rule: "vulnerable_import".to_string(),
            line,
            code: self.line_text(line),
            severity: Severity::Medium,
            algorithm: algorithm_from_import(import_path),
            description: format!("PQC-incompatible library import detected: {}", import_path),
            recommendation: "Review PQC-safe library replacement.".to_string(),
        });
    }

    fn text(&self, node: Node) -> String {
        node.utf8_text(self.source.as_bytes())
            .unwrap_or("")
            .to_string()
    }

    fn line_text(&self, line: usize) -> String {
        self.lines
            .get(line.saturating_sub(1))
            .map(|l| l.trim().to_string())
            .unwrap_or_default()
    }
}

fn algorithm_from_import(import_path: &str) -> String {
    let lower = import_path.to_lowercase();
    if lower.contains("rsa") {
        "RSA".to_string()
    } else if lower.contains("ec") || lower.contains("ecdsa") {
        "ECC/ECDSA".to_string()
    } else {
        "Unknown".to_string()
    }
}
