use pqc_scan_core::{Result, ScanError};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

/// One declared dependency from a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub version: String,
    pub dep_type: String,
}

impl Dependency {
    fn runtime(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dep_type: "runtime".to_string(),
        }
    }
}

/// A parser for one manifest format.
pub trait ManifestParser: Send + Sync {
    fn parse(&self, path: &Path) -> Result<Vec<Dependency>>;
}

/// Parser for the manifest file name, if the format is supported.
pub fn parser_for(file_name: &str) -> Option<&'static dyn ManifestParser> {
    static NPM: NpmParser = NpmParser;
    static PIP: PipParser = PipParser;
    static MAVEN: MavenParser = MavenParser;
    static GOMOD: GoModParser = GoModParser;

    match file_name {
        "package.json" => Some(&NPM),
        "requirements.txt" => Some(&PIP),
        "pom.xml" => Some(&MAVEN),
        "go.mod" => Some(&GOMOD),
        _ => None,
    }
}

/// `package.json`: runtime and dev dependency maps.
pub struct NpmParser;

#[derive(Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,
}

impl ManifestParser for NpmParser {
    fn parse(&self, path: &Path) -> Result<Vec<Dependency>> {
        let content = std::fs::read_to_string(path)?;
        let manifest: PackageJson = serde_json::from_str(&content)?;

        let mut dependencies = Vec::new();
        for (name, version) in manifest.dependencies {
            dependencies.push(Dependency::runtime(name, version));
        }
        for (name, version) in manifest.dev_dependencies {
            dependencies.push(Dependency {
                name,
                version,
                dep_type: "dev".to_string(),
            });
        }
        Ok(dependencies)
    }
}

static REQUIREMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9\-_]+)(==|>=|<=|~=|>|<)?(.+)?").expect("requirement regex is valid")
});

/// `requirements.txt`: one requirement per line, comments skipped.
pub struct PipParser;

impl ManifestParser for PipParser {
    fn parse(&self, path: &Path) -> Result<Vec<Dependency>> {
        let content = std::fs::read_to_string(path)?;

        let mut dependencies = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(caps) = REQUIREMENT_LINE.captures(line) {
                let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let version = caps
                    .get(3)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                dependencies.push(Dependency::runtime(name, version));
            }
        }
        Ok(dependencies)
    }
}

/// `pom.xml`: `<dependency>` elements bound to the Maven POM namespace,
/// keyed as `groupId.artifactId`. Documents that do not declare that
/// namespace yield no dependencies.
pub struct MavenParser;

const MAVEN_POM_NAMESPACE: &[u8] = b"http://maven.apache.org/POM/4.0.0";

fn is_pom_namespace(resolution: &ResolveResult) -> bool {
    matches!(resolution, ResolveResult::Bound(Namespace(ns)) if *ns == MAVEN_POM_NAMESPACE)
}

impl ManifestParser for MavenParser {
    fn parse(&self, path: &Path) -> Result<Vec<Dependency>> {
        let content = std::fs::read_to_string(path)?;
        let mut reader = NsReader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut dependencies = Vec::new();
        let mut in_dependency = false;
        // Depth below <dependency>; coordinates are read from direct
        // children only, so <exclusions> blocks cannot clobber them.
        let mut depth = 0usize;
        let mut current_element = String::new();
        let mut group_id = None;
        let mut artifact_id = None;
        let mut version = None;

        loop {
            match reader.read_resolved_event() {
                Ok((resolution, Event::Start(e))) => {
                    let local = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    let in_pom_ns = is_pom_namespace(&resolution);
                    if !in_dependency && in_pom_ns && local == "dependency" {
                        in_dependency = true;
                        depth = 0;
                        group_id = None;
                        artifact_id = None;
                        version = None;
                    } else if in_dependency {
                        depth += 1;
                        current_element = if depth == 1 && in_pom_ns {
                            local
                        } else {
                            String::new()
                        };
                    }
                }
                Ok((_, Event::Text(t))) if in_dependency && depth == 1 => {
                    let text = t.unescape().unwrap_or_default().to_string();
                    match current_element.as_str() {
                        "groupId" => group_id = Some(text),
                        "artifactId" => artifact_id = Some(text),
                        "version" => version = Some(text),
                        _ => {}
                    }
                }
                Ok((resolution, Event::End(e))) => {
                    let local = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    if in_dependency
                        && depth == 0
                        && is_pom_namespace(&resolution)
                        && local == "dependency"
                    {
                        in_dependency = false;
                        if let (Some(group), Some(artifact)) = (group_id.take(), artifact_id.take())
                        {
                            dependencies.push(Dependency::runtime(
                                format!("{}.{}", group, artifact),
                                version.take().unwrap_or_else(|| "unknown".to_string()),
                            ));
                        }
                    } else if in_dependency {
                        depth = depth.saturating_sub(1);
                        current_element.clear();
                    }
                }
                Ok((_, Event::Eof)) => break,
                Err(e) => {
                    return Err(ScanError::Parser {
                        message: format!("pom.xml parse error: {}", e),
                    });
                }
                _ => {}
            }
        }
        Ok(dependencies)
    }
}

/// `go.mod`: lines inside a `require ( ... )` block.
pub struct GoModParser;

impl ManifestParser for GoModParser {
    fn parse(&self, path: &Path) -> Result<Vec<Dependency>> {
        let content = std::fs::read_to_string(path)?;

        let mut dependencies = Vec::new();
        let mut in_require_block = false;
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with("require (") {
                in_require_block = true;
                continue;
            }
            if in_require_block {
                if line == ")" {
                    in_require_block = false;
                    continue;
                }
                let mut parts = line.split_whitespace();
                if let (Some(name), Some(version)) = (parts.next(), parts.next()) {
                    dependencies.push(Dependency::runtime(name, version));
                }
            }
        }
        Ok(dependencies)
    }
}
