use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

static VERSION_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(\.\d+){0,3}").expect("version regex is valid"));

/// Lenient dotted numeric version: the leading digit run of whatever string
/// the manifest carried (`^1.2.3`, `2.0.0-rc1`, `v0.17.0` all parse).
/// Comparison pads missing components with zeros, so `1.2` equals `1.2.0`.
#[derive(Debug, Clone)]
pub struct Version(Vec<u64>);

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Version {
    pub fn parse(raw: &str) -> Option<Self> {
        let m = VERSION_RUN.find(raw)?;
        let components = m
            .as_str()
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;
        Some(Self(components))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecifierOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

/// A single version specifier such as `<2.0.0` or `>=1.70`.
#[derive(Debug, Clone)]
pub struct Specifier {
    op: SpecifierOp,
    version: Version,
}

impl Specifier {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (op, rest) = if let Some(rest) = raw.strip_prefix("<=") {
            (SpecifierOp::Le, rest)
        } else if let Some(rest) = raw.strip_prefix(">=") {
            (SpecifierOp::Ge, rest)
        } else if let Some(rest) = raw.strip_prefix("==") {
            (SpecifierOp::Eq, rest)
        } else if let Some(rest) = raw.strip_prefix('<') {
            (SpecifierOp::Lt, rest)
        } else if let Some(rest) = raw.strip_prefix('>') {
            (SpecifierOp::Gt, rest)
        } else {
            return None;
        };
        Some(Self {
            op,
            version: Version::parse(rest)?,
        })
    }

    pub fn contains(&self, version: &Version) -> bool {
        match self.op {
            SpecifierOp::Lt => version < &self.version,
            SpecifierOp::Le => version <= &self.version,
            SpecifierOp::Gt => version > &self.version,
            SpecifierOp::Ge => version >= &self.version,
            SpecifierOp::Eq => version == &self.version,
        }
    }
}

/// Whether a dependency version falls in any of the vulnerable ranges.
///
/// Unknown, empty or unparseable versions count as vulnerable against any
/// non-empty specifier set; a specifier that itself fails to parse also
/// counts as a hit rather than silently excusing the dependency.
pub fn is_version_vulnerable(current: &str, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    if current.is_empty() || current == "unknown" {
        return true;
    }
    let Some(version) = Version::parse(current) else {
        return true;
    };

    patterns.iter().any(|pattern| match Specifier::parse(pattern) {
        Some(spec) => spec.contains(&version),
        None => true,
    })
}
