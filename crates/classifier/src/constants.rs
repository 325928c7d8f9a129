use pqc_scan_core::Language;

/// Extension → language mapping. Extensions carry the leading dot and are
/// matched lower-cased.
pub fn language_for_extension(ext: &str) -> Language {
    match ext {
        ".py" | ".pyw" | ".pyi" => Language::Python,
        ".js" | ".jsx" | ".mjs" => Language::JavaScript,
        ".ts" | ".tsx" => Language::TypeScript,
        ".java" => Language::Java,
        ".go" => Language::Go,
        ".c" => Language::C,
        ".cpp" | ".cc" | ".cxx" => Language::Cpp,
        ".h" => Language::CHeader,
        ".hpp" => Language::CppHeader,
        ".cs" => Language::CSharp,
        ".rb" => Language::Ruby,
        ".php" => Language::Php,
        ".rs" => Language::Rust,
        ".kt" | ".kts" => Language::Kotlin,
        ".swift" => Language::Swift,
        ".sh" | ".bash" => Language::Shell,
        ".yml" | ".yaml" => Language::Yaml,
        ".json" => Language::Json,
        ".xml" => Language::Xml,
        ".toml" => Language::Toml,
        ".ini" => Language::Ini,
        ".conf" | ".config" => Language::Config,
        ".env" => Language::Env,
        ".pem" | ".crt" | ".cer" => Language::Certificate,
        ".key" => Language::PrivateKey,
        _ => Language::Unknown,
    }
}

pub const SOURCE_CODE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".jsx", ".ts", ".tsx", ".java", ".go", ".c", ".cpp", ".cc", ".cxx", ".cs",
    ".rb", ".php", ".rs", ".kt", ".swift",
];

/// Path fragments that mark a file as configuration.
pub const CONFIG_PATH_KEYWORDS: &[&str] = &[
    "config/", "conf/", ".config/", "settings/", "nginx", "apache", "ssl", "tls",
];

pub const CONFIG_EXTENSIONS: &[&str] = &[
    ".yml", ".yaml", ".xml", ".toml", ".ini", ".conf", ".config", ".env",
];

pub const CERTIFICATE_EXTENSIONS: &[&str] = &[".pem", ".crt", ".cer", ".key"];

/// Exact file names classified as configuration regardless of path.
pub const CONFIG_FILE_NAMES: &[&str] =
    &["dockerfile", "docker-compose.yml", "nginx.conf", "apache.conf"];

pub const DOCUMENTATION_EXTENSIONS: &[&str] = &[".md", ".txt", ".rst", ".doc", ".docx"];

pub const DEPENDENCY_FILES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "requirements.txt",
    "Pipfile",
    "Pipfile.lock",
    "setup.py",
    "pyproject.toml",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "go.mod",
    "go.sum",
    "Gemfile",
    "Gemfile.lock",
    "Cargo.toml",
    "Cargo.lock",
];

/// Manifest file name → language override applied to SCA targets.
pub fn manifest_language(file_name: &str) -> Option<Language> {
    let language = match file_name {
        "package.json" | "package-lock.json" | "yarn.lock" => Language::JavaScript,
        "requirements.txt" | "Pipfile" | "Pipfile.lock" | "setup.py" | "pyproject.toml" => {
            Language::Python
        }
        "pom.xml" | "build.gradle" | "build.gradle.kts" => Language::Java,
        "go.mod" | "go.sum" => Language::Go,
        "Gemfile" | "Gemfile.lock" => Language::Ruby,
        "Cargo.toml" | "Cargo.lock" => Language::Rust,
        _ => return None,
    };
    Some(language)
}

/// Keywords marking a configuration file as crypto-related.
pub const CRYPTO_PATH_KEYWORDS: &[&str] =
    &["ssl", "tls", "cert", "key", "crypto", "nginx", "apache"];
