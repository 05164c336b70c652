//! Project configuration for test generation

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::args::Args;
use crate::operation::MethodFilter;

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory generated artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// HTTP methods to generate for (lower-case)
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,

    /// Overrides `servers[0].url` of the document
    #[serde(default)]
    pub host: Option<String>,

    /// How to name artifacts for operations without an `operationId`
    #[serde(default)]
    pub id_strategy: IdStrategy,

    #[serde(default)]
    pub contract: ContractConfig,

    #[serde(default)]
    pub load: LoadConfig,
}

/// Contract-test emitter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,

    /// Path written into the generated `jestOpenAPI(...)` call.
    /// Defaults to the `--apiDocPath` argument.
    #[serde(default)]
    pub api_doc_ref: Option<String>,
}

/// Load-script emitter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,

    /// Output file suffix
    #[serde(default)]
    pub suffix: LoadSuffix,

    /// Custom k6 skeleton replacing the built-in one
    #[serde(default)]
    pub template: Option<PathBuf>,
}

/// File suffix for generated load scripts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadSuffix {
    /// `<id>.js`
    #[default]
    #[serde(rename = "js")]
    Js,
    /// `<id>.performance.js`
    #[serde(rename = "performance.js")]
    PerformanceJs,
}

impl LoadSuffix {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::PerformanceJs => "performance.js",
        }
    }
}

/// Naming policy for operations with an empty or missing `operationId`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Derive a stem from method and path, e.g. `get_widgets_id`
    #[default]
    Synthesize,
    /// Skip the operation with a warning
    Require,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_methods() -> Vec<String> {
    MethodFilter::DEFAULT_METHODS
        .iter()
        .map(|m| (*m).to_string())
        .collect()
}

const fn enabled() -> bool {
    true
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_doc_ref: None,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            suffix: LoadSuffix::default(),
            template: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            methods: default_methods(),
            host: None,
            id_strategy: IdStrategy::default(),
            contract: ContractConfig::default(),
            load: LoadConfig::default(),
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Load from the first default location that exists, or defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_default_in(Path::new("."))
    }

    /// Same as [`Config::load_default`] but relative to `dir`.
    pub fn load_default_in(dir: &Path) -> Result<Self, ConfigError> {
        for name in Self::CANDIDATES {
            let path = dir.join(name);
            if path.exists() {
                tracing::debug!(config = %path.display(), "loading config");
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// File names probed by [`Config::load_default`], in order.
    pub const CANDIDATES: [&'static str; 3] = [".oatgen.toml", ".oatgen.json", "oatgen.toml"];

    /// Apply command-line overrides (`--method=`, `--outputDir=`).
    #[must_use]
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(method) = args.method() {
            self.methods = vec![method];
        }
        if let Some(dir) = args.output_dir() {
            self.output_dir = dir;
        }
        self
    }

    /// Method filter built from `methods`.
    #[must_use]
    pub fn method_filter(&self) -> MethodFilter {
        MethodFilter::new(self.methods.iter().map(String::as_str))
    }

    /// Create example config file
    pub fn example() -> &'static str {
        r#"# oatgen configuration

# Where generated files are written (relative to the invocation directory)
output_dir = "."

# Methods to generate for; --method=<m> narrows this to one
methods = ["get", "post", "put", "delete"]

# Override servers[0].url from the document
# host = "https://api.example.com"

# Operations without an operationId: "synthesize" (get_widgets_id) or "require" (skip)
id_strategy = "synthesize"

[contract]
enabled = true
# Path baked into jestOpenAPI(path.resolve(__dirname, ...)); defaults to --apiDocPath
# api_doc_ref = "../openapi.yaml"

[load]
enabled = true
# "js" -> <id>.js, "performance.js" -> <id>.performance.js
suffix = "js"
# Custom k6 skeleton using $RESPONSES, $TRENDS, $THRESHOLDS, $CASE, $PATH,
# $DISCRETE_DATA, $DIVERSE_DATA, $PARAMS, $METHOD, $HOST
# template = "templates/discretePerformanceTest.js"
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}
