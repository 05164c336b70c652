//! `--key=value` argument reader
//!
//! Only tokens shaped like `--name=value` are recognized. Everything else is
//! dropped silently so wrapper scripts can pass extra positional noise through.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Flag name holding the OpenAPI document path.
pub const API_DOC_PATH: &str = "apiDocPath";
/// Flag name restricting generation to a single HTTP method.
pub const METHOD: &str = "method";
/// Flag name overriding the configured output directory.
pub const OUTPUT_DIR: &str = "outputDir";
/// Flag name switching to plan-only mode.
pub const DRY_RUN: &str = "dryRun";
/// Flag name selecting the plan output format (`terminal` or `json`).
pub const OUTPUT: &str = "output";

/// Parsed `--key=value` flags. Values are always strings; no key is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    values: BTreeMap<String, String>,
}

/// Read flags from an argument list (program name already stripped).
///
/// The name is split from the value on the first `=` only, so
/// `--filter=a=b` yields `filter -> "a=b"`. Later duplicates win.
pub fn read_args<I, S>(tokens: I) -> Args
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = BTreeMap::new();
    for token in tokens {
        let Some(flag) = token.as_ref().strip_prefix("--") else {
            continue;
        };
        let Some((name, value)) = flag.split_once('=') else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        values.insert(name.to_string(), value.to_string());
    }
    Args { values }
}

impl Args {
    /// Raw lookup by flag name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// `--apiDocPath=`, ignoring empty values.
    #[must_use]
    pub fn api_doc_path(&self) -> Option<PathBuf> {
        self.non_empty(API_DOC_PATH).map(PathBuf::from)
    }

    /// `--method=`, lower-cased.
    #[must_use]
    pub fn method(&self) -> Option<String> {
        self.non_empty(METHOD).map(str::to_ascii_lowercase)
    }

    /// `--outputDir=`
    #[must_use]
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.non_empty(OUTPUT_DIR).map(PathBuf::from)
    }

    /// `--dryRun=true` (also accepts `1` and `yes`).
    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.get(DRY_RUN)
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
    }

    /// `--output=json`
    #[must_use]
    pub fn json_output(&self) -> bool {
        self.get(OUTPUT).is_some_and(|v| v.eq_ignore_ascii_case("json"))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }
}
