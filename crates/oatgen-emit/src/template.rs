//! Placeholder templates
//!
//! A template is plain text with `$NAME` placeholders (`$` followed by an
//! upper-case identifier). JavaScript `${...}` interpolations never match.
//! Rendering is a single pass, so substituted text is not rescanned.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Z][A-Z_]*)").expect("placeholder pattern is valid"));

/// Built-in k6 skeleton.
pub const LOAD_SKELETON: &str = include_str!("../templates/discretePerformanceTest.js");

/// Placeholder name → rendered text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` (without the `$`).
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Text with `$NAME` placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    source: Cow<'static, str>,
}

impl Template {
    #[must_use]
    pub fn new(source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The compiled-in load-test skeleton.
    #[must_use]
    pub fn load_skeleton() -> Self {
        Self::new(LOAD_SKELETON)
    }

    /// Read a skeleton from disk.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| TemplateError::Io(path.display().to_string(), e.to_string()))?;
        Ok(Self::new(source))
    }

    /// Distinct placeholder names in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.source) {
            let name = &caps[1];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Substitute every placeholder, then collapse the first run of three
    /// newlines (the gap an empty `$TRENDS` leaves in the skeleton).
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Unbound`] for the first placeholder with no binding.
    pub fn render(&self, bindings: &Bindings) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .placeholders()
            .into_iter()
            .find(|name| bindings.get(name).is_none())
        {
            return Err(TemplateError::Unbound(missing));
        }

        let rendered = PLACEHOLDER.replace_all(&self.source, |caps: &Captures| {
            bindings.get(&caps[1]).unwrap_or_default().to_string()
        });
        Ok(rendered.replacen("\n\n\n", "\n", 1))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("placeholder ${0} has no binding")]
    Unbound(String),
    #[error("Cannot read template {0}: {1}")]
    Io(String, String),
}
