//! Operation model extracted from `paths`

use serde_json::Value;

use crate::config::IdStrategy;
use crate::document::LoadError;

/// Methods that may appear as keys of an OpenAPI path item.
const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Set of HTTP methods generation is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodFilter {
    methods: Vec<String>,
}

impl MethodFilter {
    /// Methods selected when neither config nor `--method=` say otherwise.
    pub const DEFAULT_METHODS: &'static [&'static str] = &["get", "post", "put", "delete"];

    pub fn new<'a>(methods: impl IntoIterator<Item = &'a str>) -> Self {
        let methods = methods
            .into_iter()
            .map(str::to_ascii_lowercase)
            .inspect(|m| {
                if !Self::is_http_method(m) {
                    tracing::warn!(method = %m, "not an OpenAPI HTTP method; nothing will match it");
                }
            })
            .collect();
        Self { methods }
    }

    #[must_use]
    pub fn allows(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }

    #[must_use]
    pub fn is_http_method(key: &str) -> bool {
        HTTP_METHODS.contains(&key)
    }
}

impl Default for MethodFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_METHODS.iter().copied())
    }
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
}

impl ParamLocation {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            _ => None,
        }
    }
}

/// Path or query parameter of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub location: ParamLocation,
}

/// One HTTP method bound to a path.
#[derive(Debug, Clone)]
pub struct Operation {
    pub path: String,
    /// Lower-case, as written in the document
    pub method: String,
    pub operation_id: Option<String>,
    /// Path and query parameters in document order (path-item level first)
    pub parameters: Vec<Parameter>,
    /// Response code (or `default`) to response definition, in document order
    pub responses: Vec<(String, Value)>,
}

impl Operation {
    /// Build from a raw operation object. `shared` is the path item's
    /// `parameters`, which an operation-level `(name, in)` match overrides.
    pub fn from_value(path: &str, method: &str, raw: &Value, shared: Option<&Value>) -> Self {
        let own = parse_parameters(raw.get("parameters"));
        let mut parameters: Vec<Parameter> = parse_parameters(shared)
            .into_iter()
            .filter(|p| !own.contains(p))
            .collect();
        parameters.extend(own);

        let responses = raw
            .get("responses")
            .and_then(Value::as_object)
            .map(|r| r.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let operation_id = raw
            .get("operationId")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            path: path.to_string(),
            method: method.to_ascii_lowercase(),
            operation_id,
            parameters,
            responses,
        }
    }

    /// `"GET /widgets/{id}"`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method.to_uppercase(), self.path)
    }

    /// `operationId`, or the empty string when absent.
    pub fn id_or_empty(&self) -> &str {
        self.operation_id.as_deref().unwrap_or("")
    }

    pub fn path_params(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParamLocation::Path)
    }

    pub fn query_params(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParamLocation::Query)
    }

    /// Response entries except `default`, in document order.
    pub fn status_responses(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.responses
            .iter()
            .filter(|(code, _)| code != "default")
            .map(|(code, resp)| (code.as_str(), resp))
    }

    /// Response keys except `default`.
    #[must_use]
    pub fn status_codes(&self) -> Vec<&str> {
        self.status_responses().map(|(code, _)| code).collect()
    }

    /// Response keys that are concrete HTTP status codes (`2XX` and
    /// `default` are left out).
    #[must_use]
    pub fn numeric_status_codes(&self) -> Vec<u16> {
        self.responses
            .iter()
            .filter_map(|(code, _)| code.parse::<u16>().ok())
            .filter(|c| (100..600).contains(c))
            .collect()
    }

    /// File-name stem for generated artifacts.
    ///
    /// # Errors
    ///
    /// With [`IdStrategy::Require`], a missing or empty `operationId` is an error.
    pub fn artifact_stem(&self, strategy: IdStrategy) -> Result<String, LoadError> {
        match self.operation_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(sanitize_file_stem(id)),
            _ => match strategy {
                IdStrategy::Synthesize => Ok(self.synthesized_id()),
                IdStrategy::Require => Err(LoadError::MissingOperationId(self.label())),
            },
        }
    }

    /// `get /widgets/{id}/parts` → `get_widgets_id_parts`
    #[must_use]
    pub fn synthesized_id(&self) -> String {
        let mut id = self.method.clone();
        for segment in self.path.split('/').filter(|s| !s.is_empty()) {
            let cleaned: String = segment
                .chars()
                .filter(|c| !matches!(c, '{' | '}'))
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            if !cleaned.is_empty() {
                id.push('_');
                id.push_str(&cleaned);
            }
        }
        id
    }
}

fn parse_parameters(raw: Option<&Value>) -> Vec<Parameter> {
    raw.and_then(Value::as_array)
        .map(|params| {
            params
                .iter()
                .filter_map(|p| {
                    let name = p.get("name")?.as_str()?.to_string();
                    let location = ParamLocation::parse(p.get("in")?.as_str()?)?;
                    Some(Parameter { name, location })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Keep ids usable as file names.
fn sanitize_file_stem(id: &str) -> String {
    id.chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect()
}
