//! Generation plan
//!
//! Describes what would be written without touching the filesystem. The
//! emitters consume the same plan, so a dry run and a real run agree on
//! file names and resolved schemas.

use std::collections::HashSet;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::Serialize;

use crate::config::{Config, LoadSuffix};
use crate::document::{Document, LoadError};
use crate::operation::Operation;
use crate::resolve::{self, SchemaRef};

// ── Plan types ──

/// Complete plan: host, per-operation artifacts, skipped operations.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Plan {
    /// Server host used in generated requests
    pub host: String,
    /// Operations that will produce artifacts, in document order
    pub operations: Vec<PlannedOperation>,
    /// Operations left out, with the reason
    pub skipped: Vec<SkippedOperation>,
}

/// Everything generated for one operation.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlannedOperation {
    /// Operation label, e.g. "GET /widgets/{id}"
    pub label: String,
    /// `operationId` as written in the document (empty when absent)
    pub operation_id: String,
    /// File-name stem shared by this operation's artifacts
    pub stem: String,
    /// Files to be written
    pub artifacts: Vec<Artifact>,
    /// Non-default response codes with their resolved schemas
    pub responses: Vec<PlannedResponse>,
    #[serde(skip)]
    #[schemars(skip)]
    pub operation: Operation,
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

/// Which emitter produces an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// `<stem>.contract.spec.ts`
    Contract,
    /// `<stem>.js` / `<stem>.performance.js`
    Load,
}

impl ArtifactKind {
    #[must_use]
    pub fn file_name(self, stem: &str, suffix: LoadSuffix) -> String {
        match self {
            Self::Contract => format!("{stem}.contract.spec.ts"),
            Self::Load => format!("{stem}.{}", suffix.as_str()),
        }
    }
}

/// A response code and, when contract tests are enabled, its schema.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlannedResponse {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
}

/// An operation that produces nothing.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SkippedOperation {
    pub label: String,
    pub reason: String,
}

impl Plan {
    /// Build the plan for `doc` under `config`.
    ///
    /// # Errors
    ///
    /// Fails only when no host can be determined.
    pub fn build(doc: &Document, config: &Config) -> Result<Self, LoadError> {
        let host = match &config.host {
            Some(host) => host.clone(),
            None => doc.host()?.to_string(),
        };

        let kinds: Vec<ArtifactKind> = [
            (ArtifactKind::Contract, config.contract.enabled),
            (ArtifactKind::Load, config.load.enabled),
        ]
        .into_iter()
        .filter_map(|(kind, on)| on.then_some(kind))
        .collect();

        let mut operations = Vec::new();
        let mut skipped = Vec::new();
        let mut taken_stems: HashSet<String> = HashSet::new();

        for operation in doc.operations(&config.method_filter()) {
            let label = operation.label();
            let stem = match operation.artifact_stem(config.id_strategy) {
                Ok(stem) => stem,
                Err(e) => {
                    tracing::warn!(operation = %label, error = %e, "skipping operation");
                    skipped.push(SkippedOperation {
                        label,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let stem = dedupe_stem(stem, &mut taken_stems, &label);

            let artifacts = kinds
                .iter()
                .map(|&kind| Artifact {
                    kind,
                    path: config
                        .output_dir
                        .join(kind.file_name(&stem, config.load.suffix)),
                })
                .collect();

            let responses = operation
                .status_responses()
                .map(|(code, response)| PlannedResponse {
                    code: code.to_string(),
                    description: resolve::describe(response, doc).map(str::to_string),
                    schema: config
                        .contract
                        .enabled
                        .then(|| resolve::resolve(response, doc)),
                })
                .collect();

            operations.push(PlannedOperation {
                label,
                operation_id: operation.id_or_empty().to_string(),
                stem,
                artifacts,
                responses,
                operation,
            });
        }

        Ok(Self {
            host,
            operations,
            skipped,
        })
    }

    /// Number of files a real run would write.
    #[must_use]
    pub fn artifact_count(&self) -> usize {
        self.operations.iter().map(|o| o.artifacts.len()).sum()
    }

    /// Format as human-readable terminal output.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Dry run: {} operations, {} files planned (host {})\n",
            self.operations.len(),
            self.artifact_count(),
            self.host,
        ));

        for op in &self.operations {
            lines.push(format!("{}:", op.label));
            for artifact in &op.artifacts {
                lines.push(format!("  -> {}", artifact.path.display()));
            }
            for response in &op.responses {
                match &response.schema {
                    Some(schema) => lines.push(format!(
                        "  {} [{}] {}",
                        response.code, schema.kind, schema.name
                    )),
                    None => lines.push(format!("  {}", response.code)),
                }
            }
            lines.push(String::new());
        }

        for skip in &self.skipped {
            lines.push(format!("Skipped {}: {}", skip.label, skip.reason));
        }

        lines.join("\n")
    }
}

/// Append `-2`, `-3`, ... to stems already taken by an earlier operation,
/// skipping suffixes that are themselves taken.
fn dedupe_stem(stem: String, taken: &mut HashSet<String>, label: &str) -> String {
    if taken.insert(stem.clone()) {
        return stem;
    }
    let renamed = (2u32..)
        .map(|n| format!("{stem}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_default();
    tracing::warn!(operation = %label, stem = %stem, renamed = %renamed, "artifact name collision");
    taken.insert(renamed.clone());
    renamed
}

/// JSON Schema for the `--output=json` plan format.
#[must_use]
pub fn plan_schema() -> String {
    let schema = schemars::schema_for!(Plan);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdStrategy;
    use crate::resolve::SchemaKind;

    const DOC: &str = r##"
servers:
  - url: http://localhost:8080
paths:
  /widgets:
    get:
      operationId: listWidgets
      responses:
        "200":
          $ref: "#/components/responses/WidgetList"
        default:
          description: error
    post:
      responses:
        "201":
          description: created
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Widget"
  /widgets/{id}:
    get:
      operationId: listWidgets
      responses:
        "200":
          description: ok
components:
  responses:
    WidgetList:
      description: widgets
      content:
        application/json:
          schema:
            type: array
            items:
              $ref: "#/components/schemas/Widget"
"##;

    fn doc() -> Document {
        Document::from_yaml_str(DOC).unwrap()
    }

    #[test]
    fn plans_artifacts_per_operation() {
        let plan = Plan::build(&doc(), &Config::default()).unwrap();
        assert_eq!(plan.host, "http://localhost:8080");
        assert_eq!(plan.operations.len(), 3);
        assert_eq!(plan.artifact_count(), 6);

        let first = &plan.operations[0];
        assert_eq!(first.stem, "listWidgets");
        assert_eq!(
            first.artifacts[0].path,
            PathBuf::from("./listWidgets.contract.spec.ts")
        );
        assert_eq!(first.artifacts[1].path, PathBuf::from("./listWidgets.js"));
    }

    #[test]
    fn default_response_is_not_planned() {
        let plan = Plan::build(&doc(), &Config::default()).unwrap();
        let codes: Vec<&str> = plan.operations[0]
            .responses
            .iter()
            .map(|r| r.code.as_str())
            .collect();
        assert_eq!(codes, vec!["200"]);
        let schema = plan.operations[0].responses[0].schema.as_ref().unwrap();
        assert_eq!(schema.kind, SchemaKind::Array);
        assert_eq!(schema.name, "Widget");
        assert_eq!(
            plan.operations[0].responses[0].description.as_deref(),
            Some("widgets")
        );
    }

    #[test]
    fn missing_id_is_synthesized() {
        let plan = Plan::build(&doc(), &Config::default()).unwrap();
        assert_eq!(plan.operations[1].stem, "post_widgets");
        assert_eq!(plan.operations[1].operation_id, "");
    }

    #[test]
    fn missing_id_is_skipped_when_required() {
        let config = Config {
            id_strategy: IdStrategy::Require,
            ..Config::default()
        };
        let plan = Plan::build(&doc(), &config).unwrap();
        assert_eq!(plan.operations.len(), 2);
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].label, "POST /widgets");
    }

    #[test]
    fn duplicate_ids_get_distinct_stems() {
        let plan = Plan::build(&doc(), &Config::default()).unwrap();
        assert_eq!(plan.operations[0].stem, "listWidgets");
        assert_eq!(plan.operations[2].stem, "listWidgets-2");
    }

    #[test]
    fn renamed_stem_skips_names_taken_earlier() {
        let doc = Document::from_yaml_str(
            r#"
servers:
  - url: http://localhost:8080
paths:
  /a:
    get:
      operationId: x
      responses: {}
  /b:
    get:
      operationId: x-2
      responses: {}
  /c:
    get:
      operationId: x
      responses: {}
"#,
        )
        .unwrap();
        let plan = Plan::build(&doc, &Config::default()).unwrap();
        let stems: Vec<&str> = plan.operations.iter().map(|o| o.stem.as_str()).collect();
        assert_eq!(stems, vec!["x", "x-2", "x-3"]);

        let paths: HashSet<&PathBuf> = plan
            .operations
            .iter()
            .flat_map(|o| o.artifacts.iter().map(|a| &a.path))
            .collect();
        assert_eq!(paths.len(), plan.artifact_count());
    }

    #[test]
    fn disabled_emitters_plan_no_files() {
        let mut config = Config::default();
        config.contract.enabled = false;
        config.load.suffix = LoadSuffix::PerformanceJs;
        let plan = Plan::build(&doc(), &config).unwrap();
        let op = &plan.operations[0];
        assert_eq!(op.artifacts.len(), 1);
        assert_eq!(op.artifacts[0].kind, ArtifactKind::Load);
        assert_eq!(
            op.artifacts[0].path,
            PathBuf::from("./listWidgets.performance.js")
        );
        assert!(op.responses[0].schema.is_none());
    }

    #[test]
    fn host_override_wins() {
        let config = Config {
            host: Some("https://staging.example.com".into()),
            ..Config::default()
        };
        let plan = Plan::build(&Document::from_yaml_str("paths: {}").unwrap(), &config).unwrap();
        assert_eq!(plan.host, "https://staging.example.com");
        assert!(plan.operations.is_empty());
    }

    #[test]
    fn terminal_output() {
        let plan = Plan::build(&doc(), &Config::default()).unwrap();
        let text = plan.to_terminal();
        assert!(text.contains("3 operations, 6 files planned"));
        assert!(text.contains("GET /widgets:"));
        assert!(text.contains("  200 [array] Widget"));
        assert!(text.contains("  201 [ref] Widget"));
    }

    #[test]
    fn plan_serializes_without_operation() {
        let plan = Plan::build(&doc(), &Config::default()).unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json["operations"][0].get("operation").is_none());
        assert_eq!(json["operations"][0]["artifacts"][0]["kind"], "contract");
    }

    #[test]
    fn schema_generation_produces_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(&plan_schema()).unwrap();
        assert_eq!(
            parsed.get("title").and_then(|v| v.as_str()),
            Some("Plan")
        );
    }
}
