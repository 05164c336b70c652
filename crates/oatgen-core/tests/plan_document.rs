//! Plans built from a document on disk, plus the exported plan schema.
//!
//! Run with: cargo test -p oatgen-core --test plan_document

use std::path::PathBuf;

use oatgen_core::plan::plan_schema;
use oatgen_core::{Config, Document, IdStrategy, LoadError, Plan, SchemaKind};

const DOC: &str = r##"
openapi: 3.0.3
servers:
  - url: https://api.example.com
  - url: https://ignored.example.com
paths:
  /orders:
    parameters:
      - name: tenant
        in: query
    get:
      responses:
        200:
          description: list
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/Order"
    post:
      operationId: createOrder
      responses:
        "201":
          $ref: "#/components/responses/Created"
  /orders/{orderId}:
    delete:
      operationId: createOrder
      parameters:
        - name: orderId
          in: path
      responses:
        "204":
          description: gone
components:
  responses:
    Created:
      description: created order
      content:
        application/json:
          schema:
            $ref: "#/components/schemas/Order"
  schemas:
    Order:
      type: object
"##;

fn write_doc() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openapi.yaml");
    std::fs::write(&path, DOC).unwrap();
    (dir, path)
}

#[test]
fn plan_from_file() {
    let (_dir, path) = write_doc();
    let doc = Document::load(&path).unwrap();
    let plan = Plan::build(&doc, &Config::default()).unwrap();

    assert_eq!(plan.host, "https://api.example.com");
    let stems: Vec<&str> = plan.operations.iter().map(|o| o.stem.as_str()).collect();
    assert_eq!(stems, ["get_orders", "createOrder", "createOrder-2"]);
    assert_eq!(plan.artifact_count(), 6);

    let list = &plan.operations[0];
    assert_eq!(list.operation_id, "");
    assert_eq!(list.responses[0].code, "200");
    // Inline content bodies must be a direct $ref; arrays only resolve via components.
    assert!(list.responses[0].schema.as_ref().unwrap().is_unknown());

    let create = &plan.operations[1];
    assert_eq!(create.responses[0].description.as_deref(), Some("created order"));
    let schema = create.responses[0].schema.as_ref().unwrap();
    assert_eq!((schema.kind, schema.name.as_str()), (SchemaKind::Ref, "Order"));
}

#[test]
fn require_strategy_skips_anonymous_operations() {
    let (_dir, path) = write_doc();
    let doc = Document::load(&path).unwrap();
    let config = Config {
        id_strategy: IdStrategy::Require,
        ..Config::default()
    };
    let plan = Plan::build(&doc, &config).unwrap();

    assert_eq!(plan.operations.len(), 2);
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].label, "GET /orders");
    assert!(plan.to_terminal().contains("Skipped GET /orders"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Document::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::Io(..)));
}

#[test]
fn plan_schema_is_valid_json() {
    let schema = plan_schema();
    let parsed: serde_json::Value = serde_json::from_str(&schema).unwrap();
    assert_eq!(parsed.get("title").and_then(|v| v.as_str()), Some("Plan"));
    assert!(parsed["properties"].get("operations").is_some());
}
