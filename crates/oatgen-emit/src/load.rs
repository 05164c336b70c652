//! k6 load-script emitter
//!
//! Fills the skeleton's placeholders from one operation: per-status latency
//! trends, thresholds and dispatch arms, plus randomized path parameters for
//! the `discrete` (valid-looking values) and `diverse` (malformed values)
//! scenarios.

use oatgen_core::plan::PlannedOperation;

use crate::js;
use crate::template::{Bindings, Template, TemplateError};

/// Percentile bounds applied to every status code's trend.
const THRESHOLD_RULES: &str = r#"["p(90)<1000", "p(95)<2000", "p(100)<3000"]"#;

/// Extra values the diverse scenario mixes into each path parameter.
const DIVERSE_EXTRAS: &str = r#"null, undefined, "invalid", 4, 82"#;

/// Indentation of data declarations inside the scenario functions.
const DATA_INDENT: &str = "\n    ";

/// Placeholder bindings for one operation.
#[must_use]
pub fn bindings(planned: &PlannedOperation, host: &str) -> Bindings {
    let op = &planned.operation;
    let codes = op.numeric_status_codes();
    let params: Vec<(String, &str)> = op
        .path_params()
        .map(|p| (js::ident(&p.name), p.name.as_str()))
        .collect();

    let mut b = Bindings::new();
    b.set("RESPONSES", join(&codes, ", ", |c| c.to_string()));
    b.set(
        "TRENDS",
        join(&codes, "\n", |c| {
            format!("const http_req_duration_{c} = new Trend(\"http_req_duration_{c}\", true);")
        }),
    );
    b.set(
        "THRESHOLDS",
        join(&codes, "\n        ", |c| {
            format!("\"http_req_duration_{c}\": {THRESHOLD_RULES},")
        }),
    );
    b.set(
        "CASE",
        join(&codes, "\n    ", |c| {
            format!("case {c}:\n        http_req_duration_{c}.add(result.timings.duration);\n        break;")
        }),
    );
    b.set("PATH", js::interpolate_path(&op.path));
    b.set(
        "DISCRETE_DATA",
        join(&params, DATA_INDENT, |(ident, name)| {
            format!(
                "const {ident} = randomItem([{}, {}]);",
                js::string_literal(&format!("{name}_1")),
                js::string_literal(&format!("{name}_2")),
            )
        }),
    );
    b.set(
        "DIVERSE_DATA",
        join(&params, DATA_INDENT, |(ident, name)| {
            format!(
                "const {ident} = randomItem([{}, {}, {DIVERSE_EXTRAS}]);",
                js::string_literal(&format!("{name}_1")),
                js::string_literal(&format!("{name}_2")),
            )
        }),
    );
    b.set("PARAMS", join(&params, ", ", |(ident, _)| ident.clone()));
    b.set("METHOD", op.method.to_uppercase());
    b.set("HOST", host);
    b
}

/// Render the load script for one operation.
///
/// # Errors
///
/// Fails when `template` uses a placeholder this emitter does not bind.
pub fn render(
    planned: &PlannedOperation,
    host: &str,
    template: &Template,
) -> Result<String, TemplateError> {
    tracing::info!(operation = %planned.label, "generating load script");
    template.render(&bindings(planned, host))
}

fn join<T>(items: &[T], sep: &str, f: impl Fn(&T) -> String) -> String {
    items.iter().map(f).collect::<Vec<_>>().join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oatgen_core::{Config, Document, Plan};

    const DOC: &str = r#"
servers:
  - url: https://api.example.com
paths:
  /widgets/{id}:
    get:
      operationId: getWidget
      parameters:
        - name: id
          in: path
        - name: expand
          in: query
      responses:
        "200":
          description: ok
        "404":
          description: missing
        default:
          description: error
  /shops/{shop-id}/widgets/{widgetId}:
    delete:
      operationId: deleteWidget
      parameters:
        - name: shop-id
          in: path
        - name: widgetId
          in: path
      responses:
        "204":
          description: gone
"#;

    fn plan() -> Plan {
        let doc = Document::from_yaml_str(DOC).unwrap();
        Plan::build(&doc, &Config::default()).unwrap()
    }

    #[test]
    fn path_and_discrete_data() {
        let plan = plan();
        let b = bindings(&plan.operations[0], &plan.host);
        assert_eq!(b.get("PATH"), Some("/widgets/${id}"));
        insta::assert_snapshot!(
            b.get("DISCRETE_DATA").unwrap(),
            @r#"const id = randomItem(["id_1", "id_2"]);"#
        );
        assert_eq!(b.get("PARAMS"), Some("id"));
    }

    #[test]
    fn diverse_data_probes_bad_values() {
        let plan = plan();
        let b = bindings(&plan.operations[0], &plan.host);
        assert_eq!(
            b.get("DIVERSE_DATA"),
            Some(r#"const id = randomItem(["id_1", "id_2", null, undefined, "invalid", 4, 82]);"#)
        );
    }

    #[test]
    fn per_status_bindings_skip_default() {
        let plan = plan();
        let b = bindings(&plan.operations[0], &plan.host);
        assert_eq!(b.get("RESPONSES"), Some("200, 404"));
        let trends = b.get("TRENDS").unwrap();
        assert_eq!(trends.lines().count(), 2);
        assert!(trends.contains(
            r#"const http_req_duration_404 = new Trend("http_req_duration_404", true);"#
        ));
        let thresholds = b.get("THRESHOLDS").unwrap();
        assert!(thresholds.contains(
            r#""http_req_duration_200": ["p(90)<1000", "p(95)<2000", "p(100)<3000"],"#
        ));
        let cases = b.get("CASE").unwrap();
        assert!(cases.contains("case 200:"));
        assert!(cases.contains("http_req_duration_404.add(result.timings.duration);"));
        assert!(!cases.contains("default"));
    }

    #[test]
    fn multiple_params_are_separate_statements() {
        let plan = plan();
        let b = bindings(&plan.operations[1], &plan.host);
        assert_eq!(b.get("PATH"), Some("/shops/${shop_id}/widgets/${widgetId}"));
        assert_eq!(b.get("PARAMS"), Some("shop_id, widgetId"));
        assert_eq!(
            b.get("DISCRETE_DATA"),
            Some(
                "const shop_id = randomItem([\"shop-id_1\", \"shop-id_2\"]);\n    const widgetId = randomItem([\"widgetId_1\", \"widgetId_2\"]);"
            )
        );
        assert_eq!(b.get("METHOD"), Some("DELETE"));
    }

    #[test]
    fn renders_full_script() {
        let plan = plan();
        let script = render(&plan.operations[0], &plan.host, &Template::load_skeleton()).unwrap();
        assert!(script.contains("http.setResponseCallback(http.expectedStatuses(200, 404));"));
        assert!(script.contains("`https://api.example.com/widgets/${id}`"));
        assert!(script.contains("\"GET\","));
        assert!(script.contains("export function request(id) {"));
        assert!(script.contains("`${__ENV.API_SECRET}`"));
        assert!(script.contains("exec: \"discrete\""));
        assert!(script.contains("exec: \"diverse\""));
        assert!(Template::new(script).placeholders().is_empty());
    }

    #[test]
    fn custom_template_with_unknown_placeholder_fails() {
        let plan = plan();
        let template = Template::new("$HOST $BODY");
        assert!(matches!(
            render(&plan.operations[0], &plan.host, &template),
            Err(TemplateError::Unbound(name)) if name == "BODY"
        ));
    }
}
