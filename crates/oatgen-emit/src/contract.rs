//! Contract-test emitter: jest + supertest + jest-openapi suites
//!
//! One suite per operation, one `describe` block per non-default response
//! code. Each block asserts the status code, an expected body the user fills
//! in, and conformance with the document's schema.

use oatgen_core::plan::{PlannedOperation, PlannedResponse};
use oatgen_core::{SchemaKind, SchemaRef};

use crate::js;

/// Response codes that get a deliberately wrong API key.
const UNAUTHORIZED_CODES: &[&str] = &["401", "403"];

/// Document-wide values every suite needs.
#[derive(Debug, Clone)]
pub struct ContractContext {
    /// Server the requests go to
    pub host: String,
    /// Path passed to `jestOpenAPI(path.resolve(__dirname, ...))`
    pub api_doc_ref: String,
}

/// Rendered test block for one response code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBlock {
    pub code: String,
    pub text: String,
}

/// In-memory contract test file for one operation.
#[derive(Debug, Clone)]
pub struct ContractSuite {
    header: String,
    blocks: Vec<ResponseBlock>,
}

impl ContractSuite {
    pub fn blocks(&self) -> &[ResponseBlock] {
        &self.blocks
    }

    /// Full file contents.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self.header.clone();
        for block in &self.blocks {
            out.push_str(&block.text);
        }
        out.push_str("});\n");
        out
    }
}

/// Build the suite for one planned operation.
#[must_use]
pub fn render(planned: &PlannedOperation, ctx: &ContractContext) -> ContractSuite {
    let op = &planned.operation;
    let title = format!(
        "{} {} - {}",
        op.method.to_uppercase(),
        op.path,
        op.id_or_empty()
    );

    let header = [
        r#"import { APIGatewayProxyResult } from "aws-lambda";"#.to_string(),
        r#"import jestOpenAPI from "jest-openapi";"#.to_string(),
        r#"import request from "supertest";"#.to_string(),
        r#"import path from "path";"#.to_string(),
        String::new(),
        format!(
            "jestOpenAPI(path.resolve(__dirname, {}));",
            js::string_literal(&ctx.api_doc_ref)
        ),
        String::new(),
        "const validApiKey = undefined;".to_string(),
        String::new(),
        format!("describe({}, () => {{", js::string_literal(&title)),
        String::new(),
    ]
    .join("\n")
        + "\n";

    tracing::info!(operation = %planned.label, "generating contract tests");
    let blocks = planned
        .responses
        .iter()
        .filter(|response| {
            let numeric = response.code.parse::<u16>().is_ok();
            if !numeric {
                tracing::warn!(code = %response.code, "status range has no exact code; no contract block");
            }
            numeric
        })
        .map(|response| {
            tracing::debug!(code = %response.code, "response block");
            response_block(planned, response, ctx)
        })
        .collect();

    ContractSuite { header, blocks }
}

fn response_block(
    planned: &PlannedOperation,
    response: &PlannedResponse,
    ctx: &ContractContext,
) -> ResponseBlock {
    let op = &planned.operation;
    let code = response.code.as_str();
    let title = match response.description.as_deref() {
        Some(desc) if !desc.is_empty() => format!("{code} - {desc}"),
        _ => code.to_string(),
    };

    let mut lines = vec![
        format!("  describe({}, () => {{", js::string_literal(&title)),
        String::new(),
        "    let result: APIGatewayProxyResult;".to_string(),
        "    const expectedResponse = { };".to_string(),
    ];
    let mut declared: Vec<String> = Vec::new();
    for param in op.path_params().chain(op.query_params()) {
        let ident = js::ident(&param.name);
        if !declared.contains(&ident) {
            lines.push(format!("    const {ident} = undefined;"));
            declared.push(ident);
        }
    }

    lines.extend([
        String::new(),
        "    beforeAll(async () => {".to_string(),
        format!("      result = await request({})", js::string_literal(&ctx.host)),
        format!("        .{}(`{}`)", op.method, js::interpolate_path(&op.path)),
        format!("        .set(\"x-api-key\", `{}`);", api_key(code)),
        "    });".to_string(),
        String::new(),
        format!("    it(\"returns with status code {code}\", () => {{"),
        format!("      expect(result.statusCode).toEqual({code});"),
        "    });".to_string(),
        String::new(),
        "    it(\"returns the expected body\", () => {".to_string(),
        "      expect(result.body).toEqual(expectedResponse);".to_string(),
        "    });".to_string(),
        String::new(),
        "    it(\"matches OpenAPI spec\", () => {".to_string(),
        "      expect(result).toSatisfyApiSpec();".to_string(),
    ]);

    let unknown = SchemaRef::unknown();
    let schema = response.schema.as_ref().unwrap_or(&unknown);
    let name = js::string_literal(&schema.name);
    if schema.kind == SchemaKind::Array {
        lines.push("      for (const object of result.body) {".to_string());
        lines.push(format!(
            "        expect(object).toSatisfySchemaInApiSpec({name});"
        ));
        lines.push("      }".to_string());
    } else {
        lines.push(format!(
            "      expect(result.body).toSatisfySchemaInApiSpec({name});"
        ));
    }

    lines.extend([
        "    });".to_string(),
        String::new(),
        "  });".to_string(),
        String::new(),
    ]);

    ResponseBlock {
        code: code.to_string(),
        text: lines.join("\n") + "\n",
    }
}

/// `invalid-api-key` for 401/403, the user-supplied key otherwise.
fn api_key(code: &str) -> &'static str {
    if UNAUTHORIZED_CODES.contains(&code) {
        "invalid-api-key"
    } else {
        "${validApiKey}"
    }
}
