//! oatgen-emit: contract-test and k6 load-script emitters
//!
//! Emitters turn a [`PlannedOperation`] into file contents; [`generate`]
//! drives them over a whole [`Plan`] and writes the results.

pub mod contract;
pub mod js;
pub mod load;
pub mod template;
pub mod writer;

use std::path::PathBuf;

use oatgen_core::plan::PlannedOperation;
use oatgen_core::{ArtifactKind, Config, Plan};

pub use contract::{ContractContext, ContractSuite};
pub use template::{Bindings, Template, TemplateError};

/// Produces the contents of one kind of artifact.
pub trait Emitter {
    /// Which planned artifacts this emitter fills.
    fn kind(&self) -> ArtifactKind;

    /// File contents for one operation.
    fn emit(&self, operation: &PlannedOperation) -> Result<String, EmitError>;
}

/// jest contract suites
pub struct ContractEmitter {
    ctx: ContractContext,
}

impl ContractEmitter {
    #[must_use]
    pub fn new(ctx: ContractContext) -> Self {
        Self { ctx }
    }
}

impl Emitter for ContractEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Contract
    }

    fn emit(&self, operation: &PlannedOperation) -> Result<String, EmitError> {
        Ok(contract::render(operation, &self.ctx).render())
    }
}

/// k6 load scripts
pub struct LoadEmitter {
    host: String,
    template: Template,
}

impl LoadEmitter {
    #[must_use]
    pub fn new(host: impl Into<String>, template: Template) -> Self {
        Self {
            host: host.into(),
            template,
        }
    }
}

impl Emitter for LoadEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Load
    }

    fn emit(&self, operation: &PlannedOperation) -> Result<String, EmitError> {
        Ok(load::render(operation, &self.host, &self.template)?)
    }
}

/// Emitters enabled by `config`, ready to run over `plan`.
///
/// `api_doc_path` is what the generated contract suites point `jestOpenAPI`
/// at unless `contract.api_doc_ref` overrides it.
///
/// # Errors
///
/// Fails if a configured custom load template cannot be read.
pub fn emitters_for(
    plan: &Plan,
    config: &Config,
    api_doc_path: &str,
) -> Result<Vec<Box<dyn Emitter>>, EmitError> {
    let mut emitters: Vec<Box<dyn Emitter>> = Vec::new();
    if config.contract.enabled {
        let api_doc_ref = config
            .contract
            .api_doc_ref
            .clone()
            .unwrap_or_else(|| api_doc_path.to_string());
        emitters.push(Box::new(ContractEmitter::new(ContractContext {
            host: plan.host.clone(),
            api_doc_ref,
        })));
    }
    if config.load.enabled {
        let template = match &config.load.template {
            Some(path) => Template::from_file(path)?,
            None => Template::load_skeleton(),
        };
        emitters.push(Box::new(LoadEmitter::new(plan.host.clone(), template)));
    }
    Ok(emitters)
}

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    pub skipped: usize,
}

impl GenerationReport {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} written, {} failed, {} skipped",
            self.written.len(),
            self.failed.len(),
            self.skipped
        )
    }
}

/// Run `emitters` over every planned artifact. A failing artifact is logged
/// and recorded; the rest still get written.
pub fn generate(plan: &Plan, emitters: &[Box<dyn Emitter>]) -> GenerationReport {
    let mut report = GenerationReport {
        skipped: plan.skipped.len(),
        ..GenerationReport::default()
    };

    for op in &plan.operations {
        tracing::info!(operation = %op.label, "generating");
        for artifact in &op.artifacts {
            let Some(emitter) = emitters.iter().find(|e| e.kind() == artifact.kind) else {
                continue;
            };
            let result = emitter
                .emit(op)
                .and_then(|contents| writer::write_artifact(&artifact.path, &contents));
            match result {
                Ok(()) => {
                    tracing::info!(path = %artifact.path.display(), "created");
                    report.written.push(artifact.path.clone());
                }
                Err(e) => {
                    tracing::error!(path = %artifact.path.display(), error = %e, "artifact abandoned");
                    report.failed.push((artifact.path.clone(), e.to_string()));
                }
            }
        }
    }

    report
}

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Cannot write {0}: {1}")]
    Write(PathBuf, String),
    #[error(transparent)]
    Template(#[from] TemplateError),
}
