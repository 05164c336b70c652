//! oatgen-core: OpenAPI document model for test generation
//!
//! Loads an OpenAPI document, extracts its operations, resolves response
//! schemas and plans the files the emitters will write.

pub mod args;
pub mod config;
pub mod document;
pub mod operation;
pub mod plan;
pub mod resolve;

pub use args::{Args, read_args};
pub use config::{Config, ConfigError, IdStrategy, LoadSuffix};
pub use document::{Document, LoadError};
pub use operation::{MethodFilter, Operation, ParamLocation, Parameter};
pub use plan::{Artifact, ArtifactKind, Plan, PlannedOperation, PlannedResponse};
pub use resolve::{ResolveError, SchemaKind, SchemaRef};
