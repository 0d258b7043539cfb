//! cm-core: Edit-validation engine for crop model unit tables
//!
//! This library provides functionality to:
//! - Scan directories for unit model packages and load their tables
//! - Validate cell edits against the datatype catalog and row constraints
//! - Settle each edit into the session's tables with corrective writes
//! - Derive parameter maps and replay recorded edit scripts

pub mod catalog;
pub mod category;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod initializer;
pub mod loader;
pub mod params;
pub mod rules;
pub mod scanner;
pub mod script;
pub mod table;

pub use catalog::{DataType, ElementKind, Shape};
pub use category::{allowed_categories, Category, InputType};
pub use config::SessionConfig;
pub use dispatcher::{CellWrite, EditOutcome, EditSession};
pub use error::{Error, Result};
pub use format::{canonicalize, FormatError};
pub use loader::{load_package, LoadedModel, ModelHeader};
pub use params::{parameter_map, parameter_set_map, ParameterMap, ParameterSet};
pub use rules::{DiagnosticKind, Rejection};
pub use scanner::{scan_models, ModelPackage, ScanResult};
pub use script::{replay, EditScript, ReplayReport, Step, StepResult};
pub use table::{Column, ModelTables, TableKind};
