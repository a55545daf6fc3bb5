//! Shared model for the semant sentiment executors.
//!
//! Holds the execution context handed to an executor (credentials, language,
//! documents), the progress protocol used to report back to the caller, and
//! the environment-driven application configuration.

pub mod analysis;
pub mod app_config;
pub mod config;
pub mod documents;
pub mod error;
pub mod language;

pub use analysis::{
    AnalysisOutput, Credentials, Document, DocumentSet, ExecutionContext, ExecutionSettings,
    ExecutionStatus, ExecutionSummary, ProgressAction, ProgressEvent, ProgressObserver,
};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use documents::{load_documents, DocumentEntry, DocumentsFile};
pub use error::ConfigError;
pub use language::{Language, OutputFormat};
