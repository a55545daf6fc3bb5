use thiserror::Error;

/// Errors raised while loading configuration or a document set.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but its value cannot be used.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    /// The documents file could not be read.
    #[error("failed to read documents file {path}: {source}")]
    DocumentsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The documents file is not valid YAML for the expected shape.
    #[error("failed to parse documents file: {0}")]
    DocumentsFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
