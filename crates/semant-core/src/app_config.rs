use std::path::PathBuf;

use crate::analysis::{Credentials, ExecutionSettings};
use crate::language::{Language, OutputFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Colored log output is only wanted on a developer terminal.
    #[must_use]
    pub fn ansi_logs(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub bitext_user: String,
    pub bitext_pass: String,
    pub bitext_endpoint: String,
    pub language: Language,
    pub output_format: OutputFormat,
    pub debug: bool,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub documents_path: PathBuf,
}

impl AppConfig {
    /// Executor settings derived from this configuration.
    #[must_use]
    pub fn execution_settings(&self) -> ExecutionSettings {
        ExecutionSettings {
            credentials: Credentials::new(&self.bitext_user, &self.bitext_pass),
            language: self.language,
            format: self.output_format,
            debug: self.debug,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("bitext_user", &"[redacted]")
            .field("bitext_pass", &"[redacted]")
            .field("bitext_endpoint", &self.bitext_endpoint)
            .field("language", &self.language)
            .field("output_format", &self.output_format)
            .field("debug", &self.debug)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("documents_path", &self.documents_path)
            .finish()
    }
}
