use crate::app_config::{AppConfig, Environment};
use crate::language::{Language, OutputFormat};
use crate::ConfigError;

/// Endpoint of the hosted Bitext sentiment service.
pub const DEFAULT_BITEXT_ENDPOINT: &str = "http://svc9.bitext.com/WS_NOps_Val/Service.aspx";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let bitext_user = require("BITEXT_USER")?;
    let bitext_pass = require("BITEXT_PASS")?;
    let bitext_endpoint = or_default("BITEXT_ENDPOINT", DEFAULT_BITEXT_ENDPOINT);

    let env = parse_environment(&or_default("SEMANT_ENV", "development"))?;
    let log_level = or_default("SEMANT_LOG_LEVEL", "info");

    let language = or_default("SEMANT_LANGUAGE", "en")
        .parse::<Language>()
        .map_err(|e| invalid("SEMANT_LANGUAGE", e))?;
    let output_format = or_default("SEMANT_OUTPUT_FORMAT", "xml")
        .parse::<OutputFormat>()
        .map_err(|e| invalid("SEMANT_OUTPUT_FORMAT", e))?;
    let debug = parse_bool(&or_default("SEMANT_DEBUG", "false"))
        .ok_or_else(|| invalid("SEMANT_DEBUG", "expected true or false".to_string()))?;

    let request_timeout_secs = parse_u64("SEMANT_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "SEMANT_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let user_agent = or_default("SEMANT_USER_AGENT", "semant/0.1 (sentiment-scoring)");
    let documents_path = PathBuf::from(or_default(
        "SEMANT_DOCUMENTS_PATH",
        "./config/documents.yaml",
    ));

    Ok(AppConfig {
        env,
        log_level,
        bitext_user,
        bitext_pass,
        bitext_endpoint,
        language,
        output_format,
        debug,
        request_timeout_secs,
        user_agent,
        documents_path,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SEMANT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
