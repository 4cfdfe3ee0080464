//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator, LoggingOptions};
use config::{Config, ConfigError, Environment, File};
use reqlog_core::{ReqlogError, ReqlogResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Section holding the middleware options, e.g. `[logging.request_response]`.
pub const DEFAULT_SECTION: &str = "logging.request_response";

/// Prefix of environment variables, e.g. `REQLOG__SERVER__PORT`.
pub const ENV_PREFIX: &str = "REQLOG";

/// Option fields given as comma separated lists in environment variables.
const LIST_FIELDS: [&str; 2] = ["sensitive_fields", "ignored_paths"];

/// Loads configuration from a directory of TOML files and the environment.
///
/// Sources are applied in order, later ones winning:
/// 1. Built-in defaults
/// 2. `{config_dir}/default.toml`
/// 3. `{config_dir}/{environment}.toml` (`REQLOG_ENVIRONMENT`, default `development`)
/// 4. `{config_dir}/local.toml`
/// 5. Environment variables with the `REQLOG__` prefix and `__` separator
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Creates a loader reading from `config_dir` and the process environment.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        Self {
            config_dir: config_dir.into(),
            environment: None,
        }
    }

    /// Creates a loader reading from `./config`.
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Replaces the process environment with a fixed set of variables.
    #[must_use]
    pub fn with_environment(mut self, vars: HashMap<String, String>) -> Self {
        self.environment = Some(vars);
        self
    }

    /// Returns the configuration directory.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Loads and validates the whole application configuration.
    pub fn load(&self) -> ReqlogResult<AppConfig> {
        let app_config: AppConfig = self
            .build(DEFAULT_SECTION)?
            .try_deserialize()
            .map_err(config_error_to_reqlog_error)?;

        ConfigValidator::validate(&app_config).map_err(validation_errors_to_reqlog_error)?;

        Ok(app_config)
    }

    /// Loads the middleware options stored under `section`.
    ///
    /// A missing section yields the defaults.
    pub fn load_logging_options(&self, section: &str) -> ReqlogResult<LoggingOptions> {
        self.load_logging_options_with(section, |_| {})
    }

    /// Loads the middleware options under `section`, then applies `configure`.
    ///
    /// Values set by `configure` take precedence over every external source.
    pub fn load_logging_options_with<F>(
        &self,
        section: &str,
        configure: F,
    ) -> ReqlogResult<LoggingOptions>
    where
        F: FnOnce(&mut LoggingOptions),
    {
        let config = self.build(section)?;

        let mut options = match config.get::<LoggingOptions>(section) {
            Ok(options) => options,
            Err(ConfigError::NotFound(_)) => {
                debug!("Section '{}' not found, using default logging options", section);
                LoggingOptions::default()
            }
            Err(e) => return Err(config_error_to_reqlog_error(e)),
        };

        configure(&mut options);

        ConfigValidator::validate_logging(&options).map_err(validation_errors_to_reqlog_error)?;

        Ok(options)
    }

    /// Builds the layered sources; list fields under `section` are split on commas.
    fn build(&self, section: &str) -> ReqlogResult<Config> {
        let environment = self
            .var("REQLOG_ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string());

        info!(
            "Loading configuration from {} for environment: {}",
            self.config_dir.display(),
            environment
        );

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{}.toml", name));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        let mut env_source = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",");
        for field in LIST_FIELDS {
            let key = format!("{}.{}", section, field).to_lowercase();
            env_source = env_source.with_list_parse_key(&key);
        }
        builder = builder.add_source(env_source.source(self.environment.clone()));

        builder.build().map_err(config_error_to_reqlog_error)
    }

    fn var(&self, name: &str) -> Option<String> {
        match &self.environment {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }
}

fn config_error_to_reqlog_error(err: ConfigError) -> ReqlogError {
    ReqlogError::Configuration(err.to_string())
}

fn validation_errors_to_reqlog_error(errors: Vec<crate::ConfigValidationError>) -> ReqlogError {
    let message = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    ReqlogError::Validation(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn loader(dir: &TempDir, vars: &[(&str, &str)]) -> ConfigLoader {
        let vars = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConfigLoader::new(dir.path()).with_environment(vars)
    }

    #[test]
    fn test_defaults_without_sources() {
        let dir = TempDir::new().unwrap();
        let options = loader(&dir, &[]).load_logging_options(DEFAULT_SECTION).unwrap();
        assert_eq!(options, LoggingOptions::default());

        let app = loader(&dir, &[]).load().unwrap();
        assert_eq!(app.server.port, 8080);
    }

    #[test]
    fn test_file_section_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[logging.request_response]
mask_sensitive_data = true
sensitive_fields = ["password", "ssn"]
ignored_paths = ["/health", "/metrics"]
"#,
        )
        .unwrap();

        let options = loader(&dir, &[]).load_logging_options(DEFAULT_SECTION).unwrap();
        assert!(options.mask_sensitive_data);
        assert_eq!(options.sensitive_fields, vec!["password", "ssn"]);
        assert_eq!(options.ignored_paths, vec!["/health", "/metrics"]);
        assert!(options.log_headers);
    }

    #[test]
    fn test_environment_file_overrides_default_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[logging.request_response]\nlog_headers = false\nlog_query_string = false\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("production.toml"),
            "[logging.request_response]\nlog_headers = true\n",
        )
        .unwrap();

        let options = loader(&dir, &[("REQLOG_ENVIRONMENT", "production")])
            .load_logging_options(DEFAULT_SECTION)
            .unwrap();
        assert!(options.log_headers);
        assert!(!options.log_query_string);
    }

    #[test]
    fn test_env_vars_override_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[logging.request_response]\nlog_request_body = true\n",
        )
        .unwrap();

        let options = loader(
            &dir,
            &[
                ("REQLOG__LOGGING__REQUEST_RESPONSE__LOG_REQUEST_BODY", "false"),
                ("REQLOG__LOGGING__REQUEST_RESPONSE__IGNORED_PATHS", "/health,/ready"),
            ],
        )
        .load_logging_options(DEFAULT_SECTION)
        .unwrap();

        assert!(!options.log_request_body);
        assert_eq!(options.ignored_paths, vec!["/health", "/ready"]);
    }

    #[test]
    fn test_code_overrides_win() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[logging.request_response]\ncorrelation_id_header = \"X-Trace-Id\"\n",
        )
        .unwrap();

        let options = loader(&dir, &[])
            .load_logging_options_with(DEFAULT_SECTION, |options| {
                options.correlation_id_header = "X-Request-Token".to_string();
                options.mask_sensitive_data = true;
            })
            .unwrap();

        assert_eq!(options.correlation_id_header, "X-Request-Token");
        assert!(options.mask_sensitive_data);
    }

    #[test]
    fn test_custom_section() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[audit]\nlog_response_body = false\n",
        )
        .unwrap();

        let options = loader(&dir, &[]).load_logging_options("audit").unwrap();
        assert!(!options.log_response_body);
    }

    #[test]
    fn test_env_lists_under_custom_section() {
        let dir = TempDir::new().unwrap();
        let options = loader(
            &dir,
            &[
                ("REQLOG__AUDIT__SENSITIVE_FIELDS", "ssn,pin"),
                ("REQLOG__AUDIT__IGNORED_PATHS", "/metrics"),
            ],
        )
        .load_logging_options("audit")
        .unwrap();

        assert_eq!(options.sensitive_fields, vec!["ssn", "pin"]);
        assert_eq!(options.ignored_paths, vec!["/metrics"]);
    }

    #[test]
    fn test_env_lists_under_nested_custom_section() {
        let dir = TempDir::new().unwrap();
        let options = loader(&dir, &[("REQLOG__API__LOGGING__SENSITIVE_FIELDS", "card,cvv")])
            .load_logging_options("api.logging")
            .unwrap();

        assert_eq!(options.sensitive_fields, vec!["card", "cvv"]);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = loader(&dir, &[]).load_logging_options_with(DEFAULT_SECTION, |options| {
            options.correlation_id_header = "bad header".to_string();
        });
        assert!(matches!(result, Err(ReqlogError::Validation(_))));
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.toml"), "[logging\nbroken").unwrap();
        let result = loader(&dir, &[]).load();
        assert!(matches!(result, Err(ReqlogError::Configuration(_))));
    }
}
