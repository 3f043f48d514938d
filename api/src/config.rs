//! API configuration
//!
//! Sources are layered, later ones winning:
//! 1. built-in defaults
//! 2. `config.<environment>.toml` in the working directory, when present
//! 3. `VERIFIER__*` environment variables, e.g. `VERIFIER__SERVER__PORT=9090`
//!    or `VERIFIER__VERIFIER__MAX_VERIFY_ATTEMPTS=5`

use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;

use vf_core::VerifierConfig;
use vf_infra::InfrastructureConfig;
use vf_shared::config::{Environment, LogFormat, LoggingConfig, ServerConfig};

const ENV_PREFIX: &str = "VERIFIER";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(skip)]
    pub environment: Environment,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub verifier: VerifierConfig,
}

impl ApiConfig {
    /// Load configuration for the environment named by `ENVIRONMENT`/`ENV`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_for(Environment::from_env())
    }

    pub fn load_for(environment: Environment) -> Result<Self, ConfigError> {
        let server = ServerConfig::default();
        let logging = LoggingConfig::for_environment(environment);

        let settings = Config::builder()
            .set_default("server.host", server.host)?
            .set_default("server.port", i64::from(server.port))?
            .set_default("server.workers", server.workers as i64)?
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", format_name(logging.format))?
            .set_default("logging.source_location", logging.source_location)?
            .add_source(File::new(environment.config_file(), FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut api_config: ApiConfig = settings.try_deserialize()?;
        api_config.environment = environment;
        Ok(api_config)
    }

    /// Development-only backends that are configured for a production run
    pub fn production_warnings(&self, infra: &InfrastructureConfig) -> Vec<&'static str> {
        if self.environment.is_production() {
            infra.development_backends()
        } else {
            Vec::new()
        }
    }
}

fn format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Json => "json",
        LogFormat::Pretty => "pretty",
        LogFormat::Compact => "compact",
    }
}
