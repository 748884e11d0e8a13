//! Layered application configuration.
//!
//! Sources, lowest priority first:
//! 1. `config/default.toml`, compiled into the binary
//! 2. the TOML file named by `SUPPLYHUB_CONFIG`, if set
//! 3. `SUPPLYHUB__<SECTION>__<KEY>` environment variables

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use supplyhub_auth::{ConfigError as AuthConfigError, JwtSettings, LockoutSettings};
use supplyhub_observability::LogFormat;

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Environment variable holding an optional configuration file path.
pub const CONFIG_PATH_ENV: &str = "SUPPLYHUB_CONFIG";
const ENV_PREFIX: &str = "SUPPLYHUB";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerSettings,
    #[serde(default)]
    pub log: LogSettings,
    #[validate(nested)]
    pub jwt: JwtSettings,
    #[serde(default)]
    pub authorization: AuthorizationSettings,
    #[validate(nested)]
    pub identity: LockoutSettings,
    pub storage: StorageSettings,
    #[validate(nested)]
    pub bootstrap: Option<BootstrapSettings>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerSettings {
    #[validate(length(min = 1))]
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogSettings {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationSettings {
    /// Roles that satisfy every resource/action requirement.
    #[serde(default)]
    pub superuser_roles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub image_dir: PathBuf,
}

/// Administrator account created at startup, granted every catalog claim.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BootstrapSettings {
    #[validate(email)]
    pub admin_email: String,
    #[validate(length(min = 6))]
    pub admin_password: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),

    #[error("configuration validation failed: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Auth(#[from] AuthConfigError),
}

impl AppConfig {
    /// Structural validation plus the token settings' own fail-fast checks.
    pub fn check(&self) -> Result<(), LoadError> {
        self.validate()?;
        self.jwt.check()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Defaults, then `SUPPLYHUB_CONFIG` (if set), then the environment.
    pub fn load(&self) -> Result<AppConfig, LoadError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => self.load_with_file(Path::new(&path)),
            None => finish(defaults().add_source(environment())),
        }
    }

    pub fn load_with_file(&self, path: &Path) -> Result<AppConfig, LoadError> {
        finish(
            defaults()
                .add_source(File::from(path).format(FileFormat::Toml).required(true))
                .add_source(environment()),
        )
    }

    /// Defaults overlaid with an inline TOML document. Ignores the environment.
    pub fn load_from_str(&self, toml: &str) -> Result<AppConfig, LoadError> {
        finish(defaults().add_source(File::from_str(toml, FileFormat::Toml)))
    }
}

fn defaults() -> ConfigBuilder<DefaultState> {
    Config::builder().add_source(File::from_str(DEFAULT_CONFIG_TOML, FileFormat::Toml))
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("authorization.superuser_roles")
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, LoadError> {
    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.check()?;
    Ok(config)
}
