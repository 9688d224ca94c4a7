use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::PathBuf;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, ServerSettings, Settings};

/// Command-line overrides layered on top of every other configuration source.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ConfigOverrides {
    /// Path to a TOML configuration file (defaults to `quotebot.toml` if present).
    #[cfg_attr(feature = "clap", arg(long, short))]
    pub config: Option<PathBuf>,

    /// Port to listen on, overriding `PORT`.
    #[cfg_attr(feature = "clap", arg(long, short))]
    pub port: Option<u16>,
}

/// Loads the service settings from the process environment.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file,
/// `QUOTEBOT__SECTION__KEY` variables, `DATABASE_URL`/`PORT`, and finally
/// the command-line overrides.
pub fn load_settings(overrides: &ConfigOverrides) -> Result<Settings, ConfigError> {
    load_settings_with_env(overrides, std::env::vars().collect())
}

/// Same as [`load_settings`], reading variables from `env` instead of the process.
pub fn load_settings_with_env(
    overrides: &ConfigOverrides,
    env: HashMap<String, String>,
) -> Result<Settings, ConfigError> {
    let file = match &overrides.config {
        Some(path) => config::File::from(path.as_path()).required(true),
        None => config::File::with_name("quotebot").required(false),
    };

    let builder = config::Config::builder()
        .set_default("database.max_connections", 10)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.static_dir", "public")?
        .set_default("server.detailed_errors", false)?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("QUOTEBOT")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone())),
        )
        .set_override_option("database.url", env.get("DATABASE_URL").cloned())?
        .set_override_option("server.port", env.get("PORT").cloned())?
        .set_override_option("server.port", overrides.port.map(i64::from))?
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    tracing::debug!(
        host = %settings.server.host,
        port = settings.server.port,
        static_dir = %settings.server.static_dir.display(),
        "configuration loaded"
    );
    Ok(settings)
}
