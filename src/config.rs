//! File-based configuration.
//!
//! Every field has a default, so a config file only needs the keys it overrides:
//!
//! ```json
//! { "grid": { "strategy": "variance", "min_confidence": 0.7 },
//!   "retime": { "easing": "ease-in-out-sine", "threading": { "chunk_size": 32 } } }
//! ```

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{SeamError, SeamResult};
use crate::grid::options::GridOptions;
use crate::retime::RetimeOptions;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SeamConfig {
    /// Grid decomposition settings.
    pub grid: GridOptions,
    /// Retime settings.
    pub retime: RetimeOptions,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Log output settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`"info"`, `"seamcut=debug,warn"`); `RUST_LOG` takes precedence.
    pub level: String,
    /// Colourize output.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            ansi: true,
        }
    }
}

impl SeamConfig {
    /// Parse a JSON config file.
    pub fn from_path(path: &Path) -> SeamResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        Self::from_json_str(&text).map_err(|e| match e {
            SeamError::Serde(msg) => SeamError::serde(format!("config '{}': {msg}", path.display())),
            other => other,
        })
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(text: &str) -> SeamResult<Self> {
        let cfg: Self = serde_json::from_str(text).map_err(|e| SeamError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate every section.
    pub fn validate(&self) -> SeamResult<()> {
        self.grid.validate()?;
        self.retime.mapper.validate()?;
        Ok(())
    }
}

/// Install a global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` overrides `cfg.level`. Calling this twice keeps the first subscriber.
pub fn init_logging(cfg: &LoggingConfig) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(cfg.ansi)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
