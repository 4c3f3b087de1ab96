//! Server configuration.
//!
//! `HOST` and `PORT` come from the environment. Game tuning lives in an
//! optional YAML file named by `MARPELE_CONFIG`.

use std::net::SocketAddr;
use std::time::Duration;

use marpele_session::domain::party::CancelPolicy;
use serde::Deserialize;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Game tuning read from the YAML settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameSettings {
    /// Who may cancel a game.
    pub cancel_policy: CancelPolicy,
    /// Seconds without an event before a session expires; 0 disables expiry.
    pub idle_timeout_secs: u64,
    /// Seconds between idle sweeps.
    pub sweep_interval_secs: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            cancel_policy: CancelPolicy::default(),
            idle_timeout_secs: 3600,
            sweep_interval_secs: 60,
        }
    }
}

impl GameSettings {
    /// Parses settings from YAML. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for malformed YAML, unknown fields, or a
    /// zero sweep interval.
    pub fn from_yaml(source: &str) -> Result<Self, AppError> {
        let settings: Self = serde_yaml::from_str(source)
            .map_err(|e| AppError::Config(format!("invalid settings file: {e}")))?;
        if settings.sweep_interval_secs == 0 {
            return Err(AppError::Config(
                "sweep_interval_secs must be greater than zero".into(),
            ));
        }
        Ok(settings)
    }

    /// How long a session may sit without activity, or `None` when expiry is
    /// disabled.
    #[must_use]
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }

    /// Interval between idle sweeps.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Game tuning.
    pub game: GameSettings,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port or the
    /// settings file cannot be read or parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps variable names to values.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let game = match lookup("MARPELE_CONFIG") {
            Some(path) => {
                let source = std::fs::read_to_string(&path).map_err(|e| {
                    AppError::Config(format!("cannot read settings file {path}: {e}"))
                })?;
                GameSettings::from_yaml(&source)?
            }
            None => GameSettings::default(),
        };
        Ok(Self { host, port, game })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
