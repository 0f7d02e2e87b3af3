//! Client-level configuration loading, including the localized fallback messages.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the client looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/client.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PARTY_GAMES_CONFIG_PATH";
/// Server used when neither the config file nor the environment names one.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TOAST_MS: u64 = 2_500;
const DEFAULT_TICK_MS: u64 = 100;
/// Upper bound on the timer tick interval.
const MAX_TICK_MS: u64 = 100;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared by every controller.
pub struct ClientConfig {
    /// Base URL of the party-games server.
    pub base_url: String,
    /// How long a toast stays visible.
    pub toast_duration: Duration,
    /// Interval between timer ticks.
    pub tick_interval: Duration,
    /// User-facing fallback strings.
    pub messages: Messages,
}

/// Localized strings shown when the server does not provide its own message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Shown for transport failures and malformed replies.
    pub network_error: String,
    /// Shown when the server rejects a request without an `error` field.
    pub request_failed: String,
    /// Title of the exhausted overlay.
    pub exhausted: String,
    /// Confirmation after the used content was reset.
    pub reset_done: String,
    /// Game-over title; `{winner}` is replaced by the winner's name.
    pub winner: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            network_error: "Netwerkfout. Controleer de verbinding en probeer het opnieuw.".into(),
            request_failed: "Er ging iets mis. Probeer het opnieuw.".into(),
            exhausted: "Alles is gespeeld!".into(),
            reset_done: "Alles is weer beschikbaar.".into(),
            winner: "{winner} heeft gewonnen!".into(),
        }
    }
}

impl Messages {
    /// Game-over title with the winner's name interpolated.
    pub fn winner_title(&self, winner: &str) -> String {
        self.winner.replace("{winner}", winner)
    }
}

impl ClientConfig {
    /// Load the client configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        base_url = %config.base_url,
                        "loaded client config"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            toast_duration: Duration::from_millis(DEFAULT_TOAST_MS),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            messages: Messages::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    base_url: Option<String>,
    toast_ms: Option<u64>,
    tick_ms: Option<u64>,
    #[serde(default)]
    messages: Messages,
}

impl From<RawConfig> for ClientConfig {
    fn from(value: RawConfig) -> Self {
        let tick_ms = value.tick_ms.unwrap_or(DEFAULT_TICK_MS).clamp(1, MAX_TICK_MS);
        Self {
            base_url: value.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            toast_duration: Duration::from_millis(value.toast_ms.unwrap_or(DEFAULT_TOAST_MS)),
            tick_interval: Duration::from_millis(tick_ms),
            messages: value.messages,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
