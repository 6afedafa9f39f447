//! Application-level configuration loading, including the judge tuning knobs.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::game::{judge::JudgeConfig, score::ScoreWeights};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GUESSWHO_BACK_CONFIG_PATH";

/// Default number of specific answers between persistence flushes.
const DEFAULT_FLUSH_INTERVAL: u32 = 10;
/// Default number of rows returned by the leaderboard.
const DEFAULT_LEADERBOARD_SIZE: usize = 10;
/// Default upper bound on display name length.
const DEFAULT_MAX_DISPLAY_NAME_LEN: usize = 20;
/// Default reserved substring marking group identity in leaderboard output.
const DEFAULT_GROUP_TAG: &str = "(group)";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Tuning knobs for the answer judge (stoplist, token length).
    pub judge: JudgeConfig,
    /// Weights applied when deriving a score from the outcome counters.
    pub weights: ScoreWeights,
    /// Specific answers between full-table persistence flushes.
    pub flush_interval: u32,
    /// Rows returned by the leaderboard when no limit is requested.
    pub leaderboard_size: usize,
    /// Upper bound on display name length.
    pub max_display_name_len: usize,
    /// Reserved substring that display names must not contain.
    pub group_tag: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in
    /// defaults when the file is missing or malformed.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        stoplist = config.judge.stoplist.len(),
                        flush_interval = config.flush_interval,
                        "loaded configuration"
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

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            judge: JudgeConfig::default(),
            weights: ScoreWeights::default(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            max_display_name_len: DEFAULT_MAX_DISPLAY_NAME_LEN,
            group_tag: DEFAULT_GROUP_TAG.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    judge: Option<JudgeConfig>,
    #[serde(default)]
    weights: Option<ScoreWeights>,
    #[serde(default)]
    flush_interval: Option<u32>,
    #[serde(default)]
    leaderboard_size: Option<usize>,
    #[serde(default)]
    max_display_name_len: Option<usize>,
    #[serde(default)]
    group_tag: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            judge: raw.judge.unwrap_or(defaults.judge),
            weights: raw.weights.unwrap_or(defaults.weights),
            flush_interval: raw.flush_interval.unwrap_or(defaults.flush_interval),
            leaderboard_size: raw.leaderboard_size.unwrap_or(defaults.leaderboard_size),
            max_display_name_len: raw
                .max_display_name_len
                .unwrap_or(defaults.max_display_name_len),
            group_tag: raw.group_tag.unwrap_or(defaults.group_tag),
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
