use std::time::Duration;

use super::error::{BlobDaoError, BlobResult};

/// Default bound applied to every blob-store request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration describing how to reach the blob store.
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Base URL of the blob-store API.
    pub base_url: String,
    /// Folder prefix under which the photo folders live.
    pub game_data_path: String,
    /// Path of the JSON document holding the session table.
    pub sessions_path: String,
    /// Bearer token attached to every request, when the store requires one.
    pub token: Option<String>,
    /// Per-request timeout; requests are never retried by the store.
    pub timeout: Duration,
}

impl BlobConfig {
    /// Construct a configuration from explicit base URL and paths.
    pub fn new(
        base_url: impl Into<String>,
        game_data_path: impl Into<String>,
        sessions_path: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            game_data_path: game_data_path.into(),
            sessions_path: sessions_path.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Attach a bearer token to the configuration.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> BlobResult<Self> {
        let base_url = std::env::var("BLOB_BASE_URL").map_err(|_| BlobDaoError::MissingEnvVar {
            var: "BLOB_BASE_URL",
        })?;
        let game_data_path =
            std::env::var("GAME_DATA_PATH").map_err(|_| BlobDaoError::MissingEnvVar {
                var: "GAME_DATA_PATH",
            })?;
        let sessions_path =
            std::env::var("SESSIONS_FILE_PATH").map_err(|_| BlobDaoError::MissingEnvVar {
                var: "SESSIONS_FILE_PATH",
            })?;

        let mut config = Self::new(base_url, game_data_path, sessions_path);

        if let Ok(token) = std::env::var("BLOB_ACCESS_TOKEN") {
            config = config.with_token(token);
        }

        Ok(config)
    }
}
