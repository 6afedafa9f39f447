use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::dao::{
    models::SessionTableEntity, session_store::SessionStore, storage::StorageResult,
};

use super::{
    config::BlobConfig,
    error::{BlobDaoError, BlobResult},
    models::{
        ListFolderRequest, ListFolderResponse, TempLinkRequest, TempLinkResponse, person_name,
        photo_path,
    },
};

const LIST_FOLDER_ENDPOINT: &str = "files/list_folder";
const TEMP_LINK_ENDPOINT: &str = "files/get_temporary_link";
const CONTENT_ENDPOINT: &str = "files/content";

/// [`SessionStore`] backed by a remote HTTP blob store.
///
/// The session table is one JSON document; photos live under
/// `{game_data_path}/{folder}/{name}.jpg` and are served through temporary
/// links resolved on demand.
#[derive(Clone)]
pub struct BlobSessionStore {
    client: Client,
    base_url: Arc<str>,
    game_data_path: Arc<str>,
    sessions_path: Arc<str>,
    token: Option<Arc<str>>,
}

impl BlobSessionStore {
    /// Build the HTTP client and probe the store once.
    pub async fn connect(config: BlobConfig) -> BlobResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| BlobDaoError::ClientBuilder { source })?;

        let store = Self {
            client,
            base_url: Arc::<str>::from(config.base_url.trim_end_matches('/')),
            game_data_path: Arc::<str>::from(config.game_data_path.as_str()),
            sessions_path: Arc::<str>::from(config.sessions_path.as_str()),
            token: config.token.map(Arc::<str>::from),
        };

        store.probe().await?;
        Ok(store)
    }

    fn request(&self, method: Method, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, endpoint);
        let builder = self.client.request(method, url);
        if let Some(ref token) = self.token {
            builder.bearer_auth(token.as_ref())
        } else {
            builder
        }
    }

    /// Cheap reachability probe: list the game data root.
    async fn probe(&self) -> BlobResult<()> {
        self.post_json::<ListFolderResponse>(
            LIST_FOLDER_ENDPOINT,
            &ListFolderRequest {
                path: self.game_data_path.to_string(),
            },
        )
        .await
        .map(|_| ())
    }

    async fn post_json<T>(&self, endpoint: &str, payload: &impl serde::Serialize) -> BlobResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|source| BlobDaoError::RequestSend {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlobDaoError::RequestStatus {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| BlobDaoError::DecodeResponse {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    async fn download_sessions(&self) -> BlobResult<SessionTableEntity> {
        let path = self.sessions_path.to_string();
        let response = self
            .request(Method::GET, CONTENT_ENDPOINT)
            .query(&[("path", path.as_str())])
            .send()
            .await
            .map_err(|source| BlobDaoError::RequestSend {
                endpoint: CONTENT_ENDPOINT.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(BlobDaoError::NotFound { path }),
            status if status.is_success() => {
                let bytes =
                    response
                        .bytes()
                        .await
                        .map_err(|source| BlobDaoError::DecodeResponse {
                            endpoint: CONTENT_ENDPOINT.to_string(),
                            source,
                        })?;
                serde_json::from_slice(&bytes)
                    .map_err(|source| BlobDaoError::DeserializeSessions { path, source })
            }
            status => Err(BlobDaoError::RequestStatus {
                endpoint: CONTENT_ENDPOINT.to_string(),
                status,
            }),
        }
    }

    async fn upload_sessions(&self, table: &SessionTableEntity) -> BlobResult<()> {
        let response = self
            .request(Method::PUT, CONTENT_ENDPOINT)
            .query(&[("path", self.sessions_path.as_ref())])
            .json(table)
            .send()
            .await
            .map_err(|source| BlobDaoError::RequestSend {
                endpoint: CONTENT_ENDPOINT.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BlobDaoError::RequestStatus {
                endpoint: CONTENT_ENDPOINT.to_string(),
                status: response.status(),
            })
        }
    }
}

impl SessionStore for BlobSessionStore {
    fn load_sessions(&self) -> BoxFuture<'static, StorageResult<SessionTableEntity>> {
        let store = self.clone();
        Box::pin(async move {
            match store.download_sessions().await {
                Ok(table) => Ok(table),
                // First boot: no table has ever been flushed yet.
                Err(BlobDaoError::NotFound { path }) => {
                    warn!(%path, "session table not found; starting with an empty table");
                    Ok(SessionTableEntity::new())
                }
                Err(err) => Err(err.into()),
            }
        })
    }

    fn save_sessions(&self, table: SessionTableEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.upload_sessions(&table).await.map_err(Into::into) })
    }

    fn list_folder(&self, folder: &str) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let store = self.clone();
        let path = format!(
            "{}/{}",
            store.game_data_path.trim_end_matches('/'),
            folder
        );
        Box::pin(async move {
            let listing = store
                .post_json::<ListFolderResponse>(LIST_FOLDER_ENDPOINT, &ListFolderRequest { path })
                .await?;
            Ok(listing
                .entries
                .iter()
                .filter_map(|entry| person_name(&entry.name))
                .map(str::to_string)
                .collect())
        })
    }

    fn fetch_photo_link(
        &self,
        folder: &str,
        name: &str,
    ) -> BoxFuture<'static, StorageResult<String>> {
        let store = self.clone();
        let path = photo_path(&store.game_data_path, folder, name);
        Box::pin(async move {
            let response = store
                .post_json::<TempLinkResponse>(TEMP_LINK_ENDPOINT, &TempLinkRequest { path })
                .await?;
            Ok(response.link)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.probe().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.probe().await.map_err(Into::into) })
    }
}
