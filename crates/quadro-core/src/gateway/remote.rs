use std::time::Duration;

use quadro_shared::api::{CreateRecordRequest, ReorderRecordsRequest, UpdateRecordRequest};
use quadro_shared::{Container, ContainerKind};
use reqwest::{Client, StatusCode};
use uuid::Uuid;

/// Transport-level failures from the hosted store. Never surfaced to store
/// callers; the gateway converts every variant into a mirror fallback.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Access forbidden")]
    Forbidden,
    #[error("Resource not found")]
    NotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Thin client for the hosted store's collection API. One attempt per
/// operation; timeouts and fallback policy live in the gateway.
pub struct RemoteStore {
    client: Client,
    base_url: String,
    token: String,
}

impl RemoteStore {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Build URL for a collection endpoint
    fn url(&self, kind: ContainerKind, suffix: &str) -> String {
        format!("{}/api/v1/{}{}", self.base_url, kind.collection(), suffix)
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Handle API response
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                response.json().await.map_err(RemoteError::Network)
            }
            StatusCode::UNAUTHORIZED => Err(RemoteError::Unauthorized),
            StatusCode::FORBIDDEN => Err(RemoteError::Forbidden),
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let text = response.text().await.unwrap_or_default();
                Err(RemoteError::Validation(text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(RemoteError::Server(format!("{}: {}", status, text)))
            }
        }
    }

    /// Handle empty response
    async fn handle_empty_response(response: reqwest::Response) -> Result<(), RemoteError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::UNAUTHORIZED => Err(RemoteError::Unauthorized),
            StatusCode::FORBIDDEN => Err(RemoteError::Forbidden),
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let text = response.text().await.unwrap_or_default();
                Err(RemoteError::Validation(text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(RemoteError::Server(format!("{}: {}", status, text)))
            }
        }
    }

    /// GET /api/v1/{collection}?parent_id=&archived=
    pub async fn fetch(
        &self,
        kind: ContainerKind,
        parent_id: Option<Uuid>,
        archived: bool,
    ) -> Result<Vec<Container>, RemoteError> {
        let mut request = self
            .client
            .get(self.url(kind, ""))
            .header("Authorization", self.auth_header())
            .query(&[("archived", archived.to_string())]);

        if let Some(parent) = parent_id {
            request = request.query(&[("parent_id", parent.to_string())]);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// GET /api/v1/{collection}/{id}
    pub async fn get(&self, kind: ContainerKind, id: Uuid) -> Result<Container, RemoteError> {
        let response = self
            .client
            .get(self.url(kind, &format!("/{}", id)))
            .header("Authorization", self.auth_header())
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// POST /api/v1/{collection}
    pub async fn insert(
        &self,
        kind: ContainerKind,
        req: &CreateRecordRequest,
    ) -> Result<Container, RemoteError> {
        let response = self
            .client
            .post(self.url(kind, ""))
            .header("Authorization", self.auth_header())
            .json(req)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// PATCH /api/v1/{collection}/{id}
    pub async fn update(
        &self,
        kind: ContainerKind,
        id: Uuid,
        patch: &UpdateRecordRequest,
    ) -> Result<Container, RemoteError> {
        let response = self
            .client
            .patch(self.url(kind, &format!("/{}", id)))
            .header("Authorization", self.auth_header())
            .json(patch)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// POST /api/v1/{collection}/reorder, applied transactionally by the
    /// remote store.
    pub async fn reorder(
        &self,
        kind: ContainerKind,
        req: &ReorderRecordsRequest,
    ) -> Result<Vec<Container>, RemoteError> {
        let response = self
            .client
            .post(self.url(kind, "/reorder"))
            .header("Authorization", self.auth_header())
            .json(req)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// DELETE /api/v1/{collection}/{id}
    pub async fn remove(&self, kind: ContainerKind, id: Uuid) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(self.url(kind, &format!("/{}", id)))
            .header("Authorization", self.auth_header())
            .send()
            .await?;
        Self::handle_empty_response(response).await
    }
}
