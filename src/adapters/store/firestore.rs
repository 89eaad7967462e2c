//! Firestore REST document store adapter.
//!
//! Implements `DocumentStore` against the Firestore REST API
//! (`projects/{p}/databases/(default)/documents/...`). Merge semantics use
//! an `updateMask` listing the top-level fields being written; listing
//! paginates with `nextPageToken`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::ports::{DocumentStore, StoreError};

use super::value::{from_firestore_document, to_firestore_document};

/// Default Firestore REST endpoint.
const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Page size for collection listing.
const LIST_PAGE_SIZE: u32 = 1000;

/// Firestore connection configuration.
#[derive(Clone)]
pub struct FirestoreConfig {
    project_id: String,
    access_token: SecretString,
    base_url: String,
    timeout: Duration,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            project_id: project_id.into(),
            access_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Firestore-backed document store.
pub struct FirestoreDocumentStore {
    config: FirestoreConfig,
    http_client: reqwest::Client,
}

impl FirestoreDocumentStore {
    pub fn new(config: FirestoreConfig) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn document_url(&self, path: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.config.base_url, self.config.project_id, path
        )
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.access_token.expose_secret())
    }

    async fn check(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StoreError> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::backend(format!("{}: {}", status, body)));
        }
        Ok(response)
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn get_document(&self, path: &str) -> Result<Value, StoreError> {
        let response = self
            .http_client
            .get(self.document_url(path))
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let response = self.check(response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(from_firestore_document(&body))
    }

    async fn set_document(&self, path: &str, doc: &Value) -> Result<(), StoreError> {
        let response = self
            .http_client
            .patch(self.document_url(path))
            .header("Authorization", self.bearer())
            .json(&to_firestore_document(doc))
            .send()
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        self.check(response).await.map(|_| ())
    }

    async fn merge_document(&self, path: &str, fields: &Value) -> Result<(), StoreError> {
        let mask: Vec<(String, String)> = fields
            .as_object()
            .map(|o| {
                o.keys()
                    .map(|k| ("updateMask.fieldPaths".to_string(), k.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let response = self
            .http_client
            .patch(self.document_url(path))
            .query(&mask)
            .header("Authorization", self.bearer())
            .json(&to_firestore_document(fields))
            .send()
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        self.check(response).await.map(|_| ())
    }

    async fn delete_document(&self, path: &str) -> Result<(), StoreError> {
        let response = self
            .http_client
            .delete(self.document_url(path))
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        self.check(response).await.map(|_| ())
    }

    async fn list_document_ids(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(String, String)> =
                vec![("pageSize".to_string(), LIST_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken".to_string(), token.clone()));
            }

            let response = self
                .http_client
                .get(self.document_url(collection))
                .query(&query)
                .header("Authorization", self.bearer())
                .send()
                .await
                .map_err(|e| StoreError::backend(e.to_string()))?;
            let response = self.check(response).await?;
            let body: Value = response
                .json()
                .await
                .map_err(|e| StoreError::backend(e.to_string()))?;

            if let Some(documents) = body.get("documents").and_then(Value::as_array) {
                for doc in documents {
                    // Document names are full resource paths; the id is the
                    // final segment.
                    if let Some(id) = doc
                        .get("name")
                        .and_then(Value::as_str)
                        .and_then(|name| name.rsplit('/').next())
                    {
                        ids.push(id.to_string());
                    }
                }
            }

            match body.get("nextPageToken").and_then(Value::as_str) {
                Some(token) if !token.is_empty() => page_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(ids)
    }
}
