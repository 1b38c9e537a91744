//! HTTP Drive Store Implementation
//!
//! Real client for the drive REST API. Uploads go through
//! `POST {base_url}/files` as multipart; metadata updates, permission grants,
//! and deletions address `{base_url}/files/{id}`.

use serde::Deserialize;

use crate::{DriveConfig, DriveError, DriveStore, DriveUpload};

/// Response body returned by the upload endpoint
#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

/// Real drive store backed by the drive REST API.
pub struct HttpDriveStore {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    share_base_url: String,
}

impl HttpDriveStore {
    /// Create a new HTTP drive store from configuration.
    pub fn new(config: DriveConfig) -> Result<Self, DriveError> {
        let base_url = config
            .api_base_url
            .ok_or_else(|| {
                DriveError::Configuration(
                    "DRIVE_API_BASE_URL is required for the http provider".to_string(),
                )
            })?
            .trim_end_matches('/')
            .to_string();

        let access_token = config.access_token.ok_or_else(|| {
            DriveError::Configuration(
                "DRIVE_ACCESS_TOKEN is required for the http provider".to_string(),
            )
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            access_token,
            share_base_url: config.share_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn check_status(response: reqwest::Response, context: &str) -> Result<reqwest::Response, DriveError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(DriveError::Response(format!(
                "Drive API returned {} during {}: {}",
                status, context, body
            )));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl DriveStore for HttpDriveStore {
    async fn upload(
        &self,
        upload: DriveUpload,
        name: &str,
        folder: &str,
    ) -> Result<String, DriveError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(name.to_string())
            .mime_str(&upload.content_type)
            .map_err(|e| DriveError::Request(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("folder", folder.to_string());

        let response = self
            .http
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DriveError::Request(e.to_string()))?;

        let response = Self::check_status(response, "upload").await?;
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| DriveError::Response(e.to_string()))?;

        tracing::debug!(file_id = %body.id, "Drive upload completed");
        Ok(body.id)
    }

    async fn rename(&self, file_id: &str, name: &str) -> Result<(), DriveError> {
        let response = self
            .http
            .patch(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(|e| DriveError::Request(e.to_string()))?;

        Self::check_status(response, "rename").await?;
        Ok(())
    }

    async fn allow_public_access(&self, file_id: &str) -> Result<(), DriveError> {
        let response = self
            .http
            .post(format!("{}/files/{}/permissions", self.base_url, file_id))
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "role": "reader", "grantee": "anyone" }))
            .send()
            .await
            .map_err(|e| DriveError::Request(e.to_string()))?;

        Self::check_status(response, "permission grant").await?;
        Ok(())
    }

    async fn delete(&self, file_id: &str) -> Result<(), DriveError> {
        let response = self
            .http
            .delete(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| DriveError::Request(e.to_string()))?;

        Self::check_status(response, "delete").await?;
        Ok(())
    }

    fn resolve_url(&self, file_id: &str) -> String {
        format!("{}/d/{}/view", self.share_base_url, file_id)
    }
}
