//! Orgdesk Drive Service
//!
//! Provides access to the external object store that holds entity attachments
//! (documents, thumbnails, payment proofs):
//! - HTTP client for the production drive REST API
//! - Mock store for testing and development with programmable failures
//! - Configurable provider and per-category destination folders

pub mod http;
pub mod mock;

// Re-export store implementations
pub use http::HttpDriveStore;
pub use mock::{DriveOp, MockDriveBehavior, MockDriveStore, MockObject};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Drive configuration error: {0}")]
    Configuration(String),

    #[error("Drive request error: {0}")]
    Request(String),

    #[error("Drive response error: {0}")]
    Response(String),
}

/// A file body handed to the store for upload
#[derive(Debug, Clone)]
pub struct DriveUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl DriveUpload {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }
}

/// Destination folders for each attachment category
#[derive(Debug, Clone)]
pub struct DriveFolders {
    pub documents: String,
    pub images: String,
    pub proofs: String,
}

impl Default for DriveFolders {
    fn default() -> Self {
        Self {
            documents: "documents".to_string(),
            images: "images".to_string(),
            proofs: "proofs".to_string(),
        }
    }
}

/// Drive service configuration
#[derive(Clone)]
pub struct DriveConfig {
    /// Store provider (http, mock)
    pub provider: String,
    /// Base URL of the drive REST API (required for the http provider)
    pub api_base_url: Option<String>,
    /// Bearer token for the drive REST API (required for the http provider)
    pub access_token: Option<String>,
    /// Base URL for shareable view links
    pub share_base_url: String,
    /// Destination folders
    pub folders: DriveFolders,
}

impl std::fmt::Debug for DriveConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveConfig")
            .field("provider", &self.provider)
            .field("api_base_url", &self.api_base_url)
            .field("share_base_url", &self.share_base_url)
            .field("folders", &self.folders)
            .finish_non_exhaustive()
    }
}

impl DriveConfig {
    /// Create drive config from environment variables
    pub fn from_env() -> Result<Self, DriveError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("DRIVE_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let api_base_url = std::env::var("DRIVE_API_BASE_URL").ok();
        let access_token = std::env::var("DRIVE_ACCESS_TOKEN").ok();
        let share_base_url = std::env::var("DRIVE_SHARE_BASE_URL")
            .unwrap_or_else(|_| "https://drive.example.com/file".to_string());

        let folders = DriveFolders {
            documents: std::env::var("DRIVE_FOLDER_DOCUMENTS")
                .unwrap_or_else(|_| "documents".to_string()),
            images: std::env::var("DRIVE_FOLDER_IMAGES").unwrap_or_else(|_| "images".to_string()),
            proofs: std::env::var("DRIVE_FOLDER_PROOFS").unwrap_or_else(|_| "proofs".to_string()),
        };

        Ok(Self {
            provider,
            api_base_url,
            access_token,
            share_base_url,
            folders,
        })
    }
}

/// Object store trait for different drive backends
#[async_trait::async_trait]
pub trait DriveStore: Send + Sync {
    /// Upload a file into the given folder and return its store-assigned ID.
    async fn upload(
        &self,
        upload: DriveUpload,
        name: &str,
        folder: &str,
    ) -> Result<String, DriveError>;

    /// Rename an existing object.
    async fn rename(&self, file_id: &str, name: &str) -> Result<(), DriveError>;

    /// Mark an object publicly readable.
    async fn allow_public_access(&self, file_id: &str) -> Result<(), DriveError>;

    /// Delete an object.
    async fn delete(&self, file_id: &str) -> Result<(), DriveError>;

    /// Build the shareable view URL for an object ID.
    fn resolve_url(&self, file_id: &str) -> String;
}

/// Factory for creating DriveStore implementations
pub struct DriveServiceFactory;

impl DriveServiceFactory {
    pub fn create(config: DriveConfig) -> Result<Box<dyn DriveStore>, DriveError> {
        match config.provider.as_str() {
            "http" => {
                tracing::info!("Creating HTTP drive store");
                let store = http::HttpDriveStore::new(config)?;
                Ok(Box::new(store))
            }
            "mock" => {
                tracing::info!("Creating mock drive store");
                Ok(Box::new(mock::MockDriveStore::new()))
            }
            provider => Err(DriveError::Configuration(format!(
                "Unknown drive provider: {}. Supported providers: http, mock",
                provider
            ))),
        }
    }
}
