//! Mock Drive Store Implementation
//!
//! Provides an in-memory object store for testing without the external drive
//! API. Failures are programmable per operation, and every call is recorded
//! in order so tests can assert sequencing (e.g. attach-before-delete during
//! a replace).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use uuid::Uuid;

use crate::{DriveError, DriveStore, DriveUpload};

/// Object held by the mock store
#[derive(Debug, Clone)]
pub struct MockObject {
    pub name: String,
    pub folder: String,
    pub public: bool,
    pub size_bytes: usize,
    pub content_type: String,
}

/// A recorded store operation, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveOp {
    Upload {
        id: String,
        name: String,
        folder: String,
    },
    Rename {
        id: String,
        name: String,
    },
    AllowPublicAccess {
        id: String,
    },
    Delete {
        id: String,
    },
}

/// Programmable failure switches for the mock store
#[derive(Debug, Clone, Default)]
pub struct MockDriveBehavior {
    pub fail_upload: Arc<RwLock<bool>>,
    pub fail_rename: Arc<RwLock<bool>>,
    pub fail_public_access: Arc<RwLock<bool>>,
    pub fail_delete: Arc<RwLock<bool>>,
}

impl MockDriveBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_upload(&self, fail: bool) {
        *self.fail_upload.write().unwrap() = fail;
    }

    pub fn set_fail_rename(&self, fail: bool) {
        *self.fail_rename.write().unwrap() = fail;
    }

    pub fn set_fail_public_access(&self, fail: bool) {
        *self.fail_public_access.write().unwrap() = fail;
    }

    pub fn set_fail_delete(&self, fail: bool) {
        *self.fail_delete.write().unwrap() = fail;
    }

    /// Restore default behavior (everything succeeds)
    pub fn reset(&self) {
        self.set_fail_upload(false);
        self.set_fail_rename(false);
        self.set_fail_public_access(false);
        self.set_fail_delete(false);
    }
}

/// Mock drive store for testing
#[derive(Debug, Clone)]
pub struct MockDriveStore {
    pub behavior: MockDriveBehavior,
    objects: Arc<Mutex<HashMap<String, MockObject>>>,
    operations: Arc<Mutex<Vec<DriveOp>>>,
}

impl MockDriveStore {
    /// Create a new mock drive store
    pub fn new() -> Self {
        Self {
            behavior: MockDriveBehavior::new(),
            objects: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-load an object, as if it had been uploaded earlier
    pub fn seed_object(&self, id: &str, name: &str, folder: &str) {
        self.objects.lock().unwrap().insert(
            id.to_string(),
            MockObject {
                name: name.to_string(),
                folder: folder.to_string(),
                public: true,
                size_bytes: 0,
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// Get a stored object by ID
    pub fn object(&self, id: &str) -> Option<MockObject> {
        self.objects.lock().unwrap().get(id).cloned()
    }

    /// Whether an object with this ID exists
    pub fn contains(&self, id: &str) -> bool {
        self.objects.lock().unwrap().contains_key(id)
    }

    /// Number of stored objects
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// All recorded operations, in call order
    pub fn operations(&self) -> Vec<DriveOp> {
        self.operations.lock().unwrap().clone()
    }

    /// Clear stored objects and the operation log
    pub fn clear(&self) {
        self.objects.lock().unwrap().clear();
        self.operations.lock().unwrap().clear();
    }

    fn record(&self, op: DriveOp) {
        self.operations.lock().unwrap().push(op);
    }
}

impl Default for MockDriveStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DriveStore for MockDriveStore {
    async fn upload(
        &self,
        upload: DriveUpload,
        name: &str,
        folder: &str,
    ) -> Result<String, DriveError> {
        if *self.behavior.fail_upload.read().unwrap() {
            return Err(DriveError::Request("mock upload failure".to_string()));
        }

        let id = format!("mock-{}", Uuid::new_v4());
        self.objects.lock().unwrap().insert(
            id.clone(),
            MockObject {
                name: name.to_string(),
                folder: folder.to_string(),
                public: false,
                size_bytes: upload.bytes.len(),
                content_type: upload.content_type,
            },
        );
        self.record(DriveOp::Upload {
            id: id.clone(),
            name: name.to_string(),
            folder: folder.to_string(),
        });

        tracing::debug!(file_id = %id, "Mock drive store captured upload");
        Ok(id)
    }

    async fn rename(&self, file_id: &str, name: &str) -> Result<(), DriveError> {
        if *self.behavior.fail_rename.read().unwrap() {
            return Err(DriveError::Request("mock rename failure".to_string()));
        }

        let mut objects = self.objects.lock().unwrap();
        let object = objects
            .get_mut(file_id)
            .ok_or_else(|| DriveError::Response(format!("No such object: {}", file_id)))?;
        object.name = name.to_string();
        drop(objects);

        self.record(DriveOp::Rename {
            id: file_id.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    async fn allow_public_access(&self, file_id: &str) -> Result<(), DriveError> {
        if *self.behavior.fail_public_access.read().unwrap() {
            return Err(DriveError::Request(
                "mock permission grant failure".to_string(),
            ));
        }

        let mut objects = self.objects.lock().unwrap();
        let object = objects
            .get_mut(file_id)
            .ok_or_else(|| DriveError::Response(format!("No such object: {}", file_id)))?;
        object.public = true;
        drop(objects);

        self.record(DriveOp::AllowPublicAccess {
            id: file_id.to_string(),
        });
        Ok(())
    }

    async fn delete(&self, file_id: &str) -> Result<(), DriveError> {
        if *self.behavior.fail_delete.read().unwrap() {
            return Err(DriveError::Request("mock delete failure".to_string()));
        }

        let removed = self.objects.lock().unwrap().remove(file_id);
        if removed.is_none() {
            return Err(DriveError::Response(format!("No such object: {}", file_id)));
        }

        self.record(DriveOp::Delete {
            id: file_id.to_string(),
        });
        Ok(())
    }

    fn resolve_url(&self, file_id: &str) -> String {
        format!("https://drive.example.com/file/d/{}/view", file_id)
    }
}
