//! In-memory approval ledger for tests and local development

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use orgdesk_common::Result;

use crate::domain::entities::{ApprovalRequest, ApprovalStatus};
use crate::ledger::ApprovalLedger;

#[derive(Debug, Clone, Default)]
pub struct MemoryApprovalLedger {
    requests: Arc<Mutex<HashMap<Uuid, ApprovalRequest>>>,
}

impl MemoryApprovalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a request row directly, bypassing the service path
    pub fn seed(&self, request: ApprovalRequest) -> Uuid {
        let id = request.id;
        self.requests.lock().unwrap().insert(id, request);
        id
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ApprovalLedger for MemoryApprovalLedger {
    async fn find(&self, id: Uuid) -> Result<Option<ApprovalRequest>> {
        Ok(self.requests.lock().unwrap().get(&id).cloned())
    }

    async fn find_for_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Option<ApprovalRequest>> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .values()
            .find(|r| r.entity_type == entity_type && r.entity_id == entity_id)
            .cloned())
    }

    async fn insert(&self, request: &ApprovalRequest) -> Result<ApprovalRequest> {
        self.requests
            .lock()
            .unwrap()
            .insert(request.id, request.clone());
        Ok(request.clone())
    }

    async fn update_submission(
        &self,
        id: Uuid,
        note: Option<&str>,
    ) -> Result<Option<ApprovalRequest>> {
        let mut requests = self.requests.lock().unwrap();
        Ok(requests.get_mut(&id).map(|request| {
            request.status = ApprovalStatus::Pending;
            request.note = note.map(str::to_string);
            request.updated_at = Utc::now();
            request.clone()
        }))
    }

    async fn update_decision(
        &self,
        id: Uuid,
        status: ApprovalStatus,
        note: Option<&str>,
    ) -> Result<Option<ApprovalRequest>> {
        let mut requests = self.requests.lock().unwrap();
        Ok(requests.get_mut(&id).map(|request| {
            request.status = status;
            request.note = note.map(str::to_string);
            request.updated_at = Utc::now();
            request.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.requests.lock().unwrap().remove(&id).is_some())
    }

    async fn delete_for_entity(&self, entity_type: &str, entity_id: Uuid) -> Result<u64> {
        let mut requests = self.requests.lock().unwrap();
        let before = requests.len();
        requests.retain(|_, r| !(r.entity_type == entity_type && r.entity_id == entity_id));
        Ok((before - requests.len()) as u64)
    }
}
