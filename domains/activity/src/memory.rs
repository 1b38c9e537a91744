//! In-memory activity recorder for tests and local development

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use orgdesk_common::Result;

use crate::domain::entities::ActivityEntry;
use crate::recorder::ActivityRecorder;

#[derive(Debug, Clone, Default)]
pub struct MemoryActivityRecorder {
    entries: Arc<Mutex<Vec<ActivityEntry>>>,
}

impl MemoryActivityRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded entries, oldest first
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

#[async_trait]
impl ActivityRecorder for MemoryActivityRecorder {
    async fn record(&self, entry: ActivityEntry) -> Result<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}
