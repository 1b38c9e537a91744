//! Recorder seam for the activity log
//!
//! Callers treat recording as fire-and-forget: a failed write is logged by
//! the caller and never fails the action it describes.

use async_trait::async_trait;

use orgdesk_common::Result;

use crate::domain::entities::ActivityEntry;

#[async_trait]
pub trait ActivityRecorder: Send + Sync {
    /// Append one entry to the log
    async fn record(&self, entry: ActivityEntry) -> Result<()>;
}
