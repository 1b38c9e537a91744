//! In-memory entity directory
//!
//! Backs the workflow engine in tests and local development without a
//! database. Records are held per kind so tests can seed full entities and
//! assert every field the engine writes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use orgdesk_common::Result;

use crate::directory::EntityDirectory;
use crate::domain::entities::{
    Article, Document, EntityKind, EntitySummary, Event, Finance, Letter, PublishStatus,
    WorkProgram,
};
use crate::domain::state::PublishTransition;

/// In-memory directory over six per-kind maps
#[derive(Debug, Clone, Default)]
pub struct MemoryEntityDirectory {
    work_programs: Arc<Mutex<HashMap<Uuid, WorkProgram>>>,
    events: Arc<Mutex<HashMap<Uuid, Event>>>,
    finances: Arc<Mutex<HashMap<Uuid, Finance>>>,
    documents: Arc<Mutex<HashMap<Uuid, Document>>>,
    articles: Arc<Mutex<HashMap<Uuid, Article>>>,
    letters: Arc<Mutex<HashMap<Uuid, Letter>>>,
}

impl MemoryEntityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_work_program(&self, record: WorkProgram) -> Uuid {
        let id = record.id;
        self.work_programs.lock().unwrap().insert(id, record);
        id
    }

    pub fn insert_event(&self, record: Event) -> Uuid {
        let id = record.id;
        self.events.lock().unwrap().insert(id, record);
        id
    }

    pub fn insert_finance(&self, record: Finance) -> Uuid {
        let id = record.id;
        self.finances.lock().unwrap().insert(id, record);
        id
    }

    pub fn insert_document(&self, record: Document) -> Uuid {
        let id = record.id;
        self.documents.lock().unwrap().insert(id, record);
        id
    }

    pub fn insert_article(&self, record: Article) -> Uuid {
        let id = record.id;
        self.articles.lock().unwrap().insert(id, record);
        id
    }

    pub fn insert_letter(&self, record: Letter) -> Uuid {
        let id = record.id;
        self.letters.lock().unwrap().insert(id, record);
        id
    }

    pub fn work_program(&self, id: Uuid) -> Option<WorkProgram> {
        self.work_programs.lock().unwrap().get(&id).cloned()
    }

    pub fn event(&self, id: Uuid) -> Option<Event> {
        self.events.lock().unwrap().get(&id).cloned()
    }

    pub fn finance(&self, id: Uuid) -> Option<Finance> {
        self.finances.lock().unwrap().get(&id).cloned()
    }

    pub fn document(&self, id: Uuid) -> Option<Document> {
        self.documents.lock().unwrap().get(&id).cloned()
    }

    pub fn article(&self, id: Uuid) -> Option<Article> {
        self.articles.lock().unwrap().get(&id).cloned()
    }

    pub fn letter(&self, id: Uuid) -> Option<Letter> {
        self.letters.lock().unwrap().get(&id).cloned()
    }

    /// Current status regardless of kind, if the record exists
    pub fn status_of(&self, kind: EntityKind, id: Uuid) -> Option<PublishStatus> {
        match kind {
            EntityKind::WorkProgram => self.work_program(id).map(|r| r.status),
            EntityKind::Event => self.event(id).map(|r| r.status),
            EntityKind::Finance => self.finance(id).map(|r| r.status),
            EntityKind::Document => self.document(id).map(|r| r.status),
            EntityKind::Article => self.article(id).map(|r| r.status),
            EntityKind::Letter => self.letter(id).map(|r| r.status),
        }
    }

    /// Current asset reference regardless of kind, if the record exists
    pub fn asset_ref_of(&self, kind: EntityKind, id: Uuid) -> Option<Option<String>> {
        match kind {
            EntityKind::WorkProgram => self.work_program(id).map(|r| r.file_id),
            EntityKind::Event => self.event(id).map(|r| r.file_id),
            EntityKind::Finance => self.finance(id).map(|r| r.proof_file_id),
            EntityKind::Document => self.document(id).map(|r| r.file_id),
            EntityKind::Article => self.article(id).map(|r| r.thumbnail_id),
            EntityKind::Letter => self.letter(id).map(|r| r.file_id),
        }
    }

    fn with_record<R>(
        &self,
        kind: EntityKind,
        id: Uuid,
        f: impl FnOnce(RecordMut<'_>) -> R,
    ) -> Option<R> {
        match kind {
            EntityKind::WorkProgram => {
                let mut map = self.work_programs.lock().unwrap();
                map.get_mut(&id).map(|r| f(RecordMut::WorkProgram(r)))
            }
            EntityKind::Event => {
                let mut map = self.events.lock().unwrap();
                map.get_mut(&id).map(|r| f(RecordMut::Event(r)))
            }
            EntityKind::Finance => {
                let mut map = self.finances.lock().unwrap();
                map.get_mut(&id).map(|r| f(RecordMut::Finance(r)))
            }
            EntityKind::Document => {
                let mut map = self.documents.lock().unwrap();
                map.get_mut(&id).map(|r| f(RecordMut::Document(r)))
            }
            EntityKind::Article => {
                let mut map = self.articles.lock().unwrap();
                map.get_mut(&id).map(|r| f(RecordMut::Article(r)))
            }
            EntityKind::Letter => {
                let mut map = self.letters.lock().unwrap();
                map.get_mut(&id).map(|r| f(RecordMut::Letter(r)))
            }
        }
    }
}

/// Mutable view over one record of any kind
enum RecordMut<'a> {
    WorkProgram(&'a mut WorkProgram),
    Event(&'a mut Event),
    Finance(&'a mut Finance),
    Document(&'a mut Document),
    Article(&'a mut Article),
    Letter(&'a mut Letter),
}

impl RecordMut<'_> {
    fn set_status(&mut self, status: PublishStatus) {
        let now = Utc::now();
        match self {
            RecordMut::WorkProgram(r) => {
                r.status = status;
                r.updated_at = now;
            }
            RecordMut::Event(r) => {
                r.status = status;
                r.updated_at = now;
            }
            RecordMut::Finance(r) => {
                r.status = status;
                r.updated_at = now;
            }
            RecordMut::Document(r) => {
                r.status = status;
                r.updated_at = now;
            }
            RecordMut::Article(r) => {
                r.status = status;
                r.updated_at = now;
            }
            RecordMut::Letter(r) => {
                r.status = status;
                r.updated_at = now;
            }
        }
    }

    fn set_asset_ref(&mut self, value: Option<String>) {
        let now = Utc::now();
        match self {
            RecordMut::WorkProgram(r) => {
                r.file_id = value;
                r.updated_at = now;
            }
            RecordMut::Event(r) => {
                r.file_id = value;
                r.updated_at = now;
            }
            RecordMut::Finance(r) => {
                r.proof_file_id = value;
                r.updated_at = now;
            }
            RecordMut::Document(r) => {
                r.file_id = value;
                r.updated_at = now;
            }
            RecordMut::Article(r) => {
                r.thumbnail_id = value;
                r.updated_at = now;
            }
            RecordMut::Letter(r) => {
                r.file_id = value;
                r.updated_at = now;
            }
        }
    }

    fn summary(&self) -> EntitySummary {
        match self {
            RecordMut::WorkProgram(r) => EntitySummary {
                id: r.id,
                title: r.title.clone(),
                status: r.status,
                asset_ref: r.file_id.clone(),
                created_by: r.created_by,
            },
            RecordMut::Event(r) => EntitySummary {
                id: r.id,
                title: r.title.clone(),
                status: r.status,
                asset_ref: r.file_id.clone(),
                created_by: r.created_by,
            },
            RecordMut::Finance(r) => EntitySummary {
                id: r.id,
                title: r.title.clone(),
                status: r.status,
                asset_ref: r.proof_file_id.clone(),
                created_by: r.created_by,
            },
            RecordMut::Document(r) => EntitySummary {
                id: r.id,
                title: r.title.clone(),
                status: r.status,
                asset_ref: r.file_id.clone(),
                created_by: r.created_by,
            },
            RecordMut::Article(r) => EntitySummary {
                id: r.id,
                title: r.title.clone(),
                status: r.status,
                asset_ref: r.thumbnail_id.clone(),
                created_by: r.created_by,
            },
            RecordMut::Letter(r) => EntitySummary {
                id: r.id,
                title: r.title.clone(),
                status: r.status,
                asset_ref: r.file_id.clone(),
                created_by: r.created_by,
            },
        }
    }
}

#[async_trait::async_trait]
impl EntityDirectory for MemoryEntityDirectory {
    async fn find_summary(&self, kind: EntityKind, id: Uuid) -> Result<Option<EntitySummary>> {
        Ok(self.with_record(kind, id, |r| r.summary()))
    }

    async fn set_status(&self, kind: EntityKind, id: Uuid, status: PublishStatus) -> Result<bool> {
        Ok(self
            .with_record(kind, id, |mut r| r.set_status(status))
            .is_some())
    }

    async fn apply_transition(
        &self,
        kind: EntityKind,
        id: Uuid,
        transition: &PublishTransition,
    ) -> Result<bool> {
        let updated = self.with_record(kind, id, |mut r| {
            r.set_status(transition.status);
            if let (RecordMut::Article(article), Some(flags)) = (&mut r, transition.article) {
                article.is_published = flags.is_published;
                article.published_at = flags.published_at;
            }
        });
        Ok(updated.is_some())
    }

    async fn set_asset_ref(&self, kind: EntityKind, id: Uuid, file_id: &str) -> Result<bool> {
        Ok(self
            .with_record(kind, id, |mut r| {
                r.set_asset_ref(Some(file_id.to_string()))
            })
            .is_some())
    }

    async fn clear_asset_ref(&self, kind: EntityKind, id: Uuid) -> Result<bool> {
        Ok(self
            .with_record(kind, id, |mut r| r.set_asset_ref(None))
            .is_some())
    }

    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<bool> {
        let removed = match kind {
            EntityKind::WorkProgram => self.work_programs.lock().unwrap().remove(&id).is_some(),
            EntityKind::Event => self.events.lock().unwrap().remove(&id).is_some(),
            EntityKind::Finance => self.finances.lock().unwrap().remove(&id).is_some(),
            EntityKind::Document => self.documents.lock().unwrap().remove(&id).is_some(),
            EntityKind::Article => self.articles.lock().unwrap().remove(&id).is_some(),
            EntityKind::Letter => self.letters.lock().unwrap().remove(&id).is_some(),
        };
        Ok(removed)
    }
}
