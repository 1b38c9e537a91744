//! Domain entities for the Content domain
//!
//! The six reviewable entity kinds share a publication lifecycle: they are
//! drafted by a member, submitted for review (PENDING), and either published
//! or sent back to draft by a reviewer's decision. Each kind carries one
//! nullable asset-reference column pointing at an externally stored file.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use orgdesk_common::{Error, Result};

/// The closed set of reviewable entity kinds.
///
/// Canonical wire and storage tags are SCREAMING_SNAKE (`WORK_PROGRAM`,
/// `EVENT`, ...). Approval request rows store the tag as raw text, so
/// parsing stays fallible at that boundary — see `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    WorkProgram,
    Event,
    Finance,
    Document,
    Article,
    Letter,
}

impl EntityKind {
    /// All kinds, for exhaustive iteration in tests and bulk tooling
    pub const ALL: [EntityKind; 6] = [
        EntityKind::WorkProgram,
        EntityKind::Event,
        EntityKind::Finance,
        EntityKind::Document,
        EntityKind::Article,
        EntityKind::Letter,
    ];

    /// Canonical storage tag
    pub fn tag(&self) -> &'static str {
        match self {
            EntityKind::WorkProgram => "WORK_PROGRAM",
            EntityKind::Event => "EVENT",
            EntityKind::Finance => "FINANCE",
            EntityKind::Document => "DOCUMENT",
            EntityKind::Article => "ARTICLE",
            EntityKind::Letter => "LETTER",
        }
    }

    /// Table that stores records of this kind
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::WorkProgram => "work_programs",
            EntityKind::Event => "events",
            EntityKind::Finance => "finances",
            EntityKind::Document => "documents",
            EntityKind::Article => "articles",
            EntityKind::Letter => "letters",
        }
    }

    /// Column holding the external asset reference for this kind
    pub fn asset_column(&self) -> &'static str {
        match self {
            EntityKind::Finance => "proof_file_id",
            EntityKind::Article => "thumbnail_id",
            EntityKind::WorkProgram
            | EntityKind::Event
            | EntityKind::Document
            | EntityKind::Letter => "file_id",
        }
    }
}

impl std::fmt::Display for EntityKind {
    #[mutants::skip] // Delegates to tag(), which the parse round-trip tests already cover
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = Error;

    /// Parse a kind tag. Case-insensitive; accepts `-` for `_` so route
    /// segments like `work-program` resolve too.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "WORK_PROGRAM" => Ok(EntityKind::WorkProgram),
            "EVENT" => Ok(EntityKind::Event),
            "FINANCE" => Ok(EntityKind::Finance),
            "DOCUMENT" => Ok(EntityKind::Document),
            "ARTICLE" => Ok(EntityKind::Article),
            "LETTER" => Ok(EntityKind::Letter),
            _ => Err(Error::Validation(format!("Unknown entity kind: {}", s))),
        }
    }
}

/// Publication status shared by all entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "publish_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishStatus {
    #[default]
    Draft,
    Pending,
    Publish,
}

impl std::fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishStatus::Draft => write!(f, "DRAFT"),
            PublishStatus::Pending => write!(f, "PENDING"),
            PublishStatus::Publish => write!(f, "PUBLISH"),
        }
    }
}

/// The slice of an entity the workflow engine reads: enough to verify
/// existence, inspect the current asset reference, and describe the entity
/// in audit entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EntitySummary {
    pub id: Uuid,
    pub title: String,
    pub status: PublishStatus,
    pub asset_ref: Option<String>,
    pub created_by: Uuid,
}

fn validate_title(title: &str) -> Result<()> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("Title must not be empty".to_string()));
    }
    if trimmed.len() > 255 {
        return Err(Error::Validation(
            "Title must be 1-255 characters".to_string(),
        ));
    }
    Ok(())
}

/// Annual or periodic work program of the organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkProgram {
    pub id: Uuid,
    pub title: String,
    pub period: String,
    pub status: PublishStatus,
    pub file_id: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkProgram {
    pub fn new(title: String, period: String, created_by: Uuid) -> Result<Self> {
        validate_title(&title)?;
        if period.trim().is_empty() {
            return Err(Error::Validation("Period must not be empty".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            period,
            status: PublishStatus::default(),
            file_id: None,
            created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

/// Organization event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub status: PublishStatus,
    pub file_id: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(title: String, starts_at: DateTime<Utc>, created_by: Uuid) -> Result<Self> {
        validate_title(&title)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            starts_at,
            status: PublishStatus::default(),
            file_id: None,
            created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

/// Financial record with an attached payment proof
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Finance {
    pub id: Uuid,
    pub title: String,
    pub amount: Decimal,
    pub status: PublishStatus,
    pub proof_file_id: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Finance {
    pub fn new(title: String, amount: Decimal, created_by: Uuid) -> Result<Self> {
        validate_title(&title)?;
        if amount.is_sign_negative() {
            return Err(Error::Validation(
                "Amount must not be negative".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            amount,
            status: PublishStatus::default(),
            proof_file_id: None,
            created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

/// Archived organizational document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub status: PublishStatus,
    pub file_id: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(title: String, created_by: Uuid) -> Result<Self> {
        validate_title(&title)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            status: PublishStatus::default(),
            file_id: None,
            created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

/// Published article. Besides the shared status column, articles carry an
/// explicit publication flag and timestamp that the public site reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub status: PublishStatus,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_id: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn new(title: String, body: String, created_by: Uuid) -> Result<Self> {
        validate_title(&title)?;
        if body.trim().is_empty() {
            return Err(Error::Validation("Body must not be empty".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            body,
            status: PublishStatus::default(),
            is_published: false,
            published_at: None,
            thumbnail_id: None,
            created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

/// Incoming or outgoing letter with its registry number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Letter {
    pub id: Uuid,
    pub title: String,
    pub reference_number: String,
    pub status: PublishStatus,
    pub file_id: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Letter {
    pub fn new(title: String, reference_number: String, created_by: Uuid) -> Result<Self> {
        validate_title(&title)?;
        if reference_number.trim().is_empty() {
            return Err(Error::Validation(
                "Reference number must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            reference_number,
            status: PublishStatus::default(),
            file_id: None,
            created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}
