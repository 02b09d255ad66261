//! Ingestion domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl IngestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionStatus::Pending => "pending",
            IngestionStatus::Processing => "processing",
            IngestionStatus::Completed => "completed",
            IngestionStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(IngestionStatus::Pending),
            "processing" => Some(IngestionStatus::Processing),
            "completed" => Some(IngestionStatus::Completed),
            "failed" => Some(IngestionStatus::Failed),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, IngestionStatus::Completed | IngestionStatus::Failed)
    }
}

impl Default for IngestionStatus {
    fn default() -> Self {
        IngestionStatus::Pending
    }
}

/// Where an intake came from. Serialized as `{"email": {..}}` or `{"pdf": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMetadata {
    Email(EmailSource),
    Pdf(PdfSource),
}

impl SourceMetadata {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceMetadata::Email(_) => "email",
            SourceMetadata::Pdf(_) => "pdf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailSource {
    pub from: String,
    pub subject: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfSource {
    pub filename: String,
    pub pages: u32,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingestion {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub status: IngestionStatus,
    pub source: Option<SourceMetadata>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingestion {
    pub fn new(tenant_id: Uuid, source: Option<SourceMetadata>) -> Self {
        let now = Utc::now();
        Self {
            id: priorauth_shared::new_id(),
            tenant_id,
            status: IngestionStatus::Pending,
            source,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: IngestionStatus, error_message: Option<String>) {
        self.status = status;
        self.error_message = error_message;
        self.updated_at = Utc::now();
    }
}
