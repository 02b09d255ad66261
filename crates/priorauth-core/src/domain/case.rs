// ============================================================================
// PriorAuth Core - Case Entity
// File: crates/priorauth-core/src/domain/case.rs
// Description: Prior authorization case with extracted data and confidence
// ============================================================================

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Pending,
    Approved,
    Denied,
    MoreInfoNeeded,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "pending",
            CaseStatus::Approved => "approved",
            CaseStatus::Denied => "denied",
            CaseStatus::MoreInfoNeeded => "more_info_needed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CaseStatus::Pending),
            "approved" => Some(CaseStatus::Approved),
            "denied" => Some(CaseStatus::Denied),
            "more_info_needed" => Some(CaseStatus::MoreInfoNeeded),
            _ => None,
        }
    }

    pub fn is_decided(&self) -> bool {
        matches!(self, CaseStatus::Approved | CaseStatus::Denied)
    }
}

impl Default for CaseStatus {
    fn default() -> Self {
        CaseStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl CasePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            CasePriority::Low => "low",
            CasePriority::Normal => "normal",
            CasePriority::High => "high",
            CasePriority::Urgent => "urgent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(CasePriority::Low),
            "normal" => Some(CasePriority::Normal),
            "high" => Some(CasePriority::High),
            "urgent" => Some(CasePriority::Urgent),
            _ => None,
        }
    }
}

impl Default for CasePriority {
    fn default() -> Self {
        CasePriority::Normal
    }
}

/// Extraction confidence: an overall score plus per-field scores, all in [0, 1].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct ConfidenceRecord {
    #[validate(custom(function = "validate_unit_score"))]
    pub overall: f64,

    #[validate(custom(function = "validate_field_scores"))]
    #[serde(default)]
    pub fields: BTreeMap<String, f64>,
}

/// Score within [0, 1]. NaN fails, unlike a `range` check.
pub(crate) fn validate_unit_score(score: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(ValidationError::new("confidence_out_of_range"))
    }
}

fn validate_field_scores(fields: &BTreeMap<String, f64>) -> Result<(), ValidationError> {
    if fields.values().all(|score| (0.0..=1.0).contains(score)) {
        Ok(())
    } else {
        Err(ValidationError::new("field_confidence_out_of_range"))
    }
}

impl ConfidenceRecord {
    pub fn new(overall: f64, fields: BTreeMap<String, f64>) -> Result<Self, validator::ValidationErrors> {
        let record = Self { overall, fields };
        record.validate()?;
        Ok(record)
    }

    /// Fields scoring below `threshold`, lowest first.
    pub fn weak_fields(&self, threshold: f64) -> Vec<(&str, f64)> {
        let mut weak: Vec<(&str, f64)> = self
            .fields
            .iter()
            .filter(|(_, score)| **score < threshold)
            .map(|(name, score)| (name.as_str(), *score))
            .collect();
        weak.sort_by(|a, b| a.1.total_cmp(&b.1));
        weak
    }
}

/// SHA-256 hex digest of a member identifier. Cases never store the raw value.
pub fn hash_member_id(member_id: &str) -> String {
    let digest = Sha256::digest(member_id.trim().as_bytes());
    hex::encode(digest)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub ingestion_id: Option<Uuid>,
    pub created_by: Uuid,
    pub member_id_hash: Option<String>,
    pub payer: Option<String>,
    pub status: CaseStatus,
    pub priority: CasePriority,
    pub extracted_data: serde_json::Value,
    pub confidence: Option<ConfidenceRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    pub fn new(tenant_id: Uuid, created_by: Uuid, priority: CasePriority) -> Self {
        let now = Utc::now();
        Self {
            id: priorauth_shared::new_id(),
            tenant_id,
            ingestion_id: None,
            created_by,
            member_id_hash: None,
            payer: None,
            status: CaseStatus::Pending,
            priority,
            extracted_data: serde_json::Value::Object(Default::default()),
            confidence: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_ingestion(mut self, ingestion_id: Uuid) -> Self {
        self.ingestion_id = Some(ingestion_id);
        self
    }

    pub fn with_member_id(mut self, member_id: &str) -> Self {
        self.member_id_hash = Some(hash_member_id(member_id));
        self
    }

    pub fn with_payer(mut self, payer: impl Into<String>) -> Self {
        self.payer = Some(payer.into());
        self
    }

    pub fn with_extracted_data(mut self, data: serde_json::Value) -> Self {
        self.extracted_data = data;
        self
    }

    pub fn with_confidence(mut self, confidence: ConfidenceRecord) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Checks the confidence record, which the builders accept unchecked.
    pub fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match &self.confidence {
            Some(confidence) => confidence.validate(),
            None => Ok(()),
        }
    }

    pub fn set_status(&mut self, status: CaseStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
