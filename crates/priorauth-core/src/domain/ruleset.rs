//! Payer/procedure rules used to prepare a submission

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Structured rules stored as JSON on a ruleset row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RulesContent {
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub documentation: Vec<String>,
    pub typical_turnaround: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Ruleset {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub payer: String,

    #[validate(length(min = 1, max = 200))]
    pub procedure: String,

    pub rules: RulesContent,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ruleset {
    pub fn new(
        tenant_id: Uuid,
        payer: String,
        procedure: String,
        rules: RulesContent,
    ) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let ruleset = Self {
            id: priorauth_shared::new_id(),
            tenant_id,
            payer: payer.trim().to_string(),
            procedure: procedure.trim().to_string(),
            rules,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        ruleset.validate()?;
        Ok(ruleset)
    }
}
