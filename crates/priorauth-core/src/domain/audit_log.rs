//! Append-only compliance record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Acting user; `None` for system actions.
    pub user_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        tenant_id: Uuid,
        user_id: Option<Uuid>,
        action: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: Uuid,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: priorauth_shared::new_id(),
            tenant_id,
            user_id,
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id,
            details,
            created_at: Utc::now(),
        }
    }
}
