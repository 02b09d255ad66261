//! Append-only state change log entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        tenant_id: Uuid,
        event_type: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: Uuid,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: priorauth_shared::new_id(),
            tenant_id,
            event_type: event_type.into(),
            entity_type: entity_type.into(),
            entity_id,
            payload,
            created_at: Utc::now(),
        }
    }
}
