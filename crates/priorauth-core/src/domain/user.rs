//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Role of a user inside their tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Clinician,
    Staff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Clinician => "clinician",
            UserRole::Staff => "staff",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "clinician" => Some(UserRole::Clinician),
            "staff" => Some(UserRole::Staff),
            _ => None,
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Staff
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 200))]
    pub name: Option<String>,

    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        tenant_id: Uuid,
        email: String,
        name: Option<String>,
        role: UserRole,
    ) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let user = Self {
            id: priorauth_shared::new_id(),
            tenant_id,
            email: email.trim().to_lowercase(),
            name: name.map(|n| n.trim().to_string()),
            role,
            created_at: now,
            updated_at: now,
        };

        user.validate()?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let user = User::new(Uuid::new_v4(), " Doc@Clinic.COM ".into(), None, UserRole::Clinician).unwrap();
        assert_eq!(user.email, "doc@clinic.com");
        assert_eq!(user.role, UserRole::Clinician);
    }

    #[test]
    fn test_invalid_email_rejected() {
        assert!(User::new(Uuid::new_v4(), "not-an-email".into(), None, UserRole::Staff).is_err());
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [UserRole::Admin, UserRole::Clinician, UserRole::Staff] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("owner"), None);
    }
}
