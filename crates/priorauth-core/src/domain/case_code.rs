//! Procedure/diagnosis code attached to a case

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CaseCode {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub case_id: Uuid,

    #[validate(length(min = 1, max = 20, message = "Code must be between 1 and 20 characters"))]
    pub code: String,

    /// Code system tag, e.g. `cpt`, `hcpcs`, `icd10`.
    #[validate(length(min = 1, max = 20))]
    pub code_type: String,

    #[validate(custom(function = "crate::domain::case::validate_unit_score"))]
    pub confidence: Option<f64>,

    pub created_at: DateTime<Utc>,
}

impl CaseCode {
    pub fn new(
        tenant_id: Uuid,
        case_id: Uuid,
        code: String,
        code_type: String,
        confidence: Option<f64>,
    ) -> Result<Self, validator::ValidationErrors> {
        let case_code = Self {
            id: priorauth_shared::new_id(),
            tenant_id,
            case_id,
            code: code.trim().to_uppercase(),
            code_type: code_type.trim().to_lowercase(),
            confidence,
            created_at: Utc::now(),
        };

        case_code.validate()?;
        Ok(case_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_normalization() {
        let code = CaseCode::new(Uuid::new_v4(), Uuid::new_v4(), " 72148 ".into(), "CPT".into(), Some(0.88)).unwrap();
        assert_eq!(code.code, "72148");
        assert_eq!(code.code_type, "cpt");
    }

    #[test]
    fn test_confidence_out_of_range() {
        assert!(CaseCode::new(Uuid::new_v4(), Uuid::new_v4(), "J1745".into(), "hcpcs".into(), Some(1.5)).is_err());
        assert!(CaseCode::new(Uuid::new_v4(), Uuid::new_v4(), "".into(), "cpt".into(), None).is_err());
        assert!(CaseCode::new(Uuid::new_v4(), Uuid::new_v4(), "J1745".into(), "hcpcs".into(), Some(f64::NAN)).is_err());
    }
}
