//! Common types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

pub type EntityId = Uuid;

/// Random, non-sequential identifier for every persisted row.
pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// Page request as received from callers (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, page_size: DEFAULT_PAGE_SIZE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 20);
    }

    #[test]
    fn test_page_request_partial_json() {
        let req: PageRequest = serde_json::from_str(r#"{"page": 3}"#).unwrap();
        assert_eq!(req, PageRequest::new(3, 20));
    }

    #[test]
    fn test_new_id_is_random() {
        assert_ne!(new_id(), new_id());
        assert_eq!(new_id().get_version_num(), 4);
    }
}
