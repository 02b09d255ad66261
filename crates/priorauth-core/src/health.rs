//! Store liveness probe

use async_trait::async_trait;
use tracing::error;

use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// One minimal round trip to the store.
    async fn ping(&self) -> Result<(), DomainError>;
}

/// `true` when the store answers, `false` otherwise. Never returns an error.
pub async fn check_health<P: HealthProbe + ?Sized>(probe: &P) -> bool {
    match probe.ping().await {
        Ok(()) => true,
        Err(e) => {
            error!("Database health check failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reachable_store_is_always_healthy() {
        let mut probe = MockHealthProbe::new();
        probe.expect_ping().times(3).returning(|| Ok(()));

        for _ in 0..3 {
            assert!(check_health(&probe).await);
        }
    }

    #[tokio::test]
    async fn test_unreachable_store_is_never_healthy() {
        let mut probe = MockHealthProbe::new();
        probe
            .expect_ping()
            .times(3)
            .returning(|| Err(DomainError::DatabaseError("connection refused".into())));

        for _ in 0..3 {
            assert!(!check_health(&probe).await);
        }
    }
}
