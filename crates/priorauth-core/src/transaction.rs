// ============================================================================
// PriorAuth Core - Transaction Wrapper
// File: crates/priorauth-core/src/transaction.rs
// ============================================================================
//! Run a unit of work inside one store transaction.

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::warn;

use crate::error::DomainError;

/// A store that can hand out transactional handles.
#[async_trait]
pub trait TransactionalStore: Send + Sync {
    type Tx: Send;

    async fn begin(&self) -> Result<Self::Tx, DomainError>;
    async fn commit(&self, tx: Self::Tx) -> Result<(), DomainError>;
    async fn rollback(&self, tx: Self::Tx) -> Result<(), DomainError>;
}

/// Commit when `work` returns `Ok`; roll back and return the very same
/// error when it returns `Err`. A failed rollback is logged and the original
/// error still wins. Isolation is whatever the store provides.
pub async fn run_in_transaction<S, T, E, F>(store: &S, work: F) -> Result<T, E>
where
    S: TransactionalStore + ?Sized,
    F: for<'t> FnOnce(&'t mut S::Tx) -> BoxFuture<'t, Result<T, E>> + Send,
    E: From<DomainError>,
{
    let mut tx = store.begin().await?;

    match work(&mut tx).await {
        Ok(value) => {
            store.commit(tx).await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = store.rollback(tx).await {
                warn!("Rollback failed after unit of work error: {}", rollback_err);
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use uuid::Uuid;

    use crate::domain::{Case, CasePriority};

    /// Writes are buffered in the transaction and applied on commit.
    #[derive(Default)]
    struct MemoryStore {
        cases: Mutex<Vec<Case>>,
        rollbacks: Mutex<u32>,
    }

    #[async_trait]
    impl TransactionalStore for MemoryStore {
        type Tx = Vec<Case>;

        async fn begin(&self) -> Result<Vec<Case>, DomainError> {
            Ok(Vec::new())
        }

        async fn commit(&self, tx: Vec<Case>) -> Result<(), DomainError> {
            self.cases.lock().unwrap().extend(tx);
            Ok(())
        }

        async fn rollback(&self, _tx: Vec<Case>) -> Result<(), DomainError> {
            *self.rollbacks.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn new_case() -> Case {
        Case::new(Uuid::new_v4(), Uuid::new_v4(), CasePriority::Normal)
    }

    #[tokio::test]
    async fn test_success_commits_and_returns_result() {
        let store = MemoryStore::default();
        let case = new_case();
        let case_id = case.id;

        let result: Result<Uuid, DomainError> = run_in_transaction(&store, move |tx| {
            Box::pin(async move {
                tx.push(case);
                Ok(case_id)
            })
        })
        .await;

        let returned = result.unwrap();

        assert_eq!(returned, case_id);
        let persisted = store.cases.lock().unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id, case_id);
    }

    #[tokio::test]
    async fn test_error_after_write_persists_nothing() {
        let store = MemoryStore::default();
        let case = new_case();

        let result: Result<(), DomainError> = run_in_transaction(&store, move |tx| {
            Box::pin(async move {
                tx.push(case);
                Err(DomainError::ValidationError("payer missing".into()))
            })
        })
        .await;

        match result {
            Err(DomainError::ValidationError(msg)) => assert_eq!(msg, "payer missing"),
            other => panic!("expected the unit of work's error, got {:?}", other),
        }
        assert!(store.cases.lock().unwrap().is_empty());
        assert_eq!(*store.rollbacks.lock().unwrap(), 1);
    }

    #[derive(Debug, PartialEq)]
    enum IntakeError {
        Store(String),
        Rejected(u32),
    }

    impl From<DomainError> for IntakeError {
        fn from(err: DomainError) -> Self {
            IntakeError::Store(err.to_string())
        }
    }

    #[tokio::test]
    async fn test_caller_error_type_is_preserved() {
        let store = MemoryStore::default();

        let result: Result<(), IntakeError> = run_in_transaction(&store, |_tx| {
            Box::pin(async move { Err(IntakeError::Rejected(42)) })
        })
        .await;

        assert_eq!(result, Err(IntakeError::Rejected(42)));
    }

    struct BrokenRollback;

    #[async_trait]
    impl TransactionalStore for BrokenRollback {
        type Tx = ();

        async fn begin(&self) -> Result<(), DomainError> {
            Ok(())
        }

        async fn commit(&self, _tx: ()) -> Result<(), DomainError> {
            Ok(())
        }

        async fn rollback(&self, _tx: ()) -> Result<(), DomainError> {
            Err(DomainError::DatabaseError("connection lost".into()))
        }
    }

    #[tokio::test]
    async fn test_original_error_wins_over_rollback_failure() {
        let result: Result<(), DomainError> = run_in_transaction(&BrokenRollback, |_tx| {
            Box::pin(async move { Err(DomainError::CaseNotFound(Uuid::nil())) })
        })
        .await;

        assert!(matches!(result, Err(DomainError::CaseNotFound(id)) if id.is_nil()));
    }
}
