//! Async access to the synchronous SQLite store.

use std::sync::{Arc, Mutex};

use enquire_store::{Database, StoreError};

use crate::error::ServerError;

/// A [`Database`] shared between request handlers. Every call runs on the
/// blocking pool while holding the connection lock.
#[derive(Clone)]
pub struct SharedDb {
    inner: Arc<Mutex<Database>>,
}

impl SharedDb {
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    /// Run `f` against the database. Only lock poisoning and task failures
    /// surface as errors; whatever `f` returns is passed through.
    pub async fn with<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Database) -> T + Send + 'static,
        T: Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let db = inner
                .lock()
                .map_err(|_| ServerError::Internal("database lock poisoned".into()))?;
            Ok(f(&db))
        })
        .await
        .map_err(|e| ServerError::Internal(format!("database task failed: {e}")))?
    }

    /// Like [`SharedDb::with`] for store operations.
    pub async fn call<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        Ok(self.with(f).await??)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_call_maps_store_errors() {
        let dir = tempfile::tempdir().unwrap();
        let db = SharedDb::new(Database::open_at(&dir.path().join("t.db")).unwrap());

        let counts = db.call(|db| db.inquiry_counts()).await.unwrap();
        assert_eq!(counts.total_count, 0);

        let missing = db.call(|db| db.get_inquiry(42)).await;
        assert!(matches!(missing, Err(ServerError::Store(StoreError::NotFound))));
    }
}
