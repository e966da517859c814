//! Persistence gateway for the single quiz snapshot slot.

use std::sync::Arc;

use quiz_core::model::QuizSnapshot;
use thiserror::Error;

use crate::repository::{SlotStore, StorageError};

/// Failures of `save`/`clear`. Callers treat these as non-fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error("could not encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not write snapshot: {0}")]
    Write(#[source] StorageError),

    #[error("could not clear snapshot: {0}")]
    Clear(#[source] StorageError),
}

/// Reads and writes one [`QuizSnapshot`] as JSON text under a well-known key.
///
/// There is no locking or versioning: the last writer wins, and anything that
/// does not parse as a valid snapshot reads back as "no snapshot".
#[derive(Clone)]
pub struct SnapshotGateway {
    slots: Arc<dyn SlotStore>,
    key: String,
}

impl SnapshotGateway {
    #[must_use]
    pub fn new(slots: Arc<dyn SlotStore>, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize `snapshot` and overwrite the slot.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if encoding or the write fails.
    pub async fn save(&self, snapshot: &QuizSnapshot) -> Result<(), PersistenceError> {
        let text = serde_json::to_string(snapshot)?;
        self.slots
            .write_slot(&self.key, &text)
            .await
            .map_err(PersistenceError::Write)
    }

    /// Read the slot back. Empty, unreadable, unparsable and invalid all yield `None`.
    pub async fn load(&self) -> Option<QuizSnapshot> {
        let text = match self.slots.read_slot(&self.key).await {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "snapshot read failed");
                return None;
            }
        };

        let snapshot: QuizSnapshot = match serde_json::from_str(&text) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "discarding unparsable snapshot");
                return None;
            }
        };

        if let Err(err) = snapshot.validate() {
            tracing::warn!(key = %self.key, error = %err, "discarding invalid snapshot");
            return None;
        }
        Some(snapshot)
    }

    /// Remove the slot. Clearing an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Clear` if the backend rejects the removal.
    pub async fn clear(&self) -> Result<(), PersistenceError> {
        self.slots
            .remove_slot(&self.key)
            .await
            .map_err(PersistenceError::Clear)
    }
}

impl std::fmt::Debug for SnapshotGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotGateway")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemorySlotStore;
    use async_trait::async_trait;
    use quiz_core::model::{PlayerName, Question, QuizAttempt, SessionPhase};
    use quiz_core::time::fixed_now;

    struct UnavailableSlots;

    #[async_trait]
    impl SlotStore for UnavailableSlots {
        async fn read_slot(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        async fn write_slot(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }

        async fn remove_slot(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }
    }

    fn snapshot() -> QuizSnapshot {
        let questions = (0..10)
            .map(|n| {
                Question::new(
                    format!("Q{n}"),
                    "a",
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    "General",
                    "easy",
                )
                .unwrap()
            })
            .collect();
        let mut attempt = QuizAttempt::new(questions, 180).unwrap();
        attempt.record_answer("a").unwrap();
        attempt.record_answer("c").unwrap();
        attempt.tick();
        QuizSnapshot::capture(
            &PlayerName::new("Linus").unwrap(),
            &attempt,
            SessionPhase::InProgress,
            fixed_now(),
        )
    }

    fn gateway() -> (InMemorySlotStore, SnapshotGateway) {
        let store = InMemorySlotStore::new();
        let gateway = SnapshotGateway::new(Arc::new(store.clone()), "quizAppData");
        (store, gateway)
    }

    #[tokio::test]
    async fn load_returns_what_save_wrote() {
        let (_store, gateway) = gateway();
        let original = snapshot();
        gateway.save(&original).await.unwrap();
        assert_eq!(gateway.load().await, Some(original));
    }

    #[tokio::test]
    async fn save_overwrites_previous_snapshot() {
        let (store, gateway) = gateway();
        let mut first = snapshot();
        gateway.save(&first).await.unwrap();
        first.time_remaining_secs = 5;
        gateway.save(&first).await.unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(gateway.load().await.unwrap().time_remaining_secs, 5);
    }

    #[tokio::test]
    async fn clear_twice_leaves_slot_empty() {
        let (store, gateway) = gateway();
        gateway.save(&snapshot()).await.unwrap();

        gateway.clear().await.unwrap();
        assert!(store.is_empty().unwrap());
        gateway.clear().await.unwrap();
        assert!(store.is_empty().unwrap());
        assert_eq!(gateway.load().await, None);
    }

    #[tokio::test]
    async fn garbage_and_wrong_shape_read_as_absent() {
        let (store, gateway) = gateway();

        store.write_slot("quizAppData", "{not json").await.unwrap();
        assert_eq!(gateway.load().await, None);

        store
            .write_slot("quizAppData", r#"{"user":"x","score":3}"#)
            .await
            .unwrap();
        assert_eq!(gateway.load().await, None);
    }

    #[tokio::test]
    async fn invariant_violations_read_as_absent() {
        let (_store, gateway) = gateway();
        let mut broken = snapshot();
        broken.current_question_index = 7;
        gateway.save(&broken).await.unwrap();
        assert_eq!(gateway.load().await, None);
    }

    #[tokio::test]
    async fn backend_failures_are_reported_not_raised() {
        let gateway = SnapshotGateway::new(Arc::new(UnavailableSlots), "quizAppData");
        assert!(matches!(
            gateway.save(&snapshot()).await,
            Err(PersistenceError::Write(_))
        ));
        assert!(matches!(gateway.clear().await, Err(PersistenceError::Clear(_))));
        assert_eq!(gateway.load().await, None);
    }
}
