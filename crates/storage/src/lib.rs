#![forbid(unsafe_code)]

pub mod repository;
pub mod snapshot;
pub mod sqlite;

pub use repository::{InMemorySlotStore, SlotStore, Storage, StorageError};
pub use snapshot::{PersistenceError, SnapshotGateway};
