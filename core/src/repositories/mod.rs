//! Repository interfaces for verification record persistence.

pub mod record;

pub use record::{InMemoryRecordStore, PendingCredential, RecordStore};
