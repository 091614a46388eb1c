//! Record store interface and the in-memory implementation.

pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

#[cfg(test)]
mod tests;

pub use memory::InMemoryRecordStore;
pub use trait_::{PendingCredential, RecordStore};
