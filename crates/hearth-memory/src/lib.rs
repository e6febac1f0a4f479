//! Conversation memory capture and recall for Hearth.

pub mod error;
pub mod record;
pub mod store;

/// Memory error type.
pub use error::MemoryError;
/// Persisted conversation record.
pub use record::MemoryRecord;
/// Ordered record store with bounded recall.
pub use store::MemoryStore;
