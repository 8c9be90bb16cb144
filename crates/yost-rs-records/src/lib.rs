//! Cooldown-gated record storage for Yost.
//!
//! Records are written through [`RecordWriter`], which validates the
//! verification attributes and computes the cooldown boundary, and read back
//! through [`RecordQueryEngine`], which hides records whose cooldown has not
//! elapsed and optionally narrows to verified users.

pub mod clock;
pub mod error;
pub mod file;
pub mod memory;
pub mod model;
pub mod query;
pub mod store;
pub mod writer;

/// Time source abstraction.
pub use clock::{Clock, SystemClock};
/// Record error types.
pub use error::{LinkViolation, RecordError};
/// File-backed record store.
pub use file::FileRecordStore;
/// In-memory record store.
pub use memory::MemoryRecordStore;
/// Record model and request types.
pub use model::{COOLDOWN_WINDOW_SECS, QueryRequest, Record, WriteRequest};
/// Query engine.
pub use query::RecordQueryEngine;
/// Backing store interface.
pub use store::{AttributePredicate, RawItem, RecordStore};
/// Record writer.
pub use writer::RecordWriter;
