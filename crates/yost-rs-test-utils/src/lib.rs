//! Test helpers shared across Yost crates.

pub mod clock;
pub mod holdings;
pub mod store;

pub use clock::ManualClock;
pub use holdings::StubHoldingsApi;
pub use store::{RecordingStore, raw_item};
