//! Public SDK surface for Yost.
//!
//! This crate re-exports the component crates and wires them together from
//! a loaded [`config::YostConfig`].

mod app;

pub use app::{Yost, YostError, open_blob_store, open_record_store};

/// Re-export for convenience.
pub use yost_rs_blob as blob;
/// Re-export for convenience.
pub use yost_rs_config as config;
/// Re-export for convenience.
pub use yost_rs_holdings as holdings;
/// Re-export for convenience.
pub use yost_rs_records as records;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
