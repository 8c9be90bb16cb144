//! Investment holdings retrieval for Yost reporting.
//!
//! The vendor transport is hidden behind [`HoldingsApi`]; [`HoldingsAdapter`]
//! layers link-token defaults and holding normalization on top of it.

pub mod adapter;
pub mod api;
pub mod error;
pub mod model;

pub use adapter::{HoldingsAdapter, HoldingsProvider, LinkSettings, normalize_holdings};
pub use api::HoldingsApi;
pub use error::HoldingsError;
pub use model::{
    Holding, HoldingsResponse, LinkTokenRequest, Product, RawHolding, Security,
};
