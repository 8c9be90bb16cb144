//! Holdings model types.

use serde::{Deserialize, Serialize};

/// Normalized position reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_basis: Option<f64>,
    pub currency_code: String,
}

/// Holding as returned by the vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHolding {
    pub security_id: String,
    pub quantity: f64,
    #[serde(default)]
    pub cost_basis: Option<f64>,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
    #[serde(default)]
    pub unofficial_currency_code: Option<String>,
}

/// Security referenced by a raw holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Security {
    pub security_id: String,
    #[serde(default)]
    pub ticker_symbol: Option<String>,
}

/// Vendor holdings payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingsResponse {
    #[serde(default)]
    pub holdings: Vec<RawHolding>,
    #[serde(default)]
    pub securities: Vec<Security>,
}

/// Product a link token grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    Investments,
}

/// Parameters for creating a link token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTokenRequest {
    pub client_user_id: String,
    pub client_name: String,
    pub products: Vec<Product>,
    pub language: String,
    pub country_codes: Vec<String>,
}
