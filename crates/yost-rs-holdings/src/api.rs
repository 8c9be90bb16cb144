//! Raw provider surface implemented by vendor transports.

use crate::error::HoldingsError;
use crate::model::{HoldingsResponse, LinkTokenRequest};
use async_trait::async_trait;

#[async_trait]
/// Vendor API calls used by [`crate::HoldingsAdapter`].
pub trait HoldingsApi: Send + Sync {
    /// Create a link token for the client-side account linking flow.
    async fn create_link_token(&self, request: LinkTokenRequest) -> Result<String, HoldingsError>;

    /// Exchange a public token from the linking flow for an access token.
    async fn exchange_public_token(&self, public_token: &str) -> Result<String, HoldingsError>;

    /// Fetch raw holdings and the securities they reference.
    async fn investment_holdings(
        &self,
        access_token: &str,
    ) -> Result<HoldingsResponse, HoldingsError>;
}
