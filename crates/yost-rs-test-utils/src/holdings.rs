use async_trait::async_trait;
use parking_lot::Mutex;
use yost_rs_holdings::{HoldingsApi, HoldingsError, HoldingsResponse, LinkTokenRequest};

/// Holdings API double returning fixed tokens and a canned response.
#[derive(Default)]
pub struct StubHoldingsApi {
    response: HoldingsResponse,
    link_requests: Mutex<Vec<LinkTokenRequest>>,
    exchanged: Mutex<Vec<String>>,
}

impl StubHoldingsApi {
    pub fn new(response: HoldingsResponse) -> Self {
        Self {
            response,
            ..Self::default()
        }
    }

    pub fn link_requests(&self) -> Vec<LinkTokenRequest> {
        self.link_requests.lock().clone()
    }

    pub fn exchanged(&self) -> Vec<String> {
        self.exchanged.lock().clone()
    }
}

#[async_trait]
impl HoldingsApi for StubHoldingsApi {
    async fn create_link_token(&self, request: LinkTokenRequest) -> Result<String, HoldingsError> {
        self.link_requests.lock().push(request);
        Ok("mocked-link-token".to_string())
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<String, HoldingsError> {
        self.exchanged.lock().push(public_token.to_string());
        Ok("mocked-access-token".to_string())
    }

    async fn investment_holdings(
        &self,
        _access_token: &str,
    ) -> Result<HoldingsResponse, HoldingsError> {
        Ok(self.response.clone())
    }
}
