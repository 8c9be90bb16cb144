//! Holdings provider built on a raw vendor API.

use crate::api::HoldingsApi;
use crate::error::HoldingsError;
use crate::model::{Holding, HoldingsResponse, LinkTokenRequest, Product};
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use uuid::Uuid;

#[async_trait]
/// Holdings retrieval used by the reporting feature.
pub trait HoldingsProvider: Send + Sync {
    /// Create a link token; a random user id is used when none is given.
    async fn create_link_token(&self, user_id: Option<&str>) -> Result<String, HoldingsError>;

    /// Exchange a public token for an access token.
    async fn exchange_token(&self, public_token: &str) -> Result<String, HoldingsError>;

    /// Fetch normalized holdings for an access token.
    async fn get_holdings(&self, access_token: &str) -> Result<Vec<Holding>, HoldingsError>;
}

/// Client identity sent with link token requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    pub app_name: String,
    pub language: String,
    pub country_codes: Vec<String>,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            app_name: "YOST".to_string(),
            language: "en".to_string(),
            country_codes: vec!["US".to_string()],
        }
    }
}

/// [`HoldingsProvider`] over any [`HoldingsApi`] transport.
#[derive(Debug, Clone)]
pub struct HoldingsAdapter<A> {
    api: A,
    settings: LinkSettings,
}

impl<A: HoldingsApi> HoldingsAdapter<A> {
    pub fn new(api: A) -> Self {
        Self::with_settings(api, LinkSettings::default())
    }

    pub fn with_settings(api: A, settings: LinkSettings) -> Self {
        Self { api, settings }
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

#[async_trait]
impl<A: HoldingsApi> HoldingsProvider for HoldingsAdapter<A> {
    async fn create_link_token(&self, user_id: Option<&str>) -> Result<String, HoldingsError> {
        let client_user_id = user_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let request = LinkTokenRequest {
            client_user_id,
            client_name: self.settings.app_name.clone(),
            products: vec![Product::Investments],
            language: self.settings.language.clone(),
            country_codes: self.settings.country_codes.clone(),
        };
        self.api.create_link_token(request).await
    }

    async fn exchange_token(&self, public_token: &str) -> Result<String, HoldingsError> {
        self.api.exchange_public_token(public_token).await
    }

    async fn get_holdings(&self, access_token: &str) -> Result<Vec<Holding>, HoldingsError> {
        let response = self.api.investment_holdings(access_token).await?;
        let holdings = normalize_holdings(response)?;
        debug!("fetched holdings (count={})", holdings.len());
        Ok(holdings)
    }
}

/// Resolve tickers and currencies for every raw holding.
///
/// Empty tickers and zero cost bases are reported as absent. The ISO currency
/// wins over the unofficial one; a holding with neither is an error.
pub fn normalize_holdings(response: HoldingsResponse) -> Result<Vec<Holding>, HoldingsError> {
    let tickers: HashMap<&str, &str> = response
        .securities
        .iter()
        .filter_map(|security| {
            security
                .ticker_symbol
                .as_deref()
                .map(|ticker| (security.security_id.as_str(), ticker))
        })
        .collect();

    response
        .holdings
        .iter()
        .map(|raw| -> Result<Holding, HoldingsError> {
            let currency_code = raw
                .iso_currency_code
                .as_deref()
                .filter(|code| !code.is_empty())
                .or_else(|| {
                    raw.unofficial_currency_code
                        .as_deref()
                        .filter(|code| !code.is_empty())
                })
                .ok_or_else(|| HoldingsError::MissingCurrency {
                    security_id: raw.security_id.clone(),
                })?;
            Ok(Holding {
                ticker: tickers
                    .get(raw.security_id.as_str())
                    .filter(|ticker| !ticker.is_empty())
                    .map(|ticker| ticker.to_string()),
                quantity: raw.quantity,
                cost_basis: raw.cost_basis.filter(|cost| *cost != 0.0),
                currency_code: currency_code.to_string(),
            })
        })
        .collect()
}
