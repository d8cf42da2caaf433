// Copyright 2026 Boundless Foundation, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::price_oracle::{unix_now, PriceOracle, PriceOracleError, PriceQuote};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Public CoinGecko API
pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko identifier of the SUI token
pub const DEFAULT_COINGECKO_COIN_ID: &str = "sui";

#[derive(Deserialize)]
struct CoinGeckoPriceData {
    usd: f64,
    last_updated_at: Option<u64>,
}

type CoinGeckoPriceResponse = HashMap<String, CoinGeckoPriceData>;

#[derive(Deserialize)]
struct CoinGeckoPingResponse {
    gecko_says: String,
}

/// CoinGecko price source
pub struct CoinGeckoSource {
    client: Client,
    api_url: Url,
    coin_id: String,
}

impl CoinGeckoSource {
    /// Create a new CoinGecko source for `coin_id` against the public API
    pub fn new(coin_id: impl Into<String>, timeout: Duration) -> Result<Self, PriceOracleError> {
        let api_url = Url::parse(DEFAULT_COINGECKO_API_URL)
            .map_err(|e| PriceOracleError::ConfigError(e.to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            // CoinGecko requires a user-agent header for the free API
            .user_agent(concat!("sui-rgp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, api_url, coin_id: coin_id.into() })
    }

    /// Configure the API URL, including its version path (e.g. `.../api/v3`)
    pub fn with_api_url(mut self, url: Url) -> Self {
        self.api_url = url;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, PriceOracleError> {
        let base = self.api_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(|e| PriceOracleError::ConfigError(e.to_string()))
    }

    /// Check that the API is reachable, returning its greeting
    pub async fn ping(&self) -> Result<String, PriceOracleError> {
        let response = self.client.get(self.endpoint("ping")?).send().await?.error_for_status()?;
        let ping: CoinGeckoPingResponse = response.json().await?;
        Ok(ping.gecko_says)
    }
}

#[async_trait::async_trait]
impl PriceOracle for CoinGeckoSource {
    async fn get_price(&self) -> Result<PriceQuote, PriceOracleError> {
        let mut url = self.endpoint("simple/price")?;
        url.query_pairs_mut()
            .append_pair("ids", &self.coin_id)
            .append_pair("vs_currencies", "usd")
            .append_pair("include_last_updated_at", "true");

        let response = self.client.get(url).send().await?.error_for_status()?;

        let data: CoinGeckoPriceResponse = response.json().await?;
        let coin_data =
            data.get(&self.coin_id).ok_or_else(|| PriceOracleError::CoinNotFound(self.coin_id.clone()))?;

        tracing::debug!("CoinGecko price for {}: {} USD", self.coin_id, coin_data.usd);
        PriceQuote::new(coin_data.usd, coin_data.last_updated_at.unwrap_or_else(unix_now))
    }

    fn name(&self) -> String {
        format!("CoinGeckoPriceSource({})", self.coin_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn source(server: &MockServer) -> CoinGeckoSource {
        CoinGeckoSource::new(DEFAULT_COINGECKO_COIN_ID, Duration::from_secs(10))
            .unwrap()
            .with_api_url(server.url("/api/v3").parse().unwrap())
    }

    #[tokio::test]
    async fn test_sui_usd_price_success() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v3/simple/price")
                .query_param("ids", "sui")
                .query_param("vs_currencies", "usd")
                .query_param("include_last_updated_at", "true");
            then.status(200).header("content-type", "application/json").json_body(
                serde_json::json!({
                    "sui": {
                        "usd": 3.52,
                        "last_updated_at": 1706547200
                    }
                }),
            );
        });

        let quote = source(&server).get_price().await.unwrap();

        mock.assert();
        assert_eq!(quote.usd, 3.52);
        assert_eq!(quote.timestamp, 1706547200);
    }

    #[tokio::test]
    async fn test_missing_timestamp_uses_now() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v3/simple/price");
            then.status(200).json_body(serde_json::json!({ "sui": { "usd": 1.0 } }));
        });

        let quote = source(&server).get_price().await.unwrap();
        assert!(!quote.is_stale(60));
    }

    #[tokio::test]
    async fn test_handles_http_error() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/api/v3/simple/price");
            then.status(500);
        });

        let result = source(&server).get_price().await;
        assert!(matches!(result, Err(PriceOracleError::HttpError(_))));
    }

    #[tokio::test]
    async fn test_handles_missing_coin_data() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/api/v3/simple/price").query_param("ids", "sui");
            then.status(200).header("content-type", "application/json").json_body(
                serde_json::json!({
                    "bitcoin": {
                        "usd": 50000.0,
                        "last_updated_at": 1706547200
                    }
                }),
            );
        });

        let result = source(&server).get_price().await;
        assert!(matches!(result, Err(PriceOracleError::CoinNotFound(_))));
    }

    #[tokio::test]
    async fn test_rejects_zero_price() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v3/simple/price");
            then.status(200).json_body(serde_json::json!({ "sui": { "usd": 0.0 } }));
        });

        let result = source(&server).get_price().await;
        assert!(matches!(result, Err(PriceOracleError::InvalidPrice(_))));
    }

    #[tokio::test]
    async fn test_ping() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/ping");
            then.status(200).json_body(serde_json::json!({ "gecko_says": "(V3) To the Moon!" }));
        });

        assert_eq!(source(&server).ping().await.unwrap(), "(V3) To the Moon!");
        mock.assert();
    }

    // Integration tests (require network access)
    #[tokio::test]
    #[ignore]
    async fn test_api_sui_price() -> anyhow::Result<()> {
        let source = CoinGeckoSource::new(DEFAULT_COINGECKO_COIN_ID, Duration::from_secs(10))?;

        let quote = source.get_price().await?;

        println!("{:?}", quote);

        // Sanity check: SUI should be worth something
        assert!(quote.usd > 0.0);
        assert!(quote.timestamp > 0);

        Ok(())
    }
}
