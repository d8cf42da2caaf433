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

/// Error types for price oracle
pub mod error;
/// Price source implementations
pub mod sources;

use std::time::SystemTime;

pub use error::PriceOracleError;
pub use sources::{CoinGeckoSource, StaticPriceSource};

/// A SUI/USD price observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    /// Price of one SUI in USD
    pub usd: f64,
    /// Unix timestamp when the price was observed
    pub timestamp: u64,
}

impl PriceQuote {
    /// Create a new quote, rejecting prices that cannot be used in a division
    pub fn new(usd: f64, timestamp: u64) -> Result<Self, PriceOracleError> {
        if !usd.is_finite() || usd <= 0.0 {
            return Err(PriceOracleError::InvalidPrice(format!("price must be positive: {usd}")));
        }
        Ok(Self { usd, timestamp })
    }

    /// Age of the quote in seconds
    pub fn age_secs(&self) -> u64 {
        unix_now().saturating_sub(self.timestamp)
    }

    /// Check if the quote is older than `max_age_secs`
    pub fn is_stale(&self, max_age_secs: u64) -> bool {
        self.age_secs() > max_age_secs
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}

/// Price oracle trait for the SUI/USD price
#[async_trait::async_trait]
pub trait PriceOracle: Send + Sync {
    /// Get the current price
    async fn get_price(&self) -> Result<PriceQuote, PriceOracleError>;

    /// Returns the name of this price source
    fn name(&self) -> String;
}

/// Wraps a [PriceOracle] and rejects quotes older than a maximum age
pub struct WithStalenessCheck<O> {
    inner: O,
    max_age_secs: u64,
}

impl<O: PriceOracle> WithStalenessCheck<O> {
    /// Wrap `inner`, accepting quotes up to `max_age_secs` old
    pub fn new(inner: O, max_age_secs: u64) -> Self {
        Self { inner, max_age_secs }
    }
}

#[async_trait::async_trait]
impl<O: PriceOracle> PriceOracle for WithStalenessCheck<O> {
    async fn get_price(&self) -> Result<PriceQuote, PriceOracleError> {
        let quote = self.inner.get_price().await?;
        if quote.is_stale(self.max_age_secs) {
            return Err(PriceOracleError::StalePrice {
                age_secs: quote.age_secs(),
                max_secs: self.max_age_secs,
            });
        }
        Ok(quote)
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}
