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

/// A price source that returns a configured static price
pub struct StaticPriceSource {
    price: f64,
}

impl StaticPriceSource {
    /// Create a new static price source with a fixed price value
    pub fn new(price: f64) -> Self {
        Self { price }
    }
}

#[async_trait::async_trait]
impl PriceOracle for StaticPriceSource {
    async fn get_price(&self) -> Result<PriceQuote, PriceOracleError> {
        // Static prices are always considered fresh
        PriceQuote::new(self.price, unix_now())
    }

    fn name(&self) -> String {
        "static".to_string()
    }
}
