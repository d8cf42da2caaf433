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

//! Command line and environment configuration.

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use sui_rgp::{
    EconomicConfig, SubsidyTerm, DEFAULT_BREAKEVEN_FLOOR_MIST,
    DEFAULT_REWARD_DISTRIBUTION_FRACTION,
};
use url::Url;

use crate::{
    price_oracle::{
        sources::coingecko::{DEFAULT_COINGECKO_API_URL, DEFAULT_COINGECKO_COIN_ID},
        CoinGeckoSource, PriceOracle, PriceOracleError, StaticPriceSource, WithStalenessCheck,
    },
    retrieval::DEFAULT_MAX_RETRIES,
    rpc::normalize_sui_address,
};

/// Estimate the breakeven reference gas price of a Sui validator.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct RgpArgs {
    /// URL of the Sui full node JSON-RPC endpoint.
    #[clap(long, env = "RPC_URL", required_unless_present = "snapshot")]
    pub rpc_url: Option<Url>,
    /// Sui address of the validator.
    #[clap(long, env = "VALIDATOR_ADDRESS", value_parser = normalize_sui_address)]
    pub validator_address: Option<String>,
    /// Fixed SUI price in USD. When unset the price is fetched from CoinGecko.
    #[clap(long, env = "SUI_PRICE_USD")]
    pub sui_price_usd: Option<f64>,
    /// Monthly operating costs of the validator in USD.
    #[clap(long, env = "SERVER_COSTS_USD")]
    pub server_costs_usd: f64,
    /// CoinGecko API URL, including the version path.
    #[clap(long, env = "COINGECKO_API_URL", default_value = DEFAULT_COINGECKO_API_URL)]
    pub coingecko_api_url: Url,
    /// CoinGecko identifier of the SUI token.
    #[clap(long, env = "COINGECKO_COIN_ID", default_value = DEFAULT_COINGECKO_COIN_ID)]
    pub coingecko_coin_id: String,
    /// Maximum age of an oracle price in seconds.
    #[clap(long, default_value = "3600")]
    pub max_price_age_secs: u64,
    /// Fraction of the storage fund rewards distributed to validators.
    #[clap(long, env = "REWARD_DISTRIBUTION_FRACTION", default_value_t = DEFAULT_REWARD_DISTRIBUTION_FRACTION)]
    pub reward_distribution_fraction: f64,
    /// Lower bound of the reported breakeven price, in MIST.
    #[clap(long, env = "BREAKEVEN_FLOOR_MIST", default_value_t = DEFAULT_BREAKEVEN_FLOOR_MIST)]
    pub floor_mist: u64,
    /// Leave the stake subsidy out of the breakeven formula.
    #[clap(long)]
    pub ignore_subsidy: bool,
    /// Read the chain state from a JSON file instead of the RPC endpoint.
    #[clap(long)]
    pub snapshot: Option<PathBuf>,
    /// Write the fetched chain state to a JSON file.
    #[clap(long)]
    pub dump_snapshot: Option<PathBuf>,
    /// Print the validator's last N epochs of rewards and gas price quotes.
    #[clap(long)]
    pub history: Option<usize>,
    /// Number of times a chain state spanning an epoch change is fetched again.
    #[clap(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,
    /// HTTP timeout in seconds.
    #[clap(long, default_value = "30")]
    pub timeout_secs: u64,
}

impl RgpArgs {
    /// HTTP timeout for RPC and oracle requests
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Economic constants for the solver, given the resolved SUI price
    pub fn economic_config(&self, sui_price_usd: f64) -> EconomicConfig {
        let subsidy_term =
            if self.ignore_subsidy { SubsidyTerm::Ignore } else { SubsidyTerm::Subtract };
        EconomicConfig::new(sui_price_usd, self.server_costs_usd)
            .with_reward_distribution_fraction(self.reward_distribution_fraction)
            .with_breakeven_floor_mist(self.floor_mist)
            .with_subsidy_term(subsidy_term)
    }

    /// The price source selected by the configuration
    pub fn price_oracle(&self) -> Result<Arc<dyn PriceOracle>, PriceOracleError> {
        if let Some(price) = self.sui_price_usd {
            return Ok(Arc::new(StaticPriceSource::new(price)));
        }
        if self.coingecko_coin_id.trim().is_empty() {
            return Err(PriceOracleError::ConfigError("CoinGecko coin id is empty".to_string()));
        }

        let coingecko = CoinGeckoSource::new(self.coingecko_coin_id.clone(), self.timeout())?
            .with_api_url(self.coingecko_api_url.clone());
        Ok(Arc::new(WithStalenessCheck::new(coingecko, self.max_price_age_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALIDATOR: &str = "0x44b1b319e23495995fc837dafd28fc6af8b645edddff0fc1467f1ad631362c23";

    #[test]
    fn test_minimal_args() {
        let args = RgpArgs::try_parse_from([
            "sui-rgp",
            "--rpc-url",
            "https://fullnode.mainnet.sui.io",
            "--validator-address",
            VALIDATOR,
            "--server-costs-usd",
            "3000",
        ])
        .unwrap();

        assert_eq!(args.validator_address.as_deref(), Some(VALIDATOR));
        assert_eq!(args.sui_price_usd, None);
        assert_eq!(args.coingecko_coin_id, "sui");
        assert_eq!(args.reward_distribution_fraction, 0.95);
        assert_eq!(args.floor_mist, 1);
        assert_eq!(args.max_retries, DEFAULT_MAX_RETRIES);

        let config = args.economic_config(2.0);
        assert_eq!(config, EconomicConfig::new(2.0, 3000.0));
        assert_eq!(args.price_oracle().unwrap().name(), "CoinGeckoPriceSource(sui)");
    }

    #[test]
    fn test_static_price_and_overrides() {
        let args = RgpArgs::try_parse_from([
            "sui-rgp",
            "--rpc-url",
            "http://localhost:9000",
            "--validator-address",
            "0x5",
            "--server-costs-usd",
            "720",
            "--sui-price-usd",
            "1.5",
            "--floor-mist",
            "0",
            "--reward-distribution-fraction",
            "0.9",
            "--ignore-subsidy",
        ])
        .unwrap();

        assert_eq!(
            args.validator_address.as_deref(),
            Some("0x0000000000000000000000000000000000000000000000000000000000000005")
        );
        let config = args.economic_config(1.5);
        assert_eq!(config.breakeven_floor_mist, 0);
        assert_eq!(config.reward_distribution_fraction, 0.9);
        assert_eq!(config.subsidy_term, SubsidyTerm::Ignore);
        assert_eq!(args.price_oracle().unwrap().name(), "static");
    }

    #[test]
    fn test_snapshot_replaces_rpc_url() {
        let args = RgpArgs::try_parse_from([
            "sui-rgp",
            "--snapshot",
            "state.json",
            "--server-costs-usd",
            "720",
        ])
        .unwrap();
        assert!(args.rpc_url.is_none());
        assert_eq!(args.snapshot, Some(PathBuf::from("state.json")));
    }

    #[test]
    fn test_rejects_invalid_address() {
        let result = RgpArgs::try_parse_from([
            "sui-rgp",
            "--rpc-url",
            "http://localhost:9000",
            "--validator-address",
            "not-an-address",
            "--server-costs-usd",
            "720",
        ]);
        assert!(result.is_err());
    }
}
