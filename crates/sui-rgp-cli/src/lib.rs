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

//! Command line tool computing the breakeven reference gas price of a Sui validator.
//!
//! Fetches a consistent chain state from a Sui full node, resolves the SUI/USD price from a
//! fixed value or CoinGecko, and runs the [sui_rgp] estimator on the result.

use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use sui_rgp::{estimate_breakeven, BreakevenEstimate, ChainState, ChainStateSnapshot};

/// Command line and environment configuration
pub mod config;
/// Terminal output
pub mod display;
/// SUI/USD price sources
pub mod price_oracle;
/// Consistent chain state retrieval
pub mod retrieval;
/// Sui JSON-RPC client
pub mod rpc;

pub use config::RgpArgs;
use display::DisplayManager;
use retrieval::SnapshotFetcher;
use rpc::SuiRpcClient;

/// Load a chain state previously written with `--dump-snapshot`.
pub async fn load_snapshot(path: &Path, validator: Option<&str>) -> Result<ChainStateSnapshot> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let state: ChainState = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

    if let Some(validator) = validator {
        ensure!(
            state.validator_address == validator,
            "snapshot {} was taken for validator {}, not {validator}",
            path.display(),
            state.validator_address
        );
    }

    Ok(ChainStateSnapshot::validated(state)?)
}

/// Write the raw chain state of `snapshot` as JSON.
pub async fn dump_snapshot(path: &Path, snapshot: &ChainStateSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot.state())?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    tracing::info!("Wrote chain state to {}", path.display());
    Ok(())
}

/// Fetch the inputs, compute the breakeven RGP and print the report.
pub async fn run(args: &RgpArgs) -> Result<BreakevenEstimate> {
    let fetcher = match &args.rpc_url {
        Some(url) => Some(
            SnapshotFetcher::new(
                SuiRpcClient::new(url.clone(), args.timeout())
                    .context("Failed to create RPC client")?,
            )
            .with_max_retries(args.max_retries),
        ),
        None => None,
    };

    let display = match fetcher.as_ref().and_then(|fetcher| fetcher.reader().url().host_str()) {
        Some(host) => DisplayManager::with_network(host),
        None => DisplayManager::new(),
    };

    let snapshot = match (&args.snapshot, &fetcher) {
        (Some(path), _) => load_snapshot(path, args.validator_address.as_deref()).await?,
        (None, Some(fetcher)) => {
            let validator = args
                .validator_address
                .as_deref()
                .context("--validator-address is required to fetch the chain state")?;
            fetcher.fetch(validator).await.context("Failed to fetch chain state")?
        }
        (None, None) => bail!("either --rpc-url or --snapshot is required"),
    };

    if let Some(path) = &args.dump_snapshot {
        dump_snapshot(path, &snapshot).await?;
    }

    let oracle = args.price_oracle().context("Failed to configure price oracle")?;
    let quote = oracle.get_price().await.context("Failed to fetch SUI price")?;
    tracing::info!("Using SUI price {} USD from {}", quote.usd, oracle.name());

    let config = args.economic_config(quote.usd);
    let estimate =
        estimate_breakeven(&snapshot, &config).context("Failed to estimate breakeven RGP")?;

    display.snapshot(&snapshot)?;
    display.price(&oracle.name(), &quote);
    display.estimate(&estimate)?;

    if let Some(fetcher) = &fetcher {
        match fetcher.reader().reference_gas_price().await {
            Ok(live_rgp) => display.live_rgp(live_rgp, &estimate),
            Err(err) => tracing::warn!("Failed to query the live reference gas price: {err}"),
        }
    }

    if let Some(limit) = args.history {
        match &fetcher {
            Some(fetcher) => {
                let events = fetcher
                    .reader()
                    .validator_epoch_info_events(snapshot.validator_address(), limit)
                    .await
                    .context("Failed to query validator epoch history")?;
                display.history(&events)?;
            }
            None => display.warning("--history requires --rpc-url"),
        }
    }

    Ok(estimate)
}
