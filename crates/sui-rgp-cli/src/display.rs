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

//! Display utilities for consistent CLI output formatting

use alloy_primitives::U256;
use chrono::DateTime;
use colored::Colorize;
use std::fmt::Display;
use sui_rgp::{units::format_sui, BreakevenEstimate, ChainStateSnapshot};

use crate::{price_oracle::PriceQuote, rpc::ValidatorEpochInfo};

/// Standard display formatter for CLI output
#[derive(Default)]
pub struct DisplayManager {
    /// Optional network name to display in headers
    network: Option<String>,
}

impl DisplayManager {
    /// Create a new display manager
    pub fn new() -> Self {
        Self { network: None }
    }

    /// Create a display manager with network context
    pub fn with_network(network: impl Into<String>) -> Self {
        Self { network: Some(network.into()) }
    }

    /// Print a section header with optional network badge
    pub fn header(&self, title: &str) {
        match &self.network {
            Some(network) => println!("\n{} [{}]", title.bold(), network.blue().bold()),
            None => println!("\n{}", title.bold()),
        }
    }

    /// Print a labeled value with standard indentation
    pub fn item(&self, label: &str, value: impl Display) {
        println!("  {:<24} {}", format!("{}:", label), value);
    }

    /// Print a labeled value with custom color
    pub fn item_colored(&self, label: &str, value: impl Display, color: &str) {
        let colored_value = match color {
            "green" => value.to_string().green().to_string(),
            "cyan" => value.to_string().cyan().to_string(),
            "yellow" => value.to_string().yellow().to_string(),
            "red" => value.to_string().red().to_string(),
            "dimmed" => value.to_string().dimmed().to_string(),
            _ => value.to_string(),
        };
        println!("  {:<24} {}", format!("{}:", label), colored_value);
    }

    /// Print a MIST amount together with its SUI value
    pub fn mist(&self, label: &str, mist: U256) -> anyhow::Result<()> {
        self.item(label, format!("{} MIST ({} SUI)", mist, format_sui(mist)?));
        Ok(())
    }

    /// Print a warning line
    pub fn warning(&self, message: &str) {
        println!("  {} {}", "⚠".yellow(), message.yellow());
    }

    /// Print the snapshot the estimate is based on
    pub fn snapshot(&self, snapshot: &ChainStateSnapshot) -> anyhow::Result<()> {
        let state = snapshot.system_state();
        let checkpoint = snapshot.checkpoint();

        self.header("Chain State");
        self.item_colored("Validator", snapshot.validator_address(), "dimmed");
        self.item("Epoch", state.epoch);
        self.item("Checkpoint", checkpoint.sequence_number);
        self.item("Checkpoint time", format_timestamp_ms(checkpoint.timestamp_ms));
        self.item("Active validators", snapshot.active_validator_count());
        self.mist("Self-stake", snapshot.self_stake_amount())?;
        self.item("Self-stake positions", snapshot.self_stakes().count());
        self.mist("Pool balance", snapshot.pool_total_token_balance())?;
        self.mist("Network stake", snapshot.next_epoch_network_total_stake())?;
        self.item("Reference gas price", format!("{} MIST", state.reference_gas_price));
        if !snapshot.is_active() {
            self.warning("Validator is not in the active set");
        }
        Ok(())
    }

    /// Print the price used for the estimate
    pub fn price(&self, source: &str, quote: &PriceQuote) {
        self.header("Price");
        self.item_colored("SUI/USD", format!("${:.4}", quote.usd), "cyan");
        self.item("Source", source);
        self.item("Observed", format_timestamp_ms(quote.timestamp.saturating_mul(1000)));
    }

    /// Print the estimate and its intermediate quantities
    pub fn estimate(&self, estimate: &BreakevenEstimate) -> anyhow::Result<()> {
        let share = &estimate.reward_share;

        self.header("Reward Share");
        self.item("alpha (non storage fund)", format!("{:.6}", share.alpha));
        self.item("beta (self-stake)", format!("{:.6}", share.beta));
        self.item("gamma (distribution)", format!("{:.6}", share.gamma));
        self.item("delta (commission)", format!("{:.6}", share.delta));
        self.item("mu (tally)", share.mu);
        self.item("sigma (network share)", format!("{:.6}", share.sigma));
        self.item("N (validators)", share.validator_count);
        self.item_colored("K", format!("{:.8}", share.k), "cyan");
        if share.mu == 0.0 {
            self.warning("Validator is reported by more than 2/3 of the voting power");
        }

        self.header("Epoch");
        self.item("Progress", format!("{:.2}%", estimate.epoch_progress * 100.0));
        self.item("Projected gas units", format!("{:.0}", estimate.projected_gas_units.ceil()));
        self.mist("Projected subsidy", estimate.stake_subsidy_mist)?;
        self.item("Operating costs", format!("${:.2}", estimate.epoch_costs_usd));

        self.header("Breakeven RGP");
        if estimate.clamped {
            self.warning(&format!(
                "Computed price {:.2} MIST is below the floor",
                estimate.unclamped_rgp_mist
            ));
        }
        self.item_colored("Breakeven RGP", format!("{} MIST", estimate.rgp_mist_ceil()), "green");
        self.item_colored("", format!("{:.9} SUI", estimate.rgp_sui()), "dimmed");
        Ok(())
    }

    /// Print the reference gas price currently reported by the node next to the estimate
    pub fn live_rgp(&self, live_rgp_mist: u64, estimate: &BreakevenEstimate) {
        let breakeven = estimate.rgp_mist_ceil();
        let color = if live_rgp_mist >= breakeven { "green" } else { "red" };
        self.item_colored("Live RGP", format!("{live_rgp_mist} MIST"), color);
        if live_rgp_mist < breakeven {
            self.warning(&format!(
                "Live RGP is {} MIST below the breakeven price",
                breakeven - live_rgp_mist
            ));
        }
    }

    /// Print the validator's recent epochs
    pub fn history(&self, events: &[ValidatorEpochInfo]) -> anyhow::Result<()> {
        self.header("Recent Epochs");
        if events.is_empty() {
            self.item_colored("History", "no epoch info events found", "dimmed");
            return Ok(());
        }
        println!(
            "  {:<8} {:>10} {:>24} {:>24}",
            "Epoch".bold(),
            "Quote".bold(),
            "Pool reward (SUI)".bold(),
            "Storage reward (SUI)".bold()
        );
        for event in events {
            println!(
                "  {:<8} {:>10} {:>24} {:>24}",
                event.epoch,
                event.reference_gas_survey_quote,
                format_sui(event.pool_staking_reward)?,
                format_sui(event.storage_fund_staking_reward)?
            );
        }
        Ok(())
    }
}

fn format_timestamp_ms(timestamp_ms: u64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms as i64) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "Invalid timestamp".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_ms() {
        assert_eq!(format_timestamp_ms(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp_ms(1_706_547_200_000), "2024-01-29 16:53:20 UTC");
    }

    #[test]
    fn test_report_sections() {
        use sui_rgp::{estimate_breakeven, test_utils::single_validator_state, EconomicConfig};

        let display = DisplayManager::with_network("fullnode.mainnet.sui.io");
        let snapshot = ChainStateSnapshot::new(single_validator_state());
        let estimate = estimate_breakeven(&snapshot, &EconomicConfig::new(1.0, 720.0)).unwrap();

        display.snapshot(&snapshot).unwrap();
        display.estimate(&estimate).unwrap();
        display.live_rgp(1_000, &estimate);
        display.mist("Amount", U256::MAX).unwrap();
        display.history(&[]).unwrap();
    }
}
