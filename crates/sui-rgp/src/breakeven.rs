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

//! Breakeven reference gas price solver.
//!
//! ```text
//! epoch_costs_usd = monthly_costs_usd / 720 * epoch_duration_hours
//! rgp = sui_to_mist(epoch_costs_usd / (sui_price_usd * K) - mist_to_sui(S)) / u
//! ```
//!
//! The result is clamped from below by [EconomicConfig::breakeven_floor_mist].

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::BreakevenError;
use crate::reward_share::{reward_share, RewardShare, DEFAULT_REWARD_DISTRIBUTION_FRACTION};
use crate::snapshot::ChainStateSnapshot;
use crate::subsidy::projected_stake_subsidy;
use crate::throughput::{epoch_progress, projected_gas_units};
use crate::units::{mist_to_f64, mist_to_sui, sui_to_mist};

/// Hours in the 30 day billing month operating costs are quoted for
pub const HOURS_PER_BILLING_MONTH: f64 = 24.0 * 30.0;

/// Default lower bound of the breakeven price. Sui rejects a gas price of zero.
pub const DEFAULT_BREAKEVEN_FLOOR_MIST: u64 = 1;

/// How the projected stake subsidy enters the breakeven formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsidyTerm {
    /// Subtract the subsidy, in SUI, from the rewards the validator needs to earn
    #[default]
    Subtract,
    /// Leave the subsidy out of the formula
    Ignore,
}

/// Operator supplied economic constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicConfig {
    /// Price of one SUI in USD
    pub sui_price_usd: f64,
    /// Monthly operating costs of the validator in USD
    pub validator_monthly_costs_usd: f64,
    /// Fraction of the storage fund rewards distributed to validators (`gamma`)
    #[serde(default = "default_reward_distribution_fraction")]
    pub reward_distribution_fraction: f64,
    /// Lower bound of the returned breakeven price, in MIST
    #[serde(default = "default_breakeven_floor_mist")]
    pub breakeven_floor_mist: u64,
    /// Treatment of the stake subsidy
    #[serde(default)]
    pub subsidy_term: SubsidyTerm,
}

fn default_reward_distribution_fraction() -> f64 {
    DEFAULT_REWARD_DISTRIBUTION_FRACTION
}

fn default_breakeven_floor_mist() -> u64 {
    DEFAULT_BREAKEVEN_FLOOR_MIST
}

impl EconomicConfig {
    /// Config with default gamma, floor and subsidy treatment
    pub fn new(sui_price_usd: f64, validator_monthly_costs_usd: f64) -> Self {
        Self {
            sui_price_usd,
            validator_monthly_costs_usd,
            reward_distribution_fraction: DEFAULT_REWARD_DISTRIBUTION_FRACTION,
            breakeven_floor_mist: DEFAULT_BREAKEVEN_FLOOR_MIST,
            subsidy_term: SubsidyTerm::default(),
        }
    }

    /// Set the reward distribution fraction (`gamma`)
    pub fn with_reward_distribution_fraction(self, reward_distribution_fraction: f64) -> Self {
        Self { reward_distribution_fraction, ..self }
    }

    /// Set the floor of the breakeven price, in MIST
    pub fn with_breakeven_floor_mist(self, breakeven_floor_mist: u64) -> Self {
        Self { breakeven_floor_mist, ..self }
    }

    /// Set the treatment of the stake subsidy
    pub fn with_subsidy_term(self, subsidy_term: SubsidyTerm) -> Self {
        Self { subsidy_term, ..self }
    }

    /// Check that all values are usable by the solver.
    pub fn validate(&self) -> Result<(), BreakevenError> {
        if !self.sui_price_usd.is_finite() || self.sui_price_usd <= 0.0 {
            return Err(BreakevenError::InvalidConfig(format!(
                "SUI price must be positive, got {}",
                self.sui_price_usd
            )));
        }
        if !self.validator_monthly_costs_usd.is_finite() || self.validator_monthly_costs_usd < 0.0 {
            return Err(BreakevenError::InvalidConfig(format!(
                "monthly costs must be non-negative, got {}",
                self.validator_monthly_costs_usd
            )));
        }
        if !(0.0..=1.0).contains(&self.reward_distribution_fraction) {
            return Err(BreakevenError::InvalidConfig(format!(
                "reward distribution fraction must be within [0, 1], got {}",
                self.reward_distribution_fraction
            )));
        }
        Ok(())
    }
}

/// Operating costs for one epoch of `epoch_duration_ms`, in USD
pub fn epoch_costs_usd(validator_monthly_costs_usd: f64, epoch_duration_ms: u64) -> f64 {
    let epoch_duration_hours = epoch_duration_ms as f64 / 1000.0 / 3600.0;
    validator_monthly_costs_usd / HOURS_PER_BILLING_MONTH * epoch_duration_hours
}

/// Breakeven price together with every quantity it was derived from
#[derive(Debug, Clone, PartialEq)]
pub struct BreakevenEstimate {
    /// Breakeven reference gas price in MIST, after clamping
    pub rgp_mist: f64,
    /// Breakeven price before clamping
    pub unclamped_rgp_mist: f64,
    /// Whether the floor was applied
    pub clamped: bool,
    /// Reward share and its sub-ratios
    pub reward_share: RewardShare,
    /// Fraction of the epoch elapsed at the latest checkpoint
    pub epoch_progress: f64,
    /// Gas units projected for the whole epoch (`u`)
    pub projected_gas_units: f64,
    /// Projected stake subsidy in MIST (`S`)
    pub stake_subsidy_mist: U256,
    /// Operating costs for the epoch in USD
    pub epoch_costs_usd: f64,
}

impl BreakevenEstimate {
    /// The breakeven price rounded up to a whole MIST
    pub fn rgp_mist_ceil(&self) -> u64 {
        self.rgp_mist.ceil() as u64
    }

    /// The breakeven price in SUI
    pub fn rgp_sui(&self) -> f64 {
        mist_to_sui(self.rgp_mist)
    }
}

/// Solve the breakeven formula for the given reward share, throughput and subsidy.
///
/// Fails when `k` or `u` is not positive, since the breakeven price is undefined then.
pub fn solve_breakeven(
    epoch_costs_usd: f64,
    sui_price_usd: f64,
    k: f64,
    stake_subsidy_mist: U256,
    u: f64,
    subsidy_term: SubsidyTerm,
) -> Result<f64, BreakevenError> {
    if !(k.is_finite() && k > 0.0) {
        return Err(BreakevenError::NonPositiveRewardShare(k));
    }
    if !(u.is_finite() && u > 0.0) {
        return Err(BreakevenError::ZeroGasThroughput(u));
    }

    let required_sui = epoch_costs_usd / (sui_price_usd * k);
    let subsidy_sui = match subsidy_term {
        SubsidyTerm::Subtract => mist_to_sui(mist_to_f64(stake_subsidy_mist)),
        SubsidyTerm::Ignore => 0.0,
    };
    let rgp = sui_to_mist(required_sui - subsidy_sui) / u;
    if !rgp.is_finite() {
        return Err(BreakevenError::NonFinite(rgp));
    }
    Ok(rgp)
}

/// Estimate the breakeven reference gas price of the snapshot's validator.
pub fn estimate_breakeven(
    snapshot: &ChainStateSnapshot,
    config: &EconomicConfig,
) -> Result<BreakevenEstimate, BreakevenError> {
    config.validate()?;

    let progress = epoch_progress(snapshot);
    let share = reward_share(snapshot, progress, config.reward_distribution_fraction);
    let u = projected_gas_units(snapshot, progress);
    let subsidy = projected_stake_subsidy(snapshot.system_state());
    let costs =
        epoch_costs_usd(config.validator_monthly_costs_usd, snapshot.system_state().epoch_duration_ms);

    tracing::debug!(
        "epoch_costs_usd={costs} sui_price_usd={} K={} S={subsidy} u={u} epoch_progress={progress}",
        config.sui_price_usd,
        share.k
    );

    let unclamped =
        solve_breakeven(costs, config.sui_price_usd, share.k, subsidy, u, config.subsidy_term)?;

    let floor = config.breakeven_floor_mist as f64;
    let clamped = unclamped < floor;
    if clamped {
        tracing::warn!("Breakeven RGP {unclamped} MIST is below the floor, using {floor} MIST");
    }

    Ok(BreakevenEstimate {
        rgp_mist: unclamped.max(floor),
        unclamped_rgp_mist: unclamped,
        clamped,
        reward_share: share,
        epoch_progress: progress,
        projected_gas_units: u,
        stake_subsidy_mist: subsidy,
        epoch_costs_usd: costs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{active_validator, single_validator_state};
    use proptest::prelude::*;
    use tracing_test::traced_test;

    #[test]
    fn test_epoch_costs() {
        assert_eq!(epoch_costs_usd(720.0, 24 * 3600 * 1000), 24.0);
        assert_eq!(epoch_costs_usd(1440.0, 12 * 3600 * 1000), 24.0);
        assert_eq!(epoch_costs_usd(0.0, 24 * 3600 * 1000), 0.0);
    }

    #[test]
    fn test_single_validator_breakeven() {
        let snapshot = ChainStateSnapshot::new(single_validator_state());
        let estimate = estimate_breakeven(&snapshot, &EconomicConfig::new(1.0, 720.0)).unwrap();

        assert_eq!(estimate.reward_share.k, 1.0);
        assert_eq!(estimate.projected_gas_units, 1.0);
        assert_eq!(estimate.epoch_costs_usd, 24.0);
        assert_eq!(estimate.stake_subsidy_mist, U256::ZERO);
        assert_eq!(estimate.rgp_mist, 24e9);
        assert_eq!(estimate.rgp_mist_ceil(), 24_000_000_000);
        assert!(!estimate.clamped);
        assert!((estimate.rgp_sui() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_reward_share_is_undefined() {
        let mut state = single_validator_state();
        state.system_state.active_validators.clear();
        let snapshot = ChainStateSnapshot::new(state);

        let err = estimate_breakeven(&snapshot, &EconomicConfig::new(1.0, 720.0)).unwrap_err();
        assert_eq!(err, BreakevenError::NonPositiveRewardShare(0.0));
        assert!(err.is_undefined());
    }

    #[test]
    fn test_negative_reward_share_is_undefined() {
        let err = solve_breakeven(24.0, 1.0, -0.3, U256::ZERO, 1.0, SubsidyTerm::Subtract)
            .unwrap_err();
        assert_eq!(err, BreakevenError::NonPositiveRewardShare(-0.3));
        assert!(err.to_string().contains("-0.3, not positive"));
        assert!(err.is_undefined());

        let err = solve_breakeven(24.0, 1.0, f64::INFINITY, U256::ZERO, 1.0, SubsidyTerm::Subtract)
            .unwrap_err();
        assert!(matches!(err, BreakevenError::NonPositiveRewardShare(_)));
    }

    #[test]
    fn test_zero_throughput_is_undefined() {
        let mut state = single_validator_state();
        state.checkpoint.epoch_rolling_gas_cost_summary.computation_cost = U256::ZERO;
        let snapshot = ChainStateSnapshot::new(state);

        let err = estimate_breakeven(&snapshot, &EconomicConfig::new(1.0, 720.0)).unwrap_err();
        assert_eq!(err, BreakevenError::ZeroGasThroughput(0.0));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let snapshot = ChainStateSnapshot::new(single_validator_state());

        for config in [
            EconomicConfig::new(0.0, 720.0),
            EconomicConfig::new(f64::NAN, 720.0),
            EconomicConfig::new(1.0, -1.0),
            EconomicConfig::new(1.0, 720.0).with_reward_distribution_fraction(1.5),
        ] {
            let err = estimate_breakeven(&snapshot, &config).unwrap_err();
            assert!(matches!(err, BreakevenError::InvalidConfig(_)));
            assert!(!err.is_undefined());
        }
    }

    #[test]
    #[traced_test]
    fn test_subsidy_larger_than_costs_clamps_to_floor() {
        let mut state = single_validator_state();
        // 100 SUI subsidy against 24 SUI of costs.
        state.system_state.stake_subsidy_current_distribution_amount =
            U256::from(100_000_000_000u64);
        let snapshot = ChainStateSnapshot::new(state);

        let estimate = estimate_breakeven(&snapshot, &EconomicConfig::new(1.0, 720.0)).unwrap();
        assert!((estimate.unclamped_rgp_mist - (-76e9)).abs() < 1.0);
        assert!(estimate.clamped);
        assert_eq!(estimate.rgp_mist, DEFAULT_BREAKEVEN_FLOOR_MIST as f64);
        assert!(logs_contain("below the floor"));

        let config = EconomicConfig::new(1.0, 720.0).with_breakeven_floor_mist(0);
        assert_eq!(estimate_breakeven(&snapshot, &config).unwrap().rgp_mist, 0.0);
    }

    #[test]
    fn test_ignoring_subsidy() {
        let mut state = single_validator_state();
        state.system_state.stake_subsidy_current_distribution_amount = U256::from(4_000_000_000u64);
        let snapshot = ChainStateSnapshot::new(state);

        let subtracted = estimate_breakeven(&snapshot, &EconomicConfig::new(1.0, 720.0)).unwrap();
        assert!((subtracted.rgp_mist - 20e9).abs() < 1.0);

        let config = EconomicConfig::new(1.0, 720.0).with_subsidy_term(SubsidyTerm::Ignore);
        let ignored = estimate_breakeven(&snapshot, &config).unwrap();
        assert_eq!(ignored.rgp_mist, 24e9);
    }

    #[test]
    fn test_partial_epoch_projection() {
        let mut state = single_validator_state();
        state.checkpoint.timestamp_ms /= 4;
        let snapshot = ChainStateSnapshot::new(state);

        // A quarter of the epoch processed one gas unit, so four are projected.
        let estimate = estimate_breakeven(&snapshot, &EconomicConfig::new(1.0, 720.0)).unwrap();
        assert_eq!(estimate.epoch_progress, 0.25);
        assert_eq!(estimate.projected_gas_units, 4.0);
        assert_eq!(estimate.rgp_mist, 6e9);
    }

    #[test]
    fn test_economic_config_deserializes_with_defaults() {
        let config: EconomicConfig = serde_json::from_str(
            r#"{"sui_price_usd": 1.25, "validator_monthly_costs_usd": 3000.0}"#,
        )
        .unwrap();

        assert_eq!(config, EconomicConfig::new(1.25, 3000.0));
    }

    fn two_validator_snapshot(own_stake: u64) -> ChainStateSnapshot {
        let mut state = single_validator_state();
        state.stakes[0].stakes[0].principal = U256::from(own_stake);
        let own = &mut state.system_state.active_validators[0];
        own.pool_token_balance = U256::from(own_stake);
        own.next_epoch_stake = U256::from(own_stake);
        state.system_state.active_validators.push(active_validator("0xpeer", 50_000_000_000, 5000));
        state.system_state.storage_fund_non_refundable_balance = U256::from(1_000_000_000u64);
        ChainStateSnapshot::new(state)
    }

    proptest! {
        #[test]
        fn higher_costs_raise_breakeven(costs in 1.0f64..1e6, extra in 1.0f64..1e6) {
            let snapshot = two_validator_snapshot(10_000_000_000);
            let config = EconomicConfig::new(1.0, costs).with_breakeven_floor_mist(0);
            let higher = EconomicConfig::new(1.0, costs + extra).with_breakeven_floor_mist(0);

            let low = estimate_breakeven(&snapshot, &config).unwrap();
            let high = estimate_breakeven(&snapshot, &higher).unwrap();
            prop_assert!(low.reward_share.k > 0.0);
            prop_assert!(high.rgp_mist > low.rgp_mist);
        }

        #[test]
        fn higher_reward_share_lowers_breakeven(k in 1e-6f64..1.0, factor in 1.01f64..10.0) {
            let subsidy = U256::from(1_000_000u64);
            let low_k = solve_breakeven(24.0, 1.0, k, subsidy, 1000.0, SubsidyTerm::Subtract).unwrap();
            let high_k =
                solve_breakeven(24.0, 1.0, k * factor, subsidy, 1000.0, SubsidyTerm::Subtract).unwrap();
            prop_assert!(high_k < low_k);
        }

        #[test]
        fn larger_self_staked_pool_lowers_breakeven(stake in 1_000_000_000u64..100_000_000_000, extra in 1_000_000_000u64..100_000_000_000) {
            let config = EconomicConfig::new(1.0, 720.0).with_breakeven_floor_mist(0);
            let small = estimate_breakeven(&two_validator_snapshot(stake), &config).unwrap();
            let large = estimate_breakeven(&two_validator_snapshot(stake + extra), &config).unwrap();

            prop_assert!(large.reward_share.k > small.reward_share.k);
            prop_assert!(large.rgp_mist < small.rgp_mist);
        }
    }
}
