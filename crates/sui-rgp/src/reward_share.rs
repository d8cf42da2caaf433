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

//! The validator's share of total epoch rewards.
//!
//! ```text
//! K = alpha * (beta + delta * (1 - beta)) * mu * sigma + (1 - alpha) * gamma / N
//! ```
//!
//! * `alpha`: fraction of rewards not absorbed by the storage fund
//! * `beta`: self-stake share of the validator's pool
//! * `delta`: next epoch commission rate
//! * `mu`: 1 unless the validator is excluded by the slashing tally
//! * `sigma`: the pool's share of the next epoch network stake
//! * `gamma`: fraction of the storage fund rewards distributed to validators
//! * `N`: number of active validators

use alloy_primitives::U256;

use crate::snapshot::ChainStateSnapshot;
use crate::tally::resolve_tally;
use crate::units::{bps_to_fraction, mist_to_f64};

/// Default value of `gamma`
pub const DEFAULT_REWARD_DISTRIBUTION_FRACTION: f64 = 0.95;

/// Every sub-ratio of `K` together with `K` itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardShare {
    /// Fraction of rewards not absorbed by the storage fund
    pub alpha: f64,
    /// Self-stake share of the pool
    pub beta: f64,
    /// Reward distribution fraction
    pub gamma: f64,
    /// Commission rate as a fraction
    pub delta: f64,
    /// Tally multiplier
    pub mu: f64,
    /// Pool share of the network stake
    pub sigma: f64,
    /// Number of active validators
    pub validator_count: usize,
    /// The validator's share of total epoch rewards
    pub k: f64,
}

impl RewardShare {
    /// Combine the sub-ratios into `K`.
    ///
    /// The flat `(1 - alpha) * gamma / N` term is zero for an empty validator set.
    pub fn new(alpha: f64, beta: f64, gamma: f64, delta: f64, mu: f64, sigma: f64, n: usize) -> Self {
        let stake_weighted = alpha * (beta + delta * (1.0 - beta)) * mu * sigma;
        let flat = if n == 0 { 0.0 } else { (1.0 - alpha) * gamma / n as f64 };
        Self { alpha, beta, gamma, delta, mu, sigma, validator_count: n, k: stake_weighted + flat }
    }
}

fn ratio(numerator: U256, denominator: U256) -> f64 {
    if denominator.is_zero() {
        return 0.0;
    }
    mist_to_f64(numerator) / mist_to_f64(denominator)
}

/// `beta`: self-stake divided by the pool total token balance, 0 for an empty pool
pub fn self_stake_share(snapshot: &ChainStateSnapshot) -> f64 {
    ratio(snapshot.self_stake_amount(), snapshot.pool_total_token_balance())
}

/// `sigma`: pool total token balance divided by the next epoch network stake
pub fn network_stake_share(snapshot: &ChainStateSnapshot) -> f64 {
    ratio(snapshot.pool_total_token_balance(), snapshot.next_epoch_network_total_stake())
}

/// `delta`: next epoch commission rate as a fraction, 0 for an inactive validator
pub fn commission_rate(snapshot: &ChainStateSnapshot) -> f64 {
    bps_to_fraction(snapshot.validator().next_epoch_commission_rate)
}

/// Storage fund, including the storage fees net of rebates projected for the rest of the epoch,
/// relative to the next epoch network stake. This is `1 - alpha`.
pub fn storage_fund_share(snapshot: &ChainStateSnapshot, epoch_progress: f64) -> f64 {
    let total_stake = snapshot.next_epoch_network_total_stake();
    if total_stake.is_zero() {
        return 0.0;
    }

    let state = snapshot.system_state();
    let current_fund = mist_to_f64(
        state.storage_fund_non_refundable_balance + state.storage_fund_total_object_storage_rebates,
    );
    let gas = snapshot.gas_cost_summary();
    let net_storage = mist_to_f64(gas.storage_cost) - mist_to_f64(gas.storage_rebate);
    let projected_delta = net_storage / epoch_progress;

    (current_fund + projected_delta) / mist_to_f64(total_stake)
}

/// Compute `K` and all of its inputs for the snapshot's validator.
pub fn reward_share(snapshot: &ChainStateSnapshot, epoch_progress: f64, gamma: f64) -> RewardShare {
    let alpha = 1.0 - storage_fund_share(snapshot, epoch_progress);
    let beta = self_stake_share(snapshot);
    let delta = commission_rate(snapshot);
    let mu = resolve_tally(snapshot).mu;
    let sigma = network_stake_share(snapshot);
    let n = snapshot.active_validator_count();

    let share = RewardShare::new(alpha, beta, gamma, delta, mu, sigma, n);
    tracing::debug!(
        "Reward share for {}: alpha={alpha} beta={beta} gamma={gamma} delta={delta} mu={mu} sigma={sigma} N={n} K={}",
        snapshot.validator_address(),
        share.k
    );
    share
}
