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

//! Breakeven reference gas price estimation for Sui validators.
//!
//! Given a [ChainStateSnapshot] of one validator and the network, and the operator's
//! [EconomicConfig], [estimate_breakeven] computes the lowest reference gas price at which
//! the validator's share of epoch rewards covers its operating costs for the epoch.
//!
//! Everything in this crate is synchronous and free of I/O. Fetching the chain state and
//! the SUI price is left to the caller.

#![deny(missing_docs)]

/// Breakeven solver and economic configuration
pub mod breakeven;
/// Error types
pub mod error;
/// Reward share (`K`) calculation
pub mod reward_share;
/// Chain state snapshot data model
pub mod snapshot;
/// Stake subsidy projection
pub mod subsidy;
/// Slashing tally resolution
pub mod tally;
/// Gas throughput projection
pub mod throughput;
/// MIST and SUI unit conversions
pub mod units;

/// Test fixtures
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use breakeven::{
    epoch_costs_usd, estimate_breakeven, solve_breakeven, BreakevenEstimate, EconomicConfig,
    SubsidyTerm, DEFAULT_BREAKEVEN_FLOOR_MIST, HOURS_PER_BILLING_MONTH,
};
pub use error::{BreakevenError, SnapshotError};
pub use reward_share::{reward_share, RewardShare, DEFAULT_REWARD_DISTRIBUTION_FRACTION};
pub use snapshot::{
    ActiveValidatorInfo, ChainState, ChainStateSnapshot, CheckpointSummary, DelegatedStake,
    GasCostSummary, StakeRecord, SystemStateSummary,
};
pub use subsidy::projected_stake_subsidy;
pub use tally::{resolve_tally, TallyStatus, TALLY_EXCLUSION_THRESHOLD};
pub use throughput::{epoch_progress, projected_gas_units, MIN_EPOCH_PROGRESS};
pub use units::{mist_to_sui, sui_to_mist, MIST_PER_SUI};
