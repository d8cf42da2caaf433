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

//! Fixtures shared by unit and integration tests.

use alloy_primitives::U256;

use crate::snapshot::{
    ActiveValidatorInfo, ChainState, CheckpointSummary, DelegatedStake, GasCostSummary,
    StakeRecord, SystemStateSummary,
};

/// Address of the validator under test
pub const VALIDATOR: &str = "0x44b1b319e23495995fc837dafd28fc6af8b645edddff0fc1467f1ad631362c23";

/// One day in milliseconds
pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// An active validator whose pool balance equals its next epoch stake
pub fn active_validator(address: &str, next_epoch_stake: u64, voting_power: u64) -> ActiveValidatorInfo {
    ActiveValidatorInfo {
        address: address.to_string(),
        pool_token_balance: U256::from(next_epoch_stake),
        pending_stake: U256::ZERO,
        pending_pool_token_withdraw: U256::ZERO,
        next_epoch_stake: U256::from(next_epoch_stake),
        next_epoch_commission_rate: 0,
        voting_power,
    }
}

/// A network made of a single validator that fully self-stakes 1 SUI, one full day into
/// a one day epoch, with no storage fund, no subsidy and exactly one processed gas unit.
pub fn single_validator_state() -> ChainState {
    ChainState {
        validator_address: VALIDATOR.to_string(),
        stakes: vec![DelegatedStake {
            validator_address: VALIDATOR.to_string(),
            stakes: vec![StakeRecord { principal: U256::from(1_000_000_000u64), estimated_reward: None }],
        }],
        system_state: SystemStateSummary {
            epoch: 100,
            active_validators: vec![active_validator(VALIDATOR, 1_000_000_000, 10_000)],
            storage_fund_non_refundable_balance: U256::ZERO,
            storage_fund_total_object_storage_rebates: U256::ZERO,
            epoch_start_timestamp_ms: 0,
            epoch_duration_ms: DAY_MS,
            reference_gas_price: U256::from(1_000u64),
            stake_subsidy_current_distribution_amount: U256::ZERO,
            stake_subsidy_period_length: 10,
            stake_subsidy_decrease_rate: 1_000,
            validator_report_records: Default::default(),
        },
        checkpoint: CheckpointSummary {
            epoch: 100,
            sequence_number: 1_000,
            timestamp_ms: DAY_MS,
            epoch_rolling_gas_cost_summary: GasCostSummary {
                computation_cost: U256::from(1_000u64),
                storage_cost: U256::ZERO,
                storage_rebate: U256::ZERO,
            },
        },
    }
}

/// Add a report from `reporter` against `reported` to the state
pub fn report(state: &mut ChainState, reporter: &str, reported: &str) {
    state
        .system_state
        .validator_report_records
        .entry(reporter.to_string())
        .or_default()
        .insert(reported.to_string());
}
