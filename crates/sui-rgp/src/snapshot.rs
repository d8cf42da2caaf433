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

//! Immutable view of the chain state used by every estimator.
//!
//! A [ChainState] is the raw bundle produced by the retrieval layer. Wrapping it in a
//! [ChainStateSnapshot] resolves all lookups and fallbacks once, so the formulas downstream
//! only ever deal with total, always-defined inputs.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// A single stake position inside a [DelegatedStake]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    /// Principal in MIST
    pub principal: U256,
    /// Rewards accrued so far in MIST, absent for pending stakes
    #[serde(default)]
    pub estimated_reward: Option<U256>,
}

impl StakeRecord {
    /// Principal plus estimated reward, treating a missing reward as zero
    pub fn total(&self) -> U256 {
        self.principal + self.estimated_reward.unwrap_or_default()
    }
}

/// Stakes an owner delegated to one validator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedStake {
    /// Validator the stakes are delegated to
    pub validator_address: String,
    /// Individual stake positions
    pub stakes: Vec<StakeRecord>,
}

/// Economic attributes of one active validator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveValidatorInfo {
    /// Validator Sui address
    pub address: String,
    /// Pool token balance in MIST
    pub pool_token_balance: U256,
    /// Stake activating at the next epoch boundary in MIST
    pub pending_stake: U256,
    /// Pool tokens being withdrawn at the next epoch boundary
    pub pending_pool_token_withdraw: U256,
    /// Total stake for the next epoch in MIST
    pub next_epoch_stake: U256,
    /// Commission rate for the next epoch, in basis points
    pub next_epoch_commission_rate: u64,
    /// Voting power, in basis points
    pub voting_power: u64,
}

/// Network wide state as of the latest epoch boundary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStateSummary {
    /// Current epoch
    pub epoch: u64,
    /// Active validator set
    pub active_validators: Vec<ActiveValidatorInfo>,
    /// Non-refundable part of the storage fund in MIST
    pub storage_fund_non_refundable_balance: U256,
    /// Storage rebates held by the storage fund in MIST
    pub storage_fund_total_object_storage_rebates: U256,
    /// Start of the current epoch, unix milliseconds
    pub epoch_start_timestamp_ms: u64,
    /// Epoch length in milliseconds
    pub epoch_duration_ms: u64,
    /// Reference gas price of the current epoch in MIST
    pub reference_gas_price: U256,
    /// Subsidy paid per distribution in MIST
    pub stake_subsidy_current_distribution_amount: U256,
    /// Number of distributions per subsidy period
    pub stake_subsidy_period_length: u64,
    /// Decay applied to the distribution amount at the end of a period, in basis points
    pub stake_subsidy_decrease_rate: u64,
    /// Reporter address to the set of validators it reported
    #[serde(default)]
    pub validator_report_records: BTreeMap<String, BTreeSet<String>>,
}

/// Rolling gas accounting of the current epoch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasCostSummary {
    /// Computation fees charged so far in MIST
    pub computation_cost: U256,
    /// Storage fees charged so far in MIST
    pub storage_cost: U256,
    /// Storage rebates paid out so far in MIST
    pub storage_rebate: U256,
}

/// The latest checkpoint as seen by the retrieval layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSummary {
    /// Epoch the checkpoint belongs to
    pub epoch: u64,
    /// Checkpoint sequence number
    pub sequence_number: u64,
    /// Checkpoint timestamp, unix milliseconds
    pub timestamp_ms: u64,
    /// Gas costs accumulated in the epoch up to and including this checkpoint
    pub epoch_rolling_gas_cost_summary: GasCostSummary,
}

/// Raw chain data fetched for one validator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainState {
    /// The validator being evaluated
    pub validator_address: String,
    /// Stakes owned by the validator address, for any validator
    pub stakes: Vec<DelegatedStake>,
    /// Latest system state
    pub system_state: SystemStateSummary,
    /// Latest checkpoint
    pub checkpoint: CheckpointSummary,
}

/// A resolved, read-only snapshot of [ChainState]
#[derive(Debug, Clone)]
pub struct ChainStateSnapshot {
    state: ChainState,
    validator: ActiveValidatorInfo,
    is_active: bool,
    self_stake_amount: U256,
    next_epoch_network_total_stake: U256,
}

impl ChainStateSnapshot {
    /// Build a snapshot without checking that its parts describe the same epoch.
    pub fn new(state: ChainState) -> Self {
        let found = state
            .system_state
            .active_validators
            .iter()
            .find(|validator| validator.address == state.validator_address)
            .cloned();
        let is_active = found.is_some();
        let validator = found.unwrap_or_else(|| ActiveValidatorInfo {
            address: state.validator_address.clone(),
            ..Default::default()
        });

        let self_stake_amount = state
            .stakes
            .iter()
            .filter(|stake| stake.validator_address == state.validator_address)
            .flat_map(|stake| stake.stakes.iter())
            .fold(U256::ZERO, |acc, record| acc + record.total());

        let next_epoch_network_total_stake = state
            .system_state
            .active_validators
            .iter()
            .fold(U256::ZERO, |acc, validator| acc + validator.next_epoch_stake);

        if !is_active {
            tracing::warn!(
                "Validator {} is not in the active set, using zero stake and commission",
                state.validator_address
            );
        }

        Self { state, validator, is_active, self_stake_amount, next_epoch_network_total_stake }
    }

    /// Build a snapshot, rejecting a checkpoint from a different epoch than the system state.
    pub fn validated(state: ChainState) -> Result<Self, SnapshotError> {
        let system_state_epoch = state.system_state.epoch;
        let checkpoint_epoch = state.checkpoint.epoch;
        if system_state_epoch != checkpoint_epoch {
            return Err(SnapshotError::EpochMismatch { system_state_epoch, checkpoint_epoch });
        }
        Ok(Self::new(state))
    }

    /// The raw chain data this snapshot was built from
    pub fn state(&self) -> &ChainState {
        &self.state
    }

    /// Address of the validator being evaluated
    pub fn validator_address(&self) -> &str {
        &self.state.validator_address
    }

    /// The validator's entry in the active set, or a zero-valued record when it is not active
    pub fn validator(&self) -> &ActiveValidatorInfo {
        &self.validator
    }

    /// Whether the validator is part of the active set
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Network wide system state
    pub fn system_state(&self) -> &SystemStateSummary {
        &self.state.system_state
    }

    /// Latest checkpoint
    pub fn checkpoint(&self) -> &CheckpointSummary {
        &self.state.checkpoint
    }

    /// Rolling gas costs of the latest checkpoint
    pub fn gas_cost_summary(&self) -> &GasCostSummary {
        &self.state.checkpoint.epoch_rolling_gas_cost_summary
    }

    /// Stake positions the validator delegated to itself
    pub fn self_stakes(&self) -> impl Iterator<Item = &StakeRecord> {
        self.state
            .stakes
            .iter()
            .filter(|stake| stake.validator_address == self.state.validator_address)
            .flat_map(|stake| stake.stakes.iter())
    }

    /// Sum of principal and estimated reward over all self-stakes, in MIST
    pub fn self_stake_amount(&self) -> U256 {
        self.self_stake_amount
    }

    /// Token balance of the validator's pool effective from the next epoch, in MIST.
    ///
    /// Zero when the validator is not active.
    pub fn pool_total_token_balance(&self) -> U256 {
        let v = &self.validator;
        (v.pool_token_balance + v.pending_stake).saturating_sub(v.pending_pool_token_withdraw)
    }

    /// Sum of next epoch stake over the active set, in MIST
    pub fn next_epoch_network_total_stake(&self) -> U256 {
        self.next_epoch_network_total_stake
    }

    /// Number of active validators
    pub fn active_validator_count(&self) -> usize {
        self.state.system_state.active_validators.len()
    }

    /// Voting power in basis points of any address, zero if it is not an active validator
    pub fn voting_power_of(&self, address: &str) -> u64 {
        self.state
            .system_state
            .active_validators
            .iter()
            .find(|validator| validator.address == address)
            .map(|validator| validator.voting_power)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{active_validator, single_validator_state, VALIDATOR};

    #[test]
    fn test_resolves_active_validator() {
        let snapshot = ChainStateSnapshot::new(single_validator_state());

        assert!(snapshot.is_active());
        assert_eq!(snapshot.validator().address, VALIDATOR);
        assert_eq!(snapshot.pool_total_token_balance(), U256::from(1_000_000_000u64));
        assert_eq!(snapshot.self_stake_amount(), U256::from(1_000_000_000u64));
        assert_eq!(snapshot.next_epoch_network_total_stake(), U256::from(1_000_000_000u64));
        assert_eq!(snapshot.active_validator_count(), 1);
    }

    #[test]
    fn test_missing_validator_falls_back_to_zero() {
        let mut state = single_validator_state();
        state.validator_address = "0xabsent".to_string();
        let snapshot = ChainStateSnapshot::new(state);

        assert!(!snapshot.is_active());
        assert_eq!(snapshot.validator().address, "0xabsent");
        assert_eq!(snapshot.pool_total_token_balance(), U256::ZERO);
        assert_eq!(snapshot.validator().next_epoch_commission_rate, 0);
        // Stakes are delegated to another validator so nothing counts as self-stake.
        assert_eq!(snapshot.self_stake_amount(), U256::ZERO);
    }

    #[test]
    fn test_pool_balance_includes_pending_changes() {
        let mut state = single_validator_state();
        let v = &mut state.system_state.active_validators[0];
        v.pool_token_balance = U256::from(1_000u64);
        v.pending_stake = U256::from(250u64);
        v.pending_pool_token_withdraw = U256::from(100u64);
        let snapshot = ChainStateSnapshot::new(state);

        assert_eq!(snapshot.pool_total_token_balance(), U256::from(1_150u64));
    }

    #[test]
    fn test_self_stake_sums_rewards_and_ignores_other_validators() {
        let mut state = single_validator_state();
        state.stakes = vec![
            DelegatedStake {
                validator_address: VALIDATOR.to_string(),
                stakes: vec![
                    StakeRecord {
                        principal: U256::from(100u64),
                        estimated_reward: Some(U256::from(5u64)),
                    },
                    StakeRecord { principal: U256::from(50u64), estimated_reward: None },
                ],
            },
            DelegatedStake {
                validator_address: "0xother".to_string(),
                stakes: vec![StakeRecord {
                    principal: U256::from(1_000u64),
                    estimated_reward: Some(U256::from(1u64)),
                }],
            },
        ];
        let snapshot = ChainStateSnapshot::new(state);

        assert_eq!(snapshot.self_stake_amount(), U256::from(155u64));
        assert_eq!(snapshot.self_stakes().count(), 2);
    }

    #[test]
    fn test_network_total_stake_and_voting_power_lookup() {
        let mut state = single_validator_state();
        state.system_state.active_validators.push(active_validator("0xpeer", 3_000_000_000, 2500));
        let snapshot = ChainStateSnapshot::new(state);

        assert_eq!(snapshot.next_epoch_network_total_stake(), U256::from(4_000_000_000u64));
        assert_eq!(snapshot.voting_power_of("0xpeer"), 2500);
        assert_eq!(snapshot.voting_power_of("0xnobody"), 0);
    }

    #[test]
    fn test_validated_rejects_epoch_mismatch() {
        let mut state = single_validator_state();
        state.system_state.epoch = 10;
        state.checkpoint.epoch = 11;

        let err = ChainStateSnapshot::validated(state).unwrap_err();
        assert_eq!(err, SnapshotError::EpochMismatch { system_state_epoch: 10, checkpoint_epoch: 11 });
    }

    #[test]
    fn test_validated_accepts_matching_epoch() {
        let snapshot = ChainStateSnapshot::validated(single_validator_state()).unwrap();
        assert_eq!(snapshot.checkpoint().epoch, snapshot.system_state().epoch);
    }

    #[test]
    fn test_chain_state_json_replay() {
        let state = single_validator_state();
        let json = serde_json::to_string(&state).unwrap();
        let decoded: ChainState = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, state);
    }
}
