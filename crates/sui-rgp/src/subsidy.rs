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

//! Stake subsidy projection.

use alloy_primitives::U256;

use crate::snapshot::SystemStateSummary;
use crate::units::BASIS_POINTS;

/// Projected stake subsidy (`S`) paid out at the next epoch boundary, in MIST.
///
/// The distribution amount decays by `stake_subsidy_decrease_rate` at period boundaries; a
/// period length of one means every distribution ends a period.
pub fn projected_stake_subsidy(system_state: &SystemStateSummary) -> U256 {
    let amount = system_state.stake_subsidy_current_distribution_amount;
    if system_state.stake_subsidy_period_length != 1 {
        return amount;
    }

    let rate = system_state.stake_subsidy_decrease_rate.min(BASIS_POINTS);
    amount * U256::from(BASIS_POINTS - rate) / U256::from(BASIS_POINTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subsidy_state(amount: u64, period_length: u64, decrease_rate: u64) -> SystemStateSummary {
        SystemStateSummary {
            stake_subsidy_current_distribution_amount: U256::from(amount),
            stake_subsidy_period_length: period_length,
            stake_subsidy_decrease_rate: decrease_rate,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_decay_within_period() {
        let state = subsidy_state(1_000_000_000_000_000, 10, 1000);
        assert_eq!(projected_stake_subsidy(&state), U256::from(1_000_000_000_000_000u64));
    }

    #[test]
    fn test_decay_when_period_length_is_one() {
        let state = subsidy_state(1_000_000_000_000_000, 1, 1000);
        assert_eq!(projected_stake_subsidy(&state), U256::from(900_000_000_000_000u64));
    }

    #[test]
    fn test_decrease_rate_is_capped() {
        let state = subsidy_state(1_000, 1, 20_000);
        assert_eq!(projected_stake_subsidy(&state), U256::ZERO);
    }
}
