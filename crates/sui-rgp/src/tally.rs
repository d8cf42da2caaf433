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

//! Slashing tally resolution.
//!
//! Validators report misbehaving peers. Once the reporters of a validator hold more than
//! two thirds of the voting power, the validator is excluded from the epoch's rewards.

use crate::snapshot::ChainStateSnapshot;
use crate::units::{bps_to_fraction, BASIS_POINTS};

/// Fraction of voting power above which a reported validator loses its rewards
pub const TALLY_EXCLUSION_THRESHOLD: f64 = 2.0 / 3.0;

/// Outcome of the tally for one validator
#[derive(Debug, Clone, PartialEq)]
pub struct TallyStatus {
    /// Addresses that reported the validator
    pub reporters: Vec<String>,
    /// Summed voting power of the reporters, in basis points
    pub score_bps: u64,
    /// Reward multiplier `mu`, 1 when eligible and 0 when excluded
    pub mu: f64,
}

impl TallyStatus {
    /// Summed voting power of the reporters as a fraction
    pub fn score(&self) -> f64 {
        bps_to_fraction(self.score_bps)
    }

    /// Whether the validator is excluded from reward distribution
    pub fn is_excluded(&self) -> bool {
        self.mu == 0.0
    }
}

/// Resolve the tally for the snapshot's validator.
///
/// The threshold comparison is done in integer basis points, `3 * score > 2 * 10_000`,
/// so a score of exactly two thirds never flips due to rounding.
pub fn resolve_tally(snapshot: &ChainStateSnapshot) -> TallyStatus {
    let target = snapshot.validator_address();
    let reporters: Vec<String> = snapshot
        .system_state()
        .validator_report_records
        .iter()
        .filter(|(_, reported)| reported.contains(target))
        .map(|(reporter, _)| reporter.clone())
        .collect();

    let score_bps: u64 =
        reporters.iter().map(|reporter| snapshot.voting_power_of(reporter)).sum();

    let excluded = score_bps.saturating_mul(3) > BASIS_POINTS * 2;
    if excluded {
        tracing::warn!(
            "Validator {target} reported by {} validators holding {score_bps} bps, rewards are excluded",
            reporters.len()
        );
    }

    TallyStatus { reporters, score_bps, mu: if excluded { 0.0 } else { 1.0 } }
}
