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

use thiserror::Error;

/// Errors raised while assembling a [crate::ChainStateSnapshot]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// The checkpoint and the system state were read from different epochs
    #[error("stale snapshot: system state is at epoch {system_state_epoch}, checkpoint is at epoch {checkpoint_epoch}")]
    EpochMismatch {
        /// Epoch reported by the system state summary
        system_state_epoch: u64,
        /// Epoch of the latest checkpoint
        checkpoint_epoch: u64,
    },
}

/// Errors raised by the breakeven computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BreakevenError {
    /// The validator's share of epoch rewards is zero, negative or NaN, so no gas price can
    /// recover its costs
    #[error("breakeven price is undefined: reward share K is {0}, not positive")]
    NonPositiveRewardShare(f64),

    /// The projected gas units for the epoch are zero, negative or NaN
    #[error("breakeven price is undefined: projected gas units u is {0}, not positive")]
    ZeroGasThroughput(f64),

    /// The formula produced NaN or an infinity
    #[error("breakeven price is undefined: computation produced {0}")]
    NonFinite(f64),

    /// The economic configuration is unusable
    #[error("invalid economic config: {0}")]
    InvalidConfig(String),
}

impl BreakevenError {
    /// Whether the error means the breakeven price is mathematically undefined for this snapshot,
    /// as opposed to a configuration problem.
    pub fn is_undefined(&self) -> bool {
        !matches!(self, Self::InvalidConfig(_))
    }
}
