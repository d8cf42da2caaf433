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

//! Gas throughput projection.

use crate::snapshot::ChainStateSnapshot;
use crate::units::mist_to_f64;

/// Smallest epoch progress used in place of zero, when the latest checkpoint is not past
/// the epoch start.
pub const MIN_EPOCH_PROGRESS: f64 = 1e-6;

/// Fraction of the current epoch elapsed at the latest checkpoint, in `(0, 1]`.
///
/// A zero epoch duration is treated as a completed epoch.
pub fn epoch_progress(snapshot: &ChainStateSnapshot) -> f64 {
    let start = snapshot.system_state().epoch_start_timestamp_ms;
    let duration = snapshot.system_state().epoch_duration_ms;
    let now = snapshot.checkpoint().timestamp_ms;

    if duration == 0 {
        return 1.0;
    }
    if now <= start {
        return MIN_EPOCH_PROGRESS;
    }
    ((now - start) as f64 / duration as f64).clamp(MIN_EPOCH_PROGRESS, 1.0)
}

/// Gas units processed so far in the epoch: computation cost divided by the reference gas price.
///
/// Zero when the reference gas price is zero.
pub fn processed_gas_units(snapshot: &ChainStateSnapshot) -> f64 {
    let rgp = snapshot.system_state().reference_gas_price;
    if rgp.is_zero() {
        return 0.0;
    }
    mist_to_f64(snapshot.gas_cost_summary().computation_cost) / mist_to_f64(rgp)
}

/// Gas units projected for the whole epoch (`u`), assuming a constant consumption rate.
///
/// The result is not integral; round up when a whole number of gas units is needed.
pub fn projected_gas_units(snapshot: &ChainStateSnapshot, epoch_progress: f64) -> f64 {
    processed_gas_units(snapshot) / epoch_progress
}
