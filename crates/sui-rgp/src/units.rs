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

//! Conversions between MIST, the native integer unit, and SUI.

use alloy_primitives::{
    utils::{format_units, UnitsError},
    U256,
};

/// Number of decimal places of the SUI display unit
pub const SUI_DECIMALS: u32 = 9;

/// Number of MIST in one SUI
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// Basis points denominator used for commission rates, voting power and decay rates
pub const BASIS_POINTS: u64 = 10_000;

/// Convert a MIST amount to SUI
pub fn mist_to_sui(mist: f64) -> f64 {
    mist / MIST_PER_SUI as f64
}

/// Convert a SUI amount to MIST
pub fn sui_to_mist(sui: f64) -> f64 {
    sui * MIST_PER_SUI as f64
}

/// Lossy conversion of an integer MIST quantity into a float.
///
/// Values above `u128::MAX` saturate; no on-chain balance gets anywhere close.
pub fn mist_to_f64(value: U256) -> f64 {
    u128::try_from(value).unwrap_or(u128::MAX) as f64
}

/// Convert a basis point value to a fraction in `[0, 1]` for values up to [BASIS_POINTS].
pub fn bps_to_fraction(bps: u64) -> f64 {
    bps as f64 / BASIS_POINTS as f64
}

/// Format a MIST amount as a SUI string with all nine decimals.
pub fn format_sui(mist: U256) -> Result<String, UnitsError> {
    format_units(mist, SUI_DECIMALS as u8)
}
