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

//! Minimal Sui JSON-RPC client covering the reads needed to build a
//! [sui_rgp::ChainStateSnapshot].
//!
//! Sui encodes 64-bit integers as decimal strings. The DTOs in this module accept either a
//! string or a JSON number and map into the engine's snapshot types.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use alloy_primitives::U256;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use sui_rgp::{
    ActiveValidatorInfo, CheckpointSummary, DelegatedStake, GasCostSummary, StakeRecord,
    SystemStateSummary,
};
use thiserror::Error;
use url::Url;

/// Move event type emitted once per validator at every epoch change
pub const VALIDATOR_EPOCH_INFO_EVENT: &str = "0x3::validator_set::ValidatorEpochInfoEventV2";

/// Maximum page size accepted by `suix_queryEvents`
pub const EVENT_PAGE_SIZE: u64 = 50;

/// Upper bound on pages scanned when looking for a validator's epoch events
pub const MAX_EVENT_PAGES: usize = 200;

/// Errors returned by [SuiRpcClient]
#[derive(Error, Debug)]
pub enum RpcError {
    /// Transport or HTTP status error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object
    #[error("JSON-RPC error {code} calling {method}: {message}")]
    JsonRpc {
        /// Method that failed
        method: String,
        /// JSON-RPC error code
        code: i64,
        /// Error message from the node
        message: String,
    },

    /// The response could not be decoded
    #[error("malformed response to {method}: {reason}")]
    Malformed {
        /// Method whose response was malformed
        method: String,
        /// What went wrong
        reason: String,
    },
}

/// Normalize a Sui address to `0x` followed by 64 lowercase hex digits.
pub fn normalize_sui_address(address: &str) -> Result<String, String> {
    let hex = address.trim().strip_prefix("0x").unwrap_or(address.trim());
    if hex.is_empty() || hex.len() > 64 {
        return Err(format!("invalid Sui address length: {address}"));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid Sui address: {address}"));
    }
    Ok(format!("0x{:0>64}", hex.to_ascii_lowercase()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(u64),
}

fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s.parse().map_err(serde::de::Error::custom),
        StringOrNumber::Number(n) => Ok(n),
    }
}

fn parse_u256<E: serde::de::Error>(value: StringOrNumber) -> Result<U256, E> {
    match value {
        StringOrNumber::String(s) => U256::from_str_radix(&s, 10).map_err(E::custom),
        StringOrNumber::Number(n) => Ok(U256::from(n)),
    }
}

fn de_u256<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    parse_u256(StringOrNumber::deserialize(deserializer)?)
}

fn de_opt_u256<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<U256>, D::Error> {
    Option::<StringOrNumber>::deserialize(deserializer)?.map(parse_u256).transpose()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidatorSummaryDto {
    sui_address: String,
    #[serde(deserialize_with = "de_u256")]
    pool_token_balance: U256,
    #[serde(deserialize_with = "de_u256")]
    pending_stake: U256,
    #[serde(deserialize_with = "de_u256")]
    pending_pool_token_withdraw: U256,
    #[serde(deserialize_with = "de_u256")]
    next_epoch_stake: U256,
    #[serde(deserialize_with = "de_u64")]
    next_epoch_commission_rate: u64,
    #[serde(deserialize_with = "de_u64")]
    voting_power: u64,
}

impl From<ValidatorSummaryDto> for ActiveValidatorInfo {
    fn from(dto: ValidatorSummaryDto) -> Self {
        Self {
            address: dto.sui_address,
            pool_token_balance: dto.pool_token_balance,
            pending_stake: dto.pending_stake,
            pending_pool_token_withdraw: dto.pending_pool_token_withdraw,
            next_epoch_stake: dto.next_epoch_stake,
            next_epoch_commission_rate: dto.next_epoch_commission_rate,
            voting_power: dto.voting_power,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SystemStateDto {
    #[serde(deserialize_with = "de_u64")]
    epoch: u64,
    active_validators: Vec<ValidatorSummaryDto>,
    #[serde(deserialize_with = "de_u256")]
    storage_fund_non_refundable_balance: U256,
    #[serde(deserialize_with = "de_u256")]
    storage_fund_total_object_storage_rebates: U256,
    #[serde(deserialize_with = "de_u64")]
    epoch_start_timestamp_ms: u64,
    #[serde(deserialize_with = "de_u64")]
    epoch_duration_ms: u64,
    #[serde(deserialize_with = "de_u256")]
    reference_gas_price: U256,
    #[serde(deserialize_with = "de_u256")]
    stake_subsidy_current_distribution_amount: U256,
    #[serde(deserialize_with = "de_u64")]
    stake_subsidy_period_length: u64,
    #[serde(deserialize_with = "de_u64")]
    stake_subsidy_decrease_rate: u64,
    #[serde(default)]
    validator_report_records: Vec<(String, Vec<String>)>,
}

impl From<SystemStateDto> for SystemStateSummary {
    fn from(dto: SystemStateDto) -> Self {
        Self {
            epoch: dto.epoch,
            active_validators: dto.active_validators.into_iter().map(Into::into).collect(),
            storage_fund_non_refundable_balance: dto.storage_fund_non_refundable_balance,
            storage_fund_total_object_storage_rebates: dto.storage_fund_total_object_storage_rebates,
            epoch_start_timestamp_ms: dto.epoch_start_timestamp_ms,
            epoch_duration_ms: dto.epoch_duration_ms,
            reference_gas_price: dto.reference_gas_price,
            stake_subsidy_current_distribution_amount: dto.stake_subsidy_current_distribution_amount,
            stake_subsidy_period_length: dto.stake_subsidy_period_length,
            stake_subsidy_decrease_rate: dto.stake_subsidy_decrease_rate,
            validator_report_records: dto
                .validator_report_records
                .into_iter()
                .map(|(reporter, reported)| (reporter, reported.into_iter().collect()))
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GasCostSummaryDto {
    #[serde(deserialize_with = "de_u256")]
    computation_cost: U256,
    #[serde(deserialize_with = "de_u256")]
    storage_cost: U256,
    #[serde(deserialize_with = "de_u256")]
    storage_rebate: U256,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckpointDto {
    #[serde(deserialize_with = "de_u64")]
    epoch: u64,
    #[serde(deserialize_with = "de_u64")]
    sequence_number: u64,
    #[serde(deserialize_with = "de_u64")]
    timestamp_ms: u64,
    epoch_rolling_gas_cost_summary: GasCostSummaryDto,
}

impl From<CheckpointDto> for CheckpointSummary {
    fn from(dto: CheckpointDto) -> Self {
        let gas = dto.epoch_rolling_gas_cost_summary;
        Self {
            epoch: dto.epoch,
            sequence_number: dto.sequence_number,
            timestamp_ms: dto.timestamp_ms,
            epoch_rolling_gas_cost_summary: GasCostSummary {
                computation_cost: gas.computation_cost,
                storage_cost: gas.storage_cost,
                storage_rebate: gas.storage_rebate,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StakeDto {
    #[serde(deserialize_with = "de_u256")]
    principal: U256,
    #[serde(default, deserialize_with = "de_opt_u256")]
    estimated_reward: Option<U256>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DelegatedStakeDto {
    validator_address: String,
    stakes: Vec<StakeDto>,
}

impl From<DelegatedStakeDto> for DelegatedStake {
    fn from(dto: DelegatedStakeDto) -> Self {
        Self {
            validator_address: dto.validator_address,
            stakes: dto
                .stakes
                .into_iter()
                .map(|stake| StakeRecord {
                    principal: stake.principal,
                    estimated_reward: stake.estimated_reward,
                })
                .collect(),
        }
    }
}

/// Per-epoch performance of one validator, as emitted at the end of each epoch
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidatorEpochInfo {
    /// Epoch that ended
    #[serde(deserialize_with = "de_u64")]
    pub epoch: u64,
    /// Validator address
    pub validator_address: String,
    /// Gas price the validator quoted in the reference gas price survey, in MIST
    #[serde(deserialize_with = "de_u64")]
    pub reference_gas_survey_quote: u64,
    /// Stake at the end of the epoch, in MIST
    #[serde(deserialize_with = "de_u256")]
    pub stake: U256,
    /// Commission rate in basis points
    #[serde(deserialize_with = "de_u64")]
    pub commission_rate: u64,
    /// Rewards paid to the staking pool, in MIST
    #[serde(deserialize_with = "de_u256")]
    pub pool_staking_reward: U256,
    /// Storage fund rewards paid to the validator, in MIST
    #[serde(deserialize_with = "de_u256")]
    pub storage_fund_staking_reward: U256,
    /// Tallying score computed by the protocol
    #[serde(default, deserialize_with = "de_u64")]
    pub tallying_rule_global_score: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDto {
    parsed_json: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventPageDto {
    data: Vec<EventDto>,
    next_cursor: Option<Value>,
    has_next_page: bool,
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcErrorObject>,
}

/// JSON-RPC client for a Sui full node
pub struct SuiRpcClient {
    client: Client,
    url: Url,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    /// Create a client for the node at `url`
    pub fn new(url: Url, timeout: Duration) -> Result<Self, RpcError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url, next_id: AtomicU64::new(1) })
    }

    /// The node endpoint
    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Calling {method} (id {id}) on {}", self.url);

        let request = JsonRpcRequest { jsonrpc: "2.0", id, method, params };
        let response: JsonRpcResponse = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(RpcError::JsonRpc {
                method: method.to_string(),
                code: error.code,
                message: error.message,
            });
        }
        let result = response.result.ok_or_else(|| RpcError::Malformed {
            method: method.to_string(),
            reason: "missing result".to_string(),
        })?;
        serde_json::from_value(result).map_err(|e| RpcError::Malformed {
            method: method.to_string(),
            reason: e.to_string(),
        })
    }

    /// Latest system state summary
    pub async fn latest_system_state(&self) -> Result<SystemStateSummary, RpcError> {
        let dto: SystemStateDto = self.call("suix_getLatestSuiSystemState", json!([])).await?;
        Ok(dto.into())
    }

    /// Reference gas price of the current epoch, in MIST
    pub async fn reference_gas_price(&self) -> Result<u64, RpcError> {
        let value: StringOrNumberValue = self.call("suix_getReferenceGasPrice", json!([])).await?;
        Ok(value.0)
    }

    /// Sequence number of the latest executed checkpoint
    pub async fn latest_checkpoint_sequence_number(&self) -> Result<u64, RpcError> {
        let value: StringOrNumberValue =
            self.call("sui_getLatestCheckpointSequenceNumber", json!([])).await?;
        Ok(value.0)
    }

    /// Checkpoint by sequence number
    pub async fn checkpoint(&self, sequence_number: u64) -> Result<CheckpointSummary, RpcError> {
        let dto: CheckpointDto =
            self.call("sui_getCheckpoint", json!([sequence_number.to_string()])).await?;
        Ok(dto.into())
    }

    /// All stakes owned by `owner`
    pub async fn stakes(&self, owner: &str) -> Result<Vec<DelegatedStake>, RpcError> {
        let dtos: Vec<DelegatedStakeDto> = self.call("suix_getStakes", json!([owner])).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    /// Most recent epoch info events of `validator`, newest first, at most `limit` of them.
    ///
    /// Every validator emits one event per epoch, so pages are scanned until enough events
    /// for this validator are found or [MAX_EVENT_PAGES] pages were read.
    pub async fn validator_epoch_info_events(
        &self,
        validator: &str,
        limit: usize,
    ) -> Result<Vec<ValidatorEpochInfo>, RpcError> {
        let method = "suix_queryEvents";
        let query = json!({ "MoveEventType": VALIDATOR_EPOCH_INFO_EVENT });
        let mut cursor = Value::Null;
        let mut events = Vec::new();

        for page in 0..MAX_EVENT_PAGES {
            if events.len() >= limit {
                break;
            }
            let result: EventPageDto =
                self.call(method, json!([query, cursor, EVENT_PAGE_SIZE, true])).await?;
            tracing::debug!("Scanned event page {page} ({} events)", result.data.len());

            for event in result.data {
                let info: ValidatorEpochInfo = serde_json::from_value(event.parsed_json)
                    .map_err(|e| RpcError::Malformed {
                        method: method.to_string(),
                        reason: e.to_string(),
                    })?;
                if info.validator_address == validator && events.len() < limit {
                    events.push(info);
                }
            }

            match result.next_cursor {
                Some(next) if result.has_next_page => cursor = next,
                _ => break,
            }
        }

        Ok(events)
    }
}

/// A bare integer result, encoded as a string or a number
struct StringOrNumberValue(u64);

impl<'de> Deserialize<'de> for StringOrNumberValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        de_u64(deserializer).map(Self)
    }
}
