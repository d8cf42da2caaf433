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

//! Consistent snapshot retrieval.
//!
//! The system state, the latest checkpoint and the validator's stakes are read separately.
//! If an epoch boundary passes between those reads, the bundle describes two different
//! epochs and is fetched again as a whole.

use std::time::Duration;

use sui_rgp::{
    ChainState, ChainStateSnapshot, CheckpointSummary, DelegatedStake, SnapshotError,
    SystemStateSummary,
};
use thiserror::Error;

use crate::rpc::{RpcError, SuiRpcClient};

/// Default number of times a stale bundle is fetched again
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay between two attempts
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// Errors returned by [SnapshotFetcher]
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// A read failed
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Every attempt produced a bundle spanning two epochs
    #[error("chain state still inconsistent after {attempts} attempts: {source}")]
    Stale {
        /// Number of attempts made
        attempts: u32,
        /// Inconsistency detected on the last attempt
        source: SnapshotError,
    },
}

/// Read access to the chain state needed for a snapshot
#[async_trait::async_trait]
pub trait ChainReader: Send + Sync {
    /// Latest system state summary
    async fn latest_system_state(&self) -> Result<SystemStateSummary, RpcError>;

    /// Sequence number of the latest checkpoint
    async fn latest_checkpoint_sequence_number(&self) -> Result<u64, RpcError>;

    /// Checkpoint by sequence number
    async fn checkpoint(&self, sequence_number: u64) -> Result<CheckpointSummary, RpcError>;

    /// Stakes owned by `owner`
    async fn stakes(&self, owner: &str) -> Result<Vec<DelegatedStake>, RpcError>;
}

#[async_trait::async_trait]
impl ChainReader for SuiRpcClient {
    async fn latest_system_state(&self) -> Result<SystemStateSummary, RpcError> {
        SuiRpcClient::latest_system_state(self).await
    }

    async fn latest_checkpoint_sequence_number(&self) -> Result<u64, RpcError> {
        SuiRpcClient::latest_checkpoint_sequence_number(self).await
    }

    async fn checkpoint(&self, sequence_number: u64) -> Result<CheckpointSummary, RpcError> {
        SuiRpcClient::checkpoint(self, sequence_number).await
    }

    async fn stakes(&self, owner: &str) -> Result<Vec<DelegatedStake>, RpcError> {
        SuiRpcClient::stakes(self, owner).await
    }
}

/// Fetches a [ChainStateSnapshot] whose parts describe the same epoch
pub struct SnapshotFetcher<R> {
    reader: R,
    max_retries: u32,
    retry_backoff: Duration,
}

impl<R: ChainReader> SnapshotFetcher<R> {
    /// Create a fetcher with the default retry policy
    pub fn new(reader: R) -> Self {
        Self { reader, max_retries: DEFAULT_MAX_RETRIES, retry_backoff: DEFAULT_RETRY_BACKOFF }
    }

    /// Set how many times a stale bundle is fetched again
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay between attempts
    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// The underlying reader
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Read one bundle without checking its consistency
    pub async fn fetch_state(&self, validator: &str) -> Result<ChainState, RetrievalError> {
        let sequence_number = self.reader.latest_checkpoint_sequence_number().await?;

        let (system_state, checkpoint, stakes) = tokio::join!(
            self.reader.latest_system_state(),
            self.reader.checkpoint(sequence_number),
            self.reader.stakes(validator),
        );

        Ok(ChainState {
            validator_address: validator.to_string(),
            stakes: stakes?,
            system_state: system_state?,
            checkpoint: checkpoint?,
        })
    }

    /// Fetch a validated snapshot, retrying the whole bundle when it spans an epoch change.
    pub async fn fetch(&self, validator: &str) -> Result<ChainStateSnapshot, RetrievalError> {
        let attempts = self.max_retries + 1;
        let mut attempt = 1;
        loop {
            let state = self.fetch_state(validator).await?;
            tracing::debug!(
                "Fetched epoch {} with checkpoint {} (attempt {attempt}/{attempts})",
                state.system_state.epoch,
                state.checkpoint.sequence_number
            );

            match ChainStateSnapshot::validated(state) {
                Ok(snapshot) => return Ok(snapshot),
                Err(source) if attempt >= attempts => {
                    return Err(RetrievalError::Stale { attempts, source });
                }
                Err(err) => {
                    tracing::warn!(
                        "Discarding chain state ({err}), retrying in {:?}",
                        self.retry_backoff
                    );
                    tokio::time::sleep(self.retry_backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
