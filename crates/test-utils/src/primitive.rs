// Copyright 2025 RISC Zero, Inc.
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


//! A [DeploymentPrimitive] that records calls instead of talking to a chain.

use std::{collections::HashMap, sync::Mutex};

use alloy::primitives::{keccak256, Address};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use ethix_deploy::{DeployOptions, DeployResult, DeploymentPrimitive, DeploymentRecord};

/// Chain ID reported in the records of a [RecordingDeployer].
pub const CHAIN_ID: u64 = 31337;

#[derive(Default)]
struct State {
    calls: Vec<(String, DeployOptions)>,
    records: HashMap<String, DeploymentRecord>,
    submissions: u64,
}

/// Fake deployment primitive.
///
/// Every call is recorded. A call whose name and arguments match a previous deployment returns
/// the previous record, like a real primitive would; anything else counts as a submission and
/// gets a fresh, deterministic address.
#[derive(Default)]
pub struct RecordingDeployer {
    state: Mutex<State>,
    failure: Option<String>,
}

impl RecordingDeployer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A deployer whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { state: Default::default(), failure: Some(message.into()) }
    }

    /// All `deploy` calls so far, in order.
    pub fn calls(&self) -> Vec<(String, DeployOptions)> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of deployments that were actually submitted.
    pub fn submissions(&self) -> u64 {
        self.state.lock().unwrap().submissions
    }
}

#[async_trait]
impl DeploymentPrimitive for RecordingDeployer {
    async fn deploy(&self, name: &str, options: DeployOptions) -> anyhow::Result<DeployResult> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((name.to_string(), options.clone()));

        if let Some(message) = &self.failure {
            return Err(anyhow!(message.clone()));
        }

        if let Some(record) = state.records.get(name) {
            if record.args == options.args {
                return Ok(DeployResult { record: record.clone(), newly_deployed: false });
            }
        }

        state.submissions += 1;
        let nonce = state.submissions;
        let record = DeploymentRecord {
            contract_name: name.to_string(),
            address: Address::from_word(keccak256(nonce.to_be_bytes())),
            transaction_hash: keccak256(format!("{name}-{nonce}")),
            deployer: options.from,
            args: options.args,
            bytecode_hash: keccak256(name),
            chain_id: CHAIN_ID,
            block_number: Some(nonce),
            gas_used: Some(1_000_000),
            deployed_at: Utc::now(),
        };
        state.records.insert(name.to_string(), record.clone());
        Ok(DeployResult { record, newly_deployed: true })
    }
}
