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

//! The deployment primitive: submit a contract creation, or reuse an identical prior one.

use std::fmt;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, B256},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A single constructor argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConstructorArg {
    Address(Address),
    String(String),
}

impl From<Address> for ConstructorArg {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl From<&str> for ConstructorArg {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConstructorArg {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ConstructorArg> for DynSolValue {
    fn from(arg: ConstructorArg) -> Self {
        match arg {
            ConstructorArg::Address(address) => DynSolValue::Address(address),
            ConstructorArg::String(value) => DynSolValue::String(value),
        }
    }
}

impl fmt::Display for ConstructorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{address}"),
            Self::String(value) => write!(f, "{value:?}"),
        }
    }
}

/// ABI-encode constructor arguments, in order, as they are appended to the creation bytecode.
pub fn encode_constructor_args(args: &[ConstructorArg]) -> Vec<u8> {
    if args.is_empty() {
        return Vec::new();
    }
    DynSolValue::Tuple(args.iter().cloned().map(DynSolValue::from).collect()).abi_encode_params()
}

/// Options of a single `deploy` call.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Builder)]
pub struct DeployOptions {
    /// Account sending the contract creation transaction.
    pub from: Address,

    /// Constructor arguments, in the order of the constructor signature.
    #[builder(default)]
    pub args: Vec<ConstructorArg>,

    /// Emit progress at `info` level rather than `debug`.
    #[builder(default)]
    pub log: bool,

    /// Request a block right after submission on local development chains. Has no effect on
    /// live networks.
    #[builder(default)]
    pub auto_mine: bool,
}

impl DeployOptions {
    /// Create a new [DeployOptionsBuilder].
    pub fn builder() -> DeployOptionsBuilder {
        Default::default()
    }
}

/// Persisted description of a completed deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub address: Address,
    pub transaction_hash: B256,
    pub deployer: Address,
    pub args: Vec<ConstructorArg>,
    /// Keccak-256 of the creation bytecode, without constructor arguments.
    pub bytecode_hash: B256,
    pub chain_id: u64,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub gas_used: Option<u64>,
    pub deployed_at: DateTime<Utc>,
}

/// Result of a `deploy` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployResult {
    pub record: DeploymentRecord,
    /// False when an existing deployment with identical bytecode and arguments was reused.
    pub newly_deployed: bool,
}

impl DeployResult {
    pub fn address(&self) -> Address {
        self.record.address
    }
}

/// Deploys a named contract at most once per network, bytecode and arguments.
///
/// Implementations are bound to one network and own the persistence of deployment records.
/// Calling [DeploymentPrimitive::deploy] again with unchanged bytecode and arguments must return
/// the existing record instead of submitting a new transaction.
#[async_trait]
pub trait DeploymentPrimitive: Send + Sync {
    async fn deploy(&self, name: &str, options: DeployOptions) -> anyhow::Result<DeployResult>;
}

#[async_trait]
impl<D: DeploymentPrimitive + ?Sized> DeploymentPrimitive for &D {
    async fn deploy(&self, name: &str, options: DeployOptions) -> anyhow::Result<DeployResult> {
        (**self).deploy(name, options).await
    }
}
