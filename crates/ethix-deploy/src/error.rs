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

use std::fmt;

use thiserror::Error;

use crate::deployments::NetworkId;

/// Identifies one of the per-network address tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressTableKind {
    OffsetHelpers,
    Pools,
    StewardTokens,
}

impl fmt::Display for AddressTableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffsetHelpers => write!(f, "offset helper"),
            Self::Pools => write!(f, "pool"),
            Self::StewardTokens => write!(f, "steward token"),
        }
    }
}

/// Errors that abort a deployment.
///
/// None of these are retried.
#[derive(Error, Debug)]
pub enum DeployError {
    /// A network-keyed value is missing from one of the address tables.
    #[error("unsupported network `{network}`: no entry in the {table} address table")]
    Configuration { table: AddressTableKind, network: NetworkId },

    /// No deployer account is available for the active network.
    #[error("missing deployer address for network `{network}`")]
    MissingSigner { network: NetworkId },

    /// The account facility failed while resolving the deployer.
    #[error("failed to resolve deployer account: {0:#}")]
    Accounts(anyhow::Error),

    /// Failure reported by the deployment primitive, passed through as-is.
    #[error(transparent)]
    Primitive(anyhow::Error),
}

impl DeployError {
    pub(crate) fn configuration(table: AddressTableKind, network: &NetworkId) -> Self {
        Self::Configuration { table, network: network.clone() }
    }
}
