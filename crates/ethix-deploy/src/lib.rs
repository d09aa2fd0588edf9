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

//! Deployment of the Ethix `OffsetBuyer` contract.
//!
//! The crate is split along the collaborators of a single deployment:
//!
//! * [deployments] holds the per-network address tables.
//! * [accounts] resolves the account that pays for and signs the deployment.
//! * [primitive] is the `deploy(name, options)` seam, with [deployer::AlloyDeployer] as the
//!   on-chain implementation backed by [store::DeploymentStore] and [artifact::ContractArtifact].
//! * [task] ties them together into the [task::DeploymentTask].

pub mod accounts;
pub mod artifact;
pub mod deployer;
pub mod deployments;
mod error;
pub mod primitive;
pub mod store;
pub mod task;

pub use accounts::AccountResolver;
pub use deployer::AlloyDeployer;
pub use deployments::{AddressBook, AddressTable, NetworkId, PoolAddresses};
pub use error::{AddressTableKind, DeployError};
pub use primitive::{
    ConstructorArg, DeployOptions, DeployResult, DeploymentPrimitive, DeploymentRecord,
};
pub use task::{DeploymentContext, DeploymentSpec, DeploymentTask, METADATA_URI, OFFSET_BUYER};
