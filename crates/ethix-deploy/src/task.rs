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

//! The OffsetBuyer deployment task.

use alloy::primitives::Address;

use crate::{
    accounts::AccountResolver,
    deployments::{AddressBook, NetworkId},
    error::DeployError,
    primitive::{ConstructorArg, DeployOptions, DeployResult, DeploymentPrimitive},
};

/// Name of the deployed contract, as found in the compiled artifacts.
pub const OFFSET_BUYER: &str = "EthixOffsetBuyer";

/// Certificate metadata passed to the OffsetBuyer constructor.
pub const METADATA_URI: &str =
    "https://nftstorage.link/ipfs/bafkreifqanwtgazgn4mkludrc6yi2tfmvpkcj7p77ys2vib5irdfhvckpa";

/// What the harness provides to a deployment: the active network, the deployment primitive bound
/// to that network, and the account facility.
#[derive(Clone, Debug)]
pub struct DeploymentContext<D, A> {
    pub network: NetworkId,
    pub deployments: D,
    pub accounts: A,
}

impl<D, A> DeploymentContext<D, A> {
    pub fn new(network: impl Into<NetworkId>, deployments: D, accounts: A) -> Self {
        Self { network: network.into(), deployments, accounts }
    }
}

/// A fully resolved deployment request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentSpec {
    pub contract_name: String,
    /// `[offset helper, NCT pool, steward token, metadata URI]`, in constructor order.
    pub constructor_args: Vec<ConstructorArg>,
    pub deployer_account: Address,
    pub metadata_uri: String,
}

impl DeploymentSpec {
    /// Options for the `deploy` call. Progress logging and auto-mining are always on.
    pub fn options(&self) -> DeployOptions {
        DeployOptions {
            from: self.deployer_account,
            args: self.constructor_args.clone(),
            log: true,
            auto_mine: true,
        }
    }
}

/// Deploys `EthixOffsetBuyer` with the addresses configured for the active network.
///
/// The task holds no state of its own. Running it again for the same network is safe as long as
/// the [DeploymentPrimitive] reuses identical deployments.
#[derive(Clone, Copy, Debug)]
pub struct DeploymentTask<'a> {
    addresses: &'a AddressBook,
}

impl<'a> DeploymentTask<'a> {
    pub fn new(addresses: &'a AddressBook) -> Self {
        Self { addresses }
    }

    /// Resolve the addresses and the deployer for `ctx.network` into a [DeploymentSpec].
    ///
    /// Fails with [DeployError::Configuration] if the network is missing from any address table,
    /// and with [DeployError::MissingSigner] if no deployer account is available. The zero address
    /// counts as no account.
    pub async fn prepare<D, A: AccountResolver>(
        &self,
        ctx: &DeploymentContext<D, A>,
    ) -> Result<DeploymentSpec, DeployError> {
        let network = &ctx.network;
        let helper = self.addresses.resolve_helper_address(network)?;
        let pools = self.addresses.resolve_pool_addresses(network)?;
        let steward_token = self.addresses.resolve_steward_token(network)?;

        let deployer = ctx
            .accounts
            .deployer_account()
            .await
            .map_err(DeployError::Accounts)?
            .filter(|account| !account.is_zero())
            .ok_or_else(|| DeployError::MissingSigner { network: network.clone() })?;

        tracing::debug!(
            "Resolved {OFFSET_BUYER} on {network}: helper {helper}, NCT {}, steward token \
             {steward_token}, deployer {deployer}",
            pools.nct
        );

        Ok(DeploymentSpec {
            contract_name: OFFSET_BUYER.to_string(),
            constructor_args: vec![
                helper.into(),
                pools.nct.into(),
                steward_token.into(),
                METADATA_URI.into(),
            ],
            deployer_account: deployer,
            metadata_uri: METADATA_URI.to_string(),
        })
    }

    /// Resolve the deployment and hand it to the deployment primitive.
    ///
    /// Returns the primitive's result as-is. Nothing is submitted if [Self::prepare] fails.
    pub async fn run<D: DeploymentPrimitive, A: AccountResolver>(
        &self,
        ctx: &DeploymentContext<D, A>,
    ) -> Result<DeployResult, DeployError> {
        let spec = self.prepare(ctx).await?;
        tracing::info!(
            "Deploying {} to {} from {}",
            spec.contract_name,
            ctx.network,
            spec.deployer_account
        );
        ctx.deployments
            .deploy(&spec.contract_name, spec.options())
            .await
            .map_err(DeployError::Primitive)
    }
}
