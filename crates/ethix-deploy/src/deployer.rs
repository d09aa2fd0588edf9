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

//! [DeploymentPrimitive] implementation that deploys through an alloy [Provider].

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use alloy::{
    network::{ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes, B256},
    providers::Provider,
    rpc::types::TransactionRequest,
};
use alloy_chains::NamedChain;
use anyhow::{ensure, Context};
use async_trait::async_trait;
use chrono::Utc;

use crate::{
    artifact::ContractArtifact,
    deployments::NetworkId,
    primitive::{
        encode_constructor_args, ConstructorArg, DeployOptions, DeployResult, DeploymentPrimitive,
        DeploymentRecord,
    },
    store::DeploymentStore,
};

/// Chain IDs of local development nodes: Anvil and Hardhat use 31337, Ganache uses 1337.
const DEV_CHAIN_IDS: [u64; 2] = [31337, 1337];

/// Deploys contracts from compiled artifacts and records the results in a [DeploymentStore].
///
/// A deployment is reused, and no transaction is sent, when the stored record for the contract
/// has the same creation bytecode, constructor arguments and chain ID, and the recorded address
/// still holds code.
#[derive(Clone, Debug)]
pub struct AlloyDeployer<P> {
    provider: P,
    network: NetworkId,
    store: DeploymentStore,
    artifacts_dir: PathBuf,
    tx_timeout: Option<Duration>,
}

impl<P: Provider> AlloyDeployer<P> {
    /// Create a deployer for `network`, storing records under `deployments_dir/<network>` and
    /// reading artifacts from `artifacts_dir`.
    pub fn new(
        provider: P,
        network: NetworkId,
        deployments_dir: impl AsRef<Path>,
        artifacts_dir: impl Into<PathBuf>,
    ) -> Self {
        let store = DeploymentStore::new(deployments_dir, &network);
        Self { provider, network, store, artifacts_dir: artifacts_dir.into(), tx_timeout: None }
    }

    /// Set the timeout when waiting for the deployment transaction to be confirmed.
    pub fn with_timeout(self, tx_timeout: Option<Duration>) -> Self {
        Self { tx_timeout, ..self }
    }

    pub fn network(&self) -> &NetworkId {
        &self.network
    }

    pub fn store(&self) -> &DeploymentStore {
        &self.store
    }

    /// Query the chain ID, and check it against the network name when it names a known chain.
    async fn chain_id(&self) -> anyhow::Result<u64> {
        let chain_id = self.provider.get_chain_id().await.context("failed to query chain ID")?;
        if let Ok(chain) = self.network.as_str().parse::<NamedChain>() {
            ensure!(
                chain as u64 == chain_id,
                "RPC endpoint is on chain {chain_id}, but network `{}` is chain {}",
                self.network,
                chain as u64
            );
        }
        Ok(chain_id)
    }

    async fn is_reusable(
        &self,
        record: &DeploymentRecord,
        bytecode_hash: B256,
        args: &[ConstructorArg],
        chain_id: u64,
    ) -> anyhow::Result<bool> {
        if record.bytecode_hash != bytecode_hash || record.args != args {
            tracing::debug!(
                "{} changed since its deployment at {}",
                record.contract_name,
                record.address
            );
            return Ok(false);
        }
        if record.chain_id != chain_id {
            tracing::debug!(
                "{} was recorded on chain {}, now on chain {chain_id}",
                record.contract_name,
                record.chain_id
            );
            return Ok(false);
        }
        let code = self
            .provider
            .get_code_at(record.address)
            .await
            .with_context(|| format!("failed to query code at {}", record.address))?;
        if code.is_empty() {
            tracing::debug!("No code at {}; the chain was likely reset", record.address);
        }
        Ok(!code.is_empty())
    }

    /// Save the record of a mined deployment. On failure, the error keeps the address and
    /// transaction so the record can be restored by hand.
    fn save_record(&self, record: &DeploymentRecord) -> anyhow::Result<()> {
        self.store.save(record).with_context(|| {
            format!(
                "{} was deployed at {} (tx: {}), but its record was not saved",
                record.contract_name, record.address, record.transaction_hash
            )
        })
    }

    /// Mine a block, unless the node already mines each transaction as it arrives.
    ///
    /// Nodes without `hardhat_getAutomine` (Ganache) are always asked to mine.
    async fn mine_block(&self) -> anyhow::Result<()> {
        let automine =
            self.provider.raw_request::<_, bool>("hardhat_getAutomine".into(), ()).await;
        if let Ok(true) = automine {
            tracing::debug!("Node mines on submission, skipping evm_mine");
            return Ok(());
        }
        self.provider
            .raw_request::<_, serde_json::Value>("evm_mine".into(), ())
            .await
            .context("failed to mine a block on the development node")?;
        Ok(())
    }
}

/// Address of the contract created by a deployment transaction.
fn deployed_address<R: ReceiptResponse>(name: &str, receipt: &R) -> anyhow::Result<Address> {
    let tx_hash = receipt.transaction_hash();
    ensure!(receipt.status(), "deployment transaction {tx_hash} for {name} reverted");
    receipt
        .contract_address()
        .with_context(|| format!("receipt of {tx_hash} has no contract address"))
}

fn progress(log: bool, message: &str) {
    if log {
        tracing::info!("{message}");
    } else {
        tracing::debug!("{message}");
    }
}

#[async_trait]
impl<P: Provider> DeploymentPrimitive for AlloyDeployer<P> {
    async fn deploy(&self, name: &str, options: DeployOptions) -> anyhow::Result<DeployResult> {
        let artifact = ContractArtifact::load(&self.artifacts_dir, name)?;
        let bytecode_hash = artifact.bytecode_hash();
        let chain_id = self.chain_id().await?;

        if let Some(record) = self.store.load(name)? {
            if self.is_reusable(&record, bytecode_hash, &options.args, chain_id).await? {
                progress(options.log, &format!("reusing \"{name}\" at {}", record.address));
                return Ok(DeployResult { record, newly_deployed: false });
            }
        }

        let mut input = artifact.bytecode.to_vec();
        input.extend(encode_constructor_args(&options.args));
        let tx = TransactionRequest::default()
            .with_from(options.from)
            .with_deploy_code(Bytes::from(input));

        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .with_context(|| format!("failed to send deployment transaction for {name}"))?;
        let tx_hash = *pending_tx.tx_hash();
        progress(options.log, &format!("deploying \"{name}\" (tx: {tx_hash})..."));

        if options.auto_mine && DEV_CHAIN_IDS.contains(&chain_id) {
            self.mine_block().await?;
        }

        let receipt = pending_tx
            .with_timeout(self.tx_timeout)
            .get_receipt()
            .await
            .with_context(|| format!("failed to confirm deployment transaction {tx_hash}"))?;
        let address = deployed_address(name, &receipt)?;

        let record = DeploymentRecord {
            contract_name: name.to_string(),
            address,
            transaction_hash: tx_hash,
            deployer: options.from,
            args: options.args,
            bytecode_hash,
            chain_id,
            block_number: receipt.block_number(),
            gas_used: Some(receipt.gas_used()),
            deployed_at: Utc::now(),
        };
        self.save_record(&record)?;
        progress(
            options.log,
            &format!("deployed \"{name}\" at {address} with {} gas", receipt.gas_used()),
        );

        Ok(DeployResult { record, newly_deployed: true })
    }
}
