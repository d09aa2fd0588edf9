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

//! Configuration options of the Ethix CLI.

use std::{num::ParseIntError, path::PathBuf, time::Duration};

use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use clap::Args;
use ethix_deploy::NetworkId;
use tracing::level_filters::LevelFilter;
use url::Url;

/// Options for connecting to the target network.
#[derive(Args, Debug, Clone)]
pub struct GlobalConfig {
    /// Name of the target network, e.g. localhost, polygon or alfajores
    ///
    /// Selects the addresses from the address book and namespaces the deployment records.
    #[clap(short, long, env = "NETWORK", default_value = "localhost")]
    pub network: NetworkId,

    /// URL of the Ethereum RPC endpoint
    #[clap(short, long, env = "RPC_URL", default_value = "http://localhost:8545")]
    pub rpc_url: Url,

    /// Private key of the deployer wallet
    #[clap(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<PrivateKeySigner>,

    /// Deploy from the node-managed account at this index of eth_accounts, instead of a private
    /// key
    #[clap(long, conflicts_with = "private_key")]
    pub unlocked_account: Option<usize>,

    /// Ethereum transaction timeout in seconds.
    #[clap(long, env = "TX_TIMEOUT", value_parser = |arg: &str| -> Result<Duration, ParseIntError> {Ok(Duration::from_secs(arg.parse()?))})]
    pub tx_timeout: Option<Duration>,

    /// Log level (error, warn, info, debug, trace)
    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
}

impl GlobalConfig {
    /// Build a provider for [Self::rpc_url].
    ///
    /// Transactions are signed with [Self::private_key] if it is set, and by the node otherwise.
    /// No request is sent until the provider is used.
    pub fn provider(&self) -> DynProvider {
        match &self.private_key {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect_http(self.rpc_url.clone())
                .erased(),
            None => ProviderBuilder::new().connect_http(self.rpc_url.clone()).erased(),
        }
    }
}

/// Locations of the files read and written by a deployment.
#[derive(Args, Debug, Clone)]
pub struct PathConfig {
    /// TOML file with the per-network addresses
    #[clap(long, env = "ETHIX_CONFIG", default_value = "deployment.toml")]
    pub config: PathBuf,

    /// Directory of the deployment records, one subdirectory per network
    #[clap(long, env = "DEPLOYMENTS_DIR", default_value = "deployments")]
    pub deployments_dir: PathBuf,

    /// Directory of the compiled contract artifacts
    #[clap(long, env = "ARTIFACTS_DIR", default_value = "out")]
    pub artifacts_dir: PathBuf,
}
