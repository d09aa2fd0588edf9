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

use alloy::providers::DynProvider;
use anyhow::Result;
use clap::Parser;
use ethix_deploy::{
    accounts::{NodeAccounts, SignerAccount},
    AccountResolver, AddressBook, AlloyDeployer, DeploymentContext, DeploymentTask,
};
use tracing_subscriber::EnvFilter;

mod config;

use config::{GlobalConfig, PathConfig};

/// Deploy the Ethix OffsetBuyer contract.
///
/// Running it again for the same network reuses the recorded deployment unless the contract
/// bytecode or its constructor arguments changed.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct MainArgs {
    #[clap(flatten)]
    global: GlobalConfig,

    #[clap(flatten, next_help_heading = "Paths")]
    paths: PathConfig,

    /// Resolve and print the deployment without sending any transaction
    #[clap(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = MainArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.global.log_level.into())
                .from_env_lossy(),
        )
        .init();

    run(&args).await
}

async fn run(args: &MainArgs) -> Result<()> {
    let addresses = AddressBook::load(&args.paths.config)?;
    tracing::debug!("Networks with a complete configuration: {:?}", addresses.networks());

    let provider = args.global.provider();
    match args.global.unlocked_account {
        Some(index) => {
            let accounts = NodeAccounts::new(provider.clone(), index);
            deploy(args, &addresses, provider, accounts).await
        }
        None => {
            let accounts = SignerAccount::new(args.global.private_key.clone());
            deploy(args, &addresses, provider, accounts).await
        }
    }
}

async fn deploy<A: AccountResolver>(
    args: &MainArgs,
    addresses: &AddressBook,
    provider: DynProvider,
    accounts: A,
) -> Result<()> {
    let network = args.global.network.clone();
    let deployments = AlloyDeployer::new(
        provider,
        network.clone(),
        &args.paths.deployments_dir,
        &args.paths.artifacts_dir,
    )
    .with_timeout(args.global.tx_timeout);
    let ctx = DeploymentContext::new(network, deployments, accounts);
    let task = DeploymentTask::new(addresses);

    if args.dry_run {
        let spec = task.prepare(&ctx).await?;
        let options = spec.options();
        let constructor_args =
            options.args.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        tracing::info!(
            "Dry run on {}: deploy(\"{}\", {{ from: {}, args: [{constructor_args}], log: {}, autoMine: {} }})",
            ctx.network,
            spec.contract_name,
            options.from,
            options.log,
            options.auto_mine
        );
        return Ok(());
    }

    let result = task.run(&ctx).await?;
    if result.newly_deployed {
        tracing::info!("{} deployed at {}", result.record.contract_name, result.address());
    } else {
        tracing::info!(
            "{} already deployed at {} (tx: {})",
            result.record.contract_name,
            result.address(),
            result.record.transaction_hash
        );
    }
    Ok(())
}
