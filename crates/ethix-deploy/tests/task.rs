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


//! Tests of the OffsetBuyer deployment task against a recording deployment primitive.

use alloy::primitives::Address;
use ethix_deploy::{
    AddressTableKind, ConstructorArg, DeployError, DeployOptions, DeploymentContext,
    DeploymentTask, NetworkId, METADATA_URI, OFFSET_BUYER,
};
use ethix_test_utils::{
    fixtures::{
        address_book, address_book_without, localhost, MissingTable, DEPLOYER, HELPER, NCT_POOL,
        STEWARD_TOKEN,
    },
    RecordingDeployer,
};
use tracing_test::traced_test;

fn expected_args() -> Vec<ConstructorArg> {
    vec![
        ConstructorArg::Address(HELPER),
        ConstructorArg::Address(NCT_POOL),
        ConstructorArg::Address(STEWARD_TOKEN),
        ConstructorArg::String(METADATA_URI.to_string()),
    ]
}

#[tokio::test]
async fn prepare_orders_constructor_args() {
    let book = address_book();
    let ctx = DeploymentContext::new(localhost(), RecordingDeployer::new(), Some(DEPLOYER));

    let spec = DeploymentTask::new(&book).prepare(&ctx).await.unwrap();

    assert_eq!(spec.contract_name, OFFSET_BUYER);
    assert_eq!(spec.constructor_args, expected_args());
    assert_eq!(spec.deployer_account, DEPLOYER);
    assert_eq!(spec.metadata_uri, METADATA_URI);
    assert!(ctx.deployments.calls().is_empty());
}

#[tokio::test]
#[traced_test]
async fn deploys_on_localhost() {
    let book = address_book();
    let ctx = DeploymentContext::new("localhost", RecordingDeployer::new(), Some(DEPLOYER));

    let result = DeploymentTask::new(&book).run(&ctx).await.unwrap();

    let expected_options = DeployOptions::builder()
        .from(DEPLOYER)
        .args(vec![
            HELPER.into(),
            NCT_POOL.into(),
            STEWARD_TOKEN.into(),
            "https://nftstorage.link/ipfs/bafkreifqanwtgazgn4mkludrc6yi2tfmvpkcj7p77ys2vib5irdfhvckpa"
                .into(),
        ])
        .log(true)
        .auto_mine(true)
        .build()
        .unwrap();
    assert_eq!(
        ctx.deployments.calls(),
        vec![("EthixOffsetBuyer".to_string(), expected_options)]
    );
    assert!(result.newly_deployed);
    assert_eq!(result.record.deployer, DEPLOYER);
    assert_eq!(result.record.args, expected_args());
    assert!(logs_contain("Deploying EthixOffsetBuyer to localhost"));
}

#[tokio::test]
async fn missing_signer_never_deploys() {
    let book = address_book();
    let ctx = DeploymentContext::new(localhost(), RecordingDeployer::new(), None::<Address>);

    let err = DeploymentTask::new(&book).run(&ctx).await.unwrap_err();

    assert!(matches!(&err, DeployError::MissingSigner { network } if network == &localhost()));
    assert_eq!(err.to_string(), "missing deployer address for network `localhost`");
    assert_eq!(ctx.deployments.calls().len(), 0);
}

#[tokio::test]
async fn zero_address_signer_never_deploys() {
    let book = address_book();
    let ctx = DeploymentContext::new(localhost(), RecordingDeployer::new(), Some(Address::ZERO));

    let err = DeploymentTask::new(&book).run(&ctx).await.unwrap_err();

    assert!(matches!(&err, DeployError::MissingSigner { network } if network == &localhost()));
    assert_eq!(ctx.deployments.calls().len(), 0);
    assert_eq!(ctx.deployments.submissions(), 0);
}

#[tokio::test]
async fn missing_table_entry_never_deploys() {
    let cases = [
        (MissingTable::OffsetHelpers, AddressTableKind::OffsetHelpers),
        (MissingTable::Pools, AddressTableKind::Pools),
        (MissingTable::StewardTokens, AddressTableKind::StewardTokens),
    ];
    for (missing, kind) in cases {
        let book = address_book_without(missing);
        let ctx = DeploymentContext::new(localhost(), RecordingDeployer::new(), Some(DEPLOYER));

        let err = DeploymentTask::new(&book).run(&ctx).await.unwrap_err();

        assert!(
            matches!(err, DeployError::Configuration { table, .. } if table == kind),
            "unexpected error for {missing:?}: {err}"
        );
        assert_eq!(ctx.deployments.calls().len(), 0);
    }
}

#[tokio::test]
async fn unknown_network_fails_before_resolving_signer() {
    let book = address_book();
    // Without a signer either, the configuration error must win.
    let ctx = DeploymentContext::new(
        NetworkId::from("mainnet"),
        RecordingDeployer::new(),
        None::<Address>,
    );

    let err = DeploymentTask::new(&book).run(&ctx).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "unsupported network `mainnet`: no entry in the offset helper address table"
    );
    assert!(ctx.deployments.calls().is_empty());
}

#[tokio::test]
async fn second_run_reuses_deployment() {
    let book = address_book();
    let ctx = DeploymentContext::new(localhost(), RecordingDeployer::new(), Some(DEPLOYER));
    let task = DeploymentTask::new(&book);

    let first = task.run(&ctx).await.unwrap();
    let second = task.run(&ctx).await.unwrap();

    assert!(first.newly_deployed);
    assert!(!second.newly_deployed);
    assert_eq!(second.record, first.record);
    assert_eq!(ctx.deployments.calls().len(), 2);
    assert_eq!(ctx.deployments.submissions(), 1);
}

#[tokio::test]
async fn primitive_errors_pass_through() {
    let book = address_book();
    let ctx = DeploymentContext::new(
        localhost(),
        RecordingDeployer::failing("insufficient funds for gas * price + value"),
        Some(DEPLOYER),
    );

    let err = DeploymentTask::new(&book).run(&ctx).await.unwrap_err();

    assert!(matches!(err, DeployError::Primitive(_)));
    assert_eq!(err.to_string(), "insufficient funds for gas * price + value");
    assert_eq!(ctx.deployments.calls().len(), 1);
}

#[tokio::test]
async fn account_facility_errors_are_distinct_from_missing_signer() {
    struct Unreachable;

    #[async_trait::async_trait]
    impl ethix_deploy::AccountResolver for Unreachable {
        async fn deployer_account(&self) -> anyhow::Result<Option<Address>> {
            anyhow::bail!("connection refused")
        }
    }

    let book = address_book();
    let ctx = DeploymentContext::new(localhost(), RecordingDeployer::new(), Unreachable);

    let err = DeploymentTask::new(&book).run(&ctx).await.unwrap_err();

    assert!(matches!(err, DeployError::Accounts(_)));
    assert!(ctx.deployments.calls().is_empty());
}
