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

//! Resolution of the deployer account.

use alloy::{primitives::Address, providers::Provider, signers::local::PrivateKeySigner};
use anyhow::Context;
use async_trait::async_trait;

/// Supplies the account that signs and pays for the deployment.
///
/// Returning `Ok(None)` means no account is configured for the active network.
#[async_trait]
pub trait AccountResolver: Send + Sync {
    async fn deployer_account(&self) -> anyhow::Result<Option<Address>>;
}

#[async_trait]
impl AccountResolver for Option<Address> {
    async fn deployer_account(&self) -> anyhow::Result<Option<Address>> {
        Ok(*self)
    }
}

#[async_trait]
impl<A: AccountResolver + ?Sized> AccountResolver for &A {
    async fn deployer_account(&self) -> anyhow::Result<Option<Address>> {
        (**self).deployer_account().await
    }
}

/// The account of a local private key, if one was provided.
#[derive(Clone, Debug, Default)]
pub struct SignerAccount(Option<PrivateKeySigner>);

impl SignerAccount {
    pub fn new(signer: Option<PrivateKeySigner>) -> Self {
        Self(signer)
    }

    pub fn signer(&self) -> Option<&PrivateKeySigner> {
        self.0.as_ref()
    }
}

#[async_trait]
impl AccountResolver for SignerAccount {
    async fn deployer_account(&self) -> anyhow::Result<Option<Address>> {
        Ok(self.0.as_ref().map(|signer| signer.address()))
    }
}

/// An account managed by the node, selected by its index in `eth_accounts`.
///
/// This follows the convention of local development nodes (Anvil, Hardhat) that expose a set of
/// unlocked accounts, the first of which is the default deployer.
#[derive(Clone, Debug)]
pub struct NodeAccounts<P> {
    provider: P,
    index: usize,
}

impl<P: Provider> NodeAccounts<P> {
    pub fn new(provider: P, index: usize) -> Self {
        Self { provider, index }
    }
}

#[async_trait]
impl<P: Provider> AccountResolver for NodeAccounts<P> {
    async fn deployer_account(&self) -> anyhow::Result<Option<Address>> {
        let accounts =
            self.provider.get_accounts().await.context("failed to list node accounts")?;
        tracing::debug!("Node manages {} accounts", accounts.len());
        Ok(accounts.get(self.index).copied())
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    #[tokio::test]
    async fn signer_account() {
        let signer = PrivateKeySigner::random();
        let expected = signer.address();
        let account = SignerAccount::new(Some(signer));
        assert_eq!(account.deployer_account().await.unwrap(), Some(expected));
        assert_eq!(SignerAccount::default().deployer_account().await.unwrap(), None);
    }

    #[tokio::test]
    async fn fixed_account() {
        let account = Some(address!("0xdddddddddddddddddddddddddddddddddddddddd"));
        assert_eq!(account.deployer_account().await.unwrap(), account);
        assert_eq!(None::<Address>.deployer_account().await.unwrap(), None);
    }
}
