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

//! Per-network address tables consumed by the OffsetBuyer deployment.

use std::{collections::BTreeMap, convert::Infallible, fmt, path::Path, str::FromStr};

use alloy::primitives::Address;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::error::{AddressTableKind, DeployError};

/// Name of a target network, e.g. `localhost`, `polygon` or `alfajores`.
///
/// Used as the key into every [AddressTable].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(String);

impl NetworkId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NetworkId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NetworkId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl FromStr for NetworkId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Addresses of the carbon pools on a network.
///
/// Only `NCT` is required. Any other pool (e.g. `BCT`) is kept as-is so that other tasks reading
/// the same address book can use it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolAddresses {
    /// Nature Carbon Tonne pool.
    #[serde(rename = "NCT")]
    pub nct: Address,
    #[serde(flatten)]
    pub others: BTreeMap<String, Address>,
}

impl PoolAddresses {
    pub fn new(nct: Address) -> Self {
        Self { nct, others: BTreeMap::new() }
    }

    /// Add an additional named pool.
    pub fn with_pool(mut self, name: impl Into<String>, address: Address) -> Self {
        self.others.insert(name.into(), address);
        self
    }

    /// Lookup a pool by its symbol.
    pub fn get(&self, name: &str) -> Option<Address> {
        match name {
            "NCT" => Some(self.nct),
            _ => self.others.get(name).copied(),
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        std::iter::once(("NCT", self.nct))
            .chain(self.others.iter().map(|(name, addr)| (name.as_str(), *addr)))
    }
}

/// Read-only mapping from [NetworkId] to a value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressTable<T>(BTreeMap<NetworkId, T>);

impl<T> Default for AddressTable<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> AddressTable<T> {
    pub fn get(&self, network: &NetworkId) -> Option<&T> {
        self.0.get(network)
    }

    pub fn contains(&self, network: &NetworkId) -> bool {
        self.0.contains_key(network)
    }

    pub fn networks(&self) -> impl Iterator<Item = &NetworkId> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&NetworkId, &T)> {
        self.0.iter()
    }
}

impl<N: Into<NetworkId>, T> FromIterator<(N, T)> for AddressTable<T> {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(network, value)| (network.into(), value)).collect())
    }
}

impl<N: Into<NetworkId>, T, const K: usize> From<[(N, T); K]> for AddressTable<T> {
    fn from(entries: [(N, T); K]) -> Self {
        entries.into_iter().collect()
    }
}

/// The address tables for every supported network.
///
/// An [AddressBook] is built once at startup, either from a TOML file with [AddressBook::load] or
/// in code with [AddressBook::new], and is never mutated afterwards. The file format is:
///
/// ```toml
/// [offset_helpers]
/// polygon = "0x..."
///
/// [pools.polygon]
/// NCT = "0x..."
/// BCT = "0x..."
///
/// [steward_tokens]
/// polygon = "0x..."
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressBook {
    #[serde(default)]
    offset_helpers: AddressTable<Address>,
    #[serde(default)]
    pools: AddressTable<PoolAddresses>,
    #[serde(default)]
    steward_tokens: AddressTable<Address>,
}

impl AddressBook {
    /// Create an [AddressBook] from its three tables.
    ///
    /// Fails if any table contains the zero address.
    pub fn new(
        offset_helpers: AddressTable<Address>,
        pools: AddressTable<PoolAddresses>,
        steward_tokens: AddressTable<Address>,
    ) -> anyhow::Result<Self> {
        let book = Self { offset_helpers, pools, steward_tokens };
        book.validate()?;
        Ok(book)
    }

    /// Load an [AddressBook] from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read address book {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid address book {}", path.display()))
    }

    /// Parse an [AddressBook] from TOML.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let book: Self = toml::from_str(content).context("failed to parse address book")?;
        book.validate()?;
        Ok(book)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (network, address) in self.offset_helpers.iter() {
            if address.is_zero() {
                bail!("offset helper address for network `{network}` is the zero address");
            }
        }
        for (network, pools) in self.pools.iter() {
            for (name, address) in pools.iter() {
                if address.is_zero() {
                    bail!("{name} pool address for network `{network}` is the zero address");
                }
            }
        }
        for (network, address) in self.steward_tokens.iter() {
            if address.is_zero() {
                bail!("steward token address for network `{network}` is the zero address");
            }
        }
        Ok(())
    }

    /// Address of the OffsetHelper contract on `network`.
    pub fn resolve_helper_address(&self, network: &NetworkId) -> Result<Address, DeployError> {
        self.offset_helpers
            .get(network)
            .copied()
            .ok_or_else(|| DeployError::configuration(AddressTableKind::OffsetHelpers, network))
    }

    /// Carbon pool addresses on `network`.
    pub fn resolve_pool_addresses(
        &self,
        network: &NetworkId,
    ) -> Result<&PoolAddresses, DeployError> {
        self.pools
            .get(network)
            .ok_or_else(|| DeployError::configuration(AddressTableKind::Pools, network))
    }

    /// Address of the steward token on `network`.
    pub fn resolve_steward_token(&self, network: &NetworkId) -> Result<Address, DeployError> {
        self.steward_tokens
            .get(network)
            .copied()
            .ok_or_else(|| DeployError::configuration(AddressTableKind::StewardTokens, network))
    }

    /// Networks that have an entry in all three tables.
    pub fn networks(&self) -> Vec<&NetworkId> {
        self.offset_helpers
            .networks()
            .filter(|network| self.pools.contains(network) && self.steward_tokens.contains(network))
            .collect()
    }

    pub fn offset_helpers(&self) -> &AddressTable<Address> {
        &self.offset_helpers
    }

    pub fn pools(&self) -> &AddressTable<PoolAddresses> {
        &self.pools
    }

    pub fn steward_tokens(&self) -> &AddressTable<Address> {
        &self.steward_tokens
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    const BOOK: &str = r#"
        [offset_helpers]
        polygon = "0x1111111111111111111111111111111111111111"
        alfajores = "0x2222222222222222222222222222222222222222"

        [pools.polygon]
        NCT = "0x3333333333333333333333333333333333333333"
        BCT = "0x4444444444444444444444444444444444444444"

        [pools.alfajores]
        NCT = "0x5555555555555555555555555555555555555555"

        [steward_tokens]
        polygon = "0x6666666666666666666666666666666666666666"
    "#;

    #[test]
    fn resolves_configured_networks() {
        let book = AddressBook::from_toml_str(BOOK).unwrap();
        let polygon = NetworkId::from("polygon");

        assert_eq!(
            book.resolve_helper_address(&polygon).unwrap(),
            address!("0x1111111111111111111111111111111111111111")
        );
        let pools = book.resolve_pool_addresses(&polygon).unwrap();
        assert_eq!(pools.nct, address!("0x3333333333333333333333333333333333333333"));
        assert_eq!(pools.get("BCT"), Some(address!("0x4444444444444444444444444444444444444444")));
        assert_eq!(
            book.resolve_steward_token(&polygon).unwrap(),
            address!("0x6666666666666666666666666666666666666666")
        );
    }

    #[test]
    fn unknown_network_is_a_configuration_error() {
        let book = AddressBook::from_toml_str(BOOK).unwrap();
        let network = NetworkId::from("mainnet");

        let err = book.resolve_helper_address(&network).unwrap_err();
        assert!(matches!(
            err,
            DeployError::Configuration { table: AddressTableKind::OffsetHelpers, .. }
        ));
        let err = book.resolve_pool_addresses(&network).unwrap_err();
        assert!(matches!(err, DeployError::Configuration { table: AddressTableKind::Pools, .. }));
        let err = book.resolve_steward_token(&network).unwrap_err();
        assert!(matches!(
            err,
            DeployError::Configuration { table: AddressTableKind::StewardTokens, .. }
        ));
        assert_eq!(
            err.to_string(),
            "unsupported network `mainnet`: no entry in the steward token address table"
        );
    }

    #[test]
    fn partial_network_is_not_listed() {
        let book = AddressBook::from_toml_str(BOOK).unwrap();
        let alfajores = NetworkId::from("alfajores");

        // alfajores has a helper and pools, but no steward token.
        assert!(book.resolve_helper_address(&alfajores).is_ok());
        assert!(book.resolve_pool_addresses(&alfajores).is_ok());
        assert!(book.resolve_steward_token(&alfajores).is_err());
        assert_eq!(book.networks(), vec![&NetworkId::from("polygon")]);
    }

    #[test]
    fn rejects_zero_address() {
        let content = r#"
            [pools.polygon]
            NCT = "0x3333333333333333333333333333333333333333"
            BCT = "0x0000000000000000000000000000000000000000"
        "#;
        let err = AddressBook::from_toml_str(content).unwrap_err();
        assert!(err.to_string().contains("BCT pool address for network `polygon`"));

        let err = AddressBook::new(
            [("polygon", Address::ZERO)].into(),
            AddressTable::default(),
            AddressTable::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("offset helper"));
    }

    #[test]
    fn rejects_missing_nct() {
        let content = r#"
            [pools.polygon]
            BCT = "0x4444444444444444444444444444444444444444"
        "#;
        assert!(AddressBook::from_toml_str(content).is_err());
    }

    #[test]
    fn rejects_unknown_tables() {
        let content = r#"
            [offset_helper]
            polygon = "0x1111111111111111111111111111111111111111"
        "#;
        assert!(AddressBook::from_toml_str(content).is_err());
    }
}
