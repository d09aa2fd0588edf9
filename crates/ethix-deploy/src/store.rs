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

//! File-backed registry of deployment records, namespaced by network.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use atomicwrites::{AtomicFile, OverwriteBehavior};

use crate::{deployments::NetworkId, primitive::DeploymentRecord};

/// Stores one [DeploymentRecord] per contract at `<root>/<network>/<contract>.json`.
#[derive(Clone, Debug)]
pub struct DeploymentStore {
    dir: PathBuf,
}

impl DeploymentStore {
    pub fn new(root: impl AsRef<Path>, network: &NetworkId) -> Self {
        Self { dir: root.as_ref().join(network.as_str()) }
    }

    /// Directory holding the records of this network.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, contract_name: &str) -> PathBuf {
        self.dir.join(format!("{contract_name}.json"))
    }

    /// Load the record for `contract_name`, if the contract was deployed before.
    pub fn load(&self, contract_name: &str) -> anyhow::Result<Option<DeploymentRecord>> {
        let path = self.record_path(contract_name);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read(&path)
            .with_context(|| format!("failed to read deployment record {}", path.display()))?;
        let record = serde_json::from_slice(&content)
            .with_context(|| format!("failed to parse deployment record {}", path.display()))?;
        Ok(Some(record))
    }

    /// Write `record`, replacing any previous record of the same contract.
    pub fn save(&self, record: &DeploymentRecord) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.record_path(&record.contract_name);
        let content = serde_json::to_vec_pretty(record)?;

        // Use AtomicFile so an interrupted write never leaves a truncated record behind.
        AtomicFile::new(&path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&content))
            .with_context(|| format!("failed to write deployment record {}", path.display()))?;

        tracing::debug!("Saved deployment record: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, b256};
    use chrono::Utc;

    use super::*;

    fn record() -> DeploymentRecord {
        DeploymentRecord {
            contract_name: "EthixOffsetBuyer".to_string(),
            address: address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            transaction_hash: b256!(
                "0x1111111111111111111111111111111111111111111111111111111111111111"
            ),
            deployer: address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            args: vec!["https://example.com".into()],
            bytecode_hash: b256!(
                "0x2222222222222222222222222222222222222222222222222222222222222222"
            ),
            chain_id: 31337,
            block_number: Some(1),
            gas_used: Some(21_000),
            deployed_at: Utc::now(),
        }
    }

    #[test]
    fn records_are_namespaced_by_network() {
        let root = tempfile::tempdir().unwrap();
        let localhost = DeploymentStore::new(root.path(), &NetworkId::from("localhost"));
        let polygon = DeploymentStore::new(root.path(), &NetworkId::from("polygon"));

        assert_eq!(localhost.load("EthixOffsetBuyer").unwrap(), None);

        let record = record();
        localhost.save(&record).unwrap();
        assert_eq!(
            localhost.record_path("EthixOffsetBuyer"),
            root.path().join("localhost").join("EthixOffsetBuyer.json")
        );
        assert_eq!(localhost.load("EthixOffsetBuyer").unwrap(), Some(record));
        assert_eq!(polygon.load("EthixOffsetBuyer").unwrap(), None);
    }

    #[test]
    fn save_overwrites_previous_record() {
        let root = tempfile::tempdir().unwrap();
        let store = DeploymentStore::new(root.path(), &NetworkId::from("localhost"));

        let first = record();
        store.save(&first).unwrap();
        let second = DeploymentRecord {
            address: address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
            ..first
        };
        store.save(&second).unwrap();

        assert_eq!(store.load("EthixOffsetBuyer").unwrap(), Some(second));
    }

    #[test]
    fn corrupt_record_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let store = DeploymentStore::new(root.path(), &NetworkId::from("localhost"));
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.record_path("EthixOffsetBuyer"), "{").unwrap();

        assert!(store.load("EthixOffsetBuyer").is_err());
    }
}
