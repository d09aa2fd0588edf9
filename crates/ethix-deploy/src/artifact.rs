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

//! Loading of compiled contract artifacts.

use std::path::{Path, PathBuf};

use alloy::primitives::{keccak256, Bytes, B256};
use anyhow::{anyhow, bail, Context};
use serde::Deserialize;

/// Creation bytecode of a compiled contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractArtifact {
    pub name: String,
    pub bytecode: Bytes,
}

// Foundry writes `{"bytecode": {"object": "0x.."}}`, Hardhat writes `{"bytecode": "0x.."}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hardhat(String),
    Foundry { object: String },
}

#[derive(Deserialize)]
struct RawArtifact {
    bytecode: RawBytecode,
}

impl ContractArtifact {
    /// Find and load the artifact for `name` under `artifacts_dir`.
    ///
    /// Looks for `<dir>/<name>.sol/<name>.json` (Foundry `out/` layout) and then for
    /// `<dir>/<name>.json`.
    pub fn load(artifacts_dir: impl AsRef<Path>, name: &str) -> anyhow::Result<Self> {
        let dir = artifacts_dir.as_ref();
        let path = Self::candidates(dir, name)
            .into_iter()
            .find(|path| path.is_file())
            .ok_or_else(|| anyhow!("no artifact for {name} found in {}", dir.display()))?;
        tracing::debug!("Loading artifact for {name} from {}", path.display());

        let content = std::fs::read(&path)
            .with_context(|| format!("failed to read artifact {}", path.display()))?;
        Self::from_json(name, &content)
            .with_context(|| format!("invalid artifact {}", path.display()))
    }

    /// Parse an artifact from its JSON content.
    pub fn from_json(name: &str, content: &[u8]) -> anyhow::Result<Self> {
        let raw: RawArtifact =
            serde_json::from_slice(content).context("failed to parse artifact JSON")?;
        let hex = match raw.bytecode {
            RawBytecode::Hardhat(hex) => hex,
            RawBytecode::Foundry { object } => object,
        };
        let bytecode: Bytes = hex.parse().context("bytecode is not valid hex")?;
        if bytecode.is_empty() {
            bail!("{name} has no creation bytecode; is it an abstract contract or interface?");
        }
        Ok(Self { name: name.to_string(), bytecode })
    }

    /// Keccak-256 of the creation bytecode.
    pub fn bytecode_hash(&self) -> B256 {
        keccak256(&self.bytecode)
    }

    fn candidates(dir: &Path, name: &str) -> [PathBuf; 2] {
        let file = format!("{name}.json");
        [dir.join(format!("{name}.sol")).join(&file), dir.join(file)]
    }
}
