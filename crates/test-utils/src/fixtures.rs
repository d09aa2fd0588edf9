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


//! Fixture networks and addresses.

use alloy::primitives::{address, Address};
use ethix_deploy::{AddressBook, AddressTable, NetworkId, PoolAddresses};

pub const LOCALHOST: &str = "localhost";

pub const HELPER: Address = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
pub const NCT_POOL: Address = address!("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
pub const BCT_POOL: Address = address!("0xb0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0");
pub const STEWARD_TOKEN: Address = address!("0xcccccccccccccccccccccccccccccccccccccccc");
pub const DEPLOYER: Address = address!("0xdddddddddddddddddddddddddddddddddddddddd");

pub fn localhost() -> NetworkId {
    NetworkId::from(LOCALHOST)
}

/// An [AddressBook] with a complete entry for `localhost` only.
pub fn address_book() -> AddressBook {
    AddressBook::new(
        [(LOCALHOST, HELPER)].into(),
        [(LOCALHOST, PoolAddresses::new(NCT_POOL).with_pool("BCT", BCT_POOL))].into(),
        [(LOCALHOST, STEWARD_TOKEN)].into(),
    )
    .expect("fixture address book is valid")
}

/// Which table [address_book_without] leaves the network out of.
#[derive(Clone, Copy, Debug)]
pub enum MissingTable {
    OffsetHelpers,
    Pools,
    StewardTokens,
}

/// Like [address_book], but with `localhost` missing from one table.
pub fn address_book_without(missing: MissingTable) -> AddressBook {
    let full = address_book();
    let offset_helpers = match missing {
        MissingTable::OffsetHelpers => AddressTable::default(),
        _ => full.offset_helpers().clone(),
    };
    let pools = match missing {
        MissingTable::Pools => AddressTable::default(),
        _ => full.pools().clone(),
    };
    let steward_tokens = match missing {
        MissingTable::StewardTokens => AddressTable::default(),
        _ => full.steward_tokens().clone(),
    };
    AddressBook::new(offset_helpers, pools, steward_tokens).expect("fixture address book is valid")
}
