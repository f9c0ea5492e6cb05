// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Network constants and contract deployment tables

use std::fmt;

use serde::{Deserialize, Serialize};

/// Metrix networks a provider can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    MainNet,
    TestNet,
    RegTest,
}

impl Network {
    /// Base58check version prefix for P2PKH addresses on this network.
    pub fn b58_prefix(self) -> u8 {
        match self {
            Network::MainNet => 0x32,
            Network::TestNet => 0x6e,
            Network::RegTest => 0x70,
        }
    }

    /// Explorer REST endpoint, where one exists for the network.
    pub fn explorer_url(self) -> Option<&'static str> {
        match self {
            Network::MainNet => Some("https://explorer.metrixcoin.com/api"),
            Network::TestNet => Some("https://testnet-explorer.metrixcoin.com/api"),
            Network::RegTest => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::MainNet => "MainNet",
            Network::TestNet => "TestNet",
            Network::RegTest => "RegTest",
        };
        f.write_str(name)
    }
}

/// Addresses of the MNS contract deployments for one network, as hash160 hex
/// without a `0x` prefix. Loaded once, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct Deployment {
    pub mns_migrations: &'static str,
    pub mns_registry: &'static str,
    pub mns_registry_with_fallback: &'static str,
    pub default_reverse_resolver: &'static str,
    pub reverse_registrar: &'static str,
    pub base_registrar_implementation: &'static str,
    pub mrx_to_usd_oracle: &'static str,
    pub mrx_registrar_controller: &'static str,
    pub static_metadata_service: &'static str,
    pub name_wrapper: &'static str,
    pub public_resolver: &'static str,
}

// Deployed addresses are pinned here per release. Placeholders until the
// contracts land on a network.
const UNDEPLOYED: &str = "0000000000000000000000000000000000000000";

const MAINNET: Deployment = Deployment {
    mns_migrations: UNDEPLOYED,
    mns_registry: UNDEPLOYED,
    mns_registry_with_fallback: UNDEPLOYED,
    default_reverse_resolver: UNDEPLOYED,
    reverse_registrar: UNDEPLOYED,
    base_registrar_implementation: UNDEPLOYED,
    mrx_to_usd_oracle: UNDEPLOYED,
    mrx_registrar_controller: UNDEPLOYED,
    static_metadata_service: UNDEPLOYED,
    name_wrapper: UNDEPLOYED,
    public_resolver: UNDEPLOYED,
};

const TESTNET: Deployment = Deployment {
    mns_migrations: UNDEPLOYED,
    mns_registry: UNDEPLOYED,
    mns_registry_with_fallback: UNDEPLOYED,
    default_reverse_resolver: UNDEPLOYED,
    reverse_registrar: UNDEPLOYED,
    base_registrar_implementation: UNDEPLOYED,
    mrx_to_usd_oracle: UNDEPLOYED,
    mrx_registrar_controller: UNDEPLOYED,
    static_metadata_service: UNDEPLOYED,
    name_wrapper: UNDEPLOYED,
    public_resolver: UNDEPLOYED,
};

const REGTEST: Deployment = Deployment {
    mns_migrations: UNDEPLOYED,
    mns_registry: UNDEPLOYED,
    mns_registry_with_fallback: UNDEPLOYED,
    default_reverse_resolver: UNDEPLOYED,
    reverse_registrar: UNDEPLOYED,
    base_registrar_implementation: UNDEPLOYED,
    mrx_to_usd_oracle: UNDEPLOYED,
    mrx_registrar_controller: UNDEPLOYED,
    static_metadata_service: UNDEPLOYED,
    name_wrapper: UNDEPLOYED,
    public_resolver: UNDEPLOYED,
};

/// The contract deployment table for a network.
pub fn deployment(network: Network) -> &'static Deployment {
    match network {
        Network::MainNet => &MAINNET,
        Network::TestNet => &TESTNET,
        Network::RegTest => &REGTEST,
    }
}

/// The 32-byte zero hash: the root node, and the "no value" sentinel several
/// registry calls return.
pub const HASH_ZERO: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

/// The EVM zero address.
pub const ADDRESS_ZERO: &str = "0x0000000000000000000000000000000000000000";

/// SLIP-44 coin type for MRX address records.
pub const MRX_SLIP44: u64 = 326;

/// Default gas limit for contract sends.
pub const DEFAULT_GAS_LIMIT: u64 = 250_000;

/// Default price per gas unit, in satoshis.
pub const DEFAULT_GAS_PRICE: u64 = 5_000;

/// Gas limit for registrar register and renew sends.
pub const REGISTRAR_GAS_LIMIT: u64 = 420_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_differ_per_network() {
        assert_eq!(Network::MainNet.b58_prefix(), 0x32);
        assert_eq!(Network::TestNet.b58_prefix(), 0x6e);
        assert_eq!(Network::RegTest.b58_prefix(), 0x70);
    }

    #[test]
    fn regtest_has_no_explorer() {
        assert!(Network::MainNet.explorer_url().is_some());
        assert!(Network::RegTest.explorer_url().is_none());
    }
}
