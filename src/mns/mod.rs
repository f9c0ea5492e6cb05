// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Top-level MNS entry point
//!
//! [`MNS`] wraps the registry contract and hands out [`Name`] and
//! [`Resolver`] handles. Forward resolution goes name → node → resolver →
//! record; reverse resolution hashes `<hash160>.addr.reverse` and asks that
//! node's resolver for a name.

mod name;
mod resolver;

pub use name::Name;
pub use resolver::Resolver;

use std::sync::Arc;

use ethabi::ParamType;
use tracing::warn;

use crate::abi::{self, ContractCall};
use crate::constants::{deployment, Network};
use crate::contract::{MetrixContract, PendingTransaction};
use crate::error::Result;
use crate::provider::Provider;

pub(crate) fn is_zero_address(address: &str) -> bool {
    let digits = address.strip_prefix("0x").unwrap_or(address);
    digits.len() == 40 && digits.bytes().all(|b| b == b'0')
}

/// The node name for reverse resolution of an EVM address.
fn reverse_node(address: &str) -> String {
    let hash160 = address.strip_prefix("0x").unwrap_or(address);
    format!("{}.addr.reverse", hash160.to_lowercase())
}

/// A handle on one network's MNS registry.
#[derive(Debug, Clone)]
pub struct MNS {
    network: Network,
    provider: Arc<dyn Provider>,
    registry: MetrixContract,
}

impl MNS {
    /// Connect to the registry. Passing `None` uses the network's deployed
    /// registry-with-fallback address.
    pub fn new(
        network: Network,
        provider: Arc<dyn Provider>,
        registry_address: Option<&str>,
    ) -> Self {
        let address = registry_address
            .unwrap_or(deployment(network).mns_registry_with_fallback)
            .to_string();
        let registry = MetrixContract::new(&address, Arc::clone(&provider));
        Self {
            network,
            provider,
            registry,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn registry(&self) -> &MetrixContract {
        &self.registry
    }

    /// A handle for a name, resolving records through whatever resolver the
    /// registry reports for it.
    pub fn name(&self, name: &str) -> Result<Name> {
        Name::new(name, self.registry.clone(), Arc::clone(&self.provider), None)
    }

    /// A handle for a name bound to a fixed resolver address.
    pub fn name_with_resolver(&self, name: &str, resolver: &str) -> Result<Name> {
        Name::new(
            name,
            self.registry.clone(),
            Arc::clone(&self.provider),
            Some(resolver.to_string()),
        )
    }

    /// A handle on a known resolver contract.
    pub fn resolver(&self, address: &str) -> Resolver {
        Resolver::new(
            self.registry.clone(),
            Arc::clone(&self.provider),
            address.to_string(),
        )
    }

    /// Reverse-resolve an EVM address to its primary name. Returns `None`
    /// when no reverse record is set.
    pub async fn get_name(&self, address: &str) -> Result<Option<String>> {
        let node = crate::namehash::namehash(&reverse_node(address))?;
        let resolver_addr = self
            .registry
            .call_address(
                &ContractCall::new("resolver(bytes32)")
                    .arg(abi::bytes32(&node)?)
                    .output(ParamType::Address),
            )
            .await?;
        if is_zero_address(&resolver_addr) {
            return Ok(None);
        }
        let resolver = MetrixContract::new(&resolver_addr, Arc::clone(&self.provider));
        let name = resolver
            .call_string(
                &ContractCall::new("name(bytes32)")
                    .arg(abi::bytes32(&node)?)
                    .output(ParamType::String),
            )
            .await?;
        Ok(if name.is_empty() { None } else { Some(name) })
    }

    /// Like [`MNS::get_name`], but swallows lookup failures. A broken or
    /// misconfigured reverse record reads as "no name".
    pub async fn get_name_with_resolver(&self, address: &str) -> Option<String> {
        match self.get_name(address).await {
            Ok(name) => name,
            Err(error) => {
                warn!(%address, %error, "reverse lookup failed");
                None
            }
        }
    }

    /// Point the sender's reverse record at a name, via the owner of the
    /// `addr.reverse` node (the reverse registrar).
    pub async fn set_reverse_record(&self, name: &str) -> Result<PendingTransaction> {
        let node = crate::namehash::namehash("addr.reverse")?;
        let registrar_addr = self
            .registry
            .call_address(
                &ContractCall::new("owner(bytes32)")
                    .arg(abi::bytes32(&node)?)
                    .output(ParamType::Address),
            )
            .await?;
        let registrar = MetrixContract::new(&registrar_addr, Arc::clone(&self.provider));
        registrar
            .send(&ContractCall::new("setName(string)").arg(abi::string(name)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::{ADDRESS_ZERO, HASH_ZERO};
    use crate::provider::testing::StaticProvider;

    use super::*;

    const REGISTRY: &str = "d693d0cbfd7852047cd603f8d51fcb0b4c8c0856";
    const RESOLVER: &str = "0ac0b5e95a1f9717811b9ceebcb6855d02f638b3";

    #[test]
    fn reverse_node_lowercases_and_strips_prefix() {
        assert_eq!(
            reverse_node("0xC87BB8ab63de99A58a5339217C4a1c92f0FBfefe"),
            "c87bb8ab63de99a58a5339217c4a1c92f0fbfefe.addr.reverse"
        );
    }

    #[test]
    fn zero_address_predicate() {
        assert!(is_zero_address(ADDRESS_ZERO));
        assert!(is_zero_address(&"0".repeat(40)));
        assert!(!is_zero_address(RESOLVER));
        assert!(!is_zero_address(HASH_ZERO));
    }

    #[tokio::test]
    async fn get_name_reads_through_reverse_resolver() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![
                vec![abi::address(RESOLVER).unwrap()],
                vec![abi::string("first.mrx")],
            ],
        ));
        let mns = MNS::new(Network::TestNet, Arc::clone(&provider) as Arc<dyn Provider>, Some(REGISTRY));
        let name = mns
            .get_name("0xc87bb8ab63de99a58a5339217c4a1c92f0fbfefe")
            .await
            .unwrap();
        assert_eq!(name.as_deref(), Some("first.mrx"));

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0], (REGISTRY.to_string(), "resolver(bytes32)".to_string()));
        assert_eq!(calls[1], (RESOLVER.to_string(), "name(bytes32)".to_string()));
    }

    #[tokio::test]
    async fn get_name_is_none_without_reverse_resolver() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![vec![abi::address(ADDRESS_ZERO).unwrap()]],
        ));
        let mns = MNS::new(Network::TestNet, provider, Some(REGISTRY));
        assert!(mns
            .get_name("0xc87bb8ab63de99a58a5339217c4a1c92f0fbfefe")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn get_name_with_resolver_swallows_errors() {
        // No canned responses, so the registry call fails.
        let provider = Arc::new(StaticProvider::new(Network::TestNet, vec![]));
        let mns = MNS::new(Network::TestNet, provider, Some(REGISTRY));
        assert!(mns
            .get_name_with_resolver("0xc87bb8ab63de99a58a5339217c4a1c92f0fbfefe")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn set_reverse_record_targets_the_node_owner() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![vec![abi::address(RESOLVER).unwrap()]],
        ));
        let mns = MNS::new(Network::TestNet, Arc::clone(&provider) as Arc<dyn Provider>, Some(REGISTRY));
        mns.set_reverse_record("first.mrx").await.unwrap();

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0], (REGISTRY.to_string(), "owner(bytes32)".to_string()));
        assert_eq!(calls[1], (RESOLVER.to_string(), "setName(string)".to_string()));
    }
}
