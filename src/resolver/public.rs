// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! The deployed public resolver

use std::sync::Arc;

use ethabi::ParamType;

use crate::abi::{self, ContractCall};
use crate::constants::deployment;
use crate::contract::{MetrixContract, PendingTransaction};
use crate::error::Result;
use crate::provider::Provider;
use crate::resolver::profiles::{
    AbiResolver, AddrResolver, ContenthashResolver, DnsResolver, Erc165, InterfaceResolver,
    NameResolver, PubkeyResolver, TextResolver,
};

/// The network's shared public resolver. It implements every record profile,
/// plus per-node operator authorisations.
#[derive(Debug, Clone)]
pub struct PublicResolver {
    contract: MetrixContract,
}

impl PublicResolver {
    /// The deployed public resolver for the provider's network.
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        let address = deployment(provider.network()).public_resolver;
        Self::at(address, provider)
    }

    /// A public resolver at an explicit address.
    pub fn at(address: &str, provider: Arc<dyn Provider>) -> Self {
        Self {
            contract: MetrixContract::new(address, provider),
        }
    }

    pub fn address(&self) -> &str {
        self.contract.address()
    }

    /// Whether `operator` may manage `owner`'s records on `node_hash`.
    pub async fn authorisations(
        &self,
        node_hash: &str,
        owner: &str,
        operator: &str,
    ) -> Result<bool> {
        self.contract
            .call_bool(
                &ContractCall::new("authorisations(bytes32,address,address)")
                    .arg(abi::bytes32(node_hash)?)
                    .arg(abi::address(owner)?)
                    .arg(abi::address(operator)?)
                    .output(ParamType::Bool),
            )
            .await
    }

    /// Grant or revoke an operator on a node the sender owns.
    pub async fn set_authorisation(
        &self,
        node_hash: &str,
        operator: &str,
        authorised: bool,
    ) -> Result<PendingTransaction> {
        self.contract
            .send(
                &ContractCall::new("setAuthorisation(bytes32,address,bool)")
                    .arg(abi::bytes32(node_hash)?)
                    .arg(abi::address(operator)?)
                    .arg(ethabi::Token::Bool(authorised)),
            )
            .await
    }
}

impl Erc165 for PublicResolver {
    fn contract(&self) -> &MetrixContract {
        &self.contract
    }
}

impl AddrResolver for PublicResolver {}
impl TextResolver for PublicResolver {}
impl ContenthashResolver for PublicResolver {}
impl NameResolver for PublicResolver {}
impl PubkeyResolver for PublicResolver {}
impl InterfaceResolver for PublicResolver {}
impl AbiResolver for PublicResolver {}
impl DnsResolver for PublicResolver {}

#[cfg(test)]
mod tests {
    use crate::constants::Network as Net;
    use crate::provider::testing::StaticProvider;

    use super::*;

    const RESOLVER: &str = "0ac0b5e95a1f9717811b9ceebcb6855d02f638b3";
    const NODE: &str = "0x23ba1777707a9059dbfe58b4976de48c089f689219dfdcff7cafcb0f2d298584";

    #[tokio::test]
    async fn profiles_route_through_the_contract() {
        let provider = Arc::new(StaticProvider::new(
            Net::TestNet,
            vec![
                vec![ethabi::Token::Bool(true)],
                vec![abi::string("hello@example.com")],
            ],
        ));
        let resolver = PublicResolver::at(RESOLVER, Arc::clone(&provider) as Arc<dyn Provider>);
        assert!(resolver.supports_interface([0x59, 0xd1, 0xd4, 0x3c]).await.unwrap());
        assert_eq!(
            resolver.text(NODE, "email").await.unwrap(),
            "hello@example.com"
        );

        let calls = provider.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            (RESOLVER.to_string(), "supportsInterface(bytes4)".to_string())
        );
        assert_eq!(
            calls[1],
            (RESOLVER.to_string(), "text(bytes32,string)".to_string())
        );
    }

    #[tokio::test]
    async fn pubkey_returns_both_halves() {
        let provider = Arc::new(StaticProvider::new(
            Net::TestNet,
            vec![vec![
                ethabi::Token::FixedBytes(vec![1u8; 32]),
                ethabi::Token::FixedBytes(vec![2u8; 32]),
            ]],
        ));
        let resolver = PublicResolver::at(RESOLVER, provider);
        let (x, y) = resolver.pubkey(NODE).await.unwrap();
        assert_eq!(x, [1u8; 32]);
        assert_eq!(y, [2u8; 32]);
    }

    #[tokio::test]
    async fn authorisation_calls_use_the_documented_signature() {
        let provider = Arc::new(StaticProvider::new(
            Net::TestNet,
            vec![vec![ethabi::Token::Bool(false)]],
        ));
        let resolver = PublicResolver::at(RESOLVER, Arc::clone(&provider) as Arc<dyn Provider>);
        let owner = "c87bb8ab63de99a58a5339217c4a1c92f0fbfefe";
        let operator = "d693d0cbfd7852047cd603f8d51fcb0b4c8c0856";
        assert!(!resolver.authorisations(NODE, owner, operator).await.unwrap());

        let calls = provider.calls.lock().unwrap();
        assert_eq!(
            calls[0].1,
            "authorisations(bytes32,address,address)".to_string()
        );
    }

    #[test]
    fn default_address_comes_from_the_deployment_table() {
        let provider = Arc::new(StaticProvider::new(Net::TestNet, vec![]));
        let resolver = PublicResolver::new(provider);
        assert_eq!(resolver.address(), deployment(Net::TestNet).public_resolver);
    }
}
