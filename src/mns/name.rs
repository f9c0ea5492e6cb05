// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Record access for a single name

use std::sync::Arc;

use ethabi::ParamType;

use crate::abi::{self, ContractCall};
use crate::address::from_hex_address;
use crate::constants::{ADDRESS_ZERO, MRX_SLIP44};
use crate::content::{decode_contenthash, encode_contenthash, DecodedContent};
use crate::contract::{MetrixContract, PendingTransaction};
use crate::error::{Error, Result};
use crate::mns::is_zero_address;
use crate::namehash::{labelhash, namehash};
use crate::provider::Provider;

/// One name in the registry: its node hash plus the registry and resolver
/// plumbing needed to read and write its records.
#[derive(Debug, Clone)]
pub struct Name {
    name: String,
    hash: String,
    registry: MetrixContract,
    provider: Arc<dyn Provider>,
    resolver: Option<String>,
}

impl Name {
    pub(crate) fn new(
        name: &str,
        registry: MetrixContract,
        provider: Arc<dyn Provider>,
        resolver: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            hash: namehash(name)?,
            registry,
            provider,
            resolver,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name's 32-byte node, `0x`-prefixed hex.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    fn node(&self) -> Result<ethabi::Token> {
        Ok(abi::bytes32(&self.hash)?)
    }

    /// The node's owner in the registry.
    pub async fn owner(&self) -> Result<String> {
        self.registry
            .call_address(
                &ContractCall::new("owner(bytes32)")
                    .arg(self.node()?)
                    .output(ParamType::Address),
            )
            .await
    }

    /// Transfer ownership of the node.
    pub async fn set_owner(&self, address: &str) -> Result<PendingTransaction> {
        if address.is_empty() {
            return Err(Error::MissingArgument("address"));
        }
        self.registry
            .send(
                &ContractCall::new("setOwner(bytes32,address)")
                    .arg(self.node()?)
                    .arg(abi::address(address)?),
            )
            .await
    }

    /// The resolver address the registry reports for this node.
    pub async fn resolver(&self) -> Result<String> {
        self.registry
            .call_address(
                &ContractCall::new("resolver(bytes32)")
                    .arg(self.node()?)
                    .output(ParamType::Address),
            )
            .await
    }

    pub async fn set_resolver(&self, address: &str) -> Result<PendingTransaction> {
        if address.is_empty() {
            return Err(Error::MissingArgument("address"));
        }
        self.registry
            .send(
                &ContractCall::new("setResolver(bytes32,address)")
                    .arg(self.node()?)
                    .arg(abi::address(address)?),
            )
            .await
    }

    /// The node's caching TTL, in seconds.
    pub async fn ttl(&self) -> Result<u64> {
        let ttl = self
            .registry
            .call_uint(
                &ContractCall::new("ttl(bytes32)")
                    .arg(self.node()?)
                    .output(ParamType::Uint(64)),
            )
            .await?;
        Ok(ttl.low_u64())
    }

    pub async fn set_ttl(&self, seconds: u64) -> Result<PendingTransaction> {
        self.registry
            .send(
                &ContractCall::new("setTTL(bytes32,uint64)")
                    .arg(self.node()?)
                    .arg(abi::uint(seconds)),
            )
            .await
    }

    /// Hand a subnode of this name to an owner. The label may be plaintext or
    /// a bracket-encoded labelhash.
    pub async fn set_subnode_owner(&self, label: &str, owner: &str) -> Result<PendingTransaction> {
        if owner.is_empty() {
            return Err(Error::MissingArgument("owner"));
        }
        self.registry
            .send(
                &ContractCall::new("setSubnodeOwner(bytes32,bytes32,address)")
                    .arg(self.node()?)
                    .arg(abi::bytes32(&labelhash(label)?)?)
                    .arg(abi::address(owner)?),
            )
            .await
    }

    /// The resolver address to use: the bound one if this handle was created
    /// with a fixed resolver, otherwise whatever the registry reports.
    async fn resolver_addr(&self) -> Result<String> {
        match &self.resolver {
            Some(address) => Ok(address.clone()),
            None => self.resolver().await,
        }
    }

    /// A contract handle on the effective resolver, or `None` when the node
    /// has no resolver set.
    async fn resolver_contract(&self) -> Result<Option<MetrixContract>> {
        let address = self.resolver_addr().await?;
        if is_zero_address(&address) {
            return Ok(None);
        }
        Ok(Some(MetrixContract::new(&address, Arc::clone(&self.provider))))
    }

    fn require_resolver(&self, contract: Option<MetrixContract>) -> Result<MetrixContract> {
        contract.ok_or_else(|| Error::NoResolver(self.name.clone()))
    }

    /// The MRX address record, as an EVM address. [`ADDRESS_ZERO`] when the
    /// node has no resolver or no record.
    pub async fn address(&self) -> Result<String> {
        let Some(resolver) = self.resolver_contract().await? else {
            return Ok(ADDRESS_ZERO.to_string());
        };
        resolver
            .call_address(
                &ContractCall::new("addr(bytes32)")
                    .arg(self.node()?)
                    .output(ParamType::Address),
            )
            .await
    }

    /// A multi-coin address record, raw bytes in the coin's native encoding.
    pub async fn address_by_type(&self, coin_type: u64) -> Result<Vec<u8>> {
        let Some(resolver) = self.resolver_contract().await? else {
            return Ok(Vec::new());
        };
        resolver
            .call_bytes(
                &ContractCall::new("addr(bytes32,uint256)")
                    .arg(self.node()?)
                    .arg(abi::uint(coin_type))
                    .output(ParamType::Bytes),
            )
            .await
    }

    /// The MRX address record rendered base58check for this provider's
    /// network. `None` when no record is set.
    pub async fn mrx_address(&self) -> Result<Option<String>> {
        let raw = self.address_by_type(MRX_SLIP44).await?;
        if raw.is_empty() {
            return Ok(None);
        }
        if raw.len() != 20 {
            return Err(Error::UnexpectedReturn { expected: "20-byte hash160" });
        }
        let encoded = from_hex_address(self.provider.network(), &hex::encode(raw))?;
        Ok(Some(encoded))
    }

    pub async fn set_address(&self, address: &str) -> Result<PendingTransaction> {
        let resolver = self.resolver_contract().await?;
        let resolver = self.require_resolver(resolver)?;
        resolver
            .send(
                &ContractCall::new("setAddr(bytes32,address)")
                    .arg(self.node()?)
                    .arg(abi::address(address)?),
            )
            .await
    }

    pub async fn set_address_by_type(
        &self,
        coin_type: u64,
        address: Vec<u8>,
    ) -> Result<PendingTransaction> {
        let resolver = self.resolver_contract().await?;
        let resolver = self.require_resolver(resolver)?;
        resolver
            .send(
                &ContractCall::new("setAddr(bytes32,uint256,bytes)")
                    .arg(self.node()?)
                    .arg(abi::uint(coin_type))
                    .arg(abi::bytes(address)),
            )
            .await
    }

    /// A text record. Empty when the node has no resolver or no record.
    pub async fn text(&self, key: &str) -> Result<String> {
        let Some(resolver) = self.resolver_contract().await? else {
            return Ok(String::new());
        };
        resolver
            .call_string(
                &ContractCall::new("text(bytes32,string)")
                    .arg(self.node()?)
                    .arg(abi::string(key))
                    .output(ParamType::String),
            )
            .await
    }

    pub async fn set_text(&self, key: &str, value: &str) -> Result<PendingTransaction> {
        let resolver = self.resolver_contract().await?;
        let resolver = self.require_resolver(resolver)?;
        resolver
            .send(
                &ContractCall::new("setText(bytes32,string,string)")
                    .arg(self.node()?)
                    .arg(abi::string(key))
                    .arg(abi::string(value)),
            )
            .await
    }

    /// The decoded contenthash record, or `None` when unset.
    pub async fn content(&self) -> Result<Option<DecodedContent>> {
        let Some(resolver) = self.resolver_contract().await? else {
            return Ok(None);
        };
        let raw = resolver
            .call_bytes(
                &ContractCall::new("contenthash(bytes32)")
                    .arg(self.node()?)
                    .output(ParamType::Bytes),
            )
            .await?;
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(decode_contenthash(&hex::encode(raw))?))
    }

    /// Set the contenthash record from a content URL (`ipfs://…`, `bzz://…`,
    /// `onion://…`).
    pub async fn set_contenthash(&self, url: &str) -> Result<PendingTransaction> {
        let resolver = self.resolver_contract().await?;
        let resolver = self.require_resolver(resolver)?;
        let encoded = encode_contenthash(url)?;
        let raw = hex::decode(encoded.trim_start_matches("0x"))
            .map_err(crate::abi::AbiError::from)?;
        resolver
            .send(
                &ContractCall::new("setContenthash(bytes32,bytes)")
                    .arg(self.node()?)
                    .arg(abi::bytes(raw)),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::Network;
    use crate::provider::testing::StaticProvider;

    use super::*;

    const REGISTRY: &str = "d693d0cbfd7852047cd603f8d51fcb0b4c8c0856";
    const RESOLVER: &str = "0ac0b5e95a1f9717811b9ceebcb6855d02f638b3";
    const OWNER: &str = "c87bb8ab63de99a58a5339217c4a1c92f0fbfefe";

    fn name_with(provider: &Arc<StaticProvider>, resolver: Option<String>) -> Name {
        let registry = MetrixContract::new(
            REGISTRY,
            Arc::clone(provider) as Arc<dyn Provider>,
        );
        Name::new(
            "first.mrx",
            registry,
            Arc::clone(provider) as Arc<dyn Provider>,
            resolver,
        )
        .unwrap()
    }

    #[test]
    fn hash_is_the_namehash() {
        let provider = Arc::new(StaticProvider::new(Network::TestNet, vec![]));
        let name = name_with(&provider, None);
        assert_eq!(
            name.hash(),
            "0x23ba1777707a9059dbfe58b4976de48c089f689219dfdcff7cafcb0f2d298584"
        );
    }

    #[tokio::test]
    async fn owner_queries_the_registry() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![vec![abi::address(OWNER).unwrap()]],
        ));
        let name = name_with(&provider, None);
        assert_eq!(name.owner().await.unwrap(), format!("0x{OWNER}"));
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0], (REGISTRY.to_string(), "owner(bytes32)".to_string()));
    }

    #[tokio::test]
    async fn set_owner_requires_an_address() {
        let provider = Arc::new(StaticProvider::new(Network::TestNet, vec![]));
        let name = name_with(&provider, None);
        assert!(matches!(
            name.set_owner("").await,
            Err(Error::MissingArgument("address"))
        ));
    }

    #[tokio::test]
    async fn address_without_resolver_is_zero() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![vec![abi::address(ADDRESS_ZERO).unwrap()]],
        ));
        let name = name_with(&provider, None);
        assert_eq!(name.address().await.unwrap(), ADDRESS_ZERO);
    }

    #[tokio::test]
    async fn address_reads_through_bound_resolver() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![vec![abi::address(OWNER).unwrap()]],
        ));
        let name = name_with(&provider, Some(RESOLVER.to_string()));
        assert_eq!(name.address().await.unwrap(), format!("0x{OWNER}"));
        // The bound resolver skips the registry lookup.
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0], (RESOLVER.to_string(), "addr(bytes32)".to_string()));
    }

    #[tokio::test]
    async fn mrx_address_is_rendered_base58check() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![vec![abi::bytes(hex::decode(OWNER).unwrap())]],
        ));
        let name = name_with(&provider, Some(RESOLVER.to_string()));
        assert_eq!(
            name.mrx_address().await.unwrap().as_deref(),
            Some("maTQfd4w7mqCzGL32RgBFMYY9ehCmjLEGf")
        );
    }

    #[tokio::test]
    async fn mrx_address_is_none_when_unset() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![vec![abi::bytes(Vec::new())]],
        ));
        let name = name_with(&provider, Some(RESOLVER.to_string()));
        assert!(name.mrx_address().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_text_requires_a_resolver() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![vec![abi::address(ADDRESS_ZERO).unwrap()]],
        ));
        let name = name_with(&provider, None);
        assert!(matches!(
            name.set_text("email", "a@b.c").await,
            Err(Error::NoResolver(n)) if n == "first.mrx"
        ));
    }

    #[tokio::test]
    async fn content_decodes_the_record() {
        let encoded =
            "e3010170122029f2d17be6139079dc48696d1f582a8530eb9805b561eda517e22a892c7e3f1f";
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![vec![abi::bytes(hex::decode(encoded).unwrap())]],
        ));
        let name = name_with(&provider, Some(RESOLVER.to_string()));
        let content = name.content().await.unwrap().unwrap();
        assert_eq!(
            content.to_url(),
            "ipfs://QmRAQB6YaCyidP37UdDnjFY5vQuiBrcqdyoW1CuDgwxkD4"
        );
    }

    #[tokio::test]
    async fn content_is_none_when_empty() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![vec![abi::bytes(Vec::new())]],
        ));
        let name = name_with(&provider, Some(RESOLVER.to_string()));
        assert!(name.content().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_subnode_owner_hashes_the_label() {
        let provider = Arc::new(StaticProvider::new(Network::TestNet, vec![]));
        let name = name_with(&provider, None);
        name.set_subnode_owner("sub", &format!("0x{OWNER}")).await.unwrap();
        let calls = provider.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            (
                REGISTRY.to_string(),
                "setSubnodeOwner(bytes32,bytes32,address)".to_string()
            )
        );
    }
}
