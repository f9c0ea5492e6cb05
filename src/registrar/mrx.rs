// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Base registrar wrapper
//!
//! The base registrar owns the `.mrx` node and tracks registrations as
//! ERC-721 tokens, one per second-level label. Token ids are the label's
//! keccak256 hash interpreted as a uint256.

use std::sync::Arc;

use ethabi::ParamType;

use crate::abi::{self, ContractCall};
use crate::constants::deployment;
use crate::contract::{MetrixContract, PendingTransaction};
use crate::error::Result;
use crate::namehash::labelhash;
use crate::provider::Provider;

#[derive(Debug, Clone)]
pub struct MrxRegistrar {
    contract: MetrixContract,
}

/// The uint256 token id for a label (plaintext or bracket-encoded).
pub fn token_id(label: &str) -> Result<ethabi::Uint> {
    let hash = labelhash(label)?;
    let raw = hex::decode(hash.trim_start_matches("0x")).map_err(abi::AbiError::from)?;
    Ok(ethabi::Uint::from_big_endian(&raw))
}

impl MrxRegistrar {
    /// The deployed base registrar for the provider's network.
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        let address = deployment(provider.network()).base_registrar_implementation;
        Self::at(address, provider)
    }

    /// A base registrar at an explicit address.
    pub fn at(address: &str, provider: Arc<dyn Provider>) -> Self {
        Self {
            contract: MetrixContract::new(address, provider),
        }
    }

    pub fn address(&self) -> &str {
        self.contract.address()
    }

    // ERC-721 metadata.

    pub async fn name(&self) -> Result<String> {
        self.contract
            .call_string(&ContractCall::new("name()").output(ParamType::String))
            .await
    }

    pub async fn symbol(&self) -> Result<String> {
        self.contract
            .call_string(&ContractCall::new("symbol()").output(ParamType::String))
            .await
    }

    pub async fn token_uri(&self, label: &str) -> Result<String> {
        self.contract
            .call_string(
                &ContractCall::new("tokenURI(uint256)")
                    .arg(abi::uint(token_id(label)?))
                    .output(ParamType::String),
            )
            .await
    }

    /// The registry this registrar administers its node in.
    pub async fn mns(&self) -> Result<String> {
        self.contract
            .call_address(&ContractCall::new("mns()").output(ParamType::Address))
            .await
    }

    /// The node the registrar owns (the `.mrx` namehash).
    pub async fn base_node(&self) -> Result<String> {
        self.contract
            .call_bytes32(
                &ContractCall::new("baseNode()").output(ParamType::FixedBytes(32)),
            )
            .await
    }

    pub async fn total_supply(&self) -> Result<ethabi::Uint> {
        self.contract
            .call_uint(&ContractCall::new("totalSupply()").output(ParamType::Uint(256)))
            .await
    }

    pub async fn balance_of(&self, owner: &str) -> Result<ethabi::Uint> {
        self.contract
            .call_uint(
                &ContractCall::new("balanceOf(address)")
                    .arg(abi::address(owner)?)
                    .output(ParamType::Uint(256)),
            )
            .await
    }

    pub async fn owner_of(&self, label: &str) -> Result<String> {
        self.contract
            .call_address(
                &ContractCall::new("ownerOf(uint256)")
                    .arg(abi::uint(token_id(label)?))
                    .output(ParamType::Address),
            )
            .await
    }

    pub async fn token_by_index(&self, index: u64) -> Result<ethabi::Uint> {
        self.contract
            .call_uint(
                &ContractCall::new("tokenByIndex(uint256)")
                    .arg(abi::uint(index))
                    .output(ParamType::Uint(256)),
            )
            .await
    }

    pub async fn token_of_owner_by_index(&self, owner: &str, index: u64) -> Result<ethabi::Uint> {
        self.contract
            .call_uint(
                &ContractCall::new("tokenOfOwnerByIndex(address,uint256)")
                    .arg(abi::address(owner)?)
                    .arg(abi::uint(index))
                    .output(ParamType::Uint(256)),
            )
            .await
    }

    /// Unix timestamp the registration for a label expires at.
    pub async fn name_expires(&self, label: &str) -> Result<ethabi::Uint> {
        self.contract
            .call_uint(
                &ContractCall::new("nameExpires(uint256)")
                    .arg(abi::uint(token_id(label)?))
                    .output(ParamType::Uint(256)),
            )
            .await
    }

    /// Whether a label is open for registration (expired past its grace
    /// period, or never registered).
    pub async fn available(&self, label: &str) -> Result<bool> {
        self.contract
            .call_bool(
                &ContractCall::new("available(uint256)")
                    .arg(abi::uint(token_id(label)?))
                    .output(ParamType::Bool),
            )
            .await
    }

    pub async fn transfer_from(
        &self,
        from: &str,
        to: &str,
        label: &str,
    ) -> Result<PendingTransaction> {
        self.contract
            .send(
                &ContractCall::new("transferFrom(address,address,uint256)")
                    .arg(abi::address(from)?)
                    .arg(abi::address(to)?)
                    .arg(abi::uint(token_id(label)?)),
            )
            .await
    }

    pub async fn safe_transfer_from(
        &self,
        from: &str,
        to: &str,
        label: &str,
    ) -> Result<PendingTransaction> {
        self.contract
            .send(
                &ContractCall::new("safeTransferFrom(address,address,uint256)")
                    .arg(abi::address(from)?)
                    .arg(abi::address(to)?)
                    .arg(abi::uint(token_id(label)?)),
            )
            .await
    }

    /// Re-point the registry record at the token owner, after a raw ERC-721
    /// transfer that bypassed the registry.
    pub async fn reclaim(&self, label: &str, owner: &str) -> Result<PendingTransaction> {
        self.contract
            .send(
                &ContractCall::new("reclaim(uint256,address)")
                    .arg(abi::uint(token_id(label)?))
                    .arg(abi::address(owner)?),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::Network;
    use crate::provider::testing::StaticProvider;

    use super::*;

    const REGISTRAR: &str = "d693d0cbfd7852047cd603f8d51fcb0b4c8c0856";
    const OWNER: &str = "c87bb8ab63de99a58a5339217c4a1c92f0fbfefe";

    #[test]
    fn token_id_is_the_labelhash_as_uint() {
        let id = token_id("first").unwrap();
        let mut raw = [0u8; 32];
        id.to_big_endian(&mut raw);
        assert_eq!(
            hex::encode(raw),
            "692e3fbb06193c3a65b6ccb60c9ec6fb32af21c16d3f6ac10039258c2a5d4d2d"
        );
        // Bracket-encoded labels decode instead of hashing.
        let encoded = format!("[{}]", "ab".repeat(32));
        let mut raw = [0u8; 32];
        token_id(&encoded).unwrap().to_big_endian(&mut raw);
        assert_eq!(hex::encode(raw), "ab".repeat(32));
    }

    #[tokio::test]
    async fn availability_checks_the_token() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![vec![ethabi::Token::Bool(true)]],
        ));
        let registrar = MrxRegistrar::at(REGISTRAR, Arc::clone(&provider) as Arc<dyn Provider>);
        assert!(registrar.available("first").await.unwrap());
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0], (REGISTRAR.to_string(), "available(uint256)".to_string()));
    }

    #[tokio::test]
    async fn enumeration_uses_the_erc721_signatures() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![
                vec![abi::uint(3u64)],
                vec![abi::uint(token_id("first").unwrap())],
            ],
        ));
        let registrar = MrxRegistrar::at(REGISTRAR, Arc::clone(&provider) as Arc<dyn Provider>);
        assert_eq!(registrar.balance_of(OWNER).await.unwrap().low_u64(), 3);
        registrar.token_of_owner_by_index(OWNER, 0).await.unwrap();
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0].1, "balanceOf(address)".to_string());
        assert_eq!(calls[1].1, "tokenOfOwnerByIndex(address,uint256)".to_string());
    }

    #[tokio::test]
    async fn reclaim_orders_token_then_owner() {
        let provider = Arc::new(StaticProvider::new(Network::TestNet, vec![]));
        let registrar = MrxRegistrar::at(REGISTRAR, Arc::clone(&provider) as Arc<dyn Provider>);
        registrar.reclaim("first", OWNER).await.unwrap();
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0].1, "reclaim(uint256,address)".to_string());
    }
}
