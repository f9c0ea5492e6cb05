// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Reverse registrar wrapper
//!
//! The reverse registrar owns the `addr.reverse` node and lets an address
//! claim its reverse node or set its primary name in one step.

use std::sync::Arc;

use ethabi::ParamType;

use crate::abi::{self, ContractCall};
use crate::constants::deployment;
use crate::contract::{MetrixContract, PendingTransaction};
use crate::error::Result;
use crate::provider::Provider;

#[derive(Debug, Clone)]
pub struct ReverseRegistrar {
    contract: MetrixContract,
}

impl ReverseRegistrar {
    /// The deployed reverse registrar for the provider's network.
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        let address = deployment(provider.network()).reverse_registrar;
        Self::at(address, provider)
    }

    /// A reverse registrar at an explicit address.
    pub fn at(address: &str, provider: Arc<dyn Provider>) -> Self {
        Self {
            contract: MetrixContract::new(address, provider),
        }
    }

    pub fn address(&self) -> &str {
        self.contract.address()
    }

    /// The reverse node for an address, as the contract computes it.
    pub async fn node(&self, address: &str) -> Result<String> {
        self.contract
            .call_bytes32(
                &ContractCall::new("node(address)")
                    .arg(abi::address(address)?)
                    .output(ParamType::FixedBytes(32)),
            )
            .await
    }

    /// Claim the sender's reverse node, assigning it to `owner`.
    pub async fn claim(&self, owner: &str) -> Result<PendingTransaction> {
        self.contract
            .send(&ContractCall::new("claim(address)").arg(abi::address(owner)?))
            .await
    }

    /// Claim the reverse node of `address` on its behalf. The sender must be
    /// authorised for that address.
    pub async fn claim_for_addr(&self, address: &str, owner: &str) -> Result<PendingTransaction> {
        self.contract
            .send(
                &ContractCall::new("claimForAddr(address,address)")
                    .arg(abi::address(address)?)
                    .arg(abi::address(owner)?),
            )
            .await
    }

    /// Claim the sender's reverse node and point it at a resolver.
    pub async fn claim_with_resolver(
        &self,
        owner: &str,
        resolver: &str,
    ) -> Result<PendingTransaction> {
        self.contract
            .send(
                &ContractCall::new("claimWithResolver(address,address)")
                    .arg(abi::address(owner)?)
                    .arg(abi::address(resolver)?),
            )
            .await
    }

    /// Claim another address's reverse node with an explicit resolver.
    pub async fn claim_with_resolver_for_addr(
        &self,
        address: &str,
        owner: &str,
        resolver: &str,
    ) -> Result<PendingTransaction> {
        self.contract
            .send(
                &ContractCall::new("claimWithResolverForAddr(address,address,address)")
                    .arg(abi::address(address)?)
                    .arg(abi::address(owner)?)
                    .arg(abi::address(resolver)?),
            )
            .await
    }

    /// Set the sender's primary name, claiming the reverse node if needed.
    pub async fn set_name(&self, name: &str) -> Result<PendingTransaction> {
        self.contract
            .send(&ContractCall::new("setName(string)").arg(abi::string(name)))
            .await
    }

    /// Set the primary name for another address the sender is authorised for.
    pub async fn set_name_for_addr(
        &self,
        address: &str,
        owner: &str,
        name: &str,
    ) -> Result<PendingTransaction> {
        self.contract
            .send(
                &ContractCall::new("setNameForAddr(address,address,string)")
                    .arg(abi::address(address)?)
                    .arg(abi::address(owner)?)
                    .arg(abi::string(name)),
            )
            .await
    }
}
