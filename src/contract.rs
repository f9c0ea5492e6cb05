// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Contract handle combining an address with a provider
//!
//! [`MetrixContract`] is the building block every MNS wrapper sits on: it
//! encodes calls through [`crate::abi`], routes them through the provider,
//! and offers typed accessors for the single-value returns the MNS contracts
//! produce.

use std::sync::Arc;

use ethabi::Token;

use crate::abi::{self, ContractCall};
use crate::error::{Error, Result};
use crate::provider::{
    normalize_contract_address, ContractTx, Provider, SendParams, TransactionReceipt,
};

/// A deployed contract bound to a provider.
#[derive(Clone)]
pub struct MetrixContract {
    address: String,
    provider: Arc<dyn Provider>,
}

impl MetrixContract {
    pub fn new(address: &str, provider: Arc<dyn Provider>) -> Self {
        Self {
            address: normalize_contract_address(address),
            provider,
        }
    }

    /// The contract's hash160 address, lowercase hex without a prefix.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Execute a read-only call and return its decoded output tokens.
    pub async fn call(&self, call: &ContractCall) -> Result<Vec<Token>> {
        Ok(self.provider.call_contract(&self.address, call).await?)
    }

    /// Submit a state-changing transaction with default gas settings.
    pub async fn send(&self, call: &ContractCall) -> Result<PendingTransaction> {
        self.send_with(call, &SendParams::default()).await
    }

    /// Submit a state-changing transaction with explicit send options.
    pub async fn send_with(
        &self,
        call: &ContractCall,
        params: &SendParams,
    ) -> Result<PendingTransaction> {
        let tx = self
            .provider
            .send_to_contract(&self.address, call, params)
            .await?;
        Ok(PendingTransaction {
            tx,
            contract: self.address.clone(),
            provider: Arc::clone(&self.provider),
        })
    }

    // Typed single-value call helpers.

    pub async fn call_address(&self, call: &ContractCall) -> Result<String> {
        let tokens = self.call(call).await?;
        abi::as_address(&tokens).ok_or(Error::UnexpectedReturn { expected: "address" })
    }

    pub async fn call_bytes32(&self, call: &ContractCall) -> Result<String> {
        let tokens = self.call(call).await?;
        abi::as_bytes32(&tokens).ok_or(Error::UnexpectedReturn { expected: "bytes32" })
    }

    pub async fn call_string(&self, call: &ContractCall) -> Result<String> {
        let tokens = self.call(call).await?;
        abi::as_string(&tokens).ok_or(Error::UnexpectedReturn { expected: "string" })
    }

    pub async fn call_bool(&self, call: &ContractCall) -> Result<bool> {
        let tokens = self.call(call).await?;
        abi::as_bool(&tokens).ok_or(Error::UnexpectedReturn { expected: "bool" })
    }

    pub async fn call_uint(&self, call: &ContractCall) -> Result<ethabi::Uint> {
        let tokens = self.call(call).await?;
        abi::as_uint(&tokens).ok_or(Error::UnexpectedReturn { expected: "uint256" })
    }

    pub async fn call_bytes(&self, call: &ContractCall) -> Result<Vec<u8>> {
        let tokens = self.call(call).await?;
        abi::as_bytes(&tokens).ok_or(Error::UnexpectedReturn { expected: "bytes" })
    }
}

impl std::fmt::Debug for MetrixContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetrixContract")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// A submitted transaction that has not necessarily confirmed yet.
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    tx: ContractTx,
    contract: String,
    provider: Arc<dyn Provider>,
}

impl PendingTransaction {
    pub fn txid(&self) -> &str {
        &self.tx.txid
    }

    /// Wait for confirmation and return the receipts for this contract.
    pub async fn receipts(&self) -> Result<Vec<TransactionReceipt>> {
        Ok(self
            .provider
            .get_tx_receipts(&self.tx, Some(&self.contract))
            .await?)
    }
}
