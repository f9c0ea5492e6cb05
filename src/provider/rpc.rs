// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Provider backed by a wallet daemon's JSON-RPC interface
//!
//! Unlike the explorer, the daemon holds keys, so this provider can submit
//! `sendtocontract` transactions. Value and gas price are quoted to the
//! daemon in MRX (satoshis times 1e-8).

use std::time::Duration;

use async_trait::async_trait;
use ethabi::Token;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::abi::ContractCall;
use crate::constants::Network;

use super::{
    normalize_contract_address, ContractTx, Provider, ProviderError, SendParams,
    TransactionReceipt,
};

const SATOSHI: f64 = 1e-8;

/// A [`Provider`] speaking JSON-RPC to a metrixd daemon.
#[derive(Clone)]
pub struct RpcProvider {
    network: Network,
    url: String,
    auth: Option<(String, String)>,
    sender: Option<String>,
    http: reqwest::Client,
    poll_interval: Duration,
    max_polls: u32,
}

impl RpcProvider {
    pub fn new(network: Network, url: &str) -> Self {
        Self {
            network,
            url: url.to_string(),
            auth: None,
            sender: None,
            http: reqwest::Client::new(),
            poll_interval: Duration::from_secs(30),
            max_polls: 40,
        }
    }

    /// Basic-auth credentials, matching the daemon's rpcuser and rpcpassword.
    pub fn with_auth(mut self, user: &str, password: &str) -> Self {
        self.auth = Some((user.to_string(), password.to_string()));
        self
    }

    /// The wallet address transactions are sent from. Required for sends.
    pub fn with_sender(mut self, address: &str) -> Self {
        self.sender = Some(address.to_string());
        self
    }

    /// Tune how often and how long to poll for transaction confirmation.
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    async fn rpc<T: DeserializeOwned>(
        &self,
        rpc_method: &str,
        params: Value,
    ) -> Result<T, ProviderError> {
        debug!(%rpc_method, "daemon request");
        let mut request = self.http.post(&self.url).json(&json!({
            "jsonrpc": "1.0",
            "id": "mnslib",
            "method": rpc_method,
            "params": params,
        }));
        if let Some((user, password)) = &self.auth {
            request = request.basic_auth(user, Some(password));
        }
        // The daemon reports method failures with a 500 status and a JSON
        // error body, so the status is not checked here.
        let envelope: RpcEnvelope<T> = request
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                endpoint: self.url.clone(),
                source,
            })?
            .json()
            .await
            .map_err(|source| ProviderError::Http {
                endpoint: self.url.clone(),
                source,
            })?;
        if let Some(error) = envelope.error {
            return Err(ProviderError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        envelope
            .result
            .ok_or_else(|| ProviderError::BadResponse("rpc result was null".into()))
    }
}

// The rpcpassword must not leak into logs, so the auth pair prints as the
// user name only.
impl std::fmt::Debug for RpcProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcProvider")
            .field("network", &self.network)
            .field("url", &self.url)
            .field("auth", &self.auth.as_ref().map(|(user, _)| user))
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallResult {
    execution_result: ExecutionResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExecutionResult {
    output: String,
    excepted: String,
    excepted_message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WalletTx {
    confirmations: i64,
}

#[async_trait]
impl Provider for RpcProvider {
    fn network(&self) -> Network {
        self.network
    }

    async fn call_contract(
        &self,
        contract: &str,
        call: &ContractCall,
    ) -> Result<Vec<Token>, ProviderError> {
        let data = hex::encode(call.encode()?);
        let address = normalize_contract_address(contract);
        let mut params = vec![json!(address), json!(data)];
        if let Some(sender) = &self.sender {
            params.push(json!(sender));
        }
        let result: CallResult = self.rpc("callcontract", Value::Array(params)).await?;
        let execution = result.execution_result;
        if execution.excepted != "None" {
            return Err(ProviderError::Execution(if execution.excepted_message.is_empty() {
                execution.excepted
            } else {
                format!("{}: {}", execution.excepted, execution.excepted_message)
            }));
        }
        let raw = hex::decode(execution.output.trim_start_matches("0x"))
            .map_err(|e| ProviderError::BadResponse(format!("output is not hex: {e}")))?;
        Ok(call.decode_output(&raw)?)
    }

    async fn send_to_contract(
        &self,
        contract: &str,
        call: &ContractCall,
        params: &SendParams,
    ) -> Result<ContractTx, ProviderError> {
        let sender = self.sender.as_ref().ok_or(ProviderError::NoSender)?;
        let data = hex::encode(call.encode()?);
        let address = normalize_contract_address(contract);
        self.rpc(
            "sendtocontract",
            json!([
                address,
                data,
                params.value as f64 * SATOSHI,
                params.gas_limit,
                params.gas_price as f64 * SATOSHI,
                sender,
                true,
                true,
            ]),
        )
        .await
    }

    async fn get_tx_receipts(
        &self,
        tx: &ContractTx,
        contract: Option<&str>,
    ) -> Result<Vec<TransactionReceipt>, ProviderError> {
        let wanted = contract.map(normalize_contract_address);
        for poll in 0..self.max_polls {
            if poll > 0 {
                tokio::time::sleep(self.poll_interval).await;
            }
            let wallet_tx: WalletTx = self
                .rpc("gettransaction", json!([tx.txid]))
                .await?;
            if wallet_tx.confirmations < 0 {
                return Err(ProviderError::Orphaned(tx.txid.clone()));
            }
            if wallet_tx.confirmations == 0 {
                debug!(txid = %tx.txid, poll, "transaction not yet confirmed");
                continue;
            }
            let receipts: Vec<TransactionReceipt> = self
                .rpc("gettransactionreceipt", json!([tx.txid]))
                .await?;
            return Ok(receipts
                .into_iter()
                .filter(|receipt| match &wanted {
                    Some(address) => &receipt.contract_address == address,
                    None => true,
                })
                .collect());
        }
        Err(ProviderError::ConfirmationTimeout {
            txid: tx.txid.clone(),
            polls: self.max_polls,
        })
    }

    async fn balance(&self, address: &str) -> Result<u64, ProviderError> {
        #[derive(Deserialize)]
        struct Balance {
            balance: u64,
        }
        let result: Balance = self
            .rpc("getaddressbalance", json!([{ "addresses": [address] }]))
            .await?;
        Ok(result.balance)
    }
}
