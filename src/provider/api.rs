// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Read-only provider backed by the public explorer REST API

use std::time::Duration;

use async_trait::async_trait;
use ethabi::Token;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::abi::ContractCall;
use crate::constants::Network;

use super::{
    normalize_contract_address, ContractTx, LogEntry, Provider, ProviderError, SendParams,
    TransactionReceipt,
};

/// A [`Provider`] that performs calls through a block explorer's REST API.
/// The explorer has no wallet, so sends are rejected with
/// [`ProviderError::ReadOnly`].
#[derive(Debug, Clone)]
pub struct ApiProvider {
    network: Network,
    base_url: String,
    http: reqwest::Client,
    poll_interval: Duration,
    max_polls: u32,
}

impl ApiProvider {
    /// A provider against the public explorer for the network. Fails with
    /// [`ProviderError::UnsupportedNetwork`] where no explorer exists
    /// (RegTest).
    pub fn new(network: Network) -> Result<Self, ProviderError> {
        let base = network
            .explorer_url()
            .ok_or(ProviderError::UnsupportedNetwork(network))?;
        Ok(Self::with_base_url(network, base))
    }

    /// A provider against a self-hosted explorer instance.
    pub fn with_base_url(network: Network, base_url: &str) -> Self {
        Self {
            network,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            poll_interval: Duration::from_secs(10),
            max_polls: 60,
        }
    }

    /// Tune how often and how long to poll for transaction confirmation.
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let endpoint = format!("{}{path}", self.base_url);
        debug!(%endpoint, "explorer request");
        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ProviderError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;
        response
            .json()
            .await
            .map_err(|source| ProviderError::Http { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallResponse {
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
#[serde(rename_all = "camelCase", default)]
struct TxResponse {
    confirmations: i64,
    outputs: Vec<TxOutput>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TxOutput {
    receipt: Option<OutputReceipt>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct OutputReceipt {
    sender: String,
    gas_used: u64,
    contract_address: String,
    excepted: String,
    excepted_message: String,
    logs: Vec<LogEntry>,
}

#[async_trait]
impl Provider for ApiProvider {
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
        let response: CallResponse = self
            .get_json(&format!("/contract/{address}/call?data={data}"))
            .await?;
        let result = response.execution_result;
        if result.excepted != "None" {
            return Err(ProviderError::Execution(if result.excepted_message.is_empty() {
                result.excepted
            } else {
                format!("{}: {}", result.excepted, result.excepted_message)
            }));
        }
        let raw = hex::decode(result.output.trim_start_matches("0x"))
            .map_err(|e| ProviderError::BadResponse(format!("output is not hex: {e}")))?;
        Ok(call.decode_output(&raw)?)
    }

    async fn send_to_contract(
        &self,
        _contract: &str,
        _call: &ContractCall,
        _params: &SendParams,
    ) -> Result<ContractTx, ProviderError> {
        Err(ProviderError::ReadOnly)
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
            let response: TxResponse = self.get_json(&format!("/tx/{}", tx.txid)).await?;
            if response.confirmations < 0 {
                return Err(ProviderError::Orphaned(tx.txid.clone()));
            }
            if response.confirmations == 0 {
                debug!(txid = %tx.txid, poll, "transaction not yet confirmed");
                continue;
            }
            let receipts = response
                .outputs
                .into_iter()
                .filter_map(|output| output.receipt)
                .filter(|receipt| match &wanted {
                    Some(address) => &receipt.contract_address == address,
                    None => true,
                })
                .map(|receipt| TransactionReceipt {
                    transaction_hash: tx.txid.clone(),
                    from: receipt.sender,
                    gas_used: receipt.gas_used,
                    contract_address: receipt.contract_address,
                    excepted: receipt.excepted,
                    excepted_message: receipt.excepted_message,
                    log: receipt.logs,
                    ..Default::default()
                })
                .collect();
            return Ok(receipts);
        }
        Err(ProviderError::ConfirmationTimeout {
            txid: tx.txid.clone(),
            polls: self.max_polls,
        })
    }

    async fn balance(&self, address: &str) -> Result<u64, ProviderError> {
        let endpoint = format!("{}/address/{address}/balance", self.base_url);
        let text = self
            .http
            .get(&endpoint)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ProviderError::Http {
                endpoint: endpoint.clone(),
                source,
            })?
            .text()
            .await
            .map_err(|source| ProviderError::Http { endpoint, source })?;
        text.trim()
            .parse()
            .map_err(|_| ProviderError::BadResponse(format!("balance is not a number: {text:?}")))
    }
}

#[cfg(test)]
mod tests {
    use ethabi::ParamType;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const CONTRACT: &str = "d693d0cbfd7852047cd603f8d51fcb0b4c8c0856";

    fn provider(server: &MockServer) -> ApiProvider {
        ApiProvider::with_base_url(Network::TestNet, &server.uri())
            .with_polling(Duration::from_millis(1), 3)
    }

    #[tokio::test]
    async fn decodes_call_output() {
        let server = MockServer::start().await;
        let mut output = "0".repeat(24);
        output.push_str("0ac0b5e95a1f9717811b9ceebcb6855d02f638b3");
        Mock::given(method("GET"))
            .and(path(format!("/contract/{CONTRACT}/call")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "executionResult": { "output": output, "excepted": "None" }
            })))
            .mount(&server)
            .await;

        let call = ContractCall::new("owner(bytes32)")
            .arg(crate::abi::bytes32(&"00".repeat(32)).unwrap())
            .output(ParamType::Address);
        let tokens = provider(&server).call_contract(CONTRACT, &call).await.unwrap();
        assert_eq!(
            crate::abi::as_address(&tokens).unwrap(),
            "0x0ac0b5e95a1f9717811b9ceebcb6855d02f638b3"
        );
    }

    #[tokio::test]
    async fn passes_calldata_to_explorer() {
        let server = MockServer::start().await;
        let call = ContractCall::new("resolver(bytes32)")
            .arg(crate::abi::bytes32(&"11".repeat(32)).unwrap())
            .output(ParamType::Address);
        let data = hex::encode(call.encode().unwrap());
        Mock::given(method("GET"))
            .and(path(format!("/contract/{CONTRACT}/call")))
            .and(query_param("data", data))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "executionResult": { "output": "0".repeat(64), "excepted": "None" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        provider(&server).call_contract(CONTRACT, &call).await.unwrap();
    }

    #[tokio::test]
    async fn surfaces_execution_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/contract/{CONTRACT}/call")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "executionResult": {
                    "output": "",
                    "excepted": "Revert",
                    "exceptedMessage": "unauthorised"
                }
            })))
            .mount(&server)
            .await;

        let call = ContractCall::new("owner(bytes32)")
            .arg(crate::abi::bytes32(&"00".repeat(32)).unwrap())
            .output(ParamType::Address);
        let err = provider(&server).call_contract(CONTRACT, &call).await.unwrap_err();
        assert!(matches!(err, ProviderError::Execution(message) if message.contains("Revert")));
    }

    #[tokio::test]
    async fn rejects_sends() {
        let server = MockServer::start().await;
        let call = ContractCall::new("setName(string)").arg(crate::abi::string("x.mrx"));
        let err = provider(&server)
            .send_to_contract(CONTRACT, &call, &SendParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ReadOnly));
    }

    #[tokio::test]
    async fn polls_receipts_until_confirmed() {
        let server = MockServer::start().await;
        let txid = "ab".repeat(32);
        Mock::given(method("GET"))
            .and(path(format!("/tx/{txid}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "confirmations": 0,
                "outputs": []
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/tx/{txid}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "confirmations": 2,
                "outputs": [{
                    "receipt": {
                        "sender": "maTQfd4w7mqCzGL32RgBFMYY9ehCmjLEGf",
                        "gasUsed": 39500,
                        "contractAddress": CONTRACT,
                        "excepted": "None",
                        "logs": []
                    }
                }]
            })))
            .mount(&server)
            .await;

        let tx = ContractTx {
            txid: txid.clone(),
            sender: None,
            hash160: None,
        };
        let receipts = provider(&server)
            .get_tx_receipts(&tx, Some(CONTRACT))
            .await
            .unwrap();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].transaction_hash, txid);
        assert_eq!(receipts[0].gas_used, 39500);
    }

    #[tokio::test]
    async fn orphaned_transactions_fail_fast() {
        let server = MockServer::start().await;
        let txid = "cd".repeat(32);
        Mock::given(method("GET"))
            .and(path(format!("/tx/{txid}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "confirmations": -1,
                "outputs": []
            })))
            .mount(&server)
            .await;

        let tx = ContractTx {
            txid,
            sender: None,
            hash160: None,
        };
        let err = provider(&server).get_tx_receipts(&tx, None).await.unwrap_err();
        assert!(matches!(err, ProviderError::Orphaned(_)));
    }

    #[tokio::test]
    async fn parses_plain_text_balance() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/address/maTQfd4w7mqCzGL32RgBFMYY9ehCmjLEGf/balance"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1234500000"))
            .mount(&server)
            .await;

        let balance = provider(&server)
            .balance("maTQfd4w7mqCzGL32RgBFMYY9ehCmjLEGf")
            .await
            .unwrap();
        assert_eq!(balance, 1234500000);
    }

    #[test]
    fn regtest_has_no_public_explorer() {
        assert!(matches!(
            ApiProvider::new(Network::RegTest),
            Err(ProviderError::UnsupportedNetwork(Network::RegTest))
        ));
    }
}
