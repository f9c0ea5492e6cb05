// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Registrar controller wrapper
//!
//! Public registration runs commit/reveal: hash the desired label, owner and
//! a secret into a commitment, submit it, wait out the minimum commitment
//! age, then reveal with `register` and payment. The gap stops front-running
//! of name choices seen in the mempool.

use std::sync::Arc;

use ethabi::ParamType;

use crate::abi::{self, ContractCall};
use crate::constants::{deployment, REGISTRAR_GAS_LIMIT};
use crate::contract::{MetrixContract, PendingTransaction};
use crate::error::Result;
use crate::provider::{Provider, SendParams};

#[derive(Debug, Clone)]
pub struct MrxRegistrarController {
    contract: MetrixContract,
}

impl MrxRegistrarController {
    /// The deployed controller for the provider's network.
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        let address = deployment(provider.network()).mrx_registrar_controller;
        Self::at(address, provider)
    }

    /// A controller at an explicit address.
    pub fn at(address: &str, provider: Arc<dyn Provider>) -> Self {
        Self {
            contract: MetrixContract::new(address, provider),
        }
    }

    pub fn address(&self) -> &str {
        self.contract.address()
    }

    fn register_params(value: ethabi::Uint) -> SendParams {
        SendParams {
            value: value.low_u64(),
            gas_limit: REGISTRAR_GAS_LIMIT,
            ..SendParams::default()
        }
    }

    /// Shortest registration the controller accepts, in seconds.
    pub async fn min_registration_duration(&self) -> Result<ethabi::Uint> {
        self.contract
            .call_uint(
                &ContractCall::new("MIN_REGISTRATION_DURATION()").output(ParamType::Uint(256)),
            )
            .await
    }

    /// Seconds a commitment must age before it can be revealed.
    pub async fn min_commitment_age(&self) -> Result<ethabi::Uint> {
        self.contract
            .call_uint(&ContractCall::new("minCommitmentAge()").output(ParamType::Uint(256)))
            .await
    }

    /// Seconds after which an unrevealed commitment expires.
    pub async fn max_commitment_age(&self) -> Result<ethabi::Uint> {
        self.contract
            .call_uint(&ContractCall::new("maxCommitmentAge()").output(ParamType::Uint(256)))
            .await
    }

    /// Unix timestamp a commitment was recorded at, zero if unknown.
    pub async fn commitment(&self, commitment: &str) -> Result<ethabi::Uint> {
        self.contract
            .call_uint(
                &ContractCall::new("commitments(bytes32)")
                    .arg(abi::bytes32(commitment)?)
                    .output(ParamType::Uint(256)),
            )
            .await
    }

    /// Price in satoshis to register or renew a label for a duration.
    pub async fn rent_price(&self, label: &str, duration: u64) -> Result<ethabi::Uint> {
        self.contract
            .call_uint(
                &ContractCall::new("rentPrice(string,uint256)")
                    .arg(abi::string(label))
                    .arg(abi::uint(duration))
                    .output(ParamType::Uint(256)),
            )
            .await
    }

    /// Whether the label meets the controller's validity rules.
    pub async fn valid(&self, label: &str) -> Result<bool> {
        self.contract
            .call_bool(
                &ContractCall::new("valid(string)")
                    .arg(abi::string(label))
                    .output(ParamType::Bool),
            )
            .await
    }

    /// Whether the label is valid and open for registration.
    pub async fn available(&self, label: &str) -> Result<bool> {
        self.contract
            .call_bool(
                &ContractCall::new("available(string)")
                    .arg(abi::string(label))
                    .output(ParamType::Bool),
            )
            .await
    }

    /// Compute the commitment hash for a plain registration.
    pub async fn make_commitment(
        &self,
        label: &str,
        owner: &str,
        secret: &str,
    ) -> Result<String> {
        self.contract
            .call_bytes32(
                &ContractCall::new("makeCommitment(string,address,bytes32)")
                    .arg(abi::string(label))
                    .arg(abi::address(owner)?)
                    .arg(abi::bytes32(secret)?)
                    .output(ParamType::FixedBytes(32)),
            )
            .await
    }

    /// Compute the commitment hash for a registration that also configures a
    /// resolver and address record.
    pub async fn make_commitment_with_config(
        &self,
        label: &str,
        owner: &str,
        secret: &str,
        resolver: &str,
        addr: &str,
    ) -> Result<String> {
        self.contract
            .call_bytes32(
                &ContractCall::new(
                    "makeCommitmentWithConfig(string,address,bytes32,address,address)",
                )
                .arg(abi::string(label))
                .arg(abi::address(owner)?)
                .arg(abi::bytes32(secret)?)
                .arg(abi::address(resolver)?)
                .arg(abi::address(addr)?)
                .output(ParamType::FixedBytes(32)),
            )
            .await
    }

    /// Submit a commitment and wait for it to confirm.
    pub async fn commit(&self, commitment: &str) -> Result<PendingTransaction> {
        self.contract
            .send(&ContractCall::new("commit(bytes32)").arg(abi::bytes32(commitment)?))
            .await
    }

    /// Reveal a registration. `value` is the rent in satoshis, forwarded with
    /// the transaction.
    pub async fn register(
        &self,
        label: &str,
        owner: &str,
        duration: u64,
        secret: &str,
        value: ethabi::Uint,
    ) -> Result<PendingTransaction> {
        self.contract
            .send_with(
                &ContractCall::new("register(string,address,uint256,bytes32)")
                    .arg(abi::string(label))
                    .arg(abi::address(owner)?)
                    .arg(abi::uint(duration))
                    .arg(abi::bytes32(secret)?),
                &Self::register_params(value),
            )
            .await
    }

    /// Reveal a registration with resolver and address configuration.
    #[allow(clippy::too_many_arguments)]
    pub async fn register_with_config(
        &self,
        label: &str,
        owner: &str,
        duration: u64,
        secret: &str,
        resolver: &str,
        addr: &str,
        value: ethabi::Uint,
    ) -> Result<PendingTransaction> {
        self.contract
            .send_with(
                &ContractCall::new(
                    "registerWithConfig(string,address,uint256,bytes32,address,address)",
                )
                .arg(abi::string(label))
                .arg(abi::address(owner)?)
                .arg(abi::uint(duration))
                .arg(abi::bytes32(secret)?)
                .arg(abi::address(resolver)?)
                .arg(abi::address(addr)?),
                &Self::register_params(value),
            )
            .await
    }

    /// Extend an existing registration.
    pub async fn renew(
        &self,
        label: &str,
        duration: u64,
        value: ethabi::Uint,
    ) -> Result<PendingTransaction> {
        self.contract
            .send_with(
                &ContractCall::new("renew(string,uint256)")
                    .arg(abi::string(label))
                    .arg(abi::uint(duration)),
                &Self::register_params(value),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::Network;
    use crate::provider::testing::StaticProvider;

    use super::*;

    const CONTROLLER: &str = "d693d0cbfd7852047cd603f8d51fcb0b4c8c0856";
    const OWNER: &str = "c87bb8ab63de99a58a5339217c4a1c92f0fbfefe";
    const SECRET: &str = "0x1100000000000000000000000000000000000000000000000000000000000011";

    #[tokio::test]
    async fn commitment_flow_uses_bytes32_keys() {
        let hash = format!("0x{}", "cd".repeat(32));
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![
                vec![abi::bytes32(&hash).unwrap()],
                vec![abi::uint(0u64)],
            ],
        ));
        let controller =
            MrxRegistrarController::at(CONTROLLER, Arc::clone(&provider) as Arc<dyn Provider>);

        let commitment = controller
            .make_commitment("first", OWNER, SECRET)
            .await
            .unwrap();
        assert_eq!(commitment, hash);
        assert_eq!(controller.commitment(&commitment).await.unwrap().low_u64(), 0);
        controller.commit(&commitment).await.unwrap();

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0].1, "makeCommitment(string,address,bytes32)".to_string());
        assert_eq!(calls[1].1, "commitments(bytes32)".to_string());
        assert_eq!(calls[2].1, "commit(bytes32)".to_string());
    }

    #[tokio::test]
    async fn register_reveals_with_the_same_secret() {
        let provider = Arc::new(StaticProvider::new(Network::TestNet, vec![]));
        let controller =
            MrxRegistrarController::at(CONTROLLER, Arc::clone(&provider) as Arc<dyn Provider>);
        controller
            .register("first", OWNER, 31_536_000, SECRET, ethabi::Uint::from(5_000_000u64))
            .await
            .unwrap();
        let calls = provider.calls.lock().unwrap();
        assert_eq!(
            calls[0].1,
            "register(string,address,uint256,bytes32)".to_string()
        );
    }

    #[tokio::test]
    async fn pricing_and_validity_queries() {
        let provider = Arc::new(StaticProvider::new(
            Network::TestNet,
            vec![
                vec![abi::uint(5_000_000u64)],
                vec![ethabi::Token::Bool(true)],
                vec![ethabi::Token::Bool(false)],
            ],
        ));
        let controller =
            MrxRegistrarController::at(CONTROLLER, Arc::clone(&provider) as Arc<dyn Provider>);
        assert_eq!(
            controller.rent_price("first", 31_536_000).await.unwrap().low_u64(),
            5_000_000
        );
        assert!(controller.valid("first").await.unwrap());
        assert!(!controller.available("first").await.unwrap());
    }
}
