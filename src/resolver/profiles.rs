// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Resolver capability traits
//!
//! Each trait covers one record family of the resolver ABI and carries
//! default implementations over the wrapper's contract handle, so a concrete
//! resolver opts into capabilities by implementing `contract()` once.

use async_trait::async_trait;
use ethabi::ParamType;

use crate::abi::{self, ContractCall};
use crate::contract::{MetrixContract, PendingTransaction};
use crate::error::{Error, Result};

fn node(hash: &str) -> Result<ethabi::Token> {
    Ok(abi::bytes32(hash)?)
}

/// ERC-165 interface detection.
#[async_trait]
pub trait Erc165 {
    fn contract(&self) -> &MetrixContract;

    async fn supports_interface(&self, interface_id: [u8; 4]) -> Result<bool> {
        self.contract()
            .call_bool(
                &ContractCall::new("supportsInterface(bytes4)")
                    .arg(abi::bytes4(interface_id))
                    .output(ParamType::Bool),
            )
            .await
    }
}

/// Address records, both the MRX default and SLIP-44 multi-coin variants.
#[async_trait]
pub trait AddrResolver: Erc165 {
    async fn addr(&self, node_hash: &str) -> Result<String> {
        self.contract()
            .call_address(
                &ContractCall::new("addr(bytes32)")
                    .arg(node(node_hash)?)
                    .output(ParamType::Address),
            )
            .await
    }

    async fn set_addr(&self, node_hash: &str, address: &str) -> Result<PendingTransaction> {
        self.contract()
            .send(
                &ContractCall::new("setAddr(bytes32,address)")
                    .arg(node(node_hash)?)
                    .arg(abi::address(address)?),
            )
            .await
    }

    async fn addr_by_type(&self, node_hash: &str, coin_type: u64) -> Result<Vec<u8>> {
        self.contract()
            .call_bytes(
                &ContractCall::new("addr(bytes32,uint256)")
                    .arg(node(node_hash)?)
                    .arg(abi::uint(coin_type))
                    .output(ParamType::Bytes),
            )
            .await
    }

    async fn set_addr_by_type(
        &self,
        node_hash: &str,
        coin_type: u64,
        address: Vec<u8>,
    ) -> Result<PendingTransaction> {
        self.contract()
            .send(
                &ContractCall::new("setAddr(bytes32,uint256,bytes)")
                    .arg(node(node_hash)?)
                    .arg(abi::uint(coin_type))
                    .arg(abi::bytes(address)),
            )
            .await
    }
}

/// Key-value text records.
#[async_trait]
pub trait TextResolver: Erc165 {
    async fn text(&self, node_hash: &str, key: &str) -> Result<String> {
        self.contract()
            .call_string(
                &ContractCall::new("text(bytes32,string)")
                    .arg(node(node_hash)?)
                    .arg(abi::string(key))
                    .output(ParamType::String),
            )
            .await
    }

    async fn set_text(
        &self,
        node_hash: &str,
        key: &str,
        value: &str,
    ) -> Result<PendingTransaction> {
        self.contract()
            .send(
                &ContractCall::new("setText(bytes32,string,string)")
                    .arg(node(node_hash)?)
                    .arg(abi::string(key))
                    .arg(abi::string(value)),
            )
            .await
    }
}

/// EIP-1577 contenthash records, raw bytes.
#[async_trait]
pub trait ContenthashResolver: Erc165 {
    async fn contenthash(&self, node_hash: &str) -> Result<Vec<u8>> {
        self.contract()
            .call_bytes(
                &ContractCall::new("contenthash(bytes32)")
                    .arg(node(node_hash)?)
                    .output(ParamType::Bytes),
            )
            .await
    }

    async fn set_contenthash(
        &self,
        node_hash: &str,
        content: Vec<u8>,
    ) -> Result<PendingTransaction> {
        self.contract()
            .send(
                &ContractCall::new("setContenthash(bytes32,bytes)")
                    .arg(node(node_hash)?)
                    .arg(abi::bytes(content)),
            )
            .await
    }
}

/// Reverse-resolution name records.
#[async_trait]
pub trait NameResolver: Erc165 {
    async fn name(&self, node_hash: &str) -> Result<String> {
        self.contract()
            .call_string(
                &ContractCall::new("name(bytes32)")
                    .arg(node(node_hash)?)
                    .output(ParamType::String),
            )
            .await
    }

    async fn set_name(&self, node_hash: &str, name: &str) -> Result<PendingTransaction> {
        self.contract()
            .send(
                &ContractCall::new("setName(bytes32,string)")
                    .arg(node(node_hash)?)
                    .arg(abi::string(name)),
            )
            .await
    }
}

/// SECP256k1 public key records, stored as two 32-byte halves.
#[async_trait]
pub trait PubkeyResolver: Erc165 {
    async fn pubkey(&self, node_hash: &str) -> Result<([u8; 32], [u8; 32])> {
        let tokens = self
            .contract()
            .call(
                &ContractCall::new("pubkey(bytes32)")
                    .arg(node(node_hash)?)
                    .output(ParamType::FixedBytes(32))
                    .output(ParamType::FixedBytes(32)),
            )
            .await?;
        let half = |index: usize| -> Result<[u8; 32]> {
            match tokens.get(index) {
                Some(ethabi::Token::FixedBytes(b)) if b.len() == 32 => {
                    let mut out = [0u8; 32];
                    out.copy_from_slice(b);
                    Ok(out)
                }
                _ => Err(Error::UnexpectedReturn { expected: "bytes32 pair" }),
            }
        };
        Ok((half(0)?, half(1)?))
    }

    async fn set_pubkey(
        &self,
        node_hash: &str,
        x: [u8; 32],
        y: [u8; 32],
    ) -> Result<PendingTransaction> {
        self.contract()
            .send(
                &ContractCall::new("setPubkey(bytes32,bytes32,bytes32)")
                    .arg(node(node_hash)?)
                    .arg(ethabi::Token::FixedBytes(x.to_vec()))
                    .arg(ethabi::Token::FixedBytes(y.to_vec())),
            )
            .await
    }
}

/// Interface implementer records (EIP-1844 style discovery).
#[async_trait]
pub trait InterfaceResolver: Erc165 {
    async fn interface_implementer(
        &self,
        node_hash: &str,
        interface_id: [u8; 4],
    ) -> Result<String> {
        self.contract()
            .call_address(
                &ContractCall::new("interfaceImplementer(bytes32,bytes4)")
                    .arg(node(node_hash)?)
                    .arg(abi::bytes4(interface_id))
                    .output(ParamType::Address),
            )
            .await
    }

    async fn set_interface(
        &self,
        node_hash: &str,
        interface_id: [u8; 4],
        implementer: &str,
    ) -> Result<PendingTransaction> {
        self.contract()
            .send(
                &ContractCall::new("setInterface(bytes32,bytes4,address)")
                    .arg(node(node_hash)?)
                    .arg(abi::bytes4(interface_id))
                    .arg(abi::address(implementer)?),
            )
            .await
    }
}

/// ABI definition records, keyed by a content-type bitmask.
#[async_trait]
pub trait AbiResolver: Erc165 {
    async fn abi(&self, node_hash: &str, content_types: u64) -> Result<(u64, Vec<u8>)> {
        let tokens = self
            .contract()
            .call(
                &ContractCall::new("ABI(bytes32,uint256)")
                    .arg(node(node_hash)?)
                    .arg(abi::uint(content_types))
                    .output(ParamType::Uint(256))
                    .output(ParamType::Bytes),
            )
            .await?;
        let content_type = match tokens.first() {
            Some(ethabi::Token::Uint(u)) => u.low_u64(),
            _ => return Err(Error::UnexpectedReturn { expected: "(uint256, bytes)" }),
        };
        let data = match tokens.get(1) {
            Some(ethabi::Token::Bytes(b)) => b.clone(),
            _ => return Err(Error::UnexpectedReturn { expected: "(uint256, bytes)" }),
        };
        Ok((content_type, data))
    }

    async fn set_abi(
        &self,
        node_hash: &str,
        content_type: u64,
        data: Vec<u8>,
    ) -> Result<PendingTransaction> {
        self.contract()
            .send(
                &ContractCall::new("setABI(bytes32,uint256,bytes)")
                    .arg(node(node_hash)?)
                    .arg(abi::uint(content_type))
                    .arg(abi::bytes(data)),
            )
            .await
    }
}

/// DNS records stored under a node, keyed by DNS name hash and record type.
#[async_trait]
pub trait DnsResolver: Erc165 {
    async fn dns_record(
        &self,
        node_hash: &str,
        name_hash: &str,
        resource: u16,
    ) -> Result<Vec<u8>> {
        self.contract()
            .call_bytes(
                &ContractCall::new("dnsRecord(bytes32,bytes32,uint16)")
                    .arg(node(node_hash)?)
                    .arg(node(name_hash)?)
                    .arg(abi::uint(resource as u64))
                    .output(ParamType::Bytes),
            )
            .await
    }

    async fn set_dns_records(&self, node_hash: &str, data: Vec<u8>) -> Result<PendingTransaction> {
        self.contract()
            .send(
                &ContractCall::new("setDNSRecords(bytes32,bytes)")
                    .arg(node(node_hash)?)
                    .arg(abi::bytes(data)),
            )
            .await
    }

    async fn clear_dns_zone(&self, node_hash: &str) -> Result<PendingTransaction> {
        self.contract()
            .send(&ContractCall::new("clearDNSZone(bytes32)").arg(node(node_hash)?))
            .await
    }
}
