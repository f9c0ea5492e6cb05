// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Metrix address conversion
//!
//! Contract calls use the EVM hash160 form; wallets use base58check with a
//! network version prefix. The checksum is the first four bytes of a double
//! SHA-256 over the version byte and hash160, and is verified on decode.

use sha2::{Digest, Sha256};

use crate::constants::Network;

/// Errors from address conversion.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("expected a 20-byte hash160")]
    InvalidLength,
    #[error("checksum mismatch")]
    BadChecksum,
}

fn checksum(payload: &[u8]) -> [u8; 4] {
    let first = Sha256::digest(payload);
    let second = Sha256::digest(first);
    let mut out = [0u8; 4];
    out.copy_from_slice(&second[..4]);
    out
}

/// Convert a base58check Metrix address to its hash160 hex form.
pub fn to_hex_address(address: &str) -> Result<String, AddressError> {
    let raw = bs58::decode(address).into_vec()?;
    if raw.len() != 25 {
        return Err(AddressError::InvalidLength);
    }
    let (payload, check) = raw.split_at(21);
    if checksum(payload).as_slice() != check {
        return Err(AddressError::BadChecksum);
    }
    Ok(hex::encode(&payload[1..]))
}

/// Convert a hash160 hex string (`0x` prefix optional) to a base58check
/// address for the given network.
pub fn from_hex_address(network: Network, hash: &str) -> Result<String, AddressError> {
    let raw = hex::decode(hash.strip_prefix("0x").unwrap_or(hash))?;
    if raw.len() != 20 {
        return Err(AddressError::InvalidLength);
    }
    let mut payload = Vec::with_capacity(25);
    payload.push(network.b58_prefix());
    payload.extend_from_slice(&raw);
    let check = checksum(&payload);
    payload.extend_from_slice(&check);
    Ok(bs58::encode(payload).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH160: &str = "c87bb8ab63de99a58a5339217c4a1c92f0fbfefe";
    const TESTNET_ADDR: &str = "maTQfd4w7mqCzGL32RgBFMYY9ehCmjLEGf";

    #[test]
    fn encodes_testnet_address() {
        assert_eq!(from_hex_address(Network::TestNet, HASH160).unwrap(), TESTNET_ADDR);
        // 0x prefix is accepted.
        assert_eq!(
            from_hex_address(Network::TestNet, &format!("0x{HASH160}")).unwrap(),
            TESTNET_ADDR
        );
    }

    #[test]
    fn encodes_mainnet_address() {
        assert_eq!(
            from_hex_address(Network::MainNet, "0ac0b5e95a1f9717811b9ceebcb6855d02f638b3").unwrap(),
            "M8t1r7deCfWjYz7TqZv1yGVozKJkFDqPS2"
        );
    }

    #[test]
    fn roundtrips() {
        assert_eq!(to_hex_address(TESTNET_ADDR).unwrap(), HASH160);
        let mainnet = from_hex_address(Network::MainNet, HASH160).unwrap();
        assert_eq!(to_hex_address(&mainnet).unwrap(), HASH160);
    }

    #[test]
    fn rejects_tampered_checksum() {
        let mut tampered = TESTNET_ADDR.to_string();
        tampered.pop();
        tampered.push('g');
        assert!(matches!(
            to_hex_address(&tampered),
            Err(AddressError::BadChecksum) | Err(AddressError::InvalidLength)
        ));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(to_hex_address("0OIl"), Err(AddressError::Base58(_))));
        assert!(matches!(
            from_hex_address(Network::MainNet, "1234"),
            Err(AddressError::InvalidLength)
        ));
        assert!(matches!(
            from_hex_address(Network::MainNet, "zz"),
            Err(AddressError::Hex(_))
        ));
    }
}
