// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Hierarchical name hashing for MNS nodes
//!
//! Implements the ENS-compatible namehash algorithm used by the MNS registry:
//! labels are UTS-46 normalized and folded right to left into a 32-byte node
//! identifier. Also implements the bracket-escape syntax (`[` + 64 hex digits
//! + `]`) that stands in for a label whose plaintext is unknown.

use sha3::{Digest, Keccak256};

/// Errors produced by name hashing and labelhash formatting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// The UTS-46 normalization profile rejected the input.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
    /// Malformed bracket-encoded labelhash, or a wrong-length hash input.
    #[error("{0}")]
    Format(String),
}

/// Length of a bracket-encoded labelhash: `[` + 64 hex digits + `]`.
const ENCODED_LABELHASH_LEN: usize = 66;

pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Normalize a dotted name with the UTS-46 profile the MNS contracts were
/// populated with: non-transitional, STD3 ASCII rules, no DNS length
/// verification.
///
/// The empty string passes through unchanged. Names normalized with any other
/// profile will hash to nodes that do not match on-chain state.
pub fn normalize(name: &str) -> Result<String, NameError> {
    if name.is_empty() {
        return Ok(String::new());
    }
    idna::Config::default()
        .use_std3_ascii_rules(true)
        .transitional_processing(false)
        .verify_dns_length(false)
        .to_ascii(name)
        .map_err(|e| NameError::InvalidName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

/// Compute the 32-byte node identifier for a dotted name.
///
/// The empty name yields the root node (32 zero bytes). Labels are folded
/// right to left, so the top-level label combines with the root first:
/// `node = keccak256(node || keccak256(label))`.
///
/// Returns a `0x`-prefixed lowercase hex string of 64 digits.
pub fn namehash(name: &str) -> Result<String, NameError> {
    let mut node = [0u8; 32];
    let normalized = normalize(name)?;
    if !normalized.is_empty() {
        // Empty labels (doubled or leading dots) are hashed like any other
        // label; the normalization profile admits them.
        for label in normalized.split('.').rev() {
            let label_hash = keccak256(label.as_bytes());
            let mut data = [0u8; 64];
            data[..32].copy_from_slice(&node);
            data[32..].copy_from_slice(&label_hash);
            node = keccak256(&data);
        }
    }
    Ok(format!("0x{}", hex::encode(node)))
}

/// Hash a single label, honoring the bracket-escape syntax.
///
/// A syntactically well-formed bracket-encoded labelhash is decoded directly
/// and takes priority, regardless of its plausibility as a real label.
/// Anything else is normalized and hashed with keccak256.
pub fn labelhash(label_or_encoded: &str) -> Result<String, NameError> {
    if is_encoded_labelhash(label_or_encoded) {
        return decode_labelhash(label_or_encoded);
    }
    let label = normalize(label_or_encoded)?;
    Ok(format!("0x{}", hex::encode(keccak256(label.as_bytes()))))
}

/// Format a 32-byte hash as its bracket-escaped textual form.
///
/// Accepts the hash with or without a `0x` prefix; fails unless exactly 64
/// hex digits remain. The output always has length 66.
pub fn encode_labelhash(hash: &str) -> Result<String, NameError> {
    let digits = hash.strip_prefix("0x").unwrap_or(hash);
    if digits.len() != 64 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(NameError::Format(format!(
            "expected a 32-byte label hash of 64 hex digits, got {hash:?}"
        )));
    }
    Ok(format!("[{digits}]"))
}

/// Decode a bracket-escaped labelhash back to its `0x`-prefixed hex form.
pub fn decode_labelhash(encoded: &str) -> Result<String, NameError> {
    if !(encoded.starts_with('[') && encoded.ends_with(']')) {
        return Err(NameError::Format(format!(
            "expected encoded labelhash to start and end with square brackets, got {encoded:?}"
        )));
    }
    if encoded.len() != ENCODED_LABELHASH_LEN {
        return Err(NameError::Format(format!(
            "expected encoded labelhash of length {ENCODED_LABELHASH_LEN}, got {}",
            encoded.len()
        )));
    }
    Ok(format!("0x{}", &encoded[1..ENCODED_LABELHASH_LEN - 1]))
}

/// True iff `s` is syntactically a bracket-encoded labelhash.
pub fn is_encoded_labelhash(s: &str) -> bool {
    s.len() == ENCODED_LABELHASH_LEN && s.starts_with('[') && s.ends_with(']')
}

/// True iff every label of the name is plaintext, i.e. none is a
/// bracket-encoded labelhash placeholder.
pub fn is_decrypted(name: &str) -> bool {
    name.split('.').all(|label| !is_encoded_labelhash(label))
}
