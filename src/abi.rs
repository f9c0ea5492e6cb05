// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Typed contract call construction
//!
//! Builds EVM calldata from a human-readable method signature and a list of
//! `ethabi` tokens, and decodes returned data against declared output types.
//! Arguments are type-checked against the parsed signature before encoding,
//! so a mismatched call fails locally instead of reverting on chain.

use ethabi::param_type::Reader;
use ethabi::{ParamType, Token};

/// Errors from signature parsing, argument checking and ABI coding.
#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    #[error("malformed method signature {0:?}")]
    BadSignature(String),
    #[error("{sig}: expected {expected} arguments, got {got}")]
    ArgumentCount {
        sig: String,
        expected: usize,
        got: usize,
    },
    #[error("{sig}: argument {index} does not match the declared type")]
    ArgumentType { sig: String, index: usize },
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("value is not a valid {0}")]
    BadValue(&'static str),
    #[error(transparent)]
    Codec(#[from] ethabi::Error),
}

/// Parse a signature like `setOwner(bytes32, address)` into its method name
/// and parameter types. Whitespace around parameters is tolerated; parameter
/// types must be canonical (`uint256`, not `uint`).
pub fn parse_signature(sig: &str) -> Result<(String, Vec<ParamType>), AbiError> {
    let (name, rest) = sig
        .split_once('(')
        .ok_or_else(|| AbiError::BadSignature(sig.to_string()))?;
    let inner = rest
        .strip_suffix(')')
        .ok_or_else(|| AbiError::BadSignature(sig.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AbiError::BadSignature(sig.to_string()));
    }
    let mut params = Vec::new();
    if !inner.trim().is_empty() {
        for part in inner.split(',') {
            let part = part.trim();
            let ty = Reader::read(part).map_err(|_| AbiError::BadSignature(sig.to_string()))?;
            // Reader is lenient about unknown identifiers. Only canonical
            // type names hash to the right selector, so anything that does
            // not round-trip is rejected.
            if ty.to_string() != part {
                return Err(AbiError::BadSignature(sig.to_string()));
            }
            params.push(ty);
        }
    }
    Ok((name.to_string(), params))
}

/// Compute the 4-byte selector for a method signature.
pub fn selector(sig: &str) -> Result<[u8; 4], AbiError> {
    let (name, params) = parse_signature(sig)?;
    Ok(ethabi::short_signature(&name, &params))
}

/// A fully-typed contract method invocation: signature, argument tokens and
/// the expected return types.
#[derive(Debug, Clone)]
pub struct ContractCall {
    signature: String,
    args: Vec<Token>,
    outputs: Vec<ParamType>,
}

impl ContractCall {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            args: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Append an argument token.
    pub fn arg(mut self, token: Token) -> Self {
        self.args.push(token);
        self
    }

    /// Declare an expected output type.
    pub fn output(mut self, ty: ParamType) -> Self {
        self.outputs.push(ty);
        self
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn outputs(&self) -> &[ParamType] {
        &self.outputs
    }

    /// Encode selector and arguments into calldata, after checking every
    /// token against the declared parameter types.
    pub fn encode(&self) -> Result<Vec<u8>, AbiError> {
        let (name, params) = parse_signature(&self.signature)?;
        if params.len() != self.args.len() {
            return Err(AbiError::ArgumentCount {
                sig: self.signature.clone(),
                expected: params.len(),
                got: self.args.len(),
            });
        }
        for (index, (token, param)) in self.args.iter().zip(&params).enumerate() {
            if !token.type_check(param) {
                return Err(AbiError::ArgumentType {
                    sig: self.signature.clone(),
                    index,
                });
            }
        }
        let mut data = ethabi::short_signature(&name, &params).to_vec();
        data.extend(ethabi::encode(&self.args));
        Ok(data)
    }

    /// Decode returned data against the declared output types.
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        Ok(ethabi::decode(&self.outputs, data)?)
    }
}

// Token constructors for the value shapes MNS methods use.

/// A `bytes32` token from a 64-hex-digit string (`0x` prefix optional).
pub fn bytes32(hash: &str) -> Result<Token, AbiError> {
    let raw = hex::decode(hash.strip_prefix("0x").unwrap_or(hash))?;
    if raw.len() != 32 {
        return Err(AbiError::BadValue("bytes32"));
    }
    Ok(Token::FixedBytes(raw))
}

/// A `bytes4` token, used for interface identifiers.
pub fn bytes4(id: [u8; 4]) -> Token {
    Token::FixedBytes(id.to_vec())
}

/// An `address` token from a 40-hex-digit string (`0x` prefix optional).
pub fn address(addr: &str) -> Result<Token, AbiError> {
    let raw = hex::decode(addr.strip_prefix("0x").unwrap_or(addr))?;
    if raw.len() != 20 {
        return Err(AbiError::BadValue("address"));
    }
    Ok(Token::Address(ethabi::Address::from_slice(&raw)))
}

/// A `uint256` token.
pub fn uint(value: impl Into<ethabi::Uint>) -> Token {
    Token::Uint(value.into())
}

/// A `string` token.
pub fn string(value: impl Into<String>) -> Token {
    Token::String(value.into())
}

/// A `bytes` token.
pub fn bytes(value: Vec<u8>) -> Token {
    Token::Bytes(value)
}

// Extractors for single-value returns.

/// The first returned token as a `0x`-prefixed address.
pub fn as_address(tokens: &[Token]) -> Option<String> {
    match tokens.first()? {
        Token::Address(a) => Some(format!("0x{}", hex::encode(a.as_bytes()))),
        _ => None,
    }
}

/// The first returned token as a `0x`-prefixed 32-byte hash.
pub fn as_bytes32(tokens: &[Token]) -> Option<String> {
    match tokens.first()? {
        Token::FixedBytes(b) if b.len() == 32 => Some(format!("0x{}", hex::encode(b))),
        _ => None,
    }
}

/// The first returned token as a string.
pub fn as_string(tokens: &[Token]) -> Option<String> {
    match tokens.first()? {
        Token::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// The first returned token as a bool.
pub fn as_bool(tokens: &[Token]) -> Option<bool> {
    match tokens.first()? {
        Token::Bool(b) => Some(*b),
        _ => None,
    }
}

/// The first returned token as a uint.
pub fn as_uint(tokens: &[Token]) -> Option<ethabi::Uint> {
    match tokens.first()? {
        Token::Uint(u) => Some(*u),
        _ => None,
    }
}

/// The first returned token as dynamic bytes.
pub fn as_bytes(tokens: &[Token]) -> Option<Vec<u8>> {
    match tokens.first()? {
        Token::Bytes(b) => Some(b.clone()),
        _ => None,
    }
}
