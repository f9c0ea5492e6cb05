// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! EIP-1577 contenthash coding
//!
//! Resolver `contenthash` records hold multicodec-prefixed content
//! identifiers. This module covers the protocols the public resolver
//! ecosystem uses: ipfs, ipns, swarm, onion and onion3.

use std::fmt;

/// Errors from contenthash coding.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),
    #[error("unsupported content URL {0:?}")]
    UnsupportedUrl(String),
    #[error("unsupported or malformed contenthash {0:?}")]
    UnsupportedCodec(String),
    #[error("{0} content has the wrong length")]
    BadLength(&'static str),
}

/// Content protocols representable in a contenthash record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentProtocol {
    Ipfs,
    Ipns,
    Swarm,
    Onion,
    Onion3,
}

impl ContentProtocol {
    /// URL scheme for the protocol (`bzz` for swarm).
    pub fn scheme(self) -> &'static str {
        match self {
            ContentProtocol::Ipfs => "ipfs",
            ContentProtocol::Ipns => "ipns",
            ContentProtocol::Swarm => "bzz",
            ContentProtocol::Onion => "onion",
            ContentProtocol::Onion3 => "onion3",
        }
    }
}

impl fmt::Display for ContentProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// A decoded contenthash record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedContent {
    pub protocol: ContentProtocol,
    /// Human-readable content reference: a base58 CID for ipfs, a name for
    /// ipns, hex for swarm, the service id for onion.
    pub value: String,
}

impl DecodedContent {
    /// The `scheme://value` URL form.
    pub fn to_url(&self) -> String {
        format!("{}://{}", self.protocol.scheme(), self.value)
    }
}

// Multicodec prefixes: varint codec id, then (for content-addressed
// protocols) CID version and content type.
const IPFS_PREFIX: &[u8] = &[0xe3, 0x01, 0x01, 0x70];
const IPNS_PREFIX: &[u8] = &[0xe5, 0x01, 0x01, 0x72];
const SWARM_PREFIX: &[u8] = &[0xe4, 0x01, 0x01, 0xfa, 0x01, 0x1b, 0x20];
const ONION_PREFIX: &[u8] = &[0xbc, 0x03];
const ONION3_PREFIX: &[u8] = &[0xbd, 0x03];

fn split_url(text: &str) -> Option<(&str, &str)> {
    if let Some((scheme, rest)) = text.split_once("://") {
        return Some((scheme, rest));
    }
    if let Some(rest) = text.strip_prefix("/ipfs/") {
        return Some(("ipfs", rest));
    }
    if let Some(rest) = text.strip_prefix("/ipns/") {
        return Some(("ipns", rest));
    }
    None
}

/// Encode a content URL into a `0x`-prefixed contenthash.
///
/// Accepts `ipfs://`, `ipns://`, `bzz://`, `onion://` and `onion3://` URLs,
/// plus the `/ipfs/…` and `/ipns/…` path forms.
pub fn encode_contenthash(text: &str) -> Result<String, ContentError> {
    let (scheme, content) =
        split_url(text).ok_or_else(|| ContentError::UnsupportedUrl(text.to_string()))?;
    let bytes = match scheme {
        "ipfs" => {
            if content.len() < 4 {
                return Err(ContentError::BadLength("ipfs"));
            }
            let multihash = bs58::decode(content).into_vec()?;
            [IPFS_PREFIX, multihash.as_slice()].concat()
        }
        "ipns" => {
            // The name is wrapped in an identity multihash.
            let name = content.as_bytes();
            if name.is_empty() || name.len() > 127 {
                return Err(ContentError::BadLength("ipns"));
            }
            let mut bytes = IPNS_PREFIX.to_vec();
            bytes.push(0x00);
            bytes.push(name.len() as u8);
            bytes.extend_from_slice(name);
            bytes
        }
        "bzz" => {
            let raw = hex::decode(content.strip_prefix("0x").unwrap_or(content))?;
            if raw.len() != 32 {
                return Err(ContentError::BadLength("swarm"));
            }
            [SWARM_PREFIX, raw.as_slice()].concat()
        }
        "onion" => {
            if content.len() != 16 {
                return Err(ContentError::BadLength("onion"));
            }
            [ONION_PREFIX, content.as_bytes()].concat()
        }
        "onion3" => {
            if content.len() != 56 {
                return Err(ContentError::BadLength("onion3"));
            }
            [ONION3_PREFIX, content.as_bytes()].concat()
        }
        _ => return Err(ContentError::UnsupportedUrl(text.to_string())),
    };
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// Decode a `0x`-prefixed contenthash record into its protocol and value.
pub fn decode_contenthash(encoded: &str) -> Result<DecodedContent, ContentError> {
    let raw = hex::decode(encoded.strip_prefix("0x").unwrap_or(encoded))?;
    if let Some(rest) = raw.strip_prefix(IPFS_PREFIX) {
        return Ok(DecodedContent {
            protocol: ContentProtocol::Ipfs,
            value: bs58::encode(rest).into_string(),
        });
    }
    if let Some(rest) = raw.strip_prefix(IPNS_PREFIX) {
        if rest.len() < 2 || rest[0] != 0x00 || rest[1] as usize != rest.len() - 2 {
            return Err(ContentError::UnsupportedCodec(encoded.to_string()));
        }
        let value = String::from_utf8(rest[2..].to_vec())
            .map_err(|_| ContentError::UnsupportedCodec(encoded.to_string()))?;
        return Ok(DecodedContent {
            protocol: ContentProtocol::Ipns,
            value,
        });
    }
    if let Some(rest) = raw.strip_prefix(SWARM_PREFIX) {
        return Ok(DecodedContent {
            protocol: ContentProtocol::Swarm,
            value: hex::encode(rest),
        });
    }
    if let Some(rest) = raw.strip_prefix(ONION_PREFIX) {
        let value = String::from_utf8(rest.to_vec())
            .map_err(|_| ContentError::UnsupportedCodec(encoded.to_string()))?;
        return Ok(DecodedContent {
            protocol: ContentProtocol::Onion,
            value,
        });
    }
    if let Some(rest) = raw.strip_prefix(ONION3_PREFIX) {
        let value = String::from_utf8(rest.to_vec())
            .map_err(|_| ContentError::UnsupportedCodec(encoded.to_string()))?;
        return Ok(DecodedContent {
            protocol: ContentProtocol::Onion3,
            value,
        });
    }
    Err(ContentError::UnsupportedCodec(encoded.to_string()))
}
