// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! mnslib - Metrix Name Service client
//!
//! A client library for the Metrix Name Service: hierarchical name hashing,
//! resolver and registrar contract wrappers, and providers that reach the
//! chain through the public explorer or a wallet daemon.

pub mod abi;
pub mod address;
pub mod constants;
pub mod content;
pub mod contract;
pub mod error;
pub mod mns;
pub mod namehash;
pub mod provider;
pub mod registrar;
pub mod resolver;

pub use constants::{deployment, Deployment, Network};
pub use contract::{MetrixContract, PendingTransaction};
pub use error::{Error, Result};
pub use mns::{Name, Resolver, MNS};
pub use provider::{ApiProvider, Provider, RpcProvider, SendParams};

// Name hashing is the piece most callers want without the rest of the stack.
pub use namehash::{
    encode_labelhash, is_decrypted, is_encoded_labelhash, labelhash, namehash, normalize,
};
