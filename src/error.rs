// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Crate-level error type

use crate::abi::AbiError;
use crate::address::AddressError;
use crate::content::ContentError;
use crate::namehash::NameError;
use crate::provider::ProviderError;

/// The error type returned by the high-level MNS surface. Lower layers keep
/// their own error enums; this folds them together for callers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Name(#[from] NameError),
    #[error(transparent)]
    Abi(#[from] AbiError),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// A contract call returned data of an unexpected shape.
    #[error("contract returned unexpected data, wanted {expected}")]
    UnexpectedReturn { expected: &'static str },
    /// The name has no resolver set, so record operations cannot proceed.
    #[error("no resolver set for {0:?}")]
    NoResolver(String),
    /// A required argument was empty or missing.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
