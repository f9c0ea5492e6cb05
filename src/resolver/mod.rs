// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Resolver contract wrappers
//!
//! Resolver capabilities are modeled as small traits ([`profiles`]), one per
//! record family, with default implementations over a contract handle. A
//! concrete resolver advertises which profiles it supports via ERC-165 and
//! picks up the matching traits.

pub mod profiles;

mod public;
mod reverse;

pub use public::PublicResolver;
pub use reverse::DefaultReverseResolver;
