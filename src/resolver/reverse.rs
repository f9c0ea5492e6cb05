// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! The default reverse resolver

use std::sync::Arc;

use crate::constants::deployment;
use crate::contract::MetrixContract;
use crate::provider::Provider;
use crate::resolver::profiles::{Erc165, NameResolver};

/// The resolver the reverse registrar wires up for claimed `addr.reverse`
/// nodes. It only answers name queries.
#[derive(Debug, Clone)]
pub struct DefaultReverseResolver {
    contract: MetrixContract,
}

impl DefaultReverseResolver {
    /// The deployed default reverse resolver for the provider's network.
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        let address = deployment(provider.network()).default_reverse_resolver;
        Self::at(address, provider)
    }

    /// A reverse resolver at an explicit address.
    pub fn at(address: &str, provider: Arc<dyn Provider>) -> Self {
        Self {
            contract: MetrixContract::new(address, provider),
        }
    }

    pub fn address(&self) -> &str {
        self.contract.address()
    }
}

impl Erc165 for DefaultReverseResolver {
    fn contract(&self) -> &MetrixContract {
        &self.contract
    }
}

impl NameResolver for DefaultReverseResolver {}
