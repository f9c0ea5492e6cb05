// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Factory for names bound to one resolver

use std::sync::Arc;

use crate::contract::MetrixContract;
use crate::error::Result;
use crate::mns::Name;
use crate::provider::Provider;

/// A known resolver contract. Names created through it skip the registry's
/// resolver lookup on every record access.
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: MetrixContract,
    provider: Arc<dyn Provider>,
    address: String,
}

impl Resolver {
    pub(crate) fn new(
        registry: MetrixContract,
        provider: Arc<dyn Provider>,
        address: String,
    ) -> Self {
        Self {
            registry,
            provider,
            address,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// A name handle with records read and written through this resolver.
    pub fn name(&self, name: &str) -> Result<Name> {
        Name::new(
            name,
            self.registry.clone(),
            Arc::clone(&self.provider),
            Some(self.address.clone()),
        )
    }
}
