// Copyright 2025 mnslib Contributors
// Licensed under GPL-3.0

//! Registrar contract wrappers
//!
//! Registration of `.mrx` names runs through three contracts: the ERC-721
//! base registrar that owns the top-level node and mints name tokens
//! ([`MrxRegistrar`]), the commit/reveal controller the public registers
//! through ([`MrxRegistrarController`]), and the reverse registrar that
//! manages `addr.reverse` claims ([`ReverseRegistrar`]).

mod controller;
mod mrx;
mod reverse;

pub use controller::MrxRegistrarController;
pub use mrx::MrxRegistrar;
pub use reverse::ReverseRegistrar;
