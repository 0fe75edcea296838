//! Consensus-layer message primitives for the Oasis signer
//!
//! The decoder in this crate turns a canonically-encoded transaction or
//! entity descriptor into a [`types::ParsedMessage`] that borrows the
//! input slice. Commission-schedule steps and entity node lists are never
//! materialized: the decoder records lengths only, and the fetchers in
//! [`fetch`] re-parse one element at a time from the original bytes.

/// Signing-domain context store and validation
pub mod context;

/// Schema decoding of transactions and entity descriptors
pub mod decode;

/// On-demand element access for amendment steps and node lists
pub mod fetch;

/// The parsed data model
pub mod types;

pub use context::{SigningContext, CONTEXT_PREFIX_ENTITY, CONTEXT_PREFIX_TX, MAX_CONTEXT_SIZE};
pub use types::{
    Body, BoundStep, Entity, EpochTime, Fee, Method, ParsedMessage, Quantity, RateStep, Tx,
    MAX_AMENDMENT_BOUNDS, MAX_AMENDMENT_RATES, MAX_ENTITY_NODES,
};
