//! Transaction-review and signing core for the Oasis consensus layer
//!
//! Sigil is the decoder/validator/renderer pipeline behind a hardware
//! signer: it accepts a canonically-encoded consensus transaction or
//! entity descriptor together with a signing-domain context, validates
//! both against a strict schema, renders every field as a paged key/value
//! row for on-screen review, and signs the exact input bytes once the
//! user approves.
//!
//! This crate only re-exports the member crates; start with
//! [`review::App`] for the host command surface or
//! [`review::ReviewSession`] for the row-by-row flow.

#[doc(inline)]
pub use sigil_codec as codec;

#[doc(inline)]
pub use sigil_crypto as crypto;

#[doc(inline)]
pub use sigil_primitives as primitives;

#[doc(inline)]
pub use sigil_review as review;
