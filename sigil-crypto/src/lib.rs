//! Cryptographic primitives for the Oasis transaction signer
//!
//! Everything here wraps synchronous `cryptoxide` calls: SLIP-0010 key
//! derivation from the device seed, Ed25519 over the domain-separated
//! SHA-512 digest, and Bech32 address formatting. Key material is scrubbed
//! on every exit path.

pub mod address;
pub mod key;
pub mod scrub;
pub mod sign;

pub use address::{encode_address, COIN_HRP};
pub use key::{derive_key, Bip44Path, PublicKey, SecretKey, Signature, COIN_PATH};
pub use sign::{domain_digest, sign_message, verify_message};
