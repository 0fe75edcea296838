//! Domain-separated signing.
//!
//! The signed payload is `SHA-512(context ‖ message)` where `message` is
//! the exact byte slice the decoder consumed. Byte-identical round-tripping
//! of that slice is what makes the signature valid on-chain.

use cryptoxide::digest::Digest as _;
use cryptoxide::sha2::Sha512;

use crate::key::{PublicKey, SecretKey, Signature};

/// SHA-512 over the concatenation of context and message.
pub fn domain_digest(context: &[u8], message: &[u8]) -> [u8; 64] {
    let mut h = Sha512::new();
    h.input(context);
    h.input(message);

    let mut digest = [0u8; 64];
    h.result(&mut digest);
    digest
}

/// Signs `message` under `context` with the given key.
pub fn sign_message(sk: &SecretKey, context: &[u8], message: &[u8]) -> Signature {
    sk.sign(&domain_digest(context, message))
}

/// Verifies a signature produced by [`sign_message`].
pub fn verify_message(pk: &PublicKey, context: &[u8], message: &[u8], sig: &Signature) -> bool {
    pk.verify(&domain_digest(context, message), sig)
}
