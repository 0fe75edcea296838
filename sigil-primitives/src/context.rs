//! Signing-domain context.
//!
//! The context is set once per session by a host command and binds every
//! signature to a chain and purpose. It is the only long-lived mutable
//! state in the core: a bounded buffer of printable ASCII, scrubbed before
//! every replacement and on drop.

use sigil_codec::Error;
use sigil_crypto::scrub::Scrubbed as _;

use crate::types::{Method, ParsedMessage};

/// Upper bound on the stored context, including the domain prefix.
pub const MAX_CONTEXT_SIZE: usize = 128;

/// Domain prefix required on consensus transactions.
pub const CONTEXT_PREFIX_TX: &str = "oasis-core/consensus: tx for chain ";

/// Domain prefix required on entity descriptors.
pub const CONTEXT_PREFIX_ENTITY: &str = "oasis-core/registry: register entity";

/// Owned context store. Explicitly passed into every operation that needs
/// it, never ambient.
#[derive(Clone)]
pub struct SigningContext {
    buf: [u8; MAX_CONTEXT_SIZE],
    len: usize,
}

impl SigningContext {
    /// An empty context; signing against it fails the prefix check.
    pub fn new() -> Self {
        SigningContext {
            buf: [0; MAX_CONTEXT_SIZE],
            len: 0,
        }
    }

    /// Replaces the stored context.
    ///
    /// The previous value is scrubbed before any check runs, so a rejected
    /// candidate leaves the store empty and its bytes never land in the
    /// buffer. Accepted bytes must be printable ASCII (32..=127).
    pub fn set(&mut self, new: &[u8]) -> Result<(), Error> {
        self.buf.scrub();
        self.len = 0;

        if new.len() > MAX_CONTEXT_SIZE {
            return Err(Error::ContextUnexpectedSize);
        }
        if new.iter().any(|b| *b < 32 || *b > 127) {
            return Err(Error::ContextInvalidChars);
        }

        self.buf[..new.len()].copy_from_slice(new);
        self.len = new.len();
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Checks that the stored context carries the domain prefix expected
    /// for this message.
    pub fn validate(&self, msg: &ParsedMessage<'_>) -> Result<(), Error> {
        let prefix = expected_prefix(msg)?;
        if self.as_bytes().starts_with(prefix.as_bytes()) {
            Ok(())
        } else {
            Err(Error::ContextMismatch)
        }
    }

    /// The context after the expected prefix, i.e. the chain identifier
    /// the user reviews. When the prefix does not match, the whole context is
    /// returned so the user can see what was rejected.
    pub fn suffix(&self, msg: &ParsedMessage<'_>) -> &[u8] {
        match expected_prefix(msg) {
            Ok(prefix) if self.as_bytes().starts_with(prefix.as_bytes()) => {
                &self.as_bytes()[prefix.len()..]
            }
            _ => self.as_bytes(),
        }
    }
}

fn expected_prefix(msg: &ParsedMessage<'_>) -> Result<&'static str, Error> {
    match msg {
        ParsedMessage::Transaction(tx) => match tx.method {
            Method::Unknown => Err(Error::ContextUnknownPrefix),
            _ => Ok(CONTEXT_PREFIX_TX),
        },
        ParsedMessage::Entity(_) => Ok(CONTEXT_PREFIX_ENTITY),
    }
}

impl Default for SigningContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SigningContext {
    fn drop(&mut self) {
        self.buf.scrub();
        self.len = 0;
    }
}
