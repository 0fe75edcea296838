//! Review session state machine and host-facing operations.
//!
//! A [`ReviewSession`] borrows one payload for its whole life:
//! `Parsed → Validated → Signed | Rejected`. Only a validated session
//! signs, and what it signs is the exact slice the decoder consumed. The
//! [`App`] type is the thin command surface the transport layer drives;
//! it owns the signing-domain context and maps errors onto the wire
//! status codes.

use log::{debug, warn};

use sigil_codec::{canonical, Error};
use sigil_crypto::{
    derive_key, encode_address, sign_message, PublicKey, SecretKey, Signature, COIN_PATH,
};
use sigil_primitives::{decode, ParsedMessage, SigningContext};

use crate::items;

/// Lifecycle of a review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parsed,
    Validated,
    Signed,
    Rejected,
}

/// One message under review.
#[derive(Debug)]
pub struct ReviewSession<'a> {
    input: &'a [u8],
    msg: ParsedMessage<'a>,
    stage: Stage,
}

impl<'a> ReviewSession<'a> {
    /// Decodes `input` and opens a session on it.
    pub fn parse(input: &'a [u8]) -> Result<Self, Error> {
        if input.is_empty() {
            return Err(Error::InitContextEmpty);
        }

        let msg = decode::parse(input)?;
        debug!(
            "parsed {} ({} bytes)",
            match msg {
                ParsedMessage::Transaction(ref tx) => tx.method.label(),
                ParsedMessage::Entity(_) => "Entity",
            },
            input.len()
        );

        Ok(ReviewSession {
            input,
            msg,
            stage: Stage::Parsed,
        })
    }

    pub fn message(&self) -> &ParsedMessage<'a> {
        &self.msg
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn num_items(&self, ctx: &SigningContext) -> u8 {
        items::num_items(&self.msg, ctx)
    }

    pub fn get_item(
        &self,
        ctx: &SigningContext,
        display_idx: u8,
        page_idx: u8,
        out_key: &mut [u8],
        out_val: &mut [u8],
    ) -> Result<u8, Error> {
        items::get_item(&self.msg, ctx, display_idx, page_idx, out_key, out_val)
    }

    /// The full pre-approval check: canonical encoding, context prefix,
    /// and a render of every row. On failure the session is rejected and
    /// cannot sign.
    pub fn validate(&mut self, ctx: &SigningContext) -> Result<(), Error> {
        let run = |input: &[u8], msg: &ParsedMessage<'_>| -> Result<(), Error> {
            canonical::validate(input)?;
            ctx.validate(msg)?;
            items::validate_items(msg, ctx)
        };

        match run(self.input, &self.msg) {
            Ok(()) => {
                self.stage = Stage::Validated;
                Ok(())
            }
            Err(e) => {
                warn!("validation failed: {e}");
                self.stage = Stage::Rejected;
                Err(e)
            }
        }
    }

    /// Marks the session rejected; a rejected session never signs.
    pub fn reject(&mut self) {
        self.stage = Stage::Rejected;
    }

    /// Signs the original input slice under the stored context. Only a
    /// validated session may sign; anything else reports `NoData`.
    pub fn sign(&mut self, ctx: &SigningContext, sk: &SecretKey) -> Result<Signature, Error> {
        if self.stage != Stage::Validated {
            return Err(Error::NoData);
        }

        let sig = sign_message(sk, ctx.as_bytes(), self.input);
        self.stage = Stage::Signed;
        Ok(sig)
    }
}

/// Transport-visible response codes, ISO 7816 APDU status words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    WrongLength,
    DataInvalid,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 0x9000,
            Status::WrongLength => 0x6700,
            Status::DataInvalid => 0x6984,
        }
    }
}

/// The host command surface. Owns the signing-domain context; the device
/// seed stays with the caller and is passed per operation.
#[derive(Default)]
pub struct App {
    context: SigningContext,
}

impl App {
    pub fn new() -> Self {
        App {
            context: SigningContext::new(),
        }
    }

    pub fn context(&self) -> &SigningContext {
        &self.context
    }

    /// `SET_CONTEXT`: replaces the signing-domain context.
    pub fn set_context(&mut self, bytes: &[u8]) -> Status {
        match self.context.set(bytes) {
            Ok(()) => Status::Ok,
            Err(Error::ContextUnexpectedSize) => Status::WrongLength,
            Err(_) => Status::DataInvalid,
        }
    }

    /// `GET_ADDRESS`: the public key on the coin path and its Bech32
    /// account address.
    pub fn address(&self, seed: &[u8]) -> Result<(PublicKey, String), Error> {
        let sk = derive_key(seed, &COIN_PATH)?;
        let pk = sk.public_key();
        let addr = encode_address(&pk)?;
        Ok((pk, addr))
    }

    /// `SIGN`: parse, validate and sign `input` in one shot. Any failure
    /// maps to `DataInvalid` on the wire; the typed error is returned for
    /// the host log.
    pub fn sign(&self, seed: &[u8], input: &[u8]) -> Result<Signature, Error> {
        let mut session = ReviewSession::parse(input)?;
        session.validate(&self.context)?;

        let sk = derive_key(seed, &COIN_PATH)?;
        session.sign(&self.context, &sk)
    }
}
