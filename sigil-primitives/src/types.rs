//! The parsed message model.
//!
//! A [`ParsedMessage`] borrows the caller-owned input slice for the whole
//! review session; nothing here outlives those bytes. Variable-size
//! collections (amendment steps, entity nodes) are represented by their
//! declared lengths only.

use std::fmt;

use sigil_codec::minicbor::Decoder;
use sigil_codec::{read, Error};
use sigil_crypto::PublicKey;

/// Upper bound on entity node lists.
pub const MAX_ENTITY_NODES: usize = 16;

/// Upper bounds on commission-schedule amendments. Keeps the display row
/// count inside a `u8`: `1 + 2 + 1 + 2·32 + 3·32 < 256`.
pub const MAX_AMENDMENT_RATES: usize = 32;
pub const MAX_AMENDMENT_BOUNDS: usize = 32;

/// Epoch-based time point.
pub type EpochTime = u64;

/// Consensus transaction methods understood by the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Unknown,
    StakingTransfer,
    StakingBurn,
    StakingAddEscrow,
    StakingReclaimEscrow,
    StakingAmendCommissionSchedule,
    RegistryDeregisterEntity,
    RegistryUnfreezeNode,
}

impl Method {
    /// Maps the wire tag to a method; anything unrecognized is `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "staking.Transfer" => Method::StakingTransfer,
            "staking.Burn" => Method::StakingBurn,
            "staking.AddEscrow" => Method::StakingAddEscrow,
            "staking.ReclaimEscrow" => Method::StakingReclaimEscrow,
            "staking.AmendCommissionSchedule" => Method::StakingAmendCommissionSchedule,
            "registry.DeregisterEntity" => Method::RegistryDeregisterEntity,
            "registry.UnfreezeNode" => Method::RegistryUnfreezeNode,
            _ => Method::Unknown,
        }
    }

    /// Whether the method carries a `body` map. `DeregisterEntity` must
    /// not: a body on it is rejected rather than skipped.
    pub fn has_body(&self) -> bool {
        !matches!(self, Method::RegistryDeregisterEntity | Method::Unknown)
    }

    /// Display label for the review screen.
    pub fn label(&self) -> &'static str {
        match self {
            Method::Unknown => "Unknown",
            Method::StakingTransfer => "Transfer",
            Method::StakingBurn => "Burn",
            Method::StakingAddEscrow => "Add escrow",
            Method::StakingReclaimEscrow => "Reclaim escrow",
            Method::StakingAmendCommissionSchedule => "Amend commission schedule",
            Method::RegistryDeregisterEntity => "Deregister entity",
            Method::RegistryUnfreezeNode => "Unfreeze node",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unsigned arbitrary-precision integer, big-endian, at most 64 bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Quantity {
    buf: [u8; Self::MAX_LEN],
    len: usize,
}

impl Quantity {
    pub const MAX_LEN: usize = 64;

    /// Copies `raw` into the fixed buffer; longer inputs are rejected.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, Error> {
        if raw.len() > Self::MAX_LEN {
            return Err(Error::UnexpectedValue);
        }

        let mut q = Quantity {
            buf: [0; Self::MAX_LEN],
            len: raw.len(),
        };
        q.buf[..raw.len()].copy_from_slice(raw);
        Ok(q)
    }

    /// Reads a CBOR byte string into a quantity.
    pub fn decode(d: &mut Decoder) -> Result<Self, Error> {
        Self::from_bytes(read::bytes_value(d)?)
    }

    /// The big-endian payload as received. An empty slice means zero.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity(0x")?;
        for b in self.as_bytes() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// Reads a CBOR byte string that must hold exactly one public key.
pub fn read_public_key(d: &mut Decoder) -> Result<PublicKey, Error> {
    let raw = read::bytes_value(d)?;
    if raw.len() != PublicKey::SIZE {
        return Err(Error::UnexpectedValue);
    }
    PublicKey::try_from(raw)
}

/// Optional transaction fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fee {
    pub gas: u64,
    pub amount: Quantity,
}

/// One commission rate step of an amendment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateStep {
    pub start: EpochTime,
    pub rate: Quantity,
}

/// One commission bound step of an amendment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundStep {
    pub start: EpochTime,
    pub rate_min: Quantity,
    pub rate_max: Quantity,
}

/// Method-specific transaction body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    Transfer {
        to: PublicKey,
        tokens: Quantity,
    },
    Burn {
        tokens: Quantity,
    },
    AddEscrow {
        account: PublicKey,
        tokens: Quantity,
    },
    ReclaimEscrow {
        account: PublicKey,
        shares: Quantity,
    },
    /// Steps are fetched on demand from the input slice; only the declared
    /// array lengths are stored.
    AmendCommissionSchedule {
        rates_len: usize,
        bounds_len: usize,
    },
    DeregisterEntity,
    UnfreezeNode {
        node_id: PublicKey,
    },
}

/// A decoded consensus transaction, borrowing the input bytes.
#[derive(Debug, Clone, Copy)]
pub struct Tx<'b> {
    pub method: Method,
    pub fee: Option<Fee>,
    pub nonce: u64,
    pub body: Body,
    pub(crate) raw: &'b [u8],
}

/// A decoded entity descriptor, borrowing the input bytes. Node
/// identifiers are fetched on demand.
#[derive(Debug, Clone, Copy)]
pub struct Entity<'b> {
    pub id: PublicKey,
    pub nodes_len: usize,
    pub allow_entity_signed_nodes: bool,
    pub(crate) raw: &'b [u8],
}

/// Either kind of signable message.
#[derive(Debug, Clone, Copy)]
pub enum ParsedMessage<'b> {
    Transaction(Tx<'b>),
    Entity(Entity<'b>),
}

impl<'b> ParsedMessage<'b> {
    /// The exact byte slice the decoder consumed; this is what gets
    /// signed, unmodified.
    pub fn raw(&self) -> &'b [u8] {
        match self {
            ParsedMessage::Transaction(tx) => tx.raw,
            ParsedMessage::Entity(ent) => ent.raw,
        }
    }
}
