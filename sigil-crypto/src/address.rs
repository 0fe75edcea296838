//! Bech32 address formatting.

use bech32::{ToBase32, Variant};

use sigil_codec::Error;

use crate::key::PublicKey;

/// Human-readable part of the account address encoding.
pub const COIN_HRP: &str = "oasis";

/// Encodes the 32-byte public key as a Bech32 account address.
pub fn encode_address(pk: &PublicKey) -> Result<String, Error> {
    bech32::encode(COIN_HRP, pk.as_ref().to_base32(), Variant::Bech32)
        .map_err(|_| Error::InternalCryptoError)
}
