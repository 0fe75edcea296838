//! Ed25519 key material and SLIP-0010 derivation.
//!
//! The signer never sees the device seed at rest; it receives it from the
//! host boundary, derives the key on the fixed BIP44 path and scrubs every
//! intermediate buffer. Secret keys erase themselves on drop and keep an
//! opaque `Debug` outside of tests.

use std::fmt;

use cryptoxide::ed25519;
use cryptoxide::hmac::Hmac;
use cryptoxide::mac::Mac;
use cryptoxide::sha2::Sha512;

use sigil_codec::Error;

use crate::scrub::Scrubbed as _;

const HARDENED: u32 = 0x8000_0000;

/// SLIP-0010 master key salt for the Ed25519 curve.
const CURVE_SEED_KEY: &[u8] = b"ed25519 seed";

/// A fixed-depth BIP44 derivation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bip44Path(pub [u32; 5]);

/// The coin path: m/44'/474'/0'/0'/0', Ed25519.
pub const COIN_PATH: Bip44Path = Bip44Path([
    44 | HARDENED,
    474 | HARDENED,
    HARDENED,
    HARDENED,
    HARDENED,
]);

/// Ed25519 secret key in seed form, scrubbed on drop.
pub struct SecretKey([u8; Self::SIZE]);

/// Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; Self::SIZE]);

/// Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; Self::SIZE]);

impl SecretKey {
    pub const SIZE: usize = 32;

    /// The public half, computed through the keypair expansion; the
    /// expanded secret component is scrubbed before returning.
    pub fn public_key(&self) -> PublicKey {
        let (mut kp, pk) = ed25519::keypair(&self.0);
        kp.scrub();
        PublicKey(pk)
    }

    /// Signs `msg` and scrubs the expanded keypair on the way out.
    pub fn sign(&self, msg: &[u8]) -> Signature {
        let (mut kp, _) = ed25519::keypair(&self.0);
        let sig = ed25519::signature(msg, &kp);
        kp.scrub();
        Signature(sig)
    }
}

impl PublicKey {
    pub const SIZE: usize = 32;

    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }

    pub fn verify(&self, msg: &[u8], sig: &Signature) -> bool {
        ed25519::verify(msg, &self.0, &sig.0)
    }
}

impl Signature {
    pub const SIZE: usize = 64;
}

/// Derives the Ed25519 secret key for `path` from the device seed,
/// following SLIP-0010. Every path component must be hardened; the Ed25519
/// curve admits no public derivation.
pub fn derive_key(seed: &[u8], path: &Bip44Path) -> Result<SecretKey, Error> {
    derive_path(seed, &path.0)
}

fn derive_path(seed: &[u8], indexes: &[u32]) -> Result<SecretKey, Error> {
    if seed.is_empty() {
        return Err(Error::InternalCryptoError);
    }

    let mut node = hmac_sha512(CURVE_SEED_KEY, seed);

    for &index in indexes {
        if index & HARDENED == 0 {
            node.scrub();
            return Err(Error::InternalCryptoError);
        }

        let mut data = [0u8; 37];
        data[1..33].copy_from_slice(&node[..32]);
        data[33..].copy_from_slice(&index.to_be_bytes());

        let next = hmac_sha512(&node[32..], &data);
        node.scrub();
        data.scrub();
        node = next;
    }

    let mut sk = [0u8; SecretKey::SIZE];
    sk.copy_from_slice(&node[..32]);
    node.scrub();

    Ok(SecretKey(sk))
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = Hmac::new(Sha512::new(), key);
    mac.input(data);
    let mut out = [0u8; 64];
    mac.raw_result(&mut out);
    out
}

/* Drop ******************************************************************** */

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.scrub()
    }
}

/* Format ****************************************************************** */

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey<Ed25519>")
            .field(&hex::encode(self.0))
            .finish()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature<Ed25519>")
            .field(&hex::encode(self.0))
            .finish()
    }
}

#[cfg(test)]
impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretKey<Ed25519>")
            .field(&hex::encode(self.0))
            .finish()
    }
}

#[cfg(not(test))]
impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey<Ed25519>").finish_non_exhaustive()
    }
}

/* AsRef / Conversion ****************************************************** */

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; Self::SIZE]> for PublicKey {
    fn from(bytes: [u8; Self::SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<[u8; Self::SIZE]> for SecretKey {
    fn from(bytes: [u8; Self::SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<[u8; Self::SIZE]> for Signature {
    fn from(bytes: [u8; Self::SIZE]) -> Self {
        Self(bytes)
    }
}

impl<'a> TryFrom<&'a [u8]> for PublicKey {
    type Error = Error;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; Self::SIZE] = value.try_into().map_err(|_| Error::UnexpectedValue)?;
        Ok(Self(bytes))
    }
}
