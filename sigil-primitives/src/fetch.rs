//! On-demand element access.
//!
//! A commission-schedule amendment can carry dozens of steps and an entity
//! up to [`crate::types::MAX_ENTITY_NODES`] node identifiers. Instead of
//! materializing them, each accessor re-parses the original slice,
//! navigates to the owning array, advances to the requested element and
//! decodes just that one. The cost is a bounded re-scan per access; the
//! payoff is a parsed representation of constant size.

use sigil_codec::minicbor::Decoder;
use sigil_codec::{read, Error};
use sigil_crypto::PublicKey;

use crate::types::{read_public_key, Body, BoundStep, Entity, Quantity, RateStep, Tx};

impl<'b> Tx<'b> {
    /// Decodes the `index`-th rate step of an amendment.
    pub fn rate_at(&self, index: usize) -> Result<RateStep, Error> {
        let rates_len = match self.body {
            Body::AmendCommissionSchedule { rates_len, .. } => rates_len,
            _ => return Err(Error::UnexpectedType),
        };
        if index >= rates_len {
            return Err(Error::NoData);
        }

        let mut d = step_array(self, "rates", index)?;
        read_rate(&mut d)
    }

    /// Decodes the `index`-th bound step of an amendment.
    pub fn bound_at(&self, index: usize) -> Result<BoundStep, Error> {
        let bounds_len = match self.body {
            Body::AmendCommissionSchedule { bounds_len, .. } => bounds_len,
            _ => return Err(Error::UnexpectedType),
        };
        if index >= bounds_len {
            return Err(Error::NoData);
        }

        let mut d = step_array(self, "bounds", index)?;
        read_bound(&mut d)
    }
}

impl<'b> Entity<'b> {
    /// Decodes the `index`-th node identifier.
    pub fn node_at(&self, index: usize) -> Result<PublicKey, Error> {
        if index >= self.nodes_len {
            return Err(Error::NoData);
        }

        let root = Decoder::new(self.raw);
        let mut d = read::find_value(&root, "nodes")?.ok_or(Error::UnexpectedField)?;

        read::array_len(&mut d)?;
        for _ in 0..index {
            d.skip()?;
        }

        read_public_key(&mut d)
    }
}

/// Positions a decoder at the `index`-th element of the named amendment
/// step array.
fn step_array<'b>(tx: &Tx<'b>, key: &str, index: usize) -> Result<Decoder<'b>, Error> {
    let root = Decoder::new(tx.raw);
    let body = read::find_value(&root, "body")?.ok_or(Error::UnexpectedField)?;
    let amendment = read::find_value(&body, "amendment")?.ok_or(Error::UnexpectedField)?;
    let mut d = read::find_value(&amendment, key)?.ok_or(Error::UnexpectedField)?;

    read::array_len(&mut d)?;
    for _ in 0..index {
        d.skip()?;
    }

    Ok(d)
}

fn read_rate(d: &mut Decoder) -> Result<RateStep, Error> {
    if read::map_len(d)? != 2 {
        return Err(Error::UnexpectedNumberItems);
    }

    read::expect_key(d, "rate")?;
    let rate = Quantity::decode(d)?;

    read::expect_key(d, "start")?;
    let start = read::u64_value(d)?;

    Ok(RateStep { start, rate })
}

fn read_bound(d: &mut Decoder) -> Result<BoundStep, Error> {
    if read::map_len(d)? != 3 {
        return Err(Error::UnexpectedNumberItems);
    }

    read::expect_key(d, "start")?;
    let start = read::u64_value(d)?;

    read::expect_key(d, "rate_max")?;
    let rate_max = Quantity::decode(d)?;

    read::expect_key(d, "rate_min")?;
    let rate_min = Quantity::decode(d)?;

    Ok(BoundStep {
        start,
        rate_min,
        rate_max,
    })
}
