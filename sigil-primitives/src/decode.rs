//! Schema decoding.
//!
//! The decoder discriminates entity descriptors from transactions by
//! probing the first map key, then reads exactly the permitted field
//! inventory. Transactions are decoded by locating each key in the outer
//! map (`method` first, since body dispatch depends on it); entities, fees
//! and bodies are small fixed maps and are read strictly in canonical key
//! order. Amendment step arrays and entity node lists contribute their
//! lengths only.
//!
//! Canonicality of the encoding itself is asserted by the separate
//! `sigil_codec::canonical` pass; both run before anything is displayed.

use sigil_codec::minicbor::data::Type;
use sigil_codec::minicbor::Decoder;
use sigil_codec::{read, Error};

use crate::types::{
    read_public_key, Body, Entity, Fee, Method, ParsedMessage, Quantity, Tx, MAX_AMENDMENT_BOUNDS,
    MAX_AMENDMENT_RATES, MAX_ENTITY_NODES,
};

/// Decodes a signable message from `input`.
///
/// On success the returned message borrows `input`; the same slice must
/// later be handed to the signer unmodified.
pub fn parse(input: &[u8]) -> Result<ParsedMessage<'_>, Error> {
    if input.is_empty() {
        return Err(Error::UnexpectedBufferEnd);
    }

    let mut d = Decoder::new(input);
    if d.datatype()? != Type::Map {
        return Err(Error::UnexpectedType);
    }

    let msg = if leads_with_id(&d)? {
        ParsedMessage::Entity(read_entity(input)?)
    } else {
        ParsedMessage::Transaction(read_tx(input)?)
    };

    // the root item must consume the buffer exactly
    d.skip()?;
    if d.position() != input.len() {
        return Err(Error::UnexpectedDataAtEnd);
    }

    Ok(msg)
}

/// Entity descriptors are the only messages whose first canonical key is
/// `id`; everything else is treated as a transaction.
fn leads_with_id(d: &Decoder) -> Result<bool, Error> {
    let mut p = d.clone();
    let entries = read::map_len(&mut p)?;

    if entries == 0 || p.datatype()? != Type::String {
        return Ok(false);
    }

    Ok(p.str()? == "id")
}

fn read_tx(input: &[u8]) -> Result<Tx<'_>, Error> {
    let root = Decoder::new(input);
    let declared = {
        let mut d = root.clone();
        read::map_len(&mut d)?
    };

    let method = match read::find_value(&root, "method")? {
        Some(mut at) => Method::from_tag(read::text_value(&mut at)?),
        None => return Err(Error::RequiredMethod),
    };
    if method == Method::Unknown {
        return Err(Error::UnexpectedMethod);
    }

    let fee = match read::find_value(&root, "fee")? {
        Some(mut at) => Some(read_fee(&mut at)?),
        None => None,
    };

    let nonce = match read::find_value(&root, "nonce")? {
        Some(mut at) => read::u64_value(&mut at)?,
        None => return Err(Error::RequiredNonce),
    };

    let body_at = read::find_value(&root, "body")?;
    let body = if method.has_body() {
        match body_at {
            Some(mut at) => read_body(method, &mut at)?,
            None => return Err(Error::UnexpectedField),
        }
    } else {
        if body_at.is_some() {
            return Err(Error::UnexpectedField);
        }
        Body::DeregisterEntity
    };

    // any key beyond the ones just decoded is an unknown field
    let decoded = 2 + u64::from(fee.is_some()) + u64::from(method.has_body());
    if declared != decoded {
        return Err(Error::UnexpectedNumberItems);
    }

    Ok(Tx {
        method,
        fee,
        nonce,
        body,
        raw: input,
    })
}

fn read_fee(d: &mut Decoder) -> Result<Fee, Error> {
    if read::map_len(d)? != 2 {
        return Err(Error::UnexpectedNumberItems);
    }

    read::expect_key(d, "gas")?;
    let gas = read::u64_value(d)?;

    read::expect_key(d, "amount")?;
    let amount = Quantity::decode(d)?;

    Ok(Fee { gas, amount })
}

fn read_body(method: Method, d: &mut Decoder) -> Result<Body, Error> {
    match method {
        Method::StakingTransfer => {
            if read::map_len(d)? != 2 {
                return Err(Error::UnexpectedNumberItems);
            }

            read::expect_key(d, "xfer_to")?;
            let to = read_public_key(d)?;

            read::expect_key(d, "xfer_tokens")?;
            let tokens = Quantity::decode(d)?;

            Ok(Body::Transfer { to, tokens })
        }
        Method::StakingBurn => {
            if read::map_len(d)? != 1 {
                return Err(Error::UnexpectedNumberItems);
            }

            read::expect_key(d, "burn_tokens")?;
            let tokens = Quantity::decode(d)?;

            Ok(Body::Burn { tokens })
        }
        Method::StakingAddEscrow => {
            if read::map_len(d)? != 2 {
                return Err(Error::UnexpectedNumberItems);
            }

            read::expect_key(d, "escrow_tokens")?;
            let tokens = Quantity::decode(d)?;

            read::expect_key(d, "escrow_account")?;
            let account = read_public_key(d)?;

            Ok(Body::AddEscrow { account, tokens })
        }
        Method::StakingReclaimEscrow => {
            if read::map_len(d)? != 2 {
                return Err(Error::UnexpectedNumberItems);
            }

            read::expect_key(d, "escrow_account")?;
            let account = read_public_key(d)?;

            read::expect_key(d, "reclaim_shares")?;
            let shares = Quantity::decode(d)?;

            Ok(Body::ReclaimEscrow { account, shares })
        }
        Method::StakingAmendCommissionSchedule => {
            if read::map_len(d)? != 1 {
                return Err(Error::UnexpectedNumberItems);
            }

            read::expect_key(d, "amendment")?;
            read_amendment(d)
        }
        Method::RegistryUnfreezeNode => {
            if read::map_len(d)? != 1 {
                return Err(Error::UnexpectedNumberItems);
            }

            read::expect_key(d, "node_id")?;
            let node_id = read_public_key(d)?;

            Ok(Body::UnfreezeNode { node_id })
        }
        Method::RegistryDeregisterEntity | Method::Unknown => Err(Error::UnexpectedMethod),
    }
}

/// Reads the amendment map, recording only the step array lengths. The
/// elements themselves are skipped structurally and re-parsed on demand
/// during review.
fn read_amendment(d: &mut Decoder) -> Result<Body, Error> {
    if read::map_len(d)? != 2 {
        return Err(Error::UnexpectedNumberItems);
    }

    read::expect_key(d, "rates")?;
    let rates_len = bounded_array(d, MAX_AMENDMENT_RATES)?;

    read::expect_key(d, "bounds")?;
    let bounds_len = bounded_array(d, MAX_AMENDMENT_BOUNDS)?;

    Ok(Body::AmendCommissionSchedule {
        rates_len,
        bounds_len,
    })
}

/// Reads an array header, enforces the element bound and skips over the
/// elements without decoding them.
fn bounded_array(d: &mut Decoder, max: usize) -> Result<usize, Error> {
    let len = read::array_len(d)?;
    if len > max as u64 {
        return Err(Error::UnexpectedNumberItems);
    }

    for _ in 0..len {
        d.skip()?;
    }

    Ok(len as usize)
}

fn read_entity(input: &[u8]) -> Result<Entity<'_>, Error> {
    let mut d = Decoder::new(input);

    if read::map_len(&mut d)? != 3 {
        return Err(Error::UnexpectedNumberItems);
    }

    read::expect_key(&mut d, "id")?;
    let id = read_public_key(&mut d)?;

    read::expect_key(&mut d, "nodes")?;
    let nodes_len = bounded_array(&mut d, MAX_ENTITY_NODES)?;

    read::expect_key(&mut d, "allow_entity_signed_nodes")?;
    let allow_entity_signed_nodes = read::bool_value(&mut d)?;

    Ok(Entity {
        id,
        nodes_len,
        allow_entity_signed_nodes,
        raw: input,
    })
}
