//! Row enumeration and rendering.
//!
//! Every decoded message maps to a fixed table of display rows. The row
//! count is known up front; each row renders independently into
//! caller-provided key/value slices, with long values paged to the output
//! width. Amendment and node rows drive the lazy fetchers, so rendering
//! row `i` touches exactly one element of the original payload.

use std::fmt;

use sigil_codec::Error;
use sigil_crypto::{encode_address, PublicKey};
use sigil_primitives::{Body, Entity, ParsedMessage, Quantity, SigningContext, Tx};

use crate::text::{self, ValueBuf};

/// Total number of display rows for this message under this context.
pub fn num_items(msg: &ParsedMessage<'_>, ctx: &SigningContext) -> u8 {
    match msg {
        ParsedMessage::Transaction(tx) => {
            let mut n = 1usize; // Type
            if tx.fee.is_some() {
                n += 2;
            }
            if !ctx.suffix(msg).is_empty() {
                n += 1;
            }
            n += body_rows(&tx.body);
            n as u8
        }
        ParsedMessage::Entity(ent) => (2 + ent.nodes_len) as u8,
    }
}

fn body_rows(body: &Body) -> usize {
    match body {
        Body::Transfer { .. } => 2,
        Body::Burn { .. } => 1,
        Body::AddEscrow { .. } => 2,
        Body::ReclaimEscrow { .. } => 2,
        Body::AmendCommissionSchedule {
            rates_len,
            bounds_len,
        } => 2 * rates_len + 3 * bounds_len,
        Body::DeregisterEntity => 0,
        Body::UnfreezeNode { .. } => 1,
    }
}

/// Renders display row `display_idx`, page `page_idx`, into the output
/// slices and returns the page count of the value.
///
/// Pure in its inputs: the same `(msg, ctx, idx, page)` always produces
/// the same output.
pub fn get_item(
    msg: &ParsedMessage<'_>,
    ctx: &SigningContext,
    display_idx: u8,
    page_idx: u8,
    out_key: &mut [u8],
    out_val: &mut [u8],
) -> Result<u8, Error> {
    if display_idx >= num_items(msg, ctx) {
        return Err(Error::NoData);
    }

    out_key.fill(0);

    match msg {
        ParsedMessage::Transaction(tx) => {
            tx_item(tx, msg, ctx, display_idx as usize, page_idx, out_key, out_val)
        }
        ParsedMessage::Entity(ent) => {
            entity_item(ent, display_idx as usize, page_idx, out_key, out_val)
        }
    }
}

/// Re-renders every row once. This is the definitive go/no-go before the
/// user is prompted: after it succeeds, no row can fail mid-approval.
pub fn validate_items(msg: &ParsedMessage<'_>, ctx: &SigningContext) -> Result<(), Error> {
    let mut key = [0u8; 64];
    let mut val = [0u8; 64];

    for idx in 0..num_items(msg, ctx) {
        get_item(msg, ctx, idx, 0, &mut key, &mut val)?;
    }

    Ok(())
}

fn tx_item(
    tx: &Tx<'_>,
    msg: &ParsedMessage<'_>,
    ctx: &SigningContext,
    idx: usize,
    page_idx: u8,
    out_key: &mut [u8],
    out_val: &mut [u8],
) -> Result<u8, Error> {
    let mut idx = idx;

    if idx == 0 {
        set_key(out_key, format_args!("Type"));
        let mut v = ValueBuf::new();
        v.push_str(tx.method.label())?;
        return text::page_into(v.as_bytes(), page_idx, out_val);
    }
    idx -= 1;

    if let Some(fee) = &tx.fee {
        match idx {
            0 => {
                set_key(out_key, format_args!("Fee Amount"));
                let mut v = ValueBuf::new();
                text::print_amount(&fee.amount, &mut v)?;
                return text::page_into(v.as_bytes(), page_idx, out_val);
            }
            1 => {
                set_key(out_key, format_args!("Fee Gas"));
                let mut v = ValueBuf::new();
                text::print_u64(fee.gas, &mut v)?;
                return text::page_into(v.as_bytes(), page_idx, out_val);
            }
            _ => idx -= 2,
        }
    }

    let suffix = ctx.suffix(msg);
    if !suffix.is_empty() {
        if idx == 0 {
            set_key(out_key, format_args!("Context"));
            let mut v = ValueBuf::new();
            v.push_bytes(suffix)?;
            return text::page_into(v.as_bytes(), page_idx, out_val);
        }
        idx -= 1;
    }

    body_item(tx, idx, page_idx, out_key, out_val)
}

fn body_item(
    tx: &Tx<'_>,
    idx: usize,
    page_idx: u8,
    out_key: &mut [u8],
    out_val: &mut [u8],
) -> Result<u8, Error> {
    match &tx.body {
        Body::Transfer { to, tokens } => match idx {
            0 => address_item("To", to, page_idx, out_key, out_val),
            1 => amount_item("Tokens", tokens, page_idx, out_key, out_val),
            _ => Err(Error::DisplayIdxOutOfRange),
        },
        Body::Burn { tokens } => match idx {
            0 => amount_item("Tokens", tokens, page_idx, out_key, out_val),
            _ => Err(Error::DisplayIdxOutOfRange),
        },
        Body::AddEscrow { account, tokens } => match idx {
            0 => address_item("Escrow", account, page_idx, out_key, out_val),
            1 => amount_item("Tokens", tokens, page_idx, out_key, out_val),
            _ => Err(Error::DisplayIdxOutOfRange),
        },
        Body::ReclaimEscrow { account, shares } => match idx {
            0 => address_item("Escrow", account, page_idx, out_key, out_val),
            1 => amount_item("Tokens", shares, page_idx, out_key, out_val),
            _ => Err(Error::DisplayIdxOutOfRange),
        },
        Body::AmendCommissionSchedule {
            rates_len,
            bounds_len,
        } => amend_item(tx, *rates_len, *bounds_len, idx, page_idx, out_key, out_val),
        Body::UnfreezeNode { node_id } => match idx {
            0 => address_item("Node ID", node_id, page_idx, out_key, out_val),
            _ => Err(Error::DisplayIdxOutOfRange),
        },
        Body::DeregisterEntity => Err(Error::DisplayIdxOutOfRange),
    }
}

fn amend_item(
    tx: &Tx<'_>,
    rates_len: usize,
    bounds_len: usize,
    idx: usize,
    page_idx: u8,
    out_key: &mut [u8],
    out_val: &mut [u8],
) -> Result<u8, Error> {
    if idx < 2 * rates_len {
        let step = idx / 2;
        let rate = tx.rate_at(step)?;
        let mut v = ValueBuf::new();

        if idx % 2 == 0 {
            set_key(out_key, format_args!("Rate [{step}] start"));
            text::print_u64(rate.start, &mut v)?;
        } else {
            set_key(out_key, format_args!("Rate [{step}] rate"));
            text::print_rate(&rate.rate, &mut v)?;
        }

        return text::page_into(v.as_bytes(), page_idx, out_val);
    }

    let idx = idx - 2 * rates_len;
    if idx < 3 * bounds_len {
        let step = idx / 3;
        let bound = tx.bound_at(step)?;
        let mut v = ValueBuf::new();

        match idx % 3 {
            0 => {
                set_key(out_key, format_args!("Bound [{step}] start"));
                text::print_u64(bound.start, &mut v)?;
            }
            1 => {
                set_key(out_key, format_args!("Bound [{step}] min"));
                text::print_rate(&bound.rate_min, &mut v)?;
            }
            _ => {
                set_key(out_key, format_args!("Bound [{step}] max"));
                text::print_rate(&bound.rate_max, &mut v)?;
            }
        }

        return text::page_into(v.as_bytes(), page_idx, out_val);
    }

    Err(Error::DisplayIdxOutOfRange)
}

fn entity_item(
    ent: &Entity<'_>,
    idx: usize,
    page_idx: u8,
    out_key: &mut [u8],
    out_val: &mut [u8],
) -> Result<u8, Error> {
    if idx == 0 {
        return address_item("ID", &ent.id, page_idx, out_key, out_val);
    }

    if idx <= ent.nodes_len {
        let node = idx - 1;
        let id = ent.node_at(node)?;
        set_key(out_key, format_args!("Node [{node}]"));
        let mut v = ValueBuf::new();
        v.push_str(&encode_address(&id)?)?;
        return text::page_into(v.as_bytes(), page_idx, out_val);
    }

    if idx == ent.nodes_len + 1 {
        set_key(out_key, format_args!("Allowed"));
        let mut v = ValueBuf::new();
        v.push_str(if ent.allow_entity_signed_nodes {
            "Yes"
        } else {
            "No"
        })?;
        return text::page_into(v.as_bytes(), page_idx, out_val);
    }

    Err(Error::DisplayIdxOutOfRange)
}

fn address_item(
    key: &str,
    pk: &PublicKey,
    page_idx: u8,
    out_key: &mut [u8],
    out_val: &mut [u8],
) -> Result<u8, Error> {
    set_key(out_key, format_args!("{key}"));
    let mut v = ValueBuf::new();
    v.push_str(&encode_address(pk)?)?;
    text::page_into(v.as_bytes(), page_idx, out_val)
}

fn amount_item(
    key: &str,
    q: &Quantity,
    page_idx: u8,
    out_key: &mut [u8],
    out_val: &mut [u8],
) -> Result<u8, Error> {
    set_key(out_key, format_args!("{key}"));
    let mut v = ValueBuf::new();
    text::print_amount(q, &mut v)?;
    text::page_into(v.as_bytes(), page_idx, out_val)
}

/// Writes the row key, truncating silently at the buffer width
/// (snprintf semantics).
fn set_key(out_key: &mut [u8], args: fmt::Arguments<'_>) {
    let mut w = KeyWriter {
        buf: out_key,
        len: 0,
    };
    let _ = fmt::write(&mut w, args);
}

struct KeyWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl fmt::Write for KeyWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &b in s.as_bytes() {
            if self.len == self.buf.len() {
                break;
            }
            self.buf[self.len] = b;
            self.len += 1;
        }
        Ok(())
    }
}
