#![allow(dead_code)]

//! Encoder-built canonical fixtures shared by the review tests.

use sigil_codec::minicbor::Encoder;

pub fn encode(f: impl FnOnce(&mut Encoder<&mut Vec<u8>>)) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut e = Encoder::new(&mut buf);
    f(&mut e);
    buf
}

pub fn fee_map(e: &mut Encoder<&mut Vec<u8>>, gas: u64, amount: &[u8]) {
    e.str("fee").unwrap();
    e.map(2).unwrap();
    e.str("gas").unwrap();
    e.u64(gas).unwrap();
    e.str("amount").unwrap();
    e.bytes(amount).unwrap();
}

pub fn transfer(fee: Option<(u64, &[u8])>, nonce: u64, to: &[u8; 32], tokens: &[u8]) -> Vec<u8> {
    encode(|e| {
        e.map(3 + u64::from(fee.is_some())).unwrap();
        if let Some((gas, amount)) = fee {
            fee_map(e, gas, amount);
        }
        e.str("body").unwrap();
        e.map(2).unwrap();
        e.str("xfer_to").unwrap();
        e.bytes(to).unwrap();
        e.str("xfer_tokens").unwrap();
        e.bytes(tokens).unwrap();
        e.str("nonce").unwrap();
        e.u64(nonce).unwrap();
        e.str("method").unwrap();
        e.str("staking.Transfer").unwrap();
    })
}

/// Same fields as [`transfer`] but with the outer keys in non-canonical
/// order; the schema decoder accepts it, the canonical pass must not.
pub fn transfer_misordered(to: &[u8; 32]) -> Vec<u8> {
    encode(|e| {
        e.map(4).unwrap();
        e.str("body").unwrap();
        e.map(2).unwrap();
        e.str("xfer_to").unwrap();
        e.bytes(to).unwrap();
        e.str("xfer_tokens").unwrap();
        e.bytes(&[0x01]).unwrap();
        fee_map(e, 1, &[0x01]);
        e.str("nonce").unwrap();
        e.u64(0).unwrap();
        e.str("method").unwrap();
        e.str("staking.Transfer").unwrap();
    })
}

pub fn burn_no_fee(tokens: &[u8]) -> Vec<u8> {
    encode(|e| {
        e.map(3).unwrap();
        e.str("body").unwrap();
        e.map(1).unwrap();
        e.str("burn_tokens").unwrap();
        e.bytes(tokens).unwrap();
        e.str("nonce").unwrap();
        e.u64(0).unwrap();
        e.str("method").unwrap();
        e.str("staking.Burn").unwrap();
    })
}

pub fn deregister_entity(gas: u64, amount: &[u8]) -> Vec<u8> {
    encode(|e| {
        e.map(3).unwrap();
        fee_map(e, gas, amount);
        e.str("nonce").unwrap();
        e.u64(4).unwrap();
        e.str("method").unwrap();
        e.str("registry.DeregisterEntity").unwrap();
    })
}

pub fn amendment(rates: &[(&[u8], u64)], bounds: &[(u64, &[u8], &[u8])]) -> Vec<u8> {
    encode(|e| {
        e.map(4).unwrap();
        fee_map(e, 1000, &[0x0a]);
        e.str("body").unwrap();
        e.map(1).unwrap();
        e.str("amendment").unwrap();
        e.map(2).unwrap();
        e.str("rates").unwrap();
        e.array(rates.len() as u64).unwrap();
        for (rate, start) in rates {
            e.map(2).unwrap();
            e.str("rate").unwrap();
            e.bytes(rate).unwrap();
            e.str("start").unwrap();
            e.u64(*start).unwrap();
        }
        e.str("bounds").unwrap();
        e.array(bounds.len() as u64).unwrap();
        for (start, rate_max, rate_min) in bounds {
            e.map(3).unwrap();
            e.str("start").unwrap();
            e.u64(*start).unwrap();
            e.str("rate_max").unwrap();
            e.bytes(rate_max).unwrap();
            e.str("rate_min").unwrap();
            e.bytes(rate_min).unwrap();
        }
        e.str("nonce").unwrap();
        e.u64(5).unwrap();
        e.str("method").unwrap();
        e.str("staking.AmendCommissionSchedule").unwrap();
    })
}

/// Entity with arbitrary node payloads; the decoder only counts them, so
/// a bad node surfaces during the validation sweep, not at parse time.
pub fn entity_raw_nodes(id: &[u8; 32], nodes: &[&[u8]], allow: bool) -> Vec<u8> {
    encode(|e| {
        e.map(3).unwrap();
        e.str("id").unwrap();
        e.bytes(id).unwrap();
        e.str("nodes").unwrap();
        e.array(nodes.len() as u64).unwrap();
        for node in nodes {
            e.bytes(node).unwrap();
        }
        e.str("allow_entity_signed_nodes").unwrap();
        e.bool(allow).unwrap();
    })
}

pub fn entity(id: &[u8; 32], nodes: &[[u8; 32]], allow: bool) -> Vec<u8> {
    encode(|e| {
        e.map(3).unwrap();
        e.str("id").unwrap();
        e.bytes(id).unwrap();
        e.str("nodes").unwrap();
        e.array(nodes.len() as u64).unwrap();
        for node in nodes {
            e.bytes(node).unwrap();
        }
        e.str("allow_entity_signed_nodes").unwrap();
        e.bool(allow).unwrap();
    })
}

/// Key/value render of one row with generous buffers, as owned strings.
pub fn row(
    msg: &sigil_primitives::ParsedMessage<'_>,
    ctx: &sigil_primitives::SigningContext,
    idx: u8,
) -> (String, String) {
    let mut key = [0u8; 64];
    let mut val = [0u8; 192];
    let pages = sigil_review::get_item(msg, ctx, idx, 0, &mut key, &mut val).unwrap();
    assert_eq!(pages, 1, "row {idx} should fit one page of this width");
    (trim(&key), trim(&val))
}

pub fn trim(buf: &[u8]) -> String {
    let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
    String::from_utf8(buf[..end].to_vec()).unwrap()
}
