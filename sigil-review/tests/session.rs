//! Session state machine and host command surface.

mod common;

use common::*;

use sigil_codec::Error;
use sigil_primitives::{SigningContext, CONTEXT_PREFIX_ENTITY, CONTEXT_PREFIX_TX, MAX_CONTEXT_SIZE};
use sigil_review::{App, ReviewSession, Stage, Status};
use sigil_crypto::{derive_key, verify_message, COIN_PATH};

const SEED: [u8; 32] = [0x2a; 32];

fn tx_context_bytes(chain: &str) -> Vec<u8> {
    let mut full = CONTEXT_PREFIX_TX.as_bytes().to_vec();
    full.extend_from_slice(chain.as_bytes());
    full
}

#[test]
fn full_signing_flow() {
    let input = transfer(Some((1000, &[0x0a])), 7, &[0x42u8; 32], &[0x64]);

    let mut app = App::new();
    assert_eq!(app.set_context(&tx_context_bytes("mainnet")), Status::Ok);

    let sig = app.sign(&SEED, &input).unwrap();

    // the signature covers SHA-512(context || exact input bytes)
    let pk = derive_key(&SEED, &COIN_PATH).unwrap().public_key();
    assert!(verify_message(
        &pk,
        &tx_context_bytes("mainnet"),
        &input,
        &sig
    ));

    // a byte-flipped payload does not verify against the same signature
    let mut other = input.clone();
    other[10] ^= 0xff;
    assert!(!verify_message(
        &pk,
        &tx_context_bytes("mainnet"),
        &other,
        &sig
    ));
}

#[test]
fn entity_signing_flow() {
    let input = entity(&[0x0eu8; 32], &[[0x0fu8; 32]], true);

    let mut app = App::new();
    assert_eq!(
        app.set_context(CONTEXT_PREFIX_ENTITY.as_bytes()),
        Status::Ok
    );

    let sig = app.sign(&SEED, &input).unwrap();
    let pk = derive_key(&SEED, &COIN_PATH).unwrap().public_key();
    assert!(verify_message(
        &pk,
        CONTEXT_PREFIX_ENTITY.as_bytes(),
        &input,
        &sig
    ));
}

#[test]
fn signing_without_a_matching_context_fails() {
    let input = burn_no_fee(&[0x01]);

    let app = App::new();
    assert_eq!(app.sign(&SEED, &input).unwrap_err(), Error::ContextMismatch);

    let mut app = App::new();
    app.set_context(b"not the consensus domain");
    assert_eq!(app.sign(&SEED, &input).unwrap_err(), Error::ContextMismatch);
}

#[test]
fn non_canonical_payloads_fail_validation() {
    let input = transfer_misordered(&[0x42u8; 32]);

    // the locate-based decoder accepts the field set
    let mut session = ReviewSession::parse(&input).unwrap();
    assert_eq!(session.stage(), Stage::Parsed);

    // the canonical pass does not
    let mut ctx = SigningContext::new();
    ctx.set(&tx_context_bytes("mainnet")).unwrap();
    assert_eq!(session.validate(&ctx).unwrap_err(), Error::CborUnexpected);
    assert_eq!(session.stage(), Stage::Rejected);
}

#[test]
fn only_validated_sessions_sign() {
    let input = burn_no_fee(&[0x01]);
    let mut ctx = SigningContext::new();
    ctx.set(&tx_context_bytes("gate")).unwrap();
    let sk = derive_key(&SEED, &COIN_PATH).unwrap();

    let mut session = ReviewSession::parse(&input).unwrap();
    assert_eq!(session.sign(&ctx, &sk).unwrap_err(), Error::NoData);

    session.validate(&ctx).unwrap();
    assert_eq!(session.stage(), Stage::Validated);
    let sig = session.sign(&ctx, &sk).unwrap();
    assert_eq!(session.stage(), Stage::Signed);

    let pk = sk.public_key();
    assert!(verify_message(&pk, ctx.as_bytes(), &input, &sig));
}

#[test]
fn rejected_sessions_never_sign() {
    let input = burn_no_fee(&[0x01]);
    let mut ctx = SigningContext::new();
    ctx.set(&tx_context_bytes("gate")).unwrap();
    let sk = derive_key(&SEED, &COIN_PATH).unwrap();

    let mut session = ReviewSession::parse(&input).unwrap();
    session.validate(&ctx).unwrap();
    session.reject();

    assert_eq!(session.sign(&ctx, &sk).unwrap_err(), Error::NoData);
}

#[test]
fn validation_sweep_catches_malformed_lazy_elements() {
    // a 31-byte node id decodes fine (lengths only) but cannot render
    let bad_nodes: &[&[u8]] = &[&[0x01; 31]];
    let input = entity_raw_nodes(&[0x0eu8; 32], bad_nodes, true);

    let mut session = ReviewSession::parse(&input).unwrap();

    let mut ctx = SigningContext::new();
    ctx.set(CONTEXT_PREFIX_ENTITY.as_bytes()).unwrap();
    assert_eq!(session.validate(&ctx).unwrap_err(), Error::UnexpectedValue);
    assert_eq!(session.stage(), Stage::Rejected);
}

#[test]
fn empty_input_reports_an_empty_session() {
    assert_eq!(
        ReviewSession::parse(&[]).unwrap_err(),
        Error::InitContextEmpty
    );
}

#[test]
fn set_context_status_codes() {
    let mut app = App::new();

    assert_eq!(app.set_context(b"ok context"), Status::Ok);
    assert_eq!(app.context().as_bytes(), b"ok context");

    let too_long = vec![b'a'; MAX_CONTEXT_SIZE + 1];
    assert_eq!(app.set_context(&too_long), Status::WrongLength);
    assert!(app.context().is_empty());

    assert_eq!(app.set_context(b"\x07bell"), Status::DataInvalid);
    assert!(app.context().is_empty());

    assert_eq!(Status::Ok.code(), 0x9000);
    assert_eq!(Status::WrongLength.code(), 0x6700);
    assert_eq!(Status::DataInvalid.code(), 0x6984);
}

#[test]
fn address_exposes_key_and_bech32() {
    let app = App::new();
    let (pk, addr) = app.address(&SEED).unwrap();

    assert!(addr.starts_with("oasis1"));
    assert_eq!(
        addr,
        sigil_crypto::encode_address(&pk).unwrap()
    );
}

#[test]
fn malformed_payloads_never_reach_the_signer() {
    let mut app = App::new();
    app.set_context(&tx_context_bytes("mainnet"));

    // truncated transfer
    let input = transfer(None, 0, &[0x42u8; 32], &[0x01]);
    let truncated = &input[..input.len() - 1];
    assert!(app.sign(&SEED, truncated).is_err());

    // trailing byte
    let mut padded = input.clone();
    padded.push(0);
    assert_eq!(
        app.sign(&SEED, &padded).unwrap_err(),
        Error::UnexpectedDataAtEnd
    );
}
