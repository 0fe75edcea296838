use proptest::prelude::*;
use sigil_codec::canonical;
use sigil_codec::minicbor::Encoder;

fn encode(f: impl FnOnce(&mut Encoder<&mut Vec<u8>>)) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut e = Encoder::new(&mut buf);
    f(&mut e);
    buf
}

proptest! {
    #[test]
    fn encoder_integers_are_canonical(v in any::<u64>()) {
        let bytes = encode(|e| { e.u64(v).unwrap(); });
        prop_assert_eq!(canonical::validate(&bytes), Ok(()));
    }

    #[test]
    fn encoder_byte_strings_are_canonical(payload in proptest::collection::vec(any::<u8>(), 0..512)) {
        let bytes = encode(|e| { e.bytes(&payload).unwrap(); });
        prop_assert_eq!(canonical::validate(&bytes), Ok(()));
    }

    #[test]
    fn encoder_text_is_canonical(s in "[ -~]{0,128}") {
        let bytes = encode(|e| { e.str(&s).unwrap(); });
        prop_assert_eq!(canonical::validate(&bytes), Ok(()));
    }

    #[test]
    fn sorted_maps_are_canonical(gas in any::<u64>(), amount in proptest::collection::vec(any::<u8>(), 0..64)) {
        // the fee-map shape used by the transaction schema
        let bytes = encode(|e| {
            e.map(2).unwrap();
            e.str("gas").unwrap();
            e.u64(gas).unwrap();
            e.str("amount").unwrap();
            e.bytes(&amount).unwrap();
        });
        prop_assert_eq!(canonical::validate(&bytes), Ok(()));
    }

    #[test]
    fn trailing_garbage_is_rejected(v in any::<u64>(), junk in 0u8..=255) {
        let mut bytes = encode(|e| { e.u64(v).unwrap(); });
        bytes.push(junk);
        prop_assert!(canonical::validate(&bytes).is_err());
    }
}
