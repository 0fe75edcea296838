//! Typed readers over a [`minicbor::Decoder`].
//!
//! Every reader asserts the datatype of the next item before touching it
//! and fails with [`Error::UnexpectedType`] otherwise. Readers consume the
//! item they read; lookahead works on a cloned decoder, which is how
//! [`find_value`] scans a map without disturbing the caller's cursor.

use minicbor::data::Type;
use minicbor::Decoder;

use crate::Error;

/// Reads an unsigned integer of any width into a `u64`.
pub fn u64_value(d: &mut Decoder) -> Result<u64, Error> {
    match d.datatype()? {
        Type::U8 | Type::U16 | Type::U32 | Type::U64 => Ok(d.u64()?),
        _ => Err(Error::UnexpectedType),
    }
}

/// Reads a boolean.
pub fn bool_value(d: &mut Decoder) -> Result<bool, Error> {
    match d.datatype()? {
        Type::Bool => Ok(d.bool()?),
        _ => Err(Error::UnexpectedType),
    }
}

/// Reads a definite-length byte string and returns the borrowed payload.
pub fn bytes_value<'b>(d: &mut Decoder<'b>) -> Result<&'b [u8], Error> {
    match d.datatype()? {
        Type::Bytes => Ok(d.bytes()?),
        _ => Err(Error::UnexpectedType),
    }
}

/// Reads a definite-length text string and returns the borrowed payload.
pub fn text_value<'b>(d: &mut Decoder<'b>) -> Result<&'b str, Error> {
    match d.datatype()? {
        Type::String => Ok(d.str()?),
        _ => Err(Error::UnexpectedType),
    }
}

/// Consumes the next map key and asserts it equals `expected`.
pub fn expect_key(d: &mut Decoder, expected: &str) -> Result<(), Error> {
    if text_value(d)? == expected {
        Ok(())
    } else {
        Err(Error::UnexpectedField)
    }
}

/// Reads a definite-length map header and returns the entry count.
///
/// Indefinite-length maps never occur in canonical form.
pub fn map_len(d: &mut Decoder) -> Result<u64, Error> {
    match d.datatype()? {
        Type::Map => d.map()?.ok_or(Error::CborUnexpected),
        Type::MapIndef => Err(Error::CborUnexpected),
        _ => Err(Error::UnexpectedType),
    }
}

/// Reads a definite-length array header and returns the element count.
pub fn array_len(d: &mut Decoder) -> Result<u64, Error> {
    match d.datatype()? {
        Type::Array => d.array()?.ok_or(Error::CborUnexpected),
        Type::ArrayIndef => Err(Error::CborUnexpected),
        _ => Err(Error::UnexpectedType),
    }
}

/// Scans the map at `d`'s position for `key`, returning a decoder
/// positioned at the associated value.
///
/// Map keys must be text strings. The caller's decoder is untouched, so
/// repeated lookups against the same map compose freely.
pub fn find_value<'b>(d: &Decoder<'b>, key: &str) -> Result<Option<Decoder<'b>>, Error> {
    let mut d = d.clone();
    let entries = map_len(&mut d)?;

    for _ in 0..entries {
        if text_value(&mut d)? == key {
            return Ok(Some(d));
        }
        d.skip()?;
    }

    Ok(None)
}
