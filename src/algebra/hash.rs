//! Hashing of packed values.
//!
//! Every scalar is reduced to a canonical byte key before hashing, so values that the total
//! order considers equal hash equal: `1`, `1.0` and `1.00::numeric` share a hash, as do a
//! date and the timestamp at its midnight. Composite hashes fold the hashes of keys, values
//! and elements in document order.

use crate::{
    config::Config,
    encoding::iter::{DynIter, Token},
    errors::DynError,
    numeric::Numeric,
    scalar::Scalar,
    temporal::{date_to_timestamp, TimeTz},
};
use failure::Error;
use xxhash_rust::{xxh32::xxh32, xxh64::xxh64};

const KEY_STRING: u8 = 1;
const KEY_NUMBER: u8 = 2;
const KEY_INSTANT: u8 = 3;
const KEY_TIME: u8 = 4;
const KEY_INTERVAL: u8 = 5;
const KEY_OTHER: u8 = 0x10;

enum HashKey {
    Null,
    Bool(bool),
    Bytes(Vec<u8>),
}

fn tagged(tag: u8, body: &[u8]) -> HashKey {
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(tag);
    out.extend_from_slice(body);
    HashKey::Bytes(out)
}

fn time_key(t: &TimeTz) -> HashKey {
    let mut body = t.utc_time().to_le_bytes().to_vec();
    body.extend_from_slice(&t.zone.to_le_bytes());
    tagged(KEY_TIME, &body)
}

fn canonical<B: AsRef<[u8]>>(s: &Scalar<B>) -> Result<HashKey, Error> {
    Ok(match s {
        Scalar::Null => HashKey::Null,
        Scalar::Bool(b) => HashKey::Bool(*b),
        Scalar::String(b) => tagged(KEY_STRING, b.as_ref()),
        Scalar::Integer(i) => tagged(KEY_NUMBER, i.to_string().as_bytes()),
        Scalar::Float(f) => tagged(KEY_NUMBER, Numeric::from_f64_exact(*f).normalized().to_string().as_bytes()),
        Scalar::Numeric(b) => tagged(KEY_NUMBER, Numeric::from_body(b.as_ref())?.normalized().to_string().as_bytes()),
        Scalar::Timestamp(t) | Scalar::TimestampTz(t) => tagged(KEY_INSTANT, &t.to_le_bytes()),
        Scalar::Date(d) => tagged(KEY_INSTANT, &date_to_timestamp(*d).to_le_bytes()),
        Scalar::Time(t) => time_key(&TimeTz::utc(*t)),
        Scalar::TimeTz(t) => time_key(t),
        Scalar::Interval(i) => tagged(KEY_INTERVAL, &i.span().to_le_bytes()),
        other => {
            let tag = KEY_OTHER.wrapping_add(other.kind().priority() as u8);
            tagged(tag, other.text()?.as_bytes())
        }
    })
}

/// 32-bit hash of one scalar.
///
/// Null hashes to `0x01`, true to `0x02` and false to `0x04`.
pub fn scalar_hash<B: AsRef<[u8]>>(s: &Scalar<B>) -> Result<u32, Error> {
    Ok(match canonical(s)? {
        HashKey::Null => 0x01,
        HashKey::Bool(true) => 0x02,
        HashKey::Bool(false) => 0x04,
        HashKey::Bytes(b) => xxh32(&b, 0),
    })
}

/// 64-bit hash of one scalar, mixing in `seed`.
pub fn scalar_hash_extended<B: AsRef<[u8]>>(s: &Scalar<B>, seed: u64) -> Result<u64, Error> {
    Ok(match canonical(s)? {
        HashKey::Null => seed.wrapping_add(0x01),
        HashKey::Bool(b) if seed == 0 => {
            if b {
                0x02
            } else {
                0x04
            }
        }
        HashKey::Bool(b) => xxh64(&[b as u8], seed),
        HashKey::Bytes(b) => xxh64(&b, seed),
    })
}

/// Rotates each 32-bit half of `h` left by one.
#[inline]
fn rotate_halves(h: u64) -> u64 { ((h << 1) & 0xffff_fffe_ffff_fffe) | ((h >> 31) & 0x0000_0001_0000_0001) }

fn fold<F>(datum: &[u8], cfg: &Config, mut step: F) -> Result<(), Error>
where
    F: FnMut(&Scalar<&[u8]>) -> Result<(), Error>,
{
    let mut it = DynIter::new(datum)?;
    loop {
        let (tok, node) = it.next(false)?;
        cfg.check_depth(it.depth())?;
        match tok {
            Token::Done => return Ok(()),
            Token::Key | Token::Value | Token::Element => match node.and_then(|n| n.scalar()) {
                Some(s) => step(&s)?,
                None => return Err(DynError::UnbalancedContainer { detail: "malformed token stream" }.into()),
            },
            _ => {}
        }
    }
}

/// 32-bit hash of a packed value.
///
/// # Example
///
/// ```
/// use dynval::{algebra::hash::hash, prelude::*};
///
/// let a = pack(&parse(r#"{"n": 1, "d": "2020-01-01"::date}"#).unwrap()).unwrap();
/// let b = pack(&parse(r#"{"n": 1.0, "d": "2020-01-01 00:00:00"::timestamp}"#).unwrap()).unwrap();
///
/// assert_eq!(hash(&a).unwrap(), hash(&b).unwrap());
/// ```
pub fn hash(datum: &[u8]) -> Result<u32, Error> { hash_with(datum, &Config::default()) }

/// [`hash`] with explicit limits.
pub fn hash_with(datum: &[u8], cfg: &Config) -> Result<u32, Error> {
    let mut h: u32 = 0;
    fold(datum, cfg, |s| {
        h = h.rotate_left(1) ^ scalar_hash(s)?;
        Ok(())
    })?;
    Ok(h)
}

/// 64-bit seeded hash of a packed value.
pub fn hash_extended(datum: &[u8], seed: u64) -> Result<u64, Error> {
    hash_extended_with(datum, seed, &Config::default())
}

/// [`hash_extended`] with explicit limits.
pub fn hash_extended_with(datum: &[u8], seed: u64, cfg: &Config) -> Result<u64, Error> {
    let mut h: u64 = 0;
    fold(datum, cfg, |s| {
        h = rotate_halves(h) ^ scalar_hash_extended(s, seed)?;
        Ok(())
    })?;
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::ser::pack, parser::parse};

    fn h(text: &str) -> u32 { hash(&pack(&parse(text).unwrap()).unwrap()).unwrap() }

    fn hx(text: &str, seed: u64) -> u64 { hash_extended(&pack(&parse(text).unwrap()).unwrap(), seed).unwrap() }

    #[test]
    fn fixed_scalars() {
        let null: Scalar = Scalar::Null;
        let yes: Scalar = Scalar::Bool(true);
        let no: Scalar = Scalar::Bool(false);
        assert_eq!(scalar_hash(&null).unwrap(), 0x01);
        assert_eq!(scalar_hash(&yes).unwrap(), 0x02);
        assert_eq!(scalar_hash(&no).unwrap(), 0x04);
        assert_eq!(scalar_hash_extended(&null, 7).unwrap(), 8);
        assert_eq!(h("null"), 0x01);
        assert_eq!(h("[null, true]"), (0x01u32.rotate_left(1)) ^ 0x02);
    }

    #[test]
    fn equal_values_hash_equal() {
        assert_eq!(h("[1, 2.5]"), h(r#"[1.0, "2.50"::numeric]"#));
        assert_eq!(h(r#"{"a": "1 mon"::interval}"#), h(r#"{"a": "30 days"::interval}"#));
        assert_eq!(hx("[NaN]", 3), hx(r#"["NaN"::numeric]"#, 3));
        assert_eq!(hx("[0.0]", 0), hx("[-0.0]", 0));
    }

    #[test]
    fn order_matters() {
        assert_ne!(h(r#"["a", "b"]"#), h(r#"["b", "a"]"#));
        assert_ne!(h(r#"{"a": "b"}"#), h(r#"{"b": "a"}"#));
        assert_ne!(hx("[1]", 1), hx("[1]", 2));
    }

    #[test]
    fn rotation_of_halves() {
        assert_eq!(rotate_halves(0x8000_0000_8000_0000), 0x0000_0001_0000_0001);
        assert_eq!(rotate_halves(1), 2);
    }
}
