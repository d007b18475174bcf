//! Index keys for inverted indexes.
//!
//! Every object key and every scalar of a packed value becomes a short text entry: a flag
//! byte followed by the scalar's canonical text. String array elements are flagged like keys,
//! so that `?` can be answered from the index. Text longer than [`MAX_TEXT_LEN`] bytes is
//! replaced by an 8-hex-digit hash and the flag gets [`FLAG_HASHED`]; such entries always
//! need a recheck against the stored value.
//!
//! # Example
//!
//! ```
//! use dynval::{gin, prelude::*};
//!
//! let packed = pack(&parse(r#"{"tags": ["a"], "n": 1.50, "ok": true}"#).unwrap()).unwrap();
//! let keys = gin::extract_keys(&packed).unwrap();
//!
//! assert!(keys.contains(&b"\x01tags".to_vec()));
//! assert!(keys.contains(&b"\x01a".to_vec()));
//! assert!(keys.contains(&b"\x041.5".to_vec()));
//! assert!(keys.contains(&b"\x03t".to_vec()));
//! ```

use crate::{
    config::Config,
    encoding::{
        container::ContainerRef,
        iter::{DynIter, Token},
    },
    errors::DynError,
    numeric::Numeric,
    scalar::{Scalar, ScalarRef},
};
use failure::Error;
use tracing::trace;
use xxhash_rust::xxh32::xxh32;

/// An object key, or a string element of an array.
pub const FLAG_KEY: u8 = 0x01;
pub const FLAG_NULL: u8 = 0x02;
pub const FLAG_BOOL: u8 = 0x03;
/// Integers, floats and numerics, as normalized decimal text.
pub const FLAG_NUM: u8 = 0x04;
/// A string value, and the text form of every other kind.
pub const FLAG_STR: u8 = 0x05;
/// Set on top of another flag when the text was replaced by its hash.
pub const FLAG_HASHED: u8 = 0x10;

/// Longest text stored as-is.
pub const MAX_TEXT_LEN: usize = 125;

/// Query kinds an index can answer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// `@>`
    Contains,
    /// `?`
    Exists,
    /// `?|`
    ExistsAny,
    /// `?&`
    ExistsAll,
}

/// Builds an entry from a flag and text, hashing long text.
pub fn make_key(flag: u8, text: &[u8]) -> Vec<u8> {
    if text.len() > MAX_TEXT_LEN {
        let digest = format!("{:08x}", xxh32(text, 0));
        let mut out = Vec::with_capacity(1 + digest.len());
        out.push(flag | FLAG_HASHED);
        out.extend_from_slice(digest.as_bytes());
        out
    } else {
        let mut out = Vec::with_capacity(1 + text.len());
        out.push(flag);
        out.extend_from_slice(text);
        out
    }
}

/// The entry for a scalar stored as an object value.
///
/// Numbers of every kind share [`FLAG_NUM`] and a normalized decimal form, so `1`, `1.0` and
/// `1.00::numeric` produce the same entry.
pub fn scalar_key(s: &ScalarRef) -> Result<Vec<u8>, Error> {
    Ok(match s {
        Scalar::Null => make_key(FLAG_NULL, b""),
        Scalar::Bool(b) => make_key(FLAG_BOOL, if *b { b"t" } else { b"f" }),
        Scalar::String(b) => make_key(FLAG_STR, b),
        Scalar::Integer(i) => make_key(FLAG_NUM, i.to_string().as_bytes()),
        Scalar::Float(f) => make_key(FLAG_NUM, Numeric::from_f64_exact(*f).normalized().to_string().as_bytes()),
        Scalar::Numeric(b) => make_key(FLAG_NUM, Numeric::from_body(b)?.normalized().to_string().as_bytes()),
        other => make_key(FLAG_STR, other.text()?.as_bytes()),
    })
}

fn element_key(s: &ScalarRef) -> Result<Vec<u8>, Error> {
    match s {
        Scalar::String(b) => Ok(make_key(FLAG_KEY, b)),
        other => scalar_key(other),
    }
}

/// All entries of a packed value, sorted and without duplicates.
pub fn extract_keys(datum: &[u8]) -> Result<Vec<Vec<u8>>, Error> { extract_keys_with(datum, &Config::default()) }

/// [`extract_keys`] with explicit limits.
pub fn extract_keys_with(datum: &[u8], cfg: &Config) -> Result<Vec<Vec<u8>>, Error> {
    let mut out = Vec::new();
    let mut it = DynIter::new(datum)?;
    loop {
        let (tok, node) = it.next(false)?;
        cfg.check_depth(it.depth())?;
        let scalar = node.and_then(|n| n.scalar());
        match (tok, scalar) {
            (Token::Done, _) => break,
            (Token::Key, Some(Scalar::String(k))) => out.push(make_key(FLAG_KEY, k)),
            (Token::Element, Some(s)) => out.push(element_key(&s)?),
            (Token::Value, Some(s)) => out.push(scalar_key(&s)?),
            (Token::Key, _) | (Token::Element, None) | (Token::Value, None) => {
                return Err(DynError::UnbalancedContainer { detail: "malformed token stream" }.into());
            }
            _ => {}
        }
    }
    out.sort();
    out.dedup();
    trace!(entries = out.len() as u64, "extracted index entries");
    Ok(out)
}

/// Entries a query needs to look up.
///
/// For `Contains` the query is any packed value; for `Exists` a string; for `ExistsAny`
/// and `ExistsAll` an array of strings, where nulls are skipped.
pub fn query_keys(query: &[u8], strategy: Strategy) -> Result<Vec<Vec<u8>>, Error> {
    let root = ContainerRef::root(query)?;
    match strategy {
        Strategy::Contains => extract_keys(query),
        Strategy::Exists => match root.raw_scalar()? {
            Some(Scalar::String(k)) if root.is_raw_scalar() => Ok(vec![make_key(FLAG_KEY, k)]),
            _ => Err(DynError::InvalidOperandTypes { op: "?", lhs: "object", rhs: "non-string" }.into()),
        },
        Strategy::ExistsAny | Strategy::ExistsAll => {
            if !root.is_array() || root.is_raw_scalar() {
                return Err(DynError::InvalidOperandTypes { op: "?|", lhs: "object", rhs: "non-array" }.into());
            }
            let mut out = Vec::with_capacity(root.len());
            for i in 0..root.len() {
                match root.get(i)?.and_then(|n| n.scalar()) {
                    Some(Scalar::Null) => {}
                    Some(Scalar::String(k)) => out.push(make_key(FLAG_KEY, k)),
                    Some(other) => {
                        return Err(DynError::InvalidOperandTypes { op: "?|", lhs: "string", rhs: other.kind().name() }
                            .into());
                    }
                    None => {
                        return Err(DynError::InvalidOperandTypes { op: "?|", lhs: "string", rhs: "container" }.into());
                    }
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::ser::pack, parser::parse};

    fn keys(text: &str) -> Vec<Vec<u8>> { extract_keys(&pack(&parse(text).unwrap()).unwrap()).unwrap() }

    #[test]
    fn flags() {
        assert_eq!(keys("null"), vec![vec![FLAG_NULL]]);
        assert_eq!(keys("[false]"), vec![b"\x03f".to_vec()]);
        assert_eq!(keys(r#"{"k": "v"}"#), vec![b"\x01k".to_vec(), b"\x05v".to_vec()]);
        assert_eq!(keys(r#"["v"]"#), vec![b"\x01v".to_vec()]);
        assert_eq!(keys(r#"[1, 1.0, "1.000"::numeric]"#), vec![b"\x041".to_vec()]);
        assert_eq!(keys(r#"{"d": "2020-01-01"::date}"#)[1], b"\x052020-01-01".to_vec());
    }

    #[test]
    fn nested_values_are_indexed() {
        let k = keys(r#"{"a": {"b": [2, "x"]}}"#);
        assert_eq!(k, vec![b"\x01a".to_vec(), b"\x01b".to_vec(), b"\x01x".to_vec(), b"\x042".to_vec()]);
    }

    #[test]
    fn long_text_is_hashed() {
        let long = "z".repeat(MAX_TEXT_LEN + 1);
        let entry = make_key(FLAG_STR, long.as_bytes());
        assert_eq!(entry[0], FLAG_STR | FLAG_HASHED);
        assert_eq!(entry.len(), 9);
        assert!(entry[1..].iter().all(u8::is_ascii_hexdigit));
        assert_eq!(make_key(FLAG_STR, &long.as_bytes()[1..]).len(), MAX_TEXT_LEN + 1);
    }

    #[test]
    fn queries() {
        let q = |t: &str, s| query_keys(&pack(&parse(t).unwrap()).unwrap(), s);
        assert_eq!(q(r#""a""#, Strategy::Exists).unwrap(), vec![b"\x01a".to_vec()]);
        assert_eq!(q(r#"["a", null, "b"]"#, Strategy::ExistsAll).unwrap().len(), 2);
        assert!(q("[1]", Strategy::ExistsAny).is_err());
        assert!(q("1", Strategy::Exists).is_err());
        assert_eq!(q(r#"{"a": 1}"#, Strategy::Contains).unwrap().len(), 2);
    }
}
