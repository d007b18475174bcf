//! Tunables shared by every walk over a value.
//!
//! Each public entry point has a `*_with` variant taking a [`Config`]; the plain variant
//! uses [`Config::default`].
//!
//! # Example
//!
//! ```
//! use dynval::prelude::*;
//!
//! let cfg = Config { max_depth: 2, ..Config::default() };
//!
//! assert!(parse_with("[[1]]", &cfg).is_ok());
//! assert!(parse_with("[[[1]]]", &cfg).is_err());
//! ```

use crate::errors::DynError;
use failure::Error;
use std::cmp::Ordering;

/// Default bound on container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Default number of spaces per level for indented printing.
pub const DEFAULT_INDENT: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Order used to sort, deduplicate and look up object keys.
///
/// The packed layout stores keys in this order and looks them up by binary search, so a
/// datum can only be read back with the collation it was written with.
pub enum KeyCollation {
    /// Shorter keys first, equal lengths compared byte-wise.
    LengthThenBytes,
}

impl KeyCollation {
    /// Compares two keys.
    pub fn compare(self, a: &[u8], b: &[u8]) -> Ordering {
        match self {
            KeyCollation::LengthThenBytes => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        }
    }
}

impl Default for KeyCollation {
    fn default() -> Self { KeyCollation::LengthThenBytes }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Order used for string scalars by the total order.
pub enum StringCollation {
    /// Plain byte-wise comparison, as with the `C` collation.
    Bytewise,
    /// The object key order, so that relational string comparison agrees with key order.
    LengthThenBytes,
}

impl StringCollation {
    /// Compares two strings.
    pub fn compare(self, a: &[u8], b: &[u8]) -> Ordering {
        match self {
            StringCollation::Bytewise => a.cmp(b),
            StringCollation::LengthThenBytes => KeyCollation::LengthThenBytes.compare(a, b),
        }
    }
}

impl Default for StringCollation {
    fn default() -> Self { StringCollation::Bytewise }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Settings for packing, parsing, printing and the value algebra.
pub struct Config {
    /// Deepest container nesting any walk accepts before failing with
    /// [`DynError::NestingTooDeep`].
    pub max_depth: usize,
    /// Order in which packing stores object keys and lookups search them.
    pub key_collation: KeyCollation,
    /// String order used by comparison.
    pub string_collation: StringCollation,
    /// Spaces per nesting level for indented printing.
    pub indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: DEFAULT_MAX_DEPTH,
            key_collation: KeyCollation::default(),
            string_collation: StringCollation::default(),
            indent: DEFAULT_INDENT,
        }
    }
}

impl Config {
    /// Fails with [`DynError::NestingTooDeep`] when `depth` exceeds the limit.
    #[inline]
    pub fn check_depth(&self, depth: usize) -> Result<(), Error> {
        if depth > self.max_depth {
            Err(DynError::NestingTooDeep { max: self.max_depth }.into())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_collation_is_length_first() {
        let c = KeyCollation::LengthThenBytes;
        assert_eq!(c.compare(b"b", b"aa"), Ordering::Less);
        assert_eq!(c.compare(b"ab", b"aa"), Ordering::Greater);
        assert_eq!(c.compare(b"", b""), Ordering::Equal);
    }

    #[test]
    fn string_collations_differ() {
        assert_eq!(StringCollation::Bytewise.compare(b"b", b"aa"), Ordering::Greater);
        assert_eq!(StringCollation::LengthThenBytes.compare(b"b", b"aa"), Ordering::Less);
    }

    #[test]
    fn depth_limit() {
        let cfg = Config { max_depth: 3, ..Config::default() };
        assert!(cfg.check_depth(3).is_ok());
        assert!(cfg.check_depth(4).is_err());
    }
}
