//! # dynval
//!
//! A self-describing, dynamically typed value format. Values are trees of scalars, arrays
//! and objects that live either in memory, as a [`Dynamic`], or packed into one contiguous
//! byte string with constant-time access to the children of every container.
//!
//! # Usage
//!
//! Text is read with [`parse`], packed with [`pack`], and printed back with [`to_text`].
//!
//! ```
//! use dynval::prelude::*;
//!
//! // duplicate keys keep the last value
//! let value = parse(r#"{"b": 2, "a": 1, "b": 3}"#).unwrap();
//!
//! // pack into the binary layout
//! let packed = pack(&value).unwrap();
//!
//! // and print it straight from the packed bytes
//! assert_eq!(to_text(&packed).unwrap(), r#"{"a": 1, "b": 3}"#);
//!
//! // unpacking gives back the same tree
//! assert_eq!(unpack(&packed).unwrap(), value);
//! ```
//!
//! # An overview of dynamic types
//!
//! ## Scalars
//!
//! Besides the JSON scalars (null, booleans, strings and numbers) a value can hold
//! 64-bit integers and floats, arbitrary precision [`Numeric`](numeric::Numeric)s, dates and
//! times, network addresses, geometric shapes, text-search documents and queries, ranges
//! and byte strings. See [`Scalar`] and [`Kind`].
//!
//! In text, a scalar may carry a `::kind` annotation that selects the kind it is read as:
//!
//! ```
//! use dynval::prelude::*;
//!
//! let v = parse(r#"["2020-01-01"::date, "3.10"::numeric, 10.0.0.0/8::cidr]"#).unwrap();
//!
//! let kinds: Vec<Kind> = v.to_vec().unwrap().iter().map(|d| d.kind()).collect();
//! assert_eq!(kinds, vec![Kind::Date, Kind::Numeric, Kind::Cidr]);
//! ```
//!
//! ## Arrays
//!
//! Arrays are sequences of values.
//!
//! ```
//! use dynval::prelude::*;
//!
//! let some_numbers = Dynamic::from(vec![1, 2, 3, 4, 5]);
//! ```
//!
//! ## Objects
//!
//! Objects map string [`Key`]s to values. Keys are kept unique and sorted, shorter keys
//! first.
//!
//! ```
//! use dynval::prelude::*;
//!
//! let obj = Dynamic::object(vec![("bb", 1.into()), ("a", 2.into())]);
//!
//! let keys: Vec<&Key> = obj.to_object().unwrap().keys().collect();
//! assert_eq!(keys, vec![&Key::from("a"), &Key::from("bb")]);
//! ```
//!
//! # Packed layout
//!
//! A packed value starts with a 4-byte little-endian size word counting itself, followed
//! by the root container. A container is a header word (flags and count), one entry word
//! per child (keys then values for objects), then the children's payloads. Every 32nd
//! entry word stores an end offset, the others store lengths, so any child is found by
//! scanning at most 32 entries. See [`encoding`] for details.
//!
//! # Operations
//!
//! The [`algebra`] module compares, hashes and tests containment of packed values, and
//! implements arithmetic and the other operators over scalars.

#![warn(
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_debug_implementations,
    macro_use_extern_crate,
    trivial_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]

pub mod algebra;
pub mod builder;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod geometric;
pub mod gin;
pub mod network;
pub mod numeric;
pub mod parser;
pub mod prelude;
pub mod printer;
pub mod range;
pub mod scalar;
pub mod temporal;
pub mod textsearch;
pub mod util;
pub mod vecmap;
pub mod wire;

pub use encoding::{de::unpack, de::unpack_with, ser::pack, ser::pack_with};
pub use parser::{parse, parse_with};
pub use printer::{to_text, to_text_indent, to_text_with};

use bytes::Bytes;
use config::KeyCollation;
use failure::*;
use numeric::Numeric;
use scalar::{Kind, Scalar};
use std::{cmp::Ordering, fmt};
use vecmap::VecMap;

#[derive(Clone, PartialEq, Eq, Hash)]
/// An object key.
///
/// Keys order shorter first, then byte-wise, which is the order packed objects store
/// them in.
///
/// # Example
///
/// ```
/// use dynval::prelude::*;
///
/// assert!(Key::from("z") < Key::from("aa"));
/// ```
pub struct Key(pub Bytes);

impl Key {
    /// The key's bytes.
    pub fn as_bytes(&self) -> &[u8] { &self.0 }
}

impl Ord for Key {
    fn cmp(&self, other: &Key) -> Ordering { KeyCollation::LengthThenBytes.compare(&self.0, &other.0) }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Key) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

from_fn!(Key, Bytes, Key);
from_fn!(Key, &str, |s: &str| Key(Bytes::from(s)));
from_fn!(Key, String, |s: String| Key(Bytes::from(s)));
from_fn!(Key, &[u8], |s: &[u8]| Key(Bytes::from(s)));

#[derive(Clone, PartialEq, Debug)]
/// An in-memory dynamic value.
///
/// # Example
///
/// ```
/// use dynval::prelude::*;
///
/// let b = Dynamic::from(true);
///
/// let val = match b {
///     Dynamic::Scalar(Scalar::Bool(b)) => b,
///     _ => panic!(),
/// };
///
/// assert!(val);
/// ```
pub enum Dynamic {
    /// A scalar.
    ///
    /// # Example
    ///
    /// ```
    /// use dynval::prelude::*;
    ///
    /// let d_null = Dynamic::Scalar(Scalar::Null);
    /// ```
    Scalar(Scalar),
    /// An array.
    ///
    /// # Example
    ///
    /// ```
    /// use dynval::prelude::*;
    ///
    /// let d_array = Dynamic::Array(vec![1.into(), "two".into()]);
    /// ```
    Array(Vec<Dynamic>),
    /// An object.
    ///
    /// # Example
    ///
    /// ```
    /// use dynval::prelude::*;
    ///
    /// let vmap = VecMap::from(vec![(Key::from("hello world"), Dynamic::from(1))]);
    ///
    /// let d_obj = Dynamic::Object(vmap);
    /// ```
    Object(VecMap<Key, Dynamic>),
}

impl Dynamic {
    /// Null.
    pub fn null() -> Dynamic { Dynamic::Scalar(Scalar::Null) }

    /// Builds an object from pairs in insertion order; later duplicates win.
    pub fn object<K: Into<Key>>(pairs: Vec<(K, Dynamic)>) -> Dynamic {
        Dynamic::Object(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The kind of the value.
    pub fn kind(&self) -> Kind {
        match self {
            Dynamic::Scalar(s) => s.kind(),
            Dynamic::Array(_) => Kind::Array,
            Dynamic::Object(_) => Kind::Object,
        }
    }

    /// Indicates whether the value is a null scalar.
    pub fn is_null(&self) -> bool {
        match self {
            Dynamic::Scalar(Scalar::Null) => true,
            _ => false,
        }
    }

    /// Borrows the scalar.
    /// This will return an [`Error`] if the value is a container.
    pub fn to_scalar(&self) -> Result<&Scalar, Error> {
        match self {
            Dynamic::Scalar(s) => Ok(s),
            _ => bail!("This value is not a `Scalar`"),
        }
    }

    /// Borrows the elements.
    /// This will return an [`Error`] if the value is not an [`Dynamic::Array`].
    ///
    /// # Example
    ///
    /// ```
    /// use dynval::prelude::*;
    ///
    /// let d = Dynamic::from(vec![1, 2, 3]);
    ///
    /// assert_eq!(d.to_vec().unwrap().len(), 3);
    /// ```
    pub fn to_vec(&self) -> Result<&Vec<Dynamic>, Error> {
        match self {
            Dynamic::Array(a) => Ok(a),
            _ => bail!("This value is not an `Array`"),
        }
    }

    /// Consumes the value, returning its elements.
    /// This will return an [`Error`] if the value is not an [`Dynamic::Array`].
    pub fn into_vec(self) -> Result<Vec<Dynamic>, Error> {
        match self {
            Dynamic::Array(a) => Ok(a),
            _ => bail!("This value is not an `Array`"),
        }
    }

    /// Borrows the pairs.
    /// This will return an [`Error`] if the value is not an [`Dynamic::Object`].
    pub fn to_object(&self) -> Result<&VecMap<Key, Dynamic>, Error> {
        match self {
            Dynamic::Object(o) => Ok(o),
            _ => bail!("This value is not an `Object`"),
        }
    }

    /// Consumes the value, returning its pairs.
    /// This will return an [`Error`] if the value is not an [`Dynamic::Object`].
    pub fn into_object(self) -> Result<VecMap<Key, Dynamic>, Error> {
        match self {
            Dynamic::Object(o) => Ok(o),
            _ => bail!("This value is not an `Object`"),
        }
    }

    /// Looks up a key of an object.
    ///
    /// # Example
    ///
    /// ```
    /// use dynval::prelude::*;
    ///
    /// let d = parse(r#"{"a": [1]}"#).unwrap();
    ///
    /// assert_eq!(d.get("a"), Some(&Dynamic::from(vec![1])));
    /// assert_eq!(d.get("b"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&Dynamic> {
        match self {
            Dynamic::Object(o) => o.get(&Key::from(key)),
            _ => None,
        }
    }
}

from_fn!(Dynamic, Scalar, Dynamic::Scalar);
from_fn!(Dynamic, bool, |b| Dynamic::Scalar(Scalar::Bool(b)));
from_fn!(Dynamic, i64, |i| Dynamic::Scalar(Scalar::Integer(i)));
from_fn!(Dynamic, f64, |f| Dynamic::Scalar(Scalar::Float(f)));
from_fn!(Dynamic, &str, |s| Dynamic::Scalar(Scalar::string(s)));
from_fn!(Dynamic, String, |s: String| Dynamic::Scalar(Scalar::String(Bytes::from(s))));
from_fn!(Dynamic, Numeric, |n: Numeric| Dynamic::Scalar(Scalar::from_numeric(&n)));
from_fn!(Dynamic, VecMap<Key, Dynamic>, Dynamic::Object);
from_as!(Dynamic, i8, i64);
from_as!(Dynamic, i16, i64);
from_as!(Dynamic, i32, i64);
from_as!(Dynamic, u8, i64);
from_as!(Dynamic, u16, i64);
from_as!(Dynamic, u32, i64);
from_as!(Dynamic, f32, f64);

impl<T: Into<Dynamic>> From<Vec<T>> for Dynamic {
    fn from(v: Vec<T>) -> Dynamic { Dynamic::Array(v.into_iter().map(Into::into).collect()) }
}

impl<T: Into<Dynamic>> From<Option<T>> for Dynamic {
    fn from(o: Option<T>) -> Dynamic {
        match o {
            Some(t) => t.into(),
            None => Dynamic::null(),
        }
    }
}
