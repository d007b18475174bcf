//! Scalar values and their kinds.
//!
//! [`Scalar`] is generic over the buffer holding variable-length payloads. Owned scalars,
//! as found in a [`Dynamic`](crate::Dynamic) tree, use [`Bytes`]; scalars read out of a
//! packed datum are [`ScalarRef`]s borrowing the datum.
//!
//! Variable-length kinds keep their packed body rather than a decoded value, so reading a
//! scalar out of a datum never copies. The kind modules decode bodies on demand.
//!
//! # Example
//!
//! ```
//! use dynval::prelude::*;
//!
//! let s = Scalar::parse_as(Kind::Interval, "1 day 02:00:00").unwrap();
//!
//! assert_eq!(s.kind(), Kind::Interval);
//! assert_eq!(s.text().unwrap(), "1 day 02:00:00");
//! ```

use crate::{
    errors::DynError,
    geometric::{self, Circle, GeoBox, Line, Lseg, Path, Point, Polygon},
    network::{self, Inet},
    numeric::Numeric,
    range::{Multirange, Range, RangeKind},
    temporal::{self, Interval, TimeTz},
    textsearch::{TsQuery, TsVector},
    util::{format_f64, hex_value, to_hex, utf8},
};
use bytes::Bytes;
use failure::Error;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq)]
/// A scalar value.
pub enum Scalar<B = Bytes> {
    Null,
    Bool(bool),
    /// Any bytes; printing and text casts require UTF-8.
    String(B),
    /// Packed [`Numeric`] body.
    Numeric(B),
    Integer(i64),
    Float(f64),
    /// Microseconds since 2000-01-01.
    Timestamp(i64),
    /// Microseconds since 2000-01-01 UTC.
    TimestampTz(i64),
    /// Days since 2000-01-01.
    Date(i32),
    /// Microseconds since midnight.
    Time(i64),
    TimeTz(TimeTz),
    Interval(Interval),
    Inet(Inet),
    Cidr(Inet),
    Mac([u8; 6]),
    Mac8([u8; 8]),
    Point(Point),
    Lseg(Lseg),
    Line(Line),
    /// Packed [`Path`] body.
    Path(B),
    /// Packed [`Polygon`] body.
    Polygon(B),
    Circle(Circle),
    Box(GeoBox),
    /// Canonical `tsvector` text.
    TsVector(B),
    /// Canonical `tsquery` text.
    TsQuery(B),
    /// Packed [`Range`] body.
    Range(RangeKind, B),
    /// Packed [`Multirange`] body.
    Multirange(RangeKind, B),
    Bytea(B),
}

/// A scalar borrowing its payload from a packed datum.
pub type ScalarRef<'a> = Scalar<&'a [u8]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The kind of a value, used for dispatch, ordering and error messages.
pub enum Kind {
    Object,
    Array,
    Null,
    Bool,
    String,
    Numeric,
    Integer,
    Float,
    Timestamp,
    TimestampTz,
    Date,
    Time,
    TimeTz,
    Interval,
    Inet,
    Cidr,
    Mac,
    Mac8,
    Point,
    Lseg,
    Line,
    Path,
    Polygon,
    Circle,
    Box,
    TsVector,
    TsQuery,
    Range(RangeKind),
    Multirange(RangeKind),
    Bytea,
}

impl Kind {
    /// Type name as it appears in messages and annotations.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::String => "string",
            Kind::Numeric => "numeric",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Timestamp => "timestamp",
            Kind::TimestampTz => "timestamptz",
            Kind::Date => "date",
            Kind::Time => "time",
            Kind::TimeTz => "timetz",
            Kind::Interval => "interval",
            Kind::Inet => "inet",
            Kind::Cidr => "cidr",
            Kind::Mac => "macaddr",
            Kind::Mac8 => "macaddr8",
            Kind::Point => "point",
            Kind::Lseg => "lseg",
            Kind::Line => "line",
            Kind::Path => "path",
            Kind::Polygon => "polygon",
            Kind::Circle => "circle",
            Kind::Box => "box",
            Kind::TsVector => "tsvector",
            Kind::TsQuery => "tsquery",
            Kind::Range(k) => k.range_name(),
            Kind::Multirange(k) => k.multirange_name(),
            Kind::Bytea => "bytea",
        }
    }

    /// Rank used to order values of incomparable kinds; lower sorts first.
    ///
    /// Kinds that compare by value across each other (the numbers, the instants, the
    /// times of day) have adjacent ranks.
    pub fn priority(self) -> u32 {
        match self {
            Kind::Object => 0,
            Kind::Array => 1,
            Kind::String => 2,
            Kind::Bool => 3,
            Kind::Numeric | Kind::Integer | Kind::Float => 4,
            Kind::Timestamp | Kind::TimestampTz => 5,
            Kind::Date => 6,
            Kind::Time | Kind::TimeTz => 7,
            Kind::Interval => 8,
            Kind::Inet => 9,
            Kind::Cidr => 10,
            Kind::Mac => 11,
            Kind::Mac8 => 12,
            Kind::Point => 13,
            Kind::Lseg => 14,
            Kind::Line => 15,
            Kind::Path => 16,
            Kind::Polygon => 17,
            Kind::Circle => 18,
            Kind::Box => 19,
            Kind::TsVector => 20,
            Kind::TsQuery => 21,
            Kind::Range(k) => 22 + k.index(),
            Kind::Multirange(k) => 27 + k.index(),
            Kind::Bytea => 32,
            Kind::Null => 33,
        }
    }

    /// Looks up an annotation name, ignoring case.
    pub fn from_annotation(name: &str) -> Option<Kind> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "numeric" => Kind::Numeric,
            "integer" => Kind::Integer,
            "float" => Kind::Float,
            "timestamp" => Kind::Timestamp,
            "timestamptz" => Kind::TimestampTz,
            "date" => Kind::Date,
            "time" => Kind::Time,
            "timetz" => Kind::TimeTz,
            "interval" => Kind::Interval,
            "inet" => Kind::Inet,
            "cidr" => Kind::Cidr,
            "macaddr" => Kind::Mac,
            "macaddr8" => Kind::Mac8,
            _ => return None,
        };
        Some(kind)
    }
}

impl<B: AsRef<[u8]>> Scalar<B> {
    /// The kind of this scalar.
    pub fn kind(&self) -> Kind {
        match self {
            Scalar::Null => Kind::Null,
            Scalar::Bool(_) => Kind::Bool,
            Scalar::String(_) => Kind::String,
            Scalar::Numeric(_) => Kind::Numeric,
            Scalar::Integer(_) => Kind::Integer,
            Scalar::Float(_) => Kind::Float,
            Scalar::Timestamp(_) => Kind::Timestamp,
            Scalar::TimestampTz(_) => Kind::TimestampTz,
            Scalar::Date(_) => Kind::Date,
            Scalar::Time(_) => Kind::Time,
            Scalar::TimeTz(_) => Kind::TimeTz,
            Scalar::Interval(_) => Kind::Interval,
            Scalar::Inet(_) => Kind::Inet,
            Scalar::Cidr(_) => Kind::Cidr,
            Scalar::Mac(_) => Kind::Mac,
            Scalar::Mac8(_) => Kind::Mac8,
            Scalar::Point(_) => Kind::Point,
            Scalar::Lseg(_) => Kind::Lseg,
            Scalar::Line(_) => Kind::Line,
            Scalar::Path(_) => Kind::Path,
            Scalar::Polygon(_) => Kind::Polygon,
            Scalar::Circle(_) => Kind::Circle,
            Scalar::Box(_) => Kind::Box,
            Scalar::TsVector(_) => Kind::TsVector,
            Scalar::TsQuery(_) => Kind::TsQuery,
            Scalar::Range(k, _) => Kind::Range(*k),
            Scalar::Multirange(k, _) => Kind::Multirange(*k),
            Scalar::Bytea(_) => Kind::Bytea,
        }
    }

    /// Borrows the payload.
    pub fn to_ref(&self) -> ScalarRef {
        match self {
            Scalar::Null => Scalar::Null,
            Scalar::Bool(b) => Scalar::Bool(*b),
            Scalar::String(s) => Scalar::String(s.as_ref()),
            Scalar::Numeric(n) => Scalar::Numeric(n.as_ref()),
            Scalar::Integer(i) => Scalar::Integer(*i),
            Scalar::Float(f) => Scalar::Float(*f),
            Scalar::Timestamp(t) => Scalar::Timestamp(*t),
            Scalar::TimestampTz(t) => Scalar::TimestampTz(*t),
            Scalar::Date(d) => Scalar::Date(*d),
            Scalar::Time(t) => Scalar::Time(*t),
            Scalar::TimeTz(t) => Scalar::TimeTz(*t),
            Scalar::Interval(i) => Scalar::Interval(*i),
            Scalar::Inet(i) => Scalar::Inet(*i),
            Scalar::Cidr(i) => Scalar::Cidr(*i),
            Scalar::Mac(m) => Scalar::Mac(*m),
            Scalar::Mac8(m) => Scalar::Mac8(*m),
            Scalar::Point(p) => Scalar::Point(*p),
            Scalar::Lseg(l) => Scalar::Lseg(*l),
            Scalar::Line(l) => Scalar::Line(*l),
            Scalar::Path(b) => Scalar::Path(b.as_ref()),
            Scalar::Polygon(b) => Scalar::Polygon(b.as_ref()),
            Scalar::Circle(c) => Scalar::Circle(*c),
            Scalar::Box(b) => Scalar::Box(*b),
            Scalar::TsVector(b) => Scalar::TsVector(b.as_ref()),
            Scalar::TsQuery(b) => Scalar::TsQuery(b.as_ref()),
            Scalar::Range(k, b) => Scalar::Range(*k, b.as_ref()),
            Scalar::Multirange(k, b) => Scalar::Multirange(*k, b.as_ref()),
            Scalar::Bytea(b) => Scalar::Bytea(b.as_ref()),
        }
    }

    /// Copies the payload into an owned scalar.
    pub fn to_scalar(&self) -> Scalar {
        let own = |b: &B| Bytes::from(b.as_ref());
        match self {
            Scalar::String(s) => Scalar::String(own(s)),
            Scalar::Numeric(n) => Scalar::Numeric(own(n)),
            Scalar::Path(b) => Scalar::Path(own(b)),
            Scalar::Polygon(b) => Scalar::Polygon(own(b)),
            Scalar::TsVector(b) => Scalar::TsVector(own(b)),
            Scalar::TsQuery(b) => Scalar::TsQuery(own(b)),
            Scalar::Range(k, b) => Scalar::Range(*k, own(b)),
            Scalar::Multirange(k, b) => Scalar::Multirange(*k, own(b)),
            Scalar::Bytea(b) => Scalar::Bytea(own(b)),
            Scalar::Null => Scalar::Null,
            Scalar::Bool(b) => Scalar::Bool(*b),
            Scalar::Integer(i) => Scalar::Integer(*i),
            Scalar::Float(f) => Scalar::Float(*f),
            Scalar::Timestamp(t) => Scalar::Timestamp(*t),
            Scalar::TimestampTz(t) => Scalar::TimestampTz(*t),
            Scalar::Date(d) => Scalar::Date(*d),
            Scalar::Time(t) => Scalar::Time(*t),
            Scalar::TimeTz(t) => Scalar::TimeTz(*t),
            Scalar::Interval(i) => Scalar::Interval(*i),
            Scalar::Inet(i) => Scalar::Inet(*i),
            Scalar::Cidr(i) => Scalar::Cidr(*i),
            Scalar::Mac(m) => Scalar::Mac(*m),
            Scalar::Mac8(m) => Scalar::Mac8(*m),
            Scalar::Point(p) => Scalar::Point(*p),
            Scalar::Lseg(l) => Scalar::Lseg(*l),
            Scalar::Line(l) => Scalar::Line(*l),
            Scalar::Circle(c) => Scalar::Circle(*c),
            Scalar::Box(b) => Scalar::Box(*b),
        }
    }

    /// Decodes a numeric payload.
    pub fn numeric(&self) -> Option<Result<Numeric, Error>> {
        match self {
            Scalar::Numeric(b) => Some(Numeric::from_body(b.as_ref())),
            _ => None,
        }
    }

    /// The kind's canonical text form, as used for printing and index keys.
    ///
    /// Strings are returned as-is, without quotes or escapes.
    pub fn text(&self) -> Result<String, Error> {
        Ok(match self {
            Scalar::Null => "null".into(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::String(s) => utf8(s.as_ref())?.to_string(),
            Scalar::Numeric(n) => Numeric::from_body(n.as_ref())?.to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => format_f64(*f, true),
            Scalar::Timestamp(t) => temporal::format_timestamp(*t),
            Scalar::TimestampTz(t) => temporal::format_timestamptz(*t),
            Scalar::Date(d) => temporal::format_date(*d),
            Scalar::Time(t) => temporal::format_time(*t),
            Scalar::TimeTz(t) => temporal::format_timetz(t),
            Scalar::Interval(i) => i.to_string(),
            Scalar::Inet(i) | Scalar::Cidr(i) => i.to_string(),
            Scalar::Mac(m) => network::format_mac(m),
            Scalar::Mac8(m) => network::format_mac(m),
            Scalar::Point(p) => p.to_string(),
            Scalar::Lseg(l) => l.to_string(),
            Scalar::Line(l) => l.to_string(),
            Scalar::Path(b) => Path::from_body(b.as_ref())?.to_string(),
            Scalar::Polygon(b) => Polygon::from_body(b.as_ref())?.to_string(),
            Scalar::Circle(c) => c.to_string(),
            Scalar::Box(b) => b.to_string(),
            Scalar::TsVector(b) | Scalar::TsQuery(b) => utf8(b.as_ref())?.to_string(),
            Scalar::Range(k, b) => Range::from_body(*k, b.as_ref())?.to_string(),
            Scalar::Multirange(k, b) => Multirange::from_body(*k, b.as_ref())?.to_string(),
            Scalar::Bytea(b) => format!("\\x{}", to_hex(b.as_ref())),
        })
    }
}

impl<'a> ScalarRef<'a> {
    /// The string payload, if this is a string.
    pub fn as_str_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Scalar {
    /// A string scalar.
    pub fn string(s: &str) -> Scalar { Scalar::String(Bytes::from(s)) }

    /// A numeric scalar.
    pub fn from_numeric(n: &Numeric) -> Scalar { Scalar::Numeric(Bytes::from(n.to_body())) }

    pub fn from_path(p: &Path) -> Scalar { Scalar::Path(Bytes::from(p.to_body())) }

    pub fn from_polygon(p: &Polygon) -> Scalar { Scalar::Polygon(Bytes::from(p.to_body())) }

    pub fn from_range(r: &Range) -> Scalar { Scalar::Range(r.kind, Bytes::from(r.to_body())) }

    pub fn from_multirange(m: &Multirange) -> Scalar {
        Scalar::Multirange(m.kind, Bytes::from(m.to_body()))
    }

    pub fn from_tsvector(v: &TsVector) -> Scalar { Scalar::TsVector(Bytes::from(v.to_string())) }

    pub fn from_tsquery(q: &TsQuery) -> Scalar { Scalar::TsQuery(Bytes::from(q.to_string())) }

    /// Reads `text` with the textual parser of `kind`.
    ///
    /// Containers cannot be parsed this way and fail with [`DynError::CannotCast`].
    pub fn parse_as(kind: Kind, text: &str) -> Result<Scalar, Error> {
        Ok(match kind {
            Kind::String => Scalar::string(text),
            Kind::Numeric => Scalar::from_numeric(&Numeric::from_str(text)?),
            Kind::Integer => Scalar::Integer(
                text.trim()
                    .parse()
                    .map_err(|_| DynError::invalid_text("integer", text))?,
            ),
            Kind::Float => Scalar::Float(parse_float(text)?),
            Kind::Bool => Scalar::Bool(parse_bool(text)?),
            Kind::Timestamp => Scalar::Timestamp(temporal::parse_timestamp(text)?),
            Kind::TimestampTz => Scalar::TimestampTz(temporal::parse_timestamptz(text)?),
            Kind::Date => Scalar::Date(temporal::parse_date(text)?),
            Kind::Time => Scalar::Time(temporal::parse_time(text)?),
            Kind::TimeTz => Scalar::TimeTz(temporal::parse_timetz(text)?),
            Kind::Interval => Scalar::Interval(temporal::parse_interval(text)?),
            Kind::Inet => Scalar::Inet(Inet::parse_inet(text)?),
            Kind::Cidr => Scalar::Cidr(Inet::parse_cidr(text)?),
            Kind::Mac => Scalar::Mac(network::parse_mac(text)?),
            Kind::Mac8 => Scalar::Mac8(network::parse_mac8(text)?),
            Kind::Point => Scalar::Point(geometric::parse_point(text)?),
            Kind::Lseg => Scalar::Lseg(geometric::parse_lseg(text)?),
            Kind::Line => Scalar::Line(geometric::parse_line(text)?),
            Kind::Path => Scalar::from_path(&geometric::parse_path(text)?),
            Kind::Polygon => Scalar::from_polygon(&geometric::parse_polygon(text)?),
            Kind::Circle => Scalar::Circle(geometric::parse_circle(text)?),
            Kind::Box => Scalar::Box(geometric::parse_box(text)?),
            Kind::TsVector => Scalar::from_tsvector(&TsVector::parse(text)?),
            Kind::TsQuery => Scalar::from_tsquery(&TsQuery::parse(text)?),
            Kind::Range(k) => Scalar::from_range(&Range::parse(k, text)?),
            Kind::Multirange(k) => Scalar::from_multirange(&Multirange::parse(k, text)?),
            Kind::Bytea => Scalar::Bytea(Bytes::from(parse_bytea(text)?)),
            Kind::Null if text.trim() == "null" => Scalar::Null,
            other => {
                return Err(DynError::CannotCast { from: Kind::String.name(), to: other.name() }.into())
            }
        })
    }
}

/// Accepts the literals of the float syntax, including `NaN` and `[-]inf[inity]`.
pub fn parse_float(text: &str) -> Result<f64, Error> {
    let t = text.trim();
    let (neg, body) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };
    let special = match body.to_ascii_lowercase().as_str() {
        "nan" => Some(std::f64::NAN),
        "inf" | "infinity" => Some(std::f64::INFINITY),
        _ => None,
    };
    if let Some(f) = special {
        return Ok(if neg { -f } else { f });
    }
    t.parse::<f64>().map_err(|_| DynError::invalid_text("float", text).into())
}

fn parse_bool(text: &str) -> Result<bool, Error> {
    match text.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "f" | "false" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(DynError::invalid_text("boolean", text).into()),
    }
}

/// Reads `\x` hex input, or the escape format where `\\` is a backslash and `\ooo` an
/// octal byte.
pub fn parse_bytea(text: &str) -> Result<Vec<u8>, Error> {
    let bad = || -> Error { DynError::invalid_text("bytea", text).into() };
    let b = text.as_bytes();
    if b.starts_with(b"\\x") {
        let digits: Vec<u8> = b[2..].iter().cloned().filter(|c| !c.is_ascii_whitespace()).collect();
        if digits.len() % 2 != 0 {
            return Err(bad());
        }
        return digits
            .chunks(2)
            .map(|p| match (hex_value(p[0]), hex_value(p[1])) {
                (Some(h), Some(l)) => Ok(h << 4 | l),
                _ => Err(bad()),
            })
            .collect();
    }
    let mut out = Vec::with_capacity(b.len());
    let mut i = 0;
    while i < b.len() {
        if b[i] != b'\\' {
            out.push(b[i]);
            i += 1;
        } else if b.get(i + 1) == Some(&b'\\') {
            out.push(b'\\');
            i += 2;
        } else {
            let oct = b.get(i + 1..i + 4).ok_or_else(bad)?;
            if !oct.iter().all(|c| (b'0'..=b'7').contains(c)) || oct[0] > b'3' {
                return Err(bad());
            }
            out.push(oct.iter().fold(0u8, |acc, c| acc * 8 + (c - b'0')));
            i += 4;
        }
    }
    Ok(out)
}
