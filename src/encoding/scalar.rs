//! Payload codec for scalar entries.
//!
//! Strings are stored as their bytes, booleans and null in the entry word alone. A numeric
//! payload is a length word (`4 + body length`) followed by the body. Every other kind is
//! *extended*: a tag word, then either the kind's fixed-size body or, for variable-sized
//! kinds, a length word and the body.

use super::{constants::*, ser::*};
use crate::{
    errors::DynError,
    geometric::{Circle, GeoBox, Line, Lseg, Point, BOX_SIZE, CIRCLE_SIZE, LINE_SIZE, LSEG_SIZE, POINT_SIZE},
    network::{Inet, INET_SIZE},
    range::RangeKind,
    scalar::{Kind, Scalar, ScalarRef},
    temporal::{Interval, TimeTz},
    util::*,
};
use failure::Error;

/// Entry type bits for a scalar.
pub(crate) fn entry_type<B>(s: &Scalar<B>) -> u32 {
    match s {
        Scalar::String(_) => JE_STRING,
        Scalar::Numeric(_) => JE_NUMERIC,
        Scalar::Bool(false) => JE_FALSE,
        Scalar::Bool(true) => JE_TRUE,
        Scalar::Null => JE_NULL,
        _ => JE_EXTENDED,
    }
}

/// Whether a payload of these entry type bits starts on a 4-byte boundary.
#[inline]
pub(crate) fn is_aligned_type(entry_type: u32) -> bool {
    match entry_type {
        JE_NUMERIC | JE_CONTAINER | JE_EXTENDED => true,
        _ => false,
    }
}

/// Tag word of an extended kind, or `None` for the kinds stored without one.
///
/// # Example
///
/// ```
/// use dynval::{encoding::scalar::extended_tag, range::RangeKind, scalar::Kind};
///
/// assert_eq!(extended_tag(Kind::Integer), Some(0));
/// assert_eq!(extended_tag(Kind::Range(RangeKind::Date)), Some(0x1E));
/// assert_eq!(extended_tag(Kind::String), None);
/// ```
pub fn extended_tag(kind: Kind) -> Option<u32> {
    Some(match kind {
        Kind::Integer => TAG_INTEGER,
        Kind::Float => TAG_FLOAT,
        Kind::Timestamp => TAG_TIMESTAMP,
        Kind::TimestampTz => TAG_TIMESTAMPTZ,
        Kind::Date => TAG_DATE,
        Kind::Time => TAG_TIME,
        Kind::TimeTz => TAG_TIMETZ,
        Kind::Interval => TAG_INTERVAL,
        Kind::Inet => TAG_INET,
        Kind::Cidr => TAG_CIDR,
        Kind::Mac => TAG_MAC,
        Kind::Mac8 => TAG_MAC8,
        Kind::Point => TAG_POINT,
        Kind::Path => TAG_PATH,
        Kind::Lseg => TAG_LSEG,
        Kind::Line => TAG_LINE,
        Kind::Polygon => TAG_POLYGON,
        Kind::Circle => TAG_CIRCLE,
        Kind::Box => TAG_BOX,
        Kind::TsVector => TAG_TSVECTOR,
        Kind::TsQuery => TAG_TSQUERY,
        Kind::Range(k) => TAG_RANGE + k.index(),
        Kind::Multirange(k) => TAG_MULTIRANGE + k.index(),
        Kind::Bytea => TAG_BYTEA,
        _ => return None,
    })
}

/// Writes a scalar's payload, without alignment padding.
pub(crate) fn encode_payload<B: AsRef<[u8]>, S: Serializer>(s: &Scalar<B>, out: &mut S) {
    match s {
        Scalar::Null | Scalar::Bool(_) => {}
        Scalar::String(b) => out.put_slice(b.as_ref()),
        Scalar::Numeric(b) => out.put_varlen(b.as_ref()),
        other => {
            // every remaining kind has a tag
            if let Some(tag) = extended_tag(other.kind()) {
                out.put_u32(tag);
            }
            encode_extended_body(other, out);
        }
    }
}

fn encode_extended_body<B: AsRef<[u8]>, S: Serializer>(s: &Scalar<B>, out: &mut S) {
    match s {
        Scalar::Integer(i) => out.put_i64(*i),
        Scalar::Float(f) => out.put_f64(*f),
        Scalar::Timestamp(t) | Scalar::TimestampTz(t) | Scalar::Time(t) => out.put_i64(*t),
        Scalar::Date(d) => out.put_i32(*d),
        Scalar::TimeTz(t) => {
            out.put_i64(t.time);
            out.put_i32(t.zone);
        }
        Scalar::Interval(i) => {
            out.put_i64(i.time);
            out.put_i32(i.day);
            out.put_i32(i.month);
        }
        Scalar::Inet(i) | Scalar::Cidr(i) => out.put_slice(&i.to_bytes()),
        Scalar::Mac(m) => out.put_slice(m),
        Scalar::Mac8(m) => out.put_slice(m),
        Scalar::Point(p) => out.put_slice(&p.to_bytes()),
        Scalar::Lseg(l) => out.put_slice(&l.to_bytes()),
        Scalar::Line(l) => out.put_slice(&l.to_bytes()),
        Scalar::Circle(c) => out.put_slice(&c.to_bytes()),
        Scalar::Box(b) => out.put_slice(&b.to_bytes()),
        Scalar::Path(b)
        | Scalar::Polygon(b)
        | Scalar::TsVector(b)
        | Scalar::TsQuery(b)
        | Scalar::Range(_, b)
        | Scalar::Multirange(_, b)
        | Scalar::Bytea(b) => out.put_varlen(b.as_ref()),
        Scalar::Null | Scalar::Bool(_) | Scalar::String(_) | Scalar::Numeric(_) => {}
    }
}

/// Reads the body of a length-prefixed payload whose length word is at `at`.
fn varlen_body(p: &[u8], at: usize) -> Result<&[u8], Error> {
    let len = read_u32(p, at)? as usize;
    if len < 4 {
        return Err(DynError::TruncatedPayload { needed: 4, at, len: p.len() }.into());
    }
    read_slice(p, at + 4, len - 4)
}

/// Decodes a scalar payload. For aligned types `payload` must start past the padding.
pub(crate) fn decode_payload(entry_type: u32, payload: &[u8]) -> Result<ScalarRef, Error> {
    Ok(match entry_type {
        JE_STRING => Scalar::String(payload),
        JE_NUMERIC => Scalar::Numeric(varlen_body(payload, 0)?),
        JE_FALSE => Scalar::Bool(false),
        JE_TRUE => Scalar::Bool(true),
        JE_NULL => Scalar::Null,
        _ => decode_extended(payload)?,
    })
}

/// Decodes an extended payload, starting at its tag word.
///
/// Variable-sized bodies are borrowed from `payload`.
pub fn decode_extended(payload: &[u8]) -> Result<ScalarRef, Error> {
    let tag = read_u32(payload, 0)?;
    let fixed = |len: usize| read_slice(payload, 4, len);
    Ok(match tag {
        TAG_INTEGER => Scalar::Integer(read_i64(payload, 4)?),
        TAG_FLOAT => Scalar::Float(read_f64(payload, 4)?),
        TAG_TIMESTAMP => Scalar::Timestamp(read_i64(payload, 4)?),
        TAG_TIMESTAMPTZ => Scalar::TimestampTz(read_i64(payload, 4)?),
        TAG_DATE => Scalar::Date(read_i32(payload, 4)?),
        TAG_TIME => Scalar::Time(read_i64(payload, 4)?),
        TAG_TIMETZ => Scalar::TimeTz(TimeTz { time: read_i64(payload, 4)?, zone: read_i32(payload, 12)? }),
        TAG_INTERVAL => Scalar::Interval(Interval {
            time: read_i64(payload, 4)?,
            day: read_i32(payload, 12)?,
            month: read_i32(payload, 16)?,
        }),
        TAG_INET => Scalar::Inet(Inet::from_bytes(fixed(INET_SIZE)?)?),
        TAG_CIDR => Scalar::Cidr(Inet::from_bytes(fixed(INET_SIZE)?)?),
        TAG_MAC => {
            let mut m = [0u8; 6];
            m.copy_from_slice(fixed(6)?);
            Scalar::Mac(m)
        }
        TAG_MAC8 => {
            let mut m = [0u8; 8];
            m.copy_from_slice(fixed(8)?);
            Scalar::Mac8(m)
        }
        TAG_POINT => Scalar::Point(Point::from_bytes(fixed(POINT_SIZE)?)?),
        TAG_LSEG => Scalar::Lseg(Lseg::from_bytes(fixed(LSEG_SIZE)?)?),
        TAG_LINE => Scalar::Line(Line::from_bytes(fixed(LINE_SIZE)?)?),
        TAG_CIRCLE => Scalar::Circle(Circle::from_bytes(fixed(CIRCLE_SIZE)?)?),
        TAG_BOX => Scalar::Box(GeoBox::from_bytes(fixed(BOX_SIZE)?)?),
        TAG_PATH => Scalar::Path(varlen_body(payload, 4)?),
        TAG_POLYGON => Scalar::Polygon(varlen_body(payload, 4)?),
        TAG_TSVECTOR => Scalar::TsVector(varlen_body(payload, 4)?),
        TAG_TSQUERY => Scalar::TsQuery(varlen_body(payload, 4)?),
        TAG_BYTEA => Scalar::Bytea(varlen_body(payload, 4)?),
        t if t >= TAG_RANGE && t < TAG_MULTIRANGE => {
            Scalar::Range(range_kind(t - TAG_RANGE)?, varlen_body(payload, 4)?)
        }
        t if t >= TAG_MULTIRANGE && t < TAG_BYTEA => {
            Scalar::Multirange(range_kind(t - TAG_MULTIRANGE)?, varlen_body(payload, 4)?)
        }
        t => return Err(DynError::UnknownExtendedTag { tag: t }.into()),
    })
}

fn range_kind(index: u32) -> Result<RangeKind, Error> {
    RangeKind::from_index(index).ok_or_else(|| DynError::UnknownExtendedTag { tag: index }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;

    fn encoded(s: &Scalar) -> Vec<u8> {
        let mut out = Vec::new();
        encode_payload(s, &mut out);
        out
    }

    #[test]
    fn fixed_layouts() {
        assert_eq!(encoded(&Scalar::Integer(-2)), vec![
            0, 0, 0, 0, // tag
            0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        ]);
        assert_eq!(encoded(&Scalar::Date(1)), vec![4, 0, 0, 0, 1, 0, 0, 0]);
        let interval = Scalar::Interval(Interval { time: 1, day: 2, month: 3 });
        assert_eq!(encoded(&interval).len(), 4 + 16);
        assert_eq!(encoded(&Scalar::Mac([1, 2, 3, 4, 5, 6])), vec![0x0b, 0, 0, 0, 1, 2, 3, 4, 5, 6]);
        assert!(encoded(&Scalar::Null).is_empty());
        assert_eq!(encoded(&Scalar::string("ab")), b"ab".to_vec());
    }

    #[test]
    fn variable_layouts() {
        let b = Scalar::Bytea(bytes::Bytes::from(vec![7u8, 8]));
        assert_eq!(encoded(&b), vec![
            0x24, 0, 0, 0, // tag
            6, 0, 0, 0, // length word
            7, 8,
        ]);
        let n = Scalar::from_numeric(&"1".parse().unwrap());
        let bytes = encoded(&n);
        assert_eq!(bytes[0] as usize, bytes.len());
    }

    #[test]
    fn decode_round_trip() {
        let samples = vec![
            Scalar::Float(1.5),
            Scalar::TimeTz(TimeTz { time: 5, zone: -3600 }),
            Scalar::parse_as(Kind::Cidr, "10.0.0.0/8").unwrap(),
            Scalar::parse_as(Kind::Polygon, "((0,0),(1,0),(0,1))").unwrap(),
            Scalar::parse_as(Kind::Multirange(RangeKind::Num), "{[1,2)}").unwrap(),
            Scalar::parse_as(Kind::Box, "(1,1),(0,0)").unwrap(),
        ];
        for s in samples {
            let bytes = encoded(&s);
            let back = decode_payload(entry_type(&s), &bytes).unwrap();
            assert_eq!(back.to_scalar(), s);
        }
    }

    #[test]
    fn corrupt_payloads() {
        let err = decode_extended(&[0x08, 0, 0, 0]).unwrap_err();
        assert_eq!(err.downcast_ref::<DynError>(), Some(&DynError::UnknownExtendedTag { tag: 8 }));
        assert!(decode_extended(&[0, 0, 0, 0, 1]).is_err());
        assert!(decode_extended(&[0x24, 0, 0, 0, 9, 0, 0, 0, 1]).is_err());
    }
}
