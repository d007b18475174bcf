//! Typecasts out of packed values.
//!
//! Each `to_*` function takes a packed datum whose root is a scalar and converts it to a
//! native value. A scalar of the target kind is returned as-is; a string is read with the
//! target kind's textual parser; the numeric, temporal, network and MAC kinds also convert
//! between each other the way the host database does. Anything else fails with
//! [`DynError::CannotCast`].
//!
//! # Example
//!
//! ```
//! use dynval::{algebra::cast, prelude::*};
//!
//! let n = pack(&parse("2.5").unwrap()).unwrap();
//! let s = pack(&parse(r#""17""#).unwrap()).unwrap();
//!
//! assert_eq!(cast::to_integer(&n).unwrap(), 3);
//! assert_eq!(cast::to_integer(&s).unwrap(), 17);
//! assert!(cast::to_date(&n).is_err());
//! ```

use crate::{
    encoding::{container::ContainerRef, ser::pack},
    errors::DynError,
    geometric::{Circle, GeoBox, Line, Lseg, Path, Point, Polygon},
    network::{mac8_to_mac, mac_to_mac8, Inet},
    numeric::Numeric,
    range::{Multirange, Range, RangeKind},
    scalar::{parse_bytea, parse_float, Kind, Scalar, ScalarRef},
    temporal::{
        date_to_timestamp, timestamp_to_date, Interval, TimeTz, TIMESTAMP_NOBEGIN, TIMESTAMP_NOEND,
        USECS_PER_DAY,
    },
    textsearch::{TsQuery, TsVector},
    util::utf8,
    Dynamic,
};
use bytes::Bytes;
use failure::Error;
use std::str::FromStr;

/// The scalar at the root of a packed datum.
///
/// Fails with [`DynError::NotScalar`] when the root is an array or an object.
pub fn root_scalar<'a>(datum: &'a [u8], op: &'static str) -> Result<ScalarRef<'a>, Error> {
    let root = ContainerRef::root(datum)?;
    if !root.is_raw_scalar() {
        return Err(DynError::NotScalar { op }.into());
    }
    root.raw_scalar()?.ok_or_else(|| DynError::NotScalar { op }.into())
}

fn scalar(datum: &[u8]) -> Result<ScalarRef, Error> { root_scalar(datum, "typecast") }

fn cannot(s: &ScalarRef, to: &'static str) -> Error { DynError::CannotCast { from: s.kind().name(), to }.into() }


fn float_to_i64(f: f64) -> Result<i64, Error> {
    let r = f.round();
    // 2^63 is exactly representable, so the upper bound is exclusive
    if !r.is_finite() || r < -9.223_372_036_854_776e18 || r >= 9.223_372_036_854_776e18 {
        return Err(DynError::NumericOverflow { what: "bigint" }.into());
    }
    Ok(r as i64)
}

/// Converts an integer, float, numeric or string to `i64`, rounding half away from zero.
pub fn to_integer(datum: &[u8]) -> Result<i64, Error> { integer_of(&scalar(datum)?) }

pub(crate) fn integer_of(s: &ScalarRef) -> Result<i64, Error> {
    match s {
        Scalar::Integer(i) => Ok(*i),
        Scalar::Float(f) => float_to_i64(*f),
        Scalar::Numeric(b) => Numeric::from_body(b)?.to_i64(),
        Scalar::String(b) => {
            let t = utf8(b)?;
            t.trim()
                .parse()
                .map_err(|_| DynError::invalid_text("bigint", t).into())
        }
        other => Err(cannot(other, "bigint")),
    }
}

/// Converts an integer, float, numeric or string to `f64`.
pub fn to_float(datum: &[u8]) -> Result<f64, Error> { float_of(&scalar(datum)?) }

pub(crate) fn float_of(s: &ScalarRef) -> Result<f64, Error> {
    match s {
        Scalar::Float(f) => Ok(*f),
        Scalar::Integer(i) => Ok(*i as f64),
        Scalar::Numeric(b) => Ok(Numeric::from_body(b)?.to_f64()),
        Scalar::String(b) => parse_float(utf8(b)?),
        other => Err(cannot(other, "double precision")),
    }
}

/// Converts an integer, float, numeric or string to [`Numeric`].
pub fn to_numeric(datum: &[u8]) -> Result<Numeric, Error> { numeric_of(&scalar(datum)?) }

pub(crate) fn numeric_of(s: &ScalarRef) -> Result<Numeric, Error> {
    match s {
        Scalar::Numeric(b) => Numeric::from_body(b),
        Scalar::Integer(i) => Ok(Numeric::from(*i)),
        Scalar::Float(f) => Ok(Numeric::from_f64(*f)),
        Scalar::String(b) => Numeric::from_str(utf8(b)?),
        other => Err(cannot(other, "numeric")),
    }
}

/// Converts a boolean or a boolean literal such as `"true"` or `"off"`.
pub fn to_bool(datum: &[u8]) -> Result<bool, Error> {
    match scalar(datum)? {
        Scalar::Bool(b) => Ok(b),
        Scalar::String(b) => match Scalar::parse_as(Kind::Bool, utf8(b)?)? {
            Scalar::Bool(b) => Ok(b),
            _ => Err(DynError::invalid_text("boolean", utf8(b)?).into()),
        },
        other => Err(cannot(&other, "boolean")),
    }
}

/// The text form of any non-null scalar; strings come back unquoted.
pub fn to_text(datum: &[u8]) -> Result<String, Error> {
    match scalar(datum)? {
        Scalar::Null => Err(cannot(&Scalar::Null, "text")),
        other => other.text(),
    }
}

/// Converts a timestamp, timestamptz, date, integer (microseconds) or string.
pub fn to_timestamp(datum: &[u8]) -> Result<i64, Error> {
    match scalar(datum)? {
        Scalar::Timestamp(t) | Scalar::TimestampTz(t) | Scalar::Integer(t) => Ok(t),
        Scalar::Date(d) => Ok(date_to_timestamp(d)),
        Scalar::String(b) => crate::temporal::parse_timestamp(utf8(b)?),
        other => Err(cannot(&other, "timestamp")),
    }
}

/// Converts a timestamptz, timestamp, date, integer (microseconds) or string.
///
/// Timestamps without a zone are taken as UTC.
pub fn to_timestamptz(datum: &[u8]) -> Result<i64, Error> {
    match scalar(datum)? {
        Scalar::Timestamp(t) | Scalar::TimestampTz(t) | Scalar::Integer(t) => Ok(t),
        Scalar::Date(d) => Ok(date_to_timestamp(d)),
        Scalar::String(b) => crate::temporal::parse_timestamptz(utf8(b)?),
        other => Err(cannot(&other, "timestamptz")),
    }
}

/// Converts a date, timestamp, timestamptz or string to days since 2000-01-01.
pub fn to_date(datum: &[u8]) -> Result<i32, Error> {
    match scalar(datum)? {
        Scalar::Date(d) => Ok(d),
        Scalar::Timestamp(t) | Scalar::TimestampTz(t) => timestamp_to_date(t),
        Scalar::String(b) => crate::temporal::parse_date(utf8(b)?),
        other => Err(cannot(&other, "date")),
    }
}

fn time_of_day(us: i64, s: &ScalarRef, to: &'static str) -> Result<i64, Error> {
    if us == TIMESTAMP_NOBEGIN || us == TIMESTAMP_NOEND {
        return Err(cannot(s, to));
    }
    Ok(us.rem_euclid(USECS_PER_DAY))
}

/// Converts a time, timetz, timestamp, timestamptz, interval or string to microseconds
/// since midnight.
pub fn to_time(datum: &[u8]) -> Result<i64, Error> {
    let s = scalar(datum)?;
    match s {
        Scalar::Time(t) => Ok(t),
        Scalar::TimeTz(t) => Ok(t.time),
        Scalar::Timestamp(t) | Scalar::TimestampTz(t) => time_of_day(t, &s, "time"),
        Scalar::Interval(i) => Ok(i.time.rem_euclid(USECS_PER_DAY)),
        Scalar::String(b) => crate::temporal::parse_time(utf8(b)?),
        other => Err(cannot(&other, "time")),
    }
}

/// Converts a timetz, time, timestamptz or string. Times without a zone are taken as UTC.
pub fn to_timetz(datum: &[u8]) -> Result<TimeTz, Error> {
    let s = scalar(datum)?;
    match s {
        Scalar::TimeTz(t) => Ok(t),
        Scalar::Time(t) => Ok(TimeTz { time: t, zone: 0 }),
        Scalar::TimestampTz(t) => Ok(TimeTz { time: time_of_day(t, &s, "timetz")?, zone: 0 }),
        Scalar::String(b) => crate::temporal::parse_timetz(utf8(b)?),
        other => Err(cannot(&other, "timetz")),
    }
}

/// Converts an interval or string.
pub fn to_interval(datum: &[u8]) -> Result<Interval, Error> {
    match scalar(datum)? {
        Scalar::Interval(i) => Ok(i),
        Scalar::String(b) => crate::temporal::parse_interval(utf8(b)?),
        other => Err(cannot(&other, "interval")),
    }
}

pub(crate) fn inet_of(s: &ScalarRef) -> Result<Inet, Error> {
    match s {
        Scalar::Inet(i) | Scalar::Cidr(i) => Ok(i.with_cidr(false)),
        Scalar::String(b) => Inet::parse_inet(utf8(b)?),
        other => Err(cannot(other, "inet")),
    }
}

/// Converts an inet, cidr or string to an inet.
pub fn to_inet(datum: &[u8]) -> Result<Inet, Error> { inet_of(&scalar(datum)?) }

/// Converts a cidr, inet or string. An inet loses its host bits.
pub fn to_cidr(datum: &[u8]) -> Result<Inet, Error> {
    match scalar(datum)? {
        Scalar::Cidr(i) => Ok(i),
        Scalar::Inet(i) => Ok(i.network()),
        Scalar::String(b) => Inet::parse_cidr(utf8(b)?),
        other => Err(cannot(&other, "cidr")),
    }
}

/// Converts a macaddr, macaddr8 (which must carry `ff:fe` in the middle) or string.
pub fn to_macaddr(datum: &[u8]) -> Result<[u8; 6], Error> {
    match scalar(datum)? {
        Scalar::Mac(m) => Ok(m),
        Scalar::Mac8(m) => mac8_to_mac(&m),
        Scalar::String(b) => crate::network::parse_mac(utf8(b)?),
        other => Err(cannot(&other, "macaddr")),
    }
}

/// Converts a macaddr8, macaddr or string.
pub fn to_macaddr8(datum: &[u8]) -> Result<[u8; 8], Error> {
    match scalar(datum)? {
        Scalar::Mac8(m) => Ok(m),
        Scalar::Mac(m) => Ok(mac_to_mac8(&m)),
        Scalar::String(b) => crate::network::parse_mac8(utf8(b)?),
        other => Err(cannot(&other, "macaddr8")),
    }
}

/// Reads a string with the parser of `kind`, or fails naming `to`.
fn from_string(s: &ScalarRef, kind: Kind, to: &'static str) -> Result<Scalar, Error> {
    match s {
        Scalar::String(b) => Scalar::parse_as(kind, utf8(b)?),
        other => Err(cannot(other, to)),
    }
}

pub(crate) fn point_of(s: &ScalarRef) -> Result<Point, Error> {
    match s {
        Scalar::Point(p) => Ok(*p),
        other => match from_string(other, Kind::Point, "point")? {
            Scalar::Point(p) => Ok(p),
            _ => Err(cannot(other, "point")),
        },
    }
}

/// Converts a point or string.
pub fn to_point(datum: &[u8]) -> Result<Point, Error> { point_of(&scalar(datum)?) }

/// Converts an lseg or string.
pub fn to_lseg(datum: &[u8]) -> Result<Lseg, Error> {
    let s = scalar(datum)?;
    match s {
        Scalar::Lseg(l) => Ok(l),
        other => match from_string(&other, Kind::Lseg, "lseg")? {
            Scalar::Lseg(l) => Ok(l),
            _ => Err(cannot(&other, "lseg")),
        },
    }
}

/// Converts a line or string.
pub fn to_line(datum: &[u8]) -> Result<Line, Error> {
    let s = scalar(datum)?;
    match s {
        Scalar::Line(l) => Ok(l),
        other => match from_string(&other, Kind::Line, "line")? {
            Scalar::Line(l) => Ok(l),
            _ => Err(cannot(&other, "line")),
        },
    }
}

/// Converts a path or string.
pub fn to_path(datum: &[u8]) -> Result<Path, Error> {
    match scalar(datum)? {
        Scalar::Path(b) => Path::from_body(b),
        Scalar::String(b) => crate::geometric::parse_path(utf8(b)?),
        other => Err(cannot(&other, "path")),
    }
}

/// Converts a polygon or string.
pub fn to_polygon(datum: &[u8]) -> Result<Polygon, Error> {
    match scalar(datum)? {
        Scalar::Polygon(b) => Polygon::from_body(b),
        Scalar::String(b) => crate::geometric::parse_polygon(utf8(b)?),
        other => Err(cannot(&other, "polygon")),
    }
}

/// Converts a circle or string.
pub fn to_circle(datum: &[u8]) -> Result<Circle, Error> {
    match scalar(datum)? {
        Scalar::Circle(c) => Ok(c),
        Scalar::String(b) => crate::geometric::parse_circle(utf8(b)?),
        other => Err(cannot(&other, "circle")),
    }
}

/// Converts a box or string.
pub fn to_box(datum: &[u8]) -> Result<GeoBox, Error> {
    match scalar(datum)? {
        Scalar::Box(b) => Ok(b),
        Scalar::String(b) => crate::geometric::parse_box(utf8(b)?),
        other => Err(cannot(&other, "box")),
    }
}

/// Converts a bytea or a string in `\x` hex or escape format.
pub fn to_bytea(datum: &[u8]) -> Result<Vec<u8>, Error> {
    match scalar(datum)? {
        Scalar::Bytea(b) => Ok(b.to_vec()),
        Scalar::String(b) => parse_bytea(utf8(b)?),
        other => Err(cannot(&other, "bytea")),
    }
}

/// Converts a tsvector or string.
pub fn to_tsvector(datum: &[u8]) -> Result<TsVector, Error> {
    match scalar(datum)? {
        Scalar::TsVector(b) | Scalar::String(b) => TsVector::parse(utf8(b)?),
        other => Err(cannot(&other, "tsvector")),
    }
}

pub(crate) fn tsquery_of(s: &ScalarRef) -> Result<TsQuery, Error> {
    match s {
        Scalar::TsQuery(b) | Scalar::String(b) => TsQuery::parse(utf8(b)?),
        other => Err(cannot(other, "tsquery")),
    }
}

/// Converts a tsquery or string.
pub fn to_tsquery(datum: &[u8]) -> Result<TsQuery, Error> { tsquery_of(&scalar(datum)?) }

/// Converts a range of element kind `kind`, or a string.
pub fn to_range(datum: &[u8], kind: RangeKind) -> Result<Range, Error> {
    match scalar(datum)? {
        Scalar::Range(k, b) if k == kind => Range::from_body(k, b),
        Scalar::String(b) => Range::parse(kind, utf8(b)?),
        other => Err(cannot(&other, kind.range_name())),
    }
}

/// Converts a multirange of element kind `kind`, or a string.
pub fn to_multirange(datum: &[u8], kind: RangeKind) -> Result<Multirange, Error> {
    match scalar(datum)? {
        Scalar::Multirange(k, b) if k == kind => Multirange::from_body(k, b),
        Scalar::String(b) => Multirange::parse(kind, utf8(b)?),
        other => Err(cannot(&other, kind.multirange_name())),
    }
}

/// Casts a packed scalar to a packed scalar of `kind`.
///
/// # Example
///
/// ```
/// use dynval::{algebra::cast::cast, prelude::*};
///
/// let s = pack(&parse(r#""10.1.2.3/8""#).unwrap()).unwrap();
/// let c = cast(&s, Kind::Cidr);
///
/// assert!(c.is_err());
/// assert_eq!(to_text(&cast(&s, Kind::Inet).unwrap()).unwrap(), "10.1.2.3/8");
/// ```
pub fn cast(datum: &[u8], kind: Kind) -> Result<Vec<u8>, Error> {
    let out = match kind {
        Kind::Integer => Scalar::Integer(to_integer(datum)?),
        Kind::Float => Scalar::Float(to_float(datum)?),
        Kind::Numeric => Scalar::from_numeric(&to_numeric(datum)?),
        Kind::Bool => Scalar::Bool(to_bool(datum)?),
        Kind::String => Scalar::String(Bytes::from(to_text(datum)?)),
        Kind::Timestamp => Scalar::Timestamp(to_timestamp(datum)?),
        Kind::TimestampTz => Scalar::TimestampTz(to_timestamptz(datum)?),
        Kind::Date => Scalar::Date(to_date(datum)?),
        Kind::Time => Scalar::Time(to_time(datum)?),
        Kind::TimeTz => Scalar::TimeTz(to_timetz(datum)?),
        Kind::Interval => Scalar::Interval(to_interval(datum)?),
        Kind::Inet => Scalar::Inet(to_inet(datum)?),
        Kind::Cidr => Scalar::Cidr(to_cidr(datum)?),
        Kind::Mac => Scalar::Mac(to_macaddr(datum)?),
        Kind::Mac8 => Scalar::Mac8(to_macaddr8(datum)?),
        Kind::Point => Scalar::Point(to_point(datum)?),
        Kind::Lseg => Scalar::Lseg(to_lseg(datum)?),
        Kind::Line => Scalar::Line(to_line(datum)?),
        Kind::Path => Scalar::from_path(&to_path(datum)?),
        Kind::Polygon => Scalar::from_polygon(&to_polygon(datum)?),
        Kind::Circle => Scalar::Circle(to_circle(datum)?),
        Kind::Box => Scalar::Box(to_box(datum)?),
        Kind::TsVector => Scalar::from_tsvector(&to_tsvector(datum)?),
        Kind::TsQuery => Scalar::from_tsquery(&to_tsquery(datum)?),
        Kind::Range(k) => Scalar::from_range(&to_range(datum, k)?),
        Kind::Multirange(k) => Scalar::from_multirange(&to_multirange(datum, k)?),
        Kind::Bytea => Scalar::Bytea(Bytes::from(to_bytea(datum)?)),
        Kind::Null | Kind::Array | Kind::Object => {
            return Err(cannot(&scalar(datum)?, kind.name()));
        }
    };
    pack(&Dynamic::Scalar(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn p(text: &str) -> Vec<u8> { pack(&parse(text).unwrap()).unwrap() }

    fn cast_error(err: Error) -> Option<DynError> { err.downcast_ref::<DynError>().cloned() }

    #[test]
    fn numbers() {
        assert_eq!(to_integer(&p("-2.5")).unwrap(), -3);
        assert_eq!(to_integer(&p(r#""7.50"::numeric"#)).unwrap(), 8);
        assert!(to_integer(&p("1e300")).is_err());
        assert!(to_integer(&p(r#""x""#)).is_err());
        assert_eq!(to_float(&p("3")).unwrap(), 3.0);
        assert_eq!(to_float(&p(r#""-inf""#)).unwrap(), std::f64::NEG_INFINITY);
        assert_eq!(to_numeric(&p("0.1")).unwrap().to_string(), "0.1");
        assert!(to_bool(&p(r#""off""#)).is_ok());
        assert_eq!(
            cast_error(to_bool(&p("1")).unwrap_err()),
            Some(DynError::CannotCast { from: "integer", to: "boolean" })
        );
    }

    #[test]
    fn containers_are_not_scalars() {
        assert_eq!(cast_error(to_integer(&p("[1]")).unwrap_err()), Some(DynError::NotScalar { op: "typecast" }));
        assert!(to_text(&p("{}")).is_err());
    }

    #[test]
    fn temporal() {
        let d = p(r#""2000-01-02"::date"#);
        assert_eq!(to_timestamp(&d).unwrap(), USECS_PER_DAY);
        assert_eq!(to_date(&p(r#""2000-01-02 13:00:00"::timestamp"#)).unwrap(), 1);
        assert_eq!(to_time(&p(r#""2000-01-02 00:00:01"::timestamp"#)).unwrap(), 1_000_000);
        assert_eq!(to_time(&p(r#""1 day 00:00:02"::interval"#)).unwrap(), 2_000_000);
        assert_eq!(to_timetz(&p(r#""12:00:00"::time"#)).unwrap().zone, 0);
        assert!(to_time(&p(r#""infinity"::timestamp"#)).is_err());
        assert_eq!(to_interval(&p(r#""1 day""#)).unwrap().day, 1);
        assert!(to_interval(&p("1")).is_err());
    }

    #[test]
    fn network_and_mac() {
        let cidr = to_cidr(&p(r#""10.1.2.3/8"::inet"#)).unwrap();
        assert_eq!(cidr.to_string(), "10.0.0.0/8");
        assert!(!to_inet(&p("10.0.0.0/8::cidr")).unwrap().is_cidr);
        let mac8 = to_macaddr8(&p(r#""08:00:2b:01:02:03"::macaddr"#)).unwrap();
        assert_eq!(mac8, [0x08, 0x00, 0x2b, 0xff, 0xfe, 0x01, 0x02, 0x03]);
        assert!(to_macaddr(&p(r#""08:00:2b:01:02:03:04:05"::macaddr8"#)).is_err());
    }

    #[test]
    fn strings_use_the_kind_parser() {
        assert_eq!(to_point(&p(r#""(1,2)""#)).unwrap(), Point { x: 1.0, y: 2.0 });
        assert_eq!(to_box(&p(r#""(0,0),(1,1)""#)).unwrap().high, Point { x: 1.0, y: 1.0 });
        assert_eq!(to_path(&p(r#""[(0,0),(1,1)]""#)).unwrap().points.len(), 2);
        assert_eq!(to_bytea(&p(r#""\\x0102""#)).unwrap(), vec![1, 2]);
        assert_eq!(to_range(&p(r#""[1,5)""#), RangeKind::Int).unwrap().to_string(), "[1,5)");
        assert_eq!(to_tsquery(&p(r#""a & b""#)).unwrap().to_string(), "'a' & 'b'");
        assert!(to_circle(&p("[]")).is_err());
    }

    #[test]
    fn packed_casts() {
        let s = p(r#""2020-01-01""#);
        assert_eq!(ContainerRef::root(&cast(&s, Kind::Date).unwrap()).unwrap().raw_scalar().unwrap().map(|s| s.kind()), Some(Kind::Date));
        assert_eq!(crate::printer::to_text(&cast(&p("2"), Kind::String).unwrap()).unwrap(), r#""2""#);
        assert!(cast(&p("null"), Kind::Object).is_err());
    }
}
