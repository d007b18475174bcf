//! Scalar equality and the total order over packed values.
//!
//! Values of different kinds are ordered by [`Kind::priority`], except within the families
//! that compare by value: the numbers, the instants (timestamps and dates), and the times of
//! day.

use crate::{
    config::Config,
    encoding::{
        container::Node,
        iter::{DynIter, Token},
    },
    errors::DynError,
    geometric::{Path, Polygon},
    numeric::Numeric,
    range::{Multirange, Range},
    scalar::{Kind, Scalar},
    temporal::{date_to_timestamp, TimeTz},
    util::float_cmp,
};
use failure::Error;
use std::cmp::Ordering::{self, *};

/// Whether two scalars are equal.
///
/// The kinds must match. Numerics compare as decimals, so `1.0` equals `1.00`; intervals
/// compare by their span, so `1 mon` equals `30 days`; every NaN equals every other NaN.
///
/// # Example
///
/// ```
/// use dynval::{algebra::compare::scalar_eq, prelude::*};
///
/// let a = Scalar::parse_as(Kind::Numeric, "1.0").unwrap();
/// let b = Scalar::parse_as(Kind::Numeric, "1.00").unwrap();
///
/// assert!(scalar_eq(&a, &b));
///
/// let (one, float_one): (Scalar, Scalar) = (Scalar::Integer(1), Scalar::Float(1.0));
/// assert!(!scalar_eq(&one, &float_one));
/// ```
pub fn scalar_eq<A: AsRef<[u8]>, B: AsRef<[u8]>>(a: &Scalar<A>, b: &Scalar<B>) -> bool {
    match (a, b) {
        (Scalar::Null, Scalar::Null) => true,
        (Scalar::Bool(x), Scalar::Bool(y)) => x == y,
        (Scalar::String(x), Scalar::String(y))
        | (Scalar::Path(x), Scalar::Path(y))
        | (Scalar::Polygon(x), Scalar::Polygon(y))
        | (Scalar::TsVector(x), Scalar::TsVector(y))
        | (Scalar::TsQuery(x), Scalar::TsQuery(y))
        | (Scalar::Bytea(x), Scalar::Bytea(y)) => x.as_ref() == y.as_ref(),
        (Scalar::Numeric(x), Scalar::Numeric(y)) => {
            match (Numeric::from_body(x.as_ref()), Numeric::from_body(y.as_ref())) {
                (Ok(p), Ok(q)) => p.total_cmp(&q) == Equal,
                _ => x.as_ref() == y.as_ref(),
            }
        }
        (Scalar::Integer(x), Scalar::Integer(y)) => x == y,
        (Scalar::Float(x), Scalar::Float(y)) => float_cmp(*x, *y) == Equal,
        (Scalar::Timestamp(x), Scalar::Timestamp(y))
        | (Scalar::TimestampTz(x), Scalar::TimestampTz(y))
        | (Scalar::Time(x), Scalar::Time(y)) => x == y,
        (Scalar::Date(x), Scalar::Date(y)) => x == y,
        (Scalar::TimeTz(x), Scalar::TimeTz(y)) => x == y,
        (Scalar::Interval(x), Scalar::Interval(y)) => x.total_cmp(y) == Equal,
        (Scalar::Inet(x), Scalar::Inet(y)) | (Scalar::Cidr(x), Scalar::Cidr(y)) => x == y,
        (Scalar::Mac(x), Scalar::Mac(y)) => x == y,
        (Scalar::Mac8(x), Scalar::Mac8(y)) => x == y,
        (Scalar::Point(x), Scalar::Point(y)) => x == y,
        (Scalar::Lseg(x), Scalar::Lseg(y)) => x == y,
        (Scalar::Line(x), Scalar::Line(y)) => x == y,
        (Scalar::Circle(x), Scalar::Circle(y)) => x == y,
        (Scalar::Box(x), Scalar::Box(y)) => x == y,
        (Scalar::Range(k, x), Scalar::Range(l, y)) => {
            k == l
                && match (Range::from_body(*k, x.as_ref()), Range::from_body(*l, y.as_ref())) {
                    (Ok(p), Ok(q)) => p.total_cmp(&q) == Equal,
                    _ => x.as_ref() == y.as_ref(),
                }
        }
        (Scalar::Multirange(k, x), Scalar::Multirange(l, y)) => k == l && x.as_ref() == y.as_ref(),
        _ => false,
    }
}

/// Exact comparison of an integer with a float.
fn int_float_cmp(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return Less;
    }
    // every i64 lies strictly inside these bounds
    if f >= 9.3e18 {
        return Less;
    }
    if f <= -9.3e18 {
        return Greater;
    }
    let whole = f.trunc();
    match (i as i128).cmp(&(whole as i128)) {
        Equal => 0.0.partial_cmp(&(f - whole)).unwrap_or(Equal),
        ord => ord,
    }
}

fn to_decimal<B: AsRef<[u8]>>(s: &Scalar<B>) -> Result<Numeric, Error> {
    match s {
        Scalar::Integer(i) => Ok(Numeric::from(*i)),
        Scalar::Float(f) => Ok(Numeric::from_f64_exact(*f)),
        Scalar::Numeric(b) => Numeric::from_body(b.as_ref()),
        other => Err(DynError::CannotCast { from: other.kind().name(), to: "numeric" }.into()),
    }
}

fn is_number(k: Kind) -> bool {
    match k {
        Kind::Integer | Kind::Float | Kind::Numeric => true,
        _ => false,
    }
}

fn len_then_bytes(a: &[u8], b: &[u8]) -> Ordering { a.len().cmp(&b.len()).then_with(|| a.cmp(b)) }

/// Orders two scalars of any kinds.
///
/// # Example
///
/// ```
/// use dynval::{algebra::compare::scalar_cmp, prelude::*};
/// use std::cmp::Ordering;
///
/// let cfg = Config::default();
/// let (one, half, no): (Scalar, Scalar, Scalar) = (Scalar::Integer(1), Scalar::Float(0.5), Scalar::Bool(false));
/// let numeric_half = Scalar::parse_as(Kind::Numeric, "0.50").unwrap();
///
/// assert_eq!(scalar_cmp(&one, &half, &cfg).unwrap(), Ordering::Greater);
/// assert_eq!(scalar_cmp(&half, &numeric_half, &cfg).unwrap(), Ordering::Equal);
/// assert_eq!(scalar_cmp(&Scalar::string("z"), &no, &cfg).unwrap(), Ordering::Less);
/// ```
pub fn scalar_cmp<A: AsRef<[u8]>, B: AsRef<[u8]>>(
    a: &Scalar<A>,
    b: &Scalar<B>,
    cfg: &Config,
) -> Result<Ordering, Error> {
    let (ka, kb) = (a.kind(), b.kind());
    Ok(match (a, b) {
        (Scalar::Null, Scalar::Null) => Equal,
        (Scalar::Bool(x), Scalar::Bool(y)) => x.cmp(y),
        (Scalar::String(x), Scalar::String(y)) => cfg.string_collation.compare(x.as_ref(), y.as_ref()),

        (Scalar::Integer(x), Scalar::Integer(y)) => x.cmp(y),
        (Scalar::Float(x), Scalar::Float(y)) => float_cmp(*x, *y),
        (Scalar::Integer(x), Scalar::Float(y)) => int_float_cmp(*x, *y),
        (Scalar::Float(x), Scalar::Integer(y)) => int_float_cmp(*y, *x).reverse(),
        _ if is_number(ka) && is_number(kb) => to_decimal(a)?.total_cmp(&to_decimal(b)?),

        (Scalar::Timestamp(x), Scalar::Timestamp(y))
        | (Scalar::Timestamp(x), Scalar::TimestampTz(y))
        | (Scalar::TimestampTz(x), Scalar::Timestamp(y))
        | (Scalar::TimestampTz(x), Scalar::TimestampTz(y)) => x.cmp(y),
        (Scalar::Date(x), Scalar::Date(y)) => x.cmp(y),
        (Scalar::Date(d), Scalar::Timestamp(t)) | (Scalar::Date(d), Scalar::TimestampTz(t)) => {
            date_to_timestamp(*d).cmp(t)
        }
        (Scalar::Timestamp(t), Scalar::Date(d)) | (Scalar::TimestampTz(t), Scalar::Date(d)) => {
            t.cmp(&date_to_timestamp(*d))
        }

        (Scalar::Time(x), Scalar::Time(y)) => x.cmp(y),
        (Scalar::TimeTz(x), Scalar::TimeTz(y)) => x.total_cmp(y),
        // a time without zone orders as the same time at UTC
        (Scalar::Time(x), Scalar::TimeTz(y)) => TimeTz::utc(*x).total_cmp(y),
        (Scalar::TimeTz(x), Scalar::Time(y)) => x.total_cmp(&TimeTz::utc(*y)),
        (Scalar::Interval(x), Scalar::Interval(y)) => x.total_cmp(y),

        (Scalar::Inet(x), Scalar::Inet(y)) | (Scalar::Cidr(x), Scalar::Cidr(y)) => x.total_cmp(y),
        (Scalar::Mac(x), Scalar::Mac(y)) => x.cmp(y),
        (Scalar::Mac8(x), Scalar::Mac8(y)) => x.cmp(y),

        (Scalar::Point(x), Scalar::Point(y)) => x.total_cmp(y),
        (Scalar::Lseg(x), Scalar::Lseg(y)) => x.total_cmp(y),
        (Scalar::Line(x), Scalar::Line(y)) => x.total_cmp(y),
        (Scalar::Circle(x), Scalar::Circle(y)) => x.total_cmp(y),
        (Scalar::Box(x), Scalar::Box(y)) => x.total_cmp(y),
        (Scalar::Path(x), Scalar::Path(y)) => Path::from_body(x.as_ref())?.total_cmp(&Path::from_body(y.as_ref())?),
        (Scalar::Polygon(x), Scalar::Polygon(y)) => {
            Polygon::from_body(x.as_ref())?.total_cmp(&Polygon::from_body(y.as_ref())?)
        }

        (Scalar::TsVector(x), Scalar::TsVector(y)) | (Scalar::TsQuery(x), Scalar::TsQuery(y)) => {
            len_then_bytes(x.as_ref(), y.as_ref())
        }
        (Scalar::Range(k, x), Scalar::Range(l, y)) if k == l => {
            Range::from_body(*k, x.as_ref())?.total_cmp(&Range::from_body(*l, y.as_ref())?)
        }
        (Scalar::Multirange(k, x), Scalar::Multirange(l, y)) if k == l => {
            Multirange::from_body(*k, x.as_ref())?.total_cmp(&Multirange::from_body(*l, y.as_ref())?)
        }
        (Scalar::Bytea(x), Scalar::Bytea(y)) => x.as_ref().cmp(y.as_ref()),

        _ => ka.priority().cmp(&kb.priority()),
    })
}

/// The kind a node sorts as; a raw-scalar container sorts as its scalar.
fn node_kind(node: Option<Node>) -> Result<Kind, Error> {
    match node {
        Some(Node::Scalar(s)) => Ok(s.kind()),
        Some(Node::Container(c)) if c.is_raw_scalar() => match c.raw_scalar()? {
            Some(s) => Ok(s.kind()),
            None => Ok(Kind::Array),
        },
        Some(Node::Container(c)) if c.is_object() => Ok(Kind::Object),
        Some(Node::Container(_)) => Ok(Kind::Array),
        None => Err(malformed()),
    }
}

fn malformed() -> Error { DynError::UnbalancedContainer { detail: "malformed token stream" }.into() }

fn is_end(tok: Token) -> bool { tok == Token::EndArray || tok == Token::EndObject }

/// Compares two packed values with the default [`Config`].
///
/// # Example
///
/// ```
/// use dynval::{algebra::compare::compare, prelude::*};
/// use std::cmp::Ordering;
///
/// let a = pack(&parse(r#"{"a": 1}"#).unwrap()).unwrap();
/// let b = pack(&parse(r#"{"a": 1, "b": 2}"#).unwrap()).unwrap();
///
/// assert_eq!(compare(&a, &b).unwrap(), Ordering::Less);
/// ```
pub fn compare(a: &[u8], b: &[u8]) -> Result<Ordering, Error> { compare_with(a, b, &Config::default()) }

/// Compares two packed values.
///
/// Both trees are walked in step. Containers are ordered by their contents: a container that
/// ends first sorts first. Where the walks meet nodes of different kinds, the kinds' priority
/// decides, so every object sorts before every array, and every array before every scalar.
pub fn compare_with(a: &[u8], b: &[u8], cfg: &Config) -> Result<Ordering, Error> {
    let mut ita = DynIter::new(a)?;
    let mut itb = DynIter::new(b)?;

    loop {
        let (ra, va) = ita.next(false)?;
        let (rb, vb) = itb.next(false)?;
        cfg.check_depth(ita.depth().max(itb.depth()))?;

        let res = if ra == rb {
            match ra {
                Token::Done => return Ok(Equal),
                Token::EndArray | Token::EndObject | Token::BeginObject => Equal,
                Token::BeginArray => {
                    let ca = va.and_then(Node::container).ok_or_else(malformed)?;
                    let cb = vb.and_then(Node::container).ok_or_else(malformed)?;
                    if ca.is_raw_scalar() != cb.is_raw_scalar() {
                        node_kind(va)?.priority().cmp(&node_kind(vb)?.priority())
                    } else {
                        Equal
                    }
                }
                Token::Key | Token::Value | Token::Element => {
                    let sa = va.and_then(Node::scalar).ok_or_else(malformed)?;
                    let sb = vb.and_then(Node::scalar).ok_or_else(malformed)?;
                    scalar_cmp(&sa, &sb, cfg)?
                }
            }
        } else if is_end(ra) {
            Less
        } else if is_end(rb) {
            Greater
        } else {
            node_kind(va)?.priority().cmp(&node_kind(vb)?.priority())
        };

        if res != Equal {
            return Ok(res);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::StringCollation, encoding::ser::pack, parser::parse};

    fn cmp(a: &str, b: &str) -> Ordering {
        compare(&pack(&parse(a).unwrap()).unwrap(), &pack(&parse(b).unwrap()).unwrap()).unwrap()
    }

    #[test]
    fn kind_priority() {
        let ordered = [
            "{}",
            "[]",
            r#""s""#,
            "true",
            "1",
            r#""2020-01-01 00:00:00"::timestamp"#,
            r#""2030-01-01"::date"#,
            r#""10:00"::time"#,
            r#""1 day"::interval"#,
            "10.0.0.1",
            "10.0.0.0/8::cidr",
            "null",
        ];
        for w in ordered.windows(2) {
            assert_eq!(cmp(w[0], w[1]), Less, "{} < {}", w[0], w[1]);
            assert_eq!(cmp(w[1], w[0]), Greater, "{} > {}", w[1], w[0]);
        }
    }

    #[test]
    fn numbers_compare_across_kinds() {
        assert_eq!(cmp("1", "1.0"), Equal);
        assert_eq!(cmp("2", "1.5"), Greater);
        assert_eq!(cmp(r#""1.50"::numeric"#, "1.5"), Equal);
        assert_eq!(cmp(r#""2"::numeric"#, "3"), Less);
        assert_eq!(cmp("NaN", "inf"), Greater);
        assert_eq!(cmp("NaN", "NaN"), Equal);
        assert_eq!(cmp("9007199254740993", "9007199254740992.0"), Greater);
    }

    #[test]
    fn instants_compare_across_kinds() {
        assert_eq!(cmp(r#""2020-01-01"::date"#, r#""2020-01-01 00:00:00"::timestamp"#), Equal);
        assert_eq!(cmp(r#""2020-01-02"::date"#, r#""2020-01-01 12:00:00+00"::timestamptz"#), Greater);
        assert_eq!(cmp(r#""10:00"::time"#, r#""09:00+02"::timetz"#), Greater);
        assert_eq!(cmp(r#""08:30"::time"#, r#""09:00+02"::timetz"#), Greater);
        assert_eq!(cmp(r#""10:00"::time"#, r#""10:00+00"::timetz"#), Equal);
        assert_eq!(cmp(r#""10:00"::time"#, r#""10:00-01"::timetz"#), Less);
    }

    #[test]
    fn containers() {
        assert_eq!(cmp(r#"{"a": 1}"#, r#"{"a": 1, "b": 2}"#), Less);
        assert_eq!(cmp("[1, 2]", "[1]"), Greater);
        assert_eq!(cmp("[1, [2]]", "[1, 3]"), Less);
        assert_eq!(cmp("[1, {}]", "[1, []]"), Less);
        assert_eq!(cmp("5", "[5]"), Greater);
        assert_eq!(cmp("5", "{}"), Greater);
        assert_eq!(cmp(r#"{"b": 1}"#, r#"{"a": 1}"#), Greater);
        assert_eq!(cmp(r#"{"a": [1, {"x": null}]}"#, r#"{"a": [1, {"x": null}]}"#), Equal);
    }

    #[test]
    fn string_collation() {
        let a = Scalar::string("b");
        let b = Scalar::string("aa");
        let mut cfg = Config::default();
        assert_eq!(scalar_cmp(&a, &b, &cfg).unwrap(), Greater);
        cfg.string_collation = StringCollation::LengthThenBytes;
        assert_eq!(scalar_cmp(&a, &b, &cfg).unwrap(), Less);
    }

    #[test]
    fn equality() {
        let one_month = Scalar::parse_as(Kind::Interval, "1 mon").unwrap();
        let thirty_days = Scalar::parse_as(Kind::Interval, "30 days").unwrap();
        assert!(scalar_eq(&one_month, &thirty_days));
        let nan: Scalar = Scalar::Float(std::f64::NAN);
        assert!(scalar_eq(&nan, &nan));
        assert!(!scalar_eq(
            &Scalar::parse_as(Kind::Date, "2020-01-01").unwrap(),
            &Scalar::parse_as(Kind::Timestamp, "2020-01-01").unwrap()
        ));
        assert!(!scalar_eq(&Scalar::string("a"), &Scalar::string("b")));
    }

    #[test]
    fn depth_limit() {
        let a = pack(&parse("[[[1]]]").unwrap()).unwrap();
        let cfg = Config { max_depth: 2, ..Config::default() };
        assert!(compare_with(&a, &a, &cfg).is_err());
        assert_eq!(compare_with(&a, &a, &Config::default()).unwrap(), Equal);
    }
}
