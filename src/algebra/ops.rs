//! Operators over packed values.
//!
//! Arithmetic takes two packed values whose roots are scalars and returns a packed scalar.
//! Numbers climb a promotion ladder: two integers stay integers, a float on either side makes
//! the result a float, and a numeric on either side makes it a numeric. Temporal, geometric
//! and network kinds add their own cases on top.
//!
//! `+` is also concatenation: when either side is a container, arrays are joined and objects
//! merged, with the right-hand value winning on a shared key.
//!
//! # Example
//!
//! ```
//! use dynval::{algebra::ops, prelude::*};
//!
//! let p = |s: &str| pack(&parse(s).unwrap()).unwrap();
//!
//! let merged = ops::add(&p(r#"{"a": 1}"#), &p(r#"{"a": 2, "b": 3}"#)).unwrap();
//! assert_eq!(to_text(&merged).unwrap(), r#"{"a": 2, "b": 3}"#);
//!
//! let sum = ops::add(&p("1"), &p("2.5")).unwrap();
//! assert_eq!(to_text(&sum).unwrap(), "3.5");
//!
//! assert!(ops::div(&p("1"), &p("0")).is_err());
//! ```

use super::{
    cast::{float_of, inet_of, numeric_of, root_scalar, tsquery_of},
    compare::compare_with,
    contains::contains_with as tree_contains_with,
};
use crate::{
    config::Config,
    encoding::{
        container::{ContainerRef, Node, FIND_IN_ARRAY, FIND_IN_OBJECT},
        de::unpack,
        ser::pack,
    },
    errors::DynError,
    geometric::{Circle, GeoBox, Path, Point, Polygon},
    network::Inet,
    numeric::Numeric,
    scalar::{Scalar, ScalarRef},
    temporal::{
        date_to_timestamp, time_add_interval, timestamp_add_interval, timestamp_diff, timestamp_sub_interval,
        TimeTz,
    },
    Dynamic,
};
use bytes::Bytes;
use failure::Error;
use std::cmp::Ordering::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Rem => "%",
            Op::Pow => "^",
        }
    }
}

enum Numbers {
    Int(i64, i64),
    Float(f64, f64),
    Dec(Numeric, Numeric),
}

fn packed(s: Scalar) -> Result<Vec<u8>, Error> { pack(&Dynamic::Scalar(s)) }

/// The root scalar, or `None` for an array or object.
fn operand(datum: &[u8]) -> Result<Option<ScalarRef>, Error> {
    let root = ContainerRef::root(datum)?;
    if root.is_raw_scalar() {
        root.raw_scalar()
    } else {
        Ok(None)
    }
}

fn invalid(op: &'static str, x: &ScalarRef, y: &ScalarRef) -> Error {
    DynError::InvalidOperandTypes { op, lhs: x.kind().name(), rhs: y.kind().name() }.into()
}

fn overflow() -> Error { DynError::NumericOverflow { what: "bigint" }.into() }

fn is_number(s: &ScalarRef) -> bool { matches!(s, Scalar::Integer(_) | Scalar::Float(_) | Scalar::Numeric(_)) }

fn numbers(x: &ScalarRef, y: &ScalarRef) -> Result<Option<Numbers>, Error> {
    if !is_number(x) || !is_number(y) {
        return Ok(None);
    }
    Ok(Some(match (x, y) {
        (Scalar::Integer(p), Scalar::Integer(q)) => Numbers::Int(*p, *q),
        (Scalar::Numeric(_), _) | (_, Scalar::Numeric(_)) => Numbers::Dec(numeric_of(x)?, numeric_of(y)?),
        _ => Numbers::Float(float_of(x)?, float_of(y)?),
    }))
}

fn number_op(op: Op, n: Numbers) -> Result<Scalar, Error> {
    Ok(match n {
        Numbers::Int(p, q) => match op {
            Op::Add => Scalar::Integer(p.checked_add(q).ok_or_else(overflow)?),
            Op::Sub => Scalar::Integer(p.checked_sub(q).ok_or_else(overflow)?),
            Op::Mul => Scalar::Integer(p.checked_mul(q).ok_or_else(overflow)?),
            Op::Div | Op::Rem if q == 0 => return Err(DynError::DivisionByZero.into()),
            Op::Div => Scalar::Integer(p.checked_div(q).ok_or_else(overflow)?),
            // i64::MIN % -1 is the only other failure and its remainder is zero
            Op::Rem => Scalar::Integer(p.checked_rem(q).unwrap_or(0)),
            Op::Pow => Scalar::Float((p as f64).powf(q as f64)),
        },
        Numbers::Float(p, q) => Scalar::Float(match op {
            Op::Add => p + q,
            Op::Sub => p - q,
            Op::Mul => p * q,
            Op::Div if q == 0.0 => return Err(DynError::DivisionByZero.into()),
            Op::Div => p / q,
            Op::Rem => p % q,
            Op::Pow => p.powf(q),
        }),
        Numbers::Dec(p, q) => Scalar::from_numeric(&match op {
            Op::Add => p.add(&q),
            Op::Sub => p.sub(&q),
            Op::Mul => p.mul(&q),
            Op::Div => p.div(&q)?,
            Op::Rem => p.rem(&q)?,
            Op::Pow => p.pow(&q)?,
        }),
    })
}

/// String `+` string or number joins the text forms.
fn concat_text(x: &ScalarRef, y: &ScalarRef) -> Result<Option<Scalar>, Error> {
    let is_string = |s: &ScalarRef| matches!(s, Scalar::String(_));
    if !(is_string(x) || is_string(y)) || !(is_string(x) || is_number(x)) || !(is_string(y) || is_number(y)) {
        return Ok(None);
    }
    let mut out = x.text()?;
    out.push_str(&y.text()?);
    Ok(Some(Scalar::String(Bytes::from(out))))
}

fn negated(p: &Point) -> Point { Point { x: -p.x, y: -p.y } }

fn path_of(b: &[u8]) -> Result<Path, Error> { Path::from_body(b) }

fn add_scalars(x: &ScalarRef, y: &ScalarRef) -> Result<Scalar, Error> {
    if let Some(s) = concat_text(x, y)? {
        return Ok(s);
    }
    if let Some(n) = numbers(x, y)? {
        return number_op(Op::Add, n);
    }
    Ok(match (x, y) {
        (Scalar::Timestamp(t), Scalar::Interval(i)) | (Scalar::Interval(i), Scalar::Timestamp(t)) => {
            Scalar::Timestamp(timestamp_add_interval(*t, i)?)
        }
        (Scalar::TimestampTz(t), Scalar::Interval(i)) | (Scalar::Interval(i), Scalar::TimestampTz(t)) => {
            Scalar::TimestampTz(timestamp_add_interval(*t, i)?)
        }
        (Scalar::Date(d), Scalar::Interval(i)) | (Scalar::Interval(i), Scalar::Date(d)) => {
            Scalar::TimestampTz(timestamp_add_interval(date_to_timestamp(*d), i)?)
        }
        (Scalar::Time(t), Scalar::Interval(i)) | (Scalar::Interval(i), Scalar::Time(t)) => {
            Scalar::Time(time_add_interval(*t, i))
        }
        (Scalar::TimeTz(t), Scalar::Interval(i)) | (Scalar::Interval(i), Scalar::TimeTz(t)) => {
            Scalar::TimeTz(TimeTz { time: time_add_interval(t.time, i), zone: t.zone })
        }
        (Scalar::Interval(p), Scalar::Interval(q)) => Scalar::Interval(p.add(q)?),
        (Scalar::Point(p), Scalar::Point(q)) => Scalar::Point(p.add(q)),
        (Scalar::Box(b), Scalar::Point(p)) => Scalar::Box(b.translate(p)),
        (Scalar::Path(b), Scalar::Point(p)) => Scalar::from_path(&path_of(b)?.translate(p)),
        (Scalar::Circle(c), Scalar::Point(p)) => Scalar::Circle(c.translate(p)),
        (Scalar::Inet(a), Scalar::Integer(n))
        | (Scalar::Integer(n), Scalar::Inet(a))
        | (Scalar::Cidr(a), Scalar::Integer(n))
        | (Scalar::Integer(n), Scalar::Cidr(a)) => Scalar::Inet(a.with_cidr(false).add(*n)?),
        _ => return Err(invalid("+", x, y)),
    })
}

fn sub_scalars(x: &ScalarRef, y: &ScalarRef) -> Result<Scalar, Error> {
    if let Some(n) = numbers(x, y)? {
        return number_op(Op::Sub, n);
    }
    Ok(match (x, y) {
        (Scalar::Timestamp(t), Scalar::Interval(i)) => Scalar::Timestamp(timestamp_sub_interval(*t, i)?),
        (Scalar::TimestampTz(t), Scalar::Interval(i)) => Scalar::TimestampTz(timestamp_sub_interval(*t, i)?),
        (Scalar::Date(d), Scalar::Interval(i)) => {
            Scalar::TimestampTz(timestamp_sub_interval(date_to_timestamp(*d), i)?)
        }
        (Scalar::Time(t), Scalar::Interval(i)) => Scalar::Time(time_add_interval(*t, &i.neg()?)),
        (Scalar::TimeTz(t), Scalar::Interval(i)) => {
            Scalar::TimeTz(TimeTz { time: time_add_interval(t.time, &i.neg()?), zone: t.zone })
        }
        (Scalar::Interval(p), Scalar::Interval(q)) => Scalar::Interval(p.sub(q)?),
        (Scalar::Timestamp(p), Scalar::Timestamp(q)) | (Scalar::TimestampTz(p), Scalar::TimestampTz(q)) => {
            Scalar::Interval(timestamp_diff(*p, *q)?)
        }
        (Scalar::Point(p), Scalar::Point(q)) => Scalar::Point(p.sub(q)),
        (Scalar::Box(b), Scalar::Point(p)) => Scalar::Box(b.translate(&negated(p))),
        (Scalar::Path(b), Scalar::Point(p)) => Scalar::from_path(&path_of(b)?.translate(&negated(p))),
        (Scalar::Circle(c), Scalar::Point(p)) => Scalar::Circle(c.translate(&negated(p))),
        (Scalar::Inet(a), Scalar::Integer(n)) | (Scalar::Cidr(a), Scalar::Integer(n)) => {
            Scalar::Inet(a.with_cidr(false).add(n.checked_neg().ok_or_else(overflow)?)?)
        }
        (Scalar::Inet(a), Scalar::Inet(b))
        | (Scalar::Inet(a), Scalar::Cidr(b))
        | (Scalar::Cidr(a), Scalar::Inet(b))
        | (Scalar::Cidr(a), Scalar::Cidr(b)) => Scalar::Integer(a.diff(b)?),
        _ => return Err(invalid("-", x, y)),
    })
}

fn factor(s: &ScalarRef) -> Option<f64> {
    match s {
        Scalar::Integer(i) => Some(*i as f64),
        Scalar::Float(f) => Some(*f),
        _ => None,
    }
}

fn mul_scalars(x: &ScalarRef, y: &ScalarRef) -> Result<Scalar, Error> {
    if let Some(n) = numbers(x, y)? {
        return number_op(Op::Mul, n);
    }
    Ok(match (x, y) {
        (Scalar::Interval(i), f) | (f, Scalar::Interval(i)) => match factor(f) {
            Some(k) => Scalar::Interval(i.mul(k)?),
            None => return Err(invalid("*", x, y)),
        },
        (Scalar::Point(p), Scalar::Point(q)) => Scalar::Point(p.mul(q)),
        (Scalar::Box(b), Scalar::Point(p)) => Scalar::Box(b.scale(p)),
        (Scalar::Path(b), Scalar::Point(p)) => Scalar::from_path(&path_of(b)?.scale(p)),
        (Scalar::Circle(c), Scalar::Point(p)) => Scalar::Circle(Circle {
            center: c.center.mul(p),
            radius: c.radius * p.x.hypot(p.y),
        }),
        _ => return Err(invalid("*", x, y)),
    })
}

fn div_scalars(x: &ScalarRef, y: &ScalarRef) -> Result<Scalar, Error> {
    if let Some(n) = numbers(x, y)? {
        return number_op(Op::Div, n);
    }
    Ok(match (x, y) {
        (Scalar::Interval(i), f) => match factor(f) {
            Some(k) => Scalar::Interval(i.div(k)?),
            None => return Err(invalid("/", x, y)),
        },
        (Scalar::Point(p), Scalar::Point(q)) => Scalar::Point(p.div(q)?),
        (Scalar::Box(b), Scalar::Point(p)) => Scalar::Box(GeoBox::new(b.high.div(p)?, b.low.div(p)?)),
        (Scalar::Path(b), Scalar::Point(p)) => {
            let path = path_of(b)?;
            let points = path.points.iter().map(|q| q.div(p)).collect::<Result<Vec<_>, _>>()?;
            Scalar::from_path(&Path { closed: path.closed, points })
        }
        (Scalar::Circle(c), Scalar::Point(p)) => Scalar::Circle(Circle {
            center: c.center.div(p)?,
            radius: c.radius / p.x.hypot(p.y),
        }),
        _ => return Err(invalid("/", x, y)),
    })
}

fn numbers_only(op: Op) -> impl Fn(&ScalarRef, &ScalarRef) -> Result<Scalar, Error> {
    move |x, y| match numbers(x, y)? {
        Some(n) => number_op(op, n),
        None => Err(invalid(op.symbol(), x, y)),
    }
}

fn binary<F>(a: &[u8], b: &[u8], op: Op, f: F) -> Result<Vec<u8>, Error>
where
    F: Fn(&ScalarRef, &ScalarRef) -> Result<Scalar, Error>,
{
    let x = root_scalar(a, op.symbol())?;
    let y = root_scalar(b, op.symbol())?;
    packed(f(&x, &y)?)
}

/// Array and object concatenation.
fn concat(a: &[u8], b: &[u8]) -> Result<Vec<u8>, Error> {
    fn elements(d: Dynamic) -> Vec<Dynamic> {
        match d {
            Dynamic::Array(v) => v,
            other => vec![other],
        }
    }

    let joined = match (unpack(a)?, unpack(b)?) {
        (Dynamic::Object(mut x), Dynamic::Object(y)) => {
            x.extend_right_wins(y);
            Dynamic::Object(x)
        }
        (Dynamic::Object(_), Dynamic::Scalar(s)) => {
            return Err(DynError::InvalidConcatenation { lhs: "object", rhs: s.kind().name() }.into());
        }
        (Dynamic::Scalar(s), Dynamic::Object(_)) => {
            return Err(DynError::InvalidConcatenation { lhs: s.kind().name(), rhs: "object" }.into());
        }
        (x, y) => {
            let mut out = elements(x);
            out.extend(elements(y));
            Dynamic::Array(out)
        }
    };
    pack(&joined)
}

/// `+`: arithmetic on scalars, concatenation when either side is a container.
///
/// A raw scalar joins an array as one more element, but cannot be joined with an object.
pub fn add(a: &[u8], b: &[u8]) -> Result<Vec<u8>, Error> {
    match (operand(a)?, operand(b)?) {
        (Some(x), Some(y)) => packed(add_scalars(&x, &y)?),
        _ => concat(a, b),
    }
}

/// `-`. An inet minus an inet is the integer distance between them.
pub fn sub(a: &[u8], b: &[u8]) -> Result<Vec<u8>, Error> { binary(a, b, Op::Sub, sub_scalars) }

/// `*`. Geometric shapes scale element-wise by a point.
pub fn mul(a: &[u8], b: &[u8]) -> Result<Vec<u8>, Error> { binary(a, b, Op::Mul, mul_scalars) }

/// `/`. Fails with [`DynError::DivisionByZero`] on an integer or float zero divisor.
pub fn div(a: &[u8], b: &[u8]) -> Result<Vec<u8>, Error> { binary(a, b, Op::Div, div_scalars) }

/// `%`. A float remainder follows `fmod`, so a zero divisor gives NaN.
pub fn rem(a: &[u8], b: &[u8]) -> Result<Vec<u8>, Error> { binary(a, b, Op::Rem, numbers_only(Op::Rem)) }

/// `^`. Integers and floats raise to a float, numerics stay numeric.
pub fn pow(a: &[u8], b: &[u8]) -> Result<Vec<u8>, Error> { binary(a, b, Op::Pow, numbers_only(Op::Pow)) }

/// Unary `-` on integers, floats, numerics and intervals.
pub fn neg(a: &[u8]) -> Result<Vec<u8>, Error> {
    let x = root_scalar(a, "-")?;
    packed(match x {
        Scalar::Integer(i) => Scalar::Integer(i.checked_neg().ok_or_else(overflow)?),
        Scalar::Float(f) => Scalar::Float(-f),
        Scalar::Numeric(b) => Scalar::from_numeric(&Numeric::from_body(b)?.neg()),
        Scalar::Interval(i) => Scalar::Interval(i.neg()?),
        other => return Err(invalid("-", &other, &other)),
    })
}

fn order(a: &[u8], b: &[u8]) -> Result<Ordering, Error> { compare_with(a, b, &Config::default()) }

pub fn lt(a: &[u8], b: &[u8]) -> Result<bool, Error> { Ok(order(a, b)? == Less) }

pub fn le(a: &[u8], b: &[u8]) -> Result<bool, Error> { Ok(order(a, b)? != Greater) }

pub fn eq(a: &[u8], b: &[u8]) -> Result<bool, Error> { Ok(order(a, b)? == Equal) }

pub fn ge(a: &[u8], b: &[u8]) -> Result<bool, Error> { Ok(order(a, b)? != Less) }

pub fn gt(a: &[u8], b: &[u8]) -> Result<bool, Error> { Ok(order(a, b)? == Greater) }

pub fn ne(a: &[u8], b: &[u8]) -> Result<bool, Error> { Ok(order(a, b)? != Equal) }

fn root_name(c: &ContainerRef) -> Result<&'static str, Error> {
    Ok(if c.is_object() {
        "object"
    } else if c.is_raw_scalar() {
        c.raw_scalar()?.map_or("array", |s| s.kind().name())
    } else {
        "array"
    })
}

fn has_key(root: &ContainerRef, key: &ScalarRef) -> Result<bool, Error> {
    Ok(root.find_value(FIND_IN_OBJECT | FIND_IN_ARRAY, key)?.is_some())
}

/// `?`: whether a string is a top-level object key or a string element of a top-level array.
///
/// # Example
///
/// ```
/// use dynval::{algebra::ops::exists, prelude::*};
///
/// let p = |s: &str| pack(&parse(s).unwrap()).unwrap();
///
/// assert!(exists(&p(r#"{"a": {"b": 1}}"#), &p(r#""a""#)).unwrap());
/// assert!(!exists(&p(r#"{"a": {"b": 1}}"#), &p(r#""b""#)).unwrap());
/// assert!(exists(&p(r#"["x", "y"]"#), &p(r#""y""#)).unwrap());
/// ```
pub fn exists(datum: &[u8], key: &[u8]) -> Result<bool, Error> {
    let root = ContainerRef::root(datum)?;
    match root_scalar(key, "?")? {
        k @ Scalar::String(_) => has_key(&root, &k),
        other => Err(DynError::InvalidOperandTypes { op: "?", lhs: root_name(&root)?, rhs: other.kind().name() }.into()),
    }
}

/// The string elements of a keys array; nulls are skipped.
fn key_list<'a>(keys: &'a [u8], op: &'static str) -> Result<Vec<ScalarRef<'a>>, Error> {
    let arr = ContainerRef::root(keys)?;
    if !arr.is_array() || arr.is_raw_scalar() {
        return Err(DynError::InvalidOperandTypes { op, lhs: "object", rhs: root_name(&arr)? }.into());
    }
    let mut out = Vec::with_capacity(arr.len());
    for i in 0..arr.len() {
        match arr.get(i)? {
            Some(Node::Scalar(Scalar::Null)) => {}
            Some(Node::Scalar(s @ Scalar::String(_))) => out.push(s),
            Some(Node::Scalar(s)) => {
                return Err(DynError::InvalidOperandTypes { op, lhs: "string", rhs: s.kind().name() }.into());
            }
            Some(Node::Container(c)) => {
                return Err(DynError::InvalidOperandTypes { op, lhs: "string", rhs: root_name(&c)? }.into());
            }
            None => return Err(DynError::UnbalancedContainer { detail: "array shorter than its count" }.into()),
        }
    }
    Ok(out)
}

/// `?|`: whether any of the keys exists.
///
/// Between two points this is instead the test for vertical alignment.
pub fn exists_any(datum: &[u8], keys: &[u8]) -> Result<bool, Error> {
    if let (Some(Scalar::Point(p)), Some(Scalar::Point(q))) = (operand(datum)?, operand(keys)?) {
        return Ok(p.is_vertical(&q));
    }
    let root = ContainerRef::root(datum)?;
    for k in key_list(keys, "?|")? {
        if has_key(&root, &k)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `?&`: whether all of the keys exist.
pub fn exists_all(datum: &[u8], keys: &[u8]) -> Result<bool, Error> {
    let root = ContainerRef::root(datum)?;
    for k in key_list(keys, "?&")? {
        if !has_key(&root, &k)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_network(s: &ScalarRef) -> bool { matches!(s, Scalar::Inet(_) | Scalar::Cidr(_) | Scalar::String(_)) }

fn inets(op: &'static str, x: &ScalarRef, y: &ScalarRef) -> Result<(Inet, Inet), Error> {
    if !is_network(x) || !is_network(y) {
        return Err(invalid(op, x, y));
    }
    Ok((inet_of(x)?, inet_of(y)?))
}

fn operands<'a>(a: &'a [u8], b: &'a [u8], op: &'static str) -> Result<(ScalarRef<'a>, ScalarRef<'a>), Error> {
    Ok((root_scalar(a, op)?, root_scalar(b, op)?))
}

/// `~`: bitwise complement of an address.
pub fn not(a: &[u8]) -> Result<Vec<u8>, Error> {
    let x = root_scalar(a, "~")?;
    let (p, _) = inets("~", &x, &x)?;
    packed(Scalar::Inet(p.not()))
}

/// `&`: bitwise and of two addresses, or the conjunction of two text-search queries.
pub fn and(a: &[u8], b: &[u8]) -> Result<Vec<u8>, Error> {
    let (x, y) = operands(a, b, "&")?;
    packed(match (&x, &y) {
        (Scalar::TsQuery(_), _) | (_, Scalar::TsQuery(_)) => {
            Scalar::from_tsquery(&tsquery_of(&x)?.and(tsquery_of(&y)?))
        }
        _ => {
            let (p, q) = inets("&", &x, &y)?;
            Scalar::Inet(p.and(&q)?)
        }
    })
}

/// `|`: bitwise or of two addresses.
pub fn or(a: &[u8], b: &[u8]) -> Result<Vec<u8>, Error> {
    let (x, y) = operands(a, b, "|")?;
    let (p, q) = inets("|", &x, &y)?;
    packed(Scalar::Inet(p.or(&q)?))
}

/// `<<`: strictly inside a network, or strictly left of another shape.
pub fn subnet_of(a: &[u8], b: &[u8]) -> Result<bool, Error> {
    let (x, y) = operands(a, b, "<<")?;
    Ok(match (&x, &y) {
        (Scalar::Box(p), Scalar::Box(q)) => p.left_of(q),
        (Scalar::Polygon(p), Scalar::Polygon(q)) => {
            Polygon::from_body(p)?.bounding_box().left_of(&Polygon::from_body(q)?.bounding_box())
        }
        (Scalar::Circle(p), Scalar::Circle(q)) => p.bounding_box().left_of(&q.bounding_box()),
        _ => {
            let (p, q) = inets("<<", &x, &y)?;
            p.sub(&q)
        }
    })
}

/// `<<=`: inside or equal to a network.
pub fn subnet_of_or_eq(a: &[u8], b: &[u8]) -> Result<bool, Error> {
    let (x, y) = operands(a, b, "<<=")?;
    let (p, q) = inets("<<=", &x, &y)?;
    Ok(p.sub_eq(&q))
}

/// `>>`: strictly contains a network, or strictly right of another shape.
pub fn supernet_of(a: &[u8], b: &[u8]) -> Result<bool, Error> {
    let (x, y) = operands(a, b, ">>")?;
    Ok(match (&x, &y) {
        (Scalar::Box(p), Scalar::Box(q)) => p.right_of(q),
        (Scalar::Polygon(p), Scalar::Polygon(q)) => {
            Polygon::from_body(p)?.bounding_box().right_of(&Polygon::from_body(q)?.bounding_box())
        }
        (Scalar::Circle(p), Scalar::Circle(q)) => p.bounding_box().right_of(&q.bounding_box()),
        _ => {
            let (p, q) = inets(">>", &x, &y)?;
            p.sup(&q)
        }
    })
}

/// `>>=`: contains or equals a network.
pub fn supernet_of_or_eq(a: &[u8], b: &[u8]) -> Result<bool, Error> {
    let (x, y) = operands(a, b, ">>=")?;
    let (p, q) = inets(">>=", &x, &y)?;
    Ok(p.sup_eq(&q))
}

/// `&&`: the networks or shapes share at least one address or point.
pub fn overlaps(a: &[u8], b: &[u8]) -> Result<bool, Error> {
    let (x, y) = operands(a, b, "&&")?;
    Ok(match (&x, &y) {
        (Scalar::Box(p), Scalar::Box(q)) => p.overlaps(q),
        (Scalar::Polygon(p), Scalar::Polygon(q)) => Polygon::from_body(p)?.overlaps(&Polygon::from_body(q)?),
        (Scalar::Circle(p), Scalar::Circle(q)) => p.overlaps(q),
        _ => {
            let (p, q) = inets("&&", &x, &y)?;
            p.overlaps(&q)
        }
    })
}

fn contains_scalar(x: &ScalarRef, y: &ScalarRef) -> Result<Option<bool>, Error> {
    Ok(Some(match (x, y) {
        (Scalar::TsQuery(_), Scalar::TsQuery(_))
        | (Scalar::TsQuery(_), Scalar::String(_))
        | (Scalar::String(_), Scalar::TsQuery(_)) => tsquery_of(x)?.contains(&tsquery_of(y)?),
        (Scalar::Box(p), Scalar::Point(q)) => p.contains_point(q),
        (Scalar::Box(p), Scalar::Box(q)) => p.contains_box(q),
        (Scalar::Path(p), Scalar::Point(q)) => path_of(p)?.contains_point(q),
        (Scalar::Polygon(p), Scalar::Point(q)) => Polygon::from_body(p)?.contains_point(q),
        (Scalar::Circle(p), Scalar::Point(q)) => p.contains_point(q),
        (Scalar::Circle(p), Scalar::Circle(q)) => p.contains_circle(q),
        _ => return Ok(None),
    }))
}

/// `@>`: shape and query containment between scalars, tree containment otherwise.
pub fn contains(a: &[u8], b: &[u8]) -> Result<bool, Error> { contains_with(a, b, &Config::default()) }

/// [`contains`] with explicit limits.
pub fn contains_with(a: &[u8], b: &[u8], cfg: &Config) -> Result<bool, Error> {
    if let (Some(x), Some(y)) = (operand(a)?, operand(b)?) {
        if let Some(hit) = contains_scalar(&x, &y)? {
            return Ok(hit);
        }
    }
    tree_contains_with(a, b, cfg)
}

/// `<@`: [`contains`] with the operands swapped.
pub fn contained_by(a: &[u8], b: &[u8]) -> Result<bool, Error> { contains(b, a) }
