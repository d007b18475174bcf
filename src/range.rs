//! Ranges and multiranges over integers, numerics, timestamps and dates.

use crate::{
    errors::DynError,
    numeric::Numeric,
    temporal,
    util::{read_i32, read_i64, read_slice, read_u32, read_u8, Endian},
};
use byteorder::ByteOrder;
use failure::Error;
use std::{cmp::Ordering, fmt, str::FromStr};

const EMPTY: u8 = 0x01;
const LB_INC: u8 = 0x02;
const UB_INC: u8 = 0x04;
const LB_INF: u8 = 0x08;
const UB_INF: u8 = 0x10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Element kind of a range.
pub enum RangeKind {
    Int,
    Num,
    Ts,
    TsTz,
    Date,
}

impl RangeKind {
    /// All kinds, in tag order.
    pub const ALL: [RangeKind; 5] =
        [RangeKind::Int, RangeKind::Num, RangeKind::Ts, RangeKind::TsTz, RangeKind::Date];

    /// Offset of this kind from the first range or multirange tag.
    pub fn index(self) -> u32 {
        match self {
            RangeKind::Int => 0,
            RangeKind::Num => 1,
            RangeKind::Ts => 2,
            RangeKind::TsTz => 3,
            RangeKind::Date => 4,
        }
    }

    /// Inverse of [`RangeKind::index`].
    pub fn from_index(i: u32) -> Option<RangeKind> { RangeKind::ALL.get(i as usize).cloned() }

    /// Name of the range type.
    pub fn range_name(self) -> &'static str {
        match self {
            RangeKind::Int => "int8range",
            RangeKind::Num => "numrange",
            RangeKind::Ts => "tsrange",
            RangeKind::TsTz => "tstzrange",
            RangeKind::Date => "daterange",
        }
    }

    /// Name of the multirange type.
    pub fn multirange_name(self) -> &'static str {
        match self {
            RangeKind::Int => "int8multirange",
            RangeKind::Num => "nummultirange",
            RangeKind::Ts => "tsmultirange",
            RangeKind::TsTz => "tstzmultirange",
            RangeKind::Date => "datemultirange",
        }
    }

    fn is_discrete(self) -> bool { matches!(self, RangeKind::Int | RangeKind::Date) }

    fn parse_value(self, text: &str) -> Result<RangeValue, Error> {
        Ok(match self {
            RangeKind::Int => RangeValue::Int(
                text.trim().parse().map_err(|_| DynError::invalid_text("bigint", text))?,
            ),
            RangeKind::Num => RangeValue::Num(Numeric::from_str(text)?),
            RangeKind::Ts => RangeValue::Ts(temporal::parse_timestamp(text)?),
            RangeKind::TsTz => RangeValue::TsTz(temporal::parse_timestamptz(text)?),
            RangeKind::Date => RangeValue::Date(temporal::parse_date(text)?),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A finite range bound value.
pub enum RangeValue {
    Int(i64),
    Num(Numeric),
    Ts(i64),
    TsTz(i64),
    Date(i32),
}

impl RangeValue {
    fn total_cmp(&self, other: &RangeValue) -> Ordering {
        use RangeValue::*;
        match (self, other) {
            (Int(a), Int(b)) | (Ts(a), Ts(b)) | (TsTz(a), TsTz(b)) => a.cmp(b),
            (Num(a), Num(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }

    /// The next value of a discrete kind.
    fn successor(&self) -> Result<RangeValue, Error> {
        let overflow = || -> Error { DynError::NumericOverflow { what: "range bound" }.into() };
        Ok(match self {
            RangeValue::Int(i) => RangeValue::Int(i.checked_add(1).ok_or_else(overflow)?),
            RangeValue::Date(d) => RangeValue::Date(d.checked_add(1).ok_or_else(overflow)?),
            other => other.clone(),
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            RangeValue::Int(i) | RangeValue::Ts(i) | RangeValue::TsTz(i) => {
                let mut buf = [0u8; 8];
                Endian::write_i64(&mut buf, *i);
                out.extend_from_slice(&buf);
            }
            RangeValue::Date(d) => {
                let mut buf = [0u8; 4];
                Endian::write_i32(&mut buf, *d);
                out.extend_from_slice(&buf);
            }
            RangeValue::Num(n) => {
                let body = n.to_body();
                let mut buf = [0u8; 4];
                Endian::write_u32(&mut buf, body.len() as u32);
                out.extend_from_slice(&buf);
                out.extend_from_slice(&body);
            }
        }
    }

    fn read(kind: RangeKind, b: &[u8], at: &mut usize) -> Result<RangeValue, Error> {
        let v = match kind {
            RangeKind::Int => RangeValue::Int(read_i64(b, *at)?),
            RangeKind::Ts => RangeValue::Ts(read_i64(b, *at)?),
            RangeKind::TsTz => RangeValue::TsTz(read_i64(b, *at)?),
            RangeKind::Date => {
                *at += 4;
                return Ok(RangeValue::Date(read_i32(b, *at - 4)?));
            }
            RangeKind::Num => {
                let len = read_u32(b, *at)? as usize;
                let body = read_slice(b, *at + 4, len)?;
                *at += 4 + len;
                return Ok(RangeValue::Num(Numeric::from_body(body)?));
            }
        };
        *at += 8;
        Ok(v)
    }
}

impl fmt::Display for RangeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RangeValue::Int(i) => write!(f, "{}", i),
            RangeValue::Num(n) => write!(f, "{}", n),
            RangeValue::Ts(t) => write!(f, "\"{}\"", temporal::format_timestamp(*t)),
            RangeValue::TsTz(t) => write!(f, "\"{}\"", temporal::format_timestamptz(*t)),
            RangeValue::Date(d) => write!(f, "{}", temporal::format_date(*d)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A finite bound and whether it is inclusive.
pub struct Bound {
    pub value: RangeValue,
    pub inclusive: bool,
}

#[derive(Clone, Debug, PartialEq)]
/// A range; `None` bounds are infinite.
pub struct Range {
    pub kind: RangeKind,
    pub empty: bool,
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

fn cmp_lower(a: &Option<Bound>, b: &Option<Bound>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        // an inclusive lower bound starts before an exclusive one
        (Some(x), Some(y)) => x.value.total_cmp(&y.value).then(y.inclusive.cmp(&x.inclusive)),
    }
}

fn cmp_upper(a: &Option<Bound>, b: &Option<Bound>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.value.total_cmp(&y.value).then(x.inclusive.cmp(&y.inclusive)),
    }
}

impl Range {
    /// The empty range of `kind`.
    pub fn empty(kind: RangeKind) -> Range { Range { kind, empty: true, lower: None, upper: None } }

    /// Builds a range, canonicalising discrete kinds to `[)` and collapsing to empty.
    pub fn new(kind: RangeKind, lower: Option<Bound>, upper: Option<Bound>) -> Result<Range, Error> {
        let (mut lower, mut upper) = (lower, upper);
        if kind.is_discrete() {
            if let Some(b) = lower.as_mut().filter(|b| !b.inclusive) {
                *b = Bound { value: b.value.successor()?, inclusive: true };
            }
            if let Some(b) = upper.as_mut().filter(|b| b.inclusive) {
                *b = Bound { value: b.value.successor()?, inclusive: false };
            }
        }
        if let (Some(l), Some(u)) = (&lower, &upper) {
            match l.value.total_cmp(&u.value) {
                Ordering::Greater => {
                    return Err(DynError::invalid_text(
                        kind.range_name(),
                        "range lower bound must be less than or equal to range upper bound",
                    )
                    .into())
                }
                Ordering::Equal if !(l.inclusive && u.inclusive) => return Ok(Range::empty(kind)),
                _ => {}
            }
        }
        Ok(Range { kind, empty: false, lower, upper })
    }

    /// Total order: empty first, then by lower bound, then by upper bound.
    pub fn total_cmp(&self, other: &Range) -> Ordering {
        match (self.empty, other.empty) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => cmp_lower(&self.lower, &other.lower).then_with(|| cmp_upper(&self.upper, &other.upper)),
        }
    }

    /// Packed body: flag byte, three pad bytes, then the finite bounds.
    pub fn to_body(&self) -> Vec<u8> {
        let mut flags = 0u8;
        if self.empty {
            flags |= EMPTY;
        } else {
            match &self.lower {
                Some(b) if b.inclusive => flags |= LB_INC,
                Some(_) => {}
                None => flags |= LB_INF,
            }
            match &self.upper {
                Some(b) if b.inclusive => flags |= UB_INC,
                Some(_) => {}
                None => flags |= UB_INF,
            }
        }
        let mut out = vec![flags, 0, 0, 0];
        if !self.empty {
            for b in self.lower.iter().chain(self.upper.iter()) {
                b.value.write(&mut out);
            }
        }
        out
    }

    /// Reads a packed body.
    pub fn from_body(kind: RangeKind, b: &[u8]) -> Result<Range, Error> {
        let flags = read_u8(b, 0)?;
        if flags & EMPTY != 0 {
            return Ok(Range::empty(kind));
        }
        let mut at = 4;
        let lower = if flags & LB_INF != 0 {
            None
        } else {
            Some(Bound { value: RangeValue::read(kind, b, &mut at)?, inclusive: flags & LB_INC != 0 })
        };
        let upper = if flags & UB_INF != 0 {
            None
        } else {
            Some(Bound { value: RangeValue::read(kind, b, &mut at)?, inclusive: flags & UB_INC != 0 })
        };
        Ok(Range { kind, empty: false, lower, upper })
    }

    /// Parses `empty` or `[lower,upper)` with either bracket on each side.
    pub fn parse(kind: RangeKind, text: &str) -> Result<Range, Error> {
        let bad = || -> Error { DynError::invalid_text(kind.range_name(), text).into() };
        let s = text.trim();
        if s.eq_ignore_ascii_case("empty") {
            return Ok(Range::empty(kind));
        }
        let lower_inc = match s.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => return Err(bad()),
        };
        let upper_inc = match s.chars().last() {
            Some(']') => true,
            Some(')') => false,
            _ => return Err(bad()),
        };
        if s.len() < 2 {
            return Err(bad());
        }
        let parts = split_top_level(&s[1..s.len() - 1]);
        if parts.len() != 2 {
            return Err(bad());
        }
        let bound = |part: &str, inclusive: bool| -> Result<Option<Bound>, Error> {
            match unquote(part) {
                None => Ok(None),
                Some(v) => Ok(Some(Bound { value: kind.parse_value(&v)?, inclusive })),
            }
        };
        Range::new(kind, bound(&parts[0], lower_inc)?, bound(&parts[1], upper_inc)?)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.empty {
            return write!(f, "empty");
        }
        match &self.lower {
            Some(b) => write!(f, "{}{}", if b.inclusive { '[' } else { '(' }, b.value)?,
            None => write!(f, "(")?,
        }
        write!(f, ",")?;
        match &self.upper {
            Some(b) => write!(f, "{}{}", b.value, if b.inclusive { ']' } else { ')' }),
            None => write!(f, ")"),
        }
    }
}

/// Splits on commas outside quotes and brackets.
fn split_top_level(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut cur = String::new();
    let mut depth = 0i32;
    let mut quoted = false;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => quoted = !quoted,
            '\\' if quoted => {
                cur.push(c);
                if let Some(n) = chars.next() {
                    cur.push(n);
                }
                continue;
            }
            '[' | '(' if !quoted => depth += 1,
            ']' | ')' if !quoted => depth -= 1,
            ',' if !quoted && depth == 0 => {
                parts.push(std::mem::replace(&mut cur, String::new()));
                continue;
            }
            _ => {}
        }
        cur.push(c);
    }
    parts.push(cur);
    parts
}

/// An unquoted empty bound is infinite.
fn unquote(part: &str) -> Option<String> {
    let t = part.trim();
    if t.is_empty() {
        return None;
    }
    if t.len() >= 2 && t.starts_with('"') && t.ends_with('"') {
        let mut out = String::new();
        let mut chars = t[1..t.len() - 1].chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => out.extend(chars.next()),
                '"' => {
                    // doubled quote
                    chars.next();
                    out.push('"');
                }
                _ => out.push(c),
            }
        }
        return Some(out);
    }
    Some(t.to_string())
}

#[derive(Clone, Debug, PartialEq)]
/// A sorted set of disjoint, non-adjacent, non-empty ranges.
pub struct Multirange {
    pub kind: RangeKind,
    pub ranges: Vec<Range>,
}

impl Multirange {
    /// Drops empties, sorts, and merges overlapping or touching ranges.
    pub fn new(kind: RangeKind, ranges: Vec<Range>) -> Multirange {
        let mut ranges: Vec<Range> = ranges.into_iter().filter(|r| !r.empty).collect();
        ranges.sort_by(|a, b| a.total_cmp(b));
        let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
        for r in ranges {
            match merged.last_mut() {
                Some(last) if touches(last, &r) => {
                    if cmp_upper(&r.upper, &last.upper) == Ordering::Greater {
                        last.upper = r.upper;
                    }
                }
                _ => merged.push(r),
            }
        }
        Multirange { kind, ranges: merged }
    }

    /// Range by range, then by count.
    pub fn total_cmp(&self, other: &Multirange) -> Ordering {
        self.ranges
            .iter()
            .zip(&other.ranges)
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| self.ranges.len().cmp(&other.ranges.len()))
    }

    /// Packed body: range count, then each range body with a length word.
    pub fn to_body(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buf = [0u8; 4];
        Endian::write_u32(&mut buf, self.ranges.len() as u32);
        out.extend_from_slice(&buf);
        for r in &self.ranges {
            let body = r.to_body();
            Endian::write_u32(&mut buf, body.len() as u32);
            out.extend_from_slice(&buf);
            out.extend_from_slice(&body);
        }
        out
    }

    /// Reads a packed body.
    pub fn from_body(kind: RangeKind, b: &[u8]) -> Result<Multirange, Error> {
        let n = read_u32(b, 0)? as usize;
        let mut at = 4;
        let mut ranges = Vec::with_capacity(n.min(b.len() / 8));
        for _ in 0..n {
            let len = read_u32(b, at)? as usize;
            ranges.push(Range::from_body(kind, read_slice(b, at + 4, len)?)?);
            at += 4 + len;
        }
        Ok(Multirange { kind, ranges })
    }

    /// Parses `{range, ...}`.
    pub fn parse(kind: RangeKind, text: &str) -> Result<Multirange, Error> {
        let s = text.trim();
        if !(s.starts_with('{') && s.ends_with('}')) || s.len() < 2 {
            return Err(DynError::invalid_text(kind.multirange_name(), text).into());
        }
        let inner = &s[1..s.len() - 1];
        if inner.trim().is_empty() {
            return Ok(Multirange { kind, ranges: Vec::new() });
        }
        let ranges = split_top_level(inner)
            .iter()
            .map(|part| Range::parse(kind, part))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Multirange::new(kind, ranges))
    }
}

/// Whether `next`, which sorts after `cur`, overlaps it or starts right where it ends.
fn touches(cur: &Range, next: &Range) -> bool {
    match (&cur.upper, &next.lower) {
        (None, _) | (_, None) => true,
        (Some(u), Some(l)) => match l.value.total_cmp(&u.value) {
            Ordering::Less => true,
            Ordering::Equal => u.inclusive || l.inclusive,
            Ordering::Greater => false,
        },
    }
}

impl fmt::Display for Multirange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{{{}}}", parts.join(","))
    }
}
