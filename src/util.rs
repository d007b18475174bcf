use crate::errors::DynError;
use byteorder::{ByteOrder, LittleEndian};
use failure::Error;
use std::cmp::Ordering;

/// Byte order of every multi-byte word in a packed datum.
pub(crate) type Endian = LittleEndian;

/// Rounds `len` up to the next multiple of 4.
///
/// # Example
///
/// ```
/// use dynval::util::int_align;
///
/// assert_eq!(int_align(0), 0);
/// assert_eq!(int_align(5), 8);
/// assert_eq!(int_align(8), 8);
/// ```
#[inline]
pub fn int_align(len: usize) -> usize { (len + 3) & !3 }

/// Borrows `len` bytes at `at`, failing with [`DynError::TruncatedPayload`] past the end.
#[inline]
pub(crate) fn read_slice(buf: &[u8], at: usize, len: usize) -> Result<&[u8], Error> {
    match at.checked_add(len) {
        Some(end) if end <= buf.len() => Ok(&buf[at..end]),
        _ => Err(DynError::TruncatedPayload { needed: len, at, len: buf.len() }.into()),
    }
}

/// Borrows `b` as text, failing with [`DynError::InvalidUtf8`] at the first bad byte.
#[inline]
pub fn utf8(b: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(b).map_err(|e| DynError::InvalidUtf8 { at: e.valid_up_to() }.into())
}

#[inline]
pub(crate) fn read_u8(buf: &[u8], at: usize) -> Result<u8, Error> { Ok(read_slice(buf, at, 1)?[0]) }

#[inline]
pub(crate) fn read_u16(buf: &[u8], at: usize) -> Result<u16, Error> {
    Ok(Endian::read_u16(read_slice(buf, at, 2)?))
}

#[inline]
pub(crate) fn read_u32(buf: &[u8], at: usize) -> Result<u32, Error> {
    Ok(Endian::read_u32(read_slice(buf, at, 4)?))
}

#[inline]
pub(crate) fn read_i32(buf: &[u8], at: usize) -> Result<i32, Error> {
    Ok(Endian::read_i32(read_slice(buf, at, 4)?))
}

#[inline]
pub(crate) fn read_i64(buf: &[u8], at: usize) -> Result<i64, Error> {
    Ok(Endian::read_i64(read_slice(buf, at, 8)?))
}

#[inline]
pub(crate) fn read_f64(buf: &[u8], at: usize) -> Result<f64, Error> {
    Ok(Endian::read_f64(read_slice(buf, at, 8)?))
}

/// Total order on floats: `-inf < finite < +inf < NaN`, with every NaN equal.
pub fn float_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Shortest text that reads back as the same `f64`.
///
/// Exponent notation is used below `1e-4` and from `1e15` up. With `force_point`, an
/// integral result gains a trailing `.0` so it is not read back as an integer.
///
/// # Example
///
/// ```
/// use dynval::util::format_f64;
///
/// assert_eq!(format_f64(2.0, true), "2.0");
/// assert_eq!(format_f64(2.0, false), "2");
/// assert_eq!(format_f64(1.5e300, true), "1.5e+300");
/// assert_eq!(format_f64(f64::NAN, true), "NaN");
/// ```
pub fn format_f64(f: f64, force_point: bool) -> String {
    if f.is_nan() {
        return "NaN".into();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }
    let sci = format!("{:e}", f);
    let (mantissa, exp) = match sci.find('e') {
        Some(i) => (&sci[..i], sci[i + 1..].parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if f != 0.0 && (exp < -4 || exp >= 15) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exp.abs());
    }
    let mut out = format!("{}", f);
    if force_point && !out.contains('.') {
        out.push_str(".0");
    }
    out
}

/// Lowercase hex rendering of a byte string.
pub(crate) fn to_hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0xf) as usize] as char);
    }
    out
}

#[inline]
pub(crate) fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[macro_export]
/// Helper macro to compose `From` implementations.
macro_rules! compose_from {
    ($to:tt, $mid:tt, $from:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> Self { Self::from($mid::from(f)) }
        }
    };
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_as {
    ($to:tt, $from:ty, $as:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $to::from(f as $as) }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_bounds_checked() {
        let buf = [1u8, 0, 0, 0, 2];
        assert_eq!(read_u32(&buf, 0).unwrap(), 1);
        assert_eq!(read_u8(&buf, 4).unwrap(), 2);
        let err = read_u32(&buf, 2).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DynError>(),
            Some(&DynError::TruncatedPayload { needed: 4, at: 2, len: 5 })
        );
        assert!(read_slice(&buf, usize::max_value(), 2).is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(float_cmp(f64::NAN, f64::INFINITY), Ordering::Greater);
        assert_eq!(float_cmp(f64::NAN, f64::NAN), Ordering::Equal);
        assert_eq!(float_cmp(-0.0, 0.0), Ordering::Equal);
        assert_eq!(format_f64(-0.5, true), "-0.5");
        assert_eq!(format_f64(1e-5, true), "1e-05");
        assert_eq!(format_f64(123456.0, true), "123456.0");
        assert_eq!(format_f64(1e15, false), "1e+15");
        assert_eq!(format_f64(f64::NEG_INFINITY, false), "-Infinity");
    }

    #[test]
    fn hex() {
        assert_eq!(to_hex(&[0x00, 0xab, 0x7f]), "00ab7f");
        assert_eq!(hex_value(b'F'), Some(15));
        assert_eq!(hex_value(b'g'), None);
    }
}
