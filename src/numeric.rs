//! Arbitrary-precision decimals.
//!
//! A finite [`Numeric`] is an integer mantissa and a decimal scale, so `3.10` is
//! `310 * 10^-2` and keeps its trailing zero when printed. `NaN` and the two infinities
//! are separate variants. `NaN` sorts above everything and equals itself.
//!
//! # Example
//!
//! ```
//! use dynval::numeric::Numeric;
//! use std::str::FromStr;
//!
//! let a = Numeric::from_str("1.10").unwrap();
//! let b = Numeric::from_str("2.2").unwrap();
//!
//! assert_eq!(a.add(&b).to_string(), "3.30");
//! assert_eq!(a.mul(&b).to_string(), "2.420");
//! ```

use crate::{errors::DynError, util::*};
use failure::Error;
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{pow, One, Signed, ToPrimitive, Zero};
use std::{cmp::Ordering, fmt, str::FromStr};

/// Largest scale a value may carry.
pub const MAX_SCALE: u32 = 16383;
/// Minimum significant digits produced by division.
const MIN_SIG_DIGITS: i64 = 16;

const KIND_FINITE: u8 = 0;
const KIND_NAN: u8 = 1;
const KIND_PINF: u8 = 2;
const KIND_NINF: u8 = 3;

#[derive(Clone, Debug)]
/// An arbitrary-precision decimal number.
pub enum Numeric {
    /// Not a number.
    NaN,
    /// Positive infinity.
    Infinity,
    /// Negative infinity.
    NegInfinity,
    /// `digits * 10^-scale`.
    Finite {
        /// The unscaled value.
        digits: BigInt,
        /// Number of digits after the decimal point.
        scale: u32,
    },
}

use Numeric::*;

fn ten_pow(n: u32) -> BigInt { pow(BigInt::from(10), n as usize) }

/// Divides and rounds half away from zero.
fn div_round(num: &BigInt, den: &BigInt) -> BigInt {
    let (q, r) = num.div_rem(den);
    if (r.abs() * 2u32) >= den.abs() {
        if num.sign() == den.sign() {
            q + BigInt::one()
        } else {
            q - BigInt::one()
        }
    } else {
        q
    }
}

/// Position of the most significant digit relative to the decimal point.
fn magnitude(digits: &BigInt, scale: u32) -> i64 {
    if digits.is_zero() {
        return 0;
    }
    digits.abs().to_str_radix(10).len() as i64 - scale as i64
}

impl Numeric {
    /// The finite value `digits * 10^-scale`.
    pub fn new(digits: BigInt, scale: u32) -> Self { Finite { digits, scale } }

    /// Zero with scale 0.
    pub fn zero() -> Self { Finite { digits: BigInt::zero(), scale: 0 } }

    /// Whether this is `NaN`.
    pub fn is_nan(&self) -> bool {
        match self {
            NaN => true,
            _ => false,
        }
    }

    /// Whether this is a finite zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Finite { digits, .. } => digits.is_zero(),
            _ => false,
        }
    }

    /// Scale of a finite value; 0 for the special values.
    pub fn scale(&self) -> u32 {
        match self {
            Finite { scale, .. } => *scale,
            _ => 0,
        }
    }

    /// The same value with trailing fractional zeros removed.
    pub fn normalized(&self) -> Numeric {
        match self {
            Finite { digits, scale } => {
                let mut digits = digits.clone();
                let mut scale = *scale;
                let ten = BigInt::from(10);
                while scale > 0 {
                    let (q, r) = digits.div_rem(&ten);
                    if !r.is_zero() {
                        break;
                    }
                    digits = q;
                    scale -= 1;
                }
                if digits.is_zero() {
                    scale = 0;
                }
                Finite { digits, scale }
            }
            special => special.clone(),
        }
    }

    /// Rounds a finite value to `scale` fractional digits, half away from zero.
    pub fn round_to(&self, scale: u32) -> Numeric {
        match self {
            Finite { digits, scale: s } if *s > scale => Finite {
                digits: div_round(digits, &ten_pow(s - scale)),
                scale,
            },
            Finite { digits, scale: s } => Finite {
                digits: digits * ten_pow(scale - s),
                scale,
            },
            special => special.clone(),
        }
    }

    fn aligned(&self, scale: u32) -> BigInt {
        match self {
            Finite { digits, scale: s } if *s <= scale => digits * ten_pow(scale - s),
            Finite { digits, scale: s } => digits / ten_pow(s - scale),
            _ => BigInt::zero(),
        }
    }

    fn clamp_scale(n: Numeric) -> Numeric {
        if n.scale() > MAX_SCALE {
            n.round_to(MAX_SCALE)
        } else {
            n
        }
    }

    fn signum(&self) -> i32 {
        match self {
            NaN => 0,
            Infinity => 1,
            NegInfinity => -1,
            Finite { digits, .. } => match digits.sign() {
                Sign::Minus => -1,
                Sign::NoSign => 0,
                Sign::Plus => 1,
            },
        }
    }

    fn inf_of_sign(sign: i32) -> Numeric {
        if sign < 0 {
            NegInfinity
        } else {
            Infinity
        }
    }

    /// Sum.
    pub fn add(&self, other: &Numeric) -> Numeric {
        match (self, other) {
            (NaN, _) | (_, NaN) => NaN,
            (Infinity, NegInfinity) | (NegInfinity, Infinity) => NaN,
            (Infinity, _) | (_, Infinity) => Infinity,
            (NegInfinity, _) | (_, NegInfinity) => NegInfinity,
            (Finite { scale: s1, .. }, Finite { scale: s2, .. }) => {
                let scale = *s1.max(s2);
                Finite { digits: self.aligned(scale) + other.aligned(scale), scale }
            }
        }
    }

    /// Difference.
    pub fn sub(&self, other: &Numeric) -> Numeric { self.add(&other.neg()) }

    /// Negation.
    pub fn neg(&self) -> Numeric {
        match self {
            NaN => NaN,
            Infinity => NegInfinity,
            NegInfinity => Infinity,
            Finite { digits, scale } => Finite { digits: -digits, scale: *scale },
        }
    }

    /// Product; the result scale is the sum of the operand scales.
    pub fn mul(&self, other: &Numeric) -> Numeric {
        match (self, other) {
            (NaN, _) | (_, NaN) => NaN,
            (Finite { .. }, Finite { .. }) => {
                let (d1, s1) = self.parts();
                let (d2, s2) = other.parts();
                Self::clamp_scale(Finite { digits: d1 * d2, scale: s1 + s2 })
            }
            _ => {
                let sign = self.signum() * other.signum();
                if sign == 0 {
                    NaN
                } else {
                    Self::inf_of_sign(sign)
                }
            }
        }
    }

    fn parts(&self) -> (BigInt, u32) {
        match self {
            Finite { digits, scale } => (digits.clone(), *scale),
            _ => (BigInt::zero(), 0),
        }
    }

    /// Quotient, rounded to at least 16 significant digits.
    ///
    /// Fails with [`DynError::DivisionByZero`] when `other` is zero.
    pub fn div(&self, other: &Numeric) -> Result<Numeric, Error> {
        match (self, other) {
            (NaN, _) | (_, NaN) => Ok(NaN),
            _ if other.is_zero() => Err(DynError::DivisionByZero.into()),
            (Finite { .. }, Finite { .. }) => {
                let (d1, s1) = self.parts();
                let (d2, s2) = other.parts();
                let qmag = magnitude(&d1, s1) - magnitude(&d2, s2);
                let rscale = (MIN_SIG_DIGITS - qmag)
                    .max(s1 as i64)
                    .max(s2 as i64)
                    .max(0)
                    .min(MAX_SCALE as i64);
                // d1/10^s1 / (d2/10^s2) * 10^rscale
                let shift = rscale + s2 as i64 - s1 as i64;
                let digits = if shift >= 0 {
                    div_round(&(d1 * ten_pow(shift as u32)), &d2)
                } else {
                    div_round(&d1, &(d2 * ten_pow((-shift) as u32)))
                };
                Ok(Finite { digits, scale: rscale as u32 })
            }
            (Finite { .. }, _) => Ok(Numeric::zero()),
            (_, Finite { .. }) => Ok(Self::inf_of_sign(self.signum() * other.signum())),
            _ => Ok(NaN),
        }
    }

    /// Remainder with the sign of the dividend.
    ///
    /// Fails with [`DynError::DivisionByZero`] when `other` is zero.
    pub fn rem(&self, other: &Numeric) -> Result<Numeric, Error> {
        match (self, other) {
            (NaN, _) | (_, NaN) => Ok(NaN),
            _ if other.is_zero() => Err(DynError::DivisionByZero.into()),
            (Finite { scale: s1, .. }, Finite { scale: s2, .. }) => {
                let scale = *s1.max(s2);
                Ok(Finite { digits: self.aligned(scale) % other.aligned(scale), scale })
            }
            (Finite { .. }, _) => Ok(self.clone()),
            _ => Ok(NaN),
        }
    }

    /// `self` raised to `exp`. Integral exponents are exact; anything else goes through
    /// `f64`.
    pub fn pow(&self, exp: &Numeric) -> Result<Numeric, Error> {
        if self.is_nan() || exp.is_nan() {
            return Ok(NaN);
        }
        if self.is_zero() && exp.signum() < 0 {
            return Err(DynError::DivisionByZero.into());
        }
        if let Finite { digits, scale } = exp.normalized() {
            if scale == 0 {
                if let (Some(e), Finite { .. }) = (digits.to_i64(), self) {
                    if e.abs() <= 1000 {
                        let (d, s) = self.parts();
                        let r = Self::clamp_scale(Finite {
                            digits: pow(d, e.abs() as usize),
                            scale: s * e.abs() as u32,
                        });
                        return if e < 0 { Numeric::from(1).div(&r) } else { Ok(r) };
                    }
                }
            }
        }
        let f = self.to_f64().powf(exp.to_f64());
        if f.is_nan() && !self.to_f64().is_nan() {
            return Err(DynError::NumericOverflow { what: "numeric power" }.into());
        }
        Ok(Numeric::from_f64(f))
    }

    /// Nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        match self {
            NaN => std::f64::NAN,
            Infinity => std::f64::INFINITY,
            NegInfinity => std::f64::NEG_INFINITY,
            finite => finite.to_string().parse().unwrap_or(std::f64::NAN),
        }
    }

    /// Rounds to an integer, failing if it does not fit 64 bits or is not finite.
    pub fn to_i64(&self) -> Result<i64, Error> {
        match self.round_to(0) {
            Finite { digits, .. } => digits
                .to_i64()
                .ok_or_else(|| DynError::NumericOverflow { what: "bigint" }.into()),
            _ => Err(DynError::NumericOverflow { what: "bigint" }.into()),
        }
    }

    /// Converts via the shortest decimal that reads back as `f`.
    pub fn from_f64(f: f64) -> Numeric {
        if f.is_nan() {
            NaN
        } else if f.is_infinite() {
            Self::inf_of_sign(if f > 0.0 { 1 } else { -1 })
        } else {
            Numeric::from_str(&format!("{:?}", f)).unwrap_or(NaN)
        }
    }

    /// Converts to the exact binary value of `f`, used for ordering.
    pub fn from_f64_exact(f: f64) -> Numeric {
        if !f.is_finite() {
            return Numeric::from_f64(f);
        }
        let bits = f.to_bits();
        let negative = bits >> 63 == 1;
        let exp = ((bits >> 52) & 0x7ff) as i64;
        let frac = bits & 0x000f_ffff_ffff_ffff;
        let (mantissa, exp) = if exp == 0 {
            (frac, -1074)
        } else {
            (frac | (1 << 52), exp - 1075)
        };
        let mut digits = BigInt::from(mantissa);
        let scale = if exp >= 0 {
            digits = digits << exp as usize;
            0
        } else {
            // m * 2^-k == m * 5^k / 10^k
            digits = digits * pow(BigInt::from(5), (-exp) as usize);
            (-exp) as u32
        };
        if negative {
            digits = -digits;
        }
        Finite { digits, scale }
    }

    /// Total order: `-Infinity < finite < Infinity < NaN`, and `NaN` equals `NaN`.
    pub fn total_cmp(&self, other: &Numeric) -> Ordering {
        fn rank(n: &Numeric) -> u8 {
            match n {
                NegInfinity => 0,
                Finite { .. } => 1,
                Infinity => 2,
                NaN => 3,
            }
        }
        match (self, other) {
            (Finite { scale: s1, .. }, Finite { scale: s2, .. }) => {
                let scale = *s1.max(s2);
                self.aligned(scale).cmp(&other.aligned(scale))
            }
            _ => rank(self).cmp(&rank(other)),
        }
    }

    /// Serializes the body: scale, kind byte, sign byte, little-endian magnitude.
    pub fn to_body(&self) -> Vec<u8> {
        let (kind, scale, sign, mag) = match self {
            NaN => (KIND_NAN, 0, 0, vec![]),
            Infinity => (KIND_PINF, 0, 0, vec![]),
            NegInfinity => (KIND_NINF, 0, 0, vec![]),
            Finite { digits, scale } => {
                let (sign, mag) = digits.to_bytes_le();
                let mag = if sign == Sign::NoSign { vec![] } else { mag };
                (KIND_FINITE, *scale, (sign == Sign::Minus) as u8, mag)
            }
        };
        let mut out = Vec::with_capacity(4 + mag.len());
        out.extend_from_slice(&(scale as u16).to_le_bytes());
        out.push(kind);
        out.push(sign);
        out.extend_from_slice(&mag);
        out
    }

    /// Reads a body written by [`Numeric::to_body`].
    pub fn from_body(body: &[u8]) -> Result<Numeric, Error> {
        let scale = read_u16(body, 0)? as u32;
        let kind = read_u8(body, 2)?;
        let sign = read_u8(body, 3)?;
        match kind {
            KIND_NAN => Ok(NaN),
            KIND_PINF => Ok(Infinity),
            KIND_NINF => Ok(NegInfinity),
            _ => {
                let mag = &body[4..];
                let sign = if mag.iter().all(|b| *b == 0) {
                    Sign::NoSign
                } else if sign == 1 {
                    Sign::Minus
                } else {
                    Sign::Plus
                };
                Ok(Finite { digits: BigInt::from_bytes_le(sign, mag), scale })
            }
        }
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Numeric) -> bool { self.total_cmp(other) == Ordering::Equal }
}

impl Eq for Numeric {}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Numeric) -> Option<Ordering> { Some(self.total_cmp(other)) }
}

impl Ord for Numeric {
    fn cmp(&self, other: &Numeric) -> Ordering { self.total_cmp(other) }
}

impl From<i64> for Numeric {
    fn from(i: i64) -> Self { Finite { digits: BigInt::from(i), scale: 0 } }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NaN => write!(f, "NaN"),
            Infinity => write!(f, "Infinity"),
            NegInfinity => write!(f, "-Infinity"),
            Finite { digits, scale } => {
                let s = digits.abs().to_str_radix(10);
                let scale = *scale as usize;
                if digits.is_negative() {
                    write!(f, "-")?;
                }
                if scale == 0 {
                    write!(f, "{}", s)
                } else if s.len() > scale {
                    let (int, frac) = s.split_at(s.len() - scale);
                    write!(f, "{}.{}", int, frac)
                } else {
                    write!(f, "0.{}{}", "0".repeat(scale - s.len()), s)
                }
            }
        }
    }
}

impl FromStr for Numeric {
    type Err = Error;

    fn from_str(text: &str) -> Result<Numeric, Error> {
        let bad = || -> Error { DynError::invalid_text("numeric", text).into() };
        let s = text.trim();
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let lower = body.to_ascii_lowercase();
        match lower.as_str() {
            "nan" if body.len() == s.len() => return Ok(NaN),
            "inf" | "infinity" => {
                return Ok(if negative { NegInfinity } else { Infinity });
            }
            _ => {}
        }
        let (mantissa, exp) = match lower.find('e') {
            Some(i) => {
                let exp: i64 = lower[i + 1..].parse().map_err(|_| bad())?;
                (&lower[..i], exp)
            }
            None => (lower.as_str(), 0),
        };
        let (int, frac) = match mantissa.find('.') {
            Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
            None => (mantissa, ""),
        };
        if int.is_empty() && frac.is_empty()
            || !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(bad());
        }
        let mut digits = BigInt::parse_bytes(format!("0{}{}", int, frac).as_bytes(), 10)
            .ok_or_else(|| bad())?;
        let frac_len = frac.len() as i64;
        if exp.abs() > MAX_SCALE as i64 * 4 {
            return Err(bad());
        }
        let scale = frac_len - exp;
        let scale = if scale < 0 {
            digits = digits * ten_pow((-scale) as u32);
            0
        } else {
            scale as u32
        };
        if negative {
            digits = -digits;
        }
        Ok(Self::clamp_scale(Finite { digits, scale }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> Numeric { Numeric::from_str(s).unwrap() }

    #[test]
    fn parse_and_print() {
        assert_eq!(n("3.10").to_string(), "3.10");
        assert_eq!(n("-0.05").to_string(), "-0.05");
        assert_eq!(n("1e3").to_string(), "1000");
        assert_eq!(n("1.5e-3").to_string(), "0.0015");
        assert_eq!(n("nan").to_string(), "NaN");
        assert_eq!(n("-Infinity").to_string(), "-Infinity");
        assert!(Numeric::from_str("1.2.3").is_err());
        assert!(Numeric::from_str("").is_err());
        assert!(Numeric::from_str("-nan").is_err());
    }

    #[test]
    fn equality_ignores_trailing_zeros() {
        assert_eq!(n("3.10"), n("3.1"));
        assert_eq!(n("3.10").normalized().to_string(), "3.1");
        assert_eq!(n("0.000").normalized().scale(), 0);
        assert!(n("NaN") > n("Infinity"));
        assert!(n("-Infinity") < n("-1e100"));
        assert_eq!(n("NaN"), n("NaN"));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(n("1.5").add(&n("2.25")).to_string(), "3.75");
        assert_eq!(n("1.5").sub(&n("2.25")).to_string(), "-0.75");
        let q = n("10").div(&n("4")).unwrap();
        assert_eq!(q, n("2.5"));
        assert_eq!(q.scale(), 15);
        assert_eq!(n("1").div(&n("3")).unwrap().to_string(), "0.3333333333333333");
        assert_eq!(n("7.5").rem(&n("2")).unwrap().to_string(), "1.5");
        assert_eq!(n("-7").rem(&n("2")).unwrap().to_string(), "-1");
        assert_eq!(n("2").pow(&n("10")).unwrap().to_string(), "1024");
        assert_eq!(n("1.5").to_i64().unwrap(), 2);
        assert_eq!(n("-1.5").to_i64().unwrap(), -2);
        assert!(n("1").div(&n("0.0")).is_err());
        assert!(n("Infinity").add(&n("-Infinity")).is_nan());
    }

    #[test]
    fn body_layout() {
        let body = n("-2.56").to_body();
        // scale
        assert_eq!(&body[0..2], &[2, 0]);
        // finite, negative
        assert_eq!(&body[2..4], &[KIND_FINITE, 1]);
        // 256, little endian
        assert_eq!(&body[4..], &[0, 1]);
        assert_eq!(Numeric::from_body(&body).unwrap().to_string(), "-2.56");
        assert_eq!(Numeric::from_body(&n("0.00").to_body()).unwrap().to_string(), "0.00");
        assert!(Numeric::from_body(&[1]).is_err());
    }

    #[test]
    fn exact_float_conversion() {
        assert_eq!(Numeric::from_f64_exact(0.5), n("0.5"));
        assert_eq!(Numeric::from_f64_exact(-3.0), n("-3"));
        assert!(Numeric::from_f64_exact(0.1) > n("0.1"));
        assert_eq!(Numeric::from_f64(0.1), n("0.1"));
    }
}
