//! Network addresses: `inet`, `cidr`, `macaddr` and `macaddr8`.

use crate::{errors::DynError, util::to_hex};
use failure::Error;
use std::{
    cmp::Ordering,
    fmt,
    net::{Ipv4Addr, Ipv6Addr},
};

/// Family byte of an IPv4 address.
pub const FAMILY_V4: u8 = 2;
/// Family byte of an IPv6 address.
pub const FAMILY_V6: u8 = 3;
/// Size of a packed inet or cidr.
pub const INET_SIZE: usize = 22;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// An IPv4 or IPv6 host address or network with a prefix length.
pub struct Inet {
    /// [`FAMILY_V4`] or [`FAMILY_V6`].
    pub family: u8,
    /// Prefix length.
    pub bits: u8,
    /// Whether host bits past the prefix are zero by construction.
    pub is_cidr: bool,
    /// Address bytes; IPv4 uses the first four.
    pub addr: [u8; 16],
}

impl Inet {
    fn v4(octets: [u8; 4], bits: u8, is_cidr: bool) -> Self {
        let mut addr = [0u8; 16];
        addr[..4].copy_from_slice(&octets);
        Inet { family: FAMILY_V4, bits, is_cidr, addr }
    }

    /// Width of the address in bits.
    pub fn max_bits(&self) -> u8 { if self.family == FAMILY_V4 { 32 } else { 128 } }

    fn len(&self) -> usize { if self.family == FAMILY_V4 { 4 } else { 16 } }

    /// The meaningful address bytes.
    pub fn octets(&self) -> &[u8] { &self.addr[..self.len()] }

    /// Parses `inet` text: an address with an optional `/bits`.
    pub fn parse_inet(text: &str) -> Result<Inet, Error> { parse(text, false) }

    /// Parses `cidr` text; host bits past the prefix must be zero.
    pub fn parse_cidr(text: &str) -> Result<Inet, Error> { parse(text, true) }

    /// The same address flagged as inet or cidr.
    pub fn with_cidr(mut self, is_cidr: bool) -> Inet {
        self.is_cidr = is_cidr;
        self
    }

    /// Zeroes host bits and flags the value as cidr.
    pub fn network(&self) -> Inet {
        let mut out = *self;
        for i in 0..out.len() {
            out.addr[i] &= prefix_mask(self.bits, i);
        }
        out.is_cidr = true;
        out
    }

    /// The packed 22-byte form.
    pub fn to_bytes(&self) -> [u8; INET_SIZE] {
        let mut out = [0u8; INET_SIZE];
        out[0] = self.family;
        out[1] = self.bits;
        out[2] = self.is_cidr as u8;
        out[4..20].copy_from_slice(&self.addr);
        out
    }

    /// Reads the packed 22-byte form.
    pub fn from_bytes(b: &[u8]) -> Result<Inet, Error> {
        if b.len() < INET_SIZE {
            return Err(DynError::TruncatedPayload { needed: INET_SIZE, at: 0, len: b.len() }.into());
        }
        let mut addr = [0u8; 16];
        addr.copy_from_slice(&b[4..20]);
        Ok(Inet { family: b[0], bits: b[1], is_cidr: b[2] != 0, addr })
    }

    /// Orders by family, common prefix, prefix length and then the full address.
    pub fn total_cmp(&self, other: &Inet) -> Ordering {
        self.family
            .cmp(&other.family)
            .then_with(|| bit_cmp(&self.addr, &other.addr, self.bits.min(other.bits)))
            .then(self.bits.cmp(&other.bits))
            .then_with(|| bit_cmp(&self.addr, &other.addr, self.max_bits()))
    }

    /// `<<`: strictly contained within `other`.
    pub fn sub(&self, other: &Inet) -> bool {
        self.family == other.family
            && self.bits > other.bits
            && bit_cmp(&self.addr, &other.addr, other.bits) == Ordering::Equal
    }

    /// `<<=`: contained within or equal to `other`.
    pub fn sub_eq(&self, other: &Inet) -> bool {
        self.family == other.family
            && self.bits >= other.bits
            && bit_cmp(&self.addr, &other.addr, other.bits) == Ordering::Equal
    }

    /// `>>`: strictly contains `other`.
    pub fn sup(&self, other: &Inet) -> bool { other.sub(self) }

    /// `>>=`: contains or equals `other`.
    pub fn sup_eq(&self, other: &Inet) -> bool { other.sub_eq(self) }

    /// `&&`: either contains the other.
    pub fn overlaps(&self, other: &Inet) -> bool {
        self.family == other.family
            && bit_cmp(&self.addr, &other.addr, self.bits.min(other.bits)) == Ordering::Equal
    }

    /// `~`
    pub fn not(&self) -> Inet {
        let mut out = *self;
        for i in 0..out.len() {
            out.addr[i] = !out.addr[i];
        }
        out
    }

    /// `&`
    pub fn and(&self, other: &Inet) -> Result<Inet, Error> { self.bitwise(other, "&", |a, b| a & b) }

    /// `|`
    pub fn or(&self, other: &Inet) -> Result<Inet, Error> { self.bitwise(other, "|", |a, b| a | b) }

    fn bitwise(&self, other: &Inet, op: &'static str, f: impl Fn(u8, u8) -> u8) -> Result<Inet, Error> {
        if self.family != other.family {
            return Err(mixed_families(op));
        }
        let mut out = *self;
        out.bits = self.bits.max(other.bits);
        for i in 0..out.len() {
            out.addr[i] = f(self.addr[i], other.addr[i]);
        }
        Ok(out)
    }

    /// Adds `n` to the address, failing when it leaves the address space.
    pub fn add(&self, n: i64) -> Result<Inet, Error> {
        let overflow = || -> Error { DynError::NumericOverflow { what: "result" }.into() };
        let current = self.as_u128();
        let step = (n as i128).abs() as u128;
        let value = if n >= 0 { current.checked_add(step) } else { current.checked_sub(step) }
            .ok_or_else(overflow)?;
        if self.family == FAMILY_V4 && value >= 1u128 << 32 {
            return Err(overflow());
        }
        let mut out = *self;
        out.set_u128(value);
        if out.is_cidr && out.network() != out {
            return Err(overflow());
        }
        Ok(out)
    }

    /// Difference between two addresses of the same family.
    pub fn diff(&self, other: &Inet) -> Result<i64, Error> {
        if self.family != other.family {
            return Err(mixed_families("-"));
        }
        let (a, b) = (self.as_u128(), other.as_u128());
        let d = if a >= b { (a - b) as i128 } else { -((b - a) as i128) };
        if (a.max(b) - a.min(b)) > i64::max_value() as u128 {
            return Err(DynError::NumericOverflow { what: "result" }.into());
        }
        Ok(d as i64)
    }

    fn as_u128(&self) -> u128 { self.octets().iter().fold(0u128, |acc, b| (acc << 8) | *b as u128) }

    fn set_u128(&mut self, mut v: u128) {
        for i in (0..self.len()).rev() {
            self.addr[i] = v as u8;
            v >>= 8;
        }
    }
}

fn mixed_families(op: &'static str) -> Error {
    DynError::InvalidOperandTypes { op, lhs: "inet (IPv4)", rhs: "inet (IPv6)" }.into()
}

fn prefix_mask(bits: u8, byte: usize) -> u8 {
    let start = byte * 8;
    let bits = bits as usize;
    if bits >= start + 8 {
        0xff
    } else if bits <= start {
        0
    } else {
        0xffu8 << (8 - (bits - start))
    }
}

fn bit_cmp(a: &[u8; 16], b: &[u8; 16], bits: u8) -> Ordering {
    let full = bits as usize / 8;
    match a[..full].cmp(&b[..full]) {
        Ordering::Equal => {}
        o => return o,
    }
    let rem = bits % 8;
    if rem == 0 || full >= 16 {
        return Ordering::Equal;
    }
    let mask = 0xffu8 << (8 - rem);
    (a[full] & mask).cmp(&(b[full] & mask))
}

fn parse(text: &str, is_cidr: bool) -> Result<Inet, Error> {
    let kind = if is_cidr { "cidr" } else { "inet" };
    let bad = || -> Error { DynError::invalid_text(kind, text).into() };
    let s = text.trim();
    let (host, bits) = match s.find('/') {
        Some(i) => (&s[..i], Some(s[i + 1..].parse::<u8>().map_err(|_| bad())?)),
        None => (s, None),
    };
    let inet = if let Ok(v4) = host.parse::<Ipv4Addr>() {
        Inet::v4(v4.octets(), 32, is_cidr)
    } else if let Ok(v4) = parse_short_v4(host, is_cidr) {
        v4
    } else {
        let v6: Ipv6Addr = host.parse().map_err(|_| bad())?;
        Inet { family: FAMILY_V6, bits: 128, is_cidr, addr: v6.octets() }
    };
    let bits = match bits {
        Some(b) if b > inet.max_bits() => return Err(bad()),
        Some(b) => b,
        // a cidr without a prefix takes the classful default for abbreviated input
        None => inet.bits,
    };
    let inet = Inet { bits, ..inet };
    if is_cidr && inet.network() != inet {
        return Err(DynError::InvalidScalarText {
            kind: "cidr",
            text: format!("{} (value has bits set to right of mask)", text),
        }
        .into());
    }
    Ok(inet)
}

/// `10`, `10.1` and `10.1.2` are accepted for cidr as in the host.
fn parse_short_v4(host: &str, is_cidr: bool) -> Result<Inet, ()> {
    if !is_cidr {
        return Err(());
    }
    let parts: Vec<&str> = host.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(());
    }
    let mut octets = [0u8; 4];
    for (i, p) in parts.iter().enumerate() {
        octets[i] = p.parse().map_err(|_| ())?;
    }
    Ok(Inet::v4(octets, 8 * parts.len() as u8, true))
}

impl fmt::Display for Inet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.family == FAMILY_V4 {
            let o = self.octets();
            write!(f, "{}", Ipv4Addr::new(o[0], o[1], o[2], o[3]))?;
        } else {
            write!(f, "{}", Ipv6Addr::from(self.addr))?;
        }
        if self.is_cidr || self.bits != self.max_bits() {
            write!(f, "/{}", self.bits)?;
        }
        Ok(())
    }
}

fn parse_hex_groups(text: &str, kind: &'static str) -> Result<Vec<u8>, Error> {
    let digits: Vec<u8> = text
        .trim()
        .bytes()
        .filter(|c| !matches!(c, b':' | b'-' | b'.'))
        .collect();
    if digits.len() % 2 != 0 {
        return Err(DynError::invalid_text(kind, text).into());
    }
    digits
        .chunks(2)
        .map(|pair| match (crate::util::hex_value(pair[0]), crate::util::hex_value(pair[1])) {
            (Some(h), Some(l)) => Ok(h << 4 | l),
            _ => Err(DynError::invalid_text(kind, text).into()),
        })
        .collect()
}

/// Parses a 6-byte MAC address such as `08:00:2b:01:02:03` or `08002b-010203`.
pub fn parse_mac(text: &str) -> Result<[u8; 6], Error> {
    let bytes = parse_hex_groups(text, "macaddr")?;
    if bytes.len() != 6 {
        return Err(DynError::invalid_text("macaddr", text).into());
    }
    let mut out = [0u8; 6];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Parses an 8-byte MAC address; a 6-byte address gets `ff:fe` inserted in the middle.
pub fn parse_mac8(text: &str) -> Result<[u8; 8], Error> {
    let bytes = parse_hex_groups(text, "macaddr8")?;
    let mut out = [0u8; 8];
    match bytes.len() {
        8 => out.copy_from_slice(&bytes),
        6 => {
            out[..3].copy_from_slice(&bytes[..3]);
            out[3] = 0xff;
            out[4] = 0xfe;
            out[5..].copy_from_slice(&bytes[3..]);
        }
        _ => return Err(DynError::invalid_text("macaddr8", text).into()),
    }
    Ok(out)
}

/// Colon-separated lowercase hex.
pub fn format_mac(bytes: &[u8]) -> String {
    bytes.iter().map(|b| to_hex(&[*b])).collect::<Vec<_>>().join(":")
}

/// Widens a 6-byte MAC address to 8 bytes.
pub fn mac_to_mac8(mac: &[u8; 6]) -> [u8; 8] {
    [mac[0], mac[1], mac[2], 0xff, 0xfe, mac[3], mac[4], mac[5]]
}

/// Narrows an 8-byte MAC address, which must carry `ff:fe` in the middle.
pub fn mac8_to_mac(mac: &[u8; 8]) -> Result<[u8; 6], Error> {
    if mac[3] != 0xff || mac[4] != 0xfe {
        return Err(DynError::invalid_text("macaddr", &format_mac(mac)).into());
    }
    Ok([mac[0], mac[1], mac[2], mac[5], mac[6], mac[7]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_print() {
        assert_eq!(Inet::parse_inet("10.0.0.1").unwrap().to_string(), "10.0.0.1");
        assert_eq!(Inet::parse_inet("10.0.0.1/8").unwrap().to_string(), "10.0.0.1/8");
        assert_eq!(Inet::parse_cidr("10.0.0.0/8").unwrap().to_string(), "10.0.0.0/8");
        assert_eq!(Inet::parse_cidr("10.1.2.3").unwrap().to_string(), "10.1.2.3/32");
        assert_eq!(Inet::parse_cidr("10.1").unwrap().to_string(), "10.1.0.0/16");
        assert_eq!(Inet::parse_inet("::1").unwrap().to_string(), "::1");
        assert_eq!(Inet::parse_cidr("2001:db8::/32").unwrap().to_string(), "2001:db8::/32");
        assert!(Inet::parse_cidr("10.0.0.1/8").is_err());
        assert!(Inet::parse_inet("10.0.0.1/33").is_err());
        assert!(Inet::parse_inet("10.0.0").is_err());
    }

    #[test]
    fn packed_layout() {
        let i = Inet::parse_cidr("192.168.0.0/16").unwrap();
        let b = i.to_bytes();
        assert_eq!(&b[..8], &[FAMILY_V4, 16, 1, 0, 192, 168, 0, 0]);
        assert_eq!(Inet::from_bytes(&b).unwrap(), i);
        assert!(Inet::from_bytes(&b[..10]).is_err());
    }

    #[test]
    fn subnets() {
        let net = Inet::parse_cidr("10.0.0.0/8").unwrap();
        let host = Inet::parse_inet("10.1.2.3").unwrap();
        let other = Inet::parse_inet("11.0.0.1").unwrap();
        assert!(host.sub(&net));
        assert!(net.sup(&host));
        assert!(net.sub_eq(&net) && !net.sub(&net));
        assert!(net.overlaps(&host));
        assert!(!net.overlaps(&other));
        assert_eq!(net.total_cmp(&host), Ordering::Less);
    }

    #[test]
    fn arithmetic() {
        let a = Inet::parse_inet("10.0.0.255").unwrap();
        assert_eq!(a.add(1).unwrap().to_string(), "10.0.1.0");
        assert_eq!(a.add(-256).unwrap().to_string(), "9.255.255.255");
        assert!(Inet::parse_inet("255.255.255.255").unwrap().add(1).is_err());
        let b = Inet::parse_inet("10.0.0.1").unwrap();
        assert_eq!(a.diff(&b).unwrap(), 254);
        assert_eq!(b.not().to_string(), "245.255.255.254");
        let m = Inet::parse_inet("255.255.0.0").unwrap();
        assert_eq!(a.and(&m).unwrap().to_string(), "10.0.0.0");
        assert_eq!(a.or(&m).unwrap().to_string(), "255.255.0.255");
        assert!(a.and(&Inet::parse_inet("::1").unwrap()).is_err());
    }

    #[test]
    fn macs() {
        let m = parse_mac("08:00:2B:01:02:03").unwrap();
        assert_eq!(format_mac(&m), "08:00:2b:01:02:03");
        assert_eq!(parse_mac("08002b-010203").unwrap(), m);
        assert!(parse_mac("08:00:2b:01:02").is_err());
        let m8 = parse_mac8("08:00:2b:01:02:03").unwrap();
        assert_eq!(format_mac(&m8), "08:00:2b:ff:fe:01:02:03");
        assert_eq!(m8, mac_to_mac8(&m));
        assert_eq!(mac8_to_mac(&m8).unwrap(), m);
        assert!(parse_mac8("zz:00:2b:01:02:03:04:05").is_err());
    }
}
