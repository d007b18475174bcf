//! Typed send and receive.
//!
//! A wire message is a version byte followed by the compact text form of the value.

use crate::{
    config::Config,
    encoding::ser::pack_with,
    errors::DynError,
    parser::parse_with,
    printer::to_text_with,
    util::{read_u8, utf8},
};
use failure::Error;
use tracing::trace;

/// The only wire version understood.
pub const WIRE_VERSION: u8 = 1;

/// Encodes a packed datum for the wire.
///
/// # Example
///
/// ```
/// use dynval::{prelude::*, wire};
///
/// let packed = pack(&parse("[1, true]").unwrap()).unwrap();
/// let msg = wire::send(&packed).unwrap();
///
/// assert_eq!(msg, b"\x01[1, true]".to_vec());
/// assert_eq!(wire::recv(&msg).unwrap(), packed);
/// ```
pub fn send(datum: &[u8]) -> Result<Vec<u8>, Error> {
    let text = to_text_with(datum, &Config::default(), false)?;
    let mut out = Vec::with_capacity(text.len() + 1);
    out.push(WIRE_VERSION);
    out.extend_from_slice(text.as_bytes());
    Ok(out)
}

/// Decodes a wire message back into a packed datum.
///
/// Fails with [`DynError::UnsupportedWireVersion`] unless the first byte is
/// [`WIRE_VERSION`].
pub fn recv(msg: &[u8]) -> Result<Vec<u8>, Error> { recv_with(msg, &Config::default()) }

/// [`recv`] with explicit limits.
pub fn recv_with(msg: &[u8], cfg: &Config) -> Result<Vec<u8>, Error> {
    let version = read_u8(msg, 0)?;
    trace!(version = version as u64, "received dynamic wire message");
    if version != WIRE_VERSION {
        return Err(DynError::UnsupportedWireVersion { version }.into());
    }
    pack_with(&parse_with(utf8(&msg[1..])?, cfg)?, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::ser::pack, parser::parse};

    #[test]
    fn version_is_checked() {
        let err = recv(b"\x02[]").unwrap_err();
        assert_eq!(err.downcast_ref::<DynError>(), Some(&DynError::UnsupportedWireVersion { version: 2 }));
        assert!(recv(b"").is_err());
    }

    #[test]
    fn annotated_scalars_survive() {
        let packed = pack(&parse(r#"{"d": "2020-01-01"::date, "n": 10.0.0.0/8::cidr}"#).unwrap()).unwrap();
        assert_eq!(recv(&send(&packed).unwrap()).unwrap(), packed);
    }

    #[test]
    fn bad_text() {
        assert!(recv(b"\x01[1,").is_err());
        let err = recv(b"\x01[\"a\xff\"]").unwrap_err();
        assert_eq!(err.downcast_ref::<DynError>(), Some(&DynError::InvalidUtf8 { at: 3 }));
    }

    #[test]
    fn invalid_utf8_is_not_sent() {
        use crate::{scalar::Scalar, Dynamic};
        use bytes::Bytes;

        let packed = pack(&Dynamic::from(vec![Dynamic::Scalar(Scalar::String(Bytes::from(&b"ok\xfe"[..])))])).unwrap();
        let err = send(&packed).unwrap_err();
        assert_eq!(err.downcast_ref::<DynError>(), Some(&DynError::InvalidUtf8 { at: 2 }));
    }
}
