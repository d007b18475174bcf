use crate::{builder::Builder, config::Config, Dynamic};
use failure::Error;

/// Unpacks a datum into an in-memory value with the default [`Config`].
///
/// # Example
///
/// ```
/// use dynval::prelude::*;
///
/// let value = parse(r#"{"a": [1, 2.5, "x"]}"#).unwrap();
/// let packed = pack(&value).unwrap();
///
/// assert_eq!(unpack(&packed).unwrap(), value);
/// ```
pub fn unpack(datum: &[u8]) -> Result<Dynamic, Error> { unpack_with(datum, &Config::default()) }

/// Unpacks a datum into an in-memory value.
///
/// A raw-scalar root becomes the bare scalar. Strings and other payloads are copied, so the
/// result does not borrow from `datum`.
pub fn unpack_with(datum: &[u8], cfg: &Config) -> Result<Dynamic, Error> {
    let mut builder = Builder::with_config(cfg);
    builder.splice_packed(datum)?;
    builder.finish()
}
