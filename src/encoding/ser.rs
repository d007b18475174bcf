use super::{constants::*, scalar::*};
use crate::{config::Config, errors::DynError, util::*, vecmap::VecMap, Dynamic, Key};
use byteorder::ByteOrder;
use failure::Error;

/// A byte sink the scalar codec writes into.
pub trait Serializer {
    /// The type of the output value.
    type Out;
    /// Add a byte to the output value.
    fn put_u8(&mut self, u: u8);
    /// Add a slice to the output value.
    fn put_slice(&mut self, slice: &[u8]);
    /// Return the output value.
    fn finalize(self) -> Self::Out;
}

/// Convenience methods for [`Serializer`].
pub trait SerializerExt: Serializer {
    /// Add a little-endian [`u32`] to the output value.
    fn put_u32(&mut self, u: u32);
    /// Add a little-endian [`i32`] to the output value.
    fn put_i32(&mut self, i: i32);
    /// Add a little-endian [`i64`] to the output value.
    fn put_i64(&mut self, i: i64);
    /// Add a little-endian [`f64`] to the output value.
    fn put_f64(&mut self, f: f64);
    /// Add a length word (counting itself) followed by `body`.
    fn put_varlen(&mut self, body: &[u8]);
}

impl Serializer for Vec<u8> {
    type Out = Self;

    #[inline]
    fn put_u8(&mut self, u: u8) { self.push(u) }

    #[inline]
    fn put_slice(&mut self, slice: &[u8]) { self.extend_from_slice(slice) }

    #[inline]
    fn finalize(self) -> Self::Out { self }
}

impl<S: Serializer> SerializerExt for S {
    fn put_u32(&mut self, u: u32) {
        let mut buf = [0u8; 4];
        Endian::write_u32(&mut buf, u);
        self.put_slice(&buf)
    }

    fn put_i32(&mut self, i: i32) {
        let mut buf = [0u8; 4];
        Endian::write_i32(&mut buf, i);
        self.put_slice(&buf)
    }

    fn put_i64(&mut self, i: i64) {
        let mut buf = [0u8; 8];
        Endian::write_i64(&mut buf, i);
        self.put_slice(&buf)
    }

    fn put_f64(&mut self, f: f64) {
        let mut buf = [0u8; 8];
        Endian::write_f64(&mut buf, f);
        self.put_slice(&buf)
    }

    fn put_varlen(&mut self, body: &[u8]) {
        self.put_u32((body.len() + 4) as u32);
        self.put_slice(body)
    }
}

/// Writes one datum into a growing buffer.
///
/// Offsets inside the datum are relative to the start of the buffer, so the leading size
/// word is part of the alignment arithmetic.
struct Packer<'c> {
    buf: Vec<u8>,
    cfg: &'c Config,
}

impl<'c> Packer<'c> {
    fn new(cfg: &'c Config) -> Self { Packer { buf: Vec::new(), cfg } }

    fn patch_u32(&mut self, at: usize, u: u32) { Endian::write_u32(&mut self.buf[at..at + 4], u) }

    fn pad_to_int(&mut self) -> usize {
        let padded = int_align(self.buf.len());
        let padlen = padded - self.buf.len();
        self.buf.resize(padded, 0);
        padlen
    }

    /// Writes a child's payload and returns `(entry type bits, bytes written)`.
    fn convert_value(&mut self, value: &Dynamic, depth: usize) -> Result<(u32, usize), Error> {
        let start = self.buf.len();
        let ty = match value {
            Dynamic::Scalar(s) => {
                let ty = entry_type(s);
                if is_aligned_type(ty) {
                    self.pad_to_int();
                }
                if let crate::scalar::Scalar::String(b) = s {
                    if b.len() > MAX_LEN {
                        return Err(DynError::StringTooLong { len: b.len() }.into());
                    }
                }
                encode_payload(s, &mut self.buf);
                ty
            }
            Dynamic::Array(a) => {
                self.pad_to_int();
                self.convert_array(a, false, depth + 1)?;
                JE_CONTAINER
            }
            Dynamic::Object(o) => {
                self.pad_to_int();
                self.convert_object(o, depth + 1)?;
                JE_CONTAINER
            }
        };
        let len = self.buf.len() - start;
        if len > MAX_LEN {
            return Err(DynError::PayloadTooLarge { max: MAX_LEN }.into());
        }
        Ok((ty, len))
    }

    /// Turns a running total and a child's length into its entry word.
    fn entry_word(index: usize, ty: u32, len: usize, totallen: usize) -> Result<u32, Error> {
        if totallen > MAX_LEN {
            return Err(DynError::PayloadTooLarge { max: MAX_LEN }.into());
        }
        Ok(if index % STRIDE == 0 {
            ty | JE_HAS_OFF | totallen as u32
        } else {
            ty | len as u32
        })
    }

    fn convert_array(&mut self, elems: &[Dynamic], raw_scalar: bool, depth: usize) -> Result<(), Error> {
        self.cfg.check_depth(depth)?;
        if elems.len() > MAX_COUNT {
            return Err(DynError::TooManyElements { max: MAX_COUNT }.into());
        }

        let mut header = F_ARRAY | elems.len() as u32;
        if raw_scalar {
            header |= F_SCALAR;
        }
        self.buf.put_u32(header);

        let entries = self.buf.len();
        self.buf.resize(entries + 4 * elems.len(), 0);

        let mut totallen = 0;
        for (i, elem) in elems.iter().enumerate() {
            let (ty, len) = self.convert_value(elem, depth)?;
            totallen += len;
            let word = Self::entry_word(i, ty, len, totallen)?;
            self.patch_u32(entries + 4 * i, word);
        }
        Ok(())
    }

    fn convert_object(&mut self, pairs: &VecMap<Key, Dynamic>, depth: usize) -> Result<(), Error> {
        self.cfg.check_depth(depth)?;
        let n = pairs.len();
        if n > MAX_COUNT {
            return Err(DynError::TooManyPairs { max: MAX_COUNT }.into());
        }

        self.buf.put_u32(F_OBJECT | n as u32);

        let entries = self.buf.len();
        self.buf.resize(entries + 8 * n, 0);

        // keys are unique already; only their stored order follows the collation
        let collation = self.cfg.key_collation;
        let mut order: Vec<&(Key, Dynamic)> = pairs.iter().collect();
        order.sort_by(|a, b| collation.compare(a.0.as_bytes(), b.0.as_bytes()));

        let mut totallen = 0;
        for (i, (key, _)) in order.iter().enumerate() {
            let bytes = key.as_bytes();
            if bytes.len() > MAX_LEN {
                return Err(DynError::StringTooLong { len: bytes.len() }.into());
            }
            self.buf.put_slice(bytes);
            totallen += bytes.len();
            let word = Self::entry_word(i, JE_STRING, bytes.len(), totallen)?;
            self.patch_u32(entries + 4 * i, word);
        }
        for (i, (_, value)) in order.iter().enumerate() {
            let (ty, len) = self.convert_value(value, depth)?;
            totallen += len;
            let word = Self::entry_word(i + n, ty, len, totallen)?;
            self.patch_u32(entries + 4 * (i + n), word);
        }
        Ok(())
    }
}

/// Packs a value into its on-disk form with the default [`Config`].
///
/// # Example
///
/// ```
/// use dynval::prelude::*;
///
/// let packed = pack(&Dynamic::from(vec![1i64, 2])).unwrap();
///
/// // size word, then the array header
/// assert_eq!(packed[0] as usize, packed.len());
/// assert_eq!(&packed[4..8], &[2, 0, 0, 0x40]);
/// ```
pub fn pack(value: &Dynamic) -> Result<Vec<u8>, Error> { pack_with(value, &Config::default()) }

/// Packs a value into its on-disk form.
///
/// A scalar root is wrapped in a one-element raw-scalar array.
pub fn pack_with(value: &Dynamic, cfg: &Config) -> Result<Vec<u8>, Error> {
    let mut packer = Packer::new(cfg);
    packer.buf.put_u32(0);

    match value {
        Dynamic::Scalar(_) => packer.convert_array(std::slice::from_ref(value), true, 1)?,
        Dynamic::Array(a) => packer.convert_array(a, false, 1)?,
        Dynamic::Object(o) => packer.convert_object(o, 1)?,
    }

    let size = packer.buf.len();
    if size > u32::max_value() as usize {
        return Err(DynError::PayloadTooLarge { max: MAX_LEN }.into());
    }
    packer.patch_u32(0, size as u32);
    tracing::trace!(size = size as u64, "packed dynamic datum");
    Ok(packer.buf.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;

    fn words(b: &[u8]) -> Vec<u32> { b.chunks(4).map(Endian::read_u32).collect() }

    #[test]
    fn raw_scalar_root() {
        let packed = pack(&Dynamic::from(true)).unwrap();
        assert_eq!(words(&packed), vec![12, F_ARRAY | F_SCALAR | 1, JE_TRUE | JE_HAS_OFF]);
    }

    #[test]
    fn aligned_children_count_their_padding() {
        let v = Dynamic::from(vec![Dynamic::from("a"), Dynamic::from(7i64)]);
        let packed = pack(&v).unwrap();
        // size, header, two entries, "a" + 3 padding, tag, i64
        assert_eq!(packed.len(), 4 + 4 + 8 + 4 + 4 + 8);
        let w = words(&packed[..16]);
        assert_eq!(w[2], JE_STRING | JE_HAS_OFF | 1);
        assert_eq!(w[3], JE_EXTENDED | (3 + 4 + 8));
        assert_eq!(&packed[17..20], &[0, 0, 0]);
    }

    #[test]
    fn objects_store_keys_then_values() {
        let v = Dynamic::object(vec![("bb", Dynamic::Scalar(Scalar::Null)), ("a", Dynamic::from(false))]);
        let packed = pack(&v).unwrap();
        let w = words(&packed[..24]);
        assert_eq!(w[1], F_OBJECT | 2);
        assert_eq!(w[2], JE_STRING | JE_HAS_OFF | 1);
        assert_eq!(w[3], JE_STRING | 2);
        assert_eq!(w[4], JE_FALSE);
        assert_eq!(w[5], JE_NULL);
        assert_eq!(&packed[24..], b"abb");
    }

    #[test]
    fn keys_follow_the_configured_collation() {
        use crate::{config::KeyCollation, encoding::container::ContainerRef};

        let cfg = Config { key_collation: KeyCollation::LengthThenBytes, ..Config::default() };
        let v = Dynamic::object(vec![("ccc", 1.into()), ("b", 2.into()), ("aa", 3.into()), ("a", 4.into())]);
        let packed = pack_with(&v, &cfg).unwrap();
        let root = ContainerRef::root(&packed).unwrap();

        let keys: Vec<&[u8]> = (0..root.len()).map(|i| root.key_at(i).unwrap().unwrap()).collect();
        assert_eq!(keys, vec![&b"a"[..], &b"b"[..], &b"aa"[..], &b"ccc"[..]]);
        for w in keys.windows(2) {
            assert_eq!(cfg.key_collation.compare(w[0], w[1]), std::cmp::Ordering::Less);
        }
        assert!(root.find_key_with(b"aa", cfg.key_collation).unwrap().is_some());
    }

    #[test]
    fn every_stride_entry_is_an_offset() {
        let v = Dynamic::from((0..70).map(|_| "xy").collect::<Vec<_>>());
        let packed = pack(&v).unwrap();
        let w = words(&packed[8..8 + 4 * 70]);
        for (i, word) in w.iter().enumerate() {
            if i % STRIDE == 0 {
                assert_eq!(*word, JE_HAS_OFF | (2 * (i as u32 + 1)));
            } else {
                assert_eq!(*word, 2);
            }
        }
    }

    #[test]
    fn depth_limit() {
        let cfg = Config { max_depth: 2, ..Config::default() };
        let ok = Dynamic::from(vec![Dynamic::from(vec![1i64])]);
        assert!(pack_with(&ok, &cfg).is_ok());
        let deep = Dynamic::from(vec![ok]);
        let err = pack_with(&deep, &cfg).unwrap_err();
        assert_eq!(err.downcast_ref::<DynError>(), Some(&DynError::NestingTooDeep { max: 2 }));
    }
}
