//! Random access into packed containers.

use super::{constants::*, scalar::*};
use crate::{
    algebra::compare::scalar_eq,
    config::KeyCollation,
    errors::DynError,
    scalar::{Scalar, ScalarRef},
    util::*,
};
use failure::Error;
use std::cmp::Ordering;

/// A child read out of a packed container.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    /// A scalar, borrowing its payload from the datum.
    Scalar(ScalarRef<'a>),
    /// A nested container.
    Container(ContainerRef<'a>),
}

impl<'a> Node<'a> {
    /// The scalar, if this node is one.
    pub fn scalar(self) -> Option<ScalarRef<'a>> {
        match self {
            Node::Scalar(s) => Some(s),
            Node::Container(_) => None,
        }
    }

    /// The container, if this node is one.
    pub fn container(self) -> Option<ContainerRef<'a>> {
        match self {
            Node::Container(c) => Some(c),
            Node::Scalar(_) => None,
        }
    }
}

/// A view of one container inside a packed datum.
#[derive(Clone, Copy, Debug)]
pub struct ContainerRef<'a> {
    datum: &'a [u8],
    base: usize,
    header: u32,
}

impl<'a> ContainerRef<'a> {
    /// The root container of a packed datum.
    ///
    /// # Example
    ///
    /// ```
    /// use dynval::{encoding::container::ContainerRef, prelude::*};
    ///
    /// let packed = pack(&parse(r#"{"a": [10, 20]}"#).unwrap()).unwrap();
    /// let root = ContainerRef::root(&packed).unwrap();
    ///
    /// let arr = root.find_key(b"a").unwrap().unwrap().container().unwrap();
    /// let second = arr.get(1).unwrap().unwrap().scalar().unwrap();
    /// assert_eq!(second, ScalarRef::Integer(20));
    /// ```
    pub fn root(datum: &'a [u8]) -> Result<Self, Error> {
        let size = read_u32(datum, 0)? as usize;
        let datum = read_slice(datum, 0, size)?;
        Self::at(datum, 4)
    }

    pub(crate) fn at(datum: &'a [u8], base: usize) -> Result<Self, Error> {
        let header = read_u32(datum, base)?;
        let c = ContainerRef { datum, base, header };
        // entry words must be in bounds
        read_slice(datum, base + 4, 4 * c.entries())?;
        Ok(c)
    }

    /// Number of elements, or pairs for an object.
    pub fn len(&self) -> usize { (self.header & COUNT_MASK) as usize }

    /// Whether the container has no children.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Whether this is an array (including the raw-scalar pseudo-array).
    pub fn is_array(&self) -> bool { self.header & F_ARRAY != 0 }

    /// Whether this is an object.
    pub fn is_object(&self) -> bool { self.header & F_OBJECT != 0 }

    /// Whether this is the one-element array carrying a bare scalar root.
    pub fn is_raw_scalar(&self) -> bool { self.header & F_SCALAR != 0 }

    /// The header's container flags.
    pub fn flags(&self) -> u32 { self.header & !COUNT_MASK }

    /// Number of entry words: one per element, two per pair.
    pub fn entries(&self) -> usize {
        if self.is_object() {
            2 * self.len()
        } else {
            self.len()
        }
    }

    fn entry(&self, i: usize) -> Result<u32, Error> { read_u32(self.datum, self.base + 4 + 4 * i) }

    fn data_start(&self) -> usize { self.base + 4 + 4 * self.entries() }

    /// Start of child `i` relative to the container's data area.
    ///
    /// Walks back to the nearest entry holding an offset, which is at most [`STRIDE`] entries
    /// away. `i` may equal [`entries`](Self::entries), giving the end of the data area.
    pub fn child_offset(&self, i: usize) -> Result<usize, Error> {
        let mut offset = 0;
        let mut j = i;
        while j > 0 {
            j -= 1;
            let e = self.entry(j)?;
            offset += (e & JE_OFFLEN_MASK) as usize;
            if e & JE_HAS_OFF != 0 {
                break;
            }
        }
        Ok(offset)
    }

    /// On-disk size of child `i`, alignment padding included.
    pub fn child_length(&self, i: usize) -> Result<usize, Error> {
        let e = self.entry(i)?;
        if e & JE_HAS_OFF != 0 {
            self.length_from(e, self.child_offset(i)?)
        } else {
            Ok((e & JE_OFFLEN_MASK) as usize)
        }
    }

    fn length_from(&self, entry: u32, offset: usize) -> Result<usize, Error> {
        let offlen = (entry & JE_OFFLEN_MASK) as usize;
        if entry & JE_HAS_OFF != 0 {
            offlen
                .checked_sub(offset)
                .ok_or_else(|| DynError::TruncatedPayload { needed: offset, at: self.base, len: offlen }.into())
        } else {
            Ok(offlen)
        }
    }

    /// Offset just past child `i`, given that it starts at `offset`.
    pub(crate) fn advance(&self, i: usize, offset: usize) -> Result<usize, Error> {
        let e = self.entry(i)?;
        Ok(offset + self.length_from(e, offset)?)
    }

    /// Reads child `i`, which starts at `offset` in the data area.
    pub(crate) fn child_at(&self, i: usize, offset: usize) -> Result<Node<'a>, Error> {
        let e = self.entry(i)?;
        let ty = e & JE_TYPE_MASK;
        let len = self.length_from(e, offset)?;
        let start = self.data_start() + offset;
        read_slice(self.datum, start, len)?;
        let end = start + len;

        let start = if is_aligned_type(ty) { int_align(start).min(end) } else { start };
        if ty == JE_CONTAINER {
            Ok(Node::Container(ContainerRef::at(&self.datum[..end], start)?))
        } else {
            Ok(Node::Scalar(decode_payload(ty, &self.datum[start..end])?))
        }
    }

    fn child(&self, i: usize) -> Result<Node<'a>, Error> { self.child_at(i, self.child_offset(i)?) }

    /// Element `i` of an array. `None` past the end or for an object.
    pub fn get(&self, i: usize) -> Result<Option<Node<'a>>, Error> {
        if !self.is_array() || i >= self.len() {
            return Ok(None);
        }
        self.child(i).map(Some)
    }

    /// The bare scalar of a raw-scalar pseudo-array.
    pub fn raw_scalar(&self) -> Result<Option<ScalarRef<'a>>, Error> {
        if !self.is_raw_scalar() {
            return Ok(None);
        }
        Ok(self.get(0)?.and_then(Node::scalar))
    }

    /// Key `i` of an object.
    pub fn key_at(&self, i: usize) -> Result<Option<&'a [u8]>, Error> {
        if !self.is_object() || i >= self.len() {
            return Ok(None);
        }
        Ok(self.child(i)?.scalar().and_then(|s| s.as_str_bytes()))
    }

    /// Value `i` of an object, in key order.
    pub fn get_object_value(&self, i: usize) -> Result<Option<Node<'a>>, Error> {
        if !self.is_object() || i >= self.len() {
            return Ok(None);
        }
        self.child(i + self.len()).map(Some)
    }

    /// Binary searches an object's keys.
    pub fn find_key(&self, key: &[u8]) -> Result<Option<Node<'a>>, Error> {
        self.find_key_with(key, KeyCollation::default())
    }

    /// Binary searches an object's keys under `collation`.
    pub fn find_key_with(&self, key: &[u8], collation: KeyCollation) -> Result<Option<Node<'a>>, Error> {
        if !self.is_object() {
            return Ok(None);
        }
        let (mut lo, mut hi) = (0, self.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let probe = self.key_at(mid)?.unwrap_or_default();
            match collation.compare(probe, key) {
                Ordering::Equal => return self.get_object_value(mid),
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
            }
        }
        Ok(None)
    }

    /// Looks for a scalar among an array's elements or an object's keys.
    ///
    /// `flags` selects which kinds of container are searched ([`FIND_IN_ARRAY`] and/or
    /// [`FIND_IN_OBJECT`]). For objects only string scalars can match, and the value stored
    /// under the key is returned.
    pub fn find_value<B: AsRef<[u8]>>(&self, flags: u32, v: &Scalar<B>) -> Result<Option<Node<'a>>, Error> {
        if flags & F_ARRAY != 0 && self.is_array() {
            let mut offset = 0;
            for i in 0..self.len() {
                let node = self.child_at(i, offset)?;
                if let Node::Scalar(s) = node {
                    if scalar_eq(&s, v) {
                        return Ok(Some(node));
                    }
                }
                offset = self.advance(i, offset)?;
            }
        } else if flags & F_OBJECT != 0 && self.is_object() {
            if let Scalar::String(k) = v {
                return self.find_key(k.as_ref());
            }
        }
        Ok(None)
    }
}

/// Flag for [`ContainerRef::find_value`]: search arrays.
pub const FIND_IN_ARRAY: u32 = F_ARRAY;
/// Flag for [`ContainerRef::find_value`]: search objects.
pub const FIND_IN_OBJECT: u32 = F_OBJECT;
