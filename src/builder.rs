//! Event-driven construction of in-memory values.
//!
//! The parser and the unpacker both describe a tree as a flat sequence of events; the
//! [`Builder`] turns that sequence back into a [`Dynamic`], sorting and deduplicating object
//! keys as each object closes.
//!
//! # Example
//!
//! ```
//! use dynval::{builder::Builder, prelude::*};
//!
//! let mut b = Builder::new();
//! b.begin_object().unwrap();
//! b.key(&Scalar::string("k")).unwrap();
//! b.value(Dynamic::from(1)).unwrap();
//! b.key(&Scalar::string("k")).unwrap();
//! b.value(Dynamic::from(2)).unwrap();
//! b.end_object().unwrap();
//!
//! assert_eq!(b.finish().unwrap(), Dynamic::object(vec![("k", Dynamic::from(2))]));
//! ```

use crate::{
    config::Config,
    encoding::{
        constants::MAX_COUNT,
        container::Node,
        iter::{DynIter, Token},
    },
    errors::DynError,
    scalar::Scalar,
    vecmap::VecMap,
    Dynamic, Key,
};
use bytes::Bytes;
use failure::Error;
use tracing::debug;

#[derive(Debug)]
enum Frame {
    Array { elems: Vec<Dynamic>, raw_scalar: bool },
    Object { pairs: Vec<(Key, Dynamic)>, pending: Option<Key> },
}

/// Assembles a [`Dynamic`] from begin/end, key, value and element events.
#[derive(Debug)]
pub struct Builder {
    stack: Vec<Frame>,
    result: Option<Dynamic>,
    cfg: Config,
}

impl Default for Builder {
    fn default() -> Self { Builder::new() }
}

fn unbalanced(detail: &'static str) -> Error { DynError::UnbalancedContainer { detail }.into() }

impl Builder {
    /// A builder with the default [`Config`].
    pub fn new() -> Self { Builder::with_config(&Config::default()) }

    /// A builder that enforces `cfg`'s depth limit.
    pub fn with_config(cfg: &Config) -> Self { Builder { stack: Vec::new(), result: None, cfg: *cfg } }

    /// Current nesting depth.
    pub fn depth(&self) -> usize { self.stack.len() }

    fn open(&mut self, frame: Frame) -> Result<(), Error> {
        if self.result.is_some() {
            return Err(unbalanced("value already complete"));
        }
        self.cfg.check_depth(self.stack.len() + 1)?;
        self.stack.push(frame);
        Ok(())
    }

    /// Opens an array. A `raw_scalar` array holds exactly one scalar and closes into it.
    pub fn begin_array(&mut self, raw_scalar: bool) -> Result<(), Error> {
        self.open(Frame::Array { elems: Vec::new(), raw_scalar })
    }

    /// Opens an object.
    pub fn begin_object(&mut self) -> Result<(), Error> {
        self.open(Frame::Object { pairs: Vec::new(), pending: None })
    }

    /// Closes the innermost container, which must be an array.
    pub fn end_array(&mut self) -> Result<(), Error> {
        match self.stack.pop() {
            Some(Frame::Array { mut elems, raw_scalar }) => {
                let done = if raw_scalar {
                    match (elems.pop(), elems.is_empty()) {
                        (Some(d @ Dynamic::Scalar(_)), true) => d,
                        _ => return Err(unbalanced("raw scalar array must hold one scalar")),
                    }
                } else {
                    Dynamic::Array(elems)
                };
                self.attach(done)
            }
            Some(frame) => {
                self.stack.push(frame);
                Err(unbalanced("end of array inside an object"))
            }
            None => Err(unbalanced("end of array with no open container")),
        }
    }

    /// Closes the innermost container, which must be an object.
    ///
    /// Pairs are sorted by key and, for repeated keys, only the last one inserted is kept.
    pub fn end_object(&mut self) -> Result<(), Error> {
        match self.stack.pop() {
            Some(Frame::Object { pairs, pending: None }) => {
                let (map, dropped) = VecMap::from_pairs(pairs);
                if dropped > 0 {
                    debug!(dropped = dropped as u64, "dropped duplicate object keys");
                }
                self.attach(Dynamic::Object(map))
            }
            Some(frame @ Frame::Object { .. }) => {
                self.stack.push(frame);
                Err(unbalanced("end of object after a key with no value"))
            }
            Some(frame) => {
                self.stack.push(frame);
                Err(unbalanced("end of object inside an array"))
            }
            None => Err(unbalanced("end of object with no open container")),
        }
    }

    /// Sets the key for the next [`value`](Builder::value). The key must be a string.
    pub fn key<B: AsRef<[u8]>>(&mut self, key: &Scalar<B>) -> Result<(), Error> {
        let bytes = match key {
            Scalar::String(b) => b.as_ref(),
            other => return Err(DynError::KeyNotString { found: other.kind().name() }.into()),
        };
        match self.stack.last_mut() {
            Some(Frame::Object { pairs, pending }) if pending.is_none() => {
                if pairs.len() >= MAX_COUNT {
                    return Err(DynError::TooManyPairs { max: MAX_COUNT }.into());
                }
                *pending = Some(Key(Bytes::from(bytes)));
                Ok(())
            }
            Some(Frame::Object { .. }) => Err(unbalanced("two keys in a row")),
            _ => Err(unbalanced("key outside an object")),
        }
    }

    /// Adds the value for the pending key.
    pub fn value(&mut self, value: Dynamic) -> Result<(), Error> {
        match self.stack.last() {
            Some(Frame::Object { pending: Some(_), .. }) => self.attach(value),
            Some(Frame::Object { .. }) => Err(unbalanced("value without a key")),
            _ => Err(unbalanced("value outside an object")),
        }
    }

    /// Appends an element to the innermost array.
    pub fn element(&mut self, elem: Dynamic) -> Result<(), Error> {
        match self.stack.last() {
            Some(Frame::Array { .. }) => self.attach(elem),
            _ => Err(unbalanced("element outside an array")),
        }
    }

    /// Hands a finished child to the innermost container, or makes it the result.
    fn attach(&mut self, child: Dynamic) -> Result<(), Error> {
        match self.stack.last_mut() {
            None => {
                self.result = Some(child);
                Ok(())
            }
            Some(Frame::Array { elems, raw_scalar }) => {
                if *raw_scalar && (!elems.is_empty() || !matches!(child, Dynamic::Scalar(_))) {
                    return Err(unbalanced("raw scalar array must hold one scalar"));
                }
                if elems.len() >= MAX_COUNT {
                    return Err(DynError::TooManyElements { max: MAX_COUNT }.into());
                }
                elems.push(child);
                Ok(())
            }
            Some(Frame::Object { pairs, pending }) => match pending.take() {
                Some(k) => {
                    pairs.push((k, child));
                    Ok(())
                }
                None => Err(unbalanced("value without a key")),
            },
        }
    }

    /// Copies a packed datum in as the next element or value.
    ///
    /// The datum is walked and re-emitted event by event; a raw-scalar datum contributes its
    /// bare scalar.
    pub fn splice_packed(&mut self, datum: &[u8]) -> Result<(), Error> {
        let mut it = DynIter::new(datum)?;
        loop {
            match it.next(false)? {
                (Token::BeginArray, Some(Node::Container(c))) => self.begin_array(c.is_raw_scalar())?,
                (Token::BeginObject, _) => self.begin_object()?,
                (Token::EndArray, _) => self.end_array()?,
                (Token::EndObject, _) => self.end_object()?,
                (Token::Key, Some(Node::Scalar(s))) => self.key(&s)?,
                (Token::Value, Some(Node::Scalar(s))) => self.value(Dynamic::Scalar(s.to_scalar()))?,
                (Token::Element, Some(Node::Scalar(s))) => self.element(Dynamic::Scalar(s.to_scalar()))?,
                (Token::Done, _) => return Ok(()),
                _ => return Err(unbalanced("malformed token stream")),
            }
        }
    }

    /// Returns the finished value.
    ///
    /// Fails with [`DynError::UnbalancedContainer`] if a container is still open or nothing
    /// was built.
    pub fn finish(self) -> Result<Dynamic, Error> {
        if !self.stack.is_empty() {
            return Err(unbalanced("container left open"));
        }
        self.result.ok_or_else(|| unbalanced("no value was built"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::ser::pack, parser::parse};

    fn err_of(r: Result<(), Error>) -> DynError { r.unwrap_err().downcast::<DynError>().unwrap() }

    #[test]
    fn nested_containers() {
        let mut b = Builder::new();
        b.begin_array(false).unwrap();
        b.element(Dynamic::from(1)).unwrap();
        b.begin_object().unwrap();
        b.key(&Scalar::string("bb")).unwrap();
        b.begin_array(false).unwrap();
        b.end_array().unwrap();
        b.key(&Scalar::string("a")).unwrap();
        b.value(Dynamic::null()).unwrap();
        b.end_object().unwrap();
        b.end_array().unwrap();
        assert_eq!(b.finish().unwrap(), parse(r#"[1, {"a": null, "bb": []}]"#).unwrap());
    }

    #[test]
    fn raw_scalar_closes_into_scalar() {
        let mut b = Builder::new();
        b.begin_array(true).unwrap();
        b.element(Dynamic::from("s")).unwrap();
        assert!(b.element(Dynamic::from("t")).is_err());
        b.end_array().unwrap();
        assert_eq!(b.finish().unwrap(), Dynamic::from("s"));
    }

    #[test]
    fn structural_errors() {
        let mut b = Builder::new();
        b.begin_object().unwrap();
        let one: Scalar = Scalar::Integer(1);
        assert_eq!(err_of(b.key(&one)), DynError::KeyNotString { found: "integer" });
        assert!(matches!(err_of(b.end_array()), DynError::UnbalancedContainer { .. }));
        assert!(matches!(err_of(b.element(Dynamic::null())), DynError::UnbalancedContainer { .. }));
        b.key(&Scalar::string("k")).unwrap();
        assert!(matches!(err_of(b.end_object()), DynError::UnbalancedContainer { .. }));
        b.value(Dynamic::from(true)).unwrap();
        b.end_object().unwrap();
        assert!(matches!(err_of(b.end_object()), DynError::UnbalancedContainer { .. }));

        let mut open = Builder::new();
        open.begin_array(false).unwrap();
        assert!(open.finish().is_err());
    }

    #[test]
    fn depth_limit() {
        let mut b = Builder::with_config(&Config { max_depth: 2, ..Config::default() });
        b.begin_array(false).unwrap();
        b.begin_array(false).unwrap();
        assert_eq!(err_of(b.begin_object()), DynError::NestingTooDeep { max: 2 });
    }

    #[test]
    fn splices_packed_values() {
        let inner = pack(&parse(r#"{"x": [1, 2]}"#).unwrap()).unwrap();
        let scalar = pack(&parse("7").unwrap()).unwrap();
        let mut b = Builder::new();
        b.begin_array(false).unwrap();
        b.splice_packed(&inner).unwrap();
        b.splice_packed(&scalar).unwrap();
        b.end_array().unwrap();
        assert_eq!(b.finish().unwrap(), parse(r#"[{"x": [1, 2]}, 7]"#).unwrap());
    }
}
