//! # Packed binary format
//!
//! A packed datum is a single contiguous buffer: a little-endian `u32` holding the total size
//! (counting itself), followed by the root container. A container is a header word (flags and
//! a 28-bit count), one entry word per child, then the children's payloads back to back.
//! Objects store all keys first and then all values, keys sorted shorter first.
//!
//! Each entry word carries a type code and either the child's length or, on every
//! [`STRIDE`](constants::STRIDE)th child, the end offset of the child within the data area.
//! Numeric, extended and container payloads are padded to a 4-byte boundary and the padding
//! is counted in the child's length.
//!
//! # Example
//!
//! ```
//! use dynval::{
//!     encoding::iter::{DynIter, Token},
//!     prelude::*,
//! };
//!
//! let value = parse(r#"[1, 2.0, "3"::numeric]"#).unwrap();
//! let packed = pack(&value).unwrap();
//!
//! let mut it = DynIter::new(&packed).unwrap();
//! assert_eq!(it.next(false).unwrap().0, Token::BeginArray);
//!
//! let (tok, node) = it.next(false).unwrap();
//! assert_eq!(tok, Token::Element);
//! assert_eq!(node.unwrap().scalar(), Some(ScalarRef::Integer(1)));
//!
//! assert_eq!(unpack(&packed).unwrap(), value);
//! ```

pub mod constants;
pub mod container;
pub mod de;
pub mod iter;
pub mod scalar;
pub mod ser;

pub use container::{ContainerRef, Node};
pub use iter::{DynIter, Token};
