//! # Value algebra
//!
//! Everything here works directly on packed bytes, without unpacking.
//!
//! - [`compare`]: scalar equality and the total order used for sorting and btree indexes.
//! - [`contains`]: structural containment (`@>`).
//! - [`hash`]: 32-bit and seeded 64-bit hashes that agree with equality.
//! - [`ops`]: arithmetic, concatenation, key existence and the network and geometric
//!   operators.
//! - [`cast`]: conversions from a root scalar to native values or to another kind.

pub mod cast;
pub mod compare;
pub mod contains;
pub mod hash;
pub mod ops;
