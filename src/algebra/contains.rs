//! Tree containment.
//!
//! `a` contains `b` when every object pair and array element of `b` can be matched in `a`
//! at the same nesting level. Array elements match in any order, and `a` may hold more than
//! `b` asks for.
//!
//! # Example
//!
//! ```
//! use dynval::{algebra::contains::contains, prelude::*};
//!
//! let a = pack(&parse(r#"{"x": {"y": 1, "z": 2}, "tags": ["a", "b", {"k": 1}]}"#).unwrap()).unwrap();
//! let b = pack(&parse(r#"{"x": {"y": 1}, "tags": [{}, "b"]}"#).unwrap()).unwrap();
//!
//! assert!(contains(&a, &b).unwrap());
//! assert!(!contains(&b, &a).unwrap());
//! ```

use super::compare::scalar_eq;
use crate::{
    config::Config,
    encoding::container::{ContainerRef, Node, FIND_IN_ARRAY},
};
use failure::Error;

/// Whether the packed value `a` contains `b`, with the default [`Config`].
pub fn contains(a: &[u8], b: &[u8]) -> Result<bool, Error> { contains_with(a, b, &Config::default()) }

/// Whether the packed value `a` contains `b`.
///
/// A raw-scalar `b` is contained by an array of `a` holding an equal element; a raw-scalar
/// `a` contains only an equal raw scalar.
pub fn contains_with(a: &[u8], b: &[u8], cfg: &Config) -> Result<bool, Error> {
    deep_contains(ContainerRef::root(a)?, ContainerRef::root(b)?, cfg, 1)
}

/// [`contains_with`] with the operands swapped.
pub fn contained_by_with(a: &[u8], b: &[u8], cfg: &Config) -> Result<bool, Error> { contains_with(b, a, cfg) }

/// Containment between two containers already located in their datums.
pub fn deep_contains(val: ContainerRef, cont: ContainerRef, cfg: &Config, depth: usize) -> Result<bool, Error> {
    cfg.check_depth(depth)?;

    if val.is_object() && cont.is_object() {
        // keys are unique, so fewer pairs can never match
        if val.len() < cont.len() {
            return Ok(false);
        }
        for i in 0..cont.len() {
            let key = match cont.key_at(i)? {
                Some(k) => k,
                None => return Ok(false),
            };
            let lhs = match val.find_key_with(key, cfg.key_collation)? {
                Some(n) => n,
                None => return Ok(false),
            };
            let rhs = match cont.get_object_value(i)? {
                Some(n) => n,
                None => return Ok(false),
            };
            let matched = match (lhs, rhs) {
                (Node::Scalar(x), Node::Scalar(y)) => scalar_eq(&x, &y),
                (Node::Container(x), Node::Container(y)) => deep_contains(x, y, cfg, depth + 1)?,
                _ => false,
            };
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    } else if val.is_array() && cont.is_array() {
        if val.is_raw_scalar() && !cont.is_raw_scalar() {
            return Ok(false);
        }

        // containers of `val`, gathered on first use
        let mut lhs_conts: Option<Vec<ContainerRef>> = None;

        for i in 0..cont.len() {
            match cont.get(i)? {
                Some(Node::Scalar(s)) => {
                    if val.find_value(FIND_IN_ARRAY, &s)?.is_none() {
                        return Ok(false);
                    }
                }
                Some(Node::Container(c)) => {
                    if lhs_conts.is_none() {
                        lhs_conts = Some(containers_of(val)?);
                    }
                    let candidates = lhs_conts.as_ref().map(Vec::as_slice).unwrap_or(&[]);
                    if candidates.is_empty() {
                        return Ok(false);
                    }
                    let mut found = false;
                    for candidate in candidates {
                        if deep_contains(*candidate, c, cfg, depth + 1)? {
                            found = true;
                            break;
                        }
                    }
                    if !found {
                        return Ok(false);
                    }
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    } else {
        Ok(false)
    }
}

fn containers_of<'a>(arr: ContainerRef<'a>) -> Result<Vec<ContainerRef<'a>>, Error> {
    let mut out = Vec::new();
    for i in 0..arr.len() {
        if let Some(Node::Container(c)) = arr.get(i)? {
            out.push(c);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::ser::pack, parser::parse};

    fn check(a: &str, b: &str) -> bool {
        contains(&pack(&parse(a).unwrap()).unwrap(), &pack(&parse(b).unwrap()).unwrap()).unwrap()
    }

    #[test]
    fn objects() {
        assert!(check(r#"{"x": {"y": 1, "z": 2}}"#, r#"{"x": {"y": 1}}"#));
        assert!(check(r#"{"a": 1}"#, "{}"));
        assert!(!check(r#"{"a": 1}"#, r#"{"a": 2}"#));
        assert!(!check(r#"{"a": 1}"#, r#"{"b": 1}"#));
        assert!(!check(r#"{"a": [1]}"#, r#"{"a": {}}"#));
        assert!(!check(r#"{"a": 1}"#, r#"{"a": 1, "b": 2}"#));
    }

    #[test]
    fn arrays() {
        assert!(check("[1, 2, 3]", "[3, 1]"));
        assert!(check("[1, 2, 3]", "[1, 1]"));
        assert!(check("[[1, 2], [3]]", "[[2]]"));
        assert!(!check("[[1, 2], [3]]", "[[2, 3]]"));
        assert!(!check("[1, 2]", "[[1]]"));
        assert!(!check("[1]", r#"{"a": 1}"#));
        assert!(check("[1, 2]", "1"));
        assert!(!check("1", "[1]"));
        assert!(check("1", "1"));
        assert!(!check(r#"["1"]"#, "[1]"));
    }

    #[test]
    fn numeric_equality() {
        assert!(check(r#"["1.0"::numeric]"#, r#"["1.000"::numeric]"#));
        assert!(!check("[1]", "[1.0]"));
    }

    #[test]
    fn depth_limit() {
        let a = pack(&parse(r#"{"a": {"b": {"c": 1}}}"#).unwrap()).unwrap();
        let cfg = Config { max_depth: 2, ..Config::default() };
        assert!(contains_with(&a, &a, &cfg).is_err());
        assert!(contains_with(&a, &pack(&parse(r#"{"a": {}}"#).unwrap()).unwrap(), &cfg).unwrap());
    }
}
