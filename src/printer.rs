//! Text output straight from a packed datum.
//!
//! Compact output separates items with `", "` and keys from values with `": "`. Indented
//! output puts every item on its own line, `cfg.indent` spaces per level. Scalars whose kind
//! would be lost on reparse carry a `::kind` annotation.

use crate::{
    config::Config,
    encoding::{
        container::Node,
        iter::{DynIter, Token},
    },
    errors::DynError,
    network::FAMILY_V4,
    scalar::{Scalar, ScalarRef},
    util::{format_f64, utf8},
};
use failure::Error;
use std::fmt::Write;

/// Prints a packed datum compactly.
///
/// # Example
///
/// ```
/// use dynval::prelude::*;
///
/// let packed = pack(&parse(r#"{"b": [1, 2.0], "a": "3.10"::numeric}"#).unwrap()).unwrap();
///
/// assert_eq!(to_text(&packed).unwrap(), r#"{"a": 3.10::numeric, "b": [1, 2.0]}"#);
/// ```
pub fn to_text(datum: &[u8]) -> Result<String, Error> { to_text_with(datum, &Config::default(), false) }

/// Prints a packed datum with one item per line.
///
/// # Example
///
/// ```
/// use dynval::prelude::*;
///
/// let packed = pack(&parse(r#"{"a": [1, true]}"#).unwrap()).unwrap();
///
/// assert_eq!(to_text_indent(&packed).unwrap(), "{\n    \"a\": [\n        1,\n        true\n    ]\n}");
/// ```
pub fn to_text_indent(datum: &[u8]) -> Result<String, Error> { to_text_with(datum, &Config::default(), true) }

/// Prints a packed datum, indenting by `cfg.indent` when `indent` is set.
///
/// A raw-scalar root prints as the bare scalar.
pub fn to_text_with(datum: &[u8], cfg: &Config, indent: bool) -> Result<String, Error> {
    let mut p = Printer { out: String::with_capacity(datum.len()), cfg, indent, level: 0 };
    p.run(&mut DynIter::new(datum)?)?;
    Ok(p.out)
}

struct Printer<'c> {
    out: String,
    cfg: &'c Config,
    indent: bool,
    level: usize,
}

impl<'c> Printer<'c> {
    fn run(&mut self, it: &mut DynIter) -> Result<(), Error> {
        let mut first = true;
        let mut raw_scalar = false;
        // the first item is never indented
        let mut use_indent = false;
        let mut after_key = false;

        loop {
            let (tok, node) = it.next(false)?;
            match (tok, node) {
                (Token::Done, _) => break,
                (Token::BeginArray, Some(Node::Container(c))) => {
                    self.separator(first);
                    if c.is_raw_scalar() {
                        raw_scalar = true;
                    } else {
                        self.newline(use_indent && !after_key);
                        self.out.push('[');
                    }
                    first = true;
                    self.open()?;
                }
                (Token::BeginObject, _) => {
                    self.separator(first);
                    self.newline(use_indent && !after_key);
                    self.out.push('{');
                    first = true;
                    self.open()?;
                }
                (Token::Key, Some(Node::Scalar(k))) => {
                    self.separator(first);
                    self.newline(use_indent);
                    self.scalar(&k)?;
                    self.out.push_str(": ");
                    first = true;
                }
                (Token::Value, Some(Node::Scalar(v))) => {
                    self.scalar(&v)?;
                    first = false;
                }
                (Token::Element, Some(Node::Scalar(v))) => {
                    self.separator(first);
                    if !raw_scalar {
                        self.newline(use_indent);
                    }
                    self.scalar(&v)?;
                    first = false;
                }
                (Token::EndArray, _) => {
                    self.level -= 1;
                    if !raw_scalar {
                        self.newline(use_indent);
                        self.out.push(']');
                    }
                    first = false;
                }
                (Token::EndObject, _) => {
                    self.level -= 1;
                    self.newline(use_indent);
                    self.out.push('}');
                    first = false;
                }
                _ => return Err(DynError::UnbalancedContainer { detail: "malformed token stream" }.into()),
            }
            use_indent = self.indent;
            after_key = tok == Token::Key;
        }
        Ok(())
    }

    fn open(&mut self) -> Result<(), Error> {
        self.level += 1;
        self.cfg.check_depth(self.level)
    }

    fn separator(&mut self, first: bool) {
        if !first {
            self.out.push_str(if self.indent { "," } else { ", " });
        }
    }

    fn newline(&mut self, indent: bool) {
        if indent {
            self.out.push('\n');
            for _ in 0..self.level * self.cfg.indent {
                self.out.push(' ');
            }
        }
    }

    fn scalar(&mut self, s: &ScalarRef) -> Result<(), Error> {
        write_scalar(&mut self.out, s)
    }
}

/// Appends the text form of one scalar, with its annotation when it needs one.
pub fn write_scalar<B: AsRef<[u8]>>(out: &mut String, s: &Scalar<B>) -> Result<(), Error> {
    match s {
        Scalar::Null => out.push_str("null"),
        Scalar::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Scalar::String(b) => escape_string(out, utf8(b.as_ref())?),
        Scalar::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        Scalar::Float(f) => out.push_str(&format_f64(*f, true)),
        Scalar::Numeric(_) => {
            out.push_str(&s.text()?);
            out.push_str("::numeric");
        }
        Scalar::Timestamp(_)
        | Scalar::TimestampTz(_)
        | Scalar::Date(_)
        | Scalar::Time(_)
        | Scalar::TimeTz(_)
        | Scalar::Interval(_)
        | Scalar::Mac(_)
        | Scalar::Mac8(_) => annotated(out, &s.text()?, s.kind().name()),
        Scalar::Inet(i) if i.family == FAMILY_V4 => out.push_str(&i.to_string()),
        Scalar::Cidr(i) if i.family == FAMILY_V4 => {
            let _ = write!(out, "{}::cidr", i);
        }
        Scalar::Inet(_) | Scalar::Cidr(_) => annotated(out, &s.text()?, s.kind().name()),
        _ => escape_string(out, &s.text()?),
    }
    Ok(())
}

fn annotated(out: &mut String, text: &str, kind: &str) {
    escape_string(out, text);
    out.push_str("::");
    out.push_str(kind);
}

/// Appends `s` as a quoted string literal.
///
/// The JSON short escapes are used where they exist; other control characters become
/// `\u00XX`.
pub fn escape_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::ser::pack, parser::parse, Dynamic};

    fn print(text: &str) -> String { to_text(&pack(&parse(text).unwrap()).unwrap()).unwrap() }

    #[test]
    fn compact() {
        assert_eq!(print(r#"{"b": 2, "a": 1, "b": 3}"#), r#"{"a": 1, "b": 3}"#);
        assert_eq!(print("[[], {}, [[1]]]"), "[[], {}, [[1]]]");
        assert_eq!(print(r#"{"k": {"n": null}}"#), r#"{"k": {"n": null}}"#);
        assert_eq!(print("7"), "7");
        assert_eq!(print(r#""s""#), r#""s""#);
    }

    #[test]
    fn floats_keep_their_kind() {
        assert_eq!(print("[2.0, 1.5e300, -0.25, NaN, -inf, 3]"), "[2.0, 1.5e+300, -0.25, NaN, -Infinity, 3]");
    }

    #[test]
    fn annotations() {
        assert_eq!(print("10.0.0.0/8::cidr"), "10.0.0.0/8::cidr");
        assert_eq!(print("10.1.2.3"), "10.1.2.3");
        assert_eq!(print(r#""::1"::inet"#), r#""::1"::inet"#);
        assert_eq!(print(r#""3.10"::numeric"#), "3.10::numeric");
        assert_eq!(print(r#""2020-01-01"::date"#), r#""2020-01-01"::date"#);
        assert_eq!(print(r#""08-00-2b-01-02-03"::macaddr"#), r#""08:00:2b:01:02:03"::macaddr"#);
    }

    #[test]
    fn printed_text_reparses_to_the_same_value() {
        for text in &[
            r#"["1 day"::interval, "12:30:00"::time, "2020-01-01 10:00:00"::timestamp, 1.0, "0.5"::numeric]"#,
            r#"{"a": [10.0.0.0/8::cidr, "fe80::1"::inet, NaN], "b": "\u0001\"\\"}"#,
        ] {
            let v = parse(text).unwrap();
            let printed = to_text(&pack(&v).unwrap()).unwrap();
            // NaN != NaN in the tree
            assert_eq!(pack(&parse(&printed).unwrap()).unwrap(), pack(&v).unwrap(), "{}", printed);
        }
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let bad = pack(&Dynamic::Scalar(Scalar::String(bytes::Bytes::from(&b"\xc3("[..])))).unwrap();
        let err = to_text(&bad).unwrap_err();
        assert_eq!(err.downcast_ref::<DynError>(), Some(&DynError::InvalidUtf8 { at: 0 }));
    }

    #[test]
    fn nul_prints_but_does_not_parse() {
        let packed = pack(&Dynamic::from("a\u{0}b")).unwrap();
        let printed = to_text(&packed).unwrap();
        assert_eq!(printed, r#""a\u0000b""#);
        assert!(parse(&printed).is_err());
    }

    #[test]
    fn escapes() {
        let mut out = String::new();
        escape_string(&mut out, "a\"b\\c\n\u{1}é");
        assert_eq!(out, r#""a\"b\\c\n\u0001é""#);
    }

    #[test]
    fn indented() {
        let packed = pack(&parse(r#"{"a": {"b": []}, "c": 1}"#).unwrap()).unwrap();
        assert_eq!(
            to_text_indent(&packed).unwrap(),
            "{\n    \"a\": {\n        \"b\": [\n        ]\n    },\n    \"c\": 1\n}"
        );
        let scalar = pack(&Dynamic::from(5)).unwrap();
        assert_eq!(to_text_indent(&scalar).unwrap(), "5");
    }

    #[test]
    fn depth_limit() {
        let packed = pack(&parse("[[[1]]]").unwrap()).unwrap();
        let cfg = Config { max_depth: 2, ..Config::default() };
        assert!(to_text_with(&packed, &cfg, false).is_err());
    }
}
