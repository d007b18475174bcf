//! Recursive descent parser for the text syntax.
//!
//! The syntax is JSON extended with `::name` type annotations on scalars, the bare float
//! words `NaN`, `inf` and `Infinity` (optionally negated), IPv4 literals, and `\x` escapes.
//! Parsed values are assembled with a [`Builder`], so object keys come out sorted and
//! deduplicated.
//!
//! # Example
//!
//! ```
//! use dynval::prelude::*;
//!
//! let v = parse(r#"{"when": "2020-01-01"::date, "net": 10.0.0.0/8::cidr, "n": NaN}"#).unwrap();
//!
//! assert_eq!(v.get("n").unwrap().kind(), Kind::Float);
//! assert_eq!(v.get("when").unwrap().kind(), Kind::Date);
//! assert_eq!(v.get("net").unwrap().kind(), Kind::Cidr);
//! ```

pub mod lexer;

use self::lexer::{Lexer, TokenKind};
use crate::{
    builder::Builder,
    config::Config,
    errors::DynError,
    scalar::{parse_float, Kind, Scalar},
    Dynamic,
};
use bytes::Bytes;
use failure::Error;

/// What the parser was looking for when it failed; selects the error detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Expecting {
    Value,
    Key,
    ArrayStart,
    ArrayNext,
    ObjectStart,
    ObjectLabel,
    ObjectNext,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Element,
    Value,
}

struct Parser<'a> {
    lex: Lexer<'a>,
    builder: Builder,
}

impl<'a> Parser<'a> {
    fn error(&self, ctx: Expecting) -> Error {
        let pos = self.lex.position();
        if self.lex.kind() == TokenKind::End {
            return DynError::UnexpectedEndOfInput { pos }.into();
        }
        let token = self.lex.text();
        let detail = match ctx {
            Expecting::Value => format!("Expected dynamic value, but found \"{}\".", token),
            Expecting::Key => format!("Expected string, but found \"{}\".", token),
            Expecting::ArrayStart => format!("Expected array element or \"]\", but found \"{}\".", token),
            Expecting::ArrayNext => format!("Expected \",\" or \"]\", but found \"{}\".", token),
            Expecting::ObjectStart => format!("Expected string or \"}}\", but found \"{}\".", token),
            Expecting::ObjectLabel => format!("Expected \":\", but found \"{}\".", token),
            Expecting::ObjectNext => format!("Expected \",\" or \"}}\", but found \"{}\".", token),
            Expecting::End => format!("Expected end of input, but found \"{}\".", token),
        };
        DynError::UnexpectedToken { detail, pos }.into()
    }

    /// Consumes the current token if it is `kind`.
    fn accept(&mut self, kind: TokenKind) -> Result<bool, Error> {
        if self.lex.kind() == kind {
            self.lex.lex()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, ctx: Expecting, kind: TokenKind) -> Result<(), Error> {
        if self.accept(kind)? {
            Ok(())
        } else {
            Err(self.error(ctx))
        }
    }

    fn parse_root(&mut self) -> Result<(), Error> {
        self.lex.lex()?;
        match self.lex.kind() {
            TokenKind::ObjectStart => self.parse_object()?,
            TokenKind::ArrayStart => self.parse_array()?,
            _ => {
                self.builder.begin_array(true)?;
                let s = self.parse_scalar()?;
                self.builder.element(Dynamic::Scalar(s))?;
                self.builder.end_array()?;
            }
        }
        self.expect(Expecting::End, TokenKind::End)
    }

    fn parse_value(&mut self, slot: Slot) -> Result<(), Error> {
        match self.lex.kind() {
            TokenKind::ObjectStart => self.parse_object(),
            TokenKind::ArrayStart => self.parse_array(),
            _ => {
                let s = Dynamic::Scalar(self.parse_scalar()?);
                match slot {
                    Slot::Element => self.builder.element(s),
                    Slot::Value => self.builder.value(s),
                }
            }
        }
    }

    fn parse_object(&mut self) -> Result<(), Error> {
        self.builder.begin_object()?;
        self.expect(Expecting::ObjectStart, TokenKind::ObjectStart)?;

        match self.lex.kind() {
            TokenKind::String => {
                self.parse_field()?;
                while self.accept(TokenKind::Comma)? {
                    self.parse_field()?;
                }
            }
            TokenKind::ObjectEnd => {}
            _ => return Err(self.error(Expecting::ObjectStart)),
        }

        self.expect(Expecting::ObjectNext, TokenKind::ObjectEnd)?;
        self.builder.end_object()
    }

    fn parse_field(&mut self) -> Result<(), Error> {
        if self.lex.kind() != TokenKind::String {
            return Err(self.error(Expecting::Key));
        }
        let key = Scalar::String(self.lex.string_value());
        self.builder.key(&key)?;
        self.lex.lex()?;
        self.expect(Expecting::ObjectLabel, TokenKind::Colon)?;
        self.parse_value(Slot::Value)
    }

    fn parse_array(&mut self) -> Result<(), Error> {
        self.builder.begin_array(false)?;
        self.expect(Expecting::ArrayStart, TokenKind::ArrayStart)?;

        if self.lex.kind() != TokenKind::ArrayEnd {
            self.parse_value(Slot::Element)?;
            while self.accept(TokenKind::Comma)? {
                self.parse_value(Slot::Element)?;
            }
        }

        self.expect(Expecting::ArrayNext, TokenKind::ArrayEnd)?;
        self.builder.end_array()
    }

    /// Reads one scalar token and its optional annotation.
    fn parse_scalar(&mut self) -> Result<Scalar, Error> {
        let kind = self.lex.kind();
        let text = match kind {
            TokenKind::String => String::from_utf8_lossy(self.lex.string_value()).into_owned(),
            TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::Integer
            | TokenKind::Float
            | TokenKind::Inet => self.lex.text().to_string(),
            _ => return Err(self.error(Expecting::Value)),
        };
        let raw = match kind {
            TokenKind::String => Some(Bytes::from(self.lex.string_value())),
            _ => None,
        };
        let pos = self.lex.position();
        self.lex.lex()?;

        let annotation = if self.accept(TokenKind::Annotation)? {
            if self.lex.kind() != TokenKind::Identifier {
                let name = self.lex.text().to_string();
                return Err(DynError::UnknownAnnotation { name, pos: self.lex.position() }.into());
            }
            let name = self.lex.text();
            let found = Kind::from_annotation(name)
                .ok_or_else(|| DynError::UnknownAnnotation { name: name.to_string(), pos: self.lex.position() });
            self.lex.lex()?;
            Some(found)
        } else {
            None
        };

        // an annotation on null is ignored
        if kind == TokenKind::Null {
            return Ok(Scalar::Null);
        }
        if let Some(found) = annotation {
            return Scalar::parse_as(found?, &text);
        }

        Ok(match kind {
            TokenKind::True => Scalar::Bool(true),
            TokenKind::False => Scalar::Bool(false),
            TokenKind::String => Scalar::String(raw.unwrap_or_default()),
            TokenKind::Integer => Scalar::Integer(
                text.parse()
                    .map_err(|_| DynError::NumberOutOfRange { text: text.clone(), kind: "bigint", pos })?,
            ),
            TokenKind::Float => {
                let f = parse_float(&text)?;
                if f.is_infinite() && !text.to_ascii_lowercase().contains("inf") {
                    return Err(DynError::NumberOutOfRange { text, kind: "double precision", pos }.into());
                }
                Scalar::Float(f)
            }
            _ => Scalar::parse_as(Kind::Inet, &text)?,
        })
    }
}

/// Parses text with the default [`Config`].
pub fn parse(text: &str) -> Result<Dynamic, Error> { parse_with(text, &Config::default()) }

/// Parses text into an in-memory value.
///
/// Nesting deeper than `cfg.max_depth` fails with [`DynError::NestingTooDeep`]; the root
/// container is at depth 1.
pub fn parse_with(text: &str, cfg: &Config) -> Result<Dynamic, Error> {
    let mut parser = Parser { lex: Lexer::new(text), builder: Builder::with_config(cfg) };
    parser.parse_root()?;
    parser.builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Numeric;

    fn err(text: &str) -> DynError { parse(text).unwrap_err().downcast().unwrap() }

    fn detail(text: &str) -> String {
        match err(text) {
            DynError::UnexpectedToken { detail, .. } => detail,
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn duplicate_keys_keep_the_last() {
        let v = parse(r#"{"b": 2, "a": 1, "b": 3}"#).unwrap();
        assert_eq!(v, Dynamic::object(vec![("a", Dynamic::from(1)), ("b", Dynamic::from(3))]));
    }

    #[test]
    fn scalars() {
        assert_eq!(parse("-7").unwrap(), Dynamic::from(-7i64));
        assert_eq!(parse("2.0").unwrap(), Dynamic::from(2.0));
        assert_eq!(parse("-inf").unwrap(), Dynamic::from(std::f64::NEG_INFINITY));
        assert_eq!(parse(" true ").unwrap(), Dynamic::from(true));
        assert!(parse("null::numeric").unwrap().is_null());
        assert_eq!(parse("10.1.2.3").unwrap().kind(), Kind::Inet);
        assert_eq!(parse(r#""é""#).unwrap(), Dynamic::from("é"));
    }

    #[test]
    fn annotations() {
        let v = parse(r#"["3.10"::numeric, 4::FLOAT, "1 day"::interval, 10.0.0.0/8::cidr]"#).unwrap();
        let items = v.into_vec().unwrap();
        let n: Numeric = "3.10".parse().unwrap();
        assert_eq!(items[0], Dynamic::Scalar(Scalar::from_numeric(&n)));
        assert_eq!(items[1], Dynamic::from(4.0));
        assert_eq!(items[2].kind(), Kind::Interval);
        assert_eq!(items[3].kind(), Kind::Cidr);

        match err("1::bogus") {
            DynError::UnknownAnnotation { name, .. } => assert_eq!(name, "bogus"),
            other => panic!("{:?}", other),
        }
        assert!(matches!(err(r#""x"::date"#), DynError::InvalidScalarText { .. }));
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(detail("[1 2]"), "Expected \",\" or \"]\", but found \"2\".");
        assert_eq!(detail("{1: 2}"), "Expected string or \"}\", but found \"1\".");
        assert_eq!(detail(r#"{"a" 2}"#), "Expected \":\", but found \"2\".");
        assert_eq!(detail(r#"{"a": 1,}"#), "Expected string, but found \"}\".");
        assert_eq!(detail("[1] 2"), "Expected end of input, but found \"2\".");
        assert_eq!(detail("[foo]"), "Expected dynamic value, but found \"foo\".");
        assert_eq!(detail("[,]"), "Expected dynamic value, but found \",\".");
        assert!(matches!(err("[1, 2"), DynError::UnexpectedEndOfInput { .. }));
        assert!(matches!(err(""), DynError::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn out_of_range_numbers() {
        match err("[99999999999999999999]") {
            DynError::NumberOutOfRange { text, kind, .. } => {
                assert_eq!(text, "99999999999999999999");
                assert_eq!(kind, "bigint");
            }
            other => panic!("{:?}", other),
        }
        assert!(matches!(err("1e999"), DynError::NumberOutOfRange { .. }));
    }

    #[test]
    fn depth_limit() {
        let cfg = Config { max_depth: 2, ..Config::default() };
        assert!(parse_with("[[1]]", &cfg).is_ok());
        assert!(parse_with(r#"{"a": [1]}"#, &cfg).is_ok());
        assert!(matches!(
            parse_with("[[[1]]]", &cfg).unwrap_err().downcast().unwrap(),
            DynError::NestingTooDeep { max: 2 }
        ));
    }

    #[test]
    fn error_context() {
        let e = parse("{\"a\": [1,\n 2,\n x]}").unwrap_err();
        assert_eq!(
            e.to_string(),
            "invalid input syntax for type dynamic: Expected dynamic value, but found \"x\".\n\
             dynamic data, line 3:  x..."
        );
    }
}
