//! Error taxonomy.
//!
//! Every fallible function in this crate returns `Result<T, failure::Error>`. The errors
//! it raises itself are [`DynError`] values, so callers can match on them with
//! `err.downcast_ref::<DynError>()`.
//!
//! # Example
//!
//! ```
//! use dynval::prelude::*;
//!
//! let err = parse("[1, 2").unwrap_err();
//!
//! match err.downcast_ref::<DynError>() {
//!     Some(DynError::UnexpectedEndOfInput { pos }) => assert_eq!(pos.line, 1),
//!     other => panic!("unexpected error {:?}", other),
//! }
//! ```

use failure::Fail;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Where in the input text a parse error was detected.
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, in characters, of the end of the offending token.
    pub column: usize,
    /// Excerpt of the offending line, with `...` marking truncation.
    pub context: String,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "dynamic data, line {}: {}", self.line, self.context)
    }
}

/// Errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum DynError {
    /// The parser met a token it did not expect here.
    #[fail(display = "invalid input syntax for type dynamic: {}\n{}", detail, pos)]
    UnexpectedToken { detail: String, pos: Position },
    /// A backslash escape inside a string literal is not recognised.
    #[fail(
        display = "invalid input syntax for type dynamic: Escape sequence \"\\{}\" is invalid.\n{}",
        sequence, pos
    )]
    InvalidEscape { sequence: String, pos: Position },
    /// A `\u` escape is malformed, a surrogate is unpaired, or it names `\u0000`.
    #[fail(display = "invalid input syntax for type dynamic: {}\n{}", detail, pos)]
    InvalidUnicodeSequence { detail: String, pos: Position },
    /// `::name` names no known scalar kind.
    #[fail(display = "invalid annotation value for scalar: \"{}\"\n{}", name, pos)]
    UnknownAnnotation { name: String, pos: Position },
    /// The text stopped in the middle of a value.
    #[fail(
        display = "invalid input syntax for type dynamic: The input string ended unexpectedly.\n{}",
        pos
    )]
    UnexpectedEndOfInput { pos: Position },
    /// A numeric literal does not fit the kind it is read as.
    #[fail(display = "value \"{}\" is out of range for type {}\n{}", text, kind, pos)]
    NumberOutOfRange { text: String, kind: &'static str, pos: Position },

    /// A close event does not match the innermost open container.
    #[fail(display = "unbalanced dynamic container: {}", detail)]
    UnbalancedContainer { detail: &'static str },
    /// An object key event carried something other than a string.
    #[fail(display = "dynamic object keys must be strings, found {}", found)]
    KeyNotString { found: &'static str },
    /// A walk went deeper than the configured limit.
    #[fail(display = "dynamic nesting depth exceeds the maximum allowed depth ({})", max)]
    NestingTooDeep { max: usize },
    /// An object has more pairs than the header's count field can hold.
    #[fail(display = "number of dynamic object pairs exceeds the maximum allowed ({})", max)]
    TooManyPairs { max: usize },
    /// An array has more elements than the header's count field can hold.
    #[fail(display = "number of dynamic array elements exceeds the maximum allowed ({})", max)]
    TooManyElements { max: usize },
    /// A string scalar is longer than an entry word can describe.
    #[fail(display = "string too long to represent as dynamic string ({} bytes)", len)]
    StringTooLong { len: usize },
    /// A container's payload is larger than an entry word can describe.
    #[fail(display = "total size of dynamic container exceeds the maximum of {} bytes", max)]
    PayloadTooLarge { max: usize },

    /// A typecast was asked to convert a kind it does not accept.
    #[fail(display = "cannot cast dynamic {} to type {}", from, to)]
    CannotCast { from: &'static str, to: &'static str },
    /// An operator has no rule for this pair of operand kinds.
    #[fail(display = "invalid input types for dynamic operator {}: {} and {}", op, lhs, rhs)]
    InvalidOperandTypes { op: &'static str, lhs: &'static str, rhs: &'static str },
    /// Integer, float, numeric or interval division by zero.
    #[fail(display = "division by zero")]
    DivisionByZero,
    /// An operator that takes a scalar was handed an array or an object.
    #[fail(display = "{} requires a scalar dynamic operand", op)]
    NotScalar { op: &'static str },
    /// A scalar was concatenated with an object.
    #[fail(display = "invalid concatenation of dynamic values: {} and {}", lhs, rhs)]
    InvalidConcatenation { lhs: &'static str, rhs: &'static str },
    /// Arithmetic left the range of its result kind.
    #[fail(display = "{} out of range", what)]
    NumericOverflow { what: &'static str },
    /// A kind's textual parser rejected its input.
    #[fail(display = "invalid input syntax for type {}: \"{}\"", kind, text)]
    InvalidScalarText { kind: &'static str, text: String },

    /// An extended entry carries a tag no kind is registered for.
    #[fail(display = "invalid byte sequence for encoding \"UTF8\" at byte {}", at)]
    InvalidUtf8 { at: usize },

    #[fail(display = "unknown dynamic extended type tag {}", tag)]
    UnknownExtendedTag { tag: u32 },
    /// `recv` was handed a wire message with a version other than 1.
    #[fail(display = "unsupported dynamic version number {}", version)]
    UnsupportedWireVersion { version: u8 },
    /// A read ran past the end of a packed buffer.
    #[fail(
        display = "dynamic payload truncated: tried to read {} bytes at offset {} from buffer of size {}",
        needed, at, len
    )]
    TruncatedPayload { needed: usize, at: usize, len: usize },
}

impl DynError {
    /// Shorthand for [`DynError::InvalidScalarText`].
    pub fn invalid_text(kind: &'static str, text: &str) -> Self {
        DynError::InvalidScalarText { kind, text: text.to_string() }
    }

    /// Whether this is one of the parse errors, which carry a [`Position`].
    pub fn position(&self) -> Option<&Position> {
        use DynError::*;
        match self {
            UnexpectedToken { pos, .. }
            | InvalidEscape { pos, .. }
            | InvalidUnicodeSequence { pos, .. }
            | UnknownAnnotation { pos, .. }
            | UnexpectedEndOfInput { pos }
            | NumberOutOfRange { pos, .. } => Some(pos),
            _ => None,
        }
    }
}
