//! Tokenizer for the text syntax.

use crate::errors::{DynError, Position};
use failure::Error;

/// Kinds of token the lexer produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Comma,
    Colon,
    /// `::`, introducing a type annotation.
    Annotation,
    String,
    Integer,
    Float,
    /// A dotted IPv4 literal, optionally with `/bits`.
    Inet,
    True,
    False,
    Null,
    /// A bare word; only valid as an annotation name.
    Identifier,
    /// A token that failed to lex.
    Invalid,
    End,
}

/// Characters that extend a bare word, for keywords and error reporting alike.
#[inline]
fn is_word_byte(c: u8) -> bool { c.is_ascii_alphanumeric() || c == b'_' || c >= 0x80 }

/// Length of the UTF-8 sequence starting with `lead`.
#[inline]
fn char_len(lead: u8) -> usize {
    match lead {
        0xf0..=0xff => 4,
        0xe0..=0xef => 3,
        0xc0..=0xdf => 2,
        _ => 1,
    }
}

/// Lexer state: the current token and enough bookkeeping to describe where it is.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a [u8],
    kind: TokenKind,
    token_start: usize,
    token_end: usize,
    /// De-escaped contents of the last string token.
    strval: Vec<u8>,
}

impl<'a> Lexer<'a> {
    /// A lexer positioned before the first token.
    pub fn new(input: &'a str) -> Self {
        Lexer { input: input.as_bytes(), kind: TokenKind::End, token_start: 0, token_end: 0, strval: Vec::new() }
    }

    /// The current token's kind.
    pub fn kind(&self) -> TokenKind { self.kind }

    /// The current token's source text.
    pub fn text(&self) -> &'a str {
        let bytes = &self.input[self.token_start..self.token_end];
        std::str::from_utf8(bytes).unwrap_or_default()
    }

    /// The de-escaped value of the current string token.
    pub fn string_value(&self) -> &[u8] { &self.strval }

    #[inline]
    fn at(&self, i: usize) -> Option<u8> { self.input.get(i).cloned() }

    /// Advances to the next token.
    pub fn lex(&mut self) -> Result<(), Error> {
        let mut s = self.token_end;
        while let Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') = self.at(s) {
            s += 1;
        }
        self.token_start = s;
        self.kind = TokenKind::Invalid;

        let c = match self.at(s) {
            Some(c) => c,
            None => {
                self.token_end = s;
                self.kind = TokenKind::End;
                return Ok(());
            }
        };

        let single = |kind| (kind, s + 1);
        let (kind, end) = match c {
            b'{' => single(TokenKind::ObjectStart),
            b'}' => single(TokenKind::ObjectEnd),
            b'[' => single(TokenKind::ArrayStart),
            b']' => single(TokenKind::ArrayEnd),
            b',' => single(TokenKind::Comma),
            b':' if self.at(s + 1) == Some(b':') => (TokenKind::Annotation, s + 2),
            b':' => single(TokenKind::Colon),
            b'"' => {
                let end = self.lex_string(s)?;
                (TokenKind::String, end)
            }
            b'-' if self.at(s + 1).map_or(false, |c| c == b'i' || c == b'I') => {
                let mut p = s + 1;
                while self.at(p).map_or(false, |c| c.is_ascii_alphabetic()) {
                    p += 1;
                }
                self.token_end = p;
                let word = &self.input[s + 1..p];
                if word.eq_ignore_ascii_case(b"inf") || word.eq_ignore_ascii_case(b"infinity") {
                    (TokenKind::Float, p)
                } else {
                    return Err(self.invalid_token());
                }
            }
            b'-' => self.lex_number(s + 1)?,
            b'0'..=b'9' => self.lex_number(s)?,
            _ => {
                let mut p = s;
                while self.at(p).map_or(false, is_word_byte) {
                    p += 1;
                }
                if p == s {
                    self.token_end = s + 1;
                    return Err(self.invalid_token());
                }
                let word = &self.input[s..p];
                let kind = match word {
                    b"true" => TokenKind::True,
                    b"false" => TokenKind::False,
                    b"null" => TokenKind::Null,
                    w if w.eq_ignore_ascii_case(b"nan")
                        || w.eq_ignore_ascii_case(b"inf")
                        || w.eq_ignore_ascii_case(b"infinity") =>
                    {
                        TokenKind::Float
                    }
                    _ => TokenKind::Identifier,
                };
                (kind, p)
            }
        };
        self.kind = kind;
        self.token_end = end;
        Ok(())
    }

    /// Scans a string token starting at the opening quote; returns the end of the token.
    fn lex_string(&mut self, start: usize) -> Result<usize, Error> {
        self.strval.clear();
        let mut hi_surrogate: Option<u32> = None;
        let mut s = start;

        loop {
            s += 1;
            let c = match self.at(s) {
                Some(c) => c,
                None => {
                    self.token_end = s;
                    return Err(self.invalid_token());
                }
            };
            if c == b'"' {
                break;
            } else if c < 0x20 {
                self.token_end = s;
                return Err(self.unexpected(format!("Character with value 0x{:02x} must be escaped.", c)));
            } else if c == b'\\' {
                s += 1;
                let e = match self.at(s) {
                    Some(e) => e,
                    None => {
                        self.token_end = s;
                        return Err(self.invalid_token());
                    }
                };
                if e == b'u' {
                    let mut ch: u32 = 0;
                    for _ in 0..4 {
                        s += 1;
                        let digit = match self.at(s) {
                            Some(d) => (d as char).to_digit(16),
                            None => {
                                self.token_end = s;
                                return Err(self.invalid_token());
                            }
                        };
                        match digit {
                            Some(d) => ch = ch * 16 + d,
                            None => {
                                self.token_end = s + char_len(self.input[s]);
                                return Err(
                                    self.bad_unicode("\"\\u\" must be followed by four hexadecimal digits.")
                                );
                            }
                        }
                    }
                    self.token_end = s + 1;

                    if (0xd800..=0xdbff).contains(&ch) {
                        if hi_surrogate.is_some() {
                            return Err(self.bad_unicode("Unicode high surrogate must not follow a high surrogate."));
                        }
                        hi_surrogate = Some((ch & 0x3ff) << 10);
                        continue;
                    } else if (0xdc00..=0xdfff).contains(&ch) {
                        match hi_surrogate.take() {
                            Some(hi) => ch = 0x10000 + hi + (ch & 0x3ff),
                            None => {
                                return Err(self.bad_unicode("Unicode low surrogate must follow a high surrogate."))
                            }
                        }
                    }
                    if hi_surrogate.is_some() {
                        return Err(self.bad_unicode("Unicode low surrogate must follow a high surrogate."));
                    }
                    if ch == 0 {
                        return Err(self.bad_unicode("\\u0000 cannot be converted to text."));
                    }
                    match std::char::from_u32(ch) {
                        Some(decoded) => {
                            let mut buf = [0u8; 4];
                            self.strval.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
                        }
                        None => return Err(self.bad_unicode("Invalid Unicode escape value.")),
                    }
                } else {
                    if hi_surrogate.is_some() {
                        self.token_end = s;
                        return Err(self.bad_unicode("Unicode low surrogate must follow a high surrogate."));
                    }
                    match e {
                        b'"' | b'\\' | b'/' => self.strval.push(e),
                        b'b' => self.strval.push(0x08),
                        b'f' => self.strval.push(0x0c),
                        b'n' => self.strval.push(b'\n'),
                        b'r' => self.strval.push(b'\r'),
                        b't' => self.strval.push(b'\t'),
                        // kept verbatim for the hex and escape forms of bytea
                        b'x' | b'0'..=b'9' => self.strval.extend_from_slice(&[b'\\', e]),
                        _ => {
                            let len = char_len(e);
                            self.token_end = (s + len).min(self.input.len());
                            let sequence = String::from_utf8_lossy(&self.input[s..self.token_end]).into_owned();
                            return Err(DynError::InvalidEscape { sequence, pos: self.position() }.into());
                        }
                    }
                }
            } else {
                if hi_surrogate.is_some() {
                    self.token_end = s;
                    return Err(self.bad_unicode("Unicode low surrogate must follow a high surrogate."));
                }
                self.strval.push(c);
            }
        }

        if hi_surrogate.is_some() {
            self.token_end = s;
            return Err(self.bad_unicode("Unicode low surrogate must follow a high surrogate."));
        }
        Ok(s + 1)
    }

    /// Scans a number whose digits start at `s`; a leading minus has already been passed.
    ///
    /// A second `.` inside the number turns it into an IPv4 literal.
    fn lex_number(&mut self, mut s: usize) -> Result<(TokenKind, usize), Error> {
        let digit = |lex: &Self, i: usize| lex.at(i).map_or(false, |c| c.is_ascii_digit());
        let mut kind = TokenKind::Integer;
        let mut error = false;

        if self.at(s) == Some(b'0') {
            s += 1;
        } else if digit(self, s) {
            while digit(self, s) {
                s += 1;
            }
        } else {
            error = true;
        }

        if self.at(s) == Some(b'.') {
            kind = TokenKind::Float;
            s += 1;
            if !digit(self, s) {
                error = true;
            } else {
                while digit(self, s) {
                    s += 1;
                }
            }
        }

        if self.at(s) == Some(b'.') {
            kind = TokenKind::Inet;
            s += 1;
            if !digit(self, s) {
                error = true;
            } else {
                while digit(self, s) || self.at(s) == Some(b'.') {
                    s += 1;
                }
            }
            if self.at(s) == Some(b'/') {
                s += 1;
                if !digit(self, s) {
                    error = true;
                } else {
                    while digit(self, s) {
                        s += 1;
                    }
                }
            }
        } else if let Some(b'e') | Some(b'E') = self.at(s) {
            kind = TokenKind::Float;
            s += 1;
            if let Some(b'+') | Some(b'-') = self.at(s) {
                s += 1;
            }
            if !digit(self, s) {
                error = true;
            } else {
                while digit(self, s) {
                    s += 1;
                }
            }
        }

        // trailing word characters belong to the (bad) token
        while self.at(s).map_or(false, is_word_byte) {
            error = true;
            s += 1;
        }

        self.token_end = s;
        if error {
            return Err(self.invalid_token());
        }
        Ok((kind, s))
    }

    /// Describes where the current token ends, with a window of the line it is on.
    pub fn position(&self) -> Position {
        let input = self.input;
        let context_end = self.token_end.min(input.len());
        let before = &input[..context_end];
        let line_start = before.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
        let line = 1 + before.iter().filter(|&&b| b == b'\n').count();

        let mut context_start = line_start;
        while context_end - context_start >= 50 {
            context_start += char_len(input[context_start]);
        }
        if context_start - line_start <= 3 {
            context_start = line_start;
        }

        let prefix = if context_start > line_start { "..." } else { "" };
        let suffix = match input.get(context_end) {
            Some(b'\n') | Some(b'\r') | None => "",
            Some(_) if self.kind == TokenKind::End => "",
            Some(_) => "...",
        };
        let excerpt = String::from_utf8_lossy(&input[context_start..context_end]);
        let column = String::from_utf8_lossy(&input[line_start..context_end]).chars().count();

        Position { line, column, context: format!("{}{}{}", prefix, excerpt, suffix) }
    }

    fn unexpected(&self, detail: String) -> Error { DynError::UnexpectedToken { detail, pos: self.position() }.into() }

    fn bad_unicode(&self, detail: &str) -> Error {
        DynError::InvalidUnicodeSequence { detail: detail.to_string(), pos: self.position() }.into()
    }

    /// The token from its start to the current end is malformed.
    fn invalid_token(&self) -> Error {
        let end = self.token_end.min(self.input.len());
        let token = String::from_utf8_lossy(&self.input[self.token_start..end]);
        self.unexpected(format!("Token \"{}\" is invalid.", token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(TokenKind, String)> {
        let mut lex = Lexer::new(text);
        let mut out = Vec::new();
        loop {
            lex.lex().unwrap();
            if lex.kind() == TokenKind::End {
                return out;
            }
            out.push((lex.kind(), lex.text().to_string()));
        }
    }

    fn detail(text: &str) -> DynError {
        let mut lex = Lexer::new(text);
        loop {
            match lex.lex() {
                Err(e) => return e.downcast().unwrap(),
                Ok(()) if lex.kind() == TokenKind::End => panic!("no error in {:?}", text),
                Ok(()) => {}
            }
        }
    }

    #[test]
    fn numbers_and_literals() {
        use TokenKind::*;
        let toks = kinds("-12 0.5 1e10 10.0.0.1/8 NaN -Infinity inf true null ::cidr");
        let kinds: Vec<TokenKind> = toks.iter().map(|t| t.0).collect();
        assert_eq!(kinds, vec![Integer, Float, Float, Inet, Float, Float, Float, True, Null, Annotation, Identifier]);
        assert_eq!(toks[3].1, "10.0.0.1/8");
        assert_eq!(toks[5].1, "-Infinity");
    }

    #[test]
    fn string_escapes() {
        let mut lex = Lexer::new(r#""a\n\"\u00e9\ud83d\ude00\x41\1""#);
        lex.lex().unwrap();
        assert_eq!(lex.kind(), TokenKind::String);
        assert_eq!(lex.string_value(), "a\n\"é😀\\x41\\1".as_bytes());
    }

    #[test]
    fn invalid_tokens() {
        match detail("[01x]") {
            DynError::UnexpectedToken { detail, pos } => {
                assert_eq!(detail, "Token \"01x\" is invalid.");
                assert_eq!(pos.context, "[01x...");
            }
            other => panic!("{:?}", other),
        }
        match detail("-inx") {
            DynError::UnexpectedToken { detail, .. } => assert_eq!(detail, "Token \"-inx\" is invalid."),
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn string_errors() {
        match detail("\"a\u{1}\"") {
            DynError::UnexpectedToken { detail, .. } => {
                assert_eq!(detail, "Character with value 0x01 must be escaped.")
            }
            other => panic!("{:?}", other),
        }
        match detail(r#""\q""#) {
            DynError::InvalidEscape { sequence, .. } => assert_eq!(sequence, "q"),
            other => panic!("{:?}", other),
        }
        match detail(r#""\ud800x""#) {
            DynError::InvalidUnicodeSequence { detail, .. } => {
                assert_eq!(detail, "Unicode low surrogate must follow a high surrogate.")
            }
            other => panic!("{:?}", other),
        }
        match detail(r#""\u12g4""#) {
            DynError::InvalidUnicodeSequence { detail, .. } => {
                assert_eq!(detail, "\"\\u\" must be followed by four hexadecimal digits.")
            }
            other => panic!("{:?}", other),
        }
        assert!(matches!(detail(r#""\u0000""#), DynError::InvalidUnicodeSequence { .. }));
    }

    #[test]
    fn context_window() {
        let long = format!("{{\"k\": [{}, x]}}", "1, ".repeat(30).trim_end_matches(", "));
        let mut lex = Lexer::new(&long);
        while lex.text() != "x" {
            lex.lex().unwrap();
        }
        let pos = lex.position();
        assert_eq!(pos.line, 1);
        assert!(pos.context.starts_with("..."));
        assert!(pos.context.ends_with(", x..."));
        assert!(pos.context.len() < 50 + 6);

        let mut lex = Lexer::new("[1,\n  2,\n  y]");
        while lex.text() != "y" {
            lex.lex().unwrap();
        }
        let pos = lex.position();
        assert_eq!((pos.line, pos.column), (3, 3));
        assert_eq!(pos.context, "  y...");
    }
}
