//! Text-search documents (`tsvector`) and queries (`tsquery`).
//!
//! Both are packed as their canonical text, so equal values have equal bodies.

use crate::errors::DynError;
use failure::Error;
use std::{collections::BTreeSet, fmt};

#[derive(Clone, Debug, PartialEq, Eq)]
/// A lexeme and its positions; weights other than `D` are kept alongside.
pub struct Lexeme {
    pub word: String,
    pub positions: Vec<(u16, char)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
/// A sorted, duplicate-free list of lexemes.
pub struct TsVector {
    pub lexemes: Vec<Lexeme>,
}

fn quote_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 2);
    out.push('\'');
    for c in word.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Reads a word that is either quoted with `'` or runs until whitespace or a stop char.
fn read_word(chars: &[char], i: &mut usize, stop: &str) -> Option<String> {
    let mut word = String::new();
    if chars.get(*i) == Some(&'\'') {
        *i += 1;
        loop {
            match chars.get(*i) {
                None => return None,
                Some('\'') if chars.get(*i + 1) == Some(&'\'') => {
                    word.push('\'');
                    *i += 2;
                }
                Some('\'') => {
                    *i += 1;
                    break;
                }
                Some('\\') => {
                    word.extend(chars.get(*i + 1));
                    *i += 2;
                }
                Some(c) => {
                    word.push(*c);
                    *i += 1;
                }
            }
        }
    } else {
        while let Some(c) = chars.get(*i) {
            if c.is_whitespace() || stop.contains(*c) {
                break;
            }
            if *c == '\\' {
                word.extend(chars.get(*i + 1));
                *i += 2;
                continue;
            }
            word.push(*c);
            *i += 1;
        }
    }
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

impl TsVector {
    /// Parses `'word':1,3A other` style input.
    pub fn parse(text: &str) -> Result<TsVector, Error> {
        let bad = || -> Error { DynError::invalid_text("tsvector", text).into() };
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        let mut lexemes = Vec::new();
        loop {
            while chars.get(i).map_or(false, |c| c.is_whitespace()) {
                i += 1;
            }
            if i >= chars.len() {
                break;
            }
            let word = read_word(&chars, &mut i, ":").ok_or_else(bad)?;
            let mut positions = Vec::new();
            if chars.get(i) == Some(&':') {
                i += 1;
                loop {
                    let start = i;
                    while chars.get(i).map_or(false, |c| c.is_ascii_digit()) {
                        i += 1;
                    }
                    let num: String = chars[start..i].iter().collect();
                    let pos: u16 = num.parse().map_err(|_| bad())?;
                    let weight = match chars.get(i).map(|c| c.to_ascii_uppercase()) {
                        Some(w @ 'A'..='D') => {
                            i += 1;
                            w
                        }
                        Some('*') => {
                            i += 1;
                            'D'
                        }
                        _ => 'D',
                    };
                    positions.push((pos.max(1).min(16383), weight));
                    if chars.get(i) == Some(&',') {
                        i += 1;
                    } else {
                        break;
                    }
                }
            }
            lexemes.push(Lexeme { word, positions });
        }
        Ok(TsVector::from_lexemes(lexemes))
    }

    fn from_lexemes(mut lexemes: Vec<Lexeme>) -> TsVector {
        lexemes.sort_by(|a, b| a.word.as_bytes().cmp(b.word.as_bytes()));
        let mut out: Vec<Lexeme> = Vec::with_capacity(lexemes.len());
        for lex in lexemes {
            match out.last_mut() {
                Some(last) if last.word == lex.word => last.positions.extend(lex.positions),
                _ => out.push(lex),
            }
        }
        for lex in &mut out {
            lex.positions.sort();
            lex.positions.dedup_by_key(|(p, _)| *p);
        }
        TsVector { lexemes: out }
    }

    /// The set of words.
    pub fn words(&self) -> BTreeSet<&str> { self.lexemes.iter().map(|l| l.word.as_str()).collect() }
}

impl fmt::Display for TsVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for lex in &self.lexemes {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{}", quote_word(&lex.word))?;
            for (n, (pos, weight)) in lex.positions.iter().enumerate() {
                write!(f, "{}{}", if n == 0 { ':' } else { ',' }, pos)?;
                if *weight != 'D' {
                    write!(f, "{}", weight)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A parsed text-search query.
pub enum TsQuery {
    /// A lexeme with optional prefix match and weight restriction.
    Operand { word: String, prefix: bool, weights: String },
    Not(Box<TsQuery>),
    And(Box<TsQuery>, Box<TsQuery>),
    Or(Box<TsQuery>, Box<TsQuery>),
    /// `a <N> b`: `b` follows `a` at distance `N`.
    Phrase(Box<TsQuery>, Box<TsQuery>, u16),
}

struct QueryParser<'a> {
    text: &'a str,
    chars: Vec<char>,
    i: usize,
}

impl<'a> QueryParser<'a> {
    fn bad(&self) -> Error { DynError::invalid_text("tsquery", self.text).into() }

    fn skip_ws(&mut self) {
        while self.chars.get(self.i).map_or(false, |c| c.is_whitespace()) {
            self.i += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.chars.get(self.i).cloned()
    }

    fn or(&mut self) -> Result<TsQuery, Error> {
        let mut lhs = self.and()?;
        while self.peek() == Some('|') {
            self.i += 1;
            lhs = TsQuery::Or(Box::new(lhs), Box::new(self.and()?));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<TsQuery, Error> {
        let mut lhs = self.phrase()?;
        while self.peek() == Some('&') {
            self.i += 1;
            lhs = TsQuery::And(Box::new(lhs), Box::new(self.phrase()?));
        }
        Ok(lhs)
    }

    fn phrase(&mut self) -> Result<TsQuery, Error> {
        let mut lhs = self.not()?;
        while self.peek() == Some('<') {
            self.i += 1;
            let start = self.i;
            while self.chars.get(self.i).map_or(false, |c| *c != '>') {
                self.i += 1;
            }
            let inner: String = self.chars[start..self.i.min(self.chars.len())].iter().collect();
            if self.chars.get(self.i) != Some(&'>') {
                return Err(self.bad());
            }
            self.i += 1;
            let distance = if inner == "-" { 1 } else { inner.trim().parse().map_err(|_| self.bad())? };
            lhs = TsQuery::Phrase(Box::new(lhs), Box::new(self.not()?), distance);
        }
        Ok(lhs)
    }

    fn not(&mut self) -> Result<TsQuery, Error> {
        match self.peek() {
            Some('!') => {
                self.i += 1;
                Ok(TsQuery::Not(Box::new(self.not()?)))
            }
            Some('(') => {
                self.i += 1;
                let inner = self.or()?;
                if self.peek() != Some(')') {
                    return Err(self.bad());
                }
                self.i += 1;
                Ok(inner)
            }
            Some(_) => self.operand(),
            None => Err(self.bad()),
        }
    }

    fn operand(&mut self) -> Result<TsQuery, Error> {
        let word = read_word(&self.chars, &mut self.i, ":&|!()<").ok_or_else(|| self.bad())?;
        let mut prefix = false;
        let mut weights = String::new();
        if self.chars.get(self.i) == Some(&':') {
            self.i += 1;
            while let Some(c) = self.chars.get(self.i).map(|c| c.to_ascii_uppercase()) {
                match c {
                    '*' => prefix = true,
                    'A'..='D' if !weights.contains(c) => weights.push(c),
                    'A'..='D' => {}
                    _ => break,
                }
                self.i += 1;
            }
        }
        let mut sorted: Vec<char> = weights.chars().collect();
        sorted.sort();
        Ok(TsQuery::Operand { word, prefix, weights: sorted.into_iter().collect() })
    }
}

impl TsQuery {
    /// Parses `'a' & !('b' | c:*) <-> d`.
    pub fn parse(text: &str) -> Result<TsQuery, Error> {
        let mut p = QueryParser { text, chars: text.chars().collect(), i: 0 };
        let q = p.or()?;
        if p.peek().is_some() {
            return Err(p.bad());
        }
        Ok(q)
    }

    /// `&&`
    pub fn and(self, other: TsQuery) -> TsQuery { TsQuery::And(Box::new(self), Box::new(other)) }

    /// `||`
    pub fn or(self, other: TsQuery) -> TsQuery { TsQuery::Or(Box::new(self), Box::new(other)) }

    /// `!!`
    pub fn negate(self) -> TsQuery { TsQuery::Not(Box::new(self)) }

    /// Every lexeme mentioned by the query.
    pub fn words(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_words(&mut out);
        out
    }

    fn collect_words<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            TsQuery::Operand { word, .. } => {
                out.insert(word.as_str());
            }
            TsQuery::Not(q) => q.collect_words(out),
            TsQuery::And(a, b) | TsQuery::Or(a, b) | TsQuery::Phrase(a, b, _) => {
                a.collect_words(out);
                b.collect_words(out);
            }
        }
    }

    /// `@>`: every lexeme of `other` occurs in `self`.
    pub fn contains(&self, other: &TsQuery) -> bool { other.words().is_subset(&self.words()) }

    fn precedence(&self) -> u8 {
        match self {
            TsQuery::Or(..) => 1,
            TsQuery::And(..) => 2,
            TsQuery::Phrase(..) => 3,
            TsQuery::Not(_) => 4,
            TsQuery::Operand { .. } => 5,
        }
    }

    fn write_child(&self, child: &TsQuery, f: &mut fmt::Formatter) -> fmt::Result {
        if child.precedence() < self.precedence() {
            write!(f, "( {} )", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

impl fmt::Display for TsQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TsQuery::Operand { word, prefix, weights } => {
                write!(f, "{}", quote_word(word))?;
                if *prefix || !weights.is_empty() {
                    write!(f, ":{}{}", if *prefix { "*" } else { "" }, weights)?;
                }
                Ok(())
            }
            TsQuery::Not(q) => {
                write!(f, "!")?;
                self.write_child(q, f)
            }
            TsQuery::And(a, b) | TsQuery::Or(a, b) | TsQuery::Phrase(a, b, _) => {
                self.write_child(a, f)?;
                match self {
                    TsQuery::And(..) => write!(f, " & ")?,
                    TsQuery::Or(..) => write!(f, " | ")?,
                    TsQuery::Phrase(_, _, 1) => write!(f, " <-> ")?,
                    TsQuery::Phrase(_, _, n) => write!(f, " <{}> ", n)?,
                    _ => {}
                }
                // right operands of the same precedence keep their grouping
                if b.precedence() <= self.precedence() && b.precedence() < 4 {
                    write!(f, "( {} )", b)
                } else {
                    write!(f, "{}", b)
                }
            }
        }
    }
}
