//! Literal-only parser for Python-style data literals
//!
//! Models are asked to answer with a Python list of strings. This parser
//! accepts the literal subset of that syntax and nothing else: it builds a
//! [`Literal`] tree and never evaluates names, calls, operators or
//! comprehensions.
//!
//! Supported forms:
//!
//! - strings: `'..'`, `".."`, triple-quoted, `r`/`u`/`b` prefixes, escapes,
//!   implicit concatenation of adjacent literals (`"a" "b"`)
//! - integers (decimal, `0x`, `0o`, `0b`, `_` separators) and floats
//! - `True`, `False`, `None`
//! - lists, tuples, sets and dicts, with trailing commas
//! - unary `+`/`-` on numbers
//! - `#` comments and backslash line continuations

use std::fmt;

/// A parsed literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Python type name, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::None => "NoneType",
            Literal::Bool(_) => "bool",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Str(_) => "str",
            Literal::Bytes(_) => "bytes",
            Literal::List(_) => "list",
            Literal::Tuple(_) => "tuple",
            Literal::Set(_) => "set",
            Literal::Dict(_) => "dict",
        }
    }
}

/// Parse failure with the character offset it was detected at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub position: usize,
    pub message: String,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.position)
    }
}

impl std::error::Error for LiteralError {}

/// Parse a complete literal expression.
///
/// Surrounding whitespace is ignored. A bare comma-separated sequence at the
/// top level is a tuple, as in Python.
pub fn parse_literal(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser::new(input);
    parser.skip_trivia();

    if parser.at_end() {
        return Err(parser.error("empty expression"));
    }

    let first = parser.parse_value()?;
    parser.skip_trivia();

    let value = if parser.peek() == Some(',') {
        let mut items = vec![first];
        while parser.eat(',') {
            parser.skip_trivia();
            if parser.at_end() {
                break;
            }
            items.push(parser.parse_value()?);
            parser.skip_trivia();
        }
        Literal::Tuple(items)
    } else {
        first
    };

    parser.skip_trivia();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }

    Ok(value)
}

/// One piece of an implicitly concatenated string run
enum StrPiece {
    Text(String),
    Bytes(Vec<u8>),
}

/// Deepest container nesting accepted before parsing gives up
pub const MAX_DEPTH: usize = 100;

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            position: self.pos,
            message: message.into(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skip whitespace, comments and line continuations
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => self.pos += 1,
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                '\\' if matches!(self.peek_at(1), Some('\n') | Some('\r')) => self.pos += 2,
                _ => break,
            }
        }
    }

    fn parse_value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_trivia();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('[') => self.nested(Self::parse_list),
            Some('(') => self.nested(Self::parse_parenthesized),
            Some('{') => self.nested(Self::parse_braced),
            Some('\'') | Some('"') => self.parse_string_run(),
            Some(c) if c.is_ascii_digit() => self.parse_number(false),
            Some('.') if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.parse_number(false)
            }
            Some('-') | Some('+') => {
                let negative = self.bump() == Some('-');
                self.skip_trivia();
                match self.peek() {
                    Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(negative),
                    _ => Err(self.error("unary operator must be followed by a number")),
                }
            }
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_name_or_prefixed_string(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
        }
    }

    /// Run a container parser one nesting level deeper
    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Literal, LiteralError>,
    ) -> Result<Literal, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_list(&mut self) -> Result<Literal, LiteralError> {
        self.bump();
        let items = self.parse_sequence(']')?;
        Ok(Literal::List(items))
    }

    /// Comma-separated values up to `close`, trailing comma allowed
    fn parse_sequence(&mut self, close: char) -> Result<Vec<Literal>, LiteralError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.parse_value()?);
            self.skip_trivia();
            if self.eat(',') {
                continue;
            }
            if self.eat(close) {
                return Ok(items);
            }
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected ',' or '{}', found '{}'", close, c)),
                None => self.error(format!("unclosed container, expected '{}'", close)),
            });
        }
    }

    /// `()` is an empty tuple, `(x)` is `x`, `(x,)` and `(x, y)` are tuples
    fn parse_parenthesized(&mut self) -> Result<Literal, LiteralError> {
        self.bump();
        self.skip_trivia();
        if self.eat(')') {
            return Ok(Literal::Tuple(Vec::new()));
        }

        let first = self.parse_value()?;
        self.skip_trivia();
        if self.eat(')') {
            return Ok(first);
        }
        if !self.eat(',') {
            return Err(self.error("expected ',' or ')'"));
        }

        let mut items = vec![first];
        items.extend(self.parse_sequence(')')?);
        Ok(Literal::Tuple(items))
    }

    /// `{}` is an empty dict; the first entry decides between dict and set
    fn parse_braced(&mut self) -> Result<Literal, LiteralError> {
        self.bump();
        self.skip_trivia();
        if self.eat('}') {
            return Ok(Literal::Dict(Vec::new()));
        }

        let first = self.parse_value()?;
        self.skip_trivia();

        if !self.eat(':') {
            if self.eat('}') {
                return Ok(Literal::Set(vec![first]));
            }
            if !self.eat(',') {
                return Err(self.error("expected ',', ':' or '}'"));
            }
            let mut items = vec![first];
            items.extend(self.parse_sequence('}')?);
            return Ok(Literal::Set(items));
        }

        let mut entries = Vec::new();
        let mut key = first;
        loop {
            let value = self.parse_value()?;
            entries.push((key, value));
            self.skip_trivia();
            if self.eat('}') {
                return Ok(Literal::Dict(entries));
            }
            if !self.eat(',') {
                return Err(self.error("expected ',' or '}' in dict"));
            }
            self.skip_trivia();
            if self.eat('}') {
                return Ok(Literal::Dict(entries));
            }
            key = self.parse_value()?;
            self.skip_trivia();
            if !self.eat(':') {
                return Err(self.error("expected ':' after dict key"));
            }
        }
    }

    fn parse_name_or_prefixed_string(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let name: String = self.chars[start..self.pos].iter().collect();

        if matches!(self.peek(), Some('\'') | Some('"')) && is_string_prefix(&name) {
            self.pos = start;
            return self.parse_string_run();
        }

        match name.as_str() {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "None" => Ok(Literal::None),
            _ => {
                self.pos = start;
                Err(self.error(format!("'{}' is not a literal", name)))
            }
        }
    }

    /// One or more adjacent string literals, concatenated
    fn parse_string_run(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        let mut text: Option<String> = None;
        let mut bytes: Option<Vec<u8>> = None;

        loop {
            match self.parse_single_string()? {
                StrPiece::Text(piece) => text.get_or_insert_with(String::new).push_str(&piece),
                StrPiece::Bytes(piece) => bytes.get_or_insert_with(Vec::new).extend(piece),
            }
            if text.is_some() && bytes.is_some() {
                return Err(LiteralError {
                    position: start,
                    message: "cannot mix bytes and str literals".to_string(),
                });
            }

            let checkpoint = self.pos;
            self.skip_trivia();
            if !self.at_string_start() {
                self.pos = checkpoint;
                break;
            }
        }

        Ok(match (text, bytes) {
            (_, Some(bytes)) => Literal::Bytes(bytes),
            (text, None) => Literal::Str(text.unwrap_or_default()),
        })
    }

    fn at_string_start(&self) -> bool {
        let mut offset = 0;
        let mut prefix = String::new();
        while let Some(c) = self.peek_at(offset) {
            if c == '\'' || c == '"' {
                return prefix.is_empty() || is_string_prefix(&prefix);
            }
            if !c.is_ascii_alphabetic() || offset >= 2 {
                return false;
            }
            prefix.push(c);
            offset += 1;
        }
        false
    }

    fn parse_single_string(&mut self) -> Result<StrPiece, LiteralError> {
        let mut raw = false;
        let mut is_bytes = false;
        while let Some(c) = self.peek() {
            match c.to_ascii_lowercase() {
                'r' => raw = true,
                'b' => is_bytes = true,
                'u' => {}
                'f' => return Err(self.error("f-strings are not literals")),
                _ => break,
            }
            self.pos += 1;
        }

        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected string quote")),
        };
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        let mut out = String::new();
        loop {
            let c = match self.bump() {
                Some(c) => c,
                None => return Err(self.error("unterminated string literal")),
            };

            if c == quote {
                if !triple {
                    break;
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.pos += 2;
                    break;
                }
                out.push(c);
                continue;
            }

            if (c == '\n' || c == '\r') && !triple {
                return Err(self.error("unterminated string literal"));
            }

            if c == '\\' {
                if raw {
                    out.push('\\');
                    if let Some(next) = self.bump() {
                        out.push(next);
                    }
                    continue;
                }
                self.parse_escape(&mut out, is_bytes)?;
                continue;
            }

            out.push(c);
        }

        if is_bytes {
            if let Some(bad) = out.chars().find(|c| (*c as u32) > 0xff) {
                return Err(self.error(format!(
                    "bytes literal contains non-byte character '{}'",
                    bad
                )));
            }
            Ok(StrPiece::Bytes(out.chars().map(|c| c as u32 as u8).collect()))
        } else {
            Ok(StrPiece::Text(out))
        }
    }

    fn parse_escape(&mut self, out: &mut String, is_bytes: bool) -> Result<(), LiteralError> {
        let c = match self.bump() {
            Some(c) => c,
            None => return Err(self.error("unterminated string literal")),
        };

        match c {
            '\n' => {}
            '\r' => {
                self.eat('\n');
            }
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut value = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                out.push(self.code_point(value)?);
            }
            'x' => {
                let value = self.hex_digits(2)?;
                out.push(self.code_point(value)?);
            }
            'u' if !is_bytes => {
                let value = self.hex_digits(4)?;
                out.push(self.code_point(value)?);
            }
            'U' if !is_bytes => {
                let value = self.hex_digits(8)?;
                out.push(self.code_point(value)?);
            }
            'N' if !is_bytes => {
                return Err(self.error("named unicode escapes are not supported"));
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32, LiteralError> {
        let mut value = 0u32;
        for _ in 0..count {
            match self.peek().and_then(|d| d.to_digit(16)) {
                Some(d) => {
                    value = value * 16 + d;
                    self.pos += 1;
                }
                None => return Err(self.error("truncated hex escape")),
            }
        }
        Ok(value)
    }

    fn code_point(&self, value: u32) -> Result<char, LiteralError> {
        char::from_u32(value).ok_or_else(|| self.error("escape is not a valid code point"))
    }

    fn parse_number(&mut self, negative: bool) -> Result<Literal, LiteralError> {
        let start = self.pos;

        if self.peek() == Some('0') {
            let radix = match self.peek_at(1) {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.pos += 2;
                let digits = self.take_digits(|c| c.is_digit(radix));
                if digits.is_empty() {
                    return Err(self.error("missing digits after integer prefix"));
                }
                return self.finish_int(&digits, radix, negative, start);
            }
        }

        let mut text = self.take_digits(|c| c.is_ascii_digit());
        let mut is_float = false;

        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            text.push('.');
            text.push_str(&self.take_digits(|c| c.is_ascii_digit()));
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let checkpoint = self.pos;
            self.pos += 1;
            let mut exponent = String::from("e");
            if let Some(sign @ ('+' | '-')) = self.peek() {
                exponent.push(sign);
                self.pos += 1;
            }
            let digits = self.take_digits(|c| c.is_ascii_digit());
            if digits.is_empty() {
                self.pos = checkpoint;
                return Err(self.error("malformed exponent"));
            }
            exponent.push_str(&digits);
            text.push_str(&exponent);
            is_float = true;
        }

        if matches!(self.peek(), Some('j') | Some('J')) {
            return Err(self.error("complex numbers are not supported"));
        }
        if self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            return Err(self.error("invalid numeric literal"));
        }

        if is_float {
            let value: f64 = text.parse().map_err(|_| LiteralError {
                position: start,
                message: format!("invalid float literal '{}'", text),
            })?;
            return Ok(Literal::Float(if negative { -value } else { value }));
        }

        if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
            return Err(LiteralError {
                position: start,
                message: "leading zeros in decimal integer literals are not permitted".to_string(),
            });
        }

        self.finish_int(&text, 10, negative, start)
    }

    /// Digits accepted by `accept`, with single `_` separators between them
    fn take_digits<F>(&mut self, accept: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if accept(c) {
                digits.push(c);
                self.pos += 1;
            } else if c == '_' && !digits.is_empty() && self.peek_at(1).is_some_and(&accept) {
                self.pos += 1;
            } else {
                break;
            }
        }
        digits
    }

    fn finish_int(
        &self,
        digits: &str,
        radix: u32,
        negative: bool,
        start: usize,
    ) -> Result<Literal, LiteralError> {
        let magnitude = i128::from_str_radix(digits, radix).map_err(|_| LiteralError {
            position: start,
            message: "integer literal out of range".to_string(),
        })?;
        let value = if negative { -magnitude } else { magnitude };
        i64::try_from(value)
            .map(Literal::Int)
            .map_err(|_| LiteralError {
                position: start,
                message: "integer literal out of range".to_string(),
            })
    }
}

fn is_string_prefix(prefix: &str) -> bool {
    matches!(
        prefix.to_ascii_lowercase().as_str(),
        "r" | "u" | "b" | "br" | "rb" | "f" | "fr" | "rf"
    )
}
