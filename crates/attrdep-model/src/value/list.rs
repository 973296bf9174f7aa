//! Value-list text: the storage form of a mapping's source or target tuple.
//!
//! ```text
//! list   := [ value { delim value } ]
//! delim  := "," | ";" | whitespace
//! value  := integer | real | string | "null" | "true" | "false" | "*"
//! ```
//!
//! Strings are double-quoted and support the escapes
//! `\" \\ \0 \a \b \f \n \r \t \v \uXXXX`. Symbols are case-insensitive.
//! Values in a list are untyped; see [`Value::convert_to`].

use std::fmt::Write;

use super::{ConcreteValue, Value, WILDCARD_TOKEN};
use crate::ValueError;

/// Parse a value list. Syntax errors carry the 1-based character position.
pub fn parse_values(text: &str) -> Result<Vec<Value>, ValueError> {
    let mut scanner = Scanner::new(text);
    let mut values = Vec::new();

    scanner.skip_whitespace();
    if scanner.at_end() {
        return Ok(values);
    }

    loop {
        values.push(scanner.value()?);

        let skipped = scanner.skip_whitespace();
        if scanner.at_end() {
            return Ok(values);
        }
        if matches!(scanner.peek(), Some(',' | ';')) {
            scanner.advance();
            scanner.skip_whitespace();
            if scanner.at_end() {
                return Err(scanner.error("value expected after delimiter"));
            }
        } else if !skipped {
            return Err(scanner.error("delimiter expected"));
        }
    }
}

/// Format values as a list that [`parse_values`] reads back.
pub fn format_values(values: &[Value]) -> String {
    let mut out = String::new();
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        format_value(&mut out, value);
    }
    out
}

fn format_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Wildcard => out.push_str(WILDCARD_TOKEN),
        Value::Concrete(ConcreteValue::Integer(number)) => {
            let _ = write!(out, "{number}");
        }
        Value::Concrete(ConcreteValue::Real(number)) => {
            let text = number.to_string();
            out.push_str(&text);
            // Keep reals distinguishable from integers.
            if number.is_finite() && !text.contains(['.', 'e', 'E']) {
                out.push_str(".0");
            }
        }
        Value::Concrete(ConcreteValue::Boolean(flag)) => {
            let _ = write!(out, "{flag}");
        }
        Value::Concrete(ConcreteValue::Text(text)) => quote(out, text),
        Value::Concrete(date @ ConcreteValue::Date(_)) => quote(out, &date.to_string()),
    }
}

fn quote(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{b}' => out.push_str("\\v"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Returns true if any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn error(&self, message: impl Into<String>) -> ValueError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> ValueError {
        ValueError::syntax(pos + 1, message)
    }

    fn value(&mut self) -> Result<Value, ValueError> {
        match self.peek() {
            Some('"') => self.string().map(Value::text),
            Some('*') => {
                self.advance();
                Ok(Value::Wildcard)
            }
            Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => self.number(),
            Some(c) if c.is_alphabetic() => self.symbol(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("value expected")),
        }
    }

    fn number(&mut self) -> Result<Value, ValueError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let is_real = text.contains(['.', 'e', 'E']);
        let parsed = if is_real {
            text.parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(Value::real)
        } else {
            text.parse::<i64>().ok().map(Value::integer)
        };
        parsed.ok_or_else(|| self.error_at(start, format!("invalid number '{text}'")))
    }

    fn symbol(&mut self) -> Result<Value, ValueError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        match text.to_ascii_lowercase().as_str() {
            "null" => Ok(Value::Null),
            "true" => Ok(Value::boolean(true)),
            "false" => Ok(Value::boolean(false)),
            _ => Err(self.error_at(start, format!("unknown symbol '{text}'"))),
        }
    }

    fn string(&mut self) -> Result<String, ValueError> {
        let start = self.pos;
        self.advance();
        let mut text = String::new();
        loop {
            let Some(c) = self.advance() else {
                return Err(self.error_at(start, "unterminated string"));
            };
            match c {
                '"' => return Ok(text),
                '\\' => text.push(self.escape()?),
                c => text.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, ValueError> {
        let start = self.pos - 1;
        let Some(c) = self.advance() else {
            return Err(self.error_at(start, "unterminated escape sequence"));
        };
        let escaped = match c {
            '"' => '"',
            '\\' => '\\',
            '0' => '\0',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            'u' => {
                let end = self.pos + 4;
                let hex: String = self
                    .chars
                    .get(self.pos..end)
                    .map(|digits| digits.iter().collect())
                    .unwrap_or_default();
                let code = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error_at(start, "invalid unicode escape"))?;
                self.pos = end;
                code
            }
            other => return Err(self.error_at(start, format!("unknown escape '\\{other}'"))),
        };
        Ok(escaped)
    }
}
