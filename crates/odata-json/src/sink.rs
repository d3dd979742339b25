//! The lexical JSON layer: tokens in, bytes out.

use std::io::Write;

use crate::error::{Error, Result};

/// The token sink the writers emit into.
///
/// The writers never assemble raw JSON text themselves; the one exception
/// is the context-URL buffer, which arrives here as a single
/// [`string_value`](JsonSink::string_value) call.
pub trait JsonSink {
    fn object_start(&mut self) -> Result<()>;
    fn object_end(&mut self) -> Result<()>;
    fn array_start(&mut self) -> Result<()>;
    fn array_end(&mut self) -> Result<()>;
    fn property_name(&mut self, name: &str) -> Result<()>;
    fn null_value(&mut self) -> Result<()>;
    fn bool_value(&mut self, v: bool) -> Result<()>;
    fn int32_value(&mut self, v: i32) -> Result<()>;
    fn int64_value(&mut self, v: i64) -> Result<()>;
    /// Finite doubles only; non-finite values are mapped to their string
    /// spellings before they reach the sink.
    fn double_value(&mut self, v: f64) -> Result<()>;
    /// An already-rendered decimal literal, emitted verbatim as a JSON
    /// number after validation.
    fn raw_number(&mut self, literal: &str) -> Result<()>;
    fn string_value(&mut self, v: &str) -> Result<()>;
}

enum Scope {
    Object { first: bool },
    Array { first: bool },
}

/// Compact-JSON sink over any [`io::Write`](std::io::Write).
///
/// Tracks a scope stack for comma placement; a flush (and any suspension
/// that comes with it) is the inner writer's business.
pub struct TextSink<W: Write> {
    out: W,
    scopes: Vec<Scope>,
    value_pending: bool,
    scratch: String,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            scopes: Vec::new(),
            value_pending: false,
            scratch: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Comma bookkeeping for the value about to be written. A value right
    /// after a property name never takes a comma; an array element takes
    /// one unless it is the first.
    fn before_value(&mut self) -> Result<()> {
        if self.value_pending {
            self.value_pending = false;
            return Ok(());
        }
        if let Some(Scope::Array { first }) = self.scopes.last_mut() {
            if *first {
                *first = false;
            } else {
                self.out.write_all(b",")?;
            }
        }
        Ok(())
    }

    fn write_escaped(&mut self, s: &str) -> Result<()> {
        self.scratch.clear();
        escape_into(&mut self.scratch, s);
        self.out.write_all(self.scratch.as_bytes())?;
        Ok(())
    }
}

impl<W: Write> JsonSink for TextSink<W> {
    fn object_start(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.write_all(b"{")?;
        self.scopes.push(Scope::Object { first: true });
        Ok(())
    }

    fn object_end(&mut self) -> Result<()> {
        match self.scopes.pop() {
            Some(Scope::Object { .. }) => {
                self.out.write_all(b"}")?;
                Ok(())
            }
            _ => Err(Error::Message("object end without matching start".into())),
        }
    }

    fn array_start(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.write_all(b"[")?;
        self.scopes.push(Scope::Array { first: true });
        Ok(())
    }

    fn array_end(&mut self) -> Result<()> {
        match self.scopes.pop() {
            Some(Scope::Array { .. }) => {
                self.out.write_all(b"]")?;
                Ok(())
            }
            _ => Err(Error::Message("array end without matching start".into())),
        }
    }

    fn property_name(&mut self, name: &str) -> Result<()> {
        match self.scopes.last_mut() {
            Some(Scope::Object { first }) => {
                if *first {
                    *first = false;
                } else {
                    self.out.write_all(b",")?;
                }
            }
            _ => return Err(Error::Message("property name outside an object".into())),
        }
        self.write_escaped(name)?;
        self.out.write_all(b":")?;
        self.value_pending = true;
        Ok(())
    }

    fn null_value(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.write_all(b"null")?;
        Ok(())
    }

    fn bool_value(&mut self, v: bool) -> Result<()> {
        self.before_value()?;
        self.out.write_all(if v { b"true" } else { b"false" })?;
        Ok(())
    }

    fn int32_value(&mut self, v: i32) -> Result<()> {
        self.before_value()?;
        write!(self.out, "{}", v)?;
        Ok(())
    }

    fn int64_value(&mut self, v: i64) -> Result<()> {
        self.before_value()?;
        write!(self.out, "{}", v)?;
        Ok(())
    }

    fn double_value(&mut self, v: f64) -> Result<()> {
        if !v.is_finite() {
            return Err(Error::Message(
                "non-finite double reached the sink".into(),
            ));
        }
        self.before_value()?;
        let mut buf = ryu::Buffer::new();
        self.out.write_all(buf.format_finite(v).as_bytes())?;
        Ok(())
    }

    fn raw_number(&mut self, literal: &str) -> Result<()> {
        if !is_decimal_literal(literal) {
            return Err(Error::InvalidDecimal(literal.to_string()));
        }
        self.before_value()?;
        self.out.write_all(literal.as_bytes())?;
        Ok(())
    }

    fn string_value(&mut self, v: &str) -> Result<()> {
        self.before_value()?;
        self.write_escaped(v)
    }
}

fn escape_into(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                use core::fmt::Write as _;
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Cheap shape check for decimal literals: optional sign, digits, at most
/// one point, no exponent games beyond what JSON allows.
fn is_decimal_literal(s: &str) -> bool {
    let rest = s.strip_prefix('-').unwrap_or(s);
    if rest.is_empty() {
        return false;
    }
    let mut seen_point = false;
    let mut seen_digit = false;
    for (i, b) in rest.bytes().enumerate() {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_point && i > 0 && i + 1 < rest.len() => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}
