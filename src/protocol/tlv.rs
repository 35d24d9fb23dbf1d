use std::fmt;

use super::tags::{Tag, MAX_VALUE_LEN};
use crate::error::{PayloadError, Result};

/// A single tag-length-value field.
///
/// Wire format:
/// ```text
/// [tag: 2 digits] [length: 2 digits] [value: `length` characters]
/// ```
///
/// Length counts characters, not bytes, and never exceeds 99.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    pub tag: String,
    pub value: String,
}

impl TlvField {
    /// Create a field, rejecting values the length prefix cannot describe.
    pub fn new(tag: Tag, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let len = value.chars().count();
        if len > MAX_VALUE_LEN {
            return Err(PayloadError::FieldTooLong { tag, len });
        }
        Ok(Self {
            tag: tag.to_string(),
            value,
        })
    }

    /// Create a field whose value is itself a serialized TLV sequence.
    pub fn template(tag: Tag, children: &[TlvField]) -> Result<Self> {
        Self::new(tag, encode_all(children))
    }

    /// Declared length: character count of the value.
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Append the serialized field to `out`.
    pub fn encode_into(&self, out: &mut String) {
        out.push_str(&self.tag);
        out.push_str(&format!("{:02}", self.len()));
        out.push_str(&self.value);
    }

    /// Parse the value as a nested TLV sequence.
    pub fn children(&self) -> Result<Vec<TlvField>> {
        parse_all(&self.value)
    }
}

impl fmt::Display for TlvField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}{}", self.tag, self.len(), self.value)
    }
}

/// Concatenate serialized fields in order.
pub fn encode_all(fields: &[TlvField]) -> String {
    let mut out = String::new();
    for field in fields {
        field.encode_into(&mut out);
    }
    out
}

/// Sequential reader over a serialized TLV string.
pub struct TlvReader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TlvReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the next unread field.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn read_digits(&mut self, what: &str) -> Result<&'a str> {
        let digits = self
            .input
            .get(self.pos..self.pos + 2)
            .filter(|d| d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| {
                PayloadError::Malformed(format!("expected 2-digit {} at offset {}", what, self.pos))
            })?;
        self.pos += 2;
        Ok(digits)
    }

    fn read_field(&mut self) -> Result<TlvField> {
        let tag = self.read_digits("tag")?;
        let len: usize = self
            .read_digits("length")?
            .parse()
            .map_err(|_| PayloadError::Malformed(format!("bad length for tag {}", tag)))?;

        let rest = &self.input[self.pos..];
        let end = match rest.char_indices().nth(len) {
            Some((idx, _)) => idx,
            None if rest.chars().count() == len => rest.len(),
            None => {
                return Err(PayloadError::Malformed(format!(
                    "value overflows payload: tag={}, len={}, offset={}",
                    tag, len, self.pos
                )))
            }
        };
        let value = rest[..end].to_string();
        self.pos += end;

        Ok(TlvField {
            tag: tag.to_string(),
            value,
        })
    }
}

impl Iterator for TlvReader<'_> {
    type Item = Result<TlvField>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }
        let field = self.read_field();
        if field.is_err() {
            // Stop after the first error.
            self.pos = self.input.len();
        }
        Some(field)
    }
}

/// Parse a complete TLV sequence.
pub fn parse_all(input: &str) -> Result<Vec<TlvField>> {
    TlvReader::new(input).collect()
}

/// Find the first field with the given tag.
pub fn find<'f>(fields: &'f [TlvField], tag: &str) -> Option<&'f TlvField> {
    fields.iter().find(|f| f.tag == tag)
}
