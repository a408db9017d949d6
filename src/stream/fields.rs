// src/stream/fields.rs

//! Positional field tokens in command argument templates.
//!
//! An argument such as `ip:#{3},mac:#{5}` is parsed once into literal and
//! field segments. At dispatch time the matched line is split by the stream
//! delimiter and each field segment is replaced:
//!
//! - `#{0}` is the whole, unsplit line;
//! - `#{k}` (`k >= 1`) is the `k`-th field, 1-based, if the split produced at
//!   least `k` fields. Otherwise the token text is left in place.

use std::collections::BTreeSet;
use std::fmt;

use crate::errors::{Result, StreammonError};

pub const TOKEN_OPEN: &str = "#{";
pub const TOKEN_CLOSE: &str = "}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { index: usize, raw: String },
}

/// A single parsed argument template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldTemplate {
    /// Parse an argument string, failing on tokens whose content is not a
    /// non-empty run of ASCII digits. An unterminated `#{` is kept as text.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = raw.as_str();

        while let Some(open) = rest.find(TOKEN_OPEN) {
            let after_open = &rest[open + TOKEN_OPEN.len()..];
            let Some(close) = after_open.find(TOKEN_CLOSE) else {
                break;
            };

            let token = &after_open[..close];
            let index = parse_index(token).ok_or_else(|| StreammonError::InvalidFieldToken {
                template: raw.clone(),
                token: token.to_string(),
            })?;

            literal.push_str(&rest[..open]);
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field {
                index,
                raw: format!("{TOKEN_OPEN}{token}{TOKEN_CLOSE}"),
            });

            rest = &after_open[close + TOKEN_CLOSE.len()..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { raw, segments })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Field indices referenced by this template, in order of appearance.
    pub fn field_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field { index, .. } => Some(*index),
            Segment::Literal(_) => None,
        })
    }

    pub fn has_fields(&self) -> bool {
        self.field_indices().next().is_some()
    }

    /// Render the template against a matched line and its split fields.
    pub fn render(&self, line: &str, fields: &[&str]) -> String {
        if !self.has_fields() {
            return self.raw.clone();
        }

        let mut out = String::with_capacity(self.raw.len() + line.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { index: 0, .. } => out.push_str(line),
                Segment::Field { index, raw } => match fields.get(index - 1) {
                    Some(field) => out.push_str(field),
                    None => out.push_str(raw),
                },
            }
        }
        out
    }
}

impl fmt::Display for FieldTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parse every template, in order.
pub fn parse_templates<I, S>(args: I) -> Result<Vec<FieldTemplate>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    args.into_iter().map(FieldTemplate::parse).collect()
}

/// The set of field indices referenced anywhere in `args`.
pub fn parse_field_indices<I, S>(args: I) -> Result<BTreeSet<usize>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let templates = parse_templates(args)?;
    Ok(collect_indices(&templates))
}

pub(crate) fn collect_indices(templates: &[FieldTemplate]) -> BTreeSet<usize> {
    templates.iter().flat_map(|t| t.field_indices()).collect()
}

/// Split a matched line into its 1-based fields.
///
/// An empty delimiter splits the line into individual characters.
pub fn split_fields<'a>(line: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        return line
            .char_indices()
            .map(|(i, c)| &line[i..i + c.len_utf8()])
            .collect();
    }
    line.split(delimiter).collect()
}

/// Render all templates for a single line.
pub fn substitute(templates: &[FieldTemplate], line: &str, delimiter: &str) -> Vec<String> {
    let fields = split_fields(line, delimiter);
    templates.iter().map(|t| t.render(line, &fields)).collect()
}
