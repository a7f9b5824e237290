//! Key name templates
//!
//! `key_name_format` is a plain format string with named placeholders:
//! `{account}-{repository}.pem`. The older `{{.account}}-{{.repository}}.pem`
//! spelling is accepted too. There is no way to write a literal brace.

use std::collections::HashMap;
use thiserror::Error;

/// Malformed or unrenderable template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed '{{' at offset {offset}")]
    Unclosed { offset: usize },

    #[error("unmatched '}}' at offset {offset}")]
    UnmatchedClose { offset: usize },

    #[error("empty placeholder at offset {offset}")]
    EmptyPlaceholder { offset: usize },

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed key name format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNameTemplate {
    segments: Vec<Segment>,
}

impl KeyNameTemplate {
    /// Parse a format string, checking brace syntax
    pub fn parse(format: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = format.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' => {
                    let doubled = matches!(chars.peek(), Some((_, '{')));
                    if doubled {
                        chars.next();
                    }

                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if doubled && closed {
                        closed = matches!(chars.next(), Some((_, '}')));
                    }

                    if !closed {
                        return Err(TemplateError::Unclosed { offset });
                    }

                    // {{ .account }} names the variable after the dot
                    let name = if doubled {
                        let trimmed = name.trim();
                        trimmed.strip_prefix('.').unwrap_or(trimmed).to_string()
                    } else {
                        name
                    };
                    if name.is_empty() {
                        return Err(TemplateError::EmptyPlaceholder { offset });
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(name));
                }
                '}' => return Err(TemplateError::UnmatchedClose { offset }),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Substitute every placeholder from `vars`
    pub fn render(&self, vars: &HashMap<&str, &str>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = vars
                        .get(name.as_str())
                        .ok_or_else(|| TemplateError::UnknownVariable(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
