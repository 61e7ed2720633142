//! Template variable extraction and rendering.
//!
//! Prompt content may contain `{{ name }}` references. The grammar is
//! deliberately forgiving: anything that is not a well-formed reference
//! (unterminated `{{`, empty or whitespace-only names, stray braces) is
//! literal text, never a parse error. Rendering a reference whose name has
//! no supplied value re-emits the reference itself, so a caller that forgets
//! a variable never loses the placeholder.

use std::collections::BTreeMap;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_until, take_while1};
use nom::combinator::{map, rest, verify};
use nom::multi::many0;
use nom::sequence::delimited;
use nom::{IResult, Parser};

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    /// Verbatim text, passed through untouched
    Literal(String),
    /// A `{{ name }}` reference; the name is whitespace-trimmed
    Variable(String),
}

/// Parse content into literal and variable parts.
///
/// The grammar is total: every input parses, with malformed brace
/// sequences degrading to literal text.
pub fn parse_template(content: &str) -> Vec<TemplatePart> {
    match many0(parse_part).parse(content) {
        Ok((_, parts)) => parts,
        Err(_) => vec![TemplatePart::Literal(content.to_string())],
    }
}

fn parse_part(input: &str) -> IResult<&str, TemplatePart> {
    alt((variable, unmatched_open, literal_run)).parse(input)
}

/// `{{` + optional whitespace + one or more non-brace chars + `}}`,
/// with a non-empty name after trimming
fn variable(input: &str) -> IResult<&str, TemplatePart> {
    map(
        verify(
            delimited(tag("{{"), take_while1(|c| c != '{' && c != '}'), tag("}}")),
            |inner: &str| !inner.trim().is_empty(),
        ),
        |inner: &str| TemplatePart::Variable(inner.trim().to_string()),
    )
    .parse(input)
}

/// A `{{` that did not open a valid reference; consumed as literal so the
/// scan can continue past it
fn unmatched_open(input: &str) -> IResult<&str, TemplatePart> {
    map(tag("{{"), |open: &str| TemplatePart::Literal(open.to_string())).parse(input)
}

/// Text up to the next `{{`, or everything that remains
fn literal_run(input: &str) -> IResult<&str, TemplatePart> {
    map(
        verify(alt((take_until("{{"), rest)), |text: &str| !text.is_empty()),
        |text: &str| TemplatePart::Literal(text.to_string()),
    )
    .parse(input)
}

/// Unique variable names in first-appearance order.
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for part in parse_template(content) {
        if let TemplatePart::Variable(name) = part {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Replace every reference with its value from `values`.
///
/// References without a value render as `{{name}}` (braces kept, whitespace
/// normalized) rather than being erased. Pure function over its inputs.
pub fn render_template(content: &str, values: &BTreeMap<String, String>) -> String {
    let mut rendered = String::with_capacity(content.len());
    for part in parse_template(content) {
        match part {
            TemplatePart::Literal(text) => rendered.push_str(&text),
            TemplatePart::Variable(name) => match values.get(&name) {
                Some(value) => rendered.push_str(value),
                None => {
                    rendered.push_str("{{");
                    rendered.push_str(&name);
                    rendered.push_str("}}");
                },
            },
        }
    }
    rendered
}
