//! A tiny, explicit accessor mini-parser for gold extraction paths.
//!
//! Supports exactly the compositions `foo`, `foo.bar`, `foo['bar']`, and
//! `foo[n]`. General expression evaluation is deliberately not supported:
//! the gold accessor only ever walks a JSON-equivalent [`crate::models::Row`]
//! value, it never executes arbitrary code.

use crate::error::{Error, Result};
use crate::models::{EnumerateConfig, GoldConfig, GoldKind, Row};
use indexmap::IndexMap;

/// One step in an accessor path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// A parsed accessor path, e.g. `answers['text'][0]` -> `[Key("answers"), Key("text"), Index(0)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    segments: Vec<Segment>,
}

impl Accessor {
    /// Parses an accessor expression. Returns `None` on malformed input
    /// (unbalanced brackets, empty segments, non-numeric bracket index).
    pub fn parse(expr: &str) -> Option<Self> {
        let mut segments = Vec::new();
        let mut chars = expr.char_indices().peekable();
        let mut current = String::new();

        let flush = |current: &mut String, segments: &mut Vec<Segment>| -> Option<()> {
            if current.is_empty() {
                return None;
            }
            segments.push(Segment::Key(std::mem::take(current)));
            Some(())
        };

        while let Some((_, c)) = chars.next() {
            match c {
                '.' => {
                    flush(&mut current, &mut segments)?;
                }
                '[' => {
                    if !current.is_empty() {
                        flush(&mut current, &mut segments)?;
                    }
                    let mut inner = String::new();
                    loop {
                        match chars.next() {
                            Some((_, ']')) => break,
                            Some((_, c)) => inner.push(c),
                            None => return None,
                        }
                    }
                    let inner = inner.trim();
                    if let Some(quoted) = strip_quotes(inner) {
                        segments.push(Segment::Key(quoted.to_string()));
                    } else {
                        segments.push(Segment::Index(inner.parse().ok()?));
                    }
                }
                _ => current.push(c),
            }
        }
        if !current.is_empty() {
            flush(&mut current, &mut segments)?;
        }
        if segments.is_empty() {
            return None;
        }
        Some(Self { segments })
    }

    /// Walks the path against a row, returning the resolved JSON value.
    pub fn resolve<'a>(&self, row: &'a Row) -> Option<&'a serde_json::Value> {
        let Segment::Key(root) = &self.segments[0] else {
            return None;
        };
        let mut value = row.get(root)?;
        for segment in &self.segments[1..] {
            value = match segment {
                Segment::Key(k) => value.get(k)?,
                Segment::Index(i) => value.get(i)?,
            };
        }
        Some(value)
    }
}

fn strip_quotes(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[0] == bytes[bytes.len() - 1]
    {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}

/// Renders a JSON-equivalent field value to the text form used in prompts:
/// strings pass through, lists join with `", "`, everything else uses its
/// plain display form.
pub fn render(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(render)
            .collect::<Vec<_>>()
            .join(", "),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Resolves `field` against `row`: a plain column name is a direct lookup,
/// anything containing `.` or `[` goes through the [`Accessor`] mini-parser.
fn resolve_field<'a>(row: &'a Row, field: &str) -> Option<&'a serde_json::Value> {
    if field.contains('.') || field.contains('[') {
        Accessor::parse(field)?.resolve(row)
    } else {
        row.get(field)
    }
}

/// Extracts the gold text for `row`, per [`GoldConfig::kind`]: a `Value` gold
/// renders the named field directly; an `Index` gold reads a numeric index
/// and looks it up in `options_field`'s list, applying the marker style from
/// `enumerate` when it targets that same field.
pub fn extract_gold(
    row: &Row,
    row_index: usize,
    gold: &GoldConfig,
    enumerate: Option<&EnumerateConfig>,
) -> Result<String> {
    let fail = |reason: &str| Error::GoldExtractionFailed {
        accessor: gold.field.clone(),
        row_index,
        reason: reason.to_string(),
    };

    let raw = resolve_field(row, &gold.field).ok_or_else(|| fail("field not found in row"))?;
    match gold.kind {
        GoldKind::Value => Ok(render(raw)),
        GoldKind::Index => {
            let index = raw
                .as_u64()
                .or_else(|| raw.as_str().and_then(|s| s.parse().ok()))
                .ok_or_else(|| fail("index gold value is not numeric"))? as usize;
            let options_field = gold
                .options_field
                .as_ref()
                .ok_or_else(|| fail("index gold has no options_field"))?;
            let options_value = row
                .get(options_field)
                .ok_or_else(|| fail("options_field not found in row"))?;
            let items: Vec<String> = match options_value {
                serde_json::Value::Array(items) => items.iter().map(render).collect(),
                other => render(other).split(", ").map(str::to_string).collect(),
            };
            let item = items
                .get(index)
                .ok_or_else(|| fail("gold index out of bounds for options list"))?;
            match enumerate.filter(|e| &e.field == options_field) {
                Some(enumerate) => {
                    let marker = crate::augmenters::render_marker(enumerate.kind, index)
                        .ok_or_else(|| fail("gold index has no marker in the enumerate style"))?;
                    Ok(format!("{marker}{item}"))
                }
                None => Ok(item.clone()),
            }
        }
    }
}

/// Fills `{field}` placeholders in `text` from `values`; the placeholder
/// naming `gold_field` (if any) is stripped rather than filled — the main
/// question never leaks the answer. A placeholder with no entry in `values`
/// is also stripped (the field expander already recorded a diagnostic for it).
pub fn fill_placeholders(text: &str, values: &IndexMap<String, String>, gold_field: Option<&str>) -> String {
    let mut out = String::new();
    let mut depth = 0i32;
    let mut name = String::new();
    for c in text.chars() {
        match c {
            '{' => {
                depth += 1;
                name.clear();
            }
            '}' => {
                depth -= 1;
                if Some(name.as_str()) != gold_field
                    && let Some(value) = values.get(&name)
                {
                    out.push_str(value);
                }
            }
            _ if depth == 1 => name.push(c),
            _ => out.push(c),
        }
    }
    out
}
