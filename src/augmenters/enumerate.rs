//! `enumerate`: renders a list field with a marker style. Used two ways —
//! as the template's single top-level `enumerate` directive (one configured
//! style, see [`render_list`]), and as a per-field augmenter list entry,
//! where it is decided to emit one variant per marker style (see
//! [`augment_as_field_variation`]).

use super::{AugResult, AugmenterError};
use crate::models::{EnumerateType, FieldVariation};

/// Roman numerals `I` through `XL`. The shipped table is hard-capped at 40
/// entries; enumerating more options than that fails explicitly rather than
/// silently truncating or extending the table.
const ROMAN_NUMERALS: [&str; 40] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV", "XV",
    "XVI", "XVII", "XVIII", "XIX", "XX", "XXI", "XXII", "XXIII", "XXIV", "XXV", "XXVI", "XXVII",
    "XXVIII", "XXIX", "XXX", "XXXI", "XXXII", "XXXIII", "XXXIV", "XXXV", "XXXVI", "XXXVII",
    "XXXVIII", "XXXIX", "XL",
];

const ALL_MARKER_STYLES: [EnumerateType; 4] = [
    EnumerateType::Numeric,
    EnumerateType::UpperAlpha,
    EnumerateType::LowerAlpha,
    EnumerateType::Roman,
];

/// Renders the marker for the `index`-th (0-based) option, or `None` if
/// `index` is past what the style can represent.
pub fn render_marker(kind: EnumerateType, index: usize) -> Option<String> {
    match kind {
        EnumerateType::Numeric => Some(format!("{}. ", index + 1)),
        EnumerateType::UpperAlpha => alpha_marker(index, false),
        EnumerateType::LowerAlpha => alpha_marker(index, true),
        EnumerateType::Roman => ROMAN_NUMERALS.get(index).map(|r| format!("{r}. ")),
    }
}

fn alpha_marker(index: usize, lower: bool) -> Option<String> {
    if index >= 26 {
        return None;
    }
    let c = (b'A' + index as u8) as char;
    let c = if lower { c.to_ascii_lowercase() } else { c };
    Some(format!("{c}. "))
}

/// Renders a full list with the given marker style, comma-joined.
pub fn render_list(items: &[&str], kind: EnumerateType) -> Result<String, String> {
    let mut parts = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let marker = render_marker(kind, i)
            .ok_or_else(|| format!("enumerate type {kind:?} has no marker for index {i}"))?;
        parts.push(format!("{marker}{item}"));
    }
    Ok(parts.join(", "))
}

/// Per-field-variation form: one variant per marker style. If any style in
/// the closed set cannot represent the list (e.g. more than 40 Roman
/// options), the whole invocation fails and the field expander keeps the
/// original value.
pub fn augment_as_field_variation(value: &str) -> AugResult {
    let items: Vec<&str> = value.split(", ").collect();
    let mut variants = Vec::with_capacity(ALL_MARKER_STYLES.len());
    for kind in ALL_MARKER_STYLES {
        let rendered = render_list(&items, kind).map_err(AugmenterError::new)?;
        variants.push(FieldVariation::plain(rendered));
    }
    Ok(variants)
}
