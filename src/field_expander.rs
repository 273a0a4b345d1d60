//! Field Expander (§4.3): for one row, builds each field's list of
//! [`FieldVariation`]s by running its augmenter list, deduplicating by
//! `(data, gold_update)`, and truncating to the per-field budget.

use crate::accessor::{self};
use crate::augmenters::{self, AugCtx, Paraphraser};
use crate::error::{Diagnostic, Error, Result};
use crate::models::{GoldConfig, GoldKind, GoldUpdate, Row};
use crate::seed;

/// Ambient data every field expansion in one row shares.
pub struct ExpandCtx<'a> {
    pub row: &'a Row,
    pub row_index: usize,
    pub global_seed: u64,
    pub variations_per_field: usize,
    pub gold: Option<&'a GoldConfig>,
    pub paraphraser: Option<&'a dyn Paraphraser>,
}

/// Expands a data column. Missing columns are a [`Diagnostic::MissingField`]
/// and an empty-string singleton, not a hard failure. A `paraphrase_with_llm`
/// or `context` augmenter invoked with no configured `Paraphraser` is fatal
/// (`Error::ParaphraserUnavailable`), not a diagnostic.
pub fn expand_field(
    field_name: &str,
    augmenter_names: &[String],
    ctx: &ExpandCtx,
) -> Result<(Vec<crate::models::FieldVariation>, Vec<Diagnostic>)> {
    let mut diagnostics = Vec::new();
    let original = match ctx.row.get(field_name) {
        Some(value) => accessor::render(value),
        None => {
            diagnostics.push(Diagnostic::MissingField {
                field: field_name.to_string(),
                row_index: ctx.row_index,
            });
            String::new()
        }
    };
    let initial_gold_update = initial_gold_update(field_name, ctx.gold, ctx.row);
    let (variants, mut aug_diagnostics) =
        expand(field_name, &original, initial_gold_update, augmenter_names, ctx)?;
    diagnostics.append(&mut aug_diagnostics);
    Ok((variants, diagnostics))
}

/// Expands a template-level pseudo-field (`instruction` or `prompt_format`):
/// the "original value" is the template text itself, not a row lookup, and
/// it is never the gold field.
pub fn expand_text_field(
    pseudo_name: &str,
    text: &str,
    augmenter_names: &[String],
    ctx: &ExpandCtx,
) -> Result<(Vec<crate::models::FieldVariation>, Vec<Diagnostic>)> {
    expand(pseudo_name, text, None, augmenter_names, ctx)
}

fn expand(
    field_name: &str,
    original: &str,
    initial_gold_update: Option<GoldUpdate>,
    augmenter_names: &[String],
    ctx: &ExpandCtx,
) -> Result<(Vec<crate::models::FieldVariation>, Vec<Diagnostic>)> {
    let mut diagnostics = Vec::new();
    let original_variant = crate::models::FieldVariation {
        data: original.to_string(),
        gold_update: initial_gold_update,
    };

    if augmenter_names.is_empty() {
        return Ok((vec![original_variant], diagnostics));
    }

    let mut pool = vec![original_variant];
    for (ordinal, name) in augmenter_names.iter().enumerate() {
        let seed = seed::augmenter_seed(ctx.global_seed, ctx.row_index, field_name, name, ordinal);
        let aug_ctx = AugCtx {
            n_augments: ctx.variations_per_field,
            seed,
            field_name,
            row: ctx.row,
            gold: ctx.gold,
        };
        match augmenters::augment(name, original, &aug_ctx, ctx.paraphraser) {
            Ok(mut variants) => pool.append(&mut variants),
            Err(e) if e.fatal => return Err(Error::ParaphraserUnavailable { name: name.clone() }),
            Err(e) => diagnostics.push(Diagnostic::AugmenterFailed {
                name: name.clone(),
                field: field_name.to_string(),
                reason: e.reason,
            }),
        }
    }

    let mut deduped: Vec<crate::models::FieldVariation> = Vec::new();
    for v in pool {
        if !deduped
            .iter()
            .any(|existing| existing.data == v.data && existing.gold_update == v.gold_update)
        {
            deduped.push(v);
        }
    }
    deduped.truncate(ctx.variations_per_field.max(1));
    Ok((deduped, diagnostics))
}

fn initial_gold_update(field_name: &str, gold: Option<&GoldConfig>, row: &Row) -> Option<GoldUpdate> {
    let gold = gold?;
    let is_gold_carrier = match gold.kind {
        GoldKind::Index => gold.options_field.as_deref() == Some(field_name),
        GoldKind::Value => gold.field == field_name,
    };
    if !is_gold_carrier {
        return None;
    }
    let value = row.get(&gold.field)?;
    let mut update = GoldUpdate::new();
    update.insert(gold.field.clone(), accessor::render(value));
    Some(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(row: &Row) -> ExpandCtx<'_> {
        ExpandCtx {
            row,
            row_index: 0,
            global_seed: 42,
            variations_per_field: 3,
            gold: None,
            paraphraser: None,
        }
    }

    #[test]
    fn field_without_augmenters_is_a_singleton() {
        let mut row = Row::new();
        row.insert("q".into(), json!("2+2?"));
        let (variants, diags) = expand_field("q", &[], &ctx(&row)).unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].data, "2+2?");
        assert!(diags.is_empty());
    }

    #[test]
    fn missing_field_yields_empty_singleton_and_diagnostic() {
        let row = Row::new();
        let (variants, diags) = expand_field("q", &[], &ctx(&row)).unwrap();
        assert_eq!(variants, vec![crate::models::FieldVariation::plain("")]);
        assert_eq!(diags.len(), 1);
        assert!(matches!(diags[0], Diagnostic::MissingField { .. }));
    }

    #[test]
    fn truncates_to_variations_per_field() {
        let mut row = Row::new();
        row.insert("q".into(), json!("What is the capital of France?"));
        let mut c = ctx(&row);
        c.variations_per_field = 2;
        let (variants, _) = expand_field("q", &["rewording".to_string()], &c).unwrap();
        assert!(variants.len() <= 2);
    }

    #[test]
    fn paraphrase_with_llm_without_a_paraphraser_is_fatal() {
        let mut row = Row::new();
        row.insert("q".into(), json!("2+2?"));
        let err = expand_field("q", &["paraphrase_with_llm".to_string()], &ctx(&row)).unwrap_err();
        assert!(matches!(err, Error::ParaphraserUnavailable { .. }));
    }
}
