//! Engine Driver (§4.6): validates a template once, then drives the field
//! expander and row combinator across the dataset under a global budget.
//!
//! Scheduling is single-threaded cooperative (§5): rows are consumed
//! sequentially, the RNG is derived rather than shared, and the only
//! suspension point is inside a caller-supplied [`Paraphraser`].

use crate::augmenters::Paraphraser;
use crate::combinator::{self, CombinatorInput};
use crate::error::{Error, Result};
use crate::field_expander::{self, ExpandCtx};
use crate::models::{FieldVariation, GeneratedVariation, Row, VariationConfig};
use crate::template;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Validates `template`, then generates variations for every row in `data`
/// up to `config.max_variations`. A configured augmenter failing at runtime
/// and missing fields are logged (`tracing`) and otherwise tolerated;
/// template invalidity, an exhausted few-shot pool, and an `llm`-backed
/// augmenter invoked with no configured [`Paraphraser`] are fatal.
pub fn generate(
    template_doc: &serde_json::Value,
    data: &[Row],
    config: &VariationConfig,
    paraphraser: Option<&dyn Paraphraser>,
) -> Result<Vec<GeneratedVariation>> {
    let (template, problems) = template::build(template_doc);
    if !problems.is_empty() {
        return Err(Error::TemplateInvalid(problems));
    }
    let template = Arc::new(template);

    let row_limit = config.max_rows.unwrap_or(data.len()).min(data.len());
    let rows = &data[..row_limit];

    info!(rows = rows.len(), max_variations = config.max_variations, "generation started");

    let mut out = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        if out.len() >= config.max_variations {
            warn!(row_index, "budget reached, stopping early");
            break;
        }
        debug!(row_index, "row started");

        let expand_ctx = ExpandCtx {
            row,
            row_index,
            global_seed: config.random_seed,
            variations_per_field: config.variations_per_field,
            gold: template.gold.as_ref(),
            paraphraser,
        };

        let instruction_variants = expand_pseudo_field(
            template.instruction.as_deref(),
            &template.instruction_variations,
            "instruction",
            &expand_ctx,
        )?;
        let prompt_format_variants = expand_pseudo_field(
            template.prompt_format.as_deref(),
            &template.prompt_format_variations,
            "prompt_format",
            &expand_ctx,
        )?;

        let mut field_variants: IndexMap<String, Vec<FieldVariation>> = IndexMap::new();
        for (field, augmenters) in &template.field_augmenters {
            let (variants, diagnostics) = field_expander::expand_field(field, augmenters, &expand_ctx)?;
            for diagnostic in diagnostics {
                warn!(row_index, %diagnostic, "field expansion diagnostic");
            }
            field_variants.insert(field.clone(), variants);
        }

        let combinator_input = CombinatorInput {
            row,
            row_index,
            template: &template,
            template_arc: template.clone(),
            instruction_variants: &instruction_variants,
            prompt_format_variants: &prompt_format_variants,
            field_variants: &field_variants,
            data: rows,
            root_seed: config.random_seed,
            remaining_budget: config.max_variations - out.len(),
        };
        let (variations, truncated) = combinator::combine(&combinator_input)?;

        debug!(row_index, emitted = variations.len(), "row emitted variations");
        out.extend(variations);

        if truncated {
            warn!(row_index, "budget reached, stopping early");
            break;
        }
    }

    out.truncate(config.max_variations);
    info!(emitted = out.len(), "generation finished");
    Ok(out)
}

/// Expands `instruction`/`prompt_format`: absent in the template, a single
/// `None` (no system message / empty main question); present, the
/// augmented text variants.
fn expand_pseudo_field(
    text: Option<&str>,
    augmenters: &[String],
    pseudo_name: &str,
    ctx: &ExpandCtx,
) -> Result<Vec<Option<String>>> {
    let Some(text) = text else { return Ok(vec![None]) };
    let (variants, diagnostics) = field_expander::expand_text_field(pseudo_name, text, augmenters, ctx)?;
    for diagnostic in diagnostics {
        warn!(pseudo_name, %diagnostic, "pseudo-field expansion diagnostic");
    }
    Ok(variants.into_iter().map(|v| Some(v.data)).collect())
}
