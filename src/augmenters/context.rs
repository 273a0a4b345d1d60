//! Prepends a short contextual preamble ahead of a field's text, using the
//! same `Paraphraser` capability the `paraphrase_with_llm` augmenter calls.

use super::{AugCtx, AugResult, AugmenterError};
use super::paraphraser::{ParaphraseCtx, Paraphraser};
use crate::models::FieldVariation;

const CONTEXT_PROMPT_TEMPLATE: &str =
    "Write one short, neutral sentence of background context that could precede the following text. \
Do not restate or answer it. Output only the sentence, no quotes, no explanation.\n\nText: '''{text}'''";

pub fn augment(value: &str, ctx: &AugCtx, paraphraser: Option<&dyn Paraphraser>) -> AugResult {
    let paraphraser = paraphraser
        .ok_or_else(|| AugmenterError::paraphraser_unavailable("context requires a configured paraphraser capability"))?;

    let prompt = CONTEXT_PROMPT_TEMPLATE.replace("{text}", value);
    let preambles = paraphraser
        .paraphrase(
            &prompt,
            1,
            ParaphraseCtx {
                field_name: ctx.field_name,
                seed: ctx.seed,
            },
        )
        .map_err(|e| AugmenterError::new(e.0))?;

    let mut variants = vec![FieldVariation::plain(value)];
    if let Some(preamble) = preambles.into_iter().next() {
        variants.push(FieldVariation::plain(format!("{preamble}\n\n{value}")));
    }
    Ok(variants.into_iter().take(ctx.n_augments.max(1)).collect())
}
