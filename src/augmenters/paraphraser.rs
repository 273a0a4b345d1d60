//! The `Paraphraser` capability boundary. The engine never makes a network
//! call itself; it hands the caller-supplied implementation a prompt built
//! from [`PARAPHRASE_PROMPT_TEMPLATE`] and trusts it to honor the
//! placeholder-preservation instruction embedded there.

use super::{AugCtx, AugResult, AugmenterError};
use crate::models::FieldVariation;

/// Must be reproduced verbatim to stay compatible with existing evaluation
/// baselines built against this prompt.
pub const PARAPHRASE_PROMPT_TEMPLATE: &str = "Help me write creative variations of an instruction prompt to an LLM for the following task description. \n\nIMPORTANT: The instruction may contain placeholders in curly braces like {subject}, {topic}, {field}, etc. These placeholders MUST be preserved EXACTLY as they appear in ALL variations.\n\nProvide {n_augments} creative versions while:\n1. Preserving the original meaning and intent\n2. Keeping ALL placeholders {} unchanged in their exact positions\n3. Varying the instructional language around the placeholders\n4. NEVER introduce new placeholders - if the original has no placeholders, the variations must have none\n\nOutput only a Python list of strings with the alternatives. Do not include any explanation or additional text.\n\nOriginal instruction: '''{prompt}'''";

/// Context passed to [`Paraphraser::paraphrase`] alongside the built prompt.
pub struct ParaphraseCtx<'a> {
    pub field_name: &'a str,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("paraphraser failed: {0}")]
pub struct ParaphraseError(pub String);

/// External capability the core delegates LLM calls to. The transport
/// (HTTP client, API key handling) lives entirely on the implementor's side.
pub trait Paraphraser: Send + Sync {
    fn paraphrase(
        &self,
        instruction: &str,
        n: usize,
        ctx: ParaphraseCtx,
    ) -> Result<Vec<String>, ParaphraseError>;
}

fn build_prompt(value: &str, n_augments: usize) -> String {
    PARAPHRASE_PROMPT_TEMPLATE
        .replace("{n_augments}", &n_augments.to_string())
        .replace("{prompt}", value)
}

pub fn augment(value: &str, ctx: &AugCtx, paraphraser: Option<&dyn Paraphraser>) -> AugResult {
    let paraphraser = paraphraser.ok_or_else(|| {
        AugmenterError::paraphraser_unavailable("paraphrase_with_llm requires a configured paraphraser capability")
    })?;

    let prompt = build_prompt(value, ctx.n_augments);
    let variants = paraphraser
        .paraphrase(
            &prompt,
            ctx.n_augments,
            ParaphraseCtx {
                field_name: ctx.field_name,
                seed: ctx.seed,
            },
        )
        .map_err(|e| AugmenterError::new(e.0))?;

    Ok(variants
        .into_iter()
        .take(ctx.n_augments)
        .map(FieldVariation::plain)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Row;

    struct FailingParaphraser;
    impl Paraphraser for FailingParaphraser {
        fn paraphrase(
            &self,
            _instruction: &str,
            _n: usize,
            _ctx: ParaphraseCtx,
        ) -> Result<Vec<String>, ParaphraseError> {
            Err(ParaphraseError("timed out".into()))
        }
    }

    struct EchoParaphraser;
    impl Paraphraser for EchoParaphraser {
        fn paraphrase(
            &self,
            instruction: &str,
            n: usize,
            _ctx: ParaphraseCtx,
        ) -> Result<Vec<String>, ParaphraseError> {
            Ok((0..n).map(|i| format!("{instruction}#{i}")).collect())
        }
    }

    fn ctx(row: &Row) -> AugCtx<'_> {
        AugCtx {
            n_augments: 2,
            seed: 42,
            field_name: "instruction",
            row,
            gold: None,
        }
    }

    #[test]
    fn missing_paraphraser_is_a_fatal_augmenter_error() {
        let row = Row::new();
        let err = augment("Answer: {q}", &ctx(&row), None).unwrap_err();
        assert!(err.fatal);
    }

    #[test]
    fn failing_paraphraser_surfaces_as_a_non_fatal_augmenter_error() {
        let row = Row::new();
        let err = augment("Answer: {q}", &ctx(&row), Some(&FailingParaphraser)).unwrap_err();
        assert!(!err.fatal);
    }

    #[test]
    fn successful_call_is_truncated_to_n_augments() {
        let row = Row::new();
        let result = augment("Answer: {q}", &ctx(&row), Some(&EchoParaphraser)).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn prompt_template_preserves_placeholder_braces_literally() {
        assert!(PARAPHRASE_PROMPT_TEMPLATE.contains("{subject}"));
        assert!(PARAPHRASE_PROMPT_TEMPLATE.contains("Original instruction: '''{prompt}'''"));
    }
}
