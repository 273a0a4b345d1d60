//! The closed augmenter registry: canonical names, alias resolution, the
//! shared invocation context, and dispatch to each augmenter's implementation.

mod context;
mod enumerate;
mod paraphraser;
mod rewording;
mod shuffle;

pub use enumerate::{render_list, render_marker};
pub use paraphraser::{PARAPHRASE_PROMPT_TEMPLATE, ParaphraseCtx, ParaphraseError, Paraphraser};

use crate::models::{FieldVariation, GoldConfig, Row};

/// Canonical augmenter names, in registry order.
pub const CANONICAL_NAMES: &[&str] = &[
    "rewording",
    "paraphrase_with_llm",
    "context",
    "shuffle",
    "enumerate",
];

/// `(alias, canonical)` pairs. Resolved once at template-validation time so
/// the rest of the pipeline only ever sees the canonical spelling.
const ALIASES: &[(&str, &str)] = &[("surface", "rewording"), ("paraphrase", "paraphrase_with_llm")];

/// Resolves an alias or canonical spelling to the canonical name, or `None`
/// if `name` is not in the closed set.
pub fn canonicalize(name: &str) -> Option<&'static str> {
    CANONICAL_NAMES
        .iter()
        .find(|&&canonical| canonical == name)
        .copied()
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|(_, canonical)| *canonical)
        })
}

/// What an augmenter needs to do its work: the requested budget, a
/// deterministic per-call seed, and the ambient data it may need to read
/// (but never mutate) from the current row.
pub struct AugCtx<'a> {
    pub n_augments: usize,
    pub seed: u64,
    pub field_name: &'a str,
    pub row: &'a Row,
    pub gold: Option<&'a GoldConfig>,
}

/// A single augmenter invocation failed. Ordinarily the field expander keeps
/// the original value and surfaces this as a [`crate::error::Diagnostic`];
/// `fatal` marks the one case (§7) that is not recoverable — a capability
/// the augmenter requires (the `Paraphraser`) was never configured, rather
/// than a configured call failing at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmenterError {
    pub reason: String,
    pub fatal: bool,
}

impl AugmenterError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            fatal: false,
        }
    }

    /// The augmenter needs a `Paraphraser` and none was configured.
    pub fn paraphraser_unavailable(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            fatal: true,
        }
    }
}

pub type AugResult = Result<Vec<FieldVariation>, AugmenterError>;

/// Dispatches to the augmenter named `canonical_name` (must already be
/// canonicalized — see [`canonicalize`]).
pub fn augment(
    canonical_name: &str,
    value: &str,
    ctx: &AugCtx,
    paraphraser: Option<&dyn Paraphraser>,
) -> AugResult {
    match canonical_name {
        "rewording" => Ok(rewording::augment(value, ctx)),
        "paraphrase_with_llm" => paraphraser::augment(value, ctx, paraphraser),
        "context" => context::augment(value, ctx, paraphraser),
        "shuffle" => shuffle::augment(value, ctx),
        "enumerate" => enumerate::augment_as_field_variation(value),
        other => Err(AugmenterError::new(format!("unknown augmenter {other:?}"))),
    }
}
