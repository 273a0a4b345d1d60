//! A deterministic prompt-variation generation engine: given a template
//! document and a tabular dataset, produces a reproducible set of rendered
//! prompt variations by combining per-field surface/semantic/structural
//! augmentations, optional few-shot example selection, and gold-answer
//! tracking.
//!
//! The entry point is [`generate`]; everything else is exposed so callers
//! can validate templates ahead of time, implement a [`Paraphraser`], or
//! inspect the data model directly.

mod accessor;
mod augmenters;
mod combinator;
mod engine;
mod error;
mod field_expander;
mod few_shot;
mod models;
mod seed;
mod template;

pub use augmenters::{PARAPHRASE_PROMPT_TEMPLATE, ParaphraseCtx, ParaphraseError, Paraphraser};
pub use engine::generate;
pub use error::{Diagnostic, Error, Result, TemplateProblem};
pub use models::{
    EnumerateConfig, EnumerateType, FewShotConfig, FewShotFormat, FieldVariation, GeneratedVariation,
    GoldConfig, GoldKind, GoldUpdate, Message, Role, Row, SplitFilter, Template, VariationConfig,
};
pub use template::{parse, validate};
