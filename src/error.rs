//! Typed error taxonomy for the variation engine.
//!
//! Fatal conditions are variants of [`Error`]; recoverable, per-augmenter
//! failures are logged (see [`crate::engine`]) rather than propagated, per
//! the recovery policy the engine documents at its public entry point.

/// One problem found while validating a template, collected so a caller
/// sees every issue at once instead of stopping at the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateProblem {
    #[error("template has neither `instruction` nor `prompt_format`")]
    Empty,
    #[error("unbalanced placeholder braces in {location}: {text:?}")]
    PlaceholderUnbalanced { location: String, text: String },
    #[error("unknown augmenter {name:?} referenced by {field:?}")]
    UnknownAugmenter { field: String, name: String },
    #[error("`gold` is required because {reason}")]
    MissingGold { reason: String },
    #[error("gold struct form requires `options_field` when `type` is `index`")]
    GoldIndexMissingOptionsField,
    #[error("`few_shot.count` must be >= 1, got {0}")]
    FewShotCountZero(usize),
    #[error("`few_shot.format` {0:?} is not one of the recognized formats")]
    FewShotFormatInvalid(String),
    #[error("`few_shot.split` {0:?} is not one of \"all\", \"train\", \"test\"")]
    FewShotSplitInvalid(String),
    #[error("`enumerate.type` {0:?} is not one of \"1234\", \"ABCD\", \"abcd\", \"roman\"")]
    EnumerateTypeInvalid(String),
    #[error(
        "field {field:?} lists `shuffle` but has no `gold` of kind `index` with options_field == {field:?}"
    )]
    ShuffleRequiresIndexGold { field: String },
    #[error("gold accessor {0:?} could not be parsed")]
    GoldAccessorUnparseable(String),
}

/// Fatal errors surfaced by the public API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("template is invalid: {0:?}")]
    TemplateInvalid(Vec<TemplateProblem>),

    #[error("insufficient few-shot data: requested {requested}, pool has {available} (split {split:?})")]
    InsufficientFewShotData {
        requested: usize,
        available: usize,
        split: String,
    },

    #[error("gold accessor {accessor:?} failed on row {row_index}: {reason}")]
    GoldExtractionFailed {
        accessor: String,
        row_index: usize,
        reason: String,
    },

    #[error("augmenter {name:?} requires a paraphraser capability, none was configured")]
    ParaphraserUnavailable { name: String },

    #[error("shuffle on field {field:?} requires an index gold with matching options_field")]
    ShuffleRequiresIndexGold { field: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal conditions: the engine keeps going, but a caller inspecting
/// the diagnostics list (or the logs — see [`crate::engine`]) learns about
/// them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("field {field:?} referenced by the template is absent from row {row_index}")]
    MissingField { field: String, row_index: usize },

    #[error("augmenter {name:?} failed on field {field:?}: {reason}")]
    AugmenterFailed {
        name: String,
        field: String,
        reason: String,
    },
}
