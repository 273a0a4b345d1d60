//! The data model shared by every component: rows, the template document,
//! and the records the engine emits.

use indexmap::IndexMap;
use std::sync::Arc;
use strum::EnumString;

/// An ordered mapping from field name to field value. Values are JSON-equivalent:
/// scalars, lists, or nested structures, rendered to text by [`crate::accessor::render`].
pub type Row = IndexMap<String, serde_json::Value>;

/// A mapping from gold field name to its rewritten value, emitted by augmenters
/// that reorder options (only `shuffle` in the closed set).
pub type GoldUpdate = IndexMap<String, String>;

/// Whether `gold` names a literal value or a 0-based index into an options list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldKind {
    Value,
    Index,
}

/// The `gold` directive: where the expected answer lives and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldConfig {
    /// Plain column name, or an accessor expression (see [`crate::accessor`]).
    pub field: String,
    pub kind: GoldKind,
    /// Required when `kind == Index`: the field holding the candidate options.
    pub options_field: Option<String>,
}

/// Closed set of few-shot example selection policies, named exactly as they
/// appear in template documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum FewShotFormat {
    SharedOrderedFirstN,
    SharedOrderedRandomN,
    SharedUnorderedRandomN,
    RandomPerRow,
}

/// Which partition of the dataset a few-shot pool is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SplitFilter {
    All,
    Train,
    Test,
}

/// The `few_shot` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FewShotConfig {
    pub count: usize,
    pub format: FewShotFormat,
    pub split: SplitFilter,
}

/// Marker styles `enumerate` can render a list with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum EnumerateType {
    #[strum(serialize = "1234")]
    Numeric,
    #[strum(serialize = "ABCD")]
    UpperAlpha,
    #[strum(serialize = "abcd")]
    LowerAlpha,
    #[strum(serialize = "roman")]
    Roman,
}

/// The `enumerate` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerateConfig {
    pub field: String,
    pub kind: EnumerateType,
}

/// One augmented value of a single field, plus any gold rewrite it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldVariation {
    pub data: String,
    pub gold_update: Option<GoldUpdate>,
}

impl FieldVariation {
    pub fn plain(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            gold_update: None,
        }
    }
}

/// A fully validated, parsed template, ready to drive the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub instruction: Option<String>,
    pub instruction_variations: Vec<String>,
    pub prompt_format: Option<String>,
    pub prompt_format_variations: Vec<String>,
    /// Per-field augmenter lists, keyed by column name, in template insertion order.
    pub field_augmenters: IndexMap<String, Vec<String>>,
    pub gold: Option<GoldConfig>,
    pub few_shot: Option<FewShotConfig>,
    pub enumerate: Option<EnumerateConfig>,
}

/// One message in a rendered conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One fully rendered prompt plus the provenance needed to trace it back to
/// its source row and the variant choices that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedVariation {
    pub prompt: String,
    pub conversation: Vec<Message>,
    pub original_row_index: usize,
    /// 1-based ordinal of this variation within its row.
    pub variation_count: usize,
    pub template_config: Arc<Template>,
    pub field_values: IndexMap<String, String>,
    pub gold_updates: Option<GoldUpdate>,
}

/// Tuning knobs for one `generate` call.
#[derive(Debug, Clone)]
pub struct VariationConfig {
    pub variations_per_field: usize,
    pub max_variations: usize,
    pub random_seed: u64,
    pub max_rows: Option<usize>,
}

impl Default for VariationConfig {
    fn default() -> Self {
        Self {
            variations_per_field: variform_constants::DEFAULT_VARIATIONS_PER_FIELD,
            max_variations: variform_constants::DEFAULT_MAX_VARIATIONS,
            random_seed: variform_constants::SHARED_FEW_SHOT_SEED,
            max_rows: None,
        }
    }
}
