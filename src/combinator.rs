//! Row Combinator (§4.5): the Cartesian product of one row's per-field
//! variant lists, assembled into rendered `GeneratedVariation` records.

use crate::accessor;
use crate::error::Result;
use crate::few_shot;
use crate::models::{FieldVariation, GeneratedVariation, GoldUpdate, Message, Role, Row, Template};
use indexmap::IndexMap;
use std::sync::Arc;

/// Everything the combinator needs for one row. The variant lists are
/// precomputed by the field expander; the combinator only orders, combines,
/// and renders them.
pub struct CombinatorInput<'a> {
    pub row: &'a Row,
    pub row_index: usize,
    pub template: &'a Template,
    pub template_arc: Arc<Template>,
    pub instruction_variants: &'a [Option<String>],
    pub prompt_format_variants: &'a [Option<String>],
    /// Augmented field variants, in template insertion order.
    pub field_variants: &'a IndexMap<String, Vec<FieldVariation>>,
    pub data: &'a [Row],
    pub root_seed: u64,
    pub remaining_budget: usize,
}

/// Combines one row's variant lists into `GeneratedVariation` records,
/// stopping at `remaining_budget`. The second return value is `true` if the
/// budget cut the row's combinations short.
pub fn combine(input: &CombinatorInput) -> Result<(Vec<GeneratedVariation>, bool)> {
    let gold_field = input.template.gold.as_ref().map(|g| g.field.as_str());

    let mut lengths = vec![input.instruction_variants.len(), input.prompt_format_variants.len()];
    let field_names: Vec<&String> = input.field_variants.keys().collect();
    for name in &field_names {
        lengths.push(input.field_variants[*name].len());
    }
    let total: usize = lengths.iter().product();

    let mut out = Vec::new();
    let mut truncated = false;

    for flat in 0..total {
        if out.len() >= input.remaining_budget {
            truncated = true;
            break;
        }
        let indices = decode_mixed_radix(flat, &lengths);

        let instruction_variant = &input.instruction_variants[indices[0]];
        let prompt_format_variant = &input.prompt_format_variants[indices[1]];

        let mut values: IndexMap<String, String> = input
            .row
            .iter()
            .filter(|(k, _)| Some(k.as_str()) != gold_field)
            .map(|(k, v)| (k.clone(), render_with_enumerate(k, v, input.template)))
            .collect();
        let mut gold_updates: Option<GoldUpdate> = None;

        for (slot, name) in field_names.iter().enumerate() {
            let variant = &input.field_variants[*name][indices[2 + slot]];
            if Some(name.as_str()) != gold_field {
                values.insert((*name).clone(), variant.data.clone());
            }
            if let Some(update) = &variant.gold_update {
                gold_updates
                    .get_or_insert_with(GoldUpdate::new)
                    .extend(update.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }

        let instruction_text = instruction_variant
            .as_ref()
            .map(|text| accessor::fill_placeholders(text, &values, gold_field));
        let main_question = prompt_format_variant
            .as_ref()
            .map(|text| accessor::fill_placeholders(text, &values, gold_field))
            .unwrap_or_default();

        let variation_ordinal = out.len();
        let pairs = match &input.template.few_shot {
            Some(cfg) => few_shot::build(
                cfg,
                input.data,
                input.row_index,
                variation_ordinal,
                input.root_seed,
                input.template,
            )?,
            None => Vec::new(),
        };

        let mut conversation = Vec::new();
        if let Some(text) = &instruction_text
            && !text.is_empty()
        {
            conversation.push(Message {
                role: Role::System,
                content: text.clone(),
            });
        }
        for pair in &pairs {
            conversation.push(Message {
                role: Role::User,
                content: pair.input.clone(),
            });
            conversation.push(Message {
                role: Role::Assistant,
                content: pair.output.clone(),
            });
        }
        conversation.push(Message {
            role: Role::User,
            content: main_question.clone(),
        });

        let mut prompt_parts = Vec::new();
        if let Some(text) = &instruction_text
            && !text.is_empty()
        {
            prompt_parts.push(text.clone());
        }
        for pair in &pairs {
            prompt_parts.push(format!("{}\n{}", pair.input, pair.output));
        }
        prompt_parts.push(main_question.clone());

        out.push(GeneratedVariation {
            prompt: prompt_parts.join("\n\n"),
            conversation,
            original_row_index: input.row_index,
            variation_count: variation_ordinal + 1,
            template_config: input.template_arc.clone(),
            field_values: values,
            gold_updates,
        });
    }

    Ok((out, truncated))
}

/// Renders one row column, applying the template's top-level `enumerate`
/// directive when it names this column — the fixed marker style a field is
/// always displayed with, independent of any per-field augmenter variation.
fn render_with_enumerate(field: &str, value: &serde_json::Value, template: &Template) -> String {
    match &template.enumerate {
        Some(cfg) if cfg.field == field => {
            let items: Vec<String> = match value {
                serde_json::Value::Array(items) => items.iter().map(accessor::render).collect(),
                other => accessor::render(other).split(", ").map(str::to_string).collect(),
            };
            let refs: Vec<&str> = items.iter().map(String::as_str).collect();
            crate::augmenters::render_list(&refs, cfg.kind).unwrap_or_else(|_| accessor::render(value))
        }
        _ => accessor::render(value),
    }
}

/// Decodes a flat product index into per-dimension indices, first dimension
/// slowest — the Cartesian product order is lexicographic over field order.
fn decode_mixed_radix(mut flat: usize, lengths: &[usize]) -> Vec<usize> {
    let mut radices = vec![1usize; lengths.len()];
    for i in (0..lengths.len().saturating_sub(1)).rev() {
        radices[i] = radices[i + 1] * lengths[i + 1];
    }
    let mut indices = Vec::with_capacity(lengths.len());
    for &radix in &radices {
        indices.push(flat / radix);
        flat %= radix;
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoldConfig, GoldKind};
    use serde_json::json;

    fn base_template() -> Template {
        Template {
            instruction: None,
            instruction_variations: vec![],
            prompt_format: Some("Q: {q}\nA: {a}".to_string()),
            prompt_format_variations: vec![],
            field_augmenters: Default::default(),
            gold: Some(GoldConfig {
                field: "a".to_string(),
                kind: GoldKind::Value,
                options_field: None,
            }),
            few_shot: None,
            enumerate: None,
        }
    }

    #[test]
    fn product_order_is_lexicographic() {
        let lengths = [2, 3];
        let flats: Vec<Vec<usize>> = (0..6).map(|f| decode_mixed_radix(f, &lengths)).collect();
        assert_eq!(
            flats,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn strips_gold_placeholder_from_main_question() {
        let mut row = Row::new();
        row.insert("q".into(), json!("2+2?"));
        row.insert("a".into(), json!("4"));
        let template = base_template();
        let field_variants = IndexMap::new();
        let input = CombinatorInput {
            row: &row,
            row_index: 0,
            template: &template,
            template_arc: Arc::new(template.clone()),
            instruction_variants: &[None],
            prompt_format_variants: &[Some("Q: {q}\nA: {a}".to_string())],
            field_variants: &field_variants,
            data: &[row.clone()],
            root_seed: 7,
            remaining_budget: 10,
        };
        let (variations, truncated) = combine(&input).unwrap();
        assert!(!truncated);
        assert_eq!(variations.len(), 1);
        assert_eq!(variations[0].prompt, "Q: 2+2?\nA: ");
        assert!(!variations[0].field_values.contains_key("a"));
    }

    #[test]
    fn budget_truncates_the_product() {
        let mut row = Row::new();
        row.insert("q".into(), json!("2+2?"));
        row.insert("a".into(), json!("4"));
        let template = base_template();
        let mut field_variants = IndexMap::new();
        field_variants.insert(
            "q".to_string(),
            vec![
                FieldVariation::plain("2+2?"),
                FieldVariation::plain("What is 2+2?"),
                FieldVariation::plain("Compute 2+2."),
            ],
        );
        let input = CombinatorInput {
            row: &row,
            row_index: 0,
            template: &template,
            template_arc: Arc::new(template.clone()),
            instruction_variants: &[None],
            prompt_format_variants: &[Some("Q: {q}\nA: {a}".to_string())],
            field_variants: &field_variants,
            data: &[row.clone()],
            root_seed: 7,
            remaining_budget: 2,
        };
        let (variations, truncated) = combine(&input).unwrap();
        assert_eq!(variations.len(), 2);
        assert!(truncated);
    }

    #[test]
    fn enumerate_directive_renders_the_configured_marker_style() {
        let mut row = Row::new();
        row.insert("opts".into(), json!(["x", "y", "z"]));
        let template = Template {
            instruction: None,
            instruction_variations: vec![],
            prompt_format: Some("{opts}".to_string()),
            prompt_format_variations: vec![],
            field_augmenters: Default::default(),
            gold: None,
            few_shot: None,
            enumerate: Some(crate::models::EnumerateConfig {
                field: "opts".to_string(),
                kind: crate::models::EnumerateType::UpperAlpha,
            }),
        };
        let field_variants = IndexMap::new();
        let input = CombinatorInput {
            row: &row,
            row_index: 0,
            template: &template,
            template_arc: Arc::new(template.clone()),
            instruction_variants: &[None],
            prompt_format_variants: &[Some("{opts}".to_string())],
            field_variants: &field_variants,
            data: &[row.clone()],
            root_seed: 1,
            remaining_budget: 10,
        };
        let (variations, _) = combine(&input).unwrap();
        assert_eq!(variations[0].prompt, "A. x, B. y, C. z");
    }
}
