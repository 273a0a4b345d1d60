//! Few-Shot Selector (§4.4): picks `k` example rows from the dataset,
//! excluding the current row, and renders them as `{input, output}` pairs.

use crate::accessor;
use crate::error::{Error, Result};
use crate::models::{FewShotConfig, FewShotFormat, Row, SplitFilter, Template};
use crate::seed;
use rand::seq::SliceRandom;

/// One rendered few-shot example: gold-stripped input, gold-extracted output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FewShotPair {
    pub input: String,
    pub output: String,
}

/// Selects and renders the few-shot examples for one variation of one row.
///
/// `variation_ordinal` lets different variations of the same row draw
/// different example sets under `random_per_row` and `shared_unordered_random_n`.
pub fn build(
    config: &FewShotConfig,
    data: &[Row],
    current_row_index: usize,
    variation_ordinal: usize,
    root_seed: u64,
    template: &Template,
) -> Result<Vec<FewShotPair>> {
    let pool = filter_pool(data, current_row_index, config.split);
    if pool.len() < config.count {
        return Err(Error::InsufficientFewShotData {
            requested: config.count,
            available: pool.len(),
            split: format!("{:?}", config.split).to_lowercase(),
        });
    }

    let row_seed = seed::row_seed(root_seed, current_row_index);
    let selected = select_indices(config.format, &pool, config.count, row_seed, variation_ordinal);

    selected
        .into_iter()
        .map(|row_index| render_pair(row_index, data, template))
        .collect()
}

/// Row indices other than `current_row_index`, optionally filtered by a
/// `split` column when the template asks for one. A row with no `split`
/// value defaults to `"train"`, matching the original
/// `data.get('split', 'train') == wanted` behavior.
fn filter_pool(data: &[Row], current_row_index: usize, split: SplitFilter) -> Vec<usize> {
    let wanted = match split {
        SplitFilter::All => None,
        SplitFilter::Train => Some("train"),
        SplitFilter::Test => Some("test"),
    };
    (0..data.len())
        .filter(|&i| i != current_row_index)
        .filter(|&i| match wanted {
            None => true,
            Some(wanted) => {
                let actual = data[i].get("split").and_then(|v| v.as_str()).unwrap_or("train");
                actual == wanted
            }
        })
        .collect()
}

fn select_indices(
    format: FewShotFormat,
    pool: &[usize],
    count: usize,
    row_seed: u64,
    variation_ordinal: usize,
) -> Vec<usize> {
    match format {
        FewShotFormat::SharedOrderedFirstN => pool[..count].to_vec(),
        FewShotFormat::SharedOrderedRandomN => {
            let mut rng = seed::rng_from_seed(variform_constants::SHARED_FEW_SHOT_SEED);
            pool.choose_multiple(&mut rng, count).copied().collect()
        }
        FewShotFormat::SharedUnorderedRandomN => {
            let mut ordered_rng = seed::rng_from_seed(variform_constants::SHARED_FEW_SHOT_SEED);
            let mut sample: Vec<usize> = pool.choose_multiple(&mut ordered_rng, count).copied().collect();
            let mut reshuffle_rng = seed::rng_from_seed(seed::few_shot_seed(row_seed, variation_ordinal));
            sample.shuffle(&mut reshuffle_rng);
            sample
        }
        FewShotFormat::RandomPerRow => {
            let mut rng = seed::rng_from_seed(seed::few_shot_seed(row_seed, variation_ordinal));
            pool.choose_multiple(&mut rng, count).copied().collect()
        }
    }
}

fn render_pair(row_index: usize, data: &[Row], template: &Template) -> Result<FewShotPair> {
    let row = &data[row_index];
    let gold = template.gold.as_ref();

    let mut values = indexmap::IndexMap::new();
    for (field, value) in row {
        values.insert(field.clone(), accessor::render(value));
    }

    let format_text = template.prompt_format.as_deref().unwrap_or("");
    let gold_field = gold.map(|g| g.field.as_str());
    let input = accessor::fill_placeholders(format_text, &values, gold_field);

    let output = match gold {
        Some(gold) => accessor::extract_gold(row, row_index, gold, template.enumerate.as_ref())?,
        None => String::new(),
    };

    Ok(FewShotPair { input, output })
}

/// Selection is bit-identical across calls with identical inputs, since
/// `select_indices` is a pure function of its arguments.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoldConfig, GoldKind};
    use serde_json::json;

    fn sample_data() -> Vec<Row> {
        (0..6)
            .map(|i| {
                let mut row = Row::new();
                row.insert("q".into(), json!(format!("question {i}")));
                row.insert("a".into(), json!(format!("answer {i}")));
                row
            })
            .collect()
    }

    fn template_with_gold() -> Template {
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
    fn row_missing_split_defaults_to_train() {
        let mut data = sample_data();
        data[1].insert("split".into(), json!("train"));
        data[2].insert("split".into(), json!("test"));

        let config = FewShotConfig {
            count: 1,
            format: FewShotFormat::SharedOrderedFirstN,
            split: SplitFilter::Test,
        };
        let pool = filter_pool(&data, 0, config.split);
        assert!(!pool.contains(&3), "row with no split value must not count as test");
        assert!(pool.contains(&2));
    }

    #[test]
    fn first_n_excludes_current_row_and_is_in_dataset_order() {
        let data = sample_data();
        let config = FewShotConfig {
            count: 2,
            format: FewShotFormat::SharedOrderedFirstN,
            split: SplitFilter::All,
        };
        let pairs = build(&config, &data, 0, 0, 7, &template_with_gold()).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].input, "Q: question 1\nA: ");
        assert_eq!(pairs[0].output, "answer 1");
    }

    #[test]
    fn insufficient_pool_is_fatal() {
        let data = sample_data();
        let config = FewShotConfig {
            count: 10,
            format: FewShotFormat::SharedOrderedFirstN,
            split: SplitFilter::All,
        };
        let err = build(&config, &data, 0, 0, 7, &template_with_gold()).unwrap_err();
        assert!(matches!(err, Error::InsufficientFewShotData { .. }));
    }

    #[test]
    fn random_per_row_is_deterministic_for_identical_inputs() {
        let data = sample_data();
        let config = FewShotConfig {
            count: 2,
            format: FewShotFormat::RandomPerRow,
            split: SplitFilter::All,
        };
        let a = build(&config, &data, 2, 0, 7, &template_with_gold()).unwrap();
        let b = build(&config, &data, 2, 0, 7, &template_with_gold()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn random_per_row_varies_with_variation_ordinal() {
        let data = sample_data();
        let config = FewShotConfig {
            count: 2,
            format: FewShotFormat::RandomPerRow,
            split: SplitFilter::All,
        };
        let a = build(&config, &data, 2, 0, 7, &template_with_gold()).unwrap();
        let b = build(&config, &data, 2, 1, 7, &template_with_gold()).unwrap();
        assert_ne!(a, b);
    }
}
