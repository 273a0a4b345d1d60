//! Demonstrates the call-site pattern from the design notes on configuration:
//! a binary wrapping the engine loads `variform_config::Config` once, then
//! builds an explicit `VariationConfig` from its `engine` defaults. The pure
//! `generate()` entry point never reaches for `variform-config` itself.

use serde_json::json;
use variform::{Row, VariationConfig, generate};
use variform_config::Config;

#[test]
fn engine_defaults_seed_a_variation_config() {
    let config = Config::new().expect("defaults alone must load without a variform.toml present");

    let variation_config = VariationConfig {
        variations_per_field: config.engine.variations_per_field,
        max_variations: config.engine.max_variations,
        random_seed: config.engine.random_seed.unwrap_or(0),
        max_rows: None,
    };

    let doc = json!({"prompt_format": "{q}", "gold": "a"});
    let mut row = Row::new();
    row.insert("q".into(), json!("2+2?"));
    row.insert("a".into(), json!("4"));

    let variations = generate(&doc, &[row], &variation_config, None).unwrap();
    assert_eq!(variations.len(), 1);
    assert!(variations[0].prompt.ends_with("2+2?"));
}
