//! Template document parsing and validation (§4.1): turns a JSON-equivalent
//! document into a [`Template`], collecting every validation problem rather
//! than stopping at the first one.

use crate::accessor::Accessor;
use crate::augmenters;
use crate::error::TemplateProblem;
use crate::models::{
    EnumerateConfig, EnumerateType, FewShotConfig, FewShotFormat, GoldConfig, GoldKind,
    SplitFilter, Template,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::str::FromStr;

const RESERVED_KEYS: &[&str] = &[
    "instruction",
    "instruction_variations",
    "prompt_format",
    "prompt_format_variations",
    "gold",
    "few_shot",
    "enumerate",
];

/// Normalizes a template document to the internal model. Malformed pieces
/// are dropped rather than rejected — use [`validate`] to learn why.
pub fn parse(doc: &Value) -> Template {
    build(doc).0
}

/// Returns every validation problem found in `doc`, or `Ok(())` if none.
pub fn validate(doc: &Value) -> Result<(), Vec<TemplateProblem>> {
    let problems = build(doc).1;
    if problems.is_empty() { Ok(()) } else { Err(problems) }
}

/// Parses and validates in one pass; this is what [`crate::engine::generate`]
/// actually calls, since building the model twice would waste the walk over
/// `doc` that both `parse` and `validate` separately perform.
pub(crate) fn build(doc: &Value) -> (Template, Vec<TemplateProblem>) {
    let mut problems = Vec::new();
    let obj = doc.as_object();

    let instruction = obj
        .and_then(|o| o.get("instruction"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let prompt_format = obj
        .and_then(|o| o.get("prompt_format"))
        .and_then(Value::as_str)
        .map(str::to_string);

    if instruction.as_deref().unwrap_or("").is_empty()
        && prompt_format.as_deref().unwrap_or("").is_empty()
    {
        problems.push(TemplateProblem::Empty);
    }

    for (location, text) in [("instruction", &instruction), ("prompt_format", &prompt_format)] {
        if let Some(text) = text
            && extract_placeholders(text).is_err()
        {
            problems.push(TemplateProblem::PlaceholderUnbalanced {
                location: location.to_string(),
                text: text.clone(),
            });
        }
    }

    let raw_instruction_variations = obj
        .and_then(|o| o.get("instruction_variations"))
        .and_then(parse_string_list)
        .unwrap_or_default();
    let raw_prompt_format_variations = obj
        .and_then(|o| o.get("prompt_format_variations"))
        .and_then(parse_string_list)
        .unwrap_or_default();

    let mut raw_field_augmenters: IndexMap<String, Vec<String>> = IndexMap::new();
    if let Some(o) = obj {
        for (key, value) in o {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            if let Some(list) = parse_string_list(value) {
                raw_field_augmenters.insert(key.clone(), list);
            }
        }
    }

    check_augmenter_names("instruction", &raw_instruction_variations, &mut problems);
    check_augmenter_names("prompt_format", &raw_prompt_format_variations, &mut problems);
    for (field, names) in &raw_field_augmenters {
        check_augmenter_names(field, names, &mut problems);
    }

    let instruction_variations = canonicalize_list(&raw_instruction_variations);
    let prompt_format_variations = canonicalize_list(&raw_prompt_format_variations);
    let field_augmenters: IndexMap<String, Vec<String>> = raw_field_augmenters
        .into_iter()
        .map(|(field, names)| (field, canonicalize_list(&names)))
        .collect();

    let gold = obj
        .and_then(|o| o.get("gold"))
        .and_then(|v| parse_gold(v, &mut problems));

    if let Some(gold) = &gold
        && (gold.field.contains('.') || gold.field.contains('['))
        && Accessor::parse(&gold.field).is_none()
    {
        problems.push(TemplateProblem::GoldAccessorUnparseable(gold.field.clone()));
    }

    let few_shot = obj
        .and_then(|o| o.get("few_shot"))
        .and_then(|v| parse_few_shot(v, &mut problems));

    if few_shot.is_some() && gold.is_none() {
        problems.push(TemplateProblem::MissingGold {
            reason: "`few_shot` is present".to_string(),
        });
    }

    let enumerate = obj
        .and_then(|o| o.get("enumerate"))
        .and_then(|v| parse_enumerate(v, &mut problems));

    for (field, names) in &field_augmenters {
        if names.iter().any(|n| n == "shuffle") {
            let satisfied = matches!(
                &gold,
                Some(GoldConfig { kind: GoldKind::Index, options_field: Some(of), .. }) if of == field
            );
            if !satisfied {
                problems.push(TemplateProblem::ShuffleRequiresIndexGold {
                    field: field.clone(),
                });
            }
        }
    }

    let template = Template {
        instruction,
        instruction_variations,
        prompt_format,
        prompt_format_variations,
        field_augmenters,
        gold,
        few_shot,
        enumerate,
    };
    (template, problems)
}

fn check_augmenter_names(field: &str, names: &[String], problems: &mut Vec<TemplateProblem>) {
    for name in names {
        if augmenters::canonicalize(name).is_none() {
            problems.push(TemplateProblem::UnknownAugmenter {
                field: field.to_string(),
                name: name.clone(),
            });
        }
    }
}

fn canonicalize_list(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|n| augmenters::canonicalize(n).unwrap_or(n.as_str()).to_string())
        .collect()
}

fn parse_string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn parse_gold(value: &Value, problems: &mut Vec<TemplateProblem>) -> Option<GoldConfig> {
    match value {
        Value::String(field) => Some(GoldConfig {
            field: field.clone(),
            kind: GoldKind::Value,
            options_field: None,
        }),
        Value::Object(map) => {
            let field = map.get("field").and_then(Value::as_str)?.to_string();
            match map.get("type").and_then(Value::as_str) {
                Some("value") | None => Some(GoldConfig {
                    field,
                    kind: GoldKind::Value,
                    options_field: None,
                }),
                Some("index") => match map.get("options_field").and_then(Value::as_str) {
                    Some(options_field) => Some(GoldConfig {
                        field,
                        kind: GoldKind::Index,
                        options_field: Some(options_field.to_string()),
                    }),
                    None => {
                        problems.push(TemplateProblem::GoldIndexMissingOptionsField);
                        None
                    }
                },
                Some(_) => None,
            }
        }
        _ => None,
    }
}

fn parse_few_shot(value: &Value, problems: &mut Vec<TemplateProblem>) -> Option<FewShotConfig> {
    let map = value.as_object()?;
    let count = map.get("count").and_then(Value::as_u64).unwrap_or(0) as usize;
    if count < 1 {
        problems.push(TemplateProblem::FewShotCountZero(count));
    }

    let format_str = map.get("format").and_then(Value::as_str).unwrap_or("");
    let format = FewShotFormat::from_str(format_str).ok();
    if format.is_none() {
        problems.push(TemplateProblem::FewShotFormatInvalid(format_str.to_string()));
    }

    let split_str = map.get("split").and_then(Value::as_str).unwrap_or("all");
    let split = SplitFilter::from_str(split_str).ok();
    if split.is_none() {
        problems.push(TemplateProblem::FewShotSplitInvalid(split_str.to_string()));
    }

    Some(FewShotConfig {
        count,
        format: format.unwrap_or(FewShotFormat::SharedOrderedFirstN),
        split: split.unwrap_or(SplitFilter::All),
    })
}

fn parse_enumerate(value: &Value, problems: &mut Vec<TemplateProblem>) -> Option<EnumerateConfig> {
    let map = value.as_object()?;
    let field = map.get("field").and_then(Value::as_str)?.to_string();
    let type_str = map.get("type").and_then(Value::as_str).unwrap_or("");
    let kind = EnumerateType::from_str(type_str).ok();
    if kind.is_none() {
        problems.push(TemplateProblem::EnumerateTypeInvalid(type_str.to_string()));
        return None;
    }
    Some(EnumerateConfig {
        field,
        kind: kind.unwrap(),
    })
}

/// Checks brace balance and extracts placeholder names, e.g. `"{q} and {a}"`
/// -> `["q", "a"]`. Nested braces are rejected; this is not a general parser.
pub fn extract_placeholders(text: &str) -> Result<Vec<String>, ()> {
    let mut depth = 0i32;
    let mut names = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '{' => {
                depth += 1;
                if depth > 1 {
                    return Err(());
                }
                current.clear();
            }
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(());
                }
                names.push(std::mem::take(&mut current));
            }
            _ if depth == 1 => current.push(c),
            _ => {}
        }
    }
    if depth != 0 {
        return Err(());
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_empty_template() {
        let doc = json!({});
        assert!(validate(&doc).is_err());
    }

    #[test]
    fn accepts_minimal_template() {
        let doc = json!({"instruction": "Answer:", "prompt_format": "{q}", "gold": "a"});
        assert!(validate(&doc).is_ok());
    }

    #[test]
    fn rejects_unknown_augmenter() {
        let doc = json!({
            "prompt_format": "{q}",
            "q": ["not_a_real_augmenter"],
        });
        let problems = validate(&doc).unwrap_err();
        assert!(
            problems
                .iter()
                .any(|p| matches!(p, TemplateProblem::UnknownAugmenter { .. }))
        );
    }

    #[test]
    fn resolves_aliases_during_parse() {
        let doc = json!({"prompt_format": "{q}", "q": ["surface"]});
        let template = parse(&doc);
        assert_eq!(template.field_augmenters["q"], vec!["rewording".to_string()]);
    }

    #[test]
    fn shuffle_without_index_gold_is_rejected() {
        let doc = json!({
            "prompt_format": "Q: {q}\nOptions: {opts}\nA: {a}",
            "opts": ["shuffle"],
            "gold": "a",
        });
        let problems = validate(&doc).unwrap_err();
        assert!(
            problems
                .iter()
                .any(|p| matches!(p, TemplateProblem::ShuffleRequiresIndexGold { .. }))
        );
    }

    #[test]
    fn shuffle_with_matching_index_gold_is_accepted() {
        let doc = json!({
            "prompt_format": "Q: {q}\nOptions: {opts}\nA: {a}",
            "opts": ["shuffle"],
            "gold": {"field": "a", "type": "index", "options_field": "opts"},
        });
        assert!(validate(&doc).is_ok());
    }

    #[test]
    fn few_shot_without_gold_is_rejected() {
        let doc = json!({
            "prompt_format": "{q}",
            "few_shot": {"count": 2, "format": "random_per_row", "split": "all"},
        });
        let problems = validate(&doc).unwrap_err();
        assert!(
            problems
                .iter()
                .any(|p| matches!(p, TemplateProblem::MissingGold { .. }))
        );
    }

    #[test]
    fn unbalanced_placeholder_is_rejected() {
        let doc = json!({"prompt_format": "{q"});
        let problems = validate(&doc).unwrap_err();
        assert!(
            problems
                .iter()
                .any(|p| matches!(p, TemplateProblem::PlaceholderUnbalanced { .. }))
        );
    }

    #[test]
    fn placeholder_extraction() {
        assert_eq!(
            extract_placeholders("{q} and {a}").unwrap(),
            vec!["q".to_string(), "a".to_string()]
        );
        assert!(extract_placeholders("{q").is_err());
    }
}
