//! `shuffle`: permutes a field's list value and emits, for every permutation,
//! a paired `gold_update` pointing at the original gold's new position.
//!
//! Requires a `gold` of kind `index` whose `options_field` names this field —
//! the template validator (§4.1) rejects templates that list `shuffle`
//! without one, so by the time this runs the precondition already holds.

use super::{AugCtx, AugResult, AugmenterError};
use crate::models::{FieldVariation, GoldKind, GoldUpdate};
use rand::seq::SliceRandom;
use std::collections::HashSet;

pub fn augment(value: &str, ctx: &AugCtx) -> AugResult {
    let gold = ctx
        .gold
        .ok_or_else(|| AugmenterError::new("shuffle requires a gold config"))?;
    if gold.kind != GoldKind::Index {
        return Err(AugmenterError::new("shuffle requires gold of kind index"));
    }
    let options_field = gold
        .options_field
        .as_deref()
        .filter(|f| *f == ctx.field_name)
        .ok_or_else(|| {
            AugmenterError::new(format!(
                "shuffle on {:?} requires options_field to match",
                ctx.field_name
            ))
        })?;
    let _ = options_field;

    let options: Vec<&str> = value.split(", ").collect();
    if options.is_empty() {
        return Err(AugmenterError::new("shuffle field value parsed to zero options"));
    }

    let original_index = ctx
        .row
        .get(&gold.field)
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .map(|i| i as usize)
        .ok_or_else(|| AugmenterError::new(format!("gold field {:?} is not an index", gold.field)))?;
    if original_index >= options.len() {
        return Err(AugmenterError::new("gold index out of bounds for options list"));
    }
    let original_value = options[original_index];

    let mut rng = crate::seed::rng_from_seed(ctx.seed);
    let budget = ctx.n_augments.max(1);
    let mut seen: HashSet<(String, usize)> = HashSet::new();
    let mut variants = Vec::new();

    let mut push = |ordered: Vec<&str>| {
        let new_index = ordered.iter().position(|o| *o == original_value)?;
        let data = ordered.join(", ");
        if seen.insert((data.clone(), new_index)) {
            let mut update = GoldUpdate::new();
            update.insert(gold.field.clone(), new_index.to_string());
            Some(FieldVariation {
                data,
                gold_update: Some(update),
            })
        } else {
            None
        }
    };

    if let Some(v) = push(options.clone()) {
        variants.push(v);
    }

    let mut pool = options.clone();
    let mut attempts = 0;
    while variants.len() < budget && attempts < budget * 8 {
        pool.shuffle(&mut rng);
        if let Some(v) = push(pool.clone()) {
            variants.push(v);
        }
        attempts += 1;
    }
    Ok(variants)
}
