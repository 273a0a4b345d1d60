//! `rewording` (alias `surface`): spacing, punctuation, typo, and
//! case-change perturbations with small per-token probabilities. Output
//! stays semantically equivalent to the input.

use super::AugCtx;
use crate::models::FieldVariation;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

const MAX_ATTEMPTS_PER_VARIANT: usize = 8;

pub fn augment(value: &str, ctx: &AugCtx) -> Vec<FieldVariation> {
    let mut rng = crate::seed::rng_from_seed(ctx.seed);
    let budget = ctx.n_augments.max(1);

    let mut seen = HashSet::new();
    seen.insert(value.to_string());
    let mut variants = vec![FieldVariation::plain(value)];

    while variants.len() < budget {
        let mut attempts = 0;
        loop {
            let candidate = perturb(value, &mut rng);
            attempts += 1;
            if seen.insert(candidate.clone()) {
                variants.push(FieldVariation::plain(candidate));
                break;
            }
            if attempts >= MAX_ATTEMPTS_PER_VARIANT {
                return variants;
            }
        }
    }
    variants
}

fn perturb(text: &str, rng: &mut ChaCha8Rng) -> String {
    text.split_word_bounds()
        .map(|token| perturb_token(token, rng))
        .collect()
}

fn perturb_token(token: &str, rng: &mut ChaCha8Rng) -> String {
    if token.chars().all(char::is_whitespace) {
        return if rng.random_bool(0.08) {
            format!("{token} ")
        } else {
            token.to_string()
        };
    }
    if token
        .chars()
        .all(|c| matches!(c, '.' | ',' | '!' | '?' | ';' | ':'))
    {
        return if rng.random_bool(0.2) {
            format!("{token}{token}")
        } else {
            token.to_string()
        };
    }

    let mut out = token.to_string();
    if rng.random_bool(0.12) {
        out = toggle_first_char_case(&out);
    }
    if out.chars().count() > 2 && rng.random_bool(0.06) {
        out = swap_adjacent_chars(&out, rng);
    }
    out
}

fn toggle_first_char_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_uppercase() => c.to_lowercase().chain(chars).collect(),
        Some(c) if c.is_lowercase() => c.to_uppercase().chain(chars).collect(),
        _ => s.to_string(),
    }
}

fn swap_adjacent_chars(s: &str, rng: &mut ChaCha8Rng) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    if chars.len() < 2 {
        return s.to_string();
    }
    let i = rng.random_range(0..chars.len() - 1);
    chars.swap(i, i + 1);
    chars.into_iter().collect()
}
