//! # Variform Constants
//!
//! A foundational constants crate for the variform workspace, centralizing the
//! application name, environment-variable prefix, and the default tuning
//! values shared by the config loader and the engine crate, so both stay in
//! sync without duplicating literals.

/// The application name used across the workspace (env-var prefix, config file stem).
pub const NAME: &str = "variform";

/// The default configuration file name searched for in the working directory.
pub const CONFIG_FILE: &str = "variform.toml";

/// Default number of variants the field expander keeps per field when a caller
/// does not override it.
pub const DEFAULT_VARIATIONS_PER_FIELD: usize = 3;

/// Default hard cap on the number of variations a single engine run produces.
pub const DEFAULT_MAX_VARIATIONS: usize = 100;

/// Fixed seed used by the `shared_ordered_random_n` and `shared_unordered_random_n`
/// few-shot formats so every row draws the same pool sample.
pub const SHARED_FEW_SHOT_SEED: u64 = 42;
