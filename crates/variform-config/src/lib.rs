//! # Variform Config
//!
//! Multi-source configuration loading for the ambient concerns that surround
//! the variform engine — logging and the default tuning knobs a caller can
//! fall back to when it does not build a `VariationConfig` by hand.
//!
//! ## Usage
//!
//! ```rust
//! use variform_config::Config;
//!
//! let config = Config::new().expect("failed to load configuration");
//! println!("log level: {}", config.debug.log_level);
//! ```

mod config_loader;
mod configs;
mod error;

pub use crate::configs::*;
pub use crate::error::{Error, Result};
