//! # Variform Logger
//!
//! A loguru-inspired structured logging setup for the variform engine,
//! built on the `tracing` ecosystem.
//!
//! ## Usage
//!
//! ```rust
//! use variform_logger::{init_logger, info, debug};
//!
//! init_logger("info", None, None);
//! info!("engine starting");
//! debug!("row {} expanded into {} variants", 0, 4);
//! ```

mod initializer;
mod renderer;

pub use initializer::*;
pub use tracing::{debug, error, info, trace, warn};
