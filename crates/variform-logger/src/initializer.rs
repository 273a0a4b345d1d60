//! A loguru-inspired structured logging implementation.
//!
//! Provides highly customizable logging with:
//! - Rich ANSI color output formatting
//! - Automatic log level configuration
//! - Custom log levels through metadata filtering
//! - Thread-safe initialization and global logger management
//! - Precise timestamps using chrono's local timezone
//!
//! # Usage
//!
//! ```rust
//! use variform_logger::init_logger;
//!
//! init_logger("debug", None, None);
//! ```
//!
//! # Implementation Details
//! Built on top of the [`tracing`] ecosystem with a custom [`FormatEvent`] implementation.
//! The logger propagates spans and events through the [`tracing_subscriber`] layer system.
//!
//! # Panics
//! - Will panic if initialization is attempted multiple times
//!
//! [`tracing`]: https://docs.rs/tracing
//! [`FormatEvent`]: tracing_subscriber::fmt::FormatEvent
//! [`tracing_subscriber`]: https://docs.rs/tracing-subscriber

use std::io;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::renderer::MyFormatter;
use strum::EnumString;
use tracing_appender::rolling::{daily, hourly, minutely, never};

#[derive(Default, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RotationType {
    #[default]
    Never,
    Minutely,
    Hourly,
    Daily,
}

pub fn init_logger(level: &str, log_dir: Option<PathBuf>, rotation: Option<RotationType>) {
    if let Some(sink) = log_dir {
        let name = format!("{}.log", env!("CARGO_CRATE_NAME"));
        let writer = match rotation.unwrap_or_default() {
            RotationType::Never => never(sink, name),
            RotationType::Minutely => minutely(sink, name),
            RotationType::Hourly => hourly(sink, name),
            RotationType::Daily => daily(sink, name),
        };
        let fmt_layer = fmt::layer()
            .with_target(true)
            .event_format(MyFormatter)
            .with_writer(writer)
            .with_filter(EnvFilter::new(level));

        tracing_subscriber::registry().with(fmt_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .event_format(MyFormatter)
            .with_writer(io::stderr)
            .with_filter(EnvFilter::new(level));
        tracing_subscriber::registry().with(fmt_layer).init();
    };
}
