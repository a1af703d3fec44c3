//! # Observability
//!
//! Structured logging for the pipeline and its bridge via the `tracing`
//! ecosystem. The core itself only emits events (beat acceptance at
//! debug level); the bridge installs the subscriber at startup.
//!
//! ```rust,ignore
//! use biopulse_core::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default());
//! tracing::info!(bpm = 72.4, "beat");
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
