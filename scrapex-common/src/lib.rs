//! Shared utilities for the Scrapex crates.
//!
//! Today this is only the [`observability`] module: a single place that
//! installs the global `tracing` subscriber so the CLI and integration tests
//! log the same way.
//!
//! ```no_run
//! use scrapex_common::observability::{init_logging, LogConfig};
//!
//! let path = init_logging(LogConfig::default())?;
//! tracing::info!(log_file = %path.display(), "logging ready");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod observability;
