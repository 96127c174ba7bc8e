//! Log setup for the `easy-invoices` binary.
//!
//! Stdout carries only command output, so `easy-invoices show ... > acme.json`
//! yields a valid document. Log lines share stderr with the interactive
//! prompts.

use std::io;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber writing to stderr.
///
/// `RUST_LOG` wins over `level`. With `json` each event is one JSON line.
/// Later calls are ignored.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let stderr = fmt::layer().with_target(false).with_writer(io::stderr);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry.with(stderr.json()).try_init()
    } else {
        registry.with(stderr).try_init()
    };
    // A subscriber installed earlier (tests, embedding) stays in charge.
    installed.ok();
}
