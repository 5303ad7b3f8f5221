//! Opt-in tracing for the `tsmix` binary.
//!
//! Nothing is installed unless `TSMIX_LOG` (or `RUST_LOG`) is set.
//! `TSMIX_LOG_FORMAT` picks the output shape:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented spans via `tracing-tree`, useful for following one
//!   resolution through nested composites
//! - `json`: one JSON object per event
//!
//! ```bash
//! TSMIX_LOG=tsmix_runtime=trace TSMIX_LOG_FORMAT=tree tsmix inspect scenario.json
//! ```
//!
//! Output always goes to stderr; stdout carries the report.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const FILTER_VAR: &str = "TSMIX_LOG";
const FORMAT_VAR: &str = "TSMIX_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Unrecognised names fall back to `Text`.
    pub fn parse(name: &str) -> Self {
        if name.eq_ignore_ascii_case("tree") {
            Self::Tree
        } else if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }

    fn from_env() -> Self {
        std::env::var(FORMAT_VAR)
            .map(|name| Self::parse(&name))
            .unwrap_or(Self::Text)
    }
}

/// `TSMIX_LOG` wins over `RUST_LOG`; `None` when neither is set.
fn env_filter() -> Option<EnvFilter> {
    match std::env::var(FILTER_VAR) {
        Ok(directives) => Some(EnvFilter::builder().parse_lossy(directives)),
        Err(_) if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() => {
            Some(EnvFilter::from_default_env())
        }
        Err(_) => None,
    }
}

/// Install the global subscriber if logging was requested.
pub fn init_tracing() {
    let Some(filter) = env_filter() else {
        return;
    };

    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree).try_init().is_ok()
        }
        LogFormat::Json => {
            let json = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json).try_init().is_ok()
        }
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };
    // A subscriber installed earlier (e.g. by a test harness) stays in place.
    if !installed {
        tracing::debug!("tracing subscriber already installed");
    }
}
