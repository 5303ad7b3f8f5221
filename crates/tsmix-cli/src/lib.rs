//! Library side of the `tsmix` binary: scenario loading, composition and
//! reporting.

pub mod args;
pub mod config;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
