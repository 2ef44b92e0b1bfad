#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! API credential and endpoint configuration for the riq client.
//!
//! Layout: `defaults.rs` (file locations, environment keys, default values),
//! `loader.rs` (`ApiConfig` and the file + environment merge), `error.rs`.

pub mod defaults;
pub mod error;
pub mod loader;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ApiConfig, default_config_path};
