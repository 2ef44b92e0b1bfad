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
#![allow(clippy::redundant_pub_crate)]

//! Command-line client for the threat-intelligence blacklist API.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `commands/`: command handlers grouped by concern
//! - `validate.rs`: filter and confidence validation
//! - `client.rs`: error types, dependency wiring, and argument parsers
//! - `output.rs`: JSON output and text renderers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;
pub(crate) mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use cli::run;
