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

//! HTTP client for the blacklist endpoints of the threat-intelligence API.
//!
//! Layout: `query.rs` (typed query options and enumerated filters),
//! `client.rs` (`BlacklistApi` trait and the reqwest-backed `Client`),
//! `error.rs` (client error type).

pub mod client;
pub mod error;
pub mod query;

pub use client::{BlacklistApi, Client, ClientConfig, DEFAULT_TIMEOUT};
pub use error::{ApiError, ApiResult};
pub use query::{
    BlacklistFilter, BlacklistListQuery, Confidence, DATETIME_FORMAT, IncidentListQuery,
    MalwareQuery, TimeWindow,
};
