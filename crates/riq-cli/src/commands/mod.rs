//! Command handlers grouped by concern.

pub(crate) mod blacklist;
