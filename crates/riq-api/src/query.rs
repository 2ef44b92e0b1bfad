//! Typed query options for the blacklist endpoints.
//!
//! # Design
//! - One struct per remote operation, carrying only the fields that operation sends.
//! - Enumerated filters know their wire names; free-form parsing lives with the caller.
//! - Time windows resolve against an explicit `now` so resolution stays deterministic in tests.

use std::fmt::{self, Display, Formatter};

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::{ApiError, ApiResult};

/// Datetime layout accepted on the command line and sent on the wire.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Malware-delivery mechanism used to narrow list and malware queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistFilter {
    /// Blackhole exploit kit.
    Blackhole,
    /// Sakura exploit kit.
    Sakura,
    /// Any other exploit kit.
    ExploitKit,
}

impl BlacklistFilter {
    /// Every accepted filter, in display order.
    pub const ALL: [Self; 3] = [Self::Blackhole, Self::Sakura, Self::ExploitKit];

    /// Wire name sent as `blacklistFilter`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blackhole => "blackhole",
            Self::Sakura => "sakura",
            Self::ExploitKit => "exploitKit",
        }
    }

    /// Match a wire name exactly; names are case-sensitive.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.as_str() == value)
    }
}

impl Display for BlacklistFilter {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Malware classification certainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// High confidence (`H`).
    High,
    /// Medium confidence (`M`).
    Medium,
    /// Low confidence (`L`).
    Low,
}

impl Confidence {
    /// Every accepted confidence level, in display order.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Wire name sent as `confidence`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "H",
            Self::Medium => "M",
            Self::Low => "L",
        }
    }

    /// Match a wire name exactly; names are case-sensitive.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }
}

impl Display for Confidence {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Query period expressed as a day count with optional explicit bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Window length used to derive whichever bound is missing.
    pub days: u32,
    /// Inclusive start of the window.
    pub start: Option<NaiveDateTime>,
    /// Exclusive end of the window.
    pub end: Option<NaiveDateTime>,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            days: 1,
            start: None,
            end: None,
        }
    }
}

impl TimeWindow {
    /// Resolve the window into concrete `(start, end)` bounds.
    ///
    /// Missing bounds are derived from `days`: with neither bound the window
    /// ends at `now`; with only one bound the other sits `days` away from it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::WindowOutOfRange`] when a derived bound falls
    /// outside the representable calendar.
    pub fn resolve(&self, now: NaiveDateTime) -> ApiResult<(NaiveDateTime, NaiveDateTime)> {
        let out_of_range = || ApiError::WindowOutOfRange { days: self.days };
        let span = TimeDelta::try_days(i64::from(self.days)).ok_or_else(out_of_range)?;

        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok((start, end)),
            (Some(start), None) => {
                let end = start.checked_add_signed(span).ok_or_else(out_of_range)?;
                Ok((start, end))
            }
            (None, Some(end)) => {
                let start = end.checked_sub_signed(span).ok_or_else(out_of_range)?;
                Ok((start, end))
            }
            (None, None) => {
                let start = now.checked_sub_signed(span).ok_or_else(out_of_range)?;
                Ok((start, now))
            }
        }
    }

    fn push_pairs(
        &self,
        now: NaiveDateTime,
        pairs: &mut Vec<(&'static str, String)>,
    ) -> ApiResult<()> {
        let (start, end) = self.resolve(now)?;
        pairs.push((
            "startDateInclusive",
            start.format(DATETIME_FORMAT).to_string(),
        ));
        pairs.push(("endDateExclusive", end.format(DATETIME_FORMAT).to_string()));
        Ok(())
    }
}

/// Options for `blacklist/incident/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentListQuery {
    /// Query period.
    pub window: TimeWindow,
    /// Include crawls from every workspace rather than only the caller's.
    pub all_workspace_crawls: bool,
}

impl IncidentListQuery {
    /// Query parameters for this request, resolved against `now`.
    ///
    /// # Errors
    ///
    /// Propagates [`TimeWindow::resolve`] failures.
    pub fn query_pairs(&self, now: NaiveDateTime) -> ApiResult<Vec<(&'static str, String)>> {
        let mut pairs = Vec::with_capacity(3);
        self.window.push_pairs(now, &mut pairs)?;
        if self.all_workspace_crawls {
            pairs.push(("allWorkspaceCrawls", "true".to_string()));
        }
        Ok(pairs)
    }
}

/// Options for `blacklist/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlacklistListQuery {
    /// Optional delivery-mechanism filter.
    pub filter: Option<BlacklistFilter>,
    /// Query period.
    pub window: TimeWindow,
}

impl BlacklistListQuery {
    /// Query parameters for this request, resolved against `now`.
    ///
    /// # Errors
    ///
    /// Propagates [`TimeWindow::resolve`] failures.
    pub fn query_pairs(&self, now: NaiveDateTime) -> ApiResult<Vec<(&'static str, String)>> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(filter) = self.filter {
            pairs.push(("blacklistFilter", filter.as_str().to_string()));
        }
        self.window.push_pairs(now, &mut pairs)?;
        Ok(pairs)
    }
}

/// Options for `blacklist/malware`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MalwareQuery {
    /// Optional delivery-mechanism filter.
    pub filter: Option<BlacklistFilter>,
    /// Optional classification certainty.
    pub confidence: Option<Confidence>,
    /// Query period.
    pub window: TimeWindow,
}

impl MalwareQuery {
    /// Query parameters for this request, resolved against `now`.
    ///
    /// # Errors
    ///
    /// Propagates [`TimeWindow::resolve`] failures.
    pub fn query_pairs(&self, now: NaiveDateTime) -> ApiResult<Vec<(&'static str, String)>> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(filter) = self.filter {
            pairs.push(("blacklistFilter", filter.as_str().to_string()));
        }
        if let Some(confidence) = self.confidence {
            pairs.push(("confidence", confidence.as_str().to_string()));
        }
        self.window.push_pairs(now, &mut pairs)?;
        Ok(pairs)
    }
}
