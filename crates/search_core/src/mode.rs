//! Which of the two search modes owns the displayed results, and which
//! outstanding request is allowed to replace them.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::query::SearchQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SearchMode {
    #[default]
    Faceted,
    Direct,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Faceted => f.write_str("faceted"),
            SearchMode::Direct => f.write_str("direct"),
        }
    }
}

/// Stamped on every search request when it is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTag {
    pub mode: SearchMode,
    pub seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SearchModeController {
    current: SearchMode,
    next_seq: u64,
    latest_faceted: Option<u64>,
    latest_direct: Option<u64>,
    displayed: Option<SearchQuery>,
}

impl SearchModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_mode(&self) -> SearchMode {
        self.current
    }

    /// The query behind the displayed results, if any have been shown.
    pub fn active_query_descriptor(&self) -> Option<&SearchQuery> {
        self.displayed.as_ref()
    }

    fn latest_slot(&mut self, mode: SearchMode) -> &mut Option<u64> {
        match mode {
            SearchMode::Faceted => &mut self.latest_faceted,
            SearchMode::Direct => &mut self.latest_direct,
        }
    }

    fn latest(&self, mode: SearchMode) -> Option<u64> {
        match mode {
            SearchMode::Faceted => self.latest_faceted,
            SearchMode::Direct => self.latest_direct,
        }
    }

    /// Makes `mode` authoritative and issues the tag for its newest request.
    /// The displayed descriptor only changes on `commit`.
    pub fn begin(&mut self, mode: SearchMode) -> RequestTag {
        if self.current != mode {
            info!(from = %self.current, to = %mode, "search mode transition");
        }
        self.current = mode;
        self.next_seq += 1;
        let seq = self.next_seq;
        *self.latest_slot(mode) = Some(seq);
        RequestTag { mode, seq }
    }

    pub fn is_current(&self, tag: RequestTag) -> bool {
        tag.mode == self.current && self.latest(tag.mode) == Some(tag.seq)
    }

    /// Records the query behind newly displayed results. Rejects stale tags.
    pub fn commit(&mut self, tag: RequestTag, query: SearchQuery) -> bool {
        if !self.is_current(tag) {
            return false;
        }
        self.displayed = Some(query);
        true
    }

    /// Orphans every outstanding request of either mode.
    pub fn invalidate(&mut self) {
        self.latest_faceted = None;
        self.latest_direct = None;
    }
}

#[cfg(test)]
#[path = "tests/mode_tests.rs"]
mod tests;
