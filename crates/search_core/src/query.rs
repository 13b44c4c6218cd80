//! Serialization of searches into the catalog's query-parameter contract.

use std::fmt;

use serde::Serialize;
use url::form_urlencoded;

use crate::{
    error::SearchError,
    facets::{FacetSelection, UNCONSTRAINED_SCALE_MAX},
    mode::SearchMode,
};

/// Ordered key/value pairs; keys may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    fn push(&mut self, key: &'static str, value: impl ToString) {
        self.pairs.push((key, value.to_string()));
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.pairs.iter().map(|(k, _)| *k).collect();
        keys.dedup();
        keys
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Free-text search input, trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectQuery(String);

impl DirectQuery {
    pub fn parse(text: &str) -> Result<Self, SearchError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What produced (or will produce) a result page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SearchQuery {
    Faceted(FacetSelection),
    Direct(DirectQuery),
}

impl SearchQuery {
    pub fn mode(&self) -> SearchMode {
        match self {
            SearchQuery::Faceted(_) => SearchMode::Faceted,
            SearchQuery::Direct(_) => SearchMode::Direct,
        }
    }

    pub fn build(&self, page: u32, page_size: u32) -> QueryParams {
        match self {
            SearchQuery::Faceted(selection) => build_faceted(selection, page, page_size),
            SearchQuery::Direct(text) => direct_params(text, page, page_size),
        }
    }
}

fn push_rating_floor(params: &mut QueryParams, key: &'static str, value: f64) {
    if value > 0.0 {
        params.push(key, value);
    }
}

pub fn build_faceted(selection: &FacetSelection, page: u32, page_size: u32) -> QueryParams {
    let mut params = QueryParams::default();
    if let Some(college) = selection.college {
        params.push("colleges", college.code());
    }
    if let Some(department) = selection.department.as_deref() {
        params.push("departments", department);
    }
    for hub in &selection.hub_requirements {
        params.push("hubReqs", hub.code());
    }
    if selection.no_prerequisites_only {
        params.push("noPreReqs", true);
    }
    push_rating_floor(&mut params, "minRating", selection.minimum_rating);
    if selection.max_difficulty < UNCONSTRAINED_SCALE_MAX {
        params.push("maxDifficulty", selection.max_difficulty);
    }
    if selection.max_workload < UNCONSTRAINED_SCALE_MAX {
        params.push("maxWorkload", selection.max_workload);
    }
    push_rating_floor(&mut params, "minUsefulness", selection.min_usefulness);
    push_rating_floor(&mut params, "minInterest", selection.min_interest);
    push_rating_floor(&mut params, "minTeacher", selection.min_teacher);
    if let Some(code) = selection.min_course_code {
        params.push("minCourseCode", code);
    }
    if let Some(count) = selection.min_review_count {
        params.push("reviewCount", count);
    }
    if let Some(sort_key) = selection.sort_key {
        params.push("sortBy", sort_key.wire_value());
    }
    params.push("page", page);
    params.push("size", page_size);
    params
}

fn direct_params(query: &DirectQuery, page: u32, page_size: u32) -> QueryParams {
    let mut params = QueryParams::default();
    params.push("query", query.as_str());
    params.push("page", page);
    params.push("size", page_size);
    params
}

pub fn build_direct(text: &str, page: u32, page_size: u32) -> Result<QueryParams, SearchError> {
    let query = DirectQuery::parse(text)?;
    Ok(direct_params(&query, page, page_size))
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
