//! Facet selections and the department vocabulary of the selected college.

use std::collections::BTreeSet;

use serde::Serialize;
use shared::domain::{College, HubRequirement, SortKey};
use tracing::{debug, warn};

use crate::error::{FacetError, SearchError};

pub const MAX_RATING: f64 = 5.0;
/// Difficulty and workload filters are upper bounds on a 1..=5 scale.
pub const UNCONSTRAINED_SCALE_MAX: u8 = 5;
const SCALE_MIN: u8 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetSelection {
    pub college: Option<College>,
    pub department: Option<String>,
    pub hub_requirements: BTreeSet<HubRequirement>,
    pub no_prerequisites_only: bool,
    pub minimum_rating: f64,
    pub sort_key: Option<SortKey>,
    pub max_difficulty: u8,
    pub max_workload: u8,
    pub min_usefulness: f64,
    pub min_interest: f64,
    pub min_teacher: f64,
    pub min_course_code: Option<u32>,
    pub min_review_count: Option<u32>,
}

impl Default for FacetSelection {
    fn default() -> Self {
        Self {
            college: None,
            department: None,
            hub_requirements: BTreeSet::new(),
            no_prerequisites_only: false,
            minimum_rating: 0.0,
            sort_key: None,
            max_difficulty: UNCONSTRAINED_SCALE_MAX,
            max_workload: UNCONSTRAINED_SCALE_MAX,
            min_usefulness: 0.0,
            min_interest: 0.0,
            min_teacher: 0.0,
            min_course_code: None,
            min_review_count: None,
        }
    }
}

pub fn clamp_rating(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_RATING)
    }
}

fn clamp_scale(value: u8) -> u8 {
    value.clamp(SCALE_MIN, UNCONSTRAINED_SCALE_MAX)
}

/// Ticket for an in-flight department lookup. Only the ticket issued by the
/// latest `set_college` can commit its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentLookup {
    pub college: College,
    generation: u64,
}

/// Read-only copy of the store handed to the display layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetSnapshot {
    pub selection: FacetSelection,
    pub departments: Vec<String>,
    pub department_error: Option<String>,
    pub departments_loading: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FacetStore {
    selection: FacetSelection,
    departments: Vec<String>,
    department_error: Option<String>,
    generation: u64,
    pending_lookup: Option<DepartmentLookup>,
}

impl FacetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &FacetSelection {
        &self.selection
    }

    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    pub fn department_error(&self) -> Option<&str> {
        self.department_error.as_deref()
    }

    pub fn snapshot(&self) -> FacetSnapshot {
        FacetSnapshot {
            selection: self.selection.clone(),
            departments: self.departments.clone(),
            department_error: self.department_error.clone(),
            departments_loading: self.pending_lookup.is_some(),
        }
    }

    /// Selects (or clears) the college. Any change drops the department and
    /// its vocabulary; a newly selected college yields a lookup ticket.
    pub fn set_college(&mut self, college: Option<College>) -> Option<DepartmentLookup> {
        if self.selection.college == college {
            return None;
        }
        self.selection.college = college;
        self.selection.department = None;
        self.departments.clear();
        self.department_error = None;
        self.generation += 1;
        self.pending_lookup = college.map(|college| DepartmentLookup {
            college,
            generation: self.generation,
        });
        self.pending_lookup
    }

    /// Commits a department lookup. Returns false when the ticket is stale.
    pub fn apply_departments(
        &mut self,
        lookup: DepartmentLookup,
        result: Result<Vec<String>, SearchError>,
    ) -> bool {
        if self.pending_lookup != Some(lookup) {
            debug!(
                college = lookup.college.code(),
                "dropping department lookup for a college that is no longer selected"
            );
            return false;
        }
        self.pending_lookup = None;
        match result {
            Ok(departments) => {
                let unique: BTreeSet<String> = departments
                    .into_iter()
                    .map(|department| department.trim().to_string())
                    .filter(|department| !department.is_empty())
                    .collect();
                self.departments = unique.into_iter().collect();
                self.department_error = None;
            }
            Err(err) => {
                warn!(
                    college = lookup.college.code(),
                    "department lookup failed: {err}"
                );
                self.departments.clear();
                self.department_error = Some(format!(
                    "Departments for {} are unavailable right now.",
                    lookup.college.code()
                ));
            }
        }
        true
    }

    pub fn set_department(&mut self, department: Option<&str>) -> Result<(), FacetError> {
        let Some(department) = department.map(str::trim).filter(|d| !d.is_empty()) else {
            self.selection.department = None;
            return Ok(());
        };
        if self.departments.is_empty() {
            let college = self
                .selection
                .college
                .map(|c| c.code().to_string())
                .unwrap_or_else(|| "the selected college".to_string());
            return Err(FacetError::DepartmentsUnavailable(college));
        }
        if !self.departments.iter().any(|known| known == department) {
            return Err(FacetError::UnknownDepartment(department.to_string()));
        }
        self.selection.department = Some(department.to_string());
        Ok(())
    }

    /// Returns whether the requirement is selected after the toggle.
    pub fn toggle_hub_requirement(&mut self, code: HubRequirement) -> bool {
        if self.selection.hub_requirements.remove(&code) {
            false
        } else {
            self.selection.hub_requirements.insert(code);
            true
        }
    }

    pub fn set_no_prerequisites_only(&mut self, enabled: bool) {
        self.selection.no_prerequisites_only = enabled;
    }

    pub fn set_minimum_rating(&mut self, rating: f64) {
        self.selection.minimum_rating = clamp_rating(rating);
    }

    pub fn set_sort_key(&mut self, key: Option<SortKey>) {
        self.selection.sort_key = key;
    }

    pub fn set_max_difficulty(&mut self, value: u8) {
        self.selection.max_difficulty = clamp_scale(value);
    }

    pub fn set_max_workload(&mut self, value: u8) {
        self.selection.max_workload = clamp_scale(value);
    }

    pub fn set_min_usefulness(&mut self, rating: f64) {
        self.selection.min_usefulness = clamp_rating(rating);
    }

    pub fn set_min_interest(&mut self, rating: f64) {
        self.selection.min_interest = clamp_rating(rating);
    }

    pub fn set_min_teacher(&mut self, rating: f64) {
        self.selection.min_teacher = clamp_rating(rating);
    }

    pub fn set_min_course_code(&mut self, code: Option<u32>) {
        self.selection.min_course_code = code;
    }

    pub fn set_min_review_count(&mut self, count: Option<u32>) {
        self.selection.min_review_count = count;
    }

    /// Back to the mount-time state. Any pending lookup is invalidated.
    pub fn reset(&mut self) {
        self.selection = FacetSelection::default();
        self.departments.clear();
        self.department_error = None;
        self.pending_lookup = None;
        self.generation += 1;
    }
}

#[cfg(test)]
#[path = "tests/facets_tests.rs"]
mod tests;
