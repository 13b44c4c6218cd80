use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::HubRequirement;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubTag {
    pub name: String,
}

impl HubTag {
    pub fn requirement(&self) -> Option<HubRequirement> {
        self.name.parse().ok()
    }
}

/// Reads an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One row of a course listing as served by the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub college: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub course_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub no_pre_reqs: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub num_reviews: u32,
    #[serde(default)]
    pub average_overall_rating: Option<f64>,
    #[serde(default)]
    pub average_usefulness_rating: Option<f64>,
    #[serde(default)]
    pub average_difficulty_rating: Option<f64>,
    #[serde(default)]
    pub average_workload_rating: Option<f64>,
    #[serde(default)]
    pub average_interest_rating: Option<f64>,
    #[serde(default)]
    pub average_teacher_rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hub_requirements: Vec<HubTag>,
}

impl CourseSummary {
    /// `CAS CS 112` style identifier.
    pub fn display_code(&self) -> String {
        [
            self.college.as_str(),
            self.department.as_str(),
            self.course_code.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub fn hub_requirements(&self) -> Vec<HubRequirement> {
        let mut hubs: Vec<_> = self
            .hub_requirements
            .iter()
            .filter_map(HubTag::requirement)
            .collect();
        hubs.sort();
        hubs.dedup();
        hubs
    }
}

/// Paged response shape shared by the faceted and direct search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
}
