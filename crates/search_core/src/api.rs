//! The seam between the search engine and the remote course catalog.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::College,
    error::ApiError,
    protocol::{CourseSummary, PageEnvelope},
};
use tracing::debug;

use crate::{error::SearchError, query::QueryParams};

pub type CoursePage = PageEnvelope<CourseSummary>;

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Paged, filterable listing.
    async fn search_courses(&self, params: &QueryParams) -> Result<CoursePage, SearchError>;
    /// Free-text lookup by course code or title.
    async fn query_courses(&self, params: &QueryParams) -> Result<CoursePage, SearchError>;
    async fn departments_by_college(&self, college: College) -> Result<Vec<String>, SearchError>;
    async fn colleges(&self) -> Result<Vec<String>, SearchError>;
}

#[derive(Clone)]
pub struct HttpCatalogApi {
    http: Client,
    base_url: String,
}

impl HttpCatalogApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&QueryParams>,
    ) -> Result<T, SearchError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.get(&url);
        if let Some(params) = params {
            debug!(%url, query = %params, "catalog request");
            request = request.query(params.pairs());
        } else {
            debug!(%url, "catalog request");
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = ApiError::from_body(&body)
                .map(|err| err.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(SearchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| SearchError::Decode(err.to_string()))
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn search_courses(&self, params: &QueryParams) -> Result<CoursePage, SearchError> {
        self.get_json("/courses/search", Some(params)).await
    }

    async fn query_courses(&self, params: &QueryParams) -> Result<CoursePage, SearchError> {
        self.get_json("/courses/query", Some(params)).await
    }

    async fn departments_by_college(&self, college: College) -> Result<Vec<String>, SearchError> {
        let departments: Option<Vec<String>> = self
            .get_json(&format!("/courses/departments/{}", college.code()), None)
            .await?;
        Ok(departments.unwrap_or_default())
    }

    async fn colleges(&self) -> Result<Vec<String>, SearchError> {
        let colleges: Option<Vec<String>> = self.get_json("/courses/colleges", None).await?;
        Ok(colleges.unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
