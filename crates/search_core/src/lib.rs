pub mod api;
pub mod config;
pub mod error;
pub mod facets;
pub mod mode;
pub mod orchestrator;
pub mod pagination;
pub mod query;

pub use api::{CatalogApi, CoursePage, HttpCatalogApi};
pub use config::{load_settings, Settings};
pub use error::{FacetError, SearchError};
pub use mode::SearchMode;
pub use orchestrator::{
    SearchEvent, SearchOrchestrator, SearchOutcome, SearchPhase, SearchViewModel,
};
