mod render;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use search_core::{
    config::{load_settings, load_settings_from_path},
    pagination::PaginationLayout,
    CatalogApi, HttpCatalogApi, SearchOrchestrator, SearchOutcome, Settings,
};
use shared::domain::{College, HubRequirement, SortKey};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Browse the course catalog from the terminal")]
struct Cli {
    /// Settings file; defaults to ./course_search.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    catalog_url: Option<String>,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[arg(long)]
    layout: Option<PaginationLayout>,
    /// Print the view model as JSON instead of text.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filtered listing.
    Facets(FacetArgs),
    /// Free-text lookup by course code or title.
    Query {
        text: String,
        #[arg(long, default_value_t = 0)]
        page: i64,
    },
    Departments {
        college: College,
    },
    Colleges,
}

#[derive(ClapArgs, Debug)]
struct FacetArgs {
    #[arg(long)]
    college: Option<College>,
    #[arg(long, requires = "college")]
    department: Option<String>,
    #[arg(long = "hub")]
    hubs: Vec<HubRequirement>,
    #[arg(long)]
    no_prereqs: bool,
    #[arg(long)]
    min_rating: Option<f64>,
    #[arg(long)]
    max_difficulty: Option<u8>,
    #[arg(long)]
    max_workload: Option<u8>,
    #[arg(long)]
    min_usefulness: Option<f64>,
    #[arg(long)]
    min_interest: Option<f64>,
    #[arg(long)]
    min_teacher: Option<f64>,
    #[arg(long)]
    min_course_code: Option<u32>,
    #[arg(long)]
    min_reviews: Option<u32>,
    /// course-code, rating or reviews
    #[arg(long)]
    sort: Option<SortKey>,
    #[arg(long, default_value_t = 0)]
    page: i64,
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => load_settings_from_path(path)?,
        None => load_settings()?,
    };
    if let Some(url) = &cli.catalog_url {
        settings.catalog_url = search_core::config::normalize_catalog_url(url);
    }
    if let Some(size) = cli.page_size.filter(|size| *size > 0) {
        settings.page_size = size;
    }
    if let Some(ms) = cli.timeout_ms.filter(|ms| *ms > 0) {
        settings.request_timeout = Duration::from_millis(ms);
    }
    if let Some(layout) = cli.layout {
        settings.pagination_layout = layout;
    }
    Ok(settings)
}

async fn apply_facets(search: &SearchOrchestrator, args: &FacetArgs) -> Result<()> {
    if let Some(college) = args.college {
        let facets = search.set_college(Some(college)).await;
        if let Some(warning) = facets.department_error {
            eprintln!("warning: {warning}");
        }
    }
    if let Some(department) = args.department.as_deref() {
        search.set_department(Some(department)).await?;
    }
    for hub in &args.hubs {
        search.toggle_hub_requirement(*hub).await;
    }
    search.set_no_prerequisites_only(args.no_prereqs).await;
    if let Some(rating) = args.min_rating {
        search.set_minimum_rating(rating).await;
    }
    search
        .update_facets(|facets| {
            if let Some(value) = args.max_difficulty {
                facets.set_max_difficulty(value);
            }
            if let Some(value) = args.max_workload {
                facets.set_max_workload(value);
            }
            if let Some(value) = args.min_usefulness {
                facets.set_min_usefulness(value);
            }
            if let Some(value) = args.min_interest {
                facets.set_min_interest(value);
            }
            if let Some(value) = args.min_teacher {
                facets.set_min_teacher(value);
            }
            facets.set_min_course_code(args.min_course_code);
            facets.set_min_review_count(args.min_reviews);
            facets.set_sort_key(args.sort);
        })
        .await;
    Ok(())
}

async fn show(search: &SearchOrchestrator, json: bool) -> Result<()> {
    let view = search.view_model().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::view(&view, &search.page_window().await));
    }
    Ok(())
}

/// Runs the first page, then moves to `page` if one was asked for.
async fn search_and_page(
    search: &SearchOrchestrator,
    first: SearchOutcome,
    page: i64,
    json: bool,
) -> Result<()> {
    let mut outcome = first;
    if outcome == SearchOutcome::Committed && page != 0 {
        outcome = search.request_page(page).await;
        if outcome == SearchOutcome::NoChange {
            let total = search.view_model().await.page.total_pages;
            eprintln!("page {page} is outside 0..{total}; showing the first page");
        }
    }
    show(search, json).await?;
    match outcome {
        SearchOutcome::Failed(err) | SearchOutcome::Rejected(err) => Err(anyhow!(err)),
        _ => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    info!(
        catalog_url = %settings.catalog_url,
        page_size = settings.page_size,
        "course search starting"
    );

    let api = Arc::new(HttpCatalogApi::new(settings.catalog_url.clone()));
    let search = SearchOrchestrator::new(api.clone(), &settings);

    match &cli.command {
        Command::Facets(args) => {
            apply_facets(&search, args).await?;
            let outcome = search.submit_faceted().await;
            search_and_page(&search, outcome, args.page, cli.json).await?;
        }
        Command::Query { text, page } => {
            let outcome = search.submit_direct(text).await;
            search_and_page(&search, outcome, *page, cli.json).await?;
        }
        Command::Departments { college } => {
            let facets = search.set_college(Some(*college)).await;
            if let Some(error) = facets.department_error {
                bail!(error);
            }
            if facets.departments.is_empty() {
                println!("{} ({}) lists no departments", college, college.label());
            }
            for department in facets.departments {
                println!("{department}");
            }
        }
        Command::Colleges => {
            for code in api.colleges().await? {
                match code.parse::<College>() {
                    Ok(college) => println!("{:<4} {}", college.code(), college.label()),
                    Err(_) => println!("{code:<4} (not a known college code)"),
                }
            }
        }
    }

    Ok(())
}
