use std::fmt::Write as _;

use search_core::{pagination::PageWindow, SearchViewModel};
use shared::protocol::CourseSummary;

fn rating(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

pub fn course_line(course: &CourseSummary) -> String {
    let mut line = format!("{}  {}", course.display_code(), course.title);
    if course.no_pre_reqs {
        line.push_str("  [no pre-reqs]");
    }
    let _ = write!(
        line,
        "\n    overall {}  useful {}  difficulty {}  workload {}  interest {}  teacher {}  ({} reviews)",
        rating(course.average_overall_rating),
        rating(course.average_usefulness_rating),
        rating(course.average_difficulty_rating),
        rating(course.average_workload_rating),
        rating(course.average_interest_rating),
        rating(course.average_teacher_rating),
        course.num_reviews,
    );
    let hubs = course.hub_requirements();
    if !hubs.is_empty() {
        let codes: Vec<_> = hubs.iter().map(|hub| hub.code()).collect();
        let _ = write!(line, "\n    hub: {}", codes.join(" "));
    }
    line
}

/// One-based page strip, e.g. `< 1 ... 4 5 [6] 7 8 ... 12 >`.
pub fn page_strip(window: &PageWindow) -> String {
    let mut parts = Vec::new();
    parts.push(if window.can_go_previous { "<" } else { " " }.to_string());
    if window.first_shortcut {
        parts.push("1".to_string());
        if window.leading_ellipsis {
            parts.push("...".to_string());
        }
    }
    for page in &window.pages {
        if *page == window.current {
            parts.push(format!("[{}]", page + 1));
        } else {
            parts.push((page + 1).to_string());
        }
    }
    if window.last_shortcut {
        if window.trailing_ellipsis {
            parts.push("...".to_string());
        }
        parts.push((window.last_page + 1).to_string());
    }
    parts.push(if window.can_go_next { ">" } else { " " }.to_string());
    parts.join(" ").trim().to_string()
}

pub fn view(view: &SearchViewModel, window: &PageWindow) -> String {
    let mut out = String::new();
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {error}");
    }
    if let Some(label) = view.results_label() {
        let _ = writeln!(out, "{label}");
    }
    for course in &view.results {
        let _ = writeln!(out, "{}", course_line(course));
    }
    if view.has_pagination_controls() {
        let _ = writeln!(
            out,
            "page {} of {}   {}",
            view.page.page_index + 1,
            view.page.total_pages,
            page_strip(window)
        );
    }
    out
}
