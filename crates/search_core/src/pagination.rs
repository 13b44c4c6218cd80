//! Page bookkeeping and the windowed page-number strip.

use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PaginationLayout {
    #[default]
    Desktop,
    Mobile,
}

impl PaginationLayout {
    pub fn width(self) -> u32 {
        match self {
            PaginationLayout::Desktop => 5,
            PaginationLayout::Mobile => 3,
        }
    }
}

impl FromStr for PaginationLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(PaginationLayout::Desktop),
            "mobile" => Ok(PaginationLayout::Mobile),
            other => Err(format!("unknown pagination layout '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub page_index: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl PageState {
    pub fn empty(page_size: u32) -> Self {
        Self {
            page_index: 0,
            page_size,
            total_elements: 0,
            total_pages: 0,
        }
    }

    /// Controls are only shown when there is somewhere to go.
    pub fn has_controls(&self) -> bool {
        self.total_pages > 1
    }

    pub fn window(&self, layout: PaginationLayout) -> PageWindow {
        if self.total_pages == 0 {
            return PageWindow::default();
        }
        let width = layout.width();
        let start = self.page_index.saturating_sub(width / 2);
        let end = self.total_pages.min(start + width);
        PageWindow {
            current: self.page_index,
            pages: (start..end).collect(),
            first_shortcut: start > 0,
            leading_ellipsis: start > 1,
            last_shortcut: end < self.total_pages,
            trailing_ellipsis: end + 1 < self.total_pages,
            last_page: self.total_pages - 1,
            can_go_previous: self.page_index > 0,
            can_go_next: self.page_index + 1 < self.total_pages,
        }
    }
}

/// Zero-based page numbers to render around the current page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PageWindow {
    pub current: u32,
    pub pages: Vec<u32>,
    pub first_shortcut: bool,
    pub leading_ellipsis: bool,
    pub last_shortcut: bool,
    pub trailing_ellipsis: bool,
    pub last_page: u32,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Fetch(u32),
    AlreadyShown,
    OutOfRange,
}

#[derive(Debug, Clone)]
pub struct PaginationController {
    state: PageState,
}

impl PaginationController {
    pub fn new(page_size: u32) -> Self {
        Self {
            state: PageState::empty(page_size),
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Decides whether page `n` warrants a request. Never mutates state; the
    /// page only moves once a response for it is applied.
    pub fn request_page(&self, n: i64) -> PageRequest {
        if n < 0 || n >= i64::from(self.state.total_pages) {
            return PageRequest::OutOfRange;
        }
        let target = n as u32;
        if target == self.state.page_index {
            PageRequest::AlreadyShown
        } else {
            PageRequest::Fetch(target)
        }
    }

    pub fn apply_response(
        &mut self,
        total_elements: u64,
        total_pages: u32,
        returned_page_index: u32,
        page_size: u32,
    ) {
        let total_pages = if total_elements == 0 { 0 } else { total_pages };
        let page_index = if total_pages == 0 {
            0
        } else {
            returned_page_index.min(total_pages - 1)
        };
        let page_size = if page_size == 0 {
            self.state.page_size
        } else {
            page_size
        };
        self.state = PageState {
            page_index,
            page_size,
            total_elements,
            total_pages,
        };
    }

    pub fn window(&self, layout: PaginationLayout) -> PageWindow {
        self.state.window(layout)
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
