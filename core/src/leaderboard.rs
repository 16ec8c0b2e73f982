//! Leaderboard view state: filters, search, sort cycle, paging and the
//! latest fetched page.
//!
//! Every state change is followed by a fetch. A fetch is a [`RequestTicket`]
//! from [`LeaderboardController::request`]; only the result for the most
//! recently issued ticket is applied, so slow responses to old requests
//! cannot overwrite newer ones.

use clubboard_types::{
    FilterState, LabelDomain, LeaderboardEntry, PAGE_SIZE, PageState, SortColumn, SortState,
};

use crate::error::StoreError;
use crate::query::{LeaderboardPage, LeaderboardRequest, TableQuery};
use crate::store::ProfileStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// An issued fetch. Hand it back to [`LeaderboardController::apply`] with
/// the store's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    seq: u64,
    request: LeaderboardRequest,
}

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn request(&self) -> &LeaderboardRequest {
        &self.request
    }

    pub fn query(&self) -> TableQuery {
        self.request.to_query()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardController {
    filters: FilterState,
    sort: SortState,
    /// Highlighted header, `None` when the default sort is in effect.
    active_column: Option<SortColumn>,
    /// Whether the active column has had its second click.
    reversed: bool,
    search: String,
    page: PageState,
    page_size: usize,
    rows: Vec<LeaderboardEntry>,
    load: LoadState,
    issued: u64,
}

impl Default for LeaderboardController {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl LeaderboardController {
    /// `page_size` is clamped to `1..=PAGE_SIZE`.
    pub fn new(page_size: usize) -> Self {
        Self {
            filters: FilterState::default(),
            sort: SortState::default(),
            active_column: None,
            reversed: false,
            search: String::new(),
            page: PageState::default(),
            page_size: page_size.clamp(1, PAGE_SIZE),
            rows: Vec::new(),
            load: LoadState::Idle,
            issued: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn active_column(&self) -> Option<SortColumn> {
        self.active_column
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> u32 {
        self.page.page
    }

    pub fn has_next_page(&self) -> bool {
        self.page.has_next_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn rows(&self) -> &[LeaderboardEntry] {
        &self.rows
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State changes
    // ─────────────────────────────────────────────────────────────────────────

    /// Toggle a sidebar checkbox. Returns whether it is now selected.
    pub fn toggle_filter(&mut self, domain: LabelDomain, label: &str) -> bool {
        let selected = self.filters.toggle_label(domain, label);
        self.reset_page();
        selected
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.reset_page();
    }

    /// Returns false when the text is unchanged.
    pub fn set_search(&mut self, text: &str) -> bool {
        if self.search == text {
            return false;
        }
        self.search = text.to_string();
        self.reset_page();
        true
    }

    /// Header click: select, then reverse, then back to the default sort.
    pub fn click_column(&mut self, column: SortColumn) {
        if self.active_column != Some(column) {
            self.active_column = Some(column);
            self.reversed = false;
            self.sort = SortState {
                column,
                ascending: column.first_click_ascending(),
            };
        } else if !self.reversed {
            self.reversed = true;
            self.sort.ascending = !self.sort.ascending;
        } else {
            self.active_column = None;
            self.reversed = false;
            self.sort = SortState::default();
        }
        self.reset_page();
    }

    /// Back to page 1. Whether it has a successor is unknown until the new
    /// response arrives.
    fn reset_page(&mut self) {
        self.page = PageState::default();
    }

    /// Returns false when there is no next page.
    pub fn next_page(&mut self) -> bool {
        if !self.page.has_next_page {
            return false;
        }
        self.page.page += 1;
        true
    }

    /// Returns false when already on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.page.page <= 1 {
            return false;
        }
        self.page.page -= 1;
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fetching
    // ─────────────────────────────────────────────────────────────────────────

    pub fn current_request(&self) -> LeaderboardRequest {
        LeaderboardRequest {
            filters: self.filters.clone(),
            sort: self.sort,
            search: self.search.clone(),
            page: self.page.page,
            page_size: self.page_size,
        }
    }

    /// Issue a fetch for the current state. Any earlier ticket is now stale.
    pub fn request(&mut self) -> RequestTicket {
        self.issued += 1;
        self.load = LoadState::Loading;
        let request = self.current_request();
        tracing::debug!(
            seq = self.issued,
            page = request.page,
            sort = %request.sort.column,
            ascending = request.sort.ascending,
            search = %request.search,
            "leaderboard request"
        );
        RequestTicket {
            seq: self.issued,
            request,
        }
    }

    /// Apply a fetch result. Returns false if the ticket was stale and the
    /// result ignored.
    pub fn apply(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<LeaderboardEntry>, StoreError>,
    ) -> bool {
        if ticket.seq != self.issued {
            tracing::warn!(seq = ticket.seq, latest = self.issued, "discarding stale leaderboard response");
            return false;
        }
        match result {
            Ok(rows) => {
                let page = LeaderboardPage::from_rows(rows, self.page_size);
                self.rows = page.rows;
                self.page.has_next_page = page.has_next_page;
                self.load = LoadState::Loaded;
            }
            Err(e) => {
                tracing::warn!(seq = ticket.seq, error = %e, "leaderboard fetch failed");
                self.rows.clear();
                self.page.has_next_page = false;
                self.load = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// Issue, fetch and apply in one step.
    pub async fn refresh<S: ProfileStore>(&mut self, store: &S) -> &LoadState {
        let ticket = self.request();
        let result = store.select_leaderboard(&ticket.query()).await;
        self.apply(ticket, result);
        &self.load
    }
}
