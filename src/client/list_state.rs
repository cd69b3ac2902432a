use crate::dto::candidate_dto::{
    ListEnvelope, Pagination, DEFAULT_LIST_PER_PAGE, DEFAULT_SEARCH_PER_PAGE,
};
use crate::models::candidate::{Candidate, CandidateStatus};

/// Queries shorter than this never leave the client.
pub const MIN_QUERY_LEN: usize = 2;

/// What the view is currently showing: the paged listing, or results for a
/// submitted search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMode {
    Listing,
    Searching { query: String },
}

/// Outcome of a search submission. `Issue` carries the query a request
/// should be made with; everything else stays local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    Suppressed,
    Issue(String),
}

/// State machine behind the candidate list view. Typing into the search box
/// only updates `query_input`; a request is issued solely on explicit
/// submission, and only when the trimmed query is long enough.
#[derive(Debug, Clone)]
pub struct ListView {
    pub mode: ListMode,
    pub query_input: String,
    pub status_filter: Option<CandidateStatus>,
    pub page: u32,
    pub rows: Vec<Candidate>,
    pub pagination: Option<Pagination>,
    pub error: Option<String>,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    pub fn new() -> Self {
        Self {
            mode: ListMode::Listing,
            query_input: String::new(),
            status_filter: None,
            page: 1,
            rows: Vec::new(),
            pagination: None,
            error: None,
        }
    }

    pub fn per_page(&self) -> u32 {
        match self.mode {
            ListMode::Listing => DEFAULT_LIST_PER_PAGE,
            ListMode::Searching { .. } => DEFAULT_SEARCH_PER_PAGE,
        }
    }

    /// Keystroke in the search box. Never triggers a request.
    pub fn set_query(&mut self, input: impl Into<String>) {
        self.query_input = input.into();
    }

    /// Explicit submit (enter key or button). Short queries are suppressed
    /// and the view stays exactly as it was.
    pub fn submit_query(&mut self) -> SearchAction {
        let query = self.query_input.trim().to_string();
        // characters, not bytes: one multibyte character is still one character
        if query.chars().count() < MIN_QUERY_LEN {
            return SearchAction::Suppressed;
        }
        self.mode = ListMode::Searching { query: query.clone() };
        self.page = 1;
        self.error = None;
        SearchAction::Issue(query)
    }

    /// Clearing the box drops back to the plain listing on page one.
    pub fn clear_query(&mut self) {
        self.query_input.clear();
        self.mode = ListMode::Listing;
        self.page = 1;
        self.error = None;
    }

    /// Changing the status filter restarts the listing from page one.
    pub fn set_status_filter(&mut self, status: Option<CandidateStatus>) {
        self.status_filter = status;
        self.mode = ListMode::Listing;
        self.page = 1;
    }

    pub fn apply_page(&mut self, envelope: ListEnvelope) {
        self.page = envelope.pagination.current_page;
        self.rows = envelope.data;
        self.pagination = Some(envelope.pagination);
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// True when a request for the next page should be made.
    pub fn next_page(&mut self) -> bool {
        match self.pagination {
            Some(p) if self.page < p.last_page => {
                self.page += 1;
                true
            }
            _ => false,
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// After a create, update or delete the current page is re-fetched so the
    /// rows and totals reflect the server, not a local guess.
    pub fn after_mutation(&self) -> u32 {
        self.page
    }
}
