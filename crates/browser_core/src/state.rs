use crate::query::{build_query, total_pages};
use crate::view_model::{CompanyListView, CompanyRowView};
use crate::{Company, CompanyPage, CompanyQuery, FilterOptions, QueryState, RequestId, PAGE_SIZE};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load companies";
pub const SELECTION_FAILED_MESSAGE: &str = "Failed to update company selection";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    query: QueryState,
    items: Vec<Company>,
    total: u64,
    filter_options: FilterOptions,
    error: Option<String>,
    status: Option<String>,
    last_request_id: RequestId,
    in_flight: Option<RequestId>,
    /// Set once any load has completed, successfully or not.
    loaded: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> CompanyListView {
        let rows: Vec<CompanyRowView> = self.items.iter().map(CompanyRowView::from).collect();
        let loading = self.is_loading();
        let selected_on_page = rows.iter().filter(|row| row.is_selected).count();
        CompanyListView {
            query: self.query.query.clone(),
            exchange: self.query.exchange.clone(),
            sector: self.query.sector.clone(),
            is_selected: self.query.is_selected,
            page: self.query.page,
            page_size: PAGE_SIZE,
            total: self.total,
            total_pages: self.total_pages(),
            showing_label: format!("Showing {} of {} companies", rows.len(), self.total),
            empty_results: self.loaded && !loading && rows.is_empty() && self.error.is_none(),
            selected_on_page,
            rows,
            loading,
            error: self.error.clone(),
            status: self.status.clone(),
            exchanges: self.filter_options.exchanges.clone(),
            sectors: self.filter_options.sectors.clone(),
            dirty: self.dirty,
        }
    }

    pub fn query_state(&self) -> &QueryState {
        &self.query
    }

    pub fn items(&self) -> &[Company] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The most recently issued load, whether or not it has completed.
    pub fn latest_request_id(&self) -> RequestId {
        self.last_request_id
    }

    pub fn company(&self, company_id: &str) -> Option<&Company> {
        self.items.iter().find(|company| company.id == company_id)
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn query_mut(&mut self) -> &mut QueryState {
        &mut self.query
    }

    /// Starts a new load of the current query. Any earlier load still in
    /// flight becomes stale.
    pub(crate) fn begin_load(&mut self) -> (RequestId, CompanyQuery) {
        self.last_request_id += 1;
        self.in_flight = Some(self.last_request_id);
        self.error = None;
        self.dirty = true;
        (self.last_request_id, build_query(&self.query))
    }

    /// Whether `request_id` is the load the view is waiting for.
    pub(crate) fn is_current(&self, request_id: RequestId) -> bool {
        self.in_flight == Some(request_id)
    }

    pub(crate) fn apply_page(&mut self, page: CompanyPage) {
        self.in_flight = None;
        self.loaded = true;
        self.items = page.companies;
        self.total = page.total;
        self.dirty = true;
    }

    pub(crate) fn apply_load_failure(&mut self, message: String) {
        self.in_flight = None;
        self.loaded = true;
        self.items.clear();
        self.total = 0;
        self.error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn set_filter_options(&mut self, options: FilterOptions) {
        self.filter_options = options;
        self.dirty = true;
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn clear_error(&mut self) -> bool {
        let had_error = self.error.take().is_some();
        if had_error {
            self.dirty = true;
        }
        had_error
    }

    pub(crate) fn clear_status(&mut self) {
        if self.status.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn set_status(&mut self, status: Option<String>) {
        self.status = status;
        self.dirty = true;
    }
}
