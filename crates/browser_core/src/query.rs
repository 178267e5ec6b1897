/// Fixed page size for the company list.
pub const PAGE_SIZE: u32 = 20;

/// Client-owned filter and pagination state. Fully determines the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub query: String,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub is_selected: Option<bool>,
    pub page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            query: String::new(),
            exchange: None,
            sector: None,
            is_selected: None,
            page: 1,
        }
    }
}

/// Request parameters for `GET /companies`. `None` means "filter absent".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyQuery {
    pub query: Option<String>,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub is_selected: Option<bool>,
    pub page: u32,
    pub size: u32,
}

impl CompanyQuery {
    /// URL parameters in a stable order. Absent filters are left out entirely.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(6);
        if let Some(query) = &self.query {
            pairs.push(("query", query.clone()));
        }
        if let Some(exchange) = &self.exchange {
            pairs.push(("exchange", exchange.clone()));
        }
        if let Some(sector) = &self.sector {
            pairs.push(("sector", sector.clone()));
        }
        if let Some(is_selected) = self.is_selected {
            pairs.push(("is_selected", is_selected.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("size", self.size.to_string()));
        pairs
    }
}

/// Maps query state to a request. Empty or whitespace-only text never
/// leaks into the request as an empty filter.
pub fn build_query(state: &QueryState) -> CompanyQuery {
    CompanyQuery {
        query: non_empty(Some(state.query.as_str())),
        exchange: non_empty(state.exchange.as_deref()),
        sector: non_empty(state.sector.as_deref()),
        is_selected: state.is_selected,
        page: state.page.max(1),
        size: PAGE_SIZE,
    }
}

/// `ceil(total / PAGE_SIZE)`, never less than one.
pub fn total_pages(total: u64) -> u32 {
    let pages = total.div_ceil(u64::from(PAGE_SIZE)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
