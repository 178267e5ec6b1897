use crate::{Company, CompanyId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyListView {
    pub query: String,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub is_selected: Option<bool>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
    pub rows: Vec<CompanyRowView>,
    pub showing_label: String,
    /// Number of visible rows currently marked as selected.
    pub selected_on_page: usize,
    pub loading: bool,
    pub error: Option<String>,
    /// Last acknowledgement from the selection endpoint.
    pub status: Option<String>,
    /// True when a finished load matched nothing, as opposed to failing.
    pub empty_results: bool,
    pub exchanges: Vec<String>,
    pub sectors: Vec<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRowView {
    pub company_id: CompanyId,
    pub ticker_symbol: String,
    pub company_name: String,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub market_cap: String,
    pub is_selected: bool,
    pub selection_date: Option<String>,
}

impl From<&Company> for CompanyRowView {
    fn from(company: &Company) -> Self {
        Self {
            company_id: company.id.clone(),
            ticker_symbol: company.ticker_symbol.clone(),
            company_name: company.company_name.clone(),
            exchange: company.exchange.clone(),
            sector: company.sector.clone(),
            market_cap: format_market_cap(company.market_cap),
            is_selected: company.is_selected,
            selection_date: company.selection_date.clone(),
        }
    }
}

/// Compact currency label: `$2.9T`, `$45.1B`, `$812.0M`, or the full amount
/// with thousands separators below one million.
pub fn format_market_cap(market_cap: Option<f64>) -> String {
    let value = match market_cap {
        Some(value) if value.is_finite() && value != 0.0 => value,
        _ => return "N/A".to_string(),
    };
    if value >= 1e12 {
        format!("${:.1}T", value / 1e12)
    } else if value >= 1e9 {
        format!("${:.1}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.1}M", value / 1e6)
    } else {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{sign}${}", format_with_commas(value.abs().round() as u64))
    }
}

pub fn format_with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
