use browser_core::{format_market_cap, Company, CompanyListView, CompanyRowView};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub fn render(view: &CompanyListView) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "Search: {} | Exchange: {} | Sector: {} | Showing: {}",
        if view.query.is_empty() { "-" } else { view.query.as_str() },
        view.exchange.as_deref().unwrap_or("All Exchanges"),
        view.sector.as_deref().unwrap_or("All Sectors"),
        match view.is_selected {
            None => "All Companies",
            Some(true) => "Selected Only",
            Some(false) => "Not Selected",
        }
    ));
    lines.push(format!(
        "Selected on this page: {} | {}",
        view.selected_on_page, view.showing_label
    ));

    if let Some(error) = &view.error {
        lines.push(format!("Error: {error}"));
    }
    if let Some(status) = &view.status {
        lines.push(status.clone());
    }

    if view.loading {
        lines.push("Loading...".to_string());
        return lines;
    }

    if view.empty_results {
        lines.push("No companies found. Try adjusting your search or filters.".to_string());
        return lines;
    }

    for (idx, row) in view.rows.iter().enumerate() {
        lines.push(render_row(idx + 1, row));
    }

    if view.total_pages > 1 {
        lines.push(format!("Page {} of {}", view.page, view.total_pages));
    }
    lines
}

fn render_row(number: usize, row: &CompanyRowView) -> String {
    let marker = if row.is_selected { '*' } else { ' ' };
    let mut line = format!(
        "{number:>3} {marker} {:<6} {:<32} {:<8} {:<22} {:>9}",
        row.ticker_symbol,
        truncate(&row.company_name, 32),
        row.exchange.as_deref().unwrap_or(""),
        truncate(row.sector.as_deref().unwrap_or(""), 22),
        row.market_cap
    );
    if let Some(date) = &row.selection_date {
        line.push_str(&format!("  Selected: {}", format_date(date)));
    }
    line
}

pub fn render_company(company: &Company) -> Vec<String> {
    let mut lines = vec![
        format!("{} - {}", company.ticker_symbol, company.company_name),
        format!("  Id:         {}", company.id),
        format!(
            "  Exchange:   {}",
            company.exchange.as_deref().unwrap_or("N/A")
        ),
        format!("  Sector:     {}", company.sector.as_deref().unwrap_or("N/A")),
        format!("  Market cap: {}", format_market_cap(company.market_cap)),
        format!(
            "  Selected:   {}",
            if company.is_selected { "yes" } else { "no" }
        ),
    ];
    if let Some(date) = &company.selection_date {
        lines.push(format!("  Since:      {}", format_date(date)));
    }
    if let Some(created) = &company.created_at {
        lines.push(format!("  Created:    {}", format_date(created)));
    }
    if let Some(updated) = &company.updated_at {
        lines.push(format!("  Updated:    {}", format_date(updated)));
    }
    lines
}

pub fn render_selections(companies: &[Company]) -> Vec<String> {
    if companies.is_empty() {
        return vec!["No companies are selected for data collection.".to_string()];
    }
    let mut lines = vec![format!("{} selected companies:", companies.len())];
    for company in companies {
        let since = company
            .selection_date
            .as_deref()
            .map(format_date)
            .unwrap_or_default();
        lines.push(format!(
            "  {:<6} {:<32} {}",
            company.ticker_symbol,
            truncate(&company.company_name, 32),
            since
        ));
    }
    lines
}

/// Calendar date for a server timestamp; unparseable values pass through.
pub fn format_date(raw: &str) -> String {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}
