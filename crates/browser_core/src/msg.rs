use crate::{CompanyId, CompanyPage, FilterOptions, RequestFailure, RequestId, SelectionAck};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// View opened; load filter options and the first page.
    Mounted,
    /// User submitted free-text search (ticker or name).
    SearchChanged(String),
    /// User picked an exchange, or `None` for all exchanges.
    ExchangeChanged(Option<String>),
    /// User picked a sector, or `None` for all sectors.
    SectorChanged(Option<String>),
    /// User picked selected-only, unselected-only, or all.
    SelectionFilterChanged(Option<bool>),
    /// User jumped to a 1-based page.
    PageChanged(u32),
    NextPage,
    PreviousPage,
    /// User asked to re-submit the current query.
    ReloadRequested,
    /// User flipped the selected flag of a visible company.
    ToggleSelection { company_id: CompanyId },
    /// User set the selected flag of a company explicitly.
    SetSelection { company_id: CompanyId, selected: bool },
    /// Engine completion for a company list request.
    CompaniesLoaded {
        request_id: RequestId,
        result: Result<CompanyPage, RequestFailure>,
    },
    /// Engine completion for the filter option request.
    FilterOptionsLoaded(Result<FilterOptions, RequestFailure>),
    /// Engine completion for a selection mutation.
    SelectionCompleted {
        company_id: CompanyId,
        result: Result<SelectionAck, RequestFailure>,
    },
    /// User closed the error banner.
    ErrorDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
