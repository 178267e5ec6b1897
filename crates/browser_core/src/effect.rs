use crate::{CompanyId, CompanyQuery, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadCompanies {
        request_id: RequestId,
        query: CompanyQuery,
    },
    LoadFilterOptions,
    SelectCompany {
        company_id: CompanyId,
        selected: bool,
    },
}
