//! Company browser core: pure state machine and view-model helpers.
mod effect;
mod model;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

/// Identifies one company list request; later requests have larger ids.
pub type RequestId = u64;

pub use effect::Effect;
pub use model::{
    Company, CompanyId, CompanyPage, FilterOptions, RequestFailure, SelectionAck,
    SelectionRequest,
};
pub use msg::Msg;
pub use query::{build_query, total_pages, CompanyQuery, QueryState, PAGE_SIZE};
pub use state::{AppState, LOAD_FAILED_MESSAGE, SELECTION_FAILED_MESSAGE};
pub use update::update;
pub use view_model::{format_market_cap, format_with_commas, CompanyListView, CompanyRowView};
