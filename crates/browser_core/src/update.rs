use crate::state::{LOAD_FAILED_MESSAGE, SELECTION_FAILED_MESSAGE};
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => {
            let load = reload(&mut state);
            vec![Effect::LoadFilterOptions, load]
        }
        Msg::SearchChanged(text) => {
            let query = state.query_mut();
            query.query = text;
            query.page = 1;
            vec![user_reload(&mut state)]
        }
        Msg::ExchangeChanged(exchange) => {
            let query = state.query_mut();
            query.exchange = exchange;
            query.page = 1;
            vec![user_reload(&mut state)]
        }
        Msg::SectorChanged(sector) => {
            let query = state.query_mut();
            query.sector = sector;
            query.page = 1;
            vec![user_reload(&mut state)]
        }
        Msg::SelectionFilterChanged(is_selected) => {
            let query = state.query_mut();
            query.is_selected = is_selected;
            query.page = 1;
            vec![user_reload(&mut state)]
        }
        Msg::PageChanged(page) => {
            if page == 0 {
                return (state, Vec::new());
            }
            state.query_mut().page = page;
            vec![user_reload(&mut state)]
        }
        Msg::NextPage => {
            let page = state.query_state().page;
            if page >= state.total_pages() {
                return (state, Vec::new());
            }
            state.query_mut().page = page + 1;
            vec![user_reload(&mut state)]
        }
        Msg::PreviousPage => {
            let page = state.query_state().page;
            if page <= 1 {
                return (state, Vec::new());
            }
            state.query_mut().page = page - 1;
            vec![user_reload(&mut state)]
        }
        Msg::ReloadRequested => vec![user_reload(&mut state)],
        Msg::ToggleSelection { company_id } => {
            // Only visible rows can be toggled; the displayed flag is the
            // server's last word, so request its inverse.
            match state.company(&company_id).map(|company| company.is_selected) {
                Some(is_selected) => vec![Effect::SelectCompany {
                    company_id,
                    selected: !is_selected,
                }],
                None => Vec::new(),
            }
        }
        Msg::SetSelection {
            company_id,
            selected,
        } => vec![Effect::SelectCompany {
            company_id,
            selected,
        }],
        Msg::CompaniesLoaded { request_id, result } => {
            if !state.is_current(request_id) {
                // Stale: a newer load was issued after this one.
                return (state, Vec::new());
            }
            match result {
                Ok(page) => state.apply_page(page),
                Err(failure) => state.apply_load_failure(failure.message_or(LOAD_FAILED_MESSAGE)),
            }
            Vec::new()
        }
        Msg::FilterOptionsLoaded(result) => {
            // A failure leaves the option lists empty; the view stays usable.
            if let Ok(options) = result {
                state.set_filter_options(options);
            }
            Vec::new()
        }
        Msg::SelectionCompleted { result, .. } => match result {
            Ok(ack) => {
                let status = Some(ack.message).filter(|message| !message.is_empty());
                state.set_status(status);
                vec![reload(&mut state)]
            }
            Err(failure) => {
                state.set_error(failure.message_or(SELECTION_FAILED_MESSAGE));
                Vec::new()
            }
        },
        Msg::ErrorDismissed => {
            state.clear_error();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// A reload the user asked for; the last selection acknowledgement no
/// longer describes what is on screen.
fn user_reload(state: &mut AppState) -> Effect {
    state.clear_status();
    reload(state)
}

fn reload(state: &mut AppState) -> Effect {
    let (request_id, query) = state.begin_load();
    Effect::LoadCompanies { request_id, query }
}
