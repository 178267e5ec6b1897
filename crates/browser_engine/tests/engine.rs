use std::collections::HashMap;
use std::sync::{Arc, Once};
use std::time::Duration;

use browser_core::{
    update, AppState, Company, CompanyPage, CompanyQuery, Effect, FilterOptions, Msg,
    SelectionAck, SelectionRequest,
};
use browser_engine::{
    ApiError, ApiSettings, CompanyApi, EngineCommand, EngineEvent, EngineHandle, FailureKind,
    HealthStatus, ReqwestCompanyApi,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(browser_logging::initialize_for_tests);
}

fn company(ticker: &str) -> Company {
    Company {
        id: format!("{ticker}-id"),
        ticker_symbol: ticker.to_string(),
        company_name: format!("{ticker} Corp"),
        exchange: Some("NYSE".to_string()),
        sector: None,
        market_cap: None,
        is_selected: false,
        selection_date: None,
        created_at: None,
        updated_at: None,
    }
}

fn not_found() -> ApiError {
    ApiError {
        kind: FailureKind::HttpStatus(404),
        message: "404 Not Found".to_string(),
        detail: None,
    }
}

/// Answers list requests with one company named after the search text,
/// after a per-search delay.
struct ScriptedApi {
    delays: HashMap<String, Duration>,
}

#[async_trait::async_trait]
impl CompanyApi for ScriptedApi {
    async fn list_companies(&self, query: &CompanyQuery) -> Result<CompanyPage, ApiError> {
        let text = query.query.clone().unwrap_or_default();
        let delay = self.delays.get(&text).copied().unwrap_or_default();
        tokio::time::sleep(delay).await;
        Ok(CompanyPage {
            companies: vec![company(&text)],
            total: 1,
            page: query.page,
            size: query.size,
        })
    }

    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        Ok(FilterOptions::default())
    }

    async fn select_company(
        &self,
        company_id: &str,
        request: &SelectionRequest,
    ) -> Result<SelectionAck, ApiError> {
        Ok(SelectionAck {
            company_id: company_id.to_string(),
            selected: request.selected,
            selection_date: None,
            message: String::new(),
        })
    }

    async fn get_company(&self, _company_id: &str) -> Result<Company, ApiError> {
        Err(not_found())
    }

    async fn selected_companies(&self) -> Result<Vec<Company>, ApiError> {
        Ok(Vec::new())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
        })
    }
}

fn submit_all(engine: &EngineHandle, effects: Vec<Effect>) -> usize {
    let count = effects.len();
    for effect in effects {
        engine.submit(effect.into());
    }
    count
}

/// Submits `effects`, then feeds each completion back through `update`,
/// following any effects those produce, until nothing is outstanding.
fn run_to_idle(engine: &EngineHandle, mut state: AppState, effects: Vec<Effect>) -> AppState {
    let mut outstanding = submit_all(engine, effects);
    while outstanding > 0 {
        let event = engine.recv_timeout(WAIT).expect("engine event");
        outstanding -= 1;
        let msg = event.into_msg().expect("view-model event");
        let (next, effects) = update(state, msg);
        state = next;
        outstanding += submit_all(engine, effects);
    }
    state
}

#[test]
fn slow_earlier_load_cannot_overwrite_newer_one() {
    init_logging();
    let api = ScriptedApi {
        delays: HashMap::from([
            ("slow".to_string(), Duration::from_millis(400)),
            ("fast".to_string(), Duration::from_millis(10)),
        ]),
    };
    let engine = EngineHandle::new(Arc::new(api)).expect("engine");

    let (state, effects_a) = update(AppState::new(), Msg::SearchChanged("slow".to_string()));
    let (mut state, effects_b) = update(state, Msg::SearchChanged("fast".to_string()));
    submit_all(&engine, effects_a);
    submit_all(&engine, effects_b);

    let first = engine.recv_timeout(WAIT).expect("first event");
    let second = engine.recv_timeout(WAIT).expect("second event");
    assert!(matches!(
        &first,
        EngineEvent::CompaniesLoaded { request_id: 2, .. }
    ));

    for event in [first, second] {
        let (next, effects) = update(state, event.into_msg().expect("load event"));
        assert!(effects.is_empty());
        state = next;
    }

    assert_eq!(state.items().len(), 1);
    assert_eq!(state.items()[0].ticker_symbol, "fast");
    assert!(!state.is_loading());
}

#[test]
fn mount_then_toggle_reflects_server_selection() {
    init_logging();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        let unselected = json!({
            "id": "AAPL-id",
            "ticker_symbol": "AAPL",
            "company_name": "Apple Inc.",
            "exchange": "NASDAQ",
            "is_selected": false
        });
        let selected = json!({
            "id": "AAPL-id",
            "ticker_symbol": "AAPL",
            "company_name": "Apple Inc.",
            "exchange": "NASDAQ",
            "is_selected": true,
            "selection_date": "2024-03-01"
        });
        Mock::given(method("GET"))
            .and(path("/api/v1/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "companies": [unselected], "total": 1, "page": 1, "size": 20
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "companies": [selected], "total": 1, "page": 1, "size": 20
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/companies/filters"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "exchanges": ["NASDAQ"], "sectors": []
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/companies/AAPL-id/select"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "company_id": "AAPL-id",
                "selected": true,
                "selection_date": "2024-03-01",
                "message": "Company AAPL selected for data collection"
            })))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let api = ReqwestCompanyApi::new(ApiSettings {
        base_url: format!("{}/api/v1", server.uri()),
        ..ApiSettings::default()
    })
    .expect("client");
    let engine = EngineHandle::new(Arc::new(api)).expect("engine");

    let (state, effects) = update(AppState::new(), Msg::Mounted);
    let state = run_to_idle(&engine, state, effects);
    let view = state.view();
    assert_eq!(view.exchanges, vec!["NASDAQ"]);
    assert!(!view.rows[0].is_selected);

    let (state, effects) = update(
        state,
        Msg::ToggleSelection {
            company_id: "AAPL-id".to_string(),
        },
    );
    let state = run_to_idle(&engine, state, effects);
    let view = state.view();
    assert!(view.rows[0].is_selected);
    assert_eq!(view.rows[0].selection_date.as_deref(), Some("2024-03-01"));
    assert_eq!(view.error, None);
}

#[test]
fn server_failure_reaches_view_as_detail() {
    init_logging();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/companies"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "detail": "database unavailable" })),
            )
            .mount(&server)
            .await;
        server
    });

    let api = ReqwestCompanyApi::new(ApiSettings {
        base_url: format!("{}/api/v1", server.uri()),
        ..ApiSettings::default()
    })
    .expect("client");
    let engine = EngineHandle::new(Arc::new(api)).expect("engine");

    let (state, effects) = update(AppState::new(), Msg::ReloadRequested);
    let state = run_to_idle(&engine, state, effects);
    let view = state.view();
    assert_eq!(view.error.as_deref(), Some("database unavailable"));
    assert!(view.rows.is_empty());
    assert_eq!(view.total_pages, 1);
}

#[test]
fn lookups_are_reported_outside_the_view_model() {
    init_logging();
    let engine = EngineHandle::new(Arc::new(ScriptedApi {
        delays: HashMap::new(),
    }))
    .expect("engine");

    engine.submit(EngineCommand::CheckHealth);
    let event = engine.recv_timeout(WAIT).expect("health event");
    assert_eq!(
        event,
        EngineEvent::HealthChecked {
            result: Ok(HealthStatus {
                status: "healthy".to_string()
            })
        }
    );
    assert_eq!(event.into_msg(), None);

    engine.submit(EngineCommand::FetchCompany {
        company_id: "nope".to_string(),
    });
    match engine.recv_timeout(WAIT).expect("fetch event") {
        EngineEvent::CompanyFetched { company_id, result } => {
            assert_eq!(company_id, "nope");
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(404));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn dropping_the_handle_finishes_outstanding_selection() {
    init_logging();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/companies/AAPL-id/select"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "company_id": "AAPL-id",
                        "selected": true,
                        "message": "Company AAPL selected for data collection"
                    }))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let api = ReqwestCompanyApi::new(ApiSettings {
        base_url: format!("{}/api/v1", server.uri()),
        ..ApiSettings::default()
    })
    .expect("client");
    let engine = EngineHandle::new(Arc::new(api)).expect("engine");
    engine.submit(EngineCommand::SelectCompany {
        company_id: "AAPL-id".to_string(),
        selected: true,
    });
    drop(engine);

    let received = runtime
        .block_on(server.received_requests())
        .unwrap_or_default();
    let posts = received
        .iter()
        .filter(|request| request.method.as_str() == "POST")
        .count();
    assert_eq!(posts, 1);
}
