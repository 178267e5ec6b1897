use std::io;
use std::sync::Arc;

use browser_core::{Effect, Msg};
use browser_engine::{CompanyApi, EngineCommand, EngineEvent, EngineHandle};
use browser_logging::{browser_debug, browser_info, browser_warn};

use super::ui::render;

/// What the front-end should do with a finished request.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Dispatch(Msg),
    Print(Vec<String>),
    Nothing,
}

pub struct EffectRunner {
    engine: EngineHandle,
    pending_selections: usize,
}

impl EffectRunner {
    pub fn new(api: Arc<dyn CompanyApi>) -> io::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(api)?,
            pending_selections: 0,
        })
    }

    /// Selection writes submitted but not yet answered.
    pub fn pending_selections(&self) -> usize {
        self.pending_selections
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match &effect {
                Effect::LoadCompanies { request_id, query } => {
                    browser_info!(
                        "LoadCompanies request_id={} page={} filters={}",
                        request_id,
                        query.page,
                        query.query_pairs().len().saturating_sub(2)
                    );
                }
                Effect::LoadFilterOptions => browser_info!("LoadFilterOptions"),
                Effect::SelectCompany {
                    company_id,
                    selected,
                } => {
                    browser_info!("SelectCompany company_id={} selected={}", company_id, selected);
                    self.pending_selections += 1;
                }
            }
            self.engine.submit(effect.into());
        }
    }

    /// Requests that bypass the view-model (health check, lookups).
    pub fn submit(&self, command: EngineCommand) {
        self.engine.submit(command);
    }

    pub fn drain(&mut self) -> Vec<EventOutcome> {
        let mut outcomes = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            if matches!(event, EngineEvent::SelectionCompleted { .. }) {
                self.pending_selections = self.pending_selections.saturating_sub(1);
            }
            outcomes.push(handle_event(event));
        }
        outcomes
    }
}

pub fn handle_event(event: EngineEvent) -> EventOutcome {
    match event {
        EngineEvent::CompaniesLoaded {
            request_id,
            result: Err(err),
        } => {
            browser_warn!("Load {} failed: {}", request_id, err);
            EventOutcome::Dispatch(Msg::CompaniesLoaded {
                request_id,
                result: Err(err.to_failure()),
            })
        }
        EngineEvent::FilterOptionsLoaded { result: Err(err) } => {
            browser_warn!("Failed to load filters: {}", err);
            EventOutcome::Dispatch(Msg::FilterOptionsLoaded(Err(err.to_failure())))
        }
        EngineEvent::SelectionCompleted {
            company_id,
            result: Err(err),
        } => {
            browser_warn!("Selection of {} failed: {}", company_id, err);
            EventOutcome::Dispatch(Msg::SelectionCompleted {
                company_id,
                result: Err(err.to_failure()),
            })
        }
        EngineEvent::CompanyFetched { company_id, result } => match result {
            Ok(company) => EventOutcome::Print(render::render_company(&company)),
            Err(err) => {
                browser_warn!("Lookup of {} failed: {}", company_id, err);
                let message = err
                    .to_failure()
                    .message_or(&format!("Failed to load company {company_id}"));
                EventOutcome::Print(vec![format!("Error: {message}")])
            }
        },
        EngineEvent::SelectedLoaded { result } => match result {
            Ok(companies) => EventOutcome::Print(render::render_selections(&companies)),
            Err(err) => {
                browser_warn!("Failed to load selections: {}", err);
                let message = err.to_failure().message_or("Failed to load selections");
                EventOutcome::Print(vec![format!("Error: {message}")])
            }
        },
        EngineEvent::HealthChecked { result } => {
            match result {
                Ok(health) => browser_info!("Backend health: {}", health.status),
                Err(err) => browser_warn!("Backend health check failed: {}", err),
            }
            EventOutcome::Nothing
        }
        other => {
            browser_debug!("Engine event {:?}", other);
            other
                .into_msg()
                .map_or(EventOutcome::Nothing, EventOutcome::Dispatch)
        }
    }
}
