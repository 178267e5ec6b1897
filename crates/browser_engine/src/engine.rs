use std::io;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use browser_core::SelectionRequest;
use browser_logging::{browser_debug, browser_warn};
use tokio::task::JoinSet;

use crate::client::CompanyApi;
use crate::{EngineCommand, EngineEvent};

/// Upper bound on how long dropping the handle waits for outstanding requests.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Runs API requests on a background tokio runtime.
///
/// Commands are started as soon as they are submitted and run concurrently;
/// events come back in completion order, so callers must tolerate a slow
/// earlier request finishing after a newer one.
///
/// Dropping the handle blocks until every submitted request has finished,
/// or [`SHUTDOWN_GRACE`] has elapsed.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn CompanyApi>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        let worker = thread::Builder::new()
            .name("browser-engine".to_string())
            .spawn(move || {
                let mut tasks = JoinSet::new();
                while let Ok(command) = cmd_rx.recv() {
                    while tasks.try_join_next().is_some() {}
                    let api = api.clone();
                    let event_tx = event_tx.clone();
                    tasks.spawn_on(
                        async move {
                            let event = handle_command(api.as_ref(), command).await;
                            let _ = event_tx.send(event);
                        },
                        runtime.handle(),
                    );
                }
                if !tasks.is_empty() {
                    browser_debug!("waiting for {} outstanding request(s)", tasks.len());
                }
                let drained = runtime.block_on(async {
                    tokio::time::timeout(SHUTDOWN_GRACE, async {
                        while tasks.join_next().await.is_some() {}
                    })
                    .await
                });
                if drained.is_err() {
                    browser_warn!("abandoning {} request(s) still running at shutdown", tasks.len());
                }
                runtime.shutdown_background();
            })?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            event_rx,
            worker: Some(worker),
        })
    }

    pub fn submit(&self, command: EngineCommand) {
        if let Some(cmd_tx) = &self.cmd_tx {
            let _ = cmd_tx.send(command);
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        // Closing the command channel ends the worker's receive loop.
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

async fn handle_command(api: &dyn CompanyApi, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::LoadCompanies { request_id, query } => {
            browser_debug!("load request_id={} page={}", request_id, query.page);
            let result = api.list_companies(&query).await;
            EngineEvent::CompaniesLoaded { request_id, result }
        }
        EngineCommand::LoadFilterOptions => EngineEvent::FilterOptionsLoaded {
            result: api.filter_options().await,
        },
        EngineCommand::SelectCompany {
            company_id,
            selected,
        } => {
            let request = SelectionRequest {
                selected,
                notes: None,
            };
            let result = api.select_company(&company_id, &request).await;
            EngineEvent::SelectionCompleted { company_id, result }
        }
        EngineCommand::FetchCompany { company_id } => {
            let result = api.get_company(&company_id).await;
            EngineEvent::CompanyFetched { company_id, result }
        }
        EngineCommand::LoadSelected => EngineEvent::SelectedLoaded {
            result: api.selected_companies().await,
        },
        EngineCommand::CheckHealth => EngineEvent::HealthChecked {
            result: api.health().await,
        },
    }
}
