use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use browser_core::{update, AppState, Msg};
use browser_engine::{EngineCommand, ReqwestCompanyApi};
use browser_logging::browser_info;
use clap::Parser;
use log::LevelFilter;

use super::config::{load_config, DEFAULT_CONFIG_FILE};
use super::effects::{EffectRunner, EventOutcome};
use super::logging::{self, LogDestination};
use super::ui::input::{parse_command, Command, HELP};
use super::ui::render;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Browse US-listed companies and mark them for SEC data collection.
#[derive(Debug, Parser)]
#[command(name = "company-browser", version)]
pub struct Args {
    /// RON configuration file with base_url, api_key and timeouts.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
    /// Overrides the configured API base url.
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,
    /// Log debug output, including request urls.
    #[arg(long)]
    pub verbose: bool,
}

pub fn run_app(args: Args) -> anyhow::Result<()> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(args.log, level);

    let mut config = load_config(&args.config)?.with_env(|name| std::env::var(name).ok());
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    browser_info!("Using API at {}", config.base_url);

    let api = ReqwestCompanyApi::new(config.api_settings()).context("invalid API settings")?;
    let runner = EffectRunner::new(Arc::new(api)).context("failed to start request engine")?;
    runner.submit(EngineCommand::CheckHealth);

    let lines = spawn_stdin_reader();
    // Unlocked handle: engine threads may log to stdout while the session runs.
    let mut session = Session::new(runner, io::stdout());
    session.print(&["Type 'help' for commands.".to_string()])?;
    session.dispatch(Msg::Mounted);

    let mut input_closed = false;
    let mut quitting = false;
    loop {
        session.pump()?;

        if quitting || input_closed {
            // Piped input also waits for the outstanding load.
            if session.can_exit(quitting) {
                break;
            }
            thread::sleep(POLL_INTERVAL);
            continue;
        }

        match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                let Some(command) = parse_command(&line, &session.state.view()) else {
                    continue;
                };
                match command {
                    Command::Dispatch(msg) => session.dispatch(msg),
                    Command::ShowCompany(company_id) => {
                        session.runner.submit(EngineCommand::FetchCompany { company_id });
                    }
                    Command::ShowSelections => session.runner.submit(EngineCommand::LoadSelected),
                    Command::ShowHelp => session.print(&[HELP.to_string()])?,
                    Command::Invalid(message) => session.print(&[message])?,
                    Command::Quit => quitting = true,
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => input_closed = true,
        }
    }

    browser_info!("Exiting");
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    line_rx
}

struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> Session<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
        }
    }

    /// Applies every finished request, then renders if anything changed.
    fn pump(&mut self) -> io::Result<()> {
        for outcome in self.runner.drain() {
            match outcome {
                EventOutcome::Dispatch(msg) => self.dispatch(msg),
                EventOutcome::Print(text) => self.print(&text)?,
                EventOutcome::Nothing => {}
            }
        }
        self.render_if_dirty()
    }

    /// Selection writes are always awaited; a quit skips the pending load.
    fn can_exit(&self, quitting: bool) -> bool {
        self.runner.pending_selections() == 0 && (quitting || !self.state.is_loading())
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn render_if_dirty(&mut self) -> io::Result<()> {
        if !self.state.consume_dirty() {
            return Ok(());
        }
        let lines = render::render(&self.state.view());
        writeln!(self.out)?;
        self.print(&lines)
    }

    fn print(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}
