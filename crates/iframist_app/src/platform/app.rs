use std::io::{self, Stdout};
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute};
use iframist_engine::{CopyService, ReqwestScrapeClient, ScrapeClient, ScrapeWorkflow};
use iframist_logging::{iframist_error, iframist_info};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use super::config;
use super::logging;
use super::ui::input::UiCommand;
use super::ui::render::TerminalView;

type Workflow = ScrapeWorkflow<TerminalView<CrosstermBackend<Stdout>>>;

pub fn run_app() -> anyhow::Result<()> {
    let (config, config_file) = config::load()?;
    logging::initialize(&config);
    match &config_file {
        Some(path) if path.exists() => iframist_info!("Loaded config from {:?}", path),
        Some(path) => iframist_info!("No config at {:?}; using defaults", path),
        None => iframist_info!("No config directory; using defaults"),
    }
    iframist_info!("Starting iframist against {}", config.endpoint);

    let client: Arc<dyn ScrapeClient> = Arc::new(ReqwestScrapeClient::new(
        &config.endpoint,
        config.client_settings(),
    )?);
    let copier = Arc::new(CopyService::platform(config.fallback_command.as_deref()));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let result = {
        let _guard = TerminalGuard::enter().context("failed to prepare terminal")?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let view = TerminalView::new(terminal);
        runtime.block_on(async move {
            let workflow = ScrapeWorkflow::new(view, client, copier);
            event_loop(workflow).await
        })
    };

    // Outstanding clipboard writes must not hold up exit.
    runtime.shutdown_background();
    if let Err(err) = &result {
        iframist_error!("iframist stopped: {:#}", err);
    }
    result
}

async fn event_loop(mut workflow: Workflow) -> anyhow::Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    spawn_event_reader(event_tx);

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                let event = event.context("failed to read terminal event")?;
                match workflow.view_mut().handle_event(event) {
                    UiCommand::None => {}
                    UiCommand::Redraw => workflow.view_mut().redraw(),
                    UiCommand::Submit(text) => workflow.submit(&text),
                    UiCommand::CopyRow(index) => workflow.copy_one(index),
                    UiCommand::CopyAll => workflow.copy_all(),
                    UiCommand::Quit => break,
                }
            }
            Some(msg) = workflow.next_msg() => workflow.dispatch(msg),
        }
    }

    iframist_info!("Quit with {} task(s) outstanding", workflow.pending());
    Ok(())
}

/// crossterm's `read` blocks, so it gets its own thread.
fn spawn_event_reader(tx: mpsc::UnboundedSender<io::Result<Event>>) {
    thread::spawn(move || loop {
        let event = event::read();
        let failed = event.is_err();
        if tx.send(event).is_err() || failed {
            break;
        }
    });
}

/// Raw mode plus alternate screen, restored on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
        let _ = disable_raw_mode();
    }
}
