use std::sync::Arc;

use iframist_core::{update, AppState, Effect, Msg, ScrapeResult, ViewStateController};
use iframist_logging::{iframist_debug, iframist_info, iframist_warn};
use tokio::sync::mpsc;

use crate::{CopyService, ScrapeClient, ScrapeRequest};

/// Drives the request lifecycle: runs `update`, renders dirty state and
/// executes effects as tokio tasks that each report back exactly one `Msg`.
///
/// All state changes happen on the caller's task; methods that execute
/// effects must be called from within a tokio runtime.
pub struct ScrapeWorkflow<V> {
    state: AppState,
    view: V,
    client: Arc<dyn ScrapeClient>,
    copier: Arc<CopyService>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
    pending: usize,
}

impl<V: ViewStateController> ScrapeWorkflow<V> {
    /// Creates the workflow and renders the initial `Idle` view.
    pub fn new(view: V, client: Arc<dyn ScrapeClient>, copier: Arc<CopyService>) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let mut workflow = Self {
            state: AppState::new(),
            view,
            client,
            copier,
            msg_tx,
            msg_rx,
            pending: 0,
        };
        let initial = workflow.state.view();
        workflow.view.render(&initial);
        workflow
    }

    pub fn submit(&mut self, raw_input: &str) {
        self.dispatch(Msg::Submit(raw_input.to_string()));
    }

    /// Copies the URL of result row `index` (0-based).
    pub fn copy_one(&mut self, index: usize) {
        self.dispatch(Msg::CopyRowClicked(index));
    }

    pub fn copy_all(&mut self) {
        self.dispatch(Msg::CopyAllClicked);
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        if was_dirty {
            let view = self.state.view();
            iframist_debug!("render display={}", view.display.name());
            self.view.render(&view);
        }
        for effect in effects {
            self.run_effect(effect);
        }
    }

    /// Waits for the next task report. Cancellation safe.
    pub async fn next_msg(&mut self) -> Option<Msg> {
        let msg = self.msg_rx.recv().await?;
        self.pending = self.pending.saturating_sub(1);
        Some(msg)
    }

    /// Applies one task report. Returns `false` when no task is outstanding.
    pub async fn step(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        match self.next_msg().await {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Applies task reports until none are outstanding, timers included.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Number of spawned tasks that have not reported back yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    fn run_effect(&mut self, effect: Effect) {
        self.pending += 1;
        match effect {
            Effect::PerformScrape { request_id, url } => {
                iframist_info!("PerformScrape request_id={} url={}", request_id, url);
                let client = Arc::clone(&self.client);
                let reply = ReplyGuard::new(
                    self.msg_tx.clone(),
                    Msg::ScrapeFinished {
                        request_id,
                        result: ScrapeResult::transport_failure(),
                    },
                );
                tokio::spawn(async move {
                    let request = ScrapeRequest::new(url);
                    let result = client.perform_request(&request).await;
                    iframist_info!(
                        "ScrapeFinished request_id={} outcome={}",
                        request_id,
                        describe(&result)
                    );
                    reply.send(Msg::ScrapeFinished { request_id, result });
                });
            }
            Effect::CopyText {
                control,
                text,
                epoch,
            } => {
                let copier = Arc::clone(&self.copier);
                let reply = ReplyGuard::new(self.msg_tx.clone(), Msg::CopyFailed { control });
                tokio::task::spawn_blocking(move || {
                    let msg = match copier.copy_text(&text) {
                        Ok(path) => {
                            iframist_debug!(
                                "copied {} bytes for {:?} via {:?}",
                                text.len(),
                                control,
                                path
                            );
                            Msg::CopySucceeded {
                                control,
                                path,
                                epoch,
                            }
                        }
                        Err(err) => {
                            iframist_warn!("copy for {:?} failed: {}", control, err);
                            Msg::CopyFailed { control }
                        }
                    };
                    reply.send(msg);
                });
            }
            Effect::ScheduleFeedbackReset {
                control,
                generation,
                after,
            } => {
                let expired = Msg::FeedbackExpired {
                    control,
                    generation,
                };
                let reply = ReplyGuard::new(self.msg_tx.clone(), expired.clone());
                // Measured from the copy, not from when the task is first polled.
                let deadline = tokio::time::Instant::now() + after;
                tokio::spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    reply.send(expired);
                });
            }
        }
    }
}

/// Guarantees that a spawned task reports exactly once.
///
/// If the task ends without calling [`ReplyGuard::send`] (panic or
/// cancellation), the fallback message is sent on drop.
struct ReplyGuard {
    tx: mpsc::UnboundedSender<Msg>,
    fallback: Option<Msg>,
}

impl ReplyGuard {
    fn new(tx: mpsc::UnboundedSender<Msg>, fallback: Msg) -> Self {
        Self {
            tx,
            fallback: Some(fallback),
        }
    }

    fn send(mut self, msg: Msg) {
        self.fallback = None;
        let _ = self.tx.send(msg);
    }
}

impl Drop for ReplyGuard {
    fn drop(&mut self) {
        if let Some(msg) = self.fallback.take() {
            iframist_warn!("task ended without reporting; sending {:?}", msg);
            let _ = self.tx.send(msg);
        }
    }
}

fn describe(result: &ScrapeResult) -> String {
    match result {
        ScrapeResult::Success { urls, .. } => format!("success({} urls)", urls.len()),
        ScrapeResult::Failure(message) => format!("failure({message})"),
    }
}
