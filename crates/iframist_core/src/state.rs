use std::collections::BTreeMap;

use crate::view_model::{AppViewModel, CopyButtonView, RowView, SubmitView};
use crate::{DisplayState, ScrapeResult};

pub type RequestId = u64;

/// Identity of a copy trigger. Rows are addressed by their 0-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CopyControl {
    Row(usize),
    All,
}

impl CopyControl {
    pub fn idle_label(self) -> &'static str {
        match self {
            CopyControl::Row(_) => "Copy",
            CopyControl::All => "Copy All",
        }
    }

    pub fn success_label(self) -> &'static str {
        match self {
            CopyControl::Row(_) => "Copied!",
            CopyControl::All => "Copied All!",
        }
    }
}

/// Which clipboard mechanism delivered the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    Clipboard,
    Fallback,
}

/// Label and highlight of one copy control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFeedback {
    pub label: String,
    pub active: bool,
    restore_label: String,
    generation: u64,
}

impl CopyFeedback {
    fn idle(control: CopyControl) -> Self {
        Self {
            label: control.idle_label().to_string(),
            active: false,
            restore_label: control.idle_label().to_string(),
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    display: DisplayState,
    current_urls: Vec<String>,
    busy: bool,
    latest_request: Option<RequestId>,
    next_request_id: RequestId,
    results_epoch: RequestId,
    feedback: BTreeMap<CopyControl, CopyFeedback>,
    next_generation: u64,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let rows = match &self.display {
            DisplayState::Results(urls) => urls
                .iter()
                .enumerate()
                .map(|(index, url)| RowView {
                    position: index + 1,
                    url: url.clone(),
                    copy: self.copy_button(CopyControl::Row(index)),
                })
                .collect(),
            _ => Vec::new(),
        };
        let results_count = match &self.display {
            DisplayState::Results(urls) => Some(crate::results_count_label(urls.len())),
            _ => None,
        };

        AppViewModel {
            display: self.display.clone(),
            submit: SubmitView::new(self.busy),
            results_count,
            rows,
            copy_all: self.copy_button(CopyControl::All),
        }
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn current_urls(&self) -> &[String] {
        &self.current_urls
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest_request
    }

    /// Identifies the current result list; row controls from an older list
    /// no longer exist.
    pub fn results_epoch(&self) -> RequestId {
        self.results_epoch
    }

    pub fn feedback(&self, control: CopyControl) -> CopyFeedback {
        self.feedback
            .get(&control)
            .cloned()
            .unwrap_or_else(|| CopyFeedback::idle(control))
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Enters the loading state for a new submission and clears stale results.
    pub(crate) fn begin_request(&mut self) -> RequestId {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.latest_request = Some(request_id);
        self.results_epoch = request_id;
        self.busy = true;
        self.display = DisplayState::Loading;
        self.current_urls.clear();
        // Row controls belong to the previous result list.
        self.feedback
            .retain(|control, _| matches!(control, CopyControl::All));
        self.mark_dirty();
        request_id
    }

    /// Applies a completion. Returns `false` when `request_id` was superseded.
    pub(crate) fn finish_request(&mut self, request_id: RequestId, result: ScrapeResult) -> bool {
        if self.latest_request != Some(request_id) {
            return false;
        }
        self.latest_request = None;
        self.busy = false;

        let display = DisplayState::from_result(result);
        if let DisplayState::Results(urls) = &display {
            self.current_urls = urls.clone();
        }
        self.display = display;
        self.mark_dirty();
        true
    }

    pub(crate) fn row_url(&self, index: usize) -> Option<&str> {
        match &self.display {
            DisplayState::Results(urls) => urls.get(index).map(String::as_str),
            _ => None,
        }
    }

    /// Newline-joined current URLs, or `None` when there is nothing to copy.
    pub(crate) fn joined_urls(&self) -> Option<String> {
        if self.current_urls.is_empty() {
            None
        } else {
            Some(self.current_urls.join("\n"))
        }
    }

    /// Shows the success label on `control` and returns the generation that
    /// owns the pending reset. A row copied from an older result list is
    /// ignored and yields `None`.
    pub(crate) fn apply_copy_success(
        &mut self,
        control: CopyControl,
        path: CopyPath,
        epoch: RequestId,
    ) -> Option<u64> {
        if matches!(control, CopyControl::Row(_)) && epoch != self.results_epoch {
            return None;
        }
        self.next_generation += 1;
        let generation = self.next_generation;

        let entry = self
            .feedback
            .entry(control)
            .or_insert_with(|| CopyFeedback::idle(control));
        let restore_label = match path {
            CopyPath::Clipboard if entry.active => entry.restore_label.clone(),
            CopyPath::Clipboard => entry.label.clone(),
            CopyPath::Fallback => control.idle_label().to_string(),
        };
        entry.label = control.success_label().to_string();
        entry.active = true;
        entry.restore_label = restore_label;
        entry.generation = generation;

        self.mark_dirty();
        Some(generation)
    }

    /// Restores `control` unless a newer copy took it over.
    pub(crate) fn expire_feedback(&mut self, control: CopyControl, generation: u64) -> bool {
        let Some(entry) = self.feedback.get_mut(&control) else {
            return false;
        };
        if entry.generation != generation || !entry.active {
            return false;
        }
        entry.label = entry.restore_label.clone();
        entry.active = false;
        self.mark_dirty();
        true
    }

    fn copy_button(&self, control: CopyControl) -> CopyButtonView {
        let feedback = self.feedback(control);
        CopyButtonView {
            label: feedback.label,
            copied: feedback.active,
        }
    }
}
