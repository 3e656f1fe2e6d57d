use crate::DisplayState;

pub const IDLE_SUBMIT_LABEL: &str = "Scrape";
pub const BUSY_SUBMIT_LABEL: &str = "Scraping…";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub display: DisplayState,
    pub submit: SubmitView,
    /// Present only while results are shown.
    pub results_count: Option<String>,
    pub rows: Vec<RowView>,
    pub copy_all: CopyButtonView,
}

/// The submit trigger together with its busy indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitView {
    pub enabled: bool,
    pub label: &'static str,
    pub busy_indicator: bool,
}

impl SubmitView {
    pub(crate) fn new(busy: bool) -> Self {
        Self {
            enabled: !busy,
            label: if busy {
                BUSY_SUBMIT_LABEL
            } else {
                IDLE_SUBMIT_LABEL
            },
            busy_indicator: busy,
        }
    }
}

impl Default for SubmitView {
    fn default() -> Self {
        Self::new(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// 1-based position shown next to the URL.
    pub position: usize,
    pub url: String,
    pub copy: CopyButtonView,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CopyButtonView {
    pub label: String,
    pub copied: bool,
}

/// `"<n> iframe URL<s> found"`, plural exactly when `count != 1`.
pub fn results_count_label(count: usize) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} iframe URL{suffix} found")
}

/// Presentation seam: shows the view matching the active display state.
///
/// Implementations must be idempotent; rendering the same view twice leaves
/// the screen unchanged.
pub trait ViewStateController {
    fn render(&mut self, view: &AppViewModel);
}
