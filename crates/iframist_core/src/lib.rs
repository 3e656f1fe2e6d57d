//! Iframist core: pure request/response state machine and view-model helpers.
mod effect;
mod msg;
mod outcome;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, COPY_FEEDBACK_DELAY};
pub use msg::Msg;
pub use outcome::{
    DisplayState, ScrapeResult, CONNECT_FAILURE_MESSAGE, NO_IFRAMES_MESSAGE,
    UNKNOWN_ERROR_MESSAGE,
};
pub use state::{AppState, CopyControl, CopyFeedback, CopyPath, RequestId};
pub use update::update;
pub use view_model::{
    results_count_label, AppViewModel, CopyButtonView, RowView, SubmitView,
    ViewStateController, BUSY_SUBMIT_LABEL, IDLE_SUBMIT_LABEL,
};
