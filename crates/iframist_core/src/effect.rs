use std::time::Duration;

use crate::{CopyControl, RequestId};

/// How long a copy control shows its success label.
pub const COPY_FEEDBACK_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the trimmed URL to the extraction service.
    PerformScrape { request_id: RequestId, url: String },
    /// Write `text` to the clipboard on behalf of `control`. `epoch` names
    /// the result list the control belonged to when clicked.
    CopyText {
        control: CopyControl,
        text: String,
        epoch: RequestId,
    },
    /// Report `Msg::FeedbackExpired` after `after` has elapsed.
    ScheduleFeedbackReset {
        control: CopyControl,
        generation: u64,
        after: Duration,
    },
}
