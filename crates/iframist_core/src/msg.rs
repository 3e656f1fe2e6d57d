use crate::{CopyControl, CopyPath, RequestId, ScrapeResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted the URL input (raw, untrimmed text).
    Submit(String),
    /// The remote call for `request_id` finished.
    ScrapeFinished {
        request_id: RequestId,
        result: ScrapeResult,
    },
    /// User clicked the copy action of a result row (0-based).
    CopyRowClicked(usize),
    /// User clicked the bulk copy action.
    CopyAllClicked,
    /// The text reached the clipboard through `path`.
    CopySucceeded {
        control: CopyControl,
        path: CopyPath,
        epoch: RequestId,
    },
    /// Neither the clipboard nor the fallback could copy the text.
    CopyFailed { control: CopyControl },
    /// The feedback timer armed by `generation` elapsed.
    FeedbackExpired { control: CopyControl, generation: u64 },
    /// Fallback for placeholder wiring.
    NoOp,
}
