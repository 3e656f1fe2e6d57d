use crate::{AppState, CopyControl, Effect, Msg, COPY_FEEDBACK_DELAY};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Submit(raw) => {
            let url = raw.trim();
            if url.is_empty() {
                return (state, Vec::new());
            }
            let request_id = state.begin_request();
            vec![Effect::PerformScrape {
                request_id,
                url: url.to_owned(),
            }]
        }
        Msg::ScrapeFinished { request_id, result } => {
            // A superseded completion leaves the newer request in charge.
            state.finish_request(request_id, result);
            Vec::new()
        }
        Msg::CopyRowClicked(index) => match state.row_url(index) {
            Some(url) => vec![Effect::CopyText {
                control: CopyControl::Row(index),
                text: url.to_owned(),
                epoch: state.results_epoch(),
            }],
            None => Vec::new(),
        },
        Msg::CopyAllClicked => match state.joined_urls() {
            Some(text) => vec![Effect::CopyText {
                control: CopyControl::All,
                text,
                epoch: state.results_epoch(),
            }],
            None => Vec::new(),
        },
        Msg::CopySucceeded {
            control,
            path,
            epoch,
        } => match state.apply_copy_success(control, path, epoch) {
            Some(generation) => vec![Effect::ScheduleFeedbackReset {
                control,
                generation,
                after: COPY_FEEDBACK_DELAY,
            }],
            None => Vec::new(),
        },
        Msg::FeedbackExpired {
            control,
            generation,
        } => {
            state.expire_feedback(control, generation);
            Vec::new()
        }
        Msg::CopyFailed { .. } | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
