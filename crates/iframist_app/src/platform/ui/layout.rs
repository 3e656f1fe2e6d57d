use ratatui::layout::{Constraint, Layout, Rect};

/// Screen regions, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub input: Rect,
    pub submit: Rect,
    pub body: Rect,
    pub help: Rect,
}

/// Width of the submit button, wide enough for the busy label.
const SUBMIT_WIDTH: u16 = 16;

pub fn split(area: Rect) -> ScreenAreas {
    let [top, body, help] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);
    let [input, submit] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(SUBMIT_WIDTH)]).areas(top);

    ScreenAreas {
        input,
        submit,
        body,
        help,
    }
}

/// Header line (count label and bulk copy) above the result list.
pub fn split_results(body: Rect) -> (Rect, Rect) {
    let [header, list] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(body);
    (header, list)
}
