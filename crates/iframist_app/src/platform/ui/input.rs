use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Results,
}

/// What a terminal event asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    None,
    Redraw,
    Submit(String),
    CopyRow(usize),
    CopyAll,
    Quit,
}

/// Widget-local state that the core never sees: input text, focus, selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub input: String,
    pub focus: Focus,
    pub selected: usize,
    row_count: usize,
    submit_enabled: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            input: String::new(),
            focus: Focus::Input,
            selected: 0,
            row_count: 0,
            submit_enabled: true,
        }
    }
}

impl UiState {
    /// Syncs with the latest rendered view.
    pub fn sync(&mut self, row_count: usize, submit_enabled: bool) {
        self.row_count = row_count;
        self.submit_enabled = submit_enabled;
        if row_count == 0 {
            self.selected = 0;
            self.focus = Focus::Input;
        } else if self.selected >= row_count {
            self.selected = row_count - 1;
        }
    }

    pub fn handle_event(&mut self, event: Event) -> UiCommand {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(..) => UiCommand::Redraw,
            _ => UiCommand::None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> UiCommand {
        if key.kind != KeyEventKind::Press {
            return UiCommand::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return UiCommand::Quit;
        }
        match key.code {
            KeyCode::Esc => return UiCommand::Quit,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Input if self.row_count > 0 => Focus::Results,
                    _ => Focus::Input,
                };
                return UiCommand::Redraw;
            }
            _ => {}
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::Results => self.handle_results_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> UiCommand {
        match key.code {
            // The trigger is disabled while a request is in flight.
            KeyCode::Enter if self.submit_enabled => UiCommand::Submit(self.input.clone()),
            KeyCode::Enter => UiCommand::None,
            KeyCode::Backspace => {
                self.input.pop();
                UiCommand::Redraw
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(ch);
                UiCommand::Redraw
            }
            _ => UiCommand::None,
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> UiCommand {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                UiCommand::Redraw
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.row_count {
                    self.selected += 1;
                }
                UiCommand::Redraw
            }
            KeyCode::Enter | KeyCode::Char('c') if self.row_count > 0 => {
                UiCommand::CopyRow(self.selected)
            }
            KeyCode::Char('a') => UiCommand::CopyAll,
            _ => UiCommand::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(ui: &mut UiState, text: &str) {
        for ch in text.chars() {
            ui.handle_key(press(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn typing_then_enter_submits_raw_text() {
        let mut ui = UiState::default();
        type_text(&mut ui, " example.com ");
        assert_eq!(
            ui.handle_key(press(KeyCode::Enter)),
            UiCommand::Submit(" example.com ".to_string())
        );
    }

    #[test]
    fn enter_is_ignored_while_busy() {
        let mut ui = UiState::default();
        type_text(&mut ui, "example.com");
        ui.sync(0, false);
        assert_eq!(ui.handle_key(press(KeyCode::Enter)), UiCommand::None);
    }

    #[test]
    fn tab_only_reaches_results_when_rows_exist() {
        let mut ui = UiState::default();
        ui.handle_key(press(KeyCode::Tab));
        assert_eq!(ui.focus, Focus::Input);

        ui.sync(3, true);
        ui.handle_key(press(KeyCode::Tab));
        assert_eq!(ui.focus, Focus::Results);
    }

    #[test]
    fn results_keys_select_and_copy() {
        let mut ui = UiState::default();
        ui.sync(3, true);
        ui.handle_key(press(KeyCode::Tab));

        ui.handle_key(press(KeyCode::Down));
        ui.handle_key(press(KeyCode::Char('j')));
        ui.handle_key(press(KeyCode::Down));
        assert_eq!(ui.selected, 2);
        assert_eq!(ui.handle_key(press(KeyCode::Char('c'))), UiCommand::CopyRow(2));

        ui.handle_key(press(KeyCode::Up));
        assert_eq!(ui.handle_key(press(KeyCode::Enter)), UiCommand::CopyRow(1));
        assert_eq!(ui.handle_key(press(KeyCode::Char('a'))), UiCommand::CopyAll);
    }

    #[test]
    fn losing_rows_returns_focus_to_input() {
        let mut ui = UiState::default();
        ui.sync(2, true);
        ui.handle_key(press(KeyCode::Tab));
        ui.handle_key(press(KeyCode::Down));

        ui.sync(0, false);
        assert_eq!(ui.focus, Focus::Input);
        assert_eq!(ui.selected, 0);
    }

    #[test]
    fn ctrl_c_and_esc_quit() {
        let mut ui = UiState::default();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(ui.handle_key(ctrl_c), UiCommand::Quit);
        assert_eq!(ui.handle_key(press(KeyCode::Esc)), UiCommand::Quit);
        assert!(ui.input.is_empty());
    }
}
