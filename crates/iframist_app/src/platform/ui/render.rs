use std::io;

use crossterm::event::Event;
use iframist_core::{AppViewModel, CopyButtonView, DisplayState, RowView, ViewStateController};
use iframist_logging::iframist_error;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use super::constants::*;
use super::input::{Focus, UiCommand, UiState};
use super::layout;

/// Draws the latest view model into a ratatui terminal.
pub struct TerminalView<B: Backend> {
    terminal: Terminal<B>,
    view: AppViewModel,
    ui: UiState,
}

impl<B: Backend> TerminalView<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            view: AppViewModel::default(),
            ui: UiState::default(),
        }
    }

    pub fn handle_event(&mut self, event: Event) -> UiCommand {
        self.ui.handle_event(event)
    }

    pub fn redraw(&mut self) {
        if let Err(err) = self.draw() {
            iframist_error!("Failed to draw terminal: {}", err);
        }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    fn draw(&mut self) -> io::Result<()> {
        let Self { terminal, view, ui } = self;
        terminal.draw(|frame| draw_screen(frame, view, ui))?;
        Ok(())
    }
}

impl<B: Backend> ViewStateController for TerminalView<B> {
    fn render(&mut self, view: &AppViewModel) {
        self.view = view.clone();
        self.ui.sync(view.rows.len(), view.submit.enabled);
        self.redraw();
    }
}

fn draw_screen(frame: &mut Frame, view: &AppViewModel, ui: &UiState) {
    let areas = layout::split(frame.area());
    draw_input(frame, areas.input, ui);
    draw_submit(frame, areas.submit, view);
    draw_body(frame, areas.body, view, ui);

    let help = match ui.focus {
        Focus::Input => HELP_INPUT,
        Focus::Results => HELP_RESULTS,
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        areas.help,
    );
}

fn draw_input(frame: &mut Frame, area: Rect, ui: &UiState) {
    let focused = ui.focus == Focus::Input;
    let border = if focused { Color::Cyan } else { Color::Gray };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(INPUT_TITLE)
        .border_style(Style::default().fg(border));
    frame.render_widget(Paragraph::new(ui.input.as_str()).block(block), area);

    if focused {
        let typed = u16::try_from(ui.input.chars().count()).unwrap_or(u16::MAX);
        let max_x = area.right().saturating_sub(2);
        let x = area.x.saturating_add(1).saturating_add(typed).min(max_x);
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn draw_submit(frame: &mut Frame, area: Rect, view: &AppViewModel) {
    let text = if view.submit.busy_indicator {
        format!("{BUSY_INDICATOR} {}", view.submit.label)
    } else {
        view.submit.label.to_string()
    };
    let style = if view.submit.enabled {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(
        Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_body(frame: &mut Frame, area: Rect, view: &AppViewModel, ui: &UiState) {
    match &view.display {
        DisplayState::Idle => draw_message(frame, area, APP_TITLE, IDLE_HINT, Color::Gray),
        DisplayState::Loading => draw_message(frame, area, APP_TITLE, LOADING_HINT, Color::Cyan),
        DisplayState::Error(message) => draw_message(frame, area, ERROR_TITLE, message, Color::Red),
        DisplayState::Empty(message) => {
            draw_message(frame, area, EMPTY_TITLE, message, Color::Yellow)
        }
        DisplayState::Results(_) => draw_results(frame, area, view, ui),
    }
}

fn draw_message(frame: &mut Frame, area: Rect, title: &str, message: &str, color: Color) {
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn draw_results(frame: &mut Frame, area: Rect, view: &AppViewModel, ui: &UiState) {
    let block = Block::default().borders(Borders::ALL).title(RESULTS_TITLE);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let (header, list_area) = layout::split_results(inner);

    let count = view.results_count.clone().unwrap_or_default();
    let header_line = Line::from(vec![
        Span::styled(count, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        copy_span(&view.copy_all),
    ]);
    frame.render_widget(Paragraph::new(header_line), header);

    let items: Vec<ListItem> = view.rows.iter().map(row_item).collect();
    let list = List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if ui.focus == Focus::Results {
        state.select(Some(ui.selected));
    }
    frame.render_stateful_widget(list, list_area, &mut state);
}

fn row_item(row: &RowView) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:>3}  ", row.position),
            Style::default().fg(Color::DarkGray),
        ),
        copy_span(&row.copy),
        Span::raw(" "),
        Span::raw(row.url.clone()),
    ]))
}

fn copy_span(button: &CopyButtonView) -> Span<'static> {
    let style = if button.copied {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Span::styled(format!("[{}]", button.label), style)
}
