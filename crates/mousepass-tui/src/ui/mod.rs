//! Lock screen rendering

mod gesture_path;
mod layout;
mod theme;

pub use gesture_path::GesturePath;
pub use theme::Theme;

use chrono::Local;
use mousepass_core::{Error, InputMode, LockView, Phase, Presenter, Result};
use ratatui::backend::Backend;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use layout::{centered_rect_fixed, middle_row};

/// Help line shown at the bottom of the screen
const HELP: &str = "[F2] Keyboard/Gesture   [F3] New gesture   [Enter] Confirm   [Esc] Cancel";

/// Masked dots shown for at most this many typed characters
const MAX_DOTS: usize = 24;

/// Draw the whole lock screen for one frame
pub fn draw(frame: &mut Frame, view: &LockView<'_>, theme: &Theme, clock: &str) {
    let area = frame.area();
    frame.render_widget(Block::default().style(theme.background()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Drawing surface
            Constraint::Length(1), // Countdown / hint
            Constraint::Length(1), // Failed attempts
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    render_header(frame, chunks[0], view, theme, clock);

    match view.input_mode {
        InputMode::Keyboard => render_password_box(frame, chunks[1], view, theme),
        InputMode::Gesture if !view.session_active() => {
            let hint = Paragraph::new(idle_hint(view))
                .style(theme.text_muted())
                .alignment(Alignment::Center);
            frame.render_widget(hint, middle_row(chunks[1]));
        }
        InputMode::Gesture => {}
    }

    if let Some(countdown) = view.countdown_text() {
        let widget = Paragraph::new(countdown)
            .style(theme.text_secondary())
            .alignment(Alignment::Center);
        frame.render_widget(widget, chunks[2]);
    }

    if let Some(attempts) = view.attempts_text() {
        let widget = Paragraph::new(attempts)
            .style(theme.warning())
            .alignment(Alignment::Center);
        frame.render_widget(widget, chunks[3]);
    }

    if let Some(status) = view.status {
        let style = if status.kind().is_error() {
            theme.danger()
        } else {
            theme.success()
        };
        let widget = Paragraph::new(status.text())
            .style(style)
            .alignment(Alignment::Center);
        frame.render_widget(widget, chunks[4]);
    }

    let help = Paragraph::new(HELP)
        .style(theme.text_muted())
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[5]);

    // Trail goes over everything else
    let path = GesturePath::new(view.points)
        .move_style(theme.trail())
        .click_style(theme.click());
    frame.render_widget(path, area);
}

fn render_header(frame: &mut Frame, area: Rect, view: &LockView<'_>, theme: &Theme, clock: &str) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme.border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(10)])
        .split(inner);

    let headline = Paragraph::new(format!("◆ {}", view.headline())).style(theme.title());
    frame.render_widget(headline, chunks[0]);

    let clock = Paragraph::new(clock)
        .style(theme.text())
        .alignment(Alignment::Right);
    frame.render_widget(clock, chunks[1]);
}

fn render_password_box(frame: &mut Frame, area: Rect, view: &LockView<'_>, theme: &Theme) {
    let dialog = centered_rect_fixed(MAX_DOTS as u16 * 2 + 4, 3, area);
    let block = Block::default()
        .title(" Password ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let shown = view.typed_len.min(MAX_DOTS);
    let content = if shown == 0 {
        Paragraph::new("type the password").style(theme.text_muted())
    } else {
        Paragraph::new(vec!["●"; shown].join(" ")).style(theme.text())
    };
    frame.render_widget(content.alignment(Alignment::Center), inner);
}

fn idle_hint(view: &LockView<'_>) -> &'static str {
    match (view.phase, view.enrolled) {
        (Phase::GestureIdle, false) => "Press F3 to record a gesture",
        (Phase::GestureIdle, true) => "Press F2 twice to draw your gesture again",
        _ => "",
    }
}

/// Renders lock screen frames to a ratatui terminal
pub struct TerminalPresenter<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    theme: Theme,
}

impl<'a, B: Backend> TerminalPresenter<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>) -> Self {
        Self {
            terminal,
            theme: Theme::default(),
        }
    }
}

impl<B: Backend> Presenter for TerminalPresenter<'_, B> {
    fn present(&mut self, view: &LockView<'_>) -> Result<()> {
        let clock = Local::now().format("%H:%M:%S").to_string();
        let theme = &self.theme;
        self.terminal
            .draw(|frame| draw(frame, view, theme, &clock))
            .map(|_| ())
            .map_err(|e| Error::Render(e.to_string()))
    }
}
