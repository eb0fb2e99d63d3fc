//! Full-screen terminal display of one figure at a time.
//!
//! Each call takes over the terminal, draws the figure, and blocks until the
//! user dismisses it with `q`, `Esc`, or `Enter`. Resizes trigger a redraw.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::debug;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::error::AppError;
use crate::plot::Figure;

mod plotters_chart;

use plotters_chart::FigureWidget;

/// Show `figure` and wait for the user to close it.
pub fn show_figure(figure: &Figure<'_>) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::render(format!("Failed to initialize terminal: {e}")))?;

    debug!("showing figure '{}'", figure.title());
    event_loop(&mut terminal, figure)
}

struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::render(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::render(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn event_loop<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, figure: &Figure<'_>) -> Result<(), AppError> {
    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            terminal
                .draw(|f| draw(f, figure))
                .map_err(|e| AppError::render(format!("Terminal draw error: {e}")))?;
            needs_redraw = false;
        }

        if !event::poll(Duration::from_millis(100))
            .map_err(|e| AppError::render(format!("Event poll error: {e}")))?
        {
            continue;
        }

        match event::read().map_err(|e| AppError::render(format!("Event read error: {e}")))? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                    break;
                }
            }
            Event::Resize(_, _) => {
                needs_redraw = true;
            }
            _ => {}
        }
    }
    Ok(())
}

fn draw(frame: &mut ratatui::Frame<'_>, figure: &Figure<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    frame.render_widget(FigureWidget { figure }, chunks[0]);

    let footer = Line::from(vec![
        Span::styled(figure.title(), Style::default().fg(Color::Cyan)),
        Span::styled("  q/Esc/Enter: close", Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[1]);
}
