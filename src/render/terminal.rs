//! Live terminal view for `human` rendering.

use super::palette::{self, Palette, Rgb};
use super::text::{self, Cell, SceneGrid};
use crate::config::EnvConfig;
use crate::error::EnvError;
use crate::game::GameState;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};

/// The alternate screen, held from the first human render until `close`
/// or drop.
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    open: bool,
}

impl TerminalSurface {
    pub fn open() -> Result<Self, EnvError> {
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        tracing::debug!("terminal surface opened");
        Ok(Self {
            terminal,
            open: true,
        })
    }

    pub fn draw(&mut self, state: &GameState, config: &EnvConfig) -> Result<(), EnvError> {
        let grid = text::grid(state, config);
        let palette = Palette::for_theme(&config.theme);
        self.terminal
            .draw(|frame| draw_scene(frame, &grid, &palette))?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), EnvError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.terminal.show_cursor()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        tracing::debug!("terminal surface closed");
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn cell_span(cell: Cell, palette: &Palette) -> Span<'static> {
    let glyph = cell.glyph().to_string();
    match cell {
        Cell::Sky => Span::raw(glyph),
        Cell::Pipe => Span::styled(glyph, Style::default().fg(color(palette.pipe))),
        Cell::Ground => Span::styled(glyph, Style::default().fg(color(palette::DIRT_DARK))),
        Cell::Bird('X') => Span::styled(
            glyph,
            Style::default()
                .fg(color(palette::DEAD))
                .add_modifier(Modifier::BOLD),
        ),
        Cell::Bird(_) => Span::styled(
            glyph,
            Style::default()
                .fg(color(palette.bird))
                .add_modifier(Modifier::BOLD),
        ),
    }
}

/// Draw the scene grid inside a bordered box with the status line below.
pub fn draw_scene(frame: &mut Frame, grid: &SceneGrid, palette: &Palette) {
    let block = Block::default()
        .title(" flappy-env ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(frame.size());
    frame.render_widget(block, frame.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let lines: Vec<Line> = (0..grid.rows)
        .map(|row| {
            Line::from(
                grid.row(row)
                    .iter()
                    .map(|&cell| cell_span(cell, palette))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let status = Paragraph::new(Line::from(Span::styled(
        grid.status_line(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(status, chunks[1]);
}
