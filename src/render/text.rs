//! Coarse character-grid view of the scene, used for `ansi` frames and the
//! live terminal.

use crate::config::EnvConfig;
use crate::constants::{TEXT_COLUMNS, TEXT_ROWS};
use crate::game::{Bird, EpisodeStatus, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Sky,
    Pipe,
    Ground,
    Bird(char),
}

impl Cell {
    pub fn glyph(self) -> char {
        match self {
            Cell::Sky => ' ',
            Cell::Pipe => '█',
            Cell::Ground => '▒',
            Cell::Bird(c) => c,
        }
    }
}

/// The scene sampled onto a fixed grid, plus the numbers shown below it.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGrid {
    pub columns: usize,
    pub rows: usize,
    cells: Vec<Cell>,
    pub score: u32,
    pub tick: u64,
    pub status: EpisodeStatus,
}

impl SceneGrid {
    pub fn cell(&self, column: usize, row: usize) -> Cell {
        self.cells[row * self.columns + column]
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.columns..(row + 1) * self.columns]
    }

    pub fn status_line(&self) -> String {
        format!("score {}  tick {}  {}", self.score, self.tick, self.status)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.columns + 1) * (self.rows + 1));
        for row in 0..self.rows {
            out.extend(self.row(row).iter().map(|c| c.glyph()));
            out.push('\n');
        }
        out.push_str(&self.status_line());
        out.push('\n');
        out
    }
}

fn bird_glyph(bird: &Bird) -> char {
    if !bird.alive {
        'X'
    } else if bird.velocity < -0.5 {
        '▲'
    } else if bird.velocity > 1.0 {
        '▼'
    } else {
        '►'
    }
}

/// Sample each cell at its center point.
pub fn grid(state: &GameState, config: &EnvConfig) -> SceneGrid {
    let cell_w = config.screen_width as f64 / TEXT_COLUMNS as f64;
    let cell_h = config.screen_height as f64 / TEXT_ROWS as f64;
    let mut cells = vec![Cell::Sky; TEXT_COLUMNS * TEXT_ROWS];

    for row in 0..TEXT_ROWS {
        let y = (row as f64 + 0.5) * cell_h;
        for column in 0..TEXT_COLUMNS {
            let x = (column as f64 + 0.5) * cell_w;
            let cell = &mut cells[row * TEXT_COLUMNS + column];
            if y >= state.ground_y {
                *cell = Cell::Ground;
            } else if state.pipes.iter().any(|p| {
                x >= p.left() && x < p.right() && (y < p.gap_top() || y >= p.gap_bottom())
            }) {
                *cell = Cell::Pipe;
            }
        }
    }

    // The bird always shows, even when smaller than a cell.
    let bird = &state.bird;
    let column = ((bird.center_x() / cell_w) as usize).min(TEXT_COLUMNS - 1);
    let row = ((bird.center_y().max(0.0) / cell_h) as usize).min(TEXT_ROWS - 1);
    cells[row * TEXT_COLUMNS + column] = Cell::Bird(bird_glyph(bird));

    SceneGrid {
        columns: TEXT_COLUMNS,
        rows: TEXT_ROWS,
        cells,
        score: state.score,
        tick: state.tick,
        status: state.status,
    }
}

pub fn draw(state: &GameState, config: &EnvConfig) -> String {
    grid(state, config).to_text()
}
