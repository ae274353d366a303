//! Software renderer producing the RGB frame used for pixel observations
//! and `rgb_array` rendering.

use super::palette::{self, Palette, Rgb};
use super::RgbFrame;
use crate::config::EnvConfig;
use crate::constants::{BIRD_HEIGHT, BIRD_WIDTH, PIPE_WIDTH};
use crate::game::{Bird, GameState, Pipe};

const CAP_HEIGHT: i64 = 12;
const CAP_OVERHANG: i64 = 3;
const GRASS_HEIGHT: i64 = 6;
const DIGIT_SCALE: i64 = 4;
const SCORE_TOP: i64 = 24;

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1],
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1],
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1],
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1],
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1],
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1],
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1],
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0],
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1],
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1],
];

/// Draw the whole scene at native resolution.
pub fn draw(state: &GameState, config: &EnvConfig) -> RgbFrame {
    let width = config.screen_width as usize;
    let height = config.screen_height as usize;
    let palette = Palette::for_theme(&config.theme);
    let mut frame = RgbFrame::new(width, height);
    let ground_y = state.ground_y as i64;

    draw_sky(&mut frame, &palette, ground_y);
    for pipe in state.pipes.iter() {
        draw_pipe(&mut frame, &palette, pipe, ground_y);
    }
    draw_ground(&mut frame, ground_y);
    draw_bird(&mut frame, &palette, &state.bird);
    draw_number(&mut frame, width as i64 / 2, SCORE_TOP, state.score);
    frame
}

fn draw_sky(frame: &mut RgbFrame, palette: &Palette, ground_y: i64) {
    let sky_height = ground_y.max(0) as usize;
    for y in 0..sky_height {
        frame.fill_rect(0, y as i64, frame.width() as i64, 1, palette.sky_at(y, sky_height));
    }
}

fn draw_ground(frame: &mut RgbFrame, ground_y: i64) {
    let width = frame.width() as i64;
    frame.fill_rect(0, ground_y, width, GRASS_HEIGHT, palette::GRASS);
    for y in (ground_y + GRASS_HEIGHT)..frame.height() as i64 {
        for x in 0..width {
            let stripe = (x + (y - ground_y) * 2) % 12 < 6;
            let color = if stripe { palette::DIRT } else { palette::DIRT_DARK };
            frame.set(x, y, color);
        }
    }
}

/// Three vertical bands: shadowed left edge, body, highlight.
fn pipe_shade(palette: &Palette, column: i64, total: i64) -> Rgb {
    let t = column * 8 / total.max(1);
    match t {
        0 => palette.pipe_dark,
        5 | 6 => palette.pipe_light,
        _ => palette.pipe,
    }
}

fn draw_pipe(frame: &mut RgbFrame, palette: &Palette, pipe: &Pipe, ground_y: i64) {
    let left = pipe.x.floor() as i64;
    let width = PIPE_WIDTH as i64;
    let gap_top = pipe.gap_top().floor() as i64;
    let gap_bottom = pipe.gap_bottom().floor() as i64;

    for column in 0..width {
        let color = pipe_shade(palette, column, width);
        frame.fill_rect(left + column, 0, 1, gap_top, color);
        frame.fill_rect(left + column, gap_bottom, 1, ground_y - gap_bottom, color);
    }

    // Caps overhang the body on both sides.
    let cap_width = width + 2 * CAP_OVERHANG;
    let outline = palette.pipe_dark.darken();
    for (cap_top, edge) in [(gap_top - CAP_HEIGHT, gap_top - 1), (gap_bottom, gap_bottom)] {
        for column in 0..cap_width {
            let x = left - CAP_OVERHANG + column;
            frame.fill_rect(x, cap_top, 1, CAP_HEIGHT, pipe_shade(palette, column, cap_width));
            frame.set(x, edge, outline);
        }
    }
}

fn draw_bird(frame: &mut RgbFrame, palette: &Palette, bird: &Bird) {
    let x = bird.x.floor() as i64;
    let y = bird.y.floor() as i64;
    let w = BIRD_WIDTH as i64;
    let h = BIRD_HEIGHT as i64;
    let (body, wing) = if bird.alive {
        (palette.bird, palette.bird_wing)
    } else {
        (palette::DEAD, palette::DEAD.darken())
    };

    frame.fill_rect(x, y + 2, w - 6, h - 4, body);
    frame.fill_rect(x + 2, y, w - 10, h, body);

    // Wing flips with the direction of travel.
    let wing_y = if bird.velocity < 0.0 { y + 6 } else { y + h / 2 };
    frame.fill_rect(x + 2, wing_y, w / 3, h / 3, wing);

    frame.fill_rect(x + w - 14, y + 3, 7, 7, palette::BIRD_EYE);
    frame.fill_rect(x + w - 10, y + 5, 3, 3, palette::BIRD_PUPIL);
    frame.fill_rect(x + w - 8, y + h / 2, 8, 5, palette::BIRD_BEAK);
}

fn draw_digit(frame: &mut RgbFrame, x: i64, y: i64, digit: usize) {
    let glyph = &DIGITS[digit];
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i64 * DIGIT_SCALE;
                let py = y + row as i64 * DIGIT_SCALE;
                frame.fill_rect(px + 2, py + 2, DIGIT_SCALE, DIGIT_SCALE, palette::SHADOW);
                frame.fill_rect(px, py, DIGIT_SCALE, DIGIT_SCALE, palette::WHITE);
            }
        }
    }
}

/// Score centered on `center_x`.
fn draw_number(frame: &mut RgbFrame, center_x: i64, y: i64, n: u32) {
    let digits: Vec<usize> = n
        .to_string()
        .bytes()
        .map(|b| (b - b'0') as usize)
        .collect();
    let advance = 4 * DIGIT_SCALE;
    let total = digits.len() as i64 * advance - DIGIT_SCALE;
    let start = center_x - total / 2;
    for (i, digit) in digits.into_iter().enumerate() {
        draw_digit(frame, start + i as i64 * advance, y, digit);
    }
}
