//! Colors for every theme, shared by the pixel and terminal renderers.

use crate::config::{Background, BirdColor, PipeColor, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Blend from `a` to `b`; `t_256` runs 0..=256.
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn darken(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

pub const GRASS: Rgb = Rgb(84, 168, 55);
pub const DIRT: Rgb = Rgb(210, 185, 110);
pub const DIRT_DARK: Rgb = Rgb(185, 160, 90);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const SHADOW: Rgb = Rgb(30, 30, 30);
pub const BIRD_EYE: Rgb = Rgb(255, 255, 255);
pub const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
pub const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
pub const DEAD: Rgb = Rgb(128, 128, 128);

/// Resolved colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub sky_top: Rgb,
    pub sky_bottom: Rgb,
    pub pipe_dark: Rgb,
    pub pipe: Rgb,
    pub pipe_light: Rgb,
    pub bird: Rgb,
    pub bird_wing: Rgb,
}

impl Palette {
    pub fn for_theme(theme: &Theme) -> Self {
        let (sky_top, sky_bottom) = match theme.background {
            Background::Day => (Rgb(70, 180, 200), Rgb(190, 232, 245)),
            Background::Night => (Rgb(10, 20, 50), Rgb(40, 70, 120)),
            Background::Plain => (Rgb(0, 0, 0), Rgb(0, 0, 0)),
        };
        let (pipe_dark, pipe, pipe_light) = match theme.pipe {
            PipeColor::Green => (Rgb(74, 122, 26), Rgb(100, 170, 40), Rgb(145, 215, 62)),
            PipeColor::Red => (Rgb(120, 30, 20), Rgb(180, 55, 40), Rgb(225, 100, 80)),
        };
        let (bird, bird_wing) = match theme.bird {
            BirdColor::Yellow => (Rgb(245, 200, 66), Rgb(215, 165, 35)),
            BirdColor::Red => (Rgb(220, 60, 50), Rgb(170, 40, 35)),
            BirdColor::Blue => (Rgb(70, 130, 220), Rgb(45, 95, 180)),
        };
        Self {
            sky_top,
            sky_bottom,
            pipe_dark,
            pipe,
            pipe_light,
            bird,
            bird_wing,
        }
    }

    /// Sky color `row` rows down a sky `height` rows tall.
    pub fn sky_at(&self, row: usize, height: usize) -> Rgb {
        let t = (row * 256 / height.max(1)).min(256) as u16;
        Rgb::lerp(self.sky_top, self.sky_bottom, t)
    }
}
