//! Pipe spawning, scrolling, scoring and removal.

use crate::constants::{GAP_TOP_SLOTS, PIPE_WIDTH};
use rand::Rng;
use std::collections::VecDeque;

/// A single pipe obstacle (top + bottom pair with a gap).
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Spawn index within the episode.
    pub id: u64,
    /// Left edge (float for sub-pixel scrolling).
    pub x: f64,
    pub gap_center: f64,
    pub gap_height: f64,
    /// Whether the bird has passed this pipe (for scoring).
    pub passed: bool,
}

impl Pipe {
    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + PIPE_WIDTH
    }

    pub fn center_x(&self) -> f64 {
        self.x + PIPE_WIDTH / 2.0
    }

    /// Bottom edge of the upper pipe.
    pub fn gap_top(&self) -> f64 {
        self.gap_center - self.gap_height / 2.0
    }

    /// Top edge of the lower pipe.
    pub fn gap_bottom(&self) -> f64 {
        self.gap_center + self.gap_height / 2.0
    }
}

/// Where and how pipes are generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeLayout {
    /// A new pipe is queued once the rightmost one scrolls to or past this x.
    pub spawn_threshold: f64,
    pub spacing: f64,
    pub gap_height: f64,
    /// Smallest gap top; a slot offset from `GAP_TOP_SLOTS` is added to it.
    pub gap_top_base: f64,
}

impl PipeLayout {
    fn random_gap_center<R: Rng>(&self, rng: &mut R) -> f64 {
        let slot = GAP_TOP_SLOTS[rng.gen_range(0..GAP_TOP_SLOTS.len())];
        self.gap_top_base + slot + self.gap_height / 2.0
    }
}

/// Pipes in spawn order, which is also left-to-right screen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipeQueue {
    pipes: VecDeque<Pipe>,
    next_id: u64,
}

impl PipeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill an empty queue with the opening pipes: one at the spawn
    /// threshold and one a spacing further right.
    pub fn spawn_initial<R: Rng>(&mut self, layout: &PipeLayout, rng: &mut R) {
        self.pipes.clear();
        self.next_id = 0;
        self.push(layout.spawn_threshold, layout, rng);
        self.push(layout.spawn_threshold + layout.spacing, layout, rng);
    }

    fn push<R: Rng>(&mut self, x: f64, layout: &PipeLayout, rng: &mut R) {
        let pipe = Pipe {
            id: self.next_id,
            x,
            gap_center: layout.random_gap_center(rng),
            gap_height: layout.gap_height,
            passed: false,
        };
        tracing::trace!(id = pipe.id, x, gap_center = pipe.gap_center, "pipe spawned");
        self.next_id += 1;
        self.pipes.push_back(pipe);
    }

    pub fn scroll(&mut self, distance: f64) {
        for pipe in &mut self.pipes {
            pipe.x -= distance;
        }
    }

    /// Queue the next pipe once the rightmost one has moved far enough left.
    /// Returns whether a pipe was added.
    pub fn spawn_if_due<R: Rng>(&mut self, layout: &PipeLayout, rng: &mut R) -> bool {
        let next_x = match self.pipes.back() {
            Some(last) if last.x <= layout.spawn_threshold => last.x + layout.spacing,
            Some(_) => return false,
            None => layout.spawn_threshold,
        };
        self.push(next_x, layout, rng);
        true
    }

    /// Mark every unpassed pipe whose center is at or behind `bird_center_x`
    /// as passed. Returns the number newly passed.
    pub fn mark_passed(&mut self, bird_center_x: f64) -> u32 {
        let mut passed = 0;
        for pipe in &mut self.pipes {
            if !pipe.passed && pipe.center_x() <= bird_center_x {
                pipe.passed = true;
                passed += 1;
            }
        }
        passed
    }

    /// Drop pipes whose right edge has left the screen. Returns how many went.
    pub fn remove_offscreen(&mut self) -> usize {
        let mut removed = 0;
        while self.pipes.front().is_some_and(|p| p.right() < 0.0) {
            if let Some(pipe) = self.pipes.pop_front() {
                tracing::trace!(id = pipe.id, passed = pipe.passed, "pipe removed");
                removed += 1;
            }
        }
        removed
    }

    /// Pipes the bird can still touch or has yet to reach, nearest first.
    pub fn upcoming(&self, bird_left: f64) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter().filter(move |p| p.right() >= bird_left)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pipe> {
        self.pipes.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Pipe> {
        self.pipes.get(index)
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Total pipes spawned this episode, including removed ones.
    pub fn spawned(&self) -> u64 {
        self.next_id
    }
}
