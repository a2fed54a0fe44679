//! Play queue with cursor, shuffle and repeat
//!
//! The authored track list is never reordered. Shuffling only replaces the
//! play order, a permutation of authored indices, so turning shuffle off
//! restores exactly what the user queued.
//!
//! ```text
//! authored:   [A, B, C, D]
//! play order: [2, 0, 3, 1]   → C, A, D, B
//! cursor:      ^ 0           → current = C
//! ```

use crate::error::{PlaybackError, Result};
use crate::shuffle::{position_of, shuffled_order};
use crate::types::RepeatMode;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use streamflow_core::Track;

/// Outcome of asking the queue for the next or previous track
#[derive(Debug, Clone, PartialEq)]
pub enum QueueStep {
    /// Cursor moved; play this track
    Advance(Arc<Track>),

    /// Cursor unchanged; play the same track again (repeat one)
    Replay(Arc<Track>),

    /// Nowhere further to go; playback should stop
    Terminal,
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// Ordered play queue
///
/// Invariant: `cursor` is `Some(i)` with `i < len` whenever the queue is
/// non-empty, and `None` when it is empty.
#[derive(Debug)]
pub struct QueueManager {
    /// Tracks in the order the user queued them
    authored: Vec<Arc<Track>>,

    /// Play order as indices into `authored`
    order: Vec<usize>,

    /// Position in `order`
    cursor: Option<usize>,

    shuffled: bool,
    repeat: RepeatMode,
    rng: StdRng,
}

impl QueueManager {
    /// Create an empty queue with the given modes
    pub fn new(shuffle: bool, repeat: RepeatMode) -> Self {
        Self::with_rng(shuffle, repeat, StdRng::from_entropy())
    }

    /// Create an empty queue with a deterministic shuffle source
    pub fn with_seed(shuffle: bool, repeat: RepeatMode, seed: u64) -> Self {
        Self::with_rng(shuffle, repeat, StdRng::seed_from_u64(seed))
    }

    fn with_rng(shuffle: bool, repeat: RepeatMode, rng: StdRng) -> Self {
        Self {
            authored: Vec::new(),
            order: Vec::new(),
            cursor: None,
            shuffled: shuffle,
            repeat,
            rng,
        }
    }

    /// Replace the queue and point the cursor at `start_index`
    ///
    /// `start_index` refers to the authored order. When shuffle is already
    /// enabled the new queue is shuffled right away, with the start track kept
    /// current.
    ///
    /// # Errors
    /// Returns `InvalidIndex` if `start_index` is out of range; the previous
    /// queue is left untouched.
    pub fn start_queue(
        &mut self,
        tracks: Vec<Arc<Track>>,
        start_index: usize,
    ) -> Result<Arc<Track>> {
        if start_index >= tracks.len() {
            return Err(PlaybackError::InvalidIndex {
                index: start_index,
                len: tracks.len(),
            });
        }

        let start = Arc::clone(&tracks[start_index]);
        let len = tracks.len();
        self.authored = tracks;

        if self.shuffled {
            self.order = shuffled_order(len, &mut self.rng);
            self.cursor = position_of(&self.order, start_index);
        } else {
            self.order = (0..len).collect();
            self.cursor = Some(start_index);
        }

        tracing::debug!(len, start_index, shuffled = self.shuffled, "Queue started");
        Ok(start)
    }

    /// Advance according to the repeat mode
    pub fn next(&mut self) -> QueueStep {
        self.step(Direction::Forward)
    }

    /// Go back according to the repeat mode
    pub fn previous(&mut self) -> QueueStep {
        self.step(Direction::Backward)
    }

    /// What `next()` would return, without moving the cursor
    pub fn peek_next(&self) -> QueueStep {
        self.resolve(self.target(Direction::Forward))
    }

    fn step(&mut self, direction: Direction) -> QueueStep {
        let target = self.target(direction);
        let step = self.resolve(target);
        if matches!(step, QueueStep::Advance(_)) {
            self.cursor = target;
        }
        step
    }

    fn resolve(&self, target: Option<usize>) -> QueueStep {
        match target.and_then(|t| self.track_at(t)) {
            None => QueueStep::Terminal,
            Some(track) if self.repeat == RepeatMode::One => QueueStep::Replay(track),
            Some(track) => QueueStep::Advance(track),
        }
    }

    /// Play-order index the cursor would move to, `None` for terminal
    fn target(&self, direction: Direction) -> Option<usize> {
        let cursor = self.cursor?;
        let len = self.order.len();

        if self.repeat == RepeatMode::One {
            return Some(cursor);
        }

        let candidate = match direction {
            Direction::Forward => cursor.checked_add(1).filter(|&i| i < len),
            Direction::Backward => cursor.checked_sub(1),
        };

        match (candidate, self.repeat) {
            (Some(index), _) => Some(index),
            (None, RepeatMode::All) => match direction {
                Direction::Forward => Some(0),
                Direction::Backward => Some(len - 1),
            },
            (None, _) => None,
        }
    }

    fn track_at(&self, position: usize) -> Option<Arc<Track>> {
        self.order
            .get(position)
            .and_then(|&authored| self.authored.get(authored))
            .cloned()
    }

    /// Toggle shuffle, keeping the current track current
    ///
    /// Returns the new shuffle state.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffled = !self.shuffled;

        let current_authored = self.cursor.and_then(|c| self.order.get(c).copied());
        let len = self.authored.len();

        self.order = if self.shuffled {
            shuffled_order(len, &mut self.rng)
        } else {
            (0..len).collect()
        };

        if let Some(authored) = current_authored {
            self.cursor = position_of(&self.order, authored);
        }

        tracing::debug!(shuffled = self.shuffled, cursor = ?self.cursor, "Shuffle toggled");
        self.shuffled
    }

    /// Cycle `off → all → one → off`, returning the new mode
    pub fn toggle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycle();
        self.repeat
    }

    /// Remove every track
    ///
    /// Shuffle and repeat modes are kept.
    pub fn clear(&mut self) {
        self.authored.clear();
        self.order.clear();
        self.cursor = None;
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<Arc<Track>> {
        self.cursor.and_then(|c| self.track_at(c))
    }

    /// Cursor position in play order
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Tracks in play order
    pub fn tracks(&self) -> Vec<Arc<Track>> {
        self.order
            .iter()
            .filter_map(|&i| self.authored.get(i).cloned())
            .collect()
    }

    /// Tracks in the order they were queued
    pub fn authored(&self) -> &[Arc<Track>] {
        &self.authored
    }

    pub fn len(&self) -> usize {
        self.authored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authored.is_empty()
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new(false, RepeatMode::Off)
    }
}
