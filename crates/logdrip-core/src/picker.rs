//! Random line selection for the generator modes

use crate::LineRng;
use serde::{Deserialize, Serialize};

/// How lines are drawn from the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    /// Uniform pick with replacement
    #[default]
    Random,
    /// Deal a shuffled deck, reshuffle once it runs out
    Shuffle,
}

/// Draws lines from a fixed pool using an owned [`LineRng`]
#[derive(Debug, Clone)]
pub struct LinePicker {
    lines: Vec<String>,
    rng: LineRng,
    selection: Selection,
    deck: Vec<usize>,
}

impl LinePicker {
    /// Create a picker over `lines`
    pub fn new(lines: Vec<String>, rng: LineRng, selection: Selection) -> Self {
        Self {
            lines,
            rng,
            selection,
            deck: Vec::new(),
        }
    }

    /// Number of lines in the pool
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Selection mode
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Next line, or `None` if the pool is empty
    pub fn next_line(&mut self) -> Option<&str> {
        if self.lines.is_empty() {
            return None;
        }

        let index = match self.selection {
            Selection::Random => self.rng.below(self.lines.len()),
            Selection::Shuffle => {
                if self.deck.is_empty() {
                    self.deck = (0..self.lines.len()).collect();
                    self.rng.shuffle(&mut self.deck);
                }
                self.deck.pop()?
            }
        };

        self.lines.get(index).map(String::as_str)
    }

    /// A second picker over the same pool with an independent generator
    pub fn fork(&mut self) -> Self {
        Self::new(self.lines.clone(), self.rng.fork(), self.selection)
    }
}
