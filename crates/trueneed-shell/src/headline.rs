//! Landing headline typer.
//!
//! The headline reads "Buy What You Need. / Not What They Sell." and animates
//! one word at a time: the word is deleted, retyped, held, then the cursor
//! hides briefly while the animation moves to the other word.

use std::time::Duration;

pub const WORDS: [&str; 2] = ["Need.", "Sell."];

pub const DELETE_DELAY: Duration = Duration::from_millis(80);
pub const RETYPE_DELAY: Duration = Duration::from_millis(150);
pub const PAUSE_DELAY: Duration = Duration::from_millis(3000);
pub const TRANSITION_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Deleting,
    Retyping,
    Paused,
    Transitioning,
}

impl Phase {
    /// Time to wait before the next step in this phase.
    pub fn delay(self) -> Duration {
        match self {
            Phase::Deleting => DELETE_DELAY,
            Phase::Retyping => RETYPE_DELAY,
            Phase::Paused => PAUSE_DELAY,
            Phase::Transitioning => TRANSITION_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    word_index: usize,
    visible: usize,
    phase: Phase,
}

impl Default for Headline {
    fn default() -> Self {
        Self {
            word_index: 0,
            visible: WORDS[0].chars().count(),
            phase: Phase::Deleting,
        }
    }
}

impl Headline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index into [`WORDS`] of the animated word.
    pub fn word_index(&self) -> usize {
        self.word_index
    }

    /// Visible part of the animated word.
    pub fn text(&self) -> &'static str {
        let word = WORDS[self.word_index];
        let end = word
            .char_indices()
            .nth(self.visible)
            .map_or(word.len(), |(i, _)| i);
        &word[..end]
    }

    pub fn cursor_visible(&self) -> bool {
        self.phase != Phase::Transitioning
    }

    /// Delay before the next [`Headline::tick`].
    pub fn delay(&self) -> Duration {
        self.phase.delay()
    }

    /// Advances one step and returns the delay before the next one.
    pub fn tick(&mut self) -> Duration {
        let len = WORDS[self.word_index].chars().count();
        match self.phase {
            Phase::Deleting if self.visible > 0 => self.visible -= 1,
            Phase::Deleting => self.phase = Phase::Retyping,
            Phase::Retyping if self.visible < len => self.visible += 1,
            Phase::Retyping => self.phase = Phase::Paused,
            Phase::Paused => self.phase = Phase::Transitioning,
            Phase::Transitioning => {
                self.word_index = (self.word_index + 1) % WORDS.len();
                self.visible = WORDS[self.word_index].chars().count();
                self.phase = Phase::Deleting;
            }
        }
        self.delay()
    }

    /// The two headline lines, with a `|` cursor after the animated word.
    pub fn lines(&self) -> [String; 2] {
        let cursor = if self.cursor_visible() { "|" } else { "" };
        let word = |index: usize| {
            if index == self.word_index {
                format!("{}{cursor}", self.text())
            } else {
                WORDS[index].to_string()
            }
        };
        [
            format!("Buy What You {}", word(0)),
            format!("Not What They {}", word(1)),
        ]
    }
}
