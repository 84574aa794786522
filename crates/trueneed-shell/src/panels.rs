//! Resizable side panels of the chat layout.

use std::ops::RangeInclusive;

pub const HISTORY_DEFAULT_WIDTH: u32 = 280;
pub const HISTORY_WIDTH_RANGE: RangeInclusive<u32> = 200..=400;
pub const ANALYSIS_DEFAULT_WIDTH: u32 = 320;
pub const ANALYSIS_WIDTH_RANGE: RangeInclusive<u32> = 250..=500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSide {
    /// Conversation history, anchored to the left edge.
    History,
    /// Product analysis, anchored to the right edge.
    Analysis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panels {
    pub history_open: bool,
    pub analysis_open: bool,
    history_width: u32,
    analysis_width: u32,
    resizing: Option<PanelSide>,
}

impl Default for Panels {
    fn default() -> Self {
        Self {
            history_open: false,
            analysis_open: true,
            history_width: HISTORY_DEFAULT_WIDTH,
            analysis_width: ANALYSIS_DEFAULT_WIDTH,
            resizing: None,
        }
    }
}

impl Panels {
    pub fn history_width(&self) -> u32 {
        self.history_width
    }

    pub fn analysis_width(&self) -> u32 {
        self.analysis_width
    }

    pub fn resizing(&self) -> Option<PanelSide> {
        self.resizing
    }

    pub fn toggle(&mut self, side: PanelSide) {
        match side {
            PanelSide::History => self.history_open = !self.history_open,
            PanelSide::Analysis => self.analysis_open = !self.analysis_open,
        }
    }

    pub fn start_resize(&mut self, side: PanelSide) {
        self.resizing = Some(side);
    }

    /// Follows the pointer while a resize is active.
    ///
    /// The history panel takes the pointer's distance from the left edge, the
    /// analysis panel its distance from the right edge of the viewport. Both
    /// are clamped to their allowed range.
    pub fn drag(&mut self, pointer_x: u32, viewport_width: u32) {
        match self.resizing {
            Some(PanelSide::History) => {
                self.history_width = clamp(pointer_x, &HISTORY_WIDTH_RANGE);
            }
            Some(PanelSide::Analysis) => {
                let from_right = viewport_width.saturating_sub(pointer_x);
                self.analysis_width = clamp(from_right, &ANALYSIS_WIDTH_RANGE);
            }
            None => {}
        }
    }

    pub fn end_resize(&mut self) {
        self.resizing = None;
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}
