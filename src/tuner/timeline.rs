//! Elapsed phase time to timeline geometry.
//!
//! Each breath owns one column of the canvas. Exhale rows grow upward from
//! the x-axis, inhale rows grow downward. One row stands for [`MS_PER_ROW`]
//! of phase time and every started second adds [`BAR_SECOND_GAP`] unpainted
//! rows, so the bars read as stacked one-second blocks.
//!
//! The renderer keeps a cursor of the phase time already drawn. Rendering up
//! to some elapsed time only emits the rows between the cursor and that time,
//! so repeated or irregular ticks never redraw or skip a row.

use bevy::prelude::Color;
use serde::{Deserialize, Serialize};

use crate::config::{
    BAR_SECOND_GAP, BAR_WIDTH, COLUMN_PITCH, BAR_COLUMN_GAP, EXHALE_ORIGIN, HALF_SPACE_HEIGHT,
    INHALE_ORIGIN, MAX_PHASE_MS, MS_PER_ROW,
};
use crate::state::Phase;

/// Bar color, chosen by how much phase time has been rendered
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ColorBand {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Violet,
    Purple,
}

/// Inclusive upper bound (rendered ms) of each band; beyond the last is purple
const BAND_LIMITS: [(u64, ColorBand); 7] = [
    (2_000, ColorBand::Red),
    (5_000, ColorBand::Orange),
    (10_000, ColorBand::Yellow),
    (15_000, ColorBand::Green),
    (20_000, ColorBand::Cyan),
    (25_000, ColorBand::Blue),
    (30_000, ColorBand::Violet),
];

impl ColorBand {
    /// Band for a row whose rendered phase time, including the row, is `rendered_ms`
    pub fn for_rendered_ms(rendered_ms: u64) -> Self {
        BAND_LIMITS
            .iter()
            .find(|(limit, _)| rendered_ms <= *limit)
            .map_or(Self::Purple, |(_, band)| *band)
    }

    pub fn hue(&self) -> f32 {
        match self {
            Self::Red => 0.0,
            Self::Orange => 30.0,
            Self::Yellow => 60.0,
            Self::Green => 130.0,
            Self::Cyan => 185.0,
            Self::Blue => 210.0,
            Self::Violet => 265.0,
            Self::Purple => 315.0,
        }
    }

    pub fn color(&self) -> Color {
        Color::hsl(self.hue(), 0.8, 0.5)
    }
}

/// Axis-aligned canvas rectangle in pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PaintRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PaintRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &PaintRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

/// Instruction for the canvas surface, applied in emission order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Paint { rect: PaintRect, band: ColorBand },
    Erase { rect: PaintRect },
}

/// Horizontal placement of a breath column
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ColumnPosition {
    /// Left edge of the column on the canvas
    pub x: i32,
    /// Canvas shift that puts the column under the reference mark, relative
    /// to the mark's center
    pub view_offset: i32,
}

impl ColumnPosition {
    pub fn for_breath(breath_index: i32) -> Self {
        Self {
            x: COLUMN_PITCH * breath_index,
            view_offset: BAR_WIDTH / 2 + BAR_COLUMN_GAP - COLUMN_PITCH * (breath_index + 1),
        }
    }
}

/// Distance of a row from the axis once `rendered_ms` of phase time is drawn
pub fn row_offset(rendered_ms: u64) -> i32 {
    (rendered_ms / MS_PER_ROW) as i32 + rendered_ms.div_ceil(1_000) as i32 * BAR_SECOND_GAP
}

/// Emits draw commands for the phase time not yet on the canvas
#[derive(Debug, Clone)]
pub struct TimelineRenderer {
    /// Phase time already rendered for the current phase
    cursor_ms: u64,
    column: ColumnPosition,
}

impl Default for TimelineRenderer {
    fn default() -> Self {
        Self {
            cursor_ms: 0,
            column: ColumnPosition::for_breath(-1),
        }
    }
}

impl TimelineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor_ms(&self) -> u64 {
        self.cursor_ms
    }

    pub fn column(&self) -> ColumnPosition {
        self.column
    }

    /// Called whenever a phase starts
    pub fn reset_cursor(&mut self) {
        self.cursor_ms = 0;
    }

    /// Paints every row between the cursor and `elapsed_ms`, capped at
    /// [`MAX_PHASE_MS`], and advances the cursor past them.
    pub fn render(&mut self, elapsed_ms: u64, phase: Phase, breath_index: i32) -> Vec<DrawCommand> {
        let x = COLUMN_PITCH * breath_index;
        let mut commands = Vec::new();

        while self.cursor_ms < MAX_PHASE_MS {
            let next = self.cursor_ms + MS_PER_ROW;
            if next > elapsed_ms {
                break;
            }

            let offset = row_offset(next);
            let y = match phase {
                Phase::Exhaling => EXHALE_ORIGIN - offset,
                Phase::Inhaling => INHALE_ORIGIN + offset - 1,
            };

            commands.push(DrawCommand::Paint {
                rect: PaintRect::new(x, y, BAR_WIDTH, 1),
                band: ColorBand::for_rendered_ms(next),
            });
            self.cursor_ms = next;
        }

        commands
    }

    /// Clears both half-spaces of a breath's column
    pub fn undo_last_breath(&self, breath_index: i32) -> Vec<DrawCommand> {
        let x = COLUMN_PITCH * breath_index;
        vec![
            DrawCommand::Erase {
                rect: PaintRect::new(x, 0, BAR_WIDTH, HALF_SPACE_HEIGHT),
            },
            DrawCommand::Erase {
                rect: PaintRect::new(x, INHALE_ORIGIN, BAR_WIDTH, HALF_SPACE_HEIGHT),
            },
        ]
    }

    /// Moves the active column to `breath_index`
    pub fn advance_column(&mut self, breath_index: i32) -> ColumnPosition {
        self.column = ColumnPosition::for_breath(breath_index);
        self.column
    }
}
