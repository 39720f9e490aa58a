//! Configuration constants for the breath tuner.
//!
//! The default profile reproduces the reference rendering exactly; tune with care.

/// Longest half-breath that can be rendered, in milliseconds
pub const MAX_PHASE_MS: u64 = 35_000;

/// Maximum number of breaths in one session (also sets the canvas width)
pub const MAX_BREATHS: i32 = 100;

/// Period of the external tick driving live rendering
pub const TICK_INTERVAL_MS: u64 = 100;

/// Elapsed phase time is rounded to this granularity before display and rendering
pub const ROUNDING_MS: u64 = 100;

/// Toggles this soon after a phase started are reported as rapid double presses
pub const DOUBLE_PRESS_WINDOW_MS: u64 = 2_000;

/// Bar height: painted rows per second of phase time
pub const BAR_HEIGHT: i32 = 5;

/// Phase time represented by one painted row (200ms)
pub const MS_PER_ROW: u64 = 1_000 / BAR_HEIGHT as u64;

/// Bar width
pub const BAR_WIDTH: i32 = BAR_HEIGHT * 4;

/// Unpainted rows inserted at every started second
pub const BAR_SECOND_GAP: i32 = 2;

/// Horizontal space between breath columns
pub const BAR_COLUMN_GAP: i32 = 4;

/// Horizontal distance from one breath column to the next
pub const COLUMN_PITCH: i32 = BAR_WIDTH + BAR_COLUMN_GAP;

/// X-axis height
pub const X_AXIS_HEIGHT: i32 = 2;

/// Canvas height: both half-spaces plus a graticule mark at each edge
pub const CANVAS_HEIGHT: i32 = X_AXIS_HEIGHT
    + (BAR_SECOND_GAP + BAR_HEIGHT) * (MAX_PHASE_MS / 1_000) as i32 * 2
    + (BAR_SECOND_GAP + BAR_HEIGHT) * 2;

/// Canvas width
pub const CANVAS_WIDTH: i32 = COLUMN_PITCH * MAX_BREATHS - BAR_COLUMN_GAP;

/// Y coordinate of the x-axis' top edge; exhale rows grow upward from here
pub const EXHALE_ORIGIN: i32 = CANVAS_HEIGHT / 2 - X_AXIS_HEIGHT / 2;

/// Y coordinate of the x-axis' bottom edge; inhale rows grow downward from here
pub const INHALE_ORIGIN: i32 = CANVAS_HEIGHT / 2 + X_AXIS_HEIGHT / 2;

/// Height of one half-space, cleared per column on undo
pub const HALF_SPACE_HEIGHT: i32 = (CANVAS_HEIGHT - X_AXIS_HEIGHT) / 2;

/// Session export output directory
pub const SESSIONS_DIR: &str = "breath_sessions";

/// UI Colors
pub mod colors {
    use bevy::prelude::*;

    pub const BACKGROUND: Color = Color::srgb(0.1, 0.1, 0.12);
    pub const PANEL_BG: Color = Color::srgb(0.15, 0.15, 0.18);
    pub const CANVAS_BG: Color = Color::srgba(0.0, 0.0, 0.0, 0.3);
    pub const TEXT_PRIMARY: Color = Color::srgb(0.95, 0.95, 0.95);
    pub const TEXT_SECONDARY: Color = Color::srgb(0.6, 0.6, 0.65);
    pub const ACCENT: Color = Color::srgb(0.3, 0.7, 0.9);
    pub const BUTTON: Color = Color::srgb(0.22, 0.22, 0.26);
    pub const BUTTON_HOVER: Color = Color::srgb(0.3, 0.3, 0.36);
    pub const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.7, 0.9);
    pub const X_AXIS: Color = Color::srgb(0.95, 0.95, 0.95);
    /// Graticule marks share the hue of the last color band
    pub const GRATICULE: Color = Color::hsl(315.0, 0.8, 0.5);
}

/// UI Sizing
pub mod sizes {
    use bevy::prelude::*;

    pub const SIDEBAR_WIDTH: Val = Val::Px(320.0);
    pub const PANEL_PADDING: Val = Val::Px(16.0);
    pub const PANEL_MARGIN: Val = Val::Px(8.0);

    pub const FONT_SIZE_TITLE: f32 = 28.0;
    pub const FONT_SIZE_HEADING: f32 = 20.0;
    pub const FONT_SIZE_BODY: f32 = 16.0;
    pub const FONT_SIZE_SMALL: f32 = 13.0;
    pub const FONT_SIZE_LARGE_METRIC: f32 = 48.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_geometry_matches_reference_canvas() {
        assert_eq!(MS_PER_ROW, 200);
        assert_eq!(CANVAS_HEIGHT, 506);
        assert_eq!(CANVAS_WIDTH, 2396);
        assert_eq!(EXHALE_ORIGIN, 252);
        assert_eq!(INHALE_ORIGIN, 254);
        assert_eq!(HALF_SPACE_HEIGHT, 252);
    }
}
