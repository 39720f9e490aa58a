//! UI styling utilities and helper functions.

use bevy::prelude::*;

use crate::config::{colors, sizes};
use crate::state::{ClockState, Phase};

/// Create a row layout node
pub fn row_node() -> Node {
    Node {
        flex_direction: FlexDirection::Row,
        align_items: AlignItems::Center,
        column_gap: Val::Px(8.0),
        ..default()
    }
}

/// Create title text style
pub fn title_text_font() -> TextFont {
    TextFont {
        font_size: sizes::FONT_SIZE_TITLE,
        ..default()
    }
}

/// Create heading text style
pub fn heading_text_font() -> TextFont {
    TextFont {
        font_size: sizes::FONT_SIZE_HEADING,
        ..default()
    }
}

/// Create body text style
pub fn body_text_font() -> TextFont {
    TextFont {
        font_size: sizes::FONT_SIZE_BODY,
        ..default()
    }
}

/// Create small text style
pub fn small_text_font() -> TextFont {
    TextFont {
        font_size: sizes::FONT_SIZE_SMALL,
        ..default()
    }
}

/// Create large metric text style
pub fn large_metric_font() -> TextFont {
    TextFont {
        font_size: sizes::FONT_SIZE_LARGE_METRIC,
        ..default()
    }
}

/// Standard spacing between sections
pub fn section_spacing() -> Node {
    Node {
        height: Val::Px(16.0),
        ..default()
    }
}

/// Divider line
pub fn divider() -> (Node, BackgroundColor) {
    (
        Node {
            height: Val::Px(1.0),
            width: Val::Percent(100.0),
            margin: UiRect::vertical(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(colors::TEXT_SECONDARY.with_alpha(0.3)),
    )
}

/// Control button frame
pub fn button_node() -> Node {
    Node {
        padding: UiRect::new(Val::Px(12.0), Val::Px(12.0), Val::Px(6.0), Val::Px(6.0)),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
    }
}

/// Absolutely positioned box in canvas pixels
pub fn canvas_rect_node(left: f32, top: f32, width: f32, height: f32) -> Node {
    Node {
        position_type: PositionType::Absolute,
        left: px(left),
        top: px(top),
        width: px(width),
        height: px(height),
        ..default()
    }
}

/// Get color for the phase indicator
pub fn clock_state_color(state: ClockState) -> Color {
    match state {
        ClockState::Idle => colors::TEXT_SECONDARY,
        ClockState::Running(Phase::Exhaling) => colors::ACCENT,
        ClockState::Running(Phase::Inhaling) => colors::TEXT_PRIMARY,
    }
}

/// Shorthand for pixel values
pub fn px(value: f32) -> Val {
    Val::Px(value)
}
