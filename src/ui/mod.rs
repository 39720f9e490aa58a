//! User interface for the breath tuner.
//!
//! Maps keyboard and button input to tuner commands and paints the tuner's
//! output: breath number, phase timers, statistics table and the timeline.

mod dashboard;
mod styles;
mod timeline;

pub use dashboard::*;
pub use styles::{
    body_text_font, button_node, canvas_rect_node, clock_state_color, divider,
    heading_text_font, large_metric_font, px, row_node, section_spacing, small_text_font,
    title_text_font,
};
pub use timeline::*;

use bevy::prelude::*;

use crate::plugin::TunerSet;
use crate::tuner::BreathTuner;

/// Plugin for breath tuner input and display
pub struct BreathUiPlugin;

impl Plugin for BreathUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, setup_ui))
            .add_systems(
                Update,
                (handle_keyboard, handle_control_buttons, update_button_colors)
                    .in_set(TunerSet::Input),
            )
            .add_systems(
                Update,
                (
                    paint_timeline,
                    (
                        update_canvas_offset,
                        update_breath_number_display,
                        update_phase_display,
                        update_timer_displays,
                        update_stats_display,
                    )
                        .run_if(resource_changed::<BreathTuner>),
                )
                    .chain()
                    .in_set(TunerSet::Display),
            );
    }
}

/// Setup the camera for UI rendering
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
