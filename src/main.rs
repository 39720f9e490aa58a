//! Breath Tuner
//!
//! Space/Enter switches between exhaling and inhaling, Esc stops,
//! Backspace deletes the last breath, S saves the session.
//!
//! Run with: `cargo run --release`

use bevy::prelude::*;
use breath_tuner::{BreathTunerPlugin, BreathUiPlugin};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Breath Tuner".into(),
                resolution: (1280u32, 800u32).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((BreathTunerPlugin, BreathUiPlugin))
        .run();
}
