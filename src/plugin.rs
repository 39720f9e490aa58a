//! Core plugin: applies breath commands and drives the periodic tick.
//!
//! Contains no input handling or rendering, so it also runs headless.

use std::time::Duration;

use bevy::ecs::message::Message;
use bevy::ecs::schedule::SystemSet;
use bevy::prelude::*;
use bevy::time::common_conditions::on_timer;

use crate::config::{SESSIONS_DIR, TICK_INTERVAL_MS};
use crate::tuner::BreathTuner;

/// Control signal delivered to the tuner
#[derive(Event, Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathCommand {
    /// Switch between exhaling and inhaling
    Toggle,
    /// Pause after the current phase
    Stop,
    /// Delete the newest breath
    Undo,
}

/// Event requesting the session to be exported
#[derive(Event, Message)]
pub struct SaveSessionRequest;

/// Frame ordering: input → core → display
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TunerSet {
    /// Systems that turn devices into [`BreathCommand`]s
    Input,
    /// Command application and ticking
    Core,
    /// Systems that paint tuner output
    Display,
}

/// Main plugin for the breath tuner core
pub struct BreathTunerPlugin;

impl Plugin for BreathTunerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BreathTuner>()
            .add_message::<BreathCommand>()
            .add_message::<SaveSessionRequest>()
            .configure_sets(
                Update,
                (TunerSet::Input, TunerSet::Core, TunerSet::Display).chain(),
            )
            .add_systems(
                Update,
                (
                    apply_commands,
                    tick_tuner
                        .run_if(tuner_running)
                        .run_if(on_timer(Duration::from_millis(TICK_INTERVAL_MS))),
                    handle_save_request,
                )
                    .chain()
                    .in_set(TunerSet::Core),
            );
    }
}

/// Run condition: a phase timer is active
pub fn tuner_running(tuner: Res<BreathTuner>) -> bool {
    tuner.is_running()
}

/// Apply queued commands in arrival order
fn apply_commands(
    mut commands: MessageReader<BreathCommand>,
    time: Res<Time<Real>>,
    mut tuner: ResMut<BreathTuner>,
) {
    let now = time.elapsed();
    for command in commands.read() {
        match command {
            BreathCommand::Toggle => tuner.toggle(now),
            BreathCommand::Stop => tuner.stop(now),
            BreathCommand::Undo => tuner.undo(now),
        }
    }
}

/// Render the running phase up to the current time
fn tick_tuner(time: Res<Time<Real>>, mut tuner: ResMut<BreathTuner>) {
    tuner.on_tick(time.elapsed());
}

/// Handle save session request
fn handle_save_request(mut events: MessageReader<SaveSessionRequest>, tuner: Res<BreathTuner>) {
    for _event in events.read() {
        match tuner.report().save(SESSIONS_DIR) {
            Ok(path) => {
                info!("Session saved to: {}", path.display());
            }
            Err(e) => {
                error!("Failed to save session: {}", e);
            }
        }
    }
}
