//! Main dashboard UI layout, controls and text update systems.

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use crate::config::{colors, sizes, MAX_BREATHS};
use crate::metrics::StatsDisplay;
use crate::plugin::{BreathCommand, SaveSessionRequest};
use crate::state::Phase;
use crate::tuner::BreathTuner;
use crate::ui::styles::*;
use crate::ui::timeline::spawn_timeline;

// =============================================================================
// UI Marker Components
// =============================================================================

#[derive(Component)]
pub struct UiRoot;

#[derive(Component)]
pub struct BreathNumberText;

#[derive(Component)]
pub struct PhaseText;

#[derive(Component)]
pub struct PhaseTimerText(pub Phase);

/// One cell of the statistics table
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsCell {
    ExhaleSum,
    ExhaleAvg,
    ExhaleRatio,
    InhaleSum,
    InhaleAvg,
    InhaleRatio,
    BreathSum,
    BreathAvg,
}

impl StatsCell {
    pub fn value<'a>(&self, display: &'a StatsDisplay) -> &'a str {
        match self {
            Self::ExhaleSum => &display.exh_sum,
            Self::ExhaleAvg => &display.exh_avg,
            Self::ExhaleRatio => &display.exh_ratio,
            Self::InhaleSum => &display.inh_sum,
            Self::InhaleAvg => &display.inh_avg,
            Self::InhaleRatio => &display.inh_ratio,
            Self::BreathSum => &display.breath_sum,
            Self::BreathAvg => &display.breath_avg,
        }
    }
}

/// On-screen control
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlButton {
    Switch,
    Stop,
    Back,
    Save,
}

impl ControlButton {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Switch => "Switch",
            Self::Stop => "Stop",
            Self::Back => "Back",
            Self::Save => "Save",
        }
    }

    pub fn all() -> &'static [ControlButton] {
        &[Self::Switch, Self::Stop, Self::Back, Self::Save]
    }

    /// Command sent when pressed; `None` for export
    pub fn command(&self) -> Option<BreathCommand> {
        match self {
            Self::Switch => Some(BreathCommand::Toggle),
            Self::Stop => Some(BreathCommand::Stop),
            Self::Back => Some(BreathCommand::Undo),
            Self::Save => None,
        }
    }

    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Space | KeyCode::Enter | KeyCode::NumpadEnter => Some(Self::Switch),
            KeyCode::Escape => Some(Self::Stop),
            KeyCode::Backspace => Some(Self::Back),
            KeyCode::KeyS => Some(Self::Save),
            _ => None,
        }
    }
}

// =============================================================================
// UI Setup
// =============================================================================

pub fn setup_ui(mut commands: Commands) {
    // Root container - full screen
    commands
        .spawn((
            UiRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Row,
                ..default()
            },
            BackgroundColor(colors::BACKGROUND),
        ))
        .with_children(|parent| {
            // Left sidebar
            spawn_sidebar(parent);

            // Main content area (timeline)
            spawn_main_content(parent);
        });
}

fn spawn_sidebar(parent: &mut ChildSpawnerCommands) {
    parent
        .spawn((
            Node {
                width: sizes::SIDEBAR_WIDTH,
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(sizes::PANEL_PADDING),
                ..default()
            },
            BackgroundColor(colors::PANEL_BG),
        ))
        .with_children(|sidebar| {
            sidebar.spawn((
                Text::new("Breath Tuner"),
                title_text_font(),
                TextColor(colors::TEXT_PRIMARY),
            ));

            sidebar.spawn(section_spacing());

            spawn_breath_section(sidebar);
            spawn_stats_section(sidebar);
            spawn_controls_section(sidebar);
        });
}

fn spawn_breath_section(parent: &mut ChildSpawnerCommands) {
    parent.spawn((
        Text::new("Breath"),
        small_text_font(),
        TextColor(colors::TEXT_SECONDARY),
    ));

    parent.spawn((
        BreathNumberText,
        Text::new("0"),
        large_metric_font(),
        TextColor(colors::TEXT_PRIMARY),
    ));

    parent.spawn((
        Text::new(format!("of {}", MAX_BREATHS)),
        small_text_font(),
        TextColor(colors::TEXT_SECONDARY),
        Node {
            margin: UiRect::bottom(Val::Px(16.0)),
            ..default()
        },
    ));

    parent.spawn((
        PhaseText,
        Text::new("Idle"),
        body_text_font(),
        TextColor(colors::TEXT_SECONDARY),
        Node {
            margin: UiRect::bottom(Val::Px(8.0)),
            ..default()
        },
    ));

    for phase in [Phase::Exhaling, Phase::Inhaling] {
        parent.spawn(row_node()).with_children(|row| {
            row.spawn((
                Text::new(format!("{:<10}", phase.name())),
                small_text_font(),
                TextColor(colors::TEXT_SECONDARY),
            ));
            row.spawn((
                PhaseTimerText(phase),
                Text::new("0.0"),
                heading_text_font(),
                TextColor(colors::TEXT_PRIMARY),
            ));
        });
    }

    parent.spawn(divider());
}

fn spawn_stats_section(parent: &mut ChildSpawnerCommands) {
    parent.spawn((
        Text::new("Statistics"),
        heading_text_font(),
        TextColor(colors::TEXT_SECONDARY),
        Node {
            margin: UiRect::bottom(Val::Px(8.0)),
            ..default()
        },
    ));

    let table = [
        ("", ["Sum", "Avg", "Ratio"].map(Err)),
        (
            "Exhale",
            [StatsCell::ExhaleSum, StatsCell::ExhaleAvg, StatsCell::ExhaleRatio].map(Ok),
        ),
        (
            "Inhale",
            [StatsCell::InhaleSum, StatsCell::InhaleAvg, StatsCell::InhaleRatio].map(Ok),
        ),
    ];

    for (label, cells) in table {
        spawn_stats_row(parent, label, &cells);
    }
    spawn_stats_row(
        parent,
        "Breath",
        &[Ok(StatsCell::BreathSum), Ok(StatsCell::BreathAvg)],
    );

    parent.spawn(divider());
}

/// `Ok` cells show live values, `Err` cells are fixed headers
fn spawn_stats_row(
    parent: &mut ChildSpawnerCommands,
    label: &str,
    cells: &[Result<StatsCell, &'static str>],
) {
    let defaults = StatsDisplay::default();

    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            margin: UiRect::bottom(Val::Px(4.0)),
            ..default()
        })
        .with_children(|row| {
            row.spawn((
                Text::new(label),
                small_text_font(),
                TextColor(colors::TEXT_SECONDARY),
                Node {
                    width: Val::Px(64.0),
                    ..default()
                },
            ));
            for cell in cells {
                let column = Node {
                    width: Val::Px(72.0),
                    ..default()
                };
                match cell {
                    Ok(stat) => {
                        row.spawn((
                            *stat,
                            Text::new(stat.value(&defaults)),
                            body_text_font(),
                            TextColor(colors::TEXT_PRIMARY),
                            column,
                        ));
                    }
                    Err(header) => {
                        row.spawn((
                            Text::new(*header),
                            small_text_font(),
                            TextColor(colors::TEXT_SECONDARY),
                            column,
                        ));
                    }
                }
            }
        });
}

fn spawn_controls_section(parent: &mut ChildSpawnerCommands) {
    parent.spawn(section_spacing());

    parent.spawn((
        Text::new("Controls"),
        heading_text_font(),
        TextColor(colors::TEXT_SECONDARY),
        Node {
            margin: UiRect::bottom(Val::Px(8.0)),
            ..default()
        },
    ));

    let controls = [
        ("Space", "Switch exhale/inhale"),
        ("Enter", "Switch exhale/inhale"),
        ("Esc", "Stop"),
        ("Backspace", "Delete last breath"),
        ("S", "Save session"),
    ];

    for (key, action) in controls {
        parent
            .spawn(Node {
                flex_direction: FlexDirection::Row,
                margin: UiRect::bottom(Val::Px(4.0)),
                ..default()
            })
            .with_children(|row| {
                row.spawn((
                    Text::new(format!("{:<11}", key)),
                    small_text_font(),
                    TextColor(colors::ACCENT),
                ));
                row.spawn((
                    Text::new(action),
                    small_text_font(),
                    TextColor(colors::TEXT_SECONDARY),
                ));
            });
    }

    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            column_gap: Val::Px(8.0),
            margin: UiRect::top(Val::Px(12.0)),
            ..default()
        })
        .with_children(|buttons| {
            for control in ControlButton::all() {
                buttons
                    .spawn((
                        Button,
                        *control,
                        button_node(),
                        BackgroundColor(colors::BUTTON),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new(control.label()),
                            body_text_font(),
                            TextColor(colors::TEXT_PRIMARY),
                        ));
                    });
            }
        });
}

fn spawn_main_content(parent: &mut ChildSpawnerCommands) {
    parent
        .spawn(Node {
            flex_grow: 1.0,
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            padding: UiRect::all(Val::Px(24.0)),
            ..default()
        })
        .with_children(|main| {
            main.spawn((
                Text::new("Breath Timeline"),
                heading_text_font(),
                TextColor(colors::TEXT_PRIMARY),
                Node {
                    margin: UiRect::bottom(Val::Px(16.0)),
                    ..default()
                },
            ));

            spawn_timeline(main);
        });
}

// =============================================================================
// Input Systems
// =============================================================================

pub fn handle_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut breath_commands: MessageWriter<BreathCommand>,
    mut save_events: MessageWriter<SaveSessionRequest>,
) {
    for key in keyboard.get_just_pressed() {
        if let Some(control) = ControlButton::from_key(*key) {
            send_control(control, &mut breath_commands, &mut save_events);
        }
    }
}

pub fn handle_control_buttons(
    query: Query<(&Interaction, &ControlButton), Changed<Interaction>>,
    mut breath_commands: MessageWriter<BreathCommand>,
    mut save_events: MessageWriter<SaveSessionRequest>,
) {
    for (interaction, control) in &query {
        if *interaction == Interaction::Pressed {
            send_control(*control, &mut breath_commands, &mut save_events);
        }
    }
}

fn send_control(
    control: ControlButton,
    breath_commands: &mut MessageWriter<BreathCommand>,
    save_events: &mut MessageWriter<SaveSessionRequest>,
) {
    match control.command() {
        Some(command) => {
            breath_commands.write(command);
        }
        None => {
            save_events.write(SaveSessionRequest);
        }
    }
}

pub fn update_button_colors(
    mut query: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut bg_color) in &mut query {
        bg_color.0 = match interaction {
            Interaction::Pressed => colors::BUTTON_PRESSED,
            Interaction::Hovered => colors::BUTTON_HOVER,
            Interaction::None => colors::BUTTON,
        };
    }
}

// =============================================================================
// Update Systems
// =============================================================================

pub fn update_breath_number_display(
    tuner: Res<BreathTuner>,
    query: Single<&mut Text, With<BreathNumberText>>,
) {
    let mut text = query.into_inner();
    **text = tuner.breath_number().to_string();
}

pub fn update_phase_display(
    tuner: Res<BreathTuner>,
    query: Single<(&mut Text, &mut TextColor), With<PhaseText>>,
) {
    let (mut text, mut color) = query.into_inner();
    let state = tuner.state();
    **text = if tuner.at_capacity() && !state.is_running() {
        "Session full".to_string()
    } else {
        state.name().to_string()
    };
    color.0 = clock_state_color(state);
}

pub fn update_timer_displays(tuner: Res<BreathTuner>, mut query: Query<(&PhaseTimerText, &mut Text)>) {
    for (timer, mut text) in &mut query {
        **text = tuner.phase_text(timer.0);
    }
}

pub fn update_stats_display(tuner: Res<BreathTuner>, mut query: Query<(&StatsCell, &mut Text)>) {
    let display = tuner.stats_display();
    for (cell, mut text) in &mut query {
        **text = cell.value(&display).to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_the_button_mapping() {
        assert_eq!(ControlButton::from_key(KeyCode::Space), Some(ControlButton::Switch));
        assert_eq!(ControlButton::from_key(KeyCode::Enter), Some(ControlButton::Switch));
        assert_eq!(ControlButton::from_key(KeyCode::Escape), Some(ControlButton::Stop));
        assert_eq!(ControlButton::from_key(KeyCode::Backspace), Some(ControlButton::Back));
        assert_eq!(ControlButton::from_key(KeyCode::KeyX), None);

        assert_eq!(ControlButton::Back.command(), Some(BreathCommand::Undo));
        assert_eq!(ControlButton::Save.command(), None);
    }

    #[test]
    fn stats_cells_pick_their_field() {
        let display = StatsDisplay::default();
        assert_eq!(StatsCell::ExhaleRatio.value(&display), "—");
        assert_eq!(StatsCell::BreathSum.value(&display), "0:00.0");
        assert_eq!(StatsCell::InhaleAvg.value(&display), "0.0");
    }
}
