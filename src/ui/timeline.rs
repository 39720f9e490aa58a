//! Timeline canvas: paints and erases tuner draw commands.
//!
//! The canvas is a fixed-size node inside a clipped viewport. Each painted
//! row becomes one absolutely positioned child node. The canvas is shifted
//! horizontally so the active breath column stays under the reference mark
//! at the viewport's center.

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use crate::config::{colors, BAR_HEIGHT, BAR_WIDTH, CANVAS_HEIGHT, CANVAS_WIDTH, EXHALE_ORIGIN, X_AXIS_HEIGHT};
use crate::tuner::{BreathTuner, ColorBand, ColumnPosition, DrawCommand, PaintRect};
use crate::ui::styles::{canvas_rect_node, px};

#[derive(Component)]
pub struct TimelineViewport;

#[derive(Component)]
pub struct TimelineCanvas;

/// A painted row and the canvas rectangle it covers
#[derive(Component)]
pub struct PaintedSegment(pub PaintRect);

pub fn spawn_timeline(parent: &mut ChildSpawnerCommands) {
    let initial = ColumnPosition::for_breath(-1);

    parent
        .spawn((
            TimelineViewport,
            Node {
                width: Val::Percent(100.0),
                height: px(CANVAS_HEIGHT as f32),
                overflow: Overflow::clip(),
                ..default()
            },
            BackgroundColor(colors::CANVAS_BG),
        ))
        .with_children(|viewport| {
            viewport.spawn((
                TimelineCanvas,
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Percent(50.0),
                    top: px(0.0),
                    width: px(CANVAS_WIDTH as f32),
                    height: px(CANVAS_HEIGHT as f32),
                    margin: UiRect::left(px(initial.view_offset as f32)),
                    ..default()
                },
            ));

            // X-axis across the whole viewport
            viewport.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: px(0.0),
                    top: px(EXHALE_ORIGIN as f32),
                    width: Val::Percent(100.0),
                    height: px(X_AXIS_HEIGHT as f32),
                    ..default()
                },
                BackgroundColor(colors::X_AXIS),
            ));

            // Reference marks at the top and bottom edge
            for top in [0, CANVAS_HEIGHT - BAR_HEIGHT] {
                viewport.spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Percent(50.0),
                        top: px(top as f32),
                        width: px(BAR_WIDTH as f32),
                        height: px(BAR_HEIGHT as f32),
                        margin: UiRect::left(px(-(BAR_WIDTH as f32) / 2.0)),
                        ..default()
                    },
                    BackgroundColor(colors::GRATICULE),
                ));
            }
        });
}

/// Apply queued draw commands in order
pub fn paint_timeline(
    mut commands: Commands,
    mut tuner: ResMut<BreathTuner>,
    canvas: Single<Entity, With<TimelineCanvas>>,
    segments: Query<(Entity, &PaintedSegment)>,
) {
    // Leave change detection untouched when there is nothing to draw
    if tuner.pending_draw_commands().is_empty() {
        return;
    }

    let canvas = canvas.into_inner();
    let mut pending: Vec<(PaintRect, ColorBand)> = Vec::new();
    let mut erased = Vec::new();

    for command in tuner.take_draw_commands() {
        match command {
            DrawCommand::Paint { rect, band } => pending.push((rect, band)),
            DrawCommand::Erase { rect } => {
                pending.retain(|(painted, _)| !rect.contains(painted));
                for (entity, segment) in &segments {
                    if rect.contains(&segment.0) && !erased.contains(&entity) {
                        commands.entity(entity).despawn();
                        erased.push(entity);
                    }
                }
            }
        }
    }

    for (rect, band) in pending {
        commands.spawn((
            PaintedSegment(rect),
            canvas_rect_node(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32),
            BackgroundColor(band.color()),
            ChildOf(canvas),
        ));
    }
}

/// Keep the active column under the reference mark
pub fn update_canvas_offset(tuner: Res<BreathTuner>, canvas: Single<&mut Node, With<TimelineCanvas>>) {
    let mut node = canvas.into_inner();
    node.margin.left = px(tuner.column().view_offset as f32);
}
