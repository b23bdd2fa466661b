use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::core::camera::components::{CameraLerp, MainCamera};
use crate::core::camera::logic::{apply_zoom, drag_rotation};
use crate::planet::components::{PlanetControls, PlanetEntity};
use crate::planet::events::*;
use crate::planet::logic::{BuildRequest, build_level, planet_mesh};
use crate::planet::resources::*;
use bevy::asset::Assets;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::pbr::{MeshMaterial3d, StandardMaterial};
use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, block_on, futures_lite::future};
use icoplanet::PlanetError;

/// Share of the window on the right covered by the settings panel.
const PANEL_FRACTION: f32 = 0.25;

pub fn request_initial_level(mut requests: MessageWriter<RequestLevelEvent>) {
    requests.write(RequestLevelEvent);
}

pub fn start_level_builds(
    mut requests: MessageReader<RequestLevelEvent>,
    mut build: ResMut<PlanetBuild>,
    settings: Res<ViewerSettings>,
) {
    if requests.read().count() == 0 {
        return;
    }
    if build.is_running() {
        // the running task stops early and the poll restarts with fresh settings
        build.cancel();
        build.dirty = true;
        return;
    }
    spawn_build(&mut build, &settings);
}

fn spawn_build(build: &mut PlanetBuild, settings: &ViewerSettings) {
    let request = BuildRequest::from_settings(settings);
    let planet = build.planet.take();
    let cancel = Arc::new(AtomicBool::new(false));
    build.cancel = cancel.clone();
    build.dirty = false;

    let config = icoplanet::get_config();
    info!("building level {} for seed {}", request.depth, settings.user_seed);
    build.task = Some(
        AsyncComputeTaskPool::get()
            .spawn(async move { build_level(planet, &config, request, &cancel) }),
    );
}

pub fn poll_level_builds(
    mut commands: Commands,
    mut build: ResMut<PlanetBuild>,
    mut stats: ResMut<PlanetStats>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<ViewerSettings>,
    planet_entities: Query<(Entity, &PlanetControls), With<PlanetEntity>>,
    mut camera_query: Query<&mut CameraLerp, With<MainCamera>>,
) {
    let Some(task) = build.task.as_mut() else {
        return;
    };
    let Some(outcome) = block_on(future::poll_once(task)) else {
        return;
    };
    build.task = None;
    build.planet = outcome.planet;

    let stale = outcome.request != BuildRequest::from_settings(&settings);
    match outcome.result {
        Ok((data, level_stats)) if !stale => {
            let previous = planet_entities.iter().next();
            let rotation = previous.map(|(_, c)| c.rotation).unwrap_or(Quat::IDENTITY);
            let zoom = previous.map(|(_, c)| c.zoom).unwrap_or(settings.radius * 4.0);
            for (entity, _) in planet_entities.iter() {
                commands.entity(entity).despawn();
            }

            commands.spawn((
                Mesh3d(meshes.add(planet_mesh(data))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::WHITE,
                    perceptual_roughness: 0.9,
                    ..default()
                })),
                Transform::from_rotation(rotation),
                PlanetEntity,
                PlanetControls {
                    rotation,
                    zoom,
                    min_zoom: settings.radius * 1.25,
                    max_zoom: settings.radius * 10.0,
                },
            ));
            if previous.is_none() {
                if let Ok(mut lerp) = camera_query.single_mut() {
                    lerp.target_position = Vec3::new(0.0, 0.0, zoom);
                    lerp.is_lerping = true;
                }
            }
            info!(
                "showing level {}: {} faces, {} fault links, {} plates",
                level_stats.depth, level_stats.faces, level_stats.fault_links, level_stats.plates
            );
            *stats = level_stats;
        }
        Ok(_) | Err(PlanetError::Cancelled) => {}
        Err(err) => warn!("planet build failed: {err}"),
    }

    if build.dirty || stale {
        spawn_build(&mut build, &settings);
    }
}

pub fn handle_generate_new_seed(
    mut events: MessageReader<GenerateNewSeedEvent>,
    mut settings: ResMut<ViewerSettings>,
    mut regenerate: MessageWriter<RegeneratePlanetEvent>,
) {
    for _ in events.read() {
        settings.user_seed = icoplanet::generate_seed();
        settings.seed = icoplanet::expand_seed(settings.user_seed);
        regenerate.write(RegeneratePlanetEvent);
    }
}

pub fn handle_regenerate(
    mut events: MessageReader<RegeneratePlanetEvent>,
    mut build: ResMut<PlanetBuild>,
    mut requests: MessageWriter<RequestLevelEvent>,
) {
    if events.read().count() == 0 {
        return;
    }
    icoplanet::reload_config();
    build.discard();
    requests.write(RequestLevelEvent);
}

pub fn planet_control(
    mouse_input: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut planet_query: Query<(&mut Transform, &mut PlanetControls), With<PlanetEntity>>,
    mut camera_query: Query<&mut CameraLerp, With<MainCamera>>,
    windows: Query<&Window>,
) {
    let Ok((mut planet_transform, mut controls)) = planet_query.single_mut() else {
        return;
    };
    let Ok(mut camera_lerp) = camera_query.single_mut() else {
        return;
    };

    let is_over_ui = windows
        .single()
        .ok()
        .and_then(|window| {
            let cursor = window.cursor_position()?;
            Some(cursor.x > window.width() * (1.0 - PANEL_FRACTION))
        })
        .unwrap_or(false);
    if is_over_ui {
        mouse_motion.clear();
        mouse_wheel.clear();
        return;
    }

    if mouse_input.pressed(MouseButton::Left) {
        for motion in mouse_motion.read() {
            controls.rotation = drag_rotation(controls.rotation, motion.delta, controls.zoom);
        }
        planet_transform.rotation = controls.rotation;
    } else {
        mouse_motion.clear();
    }

    for wheel in mouse_wheel.read() {
        controls.zoom = apply_zoom(controls.zoom, wheel.y, controls.min_zoom, controls.max_zoom);
        camera_lerp.target_position = Vec3::new(0.0, 0.0, controls.zoom);
        camera_lerp.is_lerping = true;
    }
}
