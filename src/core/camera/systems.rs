use crate::core::camera::components::{CameraLerp, MainCamera};
use crate::core::camera::logic::lerp_toward;
use bevy::light::DirectionalLight;
use bevy::log::info;
use bevy::math::{EulerRot, Quat, Vec3};
use bevy::prelude::*;
use std::f32::consts::PI;

pub const START_DISTANCE: f32 = 8.0;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, START_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
        CameraLerp {
            target_position: Vec3::new(0.0, 0.0, START_DISTANCE),
            lerp_speed: 3.0,
            is_lerping: false,
        },
    ));

    commands.spawn((
        Transform::from_rotation(Quat::from_euler(EulerRot::ZYX, 0.0, 1.0, -PI / 4.)),
        DirectionalLight::default(),
    ));

    info!("Camera spawned");
}

pub fn smooth_camera_movement(
    time: Res<Time>,
    mut camera_query: Query<(&mut Transform, &mut CameraLerp), With<MainCamera>>,
) {
    let Ok((mut transform, mut lerp)) = camera_query.single_mut() else {
        return;
    };
    if !lerp.is_lerping {
        return;
    }

    let (translation, arrived) = lerp_toward(
        transform.translation,
        lerp.target_position,
        lerp.lerp_speed,
        time.delta_secs(),
    );
    transform.translation = translation;
    transform.look_at(Vec3::ZERO, Vec3::Y);
    lerp.is_lerping = !arrived;
}
