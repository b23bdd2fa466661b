use bevy::prelude::*;

#[derive(Component, Reflect)]
pub struct MainCamera;

/// Eases the camera toward `target_position`, always looking at the origin.
#[derive(Component, Reflect)]
pub struct CameraLerp {
    pub target_position: Vec3,
    pub lerp_speed: f32,
    pub is_lerping: bool,
}
