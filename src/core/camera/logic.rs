use bevy::math::{Quat, Vec2, Vec3};

const DRAG_SENSITIVITY: f32 = 0.002;
const ARRIVAL_EPSILON: f32 = 0.001;

/// Rotate the planet under a mouse drag. Horizontal motion spins it around the
/// world Y axis, vertical motion tilts it toward the camera. Sensitivity grows
/// with distance so the surface follows the cursor at any zoom.
pub fn drag_rotation(rotation: Quat, delta: Vec2, zoom: f32) -> Quat {
    let sensitivity = DRAG_SENSITIVITY * zoom.max(1.0) / 4.0;
    let yaw = Quat::from_rotation_y(delta.x * sensitivity);
    let pitch = Quat::from_rotation_x(delta.y * sensitivity);
    (yaw * pitch * rotation).normalize()
}

/// Camera distance after a wheel step, kept inside `[min, max]`.
pub fn apply_zoom(zoom: f32, wheel: f32, min: f32, max: f32) -> f32 {
    (zoom - wheel * zoom * 0.1).clamp(min, max)
}

/// One smoothing step toward `target`. Snaps onto it once close enough and
/// reports arrival.
pub fn lerp_toward(current: Vec3, target: Vec3, speed: f32, dt: f32) -> (Vec3, bool) {
    let factor = (speed * dt).min(1.0);
    let next = current.lerp(target, factor);
    if next.distance(target) < ARRIVAL_EPSILON {
        (target, true)
    } else {
        (next, false)
    }
}
