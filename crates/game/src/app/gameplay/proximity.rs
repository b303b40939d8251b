use engine::Vec2;

pub(crate) const INTERACTION_RADIUS: f32 = 0.8;

/// Inclusive reach test: a target exactly `radius` away is still near.
pub(crate) fn is_near(a: Vec2, b: Vec2, radius: f32) -> bool {
    if !radius.is_finite() || radius < 0.0 {
        return false;
    }
    a.distance_sq(b) <= radius * radius
}
