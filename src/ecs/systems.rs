use hecs::World;

use super::components::{MarkerRadius, MarkerSide, ScreenPosition, SpawnedAt};
use crate::domain::screen::ScreenPoint;
use crate::domain::trades::Side;

/// A live marker after the fade step, ready to be turned into a sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadingMarker {
    pub position: ScreenPoint,
    pub side: Side,
    pub base_radius: f64,
    pub scale: f64,
}

/// Remaining size factor for a marker `elapsed` ms old, or `None` once it has faded out.
pub fn fade_scale(elapsed: f64, fade_duration: f64) -> Option<f64> {
    let elapsed = elapsed.max(0.0);
    if fade_duration <= 0.0 || elapsed >= fade_duration {
        return None;
    }
    let scale = 1.0 - elapsed / fade_duration;
    (scale > 0.0).then_some(scale)
}

/// Ages every marker to `now`, despawning the ones whose fade has ended.
/// Frames stamped before a marker's spawn time treat it as brand new.
pub fn fade_markers(world: &mut World, now: f64, fade_duration: f64) -> Vec<FadingMarker> {
    let mut expired = Vec::new();
    let mut alive = Vec::new();

    for (entity, (position, side, radius, spawned)) in world
        .query::<(&ScreenPosition, &MarkerSide, &MarkerRadius, &SpawnedAt)>()
        .iter()
    {
        match fade_scale(now - spawned.0, fade_duration) {
            Some(scale) => alive.push(FadingMarker {
                position: position.0,
                side: side.0,
                base_radius: radius.0,
                scale,
            }),
            None => expired.push(entity),
        }
    }

    for entity in expired {
        let _ = world.despawn(entity);
    }
    alive
}
