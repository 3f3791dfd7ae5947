use hecs::World;

pub mod components;
pub mod systems;

use crate::domain::screen::ScreenPoint;
use crate::domain::trades::Side;
use components::{MarkerRadius, MarkerSide, ScreenPosition, SpawnedAt};

/// Entity store for the markers currently on screen.
#[derive(Default)]
pub struct MarkerWorld {
    pub world: World,
    spawned_total: u64,
}

impl MarkerWorld {
    pub fn new() -> Self {
        Self { world: World::new(), spawned_total: 0 }
    }

    pub fn spawn_marker(
        &mut self,
        position: ScreenPoint,
        side: Side,
        radius: f64,
        now: f64,
    ) -> hecs::Entity {
        self.spawned_total += 1;
        self.world.spawn((
            ScreenPosition(position),
            MarkerSide(side),
            MarkerRadius(radius),
            SpawnedAt(now),
        ))
    }

    pub fn active_count(&self) -> usize {
        self.world.len() as usize
    }

    /// Markers ever spawned, including those already faded out.
    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn clear(&mut self) {
        self.world.clear();
    }
}
