use crate::domain::screen::ScreenPoint;
use crate::domain::trades::Side;

/// Projected marker centre in map-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPosition(pub ScreenPoint);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSide(pub Side);

/// Radius before fading is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerRadius(pub f64);

/// Frame timestamp (ms) at which the marker appeared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnedAt(pub f64);
