use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DegenerateGeometry;
use crate::graph::Point;

pub const DEFAULT_FIXED_RATE: f64 = 0.2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatePolicy {
    /// Fresh uniform draw in `[0, 1)` for every trial.
    #[default]
    Random,
    Fixed(f64),
}

impl RatePolicy {
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            RatePolicy::Random => rng.gen::<f64>(),
            RatePolicy::Fixed(rate) => *rate,
        }
    }
}

/// Moves `movable` along the line from `fixed` by `signed_error * rate`.
///
/// Positive error pushes it away from `fixed`, negative pulls it closer.
pub fn adjust(
    fixed: Point,
    movable: Point,
    signed_error: f64,
    rate: f64,
) -> Result<Point, DegenerateGeometry> {
    let dx = movable.x - fixed.x;
    let dy = movable.y - fixed.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return Err(DegenerateGeometry {
            x: fixed.x,
            y: fixed.y,
        });
    }
    let step = signed_error * rate / len;
    Ok(Point::new(movable.x + step * dx, movable.y + step * dy))
}
