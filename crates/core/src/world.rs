//! Scenery speed mirror
//!
//! The background scrolls at the car's speed. The world keeps its own copy of
//! that speed, in whatever unit the scenery animation wants to read.

use crate::core_types::units::{Speed, SpeedUnit};

/// Environment moving past the car
#[derive(Debug, Clone, Default)]
pub struct World {
    speed: Speed,
}

impl World {
    /// World whose speed mirror is held in meters per second
    pub fn new() -> Self {
        Self::default()
    }

    /// World whose speed mirror is held in `unit`
    pub fn with_unit(unit: SpeedUnit) -> Self {
        World {
            speed: Speed::new(0.0, unit),
        }
    }

    /// Mirror `speed`, converting into this world's unit
    pub fn set_speed(&mut self, speed: &Speed) {
        self.speed.set_from(speed);
    }

    pub fn speed(&self) -> &Speed {
        &self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mirrors_speed_exactly_in_same_unit() {
        let mut world = World::new();
        let car_speed = Speed::meters_per_second(12.345678901);
        world.set_speed(&car_speed);
        assert_eq!(world.speed(), &car_speed);
    }

    #[test]
    fn test_mirrors_speed_in_own_unit() {
        let mut world = World::with_unit(SpeedUnit::MilesPerHour);
        world.set_speed(&Speed::meters_per_second(10.0));
        assert_eq!(world.speed().unit(), SpeedUnit::MilesPerHour);
        assert_relative_eq!(world.speed().magnitude(), 22.37, epsilon = 1e-9);
    }
}
