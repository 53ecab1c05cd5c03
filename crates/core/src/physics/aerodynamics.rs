//! Aerodynamic force model
//!
//! Both downforce and drag follow the same quadratic law,
//! `F = ½ · ρ · C · A · v²`, with a per-surface coefficient and reference area.
//! Forces are returned as unsigned magnitudes; callers decide the direction.

use serde::{Deserialize, Serialize};

/// Sea-level air density (kg/m³)
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.2;

/// Quadratic aerodynamic force magnitude (N)
///
/// # Arguments
/// * `air_density` - kg/m³
/// * `coefficient` - dimensionless lift or drag coefficient
/// * `area` - reference area (m²)
/// * `speed` - airspeed (m/s); the sign is irrelevant
#[inline]
#[must_use]
pub fn quadratic_force(air_density: f64, coefficient: f64, area: f64, speed: f64) -> f64 {
    0.5 * air_density * coefficient * area * (speed * speed)
}

/// A force-producing aerodynamic surface (wings, diffuser, frontal area)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AeroSurface {
    /// Reference area (m²)
    pub area: f64,
    /// Dimensionless coefficient
    pub coefficient: f64,
}

impl AeroSurface {
    pub const fn new(area: f64, coefficient: f64) -> Self {
        AeroSurface { area, coefficient }
    }

    /// Force magnitude at `speed` (m/s) through air of `air_density`
    #[inline]
    pub fn force(&self, air_density: f64, speed: f64) -> f64 {
        quadratic_force(air_density, self.coefficient, self.area, speed)
    }

    /// Speed (m/s) at which this surface produces `target` newtons
    ///
    /// Infinite when the surface produces no force at all.
    pub fn speed_for_force(&self, air_density: f64, target: f64) -> f64 {
        (2.0 * target / (air_density * self.coefficient * self.area)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_force() {
        // F1 wing package at 50 m/s: 0.5 * 1.2 * 1.2 * 5.5 * 2500
        assert_relative_eq!(quadratic_force(1.2, 1.2, 5.5, 50.0), 9900.0, epsilon = 1e-9);
        assert_eq!(quadratic_force(1.2, 1.2, 5.5, 0.0), 0.0);
    }

    #[test]
    fn test_force_ignores_direction() {
        let drag = AeroSurface::new(2.5, 0.85);
        assert_relative_eq!(drag.force(AIR_DENSITY_SEA_LEVEL, -20.0), drag.force(AIR_DENSITY_SEA_LEVEL, 20.0));
    }

    #[test]
    fn test_speed_for_force_inverts_force() {
        let wing = AeroSurface::new(5.5, 1.2);
        let v = wing.speed_for_force(AIR_DENSITY_SEA_LEVEL, 740.0 * 9.81);
        assert_relative_eq!(wing.force(AIR_DENSITY_SEA_LEVEL, v), 740.0 * 9.81, epsilon = 1e-6);

        let flat = AeroSurface::new(5.5, 0.0);
        assert!(flat.speed_for_force(AIR_DENSITY_SEA_LEVEL, 1000.0).is_infinite());
    }
}
