//! Tunable vehicle parameters and named presets
//!
//! Presets reproduce the parameter sets of a handful of real cars: two F1
//! aero configurations (high-downforce Monaco, low-drag Monza), a road-going
//! supercar and two sports prototypes.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parameters the outside world may change between ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarParameters {
    /// Vehicle mass (kg)
    pub mass: f64,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Tyre/road friction coefficient, applied to all four wheels
    pub friction_coefficient: f64,
    /// Downforce-producing (wing/diffuser) area (m²)
    pub lift_area: f64,
    pub lift_coefficient: f64,
    /// Frontal area for drag (m²)
    pub drag_area: f64,
    pub drag_coefficient: f64,
}

impl Default for CarParameters {
    fn default() -> Self {
        CarPreset::F1Monaco.parameters()
    }
}

impl CarParameters {
    /// Parameters of a named preset, e.g. `"F1 - Monza"` or `"saleen-s7"`
    ///
    /// # Errors
    /// Returns [`SimError::UnknownPreset`] when no preset matches `name`.
    pub fn preset(name: &str) -> Result<Self> {
        name.parse::<CarPreset>().map(CarPreset::parameters)
    }

    /// Check the parameters describe a physically meaningful car
    ///
    /// The simulator itself accepts anything; call this before applying
    /// parameters that come from untrusted input.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidParameter`] for the first non-finite,
    /// negative, or (for mass) zero value.
    pub fn validate(&self) -> Result<()> {
        check_finite("mass", self.mass)?;
        if self.mass <= 0.0 {
            return Err(SimError::InvalidParameter {
                name: "mass",
                value: self.mass,
                reason: "must be positive",
            });
        }

        for (name, value) in [
            ("gravity", self.gravity),
            ("friction_coefficient", self.friction_coefficient),
            ("lift_area", self.lift_area),
            ("lift_coefficient", self.lift_coefficient),
            ("drag_area", self.drag_area),
            ("drag_coefficient", self.drag_coefficient),
        ] {
            check_finite(name, value)?;
            if value < 0.0 {
                return Err(SimError::InvalidParameter {
                    name,
                    value,
                    reason: "must not be negative",
                });
            }
        }

        Ok(())
    }

    /// True when every value is finite
    pub fn is_finite(&self) -> bool {
        [
            self.mass,
            self.gravity,
            self.friction_coefficient,
            self.lift_area,
            self.lift_coefficient,
            self.drag_area,
            self.drag_coefficient,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

/// Named parameter presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarPreset {
    F1Monaco,
    F1Monza,
    McLarenF1,
    SaleenS7,
    RadicalSr8,
}

impl CarPreset {
    pub const ALL: [CarPreset; 5] = [
        CarPreset::F1Monaco,
        CarPreset::F1Monza,
        CarPreset::McLarenF1,
        CarPreset::SaleenS7,
        CarPreset::RadicalSr8,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            CarPreset::F1Monaco => "F1 - Monaco",
            CarPreset::F1Monza => "F1 - Monza",
            CarPreset::McLarenF1 => "McLaren F1",
            CarPreset::SaleenS7 => "Saleen S7",
            CarPreset::RadicalSr8 => "Radical SR8",
        }
    }

    /// Short command-line friendly name
    pub fn slug(self) -> &'static str {
        match self {
            CarPreset::F1Monaco => "f1-monaco",
            CarPreset::F1Monza => "f1-monza",
            CarPreset::McLarenF1 => "mclaren-f1",
            CarPreset::SaleenS7 => "saleen-s7",
            CarPreset::RadicalSr8 => "radical-sr8",
        }
    }

    pub fn parameters(self) -> CarParameters {
        match self {
            CarPreset::F1Monaco => CarParameters {
                mass: 740.0,
                gravity: 9.81,
                friction_coefficient: 1.5,
                lift_area: 5.5,
                lift_coefficient: 1.2,
                drag_area: 2.5,
                drag_coefficient: 0.85,
            },
            // Low-drag wing package
            CarPreset::F1Monza => CarParameters {
                mass: 740.0,
                gravity: 9.81,
                friction_coefficient: 1.5,
                lift_area: 5.5,
                lift_coefficient: 0.7366298262685506,
                drag_area: 2.4083824006738657,
                drag_coefficient: 0.4278630589179951,
            },
            CarPreset::McLarenF1 => CarParameters {
                mass: 1138.0,
                gravity: 9.81,
                friction_coefficient: 1.0,
                lift_area: 1.79,
                lift_coefficient: 0.1,
                drag_area: 1.79,
                drag_coefficient: 0.32,
            },
            CarPreset::SaleenS7 => CarParameters {
                mass: 1300.0,
                gravity: 9.81,
                friction_coefficient: 1.0,
                lift_area: 3.99632577561958,
                lift_coefficient: 1.0233418245226378,
                drag_area: 1.7467393277798187,
                drag_coefficient: 0.33964398253212214,
            },
            CarPreset::RadicalSr8 => CarParameters {
                mass: 648.0,
                gravity: 9.81,
                friction_coefficient: 1.1,
                lift_area: 2.1,
                lift_coefficient: 0.9,
                drag_area: 2.0,
                drag_coefficient: 0.48,
            },
        }
    }
}

impl fmt::Display for CarPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CarPreset {
    type Err = SimError;

    /// Accepts the display name or the slug, ignoring case
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        CarPreset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted) || p.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SimError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_monaco() {
        assert_eq!(CarParameters::default(), CarPreset::F1Monaco.parameters());
        assert_eq!(CarParameters::default().mass, 740.0);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(
            CarParameters::preset("F1 - Monza").unwrap(),
            CarPreset::F1Monza.parameters()
        );
        assert_eq!("radical-sr8".parse::<CarPreset>().unwrap(), CarPreset::RadicalSr8);
        assert_eq!(" McLaren f1 ".parse::<CarPreset>().unwrap(), CarPreset::McLarenF1);
        assert_eq!(
            CarParameters::preset("Trabant"),
            Err(SimError::UnknownPreset("Trabant".to_string()))
        );
    }

    #[test]
    fn test_all_presets_validate() {
        for preset in CarPreset::ALL {
            assert!(preset.parameters().validate().is_ok(), "{preset} failed validation");
            assert!(preset.parameters().is_finite());
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut params = CarParameters::default();
        params.mass = 0.0;
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter { name: "mass", .. })
        ));

        let mut params = CarParameters::default();
        params.drag_coefficient = -0.1;
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter {
                name: "drag_coefficient",
                ..
            })
        ));

        let mut params = CarParameters::default();
        params.gravity = f64::NAN;
        assert!(!params.is_finite());
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter {
                name: "gravity",
                reason: "must be finite",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params: CarParameters = serde_json::from_str(r#"{"mass": 900.0}"#).unwrap();
        assert_eq!(params.mass, 900.0);
        assert_eq!(params.drag_area, 2.5);
    }

    #[test]
    fn test_misspelled_json_field_is_rejected() {
        let result = serde_json::from_str::<CarParameters>(r#"{"masss": 900.0}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("masss"), "unexpected error: {err}");
    }
}
