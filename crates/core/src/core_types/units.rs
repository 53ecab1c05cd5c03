//! Unit-tagged measurements with per-domain conversion tables
//!
//! A [`Measurement`] holds a magnitude together with the unit it is currently
//! expressed in. Each physical quantity gets its own [`UnitDomain`] with a
//! closed unit enum, so a speed can never be tagged with a rotation-rate unit
//! and every conversion factor lookup is exhaustive.
//!
//! # Design Philosophy
//! - All magnitudes are f64; speeds feed a squared drag term every tick
//! - Conversion is `magnitude * factor(to) / factor(from)` against a fixed
//!   table where the domain's base unit has factor 1
//! - `set_from` copies the magnitude verbatim when units already agree, so
//!   values never drift through a needless floating-point round trip
//! - `add` takes a delta in the value's own unit; deltas are never converted
//! - The loosely-typed [`Unit`] tag (all five units) narrows into a domain
//!   unit through `TryFrom`, which is the only fallible path
//!
//! # Usage
//! ```
//! use inverted_sim_core::core_types::units::{Speed, SpeedUnit};
//!
//! let mut display = Speed::new(0.0, SpeedUnit::KilometersPerHour);
//! display.set_from(&Speed::meters_per_second(10.0));
//! assert!((display.magnitude() - 36.0).abs() < 1e-9);
//! assert_eq!(display.to_string(), "36.0");
//! ```

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::marker::PhantomData;
use std::ops::AddAssign;
use std::str::FromStr;

// ============================================================================
// UNIT DOMAINS
// ============================================================================

/// A family of mutually convertible units (speed, rotation rate, ...)
pub trait UnitDomain: Copy + fmt::Debug + PartialEq + 'static {
    /// Closed set of units belonging to this domain
    type Unit: Copy + PartialEq + fmt::Debug + fmt::Display;

    /// Human-readable domain name used in error messages
    const NAME: &'static str;

    /// Unit whose conversion factor is exactly 1
    const BASE: Self::Unit;

    /// Factor that converts a base-unit magnitude into `unit`
    fn conversion_factor(unit: Self::Unit) -> f64;
}

/// Linear speed units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedUnit {
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
}

impl SpeedUnit {
    /// Every speed unit, in table order
    pub const ALL: [SpeedUnit; 3] = [
        SpeedUnit::MetersPerSecond,
        SpeedUnit::KilometersPerHour,
        SpeedUnit::MilesPerHour,
    ];
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpeedUnit::MetersPerSecond => "m/s",
            SpeedUnit::KilometersPerHour => "km/h",
            SpeedUnit::MilesPerHour => "mph",
        })
    }
}

/// Rotation-rate units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationUnit {
    RadiansPerSecond,
    Rpm,
}

impl RotationUnit {
    /// Every rotation-rate unit, in table order
    pub const ALL: [RotationUnit; 2] = [RotationUnit::RadiansPerSecond, RotationUnit::Rpm];
}

impl fmt::Display for RotationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RotationUnit::RadiansPerSecond => "rad/s",
            RotationUnit::Rpm => "rpm",
        })
    }
}

/// Speed domain. Meters per second is the base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedDomain;

impl UnitDomain for SpeedDomain {
    type Unit = SpeedUnit;
    const NAME: &'static str = "speed";
    const BASE: SpeedUnit = SpeedUnit::MetersPerSecond;

    #[inline]
    fn conversion_factor(unit: SpeedUnit) -> f64 {
        match unit {
            SpeedUnit::MetersPerSecond => 1.0,
            SpeedUnit::KilometersPerHour => 3.6,
            SpeedUnit::MilesPerHour => 2.237,
        }
    }
}

/// Rotation-rate domain. Radians per second is the base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationDomain;

impl UnitDomain for RotationDomain {
    type Unit = RotationUnit;
    const NAME: &'static str = "rotation rate";
    const BASE: RotationUnit = RotationUnit::RadiansPerSecond;

    #[inline]
    fn conversion_factor(unit: RotationUnit) -> f64 {
        match unit {
            RotationUnit::RadiansPerSecond => 1.0,
            RotationUnit::Rpm => 30.0 / PI,
        }
    }
}

// ============================================================================
// LOOSE UNIT TAG
// ============================================================================

/// Any unit the simulator knows about, regardless of domain
///
/// Used at text boundaries (CLI flags, config files) before the value is
/// narrowed into a domain unit with `SpeedUnit::try_from(unit)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    Rpm,
    RadiansPerSecond,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Unit::MetersPerSecond => fmt::Display::fmt(&SpeedUnit::MetersPerSecond, f),
            Unit::KilometersPerHour => fmt::Display::fmt(&SpeedUnit::KilometersPerHour, f),
            Unit::MilesPerHour => fmt::Display::fmt(&SpeedUnit::MilesPerHour, f),
            Unit::Rpm => fmt::Display::fmt(&RotationUnit::Rpm, f),
            Unit::RadiansPerSecond => fmt::Display::fmt(&RotationUnit::RadiansPerSecond, f),
        }
    }
}

impl FromStr for Unit {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "m/s" | "mps" | "meters per second" => Ok(Unit::MetersPerSecond),
            "km/h" | "kmh" | "kph" | "kilometers per hour" => Ok(Unit::KilometersPerHour),
            "mph" | "miles per hour" => Ok(Unit::MilesPerHour),
            "rpm" => Ok(Unit::Rpm),
            "rad/s" | "radians per second" => Ok(Unit::RadiansPerSecond),
            _ => Err(SimError::UnknownUnit(s.to_string())),
        }
    }
}

impl From<SpeedUnit> for Unit {
    fn from(u: SpeedUnit) -> Unit {
        match u {
            SpeedUnit::MetersPerSecond => Unit::MetersPerSecond,
            SpeedUnit::KilometersPerHour => Unit::KilometersPerHour,
            SpeedUnit::MilesPerHour => Unit::MilesPerHour,
        }
    }
}

impl From<RotationUnit> for Unit {
    fn from(u: RotationUnit) -> Unit {
        match u {
            RotationUnit::RadiansPerSecond => Unit::RadiansPerSecond,
            RotationUnit::Rpm => Unit::Rpm,
        }
    }
}

impl TryFrom<Unit> for SpeedUnit {
    type Error = SimError;

    fn try_from(unit: Unit) -> Result<SpeedUnit> {
        match unit {
            Unit::MetersPerSecond => Ok(SpeedUnit::MetersPerSecond),
            Unit::KilometersPerHour => Ok(SpeedUnit::KilometersPerHour),
            Unit::MilesPerHour => Ok(SpeedUnit::MilesPerHour),
            Unit::Rpm | Unit::RadiansPerSecond => Err(SimError::IncompatibleUnit {
                unit,
                domain: SpeedDomain::NAME,
            }),
        }
    }
}

impl TryFrom<Unit> for RotationUnit {
    type Error = SimError;

    fn try_from(unit: Unit) -> Result<RotationUnit> {
        match unit {
            Unit::Rpm => Ok(RotationUnit::Rpm),
            Unit::RadiansPerSecond => Ok(RotationUnit::RadiansPerSecond),
            Unit::MetersPerSecond | Unit::KilometersPerHour | Unit::MilesPerHour => {
                Err(SimError::IncompatibleUnit {
                    unit,
                    domain: RotationDomain::NAME,
                })
            }
        }
    }
}

impl FromStr for SpeedUnit {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        SpeedUnit::try_from(s.parse::<Unit>()?)
    }
}

impl FromStr for RotationUnit {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        RotationUnit::try_from(s.parse::<Unit>()?)
    }
}

// ============================================================================
// MEASUREMENT
// ============================================================================

/// A magnitude expressed in exactly one unit of domain `D`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "D::Unit: Serialize",
    deserialize = "D::Unit: Deserialize<'de>"
))]
pub struct Measurement<D: UnitDomain> {
    magnitude: f64,
    unit: D::Unit,
    #[serde(skip)]
    _domain: PhantomData<D>,
}

/// Linear speed
pub type Speed = Measurement<SpeedDomain>;

/// Rotation rate
pub type AngularSpeed = Measurement<RotationDomain>;

impl<D: UnitDomain> Measurement<D> {
    /// Create a measurement. Any magnitude is accepted, including non-finite ones.
    #[inline]
    #[must_use]
    pub const fn new(magnitude: f64, unit: D::Unit) -> Self {
        Measurement {
            magnitude,
            unit,
            _domain: PhantomData,
        }
    }

    /// Raw magnitude in the current unit
    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Unit the magnitude is expressed in
    #[inline]
    #[must_use]
    pub fn unit(&self) -> D::Unit {
        self.unit
    }

    /// Overwrite the magnitude, keeping the unit
    #[inline]
    pub fn set_magnitude(&mut self, magnitude: f64) {
        self.magnitude = magnitude;
    }

    /// Convert a bare magnitude between two units of this domain
    #[inline]
    #[must_use]
    pub fn convert(magnitude: f64, from: D::Unit, to: D::Unit) -> f64 {
        magnitude * D::conversion_factor(to) / D::conversion_factor(from)
    }

    /// Take on `other`'s value while keeping this measurement's unit
    ///
    /// Identical units copy the magnitude verbatim.
    pub fn set_from(&mut self, other: &Self) {
        if self.unit == other.unit {
            self.magnitude = other.magnitude;
        } else {
            self.magnitude = Self::convert(other.magnitude, other.unit, self.unit);
        }
    }

    /// Magnitude expressed in `unit`, without changing `self`
    #[inline]
    #[must_use]
    pub fn in_unit(&self, unit: D::Unit) -> f64 {
        Self::convert(self.magnitude, self.unit, unit)
    }

    /// Same quantity re-expressed in `unit`
    #[inline]
    #[must_use]
    pub fn to_unit(&self, unit: D::Unit) -> Self {
        let mut out = Self::new(0.0, unit);
        out.set_from(self);
        out
    }

    /// Add a delta that is already in this measurement's unit
    #[inline]
    pub fn add(&mut self, delta: f64) {
        self.magnitude += delta;
    }
}

impl<D: UnitDomain> Default for Measurement<D> {
    fn default() -> Self {
        Self::new(0.0, D::BASE)
    }
}

impl<D: UnitDomain> AddAssign<f64> for Measurement<D> {
    fn add_assign(&mut self, delta: f64) {
        self.add(delta);
    }
}

impl<D: UnitDomain> fmt::Display for Measurement<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.magnitude)
    }
}

impl Measurement<SpeedDomain> {
    /// Speed in meters per second
    #[inline]
    #[must_use]
    pub const fn meters_per_second(value: f64) -> Self {
        Self::new(value, SpeedUnit::MetersPerSecond)
    }

    /// Speed in kilometers per hour
    #[inline]
    #[must_use]
    pub const fn kilometers_per_hour(value: f64) -> Self {
        Self::new(value, SpeedUnit::KilometersPerHour)
    }

    /// Speed in miles per hour
    #[inline]
    #[must_use]
    pub const fn miles_per_hour(value: f64) -> Self {
        Self::new(value, SpeedUnit::MilesPerHour)
    }
}

impl Measurement<RotationDomain> {
    /// Rotation rate in radians per second
    #[inline]
    #[must_use]
    pub const fn radians_per_second(value: f64) -> Self {
        Self::new(value, RotationUnit::RadiansPerSecond)
    }

    /// Rotation rate in revolutions per minute
    #[inline]
    #[must_use]
    pub const fn rpm(value: f64) -> Self {
        Self::new(value, RotationUnit::Rpm)
    }
}
