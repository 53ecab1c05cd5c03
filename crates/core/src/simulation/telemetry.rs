//! Read-only snapshot of the car's state after a tick
//!
//! Carries the figures a dashboard shows: speed, the force balance, how close
//! downforce is to holding the car up when inverted, and per-axle wheel data.

use crate::core_types::units::SpeedUnit;
use crate::vehicle::{Car, Orientation, WheelPosition};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dashboard figures captured after a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Simulated time (s)
    pub time: f64,
    pub speed_kph: f64,
    /// Thrust minus drag (N)
    pub net_thrust: f64,
    /// Longitudinal acceleration in multiples of gravity
    pub acceleration_g: f64,
    /// Traction limit of the driven pair (N)
    pub max_available_thrust: f64,
    pub total_thrust: f64,
    pub total_drag: f64,
    pub downforce: f64,
    /// Downforce as a percentage of weight; 100% holds an inverted car up
    pub downforce_percent: f64,
    pub rear_load: f64,
    pub rear_rpm: f64,
    pub rear_slipping: bool,
    pub rear_power_bhp: f64,
    pub front_load: f64,
    pub front_rpm: f64,
    pub orientation: Orientation,
    /// Downforce is less than weight. Holds for any slow car, upright or not.
    pub downforce_below_weight: bool,
    /// Inverted and below the threshold speed, assuming the body has settled
    /// onto the overhead road
    pub falling: bool,
}

impl Telemetry {
    /// Capture the car's current state
    pub fn capture(car: &Car, time: f64) -> Self {
        let weight = car.mass() * car.gravity();
        let rear_left = car.wheel(WheelPosition::RearLeft);
        let rear_right = car.wheel(WheelPosition::RearRight);

        Telemetry {
            time,
            speed_kph: car.speed().in_unit(SpeedUnit::KilometersPerHour),
            net_thrust: car.net_thrust(),
            acceleration_g: car.acceleration() / car.gravity(),
            max_available_thrust: car.max_available_thrust(),
            total_thrust: car.total_thrust(),
            total_drag: car.total_drag(),
            downforce: car.downforce(),
            downforce_percent: car.downforce() * 100.0 / weight,
            rear_load: car.rear_axle_load(),
            rear_rpm: rear_left.rpm(),
            rear_slipping: rear_left.is_slipping(),
            rear_power_bhp: rear_left.power_bhp() + rear_right.power_bhp(),
            front_load: car.front_axle_load(),
            front_rpm: car.wheel(WheelPosition::FrontLeft).rpm(),
            orientation: car.orientation(),
            downforce_below_weight: car.is_losing_grip(),
            falling: car.should_fall(true),
        }
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:6.2}s {:>8} v={:6.1}km/h a={:5.1}g thrust={:6.0}N/{:6.0}N drag={:6.0}N \
             downforce={:6.0}N ({:5.1}%) rear={:5.0}rpm {:6.1}bhp{}{}",
            self.time,
            self.orientation,
            self.speed_kph,
            self.acceleration_g,
            self.total_thrust,
            self.max_available_thrust,
            self.total_drag,
            self.downforce,
            self.downforce_percent,
            self.rear_rpm,
            self.rear_power_bhp,
            if self.rear_slipping { " SLIP" } else { "" },
            if self.falling { " FALLING" } else { "" }
        )
    }
}
