//! Per-wheel traction model
//!
//! A wheel turns commanded torque into thrust at the contact patch. Thrust is
//! bounded by traction (normal load times friction coefficient); demanding
//! more than that makes the wheel spin, and a spinning wheel only delivers
//! half of its nominal traction.

use crate::core_types::units::{AngularSpeed, Speed};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::trace;

/// Tyre/road friction coefficient for a new wheel
pub const DEFAULT_FRICTION_COEFFICIENT: f64 = 1.5;

/// Share of nominal traction that reaches the road while the wheel spins
const SLIP_TRACTION_FRACTION: f64 = 0.5;

/// Frame rate assumed when accumulating visual wheel rotation
const VISUAL_FRAMES_PER_SECOND: f64 = 60.0;

/// Frames between slip highlight toggles
const SLIP_FLASH_PERIOD: u32 = 10;

/// Wheel-horsepower conversion (kW to bhp, applied to W via /1000)
const BHP_PER_KILOWATT: f64 = 1.341;

/// One wheel actuator
#[derive(Debug, Clone, PartialEq)]
pub struct Wheel {
    /// Wheel diameter (m)
    diameter: f64,
    /// Load between the tyre and the road (N), never negative
    normal_force: f64,
    friction_coefficient: f64,
    /// Applied torque (Nm), negative when braking
    torque: f64,
    /// Rotation rate (rad/s)
    angular_speed: f64,
    is_slipping: bool,
    /// Whether forward travel increases the wheel's visual rotation angle
    forward_sense_is_positive: bool,

    // Frame state read by renderers
    rotation: f64,
    slip_frames: u32,
    slip_highlight: bool,
}

/// Serializable snapshot of a wheel's observable state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelState {
    pub angular_speed: f64,
    pub rpm: f64,
    pub normal_force: f64,
    pub torque: f64,
    pub is_slipping: bool,
}

impl Wheel {
    /// Create an unloaded, stationary wheel
    pub fn new(diameter: f64, forward_sense_is_positive: bool) -> Self {
        Wheel {
            diameter,
            normal_force: 0.0,
            friction_coefficient: DEFAULT_FRICTION_COEFFICIENT,
            torque: 0.0,
            angular_speed: 0.0,
            is_slipping: false,
            forward_sense_is_positive,
            rotation: 0.0,
            slip_frames: 0,
            slip_highlight: false,
        }
    }

    pub fn set_torque(&mut self, torque: f64) {
        self.torque = torque;
    }

    /// Set the tyre load. Negative loads are clamped to zero.
    pub fn set_normal_force(&mut self, force: f64) {
        self.normal_force = if force >= 0.0 { force } else { 0.0 };
    }

    pub fn set_friction_coefficient(&mut self, friction_coefficient: f64) {
        self.friction_coefficient = friction_coefficient;
    }

    /// Spin the wheel to match the car's linear speed
    ///
    /// `slip_factor` of 1.0 means the tyre rolls without slipping. The
    /// magnitude is read as stored, so pass a speed in meters per second.
    pub fn set_speed_from_linear_speed(&mut self, linear_speed: &Speed, slip_factor: f64) {
        self.angular_speed = ((2.0 * linear_speed.magnitude()) / self.diameter) * slip_factor;
    }

    pub fn set_angular_speed(&mut self, angular_speed: f64) {
        self.angular_speed = angular_speed;
    }

    /// Maximum force the tyre can transmit, signed to match the torque
    pub fn available_traction(&self) -> f64 {
        let traction = self.normal_force * self.friction_coefficient;
        if self.torque < 0.0 {
            -traction
        } else {
            traction
        }
    }

    /// Force delivered to the road at the current torque and load
    ///
    /// Re-evaluates the slip state on every call.
    pub fn thrust(&mut self) -> f64 {
        // Both are negative when the torque is negative
        let demanded = self.torque / (self.diameter * 0.5);
        let traction = self.available_traction();

        let slipping = demanded.abs() > traction.abs();
        if slipping != self.is_slipping {
            trace!(
                "Wheel {} grip: torque={:.1}Nm demand={:.1}N traction={:.1}N",
                if slipping { "lost" } else { "regained" },
                self.torque,
                demanded,
                traction
            );
        }
        self.is_slipping = slipping;

        if slipping {
            traction * SLIP_TRACTION_FRACTION
        } else {
            demanded
        }
    }

    /// Rotation rate in revolutions per minute
    pub fn rpm(&self) -> f64 {
        self.angular_speed * 30.0 / PI
    }

    /// Wheel power in brake horsepower (SI torque and rotation rate in)
    pub fn power_bhp(&self) -> f64 {
        (self.angular_speed * self.torque * BHP_PER_KILOWATT) / 1000.0
    }

    /// Advance per-frame state: accumulated rotation and the slip flash cycle
    pub fn advance_frame(&mut self) {
        let delta = self.angular_speed / VISUAL_FRAMES_PER_SECOND;
        if self.forward_sense_is_positive {
            self.rotation += delta;
        } else {
            self.rotation -= delta;
        }

        if self.is_slipping {
            self.slip_frames = self.slip_frames.wrapping_add(1);
            match self.slip_frames % SLIP_FLASH_PERIOD {
                0 => self.slip_highlight = true,
                5 => self.slip_highlight = false,
                _ => {}
            }
        } else {
            self.slip_highlight = false;
        }
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn normal_force(&self) -> f64 {
        self.normal_force
    }

    pub fn friction_coefficient(&self) -> f64 {
        self.friction_coefficient
    }

    pub fn torque(&self) -> f64 {
        self.torque
    }

    /// Rotation rate (rad/s)
    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    /// Rotation rate as a convertible measurement
    pub fn angular_speed_measurement(&self) -> AngularSpeed {
        AngularSpeed::radians_per_second(self.angular_speed)
    }

    /// Slip state from the most recent [`Wheel::thrust`] call
    pub fn is_slipping(&self) -> bool {
        self.is_slipping
    }

    pub fn forward_sense_is_positive(&self) -> bool {
        self.forward_sense_is_positive
    }

    /// Accumulated visual rotation (rad)
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Whether a renderer should show the slip highlight this frame
    pub fn slip_highlight(&self) -> bool {
        self.slip_highlight
    }

    pub fn state(&self) -> WheelState {
        WheelState {
            angular_speed: self.angular_speed,
            rpm: self.rpm(),
            normal_force: self.normal_force,
            torque: self.torque,
            is_slipping: self.is_slipping,
        }
    }
}
