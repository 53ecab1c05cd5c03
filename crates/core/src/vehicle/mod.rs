//! Longitudinal vehicle dynamics
//!
//! The car is a 1-D point mass on four wheels. Each tick:
//! 1. Weight plus aerodynamic downforce is split 45/55 front/rear into wheel loads
//! 2. Every wheel reports thrust (only the rear pair is ever driven)
//! 3. Aerodynamic drag is subtracted to give net thrust
//! 4. Acceleration is integrated over a fixed timestep into speed
//!
//! When the car is inverted its weight pulls the tyres *off* the road, so the
//! wheels only carry load once downforce exceeds weight.

pub mod params;
pub mod wheel;

pub use params::{CarParameters, CarPreset};
pub use wheel::{Wheel, WheelState, DEFAULT_FRICTION_COEFFICIENT};

use crate::core_types::units::Speed;
use crate::error::Result;
use crate::physics::{AeroSurface, AIR_DENSITY_SEA_LEVEL};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Wheel diameter shared by all four corners (m)
pub const WHEEL_DIAMETER: f64 = 0.7;

/// Share of total load carried by the front axle
pub const FRONT_LOAD_SHARE: f64 = 0.45;

/// Share of total load carried by the rear axle
pub const REAR_LOAD_SHARE: f64 = 0.55;

/// Below this |acceleration| (m/s²) a slow car is treated as stopped
pub const SNAP_ACCELERATION_THRESHOLD: f64 = 0.01;

/// Below this |speed| (m/s) a car that is barely accelerating is snapped to rest
pub const SNAP_SPEED_THRESHOLD: f64 = 0.5;

/// Which way up the car is driving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Upright,
    Inverted,
}

impl Orientation {
    /// The opposite orientation
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Upright => Orientation::Inverted,
            Orientation::Inverted => Orientation::Upright,
        }
    }

    /// +1 when gravity presses the tyres onto the road, -1 when it pulls them off
    pub fn weight_sign(self) -> f64 {
        match self {
            Orientation::Upright => 1.0,
            Orientation::Inverted => -1.0,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Orientation::Upright => "upright",
            Orientation::Inverted => "inverted",
        })
    }
}

/// Wheel corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WheelPosition {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelPosition {
    pub const ALL: [WheelPosition; 4] = [
        WheelPosition::FrontLeft,
        WheelPosition::FrontRight,
        WheelPosition::RearLeft,
        WheelPosition::RearRight,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            WheelPosition::FrontLeft => 0,
            WheelPosition::FrontRight => 1,
            WheelPosition::RearLeft => 2,
            WheelPosition::RearRight => 3,
        }
    }

    pub fn is_front(self) -> bool {
        matches!(self, WheelPosition::FrontLeft | WheelPosition::FrontRight)
    }
}

/// Rear-wheel-drive car with aerodynamic downforce
#[derive(Debug, Clone)]
pub struct Car {
    // Physical constants
    /// Gravitational acceleration (m/s²)
    gravity: f64,
    /// Air density (kg/m³)
    air_density: f64,
    /// Vehicle mass (kg)
    mass: f64,
    lift: AeroSurface,
    drag: AeroSurface,

    orientation: Orientation,
    /// FL, FR, RL, RR
    wheels: [Wheel; 4],
    /// Always held in meters per second
    speed: Speed,
    front_slip_factor: f64,
    rear_slip_factor: f64,

    // Derived each tick
    /// m/s²
    acceleration: f64,
    /// Sum of thrust from all four wheels (N)
    total_thrust: f64,
    /// Traction limit of the driven (rear) pair (N)
    max_available_thrust: f64,
    total_drag: f64,
    /// Thrust minus drag (N)
    net_thrust: f64,
    downforce: f64,
}

impl Default for Car {
    fn default() -> Self {
        Car::new(&CarParameters::default())
    }
}

impl Car {
    /// Build a stationary, upright car and load its wheels
    pub fn new(params: &CarParameters) -> Self {
        let mut car = Car {
            gravity: params.gravity,
            air_density: AIR_DENSITY_SEA_LEVEL,
            mass: params.mass,
            lift: AeroSurface::new(params.lift_area, params.lift_coefficient),
            drag: AeroSurface::new(params.drag_area, params.drag_coefficient),
            orientation: Orientation::Upright,
            wheels: [
                Wheel::new(WHEEL_DIAMETER, true),
                Wheel::new(WHEEL_DIAMETER, false),
                Wheel::new(WHEEL_DIAMETER, true),
                Wheel::new(WHEEL_DIAMETER, false),
            ],
            speed: Speed::meters_per_second(0.0),
            front_slip_factor: 1.0,
            rear_slip_factor: 1.0,
            acceleration: 0.0,
            total_thrust: 0.0,
            max_available_thrust: 0.0,
            total_drag: 0.0,
            net_thrust: 0.0,
            downforce: 0.0,
        };
        for wheel in &mut car.wheels {
            wheel.set_friction_coefficient(params.friction_coefficient);
        }
        car.compute_wheel_loads();

        info!(
            "Created car: mass={:.0}kg, lift={:.2}x{:.2}m², drag={:.2}x{:.2}m²",
            car.mass, car.lift.coefficient, car.lift.area, car.drag.coefficient, car.drag.area
        );
        car
    }

    // ========================================================================
    // INPUTS
    // ========================================================================

    /// Apply externally tuned parameters. No validation is performed.
    pub fn update_parameters(&mut self, params: &CarParameters) {
        if !params.is_finite() {
            warn!("Applying non-finite car parameters: {:?}", params);
        }
        self.mass = params.mass;
        self.gravity = params.gravity;
        for wheel in &mut self.wheels {
            wheel.set_friction_coefficient(params.friction_coefficient);
        }
        self.lift = AeroSurface::new(params.lift_area, params.lift_coefficient);
        self.drag = AeroSurface::new(params.drag_area, params.drag_coefficient);
    }

    /// Validate, then apply parameters
    ///
    /// # Errors
    /// Returns the validation error and leaves the car untouched.
    pub fn try_update_parameters(&mut self, params: &CarParameters) -> Result<()> {
        params.validate()?;
        self.update_parameters(params);
        Ok(())
    }

    /// Current parameter set
    pub fn parameters(&self) -> CarParameters {
        CarParameters {
            mass: self.mass,
            gravity: self.gravity,
            friction_coefficient: self.wheels[0].friction_coefficient(),
            lift_area: self.lift.area,
            lift_coefficient: self.lift.coefficient,
            drag_area: self.drag.area,
            drag_coefficient: self.drag.coefficient,
        }
    }

    pub fn set_air_density(&mut self, air_density: f64) {
        self.air_density = air_density;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation != self.orientation {
            info!("Car orientation: {} -> {}", self.orientation, orientation);
        }
        self.orientation = orientation;
    }

    /// Toggle between upright and inverted, returning the new orientation
    pub fn flip_orientation(&mut self) -> Orientation {
        self.set_orientation(self.orientation.flipped());
        self.orientation
    }

    /// Drive torque (Nm), split evenly across the rear wheels
    pub fn set_wheel_torque(&mut self, torque: f64) {
        self.wheel_mut(WheelPosition::RearLeft).set_torque(torque / 2.0);
        self.wheel_mut(WheelPosition::RearRight).set_torque(torque / 2.0);
    }

    /// Rear-wheel braking. Only acts while moving forward with positive effort.
    ///
    /// Overrides any drive torque set this tick.
    pub fn set_braking(&mut self, effort: f64) {
        if self.speed.magnitude() > 0.0 && effort > 0.0 {
            self.wheel_mut(WheelPosition::RearLeft).set_torque(-(effort / 2.0));
            self.wheel_mut(WheelPosition::RearRight).set_torque(-(effort / 2.0));
        }
    }

    /// Overwrite the car's speed, converting into meters per second
    pub fn set_speed(&mut self, speed: &Speed) {
        self.speed.set_from(speed);
    }

    /// Ratio of wheel surface speed to road speed, per axle
    pub fn set_slip_factors(&mut self, front: f64, rear: f64) {
        self.front_slip_factor = front;
        self.rear_slip_factor = rear;
    }

    // ========================================================================
    // TICK
    // ========================================================================

    /// Weight, negated when inverted (N)
    pub fn weight(&self) -> f64 {
        self.mass * self.gravity * self.orientation.weight_sign()
    }

    /// Recompute downforce and distribute weight plus downforce over the wheels
    pub fn compute_wheel_loads(&mut self) {
        let weight = self.weight();
        self.downforce = self.lift.force(self.air_density, self.speed.magnitude());

        let total = weight + self.downforce;
        let per_front_wheel = total * FRONT_LOAD_SHARE / 2.0;
        let per_rear_wheel = total * REAR_LOAD_SHARE / 2.0;
        for position in WheelPosition::ALL {
            let load = if position.is_front() {
                per_front_wheel
            } else {
                per_rear_wheel
            };
            self.wheel_mut(position).set_normal_force(load);
        }
    }

    /// Recalculate every force acting on the car
    pub fn compute_forces(&mut self) {
        // Loads set the traction each wheel can deliver
        self.compute_wheel_loads();

        self.total_thrust = self.wheels.iter_mut().map(Wheel::thrust).sum();

        self.max_available_thrust = self.wheel(WheelPosition::RearLeft).available_traction()
            + self.wheel(WheelPosition::RearRight).available_traction();

        self.total_drag = self.drag.force(self.air_density, self.speed.magnitude());
        self.net_thrust = self.total_thrust - self.total_drag;
    }

    /// Integrate net thrust over `dt` seconds and spin the wheels to match
    pub fn advance_state(&mut self, dt: f64) {
        self.acceleration = self.net_thrust / self.mass;
        self.speed.add(self.acceleration * dt);

        // Stops a coasting car from creeping at a tiny residual speed
        if self.acceleration.abs() < SNAP_ACCELERATION_THRESHOLD
            && self.speed.magnitude().abs() < SNAP_SPEED_THRESHOLD
        {
            self.speed.set_magnitude(0.0);
        }

        let speed = self.speed;
        for position in WheelPosition::ALL {
            let slip_factor = if position.is_front() {
                self.front_slip_factor
            } else {
                self.rear_slip_factor
            };
            let wheel = self.wheel_mut(position);
            wheel.set_speed_from_linear_speed(&speed, slip_factor);
            wheel.advance_frame();
        }
    }

    // ========================================================================
    // OUTPUTS
    // ========================================================================

    /// Downforce no longer holds the car against an overhead road
    pub fn is_losing_grip(&self) -> bool {
        self.downforce < self.mass * self.gravity
    }

    /// Whether an inverted car that has settled onto the overhead road falls off
    ///
    /// `at_inverted_target` comes from whoever animates the body into place.
    pub fn should_fall(&self, at_inverted_target: bool) -> bool {
        self.orientation == Orientation::Inverted && at_inverted_target && self.is_losing_grip()
    }

    /// Speed at which downforce equals weight; below it an inverted car falls
    pub fn inverted_threshold_speed(&self) -> Speed {
        Speed::meters_per_second(
            self.lift
                .speed_for_force(self.air_density, self.mass * self.gravity),
        )
    }

    /// Current speed (m/s), convertible to any speed unit
    pub fn speed(&self) -> &Speed {
        &self.speed
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn air_density(&self) -> f64 {
        self.air_density
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    pub fn total_thrust(&self) -> f64 {
        self.total_thrust
    }

    pub fn max_available_thrust(&self) -> f64 {
        self.max_available_thrust
    }

    pub fn total_drag(&self) -> f64 {
        self.total_drag
    }

    pub fn net_thrust(&self) -> f64 {
        self.net_thrust
    }

    pub fn downforce(&self) -> f64 {
        self.downforce
    }

    /// Combined normal force on the front pair (N)
    pub fn front_axle_load(&self) -> f64 {
        self.wheel(WheelPosition::FrontLeft).normal_force()
            + self.wheel(WheelPosition::FrontRight).normal_force()
    }

    /// Combined normal force on the rear pair (N)
    pub fn rear_axle_load(&self) -> f64 {
        self.wheel(WheelPosition::RearLeft).normal_force()
            + self.wheel(WheelPosition::RearRight).normal_force()
    }

    pub fn wheel(&self, position: WheelPosition) -> &Wheel {
        &self.wheels[position.index()]
    }

    fn wheel_mut(&mut self, position: WheelPosition) -> &mut Wheel {
        &mut self.wheels[position.index()]
    }

    /// All wheels in FL, FR, RL, RR order
    pub fn wheels(&self) -> &[Wheel; 4] {
        &self.wheels
    }
}
