//! Fixed-rate tick driver
//!
//! `Simulation` owns the car, the world speed mirror and the driver's controls,
//! and advances them in a strict order every tick:
//! 1. Controls become wheel torque (brake wins over throttle)
//! 2. Tuned parameters are applied
//! 3. Forces are recomputed from current loads and speed
//! 4. The world mirrors the car's speed
//! 5. If running, speed is integrated over one fixed timestep
//!
//! Nothing outside a tick mutates simulation state, so reading the car or
//! taking a [`Telemetry`] snapshot between ticks always sees a complete frame.

pub mod telemetry;

pub use telemetry::Telemetry;

use crate::core_types::units::Speed;
use crate::vehicle::{Car, CarParameters, CarPreset, Orientation};
use crate::world::World;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Integration step (s). Ticks are assumed to run at 60 Hz.
pub const FIXED_TIMESTEP: f64 = 1.0 / 60.0;

/// Largest torque or brake effort the driver can command (Nm)
pub const MAX_CONTROL_TORQUE: f64 = 3200.0;

/// Driver inputs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Controls {
    /// Drive torque (Nm)
    pub torque: f64,
    /// Brake effort (Nm); any positive value overrides the throttle
    pub brake: f64,
}

/// Owned simulation state advanced one tick at a time
#[derive(Debug, Clone)]
pub struct Simulation {
    car: Car,
    world: World,
    parameters: CarParameters,
    controls: Controls,
    running: bool,
    timestep: f64,
    /// Ticks that advanced the car (paused ticks are not counted)
    steps: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Simulation::new(CarParameters::default())
    }
}

impl Simulation {
    /// Create a running simulation with a stationary car
    pub fn new(parameters: CarParameters) -> Self {
        info!("Creating simulation, timestep={:.4}s", FIXED_TIMESTEP);
        Simulation {
            car: Car::new(&parameters),
            world: World::new(),
            parameters,
            controls: Controls::default(),
            running: true,
            timestep: FIXED_TIMESTEP,
            steps: 0,
        }
    }

    pub fn from_preset(preset: CarPreset) -> Self {
        Simulation::new(preset.parameters())
    }

    /// Use a different integration step
    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    /// Mirror world speed in a unit other than meters per second
    pub fn with_world(mut self, world: World) -> Self {
        self.world = world;
        self
    }

    // ========================================================================
    // CONTROLS
    // ========================================================================

    /// Set drive torque, clamped to `0..=MAX_CONTROL_TORQUE`
    pub fn set_torque(&mut self, torque: f64) {
        self.controls.torque = torque.clamp(0.0, MAX_CONTROL_TORQUE);
    }

    /// Set brake effort, clamped to `0..=MAX_CONTROL_TORQUE`
    pub fn set_brake(&mut self, brake: f64) {
        self.controls.brake = brake.clamp(0.0, MAX_CONTROL_TORQUE);
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Replace the parameters applied at the start of every tick
    pub fn set_parameters(&mut self, parameters: CarParameters) {
        self.parameters = parameters;
    }

    pub fn parameters(&self) -> &CarParameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut CarParameters {
        &mut self.parameters
    }

    /// Play/pause. Returns whether the simulation is now running.
    pub fn toggle_running(&mut self) -> bool {
        self.running = !self.running;
        info!("Simulation {}", if self.running { "resumed" } else { "paused" });
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Turn the car over. Returns the new orientation.
    pub fn flip(&mut self) -> Orientation {
        self.car.flip_orientation()
    }

    /// Place the car at `speed`, e.g. to start a run already at pace
    pub fn set_speed(&mut self, speed: &Speed) {
        self.car.set_speed(speed);
    }

    // ========================================================================
    // TICK
    // ========================================================================

    /// Advance one frame
    pub fn tick(&mut self) {
        if self.controls.brake > 0.0 {
            self.car.set_wheel_torque(0.0);
            self.car.set_braking(self.controls.brake);
        } else {
            self.car.set_wheel_torque(self.controls.torque);
        }

        self.car.update_parameters(&self.parameters);
        self.car.compute_forces();
        self.world.set_speed(self.car.speed());

        if self.running {
            self.car.advance_state(self.timestep);
            self.steps += 1;
        }

        debug!(
            "Tick {}: v={:.2}m/s a={:.3}m/s² net={:.1}N downforce={:.1}N",
            self.steps,
            self.car.speed().magnitude(),
            self.car.acceleration(),
            self.car.net_thrust(),
            self.car.downforce()
        );
    }

    /// Advance `ticks` frames
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Number of ticks needed to cover `seconds` of simulated time
    pub fn ticks_for(&self, seconds: f64) -> u64 {
        (seconds / self.timestep).round().max(0.0) as u64
    }

    // ========================================================================
    // STATE
    // ========================================================================

    pub fn car(&self) -> &Car {
        &self.car
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Ticks that advanced the car
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated time (s)
    pub fn elapsed(&self) -> f64 {
        self.steps as f64 * self.timestep
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry::capture(&self.car, self.elapsed())
    }
}
