//! Inverted Car Simulation Core Library
//!
//! Longitudinal dynamics of a downforce car that may be driven upright or
//! upside down on an overhead road. Four independently loaded wheels turn
//! torque into traction-limited thrust, aerodynamic drag and downforce grow
//! with the square of speed, and a fixed-timestep integrator advances speed.
//!
//! ## Unit Conversion
//!
//! Speeds and rotation rates are [`Measurement`]s tagged with a unit from a
//! closed set per physical domain, so mixing a speed with a rotation unit is
//! a type error rather than a runtime surprise.

// Core types and utilities
pub mod core_types;
pub mod error;

// Dynamics
pub mod physics;
pub mod simulation;
pub mod vehicle;
pub mod world;

// Re-export core types
pub use core_types::{AngularSpeed, Measurement, RotationUnit, Speed, SpeedUnit, Unit};
pub use error::{Result, SimError};

// Re-export simulation types
pub use simulation::{Controls, Simulation, Telemetry, FIXED_TIMESTEP, MAX_CONTROL_TORQUE};
pub use vehicle::{Car, CarParameters, CarPreset, Orientation, Wheel, WheelPosition, WheelState};
pub use world::World;
