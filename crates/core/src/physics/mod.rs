//! Physics models shared by the vehicle simulation

pub mod aerodynamics;

pub use aerodynamics::{quadratic_force, AeroSurface, AIR_DENSITY_SEA_LEVEL};
