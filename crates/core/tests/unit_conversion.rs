//! Unit conversion validation
//!
//! Checks the speed conversion table against hand-calculated reference values
//! and verifies that conversions round-trip for arbitrary magnitudes.

use approx::assert_relative_eq;
use inverted_sim_core::core_types::units::{
    AngularSpeed, RotationUnit, Speed, SpeedUnit, Unit,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reference conversions: (value, from, to, expected)
const REFERENCE: [(f64, SpeedUnit, SpeedUnit, f64); 10] = [
    (10.0, SpeedUnit::MetersPerSecond, SpeedUnit::MetersPerSecond, 10.0),
    (4.0, SpeedUnit::KilometersPerHour, SpeedUnit::MetersPerSecond, 1.1111),
    (6.5, SpeedUnit::MetersPerSecond, SpeedUnit::KilometersPerHour, 23.4),
    (6.5, SpeedUnit::MetersPerSecond, SpeedUnit::MilesPerHour, 14.5405),
    (70.0, SpeedUnit::MilesPerHour, SpeedUnit::KilometersPerHour, 112.6508),
    (70.0, SpeedUnit::MilesPerHour, SpeedUnit::MilesPerHour, 70.0),
    (70.0, SpeedUnit::MilesPerHour, SpeedUnit::MetersPerSecond, 31.2919),
    (110.0, SpeedUnit::KilometersPerHour, SpeedUnit::KilometersPerHour, 110.0),
    (110.0, SpeedUnit::KilometersPerHour, SpeedUnit::MilesPerHour, 68.3527),
    (110.0, SpeedUnit::KilometersPerHour, SpeedUnit::MetersPerSecond, 30.5556),
];

#[test]
fn test_reference_conversions_via_set_from() {
    for (value, from, to, expected) in REFERENCE {
        let mut target = Speed::new(1.0, to);
        target.set_from(&Speed::new(value, from));
        assert!(
            (target.magnitude() - expected).abs() < 0.0001,
            "{} {} -> {}: got {}, expected {}",
            value,
            from,
            to,
            target.magnitude(),
            expected
        );
    }
}

#[test]
fn test_reference_conversions_via_convert() {
    for (value, from, to, expected) in REFERENCE {
        assert!((Speed::convert(value, from, to) - expected).abs() < 0.0001);
        assert!((Speed::new(value, from).in_unit(to) - expected).abs() < 0.0001);
    }
}

#[test]
fn test_same_unit_conversions_are_exact() {
    for unit in SpeedUnit::ALL {
        for value in [0.0, 70.0, 1.0 / 3.0, -12.75, 1e-300] {
            let mut target = Speed::new(99.0, unit);
            target.set_from(&Speed::new(value, unit));
            assert_eq!(target.magnitude(), value);
        }
    }
}

#[test]
fn test_speed_round_trip_random_magnitudes() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..1000 {
        let value: f64 = rng.random_range(-500.0..500.0);
        for from in SpeedUnit::ALL {
            for to in SpeedUnit::ALL {
                let there = Speed::convert(value, from, to);
                let back = Speed::convert(there, to, from);
                assert!(
                    (back - value).abs() < 1e-4,
                    "{value} {from} -> {to} -> {from} gave {back}"
                );
            }
        }
    }
}

#[test]
fn test_rotation_round_trip_random_magnitudes() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..1000 {
        let value: f64 = rng.random_range(-20000.0..20000.0);
        for from in RotationUnit::ALL {
            for to in RotationUnit::ALL {
                let back = AngularSpeed::new(value, from).to_unit(to).in_unit(from);
                assert!((back - value).abs() < 1e-4);
            }
        }
    }
}

#[test]
fn test_set_from_chain_through_every_unit() {
    let original = Speed::meters_per_second(83.3);
    let mut kph = Speed::new(0.0, SpeedUnit::KilometersPerHour);
    let mut mph = Speed::new(0.0, SpeedUnit::MilesPerHour);
    let mut mps = Speed::new(0.0, SpeedUnit::MetersPerSecond);

    kph.set_from(&original);
    mph.set_from(&kph);
    mps.set_from(&mph);

    assert_relative_eq!(kph.magnitude(), 299.88, epsilon = 1e-9);
    assert_relative_eq!(mps.magnitude(), original.magnitude(), epsilon = 1e-9);
}

#[test]
fn test_text_units_narrow_to_domains() {
    let unit: Unit = "km/h".parse().unwrap();
    assert_eq!(SpeedUnit::try_from(unit).unwrap(), SpeedUnit::KilometersPerHour);
    assert!(RotationUnit::try_from(unit).is_err());

    let unit: Unit = "rpm".parse().unwrap();
    assert_eq!(RotationUnit::try_from(unit).unwrap(), RotationUnit::Rpm);
    assert!(SpeedUnit::try_from(unit).is_err());

    for unit in SpeedUnit::ALL {
        assert_eq!(unit.to_string().parse::<SpeedUnit>().unwrap(), unit);
    }
    for unit in RotationUnit::ALL {
        assert_eq!(unit.to_string().parse::<RotationUnit>().unwrap(), unit);
    }
}
