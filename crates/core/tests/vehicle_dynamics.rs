//! Vehicle dynamics integration tests
//!
//! Drives the car through complete runs and checks the force balance,
//! load distribution, braking and the inverted-driving behavior.

use approx::assert_relative_eq;
use inverted_sim_core::core_types::units::{Speed, SpeedUnit};
use inverted_sim_core::simulation::{Simulation, FIXED_TIMESTEP};
use inverted_sim_core::vehicle::{
    Car, CarParameters, CarPreset, Orientation, WheelPosition, FRONT_LOAD_SHARE, REAR_LOAD_SHARE,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_load_split_sums_to_weight_plus_downforce() {
    let speeds = [0.0, 10.0, 42.0, 80.0, 120.0];
    for preset in CarPreset::ALL {
        for gravity in [1.62, 9.81, 15.0] {
            for v in speeds {
                let mut params = preset.parameters();
                params.gravity = gravity;
                let mut car = Car::new(&params);
                car.set_speed(&Speed::meters_per_second(v));
                car.compute_wheel_loads();

                let front = car.wheel(WheelPosition::FrontLeft).normal_force();
                let rear = car.wheel(WheelPosition::RearLeft).normal_force();
                assert_eq!(front, car.wheel(WheelPosition::FrontRight).normal_force());
                assert_eq!(rear, car.wheel(WheelPosition::RearRight).normal_force());

                let expected = params.mass * gravity + car.downforce();
                assert_relative_eq!(front * 2.0 + rear * 2.0, expected, max_relative = 1e-12);
                assert_relative_eq!(front / rear, FRONT_LOAD_SHARE / REAR_LOAD_SHARE, max_relative = 1e-12);
            }
        }
    }
}

#[test]
fn test_inverted_loads_use_negated_weight() {
    let mut car = Car::default();
    car.set_orientation(Orientation::Inverted);
    car.set_speed(&Speed::meters_per_second(80.0));
    car.compute_wheel_loads();

    let expected = car.downforce() - car.mass() * car.gravity();
    assert!(expected > 0.0);
    assert_relative_eq!(
        car.front_axle_load() + car.rear_axle_load(),
        expected,
        max_relative = 1e-12
    );
}

#[test]
fn test_flip_twice_restores_loads() {
    let mut car = Car::default();
    car.set_speed(&Speed::meters_per_second(60.0));
    car.compute_wheel_loads();
    let upright = (car.front_axle_load(), car.rear_axle_load());

    car.flip_orientation();
    car.compute_wheel_loads();
    assert!(car.front_axle_load() < upright.0);

    car.flip_orientation();
    car.compute_wheel_loads();
    assert_eq!(car.orientation(), Orientation::Upright);
    assert_eq!((car.front_axle_load(), car.rear_axle_load()), upright);
}

#[test]
fn test_full_throttle_reaches_terminal_speed() {
    init_tracing();
    let mut sim = Simulation::from_preset(CarPreset::F1Monaco);
    sim.set_torque(3200.0);
    let ticks = sim.ticks_for(120.0);
    sim.run(ticks);

    let car = sim.car();
    // Drag balances thrust at the top
    assert!(car.acceleration().abs() < 0.05, "still accelerating at {}", car.acceleration());
    assert_relative_eq!(car.total_thrust(), car.total_drag(), max_relative = 0.01);
    let kph = car.speed().in_unit(SpeedUnit::KilometersPerHour);
    assert!(kph > 200.0 && kph < 400.0, "terminal speed {kph} km/h");
}

#[test]
fn test_wheelspin_clears_once_downforce_builds() {
    let mut sim = Simulation::from_preset(CarPreset::F1Monaco);
    sim.set_torque(2200.0);
    sim.tick();
    assert!(sim.car().wheel(WheelPosition::RearLeft).is_slipping());

    sim.run(sim.ticks_for(30.0));
    assert!(!sim.car().wheel(WheelPosition::RearLeft).is_slipping());
}

#[test]
fn test_braking_stops_the_car_exactly() {
    let mut sim = Simulation::from_preset(CarPreset::F1Monaco);
    sim.set_speed(&Speed::kilometers_per_hour(200.0));
    sim.set_brake(3200.0);
    sim.run(sim.ticks_for(60.0));
    // Brake torque only acts while moving forward; the snap rule finishes the stop
    assert_eq!(sim.car().speed().magnitude(), 0.0);
    assert_eq!(sim.car().acceleration(), 0.0);
}

#[test]
fn test_coasting_car_comes_to_exact_rest() {
    let mut sim = Simulation::from_preset(CarPreset::McLarenF1);
    sim.set_speed(&Speed::meters_per_second(0.45));
    sim.tick();
    assert_eq!(sim.car().speed().magnitude(), 0.0);
    for wheel in sim.car().wheels() {
        assert_eq!(wheel.angular_speed(), 0.0);
    }
}

#[test]
fn test_inverted_car_falls_below_threshold_speed() {
    let mut sim = Simulation::from_preset(CarPreset::F1Monaco);
    let threshold = sim.car().inverted_threshold_speed();
    sim.flip();

    sim.set_speed(&Speed::meters_per_second(threshold.magnitude() * 0.9));
    sim.tick();
    assert!(sim.car().should_fall(true));
    assert!(sim.telemetry().falling);
    assert!(sim.telemetry().downforce_below_weight);
    assert!(sim.telemetry().downforce_percent < 100.0);

    sim.set_speed(&Speed::meters_per_second(threshold.magnitude() * 1.1));
    sim.tick();
    assert!(!sim.car().should_fall(true));
    assert!(!sim.telemetry().falling);
    assert!(sim.telemetry().downforce_percent > 100.0);
}

#[test]
fn test_low_downforce_car_cannot_drive_inverted() {
    // A road car never makes its own weight in downforce within a sane speed range
    let car = Car::new(&CarPreset::McLarenF1.parameters());
    let threshold = car.inverted_threshold_speed().in_unit(SpeedUnit::KilometersPerHour);
    assert!(threshold > 1000.0, "threshold {threshold} km/h");

    let monaco = Car::new(&CarPreset::F1Monaco.parameters());
    let threshold = monaco.inverted_threshold_speed().in_unit(SpeedUnit::KilometersPerHour);
    assert!(threshold > 100.0 && threshold < 200.0, "threshold {threshold} km/h");
}

#[test]
fn test_monza_trim_is_faster_than_monaco() {
    let top_speed = |preset: CarPreset| {
        let mut sim = Simulation::from_preset(preset);
        sim.set_torque(3200.0);
        sim.run(sim.ticks_for(120.0));
        sim.car().speed().magnitude()
    };
    assert!(top_speed(CarPreset::F1Monza) > top_speed(CarPreset::F1Monaco));
}

#[test]
fn test_parameters_round_trip_through_json() {
    let params = CarPreset::SaleenS7.parameters();
    let json = serde_json::to_string(&params).unwrap();
    let back: CarParameters = serde_json::from_str(&json).unwrap();
    assert_eq!(back, params);
}

#[test]
fn test_telemetry_serializes() {
    let mut sim = Simulation::default();
    sim.set_torque(800.0);
    sim.run(10);
    let json = serde_json::to_value(sim.telemetry()).unwrap();
    assert_eq!(json["orientation"], "Upright");
    assert_relative_eq!(json["time"].as_f64().unwrap(), 10.0 * FIXED_TIMESTEP, epsilon = 1e-12);
}
