mod common;

use std::{f64::consts::FRAC_PI_2, sync::Arc};

use approx::assert_abs_diff_eq;
use common::{noiseless, CollectingSink, ScriptedDrivetrain};
use sonar_mcl::{
    devices::simulated::DriveCommand,
    particle_filter::{sensors::sonar::Sonar, WEIGHT_TOLERANCE},
    Map, Pose, Robot,
};

#[test]
fn forward_without_noise_lands_on_target() {
    let mut robot = Robot::new(
        Arc::new(Map::square(168.0)),
        ScriptedDrivetrain::constant(50.0),
        CollectingSink::default(),
        noiseless(Pose::new(0, 0, 0)),
    )
    .unwrap();

    robot.move_forward(10.0).unwrap();

    let mean = robot.mean_pose();
    assert_abs_diff_eq!(mean.x(), 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mean.y(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mean.orientation(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(robot.cloud().total_weight(), 1.0, epsilon = WEIGHT_TOLERANCE);
    assert_eq!(robot.drivetrain().commands, vec![DriveCommand::Forward(10.0)]);
}

#[test]
fn rotation_without_noise_turns_exactly() {
    let mut robot = Robot::new(
        Arc::new(Map::square(168.0)),
        ScriptedDrivetrain::constant(50.0),
        CollectingSink::default(),
        noiseless(Pose::new(0, 0, 0)),
    )
    .unwrap();

    robot.rotate(FRAC_PI_2).unwrap();

    assert_abs_diff_eq!(robot.mean_pose().orientation(), FRAC_PI_2, epsilon = 1e-9);
    assert_abs_diff_eq!(robot.pose().orientation(), FRAC_PI_2, epsilon = 1e-9);
}

#[test]
fn likelihood_in_square_room_peaks_at_true_range() {
    let sonar = Sonar::new(Arc::new(Map::square(168.0)), Default::default()).unwrap();
    let floor = sonar.params().floor;
    let centre = Pose::new(84, 84, 0);

    let (expected, peak) = sonar.calculate_likelihood(&centre, 84.0);
    assert_abs_diff_eq!(expected, 84.0, epsilon = 1e-9);
    assert_abs_diff_eq!(peak, 1.0, epsilon = 1e-9);

    for wrong in [0.0, 200.0] {
        let (_, likelihood) = sonar.calculate_likelihood(&centre, wrong);
        assert_abs_diff_eq!(likelihood + floor, floor, epsilon = 1e-9);
    }
}

#[test]
fn navigate_within_tolerance_does_not_move() {
    let mut robot = Robot::new(
        Arc::new(Map::square(168.0)),
        ScriptedDrivetrain::constant(50.0),
        CollectingSink::default(),
        noiseless(Pose::new(50, 50, 1.0)),
    )
    .unwrap();

    robot.navigate_to(50.5, 50.0, 10.0).unwrap();

    assert!(robot.drivetrain().commands.is_empty());
    assert_eq!(robot.sink().snapshots.len(), 1);
    assert_abs_diff_eq!(robot.pose().x(), 50.0, epsilon = 1e-9);
}
