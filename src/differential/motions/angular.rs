use log::debug;
use nalgebra::Vector2;
use rand::Rng;

use crate::{
    devices::Drivetrain,
    differential::{pose::Pose, robot::Robot},
    draw::DrawSink,
    error::{LocalizationError, Result},
    utils::math::angle_error,
};

pub enum TurnTarget {
    /// A point the robot can turn to face, in world units.
    Point(Vector2<f64>),

    /// An absolute heading in radians.
    Angle(f64),
}

impl TurnTarget {
    /// Signed rotation that would leave `pose` facing the target.
    pub fn error(&self, pose: Pose) -> f64 {
        match *self {
            Self::Point(point) => pose.polar_to(&point).1,
            Self::Angle(angle) => angle_error(angle, pose.orientation()),
        }
    }
}

impl<D: Drivetrain, S: DrawSink, R: Rng> Robot<D, S, R> {
    /// Turns on the spot by `angle` radians, counter-clockwise positive.
    pub fn rotate(&mut self, angle: f64) -> Result<()> {
        if !angle.is_finite() {
            return Err(LocalizationError::InvalidMotion { value: angle });
        }
        let mut scope = self.motion();
        let rotations = angle * scope.settings.scale.rotations_per_radian;
        debug!("rotate {angle:.3} rad ({rotations:.3} rotations)");
        scope.drivetrain.rotate(rotations);

        let robot = &mut *scope;
        robot
            .motion_model
            .rotate(&mut robot.cloud, angle, &mut robot.rng);
        scope.finish()
    }

    /// Turns to face `target`.
    pub fn turn_to(&mut self, target: TurnTarget) -> Result<()> {
        let error = target.error(self.pose());
        self.rotate(error)
    }
}
