pub mod angular;
#[macro_use]
pub mod linear;

use core::ops::{Deref, DerefMut};

use log::warn;
use rand::Rng;

use super::robot::Robot;
use crate::{devices::Drivetrain, draw::DrawSink, error::Result};

/// Guard held for the duration of one motion command.
///
/// Whatever path leaves the motion, the belief is updated and redrawn on the
/// way out. [`MotionScope::finish`] runs the update and reports its errors;
/// a scope dropped without finishing (an early return through `?`) still
/// runs it and logs any failure instead.
pub struct MotionScope<'a, D: Drivetrain, S: DrawSink, R: Rng> {
    robot: &'a mut Robot<D, S, R>,
    finished: bool,
}

impl<'a, D: Drivetrain, S: DrawSink, R: Rng> MotionScope<'a, D, S, R> {
    pub(crate) fn new(robot: &'a mut Robot<D, S, R>) -> Self {
        Self {
            robot,
            finished: false,
        }
    }

    pub fn finish(mut self) -> Result<()> {
        self.finished = true;
        self.robot.update_belief()
    }
}

impl<D: Drivetrain, S: DrawSink, R: Rng> Deref for MotionScope<'_, D, S, R> {
    type Target = Robot<D, S, R>;

    fn deref(&self) -> &Self::Target {
        self.robot
    }
}

impl<D: Drivetrain, S: DrawSink, R: Rng> DerefMut for MotionScope<'_, D, S, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.robot
    }
}

impl<D: Drivetrain, S: DrawSink, R: Rng> Drop for MotionScope<'_, D, S, R> {
    fn drop(&mut self) {
        // A panicking drivetrain must not be read again mid-unwind.
        if self.finished || std::thread::panicking() {
            return;
        }
        if let Err(error) = self.robot.update_belief() {
            warn!("belief update after interrupted motion failed: {error}");
        }
    }
}

impl<D: Drivetrain, S: DrawSink, R: Rng> Robot<D, S, R> {
    /// Opens a motion; the belief update runs when the returned scope ends.
    pub fn motion(&mut self) -> MotionScope<'_, D, S, R> {
        MotionScope::new(self)
    }
}
