use core::f64::consts::PI;

use bon::Builder;
use log::{debug, info, warn};
use nalgebra::{Point2, Vector2};
use rand::Rng;

use super::angular::TurnTarget;
use crate::{
    devices::Drivetrain,
    differential::robot::Robot,
    draw::DrawSink,
    error::{LocalizationError, Result},
};

#[derive(Clone, Copy, PartialEq, Debug, Builder)]
pub struct NavigationParameters {
    /// Targets closer than this are considered reached.
    #[builder(default = 1.0)]
    pub arrival_tolerance: f64,

    /// Residual bearing after a turn above which a warning is logged.
    #[builder(default = 10.0 * PI / 180.0)]
    pub bearing_tolerance: f64,

    /// Held back from every leg since the robot coasts past its target.
    #[builder(default = 0.5)]
    pub overshoot: f64,
}

impl Default for NavigationParameters {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[macro_export]
macro_rules! params_navigation {
    (
        $($key:ident : $value:expr),* $(,)?
    ) => {
        $crate::differential::motions::linear::NavigationParameters::builder()
            $(.$key($value))*
            .build()
    };
}
pub use params_navigation;

impl<D: Drivetrain, S: DrawSink, R: Rng> Robot<D, S, R> {
    /// Drives `distance` world units along the current heading.
    pub fn move_forward(&mut self, distance: f64) -> Result<()> {
        if !distance.is_finite() {
            return Err(LocalizationError::InvalidMotion { value: distance });
        }
        let mut scope = self.motion();
        let rotations = distance * scope.settings.scale.rotations_per_unit;
        debug!("move forward {distance:.2} ({rotations:.3} rotations)");
        scope.drivetrain.move_forward(rotations);

        let robot = &mut *scope;
        robot
            .motion_model
            .move_forward(&mut robot.cloud, distance, &mut robot.rng);
        scope.finish()
    }

    /// Drives to `(x, y)` in straight legs of at most `max_step`.
    ///
    /// Each leg turns to face the target from the current estimate and then
    /// advances, so drift picked up on one leg is corrected on the next. The
    /// final leg stops `overshoot` short of the target.
    pub fn navigate_to(&mut self, x: f64, y: f64, max_step: f64) -> Result<()> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(LocalizationError::InvalidWaypoint { x, y });
        }
        let navigation = self.settings.navigation;
        if !(max_step.is_finite() && max_step > navigation.overshoot) {
            return Err(LocalizationError::InvalidStep {
                max_step,
                overshoot: navigation.overshoot,
            });
        }
        let target = Vector2::new(x, y);

        loop {
            let (range, bearing) = self.pose().polar_to(&target);
            if range <= navigation.arrival_tolerance {
                info!("at ({x:.1}, {y:.1}), estimate {:?}", self.pose());
                return Ok(());
            }

            self.rotate(bearing)?;
            let residual = TurnTarget::Point(target).error(self.pose());
            if residual.abs() > navigation.bearing_tolerance {
                warn!(
                    "still {:.1} degrees off the bearing to ({x:.1}, {y:.1}), driving anyway",
                    residual.to_degrees()
                );
            }

            if range > max_step {
                self.move_forward(max_step - navigation.overshoot)?;
                continue;
            }

            let last_leg = range - navigation.overshoot;
            if last_leg > 0.0 {
                self.move_forward(last_leg)?;
            }
            info!("reached ({x:.1}, {y:.1}), estimate {:?}", self.pose());
            return Ok(());
        }
    }

    /// Visits `waypoints` in order, drawing each planned leg first.
    pub fn follow(&mut self, waypoints: &[(f64, f64)], max_step: f64) -> Result<()> {
        for &(x, y) in waypoints {
            let from = self.pose().point();
            self.sink.draw_line(&from, &Point2::new(x, y))?;
            self.navigate_to(x, y, max_step)?;
        }
        Ok(())
    }
}
