use core::ops::{Add, AddAssign, Div, Mul};

use nalgebra::{Point2, Vector2};
use num_traits::{AsPrimitive, Num};

use crate::utils::math::normalize_angle;

/// A planar pose. The orientation is kept in `(-π, π]` after every mutation.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Pose {
    position: Vector2<f64>,
    orientation: f64,
}

impl Pose {
    pub fn new<T: Num + AsPrimitive<f64>, U: Num + AsPrimitive<f64>, V: Num + AsPrimitive<f64>>(
        x: T,
        y: U,
        orientation: V,
    ) -> Self {
        Self {
            position: Vector2::<f64>::new(x.as_(), y.as_()),
            orientation: normalize_angle(orientation.as_()),
        }
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn position(&self) -> Vector2<f64> {
        self.position
    }

    pub fn point(&self) -> Point2<f64> {
        Point2::from(self.position)
    }

    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    pub fn with_orientation(self, orientation: f64) -> Self {
        Self {
            position: self.position,
            orientation: normalize_angle(orientation),
        }
    }

    /// Unit vector along the heading.
    pub fn heading(&self) -> Vector2<f64> {
        Vector2::new(self.orientation.cos(), self.orientation.sin())
    }

    pub fn move_forward(&mut self, distance: f64) {
        self.position += self.heading() * distance;
    }

    pub fn rotate(&mut self, angle: f64) {
        self.orientation = normalize_angle(self.orientation + angle);
    }

    pub fn distance_to(&self, pose: &Self) -> f64 {
        self.position.metric_distance(&pose.position)
    }

    /// Range and bearing of `target` relative to this pose.
    /// The bearing is measured from the current heading.
    pub fn polar_to(&self, target: &Vector2<f64>) -> (f64, f64) {
        let delta = target - self.position;
        let bearing = normalize_angle(delta.y.atan2(delta.x) - self.orientation);
        (delta.norm(), bearing)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Add for Pose {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            position: self.position + rhs.position,
            orientation: normalize_angle(self.orientation + rhs.orientation),
        }
    }
}

impl AddAssign for Pose {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Pose {
    type Output = Self;

    fn mul(self, scale: f64) -> Self {
        Self {
            position: self.position * scale,
            orientation: normalize_angle(self.orientation * scale),
        }
    }
}

impl Div<f64> for Pose {
    type Output = Self;

    fn div(self, divisor: f64) -> Self {
        Self {
            position: self.position / divisor,
            orientation: normalize_angle(self.orientation / divisor),
        }
    }
}
