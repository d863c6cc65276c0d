//! The static wall map the sonar is scored against.

use std::collections::BTreeMap;

use nalgebra::{Point2, Vector2};

/// Waypoints driven on the physical course after leaving the start pose.
pub const ARENA_TOUR: [(f64, f64); 9] = [
    (84.0, 30.0),
    (180.0, 30.0),
    (180.0, 54.0),
    (138.0, 54.0),
    (138.0, 168.0),
    (114.0, 168.0),
    (114.0, 84.0),
    (84.0, 84.0),
    (84.0, 30.0),
];

/// A finite wall segment in world units.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Wall {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Wall {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self {
            start: Point2::new(start.0, start.1),
            end: Point2::new(end.0, end.1),
        }
    }

    pub fn direction(&self) -> Vector2<f64> {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }
}

/// Named walls, immutable once built. Share it behind an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct Map {
    walls: BTreeMap<String, Wall>,
}

impl Map {
    pub fn new<N: Into<String>>(walls: impl IntoIterator<Item = (N, Wall)>) -> Self {
        Self {
            walls: walls
                .into_iter()
                .map(|(name, wall)| (name.into(), wall))
                .collect(),
        }
    }

    /// An axis aligned room with its lower left corner at the origin.
    pub fn square(side: f64) -> Self {
        Self::new([
            ("south", Wall::new((0.0, 0.0), (side, 0.0))),
            ("east", Wall::new((side, 0.0), (side, side))),
            ("north", Wall::new((side, side), (0.0, side))),
            ("west", Wall::new((0.0, side), (0.0, 0.0))),
        ])
    }

    /// The nine wall course the robot was calibrated on.
    pub fn arena() -> Self {
        Self::new([
            ("OA", Wall::new((0.0, 0.0), (0.0, 168.0))),
            ("AB", Wall::new((0.0, 168.0), (84.0, 168.0))),
            ("BC", Wall::new((84.0, 168.0), (84.0, 126.0))),
            ("CD", Wall::new((84.0, 126.0), (84.0, 210.0))),
            ("DE", Wall::new((84.0, 210.0), (168.0, 210.0))),
            ("EF", Wall::new((168.0, 210.0), (168.0, 84.0))),
            ("FG", Wall::new((168.0, 84.0), (210.0, 84.0))),
            ("GH", Wall::new((210.0, 84.0), (210.0, 0.0))),
            ("HO", Wall::new((210.0, 0.0), (0.0, 0.0))),
        ])
    }

    pub fn wall(&self, name: &str) -> Option<&Wall> {
        self.walls.get(name)
    }

    pub fn walls(&self) -> impl Iterator<Item = (&str, &Wall)> {
        self.walls.iter().map(|(name, wall)| (name.as_str(), wall))
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}
