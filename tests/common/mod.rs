#![allow(dead_code)]

use std::{collections::VecDeque, io};

use nalgebra::Point2;
use sonar_mcl::{
    devices::{simulated::DriveCommand, Drivetrain},
    draw::DrawSink,
    particle_filter::motion::NoiseParameters,
    Pose, RobotSettings,
};

/// Records commands and replays a fixed script of sonar readings.
///
/// Once the script runs out every read returns `fallback`.
pub struct ScriptedDrivetrain {
    pub commands: Vec<DriveCommand>,
    readings: VecDeque<Option<f64>>,
    fallback: Option<f64>,
}

impl ScriptedDrivetrain {
    pub fn constant(reading: f64) -> Self {
        Self::scripted([], Some(reading))
    }

    pub fn scripted(readings: impl IntoIterator<Item = Option<f64>>, fallback: Option<f64>) -> Self {
        Self {
            commands: Vec::new(),
            readings: readings.into_iter().collect(),
            fallback,
        }
    }
}

impl Drivetrain for ScriptedDrivetrain {
    fn move_forward(&mut self, rotations: f64) {
        self.commands.push(DriveCommand::Forward(rotations));
    }

    fn rotate(&mut self, rotations: f64) {
        self.commands.push(DriveCommand::Rotate(rotations));
    }

    fn read_range(&mut self) -> Option<f64> {
        self.readings.pop_front().unwrap_or(self.fallback)
    }
}

#[derive(Default)]
pub struct CollectingSink {
    pub lines: Vec<(Point2<f64>, Point2<f64>)>,
    pub snapshots: Vec<Vec<Pose>>,
    pub estimates: Vec<Pose>,
}

impl DrawSink for CollectingSink {
    fn draw_line(&mut self, start: &Point2<f64>, end: &Point2<f64>) -> io::Result<()> {
        self.lines.push((*start, *end));
        Ok(())
    }

    fn draw_particles(&mut self, poses: &[Pose]) -> io::Result<()> {
        self.snapshots.push(poses.to_vec());
        Ok(())
    }

    fn draw_estimate(&mut self, pose: &Pose) -> io::Result<()> {
        self.estimates.push(*pose);
        Ok(())
    }
}

pub fn noiseless(start: Pose) -> RobotSettings {
    RobotSettings::builder()
        .start(start)
        .noise(NoiseParameters::noiseless())
        .seed(17)
        .build()
}
