//! Text output consumed by the external particle viewer.

use std::io::{self, Write};

use nalgebra::Point2;

use crate::differential::pose::Pose;

pub trait DrawSink {
    fn draw_line(&mut self, start: &Point2<f64>, end: &Point2<f64>) -> io::Result<()>;

    /// A full snapshot of the cloud, as `(x, y, theta)` triples.
    fn draw_particles(&mut self, poses: &[Pose]) -> io::Result<()>;

    /// The best estimate, drawn with a heading marker.
    fn draw_estimate(&mut self, pose: &Pose) -> io::Result<()> {
        self.draw_particles(core::slice::from_ref(pose))
    }
}

impl<T: DrawSink + ?Sized> DrawSink for Box<T> {
    fn draw_line(&mut self, start: &Point2<f64>, end: &Point2<f64>) -> io::Result<()> {
        (**self).draw_line(start, end)
    }

    fn draw_particles(&mut self, poses: &[Pose]) -> io::Result<()> {
        (**self).draw_particles(poses)
    }

    fn draw_estimate(&mut self, pose: &Pose) -> io::Result<()> {
        (**self).draw_estimate(pose)
    }
}

/// Writes the `drawLine:` / `drawParticles:` line protocol.
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl TextSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> DrawSink for TextSink<W> {
    fn draw_line(&mut self, start: &Point2<f64>, end: &Point2<f64>) -> io::Result<()> {
        writeln!(
            self.writer,
            "drawLine: ({}, {}, {}, {})",
            start.x, start.y, end.x, end.y
        )?;
        self.writer.flush()
    }

    fn draw_particles(&mut self, poses: &[Pose]) -> io::Result<()> {
        write!(self.writer, "drawParticles: [")?;
        for (i, pose) in poses.iter().enumerate() {
            if i > 0 {
                write!(self.writer, ", ")?;
            }
            write!(
                self.writer,
                "({}, {}, {})",
                pose.x(),
                pose.y(),
                pose.orientation()
            )?;
        }
        writeln!(self.writer, "]")?;
        self.writer.flush()
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DrawSink for NullSink {
    fn draw_line(&mut self, _start: &Point2<f64>, _end: &Point2<f64>) -> io::Result<()> {
        Ok(())
    }

    fn draw_particles(&mut self, _poses: &[Pose]) -> io::Result<()> {
        Ok(())
    }
}
