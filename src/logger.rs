//! Terminal logger for the `log` facade.

use std::{
    io::Write,
    sync::OnceLock,
    time::{Duration, Instant},
};

use log::{max_level, set_logger, set_max_level, LevelFilter, Log, Metadata, SetLoggerError};

const ESCAPES: [Option<&str>; 6] = [
    None,             // Default foreground
    Some("\x1B[31m"), // Error (red)
    Some("\x1B[33m"), // Warn (yellow)
    Some("\x1B[34m"), // Info (blue)
    Some("\x1B[36m"), // Debug (cyan)
    Some("\x1B[37m"), // Trace (white)
];

/// Writes records to stderr, stamped with the time since the logger was
/// installed. Stdout is left to the draw protocol.
pub struct TerminalLogger {
    start: OnceLock<Instant>,
}

impl TerminalLogger {
    pub const fn new() -> Self {
        Self {
            start: OnceLock::new(),
        }
    }

    pub fn init(&'static self, level: LevelFilter) -> Result<(), SetLoggerError> {
        self.start.get_or_init(Instant::now);
        set_logger(self)?;
        set_max_level(level);

        Ok(())
    }

    fn elapsed(&self) -> Duration {
        self.start.get_or_init(Instant::now).elapsed()
    }
}

impl Default for TerminalLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for TerminalLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            let timestamp = self.elapsed();
            let mins = timestamp.as_secs() / 60;
            let submin_secs = timestamp.as_secs() % 60;

            let _ = writeln!(
                std::io::stderr().lock(),
                "{:02}:{:02}:{:03} {}[{}]\x1B[0m {}",
                mins,
                submin_secs,
                timestamp.subsec_millis(),
                ESCAPES[record.level() as usize].unwrap_or_default(),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
