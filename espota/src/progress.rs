//! Upload progress reporting

use std::io::{self, Stderr, Write};

const BAR_LENGTH: usize = 60;

/// Progress update callbacks
pub trait ProgressCallbacks {
    /// Initialize some progress report
    fn init(&mut self, total: usize);
    /// Update some progress report
    fn update(&mut self, current: usize);
    /// Finish some progress report
    fn finish(&mut self);
}

/// A single-line textual progress bar
///
/// The line is only redrawn when the integer percentage changes, so feeding
/// it every chunk of a large upload does not flood the terminal.
#[derive(Debug)]
pub struct TextProgress<W: Write> {
    writer: W,
    total: usize,
    last_percent: Option<u8>,
}

impl TextProgress<Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> TextProgress<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            total: 0,
            last_percent: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn render(&mut self, progress: f64) -> io::Result<()> {
        let (progress, status) = if progress >= 1.0 {
            (1.0, "Done...\r\n")
        } else {
            (progress, "")
        };

        let percent = (progress * 100.0) as u8;
        if self.last_percent == Some(percent) {
            return Ok(());
        }
        self.last_percent = Some(percent);

        let block = (BAR_LENGTH as f64 * progress).round() as usize;
        write!(
            self.writer,
            "\rUploading: [{}{}] {}% {}",
            "=".repeat(block),
            " ".repeat(BAR_LENGTH - block),
            percent,
            status
        )?;
        self.writer.flush()
    }
}

impl<W: Write> ProgressCallbacks for TextProgress<W> {
    fn init(&mut self, total: usize) {
        self.total = total;
        self.last_percent = None;
    }

    fn update(&mut self, current: usize) {
        let progress = if self.total == 0 {
            1.0
        } else {
            current as f64 / self.total as f64
        };

        // Progress output is best effort, a closed stderr must not abort an upload
        self.render(progress).ok();
    }

    fn finish(&mut self) {
        writeln!(self.writer).ok();
        self.writer.flush().ok();
    }
}
