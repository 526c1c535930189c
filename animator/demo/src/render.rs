//! Terminal output
//!
//! Draws a frame plus one status line at the top left of the alternate
//! screen. The terminal is restored when the [`Screen`] is dropped.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::Print,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Owns stdout while the demo runs
pub struct Screen {
    out: Stdout,
}

impl Screen {
    /// Switch to the alternate screen and hide the cursor
    ///
    /// # Errors
    ///
    /// Fails if the terminal rejects the escape sequences.
    pub fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        queue!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        out.flush()?;
        Ok(Self { out })
    }

    /// Draw `lines` followed by a blank line and `status`
    ///
    /// # Errors
    ///
    /// Fails if writing to stdout fails.
    pub fn draw(&mut self, lines: &[String], status: &str) -> io::Result<()> {
        for (row, line) in lines.iter().enumerate() {
            self.line_at(row, line)?;
        }
        self.line_at(lines.len(), "")?;
        self.line_at(lines.len() + 1, status)?;
        self.out.flush()
    }

    fn line_at(&mut self, row: usize, text: &str) -> io::Result<()> {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(
            self.out,
            MoveTo(0, row),
            Print(text),
            Clear(ClearType::UntilNewLine)
        )
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = queue!(self.out, Show, LeaveAlternateScreen);
        let _ = self.out.flush();
    }
}
