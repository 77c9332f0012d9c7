// src/output.rs
// =============================================================================
// Status line output with explicit newline bytes.
//
// Status lines are the machine-readable surface of this tool, so the
// newline convention is configurable (CI on Windows, piping into tools that
// expect \n, etc.) and every line is written as one write_all call followed
// by a flush. That means an interrupt can kill the process between lines
// but never in the middle of one - no partial multi-byte writes.
// =============================================================================

use std::io::{self, Write};

use clap::ValueEnum;

/// Newline convention for status lines
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewlineMode {
    /// \r\n
    Dos,
    /// \r
    Mac,
    /// \n
    Unix,
    /// Whatever the build platform uses
    System,
}

impl NewlineMode {
    pub fn bytes(self) -> &'static [u8] {
        match self {
            NewlineMode::Dos => b"\r\n",
            NewlineMode::Mac => b"\r",
            NewlineMode::Unix => b"\n",
            #[cfg(windows)]
            NewlineMode::System => b"\r\n",
            #[cfg(not(windows))]
            NewlineMode::System => b"\n",
        }
    }
}

/// Writes status lines to any Write sink - stdout in the binary, a Vec<u8>
/// in tests.
pub struct StatusWriter<W: Write> {
    inner: W,
    newline: &'static [u8],
}

impl<W: Write> StatusWriter<W> {
    pub fn new(inner: W, newline: NewlineMode) -> Self {
        Self {
            inner,
            newline: newline.bytes(),
        }
    }

    // Writes one line plus the newline as a single unbuffered write.
    //
    // Building the buffer first costs an allocation per line but keeps the
    // line and its newline in one write_all - a line is emitted whole or
    // not at all.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        let mut buffer = Vec::with_capacity(text.len() + self.newline.len());
        buffer.extend_from_slice(text.as_bytes());
        buffer.extend_from_slice(self.newline);
        self.inner.write_all(&buffer)?;
        self.inner.flush()
    }

    /// Consumes the writer, handing back the sink (used by tests to
    /// inspect what was written)
    pub fn into_inner(self) -> W {
        self.inner
    }
}
