//! Output sinks for streamed responses.

use std::io::Write;

/// Destination for bot output.
///
/// Fragments are forwarded as they arrive so the user sees the response
/// grow; whole lines are used for greetings, farewells, and apologies.
pub trait OutputSink: Send {
    /// Mark the start of a bot utterance (renders the visual prefix).
    fn begin_turn(&mut self) -> std::io::Result<()>;
    /// Forward one fragment immediately.
    fn write_fragment(&mut self, fragment: &str) -> std::io::Result<()>;
    /// Mark the end of a bot utterance.
    fn end_turn(&mut self) -> std::io::Result<()>;
    /// Write a complete prefixed line.
    fn line(&mut self, text: &str) -> std::io::Result<()>;
}

/// Stdout sink with a fixed visual prefix before every bot utterance.
#[derive(Debug, Clone)]
pub struct StdoutSink {
    prefix: String,
}

impl StdoutSink {
    /// Create a sink with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl OutputSink for StdoutSink {
    fn begin_turn(&mut self) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(self.prefix.as_bytes())?;
        stdout.flush()
    }

    fn write_fragment(&mut self, fragment: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(fragment.as_bytes())?;
        stdout.flush()
    }

    fn end_turn(&mut self) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(b"\n")?;
        stdout.flush()
    }

    fn line(&mut self, text: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{}{}", self.prefix, text)?;
        stdout.flush()
    }
}
