use hearth_core::OutputSink;

/// Sink recording everything it is asked to render.
#[derive(Debug, Default)]
pub struct RecordingSink {
    fragments: Vec<String>,
    lines: Vec<String>,
    turns_begun: usize,
    turns_ended: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenation of all streamed fragments.
    pub fn streamed(&self) -> String {
        self.fragments.concat()
    }

    /// Complete lines rendered so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    pub fn turns_begun(&self) -> usize {
        self.turns_begun
    }

    pub fn turns_ended(&self) -> usize {
        self.turns_ended
    }
}

impl OutputSink for RecordingSink {
    fn begin_turn(&mut self) -> std::io::Result<()> {
        self.turns_begun += 1;
        Ok(())
    }

    fn write_fragment(&mut self, fragment: &str) -> std::io::Result<()> {
        self.fragments.push(fragment.to_string());
        Ok(())
    }

    fn end_turn(&mut self) -> std::io::Result<()> {
        self.turns_ended += 1;
        Ok(())
    }

    fn line(&mut self, text: &str) -> std::io::Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }
}
