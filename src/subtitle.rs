/// A single cue: a time range in seconds plus its lines of text.
///
/// `end` is allowed to be at or before `start`; such cues come from
/// malformed input and are preserved as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedBlock {
    pub(crate) start: f64,
    pub(crate) end: f64,
    pub(crate) text: Vec<String>,
}

impl TimedBlock {
    pub fn new(start: f64, end: f64, text: Vec<String>) -> Self {
        Self { start, end, text }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn lines(&self) -> &[String] {
        &self.text
    }

    /// All lines joined by `\n`.
    pub fn joined(&self) -> String {
        self.text.join("\n")
    }
}

/// A non-empty sequence of blocks, sorted by start time.
///
/// Only `processor::normalise` constructs one, so an empty or unsorted
/// document cannot be observed.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) blocks: Vec<TimedBlock>,
}

impl Document {
    pub fn blocks(&self) -> &[TimedBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn last(&self) -> &TimedBlock {
        // Non-empty by construction.
        &self.blocks[self.blocks.len() - 1]
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [TimedBlock] {
        &mut self.blocks
    }
}
