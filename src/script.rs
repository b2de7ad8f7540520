//! Line-oriented buffer for assembling the emitted JavaScript.
//!
//! The rule template nests four columns per block level, but condition
//! continuation lines align inside an opening parenthesis, so the builder
//! accepts both level-based and explicit-column indentation.

/// Columns per block nesting level in the emitted script.
pub const INDENT: usize = 4;

#[derive(Debug, Default)]
pub struct ScriptBuilder {
    buf: String,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        ScriptBuilder::default()
    }

    /// Append one line at the given block nesting level.
    pub fn line(&mut self, level: usize, text: &str) {
        self.line_at(level * INDENT, text);
    }

    /// Append one line at an explicit column offset.
    pub fn line_at(&mut self, cols: usize, text: &str) {
        for _ in 0..cols {
            self.buf.push(' ');
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
