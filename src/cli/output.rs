//! Script output sinks for the CLI.
//!
//! `print` in a test script goes through an injectable sink so the
//! harness can capture or discard it.

use crate::ast::Span;
use crate::atoms::OutputSink;

/// Collects output into a String for testing or programmatic capture.
#[derive(Default)]
pub struct OutputBuffer {
    pub buffer: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, text: &str, _span: Option<&Span>) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(text);
    }
}

/// Writes script output to stdout.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str, _span: Option<&Span>) {
        println!("{}", text);
    }
}
