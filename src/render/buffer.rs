//! Line buffer that builds the Markdown output.
//!
//! The buffer owns the blank-line discipline of the output: it never holds
//! a leading blank line and never holds two blank lines in a row, no matter
//! what the walkers push.

use super::table::table_lines;
use crate::error::Result;
use crate::media::ImageRef;
use crate::model::Table;
use std::fs;
use std::path::Path;

/// Ordered Markdown lines, without terminators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownBuffer {
    lines: Vec<String>,
}

impl MarkdownBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    ///
    /// Embedded line breaks split the text into several lines; blank pieces
    /// go through [`push_blank`](Self::push_blank).
    pub fn push_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.contains('\n') {
            for piece in line.split('\n') {
                self.push_single(piece.trim_end_matches('\r'));
            }
        } else {
            self.push_single(&line);
        }
    }

    fn push_single(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.push_blank();
        } else {
            self.lines.push(line.to_string());
        }
    }

    /// Append a blank line unless the buffer is empty or already ends blank.
    pub fn push_blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    /// Append a Markdown image line.
    pub fn push_image(&mut self, image: &ImageRef) {
        self.lines.push(image.markdown());
    }

    /// Append a pipe table framed by blank lines.
    pub fn push_table(&mut self, table: &Table) {
        self.push_blank();
        self.lines.extend(table_lines(table));
        self.push_blank();
    }

    /// Append every line of another buffer.
    pub fn append(&mut self, other: MarkdownBuffer) {
        for line in other.lines {
            self.push_single(&line);
        }
    }

    /// Whether the last line is blank.
    pub fn ends_blank(&self) -> bool {
        self.lines.last().is_some_and(String::is_empty)
    }

    /// The buffered lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of buffered lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join the lines with `\n`, dropping trailing blank lines.
    pub fn serialize(&self) -> String {
        let end = self
            .lines
            .iter()
            .rposition(|l| !l.is_empty())
            .map(|i| i + 1)
            .unwrap_or(0);
        self.lines[..end].join("\n")
    }

    /// Serialize and write the buffer as UTF-8.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.serialize())?;
        Ok(())
    }
}
