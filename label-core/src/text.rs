//! Label text split into atomic lines.

use serde::{Deserialize, Serialize};

/// Ordered lines of label text.
///
/// Lines are never wrapped or reordered; fitting only changes the font size
/// applied uniformly to all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    lines: Vec<String>,
}

impl TextBlock {
    /// Split `text` on line breaks (`\n`, `\r\n` or `\r`).
    ///
    /// Empty input produces an empty block. A trailing line break does not
    /// add an empty last line.
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let lines = normalized.lines().map(str::to_string).collect();
        Self { lines }
    }

    /// Build a block from already split lines.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// The lines, in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there is no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
