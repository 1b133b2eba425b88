//! Editor-facing passes over the parse tree.
//!
//! This module provides what a content-stream editor needs on top of the
//! lexer:
//! - Syntax highlighting, one line at a time, with string state carried
//!   across lines
//! - Code folding of text objects, marked content and other paired blocks
//!
//! ## Architecture
//!
//! ```text
//! editor line (Bytes) + Continuation
//!     ↓
//! [lexer::seed] + [lexer::append] (fresh ParseTree per line)
//!     ↓
//! highlight spans + exit Continuation → next line
//!
//! whole document (Bytes)
//!     ↓
//! [Lexer] → primitive sequence → fold tree → pruned FoldRanges
//! ```
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use pdf_content_lexer::config::{FoldOptions, HighlightOptions};
//! use pdf_content_lexer::editor::{compute_folds, highlight_document};
//!
//! let text = Bytes::from_static(b"BT\n/F1 12 Tf\n(Hello) Tj\nET\n");
//! let lines = highlight_document(&text, &HighlightOptions::default());
//! assert_eq!(lines.len(), 4);
//!
//! let folds = compute_folds(&text, &FoldOptions::default());
//! assert_eq!(folds.len(), 1);
//! assert_eq!((folds[0].start_line, folds[0].end_line), (0, 3));
//! ```

pub mod folding;
pub mod highlight;

pub use folding::{compute_folds, FoldKind, FoldRange};
pub use highlight::{highlight_document, highlight_line, HighlightSpan, HighlightedLine, Style};

use std::ops::Range;

/// Byte ranges of the lines of `text`, each including its terminator
/// (`\n`, `\r\n` or a lone `\r`). The ranges cover `text` exactly.
pub fn line_ranges(text: &[u8]) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < text.len() {
        match text[i] {
            b'\n' => {
                lines.push(start..i + 1);
                start = i + 1;
            },
            b'\r' => {
                let end = if text.get(i + 1) == Some(&b'\n') {
                    i + 2
                } else {
                    i + 1
                };
                lines.push(start..end);
                start = end;
                i = end;
                continue;
            },
            _ => {},
        }
        i += 1;
    }
    if start < text.len() {
        lines.push(start..text.len());
    }
    lines
}

/// Offset-to-line lookup for one text buffer.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    /// Index the line starts of `text`.
    pub fn new(text: &[u8]) -> Self {
        let mut starts = vec![0];
        starts.extend(line_ranges(text).into_iter().map(|line| line.end));
        starts.dedup();
        Self { starts }
    }

    /// Zero-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset) - 1
    }

    /// Number of line starts, counting a trailing empty line.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}
