//! Line-at-a-time syntax highlighting.
//!
//! Every line is lexed in a tree of its own. A line that starts inside a
//! string or inline image left open by the previous line is first seeded
//! with the matching `(`, `<` or `ID ` tokens; those seed tokens are removed
//! again before the spans are produced, so spans only ever cover bytes of the
//! line itself.

use crate::config::HighlightOptions;
use crate::content::operators::{self, OperatorCategory};
use crate::editor::line_ranges;
use crate::lexer::{self, Continuation, LexState};
use crate::token::TokenKind;
use crate::tree::{NodeId, ParseTree};
use bytes::Bytes;
use serde::Serialize;

/// Display style of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Whitespace
    Plain,
    /// `%` comments
    Comment,
    /// true, false, null
    Keyword,
    /// Integers and reals
    Number,
    /// `/Name`
    Name,
    /// Literal string parts, parentheses included
    String,
    /// Hex string parts, angle brackets included
    HexString,
    /// Array and dictionary brackets
    Delimiter,
    /// Content-stream operators
    Operator,
    /// Inline image data
    Binary,
    /// Unknown runs and closers with nothing to close
    Invalid,
}

/// One highlighted token. `start` is relative to the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    /// Offset of the token in the line
    pub start: usize,
    /// Token length in bytes
    pub len: usize,
    /// Token kind
    pub kind: TokenKind,
    /// Display style
    pub style: Style,
    /// Operator group, for operator tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<OperatorCategory>,
}

impl HighlightSpan {
    /// One past the last byte of the span.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Spans of one line and the state the next line starts in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightedLine {
    /// Spans in line order, covering the line exactly
    pub spans: Vec<HighlightSpan>,
    /// Continuation to seed the following line with
    pub exit: Continuation,
}

/// Highlight one line that starts in state `entering`.
pub fn highlight_line(
    line: &Bytes,
    entering: Continuation,
    options: &HighlightOptions,
) -> HighlightedLine {
    let mut tree = ParseTree::new();
    let mut state = LexState::new(&tree);
    lexer::seed(&mut tree, &mut state, entering);
    let seeds: Vec<NodeId> = tree.primitives(tree.root()).collect();
    lexer::append(&mut tree, &mut state, line, 0..line.len());

    let exit = exit_continuation(&tree);
    debug_assert_eq!(exit, state.continuation(&tree));

    for seed in seeds {
        tree.remove(seed);
    }

    let mut spans: Vec<HighlightSpan> = Vec::new();
    for id in tree.primitives(tree.root()) {
        let Some(range) = tree.span(id) else {
            continue;
        };
        let kind = tree.kind(id);
        if options.coalesce_whitespace && kind == TokenKind::Whitespace {
            if let Some(last) = spans.last_mut() {
                if last.kind == TokenKind::Whitespace && last.end() == range.start {
                    last.len += range.len();
                    continue;
                }
            }
        }
        let category = if options.classify_operators && kind == TokenKind::Operator {
            operators::category(tree.text(id))
        } else {
            None
        };
        spans.push(HighlightSpan {
            start: range.start,
            len: range.len(),
            kind,
            style: style_of(&tree, id),
            category,
        });
    }
    log::trace!("Highlighted line into {} spans, exit {:?}", spans.len(), exit);

    HighlightedLine { spans, exit }
}

/// Highlight a whole document line by line, threading the continuation from
/// each line into the next. Lines keep their terminators.
pub fn highlight_document(text: &Bytes, options: &HighlightOptions) -> Vec<HighlightedLine> {
    let mut entering = Continuation::Normal;
    let lines: Vec<HighlightedLine> = line_ranges(text)
        .into_iter()
        .map(|range| {
            let line = highlight_line(&text.slice(range), entering, options);
            entering = line.exit;
            line
        })
        .collect();
    log::debug!("Highlighted {} lines", lines.len());
    lines
}

fn style_of(tree: &ParseTree, id: NodeId) -> Style {
    let parent = tree.parent(id).map(|p| tree.kind(p));
    match tree.kind(id) {
        TokenKind::Whitespace if parent == Some(TokenKind::HexString) => Style::HexString,
        TokenKind::Whitespace => Style::Plain,
        TokenKind::Comment => Style::Comment,
        TokenKind::Boolean | TokenKind::Null => Style::Keyword,
        TokenKind::Numeric => Style::Number,
        TokenKind::Name => Style::Name,
        TokenKind::Operator => Style::Operator,
        TokenKind::BinaryData => Style::Binary,
        TokenKind::StringLiteralClose if parent != Some(TokenKind::StringLiteral) => {
            Style::Invalid
        },
        TokenKind::StringLiteralOpen
        | TokenKind::StringLiteralData
        | TokenKind::StringLiteralClose => Style::String,
        TokenKind::HexStringClose if parent != Some(TokenKind::HexString) => Style::Invalid,
        TokenKind::HexStringOpen | TokenKind::HexStringData | TokenKind::HexStringClose => {
            Style::HexString
        },
        TokenKind::ArrayClose if parent != Some(TokenKind::Array) => Style::Invalid,
        TokenKind::ArrayOpen
        | TokenKind::ArrayClose
        | TokenKind::DictionaryOpen
        | TokenKind::DictionaryClose => Style::Delimiter,
        _ => Style::Invalid,
    }
}

/// Work out where the line ended from its last token alone.
///
/// Image data, or the whitespace that follows `ID`, leaves the image open.
/// A hex string that has not seen its `>` is still open. For a literal
/// string the parentheses before the last token are counted back to the
/// string's opening one.
fn exit_continuation(tree: &ParseTree) -> Continuation {
    let Some(last) = tree.last_primitive(tree.root()) else {
        return Continuation::Normal;
    };
    match tree.kind(last) {
        TokenKind::BinaryData => return Continuation::InlineImage,
        TokenKind::Whitespace
            if tree.previous(last).is_some_and(|prev| tree.is_operator(prev, b"ID")) =>
        {
            return Continuation::InlineImage;
        },
        _ => {},
    }
    let Some(parent) = tree.parent(last) else {
        return Continuation::Normal;
    };
    match tree.kind(parent) {
        TokenKind::HexString if tree.kind(last) != TokenKind::HexStringClose => {
            Continuation::HexString
        },
        TokenKind::StringLiteral => {
            let mut depth: i64 = 0;
            let mut cursor = Some(last);
            while let Some(id) = cursor {
                match tree.kind(id) {
                    TokenKind::StringLiteralOpen => depth += 1,
                    TokenKind::StringLiteralClose => depth -= 1,
                    _ => {},
                }
                cursor = tree.previous(id);
            }
            if depth > 0 {
                Continuation::LiteralString(depth as u32)
            } else {
                Continuation::Normal
            }
        },
        _ => Continuation::Normal,
    }
}
