//! PDF content stream lexer (tokenizer).
//!
//! This module turns content-stream text into [`ParseTree`] nodes without
//! losing a single byte: concatenating the text of every primitive node
//! reproduces the input exactly, whatever the input looks like.
//!
//! # PDF Syntax Overview
//!
//! Content streams use the PostScript-like object syntax of the rest of PDF:
//! - Numbers: integers (42, -123) and reals (3.14, -2.5, .5)
//! - Strings: literal ((Hello)) and hexadecimal (<48656C6C6F>)
//! - Names: identifiers starting with / (/F1, /Span)
//! - Keywords: true, false, null
//! - Delimiters: `[`, `]`, `<<`, `>>`
//! - Operators: bare keywords from the operator table (q, cm, Tf, BDC)
//!
//! Whitespace (space, \t, \r, \n, \0, \f) and comments (% to EOL) are kept
//! as tokens of their own.
//!
//! # Incremental lexing
//!
//! The lexer keeps its state between calls in [`LexState`]: the composite
//! node new tokens are appended to, the parenthesis balance of the literal
//! string being read, and whether it is inside inline image data. Feeding a
//! document in several [`append`] calls therefore produces the same token
//! kinds as a single call, with tokens split only at buffer boundaries.
//!
//! Editors that lex every line in isolation carry a [`Continuation`] from one
//! line to the next instead. [`seed`] replays it as synthetic `(`, `<` or
//! `ID ` tokens before the real line; the caller then drops those seed nodes.
//!
//! # Never failing
//!
//! Nothing in the input can make the lexer stop. A run of regular characters
//! that is neither a number, a keyword nor an operator becomes a single
//! [`TokenKind::Unknown`] token and scanning carries on after it.

use crate::content::operators;
use crate::token::TokenKind;
use crate::tree::{NodeId, ParseTree};
use bytes::Bytes;
use serde::Serialize;
use std::ops::Range;

/// PDF whitespace characters (PDF Ref 1.7, Table 3.1).
///
/// Space (0x20), tab (0x09), CR (0x0D), LF (0x0A), null (0x00), form feed (0x0C).
#[inline]
pub fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n' | 0x00 | 0x0C)
}

/// PDF delimiter characters (PDF Ref 1.7, Table 3.2).
#[inline]
pub fn is_delimiter(c: u8) -> bool {
    matches!(
        c,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// Neither whitespace nor a delimiter.
#[inline]
pub fn is_regular(c: u8) -> bool {
    !is_whitespace(c) && !is_delimiter(c)
}

/// Where a chunk left off, as far as the next chunk is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(tag = "state", content = "depth", rename_all = "snake_case")]
pub enum Continuation {
    /// Between tokens
    #[default]
    Normal,
    /// Inside a literal string with this many unclosed parentheses
    LiteralString(u32),
    /// Inside a hex string
    HexString,
    /// Inside inline image data, after `ID` and before `EI`
    InlineImage,
}

impl Continuation {
    /// Whether the chunk ended between tokens.
    pub fn is_normal(self) -> bool {
        self == Continuation::Normal
    }
}

/// Cross-call lexer state.
///
/// `current` is the composite (or root) that receives new tokens; `balance`
/// counts open parentheses while `current` is a literal string.
/// `inline_image` is set between an `ID` operator and its `EI`, and
/// `after_whitespace` records whether the last image byte seen was whitespace,
/// so an `EI` at the very start of the next chunk still ends the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexState {
    current: NodeId,
    balance: u32,
    inline_image: bool,
    after_whitespace: bool,
}

impl LexState {
    /// Fresh state positioned at the root of `tree`.
    pub fn new(tree: &ParseTree) -> Self {
        Self {
            current: tree.root(),
            balance: 0,
            inline_image: false,
            after_whitespace: false,
        }
    }

    /// Node that receives the next token.
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Parenthesis balance of the open literal string (0 outside one).
    pub fn balance(&self) -> u32 {
        self.balance
    }

    /// Whether the next byte belongs to inline image data.
    pub fn in_inline_image(&self) -> bool {
        self.inline_image
    }

    /// Continuation a following, independently lexed chunk should be seeded
    /// with.
    pub fn continuation(&self, tree: &ParseTree) -> Continuation {
        if self.inline_image {
            return Continuation::InlineImage;
        }
        match tree.kind(self.current) {
            TokenKind::StringLiteral => Continuation::LiteralString(self.balance),
            TokenKind::HexString => Continuation::HexString,
            _ => Continuation::Normal,
        }
    }
}

/// Lex `buffer[range]` and append the resulting nodes under `state`'s
/// current node.
///
/// # Panics
///
/// Panics if `range` does not lie within `buffer`.
pub fn append(tree: &mut ParseTree, state: &mut LexState, buffer: &Bytes, range: Range<usize>) {
    assert!(
        range.start <= range.end && range.end <= buffer.len(),
        "Lexer range {}..{} is out of bounds for a buffer of {} bytes",
        range.start,
        range.end,
        buffer.len()
    );
    let before = tree.node_count();
    let mut scanner = Scanner {
        tree: &mut *tree,
        state: &mut *state,
        buffer,
        bytes: &buffer[..],
        pos: range.start,
        end: range.end,
    };
    scanner.run();
    log::debug!(
        "Lexed {} bytes into {} arena nodes",
        range.end - range.start,
        tree.node_count() - before
    );
}

/// Lex `count` copies of `byte`, as if they were a buffer of their own.
pub fn append_repeated(tree: &mut ParseTree, state: &mut LexState, byte: u8, count: usize) {
    if count == 0 {
        return;
    }
    let buffer = Bytes::from(vec![byte; count]);
    append(tree, state, &buffer, 0..count);
}

/// Re-establish the string a previous chunk ended inside.
///
/// A literal string at depth *N* is replayed as *N* `(` tokens, a hex string
/// as one `<`, and inline image data as an `ID` operator followed by one space.
/// The nodes this creates are synthetic and belong to no chunk.
pub fn seed(tree: &mut ParseTree, state: &mut LexState, continuation: Continuation) {
    match continuation {
        Continuation::Normal => {},
        Continuation::LiteralString(depth) => {
            log::trace!("Seeding literal string at depth {}", depth);
            append_repeated(tree, state, b'(', depth as usize);
        },
        Continuation::HexString => {
            log::trace!("Seeding hex string");
            append_repeated(tree, state, b'<', 1);
        },
        Continuation::InlineImage => {
            log::trace!("Seeding inline image data");
            let buffer = Bytes::from_static(b"ID ");
            append(tree, state, &buffer, 0..buffer.len());
        },
    }
}

/// A parse tree together with the state that keeps lexing into it.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use pdf_content_lexer::lexer::Lexer;
///
/// let mut lexer = Lexer::new();
/// lexer.append(Bytes::from_static(b"BT /F1 12 Tf (Hi) Tj ET"));
/// let tree = lexer.tree();
/// assert_eq!(tree.full_text(tree.root()), b"BT /F1 12 Tf (Hi) Tj ET");
/// ```
#[derive(Debug, Clone)]
pub struct Lexer {
    tree: ParseTree,
    state: LexState,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    /// Lexer over an empty tree.
    pub fn new() -> Self {
        let tree = ParseTree::new();
        let state = LexState::new(&tree);
        Self { tree, state }
    }

    /// Lex a whole buffer.
    pub fn append(&mut self, buffer: impl Into<Bytes>) {
        let buffer = buffer.into();
        let len = buffer.len();
        append(&mut self.tree, &mut self.state, &buffer, 0..len);
    }

    /// Lex `buffer[range]`.
    pub fn append_range(&mut self, buffer: &Bytes, range: Range<usize>) {
        append(&mut self.tree, &mut self.state, buffer, range);
    }

    /// Lex `count` copies of `byte`.
    pub fn append_repeated(&mut self, byte: u8, count: usize) {
        append_repeated(&mut self.tree, &mut self.state, byte, count);
    }

    /// Replay a continuation before the next chunk.
    pub fn seed(&mut self, continuation: Continuation) {
        seed(&mut self.tree, &mut self.state, continuation);
    }

    /// Continuation for the chunk that would follow what was lexed so far.
    pub fn continuation(&self) -> Continuation {
        self.state.continuation(&self.tree)
    }

    /// Drop the tree and all state.
    pub fn reset(&mut self) {
        log::debug!("Resetting lexer");
        self.tree.clear();
        self.state = LexState::new(&self.tree);
    }

    /// Tree built so far.
    pub fn tree(&self) -> &ParseTree {
        &self.tree
    }

    /// Mutable access to the tree, e.g. to drop seed nodes.
    pub fn tree_mut(&mut self) -> &mut ParseTree {
        &mut self.tree
    }

    /// Current cross-call state.
    pub fn state(&self) -> LexState {
        self.state
    }

    /// Give up the lexer and keep the tree.
    pub fn into_tree(self) -> ParseTree {
        self.tree
    }
}

/// One `append` call's worth of scanning.
struct Scanner<'a> {
    tree: &'a mut ParseTree,
    state: &'a mut LexState,
    buffer: &'a Bytes,
    bytes: &'a [u8],
    pos: usize,
    end: usize,
}

impl Scanner<'_> {
    fn run(&mut self) {
        while self.pos < self.end {
            if self.state.inline_image {
                self.lex_in_inline_image();
                continue;
            }
            let start = self.pos;
            match self.tree.kind(self.state.current) {
                TokenKind::StringLiteral => self.lex_in_literal_string(),
                TokenKind::HexString => self.lex_in_hex_string(),
                _ => self.lex_token(),
            }
            debug_assert!(self.pos > start, "lexer made no progress at {}", start);
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    #[inline]
    fn peek(&self, offset: usize) -> Option<u8> {
        let at = self.pos + offset;
        (at < self.end).then(|| self.bytes[at])
    }

    /// Length of the run starting at `pos` whose bytes satisfy `f`.
    #[inline]
    fn run_len(&self, from: usize, f: impl Fn(u8) -> bool) -> usize {
        self.bytes[from..self.end]
            .iter()
            .position(|&c| !f(c))
            .unwrap_or(self.end - from)
    }

    /// Emit `len` bytes at the current position as a child of the current node.
    fn emit(&mut self, kind: TokenKind, len: usize) -> NodeId {
        let id = self
            .tree
            .add_child(self.state.current, kind, self.buffer, self.pos, len);
        self.pos += len;
        id
    }

    fn open(&mut self, kind: TokenKind) {
        let composite = self.tree.add_composite(self.state.current, kind);
        log::trace!("Opened {} at {}", kind, self.pos);
        self.state.current = composite;
    }

    fn close(&mut self) {
        let closed = self.state.current;
        self.state.current = self.tree.parent(closed).unwrap_or_else(|| self.tree.root());
        log::trace!("Closed {} at {}", self.tree.kind(closed), self.pos);
    }

    // ========================================================================
    // Inside strings
    // ========================================================================

    fn lex_in_literal_string(&mut self) {
        let mut i = self.pos;
        while i < self.end {
            match self.bytes[i] {
                // A backslash always swallows the next byte, whatever it is.
                b'\\' => i = (i + 2).min(self.end),
                b'(' | b')' => break,
                _ => i += 1,
            }
        }
        if i > self.pos {
            self.emit(TokenKind::StringLiteralData, i - self.pos);
            return;
        }

        if self.bytes[self.pos] == b')' {
            self.emit(TokenKind::StringLiteralClose, 1);
            self.state.balance = self.state.balance.saturating_sub(1);
            if self.state.balance == 0 {
                self.close();
            }
        } else {
            self.state.balance += 1;
            self.emit(TokenKind::StringLiteralOpen, 1);
        }
    }

    fn lex_in_hex_string(&mut self) {
        let data = self.run_len(self.pos, |c| c != b'>' && !is_whitespace(c));
        if data > 0 {
            self.emit(TokenKind::HexStringData, data);
        } else if self.bytes[self.pos] == b'>' {
            self.emit(TokenKind::HexStringClose, 1);
            self.close();
        } else {
            let ws = self.run_len(self.pos, is_whitespace);
            self.emit(TokenKind::Whitespace, ws);
        }
    }

    // ========================================================================
    // Between tokens
    // ========================================================================

    fn lex_token(&mut self) {
        let c = self.bytes[self.pos];

        if is_whitespace(c) {
            let len = self.run_len(self.pos, is_whitespace);
            self.emit(TokenKind::Whitespace, len);
            return;
        }

        if let Some(len) = self.numeric_len() {
            self.emit(TokenKind::Numeric, len);
            return;
        }

        match c {
            b'/' => {
                let len = 1 + self.run_len(self.pos + 1, is_regular);
                self.emit(TokenKind::Name, len);
            },
            b'(' => {
                if self.state.balance == 0 {
                    self.open(TokenKind::StringLiteral);
                }
                self.state.balance += 1;
                self.emit(TokenKind::StringLiteralOpen, 1);
            },
            b'<' => {
                if self.peek(1) == Some(b'<') {
                    self.open(TokenKind::Dictionary);
                    self.emit(TokenKind::DictionaryOpen, 2);
                } else {
                    self.open(TokenKind::HexString);
                    self.emit(TokenKind::HexStringOpen, 1);
                }
            },
            b'>' => {
                let in_dictionary = self.tree.kind(self.state.current) == TokenKind::Dictionary;
                if in_dictionary && self.peek(1) == Some(b'>') {
                    self.emit(TokenKind::DictionaryClose, 2);
                    self.close();
                } else {
                    self.emit(TokenKind::HexStringClose, 1);
                }
            },
            b'[' => {
                self.open(TokenKind::Array);
                self.emit(TokenKind::ArrayOpen, 1);
            },
            b']' => {
                self.emit(TokenKind::ArrayClose, 1);
                if self.tree.kind(self.state.current) == TokenKind::Array {
                    // The close token was emitted inside the array; step out.
                    self.close();
                }
            },
            b'%' => {
                let len = self.run_len(self.pos, |c| c != b'\r' && c != b'\n');
                self.emit(TokenKind::Comment, len);
            },
            b')' => {
                self.emit(TokenKind::StringLiteralClose, 1);
            },
            b'{' | b'}' => {
                self.emit(TokenKind::Unknown, 1);
            },
            _ => self.lex_keyword(),
        }
    }

    /// Length of a number at the current position: `-*`, digits, then an
    /// optional `.` and digits. At least one digit is required.
    ///
    /// Either side of the `.` may be empty, so `5.` and `.5` are numbers as
    /// they are in PDF object syntax (ISO 32000-1, 7.3.3). `5.x` is the
    /// number `5.` followed by an unknown run.
    fn numeric_len(&self) -> Option<usize> {
        let bytes = self.bytes;
        let mut i = self.pos;
        while i < self.end && bytes[i] == b'-' {
            i += 1;
        }
        let int_start = i;
        while i < self.end && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let mut digits = i - int_start;
        if i < self.end && bytes[i] == b'.' {
            let frac_start = i + 1;
            let mut j = frac_start;
            while j < self.end && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if digits > 0 || j > frac_start {
                digits += j - frac_start;
                i = j;
            }
        }
        (digits > 0).then(|| i - self.pos)
    }

    /// Keywords, operators and everything else made of regular characters.
    fn lex_keyword(&mut self) {
        let len = self.run_len(self.pos, is_regular).max(1);
        let run = &self.bytes[self.pos..self.pos + len];
        let kind = match run {
            b"true" | b"false" => TokenKind::Boolean,
            b"null" => TokenKind::Null,
            _ if operators::is_operator(run) => TokenKind::Operator,
            _ => TokenKind::Unknown,
        };
        let inline_image = kind == TokenKind::Operator && run == b"ID";
        self.emit(kind, len);
        if inline_image {
            self.enter_inline_image();
        }
    }

    /// `ID` followed by one whitespace byte starts inline image data.
    fn enter_inline_image(&mut self) {
        match self.peek(0) {
            Some(c) if is_whitespace(c) => {
                self.emit(TokenKind::Whitespace, 1);
                self.state.inline_image = true;
                self.state.after_whitespace = true;
                log::trace!("Inline image data starts at {}", self.pos);
            },
            _ => {},
        }
    }

    // ========================================================================
    // Inside inline images
    // ========================================================================

    /// Binary data up to the whitespace before the next `EI` keyword. Without
    /// an `EI` in this buffer the rest of it is data and the image stays open.
    fn lex_in_inline_image(&mut self) {
        let bytes = self.bytes;
        let start = self.pos;
        let end = self.end;
        let boundary = self.state.after_whitespace;
        let after_whitespace = |i: usize| {
            if i == start {
                boundary
            } else {
                is_whitespace(bytes[i - 1])
            }
        };
        let ends_keyword = |at: usize| at == end || !is_regular(bytes[at]);
        let ei = (start..end.saturating_sub(1)).find(|&i| {
            after_whitespace(i) && bytes[i] == b'E' && bytes[i + 1] == b'I' && ends_keyword(i + 2)
        });

        match ei {
            Some(ei) => {
                // The whitespace right before EI is lexed as ordinary whitespace.
                let data_end = if ei > start { ei - 1 } else { start };
                if data_end > start {
                    self.emit(TokenKind::BinaryData, data_end - start);
                }
                self.state.inline_image = false;
                self.state.after_whitespace = false;
                log::trace!("Inline image data ends at {}", data_end);
            },
            None => {
                self.state.after_whitespace = is_whitespace(bytes[end - 1]);
                self.emit(TokenKind::BinaryData, end - start);
            },
        }
    }
}
