//! Token classification.
//!
//! Every node in a [`ParseTree`](crate::tree::ParseTree) carries a
//! [`TokenKind`]. The kinds fall into three disjoint groups:
//!
//! - **Marker** kinds are internal bookkeeping (the tree root and the
//!   sentinel that anchors each child list). They are never handed to a
//!   consumer and cannot be constructed through the public tree API.
//! - **Primitive** kinds are leaves. A primitive node owns a slice of a
//!   backing buffer and never has children.
//! - **Composite** kinds group other nodes (literal strings, hex strings,
//!   arrays, dictionaries, and folds built by the editor layer). A composite
//!   never holds text of its own.
//!
//! Code outside this module branches on [`TokenKind::is_marker`],
//! [`TokenKind::is_primitive`] and [`TokenKind::is_composite`] rather than on
//! concrete kinds wherever it can.

use serde::Serialize;
use std::fmt;

/// Kind of a parse-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Markers
    /// Tree root
    Root,
    /// Anchor of a circular child list
    Sentinel,

    // Primitives
    /// Run of PDF whitespace (space, tab, CR, LF, NUL, FF)
    Whitespace,
    /// `%` up to, not including, the line terminator
    Comment,
    /// `true` or `false`
    Boolean,
    /// Integer or real number
    Numeric,
    /// `/` followed by regular characters
    Name,
    /// `null`
    Null,
    /// Content-stream operator found in the operator table
    Operator,
    /// Inline image data between `ID` and `EI`
    BinaryData,
    /// Anything no other rule recognised
    Unknown,
    /// `(`, opening or nested
    StringLiteralOpen,
    /// Literal-string bytes between parentheses
    StringLiteralData,
    /// `)`, closing or nested
    StringLiteralClose,
    /// `<`
    HexStringOpen,
    /// Hex digits (or garbage) inside a hex string
    HexStringData,
    /// `>`
    HexStringClose,
    /// `[`
    ArrayOpen,
    /// `]`
    ArrayClose,
    /// `<<`
    DictionaryOpen,
    /// `>>`
    DictionaryClose,

    // Composites
    /// Parenthesised literal string
    StringLiteral,
    /// Angle-bracketed hex string
    HexString,
    /// `[ ... ]`
    Array,
    /// `<< ... >>`
    Dictionary,
    /// Foldable region built by the editor folding pass
    Fold,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: [TokenKind; 26] = [
        TokenKind::Root,
        TokenKind::Sentinel,
        TokenKind::Whitespace,
        TokenKind::Comment,
        TokenKind::Boolean,
        TokenKind::Numeric,
        TokenKind::Name,
        TokenKind::Null,
        TokenKind::Operator,
        TokenKind::BinaryData,
        TokenKind::Unknown,
        TokenKind::StringLiteralOpen,
        TokenKind::StringLiteralData,
        TokenKind::StringLiteralClose,
        TokenKind::HexStringOpen,
        TokenKind::HexStringData,
        TokenKind::HexStringClose,
        TokenKind::ArrayOpen,
        TokenKind::ArrayClose,
        TokenKind::DictionaryOpen,
        TokenKind::DictionaryClose,
        TokenKind::StringLiteral,
        TokenKind::HexString,
        TokenKind::Array,
        TokenKind::Dictionary,
        TokenKind::Fold,
    ];

    /// Internal bookkeeping kind, never exposed to consumers.
    #[inline]
    pub fn is_marker(self) -> bool {
        matches!(self, TokenKind::Root | TokenKind::Sentinel)
    }

    /// Leaf kind carrying a text slice.
    #[inline]
    pub fn is_primitive(self) -> bool {
        !self.is_marker() && !self.is_composite()
    }

    /// Container kind with children and no text.
    #[inline]
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral
                | TokenKind::HexString
                | TokenKind::Array
                | TokenKind::Dictionary
                | TokenKind::Fold
        )
    }

    /// Upper-case name used in dumps and error messages.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Root => "ROOT",
            TokenKind::Sentinel => "SENTINEL",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Comment => "COMMENT",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Numeric => "NUMERIC",
            TokenKind::Name => "NAME",
            TokenKind::Null => "NULL",
            TokenKind::Operator => "OPERATOR",
            TokenKind::BinaryData => "BINARY_DATA",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::StringLiteralOpen => "STRING_LITERAL_OPEN",
            TokenKind::StringLiteralData => "STRING_LITERAL_DATA",
            TokenKind::StringLiteralClose => "STRING_LITERAL_CLOSE",
            TokenKind::HexStringOpen => "HEX_STRING_OPEN",
            TokenKind::HexStringData => "HEX_STRING_DATA",
            TokenKind::HexStringClose => "HEX_STRING_CLOSE",
            TokenKind::ArrayOpen => "ARRAY_OPEN",
            TokenKind::ArrayClose => "ARRAY_CLOSE",
            TokenKind::DictionaryOpen => "DICTIONARY_OPEN",
            TokenKind::DictionaryClose => "DICTIONARY_CLOSE",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::HexString => "HEX_STRING",
            TokenKind::Array => "ARRAY",
            TokenKind::Dictionary => "DICTIONARY",
            TokenKind::Fold => "FOLD",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
