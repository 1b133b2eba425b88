//! # PDF Content Lexer
//!
//! Incremental, lossless lexer for PDF content streams, built for editors.
//!
//! ## Core Features
//!
//! - **Lossless**: concatenating the text of every leaf token reproduces the
//!   input byte for byte, malformed input included
//! - **Incremental**: input may arrive in arbitrary chunks; literal strings,
//!   hex strings and inline image data carry over chunk boundaries through an
//!   explicit [`LexState`]
//! - **Resumable per line**: an editor can lex each line on its own and
//!   replay the previous line's [`Continuation`] as seed tokens
//! - **Never failing**: unknown input becomes [`TokenKind::Unknown`] tokens
//! - **Zero-copy**: leaf tokens are slices of shared [`bytes::Bytes`] buffers
//! - **Structured**: literal strings, hex strings, arrays and dictionaries
//!   are grouped under composite nodes of a [`ParseTree`]
//!
//! ## Editor Passes
//!
//! - **Highlighting** ([`editor::highlight`]): per-line spans with styles and
//!   operator categories
//! - **Folding** ([`editor::folding`]): BT/ET, BMC/BDC/EMC, q/Q and BX/EX
//!   blocks spanning several lines
//!
//! ## Quick Start
//!
//! ```
//! use bytes::Bytes;
//! use pdf_content_lexer::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new();
//! lexer.append(Bytes::from_static(b"BT /F1 12 Tf (Hel"));
//! lexer.append(Bytes::from_static(b"lo) Tj ET"));
//!
//! let tree = lexer.tree();
//! let kinds: Vec<TokenKind> = tree
//!     .primitives(tree.root())
//!     .map(|id| tree.kind(id))
//!     .filter(|kind| *kind != TokenKind::Whitespace)
//!     .collect();
//! assert_eq!(kinds[0], TokenKind::Operator);
//! assert_eq!(tree.full_text(tree.root()), b"BT /F1 12 Tf (Hello) Tj ET");
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Tokens and the tree they live in
pub mod token;
pub mod tree;

// Lexing
pub mod content;
pub mod lexer;

// Configuration
pub mod config;

// Highlighting and folding
pub mod editor;

// Re-exports
pub use config::{FoldOptions, HighlightOptions};
pub use content::OperatorCategory;
pub use editor::{FoldKind, FoldRange, HighlightSpan, HighlightedLine, Style};
pub use error::{Error, Result};
pub use lexer::{Continuation, LexState, Lexer};
pub use token::TokenKind;
pub use tree::{NodeId, ParseTree};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
