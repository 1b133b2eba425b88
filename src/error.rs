//! Error types for the content-stream lexer.
//!
//! Malformed content-stream text is never an error: the lexer classifies
//! anything it does not recognise as an `Unknown` token and keeps going.
//! The variants here describe misuse of the parse-tree API instead. The
//! panicking tree mutators format these into their panic message; the `try_*`
//! mutators hand them back to the caller.

use crate::token::TokenKind;

/// Result type alias for parse-tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or inspecting a parse tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Children were requested under a primitive (leaf) node
    #[error("Cannot add children to primitive node of kind {kind}")]
    PrimitiveParent {
        /// Kind of the node that was used as a parent
        kind: TokenKind,
    },

    /// A marker kind was passed to a public constructor
    #[error("Marker kind {kind} cannot be constructed through the public tree API")]
    MarkerKind {
        /// The offending marker kind
        kind: TokenKind,
    },

    /// A primitive constructor got a composite kind, or the other way round
    #[error("Invalid node kind: expected {expected} kind, found {found}")]
    KindMismatch {
        /// Category the constructor expects ("primitive" or "composite")
        expected: &'static str,
        /// Kind that was supplied
        found: TokenKind,
    },

    /// The operation needs a node that is linked under a parent
    #[error("Node has no parent (root or already removed)")]
    DetachedNode,

    /// A node slice points outside its backing buffer
    #[error("Slice {offset}..{end} is out of bounds for a buffer of {len} bytes")]
    SliceOutOfBounds {
        /// Start of the requested slice
        offset: usize,
        /// End of the requested slice
        end: usize,
        /// Length of the backing buffer
        len: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_parent_error() {
        let err = Error::PrimitiveParent {
            kind: TokenKind::Operator,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("primitive"));
        assert!(msg.contains("OPERATOR"));
    }

    #[test]
    fn test_marker_kind_error() {
        let err = Error::MarkerKind {
            kind: TokenKind::Root,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("ROOT"));
    }

    #[test]
    fn test_kind_mismatch_error() {
        let err = Error::KindMismatch {
            expected: "composite",
            found: TokenKind::Name,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("composite"));
        assert!(msg.contains("NAME"));
    }

    #[test]
    fn test_slice_out_of_bounds_error() {
        let err = Error::SliceOutOfBounds {
            offset: 4,
            end: 12,
            len: 8,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("4..12"));
        assert!(msg.contains("8 bytes"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
