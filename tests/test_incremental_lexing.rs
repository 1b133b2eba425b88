//! Integration tests for incremental and seeded lexing.
//!
//! Covers the two ways of feeding the lexer: one tree fed chunk after chunk,
//! and one fresh tree per line seeded with the previous line's continuation.

use bytes::Bytes;
use pdf_content_lexer::lexer::{self, Continuation, LexState};
use pdf_content_lexer::{Lexer, NodeId, ParseTree, TokenKind};

fn tokens(tree: &ParseTree) -> Vec<(TokenKind, Vec<u8>)> {
    tree.primitives(tree.root())
        .map(|id| (tree.kind(id), tree.text(id).to_vec()))
        .collect()
}

/// Lex `line` on its own after seeding, returning the real tokens and the
/// continuation for the next line.
fn lex_line(line: &[u8], entering: Continuation) -> (Vec<(TokenKind, Vec<u8>)>, Continuation) {
    let mut tree = ParseTree::new();
    let mut state = LexState::new(&tree);
    lexer::seed(&mut tree, &mut state, entering);
    let seeds: Vec<NodeId> = tree.primitives(tree.root()).collect();
    let buffer = Bytes::copy_from_slice(line);
    lexer::append(&mut tree, &mut state, &buffer, 0..buffer.len());
    let exit = state.continuation(&tree);
    for seed in seeds {
        tree.remove(seed);
    }
    (tokens(&tree), exit)
}

#[test]
fn test_resumable_hex_string() {
    let whole = {
        let mut lexer = Lexer::new();
        lexer.append(Bytes::from_static(b"<4142>"));
        tokens(lexer.tree())
    };

    let (first, exit) = lex_line(b"<41", Continuation::Normal);
    assert_eq!(exit, Continuation::HexString);
    let (second, exit) = lex_line(b"42>", exit);
    assert_eq!(exit, Continuation::Normal);

    let split: Vec<_> = first.into_iter().chain(second).collect();
    let kinds: Vec<TokenKind> = split.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::HexStringOpen,
            TokenKind::HexStringData,
            TokenKind::HexStringData,
            TokenKind::HexStringClose,
        ]
    );
    let joined: Vec<u8> = split.iter().flat_map(|(_, t)| t.clone()).collect();
    let whole_text: Vec<u8> = whole.iter().flat_map(|(_, t)| t.clone()).collect();
    assert_eq!(joined, whole_text);
}

#[test]
fn test_literal_string_across_three_lines() {
    let (_, exit) = lex_line(b"((one\n", Continuation::Normal);
    assert_eq!(exit, Continuation::LiteralString(2));

    let (middle, exit) = lex_line(b"two)\n", exit);
    assert_eq!(exit, Continuation::LiteralString(1));
    assert_eq!(middle[0], (TokenKind::StringLiteralData, b"two".to_vec()));
    assert_eq!(middle[1], (TokenKind::StringLiteralClose, b")".to_vec()));

    let (last, exit) = lex_line(b"three) Tj\n", exit);
    assert_eq!(exit, Continuation::Normal);
    assert!(last
        .iter()
        .any(|(k, t)| *k == TokenKind::Operator && t.as_slice() == b"Tj"));
}

#[test]
fn test_inline_image_across_lines() {
    let (first, exit) = lex_line(b"BI /W 2 ID\n", Continuation::Normal);
    assert_eq!(exit, Continuation::InlineImage);
    assert_eq!(first.last().unwrap(), &(TokenKind::Whitespace, b"\n".to_vec()));

    // Bytes that would open a string stay image data.
    let (data, exit) = lex_line(b"(\x01\n", exit);
    assert_eq!(exit, Continuation::InlineImage);
    assert_eq!(data, vec![(TokenKind::BinaryData, b"(\x01\n".to_vec())]);

    let (end, exit) = lex_line(b"EI\n", exit);
    assert_eq!(exit, Continuation::Normal);
    assert_eq!(end[0], (TokenKind::Operator, b"EI".to_vec()));

    let (after, exit) = lex_line(b"BT\n", exit);
    assert_eq!(exit, Continuation::Normal);
    assert_eq!(after[0], (TokenKind::Operator, b"BT".to_vec()));
}

#[test]
fn test_seed_tokens_are_removed() {
    let (tokens, _) = lex_line(b"x", Continuation::LiteralString(4));
    assert_eq!(tokens, vec![(TokenKind::StringLiteralData, b"x".to_vec())]);
}

#[test]
fn test_chunks_share_one_tree() {
    let mut lexer = Lexer::new();
    for chunk in [&b"<</Type /X"[..], b"Object /Length 1", b"2>>\n[(a", b"b) 1] TJ"] {
        lexer.append(Bytes::copy_from_slice(chunk));
    }
    let tree = lexer.tree();
    let root = tree.root();
    let top: Vec<TokenKind> = tree.children(root).map(|id| tree.kind(id)).collect();
    assert_eq!(
        top,
        vec![
            TokenKind::Dictionary,
            TokenKind::Whitespace,
            TokenKind::Array,
            TokenKind::Whitespace,
            TokenKind::Operator,
        ]
    );
    assert_eq!(
        tree.full_text(root),
        b"<</Type /XObject /Length 12>>\n[(ab) 1] TJ".to_vec()
    );
    assert_eq!(lexer.continuation(), Continuation::Normal);
}

#[test]
fn test_tokens_split_only_at_chunk_boundary() {
    let mut lexer = Lexer::new();
    lexer.append(Bytes::from_static(b"(abc"));
    lexer.append(Bytes::from_static(b"def)"));
    let kinds: Vec<TokenKind> = tokens(lexer.tree()).into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::StringLiteralOpen,
            TokenKind::StringLiteralData,
            TokenKind::StringLiteralData,
            TokenKind::StringLiteralClose,
        ]
    );
}

#[test]
fn test_nodes_keep_their_own_buffer() {
    let first = Bytes::from_static(b"q ");
    let second = Bytes::from_static(b"Q");
    let mut lexer = Lexer::new();
    lexer.append(first.clone());
    lexer.append(second.clone());
    let tree = lexer.tree();
    let last = tree.last_child(tree.root()).unwrap();
    assert_eq!(tree.span(last), Some(0..1));
    assert_eq!(tree.buffer(last).unwrap().as_ptr(), second.as_ptr());
    let first_node = tree.first_child(tree.root()).unwrap();
    assert_eq!(tree.buffer(first_node).unwrap().as_ptr(), first.as_ptr());
}

#[test]
fn test_append_repeated_matches_buffer() {
    let mut repeated = Lexer::new();
    repeated.append_repeated(b'(', 3);
    let mut literal = Lexer::new();
    literal.append(Bytes::from_static(b"((("));
    assert_eq!(tokens(repeated.tree()), tokens(literal.tree()));
    assert_eq!(repeated.continuation(), Continuation::LiteralString(3));
}
