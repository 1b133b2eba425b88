//! Property-based tests for the content stream lexer.
//!
//! 1. **Round trip**: leaf tokens reproduce any input byte for byte
//! 2. **Chunking is invisible**: lexing in pieces yields the same tokens as
//!    lexing in one call, apart from splits at the piece boundaries
//! 3. **Never panics**: arbitrary bytes in arbitrary chunks lex cleanly
//! 4. **Line highlighting covers every byte** and agrees with whole-document
//!    string and inline image state

use bytes::Bytes;
use pdf_content_lexer::editor::highlight_document;
use pdf_content_lexer::{HighlightOptions, Lexer, ParseTree, TokenKind};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

/// Fragments that stitch together into realistic and broken streams alike.
const FRAGMENTS: &[&str] = &[
    " ", " ", "\n", "\r\n", "\t", "q", "Q", "BT", "ET", "Tf", "Tj", "TJ", "cm", "BDC", "EMC",
    "12", "-3.5", ".5", "/F1", "/", "(", ")", "\\", "\\(", "<", ">", "<<", ">>", "[", "]", "{",
    "}", "48656C", "true", "null", "@@", "abc", "BI", "ID", "EI", "\x01", "\x7f", "\u{e9}",
];

fn stream() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..60).prop_map(|parts| parts.concat())
}

/// Split `input` at the chosen positions that sit between two whitespace
/// bytes.
fn whitespace_cuts(input: &[u8], picks: &[prop::sample::Index]) -> Vec<usize> {
    let ws = |c: u8| matches!(c, b' ' | b'\t' | b'\r' | b'\n');
    let candidates: Vec<usize> = (1..input.len())
        .filter(|&i| ws(input[i - 1]) && ws(input[i]))
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }
    let mut cuts: Vec<usize> = picks.iter().map(|p| *p.get(&candidates)).collect();
    cuts.sort_unstable();
    cuts.dedup();
    cuts
}

fn lex_whole(input: &[u8]) -> Lexer {
    let mut lexer = Lexer::new();
    lexer.append(Bytes::copy_from_slice(input));
    lexer
}

fn lex_chunked(input: &[u8], cuts: &[usize]) -> Lexer {
    let buffer = Bytes::copy_from_slice(input);
    let mut lexer = Lexer::new();
    let mut start = 0;
    for &cut in cuts.iter().chain(std::iter::once(&input.len())) {
        lexer.append_range(&buffer, start..cut);
        start = cut;
    }
    lexer
}

/// Leaf tokens with neighbours of the same kind merged.
fn coalesced(tree: &ParseTree) -> Vec<(TokenKind, Vec<u8>)> {
    let mut out: Vec<(TokenKind, Vec<u8>)> = Vec::new();
    for id in tree.primitives(tree.root()) {
        let kind = tree.kind(id);
        match out.last_mut() {
            Some((last, text)) if *last == kind => text.extend_from_slice(tree.text(id)),
            _ => out.push((kind, tree.text(id).to_vec())),
        }
    }
    out
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Any byte sequence survives lexing unchanged.
    #[test]
    fn test_round_trip_arbitrary_bytes(input in prop::collection::vec(any::<u8>(), 0..400)) {
        let lexer = lex_whole(&input);
        let tree = lexer.tree();
        prop_assert_eq!(tree.full_text(tree.root()), input.clone());
        prop_assert_eq!(tree.length(tree.root()), input.len());
    }

    /// Arbitrary chunking never loses or reorders bytes.
    #[test]
    fn test_round_trip_arbitrary_chunks(
        input in prop::collection::vec(any::<u8>(), 0..300),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let mut cuts: Vec<usize> = if input.is_empty() {
            Vec::new()
        } else {
            picks.iter().map(|p| p.index(input.len())).collect()
        };
        cuts.sort_unstable();
        cuts.dedup();
        let lexer = lex_chunked(&input, &cuts);
        let tree = lexer.tree();
        prop_assert_eq!(tree.full_text(tree.root()), input);
    }

    /// Leaf offsets are contiguous within a single buffer.
    #[test]
    fn test_spans_are_contiguous(input in stream()) {
        let lexer = lex_whole(input.as_bytes());
        let tree = lexer.tree();
        let mut pos = 0;
        for id in tree.primitives(tree.root()) {
            let span = tree.span(id).unwrap();
            prop_assert_eq!(span.start, pos);
            prop_assert!(span.end > span.start, "empty token {:?}", tree.kind(id));
            pos = span.end;
        }
        prop_assert_eq!(pos, input.len());
    }

    /// Splitting between whitespace bytes only splits tokens; kinds and
    /// string or image state match a single-call lex.
    #[test]
    fn test_chunked_matches_whole(
        input in stream(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let bytes = input.as_bytes();
        let cuts = whitespace_cuts(bytes, &picks);
        let whole = lex_whole(bytes);
        let chunked = lex_chunked(bytes, &cuts);
        prop_assert_eq!(coalesced(whole.tree()), coalesced(chunked.tree()));
        prop_assert_eq!(whole.continuation(), chunked.continuation());
    }

    /// Per-line highlighting covers each line exactly and ends in the same
    /// string or image state as lexing the whole document.
    #[test]
    fn test_highlight_lines_cover_input(input in stream()) {
        let text = Bytes::copy_from_slice(input.as_bytes());
        let lines = highlight_document(&text, &HighlightOptions::default());
        let total: usize = lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .map(|span| span.len)
            .sum();
        prop_assert_eq!(total, input.len());
        for line in &lines {
            let mut pos = 0;
            for span in &line.spans {
                prop_assert_eq!(span.start, pos);
                pos = span.end();
            }
        }
        let exit = lines.last().map(|line| line.exit).unwrap_or_default();
        prop_assert_eq!(exit, lex_whole(input.as_bytes()).continuation());
    }

    /// Nothing in arbitrary bytes makes line highlighting panic.
    #[test]
    fn test_highlight_never_panics(input in prop::collection::vec(any::<u8>(), 0..300)) {
        let text = Bytes::from(input);
        let _ = highlight_document(&text, &HighlightOptions::default());
    }
}
