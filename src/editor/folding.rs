//! Code folding for content streams.
//!
//! Folds are paired operator blocks: BT/ET text objects, BMC or BDC/EMC
//! marked content, q/Q graphics-state blocks and BX/EX compatibility
//! sections. The pass builds a second, derived [`ParseTree`] holding one
//! [`TokenKind::Fold`] composite per opener. A fold's children are its opener
//! token and, once found, its closer token spliced in after it. Folds that
//! never close or that span too few lines are then removed from that tree.

use crate::config::FoldOptions;
use crate::editor::LineIndex;
use crate::lexer::Lexer;
use crate::token::TokenKind;
use crate::tree::{NodeId, ParseTree};
use bytes::Bytes;
use serde::Serialize;

/// Kind of block a fold covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldKind {
    /// BT ... ET
    TextObject,
    /// BMC/BDC ... EMC
    MarkedContent,
    /// q ... Q
    GraphicsState,
    /// BX ... EX
    Compatibility,
}

impl FoldKind {
    /// Block kind an opening operator starts.
    pub fn opened_by(op: &[u8]) -> Option<Self> {
        match op {
            b"BT" => Some(FoldKind::TextObject),
            b"BMC" | b"BDC" => Some(FoldKind::MarkedContent),
            b"q" => Some(FoldKind::GraphicsState),
            b"BX" => Some(FoldKind::Compatibility),
            _ => None,
        }
    }

    /// Block kind a closing operator ends.
    pub fn closed_by(op: &[u8]) -> Option<Self> {
        match op {
            b"ET" => Some(FoldKind::TextObject),
            b"EMC" => Some(FoldKind::MarkedContent),
            b"Q" => Some(FoldKind::GraphicsState),
            b"EX" => Some(FoldKind::Compatibility),
            _ => None,
        }
    }

    fn enabled(self, options: &FoldOptions) -> bool {
        match self {
            FoldKind::TextObject => options.fold_text_objects,
            FoldKind::MarkedContent => options.fold_marked_content,
            FoldKind::GraphicsState => options.fold_graphics_state,
            FoldKind::Compatibility => options.fold_compatibility,
        }
    }
}

/// A collapsible region of the document.
///
/// Offsets are byte offsets into the document, `end_offset` exclusive.
/// Lines are zero-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoldRange {
    /// Block kind
    pub kind: FoldKind,
    /// Start of the opening operator
    pub start_offset: usize,
    /// End of the closing operator
    pub end_offset: usize,
    /// Line of the opening operator
    pub start_line: usize,
    /// Line of the closing operator
    pub end_line: usize,
}

impl FoldRange {
    /// Number of lines the fold spans.
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// Find the foldable blocks of `text`, outer blocks before the blocks they
/// contain.
pub fn compute_folds(text: &Bytes, options: &FoldOptions) -> Vec<FoldRange> {
    let source = {
        let mut lexer = Lexer::new();
        lexer.append(text.clone());
        lexer.into_tree()
    };
    let mut folds = build_fold_tree(&source, options);

    let index = LineIndex::new(text);
    let root = folds.root();
    let mut pruned = 0usize;
    let mut cursor = folds.first_child(root);
    while let Some(fold) = cursor {
        let closed = folds.children(fold).count() == 2;
        let (start_line, end_line) = fold_lines(&folds, fold, &index);
        if closed && end_line - start_line + 1 >= options.min_lines {
            cursor = folds.next(fold);
        } else {
            cursor = folds.remove(fold);
            pruned += 1;
        }
    }

    let ranges: Vec<FoldRange> = folds
        .children(root)
        .filter_map(|fold| {
            let opener = folds.first_child(fold)?;
            let kind = FoldKind::opened_by(folds.text(opener))?;
            let (start_line, end_line) = fold_lines(&folds, fold, &index);
            Some(FoldRange {
                kind,
                start_offset: folds.start_offset(fold),
                end_offset: folds.end_offset(fold),
                start_line,
                end_line,
            })
        })
        .collect();
    log::debug!("Computed {} folds ({} pruned)", ranges.len(), pruned);
    ranges
}

/// One `Fold` per enabled opener, in document order. Each closer is matched
/// to the innermost open fold of its kind; folds opened after that one are
/// abandoned and keep only their opener.
fn build_fold_tree(source: &ParseTree, options: &FoldOptions) -> ParseTree {
    let mut folds = ParseTree::new();
    let mut open: Vec<(FoldKind, NodeId)> = Vec::new();

    for id in source.primitives(source.root()) {
        if source.kind(id) != TokenKind::Operator {
            continue;
        }
        let (Some(buffer), Some(span)) = (source.buffer(id), source.span(id)) else {
            continue;
        };
        let op = source.text(id);

        if let Some(kind) = FoldKind::opened_by(op).filter(|k| k.enabled(options)) {
            let fold = folds.add_composite(folds.root(), TokenKind::Fold);
            let opener = folds.add_child(fold, TokenKind::Operator, buffer, span.start, span.len());
            open.push((kind, opener));
        } else if let Some(kind) = FoldKind::closed_by(op).filter(|k| k.enabled(options)) {
            let Some(at) = open.iter().rposition(|&(k, _)| k == kind) else {
                log::trace!("Ignoring unmatched {} at {}", String::from_utf8_lossy(op), span.start);
                continue;
            };
            let (_, opener) = open[at];
            open.truncate(at);
            folds.add_next(opener, TokenKind::Operator, buffer, span.start, span.len());
        }
    }
    folds
}

fn fold_lines(folds: &ParseTree, fold: NodeId, index: &LineIndex) -> (usize, usize) {
    let start = index.line_of(folds.start_offset(fold));
    let end = index.line_of(folds.end_offset(fold).saturating_sub(1));
    (start, end.max(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folds(text: &str) -> Vec<FoldRange> {
        compute_folds(&Bytes::copy_from_slice(text.as_bytes()), &FoldOptions::default())
    }

    fn folds_with(text: &str, options: &FoldOptions) -> Vec<FoldRange> {
        compute_folds(&Bytes::copy_from_slice(text.as_bytes()), options)
    }

    fn lines(ranges: &[FoldRange]) -> Vec<(FoldKind, usize, usize)> {
        ranges
            .iter()
            .map(|r| (r.kind, r.start_line, r.end_line))
            .collect()
    }

    #[test]
    fn test_text_object_fold() {
        let text = "q\nBT\n/F1 12 Tf\n(Hi) Tj\nET\nQ\n";
        let ranges = folds(text);
        assert_eq!(lines(&ranges), vec![(FoldKind::TextObject, 1, 4)]);
        assert_eq!(ranges[0].start_offset, 2);
        assert_eq!(ranges[0].end_offset, text.find("ET").unwrap() + 2);
        assert_eq!(ranges[0].line_count(), 4);
    }

    #[test]
    fn test_single_line_fold_is_dropped() {
        assert!(folds("BT /F1 12 Tf (Hi) Tj ET\n").is_empty());
    }

    #[test]
    fn test_nested_folds_outer_first() {
        let text = "BT\n/P <</MCID 0>> BDC\n(x) Tj\nEMC\nET\n";
        assert_eq!(
            lines(&folds(text)),
            vec![(FoldKind::TextObject, 0, 4), (FoldKind::MarkedContent, 1, 3)]
        );
    }

    #[test]
    fn test_bmc_and_bdc_both_open_marked_content() {
        let text = "/A BMC\n/B <<>> BDC\nEMC\nEMC\n";
        assert_eq!(
            lines(&folds(text)),
            vec![
                (FoldKind::MarkedContent, 0, 3),
                (FoldKind::MarkedContent, 1, 2),
            ]
        );
    }

    #[test]
    fn test_unmatched_closer_is_ignored() {
        assert_eq!(lines(&folds("ET\nBT\nET\n")), vec![(FoldKind::TextObject, 1, 2)]);
    }

    #[test]
    fn test_unclosed_opener_is_dropped() {
        assert!(folds("BT\n(Hi) Tj\n").is_empty());
    }

    #[test]
    fn test_interleaved_blocks() {
        // ET closes the text object and abandons the marked content opened
        // inside it; the later EMC has nothing left to close.
        let text = "BT\n/A BMC\nET\nEMC\n";
        assert_eq!(lines(&folds(text)), vec![(FoldKind::TextObject, 0, 2)]);
    }

    #[test]
    fn test_operators_inside_strings_do_not_fold() {
        assert!(folds("(BT\nET) Tj\n").is_empty());
    }

    #[test]
    fn test_graphics_state_needs_option() {
        let text = "q\n1 0 0 1 0 0 cm\nQ\n";
        assert!(folds(text).is_empty());
        let opts = FoldOptions::new().with_graphics_state(true);
        assert_eq!(lines(&folds_with(text, &opts)), vec![(FoldKind::GraphicsState, 0, 2)]);
    }

    #[test]
    fn test_compatibility_section() {
        let text = "BX\n/Foo xx\nEX\n";
        assert_eq!(
            lines(&folds_with(text, &FoldOptions::all())),
            vec![(FoldKind::Compatibility, 0, 2)]
        );
    }

    #[test]
    fn test_disabled_kind_does_not_match() {
        let opts = FoldOptions::new().with_text_objects(false);
        assert!(folds_with("BT\nET\n", &opts).is_empty());
    }

    #[test]
    fn test_min_lines() {
        let text = "BT\nET\nBT\n\nET\n";
        assert_eq!(folds(text).len(), 2);
        let opts = FoldOptions::new().with_min_lines(3);
        assert_eq!(lines(&folds_with(text, &opts)), vec![(FoldKind::TextObject, 2, 4)]);
        let opts = FoldOptions::new().with_min_lines(1);
        assert_eq!(folds_with("BT ET", &opts).len(), 1);
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(lines(&folds("BT\r\nET\r\n")), vec![(FoldKind::TextObject, 0, 1)]);
        assert_eq!(lines(&folds("BT\rET")), vec![(FoldKind::TextObject, 0, 1)]);
    }

    #[test]
    fn test_empty_document() {
        assert!(folds("").is_empty());
    }

    #[test]
    fn test_fold_range_serialization() {
        let ranges = folds("BT\nET");
        let json = serde_json::to_string(&ranges[0]).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"text_object","start_offset":0,"end_offset":5,"start_line":0,"end_line":1}"#
        );
    }
}
