//! PDF content stream operators.
//!
//! This module holds the table of operator keywords a content stream may
//! contain (PDF Spec: ISO 32000-1:2008, Annex A, Table A.1). The lexer only
//! needs to know whether a run of regular characters is an operator, so the
//! table is bucketed by length: a run of length *k* is compared against the
//! handful of operators of that exact length and nothing else.
//!
//! Each operator also belongs to an [`OperatorCategory`], used by the editor
//! layer to pick a highlight style.

use lazy_static::lazy_static;
use phf::phf_map;
use serde::Serialize;

/// Every content-stream operator, in Table A.1 order.
pub const OPERATORS: &[&[u8]] = &[
    b"b", b"B", b"b*", b"B*", b"BDC", b"BI", b"BMC", b"BT", b"BX", b"c", b"cm", b"CS", b"cs",
    b"d", b"d0", b"d1", b"Do", b"DP", b"EI", b"EMC", b"ET", b"EX", b"f", b"F", b"f*", b"G",
    b"g", b"gs", b"h", b"i", b"ID", b"j", b"J", b"K", b"k", b"l", b"m", b"M", b"MP", b"n",
    b"q", b"Q", b"re", b"RG", b"rg", b"ri", b"s", b"S", b"SC", b"sc", b"SCN", b"scn", b"sh",
    b"T*", b"Tc", b"Td", b"TD", b"Tf", b"Tj", b"TJ", b"TL", b"Tm", b"Tr", b"Ts", b"Tw", b"Tz",
    b"v", b"w", b"W", b"W*", b"y", b"'", b"\"",
];

/// Length of the longest operator in [`OPERATORS`].
pub const MAX_OPERATOR_LEN: usize = 3;

lazy_static! {
    /// [`OPERATORS`] grouped by length; index `k` holds the operators of
    /// length `k`.
    static ref OPERATORS_BY_LENGTH: Vec<Vec<&'static [u8]>> = {
        let mut buckets = vec![Vec::new(); MAX_OPERATOR_LEN + 1];
        for &op in OPERATORS {
            buckets[op.len()].push(op);
        }
        buckets
    };
}

/// Operator groups from ISO 32000-1:2008, Table 51.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorCategory {
    /// w, J, j, M, d, ri, i, gs
    GeneralGraphicsState,
    /// q, Q, cm
    SpecialGraphicsState,
    /// m, l, c, v, y, h, re
    PathConstruction,
    /// S, s, f, F, f*, B, B*, b, b*, n
    PathPainting,
    /// W, W*
    ClippingPath,
    /// BT, ET
    TextObject,
    /// Tc, Tw, Tz, TL, Tf, Tr, Ts
    TextState,
    /// Td, TD, Tm, T*
    TextPositioning,
    /// Tj, TJ, ', "
    TextShowing,
    /// d0, d1
    Type3Font,
    /// CS, cs, SC, SCN, sc, scn, G, g, RG, rg, K, k
    Color,
    /// sh
    ShadingPattern,
    /// BI, ID, EI
    InlineImage,
    /// Do
    XObject,
    /// MP, DP, BMC, BDC, EMC
    MarkedContent,
    /// BX, EX
    Compatibility,
}

static OPERATOR_CATEGORIES: phf::Map<&'static [u8], OperatorCategory> = phf_map! {
    b"w" => OperatorCategory::GeneralGraphicsState,
    b"J" => OperatorCategory::GeneralGraphicsState,
    b"j" => OperatorCategory::GeneralGraphicsState,
    b"M" => OperatorCategory::GeneralGraphicsState,
    b"d" => OperatorCategory::GeneralGraphicsState,
    b"ri" => OperatorCategory::GeneralGraphicsState,
    b"i" => OperatorCategory::GeneralGraphicsState,
    b"gs" => OperatorCategory::GeneralGraphicsState,
    b"q" => OperatorCategory::SpecialGraphicsState,
    b"Q" => OperatorCategory::SpecialGraphicsState,
    b"cm" => OperatorCategory::SpecialGraphicsState,
    b"m" => OperatorCategory::PathConstruction,
    b"l" => OperatorCategory::PathConstruction,
    b"c" => OperatorCategory::PathConstruction,
    b"v" => OperatorCategory::PathConstruction,
    b"y" => OperatorCategory::PathConstruction,
    b"h" => OperatorCategory::PathConstruction,
    b"re" => OperatorCategory::PathConstruction,
    b"S" => OperatorCategory::PathPainting,
    b"s" => OperatorCategory::PathPainting,
    b"f" => OperatorCategory::PathPainting,
    b"F" => OperatorCategory::PathPainting,
    b"f*" => OperatorCategory::PathPainting,
    b"B" => OperatorCategory::PathPainting,
    b"B*" => OperatorCategory::PathPainting,
    b"b" => OperatorCategory::PathPainting,
    b"b*" => OperatorCategory::PathPainting,
    b"n" => OperatorCategory::PathPainting,
    b"W" => OperatorCategory::ClippingPath,
    b"W*" => OperatorCategory::ClippingPath,
    b"BT" => OperatorCategory::TextObject,
    b"ET" => OperatorCategory::TextObject,
    b"Tc" => OperatorCategory::TextState,
    b"Tw" => OperatorCategory::TextState,
    b"Tz" => OperatorCategory::TextState,
    b"TL" => OperatorCategory::TextState,
    b"Tf" => OperatorCategory::TextState,
    b"Tr" => OperatorCategory::TextState,
    b"Ts" => OperatorCategory::TextState,
    b"Td" => OperatorCategory::TextPositioning,
    b"TD" => OperatorCategory::TextPositioning,
    b"Tm" => OperatorCategory::TextPositioning,
    b"T*" => OperatorCategory::TextPositioning,
    b"Tj" => OperatorCategory::TextShowing,
    b"TJ" => OperatorCategory::TextShowing,
    b"'" => OperatorCategory::TextShowing,
    b"\"" => OperatorCategory::TextShowing,
    b"d0" => OperatorCategory::Type3Font,
    b"d1" => OperatorCategory::Type3Font,
    b"CS" => OperatorCategory::Color,
    b"cs" => OperatorCategory::Color,
    b"SC" => OperatorCategory::Color,
    b"SCN" => OperatorCategory::Color,
    b"sc" => OperatorCategory::Color,
    b"scn" => OperatorCategory::Color,
    b"G" => OperatorCategory::Color,
    b"g" => OperatorCategory::Color,
    b"RG" => OperatorCategory::Color,
    b"rg" => OperatorCategory::Color,
    b"K" => OperatorCategory::Color,
    b"k" => OperatorCategory::Color,
    b"sh" => OperatorCategory::ShadingPattern,
    b"BI" => OperatorCategory::InlineImage,
    b"ID" => OperatorCategory::InlineImage,
    b"EI" => OperatorCategory::InlineImage,
    b"Do" => OperatorCategory::XObject,
    b"MP" => OperatorCategory::MarkedContent,
    b"DP" => OperatorCategory::MarkedContent,
    b"BMC" => OperatorCategory::MarkedContent,
    b"BDC" => OperatorCategory::MarkedContent,
    b"EMC" => OperatorCategory::MarkedContent,
    b"BX" => OperatorCategory::Compatibility,
    b"EX" => OperatorCategory::Compatibility,
};

/// Operators of exactly `len` bytes.
pub fn operators_of_length(len: usize) -> &'static [&'static [u8]] {
    match OPERATORS_BY_LENGTH.get(len) {
        Some(bucket) => bucket.as_slice(),
        None => &[],
    }
}

/// Match a run of regular characters against the operator table.
///
/// Only the bucket for `run.len()` is scanned. Returns the table entry on an
/// exact match.
pub fn lookup(run: &[u8]) -> Option<&'static [u8]> {
    operators_of_length(run.len())
        .iter()
        .copied()
        .find(|&op| op == run)
}

/// Whether `run` is exactly one of the content-stream operators.
#[inline]
pub fn is_operator(run: &[u8]) -> bool {
    lookup(run).is_some()
}

/// Category of an operator keyword.
pub fn category(op: &[u8]) -> Option<OperatorCategory> {
    OPERATOR_CATEGORIES.get(op).copied()
}
