//! Configuration for the editor passes.

/// Options for [`compute_folds`](crate::editor::folding::compute_folds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldOptions {
    /// Fold text objects (BT ... ET).
    pub fold_text_objects: bool,

    /// Fold marked-content sequences (BMC/BDC ... EMC).
    pub fold_marked_content: bool,

    /// Fold graphics-state blocks (q ... Q).
    pub fold_graphics_state: bool,

    /// Fold compatibility sections (BX ... EX).
    pub fold_compatibility: bool,

    /// Minimum number of source lines a fold must span. Folds shorter than
    /// this are dropped.
    pub min_lines: usize,
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FoldOptions {
    /// Text objects and marked content, at least two lines.
    pub fn new() -> Self {
        Self {
            fold_text_objects: true,
            fold_marked_content: true,
            fold_graphics_state: false,
            fold_compatibility: false,
            min_lines: 2,
        }
    }

    /// Every block kind the folding pass knows about.
    pub fn all() -> Self {
        Self {
            fold_graphics_state: true,
            fold_compatibility: true,
            ..Self::new()
        }
    }

    /// Fold text objects.
    pub fn with_text_objects(mut self, enable: bool) -> Self {
        self.fold_text_objects = enable;
        self
    }

    /// Fold marked content.
    pub fn with_marked_content(mut self, enable: bool) -> Self {
        self.fold_marked_content = enable;
        self
    }

    /// Fold graphics-state blocks.
    pub fn with_graphics_state(mut self, enable: bool) -> Self {
        self.fold_graphics_state = enable;
        self
    }

    /// Fold compatibility sections.
    pub fn with_compatibility(mut self, enable: bool) -> Self {
        self.fold_compatibility = enable;
        self
    }

    /// Minimum fold height in lines. Values below 1 are treated as 1.
    pub fn with_min_lines(mut self, lines: usize) -> Self {
        self.min_lines = lines.max(1);
        self
    }
}

/// Options for [`highlight_line`](crate::editor::highlight::highlight_line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Merge adjacent whitespace spans into one.
    pub coalesce_whitespace: bool,

    /// Attach the operator category to operator spans.
    pub classify_operators: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightOptions {
    /// Whitespace kept as lexed, operators classified.
    pub fn new() -> Self {
        Self {
            coalesce_whitespace: false,
            classify_operators: true,
        }
    }

    /// Merge adjacent whitespace spans.
    pub fn with_coalesce_whitespace(mut self, enable: bool) -> Self {
        self.coalesce_whitespace = enable;
        self
    }

    /// Attach operator categories.
    pub fn with_classify_operators(mut self, enable: bool) -> Self {
        self.classify_operators = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_defaults() {
        let opts = FoldOptions::default();
        assert!(opts.fold_text_objects);
        assert!(opts.fold_marked_content);
        assert!(!opts.fold_graphics_state);
        assert!(!opts.fold_compatibility);
        assert_eq!(opts.min_lines, 2);
    }

    #[test]
    fn test_fold_all() {
        let opts = FoldOptions::all();
        assert!(opts.fold_graphics_state);
        assert!(opts.fold_compatibility);
        assert_eq!(opts.min_lines, 2);
    }

    #[test]
    fn test_fold_builder() {
        let opts = FoldOptions::new()
            .with_text_objects(false)
            .with_marked_content(false)
            .with_graphics_state(true)
            .with_compatibility(true)
            .with_min_lines(0);
        assert!(!opts.fold_text_objects);
        assert!(!opts.fold_marked_content);
        assert!(opts.fold_graphics_state);
        assert!(opts.fold_compatibility);
        assert_eq!(opts.min_lines, 1);
    }

    #[test]
    fn test_highlight_builder() {
        let opts = HighlightOptions::new()
            .with_coalesce_whitespace(true)
            .with_classify_operators(false);
        assert!(opts.coalesce_whitespace);
        assert!(!opts.classify_operators);
        assert_eq!(HighlightOptions::default(), HighlightOptions::new());
    }
}
