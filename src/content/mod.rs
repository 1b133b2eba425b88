//! PDF content stream vocabulary.
//!
//! Content streams contain a sequence of operands followed by operators. This
//! module holds the static operator table the lexer matches against.

pub mod operators;

pub use operators::{category, is_operator, lookup, OperatorCategory};
