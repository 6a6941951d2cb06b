//! Pipeline tests
//!
//! A foreign tree goes through the whole stack:
//! - Transformation into an AST, with placeholders for bad input
//! - Symbol resolution and type computation
//! - Node identifiers on the resulting tree

pub mod tests_degradation;
pub mod tests_end_to_end;
pub mod tests_identity;
