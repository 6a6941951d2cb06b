//! # arbor
//!
//! Reusable "parse tree → AST → semantic model" infrastructure for language
//! tooling, independent of any grammar.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ids        → Node identifiers (structural, declarative, cached)
//!   ↓
//! semantics  → Scopes, specificity dispatch, symbol resolution, types
//!   ↓
//! transform  → Foreign tree → AST via per-type factories
//!   ↓
//! model      → Metamodel, Node, Issue, the foreign tree contract
//!   ↓
//! base       → Primitives (Position, Span, LineIndex, Source)
//! ```

// ============================================================================
// MODULES (dependency order: base → model → transform → semantics → ids)
// ============================================================================

/// Foundation types: Position, Span, LineIndex, Source
pub mod base;

/// Node model: statically declared concepts and the nodes built from them
pub mod model;

/// Transformation engine: factories, extraction rules, graceful degradation
pub mod transform;

/// Scopes, rule dispatch, symbol resolution and type computation
pub mod semantics;

/// Node identifier providers
pub mod ids;

// Re-export foundation types
pub use base::{LineIndex, Position, Source, Span, TextRange, TextSize};

// Re-export the types every pipeline touches
pub use ids::NodeIdProvider;
pub use model::{Concept, Issue, Metamodel, Node, Severity};
pub use semantics::{Scope, Semantics};
pub use transform::{Factory, Transformer};
