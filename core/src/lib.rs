//! Small expression languages.
//!
//! Source text is tokenized, parsed into an immutable tree,
//! and evaluated against caller supplied variable bindings.
//! Two grammars share the pipeline, integer [`expr::Arithmetic`]
//! and [`expr::Boolean`] logic.
pub mod context;
pub mod expr;

pub use context::Context;
