//! Layout Type Definitions
//!
//! This crate contains the data model for struct/enum layout documents and
//! the parser for declared-type expressions. It provides pure data
//! structures without file I/O or code generation logic.

pub mod expr;
pub mod types;

// Re-export commonly used types at the crate root
pub use expr::*;
pub use types::*;
