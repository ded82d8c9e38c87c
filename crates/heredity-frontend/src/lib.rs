//! # Heredity Frontend
//!
//! Parser, record AST, and validation for pedigree files.

pub mod ast;
pub mod errors;
pub mod parser;
pub mod validate;

// Re-export commonly used types
pub use ast::*;
pub use errors::{FrontendError, ValidationContext, ValidationDiagnostic};
pub use parser::parse_pedigree;
pub use validate::validate_pedigree;
