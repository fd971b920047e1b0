//! # stencilc - a stencil DSL compiler front-end
//!
//! `stencilc` parses a stencil-computation DSL, validates it, and lowers it
//! into a Stencil Intermediate Representation (SIR) that serializes
//! deterministically, so that two documents compiled from identical sources
//! can be diffed byte for byte.
//!
//! ```text
//! source text → Scanner → Tokens → Parser → AST → Validator → Lowering → SIR → bytes
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use stencilc::{compile, sir::codec};
//!
//! # fn main() -> stencilc::Result<()> {
//! let source = r#"
//!     stencil Test {
//!       storage field_a, field_b;
//!
//!       Do {
//!         vertical_region(k_start, k_end)
//!           field_a = field_b;
//!       }
//!     };
//! "#;
//!
//! let doc = compile(source)?;
//! assert_eq!(doc.stencils[0].name, "Test");
//!
//! // The serialized form round-trips exactly.
//! let bytes = codec::serialize(&doc)?;
//! assert_eq!(codec::deserialize(&bytes)?, doc);
//! # Ok(())
//! # }
//! ```
//!
//! ## Main components
//!
//! - [`lexer::Scanner`] - tokenizes DSL source text
//! - [`parser::StencilParser`] - parses tokens into the stencil AST
//! - [`sema::validate`] - semantic checks and field resolution
//! - [`sir::lower`] - lowers a validated stencil into the SIR
//! - [`sir::codec`] - versioned, deterministic serialization
//! - [`compile`] / [`compile_many`] - the chained pipeline
//!
//! Compilation is deterministic and pure: the same source always produces a
//! structurally identical document. Errors surface as [`Error`] variants;
//! the crate never terminates the process.

/// Version of the stencilc crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod sema;
pub mod sir;

// Re-export main types
pub use error::{Error, Result};
pub use lexer::{Scanner, Token, TokenKind};
pub use parser::{CompilationUnit, StencilDecl, StencilParser};
pub use pipeline::{compile, compile_many, compile_to_sink, compile_with};
pub use sema::{validate, validate_unit, GridContext, StorageTable};
pub use sir::{lower, lower_unit, SirDocument, SirStencil};
