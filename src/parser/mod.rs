//! Parser for the stencil DSL
//!
//! Turns the token stream into an abstract syntax tree of stencils,
//! storages, vertical regions, and statements.

mod ast;
mod builder;
mod stencil_parser;

pub use ast::{
    BinaryOp, CompilationUnit, DoMethod, Expr, FieldAccess, Interval, Offset, StencilDecl, Stmt,
    StorageDecl, StorageKind, UnaryOp, VerticalBound, VerticalRegion,
};
pub use builder::StencilBuilder;
pub use stencil_parser::StencilParser;
