//! Lexer for the stencil DSL
//!
//! Tokenizes DSL source text into a flat token stream for the parser.

mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{Token, TokenKind};
