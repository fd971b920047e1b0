use serde::{Deserialize, Serialize};

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Line number where the token appears (1-indexed)
    pub line: usize,
    /// Column number where the token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme,
            line,
            column,
        }
    }
}

/// All possible token types in the stencil DSL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Integer literal
    Integer(i64),
    /// Floating-point literal
    Float(f64),

    /// Identifier (storage names, stencil names)
    Identifier(String),

    // Keywords
    /// `stencil` keyword opening a stencil block
    Stencil,
    /// `storage` keyword declaring plain fields
    Storage,
    /// `var` keyword declaring temporary fields
    Var,
    /// `Do` keyword opening the do-method block
    Do,
    /// `vertical_region` keyword
    VerticalRegion,
    /// `k_start` symbolic lower vertical bound
    KStart,
    /// `k_end` symbolic upper vertical bound
    KEnd,

    // Operators
    /// Plus operator (+)
    Plus,
    /// Minus operator (-)
    Minus,
    /// Star operator (*)
    Star,
    /// Slash operator (/)
    Slash,
    /// Assignment operator (=)
    Assign,

    // Delimiters
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Left brace {
    LeftBrace,
    /// Right brace }
    RightBrace,
    /// Left bracket [
    LeftBracket,
    /// Right bracket ]
    RightBracket,
    /// Comma delimiter
    Comma,
    /// Semicolon delimiter
    Semicolon,

    // Special
    /// End of file marker
    Eof,
}

impl TokenKind {
    /// Look up the keyword for an identifier-shaped lexeme, if any.
    ///
    /// `Do` is the one capitalized keyword in the surface syntax; everything
    /// else is lowercase.
    pub fn keyword(s: &str) -> Option<TokenKind> {
        match s {
            "stencil" => Some(TokenKind::Stencil),
            "storage" => Some(TokenKind::Storage),
            "var" => Some(TokenKind::Var),
            "Do" => Some(TokenKind::Do),
            "vertical_region" => Some(TokenKind::VerticalRegion),
            "k_start" => Some(TokenKind::KStart),
            "k_end" => Some(TokenKind::KEnd),
            _ => None,
        }
    }

    /// Check if the token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Stencil
                | TokenKind::Storage
                | TokenKind::Var
                | TokenKind::Do
                | TokenKind::VerticalRegion
                | TokenKind::KStart
                | TokenKind::KEnd
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenKind::Integer(n) => write!(f, "{}", n),
            TokenKind::Float(fl) => write!(f, "{}", fl),
            TokenKind::Identifier(id) => write!(f, "{}", id),
            TokenKind::Stencil => write!(f, "stencil"),
            TokenKind::Storage => write!(f, "storage"),
            TokenKind::Var => write!(f, "var"),
            TokenKind::Do => write!(f, "Do"),
            TokenKind::VerticalRegion => write!(f, "vertical_region"),
            TokenKind::KStart => write!(f, "k_start"),
            TokenKind::KEnd => write!(f, "k_end"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::LeftBracket => write!(f, "["),
            TokenKind::RightBracket => write!(f, "]"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Eof => write!(f, "<eof>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::keyword("stencil"), Some(TokenKind::Stencil));
        assert_eq!(TokenKind::keyword("Do"), Some(TokenKind::Do));
        assert_eq!(TokenKind::keyword("k_start"), Some(TokenKind::KStart));
        // Keywords are case-sensitive
        assert_eq!(TokenKind::keyword("do"), None);
        assert_eq!(TokenKind::keyword("field_a"), None);
    }

    #[test]
    fn test_is_keyword() {
        assert!(TokenKind::VerticalRegion.is_keyword());
        assert!(!TokenKind::Integer(42).is_keyword());
        assert!(!TokenKind::Identifier("test".to_string()).is_keyword());
    }
}
