use super::token::{Token, TokenKind};
use crate::error::{Error, Result};

/// Scanner for the stencil DSL surface syntax
pub struct Scanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Start position of the current token
    start: usize,
    /// Column where the current token starts (1-indexed)
    start_column: usize,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl Scanner {
    /// Creates a new scanner from source code
    pub fn new(source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            start_column: 1,
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans all tokens from source code and returns them as a vector
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_column = self.column;
            self.scan_token()?;
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            String::new(),
            self.line,
            self.column,
        ));

        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();

        match c {
            // Whitespace
            ' ' | '\r' | '\t' => {}
            '\n' => {
                self.line += 1;
                self.column = 1;
            }

            // Delimiters
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            '[' => self.add_token(TokenKind::LeftBracket),
            ']' => self.add_token(TokenKind::RightBracket),
            ',' => self.add_token(TokenKind::Comma),
            ';' => self.add_token(TokenKind::Semicolon),

            // Operators
            '+' => self.add_token(TokenKind::Plus),
            '-' => self.add_token(TokenKind::Minus),
            '*' => self.add_token(TokenKind::Star),
            '=' => self.add_token(TokenKind::Assign),
            '/' => {
                if self.match_char('/') {
                    self.skip_line_comment();
                } else if self.match_char('*') {
                    self.skip_block_comment()?;
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }

            // Numbers
            c if c.is_ascii_digit() => self.scan_number()?,

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => self.scan_identifier_or_keyword(),

            _ => {
                return Err(Error::syntax(
                    self.line,
                    self.column,
                    format!("unexpected character '{}'", c),
                ));
            }
        }

        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        loop {
            if self.is_at_end() {
                return Err(Error::syntax(
                    self.line,
                    self.column,
                    "unterminated block comment",
                ));
            }
            let c = self.advance();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else if c == '*' && self.match_char('/') {
                return Ok(());
            }
        }
    }

    fn scan_number(&mut self) -> Result<()> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        let mut is_float = false;
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_float = true;
            self.advance(); // consume .
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text: String = self.source[self.start..self.current].iter().collect();

        if is_float {
            let value: f64 = text.parse().map_err(|_| {
                Error::syntax(self.line, self.column, format!("invalid float: {}", text))
            })?;
            self.add_token(TokenKind::Float(value));
        } else {
            let value: i64 = text.parse().map_err(|_| {
                Error::syntax(self.line, self.column, format!("invalid integer: {}", text))
            })?;
            self.add_token(TokenKind::Integer(value));
        }

        Ok(())
    }

    fn scan_identifier_or_keyword(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();

        let kind = match TokenKind::keyword(&text) {
            Some(keyword) => keyword,
            None => TokenKind::Identifier(text),
        };

        self.add_token(kind);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.current += 1;
            self.column += 1;
            true
        }
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme: String = self.source[self.start..self.current].iter().collect();
        self.tokens
            .push(Token::new(kind, lexeme, self.line, self.start_column));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_declaration() {
        let source = "storage field_a, field_b;";
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens().unwrap();

        assert_eq!(tokens.len(), 6); // storage id , id ; EOF
        assert_eq!(tokens[0].kind, TokenKind::Storage);
        assert_eq!(tokens[1].kind, TokenKind::Identifier("field_a".to_string()));
        assert_eq!(tokens[2].kind, TokenKind::Comma);
        assert_eq!(tokens[3].kind, TokenKind::Identifier("field_b".to_string()));
        assert_eq!(tokens[4].kind, TokenKind::Semicolon);
        assert_eq!(tokens[5].kind, TokenKind::Eof);
    }

    #[test]
    fn test_vertical_region_header() {
        let source = "vertical_region(k_start, k_end)";
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::VerticalRegion);
        assert_eq!(tokens[1].kind, TokenKind::LeftParen);
        assert_eq!(tokens[2].kind, TokenKind::KStart);
        assert_eq!(tokens[3].kind, TokenKind::Comma);
        assert_eq!(tokens[4].kind, TokenKind::KEnd);
        assert_eq!(tokens[5].kind, TokenKind::RightParen);
    }

    #[test]
    fn test_symbolic_bound_with_offset() {
        let source = "k_start + 1";
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::KStart);
        assert_eq!(tokens[1].kind, TokenKind::Plus);
        assert_eq!(tokens[2].kind, TokenKind::Integer(1));
    }

    #[test]
    fn test_offset_access() {
        let source = "field_a[i+1, k-1]";
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Identifier("field_a".to_string()));
        assert_eq!(tokens[1].kind, TokenKind::LeftBracket);
        assert_eq!(tokens[2].kind, TokenKind::Identifier("i".to_string()));
        assert_eq!(tokens[3].kind, TokenKind::Plus);
        assert_eq!(tokens[4].kind, TokenKind::Integer(1));
    }

    #[test]
    fn test_comments_skipped() {
        let source = "// header\nstencil /* inline */ Test";
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Stencil);
        assert_eq!(tokens[1].kind, TokenKind::Identifier("Test".to_string()));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let source = "stencil /* never closed";
        let mut scanner = Scanner::new(source);
        let err = scanner.scan_tokens().unwrap_err();

        assert!(matches!(err, Error::SyntaxError { .. }));
    }

    #[test]
    fn test_unexpected_character() {
        let source = "stencil #Test";
        let mut scanner = Scanner::new(source);
        let err = scanner.scan_tokens().unwrap_err();

        match err {
            Error::SyntaxError { line, message, .. } => {
                assert_eq!(line, 1);
                assert!(message.contains('#'));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_token_column_is_start_of_lexeme() {
        let source = "storage field_a;";
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens().unwrap();

        // "storage" begins in column 1, "field_a" in column 9.
        assert_eq!(tokens[0].kind, TokenKind::Storage);
        assert_eq!(tokens[0].column, 1);
        assert_eq!(tokens[1].kind, TokenKind::Identifier("field_a".to_string()));
        assert_eq!(tokens[1].column, 9);
        assert_eq!(tokens[2].kind, TokenKind::Semicolon);
        assert_eq!(tokens[2].column, 16);
    }

    #[test]
    fn test_column_resets_per_line() {
        let source = "stencil Test {\n  storage a;\n}";
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens().unwrap();

        let storage = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Storage)
            .unwrap();
        assert_eq!(storage.line, 2);
        assert_eq!(storage.column, 3);
    }

    #[test]
    fn test_line_tracking() {
        let source = "stencil Test\n{\n  storage a;\n}";
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens().unwrap();

        let storage = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Storage)
            .unwrap();
        assert_eq!(storage.line, 3);
    }
}
