use super::ast::{
    BinaryOp, CompilationUnit, Expr, FieldAccess, Interval, Offset, StencilDecl, Stmt,
    StorageKind, UnaryOp, VerticalBound, VerticalRegion,
};
use super::builder::StencilBuilder;
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};

/// Recursive-descent parser for the stencil DSL.
///
/// The parser does not attempt recovery: the first error aborts the parse
/// for the whole compilation unit.
pub struct StencilParser {
    tokens: Vec<Token>,
    current: usize,
}

impl StencilParser {
    /// Creates a new parser over a token stream
    pub fn new(tokens: Vec<Token>) -> Self {
        StencilParser { tokens, current: 0 }
    }

    /// Parses the tokens into a compilation unit of one or more stencils
    pub fn parse(&mut self) -> Result<CompilationUnit> {
        let mut stencils = Vec::new();

        while !self.is_at_end() {
            stencils.push(self.parse_stencil()?);
        }

        if stencils.is_empty() {
            return Err(Error::malformed("compilation unit contains no stencils"));
        }

        Ok(CompilationUnit { stencils })
    }

    /// stencil := "stencil" IDENT "{" storage* do_method "}" ";"?
    fn parse_stencil(&mut self) -> Result<StencilDecl> {
        self.consume(&TokenKind::Stencil, "'stencil'")?;
        let name = self.expect_identifier("stencil name")?;
        self.consume(&TokenKind::LeftBrace, "'{'")?;

        let mut builder = StencilBuilder::new(&name);

        loop {
            match self.peek().kind.clone() {
                TokenKind::Storage => self.parse_storage_decl(&mut builder, StorageKind::Field)?,
                TokenKind::Var => {
                    self.parse_storage_decl(&mut builder, StorageKind::Temporary)?
                }
                TokenKind::Do => {
                    let regions = self.parse_do_method()?;
                    builder.set_do_method(regions)?;
                }
                TokenKind::RightBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => return Err(Error::UnexpectedEof),
                _ => {
                    return Err(self.unexpected("'storage', 'var', 'Do' or '}'"));
                }
            }
        }

        // Optional trailing semicolon after the block, C-style.
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }

        builder.finish()
    }

    /// storage := ("storage" | "var") IDENT ("," IDENT)* ";"
    ///
    /// The declaring keyword has already been peeked; its kind is passed in.
    fn parse_storage_decl(&mut self, builder: &mut StencilBuilder, kind: StorageKind) -> Result<()> {
        let keyword = self.advance().clone();
        if builder.has_do_method() {
            return Err(Error::syntax(
                keyword.line,
                keyword.column,
                "storage declaration after Do method",
            ));
        }

        loop {
            let name = self.expect_identifier("storage name")?;
            builder.add_storage(name, kind);
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.consume(&TokenKind::Semicolon, "';'")?;
        Ok(())
    }

    /// do_method := "Do" "{" region+ "}"
    fn parse_do_method(&mut self) -> Result<Vec<VerticalRegion>> {
        self.consume(&TokenKind::Do, "'Do'")?;
        self.consume(&TokenKind::LeftBrace, "'{'")?;

        let mut regions = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            if self.is_at_end() {
                return Err(Error::UnexpectedEof);
            }
            regions.push(self.parse_vertical_region()?);
        }
        self.consume(&TokenKind::RightBrace, "'}'")?;

        Ok(regions)
    }

    /// region := "vertical_region" "(" bound "," bound ")" region_body
    fn parse_vertical_region(&mut self) -> Result<VerticalRegion> {
        self.consume(&TokenKind::VerticalRegion, "'vertical_region'")?;
        self.consume(&TokenKind::LeftParen, "'('")?;
        let lower = self.parse_bound()?;
        self.consume(&TokenKind::Comma, "','")?;
        let upper = self.parse_bound()?;
        self.consume(&TokenKind::RightParen, "')'")?;

        // region_body := "{" statement* "}" | statement
        let body = if self.check(&TokenKind::LeftBrace) {
            self.advance();
            let mut stmts = Vec::new();
            while !self.check(&TokenKind::RightBrace) {
                if self.is_at_end() {
                    return Err(Error::UnexpectedEof);
                }
                stmts.push(self.parse_statement()?);
            }
            self.consume(&TokenKind::RightBrace, "'}'")?;
            stmts
        } else {
            vec![self.parse_statement()?]
        };

        Ok(VerticalRegion {
            interval: Interval { lower, upper },
            body,
        })
    }

    /// bound := ("k_start" | "k_end") (("+" | "-") INT)? | "-"? INT
    fn parse_bound(&mut self) -> Result<VerticalBound> {
        match self.peek().kind.clone() {
            TokenKind::KStart => {
                self.advance();
                let offset = self.parse_bound_offset()?;
                Ok(VerticalBound::Start { offset })
            }
            TokenKind::KEnd => {
                self.advance();
                let offset = self.parse_bound_offset()?;
                Ok(VerticalBound::End { offset })
            }
            TokenKind::Integer(v) => {
                self.advance();
                Ok(VerticalBound::Literal(v))
            }
            TokenKind::Minus => {
                self.advance();
                match self.peek().kind {
                    TokenKind::Integer(v) => {
                        self.advance();
                        Ok(VerticalBound::Literal(-v))
                    }
                    _ => Err(self.unexpected("integer level")),
                }
            }
            TokenKind::Eof => Err(Error::UnexpectedEof),
            _ => Err(self.unexpected("'k_start', 'k_end' or integer level")),
        }
    }

    /// The optional `+ n` / `- n` after a symbolic bound
    fn parse_bound_offset(&mut self) -> Result<i64> {
        let sign = match self.peek().kind {
            TokenKind::Plus => 1,
            TokenKind::Minus => -1,
            _ => return Ok(0),
        };
        self.advance();
        match self.peek().kind {
            TokenKind::Integer(v) => {
                self.advance();
                Ok(sign * v)
            }
            TokenKind::Eof => Err(Error::UnexpectedEof),
            _ => Err(self.unexpected("integer offset")),
        }
    }

    /// statement := field_access "=" expr ";" | expr ";"
    fn parse_statement(&mut self) -> Result<Stmt> {
        let expr = self.parse_expr()?;

        let stmt = if self.check(&TokenKind::Assign) {
            let assign = self.advance().clone();
            let lhs = match expr {
                Expr::FieldAccess(access) => access,
                _ => {
                    return Err(Error::syntax(
                        assign.line,
                        assign.column,
                        "left-hand side of assignment must be a field access",
                    ));
                }
            };
            let rhs = self.parse_expr()?;
            Stmt::Assign { lhs, rhs }
        } else {
            Stmt::Expr(expr)
        };

        self.consume(&TokenKind::Semicolon, "';'")?;
        Ok(stmt)
    }

    // Expressions, precedence climbing: term < factor < unary < primary.

    /// expr := factor (("+" | "-") factor)*
    fn parse_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// factor := unary (("*" | "/") unary)*
    fn parse_factor(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// unary := "-" unary | primary
    fn parse_unary(&mut self) -> Result<Expr> {
        if self.check(&TokenKind::Minus) {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    /// primary := INT | FLOAT | field_access | "(" expr ")"
    fn parse_primary(&mut self) -> Result<Expr> {
        match self.peek().kind.clone() {
            TokenKind::Integer(v) => {
                self.advance();
                Ok(Expr::IntLiteral(v))
            }
            TokenKind::Float(v) => {
                self.advance();
                Ok(Expr::FloatLiteral(v))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                let offset = if self.check(&TokenKind::LeftBracket) {
                    self.parse_offset()?
                } else {
                    Offset::default()
                };
                Ok(Expr::FieldAccess(FieldAccess { name, offset }))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.consume(&TokenKind::RightParen, "')'")?;
                Ok(expr)
            }
            TokenKind::Eof => Err(Error::UnexpectedEof),
            _ => Err(self.unexpected("number, field access or '('")),
        }
    }

    /// offset := "[" axis_offset ("," axis_offset)* "]"
    /// axis_offset := ("i" | "j" | "k") (("+" | "-") INT)?
    ///
    /// Axes may appear in any order, each at most once; a bare axis means
    /// offset 0, and omitted axes default to 0.
    fn parse_offset(&mut self) -> Result<Offset> {
        self.consume(&TokenKind::LeftBracket, "'['")?;

        let mut offset = Offset::default();
        let mut seen = [false; 3];

        loop {
            if self.is_at_end() {
                return Err(Error::UnexpectedEof);
            }
            let axis_token = self.advance().clone();
            let axis = match &axis_token.kind {
                TokenKind::Identifier(name) if name == "i" => 0,
                TokenKind::Identifier(name) if name == "j" => 1,
                TokenKind::Identifier(name) if name == "k" => 2,
                _ => {
                    return Err(Error::UnexpectedToken {
                        expected: "axis 'i', 'j' or 'k'".to_string(),
                        got: axis_token.kind.to_string(),
                        line: axis_token.line,
                        col: axis_token.column,
                    });
                }
            };
            if seen[axis] {
                return Err(Error::syntax(
                    axis_token.line,
                    axis_token.column,
                    format!("axis '{}' appears twice in offset", axis_token.lexeme),
                ));
            }
            seen[axis] = true;

            let value = self.parse_bound_offset()?;
            match axis {
                0 => offset.i = value,
                1 => offset.j = value,
                _ => offset.k = value,
            }

            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        self.consume(&TokenKind::RightBracket, "']'")?;
        Ok(offset)
    }

    // Token-stream helpers

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn consume(&mut self, kind: &TokenKind, expected: &str) -> Result<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else if self.is_at_end() {
            Err(Error::UnexpectedEof)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<String> {
        match self.peek().kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            TokenKind::Eof => Err(Error::UnexpectedEof),
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        let token = self.peek();
        Error::UnexpectedToken {
            expected: expected.to_string(),
            got: token.kind.to_string(),
            line: token.line,
            col: token.column,
        }
    }
}
