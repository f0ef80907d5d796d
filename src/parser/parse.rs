//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the public entry points.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `functions`: Parsing function definitions
//! - `statements`: Parsing statements (declarations, if, for, etc.)
//! - `expressions`: Parsing expressions, one method per precedence level
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, Error)]
#[error("Parse error in {filename} at line {}, column {}: {message}", location.line, location.column)]
pub struct ParseError {
    pub message: String,
    pub filename: String,
    pub location: SourceLocation,
}

impl ParseError {
    fn from_lex(err: LexError, filename: &str) -> Self {
        ParseError {
            message: err.message,
            filename: filename.to_string(),
            location: err.location,
        }
    }
}

/// Parse every function definition in `source`.
///
/// `filename` only labels error messages. On failure no functions are
/// returned, even if some definitions before the error were well formed.
pub fn parse_functions(source: &str, filename: &str) -> Result<AdamFunctions, ParseError> {
    Parser::new(source, filename)?.parse_functions()
}

/// Parse a single standalone expression
pub fn parse_expression(source: &str, filename: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(source, filename)?;
    let expr = parser.parse_expression()?;
    if !parser.is_at_end() {
        return Err(parser.error(format!("Expected end of input, found {}", parser.peek())));
    }
    Ok(expr)
}

/// Deepest nesting of parenthesized expressions, collections, unary
/// operators and statement bodies the parser accepts
pub const MAX_NESTING_DEPTH: usize = 64;

/// Recursive descent parser for Adam functions
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    filename: String,
    depth: usize,
}

impl Parser {
    pub fn new(source: &str, filename: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer
            .tokenize()
            .map_err(|err| ParseError::from_lex(err, filename))?;
        Ok(Self {
            tokens,
            position: 0,
            filename: filename.to_string(),
            depth: 0,
        })
    }

    /// Parse function definitions until the end of input
    pub fn parse_functions(&mut self) -> Result<AdamFunctions, ParseError> {
        let mut functions = AdamFunctions::default();

        while !self.is_at_end() {
            let function = self.parse_function_definition()?;
            functions.insert(function.name.clone(), function);
        }

        Ok(functions)
    }

    // ===== Helper methods =====

    pub(crate) fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            filename: self.filename.clone(),
            location: self.current_location(),
        }
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING_DEPTH`]
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error("Expression nested too deeply".to_string()));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn check_ahead(&self, n: usize, token: &Token) -> bool {
        self.peek_ahead(n)
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("{}, found {}", message, self.peek())))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' {ctx}"),
        )
    }

    pub(crate) fn expect_colon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::Colon(self.current_location()),
            &format!("Expected ':' {ctx}"),
        )
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            &format!("Expected ';' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error(format!("Expected identifier, found {}", self.peek())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_function() {
        let functions = parse_functions("square(x) { return x * x; }", "test.fn").unwrap();

        assert_eq!(functions.len(), 1);
        let square = &functions["square"];
        assert_eq!(square.parameters, vec!["x".to_string()]);
        assert_eq!(
            square.statements,
            vec![Statement::Return(Expr::Binary {
                op: BinOp::Mul,
                left: Box::new(Expr::Variable("x".into())),
                right: Box::new(Expr::Variable("x".into())),
            })]
        );
    }

    #[test]
    fn test_parse_empty_source() {
        let functions = parse_functions("  // nothing here\n", "empty.fn").unwrap();
        assert!(functions.is_empty());
    }

    #[test]
    fn test_unbalanced_brace_fails() {
        let err = parse_functions("f() { return 1;", "bad.fn").unwrap_err();
        assert_eq!(err.filename, "bad.fn");
        assert!(err.message.contains("end of input"), "{}", err.message);
    }

    #[test]
    fn test_missing_parameter_separator_fails() {
        assert!(parse_functions("f(a b) { }", "bad.fn").is_err());
    }

    #[test]
    fn test_failure_discards_earlier_functions() {
        let result = parse_functions("ok() { return 1; }\nbroken( { }", "bad.fn");
        assert!(result.is_err());
    }

    #[test]
    fn test_lex_error_carries_filename() {
        let err = parse_functions("f() { return 1 # 2; }", "lex.fn").unwrap_err();
        assert_eq!(err.filename, "lex.fn");
        assert_eq!(err.location, SourceLocation::new(1, 16));
        assert_eq!(
            err.to_string(),
            "Parse error in lex.fn at line 1, column 16: Unexpected character: '#'"
        );
    }

    #[test]
    fn test_parse_expression_rejects_trailing_tokens() {
        assert!(parse_expression("1 + 2", "expr").is_ok());
        assert!(parse_expression("1 + 2 3", "expr").is_err());
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let source = format!("{}1", "(".repeat(5000));
        let err = parse_expression(&source, "deep.fn").unwrap_err();
        assert_eq!(err.message, "Expression nested too deeply");
        assert_eq!(err.location, SourceLocation::new(1, MAX_NESTING_DEPTH + 1));

        let negated = format!("f() {{ return {}x; }}", "-".repeat(5000));
        assert!(parse_functions(&negated, "deep.fn").is_err());

        let ifs = format!("f() {{ {}return 1; }}", "if (x) ".repeat(5000));
        let err = parse_functions(&ifs, "deep.fn").unwrap_err();
        assert_eq!(err.message, "Expression nested too deeply");
    }

    #[test]
    fn test_nesting_below_limit_parses() {
        let depth = MAX_NESTING_DEPTH - 1;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse_expression(&source, "deep.fn").unwrap(), Expr::Number(1.0));
    }
}
