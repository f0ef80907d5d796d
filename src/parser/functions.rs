//! Function definition parsing
//!
//! # Grammar
//!
//! ```text
//! function_def ::= identifier "(" [params] ")" "{" statement* "}"
//! params       ::= identifier ("," identifier)*
//! ```

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse function definition: name(params) { body }
    pub(crate) fn parse_function_definition(&mut self) -> Result<AdamFunction, ParseError> {
        let name = self.expect_identifier()?;

        self.expect_lparen("after function name")?;
        let parameters = self.parse_parameter_list()?;
        self.expect_rparen("after parameters")?;

        self.expect_token(
            &Token::LBrace(self.current_location()),
            "Expected '{' before function body",
        )?;
        let statements = self.parse_block_statements()?;
        self.expect_rbrace("after function body")?;

        tracing::trace!(function = %name, statements = statements.len(), "parsed function");
        Ok(AdamFunction::new(name, parameters, statements))
    }

    /// Parse parameter list: (name, name, ...)
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut params = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(params);
        }

        loop {
            params.push(self.expect_identifier()?);

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(params)
    }
}
