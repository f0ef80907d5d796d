//! Expression parsing implementation
//!
//! One method per precedence level, lowest first:
//!
//! ```text
//! expression     ::= or_expr ["?" expression ":" expression]
//! or_expr        ::= and_expr ("||" and_expr)*
//! and_expr       ::= equality ("&&" equality)*
//! equality       ::= relational (("==" | "!=") relational)*
//! relational     ::= additive (("<" | "<=" | ">" | ">=") additive)*
//! additive       ::= multiplicative (("+" | "-") multiplicative)*
//! multiplicative ::= unary (("*" | "/" | "%") unary)*
//! unary          ::= ("+" | "-" | "!") unary | postfix
//! postfix        ::= primary ("[" expression "]" | "." identifier)*
//! primary        ::= "(" expression ")" | "@" name | number | boolean
//!                  | string+ | "empty" | array | dictionary
//!                  | identifier ["(" [arguments] ")"]
//! ```
//!
//! Binary operators are left-associative. A unary `+` is accepted and
//! discarded.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_conditional)
    }

    /// Parse the conditional operator (`? :`)
    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let condition = self.parse_or()?;

        if self.match_token(&Token::Question(self.current_location())) {
            let then_expr = Box::new(self.parse_expression()?);
            self.expect_colon("in conditional expression")?;
            let else_expr = Box::new(self.parse_expression()?);
            return Ok(Expr::Ternary {
                condition: Box::new(condition),
                then_expr,
                else_expr,
            });
        }

        Ok(condition)
    }

    /// Parse logical OR (||)
    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.match_token(&Token::OrOr(self.current_location())) {
            let right = self.parse_and()?;
            left = binary(BinOp::Or, left, right);
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while self.match_token(&Token::AndAnd(self.current_location())) {
            let right = self.parse_equality()?;
            left = binary(BinOp::And, left, right);
        }

        Ok(left)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let op = match self.peek() {
                Token::EqEq(_) => BinOp::Eq,
                Token::NotEq(_) => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.peek() {
                Token::Lt(_) => BinOp::Lt,
                Token::Le(_) => BinOp::Le,
                Token::Gt(_) => BinOp::Gt,
                Token::Ge(_) => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek() {
                Token::Star(_) => BinOp::Mul,
                Token::Slash(_) => BinOp::Div,
                Token::Percent(_) => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse unary (+ - !)
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Token::Plus(_) => None,
            Token::Minus(_) => Some(UnOp::Neg),
            Token::Bang(_) => Some(UnOp::Not),
            _ => return self.parse_postfix(),
        };
        self.advance();

        let operand = self.nested(Self::parse_unary)?;
        Ok(match op {
            Some(op) => Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            None => operand,
        })
    }

    /// Parse postfix (`[]` and `.`)
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();
            if self.match_token(&Token::LBracket(loc)) {
                let index = self.parse_expression()?;
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after index",
                )?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.match_token(&Token::Dot(loc)) {
                let member = self.expect_identifier()?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(Expr::Name(member)),
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse primary (literals, names, variables, calls, collections,
    /// parenthesized expressions)
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();

        match token {
            Token::NumberLiteral(n, _) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            Token::True(_) => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            Token::False(_) => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            Token::Empty(_) => {
                self.advance();
                Ok(Expr::Empty)
            }
            Token::StringLiteral(first, _) => {
                self.advance();
                // Adjacent literals concatenate: 'a' "b" is "ab"
                let mut string = first;
                while let Token::StringLiteral(next, _) = self.peek() {
                    string.push_str(next);
                    self.advance();
                }
                Ok(Expr::String(string))
            }
            Token::At(_) => {
                self.advance();
                self.parse_name_literal()
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            Token::LBracket(_) => {
                self.advance();
                let items = if self.check(&Token::RBracket(self.current_location())) {
                    Vec::new()
                } else {
                    self.parse_argument_list()?
                };
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after array elements",
                )?;
                Ok(Expr::Array(items))
            }
            Token::LBrace(_) => {
                self.advance();
                let entries = if self.check(&Token::RBrace(self.current_location())) {
                    Vec::new()
                } else {
                    self.parse_named_argument_list()?
                };
                self.expect_rbrace("after dictionary entries")?;
                Ok(Expr::Dictionary(entries))
            }
            Token::Ident(name, _) => {
                self.advance();
                if !self.match_token(&Token::LParen(self.current_location())) {
                    return Ok(Expr::Variable(name));
                }
                let args = if self.check(&Token::RParen(self.current_location())) {
                    CallArgs::Positional(Vec::new())
                } else if self.at_named_argument() {
                    CallArgs::Named(self.parse_named_argument_list()?)
                } else {
                    CallArgs::Positional(self.parse_argument_list()?)
                };
                self.expect_rparen("after function arguments")?;
                Ok(Expr::Call { name, args })
            }
            _ => Err(self.error(format!("Unexpected token: {}", token))),
        }
    }

    /// The identifier or keyword after `@`
    fn parse_name_literal(&mut self) -> Result<Expr, ParseError> {
        let name = match self.peek() {
            Token::Ident(name, _) => name.clone(),
            other => match other.keyword() {
                Some(word) => word.to_string(),
                None => {
                    return Err(self.error(format!(
                        "Expected name after '@', found {}",
                        self.peek()
                    )))
                }
            },
        };
        self.advance();
        Ok(Expr::Name(name))
    }

    /// `identifier :` starts a named argument
    fn at_named_argument(&self) -> bool {
        matches!(self.peek(), Token::Ident(_, _))
            && self.check_ahead(1, &Token::Colon(self.current_location()))
    }

    /// Parse positional arguments: expr, expr, ...
    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = vec![self.parse_expression()?];

        while self.match_token(&Token::Comma(self.current_location())) {
            args.push(self.parse_expression()?);
        }

        Ok(args)
    }

    /// Parse named arguments: name: expr, name: expr, ...
    fn parse_named_argument_list(&mut self) -> Result<Vec<(String, Expr)>, ParseError> {
        let mut args = Vec::new();

        loop {
            let name = self.expect_identifier()?;
            self.expect_colon("after argument name")?;
            args.push((name, self.parse_expression()?));

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(args)
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
