//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statement    ::= const_decl | decl | assignment | return_stmt
//!                | "continue" ";" | "break" ";" | if_stmt | for_stmt
//! const_decl   ::= "constant" identifier [":" expression] ";"
//! decl         ::= identifier [":" expression] ";"
//! assignment   ::= identifier "=" expression ";"
//! return_stmt  ::= "return" expression ";"
//! if_stmt      ::= "if" "(" expression ")" substatement ["else" substatement]
//! for_stmt     ::= "for" "(" (simple_for | complex_for) ")" substatement
//! simple_for   ::= identifier ["," identifier] ":" expression
//! complex_for  ::= decl_list ";" expression ";" assign_list
//! decl_list    ::= identifier ":" expression ("," identifier ":" expression)*
//! assign_list  ::= identifier "=" expression ("," identifier "=" expression)*
//! substatement ::= "{" statement* "}" | statement
//! ```
//!
//! An `else` binds to the nearest unmatched `if`.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::Constant(loc)) {
            let name = self.expect_identifier()?;
            let init = self.parse_optional_initializer()?;
            self.expect_semicolon("after constant declaration")?;
            return Ok(Statement::ConstDecl { name, init });
        }

        if self.match_token(&Token::Return(loc)) {
            let value = self.parse_expression()?;
            self.expect_semicolon("after return value")?;
            return Ok(Statement::Return(value));
        }

        if self.match_token(&Token::Continue(loc)) {
            self.expect_semicolon("after 'continue'")?;
            return Ok(Statement::Continue);
        }

        if self.match_token(&Token::Break(loc)) {
            self.expect_semicolon("after 'break'")?;
            return Ok(Statement::Break);
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement();
        }

        if self.match_token(&Token::For(loc)) {
            return self.parse_for_statement();
        }

        if matches!(self.peek(), Token::Ident(_, _)) {
            let name = self.expect_identifier()?;

            if self.match_token(&Token::Eq(self.current_location())) {
                let value = self.parse_expression()?;
                self.expect_semicolon("after assignment")?;
                return Ok(Statement::Assign { name, value });
            }

            let init = self.parse_optional_initializer()?;
            self.expect_semicolon("after declaration")?;
            return Ok(Statement::Decl { name, init });
        }

        Err(self.error(format!("Expected statement, found {}", self.peek())))
    }

    /// `: expr`, if present
    fn parse_optional_initializer(&mut self) -> Result<Option<Expr>, ParseError> {
        if self.match_token(&Token::Colon(self.current_location())) {
            Ok(Some(self.parse_expression()?))
        } else {
            Ok(None)
        }
    }

    /// Either a braced block or a single statement
    fn parse_substatement(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.nested(|parser| {
            if parser.match_token(&Token::LBrace(parser.current_location())) {
                let statements = parser.parse_block_statements()?;
                parser.expect_rbrace("after block")?;
                Ok(statements)
            } else {
                Ok(vec![parser.parse_statement()?])
            }
        })
    }

    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = self.parse_substatement()?;
        let else_branch = if self.match_token(&Token::Else(self.current_location())) {
            self.parse_substatement()?
        } else {
            Vec::new()
        };

        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_for_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_lparen("after 'for'")?;
        let first = self.expect_identifier()?;

        // for (key, value : sequence)
        if self.match_token(&Token::Comma(self.current_location())) {
            let value = self.expect_identifier()?;
            self.expect_colon("after loop variables")?;
            let sequence = self.parse_expression()?;
            self.expect_rparen("after loop sequence")?;
            let body = self.parse_substatement()?;
            return Ok(Statement::SimpleFor {
                key: first,
                value: Some(value),
                sequence,
                body,
            });
        }

        self.expect_colon("after loop variable")?;
        let first_init = self.parse_expression()?;

        // for (value : sequence)
        if self.match_token(&Token::RParen(self.current_location())) {
            let body = self.parse_substatement()?;
            return Ok(Statement::SimpleFor {
                key: first,
                value: None,
                sequence: first_init,
                body,
            });
        }

        let mut decls = vec![(first, first_init)];
        while self.match_token(&Token::Comma(self.current_location())) {
            let name = self.expect_identifier()?;
            self.expect_colon("after loop variable")?;
            decls.push((name, self.parse_expression()?));
        }
        self.expect_semicolon("after loop declarations")?;

        let condition = self.parse_expression()?;
        self.expect_semicolon("after loop condition")?;

        let mut updates = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            self.expect_token(
                &Token::Eq(self.current_location()),
                "Expected '=' in loop update",
            )?;
            updates.push((name, self.parse_expression()?));

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }
        self.expect_rparen("after loop updates")?;

        let body = self.parse_substatement()?;
        Ok(Statement::ComplexFor {
            decls,
            condition,
            updates,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_functions;
    use pretty_assertions::assert_eq;

    fn body(source: &str) -> Vec<Statement> {
        let wrapped = format!("f() {{ {} }}", source);
        let mut functions = parse_functions(&wrapped, "stmt.fn").unwrap();
        functions.remove("f").unwrap().statements
    }

    fn num(n: f64) -> Expr {
        Expr::Number(n)
    }

    #[test]
    fn test_declarations() {
        assert_eq!(
            body("a; b: 1; constant c; constant d: 2; a = 3;"),
            vec![
                Statement::Decl {
                    name: "a".into(),
                    init: None
                },
                Statement::Decl {
                    name: "b".into(),
                    init: Some(num(1.0))
                },
                Statement::ConstDecl {
                    name: "c".into(),
                    init: None
                },
                Statement::ConstDecl {
                    name: "d".into(),
                    init: Some(num(2.0))
                },
                Statement::Assign {
                    name: "a".into(),
                    value: num(3.0)
                },
            ]
        );
    }

    #[test]
    fn test_jumps() {
        assert_eq!(
            body("continue; break; return 0;"),
            vec![Statement::Continue, Statement::Break, Statement::Return(num(0.0))]
        );
    }

    #[test]
    fn test_if_with_single_statements() {
        assert_eq!(
            body("if (true) return 1; else return 2;"),
            vec![Statement::If {
                condition: Expr::Bool(true),
                then_branch: vec![Statement::Return(num(1.0))],
                else_branch: vec![Statement::Return(num(2.0))],
            }]
        );
    }

    #[test]
    fn test_dangling_else_binds_inner() {
        let statements = body("if (a) if (b) return 1; else return 2;");
        match &statements[0] {
            Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert!(else_branch.is_empty());
                assert!(matches!(
                    &then_branch[0],
                    Statement::If { else_branch, .. } if else_branch.len() == 1
                ));
            }
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_for_forms() {
        assert_eq!(
            body("for (v: xs) { } for (k, v: d) break;"),
            vec![
                Statement::SimpleFor {
                    key: "v".into(),
                    value: None,
                    sequence: Expr::Variable("xs".into()),
                    body: vec![],
                },
                Statement::SimpleFor {
                    key: "k".into(),
                    value: Some("v".into()),
                    sequence: Expr::Variable("d".into()),
                    body: vec![Statement::Break],
                },
            ]
        );
    }

    #[test]
    fn test_complex_for() {
        let statements = body("for (i: 0, j: 1; i < 3; i = i + 1, j = j * 2) { continue; }");
        match &statements[0] {
            Statement::ComplexFor {
                decls,
                updates,
                body,
                ..
            } => {
                assert_eq!(decls.len(), 2);
                assert_eq!(decls[1], ("j".to_string(), num(1.0)));
                assert_eq!(updates.len(), 2);
                assert_eq!(body, &vec![Statement::Continue]);
            }
            other => panic!("Expected complex for, got {:?}", other),
        }
    }

    #[test]
    fn test_statement_errors() {
        for source in [
            "f() { return 1 }",
            "f() { x == 1; }",
            "f() { constant; }",
            "f() { for (i: 0; i < 1) { } }",
            "f() { if true { } }",
            "f() { else { } }",
        ] {
            assert!(parse_functions(source, "bad.fn").is_err(), "{}", source);
        }
    }
}
