//! Adam function parser
//!
//! This module transforms Adam function source text into an AST:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser infrastructure and public entry points
//! - [`ast`]: AST node definitions
//!
//! # Adam Functions
//!
//! A function file holds any number of definitions of the form
//! `name(p1, p2) { statements }`. Statements are declarations, assignments,
//! `return`, `continue`, `break`, `if`/`else` and two forms of `for`.
//! Expressions are the Adam expression language: literals, `@names`,
//! arrays, dictionaries, calls, indexing and the usual operators.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one method per precedence level.
//! No external parser generator dependencies.

pub mod ast;
mod expressions;
mod functions;
pub mod lexer;
pub mod parse;
mod statements;

pub use ast::{AdamFunction, AdamFunctions};
pub use parse::{parse_expression, parse_functions, ParseError, MAX_NESTING_DEPTH};
