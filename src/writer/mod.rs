//! Adam function writer
//!
//! Serializes parsed functions back to source text. The output is a left
//! inverse of the parser: parsing written text yields a structurally equal
//! AST. Formatting is normalized (four-space indentation, minimal
//! parentheses) rather than preserved.
//!
//! - [`expressions`]: operator precedence and literal spelling
//! - [`statements`]: statements and nested blocks

mod expressions;
mod statements;

pub use expressions::write_expression;
pub use statements::write_statement;

use crate::parser::ast::AdamFunction;

/// One level of indentation
pub const INDENT: &str = "    ";

/// Write a function definition: `name (p1, p2) {`, one statement per line
/// at indent level 1, then `}`.
pub fn write_function(function: &AdamFunction) -> String {
    let mut out = format!(
        "{} ({}) {{\n",
        function.name,
        function.parameters.join(", ")
    );

    for statement in &function.statements {
        out.push_str(&write_statement(statement, 1));
        out.push('\n');
    }

    out.push('}');
    out
}
