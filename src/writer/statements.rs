//! Statement writing
//!
//! Each statement starts with its indentation and ends without a newline.
//! Compound statements span several lines, their bodies one level deeper.

use super::expressions::write_expr;
use super::INDENT;
use crate::parser::ast::*;

// Full-expression position
const ANY: u8 = 1;

/// Write one statement at `indent` levels of indentation
pub fn write_statement(statement: &Statement, indent: usize) -> String {
    let mut out = String::new();
    push_indent(indent, &mut out);
    write_stmt(statement, indent, &mut out);
    out
}

fn push_indent(indent: usize, out: &mut String) {
    for _ in 0..indent {
        out.push_str(INDENT);
    }
}

/// Writes `statement` assuming its indentation is already in `out`
fn write_stmt(statement: &Statement, indent: usize, out: &mut String) {
    match statement {
        Statement::ConstDecl { name, init } => {
            out.push_str("constant ");
            write_decl(name, init.as_ref(), out);
        }
        Statement::Decl { name, init } => write_decl(name, init.as_ref(), out),
        Statement::Assign { name, value } => {
            out.push_str(name);
            out.push_str(" = ");
            write_expr(value, ANY, out);
            out.push(';');
        }
        Statement::Return(value) => {
            out.push_str("return ");
            write_expr(value, ANY, out);
            out.push(';');
        }
        Statement::Continue => out.push_str("continue;"),
        Statement::Break => out.push_str("break;"),
        Statement::If {
            condition,
            then_branch,
            else_branch,
        } => write_if(condition, then_branch, else_branch, indent, out),
        Statement::SimpleFor {
            key,
            value,
            sequence,
            body,
        } => {
            out.push_str("for (");
            out.push_str(key);
            if let Some(value) = value {
                out.push_str(", ");
                out.push_str(value);
            }
            out.push_str(": ");
            write_expr(sequence, ANY, out);
            out.push(')');
            write_block(body, indent, out);
        }
        Statement::ComplexFor {
            decls,
            condition,
            updates,
            body,
        } => {
            out.push_str("for (");
            write_bindings(decls, ": ", out);
            out.push_str("; ");
            write_expr(condition, ANY, out);
            out.push_str("; ");
            write_bindings(updates, " = ", out);
            out.push(')');
            write_block(body, indent, out);
        }
    }
}

fn write_decl(name: &str, init: Option<&Expr>, out: &mut String) {
    out.push_str(name);
    if let Some(init) = init {
        out.push_str(": ");
        write_expr(init, ANY, out);
    }
    out.push(';');
}

fn write_bindings(bindings: &[(String, Expr)], separator: &str, out: &mut String) {
    for (i, (name, value)) in bindings.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push_str(separator);
        write_expr(value, ANY, out);
    }
}

/// A branch can go without braces when it is exactly one simple statement.
/// A nested `if` in the then-branch is braced so a following `else` keeps
/// its owner.
fn needs_braces(branch: &[Statement]) -> bool {
    branch.len() != 1 || branch[0].is_compound()
}

fn write_if(
    condition: &Expr,
    then_branch: &[Statement],
    else_branch: &[Statement],
    indent: usize,
    out: &mut String,
) {
    out.push_str("if (");
    write_expr(condition, ANY, out);
    out.push(')');

    let then_braced = needs_braces(then_branch);
    write_branch(then_branch, then_braced, indent, out);

    if else_branch.is_empty() {
        return;
    }

    if then_braced {
        out.push_str(" else");
    } else {
        out.push('\n');
        push_indent(indent, out);
        out.push_str("else");
    }

    match else_branch {
        [Statement::If {
            condition,
            then_branch,
            else_branch,
        }] => {
            out.push(' ');
            write_if(condition, then_branch, else_branch, indent, out);
        }
        branch => write_branch(branch, needs_braces(branch), indent, out),
    }
}

fn write_branch(branch: &[Statement], braced: bool, indent: usize, out: &mut String) {
    if braced {
        write_block(branch, indent, out);
    } else {
        for statement in branch {
            out.push('\n');
            push_indent(indent + 1, out);
            write_stmt(statement, indent + 1, out);
        }
    }
}

/// ` {`, the body one level deeper, then `}` back at `indent`
fn write_block(body: &[Statement], indent: usize, out: &mut String) {
    out.push_str(" {\n");
    for statement in body {
        push_indent(indent + 1, out);
        write_stmt(statement, indent + 1, out);
        out.push('\n');
    }
    push_indent(indent, out);
    out.push('}');
}
