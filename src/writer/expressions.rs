//! Expression writing
//!
//! Parentheses are emitted only where the parser would otherwise group
//! differently: an operand is wrapped when its precedence is lower than the
//! position requires. Binary operators are left-associative, so the right
//! operand needs strictly higher precedence than its parent.

use crate::parser::ast::*;
use crate::parser::lexer::is_keyword;

// Precedence levels, loosest first
const TERNARY: u8 = 1;
const UNARY: u8 = 8;
const POSTFIX: u8 = 9;
const PRIMARY: u8 = 10;

fn binary_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Or => 2,
        BinOp::And => 3,
        BinOp::Eq | BinOp::Ne => 4,
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 5,
        BinOp::Add | BinOp::Sub => 6,
        BinOp::Mul | BinOp::Div | BinOp::Mod => 7,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Ternary { .. } => TERNARY,
        Expr::Binary { op, .. } => binary_precedence(*op),
        Expr::Unary { .. } => UNARY,
        Expr::Index { .. } => POSTFIX,
        _ => PRIMARY,
    }
}

/// Write an expression as Adam source text
pub fn write_expression(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(expr, TERNARY, &mut out);
    out
}

pub(crate) fn write_expr(expr: &Expr, min_precedence: u8, out: &mut String) {
    if precedence(expr) < min_precedence {
        out.push('(');
        write_expr(expr, TERNARY, out);
        out.push(')');
        return;
    }

    match expr {
        Expr::Empty => out.push_str("empty"),
        Expr::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Expr::Number(n) => out.push_str(&n.to_string()),
        Expr::String(s) => write_string(s, out),
        Expr::Name(name) => {
            out.push('@');
            out.push_str(name);
        }
        Expr::Variable(name) => out.push_str(name),
        Expr::Call { name, args } => {
            out.push_str(name);
            out.push('(');
            match args {
                CallArgs::Positional(args) => write_list(args, out),
                CallArgs::Named(args) => write_named_list(args, out),
            }
            out.push(')');
        }
        Expr::Array(items) => {
            out.push('[');
            write_list(items, out);
            out.push(']');
        }
        Expr::Dictionary(entries) => {
            out.push('{');
            write_named_list(entries, out);
            out.push('}');
        }
        Expr::Unary { op, operand } => {
            out.push_str(op.symbol());
            write_expr(operand, UNARY, out);
        }
        Expr::Binary { op, left, right } => {
            let p = binary_precedence(*op);
            write_expr(left, p, out);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_expr(right, p + 1, out);
        }
        Expr::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            write_expr(condition, TERNARY + 1, out);
            out.push_str(" ? ");
            write_expr(then_expr, TERNARY, out);
            out.push_str(" : ");
            write_expr(else_expr, TERNARY, out);
        }
        Expr::Index { target, index } => {
            write_expr(target, POSTFIX, out);
            match index.as_ref() {
                Expr::Name(member) if is_member_name(member) => {
                    out.push('.');
                    out.push_str(member);
                }
                index => {
                    out.push('[');
                    write_expr(index, TERNARY, out);
                    out.push(']');
                }
            }
        }
    }
}

fn write_list(items: &[Expr], out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(item, TERNARY, out);
    }
}

fn write_named_list(entries: &[(String, Expr)], out: &mut String) {
    for (i, (name, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push_str(": ");
        write_expr(value, TERNARY, out);
    }
}

/// Names usable after `.`: plain identifiers that are not reserved
fn is_member_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_well && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_keyword(name)
}

/// Strings have no escapes, so the quote is chosen from the contents.
/// A string holding both quote characters becomes several adjacent
/// literals, which the parser joins back together.
fn write_string(s: &str, out: &mut String) {
    if !s.contains('\'') {
        out.push('\'');
        out.push_str(s);
        out.push('\'');
        return;
    }
    if !s.contains('"') {
        out.push('"');
        out.push_str(s);
        out.push('"');
        return;
    }

    let mut quote = '\'';
    out.push(quote);
    for c in s.chars() {
        if c == quote {
            quote = if quote == '\'' { '"' } else { '\'' };
            out.push(c);
            out.push(' ');
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
}
