// AST (Abstract Syntax Tree) definitions for Adam functions

use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Binary operators, in the order of the precedence levels they belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Logical
    Or,
    And,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    /// Source spelling of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -x
    Not, // !x
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        }
    }
}

/// Arguments of a function call: `f(a, b)` or `f(x: a, y: b)`
#[derive(Debug, Clone, PartialEq)]
pub enum CallArgs {
    Positional(Vec<Expr>),
    Named(Vec<(String, Expr)>),
}

/// Adam expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Empty,
    Bool(bool),
    Number(f64),
    String(String),
    /// `@name`
    Name(String),
    Variable(String),
    Call {
        name: String,
        args: CallArgs,
    },
    Array(Vec<Expr>),
    Dictionary(Vec<(String, Expr)>),
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    /// `a[i]`, and `a.b` which is sugar for `a[@b]`
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
}

impl Expr {
    /// Calls `f` with every variable name this expression reads
    pub(crate) fn visit_variables<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Expr::Empty | Expr::Bool(_) | Expr::Number(_) | Expr::String(_) | Expr::Name(_) => {}
            Expr::Variable(name) => f(name.as_str()),
            Expr::Call { args, .. } => match args {
                CallArgs::Positional(args) => args.iter().for_each(|a| a.visit_variables(f)),
                CallArgs::Named(args) => args.iter().for_each(|(_, a)| a.visit_variables(f)),
            },
            Expr::Array(items) => items.iter().for_each(|e| e.visit_variables(f)),
            Expr::Dictionary(entries) => entries.iter().for_each(|(_, e)| e.visit_variables(f)),
            Expr::Unary { operand, .. } => operand.visit_variables(f),
            Expr::Binary { left, right, .. } => {
                left.visit_variables(f);
                right.visit_variables(f);
            }
            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                condition.visit_variables(f);
                then_expr.visit_variables(f);
                else_expr.visit_variables(f);
            }
            Expr::Index { target, index } => {
                target.visit_variables(f);
                index.visit_variables(f);
            }
        }
    }
}

/// Statements allowed in a function body
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `constant name: init;`
    ConstDecl { name: String, init: Option<Expr> },
    /// `name: init;`
    Decl { name: String, init: Option<Expr> },
    /// `name = value;`
    Assign { name: String, value: Expr },
    Return(Expr),
    Continue,
    Break,
    If {
        condition: Expr,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
    /// `for (key, value : sequence) body`
    SimpleFor {
        key: String,
        value: Option<String>,
        sequence: Expr,
        body: Vec<Statement>,
    },
    /// `for (i: 0, j: 1; condition; i = i + 1, j = j * 2) body`
    ComplexFor {
        decls: Vec<(String, Expr)>,
        condition: Expr,
        updates: Vec<(String, Expr)>,
        body: Vec<Statement>,
    },
}

impl Statement {
    /// Whether this statement owns nested statements
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Statement::If { .. } | Statement::SimpleFor { .. } | Statement::ComplexFor { .. }
        )
    }
}

/// A user-defined Adam function
#[derive(Debug, Clone, PartialEq)]
pub struct AdamFunction {
    pub name: String,
    pub parameters: Vec<String>,
    pub statements: Vec<Statement>,
}

impl AdamFunction {
    pub fn new(name: String, parameters: Vec<String>, statements: Vec<Statement>) -> Self {
        AdamFunction {
            name,
            parameters,
            statements,
        }
    }

    /// Variables read by the body that are not parameters or locals.
    ///
    /// These resolve against the property sheet the function is evaluated in.
    /// A variable read before its local declaration still counts as local;
    /// scoping is per function, not per block.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut bound: BTreeSet<&str> = self.parameters.iter().map(String::as_str).collect();
        let mut read: Vec<&str> = Vec::new();
        collect_bindings(&self.statements, &mut bound, &mut read);
        read.into_iter()
            .filter(|name| !bound.contains(name))
            .map(str::to_string)
            .collect()
    }
}

fn collect_bindings<'a>(
    statements: &'a [Statement],
    bound: &mut BTreeSet<&'a str>,
    read: &mut Vec<&'a str>,
) {
    for statement in statements {
        match statement {
            Statement::ConstDecl { name, init } | Statement::Decl { name, init } => {
                bound.insert(name.as_str());
                if let Some(init) = init {
                    collect_reads(init, read);
                }
            }
            Statement::Assign { name, value } => {
                read.push(name.as_str());
                collect_reads(value, read);
            }
            Statement::Return(expr) => collect_reads(expr, read),
            Statement::Continue | Statement::Break => {}
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                collect_reads(condition, read);
                collect_bindings(then_branch, bound, read);
                collect_bindings(else_branch, bound, read);
            }
            Statement::SimpleFor {
                key,
                value,
                sequence,
                body,
            } => {
                bound.insert(key.as_str());
                if let Some(value) = value {
                    bound.insert(value.as_str());
                }
                collect_reads(sequence, read);
                collect_bindings(body, bound, read);
            }
            Statement::ComplexFor {
                decls,
                condition,
                updates,
                body,
            } => {
                for (name, init) in decls {
                    bound.insert(name.as_str());
                    collect_reads(init, read);
                }
                collect_reads(condition, read);
                for (name, value) in updates {
                    read.push(name.as_str());
                    collect_reads(value, read);
                }
                collect_bindings(body, bound, read);
            }
        }
    }
}

fn collect_reads<'a>(expr: &'a Expr, read: &mut Vec<&'a str>) {
    expr.visit_variables(&mut |name| read.push(name));
}

/// Parsed functions keyed by name
pub type AdamFunctions = FxHashMap<String, AdamFunction>;
