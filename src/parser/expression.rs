//! Expression AST nodes
//!
//! An `Expression` is a tree structure representing code like `-123 * (45 +
//! x)` as nested nodes. Parentheses only steer the parse, they leave no node
//! behind.

use crate::parser::builder::NodeList;

/// `argument_list` of a function or procedure call.
pub type ArgumentList = NodeList<Expression>;
/// `expression_list` of a `write`/`writeln`.
pub type ExpressionList = NodeList<Expression>;
/// `variable_list` of a `read`/`readln`.
pub type VariableList = NodeList<VariableRef>;

/// Expression AST nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
	Number { value: Number, line: usize },
	String { value: String, line: usize },
	Boolean { value: bool, line: usize },
	Variable(VariableRef),
	FunctionCall { name: String, arguments: ArgumentList, line: usize },
	Unary { operator: UnaryOp, operand: Box<Expression>, line: usize },
	Binary { left: Box<Expression>, operator: BinaryOp, right: Box<Expression>, line: usize },
}

impl Expression {
	pub fn unary(operator: UnaryOp, operand: Self, line: usize) -> Self {
		Self::Unary { operator, operand: Box::new(operand), line }
	}

	pub fn binary(left: Self, operator: BinaryOp, right: Self, line: usize) -> Self {
		Self::Binary { left: Box::new(left), operator, right: Box::new(right), line }
	}

	pub fn line(&self) -> usize {
		match self {
			Self::Number { line, .. }
			| Self::String { line, .. }
			| Self::Boolean { line, .. }
			| Self::FunctionCall { line, .. }
			| Self::Unary { line, .. }
			| Self::Binary { line, .. } => *line,
			Self::Variable(variable) => variable.line(),
		}
	}
}

/// A numeric literal keeps the kind it was written as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
	Integer(i64),
	Real(f64),
}

/// Something that can be read from and written to: a scalar or an array
/// element.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableRef {
	Variable { name: String, line: usize },
	ArrayAccess { name: String, index: Box<Expression>, line: usize },
}

impl VariableRef {
	pub fn line(&self) -> usize {
		match self {
			VariableRef::Variable { line, .. } | VariableRef::ArrayAccess { line, .. } => *line,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
	Neg,
	Not,
}

impl UnaryOp {
	pub fn symbol(&self) -> &'static str {
		match self {
			UnaryOp::Neg => "-",
			UnaryOp::Not => "not",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
	Add,
	Sub,
	Mul,
	/// Real division `/`.
	Divide,
	/// Integer division `div`.
	Div,
	Mod,
	Eq,
	Ne,
	Lt,
	Gt,
	Le,
	Ge,
	And,
	Or,
}

impl BinaryOp {
	#[rustfmt::skip]
	pub fn symbol(&self) -> &'static str {
		use BinaryOp::*;
		match self {
			Add => "+", Sub => "-", Mul => "*", Divide => "/", Div => "div", Mod => "mod",
			Eq => "=", Ne => "<>", Lt => "<", Gt => ">", Le => "<=", Ge => ">=",
			And => "and", Or => "or",
		}
	}
}

impl std::fmt::Display for Expression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Number { value, .. } => write!(f, "{value}"),
			Self::String { value, .. } => write!(f, "'{}'", value.replace('\'', "''")),
			Self::Boolean { value, .. } => write!(f, "{value}"),
			Self::Variable(variable) => write!(f, "{variable}"),
			Self::FunctionCall { name, arguments, .. } => {
				write!(f, "(call {name}")?;
				for argument in arguments {
					write!(f, " {argument}")?;
				}
				write!(f, ")")
			}
			Self::Unary { operator, operand, .. } => write!(f, "({} {operand})", operator.symbol()),
			Self::Binary { left, operator, right, .. } => write!(f, "({} {left} {right})", operator.symbol()),
		}
	}
}

impl std::fmt::Display for Number {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Number::Integer(n) => write!(f, "{n}"),
			Number::Real(n) => write!(f, "{n:?}"),
		}
	}
}

impl std::fmt::Display for VariableRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			VariableRef::Variable { name, .. } => write!(f, "{name}"),
			VariableRef::ArrayAccess { name, index, .. } => write!(f, "(index {name} {index})"),
		}
	}
}
