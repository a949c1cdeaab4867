use crate::symbols::{SymbolKind, Type};

/// A semantic error with the line it was found on.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("line {line}: {type}")]
pub struct SemanticError {
	line:   usize,
	r#type: SemanticErrorType,
}

impl SemanticError {
	pub fn new(line: usize, r#type: SemanticErrorType) -> Self { Self { line, r#type } }

	pub fn line(&self) -> usize { self.line }

	pub fn error_type(&self) -> &SemanticErrorType { &self.r#type }
}

/// Errors the analyzer reports before any code is generated
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SemanticErrorType {
	#[error("'{0}' is already declared in this scope")]
	Redeclaration(String),
	#[error("'{0}' is not declared")]
	Undeclared(String),
	#[error("Type mismatch in {context}: expected {expected}, found {found}")]
	TypeMismatch { context: &'static str, expected: Type, found: Type },
	#[error("Operator '{operator}' cannot be applied to {operand}")]
	InvalidOperand { operator: &'static str, operand: Type },
	#[error("Operator '{operator}' cannot be applied to {left} and {right}")]
	InvalidOperands { operator: &'static str, left: Type, right: Type },
	#[error("Cannot assign to {kind} '{name}'")]
	NotAssignable { name: String, kind: SymbolKind },
	#[error("'{name}' is a {found}, not a {expected}")]
	WrongKind { name: String, expected: SymbolKind, found: SymbolKind },
	#[error("'{0}' is not an array")]
	NotAnArray(String),
	#[error("'{name}' expects {expected} argument(s), found {found}")]
	ArgumentCount { name: String, expected: usize, found: usize },
	#[error("Array '{name}' has invalid bounds [{low}..{high}]")]
	InvalidArrayBounds { name: String, low: i64, high: i64 },
	#[error("Constant '{0}' must be initialised with a constant expression")]
	NotConstant(String),
	#[error("Array '{name}' [{low}..{high}] exceeds the limit of {max} elements")]
	ArrayTooLarge { name: String, low: i64, high: i64, max: usize },
	#[error("{context} requires a scalar value, found {found}")]
	NotScalar { context: &'static str, found: Type },
}
