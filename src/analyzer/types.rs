//! Static typing of expressions against the symbol table.
//!
//! Shared by the analyzer, which reports the errors, and by code generation,
//! which only needs the resulting type of an already validated expression.

use crate::{
	error::semantic::{SemanticError, SemanticErrorType},
	parser::expression::{BinaryOp, Expression, Number, UnaryOp, VariableRef},
	symbols::{Symbol, SymbolKind, SymbolTable, Type},
};

/// Type of `expression` as seen from the table's current scope.
pub fn expression_type(table: &SymbolTable, expression: &Expression) -> Result<Type, SemanticError> {
	match expression {
		Expression::Number { value: Number::Integer(_), .. } => Ok(Type::Integer),
		Expression::Number { value: Number::Real(_), .. } => Ok(Type::Real),
		Expression::String { .. } => Ok(Type::String),
		Expression::Boolean { .. } => Ok(Type::Boolean),
		Expression::Variable(variable) => variable_type(table, variable),
		Expression::FunctionCall { name, arguments, line } => {
			let symbol = lookup(table, name, *line)?;
			if symbol.kind != SymbolKind::Function {
				return Err(SemanticError::new(
					*line,
					SemanticErrorType::WrongKind {
						name:     name.clone(),
						expected: SymbolKind::Function,
						found:    symbol.kind,
					},
				));
			}
			check_arguments(table, symbol, arguments.as_slice(), *line)?;
			Ok(symbol.declared_type)
		}
		Expression::Unary { operator, operand, line } => {
			let operand = expression_type(table, operand)?;
			match operator {
				UnaryOp::Neg if operand.is_numeric() => Ok(operand),
				UnaryOp::Not if operand == Type::Boolean => Ok(Type::Boolean),
				_ => Err(SemanticError::new(
					*line,
					SemanticErrorType::InvalidOperand { operator: operator.symbol(), operand },
				)),
			}
		}
		Expression::Binary { left, operator, right, line } => {
			let left = expression_type(table, left)?;
			let right = expression_type(table, right)?;
			binary_type(*operator, left, right).ok_or_else(|| {
				SemanticError::new(
					*line,
					SemanticErrorType::InvalidOperands { operator: operator.symbol(), left, right },
				)
			})
		}
	}
}

/// Type of a variable or array element read.
pub fn variable_type(table: &SymbolTable, variable: &VariableRef) -> Result<Type, SemanticError> {
	match variable {
		VariableRef::Variable { name, line } => {
			let symbol = lookup(table, name, *line)?;
			match symbol.kind {
				SymbolKind::Variable | SymbolKind::Parameter | SymbolKind::Constant => Ok(symbol.declared_type),
				// A function named without parentheses is a call.
				SymbolKind::Function => {
					check_arguments(table, symbol, &[], *line)?;
					Ok(symbol.declared_type)
				}
				found => Err(SemanticError::new(
					*line,
					SemanticErrorType::WrongKind { name: name.clone(), expected: SymbolKind::Variable, found },
				)),
			}
		}
		VariableRef::ArrayAccess { name, index, line } => {
			let symbol = lookup(table, name, *line)?;
			let Type::Array(element) = symbol.declared_type else {
				return Err(SemanticError::new(*line, SemanticErrorType::NotAnArray(name.clone())));
			};
			let index = expression_type(table, index)?;
			if index != Type::Integer {
				return Err(SemanticError::new(
					*line,
					SemanticErrorType::TypeMismatch { context: "array index", expected: Type::Integer, found: index },
				));
			}
			Ok(element.into())
		}
	}
}

/// Result type of a binary operator, `None` when the operands don't fit it.
pub fn binary_type(operator: BinaryOp, left: Type, right: Type) -> Option<Type> {
	use BinaryOp::*;

	match operator {
		Add | Sub | Mul if left.is_numeric() && right.is_numeric() => {
			Some(if left == Type::Integer && right == Type::Integer { Type::Integer } else { Type::Real })
		}
		Divide if left.is_numeric() && right.is_numeric() => Some(Type::Real),
		Div | Mod if left == Type::Integer && right == Type::Integer => Some(Type::Integer),
		Eq | Ne | Lt | Gt | Le | Ge
			if (left.is_numeric() && right.is_numeric()) || (left == right && left.is_scalar()) =>
		{
			Some(Type::Boolean)
		}
		And | Or if left == Type::Boolean && right == Type::Boolean => Some(Type::Boolean),
		_ => None,
	}
}

/// Arity and argument types of a call against the routine's parameters.
pub fn check_arguments(
	table: &SymbolTable,
	routine: &Symbol,
	arguments: &[Expression],
	line: usize,
) -> Result<(), SemanticError> {
	if arguments.len() != routine.parameters.len() {
		return Err(SemanticError::new(
			line,
			SemanticErrorType::ArgumentCount {
				name:     routine.name.clone(),
				expected: routine.parameters.len(),
				found:    arguments.len(),
			},
		));
	}
	for (parameter, argument) in routine.parameters.iter().zip(arguments) {
		let found = expression_type(table, argument)?;
		if !parameter.declared_type.accepts(&found) {
			return Err(SemanticError::new(
				argument.line(),
				SemanticErrorType::TypeMismatch { context: "argument", expected: parameter.declared_type, found },
			));
		}
	}
	Ok(())
}

fn lookup<'t>(table: &'t SymbolTable, name: &str, line: usize) -> Result<&'t Symbol, SemanticError> {
	table.lookup(name, false).ok_or_else(|| SemanticError::new(line, SemanticErrorType::Undeclared(name.to_string())))
}
