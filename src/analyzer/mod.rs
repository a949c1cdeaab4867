//! Semantic analysis: fills the symbol table from the declarations and checks
//! every statement against it.
//!
//! Errors don't stop the walk. Each one is recorded with its line and the
//! analysis moves on to the next statement, so a single run reports every
//! problem in the program. Only a program with no errors hands its table on
//! to code generation.

pub mod types;
pub mod value;

use log::debug;

use crate::{
	declaration::{Declaration, Declarations, ParameterList, Program, TypeSpec},
	error::{
		CompileError,
		semantic::{SemanticError, SemanticErrorType},
	},
	parser::expression::{Expression, VariableRef},
	statement::{CompoundStatement, Statement},
	symbols::{ArrayBounds, SymbolKind, SymbolTable, Type},
};

#[derive(Default)]
pub struct Analyzer {
	table:     SymbolTable,
	errors:    Vec<SemanticError>,
	/// Functions whose bodies enclose the current statement, innermost last.
	functions: Vec<String>,
}

impl Analyzer {
	pub fn new() -> Self { Self::default() }

	/// Validate `program` and return its symbol table, scoped back to `global`.
	pub fn analyze(mut self, program: &Program) -> Result<SymbolTable, CompileError> {
		self.declarations(&program.declarations);
		self.compound(&program.body);
		debug!("analyzed '{}': {} symbol(s), {} error(s)", program.name, self.table.len(), self.errors.len());

		if self.errors.is_empty() { Ok(self.table) } else { Err(CompileError::SemanticErrors(self.errors)) }
	}

	fn error(&mut self, line: usize, r#type: SemanticErrorType) { self.errors.push(SemanticError::new(line, r#type)) }

	/// Keep the value or record the error.
	fn check<T>(&mut self, result: Result<T, SemanticError>) -> Option<T> {
		result.map_err(|e| self.errors.push(e)).ok()
	}

	fn declarations(&mut self, declarations: &Declarations) {
		for declaration in declarations {
			match declaration {
				Declaration::Var(items) => {
					for item in items {
						for name in &item.names {
							self.declare(name, &item.type_spec, SymbolKind::Variable, item.line);
						}
					}
				}
				Declaration::Const(items) => {
					for item in items {
						self.constant(&item.name, &item.value, item.line);
					}
				}
				Declaration::Type(items) => {
					for item in items {
						self.declare(&item.name, &item.type_spec, SymbolKind::Type, item.line);
					}
				}
				Declaration::Function(function) => {
					self.functions.push(function.name.clone());
					self.routine(
						&function.name,
						function.return_type.into(),
						SymbolKind::Function,
						&function.parameters,
						&function.declarations,
						&function.body,
						function.line,
					);
					self.functions.pop();
				}
				Declaration::Procedure(procedure) => self.routine(
					&procedure.name,
					Type::Void,
					SymbolKind::Procedure,
					&procedure.parameters,
					&procedure.declarations,
					&procedure.body,
					procedure.line,
				),
			}
		}
	}

	/// Declare a variable or type name, attaching array bounds.
	fn declare(&mut self, name: &str, type_spec: &TypeSpec, kind: SymbolKind, line: usize) {
		let ty = match type_spec {
			TypeSpec::Simple { ty, .. } => Type::from(*ty),
			TypeSpec::Array(array) => Type::Array(array.element),
		};
		if !self.table.add_symbol(name, ty, kind, line, None) {
			self.error(line, SemanticErrorType::Redeclaration(name.to_string()));
			return;
		}
		if let TypeSpec::Array(array) = type_spec {
			let bounds = ArrayBounds { low: array.low, high: array.high };
			if array.low > array.high {
				self.error(array.line, SemanticErrorType::InvalidArrayBounds {
					name: name.to_string(),
					low:  array.low,
					high: array.high,
				});
			} else if bounds.storage_len().is_none() {
				self.error(array.line, SemanticErrorType::ArrayTooLarge {
					name: name.to_string(),
					low:  array.low,
					high: array.high,
					max:  ArrayBounds::MAX_LEN,
				});
			}
			self.table.add_array_dimensions(name, bounds);
		}
	}

	fn constant(&mut self, name: &str, value: &Expression, line: usize) {
		let (ty, folded) = match value::fold(&self.table, value) {
			Some(folded) => (folded.value_type(), Some(folded)),
			None => {
				// Report why it is not constant, or just that it isn't.
				let Some(ty) = self.check(types::expression_type(&self.table, value)) else {
					return;
				};
				self.error(line, SemanticErrorType::NotConstant(name.to_string()));
				(ty, None)
			}
		};
		if !self.table.add_symbol(name, ty, SymbolKind::Constant, line, folded) {
			self.error(line, SemanticErrorType::Redeclaration(name.to_string()));
		}
	}

	#[allow(clippy::too_many_arguments)]
	fn routine(
		&mut self,
		name: &str,
		ty: Type,
		kind: SymbolKind,
		parameters: &ParameterList,
		declarations: &Declarations,
		body: &CompoundStatement,
		line: usize,
	) {
		if self.table.add_symbol(name, ty, kind, line, None) {
			for parameter in parameters {
				for parameter_name in &parameter.names {
					self.table.add_parameter(name, parameter_name, parameter.ty.into());
				}
			}
		} else {
			self.error(line, SemanticErrorType::Redeclaration(name.to_string()));
		}

		self.table.enter_scope(name);
		for parameter in parameters {
			for parameter_name in &parameter.names {
				if !self.table.add_symbol(parameter_name, parameter.ty.into(), SymbolKind::Parameter, parameter.line, None)
				{
					self.error(parameter.line, SemanticErrorType::Redeclaration(parameter_name.clone()));
				}
			}
		}
		self.declarations(declarations);
		self.compound(body);
		self.table.exit_scope();
	}

	fn compound(&mut self, body: &CompoundStatement) {
		for statement in body {
			self.statement(statement);
		}
	}

	fn statement(&mut self, statement: &Statement) {
		match statement {
			Statement::Assignment { target, value, line } => {
				let Some(expected) = self.assignment_target(target) else {
					return;
				};
				let Some(found) = self.check(types::expression_type(&self.table, value)) else {
					return;
				};
				if !expected.is_scalar() {
					self.error(*line, SemanticErrorType::NotScalar { context: "assignment", found: expected });
				} else if !expected.accepts(&found) {
					self.error(*line, SemanticErrorType::TypeMismatch { context: "assignment", expected, found });
				}
			}
			Statement::Compound(body) => self.compound(body),
			Statement::If { condition, then_branch, else_branch, .. } => {
				self.condition("if condition", condition);
				self.statement(then_branch);
				if let Some(else_branch) = else_branch {
					self.statement(else_branch);
				}
			}
			Statement::While { condition, body, .. } => {
				self.condition("while condition", condition);
				self.statement(body);
			}
			Statement::For { variable, start, end, body, line, .. } => {
				self.control_variable(variable, *line);
				for bound in [start, end] {
					if let Some(found) = self.check(types::expression_type(&self.table, bound))
						&& found != Type::Integer
					{
						self.error(bound.line(), SemanticErrorType::TypeMismatch {
							context: "for bound",
							expected: Type::Integer,
							found,
						});
					}
				}
				self.statement(body);
			}
			Statement::Read { targets, line, .. } => {
				for target in targets.iter().flatten() {
					if let Some(found) = self.assignment_target(target)
						&& !found.is_scalar()
					{
						self.error(*line, SemanticErrorType::NotScalar { context: "read", found });
					}
				}
			}
			Statement::Write { arguments, line, .. } => {
				for argument in arguments.iter().flatten() {
					if let Some(found) = self.check(types::expression_type(&self.table, argument))
						&& !found.is_scalar()
					{
						self.error(*line, SemanticErrorType::NotScalar { context: "write", found });
					}
				}
			}
			Statement::ProcedureCall { name, arguments, line } => {
				let Some(symbol) = self.table.lookup(name, false) else {
					self.error(*line, SemanticErrorType::Undeclared(name.clone()));
					return;
				};
				if symbol.kind != SymbolKind::Procedure {
					let found = symbol.kind;
					self.error(*line, SemanticErrorType::WrongKind {
						name: name.clone(),
						expected: SymbolKind::Procedure,
						found,
					});
					return;
				}
				let arguments = arguments.as_ref().map_or(&[][..], |a| a.as_slice());
				let result = types::check_arguments(&self.table, symbol, arguments, *line);
				self.check(result);
			}
			Statement::Empty { .. } => {}
		}
	}

	fn condition(&mut self, context: &'static str, condition: &Expression) {
		if let Some(found) = self.check(types::expression_type(&self.table, condition))
			&& found != Type::Boolean
		{
			self.error(condition.line(), SemanticErrorType::TypeMismatch { context, expected: Type::Boolean, found });
		}
	}

	/// Type stored by a write to `target`, if it may be written at all.
	fn assignment_target(&mut self, target: &VariableRef) -> Option<Type> {
		let VariableRef::Variable { name, line } = target else {
			return self.check(types::variable_type(&self.table, target));
		};
		let Some(symbol) = self.table.lookup(name, false) else {
			self.error(*line, SemanticErrorType::Undeclared(name.clone()));
			return None;
		};
		match symbol.kind {
			SymbolKind::Variable | SymbolKind::Parameter => Some(symbol.declared_type),
			// Assigning to the enclosing function's name sets its result.
			SymbolKind::Function if self.functions.contains(name) => Some(symbol.declared_type),
			kind => {
				self.error(*line, SemanticErrorType::NotAssignable { name: name.clone(), kind });
				None
			}
		}
	}

	fn control_variable(&mut self, name: &str, line: usize) {
		let Some(symbol) = self.table.lookup(name, false) else {
			self.error(line, SemanticErrorType::Undeclared(name.to_string()));
			return;
		};
		let (kind, found) = (symbol.kind, symbol.declared_type);
		if !matches!(kind, SymbolKind::Variable | SymbolKind::Parameter) {
			self.error(line, SemanticErrorType::NotAssignable { name: name.to_string(), kind });
		} else if found != Type::Integer {
			self.error(line, SemanticErrorType::TypeMismatch {
				context: "for control variable",
				expected: Type::Integer,
				found,
			});
		}
	}
}
