//! Lowers a validated program to a linear instruction stream.
//!
//! One walk does two jobs. Global variables get storage first: slots are
//! handed out in declaration order, an array `[lo..hi]` takes `hi - lo + 1`
//! consecutive slots. Then the main block is lowered statement by statement,
//! structured control flow turning into labels and jumps.
//!
//! The walk is written once. What the instructions look like is up to the
//! [`Emitter`]: [`StackEmitter`] for the stack virtual machine,
//! [`ThreeAddressEmitter`] for temp based three-address code.

mod emitter;
mod stack;
mod three_address;

use std::collections::HashMap;

pub use emitter::{Emitter, OutputKind, Slot};
use log::{debug, trace};
pub use stack::StackEmitter;
pub use three_address::{Operand, ThreeAddressEmitter};

use crate::{
	analyzer::{types, value::ConstValue},
	declaration::{Declaration, Program},
	error::{CompileError, codegen::CodegenError},
	parser::expression::{BinaryOp, Expression, Number, UnaryOp, VariableRef},
	statement::{CompoundStatement, ForDirection, Statement},
	symbols::{SymbolKind, SymbolTable, Type},
};

/// Instruction set to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Target {
	#[default]
	StackMachine,
	ThreeAddress,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodegenOptions {
	pub target:   Target,
	/// Interleave `//` comments describing declarations and statements.
	pub annotate: bool,
}

/// Generate code for `program` with the emitter `options` selects.
pub fn generate(
	symbols: &SymbolTable,
	program: &Program,
	options: CodegenOptions,
) -> Result<Vec<String>, CompileError> {
	match options.target {
		Target::StackMachine => CodeGenerator::new(symbols, StackEmitter::new(), options).generate(program),
		Target::ThreeAddress => CodeGenerator::new(symbols, ThreeAddressEmitter::new(), options).generate(program),
	}
}

/// Global name to slot assignment.
#[derive(Debug, Default)]
struct Storage {
	slots: HashMap<String, Slot>,
	next:  usize,
}

/// Hands out `ELSE0`, `ENDIF1`, ... from one counter.
#[derive(Debug, Default)]
struct LabelAllocator {
	next: usize,
}

impl LabelAllocator {
	fn next(&mut self, prefix: &str) -> String {
		let label = format!("{prefix}{}", self.next);
		self.next += 1;
		trace!("allocated label {label}");
		label
	}
}

/// Lowering state for one compilation unit.
pub struct CodeGenerator<'t, E: Emitter> {
	symbols: &'t SymbolTable,
	emitter: E,
	storage: Storage,
	labels:  LabelAllocator,
	options: CodegenOptions,
}

impl<'t, E: Emitter> CodeGenerator<'t, E> {
	pub fn new(symbols: &'t SymbolTable, emitter: E, options: CodegenOptions) -> Self {
		Self { symbols, emitter, storage: Storage::default(), labels: LabelAllocator::default(), options }
	}

	/// `start`, storage initialisation, the main block, `stop`.
	pub fn generate(mut self, program: &Program) -> Result<Vec<String>, CompileError> {
		self.emitter.start(&program.name);
		self.allocate(program)?;
		self.compound(&program.body)?;
		self.emitter.stop();

		let code = self.emitter.finish();
		debug!("generated {} line(s) using {} storage slot(s)", code.len(), self.storage.next);
		Ok(code)
	}

	fn annotate(&mut self, text: impl FnOnce() -> String) {
		if self.options.annotate {
			self.emitter.comment(&text());
		}
	}

	/// Give every global variable its slots, in declaration order.
	fn allocate(&mut self, program: &Program) -> Result<(), CodegenError> {
		for declaration in &program.declarations {
			let Declaration::Var(items) = declaration else {
				continue;
			};
			for item in items {
				for name in &item.names {
					self.allocate_variable(name, item.line)?;
				}
			}
		}
		Ok(())
	}

	fn allocate_variable(&mut self, name: &str, line: usize) -> Result<(), CodegenError> {
		let symbols = self.symbols;
		let symbol = symbols
			.lookup(name, true)
			.ok_or_else(|| CodegenError::UnresolvedSymbol { name: name.to_string(), line })?;
		if self.storage.slots.contains_key(name) {
			return Err(CodegenError::DuplicateStorage { name: name.to_string(), line });
		}

		let slot = Slot { name: name.to_string(), index: self.storage.next, bounds: symbol.array_bounds };
		let len = match symbol.declared_type {
			Type::Array(element) => {
				let bounds = symbol
					.array_bounds
					.ok_or_else(|| CodegenError::UnresolvedSymbol { name: name.to_string(), line })?;
				let len = bounds.storage_len().ok_or_else(|| CodegenError::Unsupported {
					construct: format!("array '{name}' with bounds [{}..{}]", bounds.low, bounds.high),
					line,
				})?;
				let (low, high, index) = (bounds.low, bounds.high, slot.index);
				self.annotate(|| format!("var {name}: array[{low}..{high}] of {element} -> {index}"));
				self.emitter.allocate_array(&slot, len);
				len
			}
			ty => {
				let simple = ty
					.simple()
					.ok_or_else(|| CodegenError::Unsupported { construct: format!("variable of type {ty}"), line })?;
				self.annotate(|| format!("var {name}: {simple} -> {}", slot.index));
				self.emitter.allocate_scalar(&slot, simple);
				1
			}
		};
		trace!("allocated {name} at slot {} ({len} slot(s))", slot.index);
		self.storage.next += len;
		self.storage.slots.insert(name.to_string(), slot);
		Ok(())
	}

	fn slot(&self, name: &str, line: usize) -> Result<Slot, CodegenError> {
		self.storage
			.slots
			.get(name)
			.cloned()
			.ok_or_else(|| CodegenError::UnresolvedSymbol { name: name.to_string(), line })
	}

	fn compound(&mut self, body: &CompoundStatement) -> Result<(), CodegenError> {
		for statement in body {
			self.statement(statement)?;
		}
		Ok(())
	}

	fn statement(&mut self, statement: &Statement) -> Result<(), CodegenError> {
		match statement {
			Statement::Assignment { target, value, .. } => {
				self.annotate(|| format!("{target} := {value}"));
				let value = self.expression(value)?;
				self.store(target, value)
			}
			Statement::Compound(body) => self.compound(body),
			Statement::If { condition, then_branch, else_branch, .. } => {
				self.annotate(|| format!("if {condition}"));
				let else_label = self.labels.next("ELSE");
				let end_label = self.labels.next("ENDIF");
				let condition = self.expression(condition)?;
				self.emitter.jump_if_false(condition, &else_label);
				self.statement(then_branch)?;
				self.emitter.jump(&end_label);
				self.emitter.label(&else_label);
				if let Some(else_branch) = else_branch {
					self.statement(else_branch)?;
				}
				self.emitter.label(&end_label);
				Ok(())
			}
			Statement::While { condition, body, .. } => {
				self.annotate(|| format!("while {condition}"));
				let loop_label = self.labels.next("WHILE");
				let end_label = self.labels.next("ENDWHILE");
				self.emitter.label(&loop_label);
				let condition = self.expression(condition)?;
				self.emitter.jump_if_false(condition, &end_label);
				self.statement(body)?;
				self.emitter.jump(&loop_label);
				self.emitter.label(&end_label);
				Ok(())
			}
			Statement::For { variable, direction, start, end, body, line } => {
				self.annotate(|| format!("for {variable} := {start} {direction} {end}"));
				let loop_label = self.labels.next("FOR");
				let end_label = self.labels.next("ENDFOR");
				let slot = self.slot(variable, *line)?;
				let (past_bound, step) = match direction {
					ForDirection::To => (BinaryOp::Gt, BinaryOp::Add),
					ForDirection::Downto => (BinaryOp::Lt, BinaryOp::Sub),
				};

				let start = self.expression(start)?;
				self.emitter.store(&slot, start);
				self.emitter.label(&loop_label);
				// The bound is evaluated again before every iteration.
				let current = self.emitter.load(&slot);
				let bound = self.expression(end)?;
				let past = self.emitter.binary(past_bound, current, bound);
				let condition = self.emitter.unary(UnaryOp::Not, past);
				self.emitter.jump_if_false(condition, &end_label);
				self.statement(body)?;
				let current = self.emitter.load(&slot);
				let one = self.emitter.constant(&ConstValue::Integer(1));
				let next = self.emitter.binary(step, current, one);
				self.emitter.store(&slot, next);
				self.emitter.jump(&loop_label);
				self.emitter.label(&end_label);
				Ok(())
			}
			Statement::Read { targets, .. } => {
				// A bare `readln` only skips the rest of the line.
				for target in targets.iter().flatten() {
					self.annotate(|| format!("read {target}"));
					let value = self.emitter.read();
					self.store(target, value)?;
				}
				Ok(())
			}
			Statement::Write { newline, arguments, .. } => {
				for argument in arguments.iter().flatten() {
					self.annotate(|| format!("write {argument}"));
					let kind = match types::expression_type(self.symbols, argument)? {
						Type::String => OutputKind::Text,
						Type::Real => OutputKind::Real,
						_ => OutputKind::Integer,
					};
					let value = self.expression(argument)?;
					self.emitter.write(value, kind);
				}
				if *newline {
					self.emitter.newline();
				}
				Ok(())
			}
			Statement::ProcedureCall { name, line, .. } => {
				Err(CodegenError::Unsupported { construct: format!("call to procedure '{name}'"), line: *line })
			}
			Statement::Empty { .. } => Ok(()),
		}
	}

	/// Store an already produced value into a variable or array element.
	fn store(&mut self, target: &VariableRef, value: E::Operand) -> Result<(), CodegenError> {
		match target {
			VariableRef::Variable { name, line } => {
				let slot = self.slot(name, *line)?;
				self.emitter.store(&slot, value);
			}
			VariableRef::ArrayAccess { name, index, line } => {
				let slot = self.slot(name, *line)?;
				let index = self.expression(index)?;
				self.emitter.store_element(&slot, index, value);
			}
		}
		Ok(())
	}

	/// Post-order: operands first, then the operator.
	fn expression(&mut self, expression: &Expression) -> Result<E::Operand, CodegenError> {
		match expression {
			Expression::Number { value: Number::Integer(n), .. } => Ok(self.emitter.constant(&ConstValue::Integer(*n))),
			Expression::Number { value: Number::Real(n), .. } => Ok(self.emitter.constant(&ConstValue::Real(*n))),
			Expression::String { value, .. } => Ok(self.emitter.constant(&ConstValue::String(value.clone()))),
			Expression::Boolean { value, .. } => Ok(self.emitter.constant(&ConstValue::Boolean(*value))),
			Expression::Variable(VariableRef::Variable { name, line }) => self.load(name, *line),
			Expression::Variable(VariableRef::ArrayAccess { name, index, line }) => {
				let slot = self.slot(name, *line)?;
				let index = self.expression(index)?;
				Ok(self.emitter.load_element(&slot, index))
			}
			Expression::FunctionCall { name, line, .. } => {
				Err(CodegenError::Unsupported { construct: format!("call to function '{name}'"), line: *line })
			}
			Expression::Unary { operator, operand, .. } => {
				let operand = self.expression(operand)?;
				Ok(self.emitter.unary(*operator, operand))
			}
			Expression::Binary { left, operator, right, .. } => {
				let left = self.expression(left)?;
				let right = self.expression(right)?;
				Ok(self.emitter.binary(*operator, left, right))
			}
		}
	}

	/// A variable read from its slot, or a constant inlined as its value.
	fn load(&mut self, name: &str, line: usize) -> Result<E::Operand, CodegenError> {
		if let Some(slot) = self.storage.slots.get(name) {
			return Ok(self.emitter.load(slot));
		}
		match self.symbols.lookup(name, false) {
			Some(symbol) if symbol.kind == SymbolKind::Constant => match &symbol.constant_value {
				Some(value) => Ok(self.emitter.constant(value)),
				None => Err(CodegenError::UnresolvedSymbol { name: name.to_string(), line }),
			},
			Some(symbol) if symbol.kind == SymbolKind::Function => {
				Err(CodegenError::Unsupported { construct: format!("call to function '{name}'"), line })
			}
			_ => Err(CodegenError::UnresolvedSymbol { name: name.to_string(), line }),
		}
	}
}
