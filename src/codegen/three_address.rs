//! Three-address code: every intermediate result gets a temporary `tN`, and
//! every instruction names its operands.

use std::fmt::Display;

use crate::{
	analyzer::value::ConstValue,
	codegen::emitter::{Emitter, OutputKind, Slot, quoted},
	declaration::SimpleType,
	parser::expression::{BinaryOp, UnaryOp},
};

/// A value as an instruction refers to it.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
	Temp(usize),
	Name(String),
	Immediate(String),
}

impl Display for Operand {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Operand::Temp(n) => write!(f, "t{n}"),
			Operand::Name(name) => write!(f, "{name}"),
			Operand::Immediate(value) => write!(f, "{value}"),
		}
	}
}

#[derive(Debug, Default)]
pub struct ThreeAddressEmitter {
	lines:     Vec<String>,
	next_temp: usize,
}

impl ThreeAddressEmitter {
	pub fn new() -> Self { Self::default() }

	fn emit(&mut self, line: impl Into<String>) { self.lines.push(line.into()) }

	fn temp(&mut self) -> Operand {
		let temp = Operand::Temp(self.next_temp);
		self.next_temp += 1;
		temp
	}
}

impl Emitter for ThreeAddressEmitter {
	type Operand = Operand;

	fn start(&mut self, program: &str) { self.emit(format!("start {program}")) }

	fn stop(&mut self) { self.emit("stop") }

	fn comment(&mut self, text: &str) { self.emit(format!("// {text}")) }

	fn allocate_scalar(&mut self, slot: &Slot, ty: SimpleType) {
		let default = match ty {
			SimpleType::Integer | SimpleType::Boolean => "0",
			SimpleType::Real => "0.0",
			SimpleType::String => "\"\"",
		};
		self.emit(format!("{} = {default}", slot.name));
	}

	fn allocate_array(&mut self, slot: &Slot, len: usize) { self.emit(format!("{} = array {len}", slot.name)) }

	fn constant(&mut self, value: &ConstValue) -> Operand {
		Operand::Immediate(match value {
			ConstValue::Integer(n) => n.to_string(),
			ConstValue::Real(n) => format!("{n:?}"),
			ConstValue::String(s) => quoted(s),
			ConstValue::Boolean(b) => i64::from(*b).to_string(),
		})
	}

	fn load(&mut self, slot: &Slot) -> Operand { Operand::Name(slot.name.clone()) }

	fn store(&mut self, slot: &Slot, value: Operand) { self.emit(format!("{} = {value}", slot.name)) }

	fn load_element(&mut self, array: &Slot, index: Operand) -> Operand {
		let temp = self.temp();
		self.emit(format!("{temp} = {}[{index}]", array.name));
		temp
	}

	fn store_element(&mut self, array: &Slot, index: Operand, value: Operand) {
		self.emit(format!("{}[{index}] = {value}", array.name))
	}

	fn binary(&mut self, operator: BinaryOp, left: Operand, right: Operand) -> Operand {
		let temp = self.temp();
		self.emit(format!("{temp} = {left} {} {right}", operator.symbol()));
		temp
	}

	fn unary(&mut self, operator: UnaryOp, operand: Operand) -> Operand {
		let temp = self.temp();
		match operator {
			UnaryOp::Neg => self.emit(format!("{temp} = -{operand}")),
			UnaryOp::Not => self.emit(format!("{temp} = not {operand}")),
		}
		temp
	}

	fn label(&mut self, label: &str) { self.emit(format!("{label}:")) }

	fn jump(&mut self, label: &str) { self.emit(format!("goto {label}")) }

	fn jump_if_false(&mut self, condition: Operand, label: &str) {
		self.emit(format!("ifFalse {condition} goto {label}"))
	}

	fn write(&mut self, value: Operand, kind: OutputKind) {
		let kind = match kind {
			OutputKind::Integer => "int",
			OutputKind::Real => "real",
			OutputKind::Text => "string",
		};
		self.emit(format!("write {kind} {value}"));
	}

	fn newline(&mut self) { self.emit("writeln") }

	fn read(&mut self) -> Operand {
		let temp = self.temp();
		self.emit(format!("read {temp}"));
		temp
	}

	fn finish(self) -> Vec<String> { self.lines }
}
