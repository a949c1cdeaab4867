//! Instructions for the stack virtual machine.
//!
//! Globals live in numbered slots (`pushg`/`storeg`); array elements are
//! reached through a computed address (`loadn`/`storen`). Every value an
//! instruction needs is already on top of the stack.

use crate::{
	analyzer::value::ConstValue,
	codegen::emitter::{Emitter, OutputKind, Slot, quoted},
	declaration::SimpleType,
	parser::expression::{BinaryOp, UnaryOp},
};

#[derive(Debug, Default)]
pub struct StackEmitter {
	lines: Vec<String>,
}

impl StackEmitter {
	pub fn new() -> Self { Self::default() }

	fn emit(&mut self, line: impl Into<String>) { self.lines.push(line.into()) }

	/// Leave `base + (index - low)` on the stack; the index is already there.
	fn address(&mut self, array: &Slot) {
		self.emit(format!("pushi {}", array.low()));
		self.emit("sub");
		self.emit(format!("pushi {}", array.index));
		self.emit("add");
	}
}

impl Emitter for StackEmitter {
	type Operand = ();

	fn start(&mut self, _program: &str) { self.emit("start") }

	fn stop(&mut self) { self.emit("stop") }

	fn comment(&mut self, text: &str) { self.emit(format!("// {text}")) }

	fn allocate_scalar(&mut self, _slot: &Slot, ty: SimpleType) {
		match ty {
			SimpleType::Integer | SimpleType::Boolean => self.emit("pushi 0"),
			SimpleType::Real => self.emit("pushf 0.0"),
			SimpleType::String => self.emit("pushs \"\""),
		}
	}

	fn allocate_array(&mut self, _slot: &Slot, len: usize) {
		for _ in 0..len {
			self.emit("pushi 0");
		}
	}

	fn constant(&mut self, value: &ConstValue) {
		match value {
			ConstValue::Integer(n) => self.emit(format!("pushi {n}")),
			ConstValue::Real(n) => self.emit(format!("pushf {n:?}")),
			ConstValue::String(s) => self.emit(format!("pushs {}", quoted(s))),
			ConstValue::Boolean(b) => self.emit(format!("pushi {}", i64::from(*b))),
		}
	}

	fn load(&mut self, slot: &Slot) { self.emit(format!("pushg {}", slot.index)) }

	fn store(&mut self, slot: &Slot, _value: ()) { self.emit(format!("storeg {}", slot.index)) }

	fn load_element(&mut self, array: &Slot, _index: ()) {
		self.address(array);
		self.emit("loadn");
	}

	fn store_element(&mut self, array: &Slot, _index: (), _value: ()) {
		self.address(array);
		self.emit("storen");
	}

	fn binary(&mut self, operator: BinaryOp, _left: (), _right: ()) {
		use BinaryOp::*;

		#[rustfmt::skip]
		let instruction = match operator {
			Add => "add", Sub => "sub", Mul => "mul", Divide | Div => "div", Mod => "mod",
			Eq => "equal", Lt => "inf", Gt => "sup", Le => "infeq", Ge => "supeq",
			And => "and", Or => "or",
			Ne => {
				self.emit("equal");
				"not"
			}
		};
		self.emit(instruction);
	}

	fn unary(&mut self, operator: UnaryOp, _operand: ()) {
		match operator {
			UnaryOp::Neg => {
				self.emit("pushi -1");
				self.emit("mul");
			}
			UnaryOp::Not => self.emit("not"),
		}
	}

	fn label(&mut self, label: &str) { self.emit(format!("{label}:")) }

	fn jump(&mut self, label: &str) { self.emit(format!("jump {label}")) }

	fn jump_if_false(&mut self, _condition: (), label: &str) { self.emit(format!("jz {label}")) }

	fn write(&mut self, _value: (), kind: OutputKind) {
		match kind {
			OutputKind::Integer => self.emit("writei"),
			OutputKind::Real => self.emit("writef"),
			OutputKind::Text => self.emit("writes"),
		}
	}

	fn newline(&mut self) { self.emit("writeln") }

	fn read(&mut self) {
		self.emit("read");
		self.emit("atoi");
	}

	fn finish(self) -> Vec<String> { self.lines }
}
