use crate::{
	analyzer::value::ConstValue,
	declaration::SimpleType,
	parser::expression::{BinaryOp, UnaryOp},
	symbols::ArrayBounds,
};

/// Storage assigned to a global variable. Arrays occupy `len` slots from
/// `index` on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
	pub name:   String,
	pub index:  usize,
	pub bounds: Option<ArrayBounds>,
}

impl Slot {
	/// Declared low bound, zero for scalars.
	pub fn low(&self) -> i64 { self.bounds.map_or(0, |b| b.low) }
}

/// `text` as a double-quoted literal that stays on one line.
pub fn quoted(text: &str) -> String {
	let mut literal = String::with_capacity(text.len() + 2);
	literal.push('"');
	for c in text.chars() {
		match c {
			'"' => literal.push_str("\\\""),
			'\\' => literal.push_str("\\\\"),
			'\n' => literal.push_str("\\n"),
			'\r' => literal.push_str("\\r"),
			c => literal.push(c),
		}
	}
	literal.push('"');
	literal
}

/// Which output instruction a `write` argument needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
	Integer,
	Real,
	Text,
}

/// Turns lowering events into target instructions.
///
/// The generator walks the tree and decides the order of events; an emitter
/// only decides how each event is spelled. Values flow between events as
/// `Operand`s: a stack machine keeps them on its stack and needs no handle,
/// a three-address target names them.
pub trait Emitter {
	type Operand;

	fn start(&mut self, program: &str);

	fn stop(&mut self);

	/// A line consumers ignore.
	fn comment(&mut self, text: &str);

	/// Reserve and default-initialise one scalar slot.
	fn allocate_scalar(&mut self, slot: &Slot, ty: SimpleType);

	/// Reserve and zero `len` consecutive slots.
	fn allocate_array(&mut self, slot: &Slot, len: usize);

	fn constant(&mut self, value: &ConstValue) -> Self::Operand;

	fn load(&mut self, slot: &Slot) -> Self::Operand;

	fn store(&mut self, slot: &Slot, value: Self::Operand);

	fn load_element(&mut self, array: &Slot, index: Self::Operand) -> Self::Operand;

	/// `value` is produced before `index`.
	fn store_element(&mut self, array: &Slot, index: Self::Operand, value: Self::Operand);

	fn binary(&mut self, operator: BinaryOp, left: Self::Operand, right: Self::Operand) -> Self::Operand;

	fn unary(&mut self, operator: UnaryOp, operand: Self::Operand) -> Self::Operand;

	fn label(&mut self, label: &str);

	fn jump(&mut self, label: &str);

	fn jump_if_false(&mut self, condition: Self::Operand, label: &str);

	fn write(&mut self, value: Self::Operand, kind: OutputKind);

	fn newline(&mut self);

	/// Read one integer from input.
	fn read(&mut self) -> Self::Operand;

	/// The emitted lines, in order.
	fn finish(self) -> Vec<String>;
}
