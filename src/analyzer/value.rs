use std::fmt::Display;

use crate::{
	parser::expression::{BinaryOp, Expression, Number, UnaryOp, VariableRef},
	symbols::{SymbolKind, SymbolTable, Type},
};

/// Value of a `const` declaration, computed at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
	Integer(i64),
	Real(f64),
	Boolean(bool),
	String(String),
}

impl Display for ConstValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ConstValue::Integer(n) => write!(f, "{n}"),
			ConstValue::Real(n) => write!(f, "{n:?}"),
			ConstValue::Boolean(b) => write!(f, "{b}"),
			ConstValue::String(s) => write!(f, "'{s}'"),
		}
	}
}

/// Fold an expression built from literals, constants and operators. Anything
/// that needs run time (variables, calls) or would fail (division by zero,
/// overflow) yields `None`.
pub fn fold(table: &SymbolTable, expression: &Expression) -> Option<ConstValue> {
	match expression {
		Expression::Number { value: Number::Integer(n), .. } => Some(ConstValue::Integer(*n)),
		Expression::Number { value: Number::Real(n), .. } => Some(ConstValue::Real(*n)),
		Expression::String { value, .. } => Some(ConstValue::String(value.clone())),
		Expression::Boolean { value, .. } => Some(ConstValue::Boolean(*value)),
		Expression::Variable(VariableRef::Variable { name, .. }) => table
			.lookup(name, false)
			.filter(|symbol| symbol.kind == SymbolKind::Constant)
			.and_then(|symbol| symbol.constant_value.clone()),
		Expression::Unary { operator, operand, .. } => fold(table, operand)?.unary_op(*operator),
		Expression::Binary { left, operator, right, .. } => fold(table, left)?.binary_op(*operator, &fold(table, right)?),
		Expression::Variable(VariableRef::ArrayAccess { .. }) | Expression::FunctionCall { .. } => None,
	}
}

impl ConstValue {
	pub fn value_type(&self) -> Type {
		match self {
			ConstValue::Integer(_) => Type::Integer,
			ConstValue::Real(_) => Type::Real,
			ConstValue::Boolean(_) => Type::Boolean,
			ConstValue::String(_) => Type::String,
		}
	}

	/// Performs a unary operation on the value.
	pub fn unary_op(&self, op: UnaryOp) -> Option<ConstValue> {
		match (op, self) {
			(UnaryOp::Neg, ConstValue::Integer(n)) => n.checked_neg().map(ConstValue::Integer),
			(UnaryOp::Neg, ConstValue::Real(n)) => Some(ConstValue::Real(-n)),
			(UnaryOp::Not, ConstValue::Boolean(b)) => Some(ConstValue::Boolean(!b)),
			_ => None,
		}
	}

	/// Performs a binary operation between two values.
	pub fn binary_op(&self, op: BinaryOp, right: &Self) -> Option<ConstValue> {
		use BinaryOp::*;

		match op {
			Add => self.arithmetic(right, i64::checked_add, |l, r| l + r),
			Sub => self.arithmetic(right, i64::checked_sub, |l, r| l - r),
			Mul => self.arithmetic(right, i64::checked_mul, |l, r| l * r),
			Divide => self.divide(right),
			Div => self.integer(right, i64::checked_div),
			Mod => self.integer(right, i64::checked_rem),
			Eq => self.compare(right).map(|o| ConstValue::Boolean(o.is_eq())),
			Ne => self.compare(right).map(|o| ConstValue::Boolean(o.is_ne())),
			Lt => self.compare(right).map(|o| ConstValue::Boolean(o.is_lt())),
			Gt => self.compare(right).map(|o| ConstValue::Boolean(o.is_gt())),
			Le => self.compare(right).map(|o| ConstValue::Boolean(o.is_le())),
			Ge => self.compare(right).map(|o| ConstValue::Boolean(o.is_ge())),
			And => self.logical(right, |l, r| l && r),
			Or => self.logical(right, |l, r| l || r),
		}
	}

	fn as_real(&self) -> Option<f64> {
		match self {
			ConstValue::Integer(n) => Some(*n as f64),
			ConstValue::Real(n) => Some(*n),
			_ => None,
		}
	}

	/// Integer when both sides are, real when either is.
	fn arithmetic(
		&self,
		other: &Self,
		integer: impl Fn(i64, i64) -> Option<i64>,
		real: impl Fn(f64, f64) -> f64,
	) -> Option<ConstValue> {
		match (self, other) {
			(ConstValue::Integer(l), ConstValue::Integer(r)) => integer(*l, *r).map(ConstValue::Integer),
			_ => Some(ConstValue::Real(real(self.as_real()?, other.as_real()?))),
		}
	}

	fn divide(&self, other: &Self) -> Option<ConstValue> {
		let r = other.as_real()?;
		if r == 0.0 {
			return None;
		}
		Some(ConstValue::Real(self.as_real()? / r))
	}

	/// `div` and `mod`; the checked ops reject a zero divisor.
	fn integer(&self, other: &Self, op: impl Fn(i64, i64) -> Option<i64>) -> Option<ConstValue> {
		match (self, other) {
			(ConstValue::Integer(l), ConstValue::Integer(r)) => op(*l, *r).map(ConstValue::Integer),
			_ => None,
		}
	}

	fn compare(&self, other: &Self) -> Option<std::cmp::Ordering> {
		match (self, other) {
			(ConstValue::Integer(l), ConstValue::Integer(r)) => Some(l.cmp(r)),
			(ConstValue::Boolean(l), ConstValue::Boolean(r)) => Some(l.cmp(r)),
			(ConstValue::String(l), ConstValue::String(r)) => Some(l.cmp(r)),
			_ => self.as_real()?.partial_cmp(&other.as_real()?),
		}
	}

	fn logical(&self, other: &Self, op: impl Fn(bool, bool) -> bool) -> Option<ConstValue> {
		match (self, other) {
			(ConstValue::Boolean(l), ConstValue::Boolean(r)) => Some(ConstValue::Boolean(op(*l, *r))),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{
		ConstValue::{Boolean, Integer, Real},
		*,
	};

	fn text(s: &str) -> ConstValue { ConstValue::String(s.to_string()) }

	#[test]
	fn integer_arithmetic_stays_integer() {
		assert_eq!(Integer(2).binary_op(BinaryOp::Add, &Integer(3)), Some(Integer(5)));
		assert_eq!(Integer(7).binary_op(BinaryOp::Div, &Integer(2)), Some(Integer(3)));
		assert_eq!(Integer(7).binary_op(BinaryOp::Mod, &Integer(2)), Some(Integer(1)));
		assert_eq!(Integer(7).binary_op(BinaryOp::Divide, &Integer(2)), Some(Real(3.5)));
	}

	#[test]
	fn mixed_arithmetic_widens_to_real() {
		assert_eq!(Integer(1).binary_op(BinaryOp::Add, &Real(0.5)), Some(Real(1.5)));
		assert_eq!(Real(2.0).binary_op(BinaryOp::Mul, &Integer(3)), Some(Real(6.0)));
	}

	#[test]
	fn failing_operations_do_not_fold() {
		assert_eq!(Integer(1).binary_op(BinaryOp::Div, &Integer(0)), None);
		assert_eq!(Integer(1).binary_op(BinaryOp::Divide, &Integer(0)), None);
		assert_eq!(Integer(i64::MAX).binary_op(BinaryOp::Add, &Integer(1)), None);
		assert_eq!(Integer(1).binary_op(BinaryOp::And, &Boolean(true)), None);
		assert_eq!(text("a").binary_op(BinaryOp::Add, &text("b")), None);
	}

	#[test]
	fn comparisons_and_logic() {
		assert_eq!(Integer(1).binary_op(BinaryOp::Lt, &Real(1.5)), Some(Boolean(true)));
		assert_eq!(text("a").binary_op(BinaryOp::Ne, &text("b")), Some(Boolean(true)));
		assert_eq!(Boolean(true).binary_op(BinaryOp::Or, &Boolean(false)), Some(Boolean(true)));
		assert_eq!(Boolean(true).unary_op(UnaryOp::Not), Some(Boolean(false)));
		assert_eq!(Integer(4).unary_op(UnaryOp::Neg), Some(Integer(-4)));
	}
}
