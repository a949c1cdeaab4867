use std::fmt::Display;

use crate::{analyzer::value::ConstValue, declaration::SimpleType};

/// Everything known about one declared name.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
	pub name:           String,
	pub declared_type:  Type,
	pub kind:           SymbolKind,
	/// Scope the name was declared in.
	pub scope:          ScopePath,
	pub line:           usize,
	/// Folded value of a constant.
	pub constant_value: Option<ConstValue>,
	pub array_bounds:   Option<ArrayBounds>,
	/// Parameters of a function or procedure, in declaration order.
	pub parameters:     Vec<Symbol>,
}

impl Symbol {
	pub fn new(name: &str, declared_type: Type, kind: SymbolKind, scope: ScopePath, line: usize) -> Self {
		Self {
			name: name.to_string(),
			declared_type,
			kind,
			scope,
			line,
			constant_value: None,
			array_bounds: None,
			parameters: Vec::new(),
		}
	}

	pub fn is_routine(&self) -> bool { matches!(self.kind, SymbolKind::Function | SymbolKind::Procedure) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
	Variable,
	Constant,
	Type,
	Function,
	Procedure,
	Parameter,
}

/// Static type of a symbol or expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
	Integer,
	Real,
	Boolean,
	String,
	Array(SimpleType),
	/// Result of a procedure.
	Void,
}

impl Type {
	pub fn is_numeric(&self) -> bool { matches!(self, Type::Integer | Type::Real) }

	pub fn is_scalar(&self) -> bool { matches!(self, Type::Integer | Type::Real | Type::Boolean | Type::String) }

	/// Whether a value of type `value` may be stored where `self` is expected.
	pub fn accepts(&self, value: &Type) -> bool { self == value || (*self == Type::Real && *value == Type::Integer) }

	/// The declarable scalar this type stands for, if any.
	pub fn simple(&self) -> Option<SimpleType> {
		match self {
			Type::Integer => Some(SimpleType::Integer),
			Type::Real => Some(SimpleType::Real),
			Type::Boolean => Some(SimpleType::Boolean),
			Type::String => Some(SimpleType::String),
			Type::Array(_) | Type::Void => None,
		}
	}
}

impl From<SimpleType> for Type {
	fn from(ty: SimpleType) -> Self {
		match ty {
			SimpleType::Integer => Type::Integer,
			SimpleType::Real => Type::Real,
			SimpleType::Boolean => Type::Boolean,
			SimpleType::String => Type::String,
		}
	}
}

/// Declared `[low..high]` of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayBounds {
	pub low:  i64,
	pub high: i64,
}

impl ArrayBounds {
	/// Most elements one array may hold, each takes a storage slot.
	pub const MAX_LEN: usize = 65_536;

	/// Number of elements, zero when the bounds are inverted. `None` when the
	/// count does not fit in `usize`.
	pub fn len(&self) -> Option<usize> {
		if self.high < self.low {
			return Some(0);
		}
		let span = self.high.checked_sub(self.low)?.checked_add(1)?;
		usize::try_from(span).ok()
	}

	/// Number of elements if it is within [`Self::MAX_LEN`].
	pub fn storage_len(&self) -> Option<usize> { self.len().filter(|&len| len <= Self::MAX_LEN) }
}

/// Dot-qualified position in the scope stack, rooted at `global`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopePath(Vec<String>);

impl ScopePath {
	pub const ROOT: &'static str = "global";

	pub fn from_segments(segments: &[String]) -> Self { Self(segments.to_vec()) }

	pub fn is_root(&self) -> bool { self.0.len() == 1 }
}

/// Table key: the declaring scope plus the plain name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolKey {
	pub scope: ScopePath,
	pub name:  String,
}

impl Display for ScopePath {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0.join(".")) }
}

impl Display for SymbolKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}.{}", self.scope, self.name) }
}

impl Display for Type {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Integer => write!(f, "integer"),
			Type::Real => write!(f, "real"),
			Type::Boolean => write!(f, "boolean"),
			Type::String => write!(f, "string"),
			Type::Array(element) => write!(f, "array of {element}"),
			Type::Void => write!(f, "void"),
		}
	}
}

impl Display for SymbolKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let kind = match self {
			SymbolKind::Variable => "variable",
			SymbolKind::Constant => "constant",
			SymbolKind::Type => "type",
			SymbolKind::Function => "function",
			SymbolKind::Procedure => "procedure",
			SymbolKind::Parameter => "parameter",
		};
		write!(f, "{kind}")
	}
}

impl Display for Symbol {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ({}, {}, scope: {}, line: {})", self.name, self.kind, self.declared_type, self.scope, self.line)?;
		if let Some(value) = &self.constant_value {
			write!(f, ", value: {value}")?;
		}
		if let Some(ArrayBounds { low, high }) = &self.array_bounds {
			write!(f, ", bounds: [{low}..{high}]")?;
		}
		if !self.parameters.is_empty() {
			let parameters: Vec<String> =
				self.parameters.iter().map(|p| format!("{}: {}", p.name, p.declared_type)).collect();
			write!(f, ", parameters: [{}]", parameters.join(", "))?;
		}
		Ok(())
	}
}
