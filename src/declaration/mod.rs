//! Declaration AST nodes and the root `Program` node.
//!
//! A program is a name, the declarations that precede the main block, and the
//! main block itself. Functions and procedures repeat the same shape one
//! scope further in.

mod tree;

use crate::{
	parser::{builder::NodeList, expression::Expression},
	statement::CompoundStatement,
};

pub type Declarations = NodeList<Declaration>;
pub type VarDeclaration = NodeList<VarItem>;
pub type ConstDeclaration = NodeList<ConstItem>;
pub type TypeDeclaration = NodeList<TypeItem>;
pub type IdList = NodeList<String>;
pub type ParameterList = NodeList<Parameter>;

/// Root of the tree: `program name; declarations begin ... end.`
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
	pub name:         String,
	pub declarations: Declarations,
	pub body:         CompoundStatement,
	pub line:         usize,
}

/// One declaration section.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
	Var(VarDeclaration),
	Const(ConstDeclaration),
	Type(TypeDeclaration),
	Function(FunctionDeclaration),
	Procedure(ProcedureDeclaration),
}

/// `a, b, c: type;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarItem {
	pub names:     IdList,
	pub type_spec: TypeSpec,
	pub line:      usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
	Simple { ty: SimpleType, line: usize },
	Array(ArrayType),
}

impl TypeSpec {
	pub fn line(&self) -> usize {
		match self {
			TypeSpec::Simple { line, .. } => *line,
			TypeSpec::Array(array) => array.line,
		}
	}
}

/// `array [low..high] of element`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
	pub low:     i64,
	pub high:    i64,
	pub element: SimpleType,
	pub line:    usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SimpleType {
	Integer,
	Real,
	Boolean,
	String,
}

/// `name = expression;`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstItem {
	pub name:  String,
	pub value: Expression,
	pub line:  usize,
}

/// `name = type;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeItem {
	pub name:      String,
	pub type_spec: TypeSpec,
	pub line:      usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
	pub name:         String,
	pub parameters:   ParameterList,
	pub return_type:  SimpleType,
	pub declarations: Declarations,
	pub body:         CompoundStatement,
	pub line:         usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDeclaration {
	pub name:         String,
	pub parameters:   ParameterList,
	pub declarations: Declarations,
	pub body:         CompoundStatement,
	pub line:         usize,
}

/// `a, b: type` inside a routine header.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
	pub names: IdList,
	pub ty:    SimpleType,
	pub line:  usize,
}

impl std::fmt::Display for SimpleType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SimpleType::Integer => write!(f, "integer"),
			SimpleType::Real => write!(f, "real"),
			SimpleType::Boolean => write!(f, "boolean"),
			SimpleType::String => write!(f, "string"),
		}
	}
}

impl std::fmt::Display for TypeSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TypeSpec::Simple { ty, .. } => write!(f, "{ty}"),
			TypeSpec::Array(ArrayType { low, high, element, .. }) => write!(f, "array[{low}..{high}] of {element}"),
		}
	}
}
