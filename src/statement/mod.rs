//! There is no place in the grammar where both an expression and a statement
//! are allowed. The operands of, say, `+` are always expressions, never
//! statements. The body of a `while` loop is always a statement.

use crate::parser::{
	builder::NodeList,
	expression::{ArgumentList, Expression, ExpressionList, VariableList, VariableRef},
};

/// `begin ... end` body, empty statements already dropped.
pub type CompoundStatement = NodeList<Statement>;

/// A statement in the programming language.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	Assignment {
		target: VariableRef,
		value:  Expression,
		line:   usize,
	},
	/// A nested `begin ... end` block.
	Compound(CompoundStatement),
	If {
		condition:   Expression,
		then_branch: Box<Statement>,
		else_branch: Option<Box<Statement>>,
		line:        usize,
	},
	While {
		condition: Expression,
		body:      Box<Statement>,
		line:      usize,
	},
	For {
		/// Name of the control variable.
		variable:  String,
		direction: ForDirection,
		start:     Expression,
		end:       Expression,
		body:      Box<Statement>,
		line:      usize,
	},
	/// `read`/`readln`; a bare `readln` has no targets.
	Read {
		newline: bool,
		targets: Option<VariableList>,
		line:    usize,
	},
	/// `write`/`writeln`; a bare `writeln` has no arguments.
	Write {
		newline:   bool,
		arguments: Option<ExpressionList>,
		line:      usize,
	},
	ProcedureCall {
		name:      String,
		arguments: Option<ArgumentList>,
		line:      usize,
	},
	/// An empty `then`, `else` or loop body.
	Empty { line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForDirection {
	To,
	Downto,
}

impl std::fmt::Display for ForDirection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ForDirection::To => write!(f, "to"),
			ForDirection::Downto => write!(f, "downto"),
		}
	}
}
