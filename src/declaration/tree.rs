//! Indented tree rendering of a parsed program, one node per line.

use std::fmt::{Formatter, Result, Write};

use crate::{
	declaration::{Declaration, Declarations, ParameterList, Program},
	parser::builder::NodeList,
	statement::Statement,
};

const INDENT: &str = "  ";

impl std::fmt::Display for Program {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result {
		writeln!(f, "program {}", self.name)?;
		write_declarations(f, &self.declarations, 1)?;
		write_compound(f, &self.body, 1)
	}
}

fn indent(f: &mut Formatter<'_>, depth: usize) -> Result {
	for _ in 0..depth {
		f.write_str(INDENT)?;
	}
	Ok(())
}

fn joined<T: std::fmt::Display>(items: &NodeList<T>) -> String {
	let mut out = String::new();
	for (i, item) in items.iter().enumerate() {
		if i > 0 {
			out.push_str(", ");
		}
		let _ = write!(out, "{item}");
	}
	out
}

fn parameters(list: &ParameterList) -> String {
	if list.is_empty() {
		return String::new();
	}
	let groups: Vec<String> = list.iter().map(|p| format!("{}: {}", joined(&p.names), p.ty)).collect();
	format!("({})", groups.join("; "))
}

fn write_declarations(f: &mut Formatter<'_>, declarations: &Declarations, depth: usize) -> Result {
	indent(f, depth)?;
	writeln!(f, "declarations")?;
	for declaration in declarations {
		match declaration {
			Declaration::Var(items) => {
				indent(f, depth + 1)?;
				writeln!(f, "var_declaration")?;
				for item in items {
					indent(f, depth + 2)?;
					writeln!(f, "var_item {}: {}", joined(&item.names), item.type_spec)?;
				}
			}
			Declaration::Const(items) => {
				indent(f, depth + 1)?;
				writeln!(f, "const_declaration")?;
				for item in items {
					indent(f, depth + 2)?;
					writeln!(f, "const_item {} = {}", item.name, item.value)?;
				}
			}
			Declaration::Type(items) => {
				indent(f, depth + 1)?;
				writeln!(f, "type_declaration")?;
				for item in items {
					indent(f, depth + 2)?;
					writeln!(f, "type_item {} = {}", item.name, item.type_spec)?;
				}
			}
			Declaration::Function(function) => {
				indent(f, depth + 1)?;
				writeln!(
					f,
					"function_declaration {}{}: {}",
					function.name,
					parameters(&function.parameters),
					function.return_type
				)?;
				write_declarations(f, &function.declarations, depth + 2)?;
				write_compound(f, &function.body, depth + 2)?;
			}
			Declaration::Procedure(procedure) => {
				indent(f, depth + 1)?;
				writeln!(f, "procedure_declaration {}{}", procedure.name, parameters(&procedure.parameters))?;
				write_declarations(f, &procedure.declarations, depth + 2)?;
				write_compound(f, &procedure.body, depth + 2)?;
			}
		}
	}
	Ok(())
}

fn write_compound(f: &mut Formatter<'_>, body: &NodeList<Statement>, depth: usize) -> Result {
	indent(f, depth)?;
	writeln!(f, "compound_statement")?;
	for statement in body {
		write_statement(f, statement, depth + 1)?;
	}
	Ok(())
}

fn write_statement(f: &mut Formatter<'_>, statement: &Statement, depth: usize) -> Result {
	if let Statement::Compound(body) = statement {
		return write_compound(f, body, depth);
	}

	indent(f, depth)?;
	match statement {
		Statement::Assignment { target, value, .. } => writeln!(f, "assignment {target} := {value}"),
		Statement::If { condition, then_branch, else_branch, .. } => {
			writeln!(f, "if_statement {condition}")?;
			indent(f, depth + 1)?;
			writeln!(f, "then")?;
			write_statement(f, then_branch, depth + 2)?;
			if let Some(else_branch) = else_branch {
				indent(f, depth + 1)?;
				writeln!(f, "else")?;
				write_statement(f, else_branch, depth + 2)?;
			}
			Ok(())
		}
		Statement::While { condition, body, .. } => {
			writeln!(f, "while_statement {condition}")?;
			write_statement(f, body, depth + 1)
		}
		Statement::For { variable, direction, start, end, body, .. } => {
			writeln!(f, "for_statement {variable} := {start} {direction} {end}")?;
			write_statement(f, body, depth + 1)
		}
		Statement::Read { newline, targets, .. } => {
			let keyword = if *newline { "readln" } else { "read" };
			match targets {
				Some(targets) => writeln!(f, "read_statement {keyword} {}", joined(targets)),
				None => writeln!(f, "read_statement {keyword}"),
			}
		}
		Statement::Write { newline, arguments, .. } => {
			let keyword = if *newline { "writeln" } else { "write" };
			match arguments {
				Some(arguments) => writeln!(f, "write_statement {keyword} {}", joined(arguments)),
				None => writeln!(f, "write_statement {keyword}"),
			}
		}
		Statement::ProcedureCall { name, arguments, .. } => match arguments {
			Some(arguments) => writeln!(f, "procedure_call {name}({})", joined(arguments)),
			None => writeln!(f, "procedure_call {name}"),
		},
		Statement::Empty { .. } => writeln!(f, "empty"),
		Statement::Compound(_) => Ok(()),
	}
}
