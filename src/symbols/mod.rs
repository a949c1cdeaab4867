//! Scoped store of declared names.
//!
//! Scopes form a stack rooted at `global`; entering a routine pushes its name,
//! leaving pops it. Every symbol is keyed by the scope it was declared in, so
//! the same name can live in sibling or nested scopes without colliding.
//! Lookup starts at the innermost scope and walks outward one level at a time,
//! the nearest declaration wins.

mod symbol;

use std::collections::BTreeMap;

use log::trace;
pub use symbol::*;

use crate::analyzer::value::ConstValue;

#[derive(Debug, Clone)]
pub struct SymbolTable {
	symbols: BTreeMap<SymbolKey, Symbol>,
	/// Open scopes, outermost first. Never empty.
	scopes:  Vec<String>,
}

impl Default for SymbolTable {
	fn default() -> Self { Self::new() }
}

impl SymbolTable {
	pub fn new() -> Self { Self { symbols: BTreeMap::new(), scopes: vec![ScopePath::ROOT.to_string()] } }

	pub fn current_scope(&self) -> ScopePath { ScopePath::from_segments(&self.scopes) }

	/// Open a scope nested in the current one.
	pub fn enter_scope(&mut self, name: &str) -> ScopePath {
		self.scopes.push(name.to_string());
		let scope = self.current_scope();
		trace!("entered scope {scope}");
		scope
	}

	/// Close the current scope; the root stays open.
	pub fn exit_scope(&mut self) -> ScopePath {
		if self.scopes.len() > 1 {
			self.scopes.pop();
		}
		self.current_scope()
	}

	/// Declare `name` in the current scope. Returns `false` if the current
	/// scope already has it; outer declarations are shadowed, not conflicts.
	pub fn add_symbol(
		&mut self,
		name: &str,
		declared_type: Type,
		kind: SymbolKind,
		line: usize,
		value: Option<ConstValue>,
	) -> bool {
		let key = SymbolKey { scope: self.current_scope(), name: name.to_string() };
		if self.symbols.contains_key(&key) {
			return false;
		}
		let mut symbol = Symbol::new(name, declared_type, kind, key.scope.clone(), line);
		symbol.constant_value = value;
		trace!("declared {key}: {symbol}");
		self.symbols.insert(key, symbol);
		true
	}

	pub fn lookup(&self, name: &str, current_scope_only: bool) -> Option<&Symbol> {
		self.resolve(name, current_scope_only).and_then(|key| self.symbols.get(&key))
	}

	/// Attach bounds to an array declared in the current scope.
	pub fn add_array_dimensions(&mut self, name: &str, bounds: ArrayBounds) -> bool {
		match self.resolve(name, true).and_then(|key| self.symbols.get_mut(&key)) {
			Some(symbol) => {
				symbol.array_bounds = Some(bounds);
				true
			}
			None => false,
		}
	}

	/// Append a parameter record to the nearest visible function or procedure.
	pub fn add_parameter(&mut self, function_name: &str, param_name: &str, param_type: Type) -> bool {
		let Some(routine) = self.resolve(function_name, false).and_then(|key| self.symbols.get_mut(&key)) else {
			return false;
		};
		if !routine.is_routine() {
			return false;
		}
		let parameter = Symbol::new(param_name, param_type, SymbolKind::Parameter, routine.scope.clone(), routine.line);
		routine.parameters.push(parameter);
		true
	}

	/// All symbols ordered by qualified key.
	pub fn iter(&self) -> impl Iterator<Item = (&SymbolKey, &Symbol)> { self.symbols.iter() }

	pub fn len(&self) -> usize { self.symbols.len() }

	pub fn is_empty(&self) -> bool { self.symbols.is_empty() }

	/// Key of the nearest declaration of `name`, innermost scope first.
	fn resolve(&self, name: &str, current_scope_only: bool) -> Option<SymbolKey> {
		let outermost = if current_scope_only { self.scopes.len() } else { 1 };
		(outermost..=self.scopes.len()).rev().find_map(|depth| {
			let key = SymbolKey { scope: ScopePath::from_segments(&self.scopes[..depth]), name: name.to_string() };
			self.symbols.contains_key(&key).then_some(key)
		})
	}
}

impl std::fmt::Display for SymbolTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut lines: Vec<_> = self.symbols.iter().map(|(key, symbol)| (key.to_string(), symbol)).collect();
		lines.sort_by(|(a, _), (b, _)| a.cmp(b));
		for (key, symbol) in lines {
			writeln!(f, "{key}: {symbol}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn redeclaration_in_same_scope_fails() {
		let mut table = SymbolTable::new();
		assert!(table.add_symbol("x", Type::Integer, SymbolKind::Variable, 1, None));
		assert!(!table.add_symbol("x", Type::Real, SymbolKind::Variable, 2, None));
		assert_eq!(table.lookup("x", false).map(|s| s.declared_type), Some(Type::Integer));
	}

	#[test]
	fn inner_scope_sees_outer_names_only_through_chained_lookup() {
		let mut table = SymbolTable::new();
		table.add_symbol("x", Type::Integer, SymbolKind::Variable, 1, None);
		table.enter_scope("f");
		assert!(table.lookup("x", true).is_none());
		let symbol = table.lookup("x", false).unwrap();
		assert_eq!(symbol.scope.to_string(), "global");
	}

	#[test]
	fn nearest_declaration_shadows_outer() {
		let mut table = SymbolTable::new();
		table.add_symbol("x", Type::Integer, SymbolKind::Variable, 1, None);
		table.enter_scope("f");
		assert!(table.add_symbol("x", Type::Real, SymbolKind::Variable, 5, None));
		table.enter_scope("g");
		assert_eq!(table.lookup("x", false).map(|s| s.line), Some(5));
		table.exit_scope();
		table.exit_scope();
		assert_eq!(table.lookup("x", false).map(|s| s.line), Some(1));
	}

	#[test]
	fn sibling_scopes_are_invisible() {
		let mut table = SymbolTable::new();
		table.enter_scope("f");
		table.add_symbol("local", Type::Integer, SymbolKind::Variable, 2, None);
		table.exit_scope();
		table.enter_scope("g");
		assert!(table.lookup("local", false).is_none());
		table.exit_scope();
		assert!(table.lookup("local", false).is_none());
	}

	#[test]
	fn scope_paths() {
		let mut table = SymbolTable::new();
		assert_eq!(table.current_scope().to_string(), "global");
		assert_eq!(table.enter_scope("calc").to_string(), "global.calc");
		assert_eq!(table.enter_scope("inner").to_string(), "global.calc.inner");
		assert_eq!(table.exit_scope().to_string(), "global.calc");
		assert_eq!(table.exit_scope().to_string(), "global");
		assert!(table.exit_scope().is_root());
	}

	#[test]
	fn array_dimensions_need_a_symbol_in_current_scope() {
		let mut table = SymbolTable::new();
		table.add_symbol("v", Type::Array(crate::declaration::SimpleType::Integer), SymbolKind::Variable, 1, None);
		assert!(table.add_array_dimensions("v", ArrayBounds { low: 1, high: 5 }));
		assert!(!table.add_array_dimensions("w", ArrayBounds { low: 1, high: 5 }));
		assert_eq!(table.lookup("v", true).and_then(|s| s.array_bounds).and_then(|b| b.len()), Some(5));

		table.enter_scope("f");
		assert!(!table.add_array_dimensions("v", ArrayBounds { low: 0, high: 1 }));
	}

	#[test]
	fn array_length_never_overflows() {
		let len = |low, high| ArrayBounds { low, high }.len();
		assert_eq!(len(1, 5), Some(5));
		assert_eq!(len(-2, 2), Some(5));
		assert_eq!(len(3, 3), Some(1));
		assert_eq!(len(5, 1), Some(0));
		assert_eq!(len(i64::MIN, i64::MAX), None);
		assert_eq!(len(-9_223_372_036_854_775_807, 9_223_372_036_854_775_807), None);
		assert_eq!(len(0, i64::MAX), None);

		let bounds = ArrayBounds { low: 1, high: ArrayBounds::MAX_LEN as i64 };
		assert_eq!(bounds.storage_len(), Some(ArrayBounds::MAX_LEN));
		assert_eq!(ArrayBounds { low: 0, ..bounds }.storage_len(), None);
	}

	#[test]
	fn parameters_attach_to_routines_only() {
		let mut table = SymbolTable::new();
		table.add_symbol("x", Type::Integer, SymbolKind::Variable, 1, None);
		table.add_symbol("calc", Type::Integer, SymbolKind::Function, 2, None);
		table.enter_scope("calc");
		assert!(table.add_parameter("calc", "a", Type::Integer));
		assert!(table.add_parameter("calc", "b", Type::Real));
		assert!(!table.add_parameter("x", "c", Type::Integer));
		assert!(!table.add_parameter("missing", "c", Type::Integer));

		let calc = table.lookup("calc", false).unwrap();
		let names: Vec<_> = calc.parameters.iter().map(|p| p.name.as_str()).collect();
		assert_eq!(names, ["a", "b"]);
		assert_eq!(calc.parameters[1].kind, SymbolKind::Parameter);
	}

	#[test]
	fn dump_is_sorted_by_qualified_key() {
		let mut table = SymbolTable::new();
		table.add_symbol("y", Type::Real, SymbolKind::Variable, 2, None);
		table.add_symbol("n", Type::Integer, SymbolKind::Constant, 1, Some(ConstValue::Integer(10)));
		table.enter_scope("f");
		table.add_symbol("a", Type::Boolean, SymbolKind::Parameter, 3, None);
		assert_eq!(
			table.to_string(),
			"global.f.a: a (parameter, boolean, scope: global.f, line: 3)
global.n: n (constant, integer, scope: global, line: 1), value: 10
global.y: y (variable, real, scope: global, line: 2)
"
		);
	}
}
