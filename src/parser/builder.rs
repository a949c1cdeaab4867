//! List productions (`id_list`, `statement_list`, `argument_list`, ...) grow
//! one child at a time while the parser is inside them, and never again
//! afterwards. `ListBuilder` is the open production, `NodeList` the closed one.

use std::{ops::Index, slice::Iter};

/// Accumulates the children of a list production that is still being parsed.
#[derive(Debug)]
pub struct ListBuilder<T> {
	items: Vec<T>,
}

impl<T> ListBuilder<T> {
	pub fn new() -> Self { Self { items: Vec::new() } }

	pub fn push(&mut self, item: T) { self.items.push(item) }

	pub fn is_empty(&self) -> bool { self.items.is_empty() }

	/// Close the production, the children can no longer change.
	pub fn finish(self) -> NodeList<T> { NodeList { items: self.items } }
}

impl<T> Default for ListBuilder<T> {
	fn default() -> Self { Self::new() }
}

/// The immutable children of a finished list production.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeList<T> {
	items: Vec<T>,
}

impl<T> NodeList<T> {
	pub fn len(&self) -> usize { self.items.len() }

	pub fn is_empty(&self) -> bool { self.items.is_empty() }

	pub fn iter(&self) -> Iter<'_, T> { self.items.iter() }

	pub fn first(&self) -> Option<&T> { self.items.first() }

	pub fn as_slice(&self) -> &[T] { &self.items }
}

impl<T> Index<usize> for NodeList<T> {
	type Output = T;

	fn index(&self, index: usize) -> &T { &self.items[index] }
}

impl<'a, T> IntoIterator for &'a NodeList<T> {
	type IntoIter = Iter<'a, T>;
	type Item = &'a T;

	fn into_iter(self) -> Self::IntoIter { self.items.iter() }
}
