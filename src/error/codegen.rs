use crate::error::semantic::SemanticError;

/// Anomalies found while lowering. Every one of them stops generation.
#[derive(thiserror::Error, Debug)]
pub enum CodegenError {
	/// A name with neither a storage slot nor a folded constant value
	#[error("line {line}: '{name}' has no storage slot or constant value")]
	UnresolvedSymbol { name: String, line: usize },
	/// A construct the target instruction set has no way to express
	#[error("line {line}: {construct} cannot be lowered to the target machine")]
	Unsupported { construct: String, line: usize },
	/// Two global declarations competing for the same name
	#[error("line {line}: storage for '{name}' is already allocated")]
	DuplicateStorage { name: String, line: usize },
	/// The generator was handed an expression the analyzer would have rejected
	#[error("unvalidated expression, {0}")]
	Unvalidated(#[from] SemanticError),
}
