pub mod codegen;
pub mod parser;
pub mod scanner;
pub mod semantic;

use crate::error::{parser::ParserError, semantic::SemanticError};

/// CompileError is the top-level error type of the compilation pipeline.
#[derive(thiserror::Error, Debug)]
pub enum CompileError {
	/// Internal compiler error or failed IO, should not happen for valid input
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// The first syntax error, parsing stops there
	#[error("Syntax error at {0}")]
	ParseError(#[from] parser::ParseError),
	/// Every semantic error found in the program, reported together
	#[error("{} semantic error(s):\n{}", .0.len(), display_semantic_errors(.0))]
	SemanticErrors(Vec<SemanticError>),
	/// Lowering hit something the target machine cannot express
	#[error("Code generation failed at {0}")]
	CodegenError(#[from] codegen::CodegenError),
}

impl From<ParserError> for CompileError {
	fn from(error: ParserError) -> Self {
		match error {
			ParserError::InternalError(e) => Self::InternalError(e),
			ParserError::ParseError(e) => Self::ParseError(e),
		}
	}
}

fn display_semantic_errors(errors: &[SemanticError]) -> String {
	errors.iter().map(|e| format!("  {e}")).collect::<Vec<String>>().join("\n")
}
