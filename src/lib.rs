//! # pascaler
//!
//! A compiler for a small Pascal subset, emitting code for a stack-based
//! virtual machine.
//!
//! User's source code: `x := 1 + 2 * 3;`

//! ## Scanning
//!
//! The scanner turns characters into tokens: keywords (matched without regard
//! to case), identifiers, integer, real and string literals, operators and
//! punctuation. Whitespace and both comment styles, `{ ... }` and `(* ... *)`,
//! are dropped. A character that starts no token is reported and skipped, the
//! rest of the file is still scanned.
//!
//! So the tokens are `["x", ":=", "1", "+", "2", "*", "3", ";"]`.

//! ## Parsing
//!
//! A recursive descent parser builds the syntax tree and stops at the first
//! syntax error.
//!
//! ``` markdown
//! assignment x
//! └── + (Expression::Binary)
//!     ├── 1 (Expression::Number)
//!     └── * (Expression::Binary)
//!         ├── 2 (Expression::Number)
//!         └── 3 (Expression::Number)
//! ```

//! ## Static analysis
//!
//! Every declaration lands in a scoped symbol table: `global` for the program,
//! one nested scope per function or procedure. Names are resolved innermost
//! scope first. Types are checked on assignments, conditions, loop bounds and
//! calls; constants are folded to their values. All errors are collected and
//! reported together.

//! ## Code generation
//!
//! Globals get numbered storage slots, arrays a run of consecutive slots.
//! Expressions become post-order instruction sequences and structured control
//! flow becomes labels and conditional jumps:
//!
//! ``` markdown
//! start
//! pushi 0
//! pushi 1
//! pushi 2
//! pushi 3
//! mul
//! add
//! storeg 0
//! stop
//! ```

pub mod analyzer;
pub mod cli;
pub mod codegen;
pub mod declaration;
mod error;
pub mod parser;
mod pascaler;
pub mod scanner;
pub mod statement;
pub mod symbols;

pub use error::{
	CompileError,
	codegen::CodegenError,
	parser::{ParseError, ParseErrorType, ParserError},
	scanner::{ScanError, ScanErrorType, ScannerError},
	semantic::{SemanticError, SemanticErrorType},
};
pub use pascaler::{Compilation, CompileOptions, Pascaler};
