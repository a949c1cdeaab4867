use std::{fs::read_to_string, path::Path};

use anyhow::Context;
use log::debug;

use crate::{
	CompileError, ScanError,
	analyzer::Analyzer,
	codegen::{self, CodegenOptions},
	declaration::Program,
	parser::Parser,
	scanner::Scanner,
	symbols::SymbolTable,
};

/// Knobs for one compilation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
	pub codegen: CodegenOptions,
}

/// Everything one compilation produced.
#[derive(Debug)]
pub struct Compilation {
	pub program:        Program,
	pub symbols:        SymbolTable,
	pub code:           Vec<String>,
	/// Characters the scanner skipped; compilation went on without them.
	pub lexical_errors: Vec<ScanError>,
}

impl Compilation {
	/// The generated code as it is written to disk.
	pub fn output(&self) -> String {
		let mut output = self.code.join("\n");
		output.push('\n');
		output
	}
}

/// Pascaler is the driver of the compiler: scan, parse, analyze, generate.
///
/// It holds no state between calls; every compilation gets its own symbol
/// table, label counter and storage map.
#[derive(Debug, Default)]
pub struct Pascaler {
	options: CompileOptions,
}

impl Pascaler {
	pub fn new(options: CompileOptions) -> Self { Self { options } }

	/// Read a source file.
	pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String, CompileError> {
		let path = path.as_ref();
		Ok(read_to_string(path).with_context(|| format!("Failed open source file {}", path.display()))?)
	}

	/// Compile the file at `path`.
	pub fn compile_file<P: AsRef<Path>>(&self, path: P) -> Result<Compilation, CompileError> {
		let source = Self::read_source(path)?;
		self.compile_source(&source)
	}

	/// Compile one source unit through every phase.
	pub fn compile_source(&self, source: &str) -> Result<Compilation, CompileError> {
		let (program, lexical_errors) = Self::parse(source)?;
		let symbols = Analyzer::new().analyze(&program)?;
		let code = codegen::generate(&symbols, &program, self.options.codegen)?;
		debug!("compiled program {} into {} line(s)", program.name, code.len());

		Ok(Compilation { program, symbols, code, lexical_errors })
	}

	/// One `line N: KIND 'lexeme'` entry per token, `Eof` included.
	pub fn tokens(source: &str) -> Result<Vec<String>, CompileError> {
		let scanned = Scanner::new(source).scan_tokens()?;
		Ok(scanned
			.tokens
			.iter()
			.map(|token| format!("line {}: {} '{}'", token.line, token.r#type.name(), token.lexeme))
			.collect())
	}

	/// Scan and parse, stopping before analysis.
	pub fn parse(source: &str) -> Result<(Program, Vec<ScanError>), CompileError> {
		let scanned = Scanner::new(source).scan_tokens()?;
		let program = Parser::new(scanned.tokens).parse()?;
		Ok((program, scanned.errors))
	}

	/// Scan, parse and analyze, stopping before code generation.
	pub fn analyze(source: &str) -> Result<SymbolTable, CompileError> {
		let (program, _) = Self::parse(source)?;
		Analyzer::new().analyze(&program)
	}
}
