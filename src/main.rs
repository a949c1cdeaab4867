use std::{fs, path::Path, process::exit};

use anyhow::Context;
use palc::Parser;
use pascaler::{
	CompileError, CompileOptions, Pascaler,
	cli::*,
	codegen::{CodegenOptions, Target},
};

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	if let Err(e) = run(Cli::parse().mode) {
		eprintln!("{e}");
		exit(1);
	}
}

fn run(mode: Mode) -> Result<(), CompileError> {
	match mode {
		Mode::Compile { path, output, three_address, annotate } => {
			let target = if three_address { Target::ThreeAddress } else { Target::StackMachine };
			let pascaler = Pascaler::new(CompileOptions { codegen: CodegenOptions { target, annotate } });
			let compilation = pascaler.compile_file(&path)?;
			let output = output.unwrap_or_else(|| path.with_extension("vm"));
			write_output(&output, &compilation.output())?;
			if !compilation.lexical_errors.is_empty() {
				eprintln!("{} lexical error(s) skipped", compilation.lexical_errors.len());
			}
			println!("Compiled {} into {} ({} lines)", path.display(), output.display(), compilation.code.len());
		}
		Mode::Tokens { path } => {
			let source = Pascaler::read_source(&path)?;
			for token in Pascaler::tokens(&source)? {
				println!("{token}");
			}
		}
		Mode::Ast { path } => {
			let source = Pascaler::read_source(&path)?;
			let (program, _) = Pascaler::parse(&source)?;
			print!("{program}");
		}
		Mode::Symbols { path } => {
			let source = Pascaler::read_source(&path)?;
			print!("{}", Pascaler::analyze(&source)?);
		}
	}
	Ok(())
}

fn write_output(path: &Path, code: &str) -> Result<(), CompileError> {
	fs::write(path, code).with_context(|| format!("Failed write output file {}", path.display()))?;
	Ok(())
}
