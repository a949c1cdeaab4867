use std::path::PathBuf;

use palc::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pascaler", after_long_help = "Compiles a Pascal subset to stack virtual machine code.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Compile a source file
	Compile {
		path:          PathBuf,
		/// Output file, defaults to the source path with a `.vm` extension
		#[arg(short, long)]
		output:        Option<PathBuf>,
		/// Emit three-address code instead of stack machine code
		#[arg(long)]
		three_address: bool,
		/// Interleave comments describing declarations and statements
		#[arg(long)]
		annotate:      bool,
	},
	/// Print the tokens of a source file
	Tokens { path: PathBuf },
	/// Print the syntax tree of a source file
	Ast { path: PathBuf },
	/// Print the symbol table of a source file
	Symbols { path: PathBuf },
}
