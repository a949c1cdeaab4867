use std::borrow::Cow;

/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
	pub r#type: TokenType<'a>,
	pub lexeme: &'a str,
	pub line:   usize,
}

impl<'a> Token<'a> {
	pub fn new(r#type: TokenType<'a>, lexeme: &'a str, line: usize) -> Self { Self { r#type, lexeme, line } }
}

/// The different types of tokens in the Pascal subset. Literal kinds carry
/// their value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType<'a> {
	/// New Line Character `\n`.
	NewLine,
	/// Empty Character: ` `, `\r`, `\t`.
	EmptyChar,
	/// Comment `{ ... }` or `(* ... *)`.
	Comment,
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Left bracket `[`.
	LeftBracket,
	/// Right bracket `]`.
	RightBracket,
	/// Comma `,`.
	Comma,
	/// Semicolon `;`.
	Semicolon,
	/// Colon `:`.
	Colon,
	/// Dot `.`.
	Dot,
	/// Range `..`.
	DotDot,
	/// Plus `+`.
	Plus,
	/// Minus `-`.
	Minus,
	/// Asterisk `*`.
	Star,
	/// Slash `/`.
	Slash,
	/// Assignment `:=`.
	Assign,
	/// Equal `=`.
	Equal,
	/// Not equal `<>`.
	NotEqual,
	/// Less than `<`.
	Less,
	/// Less than or equal `<=`.
	LessEqual,
	/// Greater than `>`.
	Greater,
	/// Greater than or equal `>=`.
	GreaterEqual,
	/// Identifier, e.g. variable or routine name.
	Identifier(&'a str),
	/// Integer literal, e.g. `42`.
	IntegerLiteral(i64),
	/// Real literal, e.g. `3.14`.
	RealLiteral(f64),
	/// String literal with `''` already unescaped, e.g. `'it''s'`.
	StringLiteral(Cow<'a, str>),
	Program,
	Begin,
	End,
	Var,
	Const,
	Type,
	Array,
	Of,
	Function,
	Procedure,
	/// `integer` type keyword.
	IntegerType,
	/// `real` type keyword.
	RealType,
	/// `boolean` type keyword.
	BooleanType,
	/// `string` type keyword.
	StringType,
	If,
	Then,
	Else,
	While,
	Do,
	For,
	To,
	Downto,
	Div,
	Mod,
	And,
	Or,
	Not,
	True,
	False,
	Read,
	Readln,
	Write,
	Writeln,
	/// End of file/input.
	Eof,
}

impl<'a> TokenType<'a> {
	pub fn is_ignored(&self) -> bool {
		matches!(self, TokenType::EmptyChar | TokenType::NewLine | TokenType::Comment)
	}

	/// Reserved words are matched without regard to case.
	pub fn keyword_or_identifier(value: &'a str) -> Self {
		match value.to_ascii_lowercase().as_str() {
			"program" => TokenType::Program,
			"begin" => TokenType::Begin,
			"end" => TokenType::End,
			"var" => TokenType::Var,
			"const" => TokenType::Const,
			"type" => TokenType::Type,
			"array" => TokenType::Array,
			"of" => TokenType::Of,
			"function" => TokenType::Function,
			"procedure" => TokenType::Procedure,
			"integer" => TokenType::IntegerType,
			"real" => TokenType::RealType,
			"boolean" => TokenType::BooleanType,
			"string" => TokenType::StringType,
			"if" => TokenType::If,
			"then" => TokenType::Then,
			"else" => TokenType::Else,
			"while" => TokenType::While,
			"do" => TokenType::Do,
			"for" => TokenType::For,
			"to" => TokenType::To,
			"downto" => TokenType::Downto,
			"div" => TokenType::Div,
			"mod" => TokenType::Mod,
			"and" => TokenType::And,
			"or" => TokenType::Or,
			"not" => TokenType::Not,
			"true" => TokenType::True,
			"false" => TokenType::False,
			"read" => TokenType::Read,
			"readln" => TokenType::Readln,
			"write" => TokenType::Write,
			"writeln" => TokenType::Writeln,
			_ => TokenType::Identifier(value),
		}
	}

	/// Kind name used by diagnostics and the token dump.
	#[rustfmt::skip]
	pub fn name(&self) -> &'static str {
		use TokenType::*;
		match self {
			NewLine => "NEWLINE", EmptyChar => "WHITESPACE", Comment => "COMMENT",
			LeftParen => "LPAREN", RightParen => "RPAREN",
			LeftBracket => "LBRACKET", RightBracket => "RBRACKET",
			Comma => "COMMA", Semicolon => "SEMICOLON", Colon => "COLON", Dot => "DOT", DotDot => "DOTDOT",
			Plus => "PLUS", Minus => "MINUS", Star => "TIMES", Slash => "DIVIDE", Assign => "ASSIGN",
			Equal => "EQ", NotEqual => "NEQ", Less => "LT", LessEqual => "LTE", Greater => "GT", GreaterEqual => "GTE",
			Identifier(_) => "ID", IntegerLiteral(_) => "INTEGER_CONST", RealLiteral(_) => "REAL_CONST",
			StringLiteral(_) => "STRING_CONST",
			Program => "PROGRAM", Begin => "BEGIN", End => "END", Var => "VAR", Const => "CONST", Type => "TYPE",
			Array => "ARRAY", Of => "OF", Function => "FUNCTION", Procedure => "PROCEDURE",
			IntegerType => "INTEGER", RealType => "REAL", BooleanType => "BOOLEAN", StringType => "STRING",
			If => "IF", Then => "THEN", Else => "ELSE", While => "WHILE", Do => "DO",
			For => "FOR", To => "TO", Downto => "DOWNTO",
			Div => "DIV", Mod => "MOD", And => "AND", Or => "OR", Not => "NOT", True => "TRUE", False => "FALSE",
			Read => "READ", Readln => "READLN", Write => "WRITE", Writeln => "WRITELN",
			Eof => "EOF",
		}
	}
}
