//! Turns Pascal source text into tokens.
//!
//! Keywords are part of the shape of the grammar, so the parser wants to know
//! not just that it has a lexeme for some identifier, but that it has a
//! reserved word, and which one it is. Pascal reserved words are case
//! insensitive: `BEGIN`, `Begin` and `begin` are the same token, while
//! identifiers keep the spelling they were written with.
//!
//! Literal tokens carry their value: the scanner already walked every
//! character of `3.14` or `'it''s'`, so it converts the text right away.
//!
//! Lexical errors never stop the scan. The offending character is skipped,
//! the error is recorded and logged, and scanning picks up at the next
//! character, so the parser always receives a complete token stream.
mod token;

use std::{borrow::Cow, iter::Peekable, str::CharIndices};

use TokenType::*;
use anyhow::Context;
use log::{debug, warn};
pub use token::*;

use crate::error::{
	CompileError,
	scanner::{ScanError, ScanErrorType, ScannerError},
};

/// A scanner for Pascal source code
pub struct Scanner<'a> {
	/// User input source code
	source:      &'a str,
	/// User input source code iterator
	source_iter: Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:       usize,
	/// Points just past the character currently being considered
	cursor:      usize,
	/// Tracks what source line `cursor` is on so tokens know their location.
	line:        usize,
}

/// Tokens of one source unit, terminated by `Eof`, plus the lexical errors
/// that were skipped over.
#[derive(Debug)]
pub struct Scanned<'a> {
	pub tokens: Vec<Token<'a>>,
	pub errors: Vec<ScanError>,
}

/// Scanner position to fall back to when a string or comment never closes.
struct Checkpoint<'a> {
	source_iter: Peekable<CharIndices<'a>>,
	cursor:      usize,
	line:        usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, start: 0, cursor: 0, line: 1 }
	}

	/// Scan all tokens from the source code
	pub fn scan_tokens(mut self) -> Result<Scanned<'a>, CompileError> {
		let mut tokens = Vec::new();
		let mut errors = Vec::new();
		while let Some(&(index, _)) = self.source_iter.peek() {
			// We are at the beginning of the next lexeme.
			self.start = index;
			self.cursor = self.start;
			match self.scan_token(&mut tokens) {
				Err(ScannerError::ScanError(e)) => {
					warn!("Scan error: {e}");
					errors.push(e);
				}
				Err(ScannerError::InternalError(e)) => {
					return Err(e.into());
				}
				Ok(_) => {}
			}
		}
		tokens.push(Token::new(Eof, "", self.line));
		debug!("scanned {} tokens with {} lexical errors", tokens.len(), errors.len());
		Ok(Scanned { tokens, errors })
	}

	/// Scan a single token from the source code
	fn scan_token(&mut self, tokens: &mut Vec<Token<'a>>) -> Result<(), ScannerError> {
		let next_char = self.advance().context("Unexpected EOF")?;
		#[rustfmt::skip]
		let r#type = match next_char {
			'(' => if self.peek() == Some('*') { self.paren_comment()? } else { LeftParen },
			')' => RightParen,
			'[' => LeftBracket,
			']' => RightBracket,
			',' => Comma,
			';' => Semicolon,
			'+' => Plus,
			'-' => Minus,
			'*' => Star,
			'/' => Slash,
			'=' => Equal,
			':' => if self.match_next('=') { Assign } else { Colon },
			'.' => if self.match_next('.') { DotDot } else { Dot },
			'<' => if self.match_next('=') { LessEqual } else if self.match_next('>') { NotEqual } else { Less },
			'>' => if self.match_next('=') { GreaterEqual } else { Greater },
			'{' => self.brace_comment()?,
			' ' | '\r' | '\t' => EmptyChar,
			'\n' => { self.line += 1; NewLine }
			'\'' => self.string()?,
			c if c.is_ascii_digit() => self.number()?,
			c if c.is_ascii_alphabetic() => self.identifier(),
			_ => return Err(ScanError::new(self.line, ScanErrorType::UnexpectedCharacter(next_char)).into()),
		};

		if !r#type.is_ignored() {
			let lexeme = &self.source[self.start..self.cursor];
			tokens.push(Token::new(r#type, lexeme, self.line));
		}

		Ok(())
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Peek the second character ahead
	fn peek_second(&mut self) -> Option<char> {
		let mut it = self.source_iter.clone();
		it.next()?;
		it.peek().map(|&(_, c)| c)
	}

	fn checkpoint(&self) -> Checkpoint<'a> {
		Checkpoint { source_iter: self.source_iter.clone(), cursor: self.cursor, line: self.line }
	}

	fn restore(&mut self, checkpoint: Checkpoint<'a>) {
		self.source_iter = checkpoint.source_iter;
		self.cursor = checkpoint.cursor;
		self.line = checkpoint.line;
	}

	/// Scan a `{ ... }` comment, the opening brace is already consumed
	fn brace_comment(&mut self) -> Result<TokenType<'a>, ScannerError> {
		let checkpoint = self.checkpoint();
		while let Some(c) = self.advance() {
			match c {
				'}' => return Ok(Comment),
				'\n' => self.line += 1,
				_ => {}
			}
		}
		self.restore(checkpoint);
		Err(ScanError::new(self.line, ScanErrorType::UnterminatedComment).into())
	}

	/// Scan a `(* ... *)` comment, only the `(` is consumed
	fn paren_comment(&mut self) -> Result<TokenType<'a>, ScannerError> {
		let checkpoint = self.checkpoint();
		self.advance(); // consume '*'
		while let Some(c) = self.advance() {
			if c == '*' && self.match_next(')') {
				return Ok(Comment);
			}
			if c == '\n' {
				self.line += 1;
			}
		}
		self.restore(checkpoint);
		Err(ScanError::new(self.line, ScanErrorType::UnterminatedComment).into())
	}

	/// Scan a string literal, `''` inside the quotes stands for one quote.
	/// A string ends on the line it starts; without its closing quote the rest
	/// of the line is dropped.
	fn string(&mut self) -> Result<TokenType<'a>, ScannerError> {
		let mut escaped = false;
		loop {
			match self.peek() {
				None | Some('\n') => {
					return Err(ScanError::new(self.line, ScanErrorType::UnterminatedString).into());
				}
				Some('\'') => {
					self.advance();
					if self.peek() != Some('\'') {
						break;
					}
					self.advance();
					escaped = true;
				}
				Some(_) => {
					self.advance();
				}
			}
		}

		let raw = &self.source[self.start + 1..self.cursor - 1];
		let value = if escaped { Cow::Owned(raw.replace("''", "'")) } else { Cow::Borrowed(raw) };
		Ok(StringLiteral(value))
	}

	/// Scan an integer or real literal
	fn number(&mut self) -> Result<TokenType<'a>, ScannerError> {
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.advance();
		}

		// A fractional part needs a digit after the dot, `1..5` is a range.
		if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
			self.advance(); // consume '.'
			while self.peek().is_some_and(|c| c.is_ascii_digit()) {
				self.advance();
			}
			let s = &self.source[self.start..self.cursor];
			return Ok(RealLiteral(s.parse().context("Failed to parse real literal")?));
		}

		let s = &self.source[self.start..self.cursor];
		s.parse()
			.map(IntegerLiteral)
			.map_err(|_| ScanError::new(self.line, ScanErrorType::IntegerOutOfRange(s.to_string())).into())
	}

	/// Scan an identifier or keyword
	fn identifier(&mut self) -> TokenType<'a> {
		while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
			self.advance();
		}
		let text = &self.source[self.start..self.cursor];
		TokenType::keyword_or_identifier(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scan(input: &str, ok: bool) {
		let scanned = Scanner::new(input).scan_tokens().unwrap();
		assert_eq!(scanned.errors.is_empty(), ok, "{input:?}: {:?}", scanned.errors);
	}

	fn types(input: &str) -> Vec<TokenType<'_>> {
		Scanner::new(input).scan_tokens().unwrap().tokens.into_iter().map(|t| t.r#type).collect()
	}

	#[test]
	fn scan_tokens() {
		scan("", true);
		scan("(", true);
		scan("()[]", true);
		scan(" ( ) ", true);
		scan("@", false);
		scan("x := 1 # 2", false);
		scan("'世界'", true);
		scan("12345", true);
		scan("program Test; begin end.", true);
	}

	#[test]
	fn scan_operators() {
		assert_eq!(
			types("+ - * / := = <> < <= > >= .. . , ; :"),
			vec![
				Plus,
				Minus,
				Star,
				Slash,
				Assign,
				Equal,
				NotEqual,
				Less,
				LessEqual,
				Greater,
				GreaterEqual,
				DotDot,
				Dot,
				Comma,
				Semicolon,
				Colon,
				Eof
			]
		);
	}

	#[test]
	fn scan_numbers() {
		assert_eq!(types("42"), vec![IntegerLiteral(42), Eof]);
		assert_eq!(types("3.14"), vec![RealLiteral(3.14), Eof]);
		assert_eq!(types("1..5"), vec![IntegerLiteral(1), DotDot, IntegerLiteral(5), Eof]);
		assert_eq!(types("1."), vec![IntegerLiteral(1), Dot, Eof]);
		scan("99999999999999999999", false);
	}

	#[test]
	fn scan_strings() {
		assert_eq!(types("'hello'"), vec![StringLiteral(Cow::Borrowed("hello")), Eof]);
		assert_eq!(types("''"), vec![StringLiteral(Cow::Borrowed("")), Eof]);
		assert_eq!(types("'it''s'"), vec![StringLiteral(Cow::Owned("it's".to_string())), Eof]);
		scan("'unterminated", false);
	}

	#[test]
	fn scan_keywords_ignore_case() {
		assert_eq!(types("BEGIN Begin begin"), vec![Begin, Begin, Begin, Eof]);
		assert_eq!(types("WriteLn ReadLn Integer"), vec![Writeln, Readln, IntegerType, Eof]);
		assert_eq!(types("div mod and or not"), vec![Div, Mod, And, Or, Not, Eof]);
		assert_eq!(types("downto"), vec![Downto, Eof]);
	}

	#[test]
	fn scan_identifiers() {
		assert_eq!(types("x"), vec![Identifier("x"), Eof]);
		assert_eq!(types("myVar_12"), vec![Identifier("myVar_12"), Eof]);
		assert_eq!(types("Beginning"), vec![Identifier("Beginning"), Eof]);
		scan("_name", false);
	}

	#[test]
	fn scan_comments() {
		assert_eq!(types("{ a comment } x"), vec![Identifier("x"), Eof]);
		assert_eq!(types("(* another\n comment *) x"), vec![Identifier("x"), Eof]);
		assert_eq!(types("(**) x"), vec![Identifier("x"), Eof]);
		scan("{ unterminated", false);
		scan("(* unterminated", false);
	}

	#[test]
	fn unterminated_comment_skips_only_the_opening_character() {
		let scanned = Scanner::new("{ x").scan_tokens().unwrap();
		assert_eq!(scanned.errors.len(), 1);
		assert_eq!(scanned.errors[0].error_type(), &ScanErrorType::UnterminatedComment);
		let kinds: Vec<_> = scanned.tokens.into_iter().map(|t| t.r#type).collect();
		assert_eq!(kinds, vec![Identifier("x"), Eof]);
	}

	#[test]
	fn scan_recovers_after_illegal_character() {
		let scanned = Scanner::new("a @ b").scan_tokens().unwrap();
		assert_eq!(scanned.errors.len(), 1);
		assert_eq!(scanned.errors[0].error_type(), &ScanErrorType::UnexpectedCharacter('@'));
		let kinds: Vec<_> = scanned.tokens.into_iter().map(|t| t.r#type).collect();
		assert_eq!(kinds, vec![Identifier("a"), Identifier("b"), Eof]);
	}

	#[test]
	fn scan_tracks_lines() {
		let scanned = Scanner::new("program\n{ one\ntwo }\nx\n'a b' y").scan_tokens().unwrap();
		let lines: Vec<_> = scanned.tokens.iter().map(|t| t.line).collect();
		assert_eq!(lines, vec![1, 4, 5, 5, 5]);
	}

	#[test]
	fn strings_end_at_the_line_break() {
		let scanned = Scanner::new("x := 'a\nb';\ny").scan_tokens().unwrap();
		assert_eq!(scanned.errors.len(), 2);
		assert_eq!(scanned.errors[0].error_type(), &ScanErrorType::UnterminatedString);
		assert_eq!(scanned.errors[0].line(), 1);
		assert_eq!(scanned.errors[1].line(), 2);
		let tokens: Vec<_> = scanned.tokens.into_iter().map(|t| (t.r#type, t.line)).collect();
		assert_eq!(tokens, vec![
			(Identifier("x"), 1),
			(Assign, 1),
			(Identifier("b"), 2),
			(Identifier("y"), 3),
			(Eof, 3)
		]);
	}
}
