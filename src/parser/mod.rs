//! The `Scanner` use `Lexical grammar`, implement `alphabet` as `Characters`,
//! `string` as `Lexme` or `Token`
//! The `Parser` use `Syntactic grammar`, implement `alphabet` as `Tokens`,
//! `string` as `Program`
//!
//! A recursive descent parser: each rule of the grammar becomes a method, and
//! the call stack mirrors the derivation. The first token that cannot continue
//! the current rule ends the parse; there is no recovery and no partial tree.
//!
//! |Name|Operators|Associates
//! --|--|--
//! Or|or|Left
//! And|and|Left
//! Relational|= <> < > <= >=|Left
//! Additive|+ -|Left
//! Multiplicative|* / div mod|Left
//! Unary|- not|Right
//!
//! Grammar:
//!
//! ``` BNF
//! program        → "program" ID ";" declarations compound "." EOF ;
//! declarations   → ( var_decl | const_decl | type_decl | function | procedure )* ;
//! var_decl       → "var" ( id_list ":" type ";" )+ ;
//! const_decl     → "const" ( ID "=" expression ";" )+ ;
//! type_decl      → "type" ( ID "=" type ";" )+ ;
//! type           → simple_type | "array" "[" "-"? INT ".." "-"? INT "]" "of" simple_type ;
//! function       → "function" ID ( "(" params? ")" )? ":" simple_type ";" declarations compound ";" ;
//! procedure      → "procedure" ID ( "(" params? ")" )? ";" declarations compound ";" ;
//! params         → id_list ":" simple_type ( ";" id_list ":" simple_type )* ;
//! compound       → "begin" statement ( ";" statement )* "end" ;
//! statement      → assignment | compound | if | while | for | read | write | call | ε ;
//! if             → "if" expression "then" statement ( "else" statement )? ;
//! while          → "while" expression "do" statement ;
//! for            → "for" ID ":=" expression ( "to" | "downto" ) expression "do" statement ;
//! read           → ( "read" | "readln" ) "(" variable ( "," variable )* ")" | "readln" ;
//! write          → ( "write" | "writeln" ) "(" expression ( "," expression )* ")" | "writeln" ;
//! call           → ID ( "(" ( expression ( "," expression )* )? ")" )? ;
//! variable       → ID ( "[" expression "]" )? ;
//! expression     → and ( "or" and )* ;
//! and            → relational ( "and" relational )* ;
//! relational     → additive ( ( "=" | "<>" | "<" | ">" | "<=" | ">=" ) additive )* ;
//! additive       → multiplicative ( ( "+" | "-" ) multiplicative )* ;
//! multiplicative → unary ( ( "*" | "/" | "div" | "mod" ) unary )* ;
//! unary          → ( "-" | "not" ) unary | primary ;
//! primary        → INT | REAL | STRING | "true" | "false" | ID "(" args ")" | variable | "(" expression ")" ;
//! ```

pub mod builder;
pub mod expression;

use std::{iter::Peekable, mem::discriminant, vec::IntoIter};

use TokenType::*;
use anyhow::anyhow;
use log::debug;

use crate::{
	declaration::{
		ArrayType, ConstDeclaration, ConstItem, Declaration, Declarations, FunctionDeclaration, IdList, Parameter,
		ParameterList, ProcedureDeclaration, Program, SimpleType, TypeDeclaration, TypeItem, TypeSpec, VarDeclaration,
		VarItem,
	},
	error::{
		CompileError,
		parser::{ParseError, ParseErrorType, ParserError},
	},
	parser::{
		builder::ListBuilder,
		expression::{ArgumentList, BinaryOp, Expression, Number, UnaryOp, VariableRef},
	},
	scanner::{Token, TokenType},
	statement::{CompoundStatement, ForDirection, Statement},
};

/// Builds a `Program` from the scanner's tokens.
pub struct Parser<'a> {
	/// The tokens to parse.
	tokens: Peekable<IntoIter<Token<'a>>>,
}

impl<'a> Parser<'a> {
	pub fn new(tokens: Vec<Token<'a>>) -> Self { Self { tokens: tokens.into_iter().peekable() } }

	/// Parse a whole program, stopping at the first syntax error.
	pub fn parse(mut self) -> Result<Program, CompileError> {
		let program = self.program()?;
		debug!("parsed program '{}' with {} declaration section(s)", program.name, program.declarations.len());
		Ok(program)
	}

	fn program(&mut self) -> Result<Program, ParserError> {
		let line = self.consume(TokenType::Program, "'program'")?.line;
		let (name, _) = self.identifier("program name")?;
		self.consume(Semicolon, "';'")?;
		let declarations = self.declarations()?;
		let body = self.compound_statement()?;
		self.consume(Dot, "'.'")?;
		self.consume(Eof, "end of input")?;
		Ok(Program { name, declarations, body, line })
	}

	/// Parse declaration sections until the main block begins.
	fn declarations(&mut self) -> Result<Declarations, ParserError> {
		let mut declarations = ListBuilder::new();
		loop {
			let declaration = match self.peek()?.r#type {
				Var => Declaration::Var(self.var_declaration()?),
				Const => Declaration::Const(self.const_declaration()?),
				Type => Declaration::Type(self.type_declaration()?),
				Function => Declaration::Function(self.function_declaration()?),
				Procedure => Declaration::Procedure(self.procedure_declaration()?),
				_ => break,
			};
			declarations.push(declaration);
		}
		Ok(declarations.finish())
	}

	fn var_declaration(&mut self) -> Result<VarDeclaration, ParserError> {
		self.consume(Var, "'var'")?;
		let mut items = ListBuilder::new();
		loop {
			let names = self.id_list()?;
			self.consume(Colon, "':'")?;
			let type_spec = self.type_spec()?;
			self.consume(Semicolon, "';'")?;
			items.push(VarItem { line: type_spec.line(), names, type_spec });
			if !self.check_identifier()? {
				break;
			}
		}
		Ok(items.finish())
	}

	fn const_declaration(&mut self) -> Result<ConstDeclaration, ParserError> {
		self.consume(Const, "'const'")?;
		let mut items = ListBuilder::new();
		loop {
			let (name, line) = self.identifier("constant name")?;
			self.consume(Equal, "'='")?;
			let value = self.expression()?;
			self.consume(Semicolon, "';'")?;
			items.push(ConstItem { name, value, line });
			if !self.check_identifier()? {
				break;
			}
		}
		Ok(items.finish())
	}

	fn type_declaration(&mut self) -> Result<TypeDeclaration, ParserError> {
		self.consume(Type, "'type'")?;
		let mut items = ListBuilder::new();
		loop {
			let (name, line) = self.identifier("type name")?;
			self.consume(Equal, "'='")?;
			let type_spec = self.type_spec()?;
			self.consume(Semicolon, "';'")?;
			items.push(TypeItem { name, type_spec, line });
			if !self.check_identifier()? {
				break;
			}
		}
		Ok(items.finish())
	}

	fn function_declaration(&mut self) -> Result<FunctionDeclaration, ParserError> {
		let line = self.consume(Function, "'function'")?.line;
		let (name, _) = self.identifier("function name")?;
		let parameters = self.routine_parameters()?;
		self.consume(Colon, "':'")?;
		let (return_type, _) = self.simple_type()?;
		self.consume(Semicolon, "';'")?;
		let declarations = self.declarations()?;
		let body = self.compound_statement()?;
		self.consume(Semicolon, "';'")?;
		Ok(FunctionDeclaration { name, parameters, return_type, declarations, body, line })
	}

	fn procedure_declaration(&mut self) -> Result<ProcedureDeclaration, ParserError> {
		let line = self.consume(Procedure, "'procedure'")?.line;
		let (name, _) = self.identifier("procedure name")?;
		let parameters = self.routine_parameters()?;
		self.consume(Semicolon, "';'")?;
		let declarations = self.declarations()?;
		let body = self.compound_statement()?;
		self.consume(Semicolon, "';'")?;
		Ok(ProcedureDeclaration { name, parameters, declarations, body, line })
	}

	/// Optional parenthesised parameter groups of a routine header.
	fn routine_parameters(&mut self) -> Result<ParameterList, ParserError> {
		let mut parameters = ListBuilder::new();
		if !self.check(&LeftParen)? {
			return Ok(parameters.finish());
		}
		self.advance()?; // consume '('
		if !self.check(&RightParen)? {
			loop {
				let names = self.id_list()?;
				let line = self.consume(Colon, "':'")?.line;
				let (ty, _) = self.simple_type()?;
				parameters.push(Parameter { names, ty, line });
				if !self.check(&Semicolon)? {
					break;
				}
				self.advance()?; // consume ';'
			}
		}
		self.consume(RightParen, "')'")?;
		Ok(parameters.finish())
	}

	fn id_list(&mut self) -> Result<IdList, ParserError> {
		let mut names = ListBuilder::new();
		names.push(self.identifier("identifier")?.0);
		while self.check(&Comma)? {
			self.advance()?; // consume ','
			names.push(self.identifier("identifier")?.0);
		}
		Ok(names.finish())
	}

	fn type_spec(&mut self) -> Result<TypeSpec, ParserError> {
		if self.check(&Array)? {
			return Ok(TypeSpec::Array(self.array_type()?));
		}
		let (ty, line) = self.simple_type()?;
		Ok(TypeSpec::Simple { ty, line })
	}

	fn simple_type(&mut self) -> Result<(SimpleType, usize), ParserError> {
		let ty = match self.peek()?.r#type {
			IntegerType => SimpleType::Integer,
			RealType => SimpleType::Real,
			BooleanType => SimpleType::Boolean,
			StringType => SimpleType::String,
			_ => return Err(self.unexpected("type")),
		};
		let line = self.advance()?.line;
		Ok((ty, line))
	}

	fn array_type(&mut self) -> Result<ArrayType, ParserError> {
		let line = self.consume(Array, "'array'")?.line;
		self.consume(LeftBracket, "'['")?;
		let low = self.integer_constant()?;
		self.consume(DotDot, "'..'")?;
		let high = self.integer_constant()?;
		self.consume(RightBracket, "']'")?;
		self.consume(Of, "'of'")?;
		let (element, _) = self.simple_type()?;
		Ok(ArrayType { low, high, element, line })
	}

	/// Array bound, optionally negated.
	fn integer_constant(&mut self) -> Result<i64, ParserError> {
		let negative = self.check(&Minus)?;
		if negative {
			self.advance()?;
		}
		match self.peek()?.r#type {
			IntegerLiteral(value) => {
				self.advance()?;
				Ok(if negative { -value } else { value })
			}
			_ => Err(self.unexpected("integer constant")),
		}
	}

	/// Parse `begin ... end`, empty statements are dropped from the list.
	fn compound_statement(&mut self) -> Result<CompoundStatement, ParserError> {
		self.consume(Begin, "'begin'")?;
		let mut statements = ListBuilder::new();
		loop {
			let statement = self.statement()?;
			if !matches!(statement, Statement::Empty { .. }) {
				statements.push(statement);
			}
			if !self.check(&Semicolon)? {
				break;
			}
			self.advance()?; // consume ';'
		}
		self.consume(End, "';' or 'end'")?;
		Ok(statements.finish())
	}

	fn statement(&mut self) -> Result<Statement, ParserError> {
		match self.peek()?.r#type {
			Begin => Ok(Statement::Compound(self.compound_statement()?)),
			If => self.if_statement(),
			While => self.while_statement(),
			For => self.for_statement(),
			Read | Readln => self.read_statement(),
			Write | Writeln => self.write_statement(),
			Identifier(_) => self.assignment_or_call(),
			_ => Ok(Statement::Empty { line: self.peek()?.line }),
		}
	}

	fn if_statement(&mut self) -> Result<Statement, ParserError> {
		let line = self.consume(If, "'if'")?.line;
		let condition = self.expression()?;
		self.consume(Then, "'then'")?;
		let then_branch = Box::new(self.statement()?);
		// The innermost `if` claims the `else`.
		let else_branch = if self.check(&Else)? {
			self.advance()?; // consume 'else'
			Some(Box::new(self.statement()?))
		} else {
			None
		};
		Ok(Statement::If { condition, then_branch, else_branch, line })
	}

	fn while_statement(&mut self) -> Result<Statement, ParserError> {
		let line = self.consume(While, "'while'")?.line;
		let condition = self.expression()?;
		self.consume(Do, "'do'")?;
		let body = Box::new(self.statement()?);
		Ok(Statement::While { condition, body, line })
	}

	fn for_statement(&mut self) -> Result<Statement, ParserError> {
		let line = self.consume(For, "'for'")?.line;
		let (variable, _) = self.identifier("control variable")?;
		self.consume(Assign, "':='")?;
		let start = self.expression()?;
		let direction = match self.peek()?.r#type {
			To => ForDirection::To,
			Downto => ForDirection::Downto,
			_ => return Err(self.unexpected("'to' or 'downto'")),
		};
		self.advance()?; // consume 'to' or 'downto'
		let end = self.expression()?;
		self.consume(Do, "'do'")?;
		let body = Box::new(self.statement()?);
		Ok(Statement::For { variable, direction, start, end, body, line })
	}

	fn read_statement(&mut self) -> Result<Statement, ParserError> {
		let token = self.advance()?;
		let newline = token.r#type == Readln;
		let line = token.line;
		if !self.check(&LeftParen)? {
			if newline {
				return Ok(Statement::Read { newline, targets: None, line });
			}
			return Err(self.unexpected("'('"));
		}
		self.advance()?; // consume '('
		let mut targets = ListBuilder::new();
		targets.push(self.variable()?);
		while self.check(&Comma)? {
			self.advance()?; // consume ','
			targets.push(self.variable()?);
		}
		self.consume(RightParen, "')'")?;
		Ok(Statement::Read { newline, targets: Some(targets.finish()), line })
	}

	fn write_statement(&mut self) -> Result<Statement, ParserError> {
		let token = self.advance()?;
		let newline = token.r#type == Writeln;
		let line = token.line;
		if !self.check(&LeftParen)? {
			if newline {
				return Ok(Statement::Write { newline, arguments: None, line });
			}
			return Err(self.unexpected("'('"));
		}
		self.advance()?; // consume '('
		let mut arguments = ListBuilder::new();
		arguments.push(self.expression()?);
		while self.check(&Comma)? {
			self.advance()?; // consume ','
			arguments.push(self.expression()?);
		}
		self.consume(RightParen, "')'")?;
		Ok(Statement::Write { newline, arguments: Some(arguments.finish()), line })
	}

	/// Both start with an identifier, the token after it decides.
	fn assignment_or_call(&mut self) -> Result<Statement, ParserError> {
		let (name, line) = self.identifier("identifier")?;
		match self.peek()?.r#type {
			Assign | LeftBracket => {
				let target = self.variable_rest(name, line)?;
				self.consume(Assign, "':='")?;
				let value = self.expression()?;
				Ok(Statement::Assignment { target, value, line })
			}
			LeftParen => {
				let arguments = Some(self.arguments()?);
				Ok(Statement::ProcedureCall { name, arguments, line })
			}
			_ => Ok(Statement::ProcedureCall { name, arguments: None, line }),
		}
	}

	fn variable(&mut self) -> Result<VariableRef, ParserError> {
		let (name, line) = self.identifier("variable")?;
		self.variable_rest(name, line)
	}

	/// Optional `[index]` after an already consumed name.
	fn variable_rest(&mut self, name: String, line: usize) -> Result<VariableRef, ParserError> {
		if !self.check(&LeftBracket)? {
			return Ok(VariableRef::Variable { name, line });
		}
		self.advance()?; // consume '['
		let index = Box::new(self.expression()?);
		self.consume(RightBracket, "']'")?;
		Ok(VariableRef::ArrayAccess { name, index, line })
	}

	/// `( expression, ... )`, possibly empty.
	fn arguments(&mut self) -> Result<ArgumentList, ParserError> {
		self.consume(LeftParen, "'('")?;
		let mut arguments = ListBuilder::new();
		if !self.check(&RightParen)? {
			arguments.push(self.expression()?);
			while self.check(&Comma)? {
				self.advance()?; // consume ','
				arguments.push(self.expression()?);
			}
		}
		self.consume(RightParen, "')'")?;
		Ok(arguments.finish())
	}

	/// Parse `or` expressions.
	fn expression(&mut self) -> Result<Expression, ParserError> {
		let mut expression = self.and()?;
		while self.check(&Or)? {
			let line = self.advance()?.line;
			expression = Expression::binary(expression, BinaryOp::Or, self.and()?, line);
		}
		Ok(expression)
	}

	/// Parse `and` expressions.
	fn and(&mut self) -> Result<Expression, ParserError> {
		let mut expression = self.relational()?;
		while self.check(&And)? {
			let line = self.advance()?.line;
			expression = Expression::binary(expression, BinaryOp::And, self.relational()?, line);
		}
		Ok(expression)
	}

	/// Parse relational expressions.
	fn relational(&mut self) -> Result<Expression, ParserError> {
		let mut expression = self.additive()?;
		loop {
			let operator = match self.peek()?.r#type {
				Equal => BinaryOp::Eq,
				NotEqual => BinaryOp::Ne,
				Less => BinaryOp::Lt,
				Greater => BinaryOp::Gt,
				LessEqual => BinaryOp::Le,
				GreaterEqual => BinaryOp::Ge,
				_ => break,
			};
			let line = self.advance()?.line;
			expression = Expression::binary(expression, operator, self.additive()?, line);
		}
		Ok(expression)
	}

	/// Parse additive expressions.
	fn additive(&mut self) -> Result<Expression, ParserError> {
		let mut expression = self.multiplicative()?;
		loop {
			let operator = match self.peek()?.r#type {
				Plus => BinaryOp::Add,
				Minus => BinaryOp::Sub,
				_ => break,
			};
			let line = self.advance()?.line;
			expression = Expression::binary(expression, operator, self.multiplicative()?, line);
		}
		Ok(expression)
	}

	/// Parse multiplicative expressions.
	fn multiplicative(&mut self) -> Result<Expression, ParserError> {
		let mut expression = self.unary()?;
		loop {
			let operator = match self.peek()?.r#type {
				Star => BinaryOp::Mul,
				Slash => BinaryOp::Divide,
				Div => BinaryOp::Div,
				Mod => BinaryOp::Mod,
				_ => break,
			};
			let line = self.advance()?.line;
			expression = Expression::binary(expression, operator, self.unary()?, line);
		}
		Ok(expression)
	}

	/// Parse unary expressions.
	fn unary(&mut self) -> Result<Expression, ParserError> {
		let operator = match self.peek()?.r#type {
			Minus => UnaryOp::Neg,
			Not => UnaryOp::Not,
			_ => return self.primary(),
		};
		let line = self.advance()?.line;
		Ok(Expression::unary(operator, self.unary()?, line))
	}

	/// Parse primary expressions.
	fn primary(&mut self) -> Result<Expression, ParserError> {
		let token = self.peek()?;
		let line = token.line;
		let expression = match &token.r#type {
			IntegerLiteral(value) => Expression::Number { value: Number::Integer(*value), line },
			RealLiteral(value) => Expression::Number { value: Number::Real(*value), line },
			StringLiteral(value) => Expression::String { value: value.to_string(), line },
			True => Expression::Boolean { value: true, line },
			False => Expression::Boolean { value: false, line },
			Identifier(_) => {
				let (name, line) = self.identifier("identifier")?;
				if self.check(&LeftParen)? {
					let arguments = self.arguments()?;
					return Ok(Expression::FunctionCall { name, arguments, line });
				}
				return Ok(Expression::Variable(self.variable_rest(name, line)?));
			}
			LeftParen => {
				self.advance()?; // consume '('
				let expression = self.expression()?;
				self.consume(RightParen, "')'")?;
				return Ok(expression);
			}
			_ => return Err(self.unexpected("expression")),
		};
		self.advance()?; // consume the literal
		Ok(expression)
	}

	/// Consume an identifier and return its name and line.
	fn identifier(&mut self, expected: &str) -> Result<(String, usize), ParserError> {
		match self.peek()?.r#type {
			Identifier(name) => {
				let name = name.to_string();
				let line = self.advance()?.line;
				Ok((name, line))
			}
			_ => Err(self.unexpected(expected)),
		}
	}

	fn check_identifier(&mut self) -> Result<bool, ParserError> {
		Ok(matches!(self.peek()?.r#type, Identifier(_)))
	}

	/// Whether the current token is of the same kind, payload ignored.
	fn check(&mut self, r#type: &TokenType<'a>) -> Result<bool, ParserError> {
		Ok(discriminant(&self.peek()?.r#type) == discriminant(r#type))
	}

	/// Consume a token of the given kind or fail with what was expected.
	fn consume(&mut self, r#type: TokenType<'a>, expected: &str) -> Result<Token<'a>, ParserError> {
		if self.check(&r#type)? {
			return self.advance();
		}
		Err(self.unexpected(expected))
	}

	/// Syntax error at the current token.
	fn unexpected(&mut self, expected: &str) -> ParserError {
		let expected = expected.to_string();
		match self.tokens.peek() {
			Some(Token { r#type: Eof, line, .. }) => {
				ParseError::new(*line, ParseErrorType::UnexpectedEof { expected }).into()
			}
			Some(token) => {
				let r#type =
					ParseErrorType::UnexpectedToken { found: token.lexeme.to_string(), kind: token.r#type.name(), expected };
				ParseError::new(token.line, r#type).into()
			}
			None => anyhow!("Unexpected EOF").into(),
		}
	}

	/// Advance to the next token.
	fn advance(&mut self) -> Result<Token<'a>, ParserError> {
		self.tokens.next().ok_or_else(|| anyhow!("Unexpected EOF").into())
	}

	/// Peek at the current token.
	fn peek(&mut self) -> Result<&Token<'a>, ParserError> {
		self.tokens.peek().ok_or_else(|| anyhow!("Unexpected EOF").into())
	}
}
