//! A small interpreter for the stack machine instructions the compiler emits,
//! enough to check what generated programs do.

use std::{
	collections::{HashMap, VecDeque},
	fmt::Write,
	path::PathBuf,
};

use pascaler::{Compilation, Pascaler};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Int(i64),
	Float(f64),
	Str(String),
}

impl Value {
	fn int(&self) -> i64 {
		match self {
			Value::Int(n) => *n,
			other => panic!("expected an integer, found {other:?}"),
		}
	}

	fn float(&self) -> f64 {
		match self {
			Value::Int(n) => *n as f64,
			Value::Float(n) => *n,
			other => panic!("expected a number, found {other:?}"),
		}
	}
}

/// Outcome of running a program: what it wrote and its globals at `stop`.
#[derive(Debug)]
pub struct Run {
	pub output:  String,
	pub globals: Vec<Value>,
}

impl Run {
	pub fn global(&self, index: usize) -> &Value { &self.globals[index] }
}

const STEP_LIMIT: usize = 1_000_000;

/// Execute `code`, feeding `input` to `read` one entry at a time.
pub fn execute(code: &[String], input: &[&str]) -> Run {
	let program: Vec<&str> =
		code.iter().map(|line| line.trim()).filter(|line| !line.is_empty() && !line.starts_with("//")).collect();
	let labels: HashMap<&str, usize> = program
		.iter()
		.enumerate()
		.filter_map(|(at, line)| line.strip_suffix(':').map(|label| (label, at)))
		.collect();

	let mut input: VecDeque<&str> = input.iter().copied().collect();
	let mut stack: Vec<Value> = Vec::new();
	let mut output = String::new();
	let mut pc = 0;

	for _ in 0..STEP_LIMIT {
		let line = program[pc];
		pc += 1;
		if line.ends_with(':') {
			continue;
		}
		let (instruction, argument) = line.split_once(' ').unwrap_or((line, ""));
		match instruction {
			"start" => {}
			"stop" => return Run { output, globals: stack },
			"pushi" => stack.push(Value::Int(argument.parse().unwrap())),
			"pushf" => stack.push(Value::Float(argument.parse().unwrap())),
			"pushs" => stack.push(Value::Str(unquote(argument))),
			"pushg" => {
				let value = stack[argument.parse::<usize>().unwrap()].clone();
				stack.push(value);
			}
			"storeg" => {
				let value = stack.pop().unwrap();
				stack[argument.parse::<usize>().unwrap()] = value;
			}
			"loadn" => {
				let address = stack.pop().unwrap().int() as usize;
				let value = stack[address].clone();
				stack.push(value);
			}
			"storen" => {
				let address = stack.pop().unwrap().int() as usize;
				let value = stack.pop().unwrap();
				stack[address] = value;
			}
			"not" => {
				let value = stack.pop().unwrap().int();
				stack.push(Value::Int(i64::from(value == 0)));
			}
			"jz" => {
				if stack.pop().unwrap().int() == 0 {
					pc = labels[argument];
				}
			}
			"jump" => pc = labels[argument],
			"writei" => write!(output, "{}", stack.pop().unwrap().int()).unwrap(),
			"writef" => write!(output, "{}", stack.pop().unwrap().float()).unwrap(),
			"writes" => match stack.pop().unwrap() {
				Value::Str(text) => output.push_str(&text),
				other => panic!("writes needs a string, found {other:?}"),
			},
			"writeln" => output.push('\n'),
			"read" => stack.push(Value::Str(input.pop_front().expect("program read past the end of input").to_string())),
			"atoi" => match stack.pop().unwrap() {
				Value::Str(text) => stack.push(Value::Int(text.trim().parse().unwrap())),
				other => panic!("atoi needs a string, found {other:?}"),
			},
			operator => {
				let right = stack.pop().unwrap();
				let left = stack.pop().unwrap();
				stack.push(arithmetic(operator, &left, &right));
			}
		}
	}
	panic!("program did not stop within {STEP_LIMIT} steps");
}

/// Undo the escapes of a `pushs` operand.
fn unquote(literal: &str) -> String {
	let inner = literal.strip_prefix('"').and_then(|s| s.strip_suffix('"')).expect("pushs needs a quoted operand");
	let mut text = String::new();
	let mut chars = inner.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			text.push(c);
			continue;
		}
		match chars.next() {
			Some('n') => text.push('\n'),
			Some('r') => text.push('\r'),
			Some(escaped) => text.push(escaped),
			None => panic!("dangling escape in {literal}"),
		}
	}
	text
}

fn arithmetic(operator: &str, left: &Value, right: &Value) -> Value {
	if let (Value::Int(l), Value::Int(r)) = (left, right) {
		let (l, r) = (*l, *r);
		#[rustfmt::skip]
		let value = match operator {
			"add" => l + r, "sub" => l - r, "mul" => l * r, "div" => l / r, "mod" => l % r,
			"equal" => i64::from(l == r), "inf" => i64::from(l < r), "sup" => i64::from(l > r),
			"infeq" => i64::from(l <= r), "supeq" => i64::from(l >= r),
			"and" => i64::from(l != 0 && r != 0), "or" => i64::from(l != 0 || r != 0),
			other => panic!("unknown instruction {other}"),
		};
		return Value::Int(value);
	}
	if let (Value::Str(l), Value::Str(r)) = (left, right) {
		return match operator {
			"equal" => Value::Int(i64::from(l == r)),
			other => panic!("{other} on strings"),
		};
	}
	let (l, r) = (left.float(), right.float());
	#[rustfmt::skip]
	let value = match operator {
		"add" => return Value::Float(l + r), "sub" => return Value::Float(l - r),
		"mul" => return Value::Float(l * r), "div" => return Value::Float(l / r),
		"equal" => l == r, "inf" => l < r, "sup" => l > r, "infeq" => l <= r, "supeq" => l >= r,
		other => panic!("unknown instruction {other} on reals"),
	};
	Value::Int(i64::from(value))
}

pub fn fixture(name: &str) -> PathBuf { PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name) }

pub fn init_logging() { let _ = env_logger::builder().is_test(true).try_init(); }

pub fn compile(source: &str) -> Compilation {
	init_logging();
	Pascaler::default().compile_source(source).unwrap()
}

/// Compile `source` and run it.
pub fn run(source: &str, input: &[&str]) -> Run { execute(&compile(source).code, input) }
