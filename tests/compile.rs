mod common;

use common::{Value, compile, execute, fixture, init_logging, run};
use pascaler::{
	CodegenError, CompileError, CompileOptions, Pascaler, ScanErrorType, SemanticErrorType,
	codegen::{CodegenOptions, Target},
};

fn compile_fixture(name: &str) -> Vec<String> {
	init_logging();
	Pascaler::default().compile_file(fixture(name)).unwrap().code
}

#[test]
fn hello_world() {
	let code = compile_fixture("hello_world.pas");
	assert_eq!(code, ["start", "pushs \"Ola, Mundo!\"", "writes", "writeln", "stop"]);
	assert_eq!(execute(&code, &[]).output, "Ola, Mundo!\n");
}

#[test]
fn largest_of_three() {
	let code = compile_fixture("maior3.pas");
	for (input, largest) in [(["3", "9", "4"], 9), (["12", "9", "4"], 12), (["1", "2", "30"], 30), (["5", "5", "5"], 5)] {
		let run = execute(&code, &input);
		let expected = format!(
			"Introduza o primeiro número: Introduza o segundo número: Introduza o terceiro número: O maior é: {largest}\n"
		);
		assert_eq!(run.output, expected);
		assert_eq!(*run.global(3), Value::Int(largest));
	}
}

#[test]
fn factorial() {
	let code = compile_fixture("fatorial.pas");
	let run = execute(&code, &["5"]);
	assert_eq!(run.output, "Introduza um número inteiro positivo:\nFatorial de 5: 120\n");
	// n, i, fat
	assert_eq!(run.globals, [Value::Int(5), Value::Int(6), Value::Int(120)]);

	let run = execute(&code, &["0"]);
	assert!(run.output.ends_with("Fatorial de 0: 1\n"));
	assert_eq!(*run.global(1), Value::Int(1));
}

#[test]
fn prime_numbers() {
	let code = compile_fixture("numero_primo.pas");
	for (n, prime) in [(2, true), (7, true), (9, false), (13, true), (21, false)] {
		let input = n.to_string();
		let run = execute(&code, &[input.as_str()]);
		let verdict = if prime { "é um número primo" } else { "não é um número primo" };
		assert!(run.output.ends_with(&format!("{n} {verdict}\n")), "{n}: {}", run.output);
	}
}

#[test]
fn array_sum() {
	let code = compile_fixture("soma_array.pas");
	let run = execute(&code, &["4", "8", "15", "16", "23"]);
	assert_eq!(run.output, "Introduza 5 números inteiros:\nA soma dos números é: 66\n");
	// numeros[1..5] in slots 0..4, then i and soma
	assert_eq!(&run.globals[..5], [Value::Int(4), Value::Int(8), Value::Int(15), Value::Int(16), Value::Int(23)]);
	assert_eq!(run.globals[5..], [Value::Int(6), Value::Int(66)]);
}

#[test]
fn declared_routines_compile_but_are_not_emitted() {
	let compilation = Pascaler::default().compile_file(fixture("routines.pas")).unwrap();
	assert!(!compilation.code.iter().any(|line| line.contains("storeg 2")));
	assert_eq!(execute(&compilation.code, &[]).output, "hi2.5\n");

	let dump = compilation.symbols.to_string();
	assert!(dump.contains("global.half: half (constant, integer, scope: global, line: 4), value: 5"));
	assert!(dump.contains("global.square: square (function, integer, scope: global, line: 12), parameters: [x: integer]"));
	assert!(dump.contains("global.square.result: result (variable, integer, scope: global.square, line: 14)"));
	let report = dump.find("global.report.label").unwrap();
	let square = dump.find("global.square.result").unwrap();
	let total = dump.find("global.total").unwrap();
	assert!(report < square && square < total);
}

#[test]
fn arithmetic_matches_direct_evaluation() {
	let cases: [(&str, i64); 8] = [
		("1 + 2 * 3", 1 + 2 * 3),
		("(1 + 2) * 3", (1 + 2) * 3),
		("10 - 4 - 3", 10 - 4 - 3),
		("-2 * 3 + 10 div 3 mod 2", -2 * 3 + 10 / 3 % 2),
		("2 * (3 + 4) - -1", 2 * (3 + 4) + 1),
		("100 div 7 div 2", 100 / 7 / 2),
		("-(5 - 8) * -(2)", -(5 - 8) * -2),
		("17 mod 5 * 3 + 1", 17 % 5 * 3 + 1),
	];
	for (expression, expected) in cases {
		let source = format!("program Arith; var x: integer; begin x := {expression} end.");
		assert_eq!(*run(&source, &[]).global(0), Value::Int(expected), "{expression}");
	}
}

#[test]
fn relational_and_logical_results() {
	let source = "program Logic; var a, b, c, d: boolean; x: integer;
		begin
			x := 4;
			a := (x > 3) and (x <> 5);
			b := (x < 3) or not (x >= 4);
			c := x = 4;
			d := not a or b
		end.";
	let run = run(source, &[]);
	assert_eq!(run.globals[..4], [Value::Int(1), Value::Int(0), Value::Int(1), Value::Int(0)]);
}

#[test]
fn for_loop_bounds() {
	let cases = [
		("1 to 4", 4, 5),
		("3 to 1", 0, 3),
		("2 to 2", 1, 3),
		("5 downto 2", 4, 1),
		("1 downto 3", 0, 1),
	];
	for (range, iterations, final_value) in cases {
		let source = format!("program Loop; var i, n: integer; begin for i := {range} do n := n + 1 end.");
		let run = run(&source, &[]);
		assert_eq!(*run.global(1), Value::Int(iterations), "{range}");
		assert_eq!(*run.global(0), Value::Int(final_value), "{range}");
	}
}

#[test]
fn for_bound_is_reevaluated_each_iteration() {
	let source = "program Loop; var i, n, count: integer;
		begin n := 3; for i := 1 to n do begin n := 5; count := count + 1 end end.";
	assert_eq!(*run(source, &[]).global(2), Value::Int(5));
}

#[test]
fn while_loop_and_nested_if() {
	let source = "program Collatz; var n, steps: integer;
		begin
			readln(n);
			while n <> 1 do
			begin
				if n mod 2 = 0 then n := n div 2 else n := 3 * n + 1;
				steps := steps + 1
			end;
			writeln(steps)
		end.";
	assert_eq!(run(source, &["6"]).output, "8\n");
	assert_eq!(run(source, &["1"]).output, "0\n");
}

#[test]
fn reads_into_variables_and_elements() {
	let source = "program Reads; var a: integer; v: array[-1..1] of integer;
		begin readln; read(a); readln(v[a], v[a + 1]) end.";
	let run = run(source, &["0", "40", "41"]);
	assert_eq!(run.globals, [Value::Int(0), Value::Int(0), Value::Int(40), Value::Int(41)]);
}

#[test]
fn writes_by_static_type() {
	let source = "program Writes; const pi = 3.5; name = 'pas'; var r: real; i: integer;
		begin i := 7; r := i * 2.0; write(name, ' ', i, ' ', r, ' ', pi); writeln; writeln(i > 3) end.";
	assert_eq!(run(source, &[]).output, "pas 7 14 3.5\n1\n");
}

#[test]
fn quotes_in_strings_survive() {
	let source = "program Quote; begin writeln('it''s') end.";
	assert_eq!(run(source, &[]).output, "it's\n");
}

#[test]
fn escapes_in_strings_survive() {
	let compilation = compile(r#"program Esc; begin writeln('back\slash "quoted"') end."#);
	assert!(compilation.code.contains(&r#"pushs "back\\slash \"quoted\"""#.to_string()), "{:#?}", compilation.code);
	assert!(compilation.code.iter().all(|line| !line.contains('\n')));
	assert_eq!(execute(&compilation.code, &[]).output, "back\\slash \"quoted\"\n");
}

#[test]
fn strings_cannot_span_lines() {
	let source = "program Split;\nbegin\n  writeln('a\nb')\nend.";
	let result = Pascaler::default().compile_source(source);
	assert!(matches!(result, Err(CompileError::ParseError(_))), "{result:?}");
}

#[test]
fn oversized_arrays_are_rejected() {
	for bounds in ["-9223372036854775807..9223372036854775807", "1..1000000000"] {
		let source = format!("program Big; var v: array[{bounds}] of integer; begin end.");
		let Err(CompileError::SemanticErrors(errors)) = Pascaler::default().compile_source(&source) else {
			panic!("expected {bounds} to be rejected");
		};
		assert!(matches!(errors[0].error_type(), SemanticErrorType::ArrayTooLarge { .. }), "{bounds}");
	}
}

#[test]
fn case_insensitive_keywords() {
	let source = "PROGRAM Shout; VAR x: INTEGER; BEGIN x := 2; IF x > 1 THEN WRITELN('big') END.";
	assert_eq!(run(source, &[]).output, "big\n");
}

#[test]
fn comments_are_ignored() {
	let source = "program C; { brace } var x: integer; (* paren\n comment *) begin x := 3 { inline } end.";
	let compilation = compile(source);
	assert!(compilation.lexical_errors.is_empty());
	assert_eq!(*execute(&compilation.code, &[]).global(0), Value::Int(3));
}

#[test]
fn lexical_errors_are_skipped() {
	let source = "program Lex; var x: integer;\nbegin\n  x := 2 @ ;\n  writeln(x)\nend.";
	let compilation = compile(source);
	assert_eq!(compilation.lexical_errors.len(), 1);
	assert_eq!(compilation.lexical_errors[0].line(), 3);
	assert_eq!(*compilation.lexical_errors[0].error_type(), ScanErrorType::UnexpectedCharacter('@'));
	assert_eq!(execute(&compilation.code, &[]).output, "2\n");
}

#[test]
fn syntax_error_reports_line() {
	let source = "program Bad;\nvar x: integer;\nbegin\n  x := 1\n  x := 2\nend.";
	let Err(CompileError::ParseError(error)) = Pascaler::default().compile_source(source) else {
		panic!("expected a syntax error");
	};
	assert_eq!(error.line(), 5);
}

#[test]
fn semantic_errors_are_reported_together() {
	let source = "program Sem;
		const c = 1;
		var x: integer; s: string; v: array[5..1] of integer;
		begin
			c := 2;
			x := s;
			if x then x := 1;
			undeclared := 3;
			for s := 1 to 2 do
		end.";
	let Err(CompileError::SemanticErrors(errors)) = Pascaler::default().compile_source(source) else {
		panic!("expected semantic errors");
	};
	let types: Vec<_> = errors.iter().map(|e| e.error_type().clone()).collect();
	assert!(types.iter().any(|t| matches!(t, SemanticErrorType::InvalidArrayBounds { .. })));
	assert!(types.iter().any(|t| matches!(t, SemanticErrorType::NotAssignable { .. })));
	assert!(types.iter().any(|t| matches!(t, SemanticErrorType::TypeMismatch { context: "assignment", .. })));
	assert!(types.iter().any(|t| matches!(t, SemanticErrorType::TypeMismatch { context: "if condition", .. })));
	assert!(types.iter().any(|t| matches!(t, SemanticErrorType::Undeclared(name) if name == "undeclared")));
	assert!(errors.len() >= 6);
	assert!(errors.windows(2).all(|pair| pair[0].line() <= pair[1].line()));
}

#[test]
fn calls_are_a_generation_error() {
	let source = "program Calls; var x: integer;
		function twice(n: integer): integer; begin twice := n * 2 end;
		begin x := twice(2) end.";
	let result = Pascaler::default().compile_source(source);
	assert!(matches!(result, Err(CompileError::CodegenError(CodegenError::Unsupported { line: 3, .. }))));
}

#[test]
fn three_address_target() {
	let options = CompileOptions { codegen: CodegenOptions { target: Target::ThreeAddress, annotate: false } };
	let code = Pascaler::new(options).compile_file(fixture("soma_array.pas")).unwrap().code;
	assert_eq!(code[..4], ["start SomaArray", "numeros = array 5", "i = 0", "soma = 0"]);
	assert!(code.contains(&"numeros[i] = t2".to_string()), "{code:#?}");
	assert!(code.iter().any(|line| line.starts_with("ifFalse ") && line.ends_with(" goto ENDFOR1")));
	assert_eq!(code.last().map(String::as_str), Some("stop"));
}

#[test]
fn annotated_output_runs_the_same() {
	let options = CompileOptions { codegen: CodegenOptions { target: Target::StackMachine, annotate: true } };
	let annotated = Pascaler::new(options).compile_file(fixture("fatorial.pas")).unwrap().code;
	let plain = compile_fixture("fatorial.pas");
	assert!(annotated.len() > plain.len());
	assert!(annotated.iter().any(|line| line.starts_with("// for i := 1 to n")));
	assert_eq!(execute(&annotated, &["4"]).output, execute(&plain, &["4"]).output);
}

#[test]
fn missing_file() {
	let result = Pascaler::default().compile_file(fixture("missing.pas"));
	assert!(matches!(result, Err(CompileError::InternalError(_))));
}
