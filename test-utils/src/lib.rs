//! Shared helpers for the `tests/` integration suite: lex + parse + evaluate a complete program
//! and hand back both its `print`ed output and the textual rendering of its final value, so each
//! test file can assert on end-to-end behaviour without repeating the plumbing.

use phasa::diagnostics::Diagnostic;
use phasa::evaluator::Evaluator;
use phasa::object::builtins;
use phasa::parser::Parser;

pub struct Run {
    pub stdout: String,
    pub result: String,
}

/// Lex, parse and evaluate `source`. Panics with the collected diagnostics if lexing/parsing
/// failed — every test fixture here is expected to be syntactically valid phasa source.
pub fn run(source: &str) -> Run {
    let mut parser = Parser::from_source(source);
    let program = parser.parse_program();
    let diagnostics = parser.take_diagnostics();
    assert!(diagnostics.is_empty(), "unexpected diagnostics for {source:?}: {diagnostics:?}");

    let mut stdout = Vec::new();
    let result = {
        let mut evaluator = Evaluator::new(&mut stdout);
        let env = evaluator.globals();
        let handle = evaluator.eval_program(&program, &env);
        builtins::display_value(evaluator.heap(), handle)
    };

    Run {
        stdout: String::from_utf8(stdout).expect("program output is valid UTF-8"),
        result,
    }
}

/// Lex and parse `source`, returning the accumulated diagnostics without evaluating anything.
/// For fixtures that are expected to fail at parse time.
pub fn parse_diagnostics(source: &str) -> Vec<Diagnostic> {
    let mut parser = Parser::from_source(source);
    parser.parse_program();
    parser.take_diagnostics()
}

/// Assert that running `source` writes exactly `expected_stdout` via `print`.
pub fn assert_stdout(source: &str, expected_stdout: &str) {
    let run = run(source);
    assert_eq!(run.stdout, expected_stdout, "for {source:?}");
}

/// Assert that running `source`'s final expression renders to `expected_value`.
pub fn assert_result(source: &str, expected_value: &str) {
    let run = run(source);
    assert_eq!(run.result, expected_value, "for {source:?}");
}
