//! `phasa` — lex, parse and evaluate a Thai-keyword script, or drop into a REPL.
//!
//! This binary is the only piece of the crate that touches process I/O or renders
//! [`phasa::diagnostics::Diagnostic`]s to a terminal; the library stays host-agnostic (see
//! `phasa::diagnostics`'s module docs) so an editor integration or test harness can consume the
//! same diagnostics as structured data instead of this printer's text.

use clap::Parser as ClapParser;
use colored::Colorize;
use log::error;
use phasa::diagnostics::Diagnostic;
use phasa::evaluator::Evaluator;
use phasa::object::builtins;
use phasa::parser::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser, Debug)]
#[command(name = "phasa", author, version, about = "A tree-walking interpreter for a small Thai-keyword scripting language")]
struct Cli {
    /// Script to execute. Omit to start an interactive REPL.
    file: Option<PathBuf>,

    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    simple_logger::init_with_level(log_level(cli.verbose).to_level().unwrap_or(log::Level::Warn))
        .expect("logger should only be initialised once");

    match &cli.file {
        Some(path) => run_file(path),
        None => {
            run_repl();
            ExitCode::SUCCESS
        }
    }
}

fn run_file(path: &PathBuf) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            error!("cannot read '{}': {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut parser = Parser::from_source_with_filename(&source, path.display().to_string());
    let program = parser.parse_program();
    let diagnostics = parser.take_diagnostics();

    if !diagnostics.is_empty() {
        for diagnostic in &diagnostics {
            render_diagnostic(diagnostic);
        }
        return ExitCode::FAILURE;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut evaluator = Evaluator::new(&mut out);
    let env = evaluator.globals();
    let result = evaluator.eval_program(&program, &env);

    if matches!(evaluator.heap().get(result), phasa::object::Value::Error(_)) {
        eprintln!("{}", builtins::display_value(evaluator.heap(), result));
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run_repl() {
    println!("phasa v{} — Thai-keyword scripting language", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or 'quit' to leave, or press Ctrl-D.\n");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut evaluator = Evaluator::new(&mut out);
    let env = evaluator.globals();

    let stdin = io::stdin();
    loop {
        print!(">> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        let bytes_read = match stdin.lock().read_line(&mut line) {
            Ok(n) => n,
            Err(err) => {
                error!("failed to read stdin: {err}");
                break;
            }
        };
        if bytes_read == 0 {
            break; // EOF (Ctrl-D)
        }

        let trimmed = line.trim();
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        let mut parser = Parser::from_source(trimmed);
        let program = parser.parse_program();
        let diagnostics = parser.take_diagnostics();
        if !diagnostics.is_empty() {
            for diagnostic in &diagnostics {
                render_diagnostic(diagnostic);
            }
            continue;
        }

        let result = evaluator.eval_program(&program, &env);
        if !matches!(evaluator.heap().get(result), phasa::object::Value::Null) {
            println!("{}", builtins::display_value(evaluator.heap(), result));
        }
    }

    println!("\nGoodbye!");
}

/// Render a [`Diagnostic`] to stderr: a coloured `severity[code][kind]: message` header, a
/// `file:line:column` location line, each span's source excerpt with a caret underline, then
/// `= note:`/`= help:` lines. Matches `SPEC_FULL.md`'s described format; this is the only place
/// in the crate that decides how diagnostics look on a terminal.
fn render_diagnostic(diagnostic: &Diagnostic) {
    let header = format!("{diagnostic}");
    let colored_header = match diagnostic.severity {
        phasa::diagnostics::Severity::Error => header.lines().next().unwrap_or_default().red().bold(),
        phasa::diagnostics::Severity::Warning => header.lines().next().unwrap_or_default().yellow().bold(),
        phasa::diagnostics::Severity::Note => header.lines().next().unwrap_or_default().cyan(),
    };
    eprintln!("{colored_header}");

    for span in &diagnostic.spans {
        eprintln!("  {} {}", "-->".blue(), span.location);
        if let Some(excerpt) = &span.source_excerpt {
            let gutter = format!("{}", span.location.start_line);
            eprintln!("{} {} {excerpt}", gutter.blue().bold(), "|".blue().bold());
            let padding: String = " ".repeat(gutter.len());
            let underline_start = span.location.start_column.saturating_sub(1);
            let underline_len = (span.location.end_column + 1).saturating_sub(span.location.start_column).max(1);
            let underline: String = "^".repeat(underline_len);
            let label = span.label.as_deref().unwrap_or_default();
            eprintln!(
                "{padding} {} {}{} {label}",
                "|".blue().bold(),
                " ".repeat(underline_start),
                underline.red().bold()
            );
        }
    }

    for note in &diagnostic.notes {
        eprintln!("{} {note}", "= note:".bold());
    }
    if let Some(suggestion) = &diagnostic.suggestion {
        eprintln!("{} {suggestion}", "= help:".bold());
    }
}
