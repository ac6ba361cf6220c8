//! # rlox CLI
//!
//! `rlox` with no argument enters a REPL; `rlox <path>` runs a script file
//! once. This binary owns argument parsing, line editing, and exit-code
//! plumbing, and delegates everything about the language itself to
//! [`rlox::vm::VM`].

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use rlox::cli::{self, EXIT_IO_ERROR};
use rlox::utils::Init;
use rlox::vm::VM;

#[derive(Parser)]
#[command(name = "rlox", about = "A bytecode interpreter for Lox", version)]
struct Cli {
  /// Path to a Lox script. If omitted, starts an interactive REPL.
  path: Option<PathBuf>,
}

fn main() -> ExitCode {
  env_logger::init();

  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      // `clap` already renders the usage message to stderr for us; this
      // crate's documented usage-error exit code is 64, not clap's own 2.
      let _ = err.print();
      return ExitCode::from(64);
    }
  };

  match cli.path {
    Some(path) => run_file(&path),
    None => repl(),
  }
}

/// Read the whole file and execute it as a single `interpret` call.
fn run_file(path: &PathBuf) -> ExitCode {
  let mut vm = VM::init();
  log::info!("reading script from {}", path.display());
  match cli::run_file(&mut vm, path) {
    Ok(result) => ExitCode::from(cli::exit_code(&result) as u8),
    Err(err) => {
      eprintln!("{}", err);
      ExitCode::from(EXIT_IO_ERROR as u8)
    }
  }
}

/// Read one line at a time until EOF, feeding each to `interpret`. Errors
/// on one line are reported and the REPL continues with the next line
/// rather than aborting the whole session.
fn repl() -> ExitCode {
  log::info!("entering REPL");
  let mut vm = VM::init();
  let mut editor = match DefaultEditor::new() {
    Ok(editor) => editor,
    Err(err) => {
      eprintln!("rlox: could not start line editor: {}", err);
      return ExitCode::from(EXIT_IO_ERROR as u8);
    }
  };

  loop {
    match editor.readline("> ") {
      Ok(line) => {
        let _ = editor.add_history_entry(line.as_str());
        let _ = cli::interpret_and_report(&mut vm, &line);
      }
      Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
      Err(err) => {
        eprintln!("rlox: {}", err);
        break;
      }
    }
  }

  ExitCode::from(cli::EXIT_OK as u8)
}
