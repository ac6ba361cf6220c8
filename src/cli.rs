//! # CLI
//!
//! The ambient driver around the core: reading a line or a whole file and
//! handing it to [`VM::interpret`], then mapping the result to a process
//! exit code. Disassembly/trace logging and the interactive line-editing
//! loop itself live outside the core, in `main.rs` — this module is the
//! thin, testable seam between the two.

use std::{fs, path::Path};

use thiserror::Error;

use crate::vm::{InterpretError, VM};

/// Exit code for a successful run.
pub const EXIT_OK: i32 = 0;
/// Exit code for a compile-time error.
pub const EXIT_COMPILE_ERROR: i32 = 65;
/// Exit code for a runtime error.
pub const EXIT_RUNTIME_ERROR: i32 = 70;
/// Exit code for a filesystem error (unreadable script, usage error reading
/// an argument).
pub const EXIT_IO_ERROR: i32 = 74;

/// Errors at the CLI boundary: file IO. Never crosses into the
/// compiler/VM contract — `InterpretError` is the only error type that
/// does that.
#[derive(Debug, Error)]
pub enum CliError {
  #[error("could not read script `{path}`: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// Map an `interpret` outcome to the process exit code: 0 on success, 65
/// for a compile error, 70 for a runtime error.
pub fn exit_code(result: &Result<(), InterpretError>) -> i32 {
  match result {
    Ok(()) => EXIT_OK,
    Err(InterpretError::CompileError(_)) => EXIT_COMPILE_ERROR,
    Err(InterpretError::RuntimeError(_)) => EXIT_RUNTIME_ERROR,
  }
}

/// Run one line or chunk of source against `vm`, reporting any error to
/// stderr. Used by both the REPL (one line at a time) and file execution
/// (the whole file as one `interpret` call) so error reporting stays
/// identical between the two.
pub fn interpret_and_report(vm: &mut VM, src: &str) -> Result<(), InterpretError> {
  let result = vm.interpret(src);
  if let Err(ref err) = result {
    match err {
      InterpretError::CompileError(message) => eprintln!("{}", message),
      InterpretError::RuntimeError(message) => eprintln!("{}", message),
    }
  }
  result
}

/// Read the whole file at `path` and run it as a single `interpret` call.
pub fn run_file(vm: &mut VM, path: &Path) -> Result<Result<(), InterpretError>, CliError> {
  let source = fs::read_to_string(path).map_err(|source| CliError::Io {
    path: path.display().to_string(),
    source,
  })?;
  Ok(interpret_and_report(vm, &source))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn maps_success_to_zero() {
    assert_eq!(exit_code(&Ok(())), EXIT_OK);
  }

  #[test]
  fn maps_compile_error_to_65() {
    let result = Err(InterpretError::CompileError("boom".into()));
    assert_eq!(exit_code(&result), EXIT_COMPILE_ERROR);
  }

  #[test]
  fn maps_runtime_error_to_70() {
    let result = Err(InterpretError::RuntimeError("boom".into()));
    assert_eq!(exit_code(&result), EXIT_RUNTIME_ERROR);
  }

  #[test]
  fn run_file_maps_missing_file_to_io_error() {
    let mut vm = VM::default();
    let err = run_file(&mut vm, Path::new("/nonexistent/path/to/script.lox")).unwrap_err();
    assert!(matches!(err, CliError::Io { .. }));
  }
}
