//! Black-box end-to-end tests driving the compiled `rlox` binary: arithmetic,
//! string concatenation, globals/locals, control flow, and the compile-time
//! and runtime error paths, all observed through stdout/stderr/exit code.

use std::io::Write;
use std::process::{Command, Stdio};

fn rlox_path() -> &'static str {
  env!("CARGO_BIN_EXE_rlox")
}

/// Run a script file through `rlox <path>` and return (stdout, stderr, exit code).
fn run_script(source: &str) -> (String, String, i32) {
  let mut path = std::env::temp_dir();
  path.push(format!("rlox_e2e_{}_{}.lox", std::process::id(), rand_suffix()));
  std::fs::write(&path, source).unwrap();

  let output = Command::new(rlox_path())
    .arg(&path)
    .output()
    .expect("failed to run rlox binary");

  let _ = std::fs::remove_file(&path);

  (
    String::from_utf8_lossy(&output.stdout).into_owned(),
    String::from_utf8_lossy(&output.stderr).into_owned(),
    output.status.code().unwrap_or(-1),
  )
}

/// Feed `lines` one at a time to `rlox`'s REPL (no path argument) and return
/// (stdout, stderr, exit code).
fn run_repl(lines: &[&str]) -> (String, String, i32) {
  let mut child = Command::new(rlox_path())
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .expect("failed to spawn rlox REPL");

  {
    let stdin = child.stdin.as_mut().unwrap();
    for line in lines {
      writeln!(stdin, "{}", line).unwrap();
    }
  }

  let output = child.wait_with_output().unwrap();
  (
    String::from_utf8_lossy(&output.stdout).into_owned(),
    String::from_utf8_lossy(&output.stderr).into_owned(),
    output.status.code().unwrap_or(-1),
  )
}

fn rand_suffix() -> u64 {
  use std::time::{SystemTime, UNIX_EPOCH};
  SystemTime::now().duration_since(UNIX_EPOCH).unwrap().subsec_nanos() as u64
}

#[test]
fn scenario_1_arithmetic_print() {
  let (stdout, _stderr, code) = run_script("print 1 + 2;");
  assert_eq!(stdout, "3\n");
  assert_eq!(code, 0);
}

#[test]
fn scenario_2_string_concatenation() {
  let (stdout, _stderr, code) = run_script(r#"print "he" + "llo";"#);
  assert_eq!(stdout, "hello\n");
  assert_eq!(code, 0);
}

#[test]
fn scenario_2_repl_reuses_interned_strings_across_lines() {
  let (stdout, _stderr, code) = run_repl(&[r#"print "he" + "llo";"#, r#"print "hello";"#]);
  assert_eq!(stdout, "hello\nhello\n");
  assert_eq!(code, 0);
}

#[test]
fn scenario_3_uninitialized_global_prints_nil() {
  let (stdout, _stderr, code) = run_script("var a; print a;");
  assert_eq!(stdout, "nil\n");
  assert_eq!(code, 0);
}

#[test]
fn scenario_4_local_shadowing_and_scope_cleanup() {
  let (stdout, _stderr, code) =
    run_script("var a = 1; { var a = 2; print a; } print a;");
  assert_eq!(stdout, "2\n1\n");
  assert_eq!(code, 0);
}

#[test]
fn scenario_5_negating_a_bool_is_a_runtime_error() {
  let (stdout, stderr, code) = run_script("-true;");
  assert_eq!(stdout, "");
  assert!(stderr.contains("Operand must be a number."));
  assert!(stderr.contains("[line 1]"));
  assert_eq!(code, 70);
}

#[test]
fn scenario_6_adding_number_and_string_is_a_runtime_error() {
  let (stdout, stderr, code) = run_script(r#"print 1 + "x";"#);
  assert_eq!(stdout, "");
  assert!(stderr.contains("Operands must be two numbers or two strings."));
  assert_eq!(code, 70);
}

#[test]
fn scenario_7_boolean_expression_statement_compiles_and_runs_silently() {
  let (stdout, _stderr, code) = run_script("!nil == true;");
  assert_eq!(stdout, "");
  assert_eq!(code, 0);
}

#[test]
fn empty_source_succeeds_with_no_output() {
  let (stdout, _stderr, code) = run_script("");
  assert_eq!(stdout, "");
  assert_eq!(code, 0);
}

#[test]
fn reading_local_in_its_own_initializer_is_a_compile_error() {
  let (_stdout, stderr, code) = run_script("{ var a = a; }");
  assert!(stderr.contains("Can't read local variable in its own initializer."));
  assert_eq!(code, 65);
}

#[test]
fn more_than_256_constants_is_a_compile_error() {
  let mut source = String::new();
  for i in 0..257 {
    source.push_str(&format!("print {};\n", i));
  }
  let (_stdout, stderr, code) = run_script(&source);
  assert!(stderr.contains("Too many constants in one chunk."));
  assert_eq!(code, 65);
}

#[test]
fn more_than_one_argument_is_a_usage_error() {
  let output = Command::new(rlox_path())
    .arg("one.lox")
    .arg("two.lox")
    .output()
    .expect("failed to run rlox binary");
  assert_eq!(output.status.code(), Some(64));
  assert!(!output.stderr.is_empty());
}

#[test]
fn nonexistent_script_is_a_filesystem_error() {
  let output = Command::new(rlox_path())
    .arg("/nonexistent/path/does/not/exist.lox")
    .output()
    .expect("failed to run rlox binary");
  assert_eq!(output.status.code(), Some(74));
}

#[test]
fn while_loop_terminates_and_sums_correctly() {
  let (stdout, _stderr, code) = run_script(
    "var i = 0; var sum = 0; while (i < 5) { sum = sum + i; i = i + 1; } print sum;",
  );
  assert_eq!(stdout, "10\n");
  assert_eq!(code, 0);
}

#[test]
fn for_loop_desugars_correctly() {
  let (stdout, _stderr, code) =
    run_script("var total = 0; for (var i = 0; i < 5; i = i + 1) { total = total + i; } print total;");
  assert_eq!(stdout, "10\n");
  assert_eq!(code, 0);
}

#[test]
fn and_short_circuits_on_falsey_left_operand() {
  // The right operand would raise a runtime error if evaluated; short
  // circuiting means it never is.
  let (stdout, _stderr, code) = run_script(r#"print false and (1 + "x" == 1);"#);
  assert_eq!(stdout, "false\n");
  assert_eq!(code, 0);
}

#[test]
fn or_short_circuits_on_truthy_left_operand() {
  let (stdout, _stderr, code) = run_script("print true or nil;");
  assert_eq!(stdout, "true\n");
  assert_eq!(code, 0);
}

#[test]
fn if_else_picks_the_right_branch() {
  let (stdout, _stderr, code) = run_script(
    r#"if (1 < 2) { print "yes"; } else { print "no"; }"#,
  );
  assert_eq!(stdout, "yes\n");
  assert_eq!(code, 0);
}
