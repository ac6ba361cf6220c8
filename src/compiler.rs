//! # Compiler
//!
//! The compiler is a single-pass Pratt parser that emits bytecode directly
//! into a [`Chunk`] as it parses — there is no intermediate AST. It also
//! resolves lexical scope (locals become stack slots; everything else is a
//! global looked up by interned name).

use crate::{
  chunk::Chunk,
  scanner::Token,
  vm::{InterpretError, VM},
};

pub mod parser;

use parser::Parser;

/// Operator precedence, lowest to highest. Each infix parse step only
/// continues into operators whose precedence is at least as high as the
/// level it was called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Precedence {
  #[default]
  None,
  Assignment, // =
  Or,         // or
  And,        // and
  Equality,   // == !=
  Comparison, // < > <= >=
  Term,       // + -
  Factor,     // * /
  Unary,      // ! -
  Call,       // . ()
  Primary,
}

impl Precedence {
  /// The next precedence level up, used by `binary()` to parse a
  /// left-associative operator's right operand at `self + 1`.
  pub fn next(self) -> Self {
    match self {
      Precedence::None => Precedence::Assignment,
      Precedence::Assignment => Precedence::Or,
      Precedence::Or => Precedence::And,
      Precedence::And => Precedence::Equality,
      Precedence::Equality => Precedence::Comparison,
      Precedence::Comparison => Precedence::Term,
      Precedence::Term => Precedence::Factor,
      Precedence::Factor => Precedence::Unary,
      Precedence::Unary => Precedence::Call,
      Precedence::Call => Precedence::Primary,
      Precedence::Primary => Precedence::Primary,
    }
  }
}

/// A resolved local variable slot. `depth = None` means "declared but not
/// yet initialized" — reading it in that state is the initializer-cycle
/// error (`var a = a;`).
#[derive(Debug, Clone)]
pub struct Local<'src> {
  pub(crate) name: Token<'src>,
  pub(crate) depth: Option<usize>,
}

/// Tracks the locals in scope for one `interpret` call. There are no
/// functions in this language, so there is exactly one `Compiler` per
/// compilation, not a call-frame stack of them.
#[derive(Debug, Default)]
pub struct Compiler<'src> {
  pub(crate) locals: Vec<Local<'src>>,
  pub(crate) scope_depth: usize,
}

impl VM {
  /// Compile `src` into a fresh `Chunk`, interning any string literals and
  /// identifiers into this VM's string table as it goes.
  pub(crate) fn compile(&mut self, src: &str) -> Result<Chunk, InterpretError> {
    let mut parser = Parser::new(src, &mut self.strings);
    parser.run()
  }
}
