use super::*;

impl<'src, 'strings> Parser<'src, 'strings> {
  pub(crate) fn print_statement(&mut self) -> Result<(), InterpretError> {
    self.expression()?;
    self.consume_token(TokenType::Semicolon, "Expect `;` after value.".into())?;
    self.emit_byte(OpCode::Print as u8)
  }

  pub(crate) fn if_statement(&mut self) -> Result<(), InterpretError> {
    /* condition */
    self.consume_token(TokenType::LeftParen, "Expect `(` after `if`.".into())?;
    self.expression()?;
    self.consume_token(TokenType::RightParen, "Expect `)` after condition.".into())?;

    /* `consume`: if {...} */
    let then_jump = self.emit_jump(OpCode::JumpIfFalse as u8)?;
    // pop top of stack **iff** `condition` is true
    self.emit_byte(OpCode::Pop as u8)?;
    self.statement()?;

    /* patch `if` jump */
    let else_jump = self.emit_jump(OpCode::Jump as u8)?;
    self.patch_jump(then_jump)?;

    /* `consume`: else {...} */
    // pop top of stack **iff** `condition` is false
    self.emit_byte(OpCode::Pop as u8)?;
    if self.match_token(TokenType::Else)? {
      self.statement()?;
    }

    /* patch `else` jump */
    self.patch_jump(else_jump)
  }

  /// `while (cond) body;` — re-tests `cond` before every iteration, same
  /// `JumpIfFalse` + `Pop` pattern as `if`, plus an `OpLoop` back to the
  /// top once the body finishes.
  pub(crate) fn while_statement(&mut self) -> Result<(), InterpretError> {
    let loop_start = self.chunk.code.len();

    self.consume_token(TokenType::LeftParen, "Expect `(` after `while`.".into())?;
    self.expression()?;
    self.consume_token(TokenType::RightParen, "Expect `)` after condition.".into())?;

    let exit_jump = self.emit_jump(OpCode::JumpIfFalse as u8)?;
    self.emit_byte(OpCode::Pop as u8)?;
    self.statement()?;
    self.emit_loop(loop_start)?;

    self.patch_jump(exit_jump)?;
    self.emit_byte(OpCode::Pop as u8)
  }

  /// `for (init; cond; incr) body;` desugars to a `while` wrapped in its
  /// own scope: `init` runs once, `cond` gates each iteration (defaulting
  /// to "always true" when omitted), and `incr` is compiled after the body
  /// then jumped over into the condition re-check — the classic
  /// Crafting-Interpreters desugaring, not a distinct set of opcodes.
  pub(crate) fn for_statement(&mut self) -> Result<(), InterpretError> {
    self.begin_scope();
    self.consume_token(TokenType::LeftParen, "Expect `(` after `for`.".into())?;

    if self.match_token(TokenType::Semicolon)? {
      // no initializer
    } else if self.match_token(TokenType::Var)? {
      self.var_declaration()?;
    } else {
      self.expression_statement()?;
    }

    let mut loop_start = self.chunk.code.len();

    let mut exit_jump = None;
    if !self.match_token(TokenType::Semicolon)? {
      self.expression()?;
      self.consume_token(
        TokenType::Semicolon,
        "Expect `;` after loop condition.".into(),
      )?;

      // Jump out of the loop if the condition is false.
      exit_jump = Some(self.emit_jump(OpCode::JumpIfFalse as u8)?);
      self.emit_byte(OpCode::Pop as u8)?; // condition
    }

    if !self.match_token(TokenType::RightParen)? {
      let body_jump = self.emit_jump(OpCode::Jump as u8)?;

      let increment_start = self.chunk.code.len();
      self.expression()?;
      self.emit_byte(OpCode::Pop as u8)?;
      self.consume_token(TokenType::RightParen, "Expect `)` after for clauses.".into())?;

      self.emit_loop(loop_start)?;
      loop_start = increment_start;
      self.patch_jump(body_jump)?;
    }

    self.statement()?;
    self.emit_loop(loop_start)?;

    if let Some(exit_jump) = exit_jump {
      self.patch_jump(exit_jump)?;
      self.emit_byte(OpCode::Pop as u8)?; // condition
    }

    self.end_scope()
  }

  /// If in panic_mode, then synchronize (for better recognizing what error has occurred).
  ///
  /// Synchronize means that, we will skip tokens indiscriminately
  /// until we reach something that looks like a statement boundary.
  ///
  /// E.g.: class | fun | var | for | if | while | print | return
  pub(crate) fn synchronize(&mut self) -> Result<(), InterpretError> {
    self.panic_mode = false;
    while self.current.token_type != TokenType::Eof {
      if self.previous.token_type == TokenType::Semicolon {
        return Ok(());
      }
      match self.current.token_type {
        TokenType::Class
        | TokenType::Fun
        | TokenType::Var
        | TokenType::For
        | TokenType::If
        | TokenType::While
        | TokenType::Print
        | TokenType::Return => return Ok(()),
        _ => {}
      }
      self.advance_token()?;
    }
    Ok(())
  }

  pub(crate) fn expression_statement(&mut self) -> Result<(), InterpretError> {
    self.expression()?;
    self.consume_token(TokenType::Semicolon, "Expect `;` after expression.".into())?;
    self.emit_byte(OpCode::Pop as u8)
  }
}
