use super::*;

impl<'src, 'strings> Parser<'src, 'strings> {
  fn parse_variable(&mut self, message: String) -> Result<u8, InterpretError> {
    self.consume_token(TokenType::Identifier, message)?;

    // record if it's a local variable (scope_depth > 0)
    self.declare_variable()?;

    // if in local scope, simply exit (with a fake index)
    if self.compiler.scope_depth > 0 {
      return Ok(0);
    }

    self.identifier_constant()
  }

  /// Transition the most recently declared local from "being initialized"
  /// (`depth = None`) to its real scope depth. No bytecode is emitted: the
  /// initializer's value is already sitting in the right stack slot.
  fn mark_initialized(&mut self) {
    let depth = self.compiler.scope_depth;
    self.compiler.locals.last_mut().unwrap().depth = Some(depth);
  }

  fn define_variable(&mut self, global_index: u8) -> Result<(), InterpretError> {
    if self.compiler.scope_depth > 0 {
      self.mark_initialized();
      Ok(())
    } else {
      self.emit_bytes(&[OpCode::DefineGlobal as u8, global_index])
    }
  }

  /// Records the existence of variable (only for locals).
  fn declare_variable(&mut self) -> Result<(), InterpretError> {
    if self.compiler.scope_depth == 0 {
      return Ok(());
    }

    // Detect error => two variables with same name
    // in the same local scope. Walk from the top; a `while` over a signed
    // countdown rather than an unsigned one, since `locals` may be empty.
    let mut i = self.compiler.locals.len();
    while i > 0 {
      i -= 1;
      let local = &self.compiler.locals[i];
      if let Some(depth) = local.depth {
        if depth < self.compiler.scope_depth {
          break;
        }
      }
      if local.name.lexeme == self.previous.lexeme {
        return Err(InterpretError::CompileError(
          "Already a variable with this name in this scope.".into(),
        ));
      }
    }

    self.add_local()
  }

  fn add_local(&mut self) -> Result<(), InterpretError> {
    if self.compiler.locals.len() >= u8::MAX as usize + 1 {
      return Err(InterpretError::CompileError(
        "Too many local variables in function(At most: 256).".into(),
      ));
    }
    self.compiler.locals.push(Local {
      name: self.previous,
      depth: None,
    });
    Ok(())
  }

  pub(crate) fn identifier_constant(&mut self) -> Result<u8, InterpretError> {
    let name = self.intern(self.previous.lexeme);
    self.make_constant(Value::String(name))
  }

  /// Try to find the local variable in the current scope.
  ///
  /// If found, return the index of the local variable.
  pub(crate) fn resolve_local(&mut self) -> Result<Option<usize>, InterpretError> {
    let pos = self
      .compiler
      .locals
      .iter()
      .rposition(|local| local.name.lexeme == self.previous.lexeme);
    if let Some(pos) = pos {
      if self.compiler.locals[pos].depth.is_none() {
        return Err(InterpretError::CompileError(
          "Can't read local variable in its own initializer.".into(),
        ));
      };
    }
    Ok(pos)
  }

  /// Declare: bind a new variable.
  pub(crate) fn var_declaration(&mut self) -> Result<(), InterpretError> {
    let global_index = self.parse_variable("Expect variable name.".into())?;

    if self.match_token(TokenType::Equal)? {
      self.expression()?;
    } else {
      self.emit_byte(OpCode::Nil as u8)?;
    }

    self.consume_token(
      TokenType::Semicolon,
      "Expect `;` after variable declaration.".into(),
    )?;

    self.define_variable(global_index)
  }
}
