use super::*;

impl<'src, 'strings> Parser<'src, 'strings> {
  pub(crate) fn number_adapter(&mut self, _: bool) -> Result<(), InterpretError> {
    self.number()
  }

  pub(crate) fn number(&mut self) -> Result<(), InterpretError> {
    match self.previous.lexeme.parse::<f64>() {
      Ok(value) => self.emit_constant(value.into()),
      Err(_) => Err(InterpretError::CompileError(
        "Failed to parse number(value).".into(),
      )),
    }
  }

  pub(crate) fn string_adapter(&mut self, _: bool) -> Result<(), InterpretError> {
    self.string()
  }

  pub(crate) fn string(&mut self) -> Result<(), InterpretError> {
    let len = self.previous.lexeme.len();
    let raw = &self.previous.lexeme[1..len - 1];
    let interned = self.intern(raw);
    self.emit_constant(Value::String(interned))
  }

  pub(crate) fn named_variable(&mut self, can_assign: bool) -> Result<(), InterpretError> {
    let arg = self.resolve_local()?;
    let (arg, get_op, set_op) = if let Some(arg) = arg {
      (arg as u8, OpCode::GetLocal, OpCode::SetLocal)
    } else {
      (
        self.identifier_constant()?,
        OpCode::GetGlobal,
        OpCode::SetGlobal,
      )
    };
    if can_assign && self.match_token(TokenType::Equal)? {
      self.expression()?;
      self.emit_bytes(&[set_op as u8, arg])
    } else {
      self.emit_bytes(&[get_op as u8, arg])
    }
  }

  pub(crate) fn variable(&mut self, can_assign: bool) -> Result<(), InterpretError> {
    self.named_variable(can_assign)
  }

  pub(crate) fn unary_adapter(&mut self, _: bool) -> Result<(), InterpretError> {
    self.unary()
  }

  pub(crate) fn unary(&mut self) -> Result<(), InterpretError> {
    let operator_type = self.previous.token_type;

    // Compile the operand
    self.parse_precedence(Precedence::Unary)?;

    // Emit the operator instruction
    match operator_type {
      TokenType::Bang => self.emit_byte(OpCode::Not as u8),
      TokenType::Minus => self.emit_byte(OpCode::Negate as u8),
      _ => Err(InterpretError::CompileError(
        "Unknown unary operator.".into(),
      )),
    }
  }

  pub(crate) fn binary_adapter(&mut self, _: bool) -> Result<(), InterpretError> {
    self.binary()
  }

  /// Emits the opcode(s) for a binary operator. `!=`, `>=` and `<=` are not
  /// distinct opcodes: they're synthesized from `Equal`/`Less`/`Greater`
  /// plus `Not`, since that's the full canonical instruction set.
  pub(crate) fn binary(&mut self) -> Result<(), InterpretError> {
    let operator_type = self.previous.token_type;
    let rule = self.get_rule(operator_type);
    self.parse_precedence(rule.precedence.next())?;

    match operator_type {
      TokenType::BangEqual => self.emit_bytes(&[OpCode::Equal as u8, OpCode::Not as u8]),
      TokenType::EqualEqual => self.emit_byte(OpCode::Equal as u8),
      TokenType::Greater => self.emit_byte(OpCode::Greater as u8),
      TokenType::GreaterEqual => self.emit_bytes(&[OpCode::Less as u8, OpCode::Not as u8]),
      TokenType::Less => self.emit_byte(OpCode::Less as u8),
      TokenType::LessEqual => self.emit_bytes(&[OpCode::Greater as u8, OpCode::Not as u8]),
      TokenType::Plus => self.emit_byte(OpCode::Add as u8),
      TokenType::Minus => self.emit_byte(OpCode::Subtract as u8),
      TokenType::Star => self.emit_byte(OpCode::Multiply as u8),
      TokenType::Slash => self.emit_byte(OpCode::Divide as u8),
      _ => Err(InterpretError::CompileError(
        "Unknown binary operator.".into(),
      )),
    }
  }

  pub(crate) fn literal_adapter(&mut self, _: bool) -> Result<(), InterpretError> {
    self.literal()
  }

  pub(crate) fn literal(&mut self) -> Result<(), InterpretError> {
    match self.previous.token_type {
      TokenType::False => self.emit_byte(OpCode::False as u8),
      TokenType::Nil => self.emit_byte(OpCode::Nil as u8),
      TokenType::True => self.emit_byte(OpCode::True as u8),
      _ => Err(InterpretError::CompileError(
        "Unknown literal operator.".into(),
      )),
    }
  }

  pub(crate) fn grouping_adapter(&mut self, _: bool) -> Result<(), InterpretError> {
    self.grouping()
  }

  pub(crate) fn grouping(&mut self) -> Result<(), InterpretError> {
    self.expression()?;
    self.consume_token(
      TokenType::RightParen,
      "Expect `)` after expression.".to_owned(),
    )
  }

  pub(crate) fn and_adapter(&mut self, _: bool) -> Result<(), InterpretError> {
    self.and_()
  }

  /// `a and b`: if `a` is falsey, short-circuit leaving it on the stack;
  /// otherwise pop it and evaluate `b`.
  pub(crate) fn and_(&mut self) -> Result<(), InterpretError> {
    let end_jump = self.emit_jump(OpCode::JumpIfFalse as u8)?;
    self.emit_byte(OpCode::Pop as u8)?;
    self.parse_precedence(Precedence::And)?;
    self.patch_jump(end_jump)
  }

  pub(crate) fn or_adapter(&mut self, _: bool) -> Result<(), InterpretError> {
    self.or_()
  }

  /// `a or b`: if `a` is truthy, jump over `b` and leave it on the stack;
  /// otherwise pop it and evaluate `b`.
  pub(crate) fn or_(&mut self) -> Result<(), InterpretError> {
    let else_jump = self.emit_jump(OpCode::JumpIfFalse as u8)?;
    let end_jump = self.emit_jump(OpCode::Jump as u8)?;

    self.patch_jump(else_jump)?;
    self.emit_byte(OpCode::Pop as u8)?;

    self.parse_precedence(Precedence::Or)?;
    self.patch_jump(end_jump)
  }
}
