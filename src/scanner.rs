//! # Scanner
//!
//! The scanner is responsible for:
//!
//! - reading the source code
//! - producing a stream of tokens.

use crate::utils::Init;

/// ## TokenType
///
/// An enum which represents the different types of tokens.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TokenType {
  // Single-character tokens.
  LeftParen,
  RightParen,
  LeftBrace,
  RightBrace,
  Comma,
  Dot,
  Minus,
  Plus,
  Semicolon,
  Slash,
  Star,
  // One or two character tokens.
  Bang,
  BangEqual,
  Equal,
  EqualEqual,
  Greater,
  GreaterEqual,
  Less,
  LessEqual,
  // Literals.
  Identifier,
  String,
  Number,
  // Keywords.
  And,
  Class,
  Else,
  False,
  For,
  Fun,
  If,
  Nil,
  Or,
  Print,
  Return,
  Super,
  This,
  True,
  Var,
  While,
  // Error and EOF.
  Error,
  Eof,
}

/// ## Token
///
/// A struct which represents a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
  /// The type of the token.
  pub(crate) token_type: TokenType,
  /// The line of the token.
  pub(crate) line: usize,
  /// The lexeme of the token.
  ///
  /// A lexeme is the text that the token represents.
  pub(crate) lexeme: &'a str,
}

impl<'a> Init for Token<'a> {}

impl<'a> Default for Token<'a> {
  fn default() -> Self {
    Self {
      token_type: TokenType::Eof,
      line: 1,
      lexeme: "",
    }
  }
}

/// ## Scanner
///
/// A struct which represents a scanner.
#[derive(Debug)]
pub struct Scanner<'a> {
  /// The source code.
  pub(crate) source: &'a str,
  /// The start position.
  pub(crate) start: usize,
  /// The current position.
  pub(crate) current: usize,
  /// The current line.
  pub(crate) line: usize,
}

impl<'a> Scanner<'a> {
  /// Make a token, specifically from `string`.
  fn string(&mut self) -> Token<'a> {
    // Try finding the closing quote.
    while self.peek() != b'"' && !self.is_at_end() {
      if self.peek() == b'\n' {
        self.line += 1;
      }
      self.advance();
    }

    // Cannot find the closing quote.
    if self.is_at_end() {
      return self.error_token("Unterminated string.");
    }

    self.advance();
    self.make_token(TokenType::String)
  }

  /// Make a token, specifically from `number`.
  fn number(&mut self) -> Token<'a> {
    while self.peek().is_ascii_digit() {
      self.advance();
    }

    // Seeking for a fractional part
    if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
      // Consume the "."
      self.advance();

      // Consume the fractional part
      while self.peek().is_ascii_digit() {
        self.advance();
      }
    }

    self.make_token(TokenType::Number)
  }

  /// Make a token, specifically from `identifier`/keyword.
  fn identifier(&mut self) -> Token<'a> {
    while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
      self.advance();
    }
    let kind = self.identifier_type();
    self.make_token(kind)
  }

  /// Classify the just-scanned lexeme as a keyword or a plain identifier.
  ///
  /// Nested-match trie on the first byte(s), not a `HashMap` lookup: avoids
  /// allocating and hashing a `String` per identifier token just to look it
  /// up, matching the rest of the scanner's preference for static `match`
  /// dispatch.
  fn identifier_type(&self) -> TokenType {
    let lexeme = &self.source[self.start..self.current];
    let mut chars = lexeme.bytes();
    match chars.next() {
      Some(b'a') => self.check_keyword(lexeme, "and", TokenType::And),
      Some(b'c') => self.check_keyword(lexeme, "class", TokenType::Class),
      Some(b'e') => self.check_keyword(lexeme, "else", TokenType::Else),
      Some(b'f') => match chars.next() {
        Some(b'a') => self.check_keyword(lexeme, "false", TokenType::False),
        Some(b'o') => self.check_keyword(lexeme, "for", TokenType::For),
        Some(b'u') => self.check_keyword(lexeme, "fun", TokenType::Fun),
        _ => TokenType::Identifier,
      },
      Some(b'i') => self.check_keyword(lexeme, "if", TokenType::If),
      Some(b'n') => self.check_keyword(lexeme, "nil", TokenType::Nil),
      Some(b'o') => self.check_keyword(lexeme, "or", TokenType::Or),
      Some(b'p') => self.check_keyword(lexeme, "print", TokenType::Print),
      Some(b'r') => self.check_keyword(lexeme, "return", TokenType::Return),
      Some(b's') => self.check_keyword(lexeme, "super", TokenType::Super),
      Some(b't') => match chars.next() {
        Some(b'h') => self.check_keyword(lexeme, "this", TokenType::This),
        Some(b'r') => self.check_keyword(lexeme, "true", TokenType::True),
        _ => TokenType::Identifier,
      },
      Some(b'v') => self.check_keyword(lexeme, "var", TokenType::Var),
      Some(b'w') => self.check_keyword(lexeme, "while", TokenType::While),
      _ => TokenType::Identifier,
    }
  }

  /// If `lexeme` matches `candidate` exactly, return `kind`; else this is a
  /// plain identifier that merely shares a prefix with a keyword.
  fn check_keyword(&self, lexeme: &str, candidate: &str, kind: TokenType) -> TokenType {
    if lexeme == candidate {
      kind
    } else {
      TokenType::Identifier
    }
  }
}

impl<'a> Scanner<'a> {
  /// Make a token.
  fn make_token(&self, token_type: TokenType) -> Token<'a> {
    Token {
      token_type,
      line: self.line,
      lexeme: &self.source[self.start..self.current],
    }
  }

  /// Make an error token.
  fn error_token(&self, message: &'a str) -> Token<'a> {
    Token {
      token_type: TokenType::Error,
      line: self.line,
      lexeme: message,
    }
  }
}

impl<'a> Scanner<'a> {
  /// Scan token from scanner
  pub fn scan_token(&mut self) -> Token<'a> {
    self.skip_white_space();

    // reset start position
    self.start = self.current;

    if self.is_at_end() {
      return self.make_token(TokenType::Eof);
    }

    let c = self.advance();

    if c.is_ascii_digit() {
      return self.number();
    }
    if c.is_ascii_alphabetic() || c == b'_' {
      return self.identifier();
    }

    match c {
      // mono-character tokens
      b'(' => self.make_token(TokenType::LeftParen),
      b')' => self.make_token(TokenType::RightParen),
      b'{' => self.make_token(TokenType::LeftBrace),
      b'}' => self.make_token(TokenType::RightBrace),
      b';' => self.make_token(TokenType::Semicolon),
      b',' => self.make_token(TokenType::Comma),
      b'.' => self.make_token(TokenType::Dot),
      b'-' => self.make_token(TokenType::Minus),
      b'+' => self.make_token(TokenType::Plus),
      b'/' => self.make_token(TokenType::Slash),
      b'*' => self.make_token(TokenType::Star),
      // possible two-character tokens
      b'!' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::BangEqual)
        } else {
          self.make_token(TokenType::Bang)
        }
      }
      b'=' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::EqualEqual)
        } else {
          self.make_token(TokenType::Equal)
        }
      }
      b'<' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::LessEqual)
        } else {
          self.make_token(TokenType::Less)
        }
      }
      b'>' => {
        if self.match_next(b'=') {
          self.make_token(TokenType::GreaterEqual)
        } else {
          self.make_token(TokenType::Greater)
        }
      }
      // string
      b'"' => self.string(),
      _ => self.error_token("Unexpected character."),
    }
  }
}

impl<'a> Scanner<'a> {
  /// Check if the scanner is at the end of the source code.
  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  /// Get current char, then advance the scanner (one step).
  fn advance(&mut self) -> u8 {
    self.current += 1;
    self.source.as_bytes()[self.current - 1]
  }

  /// Check if the next char matches the expected char.
  ///
  /// If it matches, advance the scanner (one step) immediately.
  fn match_next(&mut self, expected: u8) -> bool {
    if self.is_at_end() {
      return false;
    }
    if self.source.as_bytes()[self.current] != expected {
      return false;
    }
    self.current += 1;
    true
  }

  /// Get current char, without advancing the scanner.
  fn peek(&self) -> u8 {
    if self.is_at_end() {
      return b'\0';
    }
    self.source.as_bytes()[self.current]
  }

  /// Get the next char, without advancing the scanner.
  fn peek_next(&self) -> u8 {
    if self.current + 1 >= self.source.len() {
      return b'\0';
    }
    self.source.as_bytes()[self.current + 1]
  }

  fn skip_white_space(&mut self) {
    loop {
      let c = self.peek();
      match c {
        b' ' | b'\r' | b'\t' => {
          self.advance();
        }
        b'\n' => {
          self.line += 1;
          self.advance();
        }
        b'/' => {
          if self.peek_next() == b'/' {
            while self.peek() != b'\n' && !self.is_at_end() {
              self.advance();
            }
          } else {
            return;
          }
        }
        _ => return,
      }
    }
  }
}

impl<'a> Scanner<'a> {
  /// Bind a new scanner to the source code.
  #[inline]
  pub fn init(src: &'a str) -> Self {
    Self {
      source: src,
      start: 0,
      current: 0,
      line: 1,
    }
  }

  /// Bind a new scanner to the source code.
  #[inline]
  pub fn bind(src: &'a str) -> Self {
    Scanner::init(src)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scan_all(src: &str) -> Vec<TokenType> {
    let mut scanner = Scanner::init(src);
    let mut kinds = Vec::new();
    loop {
      let token = scanner.scan_token();
      let done = token.token_type == TokenType::Eof;
      kinds.push(token.token_type);
      if done {
        break;
      }
    }
    kinds
  }

  #[test]
  fn classifies_keywords_and_identifiers() {
    assert_eq!(
      scan_all("and class foo"),
      vec![TokenType::And, TokenType::Class, TokenType::Identifier, TokenType::Eof]
    );
    // Shares a prefix with `for`/`false` but isn't a keyword.
    assert_eq!(scan_all("formula"), vec![TokenType::Identifier, TokenType::Eof]);
    assert_eq!(scan_all("falsetto"), vec![TokenType::Identifier, TokenType::Eof]);
  }

  #[test]
  fn scans_number_with_fraction_but_not_trailing_dot() {
    let mut scanner = Scanner::init("1.5.");
    let number = scanner.scan_token();
    assert_eq!(number.token_type, TokenType::Number);
    assert_eq!(number.lexeme, "1.5");
    let dot = scanner.scan_token();
    assert_eq!(dot.token_type, TokenType::Dot);
  }

  #[test]
  fn unterminated_string_is_an_error_token() {
    let mut scanner = Scanner::init("\"unterminated");
    let token = scanner.scan_token();
    assert_eq!(token.token_type, TokenType::Error);
    assert_eq!(token.lexeme, "Unterminated string.");
  }

  #[test]
  fn multi_line_string_tracks_line_numbers() {
    let mut scanner = Scanner::init("\"a\nb\"");
    let token = scanner.scan_token();
    assert_eq!(token.token_type, TokenType::String);
    assert_eq!(scanner.line, 2);
  }

  #[test]
  fn lone_slash_is_a_slash_token_not_a_comment() {
    assert_eq!(scan_all("/ 1"), vec![TokenType::Slash, TokenType::Number, TokenType::Eof]);
  }

  #[test]
  fn line_comment_is_skipped_entirely() {
    assert_eq!(scan_all("// a comment\n1"), vec![TokenType::Number, TokenType::Eof]);
  }

  #[test]
  fn eof_is_returned_indefinitely() {
    let mut scanner = Scanner::init("");
    assert_eq!(scanner.scan_token().token_type, TokenType::Eof);
    assert_eq!(scanner.scan_token().token_type, TokenType::Eof);
  }

  #[test]
  fn two_character_operators_are_distinguished_from_one_character() {
    assert_eq!(
      scan_all("!= == <= >= ! = < >"),
      vec![
        TokenType::BangEqual,
        TokenType::EqualEqual,
        TokenType::LessEqual,
        TokenType::GreaterEqual,
        TokenType::Bang,
        TokenType::Equal,
        TokenType::Less,
        TokenType::Greater,
        TokenType::Eof,
      ]
    );
  }
}
