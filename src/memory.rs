//! # Memory
//!
//! This module is mainly about memory management: specifically, string
//! interning. There is no general-purpose GC in this crate (see the
//! Non-goals) — the only thing worth deduplicating is string allocations,
//! since variable names and string literals are compared and hashed
//! constantly by the compiler and VM.

use std::{collections::HashMap, rc::Rc};

use crate::object::StringRef;

/// Maps byte-sequences to a single canonical heap allocation so that
/// `StringRef` equality (pointer equality, see [`crate::object::StringRef`])
/// reduces to an O(1) comparison instead of a byte-by-byte one.
#[derive(Debug, Default)]
pub struct StringInterner {
  table: HashMap<Rc<str>, Rc<str>>,
}

impl StringInterner {
  /// Intern `s`, returning the canonical handle. Calling this twice with
  /// equal byte-sequences always returns handles that compare equal.
  pub fn intern(&mut self, s: &str) -> StringRef {
    if let Some(existing) = self.table.get(s) {
      return StringRef(existing.clone());
    }
    let rc: Rc<str> = Rc::from(s);
    self.table.insert(rc.clone(), rc.clone());
    StringRef(rc)
  }

  /// Intern the concatenation of two strings without an intermediate
  /// allocation beyond the one `format!` needs.
  pub fn intern_concat(&mut self, lhs: &str, rhs: &str) -> StringRef {
    let mut combined = String::with_capacity(lhs.len() + rhs.len());
    combined.push_str(lhs);
    combined.push_str(rhs);
    self.intern(&combined)
  }

  pub fn len(&self) -> usize {
    self.table.len()
  }

  pub fn is_empty(&self) -> bool {
    self.table.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn interning_the_same_bytes_twice_yields_equal_handles() {
    let mut interner = StringInterner::default();
    let a = interner.intern("hello");
    let b = interner.intern("hello");
    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
  }

  #[test]
  fn distinct_strings_intern_to_distinct_handles() {
    let mut interner = StringInterner::default();
    let a = interner.intern("hello");
    let b = interner.intern("world");
    assert_ne!(a, b);
    assert_eq!(interner.len(), 2);
  }

  #[test]
  fn intern_concat_reuses_the_interner() {
    let mut interner = StringInterner::default();
    let concatenated = interner.intern_concat("he", "llo");
    let expected = interner.intern("hello");
    assert_eq!(concatenated, expected);
  }
}
