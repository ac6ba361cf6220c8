//! # Object
//!
//! This module defines `StringRef`, the interned-string handle shared by the
//! compiler's constant pool and the VM's stack/globals.
//!
//! Earlier drafts represented heap objects as a tagged `Obj` behind a
//! `NonNull` pointer, requiring `unsafe` at every access. There is exactly
//! one object kind in this language (strings), so that machinery collapses
//! into a single `Rc<str>` handle: cheap to clone, safe to share, and
//! equality/hash are defined over the pointer, not the bytes, once the
//! handle has gone through the interner in [`crate::memory::StringInterner`].

use std::{
  fmt::{Debug, Display},
  hash::{Hash, Hasher},
  rc::Rc,
};

/// A handle to an interned string.
///
/// Two `StringRef`s are equal iff they point at the same allocation, which
/// is guaranteed when both were produced by the same
/// [`crate::memory::StringInterner`].
#[derive(Clone)]
pub struct StringRef(pub(crate) Rc<str>);

impl StringRef {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl PartialEq for StringRef {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}
impl Eq for StringRef {}

impl Hash for StringRef {
  fn hash<H: Hasher>(&self, state: &mut H) {
    Rc::as_ptr(&self.0).hash(state);
  }
}

impl Debug for StringRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self.0)
  }
}

impl Display for StringRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}
