//! # Utils
//!
//! This module contains utility components (functions, traits, etc.) for the project.

/// A trait for initializing a type.
pub trait Init: Default {
  /// Creates a new instance of the given type.
  fn init() -> Self {
    Self::default()
  }
}
