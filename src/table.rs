//! # Table
//!
//! A module which wraps [`std::collections::HashMap`] for the VM's globals
//! map: `{StringRef: Value}` pairs, keyed by interned-string identity (see
//! [`crate::object::StringRef`]).

use std::collections::HashMap;

use crate::{object::StringRef, utils::Init, value::Value};

#[derive(Debug, Clone, Default)]
pub struct Table(HashMap<StringRef, Value>);

impl Table {
  pub fn get(&self, key: &StringRef) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn set(&mut self, key: StringRef, value: Value) -> Option<Value> {
    self.0.insert(key, value)
  }

  pub fn contains(&self, key: &StringRef) -> bool {
    self.0.contains_key(key)
  }

  pub fn remove(&mut self, key: &StringRef) -> Option<Value> {
    self.0.remove(key)
  }

  pub fn free(&mut self) {
    self.0.clear()
  }
}

impl Init for Table {}
