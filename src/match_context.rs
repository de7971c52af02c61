// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Binding environment for matching and substitution
//!
//! A match context maps pattern symbols (usually variables) to the symbols they
//! matched. A context is created for one matching or transduction attempt and
//! discarded afterwards.
//!

use std::{collections::HashMap, iter::FromIterator};

use crate::symbols::Symbol;

///
/// Map from pattern symbols to bound symbols
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchContext {
    bindings: HashMap<Symbol, Symbol>,
}

impl MatchContext {
    /// Empty context
    pub fn new() -> Self {
        MatchContext {
            bindings: HashMap::new(),
        }
    }

    /// Bind `key` to `value`
    /// - return the previous binding of `key` if any
    pub fn bind(&mut self, key: Symbol, value: Symbol) -> Option<Symbol> {
        self.bindings.insert(key, value)
    }

    /// Get the binding of a symbol
    pub fn get(&self, key: &Symbol) -> Option<&Symbol> {
        self.bindings.get(key)
    }

    /// Check whether a symbol is bound
    pub fn is_bound(&self, key: &Symbol) -> bool {
        self.bindings.contains_key(key)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check emptiness
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate through the bindings
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Symbol)> {
        self.bindings.iter()
    }

    /// Remove all bindings
    pub fn clear(&mut self) {
        self.bindings.clear()
    }
}

impl FromIterator<(Symbol, Symbol)> for MatchContext {
    fn from_iter<I: IntoIterator<Item = (Symbol, Symbol)>>(iter: I) -> Self {
        MatchContext {
            bindings: iter.into_iter().collect(),
        }
    }
}
