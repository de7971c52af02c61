// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Fresh names for states and symbols
//!
//! A [NameAllocator] produces names of the form `<prefix><n>` for n = 1, 2, ...
//! skipping names that are already used. A [CompositeStates] table assigns a
//! fresh state to each composite key (state pair, state set) the first time the
//! key is seen, and returns the same state afterwards.
//!

use std::{
    collections::{hash_map::Entry, HashMap, HashSet},
    hash::Hash,
};

use crate::states::State;

/// Prefix for fresh state names
pub const STATE_PREFIX: &str = "s";

/// Prefix for fresh input symbol names
pub const INPUT_SYMBOL_PREFIX: &str = "i";

///
/// Generator of fresh names
///
#[derive(Debug, Clone)]
pub struct NameAllocator {
    prefix: String,
    used: HashSet<String>,
    counter: usize,
}

impl NameAllocator {
    /// Allocator with no reserved names
    pub fn new(prefix: &str) -> Self {
        NameAllocator {
            prefix: prefix.to_string(),
            used: HashSet::new(),
            counter: 0,
        }
    }

    /// Allocator that never returns any of the `used` names
    pub fn avoiding<S: Into<String>>(prefix: &str, used: impl IntoIterator<Item = S>) -> Self {
        NameAllocator {
            prefix: prefix.to_string(),
            used: used.into_iter().map(Into::into).collect(),
            counter: 0,
        }
    }

    /// Mark a name as used
    /// - return false if it was already used
    pub fn reserve(&mut self, name: &str) -> bool {
        self.used.insert(name.to_string())
    }

    /// Next unused name. The returned name is marked as used.
    pub fn fresh(&mut self) -> String {
        loop {
            self.counter += 1;
            let name = format!("{}{}", self.prefix, self.counter);
            if self.used.insert(name.clone()) {
                return name;
            }
        }
    }

    /// Fresh state
    pub fn fresh_state(&mut self) -> State {
        State::from(self.fresh())
    }
}

///
/// Map from composite keys to fresh states
///
#[derive(Debug)]
pub struct CompositeStates<K> {
    map: HashMap<K, State>,
    names: NameAllocator,
}

impl<K: Eq + Hash> CompositeStates<K> {
    /// Empty table that allocates names from `names`
    pub fn new(names: NameAllocator) -> Self {
        CompositeStates {
            map: HashMap::new(),
            names,
        }
    }

    /// State for key k
    /// - return the existing state if k has been seen before
    /// - allocate a fresh state otherwise
    pub fn make(&mut self, k: K) -> State {
        match self.map.entry(k) {
            Entry::Occupied(o) => o.get().clone(),
            Entry::Vacant(e) => {
                let s = self.names.fresh_state();
                e.insert(s).clone()
            }
        }
    }

    /// Same as make but with a given name for new keys
    /// - if k is new, it's mapped to `state`
    pub fn make_with(&mut self, k: K, state: State) -> State {
        self.map.entry(k).or_insert(state).clone()
    }
}
