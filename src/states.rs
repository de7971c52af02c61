// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Automaton states
//!
//! A state is an opaque named node. Two states with the same name are the same
//! state within one transition system. Names are not unique across automata:
//! operations that combine automata rename states through a
//! [NameAllocator](crate::naming::NameAllocator).
//!

use std::{fmt::Display, rc::Rc};

///
/// Named state
///
/// States are ordered by name, which gives a stable iteration order
/// for debug output.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    name: Rc<str>,
}

impl State {
    /// State with the given name
    pub fn new(name: &str) -> State {
        State { name: name.into() }
    }

    /// Name of this state
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for State {
    fn from(name: &str) -> Self {
        State::new(name)
    }
}

impl From<String> for State {
    fn from(name: String) -> Self {
        State { name: name.into() }
    }
}
