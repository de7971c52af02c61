// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Transition systems
//!
//! A transition system is an initial state and a set of transitions. The set of
//! states is implicit: it's the initial state plus every end point of a transition.
//! Transitions are kept in insertion order so that all derived outputs
//! (state lists, dumps, renamings) are deterministic.
//!

use std::fmt::Display;

use indexmap::IndexSet;

use crate::{match_context::MatchContext, states::State, symbols::Symbol, transitions::Transition};

///
/// Initial state + set of transitions
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSystem {
    initial_state: State,
    transitions: IndexSet<Transition>,
}

impl TransitionSystem {
    /// Create a transition system
    pub fn new(initial_state: State, transitions: impl IntoIterator<Item = Transition>) -> Self {
        TransitionSystem {
            initial_state,
            transitions: transitions.into_iter().collect(),
        }
    }

    /// Initial state
    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    /// Change the initial state
    pub fn set_initial_state(&mut self, state: State) {
        self.initial_state = state;
    }

    /// All transitions
    pub fn transitions(&self) -> &IndexSet<Transition> {
        &self.transitions
    }

    /// Mutable access to the transitions
    pub fn transitions_mut(&mut self) -> &mut IndexSet<Transition> {
        &mut self.transitions
    }

    /// Number of transitions
    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    ///
    /// All states
    ///
    /// The initial state comes first, then the end points of every
    /// transition in order of first occurrence.
    ///
    pub fn states(&self) -> IndexSet<State> {
        let mut result = IndexSet::new();
        result.insert(self.initial_state.clone());
        for t in &self.transitions {
            result.insert(t.pre().clone());
            result.insert(t.post().clone());
        }
        result
    }

    /// Transitions whose source is `state`
    pub fn transitions_from<'a>(
        &'a self,
        state: &'a State,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions.iter().filter(move |t| t.pre() == state)
    }

    /// Epsilon transitions whose source is `state`
    pub fn epsilon_transitions_from<'a>(
        &'a self,
        state: &'a State,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions_from(state).filter(|t| t.is_epsilon())
    }

    ///
    /// Transitions from `state` whose input is exactly `input`
    ///
    /// This is syntactic: a transition on variable `$x` is returned only
    /// for input `$x`.
    ///
    pub fn transitions_on<'a>(
        &'a self,
        state: &'a State,
        input: &'a Symbol,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions_from(state)
            .filter(move |t| t.input() == Some(input))
    }

    ///
    /// Transitions from `state` that accept `symbol`
    ///
    /// Each transition is probed with a fresh match context.
    ///
    pub fn accept_transitions<'a>(
        &'a self,
        state: &'a State,
        symbol: &'a Symbol,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions_from(state)
            .filter(move |t| t.accept(symbol, &mut MatchContext::new()))
    }

    /// Add a transition. Return false if it was already present.
    pub fn add_transition(&mut self, t: Transition) -> bool {
        self.transitions.insert(t)
    }

    /// Remove a transition. Return false if it was absent.
    pub fn remove_transition(&mut self, t: &Transition) -> bool {
        self.transitions.shift_remove(t)
    }
}

impl Display for TransitionSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "initial state: {}", self.initial_state)?;
        let mut lines: Vec<String> = self.transitions.iter().map(|t| t.to_string()).collect();
        lines.sort();
        for line in &lines {
            writeln!(f, "   {line}")?;
        }
        Ok(())
    }
}
