// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Symbolic finite-state transducers
//!
//! An automaton is a [TransitionSystem] plus a set of final states. It is
//! nondeterministic in general: several transitions from the same state may accept
//! the same symbol, and epsilon transitions move between states without consuming
//! input.
//!
//! Function [translate](Automaton::translate) runs the automaton as a transducer.
//! It explores all the paths from the initial state that consume the input
//! sequence and end in a final state, and returns the output sequence produced along
//! each of them. An input is accepted if there's at least one such path.
//!
//! Epsilon cycles are explored at most once per input position: the search does not
//! re-enter a state it reached by epsilon moves since the last consumed symbol.
//!
use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
};

use indexmap::IndexSet;

use crate::{
    states::State,
    symbols::{Symbol, SymbolFactory},
    transition_systems::TransitionSystem,
    transitions::Transition,
};

///
/// Automaton: transition system + final states
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    system: TransitionSystem,
    final_states: IndexSet<State>,
}

// successor index and input for one translate call
struct Search<'a> {
    successors: HashMap<&'a State, Vec<&'a Transition>>,
    final_states: &'a IndexSet<State>,
    input: &'a [Symbol],
}

impl<'a> Search<'a> {
    fn new(automaton: &'a Automaton, input: &'a [Symbol]) -> Self {
        let mut successors: HashMap<&'a State, Vec<&'a Transition>> = HashMap::new();
        for t in automaton.transitions() {
            successors.entry(t.pre()).or_default().push(t);
        }
        Search {
            successors,
            final_states: &automaton.final_states,
            input,
        }
    }

    //
    // outputs = outputs produced so far on the current path
    // epsilon_path = states entered by epsilon moves since the last consumed symbol
    //
    fn explore(
        &self,
        state: &'a State,
        pos: usize,
        outputs: &mut Vec<Symbol>,
        epsilon_path: &mut HashSet<&'a State>,
        results: &mut Vec<Vec<Symbol>>,
    ) {
        if pos == self.input.len() && self.final_states.contains(state) {
            results.push(outputs.clone());
            return;
        }
        let transitions = match self.successors.get(state) {
            Some(v) => v,
            None => return,
        };
        for &t in transitions {
            let mark = outputs.len();
            if t.is_epsilon() {
                if epsilon_path.insert(t.post()) {
                    outputs.extend(t.outputs().iter().cloned());
                    self.explore(t.post(), pos, outputs, epsilon_path, results);
                    epsilon_path.remove(t.post());
                }
            } else if pos < self.input.len() {
                if let Some(out) = t.transit(&self.input[pos]) {
                    outputs.extend(out);
                    let mut path = HashSet::new();
                    path.insert(t.post());
                    self.explore(t.post(), pos + 1, outputs, &mut path, results);
                }
            }
            outputs.truncate(mark);
        }
    }
}

impl Automaton {
    /// Automaton with the given initial state, final states, and transitions
    pub fn new(
        initial_state: State,
        final_states: impl IntoIterator<Item = State>,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Self {
        Automaton {
            system: TransitionSystem::new(initial_state, transitions),
            final_states: final_states.into_iter().collect(),
        }
    }

    /// Automaton built from a transition system and final states
    pub fn from_system(
        system: TransitionSystem,
        final_states: impl IntoIterator<Item = State>,
    ) -> Self {
        Automaton {
            system,
            final_states: final_states.into_iter().collect(),
        }
    }

    ///
    /// Chain automaton that accepts exactly the given sequence
    ///
    /// The states are s0, s1, ..., sN where N is the length of the sequence.
    /// sN is the only final state.
    ///
    pub fn from_symbols(symbols: &[Symbol]) -> Self {
        let state = |i: usize| State::from(format!("s{i}"));
        let transitions = symbols
            .iter()
            .enumerate()
            .map(|(i, x)| Transition::new(state(i), state(i + 1), x.clone()));
        Automaton::new(state(0), vec![state(symbols.len())], transitions)
    }

    /// Chain automaton with symbols created by a factory
    pub fn from_names<F: SymbolFactory>(factory: &mut F, names: &[&str]) -> Self {
        let symbols: Vec<Symbol> = names.iter().map(|n| factory.literal(n)).collect();
        Self::from_symbols(&symbols)
    }

    /// Underlying transition system
    pub fn system(&self) -> &TransitionSystem {
        &self.system
    }

    /// Initial state
    pub fn initial_state(&self) -> &State {
        self.system.initial_state()
    }

    /// Change the initial state
    pub fn set_initial_state(&mut self, state: State) {
        self.system.set_initial_state(state)
    }

    /// Final states
    pub fn final_states(&self) -> &IndexSet<State> {
        &self.final_states
    }

    /// Mutable access to the final states
    pub fn final_states_mut(&mut self) -> &mut IndexSet<State> {
        &mut self.final_states
    }

    /// Check whether a state is final
    pub fn is_final(&self, state: &State) -> bool {
        self.final_states.contains(state)
    }

    /// Transitions
    pub fn transitions(&self) -> &IndexSet<Transition> {
        self.system.transitions()
    }

    /// Mutable access to the transitions
    pub fn transitions_mut(&mut self) -> &mut IndexSet<Transition> {
        self.system.transitions_mut()
    }

    /// Number of transitions
    pub fn num_transitions(&self) -> usize {
        self.system.num_transitions()
    }

    ///
    /// All states
    ///
    /// This includes the initial state, the end points of all transitions,
    /// and the final states (even if they're isolated).
    ///
    pub fn states(&self) -> IndexSet<State> {
        let mut result = self.system.states();
        result.extend(self.final_states.iter().cloned());
        result
    }

    /// Number of states
    pub fn num_states(&self) -> usize {
        self.states().len()
    }

    /// Transitions from a state
    pub fn transitions_from<'a>(
        &'a self,
        state: &'a State,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        self.system.transitions_from(state)
    }

    /// Number of epsilon transitions
    pub fn num_epsilon_transitions(&self) -> usize {
        self.transitions().iter().filter(|t| t.is_epsilon()).count()
    }

    ///
    /// Run the automaton as a transducer from its initial state
    ///
    /// Return the output sequence of every accepting path for `input`.
    /// An empty vector means that the input is rejected. Distinct paths
    /// that produce the same outputs give duplicate entries.
    ///
    pub fn translate(&self, input: &[Symbol]) -> Vec<Vec<Symbol>> {
        self.translate_from(self.initial_state(), input)
    }

    /// Same as [translate](Self::translate) but starting from `state`
    pub fn translate_from(&self, state: &State, input: &[Symbol]) -> Vec<Vec<Symbol>> {
        let search = Search::new(self, input);
        let mut results = Vec::new();
        let mut path = HashSet::new();
        path.insert(state);
        search.explore(state, 0, &mut Vec::new(), &mut path, &mut results);
        results
    }

    /// Check whether an input sequence is accepted
    pub fn accept(&self, input: &[Symbol]) -> bool {
        !self.translate(input).is_empty()
    }

    // edge label in dumps
    fn edge_label(t: &Transition) -> String {
        let mut label = if t.has_outputs() || t.is_epsilon() {
            t.label()
        } else {
            t.input().map(|x| x.to_string()).unwrap_or_default()
        };
        if let Some(c) = t.condition() {
            label.push_str(&format!(" if {c:?}"));
        }
        label
    }

    ///
    /// Graphviz description of this automaton
    ///
    /// Final states are drawn as double circles. Node and edge lines are sorted
    /// so that the result does not depend on the order of transitions.
    ///
    pub fn to_dot(&self) -> String {
        fn quote(s: &str) -> String {
            format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
        }

        let mut nodes: Vec<String> = self
            .states()
            .iter()
            .map(|s| {
                let shape = if self.is_final(s) {
                    "doublecircle"
                } else {
                    "circle"
                };
                format!("  {} [shape={}];", quote(s.name()), shape)
            })
            .collect();
        nodes.sort();

        let mut edges: Vec<String> = self
            .transitions()
            .iter()
            .map(|t| {
                format!(
                    "  {} -> {} [label={}];",
                    quote(t.pre().name()),
                    quote(t.post().name()),
                    quote(&Self::edge_label(t))
                )
            })
            .collect();
        edges.sort();

        let mut result = String::from("digraph automaton {\n");
        result.push_str("  rankdir=LR;\n  __start [shape=point];\n");
        let init = quote(self.initial_state().name());
        result.push_str(&format!("  __start -> {init};\n"));
        for line in nodes.iter().chain(edges.iter()) {
            result.push_str(line);
            result.push('\n');
        }
        result.push_str("}\n");
        result
    }
}

impl Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn plural(n: usize) -> &'static str {
            if n == 1 {
                ""
            } else {
                "s"
            }
        }

        let n = self.num_states();
        writeln!(f, "{} state{}", n, plural(n))?;
        writeln!(f, "initial state: {}", self.initial_state())?;
        let mut finals: Vec<&State> = self.final_states.iter().collect();
        finals.sort();
        write!(f, "final state{}:", plural(finals.len()))?;
        for s in finals {
            write!(f, " {s}")?;
        }
        writeln!(f)?;
        writeln!(f, "transitions:")?;
        let mut edges: Vec<String> = self
            .transitions()
            .iter()
            .map(|t| {
                let label = Self::edge_label(t);
                format!("  \u{03B4}({}, {}) = {}", t.pre(), label, t.post())
            })
            .collect();
        edges.sort();
        for e in &edges {
            writeln!(f, "{e}")?;
        }
        Ok(())
    }
}

///
/// Automaton builder
///
/// States are given by name. Transitions and final states can be added
/// in any order.
///
#[derive(Debug)]
pub struct AutomatonBuilder {
    initial_state: State,
    final_states: IndexSet<State>,
    transitions: IndexSet<Transition>,
}

impl AutomatonBuilder {
    ///
    /// Create a new builder
    ///
    /// - initial_state = name of the initial state for the resulting automaton
    ///
    pub fn new(initial_state: &str) -> Self {
        AutomatonBuilder {
            initial_state: State::new(initial_state),
            final_states: IndexSet::new(),
            transitions: IndexSet::new(),
        }
    }

    ///
    /// Mark a final state
    ///
    pub fn mark_final(&mut self, state: &str) -> &mut Self {
        self.final_states.insert(State::new(state));
        self
    }

    ///
    /// Add a transition on `input` with no outputs
    ///
    pub fn add_transition(&mut self, state: &str, input: Symbol, next: &str) -> &mut Self {
        self.add(Transition::new(State::new(state), State::new(next), input))
    }

    ///
    /// Add a transition on `input` that emits `outputs`
    ///
    pub fn add_transduction(
        &mut self,
        state: &str,
        input: Symbol,
        outputs: Vec<Symbol>,
        next: &str,
    ) -> &mut Self {
        self.add(Transition::with_outputs(
            State::new(state),
            State::new(next),
            input,
            outputs,
        ))
    }

    ///
    /// Add an epsilon transition that emits `outputs`
    ///
    pub fn add_epsilon(&mut self, state: &str, outputs: Vec<Symbol>, next: &str) -> &mut Self {
        self.add(Transition::epsilon_with_outputs(
            State::new(state),
            State::new(next),
            outputs,
        ))
    }

    ///
    /// Add an arbitrary transition
    ///
    pub fn add(&mut self, t: Transition) -> &mut Self {
        self.transitions.insert(t);
        self
    }

    ///
    /// Construct the automaton
    ///
    pub fn build(&self) -> Automaton {
        Automaton::new(
            self.initial_state.clone(),
            self.final_states.iter().cloned(),
            self.transitions.iter().cloned(),
        )
    }
}
