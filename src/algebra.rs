// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Operations on automata
//!
//! All operations take their operands by reference and return a new automaton,
//! except [concatenate_in_place] and [union_in_place], which modify their first
//! operand.
//!
//! Operations that combine two automata rename states so that the two operands
//! don't share state names. Fresh names are produced by a [NameAllocator] that
//! lives for the duration of one call.
//!
//! Summary:
//! - renaming: [use_unique_states], [use_unique_input_symbols]
//! - Thompson-style combinations: [concatenation], [union]
//! - normalization: [eliminate_epsilon_transitions], [eliminate_nondeterminism],
//!   [eliminate_unreachable_states]
//! - boolean operations: [complement], [intersection], [subtraction]
//! - alphabet expansion: [expand], [complement_over]
//!
//! Determinization and complement only apply to automata whose transitions are
//! on concrete symbols and have no outputs. Complement and intersection produce
//! guarded transitions so they don't need to enumerate the alphabet.
//!

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};

use crate::{
    automata::Automaton,
    bfs_queues::BfsQueue,
    errors::Error,
    match_context::MatchContext,
    naming::{CompositeStates, NameAllocator, INPUT_SYMBOL_PREFIX, STATE_PREFIX},
    states::State,
    symbols::Symbol,
    transitions::{OutputFilter, Transition, MATCHED_SYMBOL},
};

// map state -> transitions from that state
fn successor_index(a: &Automaton) -> HashMap<&State, Vec<&Transition>> {
    let mut index: HashMap<&State, Vec<&Transition>> = HashMap::new();
    for t in a.transitions() {
        index.entry(t.pre()).or_default().push(t);
    }
    index
}

/// Names of all the states of `a`
pub fn collect_state_names(a: &Automaton) -> HashSet<String> {
    a.states().iter().map(|s| s.name().to_string()).collect()
}

/// Input symbols of all non-epsilon transitions of `a`
pub fn collect_input_symbols(a: &Automaton) -> IndexSet<Symbol> {
    a.transitions()
        .iter()
        .filter_map(|t| t.input().cloned())
        .collect()
}

/// Names of all the input symbols of `a`
pub fn collect_input_symbol_names(a: &Automaton) -> HashSet<String> {
    a.transitions()
        .iter()
        .filter_map(|t| t.input().map(|x| x.name()))
        .collect()
}

///
/// States reachable from the initial state of `a`
///
/// The states are listed in breadth-first order.
///
pub fn collect_reachable_states(a: &Automaton) -> IndexSet<State> {
    let index = successor_index(a);
    let mut queue = BfsQueue::new();
    let mut result = IndexSet::new();
    queue.push(a.initial_state());
    while let Some(s) = queue.pop() {
        result.insert(s.clone());
        if let Some(transitions) = index.get(s) {
            queue.push_all(transitions.iter().map(|t| t.post()));
        }
    }
    result
}

/// State whose name is not used in `a`
pub fn unique_state(a: &Automaton) -> State {
    NameAllocator::avoiding(STATE_PREFIX, collect_state_names(a)).fresh_state()
}

/// Literal symbol whose name is not used as an input of `a`
pub fn unique_input_symbol(a: &Automaton) -> Symbol {
    let name = NameAllocator::avoiding(INPUT_SYMBOL_PREFIX, collect_input_symbol_names(a)).fresh();
    Symbol::literal(&name)
}

///
/// Rename all the states of `target`
///
/// The new names are fresh: they're distinct from each other and not in `used`.
/// Return the renamed automaton and the map from old to new states.
///
pub fn use_unique_states(
    target: &Automaton,
    used: &HashSet<String>,
) -> (Automaton, HashMap<State, State>) {
    let mut names = NameAllocator::avoiding(STATE_PREFIX, used.iter().cloned());
    let map: HashMap<State, State> = target
        .states()
        .into_iter()
        .map(|s| (s, names.fresh_state()))
        .collect();
    let transitions = target
        .transitions()
        .iter()
        .map(|t| t.moved(map[t.pre()].clone(), map[t.post()].clone()));
    let finals = target.final_states().iter().map(|s| map[s].clone());
    let result = Automaton::new(map[target.initial_state()].clone(), finals, transitions);
    (result, map)
}

///
/// Rename the concrete input symbols of `target`
///
/// Every input symbol without variables is replaced by a fresh literal
/// `i1`, `i2`, ... whose name is not in `used`. Variable inputs and epsilon
/// transitions are kept. Return the renamed automaton and the symbol map.
///
pub fn use_unique_input_symbols(
    target: &Automaton,
    used: &HashSet<String>,
) -> (Automaton, HashMap<Symbol, Symbol>) {
    let mut names = NameAllocator::avoiding(INPUT_SYMBOL_PREFIX, used.iter().cloned());
    let mut map = HashMap::new();
    let mut transitions = Vec::with_capacity(target.num_transitions());
    for t in target.transitions() {
        match t.input() {
            Some(x) if !x.has_variables() => {
                let y = map
                    .entry(x.clone())
                    .or_insert_with(|| Symbol::literal(&names.fresh()))
                    .clone();
                transitions.push(t.with_input(y));
            }
            _ => transitions.push(t.clone()),
        }
    }
    let result = Automaton::new(
        target.initial_state().clone(),
        target.final_states().iter().cloned(),
        transitions,
    );
    (result, map)
}

///
/// Concatenate `b` to `a` in place
///
/// States of `b` must not occur in `a`. Every final state of `a` gets an epsilon
/// transition to the initial state of `b`. The final states of `b` become the
/// final states of `a`.
///
pub fn concatenate_in_place(a: &mut Automaton, b: &Automaton) {
    let b_init = b.initial_state();
    let links: Vec<Transition> = a
        .final_states()
        .iter()
        .filter(|f| *f != b_init)
        .map(|f| Transition::epsilon(f.clone(), b_init.clone()))
        .collect();
    let transitions = a.transitions_mut();
    transitions.extend(links);
    transitions.extend(b.transitions().iter().cloned());
    *a.final_states_mut() = b.final_states().clone();
}

///
/// Concatenation of a and b
///
/// Also return the renaming applied to the states of b.
///
pub fn concatenation_with_map(a: &Automaton, b: &Automaton) -> (Automaton, HashMap<State, State>) {
    let (b, map) = use_unique_states(b, &collect_state_names(a));
    let mut result = a.clone();
    concatenate_in_place(&mut result, &b);
    (result, map)
}

/// Concatenation of a and b: accepts w1.w2 for w1 accepted by a and w2 accepted by b
pub fn concatenation(a: &Automaton, b: &Automaton) -> Automaton {
    concatenation_with_map(a, b).0
}

///
/// Union of a and b in place
///
/// States of `b` must not occur in `a`. A fresh initial state is added
/// with epsilon transitions to the initial states of `a` and `b`.
///
pub fn union_in_place(a: &mut Automaton, b: &Automaton) {
    let mut names = NameAllocator::avoiding(STATE_PREFIX, collect_state_names(a));
    for name in collect_state_names(b) {
        names.reserve(&name);
    }
    let init = names.fresh_state();
    let a_init = a.initial_state().clone();
    let transitions = a.transitions_mut();
    transitions.insert(Transition::epsilon(init.clone(), a_init));
    transitions.insert(Transition::epsilon(init.clone(), b.initial_state().clone()));
    transitions.extend(b.transitions().iter().cloned());
    a.final_states_mut()
        .extend(b.final_states().iter().cloned());
    a.set_initial_state(init);
}

///
/// Union of a and b
///
/// Also return the renaming applied to the states of b.
///
pub fn union_with_map(a: &Automaton, b: &Automaton) -> (Automaton, HashMap<State, State>) {
    let (b, map) = use_unique_states(b, &collect_state_names(a));
    let mut result = a.clone();
    union_in_place(&mut result, &b);
    (result, map)
}

/// Union of a and b
pub fn union(a: &Automaton, b: &Automaton) -> Automaton {
    union_with_map(a, b).0
}

//
// Result of following epsilon transitions from the target of an epsilon transition t
// - transitions: copies of the non-epsilon transitions reached, moved to start
//   from t's source, with the epsilon outputs prepended
// - reaches_final: whether a final state was reached
//
#[derive(Debug, Default)]
struct EpsilonClosure {
    transitions: Vec<Transition>,
    reaches_final: bool,
}

struct EpsilonChase<'a> {
    automaton: &'a Automaton,
    index: HashMap<&'a State, Vec<&'a Transition>>,
}

impl<'a> EpsilonChase<'a> {
    fn new(automaton: &'a Automaton) -> Self {
        EpsilonChase {
            automaton,
            index: successor_index(automaton),
        }
    }

    fn closure(&self, t: &'a Transition) -> Result<EpsilonClosure, Error> {
        let mut result = EpsilonClosure::default();
        let mut path = HashSet::new();
        path.insert(t);
        let mut prefix = t.outputs().to_vec();
        self.chase(t, t.post(), &mut prefix, &mut path, &mut result)?;
        Ok(result)
    }

    fn chase(
        &self,
        origin: &Transition,
        state: &'a State,
        prefix: &mut Vec<Symbol>,
        path: &mut HashSet<&'a Transition>,
        result: &mut EpsilonClosure,
    ) -> Result<(), Error> {
        if self.automaton.is_final(state) {
            if !prefix.is_empty() {
                return Err(Error::OutputIntoFinalState(origin.to_string()));
            }
            result.reaches_final = true;
        }
        let transitions = match self.index.get(state) {
            Some(v) => v,
            None => return Ok(()),
        };
        for &u in transitions {
            if u.is_epsilon() {
                // an epsilon path enters each transition at most once
                if !u.is_self_loop() && path.insert(u) {
                    let mark = prefix.len();
                    prefix.extend(u.outputs().iter().cloned());
                    self.chase(origin, u.post(), prefix, path, result)?;
                    prefix.truncate(mark);
                    path.remove(u);
                }
            } else {
                let mut copy = u.with_pre(origin.pre().clone());
                copy.prepend_outputs(prefix);
                result.transitions.push(copy);
            }
        }
        Ok(())
    }
}

//
// Make every state that has an epsilon transition to a final state final,
// until nothing changes.
//
fn propagate_finality(a: &mut Automaton) -> Result<(), Error> {
    loop {
        let mut new_finals = Vec::new();
        for t in a.transitions().iter().filter(|t| t.is_epsilon()) {
            if a.is_final(t.post()) {
                if t.has_outputs() {
                    return Err(Error::OutputIntoFinalState(t.to_string()));
                }
                if !a.is_final(t.pre()) {
                    new_finals.push(t.pre().clone());
                }
            }
        }
        if new_finals.is_empty() {
            return Ok(());
        }
        a.final_states_mut().extend(new_finals);
    }
}

///
/// Remove all epsilon transitions
///
/// The result accepts the same sequences and produces the same outputs.
/// Every acyclic epsilon path contributes its own copies, so distinct paths
/// with distinct outputs are all kept.
/// - self-loop epsilon transitions are dropped
/// - a state with an epsilon path to a final state becomes final
/// - every other epsilon transition t is replaced by copies of the non-epsilon
///   transitions reachable from t's target through epsilon transitions
///
/// Return `Error::OutputIntoFinalState` if an epsilon transition that produces
/// outputs leads to a final state. These outputs would be lost.
///
pub fn eliminate_epsilon_transitions(a: &Automaton) -> Result<Automaton, Error> {
    let mut result = a.clone();
    result
        .transitions_mut()
        .retain(|t| !(t.is_epsilon() && t.is_self_loop()));
    propagate_finality(&mut result)?;

    let mut replacements = Vec::new();
    {
        let chase = EpsilonChase::new(&result);
        for t in result.transitions().iter().filter(|t| t.is_epsilon()) {
            replacements.extend(chase.closure(t)?.transitions);
        }
    }
    let transitions = result.transitions_mut();
    transitions.retain(|t| !t.is_epsilon());
    transitions.extend(replacements);
    Ok(result)
}

///
/// Remove a single epsilon transition t
///
/// Other epsilon transitions are kept. If t is not an epsilon transition of `a`,
/// the result is a copy of `a`.
///
pub fn eliminate_epsilon_transition(a: &Automaton, t: &Transition) -> Result<Automaton, Error> {
    let mut result = a.clone();
    if !t.is_epsilon() || !result.transitions_mut().shift_remove(t) || t.is_self_loop() {
        return Ok(result);
    }
    let closure = EpsilonChase::new(&result).closure(t)?;
    if closure.reaches_final {
        result.final_states_mut().insert(t.pre().clone());
    }
    result.transitions_mut().extend(closure.transitions);
    Ok(result)
}

// determinization precondition
fn check_plain(t: &Transition) -> Result<(), Error> {
    if t.is_filtered() || t.input().map_or(false, |x| x.has_variables()) {
        Err(Error::SymbolicTransition(t.to_string()))
    } else if t.has_outputs() {
        Err(Error::TransducerTransition(t.to_string()))
    } else {
        Ok(())
    }
}

/// Determinize `a` (see [eliminate_nondeterminism_reserving])
pub fn eliminate_nondeterminism(a: &Automaton) -> Result<Automaton, Error> {
    eliminate_nondeterminism_reserving(a, &HashSet::new())
}

///
/// Determinize `a`
///
/// Epsilon transitions are eliminated first. All the other transitions must
/// be on concrete symbols and without outputs or guards. Otherwise, the
/// function returns `Error::SymbolicTransition` or `Error::TransducerTransition`.
///
/// The result has at most one transition per state and input symbol. A state of
/// the result stands for a set of states of `a`: a singleton keeps its original
/// name; a larger set gets a fresh name that is neither a state of `a`
/// nor in `reserved`. Unreachable states are removed.
///
pub fn eliminate_nondeterminism_reserving(
    a: &Automaton,
    reserved: &HashSet<String>,
) -> Result<Automaton, Error> {
    let a = if a.num_epsilon_transitions() > 0 {
        eliminate_epsilon_transitions(a)?
    } else {
        a.clone()
    };
    for t in a.transitions() {
        check_plain(t)?;
    }

    let mut names = NameAllocator::avoiding(STATE_PREFIX, collect_state_names(&a));
    for name in reserved {
        names.reserve(name);
    }
    let mut table = CompositeStates::new(names);
    let mut state_for = |set: &BTreeSet<State>| -> State {
        match set.iter().next() {
            Some(s) if set.len() == 1 => table.make_with(set.clone(), s.clone()),
            _ => table.make(set.clone()),
        }
    };

    let index = successor_index(&a);
    let init: BTreeSet<State> = std::iter::once(a.initial_state().clone()).collect();
    let mut queue = BfsQueue::new();
    let mut transitions = IndexSet::new();
    let mut finals = IndexSet::new();
    queue.push(init.clone());
    while let Some(set) = queue.pop() {
        let source = state_for(&set);
        if set.iter().any(|s| a.is_final(s)) {
            finals.insert(source.clone());
        }
        let mut targets: IndexMap<&Symbol, BTreeSet<State>> = IndexMap::new();
        for s in &set {
            for t in index.get(s).into_iter().flatten() {
                if let Some(x) = t.input() {
                    targets.entry(x).or_default().insert(t.post().clone());
                }
            }
        }
        for (x, target_set) in targets {
            let target = state_for(&target_set);
            transitions.insert(Transition::new(source.clone(), target, x.clone()));
            queue.push(target_set);
        }
    }

    let result = Automaton::new(state_for(&init), finals, transitions);
    Ok(eliminate_unreachable_states(&result))
}

///
/// Remove unreachable states
///
/// Transitions and final states that refer to a state not reachable from
/// the initial state are removed.
///
pub fn eliminate_unreachable_states(a: &Automaton) -> Automaton {
    let reachable = collect_reachable_states(a);
    let transitions = a
        .transitions()
        .iter()
        .filter(|t| reachable.contains(t.pre()))
        .filter(|t| reachable.contains(t.post()))
        .cloned();
    let finals = a
        .final_states()
        .iter()
        .filter(|s| reachable.contains(*s))
        .cloned();
    Automaton::new(a.initial_state().clone(), finals, transitions)
}

///
/// Make `a` total
///
/// The automaton is determinized first. Then every state gets a complement
/// transition to `fail` on `variable`: this transition accepts the symbols
/// that none of the state's other transitions accepts. The complement
/// transitions emit `outputs`, post-processed by `filter` if any.
///
pub fn complete(
    a: &Automaton,
    fail: &State,
    variable: &Symbol,
    outputs: &[Symbol],
    filter: Option<&OutputFilter>,
) -> Result<Automaton, Error> {
    let mut reserved = HashSet::new();
    reserved.insert(fail.name().to_string());
    let mut result = eliminate_nondeterminism_reserving(a, &reserved)?;

    let mut guards = Vec::new();
    for s in result.states() {
        let others: Vec<Transition> = result.transitions_from(&s).cloned().collect();
        guards.push(Transition::complement(
            s.clone(),
            fail.clone(),
            variable.clone(),
            outputs.to_vec(),
            filter.cloned(),
            others,
        ));
    }
    result.transitions_mut().extend(guards);
    Ok(result)
}

///
/// Complement of `a` with explicit fail state, guard variable, and output filter
///
/// The complement transitions and the fail-state loop carry `filter`.
///
pub fn complement_with(
    a: &Automaton,
    fail: &State,
    variable: &Symbol,
    filter: Option<OutputFilter>,
) -> Result<Automaton, Error> {
    let mut result = complete(a, fail, variable, &[], filter.as_ref())?;
    let mut fail_loop = Transition::new(fail.clone(), fail.clone(), variable.clone());
    if let Some(f) = filter {
        fail_loop = fail_loop.filtered(f);
    }
    result.transitions_mut().insert(fail_loop);

    let finals: IndexSet<State> = result
        .states()
        .into_iter()
        .filter(|s| !result.is_final(s))
        .collect();
    *result.final_states_mut() = finals;
    Ok(result)
}

///
/// Complement of `a`
///
/// The result accepts every sequence of concrete symbols that `a` rejects.
/// The fail state is [unique_state]`(a)` and the guard variable is
/// [MATCHED_SYMBOL].
///
pub fn complement(a: &Automaton) -> Result<Automaton, Error> {
    let fail = unique_state(a);
    complement_with(a, &fail, &Symbol::variable(MATCHED_SYMBOL), None)
}

///
/// Replace symbolic transitions by concrete transitions over `alphabet`
///
/// Every non-epsilon transition t is replaced by one transition on `x` for every
/// symbol `x` of the alphabet that t accepts. The new transition emits
/// the outputs of t on `x`. Epsilon transitions are kept.
///
pub fn expand(a: &Automaton, alphabet: &[Symbol]) -> Automaton {
    let mut transitions = Vec::new();
    for t in a.transitions() {
        if t.is_epsilon() {
            transitions.push(t.clone());
        } else {
            for x in alphabet {
                if let Some(outputs) = t.transit(x) {
                    transitions.push(Transition::with_outputs(
                        t.pre().clone(),
                        t.post().clone(),
                        x.clone(),
                        outputs,
                    ));
                }
            }
        }
    }
    Automaton::new(
        a.initial_state().clone(),
        a.final_states().iter().cloned(),
        transitions,
    )
}

/// Complement of `a` after expansion over `alphabet`
pub fn complement_over(a: &Automaton, alphabet: &[Symbol]) -> Result<Automaton, Error> {
    complement(&expand(a, alphabet))
}

//
// Transitions of the product for a pair (t1, t2)
//
fn product_transitions(
    t1: &Transition,
    t2: &Transition,
    pre: &State,
    post: &State,
) -> Vec<Transition> {
    let (i1, i2) = match (t1.input(), t2.input()) {
        (Some(i1), Some(i2)) => (i1, i2),
        _ => return Vec::new(),
    };

    let mut result = Vec::new();
    if i1.has_variables() || i2.has_variables() || t1.is_filtered() || t2.is_filtered() {
        for (x, t) in [(i1, t1), (i2, t2)].iter() {
            result.push(Transition::intersection(
                pre.clone(),
                post.clone(),
                (*x).clone(),
                t.outputs().to_vec(),
                t.filter().cloned(),
                vec![t1.clone(), t2.clone()],
            ));
        }
        return result;
    }

    let ctx = MatchContext::new();
    let mut emit = |x: &Symbol| {
        if t1.has_outputs() || t2.has_outputs() {
            for t in [t1, t2].iter() {
                result.push(Transition::with_outputs(
                    pre.clone(),
                    post.clone(),
                    x.clone(),
                    t.outputs().to_vec(),
                ));
            }
        } else {
            result.push(Transition::new(pre.clone(), post.clone(), x.clone()));
        }
    };
    if i1.possibly_matches(i2, &ctx) {
        emit(i2);
    }
    if i2.possibly_matches(i1, &ctx) {
        emit(i1);
    }
    result
}

///
/// Intersection of a and b (product construction)
///
/// Epsilon transitions of both operands are eliminated first. Each state of the
/// result stands for a pair of states (one of `a`, one of `b`) and gets a fresh
/// name `s1`, `s2`, ... The final states are the pairs of final states.
///
/// A pair of transitions on concrete symbols produces a transition when the
/// symbols match. Otherwise, the pair produces guarded transitions that accept
/// the symbols accepted by both.
///
pub fn intersection(a: &Automaton, b: &Automaton) -> Result<Automaton, Error> {
    let a = eliminate_epsilon_transitions(a)?;
    let b = eliminate_epsilon_transitions(b)?;

    let mut table = CompositeStates::new(NameAllocator::new(STATE_PREFIX));
    let init = table.make((a.initial_state().clone(), b.initial_state().clone()));

    let mut transitions = IndexSet::new();
    for t1 in a.transitions() {
        for t2 in b.transitions() {
            let pre = table.make((t1.pre().clone(), t2.pre().clone()));
            let post = table.make((t1.post().clone(), t2.post().clone()));
            transitions.extend(product_transitions(t1, t2, &pre, &post));
        }
    }

    let mut finals = IndexSet::new();
    for f1 in a.final_states() {
        for f2 in b.final_states() {
            finals.insert(table.make((f1.clone(), f2.clone())));
        }
    }
    Ok(Automaton::new(init, finals, transitions))
}

/// Subtraction: accepts the sequences accepted by `a` and rejected by `b`
pub fn subtraction(a: &Automaton, b: &Automaton) -> Result<Automaton, Error> {
    intersection(a, &complement(b)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{automata::AutomatonBuilder, symbols::char_symbols};

    fn lit(name: &str) -> Symbol {
        Symbol::literal(name)
    }

    fn word(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|n| lit(n)).collect()
    }

    fn states(names: &[&str]) -> IndexSet<State> {
        names.iter().map(|n| State::new(n)).collect()
    }

    // s1 -x-> s2 -y-> s3, s3 final
    fn chain(x: &str, y: &str) -> Automaton {
        AutomatonBuilder::new("s1")
            .add_transition("s1", lit(x), "s2")
            .add_transition("s2", lit(y), "s3")
            .mark_final("s3")
            .build()
    }

    #[test]
    fn test_use_unique_states() {
        let a1 = chain("a", "b");
        let (a2, map) = use_unique_states(&a1, &collect_state_names(&a1));
        println!("{a2}");
        assert_eq!(a2.states(), states(&["s4", "s5", "s6"]));
        assert_eq!(a2.initial_state(), &State::new("s4"));
        assert_eq!(a2.final_states(), &states(&["s6"]));
        assert_eq!(map.len(), 3);
        assert_eq!(map[&State::new("s2")], State::new("s5"));
        assert!(a2.accept(&word(&["a", "b"])));
    }

    #[test]
    fn test_use_unique_input_symbols() {
        let x = Symbol::variable("x");
        let a1 = AutomatonBuilder::new("s1")
            .add_transition("s1", lit("a"), "s2")
            .add_transition("s2", lit("b"), "s3")
            .add_transition("s3", x.clone(), "s3")
            .add_transition("s3", lit("a"), "s1")
            .add_epsilon("s3", vec![], "s4")
            .mark_final("s3")
            .build();
        let (a2, map) = use_unique_input_symbols(&a1, &collect_input_symbol_names(&a1));
        let expected: IndexSet<Symbol> = vec![lit("i1"), lit("i2"), x.clone()]
            .into_iter()
            .collect();
        assert_eq!(collect_input_symbols(&a2), expected);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&lit("a")], lit("i1"));
        assert_eq!(map[&lit("b")], lit("i2"));
        assert_eq!(a2.num_epsilon_transitions(), 1);
        assert!(a2.accept(&word(&["i1", "i2", "z"])));
    }

    #[test]
    fn test_unique_elements() {
        let a = chain("i1", "b");
        assert_eq!(unique_state(&a), State::new("s4"));
        assert_eq!(unique_input_symbol(&a), lit("i2"));
        let names = collect_input_symbol_names(&a);
        assert!(names.contains("i1") && names.contains("b"));
    }

    #[test]
    fn test_concatenation() {
        let a1 = chain("a", "b");
        let a2 = chain("a", "b");
        let (a3, map) = concatenation_with_map(&a1, &a2);
        println!("{a3}");
        assert_eq!(a3.states(), states(&["s1", "s2", "s3", "s4", "s5", "s6"]));
        assert_eq!(a3.num_transitions(), 5);
        assert_eq!(a3.final_states(), &states(&["s6"]));
        assert_eq!(map[&State::new("s1")], State::new("s4"));
        assert!(a3.accept(&word(&["a", "b", "a", "b"])));
        assert!(!a3.accept(&word(&["a", "b", "a"])));
        assert!(!a3.accept(&word(&["a", "b"])));
    }

    #[test]
    fn test_concatenate_in_place() {
        let mut a = chain("a", "b");
        // b starts at a's final state: no epsilon link
        let b = AutomatonBuilder::new("s3")
            .add_transition("s3", lit("c"), "s4")
            .mark_final("s4")
            .build();
        concatenate_in_place(&mut a, &b);
        assert_eq!(a.num_transitions(), 3);
        assert_eq!(a.num_epsilon_transitions(), 0);
        assert!(a.accept(&word(&["a", "b", "c"])));
        assert!(!a.accept(&word(&["a", "b"])));
    }

    #[test]
    fn test_union() {
        let a1 = chain("a", "b");
        let a2 = chain("A", "B");
        let a3 = union(&a1, &a2);
        println!("{a3}");
        assert_eq!(
            a3.states(),
            states(&["s7", "s1", "s4", "s2", "s3", "s5", "s6"])
        );
        assert_eq!(a3.initial_state(), &State::new("s7"));
        assert_eq!(a3.num_transitions(), 6);

        let a4 = eliminate_epsilon_transitions(&a3).unwrap();
        let a5 = eliminate_nondeterminism(&a4).unwrap();
        for a in &[&a3, &a4, &a5] {
            assert!(a.accept(&word(&["a", "b"])));
            assert!(a.accept(&word(&["A", "B"])));
            assert!(!a.accept(&word(&["A", "b"])));
        }
    }

    #[test]
    fn test_union_in_place() {
        let mut a = chain("a", "b");
        let b = AutomatonBuilder::new("t1")
            .add_transition("t1", lit("c"), "t2")
            .mark_final("t2")
            .build();
        union_in_place(&mut a, &b);
        assert_eq!(a.initial_state(), &State::new("s4"));
        assert_eq!(a.final_states(), &states(&["s3", "t2"]));
        assert!(a.accept(&word(&["c"])));
        assert!(a.accept(&word(&["a", "b"])));
    }

    #[test]
    fn test_complement() {
        let a1 = chain("a", "b");
        let a2 = complement(&a1).unwrap();
        println!("{a2}");
        assert!(a2.states().contains(&State::new("s4")));
        assert!(a2.is_final(&State::new("s4")));
        assert!(!a2.is_final(&State::new("s3")));
        assert!(!a2.accept(&word(&["a", "b"])));
        assert!(a2.accept(&word(&["a", "B"])));
        assert!(a2.accept(&word(&["A", "B"])));
        assert!(a2.accept(&[]));
        assert!(a2.accept(&word(&["a", "b", "c"])));

        // guarded transitions can't be determinized
        assert!(matches!(complement(&a2), Err(Error::SymbolicTransition(_))));
    }

    #[test]
    fn test_complement_with_filter() {
        let a1 = chain("a", "b");
        let fail = State::new("fail");
        let marker = OutputFilter::map(|x, _| vec![x.clone(), lit("!")]);
        let a2 = complement_with(&a1, &fail, &Symbol::variable("y"), Some(marker)).unwrap();
        assert!(a2.is_final(&fail));
        assert_eq!(
            a2.translate(&word(&["a", "c", "d"])),
            vec![word(&["c", "!", "d", "!"])]
        );
    }

    #[test]
    fn test_complete() {
        let a = chain("a", "b");
        let fail = State::new("s9");
        let x = Symbol::variable("x");
        let total = complete(&a, &fail, &x, &[x.clone()], None).unwrap();
        // one complement transition per state
        assert_eq!(total.num_transitions(), 5);
        let s3 = State::new("s3");
        assert!(total.transitions_from(&s3).all(|t| t.post() == &fail));
        let s1 = State::new("s1");
        assert_eq!(total.system().accept_transitions(&s1, &lit("a")).count(), 1);
        assert_eq!(total.system().accept_transitions(&s1, &lit("c")).count(), 1);
        // total but fail is not final
        assert!(!total.accept(&word(&["c"])));
    }

    #[test]
    fn test_complement_over() {
        let x = Symbol::variable("x");
        let a = AutomatonBuilder::new("s1")
            .add_transition("s1", x, "s2")
            .mark_final("s2")
            .build();
        assert!(matches!(complement(&a), Err(Error::SymbolicTransition(_))));

        let c = complement_over(&a, &word(&["a", "b"])).unwrap();
        assert!(c.accept(&[]));
        assert!(!c.accept(&word(&["a"])));
        assert!(!c.accept(&word(&["b"])));
        assert!(c.accept(&word(&["a", "a"])));
        // symbols outside the alphabet go to the fail state
        assert!(c.accept(&word(&["z"])));
    }

    #[test]
    fn test_expand() {
        let x = Symbol::variable("x");
        let a = AutomatonBuilder::new("s1")
            .add_transduction("s1", x.clone(), vec![x, lit(".")], "s2")
            .add_transduction("s2", lit("c"), word(&["C"]), "s3")
            .add_epsilon("s3", vec![], "s1")
            .mark_final("s3")
            .build();
        let e = expand(&a, &word(&["a", "b", "c"]));
        println!("{e}");
        // 3 from the variable transition, 1 from c, and the epsilon
        assert_eq!(e.num_transitions(), 5);
        assert_eq!(e.num_epsilon_transitions(), 1);
        assert_eq!(
            e.translate(&word(&["b", "c"])),
            vec![word(&["b", ".", "C"])]
        );
        assert!(!e.accept(&word(&["z", "c"])));

        let empty = expand(&a, &[]);
        assert_eq!(empty.num_transitions(), 1);
    }

    #[test]
    fn test_intersection() {
        let a1 = chain("a", "b");
        let a2 = AutomatonBuilder::new("s2")
            .add_transition("s2", lit("a"), "s3")
            .add_transition("s3", lit("b"), "s4")
            .add_transition("s3", lit("c"), "s4")
            .mark_final("s4")
            .build();
        let a3 = intersection(&a1, &a2).unwrap();
        println!("{a3}");
        assert_eq!(a3.initial_state(), &State::new("s1"));
        assert!(a3.accept(&word(&["a", "b"])));
        assert!(!a3.accept(&word(&["a", "c"])));

        let a4 = intersection(&a2, &a1).unwrap();
        assert!(a4.accept(&word(&["a", "b"])));
        assert!(!a4.accept(&word(&["a", "c"])));
    }

    #[test]
    fn test_intersection_symbolic() {
        let x = Symbol::variable("x");
        // any two symbols
        let a1 = AutomatonBuilder::new("p1")
            .add_transduction("p1", x.clone(), vec![x.clone()], "p2")
            .add_transition("p2", x, "p3")
            .mark_final("p3")
            .build();
        let a2 = chain("a", "b");
        let a3 = intersection(&a1, &a2).unwrap();
        assert!(a3.accept(&word(&["a", "b"])));
        assert!(!a3.accept(&word(&["a", "a"])));
        assert!(!a3.accept(&word(&["a"])));
        assert!(a3.translate(&word(&["a", "b"])).contains(&word(&["a"])));
    }

    #[test]
    fn test_intersection_outputs() {
        let a1 = AutomatonBuilder::new("p1")
            .add_transduction("p1", lit("a"), word(&["X"]), "p2")
            .mark_final("p2")
            .build();
        let a2 = AutomatonBuilder::new("q1")
            .add_transduction("q1", lit("a"), word(&["Y"]), "q2")
            .mark_final("q2")
            .build();
        let a3 = intersection(&a1, &a2).unwrap();
        assert_eq!(a3.num_transitions(), 2);
        let mut results = a3.translate(&word(&["a"]));
        results.sort();
        assert_eq!(results, vec![word(&["X"]), word(&["Y"])]);
    }

    #[test]
    fn test_subtraction() {
        let a1 = AutomatonBuilder::new("s1")
            .add_transition("s1", lit("a"), "s2")
            .add_transition("s2", lit("b"), "s3")
            .add_transition("s1", lit("A"), "s2")
            .add_transition("s2", lit("B"), "s3")
            .mark_final("s3")
            .build();
        let a2 = chain("A", "B");
        let a3 = subtraction(&a1, &a2).unwrap();
        assert!(a3.accept(&word(&["a", "b"])));
        assert!(a3.accept(&word(&["A", "b"])));
        assert!(a3.accept(&word(&["a", "B"])));
        assert!(!a3.accept(&word(&["A", "B"])));
        assert!(!a3.accept(&word(&["a"])));
    }

    #[test]
    fn test_eliminate_epsilon_transitions() {
        let fst1 = AutomatonBuilder::new("s1")
            .add_epsilon("s1", word(&["A"]), "s2")
            .add_transduction("s2", lit("b"), word(&["B"]), "s3")
            .add_transduction("s2", lit("0"), word(&["0"]), "s2")
            .mark_final("s3")
            .build();
        let fst2 = AutomatonBuilder::new("s1")
            .add_transduction("s1", lit("b"), word(&["A", "B"]), "s3")
            .add_transduction("s1", lit("0"), word(&["A", "0"]), "s2")
            .add_transduction("s2", lit("b"), word(&["B"]), "s3")
            .add_transduction("s2", lit("0"), word(&["0"]), "s2")
            .mark_final("s3")
            .build();
        assert_eq!(eliminate_epsilon_transitions(&fst1).unwrap(), fst2);
    }

    #[test]
    fn test_eliminate_epsilon_self_loops() {
        let fst1 = AutomatonBuilder::new("s1")
            .add_epsilon("s1", word(&["A"]), "s2")
            .add_transduction("s2", lit("b"), word(&["B"]), "s3")
            .add_epsilon("s2", word(&["0"]), "s2")
            .mark_final("s3")
            .build();
        let fst2 = AutomatonBuilder::new("s1")
            .add_transduction("s1", lit("b"), word(&["A", "B"]), "s3")
            .add_transduction("s2", lit("b"), word(&["B"]), "s3")
            .mark_final("s3")
            .build();
        assert_eq!(eliminate_epsilon_transitions(&fst1).unwrap(), fst2);
    }

    #[test]
    fn test_eliminate_epsilon_finality() {
        let fst1 = AutomatonBuilder::new("s1")
            .add_transduction("s1", lit("a"), word(&["A"]), "s2")
            .add_epsilon("s2", vec![], "s3")
            .add_transduction("s3", lit("b"), word(&["B"]), "s4")
            .add_epsilon("s4", vec![], "s3")
            .mark_final("s3")
            .build();
        let fst2 = AutomatonBuilder::new("s1")
            .add_transduction("s1", lit("a"), word(&["A"]), "s2")
            .add_transduction("s2", lit("b"), word(&["B"]), "s4")
            .add_transduction("s3", lit("b"), word(&["B"]), "s4")
            .add_transduction("s4", lit("b"), word(&["B"]), "s4")
            .mark_final("s2")
            .mark_final("s3")
            .mark_final("s4")
            .build();
        assert_eq!(eliminate_epsilon_transitions(&fst1).unwrap(), fst2);
    }

    fn upper_case() -> OutputFilter {
        OutputFilter::map(|_, outputs| {
            outputs
                .iter()
                .map(|o| match o.as_char() {
                    Some(c) => Symbol::character(c.to_ascii_uppercase()),
                    None => o.clone(),
                })
                .collect()
        })
    }

    fn only_c() -> crate::transitions::Condition {
        crate::transitions::Condition::custom(|x, _| *x == Symbol::character('c'))
    }

    #[test]
    fn test_eliminate_epsilon_filtered() {
        let x = Symbol::variable("x");
        let fst1 = AutomatonBuilder::new("s1")
            .add_epsilon("s1", vec![Symbol::character('0')], "s2")
            .add(
                Transition::with_outputs(State::new("s2"), State::new("s3"), x.clone(), vec![x])
                    .guarded(only_c())
                    .filtered(upper_case()),
            )
            .mark_final("s3")
            .build();
        let fst2 = eliminate_epsilon_transitions(&fst1).unwrap();
        assert_eq!(fst2.num_epsilon_transitions(), 0);
        assert!(fst2.translate(&char_symbols("a")).is_empty());
        assert_eq!(
            fst2.translate(&char_symbols("c")),
            vec![char_symbols("0C")]
        );
        assert!(fst2.translate(&char_symbols("cc")).is_empty());
    }

    #[test]
    fn test_eliminate_epsilon_cycle() {
        let x = Symbol::variable("x");
        let fst1 = AutomatonBuilder::new("s1")
            .add(
                Transition::with_outputs(State::new("s1"), State::new("s2"), x.clone(), vec![x])
                    .guarded(only_c())
                    .filtered(upper_case()),
            )
            .add_epsilon("s2", vec![], "s3")
            .add_epsilon("s3", vec![], "s1")
            .mark_final("s3")
            .build();
        let fst2 = eliminate_epsilon_transitions(&fst1).unwrap();
        assert!(fst2.translate(&char_symbols("a")).is_empty());
        assert_eq!(
            fst2.translate(&char_symbols("c")),
            vec![char_symbols("C")]
        );
        assert_eq!(
            fst2.translate(&char_symbols("ccc")),
            vec![char_symbols("CCC")]
        );
    }

    #[test]
    fn test_eliminate_epsilon_diamond() {
        let fst1 = AutomatonBuilder::new("s1")
            .add_epsilon("s1", word(&["A"]), "s2")
            .add_epsilon("s2", word(&["B"]), "s3")
            .add_epsilon("s2", word(&["C"]), "s4")
            .add_epsilon("s3", vec![], "s5")
            .add_epsilon("s4", vec![], "s5")
            .add_transition("s5", lit("a"), "s6")
            .mark_final("s6")
            .build();
        let before = fst1.translate(&word(&["a"]));
        assert_eq!(before.len(), 2);
        assert!(before.contains(&word(&["A", "B"])));
        assert!(before.contains(&word(&["A", "C"])));

        let fst2 = eliminate_epsilon_transitions(&fst1).unwrap();
        println!("{fst2}");
        assert_eq!(fst2.num_epsilon_transitions(), 0);
        let after = fst2.translate(&word(&["a"]));
        assert_eq!(after.len(), 2);
        assert!(after.contains(&word(&["A", "B"])));
        assert!(after.contains(&word(&["A", "C"])));
    }

    #[test]
    fn test_output_into_final_state() {
        let fst = AutomatonBuilder::new("s1")
            .add_transition("s1", lit("a"), "s2")
            .add_epsilon("s2", word(&["A"]), "s3")
            .mark_final("s3")
            .build();
        assert!(matches!(
            eliminate_epsilon_transitions(&fst),
            Err(Error::OutputIntoFinalState(_))
        ));
        let t = Transition::epsilon_with_outputs(State::new("s2"), State::new("s3"), word(&["A"]));
        assert!(matches!(
            eliminate_epsilon_transition(&fst, &t),
            Err(Error::OutputIntoFinalState(_))
        ));
    }

    #[test]
    fn test_eliminate_one_epsilon() {
        let fst = AutomatonBuilder::new("s1")
            .add_epsilon("s1", word(&["A"]), "s2")
            .add_epsilon("s2", vec![], "s3")
            .add_transduction("s3", lit("b"), word(&["B"]), "s4")
            .mark_final("s4")
            .build();
        let t = Transition::epsilon_with_outputs(State::new("s1"), State::new("s2"), word(&["A"]));
        let r = eliminate_epsilon_transition(&fst, &t).unwrap();
        assert_eq!(r.num_epsilon_transitions(), 1);
        assert!(!r.transitions().contains(&t));
        assert_eq!(r.translate(&word(&["b"])), vec![word(&["A", "B"])]);

        // not in the automaton
        let u = Transition::epsilon(State::new("s4"), State::new("s1"));
        assert_eq!(eliminate_epsilon_transition(&fst, &u).unwrap(), fst);

        // reaching a final state makes the source final
        let v = Transition::epsilon(State::new("s2"), State::new("s3"));
        let fst2 = AutomatonBuilder::new("s1")
            .add_epsilon("s1", vec![], "s2")
            .add_epsilon("s2", vec![], "s3")
            .mark_final("s3")
            .build();
        let t2 = Transition::epsilon(State::new("s1"), State::new("s2"));
        let r2 = eliminate_epsilon_transition(&fst2, &t2).unwrap();
        assert!(r2.is_final(&State::new("s1")));
        assert!(r2.transitions().contains(&v));
    }

    #[test]
    fn test_eliminate_nondeterminism() {
        let fst1 = AutomatonBuilder::new("s1")
            .add_transition("s1", lit("a"), "s2")
            .add_transition("s2", lit("b"), "s3")
            .add_transition("s2", lit("b"), "s2")
            .mark_final("s3")
            .build();
        let fst2 = AutomatonBuilder::new("s1")
            .add_transition("s1", lit("a"), "s2")
            .add_transition("s2", lit("b"), "s4")
            .add_transition("s4", lit("b"), "s4")
            .mark_final("s4")
            .build();
        assert_eq!(eliminate_nondeterminism(&fst1).unwrap(), fst2);
    }

    #[test]
    fn test_eliminate_nondeterminism2() {
        let fst1 = AutomatonBuilder::new("s1")
            .add_transition("s1", lit("a"), "s2")
            .add_transition("s2", lit("b"), "s3")
            .add_transition("s3", lit("c"), "s4")
            .add_transition("s1", lit("a"), "s5")
            .add_transition("s5", lit("b"), "s6")
            .add_transition("s6", lit("c"), "s7")
            .mark_final("s4")
            .build();
        let fst2 = AutomatonBuilder::new("s1")
            .add_transition("s1", lit("a"), "s8")
            .add_transition("s8", lit("b"), "s9")
            .add_transition("s9", lit("c"), "s10")
            .mark_final("s10")
            .build();
        assert_eq!(eliminate_nondeterminism(&fst1).unwrap(), fst2);
    }

    #[test]
    fn test_nondeterminism_reserving() {
        let fst1 = AutomatonBuilder::new("s1")
            .add_transition("s1", lit("a"), "s2")
            .add_transition("s1", lit("a"), "s3")
            .mark_final("s3")
            .build();
        let reserved: HashSet<String> = vec!["s4".to_string()].into_iter().collect();
        let fst2 = eliminate_nondeterminism_reserving(&fst1, &reserved).unwrap();
        assert_eq!(fst2.final_states(), &states(&["s5"]));
        assert_eq!(fst2.num_transitions(), 1);
    }

    #[test]
    fn test_nondeterminism_errors() {
        let x = Symbol::variable("x");
        let symbolic = AutomatonBuilder::new("s1")
            .add_transition("s1", x, "s2")
            .build();
        assert!(matches!(
            eliminate_nondeterminism(&symbolic),
            Err(Error::SymbolicTransition(_))
        ));
        let t = Transition::new(State::new("s1"), State::new("s2"), lit("a"));
        let guarded = AutomatonBuilder::new("s1")
            .add(t.guarded(only_c()))
            .build();
        assert!(matches!(
            eliminate_nondeterminism(&guarded),
            Err(Error::SymbolicTransition(_))
        ));
        let transducer = AutomatonBuilder::new("s1")
            .add_transduction("s1", lit("a"), word(&["A"]), "s2")
            .build();
        assert!(matches!(
            eliminate_nondeterminism(&transducer),
            Err(Error::TransducerTransition(_))
        ));
    }

    #[test]
    fn test_eliminate_unreachable_states() {
        let a = AutomatonBuilder::new("s1")
            .add_transition("s1", lit("a"), "s2")
            .add_transition("s2", lit("b"), "s1")
            .add_transition("s3", lit("a"), "s4")
            .add_transition("s4", lit("a"), "s2")
            .mark_final("s2")
            .mark_final("s4")
            .build();
        let reachable = collect_reachable_states(&a);
        assert_eq!(reachable, states(&["s1", "s2"]));
        let b = eliminate_unreachable_states(&a);
        assert_eq!(b.num_transitions(), 2);
        assert_eq!(b.final_states(), &states(&["s2"]));
        assert_eq!(eliminate_unreachable_states(&b), b);
    }
}
