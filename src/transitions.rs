// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Transitions of symbolic transducers
//!
//! A transition goes from a pre-state to a post-state. It reads an optional input
//! symbol (no input means an epsilon transition) and emits a sequence of output
//! symbols. The input symbol is a pattern: a transition on variable `$x` accepts any
//! concrete symbol `c` and its outputs are rewritten by replacing `$x` with `c`.
//!
//! A transition may also carry:
//! - a [Condition] that further restricts the symbols it accepts. Conditions
//!   encode the negation or conjunction of a set of transitions without
//!   enumerating the alphabet. They are used by complement and intersection.
//! - an [OutputFilter] that post-processes the rewritten outputs. Filters
//!   compose, so that outputs can be prepended or appended to a filtered
//!   transition any number of times.
//!

use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    rc::Rc,
};

use crate::{
    match_context::MatchContext,
    states::State,
    symbols::{substitute_all, Symbol},
};

/// Name of the variable bound to the consumed symbol by [Transition::transit]
pub const MATCHED_SYMBOL: &str = "_";

/// Custom guard: a predicate on the input symbol
pub type Predicate = Rc<dyn Fn(&Symbol, &MatchContext) -> bool>;

/// Custom output map: (input symbol, rewritten outputs) -> filtered outputs
pub type OutputMap = Rc<dyn Fn(&Symbol, Vec<Symbol>) -> Vec<Symbol>>;

// address of a closure, used for equality and hashing of custom guards and filters
fn fn_address<T: ?Sized>(f: &Rc<T>) -> usize {
    Rc::as_ptr(f) as *const u8 as usize
}

///
/// Extra guard on a transition
///
#[derive(Clone)]
pub enum Condition {
    /// Holds for a symbol iff none of the transitions accepts it
    Complement(Rc<[Transition]>),

    /// Holds for a symbol iff all the transitions accept it
    Intersection(Rc<[Transition]>),

    /// Arbitrary predicate
    Custom(Predicate),
}

impl Condition {
    /// Complement condition for a set of transitions
    pub fn complement(transitions: impl IntoIterator<Item = Transition>) -> Self {
        Condition::Complement(transitions.into_iter().collect::<Vec<_>>().into())
    }

    /// Intersection condition for a set of transitions
    pub fn intersection(transitions: impl IntoIterator<Item = Transition>) -> Self {
        Condition::Intersection(transitions.into_iter().collect::<Vec<_>>().into())
    }

    /// Condition defined by a closure
    pub fn custom(f: impl Fn(&Symbol, &MatchContext) -> bool + 'static) -> Self {
        Condition::Custom(Rc::new(f))
    }

    ///
    /// Check whether this condition holds for a symbol
    ///
    /// The transitions of a complement or intersection condition are probed
    /// with fresh contexts. ctx is only passed to custom predicates.
    ///
    pub fn holds(&self, symbol: &Symbol, ctx: &MatchContext) -> bool {
        match self {
            Condition::Complement(transitions) => {
                !transitions.iter().any(|t| t.possibly_accepts(symbol))
            }
            Condition::Intersection(transitions) => {
                transitions.iter().all(|t| t.possibly_accepts(symbol))
            }
            Condition::Custom(f) => f(symbol, ctx),
        }
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Condition::Complement(a), Condition::Complement(b))
            | (Condition::Intersection(a), Condition::Intersection(b)) => a == b,
            (Condition::Custom(f), Condition::Custom(g)) => fn_address(f) == fn_address(g),
            _ => false,
        }
    }
}

impl Eq for Condition {}

impl Hash for Condition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Condition::Complement(transitions) => {
                0u8.hash(state);
                transitions.hash(state);
            }
            Condition::Intersection(transitions) => {
                1u8.hash(state);
                transitions.hash(state);
            }
            Condition::Custom(f) => {
                2u8.hash(state);
                fn_address(f).hash(state);
            }
        }
    }
}

impl Debug for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Complement(transitions) => {
                f.debug_tuple("Complement")
                    .field(&transitions.len())
                    .finish()
            }
            Condition::Intersection(transitions) => {
                f.debug_tuple("Intersection")
                    .field(&transitions.len())
                    .finish()
            }
            Condition::Custom(p) => write!(f, "Custom({:#x})", fn_address(p)),
        }
    }
}

///
/// Post-processing of the outputs of a transition
///
#[derive(Clone)]
pub enum OutputFilter {
    /// Arbitrary map
    Map(OutputMap),

    /// Prepend symbols to the result of a filter
    Prepend(Vec<Symbol>, Box<OutputFilter>),

    /// Append symbols to the result of a filter
    Append(Box<OutputFilter>, Vec<Symbol>),
}

impl OutputFilter {
    /// Filter defined by a closure
    pub fn map(f: impl Fn(&Symbol, Vec<Symbol>) -> Vec<Symbol> + 'static) -> Self {
        OutputFilter::Map(Rc::new(f))
    }

    /// Apply this filter to the rewritten outputs of a transition on `input`
    pub fn apply(&self, input: &Symbol, outputs: Vec<Symbol>) -> Vec<Symbol> {
        match self {
            OutputFilter::Map(f) => f(input, outputs),
            OutputFilter::Prepend(prefix, inner) => {
                let mut result = prefix.clone();
                result.extend(inner.apply(input, outputs));
                result
            }
            OutputFilter::Append(inner, suffix) => {
                let mut result = inner.apply(input, outputs);
                result.extend(suffix.iter().cloned());
                result
            }
        }
    }
}

impl PartialEq for OutputFilter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OutputFilter::Map(f), OutputFilter::Map(g)) => fn_address(f) == fn_address(g),
            (OutputFilter::Prepend(p1, f1), OutputFilter::Prepend(p2, f2)) => p1 == p2 && f1 == f2,
            (OutputFilter::Append(f1, s1), OutputFilter::Append(f2, s2)) => f1 == f2 && s1 == s2,
            _ => false,
        }
    }
}

impl Eq for OutputFilter {}

impl Hash for OutputFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            OutputFilter::Map(f) => {
                0u8.hash(state);
                fn_address(f).hash(state);
            }
            OutputFilter::Prepend(prefix, inner) => {
                1u8.hash(state);
                prefix.hash(state);
                inner.hash(state);
            }
            OutputFilter::Append(inner, suffix) => {
                2u8.hash(state);
                inner.hash(state);
                suffix.hash(state);
            }
        }
    }
}

impl Debug for OutputFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFilter::Map(m) => write!(f, "Map({:#x})", fn_address(m)),
            OutputFilter::Prepend(prefix, inner) => {
                f.debug_tuple("Prepend").field(prefix).field(inner).finish()
            }
            OutputFilter::Append(inner, suffix) => {
                f.debug_tuple("Append").field(inner).field(suffix).finish()
            }
        }
    }
}

///
/// Transition: pre-state, post-state, optional input, outputs
///
/// Plain transitions have neither condition nor filter.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pre: State,
    post: State,
    input: Option<Symbol>,
    outputs: Vec<Symbol>,
    condition: Option<Condition>,
    filter: Option<OutputFilter>,
}

impl Transition {
    /// Transition on `input` with no outputs
    pub fn new(pre: State, post: State, input: Symbol) -> Transition {
        Self::with_outputs(pre, post, input, Vec::new())
    }

    /// Transition on `input` that emits `outputs`
    pub fn with_outputs(
        pre: State,
        post: State,
        input: Symbol,
        outputs: Vec<Symbol>,
    ) -> Transition {
        Transition {
            pre,
            post,
            input: Some(input),
            outputs,
            condition: None,
            filter: None,
        }
    }

    /// Epsilon transition with no outputs
    pub fn epsilon(pre: State, post: State) -> Transition {
        Self::epsilon_with_outputs(pre, post, Vec::new())
    }

    /// Epsilon transition that emits `outputs`
    pub fn epsilon_with_outputs(pre: State, post: State, outputs: Vec<Symbol>) -> Transition {
        Transition {
            pre,
            post,
            input: None,
            outputs,
            condition: None,
            filter: None,
        }
    }

    ///
    /// Complement transition
    ///
    /// Accepts a symbol iff `input` matches it and none of the `others` accepts it.
    /// The input is normally a variable.
    ///
    pub fn complement(
        pre: State,
        post: State,
        input: Symbol,
        outputs: Vec<Symbol>,
        filter: Option<OutputFilter>,
        others: impl IntoIterator<Item = Transition>,
    ) -> Transition {
        Transition {
            filter,
            ..Self::with_outputs(pre, post, input, outputs)
        }
        .guarded(Condition::complement(others))
    }

    ///
    /// Intersection transition
    ///
    /// Accepts a symbol iff `input` matches it and all the `parts` accept it.
    ///
    pub fn intersection(
        pre: State,
        post: State,
        input: Symbol,
        outputs: Vec<Symbol>,
        filter: Option<OutputFilter>,
        parts: impl IntoIterator<Item = Transition>,
    ) -> Transition {
        Transition {
            filter,
            ..Self::with_outputs(pre, post, input, outputs)
        }
        .guarded(Condition::intersection(parts))
    }

    /// Add a condition (replaces the current one)
    pub fn guarded(mut self, condition: Condition) -> Transition {
        self.condition = Some(condition);
        self
    }

    /// Add an output filter (replaces the current one)
    pub fn filtered(mut self, filter: OutputFilter) -> Transition {
        self.filter = Some(filter);
        self
    }

    /// Source state
    pub fn pre(&self) -> &State {
        &self.pre
    }

    /// Target state
    pub fn post(&self) -> &State {
        &self.post
    }

    /// Input symbol (None for epsilon transitions)
    pub fn input(&self) -> Option<&Symbol> {
        self.input.as_ref()
    }

    /// Output symbols
    pub fn outputs(&self) -> &[Symbol] {
        &self.outputs
    }

    /// Condition if any
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Output filter if any
    pub fn filter(&self) -> Option<&OutputFilter> {
        self.filter.as_ref()
    }

    /// Check whether this is an epsilon transition
    pub fn is_epsilon(&self) -> bool {
        self.input.is_none()
    }

    /// Check whether this transition goes from a state to itself
    pub fn is_self_loop(&self) -> bool {
        self.pre == self.post
    }

    /// Check whether this transition has output symbols
    pub fn has_outputs(&self) -> bool {
        !self.outputs.is_empty()
    }

    /// Check whether this transition has a condition or a filter
    pub fn is_filtered(&self) -> bool {
        self.condition.is_some() || self.filter.is_some()
    }

    /// Copy of this transition with new end points
    pub fn moved(&self, pre: State, post: State) -> Transition {
        Transition {
            pre,
            post,
            ..self.clone()
        }
    }

    /// Copy of this transition with a different source state
    pub fn with_pre(&self, pre: State) -> Transition {
        self.moved(pre, self.post.clone())
    }

    /// Copy of this transition with a different input symbol
    pub fn with_input(&self, input: Symbol) -> Transition {
        Transition {
            input: Some(input),
            ..self.clone()
        }
    }

    ///
    /// Prepend symbols to the outputs
    ///
    /// If this transition has a filter, the symbols are added after filtering.
    ///
    pub fn prepend_outputs(&mut self, prefix: &[Symbol]) {
        if prefix.is_empty() {
            return;
        }
        match self.filter.take() {
            Some(f) => self.filter = Some(OutputFilter::Prepend(prefix.to_vec(), Box::new(f))),
            None => {
                let mut outputs = prefix.to_vec();
                outputs.append(&mut self.outputs);
                self.outputs = outputs;
            }
        }
    }

    ///
    /// Append symbols to the outputs
    ///
    /// If this transition has a filter, the symbols are added after filtering.
    ///
    pub fn append_outputs(&mut self, suffix: &[Symbol]) {
        if suffix.is_empty() {
            return;
        }
        match self.filter.take() {
            Some(f) => self.filter = Some(OutputFilter::Append(Box::new(f), suffix.to_vec())),
            None => self.outputs.extend(suffix.iter().cloned()),
        }
    }

    ///
    /// Check whether this transition accepts a concrete symbol
    ///
    /// - false for epsilon transitions and if `symbol` is a variable
    /// - otherwise, the input pattern must match `symbol` (bindings are
    ///   recorded in ctx) and the condition must hold.
    ///
    pub fn accept(&self, symbol: &Symbol, ctx: &mut MatchContext) -> bool {
        let input = match &self.input {
            Some(input) => input,
            None => return false,
        };
        if symbol.is_variable() || !input.matches(symbol, ctx) {
            return false;
        }
        match &self.condition {
            Some(c) => c.holds(symbol, ctx),
            None => true,
        }
    }

    /// Same as [accept](Self::accept) with a fresh context that's discarded
    pub fn possibly_accepts(&self, symbol: &Symbol) -> bool {
        self.accept(symbol, &mut MatchContext::new())
    }

    ///
    /// Read a symbol and produce outputs
    ///
    /// - return None if this transition does not accept `symbol`
    /// - otherwise bind the input pattern and [MATCHED_SYMBOL] to `symbol`,
    ///   substitute the bindings in the outputs, and apply the filter.
    ///
    pub fn transit(&self, symbol: &Symbol) -> Option<Vec<Symbol>> {
        let mut ctx = MatchContext::new();
        if !self.accept(symbol, &mut ctx) {
            return None;
        }
        ctx.bind(Symbol::variable(MATCHED_SYMBOL), symbol.clone());
        let outputs = substitute_all(&self.outputs, &ctx);
        Some(match &self.filter {
            Some(f) => f.apply(symbol, outputs),
            None => outputs,
        })
    }

    /// Label of this transition: `input/[outputs]`
    pub fn label(&self) -> String {
        let outputs: Vec<String> = self.outputs.iter().map(|s| s.to_string()).collect();
        match &self.input {
            Some(input) => format!("{}/[{}]", input, outputs.join(", ")),
            None => format!("\u{03B5}/[{}]", outputs.join(", ")),
        }
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -{}-> {}", self.pre, self.label(), self.post)
    }
}
