// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Language equations
//!
//! An automaton defines a system of equations with one variable per state:
//! a transition `p -a-> q` gives `p = a . q` and an epsilon transition `p -ε-> q`
//! gives `p = q`. Solving the system for the initial state yields a pattern
//! (regular expression) for the language of the automaton.
//!
//! The solver is not implemented: [solve_equations] and [to_pattern]
//! return [Error::SolverNotImplemented].
//!

use std::fmt::Display;

use indexmap::IndexSet;

use crate::{automata::Automaton, errors::Error, symbols::Symbol};

///
/// Right-hand side of an equation
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// A single symbol
    Symbol(Symbol),

    /// Reference to the variable of a state
    VariableRef(String),

    /// Concatenation
    Concat(Box<Pattern>, Box<Pattern>),
}

impl Pattern {
    /// Concatenation of two patterns
    pub fn concat(left: Pattern, right: Pattern) -> Pattern {
        Pattern::Concat(Box::new(left), Box::new(right))
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Symbol(x) => write!(f, "{x}"),
            Pattern::VariableRef(name) => write!(f, "<{name}>"),
            Pattern::Concat(left, right) => write!(f, "{left} . {right}"),
        }
    }
}

///
/// Equation `lhs = rhs` where lhs is the variable of a state
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Equation {
    /// Name of the state
    pub lhs: String,
    /// Definition
    pub rhs: Pattern,
}

impl Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}> = {}", self.lhs, self.rhs)
    }
}

///
/// Equations of an automaton: one per transition
///
pub fn create_equations(a: &Automaton) -> IndexSet<Equation> {
    a.transitions()
        .iter()
        .map(|t| {
            let next = Pattern::VariableRef(t.post().name().to_string());
            let rhs = match t.input() {
                Some(x) => Pattern::concat(Pattern::Symbol(x.clone()), next),
                None => next,
            };
            Equation {
                lhs: t.pre().name().to_string(),
                rhs,
            }
        })
        .collect()
}

///
/// Solve a system of equations for variable `root`
///
/// Not implemented: always returns `Error::SolverNotImplemented`.
///
pub fn solve_equations(_equations: &IndexSet<Equation>, _root: &str) -> Result<Pattern, Error> {
    Err(Error::SolverNotImplemented)
}

/// Pattern for the language of `a` (solver not implemented)
pub fn to_pattern(a: &Automaton) -> Result<Pattern, Error> {
    let equations = create_equations(a);
    solve_equations(&equations, a.initial_state().name())
}
