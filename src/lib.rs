// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Symbolic finite-state transducers
//!
//! # Overview
//!
//! This crate implements finite-state automata and transducers whose transitions
//! are labeled by symbol patterns rather than by characters of a fixed alphabet.
//! A transition on a variable accepts any concrete symbol and can copy it to its
//! outputs. This makes it possible to describe transformations over open-ended
//! alphabets (identifiers, tokens, typed constants) with small automata.
//!
//! The [symbols](crate::symbols) module defines symbols, pattern matching, and
//! substitution. A match context ([match_context](crate::match_context)) records the
//! variable bindings produced by a match.
//!
//! Transitions ([transitions](crate::transitions)) read an optional input symbol
//! and emit a sequence of outputs. They may carry conditions and output filters.
//! Module [automata](crate::automata) defines automata and runs them as acceptors
//! or transducers.
//!
//! Module [algebra](crate::algebra) provides union, concatenation, epsilon
//! elimination, determinization, complement, intersection, and subtraction.
//! Module [equations](crate::equations) converts an automaton to a system of
//! language equations.
//!

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod algebra;
pub mod automata;
pub mod equations;
pub mod errors;
pub mod match_context;
pub mod naming;
pub mod states;
pub mod symbols;
pub mod transition_systems;
pub mod transitions;

mod bfs_queues;
