// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Error codes
//!
//! All errors are invariant violations: they signal a caller or modeling error
//! and abort the operation that detected them. Rejection of an input by an
//! automaton is not an error (see [translate](crate::automata::Automaton::translate)).
//!

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
///
/// Error codes produced by symbol construction and by the automata algebra
///
pub enum Error {
    /// A single-character literal was requested from a name that does not
    /// consist of exactly one character.
    #[error("single-character literal built from {0:?}")]
    BadCharacterName(String),

    /// Epsilon elimination found an epsilon transition that emits output
    /// symbols and leads to a final state.
    ///
    /// Removing it would drop these outputs on an accepting path that has no
    /// non-epsilon successor to carry them.
    #[error("epsilon transition {0} emits outputs into a final state")]
    OutputIntoFinalState(String),

    /// Determinization requires concrete input symbols. This is reported
    /// for transitions on a variable and for guarded transitions.
    #[error("cannot determinize symbolic transition {0}")]
    SymbolicTransition(String),

    /// Determinization does not support transitions that emit output symbols.
    #[error("cannot determinize transition {0} with output symbols")]
    TransducerTransition(String),

    /// The pattern-equation solver was invoked.
    #[error("equation solver is not implemented")]
    SolverNotImplemented,
}
