// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Symbols: the elements of a symbolic alphabet
//!
//! A symbol is either a concrete alphabet element or a pattern that can match
//! many of them:
//! - literals ([Symbol::Literal]) and their typed subtypes: characters,
//!   numbers, and strings.
//! - qualified symbols `prefix:local` built from two symbols.
//! - variables, which match anything and bind themselves to the matched symbol.
//! - variable wrappers, which bind under their own identity but delegate the match
//!   test to an inner variable. This lets one logical variable appear under several
//!   distinct identities in a composed pattern.
//!
//! Matching is asymmetric: `p.matches(s, ctx)` checks whether pattern `p` matches
//! symbol `s` and records bindings in the [MatchContext].
//! Method [possibly_matches](Symbol::possibly_matches) is the non-committal version:
//! it performs the same test on a scratch copy of the context.
//!

use std::{fmt::Display, rc::Rc};

use crate::{errors::Error, match_context::MatchContext};

///
/// Alphabet element or symbol pattern
///
/// Symbols are immutable. Substitution builds new symbols.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// Plain name token
    Literal(Rc<str>),

    /// Single character
    Char(char),

    /// Integer constant
    Number(i64),

    /// String constant
    Str(Rc<str>),

    /// Qualified symbol `prefix:local`
    Qualified(Box<Symbol>, Box<Symbol>),

    /// Variable: matches any symbol
    Variable(Rc<str>),

    /// Wrapper around a variable: Wrapper(id, inner)
    ///
    /// The match test is delegated to `inner` but the binding
    /// is recorded for the wrapper itself.
    Wrapper(Rc<str>, Box<Symbol>),
}

impl Symbol {
    /// Literal with the given name
    pub fn literal(name: &str) -> Symbol {
        Symbol::Literal(name.into())
    }

    /// Character literal
    pub fn character(c: char) -> Symbol {
        Symbol::Char(c)
    }

    ///
    /// Character literal from a name
    ///
    /// # Errors
    ///
    /// [Error::BadCharacterName] if name does not consist of exactly one character.
    ///
    pub fn char_named(name: &str) -> Result<Symbol, Error> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Symbol::Char(c)),
            _ => Err(Error::BadCharacterName(name.to_string())),
        }
    }

    /// Number literal
    pub fn number(x: i64) -> Symbol {
        Symbol::Number(x)
    }

    /// String literal
    pub fn string(s: &str) -> Symbol {
        Symbol::Str(s.into())
    }

    /// Qualified symbol `prefix:local`
    pub fn qualified(prefix: Symbol, local: Symbol) -> Symbol {
        Symbol::Qualified(Box::new(prefix), Box::new(local))
    }

    /// Variable with the given name
    pub fn variable(name: &str) -> Symbol {
        Symbol::Variable(name.into())
    }

    /// Wrapper with identity `id` around variable `inner`
    pub fn wrapper(id: &str, inner: &str) -> Symbol {
        Symbol::Wrapper(id.into(), Box::new(Symbol::variable(inner)))
    }

    ///
    /// Name of this symbol
    ///
    /// For qualified symbols, this is `prefix:local`.
    /// For a wrapper, this is the wrapper's own id.
    ///
    pub fn name(&self) -> String {
        match self {
            Symbol::Literal(n) | Symbol::Str(n) | Symbol::Variable(n) | Symbol::Wrapper(n, _) => {
                n.to_string()
            }
            Symbol::Char(c) => c.to_string(),
            Symbol::Number(x) => x.to_string(),
            Symbol::Qualified(prefix, local) => format!("{}:{}", prefix.name(), local.name()),
        }
    }

    /// Check whether this symbol is a variable or a variable wrapper
    pub fn is_variable(&self) -> bool {
        matches!(self, Symbol::Variable(_) | Symbol::Wrapper(..))
    }

    /// Check whether a variable occurs anywhere in this symbol
    pub fn has_variables(&self) -> bool {
        match self {
            Symbol::Variable(_) | Symbol::Wrapper(..) => true,
            Symbol::Qualified(prefix, local) => prefix.has_variables() || local.has_variables(),
            _ => false,
        }
    }

    /// Value of a character literal
    pub fn as_char(&self) -> Option<char> {
        match self {
            Symbol::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Value of a number literal
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Symbol::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// Value of a string literal
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Symbol::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Prefix and local part of a qualified symbol
    pub fn parts(&self) -> Option<(&Symbol, &Symbol)> {
        match self {
            Symbol::Qualified(prefix, local) => Some((prefix.as_ref(), local.as_ref())),
            _ => None,
        }
    }

    ///
    /// Explode a string literal into a sequence of character literals.
    ///
    /// Any other symbol is returned as a one-element sequence.
    ///
    pub fn explode(&self) -> Vec<Symbol> {
        match self {
            Symbol::Str(s) => char_symbols(s),
            _ => vec![self.clone()],
        }
    }

    ///
    /// Check whether this symbol matches `other` and record bindings in ctx
    ///
    /// - a variable matches anything and binds itself to `other`
    /// - a wrapper matches if its inner variable does, and binds the wrapper to `other`
    /// - a qualified pattern matches a qualified symbol component-wise; on success,
    ///   the component bindings are kept and the pattern is bound to `other`
    /// - any other symbol matches a structurally equal symbol (identity binding)
    ///
    /// On failure, ctx is unchanged.
    ///
    pub fn matches(&self, other: &Symbol, ctx: &mut MatchContext) -> bool {
        match self {
            Symbol::Variable(_) => {
                ctx.bind(self.clone(), other.clone());
                true
            }
            Symbol::Wrapper(_, inner) => {
                if inner.possibly_matches(other, ctx) {
                    ctx.bind(self.clone(), other.clone());
                    true
                } else {
                    false
                }
            }
            Symbol::Qualified(prefix, local) => match other {
                Symbol::Qualified(p, l) => {
                    let mut scratch = ctx.clone();
                    if prefix.matches(p, &mut scratch) && local.matches(l, &mut scratch) {
                        *ctx = scratch;
                        ctx.bind(self.clone(), other.clone());
                        true
                    } else {
                        false
                    }
                }
                _ => false,
            },
            _ => {
                if self == other {
                    ctx.bind(self.clone(), other.clone());
                    true
                } else {
                    false
                }
            }
        }
    }

    ///
    /// Same test as [matches](Self::matches) but ctx is not modified
    ///
    pub fn possibly_matches(&self, other: &Symbol, ctx: &MatchContext) -> bool {
        let mut probe = ctx.clone();
        self.matches(other, &mut probe)
    }

    ///
    /// Replace every sub-symbol bound in ctx by its binding
    ///
    /// The result is a fresh structural copy. Sub-symbols without binding
    /// are kept as they are.
    ///
    pub fn substitute(&self, ctx: &MatchContext) -> Symbol {
        if let Some(value) = ctx.get(self) {
            return value.clone();
        }
        match self {
            Symbol::Qualified(prefix, local) => {
                Symbol::qualified(prefix.substitute(ctx), local.substitute(ctx))
            }
            _ => self.clone(),
        }
    }
}

/// Apply [substitute](Symbol::substitute) to every symbol in a sequence
pub fn substitute_all(symbols: &[Symbol], ctx: &MatchContext) -> Vec<Symbol> {
    symbols.iter().map(|s| s.substitute(ctx)).collect()
}

/// Convert a string to a sequence of character literals
pub fn char_symbols(s: &str) -> Vec<Symbol> {
    s.chars().map(Symbol::Char).collect()
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Literal(n) => write!(f, "{n}"),
            Symbol::Char(c) => write!(f, "'{c}'"),
            Symbol::Number(x) => write!(f, "{x}"),
            Symbol::Str(s) => write!(f, "{s:?}"),
            Symbol::Qualified(prefix, local) => write!(f, "{prefix}:{local}"),
            Symbol::Variable(n) | Symbol::Wrapper(n, _) => write!(f, "${n}"),
        }
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::literal(name)
    }
}

///
/// Source of symbols for callers that build automata from names
///
/// Higher-level front ends (e.g., string-constraint grammars) mint
/// symbols through a factory.
///
pub trait SymbolFactory {
    /// Make a literal
    fn literal(&mut self, name: &str) -> Symbol;

    /// Make a variable
    fn variable(&mut self, name: &str) -> Symbol;
}

///
/// Factory that maps names directly to literals and variables
///
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainSymbols;

impl SymbolFactory for PlainSymbols {
    fn literal(&mut self, name: &str) -> Symbol {
        Symbol::literal(name)
    }

    fn variable(&mut self, name: &str) -> Symbol {
        Symbol::variable(name)
    }
}
