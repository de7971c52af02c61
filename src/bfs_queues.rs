// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Worklist for breadth-first exploration of states and state sets
//!

use std::{
    collections::{HashSet, VecDeque},
    hash::Hash,
};

///
/// Queue that never contains the same element twice
/// - push adds an element at the back if it was never pushed before
/// - pop removes the front element
///
#[derive(Debug)]
pub struct BfsQueue<T> {
    queue: VecDeque<T>,
    seen: HashSet<T>,
}

impl<T: Eq + Hash + Clone> BfsQueue<T> {
    /// Empty queue
    pub fn new() -> Self {
        BfsQueue {
            queue: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Push an element if it's new
    /// - return true if the element was added
    pub fn push(&mut self, element: T) -> bool {
        if self.seen.insert(element.clone()) {
            self.queue.push_back(element);
            true
        } else {
            false
        }
    }

    /// Push all elements from an iterator
    pub fn push_all(&mut self, iter: impl IntoIterator<Item = T>) {
        for x in iter {
            self.push(x);
        }
    }

    /// Front element if any
    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }
}
