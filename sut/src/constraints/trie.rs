// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::collections::BTreeMap;

#[derive(Clone, Debug)]
struct Node<T> {
    children: BTreeMap<T, Node<T>>,
    valid: bool,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self { children: BTreeMap::new(), valid: false }
    }
}

/// A prefix tree over sorted sequences.
///
/// Used to find out quickly whether a stored exclusion is more general than a new one.
#[derive(Clone, Debug)]
pub struct Trie<T> {
    root: Node<T>,
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self { root: Node::default() }
    }
}

impl<T: Ord + Clone> Trie<T> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a sequence.
    pub fn insert(&mut self, items: &[T]) {
        let mut node = &mut self.root;
        for item in items {
            node = node.children.entry(item.clone()).or_default();
        }
        node.valid = true;
    }

    /// Forget a sequence. Nodes are kept, only the end marker is removed.
    pub fn erase(&mut self, items: &[T]) {
        let mut node = &mut self.root;
        for item in items {
            match node.children.get_mut(item) {
                Some(child) => node = child,
                None => return,
            }
        }
        node.valid = false;
    }

    /// Whether the exact sequence is stored.
    pub fn contains(&self, items: &[T]) -> bool {
        let mut node = &self.root;
        for item in items {
            match node.children.get(item) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.valid
    }

    /// Whether a stored sequence is a prefix of `items`, including `items` itself.
    pub fn find_prefix(&self, items: &[T]) -> bool {
        let mut node = &self.root;
        if node.valid {
            return true;
        }
        for item in items {
            match node.children.get(item) {
                Some(child) => node = child,
                None => return false,
            }
            if node.valid {
                return true;
            }
        }
        false
    }

    /// Whether a stored sequence consists only of elements of the sorted `items`.
    ///
    /// This equals asking whether a stored sequence is a prefix of any permutation of `items`.
    pub fn contains_subset(&self, items: &[T]) -> bool {
        Self::subset_below(&self.root, items)
    }

    fn subset_below(node: &Node<T>, items: &[T]) -> bool {
        if node.valid {
            return true;
        }
        items.iter().enumerate().any(|(at, item)| match node.children.get(item) {
            Some(child) => Self::subset_below(child, &items[at + 1..]),
            None => false,
        })
    }
}
