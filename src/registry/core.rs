use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::style::PositionDirective;

/// Registry mapping positioned nodes to the last directive written on them.
#[derive(Debug, Clone)]
pub struct PlacementRegistry<N> {
    entries: HashMap<N, PositionDirective>,
}

impl<N> Default for PlacementRegistry<N> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<N: Clone + Eq + Hash> PlacementRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `directive` for `node`; returns `true` when it differs from
    /// what was last written and therefore needs writing.
    pub fn record(&mut self, node: &N, directive: PositionDirective) -> bool {
        match self.entries.get_mut(node) {
            Some(current) if *current == directive => false,
            Some(current) => {
                *current = directive;
                true
            }
            None => {
                self.entries.insert(node.clone(), directive);
                true
            }
        }
    }

    /// Forget every node not in `live` and return the forgotten ones.
    pub fn retain_live<'a, I>(&mut self, live: I) -> Vec<N>
    where
        I: IntoIterator<Item = &'a N>,
        N: 'a,
    {
        let live: HashSet<&N> = live.into_iter().collect();
        let stale: Vec<N> = self
            .entries
            .keys()
            .filter(|node| !live.contains(node))
            .cloned()
            .collect();
        for node in &stale {
            self.entries.remove(node);
        }
        stale
    }

    pub fn drain(&mut self) -> Vec<N> {
        self.entries.drain().map(|(node, _)| node).collect()
    }

    pub fn directive_of(&self, node: &N) -> Option<&PositionDirective> {
        self.entries.get(node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
