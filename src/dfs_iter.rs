use crate::{bitset::Bitset, graph::RoadGraph, stack::LinkedStack};

/// Our main traversal data structure. We model a search with the Iterator trait where the
/// `.next()` method returns the next city in the search or None if the search has been
/// exhausted.
///
/// The stack can hold the same city more than once; a city is only returned (and marked visited)
/// the first time it is popped. Neighbors are pushed in reverse so the first road out of a city
/// is the first one explored, which matches a recursive depth-first search.
#[derive(Debug)]
pub struct DfsIter<'graph> {
    pub graph: &'graph RoadGraph,
    pub root: usize,
    pub search_started: bool,
    pub search_exhausted: bool,
    pub search_stack: LinkedStack<usize>,
    pub visited: Bitset,
}

impl<'graph> DfsIter<'graph> {
    pub fn new(graph: &'graph RoadGraph, root: usize) -> Self {
        let mut dfs_iter = DfsIter {
            graph,
            root,
            search_started: false,
            search_exhausted: false,
            search_stack: LinkedStack::new(),
            visited: Bitset::with_len(graph.len()),
        };
        dfs_iter.reset();
        dfs_iter
    }

    fn reset(&mut self) {
        self.visited.clear();
        self.search_stack.clear();
        self.search_exhausted = false;
        if self.root < self.graph.len() {
            self.search_stack.push(self.root);
        }
    }

    pub fn check_visited(&self, idx: usize) -> bool {
        self.visited.get(idx)
    }

    /// Resets all visited state and returns whether a node is reachable or not.
    pub fn search(&mut self, node: usize) -> bool {
        self.reset();
        self.search_started = true;
        self.any(|n| n == node)
    }

    /// Returns whether a node is reachable or not, checking previous traversals first.
    pub fn search_resumable(&mut self, node: usize) -> bool {
        if !self.search_started {
            self.reset();
            self.search_started = true;
        }
        if self.check_visited(node) {
            return true;
        }
        if self.search_exhausted {
            return false;
        }
        match self.any(|n| n == node) {
            true => true,
            false => {
                self.search_exhausted = true;
                false
            }
        }
    }

    /// Pushes the unvisited neighbors of `node` onto our DFS stack, last road first.
    fn push_neighbors_out(&mut self, node: usize) {
        for &(n, _) in self.graph.neighbors(node).iter().rev() {
            if !self.visited.get(n) {
                self.search_stack.push(n);
            }
        }
    }
}

impl Iterator for DfsIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.search_stack.pop()?;
            if self.visited.insert(node) {
                self.push_neighbors_out(node);
                break Some(node);
            }
        }
    }
}
