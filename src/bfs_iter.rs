// A quick copy of DfsIter but using a queue for breadth-first search.

use crate::{bitset::Bitset, graph::RoadGraph, queue::Queue};

/// Breadth-first traversal modeled with the Iterator trait: `.next()` returns the next city
/// index in the search or None once every city reachable from the root has been returned.
///
/// A city is marked visited as soon as it is queued, so it can only ever be queued once.
#[derive(Debug)]
pub struct BfsIter<'graph> {
    pub graph: &'graph RoadGraph,
    pub root: usize,
    pub search_queue: Queue<usize>,
    pub visited: Bitset,
}

impl<'graph> BfsIter<'graph> {
    pub fn new(graph: &'graph RoadGraph, root: usize) -> Self {
        let mut bfs_iter = BfsIter {
            graph,
            root,
            search_queue: Queue::new(),
            visited: Bitset::with_len(graph.len()),
        };
        bfs_iter.clear();
        bfs_iter
    }

    pub fn check_visited(&self, idx: usize) -> bool {
        self.visited.get(idx)
    }

    /// Resets the traversal and returns whether `node` is reachable from the root.
    pub fn search(&mut self, node: usize) -> bool {
        self.clear();
        self.any(|n| n == node)
    }

    /// Puts the iterator back at the root with nothing visited. An out-of-range root gives an
    /// empty traversal.
    pub fn clear(&mut self) {
        self.visited.clear();
        self.search_queue.clear();
        if self.root < self.graph.len() {
            self.visited.set(self.root);
            self.search_queue.push(self.root);
        }
    }

    /// Queues every unvisited neighbor of `node` in insertion order.
    fn visit_neighbors_out(&mut self, node: usize) {
        for &(n, _) in self.graph.neighbors(node) {
            if self.visited.insert(n) {
                self.search_queue.push(n);
            }
        }
    }
}

impl Iterator for BfsIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.search_queue.pop()?;
        self.visit_neighbors_out(node);
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 - 1 - 3
    // |   |
    // 2 - 4   5 - 6
    fn graph() -> RoadGraph {
        let mut graph = RoadGraph::default();
        for name in ["a", "b", "c", "d", "e", "f", "g"] {
            graph.add_city(name);
        }
        graph.add_road("a", "b", 1.0);
        graph.add_road("a", "c", 1.0);
        graph.add_road("b", "d", 1.0);
        graph.add_road("b", "e", 1.0);
        graph.add_road("c", "e", 1.0);
        graph.add_road("f", "g", 1.0);
        graph
    }

    #[test]
    fn visits_level_by_level() {
        let graph = graph();
        let order: Vec<usize> = graph.bfs_iter(0).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn each_node_once() {
        let graph = graph();
        let order: Vec<usize> = graph.bfs_iter(4).collect();
        assert_eq!(order, vec![4, 1, 2, 0, 3]);
    }

    #[test]
    fn search_resets_between_calls() {
        let graph = graph();
        let mut bfs = graph.bfs_iter(0);
        assert!(bfs.search(4));
        assert!(bfs.check_visited(4));
        assert!(bfs.search(3));
        assert!(!bfs.search(6));
        assert!(bfs.search(0));
        assert!(graph.bfs_iter(5).search(6));
    }

    #[test]
    fn bad_root_is_empty() {
        let graph = graph();
        assert_eq!(graph.bfs_iter(42).next(), None);
        assert!(!graph.bfs_iter(42).search(42));
    }
}
