use std::{cmp::Ordering, fmt::Write as _, path::Path};

use serde::Serialize;

use crate::{
    bfs_iter::BfsIter,
    dfs_iter::DfsIter,
    hashtable::{std_hash, HashTable},
    priority_queue::PriorityQueue,
    queue::Queue,
    Error, Result,
};

/// A city and the roads leaving it. Each road is stored as `(neighbor index, cost)`.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: String,
    pub roads: Vec<(usize, f64)>,
}

/// An undirected road network. Cities are numbered in the order they first appear in the input
/// and every road is stored once in each direction, so neighbor lists keep insertion order.
#[derive(Debug, Clone)]
pub struct RoadGraph {
    cities: Vec<City>,
    index: HashTable<String, usize>,
}

// Hashes the `str` form so lookups by `&str` and by `String` agree.
fn name_hash(name: &str) -> usize {
    std_hash(&name)
}

impl Default for RoadGraph {
    fn default() -> Self {
        RoadGraph {
            cities: Vec::new(),
            index: HashTable::new(|name: &String| name_hash(name)),
        }
    }
}

/// A path through the graph, source first. For shortest routes `cost` is the number of roads
/// taken, for cheapest routes it is the summed road cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub path: Vec<usize>,
    pub cost: f64,
}

impl Route {
    pub fn names<'g>(&self, graph: &'g RoadGraph) -> Vec<&'g str> {
        self.path.iter().filter_map(|&i| graph.name(i)).collect()
    }

    /// Formats the route as `Total miles: 42-Concord-Walnut Creek`.
    pub fn describe(&self, graph: &RoadGraph) -> String {
        self.describe_as(graph, "miles")
    }

    /// Like [`Route::describe`] with a different unit, e.g. `Total edges: 2-Concord-...`.
    pub fn describe_as(&self, graph: &RoadGraph, unit: &str) -> String {
        self.names(graph)
            .iter()
            .fold(format!("Total {}: {}", unit, self.cost), |mut acc, name| {
                acc.push('-');
                acc.push_str(name);
                acc
            })
    }
}

impl RoadGraph {
    /// Parses the four-line record format: from city, to city, cost, and a separator line that
    /// is ignored. Records with a blank city name (usually trailing blank lines) are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_records(text, true)
    }

    /// Like [`RoadGraph::parse`] but the cost line is skipped unread and every road costs 0.
    /// Traversals only need the connections.
    pub fn parse_unweighted(text: &str) -> Self {
        // Never fails when costs aren't read.
        Self::parse_records(text, false).unwrap_or_default()
    }

    fn parse_records(text: &str, weighted: bool) -> Result<Self> {
        let mut graph = RoadGraph::default();
        let mut lines = text.lines().map(str::trim_end).enumerate();
        while let Some((n, from)) = lines.next() {
            let to = lines.next().map_or("", |(_, l)| l);
            let cost = lines.next().map_or("", |(_, l)| l);
            lines.next();

            if from.is_empty() || to.is_empty() {
                log::trace!("skipping incomplete record at line {}", n + 1);
                continue;
            }
            let cost = match weighted {
                true => cost.trim().parse::<f64>().map_err(|_| Error::InvalidCost {
                    line: n + 3,
                    value: cost.to_string(),
                })?,
                false => 0.0,
            };
            graph.add_road(from, to, cost);
        }
        log::debug!("loaded road graph with {} cities", graph.len());
        Ok(graph)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&text)
    }

    pub fn load_unweighted(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::parse_unweighted(&text))
    }

    /// Returns the index for `name`, adding the city if this is the first time it's been seen.
    pub fn add_city(&mut self, name: &str) -> usize {
        if let Some(i) = self.index_of(name) {
            return i;
        }
        let i = self.cities.len();
        self.cities.push(City {
            name: name.to_string(),
            roads: Vec::new(),
        });
        self.index.insert(name.to_string(), i);
        i
    }

    pub fn add_road(&mut self, from: &str, to: &str, cost: f64) {
        let from = self.add_city(from);
        let to = self.add_city(to);
        self.cities[from].roads.push((to, cost));
        self.cities[to].roads.push((from, cost));
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn name(&self, i: usize) -> Option<&str> {
        self.cities.get(i).map(|c| c.name.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get_hashed(name_hash(name), name).copied()
    }

    /// Like `index_of` but an unknown name is an error.
    pub fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| Error::UnknownCity(name.to_string()))
    }

    /// Roads leaving city `i` in insertion order. Unknown indices have no roads.
    pub fn neighbors(&self, i: usize) -> &[(usize, f64)] {
        self.cities
            .get(i)
            .map(|c| c.roads.as_slice())
            .unwrap_or_default()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// This gives us a data structure implementing Iterator that traverses the graph with a
    /// breadth-first search starting at `start`.
    pub fn bfs_iter(&self, start: usize) -> BfsIter<'_> {
        BfsIter::new(self, start)
    }

    /// Depth-first counterpart of `bfs_iter`.
    pub fn dfs_iter(&self, start: usize) -> DfsIter<'_> {
        DfsIter::new(self, start)
    }

    /// The route with the fewest roads, found by a breadth-first search that remembers where it
    /// came from.
    pub fn shortest_route(&self, from: usize, to: usize) -> Option<Route> {
        if from >= self.len() || to >= self.len() {
            return None;
        }
        let mut prev: Vec<Option<usize>> = vec![None; self.len()];
        let mut seen = vec![false; self.len()];
        let mut queue = Queue::new();
        seen[from] = true;
        queue.push(from);

        while let Some(n) = queue.pop() {
            if n == to {
                let path = self.walk_back(&prev, to);
                let cost = (path.len() - 1) as f64;
                return Some(Route { path, cost });
            }
            for &(next, _) in self.neighbors(n) {
                if !seen[next] {
                    seen[next] = true;
                    prev[next] = Some(n);
                    queue.push(next);
                }
            }
        }
        None
    }

    /// The route with the lowest total cost. Dijkstra's algorithm with lazy deletion: stale
    /// queue entries are skipped when popped instead of being decreased in place.
    pub fn cheapest_route(&self, from: usize, to: usize) -> Option<Route> {
        if from >= self.len() || to >= self.len() {
            return None;
        }
        let mut prev: Vec<Option<usize>> = vec![None; self.len()];
        let mut settled = vec![false; self.len()];
        let mut to_visit = PriorityQueue::new();
        to_visit.push(Terminus {
            index: from,
            prev: None,
            cost: 0.0,
        });

        while let Some(t) = to_visit.pop() {
            if settled[t.index] {
                continue;
            }
            settled[t.index] = true;
            prev[t.index] = t.prev;

            if t.index == to {
                return Some(Route {
                    path: self.walk_back(&prev, to),
                    cost: t.cost,
                });
            }
            for &(next, cost) in self.neighbors(t.index) {
                if !settled[next] {
                    to_visit.push(Terminus {
                        index: next,
                        prev: Some(t.index),
                        cost: t.cost + cost,
                    });
                }
            }
        }
        None
    }

    fn walk_back(&self, prev: &[Option<usize>], to: usize) -> Vec<usize> {
        let mut path = vec![to];
        let mut cur = to;
        while let Some(p) = prev[cur] {
            path.push(p);
            cur = p;
        }
        path.reverse();
        path
    }

    /// Renders an `X`/`.` adjacency matrix, one row per city with the name right-aligned in a
    /// 16 column gutter and the first letter of each name as the column header.
    pub fn adjacency_matrix(&self) -> String {
        let mut out = format!("{:>16}", "");
        for city in &self.cities {
            out.push(' ');
            out.push(city.name.chars().next().unwrap_or('-'));
        }
        for city in &self.cities {
            let _ = write!(out, "\n{:>16}", city.name);
            let mut row = vec!['.'; self.len()];
            city.roads.iter().for_each(|&(n, _)| row[n] = 'X');
            for c in row {
                out.push(' ');
                out.push(c);
            }
        }
        out.push('\n');
        out
    }
}

// Priority queue entry. Ordered so the cheapest entry is the greatest, which puts it on top of
// our max-heap. Ties go to the lower index to keep results deterministic.
#[derive(Debug, Clone, Copy)]
struct Terminus {
    index: usize,
    prev: Option<usize>,
    cost: f64,
}

impl Ord for Terminus {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Terminus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Terminus {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Terminus {}
