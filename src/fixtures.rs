//! Deterministic data generated by `build.rs` from a seeded RNG. Shared by the tests and the
//! criterion benches so both work on something bigger than a hand-written sample.

use crate::{graph::RoadGraph, Result};

/// A connected road network in the four-line `cities.txt` format.
pub const ROADS: &str = include_str!(concat!(env!("OUT_DIR"), "/roads.txt"));

/// A synthetic course schedule, header line included, with some repeated lines.
pub const SCHEDULE: &str = include_str!(concat!(env!("OUT_DIR"), "/schedule.txt"));

// Must match build.rs.
pub const ROAD_CITIES: usize = 2_000;
pub const SCHEDULE_LINES: usize = 5_000;

pub fn road_graph() -> Result<RoadGraph> {
    RoadGraph::parse(ROADS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{count_courses, count_subjects, find_conflicts, CourseIndex, Schedule};

    #[test]
    fn road_network_is_connected() {
        let graph = road_graph().unwrap();
        assert_eq!(graph.len(), ROAD_CITIES);
        assert_eq!(graph.bfs_iter(0).count(), ROAD_CITIES);
        assert_eq!(graph.dfs_iter(0).count(), ROAD_CITIES);
    }

    #[test]
    fn cheapest_is_never_more_expensive_than_shortest() {
        let graph = road_graph().unwrap();
        for (from, to) in [(0, ROAD_CITIES - 1), (17, 1234), (999, 3)] {
            let shortest = graph.shortest_route(from, to).unwrap();
            let cheapest = graph.cheapest_route(from, to).unwrap();
            assert!(cheapest.path.len() >= shortest.path.len());
            let shortest_miles: f64 = shortest
                .path
                .windows(2)
                .map(|w| {
                    graph
                        .neighbors(w[0])
                        .iter()
                        .find(|(n, _)| *n == w[1])
                        .map(|(_, cost)| *cost)
                        .unwrap()
                })
                .sum();
            assert!(cheapest.cost <= shortest_miles);
        }
    }

    #[test]
    fn schedule_reports_agree() {
        let schedule = Schedule::parse_str(SCHEDULE);
        assert_eq!(schedule.lines().count(), SCHEDULE_LINES);
        assert!(schedule.strict_records().is_ok());

        let subjects = count_subjects(SCHEDULE);
        assert_eq!(subjects.rejected, 1);
        assert!(subjects.duplicates > 0);
        assert_eq!(
            subjects.total_sections + subjects.duplicates + subjects.rejected,
            SCHEDULE_LINES
        );

        // Deduplicating by (term, section) can only drop more rows than deduplicating lines.
        let courses: usize = count_courses(SCHEDULE)
            .iter()
            .flat_map(|s| s.courses.iter().map(|c| c.sections))
            .sum();
        assert!(courses <= subjects.total_sections);

        let conflicts = find_conflicts(SCHEDULE);
        assert!(conflicts.iter().all(|c| c.course != c.conflicts_with));

        let index = CourseIndex::build(SCHEDULE);
        assert!(!index.is_empty());
        assert_eq!(index.search("").len(), index.len());
    }
}
