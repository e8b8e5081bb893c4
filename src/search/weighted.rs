// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap, HashSet};

use super::{reconstruct_path, SearchError};
use crate::{GeoPoint, Graph};

/// An entry of the weighted searches' frontier: an intersection together
/// with the cost accumulated to reach it and the priority score assigned
/// at enqueue time.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    at: GeoPoint,
    cost: f64,
    score: f64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other.score.total_cmp(&self.score)
    }
}

impl Graph {
    /// Uses [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
    /// to find the shortest route between two intersections by total road length.
    ///
    /// Returns `Ok(None)` if the goal is not reachable from the start, and
    /// [SearchError::UnknownPoint] if either point is not a vertex of
    /// the graph.
    pub fn dijkstra(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
    ) -> Result<Option<Vec<GeoPoint>>, SearchError> {
        self.dijkstra_with_observer(start, goal, |_| {})
    }

    /// Same as [dijkstra](Graph::dijkstra), additionally invoking `observer`
    /// once for every intersection as it is finalized, e.g. for visualizing
    /// search progress. The observer has no effect on the result.
    pub fn dijkstra_with_observer(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        observer: impl FnMut(GeoPoint),
    ) -> Result<Option<Vec<GeoPoint>>, SearchError> {
        self.weighted_search(start, goal, |_| 0.0, observer)
    }

    /// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
    /// to find the shortest route between two intersections by total road length.
    ///
    /// Finds the same routes as [dijkstra](Graph::dijkstra) while usually
    /// expanding fewer intersections, as the search is directed towards the
    /// goal by the crow-flies distance heuristic. This requires every road
    /// to be at least as long as the crow-flies distance between its
    /// endpoints.
    ///
    /// Returns `Ok(None)` if the goal is not reachable from the start, and
    /// [SearchError::UnknownPoint] if either point is not a vertex of
    /// the graph.
    pub fn a_star(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
    ) -> Result<Option<Vec<GeoPoint>>, SearchError> {
        self.a_star_with_observer(start, goal, |_| {})
    }

    /// Same as [a_star](Graph::a_star), additionally invoking `observer`
    /// once for every intersection as it is finalized, e.g. for visualizing
    /// search progress. The observer has no effect on the result.
    pub fn a_star_with_observer(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        observer: impl FnMut(GeoPoint),
    ) -> Result<Option<Vec<GeoPoint>>, SearchError> {
        self.weighted_search(start, goal, |point| point.distance_to(goal), observer)
    }

    /// The skeleton shared by [dijkstra](Graph::dijkstra) and
    /// [a_star](Graph::a_star), parameterized only by the heuristic
    /// added to the accumulated cost when scoring frontier entries.
    fn weighted_search(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        heuristic: impl Fn(GeoPoint) -> f64,
        mut observer: impl FnMut(GeoPoint),
    ) -> Result<Option<Vec<GeoPoint>>, SearchError> {
        self.check_vertex(start)?;
        self.check_vertex(goal)?;

        let mut queue: BinaryHeap<QueueEntry> = BinaryHeap::new();
        let mut visited: HashSet<GeoPoint> = HashSet::new();
        let mut came_from: HashMap<GeoPoint, GeoPoint> = HashMap::new();

        // Best known cost from the start, owned by this call's stack frame,
        // so successive searches never observe each other's state.
        let mut known_costs: HashMap<GeoPoint, f64> = HashMap::new();

        known_costs.insert(start, 0.0);
        queue.push(QueueEntry {
            at: start,
            cost: 0.0,
            score: heuristic(start),
        });

        while let Some(entry) = queue.pop() {
            // Contrary to the wikipedia definition, we might keep multiple
            // entries in the queue for the same intersection. Entries for
            // already-finalized intersections are stale leftovers from
            // earlier, more expensive enqueues.
            if !visited.insert(entry.at) {
                continue;
            }

            observer(entry.at);

            if entry.at == goal {
                return Ok(Some(reconstruct_path(&came_from, goal)));
            }

            for road in self.roads_from(entry.at) {
                if visited.contains(&road.to) {
                    continue;
                }

                // Check if this is the cheapest known way to the neighbor
                let candidate = entry.cost + road.length;
                if candidate
                    >= known_costs
                        .get(&road.to)
                        .copied()
                        .unwrap_or(f64::INFINITY)
                {
                    continue;
                }

                known_costs.insert(road.to, candidate);
                came_from.insert(road.to, entry.at);
                queue.push(QueueEntry {
                    at: road.to,
                    cost: candidate,
                    score: candidate + heuristic(road.to),
                });
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Road;

    fn total_length(g: &Graph, path: &[GeoPoint]) -> f64 {
        path.windows(2)
            .map(|pair| g.edge_length(pair[0], pair[1]))
            .sum()
    }

    // Three intersections where the direct a-c road is longer than
    // going through b.
    fn triangle() -> (Graph, [GeoPoint; 3]) {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let c = GeoPoint::new(1.0, 1.0);

        let mut g = Graph::new();
        for p in [a, b, c] {
            g.add_vertex(p);
        }
        g.add_edge(Road::new(a, b, "", "residential", 1.0)).unwrap();
        g.add_edge(Road::new(b, c, "", "residential", 1.0)).unwrap();
        g.add_edge(Road::new(a, c, "", "motorway", 5.0)).unwrap();

        (g, [a, b, c])
    }

    // A town-sized network with road lengths consistent with the
    // geography: every road is 1.2x the crow-flies distance between
    // its endpoints, so the A* heuristic never overestimates.
    fn town() -> (Graph, Vec<GeoPoint>) {
        let points: Vec<GeoPoint> = [
            (52.20, 21.00),
            (52.20, 21.02),
            (52.20, 21.04),
            (52.22, 21.00),
            (52.22, 21.02),
            (52.22, 21.04),
            (52.24, 21.00),
            (52.24, 21.02),
            (52.24, 21.04),
        ]
        .iter()
        .map(|&(lat, lon)| GeoPoint::new(lat, lon))
        .collect();

        let mut g = Graph::new();
        for &p in &points {
            g.add_vertex(p);
        }

        // Connect the 3x3 grid row- and column-wise, both directions
        let mut connect = |from: GeoPoint, to: GeoPoint| {
            let length = from.distance_to(to) * 1.2;
            g.add_edge(Road::new(from, to, "", "residential", length))
                .unwrap();
            g.add_edge(Road::new(to, from, "", "residential", length))
                .unwrap();
        };
        for row in 0..3 {
            for col in 0..3 {
                let idx = row * 3 + col;
                if col + 1 < 3 {
                    connect(points[idx], points[idx + 1]);
                }
                if row + 1 < 3 {
                    connect(points[idx], points[idx + 3]);
                }
            }
        }

        (g, points)
    }

    #[test]
    fn dijkstra_prefers_cheaper_multi_segment_route() {
        let (g, [a, b, c]) = triangle();

        let path = g.dijkstra(a, c).unwrap().unwrap();
        assert_eq!(path, vec![a, b, c]);
        assert_eq!(total_length(&g, &path), 2.0);
    }

    #[test]
    fn a_star_finds_routes_as_short_as_dijkstra() {
        let (g, points) = town();
        let (start, goal) = (points[0], points[8]);

        let dijkstra_path = g.dijkstra(start, goal).unwrap().unwrap();
        let a_star_path = g.a_star(start, goal).unwrap().unwrap();

        let diff = (total_length(&g, &dijkstra_path) - total_length(&g, &a_star_path)).abs();
        assert!(diff < 1e-9, "A* route differs from Dijkstra's by {}", diff);
    }

    #[test]
    fn a_star_expands_no_more_intersections_than_dijkstra() {
        let (g, points) = town();
        let (start, goal) = (points[0], points[8]);

        let mut dijkstra_expanded = 0;
        g.dijkstra_with_observer(start, goal, |_| dijkstra_expanded += 1)
            .unwrap()
            .unwrap();

        let mut a_star_expanded = 0;
        g.a_star_with_observer(start, goal, |_| a_star_expanded += 1)
            .unwrap()
            .unwrap();

        assert!(a_star_expanded <= dijkstra_expanded);
    }

    #[test]
    fn start_equal_to_goal() {
        let (g, [a, ..]) = triangle();
        assert_eq!(g.dijkstra(a, a).unwrap().unwrap(), vec![a]);
        assert_eq!(g.a_star(a, a).unwrap().unwrap(), vec![a]);
    }

    #[test]
    fn unreachable_goal() {
        let (mut g, [a, ..]) = triangle();

        let lonely = GeoPoint::new(9.0, 9.0);
        g.add_vertex(lonely);

        assert_eq!(g.dijkstra(a, lonely).unwrap(), None);
        assert_eq!(g.a_star(a, lonely).unwrap(), None);

        // Edges are directed: nothing leads back into a
        assert_eq!(g.dijkstra(lonely, a).unwrap(), None);
    }

    #[test]
    fn unknown_start_or_goal() {
        let (g, [a, ..]) = triangle();
        let elsewhere = GeoPoint::new(9.0, 9.0);

        assert_eq!(
            g.dijkstra(elsewhere, a),
            Err(SearchError::UnknownPoint(elsewhere)),
        );
        assert_eq!(
            g.a_star(a, elsewhere),
            Err(SearchError::UnknownPoint(elsewhere)),
        );
    }

    #[test]
    fn successive_searches_are_independent() {
        let (g, points) = town();
        let (start, goal) = (points[0], points[8]);

        let first = g.dijkstra(start, goal).unwrap();
        let second = g.dijkstra(start, goal).unwrap();
        assert_eq!(first, second);

        // Interleaving other searches must not leak state either
        let before = g.a_star(start, goal).unwrap();
        let _ = g.bfs(start, goal).unwrap();
        let _ = g.dijkstra(goal, start).unwrap();
        let after = g.a_star(start, goal).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn zero_length_roads_are_traversable() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 0.0001);
        let mut g = Graph::new();
        g.add_vertex(a);
        g.add_vertex(b);
        g.add_edge(Road::new(a, b, "", "path", 0.0)).unwrap();

        let path = g.dijkstra(a, b).unwrap().unwrap();
        assert_eq!(path, vec![a, b]);
        assert_eq!(total_length(&g, &path), 0.0);
    }
}
