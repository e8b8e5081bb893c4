// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet, VecDeque};

use super::{reconstruct_path, SearchError};
use crate::{GeoPoint, Graph};

impl Graph {
    /// Uses [breadth-first search](https://en.wikipedia.org/wiki/Breadth-first_search)
    /// to find a path between two intersections with the fewest road segments.
    ///
    /// Road lengths are deliberately ignored - every segment counts as one
    /// hop, so the returned path is not necessarily the shortest by
    /// distance. Use [dijkstra](Graph::dijkstra) or [a_star](Graph::a_star)
    /// for the shortest total length.
    ///
    /// Returns `Ok(None)` if the goal is not reachable from the start, and
    /// [SearchError::UnknownPoint] if either point is not a vertex of
    /// the graph.
    pub fn bfs(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
    ) -> Result<Option<Vec<GeoPoint>>, SearchError> {
        self.bfs_with_observer(start, goal, |_| {})
    }

    /// Same as [bfs](Graph::bfs), additionally invoking `observer` once
    /// for every intersection as it is dequeued, e.g. for visualizing
    /// search progress. The observer has no effect on the result.
    pub fn bfs_with_observer(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        mut observer: impl FnMut(GeoPoint),
    ) -> Result<Option<Vec<GeoPoint>>, SearchError> {
        self.check_vertex(start)?;
        self.check_vertex(goal)?;

        let mut queue: VecDeque<GeoPoint> = VecDeque::new();
        let mut visited: HashSet<GeoPoint> = HashSet::new();
        let mut came_from: HashMap<GeoPoint, GeoPoint> = HashMap::new();

        queue.push_back(start);
        visited.insert(start);

        while let Some(curr) = queue.pop_front() {
            observer(curr);

            if curr == goal {
                return Ok(Some(reconstruct_path(&came_from, goal)));
            }

            for road in self.roads_from(curr) {
                if visited.insert(road.to) {
                    came_from.insert(road.to, curr);
                    queue.push_back(road.to);
                }
            }
        }

        Ok(None)
    }
}
