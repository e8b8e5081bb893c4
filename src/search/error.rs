// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::GeoPoint;

/// Error conditions which may occur during [bfs](crate::Graph::bfs),
/// [dijkstra](crate::Graph::dijkstra) or [a_star](crate::Graph::a_star).
///
/// Note that an unreachable goal is not an error: all search entry
/// points report that outcome as `Ok(None)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchError {
    /// The start or goal point is not a vertex of the graph.
    UnknownPoint(GeoPoint),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPoint(point) => write!(f, "point not in graph: {}", point),
        }
    }
}

impl std::error::Error for SearchError {}
