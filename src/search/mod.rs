// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod bfs;
mod error;
mod weighted;

pub use error::SearchError;

use crate::{GeoPoint, Graph};
use std::collections::HashMap;

impl Graph {
    /// Fails fast with [SearchError::UnknownPoint] if the provided
    /// point is not a vertex of the graph.
    fn check_vertex(&self, point: GeoPoint) -> Result<(), SearchError> {
        if self.intersection(point).is_some() {
            Ok(())
        } else {
            Err(SearchError::UnknownPoint(point))
        }
    }
}

/// Walks the predecessor map backwards from `last` and returns the
/// visited points in start-to-goal order.
fn reconstruct_path(came_from: &HashMap<GeoPoint, GeoPoint>, mut last: GeoPoint) -> Vec<GeoPoint> {
    let mut path = vec![last];

    while let Some(&point) = came_from.get(&last) {
        path.push(point);
        last = point;
    }

    path.reverse();
    return path;
}
