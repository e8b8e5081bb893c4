// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, GeoPoint, Road};
use std::collections::btree_map::{BTreeMap, Entry};

/// A single vertex of the [Graph]: the place where [Roads](Road) meet.
///
/// Holds the identifying [GeoPoint] and the outgoing roads, keyed by
/// the neighboring intersection's point. At most one road exists towards
/// any given neighbor; the [Graph] rejects duplicates on insertion.
///
/// Intersections are created only through [Graph::add_vertex] and live
/// for the lifetime of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    point: GeoPoint,
    roads: Vec<Road>,
}

impl Intersection {
    fn new(point: GeoPoint) -> Self {
        Self {
            point,
            roads: Vec::new(),
        }
    }

    /// Returns the [GeoPoint] identifying this intersection.
    pub fn point(&self) -> GeoPoint {
        self.point
    }

    /// Returns all outgoing [Roads](Road) of this intersection.
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Retrieves the [Road] leading to the given neighbor, if one exists.
    pub fn road_to(&self, to: GeoPoint) -> Option<&Road> {
        self.roads.iter().find(|road| road.to == to)
    }

    /// Checks whether a [Road] towards the given neighbor exists.
    pub fn has_road_to(&self, to: GeoPoint) -> bool {
        self.road_to(to).is_some()
    }

    fn add_road(&mut self, road: Road) {
        debug_assert_eq!(road.from, self.point);
        self.roads.push(road);
    }
}

/// Reasons for which [Graph::add_edge] rejects a [Road].
///
/// The graph is left untouched whenever a road is rejected, so callers
/// bulk-loading noisy map data may log the reason and keep going.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum EdgeRejection {
    /// The road's length is negative, NaN or infinite.
    #[error("road length must be finite and non-negative, got {0}")]
    InvalidLength(f64),

    /// One of the road's endpoints is not a vertex of the graph.
    #[error("road endpoint {0} is not a vertex of the graph")]
    MissingEndpoint(GeoPoint),

    /// A road between the same pair of intersections already exists.
    #[error("a road from {0} to {1} already exists")]
    DuplicateEdge(GeoPoint, GeoPoint),
}

/// Represents a road network as a set of [Intersections](Intersection)
/// connected by directed [Roads](Road), keyed by [GeoPoint].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph(BTreeMap<GeoPoint, Intersection>);

impl Graph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of [Intersections](Intersection) in the graph.
    pub fn vertex_count(&self) -> usize {
        self.0.len()
    }

    /// Returns the number of directed [Roads](Road) in the graph.
    pub fn edge_count(&self) -> usize {
        self.0.values().map(|i| i.roads.len()).sum()
    }

    /// Retrieves the [Intersection] at the provided point.
    pub fn intersection(&self, point: GeoPoint) -> Option<&Intersection> {
        self.0.get(&point)
    }

    /// Returns an iterator over all [Intersections](Intersection) in the graph.
    pub fn iter(&self) -> impl Iterator<Item = &Intersection> {
        self.0.values()
    }

    /// Returns an iterator over the [GeoPoints](GeoPoint) of all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.0.keys().copied()
    }

    /// Inserts a new [Intersection] at the provided point.
    ///
    /// Returns false, without changing the graph, if the point has
    /// non-finite coordinates or an intersection at the same point
    /// already exists.
    pub fn add_vertex(&mut self, point: GeoPoint) -> bool {
        if !point.is_finite() {
            return false;
        }

        match self.0.entry(point) {
            Entry::Vacant(e) => {
                e.insert(Intersection::new(point));
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Inserts a directed [Road] into the graph.
    ///
    /// The road must have a finite, non-negative length, both of its
    /// endpoints must already be vertices of the graph, and no road
    /// between the same endpoints may exist. Otherwise the road is
    /// rejected and the graph is left untouched.
    pub fn add_edge(&mut self, road: Road) -> Result<(), EdgeRejection> {
        if !road.length.is_finite() || road.length < 0.0 {
            return Err(EdgeRejection::InvalidLength(road.length));
        }
        if !self.0.contains_key(&road.to) {
            return Err(EdgeRejection::MissingEndpoint(road.to));
        }
        let Some(from) = self.0.get_mut(&road.from) else {
            return Err(EdgeRejection::MissingEndpoint(road.from));
        };
        if from.has_road_to(road.to) {
            return Err(EdgeRejection::DuplicateEdge(road.from, road.to));
        }

        from.add_road(road);
        Ok(())
    }

    /// Gets all outgoing [Roads](Road) of the intersection at the
    /// provided point.
    pub fn roads_from(&self, from: GeoPoint) -> &[Road] {
        self.0
            .get(&from)
            .map(|i| i.roads.as_slice())
            .unwrap_or_default()
    }

    /// Gets the length of the [Road] from one point to another.
    /// If such a road doesn't exist, returns [f64::INFINITY].
    pub fn edge_length(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        self.0
            .get(&from)
            .and_then(|i| i.road_to(to))
            .map(|road| road.length)
            .unwrap_or(f64::INFINITY)
    }

    /// Finds the vertex closest to the given position.
    ///
    /// This function requires computing the distance to every vertex in
    /// the graph, and is not suitable for large graphs.
    pub fn find_nearest_vertex(&self, lat: f64, lon: f64) -> Option<GeoPoint> {
        self.0
            .keys()
            .map(|&p| (earth_distance(lat, lon, p.lat, p.lon), p))
            .min_by(|(a_dist, _), (b_dist, _)| a_dist.partial_cmp(b_dist).unwrap())
            .map(|(_, p)| p)
    }
}
