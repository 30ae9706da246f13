//! Immutable level graph with the derived lookup tables used by the stepper.

use std::ops::Range;

use edge_runner_core::{EdgeId, LevelError, Phi, Position, VertexId};
use glam::DVec2;

/// Planar graph the agents travel along.
///
/// Edge lengths, endpoint sums and the per-vertex incidence lists are derived
/// once during [`Graph::build`] and never change afterwards. Every edge is
/// guaranteed to join two distinct, existing vertices and to have a positive
/// finite length, so consumers may divide by [`Graph::edge_length`] freely.
#[derive(Clone, Debug)]
pub struct Graph {
    vertices: Vec<DVec2>,
    edges: Vec<[VertexId; 2]>,
    edge_lengths: Vec<f64>,
    edge_sums: Vec<DVec2>,
    incident: Vec<Vec<EdgeId>>,
    edge_range: Range<u32>,
    total_length: f64,
}

impl Graph {
    /// Validates the raw level geometry and derives the lookup tables.
    pub fn build(vertices: Vec<DVec2>, edges: Vec<[VertexId; 2]>) -> Result<Self, LevelError> {
        let vertex_range = id_range(vertices.len()).ok_or(LevelError::TooManyVertices {
            count: vertices.len(),
        })?;
        let edge_range = id_range(edges.len()).ok_or(LevelError::TooManyEdges {
            count: edges.len(),
        })?;

        for (vertex, point) in vertex_range.map(VertexId::new).zip(&vertices) {
            if !point.is_finite() {
                return Err(LevelError::NonFiniteVertex { vertex });
            }
        }

        let mut edge_lengths = Vec::with_capacity(edges.len());
        let mut edge_sums = Vec::with_capacity(edges.len());
        let mut incident = vec![Vec::new(); vertices.len()];

        for (edge, &[first, second]) in edge_range.clone().map(EdgeId::new).zip(&edges) {
            for vertex in [first, second] {
                if vertex.index() >= vertices.len() {
                    return Err(LevelError::DanglingEdge {
                        edge,
                        vertex,
                        vertex_count: vertices.len(),
                    });
                }
            }
            if first == second {
                return Err(LevelError::SelfLoop {
                    edge,
                    vertex: first,
                });
            }

            let start = vertices[first.index()];
            let end = vertices[second.index()];
            let length = start.distance(end);
            if !(length.is_finite() && length > 0.0) {
                return Err(LevelError::DegenerateEdge { edge, length });
            }

            edge_lengths.push(length);
            edge_sums.push(start + end);
            incident[first.index()].push(edge);
            incident[second.index()].push(edge);
        }

        let total_length = edge_lengths.iter().sum();

        Ok(Self {
            vertices,
            edges,
            edge_lengths,
            edge_sums,
            incident,
            edge_range,
            total_length,
        })
    }

    /// Number of vertices in the graph.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Reports whether the vertex identifier refers to an existing vertex.
    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        vertex.index() < self.vertices.len()
    }

    /// Cartesian coordinates of the vertex.
    #[must_use]
    pub fn vertex(&self, vertex: VertexId) -> DVec2 {
        self.vertices[vertex.index()]
    }

    /// Both endpoints of the edge in definition order.
    #[must_use]
    pub fn endpoints(&self, edge: EdgeId) -> [VertexId; 2] {
        self.edges[edge.index()]
    }

    /// Euclidean length of the edge.
    #[must_use]
    pub fn edge_length(&self, edge: EdgeId) -> f64 {
        self.edge_lengths[edge.index()]
    }

    /// Coordinate-wise sum of both endpoint positions.
    #[must_use]
    pub fn edge_sum(&self, edge: EdgeId) -> DVec2 {
        self.edge_sums[edge.index()]
    }

    /// Edges touching the vertex in ascending identifier order.
    #[must_use]
    pub fn incident_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.incident[vertex.index()]
    }

    /// Iterator over every edge identifier.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        self.edge_range.clone().map(EdgeId::new)
    }

    /// Endpoint of `edge` that is not `vertex`, or `None` when `vertex` does
    /// not touch the edge.
    #[must_use]
    pub fn opposite(&self, edge: EdgeId, vertex: VertexId) -> Option<VertexId> {
        let [first, second] = self.endpoints(edge);
        if vertex == first {
            Some(second)
        } else if vertex == second {
            Some(first)
        } else {
            None
        }
    }

    /// Unnormalised vector along `edge` pointing away from `anchor`.
    ///
    /// Equal to the far endpoint minus the anchor, recovered from the stored
    /// endpoint sum without looking the far endpoint up.
    #[must_use]
    pub fn direction_from(&self, edge: EdgeId, anchor: VertexId) -> DVec2 {
        self.edge_sum(edge) - 2.0 * self.vertex(anchor)
    }

    /// Cartesian coordinates of a point `phi` of the way from `anchor` along `edge`.
    #[must_use]
    pub fn point_on_edge(&self, anchor: VertexId, edge: EdgeId, phi: Phi) -> DVec2 {
        let origin = self.vertex(anchor);
        origin + self.direction_from(edge, anchor) * phi.get()
    }

    /// Cartesian coordinates of an agent position.
    #[must_use]
    pub fn point(&self, position: Position) -> DVec2 {
        match position {
            Position::AtVertex { anchor } => self.vertex(anchor),
            Position::OnEdge { anchor, edge, phi } => self.point_on_edge(anchor, edge, phi),
        }
    }

    /// Sum of all edge lengths.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }
}

/// Identifiers `0..len`, or `None` when `len` does not fit a `u32`.
fn id_range(len: usize) -> Option<Range<u32>> {
    u32::try_from(len).ok().map(|end| 0..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(index: u32) -> VertexId {
        VertexId::new(index)
    }

    fn square() -> Graph {
        Graph::build(
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(1.0, 0.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(0.0, 1.0),
            ],
            vec![[v(0), v(1)], [v(1), v(2)], [v(2), v(3)], [v(3), v(0)]],
        )
        .expect("square is valid")
    }

    #[test]
    fn incident_edges_invert_the_edge_list() {
        let graph = Graph::build(
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(2.0, 0.0),
                DVec2::new(2.0, 2.0),
                DVec2::new(5.0, 5.0),
                DVec2::new(9.0, 9.0),
            ],
            vec![[v(0), v(1)], [v(1), v(2)], [v(2), v(0)], [v(2), v(3)]],
        )
        .expect("valid graph");

        for vertex in 0..graph.vertex_count() as u32 {
            let expected: Vec<EdgeId> = graph
                .edge_ids()
                .filter(|&edge| graph.endpoints(edge).contains(&v(vertex)))
                .collect();
            assert_eq!(graph.incident_edges(v(vertex)), expected.as_slice());
        }
        assert!(graph.incident_edges(v(4)).is_empty());
    }

    #[test]
    fn derived_tables_match_geometry() {
        let graph = square();

        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        for edge in graph.edge_ids() {
            assert!((graph.edge_length(edge) - 1.0).abs() < 1e-12);
        }
        assert_eq!(graph.edge_sum(EdgeId::new(1)), DVec2::new(2.0, 1.0));
        assert!((graph.total_length() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn direction_from_points_at_the_far_endpoint() {
        let graph = square();
        let edge = EdgeId::new(3);

        assert_eq!(graph.direction_from(edge, v(3)), DVec2::new(0.0, -1.0));
        assert_eq!(graph.direction_from(edge, v(0)), DVec2::new(0.0, 1.0));
        assert_eq!(graph.opposite(edge, v(0)), Some(v(3)));
        assert_eq!(graph.opposite(edge, v(3)), Some(v(0)));
        assert_eq!(graph.opposite(edge, v(1)), None);
    }

    #[test]
    fn point_interpolates_between_anchor_and_far_endpoint() {
        let graph = square();
        let position = Position::OnEdge {
            anchor: v(2),
            edge: EdgeId::new(1),
            phi: Phi::new(0.25),
        };

        let point = graph.point(position);

        assert!((point - DVec2::new(1.0, 0.75)).length() < 1e-12);
        assert_eq!(
            graph.point(Position::AtVertex { anchor: v(3) }),
            DVec2::new(0.0, 1.0)
        );
    }

    #[test]
    fn build_rejects_dangling_edges() {
        let error = Graph::build(vec![DVec2::ZERO, DVec2::X], vec![[v(0), v(2)]])
            .expect_err("vertex 2 does not exist");

        assert_eq!(
            error,
            LevelError::DanglingEdge {
                edge: EdgeId::new(0),
                vertex: v(2),
                vertex_count: 2,
            }
        );
    }

    #[test]
    fn build_rejects_self_loops() {
        let error = Graph::build(vec![DVec2::ZERO, DVec2::X], vec![[v(0), v(1)], [v(1), v(1)]])
            .expect_err("self loop must be rejected");

        assert_eq!(
            error,
            LevelError::SelfLoop {
                edge: EdgeId::new(1),
                vertex: v(1),
            }
        );
    }

    #[test]
    fn build_rejects_zero_length_edges() {
        let error = Graph::build(vec![DVec2::ONE, DVec2::ONE], vec![[v(0), v(1)]])
            .expect_err("coincident endpoints must be rejected");

        assert!(matches!(error, LevelError::DegenerateEdge { edge, .. } if edge == EdgeId::new(0)));
    }

    #[test]
    fn build_rejects_non_finite_vertices() {
        let error = Graph::build(vec![DVec2::ZERO, DVec2::new(f64::NAN, 0.0)], Vec::new())
            .expect_err("NaN coordinates must be rejected");

        assert_eq!(error, LevelError::NonFiniteVertex { vertex: v(1) });
    }

    #[test]
    fn identifier_ranges_cover_every_index() {
        assert_eq!(id_range(0), Some(0..0));
        assert_eq!(id_range(4), Some(0..4));
        assert_eq!(id_range(u32::MAX as usize), Some(0..u32::MAX));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn identifier_ranges_refuse_counts_beyond_u32() {
        assert_eq!(id_range(u32::MAX as usize + 1), None);
        assert_eq!(id_range(usize::MAX), None);
    }
}
