//! Per-edge paint accumulation.

use edge_runner_core::{EdgeId, Position, VertexId};

use crate::graph::Graph;

/// Two-sided paint coverage for every edge of a [`Graph`].
///
/// Each edge stores how far paint has crept in from its first and second
/// endpoint, as fractions of the edge length. Values only ever grow. Once the
/// two sides meet (`first + second >= 1`) the edge is saturated and both sides
/// are pinned to `1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Coverage {
    sides: Vec<[f64; 2]>,
}

impl Coverage {
    /// Creates an unpainted accumulator sized for the graph.
    #[must_use]
    pub fn new(graph: &Graph) -> Self {
        Self {
            sides: vec![[0.0, 0.0]; graph.edge_count()],
        }
    }

    /// Coverage crept in from the first and second endpoint of the edge.
    #[must_use]
    pub fn sides(&self, edge: EdgeId) -> [f64; 2] {
        self.sides[edge.index()]
    }

    /// Reports whether the two sides of the edge have met.
    #[must_use]
    pub fn is_saturated(&self, edge: EdgeId) -> bool {
        let [first, second] = self.sides(edge);
        first + second >= 1.0
    }

    /// Paints around an agent position, appending edges that became saturated.
    pub fn paint(
        &mut self,
        graph: &Graph,
        position: Position,
        radius: f64,
        newly_covered: &mut Vec<EdgeId>,
    ) {
        match position {
            Position::AtVertex { anchor } => {
                self.paint_vertex(graph, anchor, radius, newly_covered);
            }
            Position::OnEdge { anchor, edge, phi } => {
                if self.paint_edge(graph, anchor, edge, phi.get(), radius) {
                    newly_covered.push(edge);
                }
            }
        }
    }

    /// Paints a zero-distance mark on every edge touching the vertex.
    pub fn paint_vertex(
        &mut self,
        graph: &Graph,
        anchor: VertexId,
        radius: f64,
        newly_covered: &mut Vec<EdgeId>,
    ) {
        for &edge in graph.incident_edges(anchor) {
            if self.paint_edge(graph, anchor, edge, 0.0, radius) {
                newly_covered.push(edge);
            }
        }
    }

    /// Extends the anchor side of `edge` to `phi + radius / length`.
    ///
    /// Returns `true` when this call saturated the edge. Anchors that are not
    /// endpoints of the edge leave the accumulator untouched.
    pub fn paint_edge(
        &mut self,
        graph: &Graph,
        anchor: VertexId,
        edge: EdgeId,
        phi: f64,
        radius: f64,
    ) -> bool {
        let [first, second] = graph.endpoints(edge);
        let side = if anchor == first {
            0
        } else if anchor == second {
            1
        } else {
            return false;
        };

        let was_saturated = self.is_saturated(edge);
        let reach = (phi + radius / graph.edge_length(edge)).clamp(0.0, 1.0);
        let sides = &mut self.sides[edge.index()];
        sides[side] = sides[side].max(reach);
        if sides[0] + sides[1] >= 1.0 {
            *sides = [1.0, 1.0];
        }

        !was_saturated && self.is_saturated(edge)
    }

    /// Length of the graph covered by paint.
    #[must_use]
    pub fn covered_length(&self, graph: &Graph) -> f64 {
        graph
            .edge_ids()
            .map(|edge| {
                let [first, second] = self.sides(edge);
                (first + second).clamp(0.0, 1.0) * graph.edge_length(edge)
            })
            .sum()
    }
}
