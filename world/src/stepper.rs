//! Continuous-time agent stepper.
//!
//! An agent is advanced one *event* at a time: a call to [`advance`] either
//! commits a zero-time departure from a vertex, carries the agent to the next
//! vertex it reaches (stopping the clock at the arrival time), or spends the
//! remaining budget up to the target time. Callers that want to reach the
//! target must keep calling with the same target, which is what
//! [`advance_until`] does. Every vertex arrival therefore becomes a decision
//! point where a new direction can select a different edge.

use edge_runner_core::{EdgeId, Phi, Position, VertexId};
use glam::DVec2;

use crate::graph::Graph;

/// Alignment scores closer than this are treated as ties.
pub const TIE_EPSILON: f64 = 1e-8;

/// Graph position plus the simulated time its motion is resolved to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    position: Position,
    clock_ms: f64,
}

impl Agent {
    /// Creates an agent resting on `anchor` at the provided simulated time.
    #[must_use]
    pub const fn at_vertex(anchor: VertexId, clock_ms: f64) -> Self {
        Self {
            position: Position::AtVertex { anchor },
            clock_ms,
        }
    }

    /// Creates an agent with an explicit position.
    #[must_use]
    pub const fn new(position: Position, clock_ms: f64) -> Self {
        Self { position, clock_ms }
    }

    /// Current graph position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Simulated time, in milliseconds, up to which motion is resolved.
    #[must_use]
    pub const fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Cartesian coordinates of the agent.
    #[must_use]
    pub fn point(&self, graph: &Graph) -> DVec2 {
        graph.point(self.position)
    }
}

/// Outcome of a single [`advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Position unchanged.
    Idle,
    /// Agent moved along its edge without reaching a vertex.
    Moved,
    /// Agent committed to an edge while standing on a vertex.
    Departed {
        /// Vertex that was left.
        from: VertexId,
        /// Edge now travelled.
        edge: EdgeId,
    },
    /// Agent came to rest on a vertex.
    Arrived {
        /// Vertex now occupied.
        vertex: VertexId,
    },
}

/// Picks the edge leaving `anchor` that best matches `direction`.
///
/// Each incident edge is scored by `direction · (far - anchor) / length`,
/// so the magnitude of `direction` matters. Edges are scanned in identifier
/// order against a floor that starts at zero: a score more than
/// [`TIE_EPSILON`] above the floor becomes the new best edge, while a score
/// within [`TIE_EPSILON`] of the floor raises the floor to that score and
/// clears the current best. A tie that is never beaten therefore selects
/// nothing, and a zero `direction` never selects anything.
#[must_use]
pub fn select_edge(graph: &Graph, anchor: VertexId, direction: DVec2) -> Option<EdgeId> {
    let mut best_weight = 0.0;
    let mut best_edge = None;

    for &edge in graph.incident_edges(anchor) {
        let weight = direction.dot(graph.direction_from(edge, anchor)) / graph.edge_length(edge);
        if weight > best_weight + TIE_EPSILON {
            best_weight = weight;
            best_edge = Some(edge);
        } else if (weight - best_weight).abs() <= TIE_EPSILON {
            best_weight = weight;
            best_edge = None;
        }
    }

    best_edge
}

/// Advances the agent by at most one event toward `target_ms`.
///
/// Targets earlier than the agent's clock leave it untouched. On a vertex the
/// agent either departs along [`select_edge`]'s choice without consuming time
/// or, lacking a preferred edge, waits until `target_ms`. On an edge the agent
/// moves toward whichever end `direction` favours; reaching that end stops the
/// clock at the arrival time and turns the position back into
/// [`Position::AtVertex`].
#[must_use]
pub fn advance(
    graph: &Graph,
    agent: Agent,
    target_ms: f64,
    direction: DVec2,
    speed: f64,
) -> (Agent, Step) {
    if target_ms < agent.clock_ms {
        return (agent, Step::Idle);
    }

    match agent.position {
        Position::AtVertex { anchor } => match select_edge(graph, anchor, direction) {
            Some(edge) => (
                Agent::new(
                    Position::OnEdge {
                        anchor,
                        edge,
                        phi: Phi::ZERO,
                    },
                    agent.clock_ms,
                ),
                Step::Departed { from: anchor, edge },
            ),
            None => (Agent::at_vertex(anchor, target_ms), Step::Idle),
        },
        Position::OnEdge { anchor, edge, phi } => {
            let length = graph.edge_length(edge);
            let alignment = direction.dot(graph.direction_from(edge, anchor));
            let budget_ms = target_ms - agent.clock_ms;
            let current = phi.get();

            let (next, clock_ms) = if alignment > 0.0 && current < 1.0 {
                let arrival_ms = length * (1.0 - current) / speed;
                if agent.clock_ms + arrival_ms <= target_ms {
                    (1.0, agent.clock_ms + arrival_ms)
                } else {
                    (current + budget_ms * speed / length, target_ms)
                }
            } else if alignment < 0.0 && current > 0.0 {
                let arrival_ms = length * current / speed;
                if agent.clock_ms + arrival_ms <= target_ms {
                    (0.0, agent.clock_ms + arrival_ms)
                } else {
                    (current - budget_ms * speed / length, target_ms)
                }
            } else {
                (current, target_ms)
            };

            settle(graph, anchor, edge, phi, Phi::new(next), clock_ms)
        }
    }
}

/// Repeats [`advance`] with the same target until the agent's clock reaches it.
#[must_use]
pub fn advance_until(
    graph: &Graph,
    mut agent: Agent,
    target_ms: f64,
    direction: DVec2,
    speed: f64,
) -> Agent {
    while agent.clock_ms < target_ms {
        let (next, _) = advance(graph, agent, target_ms, direction, speed);
        agent = next;
    }
    agent
}

fn settle(
    graph: &Graph,
    anchor: VertexId,
    edge: EdgeId,
    before: Phi,
    after: Phi,
    clock_ms: f64,
) -> (Agent, Step) {
    if after.is_at_anchor() {
        let step = if before.is_at_anchor() {
            Step::Idle
        } else {
            Step::Arrived { vertex: anchor }
        };
        return (Agent::at_vertex(anchor, clock_ms), step);
    }

    if after.is_at_far_end() {
        if let Some(vertex) = graph.opposite(edge, anchor) {
            return (Agent::at_vertex(vertex, clock_ms), Step::Arrived { vertex });
        }
    }

    let step = if after == before {
        Step::Idle
    } else {
        Step::Moved
    };
    (
        Agent::new(
            Position::OnEdge {
                anchor,
                edge,
                phi: after,
            },
            clock_ms,
        ),
        step,
    )
}
