#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Edge Runner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Edge Runner.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the whole simulation context with a freshly built level.
    LoadLevel {
        /// Static description of the level to build.
        level: LevelDefinition,
    },
    /// Advances the reference clock by the provided delta time.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Replaces the steering vector applied to the runner on subsequent ticks.
    SteerRunner {
        /// Desired travel direction. Only its orientation relative to the
        /// edges matters; a zero vector means "no preferred direction".
        direction: DVec2,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a level was built and is now being simulated.
    LevelLoaded {
        /// Name of the level that became active.
        name: String,
    },
    /// Reports that a level definition failed validation. The previous level
    /// keeps running.
    LevelRejected {
        /// Name of the rejected level.
        name: String,
        /// Specific validation failure.
        reason: LevelError,
    },
    /// Indicates that the reference clock advanced.
    TimeAdvanced {
        /// Duration of real time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that an agent committed to an edge while standing on a vertex.
    AgentDeparted {
        /// Agent that left the vertex.
        agent: AgentRole,
        /// Vertex the agent departed from.
        from: VertexId,
        /// Edge the agent is now travelling along.
        edge: EdgeId,
    },
    /// Reports that an agent came to rest exactly on a vertex.
    AgentArrived {
        /// Agent that reached the vertex.
        agent: AgentRole,
        /// Vertex the agent now occupies.
        vertex: VertexId,
    },
    /// Reports that an edge became fully covered by paint.
    EdgeCovered {
        /// Edge whose coverage saturated.
        edge: EdgeId,
    },
}

/// Distinguishes the two agents that inhabit every level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentRole {
    /// Player-steered agent that paints the edges it travels near.
    Runner,
    /// Computer-steered agent that pursues the runner.
    Chaser,
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runner => f.write_str("runner"),
            Self::Chaser => f.write_str("chaser"),
        }
    }
}

/// Index of a vertex within a level graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(u32);

impl VertexId {
    /// Creates a new vertex identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier widened for slice indexing.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of an edge within a level graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(u32);

impl EdgeId {
    /// Creates a new edge identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier widened for slice indexing.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fractional distance travelled along an edge, measured from its anchor.
///
/// Values are clamped into `0.0..=1.0` on construction; `NaN` collapses to
/// the anchor.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Phi(f64);

impl Phi {
    /// Position exactly on the anchor vertex.
    pub const ZERO: Self = Self(0.0);

    /// Position exactly on the far vertex.
    pub const ONE: Self = Self(1.0);

    /// Creates a new fraction, clamping it into the unit interval.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Retrieves the clamped fraction.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }

    /// Reports whether the fraction sits on the anchor vertex.
    #[must_use]
    pub fn is_at_anchor(&self) -> bool {
        self.0 <= 0.0
    }

    /// Reports whether the fraction sits on the far vertex.
    #[must_use]
    pub fn is_at_far_end(&self) -> bool {
        self.0 >= 1.0
    }
}

/// Location of an agent on the level graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// Agent stands on a vertex with no edge selected.
    AtVertex {
        /// Vertex currently occupied.
        anchor: VertexId,
    },
    /// Agent travels along an edge.
    OnEdge {
        /// Endpoint of `edge` that `phi` is measured from.
        anchor: VertexId,
        /// Edge currently travelled.
        edge: EdgeId,
        /// Fraction of the edge covered, measured from `anchor`.
        phi: Phi,
    },
}

impl Position {
    /// Vertex the position is anchored to.
    #[must_use]
    pub const fn anchor(&self) -> VertexId {
        match self {
            Self::AtVertex { anchor } | Self::OnEdge { anchor, .. } => *anchor,
        }
    }

    /// Edge being travelled, if any.
    #[must_use]
    pub const fn edge(&self) -> Option<EdgeId> {
        match self {
            Self::AtVertex { .. } => None,
            Self::OnEdge { edge, .. } => Some(*edge),
        }
    }

    /// Fraction travelled from the anchor; zero while standing on a vertex.
    #[must_use]
    pub const fn phi(&self) -> Phi {
        match self {
            Self::AtVertex { .. } => Phi::ZERO,
            Self::OnEdge { phi, .. } => *phi,
        }
    }
}

/// Immutable representation of a single agent used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Which of the two agents the snapshot describes.
    pub role: AgentRole,
    /// Graph position of the agent.
    pub position: Position,
    /// Cartesian coordinates derived from the graph position.
    pub point: DVec2,
    /// Simulated time, in milliseconds, up to which the agent's motion is resolved.
    pub clock_ms: f64,
    /// Travel speed in distance units per millisecond.
    pub speed: f64,
    /// Radius used for painting (runner) and collision checks (both agents).
    pub radius: f64,
}

/// Immutable representation of a single edge used by presentation layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSnapshot {
    /// Identifier of the edge.
    pub id: EdgeId,
    /// Cartesian coordinates of the first and second endpoint.
    pub endpoints: [DVec2; 2],
    /// Coverage crept in from the first and second endpoint respectively.
    pub coverage: [f64; 2],
    /// Euclidean length of the edge.
    pub length: f64,
}

/// Aggregate paint progress across the whole graph.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoverageSummary {
    /// Sum over edges of the covered fraction times the edge length.
    pub covered_length: f64,
    /// Sum of all edge lengths.
    pub total_length: f64,
}

impl CoverageSummary {
    /// Fraction of the graph covered; an empty graph counts as fully covered.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total_length <= 0.0 {
            return 1.0;
        }
        (self.covered_length / self.total_length).clamp(0.0, 1.0)
    }
}

/// Static description of a playable level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Human readable level name.
    pub name: String,
    /// Vertex coordinates in world units.
    pub vertices: Vec<[f64; 2]>,
    /// Undirected edges expressed as vertex index pairs.
    pub edges: Vec<[VertexId; 2]>,
    /// Camera placement used by presentation layers.
    #[serde(default)]
    pub view: ViewDefinition,
    /// Starting parameters of the painting agent.
    pub runner: AgentDefinition,
    /// Starting parameters of the pursuing agent.
    pub chaser: AgentDefinition,
}

impl LevelDefinition {
    /// Starting parameters for the requested agent.
    #[must_use]
    pub const fn agent(&self, role: AgentRole) -> &AgentDefinition {
        match role {
            AgentRole::Runner => &self.runner,
            AgentRole::Chaser => &self.chaser,
        }
    }
}

/// Starting parameters of a single agent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Vertex the agent occupies when the level starts.
    pub vertex: VertexId,
    /// Travel speed in distance units per millisecond.
    pub speed: f64,
    /// Paint reach and collision radius in distance units.
    pub radius: f64,
}

/// Camera placement: world points are translated, then uniformly scaled into
/// clip space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// Offset added to world coordinates before scaling.
    pub translation: [f64; 2],
    /// Uniform scale applied after translation.
    pub scale: f64,
}

impl Default for ViewDefinition {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0],
            scale: 1.0,
        }
    }
}

/// Reasons a level definition may be rejected before simulation starts.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LevelError {
    /// An edge references a vertex index outside the vertex list.
    #[error("edge {edge} references vertex {vertex} but the level has {vertex_count} vertices")]
    DanglingEdge {
        /// Offending edge.
        edge: EdgeId,
        /// Out-of-range vertex reference.
        vertex: VertexId,
        /// Number of vertices defined by the level.
        vertex_count: usize,
    },
    /// An edge connects a vertex to itself.
    #[error("edge {edge} loops back onto vertex {vertex}")]
    SelfLoop {
        /// Offending edge.
        edge: EdgeId,
        /// Vertex referenced twice.
        vertex: VertexId,
    },
    /// An edge has zero (or non-finite) length.
    #[error("edge {edge} has no usable length ({length})")]
    DegenerateEdge {
        /// Offending edge.
        edge: EdgeId,
        /// Computed length.
        length: f64,
    },
    /// The level defines more vertices than identifiers can address.
    #[error("level defines {count} vertices, more than vertex identifiers can address")]
    TooManyVertices {
        /// Number of vertices defined by the level.
        count: usize,
    },
    /// The level defines more edges than identifiers can address.
    #[error("level defines {count} edges, more than edge identifiers can address")]
    TooManyEdges {
        /// Number of edges defined by the level.
        count: usize,
    },
    /// A vertex coordinate is not finite.
    #[error("vertex {vertex} has a non-finite coordinate")]
    NonFiniteVertex {
        /// Offending vertex.
        vertex: VertexId,
    },
    /// An agent starts on a vertex that does not exist.
    #[error("{role} starts on vertex {vertex} but the level has {vertex_count} vertices")]
    UnknownStartVertex {
        /// Agent with the invalid start.
        role: AgentRole,
        /// Requested start vertex.
        vertex: VertexId,
        /// Number of vertices defined by the level.
        vertex_count: usize,
    },
    /// An agent speed is zero, negative or not finite.
    #[error("{role} speed must be positive and finite (received {speed})")]
    InvalidSpeed {
        /// Agent with the invalid speed.
        role: AgentRole,
        /// Rejected speed.
        speed: f64,
    },
    /// An agent radius is negative or not finite.
    #[error("{role} radius must be non-negative and finite (received {radius})")]
    InvalidRadius {
        /// Agent with the invalid radius.
        role: AgentRole,
        /// Rejected radius.
        radius: f64,
    },
}
