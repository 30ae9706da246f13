#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Edge Runner.

pub mod coverage;
pub mod graph;
mod scheduler;
pub mod stepper;

use edge_runner_core::{
    AgentRole, Command, Event, LevelDefinition, LevelError, ViewDefinition, WELCOME_BANNER,
};
use glam::DVec2;

use crate::{coverage::Coverage, graph::Graph, stepper::Agent};

/// Represents the authoritative Edge Runner world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    level: Level,
    reference_ms: f64,
    steering: DVec2,
}

impl World {
    /// Creates a world simulating the provided level.
    pub fn new(definition: &LevelDefinition) -> Result<Self, LevelError> {
        let level = Level::build(definition)?;
        Ok(Self {
            banner: WELCOME_BANNER,
            level,
            reference_ms: 0.0,
            steering: DVec2::ZERO,
        })
    }

    fn agent_state(&self, role: AgentRole) -> &AgentState {
        match role {
            AgentRole::Runner => &self.level.runner,
            AgentRole::Chaser => &self.level.chaser,
        }
    }
}

/// Everything that is rebuilt when a level starts.
#[derive(Debug)]
struct Level {
    name: String,
    view: ViewDefinition,
    graph: Graph,
    coverage: Coverage,
    runner: AgentState,
    chaser: AgentState,
}

impl Level {
    fn build(definition: &LevelDefinition) -> Result<Self, LevelError> {
        let vertices = definition
            .vertices
            .iter()
            .map(|&[x, y]| DVec2::new(x, y))
            .collect();
        let graph = Graph::build(vertices, definition.edges.clone())?;
        let runner = AgentState::spawn(&graph, definition, AgentRole::Runner)?;
        let chaser = AgentState::spawn(&graph, definition, AgentRole::Chaser)?;
        let coverage = Coverage::new(&graph);

        Ok(Self {
            name: definition.name.clone(),
            view: definition.view,
            graph,
            coverage,
            runner,
            chaser,
        })
    }
}

#[derive(Clone, Copy, Debug)]
struct AgentState {
    agent: Agent,
    speed: f64,
    radius: f64,
}

impl AgentState {
    fn spawn(
        graph: &Graph,
        level: &LevelDefinition,
        role: AgentRole,
    ) -> Result<Self, LevelError> {
        let definition = level.agent(role);
        if !graph.contains_vertex(definition.vertex) {
            return Err(LevelError::UnknownStartVertex {
                role,
                vertex: definition.vertex,
                vertex_count: graph.vertex_count(),
            });
        }
        if !(definition.speed.is_finite() && definition.speed > 0.0) {
            return Err(LevelError::InvalidSpeed {
                role,
                speed: definition.speed,
            });
        }
        if !(definition.radius.is_finite() && definition.radius >= 0.0) {
            return Err(LevelError::InvalidRadius {
                role,
                radius: definition.radius,
            });
        }

        Ok(Self {
            agent: Agent::at_vertex(definition.vertex, 0.0),
            speed: definition.speed,
            radius: definition.radius,
        })
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { level } => match Level::build(&level) {
            Ok(built) => {
                log::info!(
                    "loaded level {} ({} vertices, {} edges)",
                    built.name,
                    built.graph.vertex_count(),
                    built.graph.edge_count()
                );
                world.level = built;
                world.reference_ms = 0.0;
                out_events.push(Event::LevelLoaded { name: level.name });
            }
            Err(reason) => {
                log::warn!("rejected level {}: {reason}", level.name);
                out_events.push(Event::LevelRejected {
                    name: level.name,
                    reason,
                });
            }
        },
        Command::Tick { dt } => {
            world.reference_ms += dt.as_secs_f64() * 1_000.0;
            out_events.push(Event::TimeAdvanced { dt });
            scheduler::run_tick(
                &mut world.level,
                world.reference_ms,
                world.steering,
                out_events,
            );
        }
        Command::SteerRunner { direction } => {
            world.steering = if direction.is_finite() {
                direction
            } else {
                DVec2::ZERO
            };
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use edge_runner_core::{
        AgentRole, AgentSnapshot, CoverageSummary, EdgeSnapshot, ViewDefinition,
    };
    use glam::DVec2;

    use super::World;
    use crate::{coverage::Coverage, graph::Graph};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Name of the level currently being simulated.
    #[must_use]
    pub fn level_name(world: &World) -> &str {
        &world.level.name
    }

    /// Camera placement requested by the current level.
    #[must_use]
    pub fn view(world: &World) -> ViewDefinition {
        world.level.view
    }

    /// Provides read-only access to the level graph.
    #[must_use]
    pub fn graph(world: &World) -> &Graph {
        &world.level.graph
    }

    /// Provides read-only access to the paint accumulated so far.
    #[must_use]
    pub fn coverage(world: &World) -> &Coverage {
        &world.level.coverage
    }

    /// Captures the state of a single agent.
    #[must_use]
    pub fn agent(world: &World, role: AgentRole) -> AgentSnapshot {
        let state = world.agent_state(role);
        AgentSnapshot {
            role,
            position: state.agent.position(),
            point: state.agent.point(&world.level.graph),
            clock_ms: state.agent.clock_ms(),
            speed: state.speed,
            radius: state.radius,
        }
    }

    /// Captures every edge together with its coverage, in identifier order.
    #[must_use]
    pub fn edges(world: &World) -> Vec<EdgeSnapshot> {
        let graph = &world.level.graph;
        graph
            .edge_ids()
            .map(|id| {
                let [first, second] = graph.endpoints(id);
                EdgeSnapshot {
                    id,
                    endpoints: [graph.vertex(first), graph.vertex(second)],
                    coverage: world.level.coverage.sides(id),
                    length: graph.edge_length(id),
                }
            })
            .collect()
    }

    /// Reports how much of the graph has been painted.
    #[must_use]
    pub fn coverage_summary(world: &World) -> CoverageSummary {
        let graph = &world.level.graph;
        CoverageSummary {
            covered_length: world.level.coverage.covered_length(graph),
            total_length: graph.total_length(),
        }
    }

    /// Simulated time, in milliseconds, since the level started.
    #[must_use]
    pub fn reference_time_ms(world: &World) -> f64 {
        world.reference_ms
    }

    /// Steering vector applied to the runner on the next tick.
    #[must_use]
    pub fn steering(world: &World) -> DVec2 {
        world.steering
    }
}
