//! Interleaves the runner and the chaser within a single tick.

use edge_runner_core::{AgentRole, Event};
use glam::DVec2;

use crate::{
    graph::Graph,
    stepper::{self, Step},
    AgentState, Level,
};

/// Resolves both agents up to `target_ms`, painting behind the runner.
///
/// Each iteration first works out how far the runner could get on its own, lets
/// the chaser catch up to that point in time, and then commits the runner only
/// as far as the chaser actually reached. The runner is therefore never
/// resolved past an instant the chaser has not seen, and the chaser always
/// pursues a runner position that is already settled.
pub(crate) fn run_tick(
    level: &mut Level,
    target_ms: f64,
    steering: DVec2,
    out_events: &mut Vec<Event>,
) {
    let mut newly_covered = Vec::new();

    while level.runner.agent.clock_ms() < target_ms {
        let runner_point = level.runner.agent.point(&level.graph);
        let chaser_point = level.chaser.agent.point(&level.graph);
        let pursuit = runner_point - chaser_point;

        let (candidate, _) = stepper::advance(
            &level.graph,
            level.runner.agent,
            target_ms,
            steering,
            level.runner.speed,
        );

        let chaser_step = step_agent(&level.graph, &mut level.chaser, candidate.clock_ms(), pursuit);
        record(AgentRole::Chaser, chaser_step, out_events);

        let commit_ms = level.chaser.agent.clock_ms();
        let runner_step = step_agent(&level.graph, &mut level.runner, commit_ms, steering);
        record(AgentRole::Runner, runner_step, out_events);

        level.coverage.paint(
            &level.graph,
            level.runner.agent.position(),
            level.runner.radius,
            &mut newly_covered,
        );
        for edge in newly_covered.drain(..) {
            log::debug!("edge {edge} fully covered in {}", level.name);
            out_events.push(Event::EdgeCovered { edge });
        }
    }
}

fn step_agent(
    graph: &Graph,
    state: &mut AgentState,
    target_ms: f64,
    direction: DVec2,
) -> Step {
    let (agent, step) = stepper::advance(graph, state.agent, target_ms, direction, state.speed);
    state.agent = agent;
    step
}

fn record(role: AgentRole, step: Step, out_events: &mut Vec<Event>) {
    match step {
        Step::Idle | Step::Moved => {}
        Step::Departed { from, edge } => out_events.push(Event::AgentDeparted {
            agent: role,
            from,
            edge,
        }),
        Step::Arrived { vertex } => {
            log::trace!("{role} arrived at vertex {vertex}");
            out_events.push(Event::AgentArrived {
                agent: role,
                vertex,
            });
        }
    }
}
