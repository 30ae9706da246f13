#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal-condition checks that decide when a level is won or lost.

use edge_runner_core::{AgentSnapshot, CoverageSummary, Event};

/// Relative slack granted when comparing covered length with total length.
const COVERAGE_TOLERANCE: f64 = 1e-9;

/// Outcome of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Every edge has been painted.
    Covered,
    /// The chaser touched the runner.
    Caught,
}

/// Pure system that watches world snapshots for terminal conditions.
///
/// A verdict is reported once per level; the referee stays silent until the
/// next [`Event::LevelLoaded`] arrives.
#[derive(Clone, Debug, Default)]
pub struct Referee {
    decided: Option<Verdict>,
}

impl Referee {
    /// Creates a referee for a freshly started level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and snapshots, returning a newly reached verdict.
    pub fn handle(
        &mut self,
        events: &[Event],
        runner: &AgentSnapshot,
        chaser: &AgentSnapshot,
        summary: CoverageSummary,
    ) -> Option<Verdict> {
        if events
            .iter()
            .any(|event| matches!(event, Event::LevelLoaded { .. }))
        {
            self.decided = None;
        }

        if self.decided.is_some() {
            return None;
        }

        let verdict = if is_caught(runner, chaser) {
            Verdict::Caught
        } else if is_fully_covered(summary) {
            Verdict::Covered
        } else {
            return None;
        };

        self.decided = Some(verdict);
        Some(verdict)
    }
}

/// Reports whether the two agents overlap.
#[must_use]
pub fn is_caught(runner: &AgentSnapshot, chaser: &AgentSnapshot) -> bool {
    runner.point.distance(chaser.point) <= runner.radius + chaser.radius
}

/// Reports whether paint covers the whole graph.
#[must_use]
pub fn is_fully_covered(summary: CoverageSummary) -> bool {
    summary.covered_length >= summary.total_length * (1.0 - COVERAGE_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_runner_core::{AgentRole, Position, VertexId};
    use glam::DVec2;

    fn snapshot(role: AgentRole, point: DVec2, radius: f64) -> AgentSnapshot {
        AgentSnapshot {
            role,
            position: Position::AtVertex {
                anchor: VertexId::new(0),
            },
            point,
            clock_ms: 0.0,
            speed: 0.01,
            radius,
        }
    }

    fn summary(covered_length: f64, total_length: f64) -> CoverageSummary {
        CoverageSummary {
            covered_length,
            total_length,
        }
    }

    #[test]
    fn touching_radii_count_as_caught() {
        let runner = snapshot(AgentRole::Runner, DVec2::ZERO, 0.5);
        let touching = snapshot(AgentRole::Chaser, DVec2::new(0.75, 0.0), 0.25);
        let apart = snapshot(AgentRole::Chaser, DVec2::new(0.0, 0.76), 0.25);

        assert!(is_caught(&runner, &touching));
        assert!(!is_caught(&runner, &apart));
    }

    #[test]
    fn full_coverage_tolerates_rounding() {
        assert!(is_fully_covered(summary(10.0, 10.0)));
        assert!(is_fully_covered(summary(10.0 - 1e-12, 10.0)));
        assert!(!is_fully_covered(summary(9.99, 10.0)));
    }

    #[test]
    fn caught_takes_priority_over_covered() {
        let mut referee = Referee::new();
        let runner = snapshot(AgentRole::Runner, DVec2::ZERO, 0.4);
        let chaser = snapshot(AgentRole::Chaser, DVec2::ZERO, 0.3);

        let verdict = referee.handle(&[], &runner, &chaser, summary(4.0, 4.0));

        assert_eq!(verdict, Some(Verdict::Caught));
    }

    #[test]
    fn verdict_is_reported_once_per_level() {
        let mut referee = Referee::new();
        let runner = snapshot(AgentRole::Runner, DVec2::ZERO, 0.4);
        let chaser = snapshot(AgentRole::Chaser, DVec2::new(5.0, 0.0), 0.3);

        assert_eq!(
            referee.handle(&[], &runner, &chaser, summary(4.0, 4.0)),
            Some(Verdict::Covered)
        );
        assert_eq!(referee.handle(&[], &runner, &chaser, summary(4.0, 4.0)), None);

        let loaded = [Event::LevelLoaded {
            name: "next".to_owned(),
        }];
        assert_eq!(
            referee.handle(&loaded, &runner, &chaser, summary(0.0, 4.0)),
            None
        );
        assert_eq!(
            referee.handle(&[], &runner, &chaser, summary(4.0, 4.0)),
            Some(Verdict::Covered)
        );
    }
}
