//! Frame-by-frame orchestration of the world and its systems.

use std::{mem, time::Duration};

use edge_runner_core::{AgentRole, Command, Event, LevelError};
use edge_runner_rendering::{FrameInput, RenderingError, Scene};
use edge_runner_system_campaign::Campaign;
use edge_runner_system_input::{MoveKey, SteeringInput};
use edge_runner_system_referee::{Referee, Verdict};
use edge_runner_world::{self as world, query, World};

const CAMPAIGN_COMPLETE: &str = "All levels cleared. Press Esc to leave.";
const WELCOME_DURATION_MS: f64 = 3_000.0;

/// Longest stretch of simulated time resolved before the referee looks again.
const MAX_SUB_TICK: Duration = Duration::from_millis(16);

/// Owns the world together with the systems that drive it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    referee: Referee,
    campaign: Campaign,
    input: SteeringInput,
    carried_events: Vec<Event>,
    greeting: bool,
}

impl Session {
    /// Starts the campaign on its current level.
    pub(crate) fn new(campaign: Campaign) -> Result<Self, LevelError> {
        let world = World::new(campaign.current_level())?;
        log::info!(
            "starting at {} (level {} of {})",
            query::level_name(&world),
            campaign.current_index() + 1,
            campaign.level_count()
        );
        Ok(Self {
            world,
            referee: Referee::new(),
            campaign,
            input: SteeringInput::new(),
            carried_events: Vec::new(),
            greeting: true,
        })
    }

    /// Advances the simulation by one frame.
    ///
    /// The world catches up with the steering chosen on the previous frame
    /// before the keys held during this frame take effect. Long frames are
    /// resolved in slices of at most [`MAX_SUB_TICK`], with the referee
    /// consulted after each one.
    pub(crate) fn step(&mut self, dt: Duration, frame: FrameInput) -> Option<Verdict> {
        if self.campaign.is_finished() {
            return None;
        }

        let verdict = self.catch_up(dt);

        for (key, held) in [
            (MoveKey::Up, frame.up),
            (MoveKey::Down, frame.down),
            (MoveKey::Left, frame.left),
            (MoveKey::Right, frame.right),
        ] {
            self.input.set_held(key, held);
        }
        let mut commands = Vec::new();
        self.input.handle(&mut commands);

        if let Some(verdict) = verdict {
            self.greeting = false;
            self.campaign.handle(verdict, &mut commands);
        }

        for command in commands {
            world::apply(&mut self.world, command, &mut self.carried_events);
        }
        verdict
    }

    /// Ticks the world through `dt`, stopping early once a verdict is reached.
    fn catch_up(&mut self, dt: Duration) -> Option<Verdict> {
        let mut events = mem::take(&mut self.carried_events);
        let mut remaining = dt;

        loop {
            let slice = remaining.min(MAX_SUB_TICK);
            remaining -= slice;
            world::apply(&mut self.world, Command::Tick { dt: slice }, &mut events);

            let verdict = self.referee.handle(
                &events,
                &query::agent(&self.world, AgentRole::Runner),
                &query::agent(&self.world, AgentRole::Chaser),
                query::coverage_summary(&self.world),
            );
            events.clear();

            if verdict.is_some() || remaining.is_zero() {
                return verdict;
            }
        }
    }

    /// Describes the current frame for a rendering backend.
    pub(crate) fn scene(&self) -> Result<Scene, RenderingError> {
        let world = &self.world;
        let mut scene = Scene::from_snapshots(
            query::level_name(world),
            query::view(world),
            &query::edges(world),
            &query::agent(world, AgentRole::Runner),
            &query::agent(world, AgentRole::Chaser),
            query::coverage_summary(world),
        )?;

        scene.banner = if self.campaign.is_finished() {
            Some(CAMPAIGN_COMPLETE.to_owned())
        } else if self.greeting && query::reference_time_ms(world) < WELCOME_DURATION_MS {
            Some(query::welcome_banner(world).to_owned())
        } else {
            None
        };
        Ok(scene)
    }

    /// Read-only access to the simulated world.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Reports whether every level has been cleared.
    pub(crate) fn is_finished(&self) -> bool {
        self.campaign.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_runner_core::{AgentDefinition, LevelDefinition, VertexId, ViewDefinition};
    use edge_runner_system_campaign::builtin_levels;

    const FRAME: Duration = Duration::from_millis(16);

    fn strip(name: &str, runner_radius: f64, chaser_vertex: u32) -> LevelDefinition {
        LevelDefinition {
            name: name.to_owned(),
            vertices: vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [40.0, 40.0]],
            edges: vec![
                [VertexId::new(0), VertexId::new(1)],
                [VertexId::new(1), VertexId::new(2)],
            ],
            view: ViewDefinition::default(),
            runner: AgentDefinition {
                vertex: VertexId::new(1),
                speed: 0.01,
                radius: runner_radius,
            },
            chaser: AgentDefinition {
                vertex: VertexId::new(chaser_vertex),
                speed: 0.01,
                radius: 0.3,
            },
        }
    }

    fn corridor() -> LevelDefinition {
        LevelDefinition {
            name: "corridor".to_owned(),
            vertices: vec![[0.0, 0.0], [20.0, 0.0]],
            edges: vec![[VertexId::new(0), VertexId::new(1)]],
            view: ViewDefinition::default(),
            runner: AgentDefinition {
                vertex: VertexId::new(0),
                speed: 0.01,
                radius: 0.4,
            },
            chaser: AgentDefinition {
                vertex: VertexId::new(1),
                speed: 0.01,
                radius: 0.3,
            },
        }
    }

    fn right() -> FrameInput {
        FrameInput {
            right: true,
            ..FrameInput::default()
        }
    }

    #[test]
    fn held_keys_steer_the_runner_from_the_next_frame() {
        let campaign = Campaign::new(builtin_levels()).expect("builtin campaign");
        let mut session = Session::new(campaign).expect("builtin level is valid");
        let start = query::agent(session.world(), AgentRole::Runner).point;

        let _ = session.step(FRAME, right());
        assert_eq!(query::agent(session.world(), AgentRole::Runner).point, start);

        let _ = session.step(FRAME, right());
        assert_ne!(query::agent(session.world(), AgentRole::Runner).point, start);
    }

    #[test]
    fn welcome_banner_greets_the_first_level() {
        let campaign = Campaign::new(builtin_levels()).expect("builtin campaign");
        let session = Session::new(campaign).expect("builtin level is valid");

        let scene = session.scene().expect("builtin view is valid");

        assert_eq!(scene.level_name, "level-00");
        assert_eq!(scene.banner.as_deref(), Some("Welcome to Edge Runner."));
    }

    #[test]
    fn being_caught_restarts_the_level() {
        let campaign = Campaign::new(vec![strip("trap", 0.4, 2)]).expect("one level");
        let mut session = Session::new(campaign).expect("trap is valid");

        let mut verdict = None;
        for _ in 0..20 {
            verdict = session.step(FRAME, FrameInput::default());
            if verdict.is_some() {
                break;
            }
        }
        assert_eq!(verdict, Some(Verdict::Caught));

        let _ = session.step(FRAME, FrameInput::default());
        assert_eq!(query::level_name(session.world()), "trap");
        assert!(query::reference_time_ms(session.world()) <= FRAME.as_secs_f64() * 1_000.0);
        assert!(!session.is_finished());
    }

    #[test]
    fn covering_the_last_level_finishes_the_session() {
        let campaign = Campaign::new(vec![strip("sweep", 2.0, 3)]).expect("one level");
        let mut session = Session::new(campaign).expect("sweep is valid");

        assert_eq!(session.step(FRAME, FrameInput::default()), Some(Verdict::Covered));
        assert!(session.is_finished());
        assert_eq!(session.step(FRAME, right()), None);

        let scene = session.scene().expect("identity view is valid");
        assert_eq!(scene.banner.as_deref(), Some(CAMPAIGN_COMPLETE));
    }

    #[test]
    fn long_frames_still_catch_a_runner_meeting_the_chaser_head_on() {
        let campaign = Campaign::new(vec![corridor()]).expect("one level");
        let mut session = Session::new(campaign).expect("corridor is valid");

        assert_eq!(session.step(Duration::ZERO, right()), None);
        assert_eq!(
            session.step(Duration::from_millis(1_500), right()),
            Some(Verdict::Caught)
        );
    }
}
