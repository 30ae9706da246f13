#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level progression: advances on a win, retries on a loss.

mod catalogue;

pub use catalogue::builtin_levels;

use edge_runner_core::{Command, LevelDefinition};
use edge_runner_system_referee::Verdict;
use thiserror::Error;

/// Reasons a campaign cannot be assembled.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CampaignError {
    /// The campaign was given no levels to play.
    #[error("a campaign needs at least one level")]
    Empty,
    /// The requested starting level does not exist.
    #[error("starting level {index} is out of range for {count} levels")]
    StartOutOfRange {
        /// Requested zero-based level index.
        index: usize,
        /// Number of available levels.
        count: usize,
    },
}

/// Pure system that turns verdicts into level transitions.
#[derive(Clone, Debug)]
pub struct Campaign {
    levels: Vec<LevelDefinition>,
    current: usize,
    finished: bool,
}

impl Campaign {
    /// Creates a campaign that starts on its first level.
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, CampaignError> {
        Self::starting_at(levels, 0)
    }

    /// Creates a campaign that starts on the level with the provided index.
    pub fn starting_at(levels: Vec<LevelDefinition>, index: usize) -> Result<Self, CampaignError> {
        if levels.is_empty() {
            return Err(CampaignError::Empty);
        }
        if index >= levels.len() {
            return Err(CampaignError::StartOutOfRange {
                index,
                count: levels.len(),
            });
        }

        Ok(Self {
            levels,
            current: index,
            finished: false,
        })
    }

    /// Level currently being played.
    #[must_use]
    pub fn current_level(&self) -> &LevelDefinition {
        &self.levels[self.current]
    }

    /// Zero-based index of the level currently being played.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of levels in the campaign.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether the last level has been won.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Reacts to a verdict by queueing the level that should be played next.
    pub fn handle(&mut self, verdict: Verdict, out: &mut Vec<Command>) {
        if self.finished {
            return;
        }

        match verdict {
            Verdict::Caught => {
                log::info!("caught on {}, restarting", self.current_level().name);
            }
            Verdict::Covered if self.current + 1 < self.levels.len() => {
                log::info!("cleared {}", self.current_level().name);
                self.current += 1;
            }
            Verdict::Covered => {
                log::info!(
                    "cleared {}, campaign complete",
                    self.current_level().name
                );
                self.finished = true;
                return;
            }
        }

        out.push(Command::LoadLevel {
            level: self.current_level().clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(commands: &[Command]) -> Vec<String> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::LoadLevel { level } => Some(level.name.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn covered_advances_to_the_next_level() {
        let mut campaign = Campaign::new(builtin_levels()).expect("builtin campaign");
        let mut commands = Vec::new();

        campaign.handle(Verdict::Covered, &mut commands);

        assert_eq!(campaign.current_index(), 1);
        assert_eq!(campaign.level_count(), 4);
        assert_eq!(names(&commands), ["level-01"]);
    }

    #[test]
    fn caught_restarts_the_current_level() {
        let mut campaign = Campaign::new(builtin_levels()).expect("builtin campaign");
        let mut commands = Vec::new();

        campaign.handle(Verdict::Caught, &mut commands);

        assert_eq!(campaign.current_index(), 0);
        assert_eq!(names(&commands), ["level-00"]);
    }

    #[test]
    fn winning_the_last_level_finishes_the_campaign() {
        let mut campaign =
            Campaign::starting_at(builtin_levels(), 3).expect("finale exists");
        let mut commands = Vec::new();

        campaign.handle(Verdict::Covered, &mut commands);
        campaign.handle(Verdict::Caught, &mut commands);

        assert!(campaign.is_finished());
        assert!(commands.is_empty());
        assert_eq!(campaign.current_level().name, "das Ende.");
    }

    #[test]
    fn invalid_campaigns_are_rejected() {
        assert_eq!(Campaign::new(Vec::new()).err(), Some(CampaignError::Empty));
        assert_eq!(
            Campaign::starting_at(builtin_levels(), 4).err(),
            Some(CampaignError::StartOutOfRange { index: 4, count: 4 })
        );
    }
}
