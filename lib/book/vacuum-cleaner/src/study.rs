/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Repeated, independent runs of an agent, and their summary statistics.

use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::coverage::{CoverageAgent, CoveragePolicy};
use crate::reflex::{RandomizedAgent, SimpleReflexAgent};
use crate::vacuum_world::{
    run_vacuum_world, SimulationOutcome, VacuumWorldAction, VacuumWorldPercept,
};
use crate::{Agent, Rng};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown agent kind: {0}")]
pub struct UnknownAgentKind(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    Randomized,
    SimpleReflex,
    ModelBased,
    ConfidenceWeighted,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Randomized,
        AgentKind::SimpleReflex,
        AgentKind::ModelBased,
        AgentKind::ConfidenceWeighted,
    ];

    /// A fresh agent. Model-based agents assume a room of side `assumed_room_size`.
    pub fn build(self, assumed_room_size: usize) -> VacuumAgent {
        match self {
            AgentKind::Randomized => VacuumAgent::Randomized(RandomizedAgent::new()),
            AgentKind::SimpleReflex => VacuumAgent::SimpleReflex(SimpleReflexAgent::new()),
            AgentKind::ModelBased => VacuumAgent::Coverage(CoverageAgent::new(
                CoveragePolicy::Systematic,
                assumed_room_size,
            )),
            AgentKind::ConfidenceWeighted => VacuumAgent::Coverage(CoverageAgent::new(
                CoveragePolicy::ConfidenceWeighted,
                assumed_room_size,
            )),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AgentKind::Randomized => "randomized",
            AgentKind::SimpleReflex => "simple-reflex",
            AgentKind::ModelBased => "model-based",
            AgentKind::ConfidenceWeighted => "confidence-weighted",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for AgentKind {
    type Err = UnknownAgentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownAgentKind(s.to_string()))
    }
}

/// Any of the vacuum agents, so a study can pick one at runtime.
pub enum VacuumAgent {
    Randomized(RandomizedAgent),
    SimpleReflex(SimpleReflexAgent),
    Coverage(CoverageAgent),
}

impl Agent for VacuumAgent {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldPercept;

    fn act(&mut self, percept: &Self::Percept, rng: &mut Rng) -> Self::Action {
        match self {
            VacuumAgent::Randomized(agent) => agent.act(percept, rng),
            VacuumAgent::SimpleReflex(agent) => agent.act(percept, rng),
            VacuumAgent::Coverage(agent) => agent.act(percept, rng),
        }
    }

    fn reset(&mut self) {
        match self {
            VacuumAgent::Randomized(agent) => agent.reset(),
            VacuumAgent::SimpleReflex(agent) => agent.reset(),
            VacuumAgent::Coverage(agent) => agent.reset(),
        }
    }
}

/// Run `trials` independent simulations in parallel. Each trial gets its own agent and its own
/// generator, seeded with `seed + trial`, so results do not depend on scheduling.
pub fn run_trials(
    kind: AgentKind,
    assumed_room_size: usize,
    config: &SimulationConfig,
    trials: usize,
    seed: u64,
) -> Vec<SimulationOutcome> {
    (0..trials)
        .into_par_iter()
        .map(|trial| {
            let mut rng = Rng::seed_from_u64(seed.wrapping_add(trial as u64));
            run_vacuum_world(kind.build(assumed_room_size), config, &mut rng)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trials: usize,
    pub mean_energy: f64,
    pub std_energy: f64,
    pub min_energy: u32,
    pub max_energy: u32,

    /// Percentage of trials that cleaned the whole room.
    pub success_rate: f64,
    pub mean_cells_left_dirty: f64,

    /// Mean energy divided by the mean number of clean squares at the end. `None` if nothing was
    /// clean.
    pub energy_per_clean_cell: Option<f64>,
}

impl TrialSummary {
    /// `None` when there are no outcomes.
    pub fn from_outcomes(outcomes: &[SimulationOutcome], room_size: usize) -> Option<Self> {
        let min_energy = outcomes.iter().map(|o| o.energy_spent).min()?;
        let max_energy = outcomes.iter().map(|o| o.energy_spent).max()?;
        let trials = outcomes.len();
        let n = trials as f64;

        let mean_energy = outcomes.iter().map(|o| o.energy_spent as f64).sum::<f64>() / n;
        let variance = outcomes
            .iter()
            .map(|o| (o.energy_spent as f64 - mean_energy).powi(2))
            .sum::<f64>()
            / n;
        let successes = outcomes.iter().filter(|o| o.succeeded).count();
        let mean_cells_left_dirty =
            outcomes.iter().map(|o| o.cells_left_dirty as f64).sum::<f64>() / n;
        let mean_clean = (room_size * room_size) as f64 - mean_cells_left_dirty;

        Some(Self {
            trials,
            mean_energy,
            std_energy: variance.sqrt(),
            min_energy,
            max_energy,
            success_rate: successes as f64 / n * 100.0,
            mean_cells_left_dirty,
            energy_per_clean_cell: (mean_clean > 0.0).then(|| mean_energy / mean_clean),
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn outcome(energy_spent: u32, succeeded: bool, cells_left_dirty: usize) -> SimulationOutcome {
        SimulationOutcome {
            energy_spent,
            succeeded,
            steps_taken: energy_spent,
            cells_left_dirty,
            performance: 0,
        }
    }

    #[test]
    fn test_agent_kind_round_trips_through_its_name() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.name().parse::<AgentKind>(), Ok(kind));
        }
        assert!("roomba".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_clean_room_costs_nothing_for_any_agent() {
        let config = SimulationConfig {
            dirt_prob: 0.0,
            ..SimulationConfig::default()
        };
        for kind in AgentKind::ALL {
            for outcome in run_trials(kind, 5, &config, 4, 0) {
                assert_eq!(
                    (
                        outcome.energy_spent,
                        outcome.succeeded,
                        outcome.steps_taken,
                        outcome.cells_left_dirty
                    ),
                    (0, true, 0, 0)
                );
            }
        }
    }

    #[test]
    fn test_trials_are_reproducible() {
        let config = SimulationConfig::imperfect_dirt_sensor();
        let first = run_trials(AgentKind::ConfidenceWeighted, 5, &config, 8, 7);
        let second = run_trials(AgentKind::ConfidenceWeighted, 5, &config, 8, 7);
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn test_reflex_agent_usually_cleans_small_room() {
        let config = SimulationConfig::default();
        let outcomes = run_trials(AgentKind::SimpleReflex, 5, &config, 20, 1);
        let summary = TrialSummary::from_outcomes(&outcomes, 5).expect("outcomes");
        assert!(summary.success_rate >= 80.0, "{:?}", summary);
    }

    #[test]
    fn test_summary() {
        let outcomes = [outcome(10, true, 0), outcome(30, false, 5)];
        let summary = TrialSummary::from_outcomes(&outcomes, 5).expect("outcomes");
        assert_eq!(summary.trials, 2);
        assert_abs_diff_eq!(summary.mean_energy, 20.0);
        assert_abs_diff_eq!(summary.std_energy, 10.0);
        assert_eq!(summary.min_energy, 10);
        assert_eq!(summary.max_energy, 30);
        assert_abs_diff_eq!(summary.success_rate, 50.0);
        assert_abs_diff_eq!(summary.mean_cells_left_dirty, 2.5);
        assert_abs_diff_eq!(summary.energy_per_clean_cell.expect("clean cells"), 20.0 / 22.5);
    }

    #[test]
    fn test_summary_of_nothing() {
        assert_eq!(TrialSummary::from_outcomes(&[], 5), None);
    }

    #[test]
    fn test_summary_of_filthy_room_has_no_efficiency() {
        let summary = TrialSummary::from_outcomes(&[outcome(100, false, 1)], 1).expect("outcomes");
        assert_eq!(summary.energy_per_clean_cell, None);
    }
}
