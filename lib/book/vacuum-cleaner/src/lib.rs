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

// PEAS - Performance, Environment, Action, Sensing
//
// See:
// -  Chapter 2: Intelligent Agents, page 40
// -  Exercise 2.14, the vacuum world with bump sensors, unknown location and unreliable sensors.

use num_traits::Zero;

pub mod config;
pub mod coverage;
pub mod position;
pub mod reflex;
pub mod sensors;
pub mod study;
pub mod vacuum_world;

pub type Rng = rand_pcg::Pcg64;
pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type HashSet<K> = rustc_hash::FxHashSet<K>;

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Perception, the Agent will return an Action.
///
/// Stateful agents keep their memory inside `self`. That memory belongs to a single run, and
/// `reset` must bring the agent back to its freshly constructed state. Stateless agents, e.g.
/// a reflex agent, can rely on the default no-op `reset`.
///
/// Notice that the Agent is not aware of an Environment, it's only interface
/// is the Perception coming in then the Action going out. Any randomness the Agent needs comes
/// from the `rng` handed in by the Simulation, so a seeded run is reproducible.
pub trait Agent {
    type Action;
    type Percept;

    fn act(&mut self, percept: &Self::Percept, rng: &mut Rng) -> Self::Action;

    fn reset(&mut self) {}
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    type Action;
    type Percept;
    type Score: num_traits::NumAssign + Copy;

    /// Sense the environment from the agent's point of view. Sensors may be noisy, which is why
    /// this takes the run's random number generator.
    fn percept(&self, rng: &mut Rng) -> Self::Percept;
    fn execute_action(&mut self, action: &Self::Action);

    /// Returns the score of the Environment. This is not cumulative or stateful. This is the score
    /// of the Environment at the current state.
    fn score(&self) -> Self::Score;

    /// True once the agent has nothing left to do, e.g. every square is clean.
    fn is_goal(&self) -> bool;
}

/// A Simulation runs a single Agent in multiple Performance, Environment, Action, Sensing (PEAS)
/// cycles. The Agent's score (Performance) is continually kept up to date.
///
/// Every cycle costs one unit of energy, whatever the action does. The simulation stops early
/// as soon as the Environment reaches its goal, otherwise after `time_steps` cycles.
///
/// The Simulation is aware of both the Environment and the single Agent. Notice that the Agent's
/// generic Action and Percept come from the Environment. The Agent still does not need to know that
/// the Environment exists, but the Agent definitely needs the Environment's Action and Percept
/// types.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    time_steps: u32,
    steps_taken: u32,
    score: _Environment::Score,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    pub fn new(environment: _Environment, agent: _Agent, time_steps: u32) -> Self {
        Self {
            environment,
            agent,
            time_steps,
            steps_taken: 0,
            score: _Environment::Score::zero(),
        }
    }

    /// Run until the goal is reached or the energy budget is spent. Returns whether the goal was
    /// reached.
    ///
    /// The agent's memory is reset first, so nothing carries over from an earlier run.
    pub fn run(&mut self, rng: &mut Rng) -> bool {
        self.agent.reset();
        self.steps_taken = 0;
        self.score = _Environment::Score::zero();

        while self.steps_taken < self.time_steps {
            if self.environment.is_goal() {
                return true;
            }
            let percept = self.environment.percept(rng);
            let action = self.agent.act(&percept, rng);
            self.environment.execute_action(&action);
            self.steps_taken += 1;
            self.score += self.environment.score();
        }

        // The last permitted action may have finished the job.
        self.environment.is_goal()
    }

    pub fn score(&self) -> <_Environment as Environment>::Score {
        self.score
    }

    /// Energy spent so far, one unit per cycle.
    pub fn energy_spent(&self) -> u32 {
        self.steps_taken
    }

    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    pub fn environment(&self) -> &_Environment {
        &self.environment
    }

    pub fn agent(&self) -> &_Agent {
        &self.agent
    }
}
