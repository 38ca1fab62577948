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

use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::SimulationConfig;
use crate::sensors::{BoundaryContact, NoisySensor};
use crate::{Agent, Environment, Rng, Simulation};

/// A square of the room. `x` grows towards the east and `y` grows towards the south, so the
/// north-west corner is `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(&self, other: &Location) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The neighbouring square in `direction`, which may be outside the room.
    pub fn step(self, direction: Direction) -> Location {
        match direction {
            Direction::North => Location::new(self.x, self.y - 1),
            Direction::South => Location::new(self.x, self.y + 1),
            Direction::East => Location::new(self.x + 1, self.y),
            Direction::West => Location::new(self.x - 1, self.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquareState {
    Clean,
    Dirty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VacuumWorldAction {
    Move(Direction),
    Suck,
}

/// VacuumWorldPercept is what the Agent receives from the Environment on each step: the four bump
/// sensors and the dirt sensor looking right down. The agent is never told where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VacuumWorldPercept {
    pub boundary: BoundaryContact,
    pub dirty: bool,
}

/// A square room of dirty and clean squares with a single vacuum agent in it.
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: i32,
    squares: Vec<SquareState>,
    dirty_squares: usize,
    agent_location: Location,
    dirt_sensor: NoisySensor,
    boundary_sensor: NoisySensor,
}

impl GridWorld {
    /// An all clean room with exact sensors.
    pub fn new(room_size: usize, agent_location: Location) -> Self {
        Self {
            size: room_size as i32,
            squares: vec![SquareState::Clean; room_size * room_size],
            dirty_squares: 0,
            agent_location,
            dirt_sensor: NoisySensor::exact(),
            boundary_sensor: NoisySensor::exact(),
        }
    }

    /// Every square is dirty with probability `dirt_prob`, independently, and the agent starts on
    /// a uniformly random square.
    pub fn random(room_size: usize, dirt_prob: f64, rng: &mut Rng) -> Self {
        let size = room_size as i32;
        let mut world = Self::new(room_size, Location::new(0, 0));
        for y in 0..size {
            for x in 0..size {
                if rng.gen::<f64>() < dirt_prob {
                    world.set_square(Location::new(x, y), SquareState::Dirty);
                }
            }
        }
        world.agent_location = Location::new(rng.gen_range(0..size), rng.gen_range(0..size));
        world
    }

    pub fn from_config(config: &SimulationConfig, rng: &mut Rng) -> Self {
        Self::random(config.room_size, config.dirt_prob, rng).with_sensors(
            NoisySensor::new(config.dirt_sensor_error_rate),
            NoisySensor::new(config.boundary_sensor_error_rate),
        )
    }

    pub fn with_sensors(mut self, dirt_sensor: NoisySensor, boundary_sensor: NoisySensor) -> Self {
        self.dirt_sensor = dirt_sensor;
        self.boundary_sensor = boundary_sensor;
        self
    }

    pub fn with_dirt(mut self, location: Location) -> Self {
        self.set_square(location, SquareState::Dirty);
        self
    }

    pub fn room_size(&self) -> usize {
        self.size as usize
    }

    pub fn agent_location(&self) -> Location {
        self.agent_location
    }

    pub fn contains(&self, location: Location) -> bool {
        (0..self.size).contains(&location.x) && (0..self.size).contains(&location.y)
    }

    /// Squares outside the room read as clean.
    pub fn square(&self, location: Location) -> SquareState {
        self.index(location)
            .map_or(SquareState::Clean, |index| self.squares[index])
    }

    /// Squares outside the room are ignored.
    pub fn set_square(&mut self, location: Location, state: SquareState) {
        let Some(index) = self.index(location) else {
            return;
        };
        match (self.squares[index], state) {
            (SquareState::Clean, SquareState::Dirty) => self.dirty_squares += 1,
            (SquareState::Dirty, SquareState::Clean) => self.dirty_squares -= 1,
            _ => {}
        }
        self.squares[index] = state;
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty_squares
    }

    pub fn clean_count(&self) -> usize {
        self.squares.len() - self.dirty_squares
    }

    /// The walls actually adjacent to the agent, before any sensor noise.
    pub fn true_boundary(&self) -> BoundaryContact {
        BoundaryContact::at(self.agent_location, self.size)
    }

    fn index(&self, location: Location) -> Option<usize> {
        if self.contains(location) {
            Some((location.y * self.size + location.x) as usize)
        } else {
            None
        }
    }
}

// Room state: D = dirty, C = clean, A = agent. One row per line, north first.
impl std::fmt::Display for GridWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                let location = Location::new(x, y);
                let c = if location == self.agent_location {
                    'A'
                } else {
                    match self.square(location) {
                        SquareState::Dirty => 'D',
                        SquareState::Clean => 'C',
                    }
                };
                if x > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Environment for GridWorld {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldPercept;
    type Score = u64;

    fn percept(&self, rng: &mut Rng) -> Self::Percept {
        let boundary = self.true_boundary();
        let dirty = self.square(self.agent_location) == SquareState::Dirty;
        let percept = VacuumWorldPercept {
            boundary: boundary.perturbed(&self.boundary_sensor, rng),
            dirty: self.dirt_sensor.read(dirty, rng),
        };
        trace!(
            x = self.agent_location.x,
            y = self.agent_location.y,
            dirty,
            reported_dirty = percept.dirty,
            boundary = ?percept.boundary,
            "sensed"
        );
        percept
    }

    fn execute_action(&mut self, action: &Self::Action) {
        match action {
            VacuumWorldAction::Suck => {
                self.set_square(self.agent_location, SquareState::Clean);
            }
            VacuumWorldAction::Move(direction) => {
                // Bumping into a wall leaves the agent where it is.
                if !self.true_boundary().is_blocked(*direction) {
                    self.agent_location = self.agent_location.step(*direction);
                }
            }
        }
        trace!(?action, x = self.agent_location.x, y = self.agent_location.y, "acted");
    }

    fn score(&self) -> Self::Score {
        self.clean_count() as u64
    }

    fn is_goal(&self) -> bool {
        self.dirty_squares == 0
    }
}

/// Result of one run of a vacuum agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub energy_spent: u32,
    pub succeeded: bool,
    pub steps_taken: u32,
    pub cells_left_dirty: usize,

    /// Clean squares summed over every step, the AIMA performance measure.
    pub performance: u64,
}

impl SimulationOutcome {
    pub fn from_simulation<_Agent>(
        simulation: &Simulation<GridWorld, _Agent>,
        succeeded: bool,
    ) -> Self
    where
        _Agent: Agent<Action = VacuumWorldAction, Percept = VacuumWorldPercept>,
    {
        Self {
            energy_spent: simulation.energy_spent(),
            succeeded,
            steps_taken: simulation.steps_taken(),
            cells_left_dirty: simulation.environment().dirty_count(),
            performance: simulation.score(),
        }
    }
}

/// Run `agent` once in a freshly generated room described by `config`.
///
/// `config` is not validated here; see [`SimulationConfig::validate`].
pub fn run_vacuum_world<_Agent>(
    agent: _Agent,
    config: &SimulationConfig,
    rng: &mut Rng,
) -> SimulationOutcome
where
    _Agent: Agent<Action = VacuumWorldAction, Percept = VacuumWorldPercept>,
{
    let environment = GridWorld::from_config(config, rng);
    let mut simulation = Simulation::new(environment, agent, config.max_steps);
    let succeeded = simulation.run(rng);
    let outcome = SimulationOutcome::from_simulation(&simulation, succeeded);
    debug!(
        energy = outcome.energy_spent,
        succeeded = outcome.succeeded,
        dirty_left = outcome.cells_left_dirty,
        "run finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;

    use super::*;
    use crate::coverage::CoverageAgent;
    use crate::Rng;
    use crate::reflex::SimpleReflexAgent;

    /// Replays a fixed list of actions, then sucks forever.
    struct Scripted {
        actions: Vec<VacuumWorldAction>,
    }

    impl Agent for Scripted {
        type Action = VacuumWorldAction;
        type Percept = VacuumWorldPercept;

        fn act(&mut self, _percept: &Self::Percept, _rng: &mut Rng) -> Self::Action {
            if self.actions.is_empty() {
                VacuumWorldAction::Suck
            } else {
                self.actions.remove(0)
            }
        }
    }

    fn config(room_size: usize, dirt_prob: f64, max_steps: u32) -> SimulationConfig {
        SimulationConfig {
            room_size,
            dirt_prob,
            max_steps,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_clean_room_succeeds_without_spending_energy() {
        let mut rng = Rng::seed_from_u64(1);
        for room_size in [1, 2, 5, 10] {
            let outcome = run_vacuum_world(
                CoverageAgent::systematic(),
                &config(room_size, 0.0, 100),
                &mut rng,
            );
            assert_eq!(
                outcome,
                SimulationOutcome {
                    energy_spent: 0,
                    succeeded: true,
                    steps_taken: 0,
                    cells_left_dirty: 0,
                    performance: 0,
                }
            );
        }
    }

    #[test]
    fn test_single_dirty_square_is_cleaned_in_one_step() {
        let mut rng = Rng::seed_from_u64(1);
        let outcome = run_vacuum_world(SimpleReflexAgent::new(), &config(1, 1.0, 10), &mut rng);
        assert!(outcome.succeeded);
        assert_eq!(outcome.energy_spent, 1);
        assert_eq!(outcome.steps_taken, 1);
        assert_eq!(outcome.cells_left_dirty, 0);
    }

    #[test]
    fn test_running_out_of_energy_reports_dirt_left() {
        let mut rng = Rng::seed_from_u64(1);
        let agent = Scripted {
            actions: vec![VacuumWorldAction::Move(Direction::North); 5],
        };
        let outcome = run_vacuum_world(agent, &config(3, 1.0, 5), &mut rng);
        assert!(!outcome.succeeded);
        assert_eq!(outcome.energy_spent, 5);
        assert_eq!(outcome.cells_left_dirty, 9);
    }

    #[test]
    fn test_moving_into_wall_does_nothing() {
        let mut world = GridWorld::new(3, Location::new(0, 0));
        world.execute_action(&VacuumWorldAction::Move(Direction::North));
        assert_eq!(world.agent_location(), Location::new(0, 0));
        world.execute_action(&VacuumWorldAction::Move(Direction::West));
        assert_eq!(world.agent_location(), Location::new(0, 0));
        world.execute_action(&VacuumWorldAction::Move(Direction::South));
        assert_eq!(world.agent_location(), Location::new(0, 1));
        world.execute_action(&VacuumWorldAction::Move(Direction::East));
        assert_eq!(world.agent_location(), Location::new(1, 1));
    }

    #[test]
    fn test_suck_cleans_only_the_current_square() {
        let mut world = GridWorld::new(2, Location::new(0, 0))
            .with_dirt(Location::new(0, 0))
            .with_dirt(Location::new(1, 0));
        assert_eq!(world.dirty_count(), 2);
        world.execute_action(&VacuumWorldAction::Suck);
        assert_eq!(world.square(Location::new(0, 0)), SquareState::Clean);
        assert_eq!(world.square(Location::new(1, 0)), SquareState::Dirty);
        assert_eq!(world.dirty_count(), 1);
        assert_eq!(world.score(), 3);
        assert!(!world.is_goal());
    }

    #[test]
    fn test_percept_reports_truth_with_exact_sensors() {
        let mut rng = Rng::seed_from_u64(3);
        let world = GridWorld::new(5, Location::new(4, 2)).with_dirt(Location::new(4, 2));
        let percept = world.percept(&mut rng);
        assert!(percept.dirty);
        assert_eq!(
            percept.boundary,
            BoundaryContact {
                north: false,
                south: false,
                east: true,
                west: false,
            }
        );
    }

    #[test]
    fn test_noisy_dirt_sensor_does_not_change_the_room() {
        let mut rng = Rng::seed_from_u64(3);
        let world = GridWorld::new(2, Location::new(0, 0))
            .with_sensors(NoisySensor::new(1.0), NoisySensor::exact());
        let percept = world.percept(&mut rng);
        assert!(percept.dirty);
        assert!(world.is_goal());
    }

    #[test]
    fn test_noisy_boundary_sensor_does_not_move_the_walls() {
        let mut rng = Rng::seed_from_u64(3);
        let mut world = GridWorld::new(3, Location::new(1, 1))
            .with_sensors(NoisySensor::exact(), NoisySensor::new(1.0));
        let percept = world.percept(&mut rng);
        assert!(!percept.dirty);
        assert_eq!(
            percept.boundary,
            BoundaryContact {
                north: true,
                south: true,
                east: true,
                west: true,
            }
        );
        world.execute_action(&VacuumWorldAction::Move(Direction::North));
        assert_eq!(world.agent_location(), Location::new(1, 0));
    }

    #[test]
    fn test_random_room_density_follows_dirt_prob() {
        let mut rng = Rng::seed_from_u64(11);
        let world = GridWorld::random(100, 0.2, &mut rng);
        let density = world.dirty_count() as f64 / 10_000.0;
        assert!((density - 0.2).abs() < 0.02, "density was {}", density);
    }

    #[test]
    fn test_display() {
        let world = GridWorld::new(2, Location::new(1, 1)).with_dirt(Location::new(1, 0));
        assert_eq!(format!("{}", world), "C D\nC A\n");
    }

    fn action_strategy() -> impl Strategy<Value = VacuumWorldAction> {
        prop_oneof![
            Just(VacuumWorldAction::Suck),
            Just(VacuumWorldAction::Move(Direction::North)),
            Just(VacuumWorldAction::Move(Direction::South)),
            Just(VacuumWorldAction::Move(Direction::East)),
            Just(VacuumWorldAction::Move(Direction::West)),
        ]
    }

    proptest! {
        #[test]
        fn test_agent_stays_in_the_room(
            seed in any::<u64>(),
            room_size in 1..8usize,
            actions in prop::collection::vec(action_strategy(), 0..100),
        ) {
            let mut rng = Rng::seed_from_u64(seed);
            let mut world = GridWorld::random(room_size, 0.5, &mut rng);
            for action in &actions {
                world.execute_action(action);
                prop_assert!(world.contains(world.agent_location()));
            }
        }

        #[test]
        fn test_suck_on_clean_square_changes_nothing(
            seed in any::<u64>(),
            room_size in 1..8usize,
            actions in prop::collection::vec(action_strategy(), 0..50),
        ) {
            let mut rng = Rng::seed_from_u64(seed);
            let mut world = GridWorld::random(room_size, 0.5, &mut rng);
            for action in &actions {
                world.execute_action(action);
            }
            world.set_square(world.agent_location(), SquareState::Clean);
            let before = world.clone();
            world.execute_action(&VacuumWorldAction::Suck);
            prop_assert_eq!(&world.squares, &before.squares);
            prop_assert_eq!(world.dirty_count(), before.dirty_count());
            prop_assert_eq!(world.agent_location(), before.agent_location());
        }
    }
}
