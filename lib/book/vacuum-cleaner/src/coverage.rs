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

//! Model-based coverage agent for a room it cannot see.
//!
//! The agent only has its bump sensors to work out where it is, see [`PositionEstimator`]. It
//! first heads for the north-west corner to anchor itself (`Mode::Locate`), then works through the
//! room (`Mode::Explore`). With [`CoveragePolicy::Systematic`] it trusts the dirt sensor and follows
//! a serpentine scan. With [`CoveragePolicy::ConfidenceWeighted`] it keeps dirty and clean counts
//! per square and only trusts a square once it has enough readings, which copes with a dirt sensor
//! that lies.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::position::{PositionEstimator, DEFAULT_ROOM_SIZE};
use crate::sensors::BoundaryContact;
use crate::vacuum_world::{Direction, Location, VacuumWorldAction, VacuumWorldPercept};
use crate::{Agent, HashMap, HashSet, Rng};

/// Above this probability of dirt a square is cleaned without hesitation. Below one minus this it
/// is taken to be clean.
pub const CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Squares with fewer readings than this are revisited.
pub const MIN_READINGS: u32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Locate,
    Explore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoveragePolicy {
    /// Suck whenever the dirt sensor says so, and scan the room in serpentine order.
    Systematic,

    /// Suck based on accumulated dirt readings, and revisit squares that are under-sampled.
    ConfidenceWeighted,
}

/// What the readings so far say about a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Dirty,
    /// Leaning dirty but below [`CONFIDENCE_THRESHOLD`]. Cleaned anyway, since missing dirt costs
    /// more than a wasted suck.
    ProbablyDirty,
    Clean,
    Uncertain,
}

impl Verdict {
    pub fn should_clean(self) -> bool {
        matches!(self, Verdict::Dirty | Verdict::ProbablyDirty)
    }
}

/// Dirt sensor readings taken at one estimated location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Belief {
    pub clean_evidence: u32,
    pub dirty_evidence: u32,
}

impl Belief {
    pub fn record(&mut self, dirty: bool) {
        if dirty {
            self.dirty_evidence += 1;
        } else {
            self.clean_evidence += 1;
        }
    }

    pub fn readings(&self) -> u32 {
        self.clean_evidence + self.dirty_evidence
    }

    /// Estimated probability that the square is dirty, 0.5 with no readings.
    pub fn confidence(&self) -> f64 {
        match self.readings() {
            0 => 0.5,
            readings => self.dirty_evidence as f64 / readings as f64,
        }
    }

    pub fn verdict(&self) -> Verdict {
        let confidence = self.confidence();
        if confidence > CONFIDENCE_THRESHOLD {
            Verdict::Dirty
        } else if confidence < 1.0 - CONFIDENCE_THRESHOLD {
            Verdict::Clean
        } else if confidence > 0.5 {
            Verdict::ProbablyDirty
        } else {
            Verdict::Uncertain
        }
    }
}

/// Everything a [`CoverageAgent`] remembers during one run. All locations are estimates.
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    pub position: Option<Location>,
    pub visited: HashSet<Location>,
    pub cleaned: HashSet<Location>,
    pub mode: Mode,
    pub exploration_path: Vec<Location>,
    pub path_index: usize,
    pub beliefs: HashMap<Location, Belief>,
}

/// Row by row from the north, west to east on even rows and east to west on odd rows.
pub fn serpentine_order(room_size: usize) -> Vec<Location> {
    let size = room_size as i32;
    let mut path = Vec::with_capacity(room_size * room_size);
    for y in 0..size {
        if y % 2 == 0 {
            path.extend((0..size).map(|x| Location::new(x, y)));
        } else {
            path.extend((0..size).rev().map(|x| Location::new(x, y)));
        }
    }
    path
}

pub struct CoverageAgent {
    policy: CoveragePolicy,
    estimator: PositionEstimator,
    state: AgentState,
}

impl CoverageAgent {
    /// `room_size` is what the agent assumes about the room, and sets its position landmarks and
    /// the extent of its exploration.
    pub fn new(policy: CoveragePolicy, room_size: usize) -> Self {
        Self {
            policy,
            estimator: PositionEstimator::new(room_size),
            state: AgentState::default(),
        }
    }

    pub fn systematic() -> Self {
        Self::new(CoveragePolicy::Systematic, DEFAULT_ROOM_SIZE)
    }

    pub fn confidence_weighted() -> Self {
        Self::new(CoveragePolicy::ConfidenceWeighted, DEFAULT_ROOM_SIZE)
    }

    pub fn policy(&self) -> CoveragePolicy {
        self.policy
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    fn room_size(&self) -> usize {
        self.estimator.room_size()
    }

    fn observe(&mut self, percept: &VacuumWorldPercept) -> Location {
        let position = self.estimator.estimate(&percept.boundary);
        self.state.position = Some(position);
        self.state.visited.insert(position);

        if self.state.mode == Mode::Locate && percept.boundary.count() >= 2 {
            self.state.mode = Mode::Explore;
            self.state.exploration_path = serpentine_order(self.room_size());
            self.state.path_index = 0;
            debug!(x = position.x, y = position.y, "anchored, exploring");
        }
        position
    }

    fn suck(&mut self, position: Location) -> VacuumWorldAction {
        self.state.cleaned.insert(position);
        VacuumWorldAction::Suck
    }

    // Head for the north-west corner.
    fn locate_move(&self, contact: &BoundaryContact, rng: &mut Rng) -> VacuumWorldAction {
        if !contact.north {
            VacuumWorldAction::Move(Direction::North)
        } else if !contact.west {
            VacuumWorldAction::Move(Direction::West)
        } else {
            random_open_direction(contact, rng)
        }
    }

    fn explore_move(
        &mut self,
        position: Location,
        contact: &BoundaryContact,
        rng: &mut Rng,
    ) -> VacuumWorldAction {
        if self.state.visited.len() >= self.room_size() * self.room_size() {
            return VacuumWorldAction::Suck;
        }

        let next = self.state.exploration_path[self.state.path_index..]
            .iter()
            .position(|location| !self.state.visited.contains(location));
        match next {
            Some(offset) => {
                self.state.path_index += offset;
                let target = self.state.exploration_path[self.state.path_index];
                move_towards(position, target, contact, rng)
            }
            None => random_open_direction(contact, rng),
        }
    }

    fn confident_target_move(
        &self,
        position: Location,
        contact: &BoundaryContact,
        rng: &mut Rng,
    ) -> VacuumWorldAction {
        let under_sampled = nearest(
            position,
            self.state
                .beliefs
                .iter()
                .filter(|(_, belief)| belief.readings() < MIN_READINGS)
                .map(|(location, _)| *location),
        );
        let size = self.room_size() as i32;
        let target = under_sampled.or_else(|| {
            nearest(
                position,
                (0..size)
                    .flat_map(|y| (0..size).map(move |x| Location::new(x, y)))
                    .filter(|location| !self.state.visited.contains(location)),
            )
        });
        match target {
            Some(target) => move_towards(position, target, contact, rng),
            None => VacuumWorldAction::Suck,
        }
    }

    fn act_systematic(
        &mut self,
        position: Location,
        percept: &VacuumWorldPercept,
        rng: &mut Rng,
    ) -> VacuumWorldAction {
        if percept.dirty {
            return self.suck(position);
        }
        match self.state.mode {
            Mode::Locate => self.locate_move(&percept.boundary, rng),
            Mode::Explore => self.explore_move(position, &percept.boundary, rng),
        }
    }

    fn act_confidence_weighted(
        &mut self,
        position: Location,
        percept: &VacuumWorldPercept,
        rng: &mut Rng,
    ) -> VacuumWorldAction {
        let belief = self.state.beliefs.entry(position).or_default();
        belief.record(percept.dirty);
        if belief.verdict().should_clean() {
            return self.suck(position);
        }
        match self.state.mode {
            Mode::Locate => self.locate_move(&percept.boundary, rng),
            Mode::Explore => self.confident_target_move(position, &percept.boundary, rng),
        }
    }
}

impl Default for CoverageAgent {
    fn default() -> Self {
        Self::systematic()
    }
}

impl Agent for CoverageAgent {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldPercept;

    fn act(&mut self, percept: &Self::Percept, rng: &mut Rng) -> Self::Action {
        let position = self.observe(percept);
        match self.policy {
            CoveragePolicy::Systematic => self.act_systematic(position, percept, rng),
            CoveragePolicy::ConfidenceWeighted => {
                self.act_confidence_weighted(position, percept, rng)
            }
        }
    }

    fn reset(&mut self) {
        self.state = AgentState::default();
    }
}

/// Closest candidate by Manhattan distance. Ties go to the northernmost, then westernmost.
fn nearest(from: Location, candidates: impl Iterator<Item = Location>) -> Option<Location> {
    candidates.min_by_key(|location| (location.manhattan_distance(&from), location.y, location.x))
}

/// Step along the axis with the larger offset to `target`. Without a clear, unblocked preference
/// pick any open direction.
pub fn move_towards(
    from: Location,
    target: Location,
    contact: &BoundaryContact,
    rng: &mut Rng,
) -> VacuumWorldAction {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    let preferred = if dx.abs() > dy.abs() {
        Some(if dx > 0 {
            Direction::East
        } else {
            Direction::West
        })
    } else if dy.abs() > dx.abs() {
        Some(if dy > 0 {
            Direction::South
        } else {
            Direction::North
        })
    } else {
        None
    };

    match preferred {
        Some(direction) if !contact.is_blocked(direction) => VacuumWorldAction::Move(direction),
        _ => random_open_direction(contact, rng),
    }
}

/// A uniformly random direction without a wall, or suck if walled in on all sides.
pub fn random_open_direction(contact: &BoundaryContact, rng: &mut Rng) -> VacuumWorldAction {
    contact
        .open_directions()
        .choose(rng)
        .map_or(VacuumWorldAction::Suck, |&direction| {
            VacuumWorldAction::Move(direction)
        })
}
