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

//! Stateless agents, kept as baselines for the model-based agents.

use rand::seq::SliceRandom;

use crate::coverage::random_open_direction;
use crate::vacuum_world::{Direction, VacuumWorldAction, VacuumWorldPercept};
use crate::{Agent, Rng};

/// Sucks if the dirt sensor says so, otherwise wanders in a random direction without a wall.
#[derive(Debug, Default)]
pub struct SimpleReflexAgent {}

impl SimpleReflexAgent {
    pub fn new() -> Self {
        Self {}
    }
}

impl Agent for SimpleReflexAgent {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldPercept;

    fn act(&mut self, percept: &Self::Percept, rng: &mut Rng) -> Self::Action {
        if percept.dirty {
            VacuumWorldAction::Suck
        } else {
            random_open_direction(&percept.boundary, rng)
        }
    }
}

const ALL_ACTIONS: [VacuumWorldAction; 5] = [
    VacuumWorldAction::Move(Direction::North),
    VacuumWorldAction::Move(Direction::East),
    VacuumWorldAction::Move(Direction::West),
    VacuumWorldAction::Move(Direction::South),
    VacuumWorldAction::Suck,
];

/// Ignores its sensors and picks any of the five actions uniformly.
#[derive(Debug, Default)]
pub struct RandomizedAgent {}

impl RandomizedAgent {
    pub fn new() -> Self {
        Self {}
    }
}

impl Agent for RandomizedAgent {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldPercept;

    fn act(&mut self, _percept: &Self::Percept, rng: &mut Rng) -> Self::Action {
        *ALL_ACTIONS
            .choose(rng)
            .unwrap_or(&VacuumWorldAction::Suck)
    }
}
