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

//! Sensors of the vacuum agent: a dirt sensor looking straight down, and four bump sensors that
//! report whether a wall is adjacent in each direction. Both may lie.

use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::vacuum_world::{Direction, Location};
use crate::Rng;

/// A binary sensor that reports the negation of the truth with probability `error_rate`.
/// Every reading draws a fresh random number, so errors are independent between readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoisySensor {
    error_rate: f64,
}

impl NoisySensor {
    pub fn new(error_rate: f64) -> Self {
        Self { error_rate }
    }

    /// A sensor that never lies.
    pub fn exact() -> Self {
        Self::new(0.0)
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    pub fn read(&self, truth: bool, rng: &mut Rng) -> bool {
        if rng.gen::<f64>() < self.error_rate {
            !truth
        } else {
            truth
        }
    }
}

impl Default for NoisySensor {
    fn default() -> Self {
        Self::exact()
    }
}

/// Which walls are adjacent to the agent. North is the `y == 0` wall and west is the `x == 0`
/// wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryContact {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl BoundaryContact {
    /// The true contact pattern for `location` in a square room of side `room_size`.
    pub fn at(location: Location, room_size: i32) -> Self {
        Self {
            north: location.y == 0,
            south: location.y == room_size - 1,
            east: location.x == room_size - 1,
            west: location.x == 0,
        }
    }

    /// Pass every flag through `sensor` separately.
    pub fn perturbed(self, sensor: &NoisySensor, rng: &mut Rng) -> Self {
        Self {
            north: sensor.read(self.north, rng),
            south: sensor.read(self.south, rng),
            east: sensor.read(self.east, rng),
            west: sensor.read(self.west, rng),
        }
    }

    pub fn is_blocked(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    /// Number of walls in contact.
    pub fn count(&self) -> usize {
        [self.north, self.south, self.east, self.west]
            .iter()
            .filter(|&&wall| wall)
            .count()
    }

    /// Directions without a wall, in north, south, east, west order.
    pub fn open_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| !self.is_blocked(direction))
            .collect()
    }
}
