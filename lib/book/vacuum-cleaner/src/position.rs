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

use crate::sensors::BoundaryContact;
use crate::vacuum_world::Location;

/// Room size assumed by an agent that has not been told how big the room is.
pub const DEFAULT_ROOM_SIZE: usize = 5;

/// Guesses where the agent is from the bump sensors alone.
///
/// Corners map to themselves, a single wall maps to the middle of that wall, and no walls map to
/// the centre of the room. Many squares share an estimate, e.g. every interior square reads as
/// the centre. Patterns that cannot happen in a square room, such as north and south together,
/// also read as the centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionEstimator {
    room_size: i32,
}

impl PositionEstimator {
    pub fn new(room_size: usize) -> Self {
        Self {
            room_size: room_size as i32,
        }
    }

    pub fn room_size(&self) -> usize {
        self.room_size as usize
    }

    pub fn estimate(&self, contact: &BoundaryContact) -> Location {
        let last = self.room_size - 1;
        let mid = self.room_size / 2;
        match (contact.north, contact.south, contact.east, contact.west) {
            (true, false, false, true) => Location::new(0, 0),
            (true, false, true, false) => Location::new(last, 0),
            (false, true, false, true) => Location::new(0, last),
            (false, true, true, false) => Location::new(last, last),
            (true, false, false, false) => Location::new(mid, 0),
            (false, true, false, false) => Location::new(mid, last),
            (false, false, true, false) => Location::new(last, mid),
            (false, false, false, true) => Location::new(0, mid),
            _ => Location::new(mid, mid),
        }
    }
}

impl Default for PositionEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_SIZE)
    }
}
