use crate::shared::{Direction, TieBreak};
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

/**
 * Pending floors awaiting service.
 *
 * The set is kept sorted so the scan can look above or below the car cheaply.
 * `up_reverse_floor` and `down_reverse_floor` are the extremities of the set and
 * are recomputed on every mutation.
 */
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSet {
    floors: BTreeSet<u8>,
    up_reverse_floor: Option<u8>,
    down_reverse_floor: Option<u8>,
}

impl RequestSet {
    pub fn new() -> RequestSet {
        RequestSet::default()
    }

    pub fn contains(&self, floor: u8) -> bool {
        self.floors.contains(&floor)
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    pub fn insert(&mut self, floor: u8) -> bool {
        let inserted = self.floors.insert(floor);
        self.recompute_reverse_floors();
        inserted
    }

    pub fn remove(&mut self, floor: u8) -> bool {
        let removed = self.floors.remove(&floor);
        self.recompute_reverse_floors();
        removed
    }

    /// Adds the floor if absent, removes it if present. Returns true if it is now queued.
    pub fn toggle(&mut self, floor: u8) -> bool {
        if self.floors.contains(&floor) {
            self.remove(floor);
            false
        } else {
            self.insert(floor);
            true
        }
    }

    pub fn up_reverse_floor(&self) -> Option<u8> {
        self.up_reverse_floor
    }

    pub fn down_reverse_floor(&self) -> Option<u8> {
        self.down_reverse_floor
    }

    pub fn recompute_reverse_floors(&mut self) {
        self.up_reverse_floor = self.floors.iter().next_back().copied();
        self.down_reverse_floor = self.floors.iter().next().copied();
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.floors.iter().copied().collect()
    }

    fn nearest_above(&self, floor: u8) -> Option<u8> {
        self.floors.range((Excluded(floor), Unbounded)).next().copied()
    }

    fn nearest_below(&self, floor: u8) -> Option<u8> {
        self.floors.range(..floor).next_back().copied()
    }

    /// Initial direction of a journey: toward the nearest pending floor.
    pub fn choose_initial_direction(&self, floor: u8, tie_break: TieBreak) -> Direction {
        match (self.nearest_above(floor), self.nearest_below(floor)) {
            (Some(above), Some(below)) => {
                let up_distance = above - floor;
                let down_distance = floor - below;
                if up_distance < down_distance {
                    Direction::Up
                } else if down_distance < up_distance {
                    Direction::Down
                } else {
                    match tie_break {
                        TieBreak::PreferUp => Direction::Up,
                        TieBreak::PreferDown => Direction::Down,
                    }
                }
            }
            (Some(_), None) => Direction::Up,
            (None, Some(_)) => Direction::Down,
            (None, None) => Direction::Idle,
        }
    }

    /**
     * Scan target selection.
     *
     * Keeps heading in `direction` while anything is pending ahead of `floor`, or
     * while the reverse floor for that direction has not been reached. Only then
     * flips and picks the nearest floor behind. Returns the direction to travel in
     * together with the target, or `None` when nothing is left to serve.
     */
    pub fn next_floor_in_direction(&self, direction: Direction, floor: u8) -> Option<(Direction, u8)> {
        match direction {
            Direction::Up => {
                if let Some(target) = self.nearest_above(floor) {
                    return Some((Direction::Up, target));
                }
                // Not taken while the reverse floors follow every mutation, since the
                // reverse floor is then also the furthest floor above. Guards the
                // no-early-reversal rule if the reverse floors are ever frozen per journey.
                if let Some(reverse) = self.up_reverse_floor {
                    if floor < reverse {
                        return Some((Direction::Up, reverse));
                    }
                }
                self.nearest_below(floor).map(|target| (Direction::Down, target))
            }
            Direction::Down => {
                if let Some(target) = self.nearest_below(floor) {
                    return Some((Direction::Down, target));
                }
                // Mirror of the up case.
                if let Some(reverse) = self.down_reverse_floor {
                    if floor > reverse {
                        return Some((Direction::Down, reverse));
                    }
                }
                self.nearest_above(floor).map(|target| (Direction::Up, target))
            }
            Direction::Idle => None,
        }
    }
}
