/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::cmp::Ordering;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    /// Direction of travel needed to get from `from` to `to`.
    pub fn towards(from: u8, to: u8) -> Direction {
        match to.cmp(&from) {
            Ordering::Greater => Direction::Up,
            Ordering::Less => Direction::Down,
            Ordering::Equal => Direction::Idle,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementPhase {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "moving")]
    Moving,
    #[serde(rename = "stoppedAtFloor")]
    StoppedAtFloor,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DoorPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Which way to head when two pending floors are equally far from the car.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    #[serde(rename = "up")]
    PreferUp,
    #[serde(rename = "down")]
    PreferDown,
}

impl Default for TieBreak {
    fn default() -> Self {
        TieBreak::PreferUp
    }
}

/// Result of a successful `request` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Queued,
    Cancelled,
    AlreadyAtFloor,
}

/**
 * Read-only view of the car, published after every transition.
 *
 * # Fields
 * - `current_floor`:       Floor the car is at, or last passed while moving.
 * - `direction`:           Scan direction.
 * - `movement`:            Movement phase.
 * - `door`:                Door phase.
 * - `door_countdown`:      Remaining dwell in time-units, informational only.
 * - `target_floor`:        Destination of the active floor progression, if any.
 * - `requests`:            Pending floors in ascending order.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ElevatorSnapshot {
    #[serde(rename = "currentFloor")]
    pub current_floor: u8,
    pub direction: Direction,
    pub movement: MovementPhase,
    pub door: DoorPhase,
    #[serde(rename = "doorCountdown")]
    pub door_countdown: u32,
    #[serde(rename = "targetFloor")]
    pub target_floor: Option<u8>,
    pub requests: Vec<u8>,
}

impl ElevatorSnapshot {
    pub fn is_queued(&self, floor: u8) -> bool {
        self.requests.binary_search(&floor).is_ok()
    }

    /// Human readable one-liner for the display.
    pub fn status_text(&self) -> String {
        let floor = self.current_floor;
        match (self.movement, self.door) {
            (MovementPhase::StoppedAtFloor, DoorPhase::Opening) => {
                format!("Doors opening at floor {}", floor)
            }
            (MovementPhase::StoppedAtFloor, DoorPhase::Open) => {
                format!("Doors open at floor {} ({})", floor, self.door_countdown)
            }
            (MovementPhase::StoppedAtFloor, DoorPhase::Closing) => {
                format!("Doors closing at floor {}", floor)
            }
            (MovementPhase::StoppedAtFloor, DoorPhase::Closed) => {
                format!("Stopped at floor {}", floor)
            }
            (MovementPhase::Moving, _) => match (self.direction, self.target_floor) {
                (Direction::Up, Some(target)) => format!("Moving up to floor {}", target),
                (Direction::Down, Some(target)) => format!("Moving down to floor {}", target),
                _ => format!("Departing floor {}", floor),
            },
            (MovementPhase::Idle, _) => format!("Idle at floor {}", floor),
        }
    }
}

/// Notifications delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElevatorEvent {
    StateChanged(ElevatorSnapshot),
    ArrivalChime { floor: u8 },
}
