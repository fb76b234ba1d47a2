//! Dispatch and door-cycle controller for a single elevator car.
//!
//! The car serves floors `1..=n_floors`. Floor requests go in through
//! [`ElevatorHandle`] (or directly into an [`ElevatorFSM`] driven with explicit
//! time), and every state change comes back out as an [`ElevatorEvent`].

pub mod config;
pub mod display;
pub mod elevator;
pub mod shared;

mod config_tests;

pub use config::{Config, DisplayConfig, ElevatorConfig};
pub use elevator::{ElevatorController, ElevatorFSM, ElevatorHandle, RequestSet};
pub use shared::{
    ConfigError, Direction, DoorPhase, ElevatorError, ElevatorEvent, ElevatorSnapshot,
    MovementPhase, RequestOutcome, TieBreak,
};
