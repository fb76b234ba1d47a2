/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::structs::{DoorPhase, MovementPhase};

/***************************************/
/*       Public data structures        */
/***************************************/
/// Precondition rejections. None of these change controller state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElevatorError {
    #[error("floor {floor} is outside 1..={n_floors}")]
    FloorOutOfRange { floor: u8, n_floors: u8 },

    #[error("{operation} not allowed with doors {door:?} while {movement:?}")]
    WrongPhase {
        operation: &'static str,
        door: DoorPhase,
        movement: MovementPhase,
    },

    #[error("elevator controller is no longer running")]
    ControllerGone,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
