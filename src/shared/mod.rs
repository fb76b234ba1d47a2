pub mod error;
pub mod macros;
pub mod structs;

pub use error::ConfigError;
pub use error::ElevatorError;
pub use structs::Direction;
pub use structs::DoorPhase;
pub use structs::ElevatorEvent;
pub use structs::ElevatorSnapshot;
pub use structs::MovementPhase;
pub use structs::RequestOutcome;
pub use structs::TieBreak;
