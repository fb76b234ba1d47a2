pub mod controller;
pub mod fsm;
pub mod requests;
pub mod timer;

mod requests_tests;

pub use controller::{ElevatorController, ElevatorHandle};
pub use fsm::ElevatorFSM;
pub use requests::RequestSet;
pub use timer::{TimerHandle, TimerKind, TimerQueue};
