use crate::config::ElevatorConfig;
use crate::elevator::fsm::ElevatorFSM;
use crate::shared::{ElevatorError, ElevatorEvent, ElevatorSnapshot, RequestOutcome};
use crossbeam_channel as cbc;
use log::{debug, info};
use std::thread::{Builder, JoinHandle};
use std::time::{Duration, Instant};

/***************************************/
/*               Enums                 */
/***************************************/
/// Calls from the display/input side. Each carries its own reply channel.
pub enum Command {
    Request {
        floor: u8,
        reply: cbc::Sender<Result<RequestOutcome, ElevatorError>>,
    },
    ForceStop {
        reply: cbc::Sender<()>,
    },
    ForceCloseDoors {
        reply: cbc::Sender<Result<(), ElevatorError>>,
    },
    Halt {
        reply: cbc::Sender<()>,
    },
    Snapshot {
        reply: cbc::Sender<ElevatorSnapshot>,
    },
    Subscribe {
        subscriber: cbc::Sender<ElevatorEvent>,
    },
}

/**
 * Single owner of the elevator state.
 *
 * Runs on its own thread and applies commands and timer transitions one at a
 * time, so no two transitions ever interleave.
 *
 * # Fields
 * - `fsm`:             The dispatch and door-cycle state machine.
 * - `epoch`:           Wall-clock instant mapped to time zero of the FSM.
 * - `command_rx`:      Receives commands from `ElevatorHandle`.
 * - `terminate_rx`:    Receives the shutdown signal.
 */
pub struct ElevatorController {
    fsm: ElevatorFSM,
    epoch: Instant,
    command_rx: cbc::Receiver<Command>,
    terminate_rx: cbc::Receiver<()>,
}

impl ElevatorController {
    pub fn new(
        config: &ElevatorConfig,
        command_rx: cbc::Receiver<Command>,
        terminate_rx: cbc::Receiver<()>,
    ) -> ElevatorController {
        ElevatorController {
            fsm: ElevatorFSM::new(config),
            epoch: Instant::now(),
            command_rx,
            terminate_rx,
        }
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    pub fn run(mut self) {
        info!("Elevator controller started with {} floors", self.fsm.n_floors());

        loop {
            let timeout = match self.fsm.next_deadline() {
                Some(deadline) => cbc::at(self.epoch + deadline),
                None => cbc::never(),
            };

            cbc::select! {
                recv(self.terminate_rx) -> _ => {
                    break;
                }
                recv(self.command_rx) -> command => {
                    match command {
                        Ok(command) => self.handle_command(command),
                        Err(_) => break,
                    }
                }
                recv(timeout) -> _ => {
                    // Commands issued before the deadline go first.
                    self.drain_commands();
                    let now = self.now();
                    self.fsm.advance(now);
                }
            }
        }

        self.fsm.halt_all_operations();
        info!("Elevator controller stopped");
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: Command) {
        let now = self.now();
        match command {
            Command::Request { floor, reply } => {
                let _ = reply.send(self.fsm.request(floor, now));
            }
            Command::ForceStop { reply } => {
                self.fsm.force_stop_elevator(now);
                let _ = reply.send(());
            }
            Command::ForceCloseDoors { reply } => {
                let _ = reply.send(self.fsm.force_close_doors(now));
            }
            Command::Halt { reply } => {
                self.fsm.halt_all_operations();
                let _ = reply.send(());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.fsm.snapshot());
            }
            Command::Subscribe { subscriber } => {
                debug!("New subscriber");
                let initial = ElevatorEvent::StateChanged(self.fsm.snapshot());
                if subscriber.send(initial).is_ok() {
                    self.fsm.add_subscriber(subscriber);
                }
            }
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
/**
 * Handle held by the display/input collaborator.
 *
 * Every call is queued on the controller thread and waits for its result, so
 * calls are linearized against timer transitions. Dropping the handle stops the
 * controller thread.
 */
pub struct ElevatorHandle {
    command_tx: cbc::Sender<Command>,
    terminate_tx: cbc::Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl ElevatorHandle {
    pub fn spawn(config: &ElevatorConfig) -> std::io::Result<ElevatorHandle> {
        let (command_tx, command_rx) = cbc::unbounded::<Command>();
        let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();

        let controller = ElevatorController::new(config, command_rx, terminate_rx);
        let thread = Builder::new()
            .name("elevator_controller".into())
            .spawn(move || controller.run())?;

        Ok(ElevatorHandle {
            command_tx,
            terminate_tx,
            thread: Some(thread),
        })
    }

    fn call<T>(&self, command: impl FnOnce(cbc::Sender<T>) -> Command) -> Result<T, ElevatorError> {
        let (reply_tx, reply_rx) = cbc::bounded::<T>(1);
        self.command_tx
            .send(command(reply_tx))
            .map_err(|_| ElevatorError::ControllerGone)?;
        reply_rx.recv().map_err(|_| ElevatorError::ControllerGone)
    }

    pub fn request(&self, floor: u8) -> Result<RequestOutcome, ElevatorError> {
        self.call(|reply| Command::Request { floor, reply })?
    }

    pub fn force_stop_elevator(&self) -> Result<(), ElevatorError> {
        self.call(|reply| Command::ForceStop { reply })
    }

    pub fn force_close_doors(&self) -> Result<(), ElevatorError> {
        self.call(|reply| Command::ForceCloseDoors { reply })?
    }

    pub fn halt_all_operations(&self) -> Result<(), ElevatorError> {
        self.call(|reply| Command::Halt { reply })
    }

    pub fn snapshot(&self) -> Result<ElevatorSnapshot, ElevatorError> {
        self.call(|reply| Command::Snapshot { reply })
    }

    /// The first event on the returned channel is the current state.
    pub fn subscribe(&self) -> Result<cbc::Receiver<ElevatorEvent>, ElevatorError> {
        let (tx, rx) = cbc::unbounded::<ElevatorEvent>();
        self.command_tx
            .send(Command::Subscribe { subscriber: tx })
            .map_err(|_| ElevatorError::ControllerGone)?;
        Ok(rx)
    }

    /// Halts the car and joins the controller thread.
    pub fn shutdown(self) {
        let _ = self.halt_all_operations();
    }
}

impl Drop for ElevatorHandle {
    fn drop(&mut self) {
        let _ = self.terminate_tx.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
