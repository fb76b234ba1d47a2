use crate::config::ElevatorConfig;
use crate::elevator::requests::RequestSet;
use crate::elevator::timer::{TimerHandle, TimerKind, TimerQueue, TimerSlot};
use crate::shared::{
    Direction, DoorPhase, ElevatorError, ElevatorEvent, ElevatorSnapshot, MovementPhase,
    RequestOutcome,
};
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use std::time::Duration;

/**
 * Dispatch and door-cycle state machine for a single car.
 *
 * The FSM never reads a clock. Every operation that may schedule a timer takes
 * `now`, an offset from an epoch chosen by the owner, and pending timers are
 * applied by calling `advance`. The controller thread maps wall-clock time onto
 * this; tests drive it with virtual time.
 *
 * # Fields
 * - `config`:              Floor count, durations and tie-break policy.
 * - `current_floor`:       Floor the car is at, or last passed while moving.
 * - `direction`:           Scan direction.
 * - `movement`:            Idle, Moving or StoppedAtFloor.
 * - `door`:                Closed, Opening, Open or Closing.
 * - `door_countdown`:      Remaining dwell in time-units while the doors are Open.
 * - `target_floor`:        Destination of the active floor progression.
 * - `requests`:            Pending floors with their reverse floors.
 * - `timers`:              Pending timed transitions.
 * - `movement_timer`:      Dispatch, floor step or settle timer.
 * - `door_timer`:          Door phase timer.
 * - `dwell_timer`:         Countdown ticker while the doors are Open.
 * - `subscribers`:         Observers receiving an event after every transition.
 */
pub struct ElevatorFSM {
    config: ElevatorConfig,
    current_floor: u8,
    direction: Direction,
    movement: MovementPhase,
    door: DoorPhase,
    door_countdown: u32,
    target_floor: Option<u8>,
    requests: RequestSet,
    timers: TimerQueue,
    movement_timer: Option<TimerHandle>,
    door_timer: Option<TimerHandle>,
    dwell_timer: Option<TimerHandle>,
    subscribers: Vec<cbc::Sender<ElevatorEvent>>,
}

impl ElevatorFSM {
    pub fn new(config: &ElevatorConfig) -> ElevatorFSM {
        ElevatorFSM {
            config: config.clone(),
            current_floor: 1,
            direction: Direction::Idle,
            movement: MovementPhase::Idle,
            door: DoorPhase::Closed,
            door_countdown: 0,
            target_floor: None,
            requests: RequestSet::new(),
            timers: TimerQueue::new(),
            movement_timer: None,
            door_timer: None,
            dwell_timer: None,
            subscribers: Vec::new(),
        }
    }

    /***************************************/
    /*            Observation              */
    /***************************************/
    pub fn current_floor(&self) -> u8 {
        self.current_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn movement(&self) -> MovementPhase {
        self.movement
    }

    pub fn door(&self) -> DoorPhase {
        self.door
    }

    pub fn door_countdown(&self) -> u32 {
        self.door_countdown
    }

    pub fn target_floor(&self) -> Option<u8> {
        self.target_floor
    }

    pub fn requests(&self) -> &RequestSet {
        &self.requests
    }

    pub fn n_floors(&self) -> u8 {
        self.config.n_floors
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        ElevatorSnapshot {
            current_floor: self.current_floor,
            direction: self.direction,
            movement: self.movement,
            door: self.door,
            door_countdown: self.door_countdown,
            target_floor: self.target_floor,
            requests: self.requests.to_vec(),
        }
    }

    pub fn subscribe(&mut self) -> cbc::Receiver<ElevatorEvent> {
        let (tx, rx) = cbc::unbounded::<ElevatorEvent>();
        self.subscribers.push(tx);
        rx
    }

    pub fn add_subscriber(&mut self, tx: cbc::Sender<ElevatorEvent>) {
        self.subscribers.push(tx);
    }

    /***************************************/
    /*           Request intake            */
    /***************************************/
    /// Queues `floor`, or cancels it if it is already queued.
    pub fn request(&mut self, floor: u8, now: Duration) -> Result<RequestOutcome, ElevatorError> {
        if floor < 1 || floor > self.config.n_floors {
            warn!(
                "Rejected request for floor {} (valid floors are 1..={})",
                floor, self.config.n_floors
            );
            return Err(ElevatorError::FloorOutOfRange {
                floor,
                n_floors: self.config.n_floors,
            });
        }

        if floor == self.current_floor {
            debug!("Request for floor {} acknowledged, car is already there", floor);
            return Ok(RequestOutcome::AlreadyAtFloor);
        }

        let outcome = if self.requests.toggle(floor) {
            info!("Floor {} requested", floor);
            RequestOutcome::Queued
        } else {
            info!("Request for floor {} cancelled", floor);
            RequestOutcome::Cancelled
        };

        if outcome == RequestOutcome::Queued && self.movement == MovementPhase::Idle {
            self.schedule_dispatch(floor, now);
        }

        self.publish();
        Ok(outcome)
    }

    // Commits the car to moving and lets every request issued before the
    // dispatch timer fires take part in the initial direction choice.
    fn schedule_dispatch(&mut self, floor: u8, now: Duration) {
        self.movement = MovementPhase::Moving;
        self.direction = Direction::towards(self.current_floor, floor);
        self.start_timer(TimerKind::Dispatch, self.config.dispatch_delay(), now);
    }

    /***************************************/
    /*          Journey control            */
    /***************************************/
    pub fn begin_journey(&mut self, now: Duration) -> Result<(), ElevatorError> {
        if self.door != DoorPhase::Closed
            || self.target_floor.is_some()
            || (self.movement == MovementPhase::StoppedAtFloor && self.movement_timer.is_some())
        {
            return Err(self.reject("begin journey"));
        }

        if self.requests.is_empty() {
            self.go_idle();
            return Ok(());
        }

        self.direction = self
            .requests
            .choose_initial_direction(self.current_floor, self.config.tie_break);
        self.requests.recompute_reverse_floors();

        if self.requests.remove(self.current_floor) {
            self.stop_at_floor(now);
            return Ok(());
        }

        info!(
            "Journey started at floor {} heading {:?}",
            self.current_floor, self.direction
        );
        self.movement = MovementPhase::Moving;
        match self.next_floor_in_direction() {
            Some(target) => self.animate_floor_progression(self.current_floor, target, now),
            None => self.go_idle(),
        }
        Ok(())
    }

    /// Picks where to head next, reversing the scan only when nothing is left ahead.
    pub fn next_floor_in_direction(&mut self) -> Option<u8> {
        let (direction, target) = self
            .requests
            .next_floor_in_direction(self.direction, self.current_floor)?;
        if direction != self.direction {
            info!(
                "Reversing at floor {}: {:?} -> {:?}",
                self.current_floor, self.direction, direction
            );
            self.direction = direction;
        }
        Some(target)
    }

    /// Re-entry point into movement once the car is stopped with closed doors.
    pub fn check_for_next_movement(&mut self, now: Duration) {
        if self.door != DoorPhase::Closed {
            let _ = self.reject("check for next movement");
            return;
        }

        if self.requests.is_empty() {
            self.go_idle();
            return;
        }

        if self.direction == Direction::Idle {
            self.direction = self
                .requests
                .choose_initial_direction(self.current_floor, self.config.tie_break);
        }

        match self.next_floor_in_direction() {
            Some(target) => {
                self.movement = MovementPhase::Moving;
                self.animate_floor_progression(self.current_floor, target, now);
            }
            None => self.go_idle(),
        }
    }

    /// Emergency stop. Pending requests are kept.
    pub fn force_stop_elevator(&mut self, now: Duration) {
        info!("Emergency stop at floor {}", self.current_floor);
        self.cancel_timer(TimerSlot::Movement);
        self.target_floor = None;
        self.direction = Direction::Idle;

        if self.door != DoorPhase::Closed {
            // The running door cycle hands back to check_for_next_movement.
            self.publish();
            return;
        }

        if self.requests.remove(self.current_floor) {
            self.movement = MovementPhase::StoppedAtFloor;
            self.publish();
            self.start_timer(
                TimerKind::Settle { open_doors: true },
                self.config.settle_time(),
                now,
            );
        } else if self.requests.is_empty() {
            self.go_idle();
        } else {
            self.movement = MovementPhase::StoppedAtFloor;
            self.publish();
            self.start_timer(
                TimerKind::Settle { open_doors: false },
                self.config.settle_time(),
                now,
            );
        }
    }

    /// Cancels every timer and parks the car. Requests are left as they are.
    pub fn halt_all_operations(&mut self) {
        info!("Halting all operations at floor {}", self.current_floor);
        self.timers.cancel_all();
        self.movement_timer = None;
        self.door_timer = None;
        self.dwell_timer = None;

        self.movement = MovementPhase::Idle;
        self.door = DoorPhase::Closed;
        self.direction = Direction::Idle;
        self.door_countdown = 0;
        self.target_floor = None;
        self.publish();
    }

    /***************************************/
    /*              Movement               */
    /***************************************/
    pub fn animate_floor_progression(&mut self, from: u8, to: u8, now: Duration) {
        debug_assert_eq!(from, self.current_floor);
        debug!("Progressing from floor {} to floor {}", from, to);
        self.movement = MovementPhase::Moving;
        self.target_floor = Some(to);
        self.start_timer(TimerKind::FloorStep, self.config.floor_travel_time(), now);
        self.publish();
    }

    fn on_floor_step(&mut self, now: Duration) {
        let target = match self.target_floor {
            Some(target) => target,
            None => {
                warn!("Floor step fired without a destination");
                return;
            }
        };

        match Direction::towards(self.current_floor, target) {
            Direction::Up => self.current_floor += 1,
            Direction::Down => self.current_floor -= 1,
            Direction::Idle => {}
        }
        debug!("Car at floor {}", self.current_floor);

        if self.requests.remove(self.current_floor) {
            info!("Arrived at floor {}", self.current_floor);
            self.stop_at_floor(now);
        } else if self.current_floor == target {
            debug!("Floor {} is no longer requested", target);
            self.target_floor = None;
            self.publish();
            self.check_for_next_movement(now);
        } else {
            self.publish();
            self.start_timer(TimerKind::FloorStep, self.config.floor_travel_time(), now);
        }
    }

    fn stop_at_floor(&mut self, now: Duration) {
        self.cancel_timer(TimerSlot::Movement);
        self.movement = MovementPhase::StoppedAtFloor;
        self.target_floor = None;
        self.publish();
        let opened = self.open_doors(now);
        debug_assert!(opened.is_ok(), "{:?}", opened);
    }

    fn go_idle(&mut self) {
        self.cancel_timer(TimerSlot::Movement);
        self.movement = MovementPhase::Idle;
        self.direction = Direction::Idle;
        self.target_floor = None;
        info!("Idle at floor {}", self.current_floor);
        self.publish();
    }

    /***************************************/
    /*             Door cycle              */
    /***************************************/
    fn open_doors(&mut self, now: Duration) -> Result<(), ElevatorError> {
        if self.movement != MovementPhase::StoppedAtFloor || self.door != DoorPhase::Closed {
            return Err(self.reject("open doors"));
        }

        info!("Doors opening at floor {}", self.current_floor);
        self.door = DoorPhase::Opening;
        self.publish();
        self.notify(ElevatorEvent::ArrivalChime {
            floor: self.current_floor,
        });
        self.start_timer(TimerKind::DoorOpened, self.config.door_opening_time(), now);
        Ok(())
    }

    fn on_door_opened(&mut self, now: Duration) {
        self.door = DoorPhase::Open;
        self.door_countdown = self.config.dwell_countdown_start();
        self.publish();
        self.start_timer(TimerKind::CloseDoors, self.config.door_dwell_time(), now);
        if self.door_countdown > 0 {
            self.start_timer(TimerKind::DwellTick, self.config.countdown_tick(), now);
        }
    }

    fn on_dwell_tick(&mut self, now: Duration) {
        if self.door != DoorPhase::Open {
            return;
        }
        self.door_countdown = self.door_countdown.saturating_sub(1);
        debug!("Doors closing in {}", self.door_countdown);
        self.publish();
        if self.door_countdown > 0 {
            self.start_timer(TimerKind::DwellTick, self.config.countdown_tick(), now);
        }
    }

    fn close_doors(&mut self, now: Duration) {
        self.cancel_timer(TimerSlot::Dwell);
        info!("Doors closing at floor {}", self.current_floor);
        self.door = DoorPhase::Closing;
        self.door_countdown = 0;
        self.publish();
        self.start_timer(TimerKind::DoorClosed, self.config.door_closing_time(), now);
    }

    fn on_door_closed(&mut self, now: Duration) {
        self.door = DoorPhase::Closed;
        self.publish();
        self.check_for_next_movement(now);
    }

    /// Skips the rest of the dwell. Only legal while the doors are Open.
    pub fn force_close_doors(&mut self, now: Duration) -> Result<(), ElevatorError> {
        if self.door != DoorPhase::Open {
            return Err(self.reject("force close doors"));
        }
        self.cancel_timer(TimerSlot::Door);
        self.close_doors(now);
        Ok(())
    }

    /***************************************/
    /*               Timers                */
    /***************************************/
    /// Applies every timer due at or before `now`, in deadline order.
    pub fn advance(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        while let Some((handle, at, kind)) = self.timers.pop_due(now) {
            let slot = self.slot_mut(kind.slot());
            if *slot == Some(handle) {
                *slot = None;
            }
            self.fire(kind, at);
            fired += 1;
        }
        fired
    }

    fn fire(&mut self, kind: TimerKind, now: Duration) {
        debug!("Timer {:?} fired at {:?}", kind, now);
        match kind {
            TimerKind::Dispatch => {
                if self.begin_journey(now).is_err() {
                    self.go_idle();
                }
            }
            TimerKind::FloorStep => self.on_floor_step(now),
            TimerKind::Settle { open_doors: true } => {
                let opened = self.open_doors(now);
                debug_assert!(opened.is_ok(), "{:?}", opened);
            }
            TimerKind::Settle { open_doors: false } => self.check_for_next_movement(now),
            TimerKind::DoorOpened => self.on_door_opened(now),
            TimerKind::DwellTick => self.on_dwell_tick(now),
            TimerKind::CloseDoors => self.close_doors(now),
            TimerKind::DoorClosed => self.on_door_closed(now),
        }
    }

    fn slot_mut(&mut self, slot: TimerSlot) -> &mut Option<TimerHandle> {
        match slot {
            TimerSlot::Movement => &mut self.movement_timer,
            TimerSlot::Door => &mut self.door_timer,
            TimerSlot::Dwell => &mut self.dwell_timer,
        }
    }

    fn start_timer(&mut self, kind: TimerKind, delay: Duration, now: Duration) {
        self.cancel_timer(kind.slot());
        let handle = self.timers.schedule(kind, now + delay);
        debug!("Scheduled {:?} at {:?}", kind, now + delay);
        *self.slot_mut(kind.slot()) = Some(handle);
    }

    fn cancel_timer(&mut self, slot: TimerSlot) {
        if let Some(handle) = self.slot_mut(slot).take() {
            if self.timers.cancel(handle) {
                debug!("Cancelled {:?} timer", slot);
            }
        }
    }

    /***************************************/
    /*           Notifications             */
    /***************************************/
    fn publish(&mut self) {
        self.assert_invariants();
        let snapshot = self.snapshot();
        self.notify(ElevatorEvent::StateChanged(snapshot));
    }

    fn notify(&mut self, event: ElevatorEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn reject(&self, operation: &'static str) -> ElevatorError {
        warn!(
            "Rejected {}: doors {:?} while {:?}",
            operation, self.door, self.movement
        );
        ElevatorError::WrongPhase {
            operation,
            door: self.door,
            movement: self.movement,
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.current_floor >= 1 && self.current_floor <= self.config.n_floors,
            "floor {} out of range",
            self.current_floor
        );
        debug_assert!(
            self.door == DoorPhase::Closed || self.movement == MovementPhase::StoppedAtFloor,
            "doors {:?} while {:?}",
            self.door,
            self.movement
        );
        debug_assert!(
            !(self.movement == MovementPhase::StoppedAtFloor
                && self.door == DoorPhase::Closed
                && self.requests.contains(self.current_floor)),
            "stopped at floor {} with it still requested",
            self.current_floor
        );
        debug_assert!(
            self.movement != MovementPhase::Idle || self.target_floor.is_none(),
            "idle with a destination"
        );
        debug_assert!(
            self.movement != MovementPhase::Idle || self.timers.is_empty(),
            "idle with {} timers pending",
            self.timers.len()
        );
    }
}
