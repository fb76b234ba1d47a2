use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/***************************************/
/*               Enums                 */
/***************************************/
/// The transition a timer applies when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Dispatch,
    FloorStep,
    Settle { open_doors: bool },
    DoorOpened,
    DwellTick,
    CloseDoors,
    DoorClosed,
}

/// Timers in the same slot replace each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSlot {
    Movement,
    Door,
    Dwell,
}

impl TimerKind {
    pub fn slot(&self) -> TimerSlot {
        match self {
            TimerKind::Dispatch | TimerKind::FloorStep | TimerKind::Settle { .. } => {
                TimerSlot::Movement
            }
            TimerKind::DoorOpened | TimerKind::CloseDoors | TimerKind::DoorClosed => {
                TimerSlot::Door
            }
            TimerKind::DwellTick => TimerSlot::Dwell,
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    id: u64,
}

/**
 * Pending timers ordered by deadline, then by the order they were scheduled in.
 *
 * Time is an offset from an arbitrary epoch chosen by the owner, so the queue
 * works the same on a wall clock and on virtual time.
 */
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: BTreeMap<(Duration, u64), TimerKind>,
    deadlines: HashMap<u64, Duration>,
}

impl TimerQueue {
    pub fn new() -> TimerQueue {
        TimerQueue::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, at: Duration) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert((at, id), kind);
        self.deadlines.insert(id, at);
        TimerHandle { id }
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle.id) {
            Some(at) => self.pending.remove(&(at, handle.id)).is_some(),
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(at, _)| *at)
    }

    /// Removes and returns the earliest timer whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, Duration, TimerKind)> {
        let (&(at, id), _) = self.pending.iter().next()?;
        if at > now {
            return None;
        }
        let kind = self.pending.remove(&(at, id))?;
        self.deadlines.remove(&id);
        Some((TimerHandle { id }, at, kind))
    }
}
