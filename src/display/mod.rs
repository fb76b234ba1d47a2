pub mod input;

mod display_tests;

pub use input::{parse_command, InputCommand};

use crate::config::DisplayConfig;
use crate::shared::{Direction, ElevatorEvent, ElevatorSnapshot};
use crossbeam_channel as cbc;
use log::debug;
use std::io::{self, Write};
use std::time::Duration;

/**
 * Console rendering of the car.
 *
 * Observes the controller through its event channel and never touches
 * controller state. Snapshots are coalesced and rendered at most once per
 * `render_interval`; arrival chimes are printed as soon as they arrive.
 *
 * # Fields
 * - `event_rx`:            Events published by the controller.
 * - `terminate_rx`:        Receives the shutdown signal.
 * - `render_interval`:     Minimum time between two rendered snapshots.
 * - `json`:                Render snapshots as JSON lines instead of text.
 * - `n_floors`:            Number of floors drawn in the floor strip.
 * - `latest`:              Newest snapshot received.
 * - `last_rendered`:       Snapshot most recently written out.
 */
pub struct ConsoleDisplay {
    event_rx: cbc::Receiver<ElevatorEvent>,
    terminate_rx: cbc::Receiver<()>,
    render_interval: Duration,
    json: bool,
    n_floors: u8,
    latest: Option<ElevatorSnapshot>,
    last_rendered: Option<ElevatorSnapshot>,
}

impl ConsoleDisplay {
    pub fn new(
        config: &DisplayConfig,
        n_floors: u8,
        event_rx: cbc::Receiver<ElevatorEvent>,
        terminate_rx: cbc::Receiver<()>,
    ) -> ConsoleDisplay {
        ConsoleDisplay {
            event_rx,
            terminate_rx,
            render_interval: Duration::from_millis(config.render_interval_ms.max(1)),
            json: config.json,
            n_floors,
            latest: None,
            last_rendered: None,
        }
    }

    pub fn run<W: Write>(mut self, out: &mut W) -> io::Result<()> {
        let ticker = cbc::tick(self.render_interval);

        loop {
            cbc::select! {
                recv(self.event_rx) -> event => {
                    match event {
                        Ok(ElevatorEvent::StateChanged(snapshot)) => self.latest = Some(snapshot),
                        Ok(ElevatorEvent::ArrivalChime { floor }) => {
                            writeln!(out, "*ding* floor {}", floor)?;
                        }
                        Err(_) => {
                            debug!("Event channel closed");
                            break;
                        }
                    }
                }
                recv(ticker) -> _ => self.flush(out)?,
                recv(self.terminate_rx) -> _ => break,
            }
        }

        self.flush(out)?;
        out.flush()
    }

    fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.latest.is_none() || self.latest == self.last_rendered {
            return Ok(());
        }
        if let Some(snapshot) = self.latest.take() {
            writeln!(out, "{}", self.render(&snapshot))?;
            self.last_rendered = Some(snapshot);
        }
        Ok(())
    }

    pub fn render(&self, snapshot: &ElevatorSnapshot) -> String {
        if self.json {
            return serde_json::to_string(snapshot).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e));
        }
        format!(
            "{} | {}",
            floor_strip(snapshot, self.n_floors),
            snapshot.status_text()
        )
    }
}

/// One cell per floor: the car as `[n]` with a direction arrow, queued floors with `*`.
pub fn floor_strip(snapshot: &ElevatorSnapshot, n_floors: u8) -> String {
    (1..=n_floors)
        .map(|floor| {
            if floor == snapshot.current_floor {
                let arrow = match snapshot.direction {
                    Direction::Up => "^",
                    Direction::Down => "v",
                    Direction::Idle => "",
                };
                format!("[{}{}]", floor, arrow)
            } else if snapshot.is_queued(floor) {
                format!("{}*", floor)
            } else {
                floor.to_string()
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
