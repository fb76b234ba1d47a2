/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{ConfigError, TieBreak};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub elevator: ElevatorConfig,
    pub display: DisplayConfig,
}

/**
 * Timing and layout of the car. All durations are in milliseconds.
 *
 * # Fields
 * - `n_floors`:                Number of floors served, floors are numbered 1..=n_floors.
 * - `floor_travel_time_ms`:    Time to travel one floor.
 * - `door_opening_time_ms`:    Time from Opening to Open.
 * - `door_dwell_time_ms`:      Time the doors stay Open before closing on their own.
 * - `door_closing_time_ms`:    Time from Closing to Closed.
 * - `countdown_tick_ms`:       Length of one countdown time-unit while the doors are Open.
 * - `settle_time_ms`:          Delay after an emergency stop before doors open or the scan resumes.
 * - `dispatch_delay_ms`:       Delay from the first request on an idle car to the journey start.
 * - `tie_break`:               Direction preferred when two pending floors are equally near.
 */
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    pub n_floors: u8,
    pub floor_travel_time_ms: u64,
    pub door_opening_time_ms: u64,
    pub door_dwell_time_ms: u64,
    pub door_closing_time_ms: u64,
    pub countdown_tick_ms: u64,
    pub settle_time_ms: u64,
    pub dispatch_delay_ms: u64,
    pub tie_break: TieBreak,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub render_interval_ms: u64,
    pub json: bool,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        ElevatorConfig {
            n_floors: 20,
            floor_travel_time_ms: 800,
            door_opening_time_ms: 100,
            door_dwell_time_ms: 3000,
            door_closing_time_ms: 100,
            countdown_tick_ms: 1000,
            settle_time_ms: 500,
            dispatch_delay_ms: 50,
            tie_break: TieBreak::PreferUp,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            render_interval_ms: 100,
            json: false,
        }
    }
}

impl ElevatorConfig {
    pub fn floor_travel_time(&self) -> Duration {
        Duration::from_millis(self.floor_travel_time_ms)
    }

    pub fn door_opening_time(&self) -> Duration {
        Duration::from_millis(self.door_opening_time_ms)
    }

    pub fn door_dwell_time(&self) -> Duration {
        Duration::from_millis(self.door_dwell_time_ms)
    }

    pub fn door_closing_time(&self) -> Duration {
        Duration::from_millis(self.door_closing_time_ms)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }

    pub fn settle_time(&self) -> Duration {
        Duration::from_millis(self.settle_time_ms)
    }

    pub fn dispatch_delay(&self) -> Duration {
        Duration::from_millis(self.dispatch_delay_ms)
    }

    /// Countdown value shown when the doors reach Open.
    pub fn dwell_countdown_start(&self) -> u32 {
        if self.countdown_tick_ms == 0 {
            return 0;
        }
        let ticks = (self.door_dwell_time_ms + self.countdown_tick_ms - 1) / self.countdown_tick_ms;
        ticks as u32
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elevator.n_floors == 0 {
            return Err(ConfigError::Invalid("n_floors must be at least 1".into()));
        }
        if self.elevator.countdown_tick_ms == 0 {
            return Err(ConfigError::Invalid(
                "countdown_tick_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

/// Loads `path`. A missing file at the default path falls back to defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(config_str) => parse_config(&config_str),
        Err(e) if e.kind() == io::ErrorKind::NotFound && path == Path::new(DEFAULT_CONFIG_PATH) => {
            log::info!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
            Ok(Config::default())
        }
        Err(e) => Err(ConfigError::Io(e)),
    }
}
