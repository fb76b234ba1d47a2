/* 3rd party libraries */
use clap::Parser;
use crossbeam_channel as cbc;
use log::{info, warn};
use std::io::{self, BufRead};
use std::thread::{sleep, Builder};

/* Custom libraries */
use elevator_dispatch::config::{self, DEFAULT_CONFIG_PATH};
use elevator_dispatch::display::{parse_command, ConsoleDisplay, InputCommand};
use elevator_dispatch::unwrap_or_exit;
use elevator_dispatch::ElevatorHandle;

#[derive(Parser, Debug)]
#[clap(name = "elevator_dispatch", about = "Single car elevator simulator")]
struct Args {
    /// Path to the TOML configuration file
    #[clap(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Override the number of floors
    #[clap(long)]
    floors: Option<u8>,

    /// Comma separated commands to run before reading stdin, e.g. "5,3,wait 6000"
    #[clap(long)]
    script: Option<String>,

    /// Render state as JSON lines
    #[clap(long)]
    json: bool,
}

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Load the configuration
    let mut config = unwrap_or_exit!(config::load_config(&args.config));
    if let Some(n_floors) = args.floors {
        config.elevator.n_floors = n_floors;
    }
    if args.json {
        config.display.json = true;
    }
    unwrap_or_exit!(config.validate());

    // Start the controller
    let elevator = unwrap_or_exit!(ElevatorHandle::spawn(&config.elevator));
    let event_rx = unwrap_or_exit!(elevator.subscribe());

    // Start the display
    let (display_terminate_tx, display_terminate_rx) = cbc::unbounded::<()>();
    let display = ConsoleDisplay::new(
        &config.display,
        config.elevator.n_floors,
        event_rx,
        display_terminate_rx,
    );
    let display_thread = unwrap_or_exit!(Builder::new()
        .name("display".into())
        .spawn(move || display.run(&mut io::stdout())));

    let scripted = args
        .script
        .as_deref()
        .map(|script| script.split(',').map(str::to_string).collect::<Vec<String>>())
        .unwrap_or_default();

    let mut running = true;
    for line in scripted {
        if !handle_input(&elevator, &line) {
            running = false;
            break;
        }
    }

    if running {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    if !handle_input(&elevator, &line) {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    }

    // Teardown
    elevator.shutdown();
    let _ = display_terminate_tx.send(());
    match display_thread.join() {
        Ok(Err(e)) => warn!("Display stopped with error: {}", e),
        Err(_) => warn!("Display thread panicked"),
        Ok(Ok(())) => {}
    }
}

/// Returns false when the user asked to quit.
fn handle_input(elevator: &ElevatorHandle, line: &str) -> bool {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => {
            warn!("{}", e);
            return true;
        }
    };

    let result = match command {
        InputCommand::Request(floor) => elevator.request(floor).map(|outcome| {
            info!("Floor {}: {:?}", floor, outcome);
        }),
        InputCommand::ForceStop => elevator.force_stop_elevator(),
        InputCommand::ForceCloseDoors => elevator.force_close_doors(),
        InputCommand::Halt => elevator.halt_all_operations(),
        InputCommand::Status => elevator.snapshot().map(|snapshot| {
            info!("{} | queued: {:?}", snapshot.status_text(), snapshot.requests);
        }),
        InputCommand::Wait(duration) => {
            sleep(duration);
            Ok(())
        }
        InputCommand::Quit => return false,
    };

    if let Err(e) = result {
        warn!("{}", e);
    }
    true
}
