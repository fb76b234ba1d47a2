use std::time::Duration;

/// A line typed at the console, or one entry of a `--script`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Request(u8),
    ForceStop,
    ForceCloseDoors,
    Halt,
    Status,
    Wait(Duration),
    Quit,
}

pub fn parse_command(line: &str) -> Result<InputCommand, String> {
    let line = line.trim().to_lowercase();
    let mut words = line.split_whitespace();
    let command = match words.next() {
        Some(word) => word,
        None => return Err("empty command".into()),
    };

    match command {
        "stop" => Ok(InputCommand::ForceStop),
        "close" => Ok(InputCommand::ForceCloseDoors),
        "halt" => Ok(InputCommand::Halt),
        "status" => Ok(InputCommand::Status),
        "quit" | "exit" => Ok(InputCommand::Quit),
        "wait" => {
            let ms = words
                .next()
                .ok_or_else(|| "wait needs a duration in milliseconds".to_string())?;
            ms.parse::<u64>()
                .map(|ms| InputCommand::Wait(Duration::from_millis(ms)))
                .map_err(|_| format!("invalid duration '{}'", ms))
        }
        floor => floor
            .parse::<u8>()
            .map(InputCommand::Request)
            .map_err(|_| format!("unknown command '{}'", floor)),
    }
}
