/*
 * Unit tests for the console display and input parsing
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_display_floor_strip
 * - test_display_status_text
 * - test_display_render_json
 * - test_display_run_coalesces_snapshots
 * - test_input_parse_command
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod display_tests {
    use crate::config::DisplayConfig;
    use crate::display::{floor_strip, parse_command, ConsoleDisplay, InputCommand};
    use crate::shared::{Direction, DoorPhase, ElevatorEvent, ElevatorSnapshot, MovementPhase};
    use crossbeam_channel::unbounded;
    use std::time::Duration;

    fn snapshot(current_floor: u8, movement: MovementPhase, door: DoorPhase) -> ElevatorSnapshot {
        ElevatorSnapshot {
            current_floor,
            direction: Direction::Idle,
            movement,
            door,
            door_countdown: 0,
            target_floor: None,
            requests: vec![],
        }
    }

    #[test]
    fn test_display_floor_strip() {
        // Arrange
        let mut state = snapshot(2, MovementPhase::Moving, DoorPhase::Closed);
        state.direction = Direction::Up;
        state.target_floor = Some(4);
        state.requests = vec![4];

        // Act
        let strip = floor_strip(&state, 5);

        // Assert
        assert_eq!(strip, "1 [2^] 3 4* 5");
    }

    #[test]
    fn test_display_status_text() {
        // Arrange
        let mut moving = snapshot(2, MovementPhase::Moving, DoorPhase::Closed);
        moving.direction = Direction::Down;
        moving.target_floor = Some(1);
        let mut open = snapshot(3, MovementPhase::StoppedAtFloor, DoorPhase::Open);
        open.door_countdown = 2;
        let closing = snapshot(3, MovementPhase::StoppedAtFloor, DoorPhase::Closing);
        let idle = snapshot(7, MovementPhase::Idle, DoorPhase::Closed);

        // Assert
        assert_eq!(moving.status_text(), "Moving down to floor 1");
        assert_eq!(open.status_text(), "Doors open at floor 3 (2)");
        assert_eq!(closing.status_text(), "Doors closing at floor 3");
        assert_eq!(idle.status_text(), "Idle at floor 7");
    }

    #[test]
    fn test_display_render_json() {
        // Arrange
        let (_event_tx, event_rx) = unbounded::<ElevatorEvent>();
        let (_terminate_tx, terminate_rx) = unbounded::<()>();
        let config = DisplayConfig {
            render_interval_ms: 10,
            json: true,
        };
        let display = ConsoleDisplay::new(&config, 5, event_rx, terminate_rx);
        let mut state = snapshot(3, MovementPhase::StoppedAtFloor, DoorPhase::Opening);
        state.requests = vec![1, 5];

        // Act
        let line = display.render(&state);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();

        // Assert
        assert_eq!(parsed["currentFloor"], 3);
        assert_eq!(parsed["door"], "opening");
        assert_eq!(parsed["movement"], "stoppedAtFloor");
        assert_eq!(parsed["requests"], serde_json::json!([1, 5]));
    }

    #[test]
    fn test_display_run_coalesces_snapshots() {
        // Purpose: snapshots arriving faster than the render interval collapse
        // into the newest one, chimes are always printed

        // Arrange
        let (event_tx, event_rx) = unbounded::<ElevatorEvent>();
        let (_terminate_tx, terminate_rx) = unbounded::<()>();
        let config = DisplayConfig {
            render_interval_ms: 60_000,
            json: false,
        };
        let display = ConsoleDisplay::new(&config, 3, event_rx, terminate_rx);

        // Act
        event_tx
            .send(ElevatorEvent::StateChanged(snapshot(1, MovementPhase::Moving, DoorPhase::Closed)))
            .unwrap();
        event_tx.send(ElevatorEvent::ArrivalChime { floor: 2 }).unwrap();
        event_tx
            .send(ElevatorEvent::StateChanged(snapshot(
                2,
                MovementPhase::StoppedAtFloor,
                DoorPhase::Opening,
            )))
            .unwrap();
        drop(event_tx);
        let mut out: Vec<u8> = Vec::new();
        display.run(&mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        // Assert
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec!["*ding* floor 2", "1 [2] 3 | Doors opening at floor 2"]);
    }

    #[test]
    fn test_input_parse_command() {
        // Assert
        assert_eq!(parse_command("7"), Ok(InputCommand::Request(7)));
        assert_eq!(parse_command("  STOP "), Ok(InputCommand::ForceStop));
        assert_eq!(parse_command("close"), Ok(InputCommand::ForceCloseDoors));
        assert_eq!(parse_command("halt"), Ok(InputCommand::Halt));
        assert_eq!(parse_command("status"), Ok(InputCommand::Status));
        assert_eq!(parse_command("quit"), Ok(InputCommand::Quit));
        assert_eq!(
            parse_command("wait 250"),
            Ok(InputCommand::Wait(Duration::from_millis(250)))
        );
        assert!(parse_command("").is_err());
        assert!(parse_command("wait").is_err());
        assert!(parse_command("up").is_err());
        assert!(parse_command("300").is_err());
    }
}
