/*
 * Unit tests for configuration loading
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_config_defaults
 * - test_config_partial_file
 * - test_config_invalid
 * - test_config_missing_file
 * - test_config_countdown_start
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod config_tests {
    use crate::config::{load_config, parse_config, Config, ElevatorConfig, DEFAULT_CONFIG_PATH};
    use crate::shared::{ConfigError, TieBreak};

    #[test]
    fn test_config_defaults() {
        // Act
        let config = parse_config("").unwrap();

        // Assert
        assert_eq!(config, Config::default());
        assert_eq!(config.elevator.n_floors, 20);
        assert_eq!(config.elevator.floor_travel_time_ms, 800);
        assert_eq!(config.elevator.door_dwell_time_ms, 3000);
        assert_eq!(config.elevator.dispatch_delay_ms, 50);
        assert_eq!(config.elevator.tie_break, TieBreak::PreferUp);
        assert_eq!(config.display.render_interval_ms, 100);
    }

    #[test]
    fn test_config_partial_file() {
        // Arrange
        let config_str = r#"
            [elevator]
            n_floors = 8
            tie_break = "down"

            [display]
            json = true
        "#;

        // Act
        let config = parse_config(config_str).unwrap();

        // Assert
        assert_eq!(config.elevator.n_floors, 8);
        assert_eq!(config.elevator.tie_break, TieBreak::PreferDown);
        assert_eq!(config.elevator.door_opening_time_ms, 100);
        assert!(config.display.json);
    }

    #[test]
    fn test_config_invalid() {
        // Act
        let zero_floors = parse_config("[elevator]\nn_floors = 0\n");
        let zero_tick = parse_config("[elevator]\ncountdown_tick_ms = 0\n");
        let malformed = parse_config("[elevator\n");
        let bad_tie_break = parse_config("[elevator]\ntie_break = \"sideways\"\n");

        // Assert
        assert!(matches!(zero_floors, Err(ConfigError::Invalid(_))));
        assert!(matches!(zero_tick, Err(ConfigError::Invalid(_))));
        assert!(matches!(malformed, Err(ConfigError::Parse(_))));
        assert!(matches!(bad_tie_break, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_missing_file() {
        // Act
        let explicit = load_config("does/not/exist.toml");

        // Assert
        assert!(matches!(explicit, Err(ConfigError::Io(_))));
        if !std::path::Path::new(DEFAULT_CONFIG_PATH).exists() {
            assert_eq!(load_config(DEFAULT_CONFIG_PATH).unwrap(), Config::default());
        }
    }

    #[test]
    fn test_config_countdown_start() {
        // Arrange
        let exact = ElevatorConfig::default();
        let rounded_up = ElevatorConfig {
            door_dwell_time_ms: 2500,
            ..ElevatorConfig::default()
        };

        // Assert
        assert_eq!(exact.dwell_countdown_start(), 3);
        assert_eq!(rounded_up.dwell_countdown_start(), 3);
    }
}
