/*
 * Unit tests for the request set and scan target selection
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_requests_toggle
 * - test_requests_reverse_floors
 * - test_requests_choose_initial_direction
 * - test_requests_next_floor_up
 * - test_requests_next_floor_down
 * - test_requests_next_floor_idle
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod requests_tests {
    use crate::shared::Direction::{Down, Idle, Up};
    use crate::shared::TieBreak;
    use crate::RequestSet;

    fn request_set(floors: &[u8]) -> RequestSet {
        let mut requests = RequestSet::new();
        for &floor in floors {
            requests.insert(floor);
        }
        requests
    }

    #[test]
    fn test_requests_toggle() {
        // Arrange
        let mut requests = RequestSet::new();

        // Act
        let added = requests.toggle(4);
        let removed = requests.toggle(4);

        // Assert
        assert!(added);
        assert!(!removed);
        assert!(requests.is_empty());
    }

    #[test]
    fn test_requests_reverse_floors() {
        // Arrange
        let mut requests = request_set(&[8, 3, 12]);

        // Assert
        assert_eq!(requests.up_reverse_floor(), Some(12));
        assert_eq!(requests.down_reverse_floor(), Some(3));
        assert_eq!(requests.to_vec(), vec![3, 8, 12]);

        // Act
        requests.remove(12);
        requests.remove(3);

        // Assert
        assert_eq!(requests.up_reverse_floor(), Some(8));
        assert_eq!(requests.down_reverse_floor(), Some(8));

        requests.remove(8);
        assert_eq!(requests.up_reverse_floor(), None);
        assert_eq!(requests.down_reverse_floor(), None);
    }

    #[test]
    fn test_requests_choose_initial_direction() {
        // Arrange
        let nearer_below = request_set(&[8, 14]);
        let equidistant = request_set(&[5, 15]);
        let only_above = request_set(&[18]);
        let empty = RequestSet::new();

        // Assert
        assert_eq!(nearer_below.choose_initial_direction(10, TieBreak::PreferUp), Down);
        assert_eq!(equidistant.choose_initial_direction(10, TieBreak::PreferUp), Up);
        assert_eq!(equidistant.choose_initial_direction(10, TieBreak::PreferDown), Down);
        assert_eq!(only_above.choose_initial_direction(10, TieBreak::PreferDown), Up);
        assert_eq!(empty.choose_initial_direction(10, TieBreak::PreferUp), Idle);
    }

    #[test]
    fn test_requests_next_floor_up() {
        // Arrange
        let requests = request_set(&[2, 6, 9]);

        // Assert
        assert_eq!(requests.next_floor_in_direction(Up, 4), Some((Up, 6)));
        assert_eq!(requests.next_floor_in_direction(Up, 6), Some((Up, 9)));
        // Nothing left above, reverse to the nearest floor below
        assert_eq!(requests.next_floor_in_direction(Up, 10), Some((Down, 9)));
    }

    #[test]
    fn test_requests_next_floor_down() {
        // Arrange
        let requests = request_set(&[2, 6, 9]);

        // Assert
        assert_eq!(requests.next_floor_in_direction(Down, 8), Some((Down, 6)));
        assert_eq!(requests.next_floor_in_direction(Down, 2), Some((Up, 6)));
        assert_eq!(requests.next_floor_in_direction(Down, 1), Some((Up, 2)));
    }

    #[test]
    fn test_requests_next_floor_idle() {
        // Arrange
        let requests = request_set(&[3]);
        let empty = RequestSet::new();

        // Assert
        assert_eq!(requests.next_floor_in_direction(Idle, 1), None);
        assert_eq!(empty.next_floor_in_direction(Up, 1), None);
        assert_eq!(empty.next_floor_in_direction(Down, 5), None);
    }
}
