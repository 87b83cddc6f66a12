//! Custom assertion helpers shared by domain test suites.

use uuid::Uuid;

/// Assert that two floats are within `epsilon` of each other.
///
/// # Panics
/// Panics with a labeled message when the values differ by more than
/// `epsilon`.
pub fn assert_close(actual: f64, expected: f64, epsilon: f64, label: &str) {
    assert!(
        (actual - expected).abs() <= epsilon,
        "{}: expected {} within ±{}, got {}",
        label,
        expected,
        epsilon,
        actual
    );
}

/// Assert that two UUIDs are equal with a labeled message.
pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, label: &str) {
    assert_eq!(actual, expected, "{}: uuid mismatch", label);
}

/// Unwrap an Option in tests with a labeled message.
pub fn assert_some<T>(value: Option<T>, label: &str) -> T {
    match value {
        Some(v) => v,
        None => panic!("{}: expected Some, got None", label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_close_within_epsilon() {
        assert_close(1.0000001, 1.0, 1e-3, "close");
    }

    #[test]
    #[should_panic(expected = "too_far")]
    fn test_assert_close_panics_outside_epsilon() {
        assert_close(1.1, 1.0, 1e-3, "too_far");
    }

    #[test]
    fn test_assert_some_returns_value() {
        assert_eq!(assert_some(Some(7), "seven"), 7);
    }
}
