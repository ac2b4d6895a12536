//! Shared test utilities for the station occupancy workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Registry and snapshot JSON builders
//! - Scratch snapshot folders with an index file
//! - Approximate equality assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{paris_registry, SnapshotFolder};
//! ```

pub mod fixtures;
pub mod folders;

pub use fixtures::*;
pub use folders::*;

/// Assert that two numbers differ by at most `epsilon`.
///
/// ```ignore
/// assert_approx_eq!(sweep, std::f64::consts::TAU, 1e-9);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $epsilon:expr) => {{
        let (actual, expected, epsilon) = ($actual as f64, $expected as f64, $epsilon as f64);
        assert!(
            (actual - expected).abs() <= epsilon,
            "expected {} within {} of {}, off by {}",
            actual,
            epsilon,
            expected,
            (actual - expected).abs()
        );
    }};
}

/// Assert that a GeoJSON point position `[lon, lat, alt]` sits at
/// `(lon, lat)` on the ground.
#[macro_export]
macro_rules! assert_position_approx_eq {
    ($position:expr, ($lon:expr, $lat:expr), $epsilon:expr) => {{
        let position: [f64; 3] = $position;
        $crate::assert_approx_eq!(position[0], $lon, $epsilon);
        $crate::assert_approx_eq!(position[1], $lat, $epsilon);
        assert_eq!(position[2], 0.0, "altitude must be 0");
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_within_epsilon() {
        assert_approx_eq!(0.1 + 0.2, 0.3, 1e-12);
        assert_approx_eq!(-2.5, -2.5000001, 1e-6);
    }

    #[test]
    #[should_panic(expected = "off by")]
    fn test_approx_eq_outside_epsilon() {
        assert_approx_eq!(48.86, 48.85, 1e-3);
    }

    #[test]
    fn test_position_at_paris_center() {
        let (lon, lat) = PARIS_CENTER;
        assert_position_approx_eq!([2.34880001, 48.8534, 0.0], (lon, lat), 1e-6);
    }
}
