//! Pie / doughnut chart geometry.
//!
//! Angles are in radians, measured clockwise in image space (y down) from
//! the positive x axis, so slice 0 starts at 3 o'clock.

use std::f64::consts::TAU;
use tiny_skia::{Path, PathBuilder};

/// Maximum angle covered by one polyline step of an arc.
const ARC_STEP: f64 = std::f64::consts::PI / 48.0;

/// One drawn slice of a pie chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    /// Index of the value this slice represents; colors are keyed on it.
    pub slot: usize,
    pub start: f64,
    pub end: f64,
}

impl PieSlice {
    pub fn sweep(&self) -> f64 {
        self.end - self.start
    }
}

/// Slices for `values`, placed consecutively from angle 0.
///
/// Slice `i` sweeps `2π·v_i/T`. Zero values produce no slice; a zero total
/// produces no slices at all.
pub fn pie_slices(values: &[u32]) -> Vec<PieSlice> {
    let total: u64 = values.iter().map(|&v| v as u64).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut slices = Vec::with_capacity(values.len());
    let mut cumulative = 0u64;
    for (slot, &value) in values.iter().enumerate() {
        if value == 0 {
            continue;
        }
        let start = TAU * cumulative as f64 / total as f64;
        cumulative += value as u64;
        let end = TAU * cumulative as f64 / total as f64;
        slices.push(PieSlice { slot, start, end });
    }
    slices
}

/// Closed wedge from the center along the arc `start..end`.
pub fn wedge_path(cx: f32, cy: f32, radius: f32, start: f64, end: f64) -> Option<Path> {
    let sweep = end - start;
    if sweep <= 0.0 || radius <= 0.0 {
        return None;
    }

    let steps = (sweep / ARC_STEP).ceil().max(1.0) as usize;
    let point = |angle: f64| {
        (
            cx + radius * angle.cos() as f32,
            cy + radius * angle.sin() as f32,
        )
    };

    let mut pb = PathBuilder::new();
    pb.move_to(cx, cy);
    for i in 0..=steps {
        let (x, y) = point(start + sweep * i as f64 / steps as f64);
        pb.line_to(x, y);
    }
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_sweeps_sum_to_full_turn() {
        for values in [[5, 2, 13], [1, 0, 0], [0, 0, 7], [3, 3, 3], [1000, 1, 1]] {
            let total: f64 = pie_slices(&values).iter().map(PieSlice::sweep).sum();
            assert_approx_eq!(total, TAU, 1e-9);
        }
    }

    #[test]
    fn test_zero_total_has_no_slices() {
        assert!(pie_slices(&[0, 0, 0]).is_empty());
        assert!(pie_slices(&[]).is_empty());
    }

    #[test]
    fn test_slices_are_consecutive_from_zero() {
        let slices = pie_slices(&[1, 0, 3]);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].slot, 0);
        assert_eq!(slices[0].start, 0.0);
        assert_approx_eq!(slices[0].end, TAU / 4.0, 1e-12);
        assert_eq!(slices[1].slot, 2);
        assert_eq!(slices[1].start, slices[0].end);
        assert_eq!(slices[1].end, TAU);
    }

    #[test]
    fn test_wedge_path() {
        assert!(wedge_path(12.5, 12.5, 12.0, 0.0, TAU / 3.0).is_some());
        assert!(wedge_path(12.5, 12.5, 12.0, 1.0, 1.0).is_none());
        assert!(wedge_path(12.5, 12.5, 0.0, 0.0, 1.0).is_none());
    }
}
