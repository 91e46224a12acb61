//! Grid snapping. A grid of zero (or less) disables snapping.

use egui::{pos2, Pos2};

/// Rounds `value` to the nearest multiple of `grid`.
pub fn snap(value: f32, grid: f32) -> f32 {
    if grid <= 0.0 || !value.is_finite() {
        return value;
    }
    (value / grid).round() * grid
}

pub fn snap_pos(point: Pos2, grid: f32) -> Pos2 {
    pos2(snap(point.x, grid), snap(point.y, grid))
}

/// Snaps an already clamped `value` to the nearest grid multiple inside `[min, max]`.
///
/// When rounding lands outside the range the closest in-range multiple is used
/// instead; when the range holds no multiple at all the clamped value is kept.
pub fn snap_within(value: f32, grid: f32, min: f32, max: f32) -> f32 {
    let snapped = snap(value, grid);
    if grid <= 0.0 || (min..=max).contains(&snapped) {
        return snapped;
    }
    let inside = if snapped < min {
        (min / grid).ceil() * grid
    } else {
        (max / grid).floor() * grid
    };
    if (min..=max).contains(&inside) {
        inside
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest_not_down() {
        assert_eq!(snap(137.0, 8.0), 136.0);
        assert_eq!(snap(141.0, 8.0), 144.0);
        assert_eq!(snap(105.0, 8.0), 104.0);
        assert_eq!(snap(13.0, 0.0), 13.0);
    }

    #[test]
    fn snapping_respects_bounds() {
        // 50 would round down to 48, below the minimum
        assert_eq!(snap_within(50.0, 8.0, 50.0, 800.0), 56.0);
        assert_eq!(snap_within(1000.0, 8.0, 50.0, 1000.0), 1000.0);
        assert_eq!(snap_within(30.0, 8.0, 30.0, 1000.0), 32.0);
        // no multiple of 8 between 33 and 38
        assert_eq!(snap_within(35.0, 8.0, 33.0, 38.0), 35.0);
    }
}
