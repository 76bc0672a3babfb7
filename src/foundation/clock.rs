//! Frame clock: millisecond to frame conversion plus the geometry and gain clamps applied to
//! authored values before they reach the timeline.

use crate::foundation::core::{Canvas, Profile};

/// Smallest gain factor a sound can be attenuated to (-40 dB).
pub const MIN_GAIN_FACTOR: f64 = 0.01;
/// Largest gain factor a sound can be boosted to.
pub const MAX_GAIN_FACTOR: f64 = 1.5;
/// Smallest title font size in pixels.
pub const MIN_FONT_PX: i64 = 10;

/// Frame count for `duration_ms` at the storyboard profile rate, rounded to nearest.
///
/// Callers pass already-validated non-negative durations; each title, plan and sound segment
/// is converted on its own so rounding never accumulates across a beat.
pub fn frames_for(duration_ms: u64) -> u64 {
    Profile::HD_25.fps.ms_to_frames_round(duration_ms)
}

/// Frame count for a signed offset, split into `(lead_in, trim)`.
///
/// A positive offset delays the clip by a leading blank, a negative one trims the start of the
/// source instead. At most one of the two is non-zero.
pub fn offset_frames(offset_ms: i64) -> (u64, u64) {
    if offset_ms >= 0 {
        (frames_for(offset_ms.unsigned_abs()), 0)
    } else {
        (0, frames_for(offset_ms.unsigned_abs()))
    }
}

/// Clamp `value` into `[min, max]`.
pub fn clamp<T: PartialOrd>(min: T, max: T, value: T) -> T {
    debug_assert!(min <= max, "clamp called with min > max");
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Pixel box and font size of a title card on the canvas.
pub struct TitleGeometry {
    /// Left edge in pixels.
    pub x: i64,
    /// Top edge in pixels.
    pub y: i64,
    /// Box width in pixels.
    pub width: i64,
    /// Box height in pixels (from `y` down to the canvas bottom).
    pub height: i64,
    /// Font size in pixels.
    pub font_px: i64,
}

impl TitleGeometry {
    /// Resolve percentage geometry against `canvas`.
    ///
    /// `x`, `y` and `width` are percentages of the canvas width/height; `font_size` is a
    /// percentage of the canvas height.
    pub fn from_percent(x: f64, y: f64, width: f64, font_size: f64, canvas: Canvas) -> Self {
        let w = i64::from(canvas.width);
        let h = i64::from(canvas.height);

        let x = clamp(0, w, percent_of(x, w));
        let y = clamp(0, h, percent_of(y, h));
        let width = clamp(0, w - x, percent_of(width, w));
        let height = (h - y).max(0);
        let font_px = clamp(MIN_FONT_PX, h / 4, percent_of(font_size, h));

        Self {
            x,
            y,
            width,
            height,
            font_px,
        }
    }

    /// `"x y width height 1"` as consumed by the text filter.
    pub fn to_geometry_string(self) -> String {
        format!("{} {} {} {} 1", self.x, self.y, self.width, self.height)
    }
}

fn percent_of(percent: f64, extent: i64) -> i64 {
    let px = (percent * extent as f64 / 100.0).round();
    if px.is_finite() { px as i64 } else { 0 }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Volume converted to a clamped linear factor and its decibel level.
pub struct Gain {
    /// Linear factor in `[MIN_GAIN_FACTOR, MAX_GAIN_FACTOR]`.
    pub factor: f64,
    /// `20 * log10(factor)` rounded to two decimals.
    pub db: f64,
}

impl Gain {
    /// Convert a 0–100 volume percentage.
    pub fn from_volume_percent(volume: f64) -> Self {
        let factor = clamp(MIN_GAIN_FACTOR, MAX_GAIN_FACTOR, volume / 100.0);
        let db = (2000.0 * factor.log10()).round() / 100.0;
        Self { factor, db }
    }

    /// Unity gain needs no volume filter.
    pub fn is_unity(self) -> bool {
        self.factor == 1.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/clock.rs"]
mod tests;
