#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Rational frame rate.
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator (must be > 0).
    pub den: u32,
}

impl Fps {
    /// Convert milliseconds to the nearest whole frame count, ties away from zero.
    ///
    /// Exact integer arithmetic: `round(ms * num / (1000 * den))`.
    pub fn ms_to_frames_round(self, ms: u64) -> u64 {
        let num = u128::from(ms) * u128::from(self.num) * 2 + 1000 * u128::from(self.den);
        let den = 2000 * u128::from(self.den);
        u64::try_from(num / den).unwrap_or(u64::MAX)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Output canvas dimensions in pixels.
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Video profile written into the document header.
pub struct Profile {
    /// Output canvas.
    pub canvas: Canvas,
    /// Timeline frame rate.
    pub fps: Fps,
    /// Progressive (non-interlaced) output.
    pub progressive: bool,
    /// Sample aspect ratio as `(num, den)`.
    pub sample_aspect: (u32, u32),
    /// Colorspace identifier.
    pub colorspace: &'static str,
}

impl Profile {
    /// Full HD at 25 fps, the only profile storyboards are compiled to.
    pub const HD_25: Profile = Profile {
        canvas: Canvas {
            width: 1920,
            height: 1080,
        },
        fps: Fps { num: 25, den: 1 },
        progressive: true,
        sample_aspect: (1, 1),
        colorspace: "709",
    };
}

impl Default for Profile {
    fn default() -> Self {
        Self::HD_25
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
