/// Depth-based colour palettes
use serde::{Deserialize, Serialize};

/// An 8-bit RGB colour
pub type Rgb = [u8; 3];

/// Linear colour ramp between two RGB endpoints with channels in [0, 1]
///
/// `color(0.0)` yields `one` and `color(1.0)` yields `zero`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub zero: [f64; 3],
    pub one: [f64; 3],
}

impl Palette {
    /// White up close, fading to blue
    pub const BLUE: Palette = Palette {
        zero: [0.0, 0.0, 1.0],
        one: [1.0, 1.0, 1.0],
    };

    pub fn new(zero: [f64; 3], one: [f64; 3]) -> Self {
        Self { zero, one }
    }

    /// Interpolate the palette at `c`, rounding each channel half-to-even
    ///
    /// # Panics
    ///
    /// Panics if `c` is outside `[0, 1]` or NaN.
    pub fn color(&self, c: f64) -> Rgb {
        assert!(
            (0.0..=1.0).contains(&c),
            "palette position must be within [0, 1], got {}",
            c
        );
        let mut rgb = [0u8; 3];
        for (channel, (zero, one)) in rgb.iter_mut().zip(self.zero.iter().zip(&self.one)) {
            let precise = (1.0 - c) * one + c * zero;
            *channel = (precise * 255.0).round_ties_even().clamp(0.0, 255.0) as u8;
        }
        rgb
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::BLUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blue_endpoints() {
        assert_eq!(Palette::BLUE.color(0.0), [255, 255, 255]);
        assert_eq!(Palette::BLUE.color(1.0), [0, 0, 255]);
    }

    #[test]
    fn test_midpoint_rounds_to_even() {
        // 127.5 rounds to 128
        assert_eq!(Palette::BLUE.color(0.5), [128, 128, 255]);
    }

    #[test]
    fn test_custom_palette() {
        let palette = Palette::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(palette.color(0.0), [0, 255, 0]);
        assert_eq!(palette.color(1.0), [255, 0, 0]);
        assert_eq!(palette.color(0.25), [64, 191, 0]);
    }

    #[test]
    #[should_panic(expected = "palette position")]
    fn test_out_of_range_panics() {
        Palette::BLUE.color(1.5);
    }

    #[test]
    #[should_panic]
    fn test_negative_panics() {
        Palette::BLUE.color(-0.01);
    }
}
