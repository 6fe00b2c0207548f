//! Pastel background color sampling.

use rand::Rng;
use std::fmt::{Display, Formatter};

/// Pastel channels are sampled from this inclusive range.
pub const PASTEL_RANGE: std::ops::RangeInclusive<u8> = 180..=255;

/// An RGB color, rendered in the SVG `rgb(r,g,b)` notation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// A source of badge background colors.
///
/// The thread RNG is the only nondeterminism in the whole render path, so it
/// sits behind this trait and tests inject a fixed color instead.
pub trait ColorSource: Send + Sync {
    fn pastel(&self) -> Rgb;
}

/// Samples each channel independently from [`PASTEL_RANGE`].
#[derive(Debug, Default)]
pub struct RandomColorSource;

impl ColorSource for RandomColorSource {
    fn pastel(&self) -> Rgb {
        let mut rng = rand::thread_rng();
        Rgb {
            r: rng.gen_range(PASTEL_RANGE),
            g: rng.gen_range(PASTEL_RANGE),
            b: rng.gen_range(PASTEL_RANGE),
        }
    }
}

/// Always yields the same color; used in tests.
#[cfg(test)]
#[derive(Debug, Copy, Clone)]
pub struct FixedColorSource(pub Rgb);

#[cfg(test)]
impl ColorSource for FixedColorSource {
    fn pastel(&self) -> Rgb {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pastel_channels_stay_in_range() {
        let source = RandomColorSource;
        for _ in 0..1000 {
            let color = source.pastel();
            assert!(PASTEL_RANGE.contains(&color.r));
            assert!(PASTEL_RANGE.contains(&color.g));
            assert!(PASTEL_RANGE.contains(&color.b));
        }
    }

    #[test]
    fn rgb_renders_svg_notation() {
        let color = Rgb { r: 180, g: 200, b: 255 };
        assert_eq!(color.to_string(), "rgb(180,200,255)");
    }
}
