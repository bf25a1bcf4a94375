//! Text measurement capability.
//!
//! The fit engine never touches fonts directly. It asks a [`TextMeasurer`]
//! for line heights and widths at candidate sizes, so the search is a pure
//! function of its inputs.

/// Measured size of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    /// Advance width in pixels.
    pub width: u32,
    /// Line height in pixels.
    pub height: u32,
}

/// Deterministic, stateless text metrics for one font family.
///
/// Methods take `&self` and implementations must not rely on interior
/// mutability, so a single measurer can back concurrent renders.
pub trait TextMeasurer: Send + Sync {
    /// Height of one line at `size`.
    fn line_height(&self, size: u32) -> u32;

    /// Width of `line` at `size`.
    fn line_width(&self, size: u32, line: &str) -> u32;

    /// Width and height of `line` at `size`.
    fn measure(&self, size: u32, line: &str) -> TextExtent {
        TextExtent {
            width: self.line_width(size, line),
            height: self.line_height(size),
        }
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn line_height(&self, size: u32) -> u32 {
        (**self).line_height(size)
    }

    fn line_width(&self, size: u32, line: &str) -> u32 {
        (**self).line_width(size, line)
    }
}

/// Fixed-advance measurer.
///
/// Every character advances by `size * advance_per_mille / 1000` and lines
/// are `size * line_height_per_mille / 1000` tall, both rounded up. Fits
/// fixed-cell bitmap fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMeasurer {
    /// Character advance as a fraction of the font size, in thousandths.
    pub advance_per_mille: u32,
    /// Line height as a fraction of the font size, in thousandths.
    pub line_height_per_mille: u32,
}

impl MonospaceMeasurer {
    /// Create a measurer with the given ratios (thousandths of the size).
    #[must_use]
    pub fn new(advance_per_mille: u32, line_height_per_mille: u32) -> Self {
        Self {
            advance_per_mille,
            line_height_per_mille,
        }
    }

    fn scale(size: u32, per_mille: u32) -> u32 {
        let scaled = u64::from(size) * u64::from(per_mille);
        u32::try_from(scaled.div_ceil(1000)).unwrap_or(u32::MAX)
    }
}

impl Default for MonospaceMeasurer {
    /// Half-em advance, 1.2 line height.
    fn default() -> Self {
        Self::new(500, 1200)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn line_height(&self, size: u32) -> u32 {
        Self::scale(size, self.line_height_per_mille)
    }

    fn line_width(&self, size: u32, line: &str) -> u32 {
        let chars = u32::try_from(line.chars().count()).unwrap_or(u32::MAX);
        Self::scale(size, self.advance_per_mille).saturating_mul(chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_metrics() {
        let m = MonospaceMeasurer::default();
        assert_eq!(m.line_height(10), 12);
        assert_eq!(m.line_width(10, "abcd"), 20);
        // 11 * 0.5 = 5.5, rounded up per character
        assert_eq!(m.line_width(11, "ab"), 12);
        assert_eq!(m.line_width(40, ""), 0);
    }

    #[test]
    fn test_measure_combines_both() {
        let m = MonospaceMeasurer::new(600, 1000);
        assert_eq!(
            m.measure(20, "xyz"),
            TextExtent {
                width: 36,
                height: 20
            }
        );
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let m = MonospaceMeasurer::default();
        assert_eq!(m.line_width(10, "héé"), 15);
    }
}
