//! Text-Fit Engine.
//!
//! Finds the largest integer font size at which a block of lines fits a box.
//!
//! The search runs in two phases:
//!
//! 1. **Seed.** A single line starts at the full box height. Multiple lines
//!    start at the caller's size and grow in coarse steps while the probe
//!    fits and stays under a per-line budget of `max_height / (lines + 1)`.
//! 2. **Shrink.** Step down by one until both the height and the width
//!    checks pass, stopping at the floor size.
//!
//! At the floor, overflow is tolerated and reported in [`FitResult::overflow`].

use serde::{Deserialize, Serialize};

use crate::measure::TextMeasurer;

/// Horizontal constraint for a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthBound {
    /// Every line must be at most this wide.
    Bounded(u32),
    /// No width constraint. Used to discover natural text width.
    Unbounded,
}

impl WidthBound {
    fn admits(self, width: u32) -> bool {
        match self {
            Self::Bounded(max) => width <= max,
            Self::Unbounded => true,
        }
    }
}

/// Bounds and step of the font size search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontLimits {
    /// Smallest size ever returned, even when the text overflows.
    pub min: u32,
    /// Largest size ever returned.
    pub max: u32,
    /// Increment of the multi-line growth phase.
    pub growth_step: u32,
}

impl Default for FontLimits {
    fn default() -> Self {
        Self {
            min: 10,
            max: 72,
            growth_step: 2,
        }
    }
}

impl FontLimits {
    /// Clamp `size` into `[min, max]`. The floor wins if `max < min`.
    #[must_use]
    pub fn clamp(&self, size: u32) -> u32 {
        size.min(self.max).max(self.min)
    }
}

/// Outcome of a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitResult {
    /// Chosen font size.
    pub font_size: u32,
    /// Candidate size before the shrink phase ran.
    pub seed: u32,
    /// Whether the text still exceeds the box at `font_size`.
    pub overflow: bool,
}

/// Choose the font size for `lines` inside a `max_width` x `max_height` box.
///
/// `start_size` seeds the multi-line search and is ignored for a single
/// line. An empty block returns `start_size` clamped into `limits`.
pub fn fit_font_size<M, S>(
    lines: &[S],
    measurer: &M,
    max_width: WidthBound,
    max_height: u32,
    start_size: u32,
    limits: FontLimits,
) -> FitResult
where
    M: TextMeasurer + ?Sized,
    S: AsRef<str>,
{
    if lines.is_empty() {
        let font_size = limits.clamp(start_size);
        return FitResult {
            font_size,
            seed: start_size,
            overflow: false,
        };
    }

    let fits = |size: u32| -> bool {
        let block_height = u64::from(measurer.line_height(size)) * lines.len() as u64;
        let height_ok = block_height <= u64::from(max_height);
        let width_ok = height_ok
            && lines
                .iter()
                .all(|line| max_width.admits(measurer.line_width(size, line.as_ref())));
        tracing::trace!(size, height_ok, width_ok, "fit probe");
        height_ok && width_ok
    };

    let seed = if lines.len() == 1 {
        max_height
    } else {
        let ceiling = max_height / u32::try_from(lines.len() + 1).unwrap_or(u32::MAX);
        let step = limits.growth_step.max(1);
        let mut candidate = start_size;
        while candidate.saturating_add(step) <= ceiling && fits(candidate + step) {
            candidate += step;
        }
        candidate
    };

    let mut size = seed;
    while size > limits.min && !fits(size) {
        size -= 1;
    }

    let font_size = limits.clamp(size);
    let overflow = !fits(font_size);
    tracing::debug!(
        lines = lines.len(),
        ?max_width,
        max_height,
        seed,
        font_size,
        overflow,
        "Fitted text"
    );

    FitResult {
        font_size,
        seed,
        overflow,
    }
}
