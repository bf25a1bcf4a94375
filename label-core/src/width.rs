//! Canvas Width Resolver.
//!
//! Turns an `auto` width into pixels by fitting the text with no width
//! constraint and measuring how wide it naturally is at that size.

use crate::canvas::{CanvasSpec, CanvasWidth, IconMetrics, Padding};
use crate::fit::{fit_font_size, FontLimits, WidthBound};
use crate::layout::{base_font_size, scaled_icon_width};
use crate::measure::TextMeasurer;

/// Compute the canvas width for content of the given height.
///
/// With an icon and text the width is
/// `margin + icon + margin + text + margin`; otherwise `text + 2 * margin`.
/// An icon with zero natural height contributes no width here; the layout
/// planner reports it when the label is composed.
pub fn resolve_width<M, S>(
    height: u32,
    padding: Padding,
    icon: Option<&IconMetrics>,
    lines: &[S],
    measurer: &M,
    limits: FontLimits,
) -> u32
where
    M: TextMeasurer + ?Sized,
    S: AsRef<str>,
{
    let margin = padding.margin();
    let available = height.saturating_sub(margin.saturating_mul(2));

    let fit = fit_font_size(
        lines,
        measurer,
        WidthBound::Unbounded,
        available,
        base_font_size(height),
        limits,
    );
    let text_width = lines
        .iter()
        .map(|line| measurer.line_width(fit.font_size, line.as_ref()))
        .max()
        .unwrap_or(0);

    let width = match icon {
        Some(icon) if !lines.is_empty() => {
            let icon_width = scaled_icon_width(icon.width, icon.height, available).unwrap_or(0);
            margin
                .saturating_add(icon_width)
                .saturating_add(margin)
                .saturating_add(text_width)
                .saturating_add(margin)
        }
        _ => text_width.saturating_add(margin.saturating_mul(2)),
    };

    tracing::debug!(
        height,
        font_size = fit.font_size,
        text_width,
        width,
        "Resolved auto canvas width"
    );
    width
}

impl CanvasSpec {
    /// Concrete `(width, height)` of this canvas for the given content.
    ///
    /// Fixed widths pass through untouched; `auto` runs [`resolve_width`].
    pub fn resolve<M, S>(
        &self,
        padding: Padding,
        icon: Option<&IconMetrics>,
        lines: &[S],
        measurer: &M,
        limits: FontLimits,
    ) -> (u32, u32)
    where
        M: TextMeasurer + ?Sized,
        S: AsRef<str>,
    {
        let width = match self.width {
            CanvasWidth::Fixed(width) => width,
            CanvasWidth::Auto => {
                resolve_width(self.height, padding, icon, lines, measurer, limits)
            }
        };
        (width, self.height)
    }
}
