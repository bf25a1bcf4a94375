//! Full label composition: width resolution, layout, text fitting and line
//! placement in one pure call.

use serde::{Deserialize, Serialize};

use crate::canvas::{CanvasSpec, IconMetrics, Padding};
use crate::error::LabelResult;
use crate::fit::{fit_font_size, FitResult, FontLimits, WidthBound};
use crate::layout::{base_font_size, centered, plan_layout, LayoutPlan, TextAlign};
use crate::measure::TextMeasurer;
use crate::text::TextBlock;

/// Everything needed to lay out one label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRequest {
    /// Target canvas.
    pub canvas: CanvasSpec,
    /// Margin policy.
    pub padding: Padding,
    /// Natural size of the icon, if one is selected.
    pub icon: Option<IconMetrics>,
    /// Label text.
    pub text: TextBlock,
    /// Font size search bounds.
    pub limits: FontLimits,
}

impl LabelRequest {
    /// A request for `canvas` with padding, no icon and no text.
    #[must_use]
    pub fn new(canvas: CanvasSpec) -> Self {
        Self {
            canvas,
            padding: Padding::Enabled,
            icon: None,
            text: TextBlock::default(),
            limits: FontLimits::default(),
        }
    }

    /// Set the text.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = TextBlock::new(text);
        self
    }

    /// Set the icon metrics.
    #[must_use]
    pub fn with_icon(mut self, icon: IconMetrics) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the padding policy.
    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Set the font size bounds.
    #[must_use]
    pub fn with_limits(mut self, limits: FontLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// One line of text at its final position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedLine {
    /// Line content.
    pub text: String,
    /// Left edge of the line.
    pub x: i32,
    /// Top edge of the line box.
    pub y: i32,
    /// Measured width at the chosen size.
    pub width: u32,
}

/// Fitted text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPlacement {
    /// Chosen font size.
    pub font_size: u32,
    /// Height of each line at that size.
    pub line_height: u32,
    /// Raw fit outcome.
    pub fit: FitResult,
    /// Lines in drawing order.
    pub lines: Vec<PlacedLine>,
}

/// Result of composing a label: where everything goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPlan {
    /// Resolved canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Region split.
    pub layout: LayoutPlan,
    /// Text placement, when there is text.
    pub text: Option<TextPlacement>,
}

/// Lay out a label.
///
/// Resolves an `auto` width first, then plans the regions, fits the text
/// into its region and positions every line.
///
/// # Errors
///
/// Returns [`crate::LabelError::InvalidAsset`] if the icon has a zero
/// natural height.
pub fn compose_label<M>(request: &LabelRequest, measurer: &M) -> LabelResult<LabelPlan>
where
    M: TextMeasurer + ?Sized,
{
    let lines = request.text.lines();
    let (width, height) = request.canvas.resolve(
        request.padding,
        request.icon.as_ref(),
        lines,
        measurer,
        request.limits,
    );

    let layout = plan_layout(
        width,
        height,
        request.icon.as_ref(),
        !request.text.is_empty(),
        request.padding,
    )?;

    let text = layout.text().map(|region| {
        let area = region.region;
        let fit = fit_font_size(
            lines,
            measurer,
            WidthBound::Bounded(area.width),
            area.height,
            base_font_size(height),
            request.limits,
        );
        let line_height = measurer.line_height(fit.font_size);
        let count = u32::try_from(lines.len()).unwrap_or(u32::MAX);
        let block_height = line_height.saturating_mul(count);
        let top = area.y.saturating_add(centered(area.height, block_height));

        let widths: Vec<u32> = lines
            .iter()
            .map(|line| measurer.line_width(fit.font_size, line))
            .collect();
        // Lines share one left edge; centering moves the block as a whole.
        let left = match region.align {
            TextAlign::Start => area.x,
            TextAlign::Center => {
                let block_width = widths.iter().copied().max().unwrap_or(0);
                area.x.saturating_add(centered(area.width, block_width))
            }
        };

        let mut y = top;
        let placed = lines
            .iter()
            .zip(widths)
            .map(|(line, line_width)| {
                let x = left;
                let placed = PlacedLine {
                    text: line.clone(),
                    x,
                    y,
                    width: line_width,
                };
                y = y.saturating_add(i32::try_from(line_height).unwrap_or(i32::MAX));
                placed
            })
            .collect();

        TextPlacement {
            font_size: fit.font_size,
            line_height,
            fit,
            lines: placed,
        }
    });

    Ok(LabelPlan {
        width,
        height,
        layout,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutRegion;
    use crate::measure::MonospaceMeasurer;

    #[test]
    fn test_blank_label() {
        let plan = compose_label(&LabelRequest::new(CanvasSpec::fixed(400, 200)), &MonospaceMeasurer::default())
            .expect("compose");
        assert_eq!(plan.layout, LayoutPlan::Blank);
        assert!(plan.text.is_none());
        assert_eq!((plan.width, plan.height), (400, 200));
    }

    #[test]
    fn test_text_only_centered_lines() {
        let request = LabelRequest::new(CanvasSpec::fixed(400, 200)).with_text("Hi\nthere");
        let plan = compose_label(&request, &MonospaceMeasurer::default()).expect("compose");
        let text = plan.text.expect("text");
        // Region 380x180, two lines: growth ceiling 180 / 3 = 60 from 25 reaches 59.
        assert_eq!(text.font_size, 59);
        assert_eq!(text.line_height, 71);
        // Block 142 high centered in 180 starting at 10.
        assert_eq!(text.lines[0].y, 29);
        assert_eq!(text.lines[1].y, 100);
        // "Hi" is 60 wide, "there" 150: the block is centered on the
        // widest line and both lines start at its left edge.
        assert_eq!(text.lines[0].width, 60);
        assert_eq!(text.lines[1].width, 150);
        assert_eq!(text.lines[0].x, 10 + (380 - 150) / 2);
        assert_eq!(text.lines[1].x, 125);
    }

    #[test]
    fn test_text_only_single_line_centered() {
        let request = LabelRequest::new(CanvasSpec::fixed(400, 200)).with_text("Hi");
        let plan = compose_label(&request, &MonospaceMeasurer::default()).expect("compose");
        let text = plan.text.expect("text");
        let line = &text.lines[0];
        assert_eq!(line.x, 10 + (380 - i32::try_from(line.width).expect("width")) / 2);
    }

    #[test]
    fn test_icon_and_text_left_aligned() {
        let request = LabelRequest::new(CanvasSpec::fixed(400, 200))
            .with_icon(IconMetrics::new("i.png", 100, 100))
            .with_text("OK");
        let plan = compose_label(&request, &MonospaceMeasurer::default()).expect("compose");
        assert_eq!(plan.layout.icon(), Some(LayoutRegion::new(10, 10, 180, 180)));
        let text = plan.text.expect("text");
        assert!(text.lines.iter().all(|line| line.x == 210));
    }

    #[test]
    fn test_auto_width_resolved_before_layout() {
        let request = LabelRequest::new(CanvasSpec::auto(150))
            .with_icon(IconMetrics::new("square.png", 60, 60))
            .with_text("Label");
        let plan = compose_label(&request, &MonospaceMeasurer::default()).expect("compose");
        assert_eq!(plan.width, 340);
        assert!(matches!(plan.layout, LayoutPlan::IconAndText { .. }));
    }

    #[test]
    fn test_invalid_icon_fails_render() {
        let request = LabelRequest::new(CanvasSpec::auto(150))
            .with_icon(IconMetrics::new("broken.png", 60, 0))
            .with_text("Label");
        assert!(compose_label(&request, &MonospaceMeasurer::default()).is_err());
    }
}
