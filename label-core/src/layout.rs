//! Layout Planner.
//!
//! Partitions the canvas between the icon and the text:
//!
//! ```text
//! icon + text                      icon only          text only
//! ┌──────┬─┬─┬──────────────┐     ┌─────────────┐    ┌─────────────┐
//! │ icon │m│|│gap  text     │     │   ┌─────┐   │    │   ┌─────┐   │
//! │      │ │|│              │     │   │icon │   │    │   │text │   │
//! └──────┴─┴─┴──────────────┘     └───┴─────┴───┘    └───┴─────┴───┘
//! ```
//!
//! The icon always spans the canvas height minus both margins and keeps its
//! natural aspect ratio.

use serde::{Deserialize, Serialize};

use crate::canvas::{IconMetrics, Padding};
use crate::error::{LabelError, LabelResult};

/// Fixed gap between the divider and the text, independent of padding.
pub const TEXT_GAP: u32 = 10;

/// Stroke width of the divider line.
pub const DIVIDER_WIDTH: u32 = 2;

/// A rectangle on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRegion {
    /// Left edge in pixels (may be negative when content overflows).
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl LayoutRegion {
    /// Create a region.
    #[must_use]
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(to_i32(self.width))
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(to_i32(self.height))
    }
}

/// Vertical separator between icon and text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divider {
    /// Horizontal position of the line centre.
    pub x: i32,
    /// Top end.
    pub top: i32,
    /// Bottom end.
    pub bottom: i32,
    /// Stroke width in pixels.
    pub width: u32,
}

/// Horizontal alignment of text lines inside their region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush with the region's left edge.
    Start,
    /// The block is centered in the region on its widest line; lines
    /// share its left edge.
    Center,
}

/// Region assigned to text. Text is always vertically centered in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRegion {
    /// The box the text must fit.
    pub region: LayoutRegion,
    /// Horizontal alignment.
    pub align: TextAlign,
}

/// How the canvas is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutPlan {
    /// Nothing to draw but the background.
    Blank,
    /// Icon centered on the canvas.
    IconOnly {
        /// Scaled icon placement.
        icon: LayoutRegion,
    },
    /// Text centered on the canvas.
    TextOnly {
        /// Text box.
        text: TextRegion,
    },
    /// Icon on the left, divider, text on the right.
    IconAndText {
        /// Scaled icon placement.
        icon: LayoutRegion,
        /// Separator line.
        divider: Divider,
        /// Text box.
        text: TextRegion,
    },
}

impl LayoutPlan {
    /// Icon placement, if any.
    #[must_use]
    pub fn icon(&self) -> Option<LayoutRegion> {
        match self {
            Self::IconOnly { icon } | Self::IconAndText { icon, .. } => Some(*icon),
            Self::Blank | Self::TextOnly { .. } => None,
        }
    }

    /// Text box, if any.
    #[must_use]
    pub fn text(&self) -> Option<TextRegion> {
        match self {
            Self::TextOnly { text } | Self::IconAndText { text, .. } => Some(*text),
            Self::Blank | Self::IconOnly { .. } => None,
        }
    }

    /// Divider line, if any.
    #[must_use]
    pub fn divider(&self) -> Option<Divider> {
        match self {
            Self::IconAndText { divider, .. } => Some(*divider),
            _ => None,
        }
    }
}

/// Width of an icon scaled to `target_height`, keeping its aspect ratio.
///
/// Computes `floor(natural_width * target_height / natural_height)` exactly.
/// Returns `None` when the natural height is zero.
#[must_use]
pub fn scaled_icon_width(natural_width: u32, natural_height: u32, target_height: u32) -> Option<u32> {
    if natural_height == 0 {
        return None;
    }
    let scaled =
        u64::from(natural_width) * u64::from(target_height) / u64::from(natural_height);
    Some(u32::try_from(scaled).unwrap_or(u32::MAX))
}

/// Starting font size for a canvas of the given height.
#[must_use]
pub fn base_font_size(canvas_height: u32) -> u32 {
    (canvas_height / 8).clamp(12, 36)
}

/// Scaled icon size for a canvas of `height`. Only a zero natural height
/// is rejected; a zero width just takes no room.
pub(crate) fn icon_box(icon: &IconMetrics, height: u32, margin: u32) -> LabelResult<(u32, u32)> {
    let target_height = height.saturating_sub(margin.saturating_mul(2));
    let width = scaled_icon_width(icon.width, icon.height, target_height)
        .ok_or_else(|| invalid(icon, "natural height is zero"))?;
    Ok((width, target_height))
}

fn invalid(icon: &IconMetrics, reason: &str) -> LabelError {
    LabelError::InvalidAsset {
        icon: icon.name.clone(),
        reason: reason.to_string(),
    }
}

/// Split a `width` x `height` canvas between the icon and the text.
///
/// # Errors
///
/// Returns [`LabelError::InvalidAsset`] if the icon has a zero natural
/// height.
pub fn plan_layout(
    width: u32,
    height: u32,
    icon: Option<&IconMetrics>,
    has_text: bool,
    padding: Padding,
) -> LabelResult<LayoutPlan> {
    let margin = padding.margin();
    let m = to_i32(margin);

    let plan = match (icon, has_text) {
        (Some(icon), true) => {
            let (icon_w, icon_h) = icon_box(icon, height, margin)?;
            let divider_x = margin.saturating_add(icon_w).saturating_add(margin);
            let text_x = divider_x.saturating_add(TEXT_GAP);
            let text_w = width.saturating_sub(margin).saturating_sub(text_x);

            LayoutPlan::IconAndText {
                icon: LayoutRegion::new(m, m, icon_w, icon_h),
                divider: Divider {
                    x: to_i32(divider_x),
                    top: m,
                    bottom: to_i32(height).saturating_sub(m),
                    width: DIVIDER_WIDTH,
                },
                text: TextRegion {
                    region: LayoutRegion::new(to_i32(text_x), m, text_w, icon_h),
                    align: TextAlign::Start,
                },
            }
        }
        (Some(icon), false) => {
            let (icon_w, icon_h) = icon_box(icon, height, margin)?;
            LayoutPlan::IconOnly {
                icon: LayoutRegion::new(
                    centered(width, icon_w),
                    centered(height, icon_h),
                    icon_w,
                    icon_h,
                ),
            }
        }
        (None, true) => LayoutPlan::TextOnly {
            text: TextRegion {
                region: LayoutRegion::new(
                    m,
                    m,
                    width.saturating_sub(margin.saturating_mul(2)),
                    height.saturating_sub(margin.saturating_mul(2)),
                ),
                align: TextAlign::Center,
            },
        },
        (None, false) => LayoutPlan::Blank,
    };

    tracing::debug!(width, height, ?padding, ?plan, "Planned layout");
    Ok(plan)
}

/// Offset that centers `inner` within `outer`, rounding toward negative
/// infinity when `inner` is larger.
pub(crate) fn centered(outer: u32, inner: u32) -> i32 {
    let offset = (i64::from(outer) - i64::from(inner)).div_euclid(2);
    i32::try_from(offset).unwrap_or(if offset < 0 { i32::MIN } else { i32::MAX })
}

pub(crate) fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
