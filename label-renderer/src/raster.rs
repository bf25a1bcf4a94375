//! Label compositing on a tiny-skia pixmap.

use label_core::{compose_label, LabelPlan, LabelRequest, MonospaceMeasurer, TextMeasurer};
use tiny_skia::{
    Color, Paint, PathBuilder, Pixmap, PixmapPaint, PremultipliedColorU8, Stroke,
    Transform,
};

use crate::error::{RenderError, RenderResult};
use crate::icon::DecodedIcon;

/// A measurer that can also draw what it measures.
///
/// Painting must agree with [`TextMeasurer`] so that fitted text lands
/// where the layout expects it.
pub trait TextPainter: TextMeasurer {
    /// Draw `line` at `size` with its line box's top-left corner at `(x, y)`.
    fn paint_line(&self, canvas: &mut Pixmap, size: u32, line: &str, x: i32, y: i32, color: [u8; 4]);
}

/// Fixed-cell placeholder text: every visible character becomes a solid
/// block the size of its cell. Useful without any font installed.
impl TextPainter for MonospaceMeasurer {
    fn paint_line(&self, canvas: &mut Pixmap, size: u32, line: &str, x: i32, y: i32, color: [u8; 4]) {
        let advance = self.line_width(size, "x");
        let height = self.line_height(size);
        // Leave a little air between blocks and above/below the row.
        let inset_x = advance / 8;
        let inset_y = height / 6;
        let cell_w = advance.saturating_sub(inset_x * 2);
        let cell_h = height.saturating_sub(inset_y * 2);
        let coverage = vec![u8::MAX; cell_w as usize * cell_h as usize];

        let mut pen = i64::from(x);
        for ch in line.chars() {
            if !ch.is_whitespace() {
                blend_coverage(
                    canvas,
                    clamp_i32(pen + i64::from(inset_x)),
                    clamp_i32(i64::from(y) + i64::from(inset_y)),
                    cell_w,
                    cell_h,
                    &coverage,
                    color,
                );
            }
            pen += i64::from(advance);
        }
    }
}

/// Colours of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelStyle {
    /// Canvas fill (RGBA).
    pub background: [u8; 4],
    /// Text colour (RGBA).
    pub ink: [u8; 4],
    /// Divider colour (RGBA).
    pub divider: [u8; 4],
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            background: [255, 255, 255, 255],
            ink: [0, 0, 0, 255],
            divider: [0, 0, 0, 255],
        }
    }
}

/// Composited label pixels, RGBA8 with straight alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA data (4 bytes per pixel).
    pub data: Vec<u8>,
}

impl LabelImage {
    /// An image with no pixels, produced for zero-area canvases.
    #[must_use]
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: Vec::new(),
        }
    }

    /// Whether the image holds no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixel at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(offset..offset + 4)
            .and_then(|px| <[u8; 4]>::try_from(px).ok())
    }

    /// Whether every pixel equals `rgba`.
    #[must_use]
    pub fn is_uniform(&self, rgba: [u8; 4]) -> bool {
        self.data.chunks_exact(4).all(|px| px == rgba)
    }

    /// Encode as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] for an image without pixels or if
    /// encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        use image::ImageEncoder;

        if self.is_empty() {
            return Err(RenderError::Export(format!(
                "cannot encode a {}x{} image with no pixels",
                self.width, self.height
            )));
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(&self.data, self.width, self.height, image::ExtendedColorType::Rgba8)
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;
        Ok(buf.into_inner())
    }

    /// Copy into an `image` buffer.
    #[must_use]
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }

    /// Scale to fit within `max_width` x `max_height`, keeping the aspect
    /// ratio. Small labels are scaled up as well as large ones down.
    #[must_use]
    pub fn preview(&self, max_width: u32, max_height: u32) -> Self {
        let Some(img) = self.to_rgba_image() else {
            return self.clone();
        };
        if self.is_empty() || max_width == 0 || max_height == 0 {
            return self.clone();
        }

        // Compare aspect ratios in integers so exact fits stay exact.
        let (w, h) = (u64::from(self.width), u64::from(self.height));
        let (max_w, max_h) = (u64::from(max_width), u64::from(max_height));
        let (new_width, new_height) = if w * max_h >= h * max_w {
            (max_w, h * max_w / w)
        } else {
            (w * max_h / h, max_h)
        };
        let new_width = u32::try_from(new_width).unwrap_or(max_width).max(1);
        let new_height = u32::try_from(new_height).unwrap_or(max_height).max(1);

        let resized = image::imageops::resize(
            &img,
            new_width,
            new_height,
            image::imageops::FilterType::Lanczos3,
        );

        Self {
            width: new_width,
            height: new_height,
            data: resized.into_raw(),
        }
    }

    fn from_pixmap(pixmap: &Pixmap) -> Self {
        let mut data = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            data,
        }
    }
}

/// A composed label: where things went and what it looks like.
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    /// Layout and text placement used.
    pub plan: LabelPlan,
    /// The pixels.
    pub image: LabelImage,
}

/// Draws labels.
#[derive(Debug, Clone, Default)]
pub struct LabelRenderer {
    style: LabelStyle,
}

impl LabelRenderer {
    /// Create a renderer with the given style.
    #[must_use]
    pub fn new(style: LabelStyle) -> Self {
        Self { style }
    }

    /// Create a renderer with black on white.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// The style in use.
    #[must_use]
    pub fn style(&self) -> &LabelStyle {
        &self.style
    }

    /// Lay out and draw a label.
    ///
    /// The icon metrics in `request` are replaced by those of `icon`, so the
    /// layout always matches the pixels being drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the icon is invalid for layout or if drawing fails.
    pub fn render<P>(
        &self,
        request: &LabelRequest,
        icon: Option<&DecodedIcon>,
        painter: &P,
    ) -> RenderResult<RenderedLabel>
    where
        P: TextPainter + ?Sized,
    {
        let mut request = request.clone();
        request.icon = icon.map(|icon| icon.metrics().clone());

        let plan = compose_label(&request, painter)?;
        let image = self.rasterize(&plan, icon, painter)?;
        Ok(RenderedLabel { plan, image })
    }

    /// Draw an already composed plan.
    ///
    /// A zero-area canvas produces an empty image rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixmap cannot be allocated or the icon cannot
    /// be rasterized.
    pub fn rasterize<P>(
        &self,
        plan: &LabelPlan,
        icon: Option<&DecodedIcon>,
        painter: &P,
    ) -> RenderResult<LabelImage>
    where
        P: TextPainter + ?Sized,
    {
        if plan.width == 0 || plan.height == 0 {
            tracing::warn!(width = plan.width, height = plan.height, "Degenerate canvas, nothing drawn");
            return Ok(LabelImage::empty(plan.width, plan.height));
        }

        let mut pixmap = Pixmap::new(plan.width, plan.height).ok_or_else(|| {
            RenderError::Raster(format!("cannot allocate {}x{} canvas", plan.width, plan.height))
        })?;
        let [r, g, b, a] = self.style.background;
        pixmap.fill(Color::from_rgba8(r, g, b, a));

        if let (Some(region), Some(icon)) = (plan.layout.icon(), icon) {
            if let Some(icon_pixmap) = icon.rasterize(region.width, region.height)? {
                pixmap.draw_pixmap(
                    region.x,
                    region.y,
                    icon_pixmap.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
        }

        if let Some(divider) = plan.layout.divider() {
            #[allow(clippy::cast_precision_loss)]
            let (x, top, bottom) = (divider.x as f32, divider.top as f32, divider.bottom as f32);
            let mut pb = PathBuilder::new();
            pb.move_to(x, top);
            pb.line_to(x, bottom);
            if let Some(path) = pb.finish() {
                let mut paint = Paint::default();
                let [r, g, b, a] = self.style.divider;
                paint.set_color_rgba8(r, g, b, a);
                #[allow(clippy::cast_precision_loss)]
                let stroke = Stroke {
                    width: divider.width as f32,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }

        if let Some(text) = &plan.text {
            for line in &text.lines {
                painter.paint_line(
                    &mut pixmap,
                    text.font_size,
                    &line.text,
                    line.x,
                    line.y,
                    self.style.ink,
                );
            }
        }

        Ok(LabelImage::from_pixmap(&pixmap))
    }
}

/// Blend an 8-bit coverage mask of `width` x `height` onto `canvas` at
/// `(x, y)` in `color`. Parts outside the canvas are clipped.
pub(crate) fn blend_coverage(
    canvas: &mut Pixmap,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    coverage: &[u8],
    color: [u8; 4],
) {
    let canvas_w = i64::from(canvas.width());
    let canvas_h = i64::from(canvas.height());
    let pixels = canvas.pixels_mut();

    for row in 0..height {
        let py = i64::from(y) + i64::from(row);
        if py < 0 || py >= canvas_h {
            continue;
        }
        for col in 0..width {
            let px = i64::from(x) + i64::from(col);
            if px < 0 || px >= canvas_w {
                continue;
            }
            let mask = coverage
                .get(row as usize * width as usize + col as usize)
                .copied()
                .unwrap_or(0);
            if mask == 0 {
                continue;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = (py * canvas_w + px) as usize;
            if let Some(dst) = pixels.get_mut(index) {
                *dst = over(*dst, color, mask);
            }
        }
    }
}

/// Source-over of a straight-alpha `color` scaled by `mask` onto `dst`.
fn over(dst: PremultipliedColorU8, color: [u8; 4], mask: u8) -> PremultipliedColorU8 {
    let mul = |a: u32, b: u32| (a * b + 127) / 255;
    let [r, g, b, a] = color.map(u32::from);
    let sa = mul(a, u32::from(mask));
    let inv = 255 - sa;
    let channel = |s: u32, d: u8| mul(s, sa) + mul(u32::from(d), inv);

    let out_a = sa + mul(u32::from(dst.alpha()), inv);
    let out_r = channel(r, dst.red()).min(out_a);
    let out_g = channel(g, dst.green()).min(out_a);
    let out_b = channel(b, dst.blue()).min(out_a);

    #[allow(clippy::cast_possible_truncation)]
    PremultipliedColorU8::from_rgba(out_r as u8, out_g as u8, out_b as u8, out_a.min(255) as u8)
        .unwrap_or(dst)
}

pub(crate) fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_core::{CanvasSpec, IconMetrics, LayoutPlan, Padding};

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn painter() -> MonospaceMeasurer {
        MonospaceMeasurer::default()
    }

    fn solid_icon(width: u32, height: u32, rgba: [u8; 4]) -> DecodedIcon {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        DecodedIcon::from_image("solid.png", img)
    }

    #[test]
    fn test_blank_canvas_is_uniform_background() {
        let renderer = LabelRenderer::with_defaults();
        let request = LabelRequest::new(CanvasSpec::fixed(40, 20));
        let label = renderer.render(&request, None, &painter()).expect("render");
        assert_eq!((label.image.width, label.image.height), (40, 20));
        assert_eq!(label.image.data.len(), 40 * 20 * 4);
        assert!(label.image.is_uniform(WHITE));
    }

    #[test]
    fn test_custom_background() {
        let renderer = LabelRenderer::new(LabelStyle {
            background: [10, 20, 30, 255],
            ..LabelStyle::default()
        });
        let label = renderer
            .render(&LabelRequest::new(CanvasSpec::fixed(8, 8)), None, &painter())
            .expect("render");
        assert!(label.image.is_uniform([10, 20, 30, 255]));
    }

    #[test]
    fn test_zero_width_canvas_is_empty_not_error() {
        let renderer = LabelRenderer::with_defaults();
        let request = LabelRequest::new(CanvasSpec::fixed(0, 50)).with_text("x");
        let label = renderer.render(&request, None, &painter()).expect("render");
        assert!(label.image.is_empty());
        assert_eq!(label.image.pixel(0, 0), None);
    }

    #[test]
    fn test_icon_and_divider_drawn() {
        let renderer = LabelRenderer::with_defaults();
        let icon = solid_icon(10, 10, [255, 0, 0, 255]);
        let request = LabelRequest::new(CanvasSpec::fixed(200, 60)).with_text("Hi");
        let label = renderer.render(&request, Some(&icon), &painter()).expect("render");

        let LayoutPlan::IconAndText { icon: region, divider, .. } = label.plan.layout else {
            panic!("expected icon and text");
        };
        assert_eq!((region.width, region.height), (40, 40));
        // Icon interior is red.
        assert_eq!(label.image.pixel(30, 30), Some([255, 0, 0, 255]));
        // Divider at x = 10 + 40 + 10 covers the pixel just left of it.
        assert_eq!(divider.x, 60);
        assert_eq!(label.image.pixel(59, 30), Some(BLACK));
        // Margin stays background.
        assert_eq!(label.image.pixel(2, 2), Some(WHITE));
    }

    #[test]
    fn test_icon_only_centered() {
        let renderer = LabelRenderer::with_defaults();
        let icon = solid_icon(4, 4, [0, 0, 255, 255]);
        let request = LabelRequest::new(CanvasSpec::fixed(100, 40));
        let label = renderer.render(&request, Some(&icon), &painter()).expect("render");
        // Scaled to 20x20 at (40, 10).
        assert_eq!(label.image.pixel(50, 20), Some([0, 0, 255, 255]));
        assert_eq!(label.image.pixel(35, 20), Some(WHITE));
        assert_eq!(label.image.pixel(65, 20), Some(WHITE));
    }

    #[test]
    fn test_request_icon_metrics_replaced_by_decoded() {
        let renderer = LabelRenderer::with_defaults();
        let icon = solid_icon(10, 20, WHITE);
        let request = LabelRequest::new(CanvasSpec::fixed(100, 40))
            .with_icon(IconMetrics::new("stale.png", 1, 1));
        let label = renderer.render(&request, Some(&icon), &painter()).expect("render");
        assert_eq!(label.plan.layout.icon().map(|r| r.width), Some(10));
    }

    #[test]
    fn test_placeholder_text_inks_pixels() {
        let renderer = LabelRenderer::with_defaults();
        let request = LabelRequest::new(CanvasSpec::fixed(120, 40))
            .with_text("AB")
            .with_padding(Padding::Disabled);
        let label = renderer.render(&request, None, &painter()).expect("render");
        let text = label.plan.text.expect("text");
        let first = &text.lines[0];
        let probe_x = u32::try_from(first.x).expect("x") + first.width / 4;
        let probe_y = u32::try_from(first.y).expect("y") + text.line_height / 2;
        assert_eq!(label.image.pixel(probe_x, probe_y), Some(BLACK));
        assert!(!label.image.is_uniform(WHITE));
    }

    #[test]
    fn test_blend_clips_outside_canvas() {
        let mut pixmap = Pixmap::new(4, 4).expect("pixmap");
        pixmap.fill(Color::WHITE);
        blend_coverage(&mut pixmap, -2, -2, 4, 4, &[255; 16], BLACK);
        let image = LabelImage::from_pixmap(&pixmap);
        assert_eq!(image.pixel(0, 0), Some(BLACK));
        assert_eq!(image.pixel(1, 1), Some(BLACK));
        assert_eq!(image.pixel(2, 2), Some(WHITE));
    }

    #[test]
    fn test_partial_coverage_blends() {
        let mut pixmap = Pixmap::new(1, 1).expect("pixmap");
        pixmap.fill(Color::WHITE);
        blend_coverage(&mut pixmap, 0, 0, 1, 1, &[128], BLACK);
        let px = LabelImage::from_pixmap(&pixmap).pixel(0, 0).expect("pixel");
        assert!(px[0] > 100 && px[0] < 160, "got {px:?}");
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_preview_keeps_aspect_ratio() {
        let image = LabelImage {
            width: 400,
            height: 100,
            data: vec![255; 400 * 100 * 4],
        };
        let preview = image.preview(200, 200);
        assert_eq!((preview.width, preview.height), (200, 50));
        let grown = image.preview(800, 800);
        assert_eq!((grown.width, grown.height), (800, 200));
    }
}
