//! Font loading and fontdue-backed text metrics.
//!
//! A [`FontFace`] is both the [`TextMeasurer`] the layout fits against and
//! the [`TextPainter`] that draws the result, so measurement and ink agree.

use std::fmt;
use std::path::Path;

use fontdue::{Font, FontSettings};
use label_core::TextMeasurer;
use tiny_skia::Pixmap;

use crate::error::{RenderError, RenderResult};
use crate::raster::{blend_coverage, clamp_i32, TextPainter};

/// A loaded outline font.
pub struct FontFace {
    font: Font,
    family: String,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl FontFace {
    /// Parse a TrueType/OpenType font from memory.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Font`] if fontdue rejects the data.
    pub fn from_bytes(family: impl Into<String>, bytes: &[u8], collection_index: u32) -> RenderResult<Self> {
        let family = family.into();
        let settings = FontSettings {
            collection_index,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes, settings)
            .map_err(|e| RenderError::Font(format!("{family}: {e}")))?;
        Ok(Self { font, family })
    }

    /// Load a font file from disk. The family name is taken from the file stem.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Font`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> RenderResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| RenderError::Font(format!("{}: {e}", path.display())))?;
        let family = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        tracing::debug!(path = %path.display(), "Loaded font file");
        Self::from_bytes(family, &bytes, 0)
    }

    /// Find `family` among the installed system fonts, falling back to the
    /// system sans-serif face.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Font`] if neither is installed.
    #[cfg(feature = "system-fonts")]
    pub fn system(family: &str) -> RenderResult<Self> {
        use fontdb::{Database, Family, Query};

        let mut db = Database::new();
        db.load_system_fonts();

        let query = Query {
            families: &[Family::Name(family), Family::SansSerif],
            ..Query::default()
        };
        let id = db
            .query(&query)
            .ok_or_else(|| RenderError::Font(format!("no system font matches '{family}' or sans-serif")))?;

        let resolved = db
            .face(id)
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| family.to_string());
        if !resolved.eq_ignore_ascii_case(family) {
            tracing::warn!(requested = family, using = %resolved, "Font family not installed, using fallback");
        }

        db.with_face_data(id, |data, index| Self::from_bytes(resolved.clone(), data, index))
            .ok_or_else(|| RenderError::Font(format!("font data for '{resolved}' is unavailable")))?
    }

    /// The family name this face was loaded as.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[allow(clippy::cast_precision_loss)]
    fn px(size: u32) -> f32 {
        size as f32
    }

    fn ascent(&self, size: u32) -> f32 {
        let px = Self::px(size);
        self.font
            .horizontal_line_metrics(px)
            .map_or(px * 0.8, |m| m.ascent)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn ceil_px(value: f32) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.ceil().min(u32::MAX as f32) as u32
    } else {
        0
    }
}

impl TextMeasurer for FontFace {
    fn line_height(&self, size: u32) -> u32 {
        let px = Self::px(size);
        let height = self
            .font
            .horizontal_line_metrics(px)
            .map_or(px * 1.2, |m| m.new_line_size);
        ceil_px(height)
    }

    fn line_width(&self, size: u32, line: &str) -> u32 {
        let px = Self::px(size);
        let mut width = 0.0_f32;
        let mut previous = None;
        for ch in line.chars() {
            if let Some(prev) = previous {
                width += self.font.horizontal_kern(prev, ch, px).unwrap_or(0.0);
            }
            width += self.font.metrics(ch, px).advance_width;
            previous = Some(ch);
        }
        ceil_px(width)
    }
}

impl TextPainter for FontFace {
    fn paint_line(&self, canvas: &mut Pixmap, size: u32, line: &str, x: i32, y: i32, color: [u8; 4]) {
        let px = Self::px(size);
        let baseline = f64::from(y) + f64::from(self.ascent(size));
        let mut pen = f64::from(x);
        let mut previous = None;

        for ch in line.chars() {
            if let Some(prev) = previous {
                pen += f64::from(self.font.horizontal_kern(prev, ch, px).unwrap_or(0.0));
            }
            let (metrics, coverage) = self.font.rasterize(ch, px);
            if metrics.width > 0 && metrics.height > 0 {
                // fontdue reports ymin as the offset of the bitmap's bottom
                // edge from the baseline, positive upwards.
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let gx = (pen.round() as i64) + i64::from(metrics.xmin);
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let gy = (baseline.round() as i64) - i64::from(metrics.ymin) - metrics.height as i64;
                blend_coverage(
                    canvas,
                    clamp_i32(gx),
                    clamp_i32(gy),
                    u32::try_from(metrics.width).unwrap_or(0),
                    u32::try_from(metrics.height).unwrap_or(0),
                    &coverage,
                    color,
                );
            }
            pen += f64::from(metrics.advance_width);
            previous = Some(ch);
        }
    }
}
