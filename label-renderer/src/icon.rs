//! Icon discovery and decoding.
//!
//! Icons are PNG/JPEG rasters or SVG documents. Rasters are decoded with
//! `image`; SVGs are parsed with `usvg` and drawn with `resvg` at the size
//! the layout asks for, so they stay sharp at any label height.

use std::path::{Path, PathBuf};

use label_core::IconMetrics;
use tiny_skia::{ColorU8, Pixmap};

use crate::error::{RenderError, RenderResult};

/// File extensions recognised as icons, lowercase.
pub const ICON_EXTENSIONS: [&str; 4] = ["svg", "png", "jpg", "jpeg"];

/// Decoded pixel or vector data.
enum IconSource {
    Raster(image::RgbaImage),
    #[cfg(feature = "svg")]
    Vector(usvg::Tree),
}

/// An icon ready to be drawn, with its natural size.
pub struct DecodedIcon {
    metrics: IconMetrics,
    source: IconSource,
}

impl std::fmt::Debug for DecodedIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.source {
            IconSource::Raster(_) => "raster",
            #[cfg(feature = "svg")]
            IconSource::Vector(_) => "vector",
        };
        f.debug_struct("DecodedIcon")
            .field("metrics", &self.metrics)
            .field("kind", &kind)
            .finish()
    }
}

impl DecodedIcon {
    /// Wrap an already decoded raster image.
    #[must_use]
    pub fn from_image(name: impl Into<String>, image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            metrics: IconMetrics::new(name, width, height),
            source: IconSource::Raster(image),
        }
    }

    /// Decode icon bytes. `name` is used for SVG detection by extension and
    /// in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::AssetUnreadable`] if the bytes are not a
    /// supported image.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> RenderResult<Self> {
        if is_svg(name, bytes) {
            return Self::from_svg(name, bytes);
        }

        let img = image::load_from_memory(bytes).map_err(|e| RenderError::AssetUnreadable {
            path: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_image(name, img.to_rgba8()))
    }

    #[cfg(feature = "svg")]
    fn from_svg(name: &str, bytes: &[u8]) -> RenderResult<Self> {
        let tree = usvg::Tree::from_data(bytes, &usvg::Options::default()).map_err(|e| {
            RenderError::AssetUnreadable {
                path: name.to_string(),
                reason: format!("SVG parsing failed: {e}"),
            }
        })?;

        let size = tree.size();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (width, height) = (size.width() as u32, size.height() as u32);

        Ok(Self {
            metrics: IconMetrics::new(name, width, height),
            source: IconSource::Vector(tree),
        })
    }

    #[cfg(not(feature = "svg"))]
    fn from_svg(name: &str, _bytes: &[u8]) -> RenderResult<Self> {
        Err(RenderError::AssetUnreadable {
            path: name.to_string(),
            reason: "SVG support is disabled".to_string(),
        })
    }

    /// Name and natural size.
    #[must_use]
    pub fn metrics(&self) -> &IconMetrics {
        &self.metrics
    }

    /// Draw the icon at exactly `width` x `height`.
    ///
    /// Returns `None` for a zero-area target.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Raster`] if the pixmap cannot be allocated.
    pub fn rasterize(&self, width: u32, height: u32) -> RenderResult<Option<Pixmap>> {
        if width == 0 || height == 0 {
            return Ok(None);
        }
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::Raster(format!(
                "cannot allocate {width}x{height} pixmap for icon '{}'",
                self.metrics.name
            ))
        })?;

        match &self.source {
            IconSource::Raster(img) => {
                let resized = image::imageops::resize(
                    img,
                    width,
                    height,
                    image::imageops::FilterType::Lanczos3,
                );
                for (dst, src) in pixmap.pixels_mut().iter_mut().zip(resized.pixels()) {
                    let [r, g, b, a] = src.0;
                    *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
                }
            }
            #[cfg(feature = "svg")]
            IconSource::Vector(tree) => {
                let size = tree.size();
                #[allow(clippy::cast_precision_loss)]
                let transform = tiny_skia::Transform::from_scale(
                    width as f32 / size.width(),
                    height as f32 / size.height(),
                );
                resvg::render(tree, transform, &mut pixmap.as_mut());
            }
        }

        Ok(Some(pixmap))
    }
}

fn is_svg(name: &str, bytes: &[u8]) -> bool {
    if has_extension(Path::new(name), "svg") {
        return true;
    }
    let head = &bytes[..bytes.len().min(512)];
    let head = String::from_utf8_lossy(head);
    let trimmed = head.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && head.contains("<svg"))
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// Source of decoded icons.
pub trait IconDecoder: Send + Sync {
    /// Decode the icon at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::AssetUnreadable`] if the icon cannot be
    /// read or decoded.
    fn decode(&self, path: &Path) -> RenderResult<DecodedIcon>;
}

/// Reads icons from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileIconDecoder;

impl IconDecoder for FileIconDecoder {
    fn decode(&self, path: &Path) -> RenderResult<DecodedIcon> {
        let bytes = std::fs::read(path).map_err(|e| RenderError::AssetUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let icon = DecodedIcon::from_bytes(&name, &bytes).map_err(|e| match e {
            RenderError::AssetUnreadable { reason, .. } => RenderError::AssetUnreadable {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        tracing::debug!(
            path = %path.display(),
            width = icon.metrics.width,
            height = icon.metrics.height,
            "Decoded icon"
        );
        Ok(icon)
    }
}

/// List the icons in `dir`, sorted by file name.
///
/// A missing or unreadable directory yields an empty list.
#[must_use]
pub fn scan_icons(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Icon directory unreadable");
            return Vec::new();
        }
    };

    let mut icons: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| ICON_EXTENSIONS.iter().any(|ext| has_extension(path, ext)))
        .collect();
    icons.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    icons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "svg")]
    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
        <rect x="0" y="0" width="20" height="10" fill="#ff0000"/>
    </svg>"##;

    #[test]
    fn test_svg_detection() {
        assert!(is_svg("icon.SVG", b""));
        assert!(is_svg("noext", b"<svg xmlns='x'/>"));
        assert!(is_svg("noext", b"<?xml version=\"1.0\"?>\n<svg/>"));
        assert!(!is_svg("icon.png", b"\x89PNG\r\n"));
    }

    #[test]
    fn test_garbage_bytes_unreadable() {
        let err = DecodedIcon::from_bytes("broken.png", b"definitely not png").expect_err("garbage");
        assert!(matches!(err, RenderError::AssetUnreadable { path, .. } if path == "broken.png"));
    }

    #[test]
    fn test_raster_resize_to_target() {
        let img = image::RgbaImage::from_pixel(3, 3, image::Rgba([0, 255, 0, 255]));
        let icon = DecodedIcon::from_image("green.png", img);
        assert_eq!((icon.metrics().width, icon.metrics().height), (3, 3));

        let pixmap = icon.rasterize(12, 6).expect("rasterize").expect("pixmap");
        assert_eq!((pixmap.width(), pixmap.height()), (12, 6));
        let px = pixmap.pixel(6, 3).expect("pixel");
        assert_eq!((px.green(), px.alpha()), (255, 255));
    }

    #[test]
    fn test_zero_target_is_none() {
        let icon = DecodedIcon::from_image("dot.png", image::RgbaImage::new(1, 1));
        assert!(icon.rasterize(0, 5).expect("rasterize").is_none());
    }

    #[cfg(feature = "svg")]
    #[test]
    fn test_svg_natural_size_and_scaling() {
        let icon = DecodedIcon::from_bytes("square.svg", SQUARE_SVG.as_bytes()).expect("decode");
        assert_eq!((icon.metrics().width, icon.metrics().height), (20, 10));

        let pixmap = icon.rasterize(40, 20).expect("rasterize").expect("pixmap");
        let px = pixmap.pixel(20, 10).expect("pixel").demultiply();
        assert_eq!((px.red(), px.green(), px.alpha()), (255, 0, 255));
    }

    #[test]
    fn test_scan_icons_filters_and_sorts() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["b.PNG", "a.svg", "c.jpeg", "notes.txt", "d.gif"] {
            std::fs::write(dir.path().join(name), b"x").expect("write");
        }
        std::fs::create_dir(dir.path().join("nested.png")).expect("mkdir");

        let names: Vec<String> = scan_icons(dir.path())
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(names, ["a.svg", "b.PNG", "c.jpeg"]);
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        assert!(scan_icons(Path::new("/nonexistent/icons")).is_empty());
    }

    #[test]
    fn test_file_decoder_reports_path() {
        let err = FileIconDecoder
            .decode(Path::new("/nonexistent/icon.png"))
            .expect_err("missing");
        assert!(
            matches!(err, RenderError::AssetUnreadable { path, .. } if path == "/nonexistent/icon.png")
        );
    }
}
