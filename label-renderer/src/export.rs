//! Writing finished labels.

use std::path::{Path, PathBuf};

use crate::error::{RenderError, RenderResult};
use crate::raster::LabelImage;

/// Destination for exported labels.
pub trait ExportSink {
    /// Store `image` as `filename` and return where it went.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if the image cannot be encoded or
    /// stored.
    fn write(&self, image: &LabelImage, filename: &str) -> RenderResult<PathBuf>;
}

/// Writes PNG files into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink for `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectorySink {
    fn write(&self, image: &LabelImage, filename: &str) -> RenderResult<PathBuf> {
        let bytes = image.encode_png()?;

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            RenderError::Export(format!("cannot create {}: {e}", self.dir.display()))
        })?;

        let path = self.dir.join(filename);
        std::fs::write(&path, &bytes)
            .map_err(|e| RenderError::Export(format!("cannot write {}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Label exported");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> LabelImage {
        LabelImage {
            width,
            height,
            data: vec![255; (width * height * 4) as usize],
        }
    }

    #[test]
    fn test_writes_png_creating_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let sink = DirectorySink::new(tmp.path().join("out").join("labels"));

        let path = sink.write(&white(4, 2), "label.png").expect("write");
        assert_eq!(path, tmp.path().join("out/labels/label.png"));

        let bytes = std::fs::read(&path).expect("read back");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).expect("decode").to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 2));
    }

    #[test]
    fn test_empty_image_rejected_without_creating_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let sink = DirectorySink::new(tmp.path());
        let err = sink
            .write(&LabelImage::empty(0, 50), "empty.png")
            .expect_err("empty image");
        assert!(matches!(err, RenderError::Export(_)));
        assert!(!tmp.path().join("empty.png").exists());
    }

    #[test]
    fn test_unwritable_target_is_export_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").expect("write");
        let sink = DirectorySink::new(blocker.join("sub"));
        let err = sink.write(&white(1, 1), "x.png").expect_err("not a dir");
        assert!(matches!(err, RenderError::Export(_)));
    }
}
