//! # Label Forge CLI
//!
//! Command-line front end for composing labels.
//!
//! ## Usage
//!
//! ```bash
//! label-forge render --preset Shelf --icon warning.svg --text "Danger Zone"
//! label-forge render --width auto --height 120 --text "Fits the text"
//! label-forge preview --preset Shelf --text "Check me" --out preview.png
//! label-forge presets
//! label-forge icons
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `LabelConfig` - Preset file, icon directory and font choice
//! - `LabelArgs` - What to put on one label
//! - `export_label` / `preview_label` - Render and write, used by the binary

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use label_core::{
    export_filename, CanvasPreset, CanvasSpec, CanvasWidth, LabelRequest, MonospaceMeasurer,
    Padding, PresetCatalog,
};
use label_renderer::{
    DecodedIcon, DirectorySink, ExportSink, FileIconDecoder, FontFace, IconDecoder, LabelImage,
    LabelRenderer, RenderedLabel, TextPainter,
};

/// Command-line arguments for label-forge.
#[derive(Debug, Clone, Parser)]
#[command(name = "label-forge")]
#[command(about = "Compose fixed-size raster labels with auto-fitting text")]
#[command(version)]
pub struct CliArgs {
    /// JSON file with canvas presets
    #[arg(long, env = "LABEL_PRESETS", default_value = "dimensions.json", global = true)]
    pub presets: PathBuf,

    /// Directory scanned for icons
    #[arg(long, env = "LABEL_ICONS_DIR", default_value = "icons", global = true)]
    pub icons_dir: PathBuf,

    /// Font file to use instead of a system font
    #[arg(long, env = "LABEL_FONT", global = true)]
    pub font: Option<PathBuf>,

    /// System font family
    #[arg(long, default_value = "Arial", global = true)]
    pub font_family: String,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render a label and save it as PNG
    Render {
        /// Label contents
        #[command(flatten)]
        label: LabelArgs,

        /// Output directory
        #[arg(long, default_value = "output")]
        output: PathBuf,
    },

    /// Render a scaled preview of a label
    Preview {
        /// Label contents
        #[command(flatten)]
        label: LabelArgs,

        /// Preview file to write
        #[arg(long, default_value = "preview.png")]
        out: PathBuf,

        /// Bounding box of the preview, WIDTHxHEIGHT
        #[arg(long, default_value = "400x200", value_parser = parse_size)]
        max: (u32, u32),
    },

    /// List the available canvas presets
    Presets,

    /// List the icons found in the icon directory
    Icons,
}

/// What goes on one label.
#[derive(Debug, Clone, Args)]
pub struct LabelArgs {
    /// Preset name (case-insensitive); the first preset when omitted
    #[arg(long)]
    pub preset: Option<String>,

    /// Canvas width in pixels, or `auto`; overrides the preset
    #[arg(long)]
    pub width: Option<String>,

    /// Canvas height in pixels; overrides the preset
    #[arg(long)]
    pub height: Option<u32>,

    /// Icon file name inside the icon directory, or a path
    #[arg(long)]
    pub icon: Option<String>,

    /// Label text; `\n` starts a new line
    #[arg(long, default_value = "Text here")]
    pub text: String,

    /// Drop the outer margin
    #[arg(long)]
    pub no_padding: bool,
}

impl LabelArgs {
    /// Canvas for these arguments: the chosen preset with any explicit
    /// width or height applied on top.
    #[must_use]
    pub fn canvas(&self, catalog: &PresetCatalog) -> CanvasSpec {
        let preset = self
            .preset
            .as_deref()
            .map_or_else(|| catalog.get(0), |name| catalog.select(name));
        let mut canvas = preset.canvas();
        if let Some(width) = &self.width {
            canvas.width = CanvasWidth::parse(width);
        }
        if let Some(height) = self.height {
            canvas.height = height;
        }
        canvas
    }

    /// Padding mode.
    #[must_use]
    pub fn padding(&self) -> Padding {
        Padding::from(!self.no_padding)
    }

    /// Text with literal `\n` escapes turned into line breaks.
    #[must_use]
    pub fn text(&self) -> String {
        self.text.replace("\\n", "\n")
    }
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct LabelConfig {
    /// Preset file.
    pub presets: PathBuf,
    /// Icon directory.
    pub icons_dir: PathBuf,
    /// Explicit font file.
    pub font: Option<PathBuf>,
    /// System font family to look up when no file is given.
    pub font_family: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            presets: PathBuf::from("dimensions.json"),
            icons_dir: PathBuf::from("icons"),
            font: None,
            font_family: "Arial".to_string(),
        }
    }
}

impl From<&CliArgs> for LabelConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            presets: args.presets.clone(),
            icons_dir: args.icons_dir.clone(),
            font: args.font.clone(),
            font_family: args.font_family.clone(),
        }
    }
}

impl LabelConfig {
    /// Load the preset catalog, falling back to the stock preset.
    #[must_use]
    pub fn catalog(&self) -> PresetCatalog {
        PresetCatalog::load(&self.presets, CanvasPreset::fallback())
    }

    /// Where the icon called `name` lives.
    ///
    /// Names with a directory component are used as given; bare file
    /// names are looked up in the icon directory.
    #[must_use]
    pub fn icon_path(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.components().count() > 1 || path.is_absolute() {
            path.to_path_buf()
        } else {
            self.icons_dir.join(path)
        }
    }

    /// Pick the text painter: the configured font file, then the system
    /// family, then block placeholders.
    #[must_use]
    pub fn painter(&self) -> Box<dyn TextPainter> {
        if let Some(path) = &self.font {
            match FontFace::from_file(path) {
                Ok(face) => return Box::new(face),
                Err(e) => tracing::warn!(error = %e, "Font file unusable, trying system fonts"),
            }
        }
        match FontFace::system(&self.font_family) {
            Ok(face) => {
                tracing::debug!(family = face.family(), "Using system font");
                Box::new(face)
            }
            Err(e) => {
                tracing::warn!(error = %e, "No usable font, drawing placeholder blocks");
                Box::new(MonospaceMeasurer::default())
            }
        }
    }
}

/// Parse `WIDTHxHEIGHT`.
///
/// # Errors
///
/// Returns a message if either side is missing or not a positive integer.
pub fn parse_size(input: &str) -> Result<(u32, u32), String> {
    let (w, h) = input
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{input}'"))?;
    let parse = |side: &str| {
        side.trim()
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| format!("'{side}' is not a positive integer"))
    };
    Ok((parse(w)?, parse(h)?))
}

/// Render the label described by `args`.
///
/// Returns the label and the icon path used, if any.
///
/// # Errors
///
/// Returns an error if the icon cannot be decoded or laid out.
pub fn render_label(
    config: &LabelConfig,
    catalog: &PresetCatalog,
    args: &LabelArgs,
    painter: &dyn TextPainter,
) -> anyhow::Result<(RenderedLabel, Option<PathBuf>)> {
    let icon_path = args.icon.as_deref().map(|name| config.icon_path(name));
    let icon: Option<DecodedIcon> = icon_path
        .as_deref()
        .map(|path| FileIconDecoder.decode(path))
        .transpose()?;

    let canvas = args.canvas(catalog);
    let request = LabelRequest::new(canvas)
        .with_text(&args.text())
        .with_padding(args.padding());

    let label = LabelRenderer::with_defaults()
        .render(&request, icon.as_ref(), painter)
        .context("Failed to render label")?;

    if let Some(text) = &label.plan.text {
        tracing::info!(
            width = label.plan.width,
            height = label.plan.height,
            font_size = text.font_size,
            overflow = text.fit.overflow,
            lines = text.lines.len(),
            "Label composed"
        );
    } else {
        tracing::info!(width = label.plan.width, height = label.plan.height, "Label composed");
    }

    Ok((label, icon_path))
}

/// Render a label and save it in `output` under a timestamped name.
///
/// # Errors
///
/// Returns an error if rendering fails or the file cannot be written.
pub fn export_label(
    config: &LabelConfig,
    catalog: &PresetCatalog,
    args: &LabelArgs,
    output: &Path,
    painter: &dyn TextPainter,
    now: NaiveDateTime,
) -> anyhow::Result<PathBuf> {
    let (label, icon_path) = render_label(config, catalog, args, painter)?;
    let filename = export_filename(icon_path.as_deref(), &args.text(), now);
    let path = DirectorySink::new(output)
        .write(&label.image, &filename)
        .context("Failed to save label")?;
    Ok(path)
}

/// Render a label and write a preview scaled into `max`.
///
/// # Errors
///
/// Returns an error if rendering fails or the preview cannot be written.
pub fn preview_label(
    config: &LabelConfig,
    catalog: &PresetCatalog,
    args: &LabelArgs,
    out: &Path,
    max: (u32, u32),
    painter: &dyn TextPainter,
) -> anyhow::Result<LabelImage> {
    let (label, _) = render_label(config, catalog, args, painter)?;
    let preview = label.image.preview(max.0, max.1);

    let dir = out.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let name = out
        .file_name()
        .and_then(|n| n.to_str())
        .context("Preview path has no file name")?;
    DirectorySink::new(dir)
        .write(&preview, name)
        .context("Failed to save preview")?;
    Ok(preview)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("400x200"), Ok((400, 200)));
        assert_eq!(parse_size("64X32"), Ok((64, 32)));
        assert!(parse_size("400").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax10").is_err());
    }

    #[test]
    fn test_icon_path_resolution() {
        let config = LabelConfig {
            icons_dir: PathBuf::from("assets/icons"),
            ..LabelConfig::default()
        };
        assert_eq!(config.icon_path("stop.png"), PathBuf::from("assets/icons/stop.png"));
        assert_eq!(config.icon_path("other/stop.png"), PathBuf::from("other/stop.png"));
        assert_eq!(config.icon_path("/abs/stop.png"), PathBuf::from("/abs/stop.png"));
    }

    #[test]
    fn test_canvas_overrides() {
        let catalog = PresetCatalog::fallback_only(CanvasPreset::fallback());
        let args = LabelArgs {
            preset: None,
            width: Some("AUTO".to_string()),
            height: Some(90),
            icon: None,
            text: String::new(),
            no_padding: false,
        };
        assert_eq!(args.canvas(&catalog), CanvasSpec::auto(90));

        let plain = LabelArgs {
            width: None,
            height: None,
            ..args
        };
        assert_eq!(plain.canvas(&catalog), CanvasSpec::fixed(400, 200));
    }

    #[test]
    fn test_text_escapes() {
        let args = LabelArgs {
            preset: None,
            width: None,
            height: None,
            icon: None,
            text: "one\\ntwo".to_string(),
            no_padding: true,
        };
        assert_eq!(args.text(), "one\ntwo");
        assert_eq!(args.padding(), Padding::Disabled);
    }
}
