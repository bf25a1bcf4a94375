//! # Label Forge Renderer
//!
//! Turns a [`label_core::LabelPlan`] into pixels and PNG files.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────┐   ┌───────────────┐
//! │ IconDecoder  │──►│                 │   │               │
//! │ (image/usvg) │   │  LabelRenderer  │──►│  LabelImage   │──► ExportSink
//! ├──────────────┤   │  (tiny-skia)    │   │  (RGBA8)      │    (PNG file)
//! │ TextPainter  │──►│                 │   │               │
//! │ (fontdue)    │   └─────────────────┘   └───────────────┘
//! └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod font;
pub mod icon;
pub mod raster;

pub use error::{RenderError, RenderResult};
pub use export::{DirectorySink, ExportSink};
pub use font::FontFace;
pub use icon::{scan_icons, DecodedIcon, FileIconDecoder, IconDecoder, ICON_EXTENSIONS};
pub use raster::{LabelImage, LabelRenderer, LabelStyle, RenderedLabel, TextPainter};
