//! # Label Forge Core
//!
//! Layout and auto-fit-text engine for fixed-size raster labels.
//! Everything here is pure: no pixels, no font files, no clock.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               compose_label                 │
//! ├─────────────────────────────────────────────┤
//! │  Canvas Width Resolver (width = "auto")     │
//! │        │                                    │
//! │        ▼                                    │
//! │  Layout Planner ──► icon / divider / text   │
//! │        │                                    │
//! │        ▼                                    │
//! │  Text-Fit Engine ──► font size              │
//! ├─────────────────────────────────────────────┤
//! │  TextMeasurer (supplied by the renderer)    │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod compose;
pub mod error;
pub mod fit;
pub mod layout;
pub mod measure;
pub mod naming;
pub mod preset;
pub mod text;
pub mod width;

pub use canvas::{CanvasSpec, CanvasWidth, IconMetrics, Padding, DEFAULT_MARGIN};
pub use compose::{compose_label, LabelPlan, LabelRequest, PlacedLine, TextPlacement};
pub use error::{LabelError, LabelResult};
pub use fit::{fit_font_size, FitResult, FontLimits, WidthBound};
pub use layout::{
    base_font_size, plan_layout, scaled_icon_width, Divider, LayoutPlan, LayoutRegion,
    TextAlign, TextRegion, TEXT_GAP,
};
pub use measure::{MonospaceMeasurer, TextExtent, TextMeasurer};
pub use naming::{export_filename, TIMESTAMP_FORMAT};
pub use preset::{CanvasPreset, PresetCatalog};
pub use text::TextBlock;
pub use width::resolve_width;

/// Label core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
