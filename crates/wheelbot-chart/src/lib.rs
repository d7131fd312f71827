//! # wheelbot-chart
//!
//! Renders the balance wheel: eight scores on a fixed 0..5 radial scale.
//!
//! Each [`ChartStyle`] has a [`StylePainter`] that composes a
//! backend-independent [`Scene`]; [`ChartRenderer`] draws that scene to a
//! PNG and, optionally, an SVG held in temporary files that are removed
//! when the [`RenderedChart`] is dropped.

mod color;
mod error;
mod fonts;
mod layout;
mod render;
mod scene;
mod style;

pub use color::{AccentColor, Rgb, DEFAULT_ACCENT};
pub use error::ChartError;
pub use fonts::ensure_font;
pub use layout::{WheelLayout, GRID_LEVELS, LABEL_OFFSET, SCALE_MAX, TITLE};
pub use render::{
    ArtifactKind, ChartArtifact, ChartOptions, ChartRenderer, RenderSettings, RenderedChart,
    DEFAULT_SIZE_PX,
};
pub use scene::{painter_for, Scene, Shape, StylePainter, WheelInput};
pub use style::{ChartStyle, Palette, Theme};
