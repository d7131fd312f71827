use std::path::{Path, PathBuf};
use std::time::Instant;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::color::{AccentColor, Rgb};
use crate::error::ChartError;
use crate::fonts::{ensure_font, FONT_FAMILY};
use crate::layout::WheelLayout;
use crate::scene::{painter_for, Scene, Shape, WheelInput};
use crate::style::{ChartStyle, Theme};

/// Canvas edge in pixels (6.3in at 180dpi)
pub const DEFAULT_SIZE_PX: u32 = 1134;

/// Per-chart look, chosen per user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(default)]
    pub style: ChartStyle,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub accent: AccentColor,
}

/// Process-wide renderer settings
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub size_px: u32,
    /// Also produce the SVG artifact
    pub vector: bool,
    /// TTF font for raster text
    pub font_path: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size_px: DEFAULT_SIZE_PX,
            vector: true,
            font_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Png,
    Svg,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Png => "png",
            ArtifactKind::Svg => "svg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ArtifactKind::Png => "image/png",
            ArtifactKind::Svg => "image/svg+xml",
        }
    }
}

/// A rendered image in a temporary file. The file is removed on drop.
#[derive(Debug)]
pub struct ChartArtifact {
    kind: ArtifactKind,
    file: NamedTempFile,
}

impl ChartArtifact {
    fn create(kind: ArtifactKind) -> Result<Self, ChartError> {
        let file = tempfile::Builder::new()
            .prefix("wheel_")
            .suffix(&format!(".{}", kind.extension()))
            .tempfile()?;
        Ok(Self { kind, file })
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.path())
    }

    /// Copy the artifact to `dir/{stem}.{ext}`; the temporary file is unaffected.
    pub fn persist_to(&self, dir: &Path, stem: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let target = dir.join(format!("{}.{}", stem, self.kind.extension()));
        std::fs::copy(self.path(), &target)?;
        Ok(target)
    }
}

/// Output of one render: the raster, the optional vector twin, and the
/// geometry both were drawn from.
#[derive(Debug)]
pub struct RenderedChart {
    pub raster: ChartArtifact,
    pub vector: Option<ChartArtifact>,
    pub layout: WheelLayout,
    pub scene: Scene,
}

impl RenderedChart {
    pub fn artifacts(&self) -> impl Iterator<Item = &ChartArtifact> {
        std::iter::once(&self.raster).chain(self.vector.as_ref())
    }
}

pub struct ChartRenderer {
    settings: RenderSettings,
    raster_text: bool,
}

impl ChartRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        let raster_text = ensure_font(settings.font_path.as_deref());
        Self {
            settings,
            raster_text,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Lay out and paint without touching the filesystem
    pub fn compose(
        &self,
        values: &[u8],
        labels: &[String],
        options: &ChartOptions,
    ) -> Result<(WheelLayout, Scene), ChartError> {
        if values.is_empty() {
            return Err(ChartError::Empty);
        }
        if values.len() != labels.len() {
            return Err(ChartError::Mismatch {
                values: values.len(),
                labels: labels.len(),
            });
        }

        let layout = WheelLayout::new(self.settings.size_px, values.len());
        let input = WheelInput { values, labels };
        let scene = painter_for(options.style).paint(
            &input,
            &layout,
            options.theme,
            options.accent.rgb(),
        );
        Ok((layout, scene))
    }

    /// Render the PNG (and SVG when enabled) into temporary files.
    pub fn render(
        &self,
        values: &[u8],
        labels: &[String],
        options: &ChartOptions,
    ) -> Result<RenderedChart, ChartError> {
        let started = Instant::now();
        let (layout, scene) = self.compose(values, labels, options)?;
        let size = (layout.width, layout.height);

        let raster = ChartArtifact::create(ArtifactKind::Png)?;
        {
            let root = BitMapBackend::new(raster.path(), size).into_drawing_area();
            draw_scene(&root, &scene, self.raster_text)?;
            root.present().map_err(draw_error)?;
        }

        let vector = if self.settings.vector {
            let svg = ChartArtifact::create(ArtifactKind::Svg)?;
            {
                let root = SVGBackend::new(svg.path(), size).into_drawing_area();
                draw_scene(&root, &scene, true)?;
                root.present().map_err(draw_error)?;
            }
            Some(svg)
        } else {
            None
        };

        debug!(
            style = %options.style,
            theme = %options.theme,
            vector = vector.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered wheel"
        );

        Ok(RenderedChart {
            raster,
            vector,
            layout,
            scene,
        })
    }
}

fn draw_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> ChartError {
    ChartError::Draw(e.to_string())
}

fn color(c: Rgb) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

fn pixel(p: (f64, f64)) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

fn pixels(points: &[(f64, f64)]) -> Vec<(i32, i32)> {
    points.iter().copied().map(pixel).collect()
}

fn draw_scene<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scene: &Scene,
    with_text: bool,
) -> Result<(), ChartError> {
    area.fill(&color(scene.background)).map_err(draw_error)?;

    for shape in &scene.shapes {
        match shape {
            Shape::Fill {
                points,
                color: c,
                opacity,
            } => {
                area.draw(&Polygon::new(
                    pixels(points),
                    color(*c).mix(*opacity).filled(),
                ))
                .map_err(draw_error)?;
            }
            Shape::Line {
                points,
                color: c,
                opacity,
                width,
            } => {
                area.draw(&PathElement::new(
                    pixels(points),
                    color(*c).mix(*opacity).stroke_width(*width),
                ))
                .map_err(draw_error)?;
            }
            Shape::Ring {
                center,
                radius,
                color: c,
                width,
            } => {
                area.draw(&Circle::new(
                    pixel(*center),
                    radius.round() as i32,
                    color(*c).stroke_width(*width),
                ))
                .map_err(draw_error)?;
            }
            Shape::Text {
                text,
                at,
                color: c,
                size,
            } => {
                if !with_text {
                    continue;
                }
                let ink = color(*c);
                let style = TextStyle::from((FONT_FAMILY, *size).into_font())
                    .color(&ink)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                area.draw(&Text::new(text.clone(), pixel(*at), style))
                    .map_err(draw_error)?;
            }
        }
    }
    Ok(())
}
