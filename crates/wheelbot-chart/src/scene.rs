//! Backend-independent drawing plans.
//!
//! A [`StylePainter`] turns scores into a [`Scene`]: pixel-space shapes in
//! paint order. The renderer draws the same scene onto the PNG and SVG
//! backends, so both artifacts share one geometry.

use crate::color::Rgb;
use crate::layout::{WheelLayout, GRID_LEVELS, SCALE_MAX, TITLE};
use crate::style::{ChartStyle, Palette, Theme};

/// A single drawable element in pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled polygon
    Fill {
        points: Vec<(f64, f64)>,
        color: Rgb,
        opacity: f64,
    },
    /// Open or closed polyline
    Line {
        points: Vec<(f64, f64)>,
        color: Rgb,
        opacity: f64,
        width: u32,
    },
    /// Circle outline
    Ring {
        center: (f64, f64),
        radius: f64,
        color: Rgb,
        width: u32,
    },
    /// Text centred on `at`
    Text {
        text: String,
        at: (f64, f64),
        color: Rgb,
        size: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(layout: &WheelLayout, background: Rgb) -> Self {
        Self {
            width: layout.width,
            height: layout.height,
            background,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Scores and their labels, positionally aligned
#[derive(Debug, Clone, Copy)]
pub struct WheelInput<'a> {
    pub values: &'a [u8],
    pub labels: &'a [String],
}

impl WheelInput<'_> {
    fn value(&self, i: usize) -> f64 {
        f64::from(self.values[i]).min(SCALE_MAX)
    }
}

/// Composes the scene for one chart style
pub trait StylePainter: Send + Sync {
    fn style(&self) -> ChartStyle;

    fn paint(&self, input: &WheelInput<'_>, layout: &WheelLayout, theme: Theme, accent: Rgb)
        -> Scene;
}

/// Painter for a style
pub fn painter_for(style: ChartStyle) -> Box<dyn StylePainter> {
    match style {
        ChartStyle::Radar => Box::new(RadarPainter),
        ChartStyle::Donut => Box::new(DonutPainter),
        ChartStyle::Rose => Box::new(RosePainter),
        ChartStyle::Neon => Box::new(NeonPainter),
    }
}

const GRID_WIDTH: u32 = 1;

/// Polygon outline for radar and neon. Strokes are whole pixels, so the
/// neon glow line (2.4) rounds down to the radar width.
const OUTLINE_WIDTH: u32 = 2;

fn draw_grid(scene: &mut Scene, layout: &WheelLayout, palette: &Palette) {
    for level in GRID_LEVELS {
        scene.push(Shape::Ring {
            center: layout.center,
            radius: layout.radius(f64::from(level)),
            color: palette.grid,
            width: GRID_WIDTH,
        });
    }
    for i in 0..layout.spokes {
        scene.push(Shape::Line {
            points: vec![layout.center, layout.vertex(i, SCALE_MAX)],
            color: palette.grid,
            opacity: 1.0,
            width: GRID_WIDTH,
        });
    }
}

fn draw_ticks(scene: &mut Scene, layout: &WheelLayout, palette: &Palette) {
    for level in GRID_LEVELS {
        scene.push(Shape::Text {
            text: level.to_string(),
            at: layout.tick_anchor(level),
            color: palette.tick,
            size: layout.text_size() * 0.85,
        });
    }
}

fn draw_labels(scene: &mut Scene, input: &WheelInput<'_>, layout: &WheelLayout, color: Rgb) {
    for (i, label) in input.labels.iter().enumerate() {
        scene.push(Shape::Text {
            text: label.clone(),
            at: layout.label_anchor(i),
            color,
            size: layout.text_size(),
        });
    }
}

fn draw_title(scene: &mut Scene, layout: &WheelLayout, color: Rgb) {
    scene.push(Shape::Text {
        text: TITLE.to_string(),
        at: layout.title_anchor(),
        color,
        size: layout.title_size(),
    });
}

fn outline(input: &WheelInput<'_>, layout: &WheelLayout) -> Vec<(f64, f64)> {
    (0..input.values.len())
        .map(|i| layout.vertex(i, input.value(i)))
        .collect()
}

/// Polygon fill plus a closed outline, shared by radar and neon
fn draw_polygon(
    scene: &mut Scene,
    input: &WheelInput<'_>,
    layout: &WheelLayout,
    color: Rgb,
    fill_opacity: f64,
    width: u32,
) {
    let points = outline(input, layout);
    let mut closed = points.clone();
    if let Some(first) = points.first() {
        closed.push(*first);
    }
    scene.push(Shape::Fill {
        points,
        color,
        opacity: fill_opacity,
    });
    scene.push(Shape::Line {
        points: closed,
        color,
        opacity: 1.0,
        width,
    });
}

pub struct RadarPainter;

impl StylePainter for RadarPainter {
    fn style(&self) -> ChartStyle {
        ChartStyle::Radar
    }

    fn paint(&self, input: &WheelInput<'_>, layout: &WheelLayout, theme: Theme, accent: Rgb) -> Scene {
        let palette = theme.palette();
        let mut scene = Scene::new(layout, palette.background);
        draw_grid(&mut scene, layout, &palette);
        draw_ticks(&mut scene, layout, &palette);
        draw_polygon(&mut scene, input, layout, accent, 0.28, OUTLINE_WIDTH);
        draw_labels(&mut scene, input, layout, palette.label);
        draw_title(&mut scene, layout, palette.title);
        scene
    }
}

pub struct DonutPainter;

impl StylePainter for DonutPainter {
    fn style(&self) -> ChartStyle {
        ChartStyle::Donut
    }

    fn paint(&self, input: &WheelInput<'_>, layout: &WheelLayout, theme: Theme, accent: Rgb) -> Scene {
        let palette = theme.palette();
        let (base, edge) = match theme {
            Theme::Dark => (Rgb::new(0x31, 0x45, 0x59), Rgb::new(0x1E, 0x2B, 0x38)),
            Theme::Light => (Rgb::new(0xF1, 0xF3, 0xF5), Rgb::new(0xE6, 0xE8, 0xEB)),
        };
        let mut scene = Scene::new(layout, palette.background);
        for i in 0..input.values.len() {
            let wedge = layout.wedge(i, SCALE_MAX);
            scene.push(Shape::Fill {
                points: wedge.clone(),
                color: base,
                opacity: 1.0,
            });
            scene.push(Shape::Line {
                points: wedge,
                color: edge,
                opacity: 1.0,
                width: 1,
            });
        }
        draw_grid(&mut scene, layout, &palette);
        for i in 0..input.values.len() {
            let value = input.value(i);
            if value > 0.0 {
                scene.push(Shape::Fill {
                    points: layout.wedge(i, value),
                    color: accent,
                    opacity: 0.86,
                });
            }
        }
        draw_ticks(&mut scene, layout, &palette);
        draw_labels(&mut scene, input, layout, palette.label);
        draw_title(&mut scene, layout, palette.title);
        scene
    }
}

pub struct RosePainter;

impl RosePainter {
    /// Wedge opacity rises linearly from 0.35 at zero to 1.0 at the maximum
    pub fn opacity(value: f64) -> f64 {
        0.35 + 0.65 * (value / SCALE_MAX)
    }
}

impl StylePainter for RosePainter {
    fn style(&self) -> ChartStyle {
        ChartStyle::Rose
    }

    fn paint(&self, input: &WheelInput<'_>, layout: &WheelLayout, theme: Theme, accent: Rgb) -> Scene {
        let palette = theme.palette();
        let base = match theme {
            Theme::Dark => Rgb::new(0x2C, 0x3E, 0x50),
            Theme::Light => Rgb::new(0xED, 0xF2, 0xF7),
        };
        let mut scene = Scene::new(layout, palette.background);
        for i in 0..input.values.len() {
            scene.push(Shape::Fill {
                points: layout.wedge(i, SCALE_MAX),
                color: base,
                opacity: 0.35,
            });
        }
        draw_grid(&mut scene, layout, &palette);
        for i in 0..input.values.len() {
            let value = input.value(i);
            if value > 0.0 {
                scene.push(Shape::Fill {
                    points: layout.wedge(i, value),
                    color: accent,
                    opacity: Self::opacity(value),
                });
            }
        }
        draw_ticks(&mut scene, layout, &palette);
        draw_labels(&mut scene, input, layout, palette.label);
        draw_title(&mut scene, layout, palette.title);
        scene
    }
}

pub struct NeonPainter;

impl NeonPainter {
    pub const ACCENT: Rgb = Rgb::new(0x00, 0xE5, 0xFF);

    /// Always dark, whatever theme was requested
    pub fn palette() -> Palette {
        Palette {
            background: Rgb::new(0x0B, 0x0F, 0x14),
            grid: Rgb::new(0x12, 0x3A, 0x4A),
            label: Rgb::new(0xCD, 0xEB, 0xFF),
            tick: Rgb::new(0x8A, 0xF6, 0xFF),
            title: Rgb::new(0xCD, 0xEB, 0xFF),
        }
    }
}

impl StylePainter for NeonPainter {
    fn style(&self) -> ChartStyle {
        ChartStyle::Neon
    }

    fn paint(&self, input: &WheelInput<'_>, layout: &WheelLayout, _theme: Theme, _accent: Rgb) -> Scene {
        let palette = Self::palette();
        let mut scene = Scene::new(layout, palette.background);
        draw_grid(&mut scene, layout, &palette);
        draw_ticks(&mut scene, layout, &palette);
        draw_polygon(&mut scene, input, layout, Self::ACCENT, 0.18, OUTLINE_WIDTH);
        draw_labels(&mut scene, input, layout, palette.label);
        draw_title(&mut scene, layout, palette.title);
        scene
    }
}
