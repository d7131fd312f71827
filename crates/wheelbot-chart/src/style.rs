use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Visual encoding of the wheel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    /// Closed polygon with a translucent fill
    #[default]
    Radar,
    /// One wedge per facet over a full-scale background wedge
    Donut,
    /// Donut wedges whose opacity grows with the score
    Rose,
    /// Radar on a forced dark background with a fixed neon accent
    Neon,
}

impl ChartStyle {
    pub const ALL: [ChartStyle; 4] = [
        ChartStyle::Radar,
        ChartStyle::Donut,
        ChartStyle::Rose,
        ChartStyle::Neon,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartStyle::Radar => "radar",
            ChartStyle::Donut => "donut",
            ChartStyle::Rose => "rose",
            ChartStyle::Neon => "neon",
        }
    }
}

impl std::fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChartStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "radar" | "polygon" => Ok(ChartStyle::Radar),
            "donut" | "ring" => Ok(ChartStyle::Donut),
            "rose" => Ok(ChartStyle::Rose),
            "neon" => Ok(ChartStyle::Neon),
            _ => Err(format!("Unknown chart style: {}", s)),
        }
    }
}

/// Light or dark background
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: Rgb::new(0xFF, 0xFF, 0xFF),
                grid: Rgb::new(0xE6, 0xE8, 0xEB),
                label: Rgb::new(0x1F, 0x24, 0x30),
                tick: Rgb::new(0x1F, 0x24, 0x30),
                title: Rgb::new(0x1F, 0x24, 0x30),
            },
            Theme::Dark => Palette {
                background: Rgb::new(0x0B, 0x0F, 0x14),
                grid: Rgb::new(0x22, 0x34, 0x44),
                label: Rgb::new(0xE8, 0xF1, 0xFF),
                tick: Rgb::new(0xE8, 0xF1, 0xFF),
                title: Rgb::new(0xE8, 0xF1, 0xFF),
            },
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// Colours shared by every element that is not the accent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub grid: Rgb,
    pub label: Rgb,
    pub tick: Rgb,
    pub title: Rgb,
}
