//! Canvas width presets and the screen <-> document coordinate transform.

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Page width the canvas simulates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    pub const ALL: [Viewport; 3] = [Viewport::Desktop, Viewport::Tablet, Viewport::Mobile];

    /// Canvas width in document units.
    pub fn canvas_width(self) -> f32 {
        match self {
            Viewport::Desktop => 1200.0,
            Viewport::Tablet => 768.0,
            Viewport::Mobile => 375.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Viewport::Desktop => "Desktop",
            Viewport::Tablet => "Tablet",
            Viewport::Mobile => "Mobile",
        }
    }
}

/// Maps screen positions to document positions: `doc = (screen - origin) / zoom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasTransform {
    /// Screen position of the document origin.
    pub origin: Pos2,
    /// Screen pixels per document unit.
    pub zoom: f32,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            origin: Pos2::ZERO,
            zoom: 1.0,
        }
    }
}

impl CanvasTransform {
    pub fn to_document(&self, screen: Pos2) -> Pos2 {
        ((screen - self.origin) / self.zoom).to_pos2()
    }

    pub fn to_screen(&self, document: Pos2) -> Pos2 {
        self.origin + document.to_vec2() * self.zoom
    }

    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_size(self.to_screen(rect.min), rect.size() * self.zoom)
    }

    /// Converts a screen-space distance into document units.
    pub fn delta_to_document(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}
