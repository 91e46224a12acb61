use crate::constants::{
    DEFAULT_GRID_SIZE, DEFAULT_HISTORY_CAPACITY, HANDLE_SIZE, MAX_ZOOM, MIN_ZOOM,
};
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Editor settings. Missing keys in `settings.json` fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid_size: f32,
    pub snap_to_grid: bool,
    pub history_capacity: usize,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Side of a resize handle's hit square, in screen pixels.
    pub handle_size: f32,
    pub viewport: Viewport,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            snap_to_grid: true,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            handle_size: HANDLE_SIZE,
            viewport: Viewport::default(),
        }
    }
}

impl EditorConfig {
    /// Grid step gestures snap to; zero when snapping is off.
    pub fn effective_grid(&self) -> f32 {
        if self.snap_to_grid {
            self.grid_size.max(0.0)
        } else {
            0.0
        }
    }

    /// Resets a zoom range that is non-finite, non-positive, or inverted to
    /// the built-in one.
    pub fn validated(mut self) -> Self {
        let (min, max) = (self.min_zoom, self.max_zoom);
        let usable = min.is_finite() && max.is_finite() && min > 0.0 && min <= max;
        if !usable {
            log::warn!("zoom range {min}..{max} is unusable, using {MIN_ZOOM}..{MAX_ZOOM}");
            self.min_zoom = MIN_ZOOM;
            self.max_zoom = MAX_ZOOM;
        }
        self
    }

    /// Limits `zoom` to the configured range. Never panics, even on a range
    /// that skipped [`EditorConfig::validated`].
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        if !zoom.is_finite() {
            return 1.0;
        }
        let clamped = zoom.max(self.min_zoom).min(self.max_zoom);
        if clamped.is_finite() && clamped > 0.0 {
            clamped
        } else {
            1.0
        }
    }

    /// Reads `path`, using defaults when it is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let parsed = File::open(path)
            .map_err(|e| e.to_string())
            .and_then(|f| {
                serde_json::from_reader::<_, Self>(BufReader::new(f)).map_err(|e| e.to_string())
            });
        match parsed {
            Ok(config) => config.validated(),
            Err(err) => {
                log::warn!("ignoring settings at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), crate::error::DocumentError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
}
