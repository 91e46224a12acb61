//! Centralized constants for node sizing, snapping, canvas chrome, and colors.
//!
//! Geometry values are in document units unless the name says otherwise. Screen-space
//! values (handles, outlines) are divided by the zoom factor before hit testing.

use egui::Color32;

// =============================================================================
// GRID AND HISTORY
// =============================================================================

/// Default snapping grid, in document units.
pub const DEFAULT_GRID_SIZE: f32 = 8.0;

/// Maximum number of whole-tree snapshots kept for undo/redo.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Fixed aspect ratio applied to media nodes while resizing.
pub const MEDIA_ASPECT_RATIO: f32 = 16.0 / 9.0;

// =============================================================================
// SIZE BOUNDS PER KIND CATEGORY (min_w, max_w, min_h, max_h)
// =============================================================================

pub const TEXT_BOUNDS: [f32; 4] = [50.0, 800.0, 24.0, 400.0];
pub const MEDIA_BOUNDS: [f32; 4] = [100.0, 1200.0, 56.0, 675.0];
pub const CONTAINER_BOUNDS: [f32; 4] = [200.0, 1600.0, 100.0, 1200.0];
pub const OTHER_BOUNDS: [f32; 4] = [50.0, 1000.0, 30.0, 1000.0];

// =============================================================================
// ZOOM
// =============================================================================

/// Smallest zoom factor the canvas accepts.
pub const MIN_ZOOM: f32 = 0.25;

/// Largest zoom factor the canvas accepts.
pub const MAX_ZOOM: f32 = 4.0;

/// Zoom percentages offered by the toolbar.
pub const ZOOM_PRESETS: [u32; 6] = [50, 75, 100, 125, 150, 200];

// =============================================================================
// CANVAS CONSTANTS
// =============================================================================

/// Spacing between the window edges and the page canvas.
pub const CANVAS_PADDING: f32 = 32.0;

/// Minimum height of the page canvas so an empty page still has a drop area.
pub const CANVAS_MIN_HEIGHT: f32 = 800.0;

/// Side length of a resize handle square, in screen pixels.
pub const HANDLE_SIZE: f32 = 10.0;

/// Offset of pasted and duplicated nodes when grid snapping is off.
pub const PASTE_OFFSET: f32 = 16.0;

/// Where a node dropped from the palette lands when the pointer is not over the canvas.
pub const PALETTE_DROP_ORIGIN: [f32; 2] = [40.0, 40.0];

// =============================================================================
// WINDOW CONSTANTS
// =============================================================================

pub const INITIAL_WINDOW_WIDTH: f32 = 1280.0;
pub const INITIAL_WINDOW_HEIGHT: f32 = 860.0;

/// Width of the layers side panel.
pub const LAYERS_PANEL_WIDTH: f32 = 220.0;

// =============================================================================
// RENDERING CONSTANTS
// =============================================================================

pub const NODE_CORNER_RADIUS: f32 = 4.0;
pub const OUTLINE_WIDTH: f32 = 2.0;
pub const LABEL_FONT_SIZE: f32 = 12.0;
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

// =============================================================================
// COLORS
// =============================================================================

pub const COLOR_CANVAS_BG: Color32 = Color32::WHITE;
pub const COLOR_WORKSPACE_BG: Color32 = Color32::from_rgb(243, 244, 246);
pub const COLOR_TOOLBAR_BG: Color32 = Color32::from_rgb(30, 30, 30);
pub const COLOR_SELECTION: Color32 = Color32::from_rgb(59, 130, 246);
pub const COLOR_HOVER: Color32 = Color32::from_rgb(147, 197, 253);
pub const COLOR_DROP_TARGET: Color32 = Color32::from_rgb(96, 165, 250);
pub const COLOR_DROP_TARGET_FILL: Color32 = Color32::from_rgba_premultiplied(30, 64, 175, 40);
pub const COLOR_CONTAINER_BORDER: Color32 = Color32::from_rgb(209, 213, 219);
pub const COLOR_MEDIA_PLACEHOLDER: Color32 = Color32::from_rgb(229, 231, 235);
pub const COLOR_DEFAULT_TEXT: Color32 = Color32::from_rgb(55, 65, 81);
pub const COLOR_HANDLE_FILL: Color32 = Color32::WHITE;
