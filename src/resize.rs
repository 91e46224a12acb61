//! Resizing the selected node from one of its eight edge/corner handles.

use crate::node::{Geometry, NodeId, NodePatch, SizeBounds};
use crate::snap::snap_within;
use crate::tree::ElementTree;
use crate::viewport::CanvasTransform;
use egui::{pos2, vec2, CursorIcon, Pos2, Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    pub fn affects_width(self) -> bool {
        !matches!(self, ResizeHandle::N | ResizeHandle::S)
    }

    pub fn affects_height(self) -> bool {
        !matches!(self, ResizeHandle::E | ResizeHandle::W)
    }

    /// The left edge moves; the right edge is the anchor.
    pub fn is_west(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    /// The top edge moves; the bottom edge is the anchor.
    pub fn is_north(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NW | ResizeHandle::NE)
    }

    /// Only the pure vertical handles derive width from height under an aspect lock.
    pub fn drives_height(self) -> bool {
        !self.affects_width()
    }

    /// Point on `rect` the handle sits on.
    pub fn anchor(self, rect: Rect) -> Pos2 {
        let x = if self.is_west() {
            rect.left()
        } else if self.affects_width() {
            rect.right()
        } else {
            rect.center().x
        };
        let y = if self.is_north() {
            rect.top()
        } else if self.affects_height() {
            rect.bottom()
        } else {
            rect.center().y
        };
        pos2(x, y)
    }

    /// Square hit area of `size` centred on the handle.
    pub fn hit_rect(self, rect: Rect, size: f32) -> Rect {
        Rect::from_center_size(self.anchor(rect), Vec2::splat(size))
    }

    pub fn cursor_icon(self) -> CursorIcon {
        match self {
            ResizeHandle::N => CursorIcon::ResizeNorth,
            ResizeHandle::S => CursorIcon::ResizeSouth,
            ResizeHandle::E => CursorIcon::ResizeEast,
            ResizeHandle::W => CursorIcon::ResizeWest,
            ResizeHandle::NE => CursorIcon::ResizeNorthEast,
            ResizeHandle::NW => CursorIcon::ResizeNorthWest,
            ResizeHandle::SE => CursorIcon::ResizeSouthEast,
            ResizeHandle::SW => CursorIcon::ResizeSouthWest,
        }
    }
}

/// Size rules for one resize gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeConstraints {
    pub bounds: SizeBounds,
    /// Width over height, when the kind keeps a fixed ratio.
    pub aspect_ratio: Option<f32>,
    pub grid: f32,
}

/// Computes the new rectangle for dragging `handle` by `delta` (document units).
///
/// Each affected dimension is clamped to its bounds, then snapped to the grid
/// without leaving them. An aspect ratio is applied last and may push the
/// derived dimension outside its own bounds. West and north handles move the
/// origin so the opposite edge stays put.
pub fn apply_resize(start: Rect, handle: ResizeHandle, delta: Vec2, c: &ResizeConstraints) -> Rect {
    let b = &c.bounds;
    let x_sign = if handle.is_west() { -1.0 } else { 1.0 };
    let y_sign = if handle.is_north() { -1.0 } else { 1.0 };

    let mut width = start.width();
    let mut height = start.height();
    if handle.affects_width() {
        let raw = b.clamp_width(start.width() + x_sign * delta.x);
        width = snap_within(raw, c.grid, b.min_width, b.max_width);
    }
    if handle.affects_height() {
        let raw = b.clamp_height(start.height() + y_sign * delta.y);
        height = snap_within(raw, c.grid, b.min_height, b.max_height);
    }

    if let Some(ratio) = c.aspect_ratio.filter(|r| r.is_finite() && *r > 0.0) {
        if handle.drives_height() {
            width = (height * ratio).round();
        } else {
            height = (width / ratio).round();
        }
    }

    let x = if handle.is_west() {
        start.min.x + (start.width() - width)
    } else {
        start.min.x
    };
    let y = if handle.is_north() {
        start.min.y + (start.height() - height)
    } else {
        start.min.y
    };
    Rect::from_min_size(pos2(x, y), vec2(width, height))
}

/// An in-progress resize of one node.
#[derive(Clone, Debug)]
pub struct ResizeSession {
    node_id: NodeId,
    handle: ResizeHandle,
    pointer_start: Pos2,
    start_geometry: Geometry,
    constraints: ResizeConstraints,
}

impl ResizeSession {
    pub fn begin(
        tree: &ElementTree,
        id: NodeId,
        handle: ResizeHandle,
        pointer: Pos2,
        grid: f32,
    ) -> Option<Self> {
        let node = tree.find(id)?;
        Some(Self {
            node_id: id,
            handle,
            pointer_start: pointer,
            start_geometry: node.geometry,
            constraints: ResizeConstraints {
                bounds: node.kind.bounds(),
                aspect_ratio: node.kind.aspect_ratio(),
                grid,
            },
        })
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn handle(&self) -> ResizeHandle {
        self.handle
    }

    /// Applies the resize for the current pointer and returns the new local rect.
    pub fn update(
        &mut self,
        tree: &mut ElementTree,
        pointer: Pos2,
        transform: &CanvasTransform,
    ) -> Rect {
        let delta = transform.delta_to_document(pointer - self.pointer_start);
        let rect = apply_resize(
            self.start_geometry.local_rect(),
            self.handle,
            delta,
            &self.constraints,
        );
        tree.update(self.node_id, &resize_patch(&self.start_geometry, self.handle, rect));
        rect
    }

    /// Ends the gesture. Returns true if the node's geometry differs from the start.
    pub fn finish(self, tree: &ElementTree) -> bool {
        tree.find(self.node_id)
            .is_some_and(|n| n.geometry != self.start_geometry)
    }

    pub fn cancel(self, tree: &mut ElementTree) {
        if let Some(node) = tree.find_mut(self.node_id) {
            node.geometry = self.start_geometry;
        }
    }
}

/// Only writes the origin when the handle moves it, so flow-placed nodes
/// resized from the south-east keep an unset position.
fn resize_patch(start: &Geometry, handle: ResizeHandle, rect: Rect) -> NodePatch {
    let mut patch = NodePatch::resized(rect);
    if !handle.is_west() {
        patch.geometry.x = start.x;
    }
    if !handle.is_north() {
        patch.geometry.y = start.y;
    }
    patch
}
