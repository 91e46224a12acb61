//! The editing session: one tree plus the selection, history, and the single
//! active-gesture slot that routes pointer events to drag or resize.
//!
//! Every public mutation goes through here so each user-visible change lands as
//! exactly one history checkpoint. Pointer positions are in screen space and
//! are mapped through the current [`CanvasTransform`].

use crate::config::EditorConfig;
use crate::constants::PASTE_OFFSET;
use crate::document::Document;
use crate::drag::DragSession;
use crate::drop_zone::{self, DropTarget};
use crate::error::TreeResult;
use crate::history::History;
use crate::node::{Node, NodeId, NodeKind, NodePatch};
use crate::resize::{ResizeHandle, ResizeSession};
use crate::selection::Selection;
use crate::snap::snap_pos;
use crate::tree::ElementTree;
use crate::viewport::{CanvasTransform, Viewport};
use egui::{vec2, Pos2};

#[derive(Clone, Debug, Default)]
enum Gesture {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

/// What a pointer-down started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerDown {
    /// Pressed on empty canvas; the selection was cleared.
    Background,
    Drag(NodeId),
    Resize(NodeId, ResizeHandle),
}

pub struct Editor {
    tree: ElementTree,
    history: History,
    selection: Selection,
    gesture: Gesture,
    clipboard: Option<Node>,
    config: EditorConfig,
    transform: CanvasTransform,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let config = config.validated();
        let tree = ElementTree::new();
        Self {
            history: History::new(tree.clone(), config.history_capacity),
            tree,
            selection: Selection::default(),
            gesture: Gesture::Idle,
            clipboard: None,
            transform: CanvasTransform::default(),
            config,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Read Access
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Root-level nodes, for rendering and serialization.
    pub fn get_tree(&self) -> &[Node] {
        self.tree.roots()
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.tree.find(id)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selection.selected()
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.selection.hovered()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Mutations (one checkpoint each)
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn insert(&mut self, node: Node, parent: Option<NodeId>) -> TreeResult<NodeId> {
        self.cancel_gesture();
        let id = self.tree.insert(node, parent)?;
        self.checkpoint();
        Ok(id)
    }

    /// Applies a property edit. Records a checkpoint only if the node changed.
    pub fn update(&mut self, id: NodeId, patch: &NodePatch) -> bool {
        self.cancel_gesture();
        let changed = self.tree.update(id, patch);
        if changed {
            self.checkpoint();
        }
        changed
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.cancel_gesture();
        let removed = self.tree.remove(id)?;
        self.selection.retain_present(&self.tree);
        self.checkpoint();
        Some(removed)
    }

    pub fn remove_selected(&mut self) -> Option<Node> {
        self.selected().and_then(|id| self.remove(id))
    }

    pub fn select(&mut self, id: Option<NodeId>) -> bool {
        if self.is_gesturing() {
            log::debug!("selection change ignored during a gesture");
            return false;
        }
        self.selection.select(id, &self.tree)
    }

    /// Instantiates `kind` at `point` (document space) inside the topmost
    /// container under it, and selects the new node.
    pub fn drop_new(&mut self, kind: NodeKind, point: Pos2) -> TreeResult<NodeId> {
        let target = self.drop_target(point);
        let origin = snap_pos(target.local, self.config.effective_grid());
        let id = self.insert(Node::from_template(kind).at(origin), target.parent)?;
        self.selection.select(Some(id), &self.tree);
        Ok(id)
    }

    /// Container that would receive a new node dropped at `point`.
    pub fn drop_target(&self, point: Pos2) -> DropTarget {
        drop_zone::resolve(&self.tree, point, None)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Clipboard
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn copy(&mut self, id: NodeId) -> bool {
        match self.tree.find(id) {
            Some(node) => {
                self.clipboard = Some(node.clone());
                true
            }
            None => false,
        }
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Inserts a fresh copy of the clipboard under `parent`, offset from the
    /// original so it does not sit on top of it.
    pub fn paste(&mut self, parent: Option<NodeId>) -> Option<NodeId> {
        let mut node = self.clipboard.clone()?;
        node.walk_mut(&mut |n| n.id = NodeId::new());
        let offset = self.paste_offset();
        node.geometry
            .set_origin(node.geometry.origin() + vec2(offset, offset));
        self.place_copy(node, parent)
    }

    /// Copies `id` next to itself in the same parent.
    pub fn duplicate(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.tree.locate(id)?.parent;
        let mut node = self.tree.clone_subtree(id)?;
        let offset = self.paste_offset();
        node.geometry
            .set_origin(node.geometry.origin() + vec2(offset, offset));
        self.place_copy(node, parent)
    }

    fn place_copy(&mut self, node: Node, parent: Option<NodeId>) -> Option<NodeId> {
        // fall back to the root when the requested parent cannot hold children
        let parent =
            parent.filter(|&p| self.tree.find(p).is_some_and(|n| n.kind.is_container()));
        match self.insert(node, parent) {
            Ok(id) => {
                self.selection.select(Some(id), &self.tree);
                Some(id)
            }
            Err(err) => {
                log::debug!("paste rejected: {err}");
                None
            }
        }
    }

    fn paste_offset(&self) -> f32 {
        let grid = self.config.effective_grid();
        if grid > 0.0 {
            grid
        } else {
            PASTE_OFFSET
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        match self.history.undo() {
            Some(tree) => {
                self.restore(tree);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        match self.history.redo() {
            Some(tree) => {
                self.restore(tree);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn restore(&mut self, tree: ElementTree) {
        self.tree = tree;
        self.selection.retain_present(&self.tree);
    }

    fn checkpoint(&mut self) {
        self.history.record(&self.tree);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Documents
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn document(&self) -> Document {
        Document::from_tree(&self.tree)
    }

    /// Opens `document` as a new session: history restarts from it.
    pub fn load_document(&mut self, document: Document) {
        self.cancel_gesture();
        self.tree = document.into_tree();
        self.history.reset(&self.tree);
        self.selection = Selection::default();
        log::info!("opened document with {} nodes", self.tree.len());
    }

    /// Replaces every node as a single undoable edit.
    pub fn set_elements(&mut self, elements: Vec<Node>) {
        self.cancel_gesture();
        self.tree = ElementTree::from_roots(elements);
        self.selection.retain_present(&self.tree);
        self.checkpoint();
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // View
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn transform(&self) -> CanvasTransform {
        self.transform
    }

    /// Screen position of the document origin, set by the host every frame.
    pub fn set_canvas_origin(&mut self, origin: Pos2) {
        self.transform.origin = origin;
    }

    pub fn zoom(&self) -> f32 {
        self.transform.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.transform.zoom = self.config.clamp_zoom(zoom);
    }

    pub fn set_zoom_percent(&mut self, percent: u32) {
        self.set_zoom(percent as f32 / 100.0);
    }

    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.config.snap_to_grid = enabled;
    }

    /// Topmost node whose absolute rect contains `point` (document space).
    pub fn hit_test(&self, point: Pos2) -> Option<NodeId> {
        self.tree
            .placements()
            .into_iter()
            .rev()
            .find(|p| p.rect.contains(point))
            .map(|p| p.id)
    }

    /// Resize handle of the selected node under `point` (document space).
    pub fn handle_at(&self, point: Pos2) -> Option<ResizeHandle> {
        let rect = self.tree.absolute_rect(self.selected()?)?;
        let size = self.config.handle_size / self.transform.zoom;
        ResizeHandle::ALL
            .into_iter()
            .find(|h| h.hit_rect(rect, size).contains(point))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Pointer Routing
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn is_gesturing(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    pub fn dragging(&self) -> Option<NodeId> {
        match &self.gesture {
            Gesture::Dragging(drag) => Some(drag.node_id()),
            _ => None,
        }
    }

    pub fn resizing(&self) -> Option<(NodeId, ResizeHandle)> {
        match &self.gesture {
            Gesture::Resizing(resize) => Some((resize.node_id(), resize.handle())),
            _ => None,
        }
    }

    /// Container highlighted while a drag is in progress.
    pub fn drop_candidate(&self) -> Option<DropTarget> {
        match &self.gesture {
            Gesture::Dragging(drag) => Some(drag.candidate()),
            _ => None,
        }
    }

    /// Starts a gesture at the screen position `pointer`.
    ///
    /// A handle of the selected node starts a resize; any other node is
    /// selected and starts a drag; empty canvas clears the selection.
    pub fn pointer_down(&mut self, pointer: Pos2) -> PointerDown {
        self.cancel_gesture();
        let point = self.transform.to_document(pointer);
        let grid = self.config.effective_grid();

        if let (Some(id), Some(handle)) = (self.selected(), self.handle_at(point)) {
            if let Some(session) = ResizeSession::begin(&self.tree, id, handle, pointer, grid) {
                self.gesture = Gesture::Resizing(session);
                return PointerDown::Resize(id, handle);
            }
        }

        match self.hit_test(point) {
            Some(id) => {
                self.selection.select(Some(id), &self.tree);
                if let Some(session) = DragSession::begin(&self.tree, id, pointer) {
                    self.gesture = Gesture::Dragging(session);
                }
                PointerDown::Drag(id)
            }
            None => {
                self.selection.clear();
                PointerDown::Background
            }
        }
    }

    /// Feeds a pointer move to the active gesture, or updates hover when idle.
    pub fn pointer_move(&mut self, pointer: Pos2) {
        if !self.is_gesturing() {
            let hovered = self.hit_test(self.transform.to_document(pointer));
            self.selection.hover(hovered);
            return;
        }
        let grid = self.config.effective_grid();
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging(drag) => {
                drag.update(&mut self.tree, pointer, &self.transform, grid);
            }
            Gesture::Resizing(resize) => {
                resize.update(&mut self.tree, pointer, &self.transform);
            }
        }
    }

    /// Finishes the active gesture. Returns true if it recorded a checkpoint.
    pub fn pointer_up(&mut self) -> bool {
        let changed = match std::mem::take(&mut self.gesture) {
            Gesture::Idle => return false,
            Gesture::Dragging(drag) => drag.finish(&mut self.tree).changed(),
            Gesture::Resizing(resize) => resize.finish(&self.tree),
        };
        if changed {
            self.checkpoint();
        }
        changed
    }

    /// Aborts the active gesture and restores the geometry it started from.
    pub fn cancel_gesture(&mut self) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => false,
            Gesture::Dragging(drag) => {
                drag.cancel(&mut self.tree);
                true
            }
            Gesture::Resizing(resize) => {
                resize.cancel(&mut self.tree);
                true
            }
        }
    }
}
