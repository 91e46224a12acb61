//! Moving one node with the pointer, with live preview and drop-target tracking.
//!
//! A [`DragSession`] exists only between pointer-down and pointer-up. Each move
//! writes the snapped position straight into the tree; the drop target is only
//! highlighted until `finish` commits the reparent.

use crate::drop_zone::{self, DropTarget};
use crate::node::{Geometry, NodeId};
use crate::snap::snap_pos;
use crate::tree::ElementTree;
use crate::viewport::CanvasTransform;
use egui::Pos2;

#[derive(Clone, Debug)]
pub struct DragSession {
    node_id: NodeId,
    pointer_start: Pos2,
    start_geometry: Geometry,
    start_parent: Option<NodeId>,
    candidate: DropTarget,
}

/// What a finished drag did to the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragOutcome {
    pub moved: bool,
    pub reparented: bool,
}

impl DragOutcome {
    pub fn changed(&self) -> bool {
        self.moved || self.reparented
    }
}

impl DragSession {
    /// Starts dragging `id` from the screen position `pointer`.
    pub fn begin(tree: &ElementTree, id: NodeId, pointer: Pos2) -> Option<Self> {
        let node = tree.find(id)?;
        let location = tree.locate(id)?;
        let absolute = tree.absolute_origin(id)?;
        Some(Self {
            node_id: id,
            pointer_start: pointer,
            start_geometry: node.geometry,
            start_parent: location.parent,
            candidate: DropTarget {
                parent: location.parent,
                local: absolute,
            },
        })
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Container currently highlighted as the drop receiver.
    pub fn candidate(&self) -> DropTarget {
        self.candidate
    }

    /// `start + (pointer - pointer_start) / zoom`, snapped to the grid.
    pub fn proposed_position(&self, pointer: Pos2, transform: &CanvasTransform, grid: f32) -> Pos2 {
        let delta = transform.delta_to_document(pointer - self.pointer_start);
        snap_pos(self.start_geometry.origin() + delta, grid)
    }

    /// Applies the move for `pointer` and refreshes the drop candidate.
    pub fn update(
        &mut self,
        tree: &mut ElementTree,
        pointer: Pos2,
        transform: &CanvasTransform,
        grid: f32,
    ) -> DropTarget {
        let position = self.proposed_position(pointer, transform, grid);
        tree.set_origin(self.node_id, position);
        self.candidate =
            drop_zone::resolve(tree, transform.to_document(pointer), Some(self.node_id));
        self.candidate
    }

    /// Ends the drag, moving the node into the candidate container if it changed.
    pub fn finish(self, tree: &mut ElementTree) -> DragOutcome {
        let Some(node) = tree.find(self.node_id) else {
            log::debug!("drag target {} vanished before release", self.node_id);
            return DragOutcome::default();
        };
        let mut outcome = DragOutcome {
            moved: node.geometry != self.start_geometry,
            reparented: false,
        };

        let target = self.candidate.parent;
        if target != self.start_parent {
            let reparent = drop_zone::check_reparent(tree, self.node_id, target)
                .and_then(|()| tree.reparent(self.node_id, target));
            match reparent {
                Ok(()) => outcome.reparented = true,
                Err(err) => log::debug!("drop of {} rejected: {err}", self.node_id),
            }
        }
        outcome
    }

    /// Aborts the drag, restoring the geometry the node had at pointer-down.
    pub fn cancel(self, tree: &mut ElementTree) {
        if let Some(node) = tree.find_mut(self.node_id) {
            node.geometry = self.start_geometry;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeKind};
    use egui::{pos2, vec2};

    fn tree_with_shape(at: Pos2) -> (ElementTree, NodeId) {
        let mut tree = ElementTree::new();
        let id = tree
            .insert(Node::from_template(NodeKind::Shape).at(at), None)
            .unwrap();
        (tree, id)
    }

    #[test]
    fn drag_snaps_to_nearest_grid_point() {
        let (mut tree, id) = tree_with_shape(pos2(100.0, 100.0));
        let transform = CanvasTransform::default();
        let start = pos2(500.0, 300.0);
        let mut drag = DragSession::begin(&tree, id, start).unwrap();
        drag.update(&mut tree, start + vec2(37.0, 5.0), &transform, 8.0);
        assert_eq!(tree.find(id).unwrap().geometry.origin(), pos2(136.0, 104.0));
        assert!(drag.finish(&mut tree).moved);
    }

    #[test]
    fn zoom_scales_pointer_delta() {
        let (mut tree, id) = tree_with_shape(pos2(0.0, 0.0));
        let transform = CanvasTransform {
            origin: pos2(0.0, 0.0),
            zoom: 2.0,
        };
        let mut drag = DragSession::begin(&tree, id, pos2(10.0, 10.0)).unwrap();
        drag.update(&mut tree, pos2(74.0, 42.0), &transform, 8.0);
        assert_eq!(tree.find(id).unwrap().geometry.origin(), pos2(32.0, 16.0));
    }

    #[test]
    fn cancel_restores_flow_geometry() {
        let mut tree = ElementTree::new();
        let id = tree.insert(Node::from_template(NodeKind::Text), None).unwrap();
        let mut drag = DragSession::begin(&tree, id, pos2(0.0, 0.0)).unwrap();
        drag.update(&mut tree, pos2(64.0, 64.0), &CanvasTransform::default(), 8.0);
        assert_eq!(tree.find(id).unwrap().geometry.x, Some(64.0));
        drag.cancel(&mut tree);
        assert_eq!(tree.find(id).unwrap().geometry.x, None);
    }

    #[test]
    fn release_over_container_reparents() {
        let mut tree = ElementTree::new();
        let section = tree
            .insert(
                Node::from_template(NodeKind::Section).at(pos2(200.0, 200.0)),
                None,
            )
            .unwrap();
        let shape = tree
            .insert(Node::from_template(NodeKind::Shape).at(pos2(0.0, 0.0)), None)
            .unwrap();
        let transform = CanvasTransform::default();
        let mut drag = DragSession::begin(&tree, shape, pos2(10.0, 10.0)).unwrap();
        let candidate = drag.update(&mut tree, pos2(250.0, 250.0), &transform, 8.0);
        assert_eq!(candidate.parent, Some(section));
        // nothing reparents until release
        assert_eq!(tree.parent_of(shape), None);

        let outcome = drag.finish(&mut tree);
        assert!(outcome.reparented);
        assert_eq!(tree.parent_of(shape), Some(section));
        // 240,240 absolute becomes 40,40 inside the section
        assert_eq!(tree.find(shape).unwrap().geometry.origin(), pos2(40.0, 40.0));
    }
}
