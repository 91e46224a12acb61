//! Resolves which container receives a node dropped at a document-space point.

use crate::error::{TreeError, TreeResult};
use crate::node::NodeId;
use crate::tree::ElementTree;
use egui::Pos2;
use std::collections::HashSet;

/// Receiver of a drop: a container id, or the document root when `parent` is `None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropTarget {
    pub parent: Option<NodeId>,
    /// The drop point in the receiver's coordinate space.
    pub local: Pos2,
}

impl DropTarget {
    pub fn root(point: Pos2) -> Self {
        Self {
            parent: None,
            local: point,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Finds the topmost container under `point`.
///
/// Containers are tested in reverse pre-order, so the most deeply nested and most
/// recently painted one wins. Nodes inside `exclude` (the subtree being dragged)
/// are skipped so a dragged container never resolves to itself.
pub fn resolve(tree: &ElementTree, point: Pos2, exclude: Option<NodeId>) -> DropTarget {
    let excluded = exclude.map(|id| subtree_id_set(tree, id)).unwrap_or_default();

    tree.placements()
        .into_iter()
        .rev()
        .filter(|p| !excluded.contains(&p.id))
        .find(|p| p.kind.is_container() && p.rect.contains(point))
        .map(|p| DropTarget {
            parent: Some(p.id),
            local: (point - p.rect.min).to_pos2(),
        })
        .unwrap_or_else(|| DropTarget::root(point))
}

/// Rejects moving `dragged` into `target` when the target is the dragged node
/// itself or lies anywhere in its subtree.
pub fn check_reparent(
    tree: &ElementTree,
    dragged: NodeId,
    target: Option<NodeId>,
) -> TreeResult<()> {
    let Some(target) = target else {
        return Ok(());
    };
    if subtree_id_set(tree, dragged).contains(&target) {
        return Err(TreeError::InvalidParent {
            parent: target,
            reason: "target is inside the dragged subtree",
        });
    }
    Ok(())
}

fn subtree_id_set(tree: &ElementTree, id: NodeId) -> HashSet<NodeId> {
    tree.find(id)
        .map(|n| n.subtree_ids().into_iter().collect())
        .unwrap_or_default()
}
