use crate::node::NodeId;
use crate::tree::ElementTree;

/// The single selected node and the node under the pointer.
///
/// Both are plain ids; selecting never touches the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<NodeId>,
    hovered: Option<NodeId>,
}

impl Selection {
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected == Some(id)
    }

    /// Selects `id`, or clears the selection for `None`.
    ///
    /// Ids that are not in the tree clear the selection rather than dangle.
    /// Returns true if the selection changed.
    pub fn select(&mut self, id: Option<NodeId>, tree: &ElementTree) -> bool {
        let next = id.filter(|id| tree.contains(*id));
        if id.is_some() && next.is_none() {
            log::debug!("select ignored, {id:?} is not in the tree");
        }
        let changed = self.selected != next;
        self.selected = next;
        changed
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn hover(&mut self, id: Option<NodeId>) {
        self.hovered = id;
    }

    /// Drops ids that no longer exist, e.g. after a delete or an undo.
    pub fn retain_present(&mut self, tree: &ElementTree) {
        if self.selected.is_some_and(|id| !tree.contains(id)) {
            self.selected = None;
        }
        if self.hovered.is_some_and(|id| !tree.contains(id)) {
            self.hovered = None;
        }
    }
}
