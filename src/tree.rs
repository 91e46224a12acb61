//! The canonical nested structure of placed nodes.
//!
//! `ElementTree` is pure data plus structural operations. It knows nothing about
//! history, selection, or pointers; the editor wraps every mutation with those.

use crate::error::{TreeError, TreeResult};
use crate::node::{Node, NodeId, NodeKind, NodePatch};
use egui::{Pos2, Rect, Vec2};
use std::collections::HashSet;

/// Where a node sits: its parent (`None` for the document root) and index among siblings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub parent: Option<NodeId>,
    pub index: usize,
}

/// A node's absolute document-space rectangle, as produced by [`ElementTree::placements`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub id: NodeId,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub rect: Rect,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementTree {
    roots: Vec<Node>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree by inserting each root in order, so ids, child rules and
    /// size bounds are normalized exactly as `insert` does.
    pub fn from_roots(roots: Vec<Node>) -> Self {
        let mut tree = Self::new();
        for node in roots {
            // root insertion has no parent to reject it
            let _ = tree.insert(node, None);
        }
        tree
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Collection Access
    // ─────────────────────────────────────────────────────────────────────────────

    /// Root-level nodes in paint order.
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Total number of nodes, nested ones included.
    pub fn len(&self) -> usize {
        self.roots.iter().map(Node::subtree_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn ids(&self) -> HashSet<NodeId> {
        self.flatten().into_iter().map(|n| n.id).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────────────

    /// Depth-first search for `id`.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        find_in(&self.roots, id)
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        find_in_mut(&mut self.roots, id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    pub fn locate(&self, id: NodeId) -> Option<Location> {
        locate_in(&self.roots, None, id)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.locate(id).and_then(|loc| loc.parent)
    }

    /// True when `id` lies strictly below `ancestor`.
    pub fn is_descendant(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.find(ancestor).is_some_and(|a| {
            let mut found = false;
            for child in &a.children {
                child.walk(&mut |n| found |= n.id == id);
            }
            found
        })
    }

    /// Nodes from the root down to and including `id`.
    pub fn path_to(&self, id: NodeId) -> Option<Vec<&Node>> {
        let mut path = Vec::new();
        path_in(&self.roots, id, &mut path).then_some(path)
    }

    /// Document-space origin of `id`: its own offset plus every ancestor's.
    pub fn absolute_origin(&self, id: NodeId) -> Option<Pos2> {
        let path = self.path_to(id)?;
        Some(
            path.iter()
                .fold(Pos2::ZERO, |acc, n| acc + n.geometry.origin().to_vec2()),
        )
    }

    pub fn absolute_rect(&self, id: NodeId) -> Option<Rect> {
        let origin = self.absolute_origin(id)?;
        let node = self.find(id)?;
        Some(Rect::from_min_size(origin, node.geometry.size()))
    }

    /// Every node's absolute rectangle in pre-order (paint order).
    pub fn placements(&self) -> Vec<Placement> {
        fn collect(
            nodes: &[Node],
            parent: Option<NodeId>,
            offset: Vec2,
            out: &mut Vec<Placement>,
        ) {
            for node in nodes {
                let origin = offset + node.geometry.origin().to_vec2();
                out.push(Placement {
                    id: node.id,
                    kind: node.kind,
                    parent,
                    rect: Rect::from_min_size(origin.to_pos2(), node.geometry.size()),
                });
                collect(&node.children, Some(node.id), origin, out);
            }
        }

        let mut out = Vec::with_capacity(self.len());
        collect(&self.roots, None, Vec2::ZERO, &mut out);
        out
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Traversal
    // ─────────────────────────────────────────────────────────────────────────────

    /// Pre-order traversal of the whole tree.
    pub fn flatten(&self) -> Vec<&Node> {
        let mut out = Vec::with_capacity(self.len());
        for root in &self.roots {
            root.walk(&mut |n| out.push(n));
        }
        out
    }

    /// Pre-order traversal paired with nesting depth, for a layers list.
    pub fn layers(&self) -> Vec<(usize, &Node)> {
        fn collect<'a>(nodes: &'a [Node], depth: usize, out: &mut Vec<(usize, &'a Node)>) {
            for node in nodes {
                out.push((depth, node));
                collect(&node.children, depth + 1, out);
            }
        }

        let mut out = Vec::new();
        collect(&self.roots, 0, &mut out);
        out
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Structural Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Appends `node` as the last child of `parent`, or as a new root.
    ///
    /// Nil or already-used ids anywhere in the inserted subtree are replaced with
    /// fresh ones, children of leaf kinds are dropped, and sizes are clamped.
    pub fn insert(&mut self, mut node: Node, parent: Option<NodeId>) -> TreeResult<NodeId> {
        if let Some(parent_id) = parent {
            check_container(self.find(parent_id), parent_id)?;
        }

        let mut taken = self.ids();
        normalize_subtree(&mut node, &mut taken);
        let id = node.id;

        match parent {
            Some(parent_id) => match self.find_mut(parent_id) {
                Some(target) => target.children.push(node),
                None => return Err(TreeError::NotFound(parent_id)),
            },
            None => self.roots.push(node),
        }
        Ok(id)
    }

    /// Detaches and returns the subtree rooted at `id`.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        detach_in(&mut self.roots, id)
    }

    /// Applies `patch` to the node with `id`. Returns true if anything changed.
    pub fn update(&mut self, id: NodeId, patch: &NodePatch) -> bool {
        match self.find_mut(id) {
            Some(node) => patch.apply(node),
            None => {
                log::debug!("update ignored, {id} is not in the tree");
                false
            }
        }
    }

    /// Replaces the node's position (in its parent's space) without any other change.
    pub fn set_origin(&mut self, id: NodeId, origin: Pos2) -> bool {
        self.update(id, &NodePatch::position(origin))
    }

    /// Moves `id` to the end of `new_parent`'s children (or to the root),
    /// keeping its absolute position on the page.
    ///
    /// Rejects targets that are the node itself, one of its descendants, or not
    /// a container.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> TreeResult<()> {
        let Some(location) = self.locate(id) else {
            return Err(TreeError::NotFound(id));
        };

        if let Some(parent_id) = new_parent {
            if parent_id == id || self.is_descendant(id, parent_id) {
                return Err(TreeError::InvalidParent {
                    parent: parent_id,
                    reason: "target is inside the moved subtree",
                });
            }
            check_container(self.find(parent_id), parent_id)?;
        }

        if location.parent == new_parent {
            return Ok(());
        }

        let absolute = self.absolute_origin(id).unwrap_or(Pos2::ZERO);
        let parent_offset = new_parent
            .and_then(|p| self.absolute_origin(p))
            .unwrap_or(Pos2::ZERO);

        let Some(mut node) = self.remove(id) else {
            return Err(TreeError::NotFound(id));
        };
        node.geometry.set_origin((absolute - parent_offset).to_pos2());

        match new_parent {
            Some(parent_id) => match self.find_mut(parent_id) {
                Some(target) => target.children.push(node),
                None => return Err(TreeError::NotFound(parent_id)),
            },
            None => self.roots.push(node),
        }
        Ok(())
    }

    /// Deep copy of the subtree at `id` with fresh ids throughout.
    pub fn clone_subtree(&self, id: NodeId) -> Option<Node> {
        let mut copy = self.find(id)?.clone();
        copy.walk_mut(&mut |n| n.id = NodeId::new());
        Some(copy)
    }
}

fn check_container(node: Option<&Node>, id: NodeId) -> TreeResult<&Node> {
    match node {
        None => Err(TreeError::InvalidParent {
            parent: id,
            reason: "parent does not exist",
        }),
        Some(n) if !n.is_container() => Err(TreeError::InvalidParent {
            parent: id,
            reason: "parent is not a container",
        }),
        Some(n) => Ok(n),
    }
}

fn normalize_subtree(node: &mut Node, taken: &mut HashSet<NodeId>) {
    node.walk_mut(&mut |n| {
        if n.id.is_nil() || !taken.insert(n.id) {
            let fresh = NodeId::new();
            if !n.id.is_nil() {
                log::debug!("id {} already in use, re-keyed as {fresh}", n.id);
            }
            n.id = fresh;
            taken.insert(fresh);
        }
        if !n.kind.is_container() && !n.children.is_empty() {
            log::warn!(
                "dropping {} children of leaf node {}",
                n.children.len(),
                n.id
            );
            n.children.clear();
        }
        n.clamp_to_bounds();
    });
}

fn find_in(nodes: &[Node], id: NodeId) -> Option<&Node> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(&node.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut(nodes: &mut [Node], id: NodeId) -> Option<&mut Node> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn locate_in(nodes: &[Node], parent: Option<NodeId>, id: NodeId) -> Option<Location> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id == id {
            return Some(Location { parent, index });
        }
        if let Some(found) = locate_in(&node.children, Some(node.id), id) {
            return Some(found);
        }
    }
    None
}

fn path_in<'a>(nodes: &'a [Node], id: NodeId, path: &mut Vec<&'a Node>) -> bool {
    for node in nodes {
        path.push(node);
        if node.id == id || path_in(&node.children, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

fn detach_in(nodes: &mut Vec<Node>, id: NodeId) -> Option<Node> {
    if let Some(index) = nodes.iter().position(|n| n.id == id) {
        return Some(nodes.remove(index));
    }
    nodes
        .iter_mut()
        .find_map(|node| detach_in(&mut node.children, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn section_with_text() -> (ElementTree, NodeId, NodeId) {
        let mut tree = ElementTree::new();
        let section = tree
            .insert(
                Node::from_template(NodeKind::Section).at(pos2(40.0, 80.0)),
                None,
            )
            .unwrap();
        let text = tree
            .insert(
                Node::from_template(NodeKind::Text).at(pos2(16.0, 24.0)),
                Some(section),
            )
            .unwrap();
        (tree, section, text)
    }

    #[test]
    fn insert_nests_under_container() {
        let (tree, section, text) = section_with_text();
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.roots()[0].children[0].id, text);
        assert_eq!(tree.parent_of(text), Some(section));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn insert_rejects_leaf_and_missing_parents() {
        let (mut tree, _, text) = section_with_text();
        let err = tree
            .insert(Node::from_template(NodeKind::Button), Some(text))
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidParent { parent, .. } if parent == text));

        let ghost = NodeId::new();
        assert!(tree
            .insert(Node::from_template(NodeKind::Button), Some(ghost))
            .is_err());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn insert_rekeys_duplicate_and_nil_ids() {
        let (mut tree, section, _) = section_with_text();
        let mut dup = Node::from_template(NodeKind::Shape);
        dup.id = section;
        let new_id = tree.insert(dup, None).unwrap();
        assert_ne!(new_id, section);

        let mut nil = Node::from_template(NodeKind::Shape);
        nil.id = NodeId::nil();
        let nil_id = tree.insert(nil, None).unwrap();
        assert!(!nil_id.is_nil());
        assert_eq!(tree.ids().len(), tree.len());
    }

    #[test]
    fn insert_drops_children_of_leaves() {
        let mut tree = ElementTree::new();
        let leaf = Node::from_template(NodeKind::Image)
            .with_children(vec![Node::from_template(NodeKind::Text)]);
        let id = tree.insert(leaf, None).unwrap();
        assert!(tree.find(id).unwrap().children.is_empty());
    }

    #[test]
    fn remove_detaches_whole_subtree() {
        let (mut tree, section, text) = section_with_text();
        let removed = tree.remove(section).unwrap();
        assert_eq!(removed.children[0].id, text);
        assert!(tree.find(text).is_none());
        assert!(tree.is_empty());
        assert!(tree.remove(section).is_none());
    }

    #[test]
    fn absolute_origin_sums_ancestors() {
        let (tree, _, text) = section_with_text();
        assert_eq!(tree.absolute_origin(text), Some(pos2(56.0, 104.0)));
    }

    #[test]
    fn reparent_keeps_page_position() {
        let (mut tree, section, text) = section_with_text();
        tree.reparent(text, None).unwrap();
        let moved = tree.find(text).unwrap();
        assert_eq!(moved.geometry.origin(), pos2(56.0, 104.0));
        assert_eq!(tree.parent_of(text), None);

        tree.reparent(text, Some(section)).unwrap();
        assert_eq!(tree.find(text).unwrap().geometry.origin(), pos2(16.0, 24.0));
    }

    #[test]
    fn reparent_into_own_descendant_is_rejected() {
        let (mut tree, section, _) = section_with_text();
        let inner = tree
            .insert(Node::from_template(NodeKind::Container), Some(section))
            .unwrap();
        let before = tree.clone();
        assert!(tree.reparent(section, Some(inner)).is_err());
        assert!(tree.reparent(section, Some(section)).is_err());
        assert_eq!(tree, before);
    }

    #[test]
    fn clone_subtree_uses_fresh_ids() {
        let (tree, section, text) = section_with_text();
        let copy = tree.clone_subtree(section).unwrap();
        assert_ne!(copy.id, section);
        assert_ne!(copy.children[0].id, text);
        assert_eq!(copy.children[0].content, tree.find(text).unwrap().content);
    }

    #[test]
    fn layers_report_depth_in_preorder() {
        let (tree, section, text) = section_with_text();
        let layers: Vec<_> = tree.layers().into_iter().map(|(d, n)| (d, n.id)).collect();
        assert_eq!(layers, vec![(0, section), (1, text)]);
    }
}
