//! Property tests for the structural invariants of the element tree and the
//! resize math.
//!
//! 1. Ids stay unique under any sequence of inserts, removes and reparents
//! 2. A removed id is gone from the whole tree
//! 3. Moving a node into its own subtree is rejected and changes nothing
//! 4. Resized sizes stay inside the kind's bounds (driving axis for media)
//! 5. History never grows past its capacity

use egui::{pos2, vec2, Rect};
use page_blocks::history::History;
use page_blocks::resize::{apply_resize, ResizeConstraints, ResizeHandle};
use page_blocks::{ElementTree, Node, NodeId, NodeKind};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    /// Insert a template of `NodeKind::ALL[kind]` under the `parent`-th node (or root).
    Insert { kind: usize, parent: Option<usize> },
    Remove(usize),
    Reparent { node: usize, target: Option<usize> },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..NodeKind::ALL.len(), proptest::option::of(0usize..64))
            .prop_map(|(kind, parent)| Op::Insert { kind, parent }),
        1 => (0usize..64).prop_map(Op::Remove),
        2 => (0usize..64, proptest::option::of(0usize..64))
            .prop_map(|(node, target)| Op::Reparent { node, target }),
    ]
}

fn handle_strategy() -> impl Strategy<Value = ResizeHandle> {
    (0usize..8).prop_map(|i| ResizeHandle::ALL[i])
}

/// Picks an existing id by index, wrapping around; `None` on an empty tree.
fn pick(tree: &ElementTree, index: usize) -> Option<NodeId> {
    let nodes = tree.flatten();
    if nodes.is_empty() {
        None
    } else {
        Some(nodes[index % nodes.len()].id)
    }
}

fn apply_ops(tree: &mut ElementTree, ops: &[Op]) {
    for op in ops {
        match op {
            Op::Insert { kind, parent } => {
                let parent = parent.and_then(|p| pick(tree, p));
                let node = Node::from_template(NodeKind::ALL[*kind]).at(pos2(8.0, 8.0));
                let _ = tree.insert(node, parent);
            }
            Op::Remove(index) => {
                if let Some(id) = pick(tree, *index) {
                    tree.remove(id);
                }
            }
            Op::Reparent { node, target } => {
                if let Some(id) = pick(tree, *node) {
                    let target = target.and_then(|t| pick(tree, t));
                    let _ = tree.reparent(id, target);
                }
            }
        }
    }
}

fn assert_structure(tree: &ElementTree) -> Result<(), TestCaseError> {
    prop_assert_eq!(tree.ids().len(), tree.len(), "duplicate ids in tree");
    for node in tree.flatten() {
        prop_assert!(
            node.is_container() || node.children.is_empty(),
            "leaf {} has children",
            node.id
        );
        prop_assert!(node.kind.bounds().contains(node.geometry.size()));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Tree structure
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ids_stay_unique(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut tree = ElementTree::new();
        apply_ops(&mut tree, &ops);
        assert_structure(&tree)?;
    }

    #[test]
    fn removed_ids_leave_no_trace(
        ops in proptest::collection::vec(op_strategy(), 1..40),
        victim in 0usize..64,
    ) {
        let mut tree = ElementTree::new();
        apply_ops(&mut tree, &ops);
        if let Some(id) = pick(&tree, victim) {
            let removed = tree.remove(id);
            prop_assert!(removed.is_some());
            prop_assert!(tree.find(id).is_none());
            for node in tree.flatten() {
                prop_assert!(node.children.iter().all(|c| c.id != id));
            }
            // nothing from the removed subtree survives either
            let gone = removed.map(|n| n.subtree_ids()).unwrap_or_default();
            prop_assert!(gone.iter().all(|g| !tree.contains(*g)));
        }
    }

    #[test]
    fn reparent_into_own_subtree_changes_nothing(
        ops in proptest::collection::vec(op_strategy(), 1..40),
        node in 0usize..64,
        target in 0usize..64,
    ) {
        let mut tree = ElementTree::new();
        apply_ops(&mut tree, &ops);
        let Some(id) = pick(&tree, node) else {
            return Ok(());
        };
        let subtree = tree.find(id).map(|n| n.subtree_ids()).unwrap_or_default();
        let target = subtree[target % subtree.len()];

        let before = tree.clone();
        prop_assert!(tree.reparent(id, Some(target)).is_err());
        prop_assert_eq!(tree, before);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Resize bounds
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_stays_in_bounds(
        kind in 0usize..NodeKind::ALL.len(),
        handle in handle_strategy(),
        dx in -2000.0f32..2000.0,
        dy in -2000.0f32..2000.0,
        grid in prop_oneof![Just(0.0f32), Just(8.0f32), Just(10.0f32)],
    ) {
        let kind = NodeKind::ALL[kind];
        let node = Node::from_template(kind);
        let constraints = ResizeConstraints {
            bounds: kind.bounds(),
            aspect_ratio: kind.aspect_ratio(),
            grid,
        };
        let start = Rect::from_min_size(pos2(100.0, 100.0), node.geometry.size());
        let out = apply_resize(start, handle, vec2(dx, dy), &constraints);
        let b = constraints.bounds;

        let width_in = (b.min_width..=b.max_width).contains(&out.width());
        let height_in = (b.min_height..=b.max_height).contains(&out.height());
        match constraints.aspect_ratio {
            // only the axis the handle drives is guaranteed; the other follows the ratio
            Some(_) if handle.drives_height() => prop_assert!(height_in),
            Some(_) => prop_assert!(width_in),
            None => prop_assert!(width_in && height_in, "{:?} -> {:?}", handle, out.size()),
        }

        if handle.is_west() {
            prop_assert!((out.right() - start.right()).abs() < 1e-3);
        } else {
            prop_assert_eq!(out.left(), start.left());
        }
        if handle.is_north() {
            prop_assert!((out.bottom() - start.bottom()).abs() < 1e-3);
        } else {
            prop_assert_eq!(out.top(), start.top());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// History capacity
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn history_is_bounded(capacity in 1usize..20, records in 0usize..60) {
        let mut history = History::new(ElementTree::new(), capacity);
        let mut tree = ElementTree::new();
        for _ in 0..records {
            let _ = tree.insert(Node::from_template(NodeKind::Shape), None);
            history.record(&tree);
        }
        prop_assert!(history.len() <= capacity);
        prop_assert_eq!(history.len(), (records + 1).min(capacity));

        let mut undos = 0;
        while history.undo().is_some() {
            undos += 1;
        }
        prop_assert_eq!(undos, history.len() - 1);
    }
}
