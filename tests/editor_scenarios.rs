//! End-to-end editing sessions driven through the public `Editor` API, the way
//! the canvas host drives it.

use egui::{pos2, vec2};
use page_blocks::{Document, Editor, Node, NodeKind, NodePatch, PointerDown, ResizeHandle, Style};

fn shape_at(editor: &mut Editor, x: f32, y: f32) -> page_blocks::NodeId {
    editor
        .insert(Node::from_template(NodeKind::Shape).at(pos2(x, y)), None)
        .unwrap()
}

#[test]
fn container_holds_inserted_text() {
    let mut editor = Editor::default();
    let c = editor
        .insert(Node::from_template(NodeKind::Container), None)
        .unwrap();
    let t = editor
        .insert(Node::from_template(NodeKind::Text), Some(c))
        .unwrap();

    let text = editor.find(t).unwrap();
    assert_eq!(text.content, Node::from_template(NodeKind::Text).content);
    assert_eq!(text.content.text.as_deref(), Some("Your text here"));

    let roots = editor.get_tree();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].id, c);
    let children: Vec<_> = roots[0].children.iter().map(|n| n.id).collect();
    assert_eq!(children, vec![t]);
}

#[test]
fn drag_snaps_to_grid() {
    let mut editor = Editor::default();
    let id = shape_at(&mut editor, 100.0, 100.0);

    assert_eq!(editor.pointer_down(pos2(150.0, 150.0)), PointerDown::Drag(id));
    editor.pointer_move(pos2(160.0, 152.0));
    editor.pointer_move(pos2(187.0, 155.0));
    assert!(editor.pointer_up());

    assert_eq!(editor.find(id).unwrap().geometry.origin(), pos2(136.0, 104.0));
}

#[test]
fn drag_within_container_keeps_parent() {
    let mut editor = Editor::default();
    let section = editor
        .insert(Node::from_template(NodeKind::Section), None)
        .unwrap();
    let navbar = editor
        .insert(Node::from_template(NodeKind::Navbar), Some(section))
        .unwrap();
    let checkpoints = editor.history().len();

    assert_eq!(editor.pointer_down(pos2(20.0, 20.0)), PointerDown::Drag(navbar));
    editor.pointer_move(pos2(36.0, 28.0));
    assert_eq!(editor.drop_candidate().and_then(|t| t.parent), Some(section));
    assert!(editor.pointer_up());

    assert_eq!(editor.tree().parent_of(navbar), Some(section));
    assert_eq!(editor.find(navbar).unwrap().geometry.origin(), pos2(16.0, 8.0));
    assert_eq!(editor.history().len(), checkpoints + 1);
}

#[test]
fn any_kind_drops_into_a_navbar() {
    let mut editor = Editor::default();
    let navbar = editor
        .insert(Node::from_template(NodeKind::Navbar).at(pos2(0.0, 400.0)), None)
        .unwrap();
    let section = editor
        .insert(Node::from_template(NodeKind::Section).at(pos2(0.0, 0.0)), None)
        .unwrap();

    editor.pointer_down(pos2(700.0, 150.0));
    editor.pointer_move(pos2(700.0, 450.0));
    assert!(editor.pointer_up());

    assert_eq!(editor.tree().parent_of(section), Some(navbar));
    // absolute (0,300) inside a navbar at (0,400)
    assert_eq!(editor.find(section).unwrap().geometry.origin(), pos2(0.0, -100.0));
}

#[test]
fn media_resize_keeps_aspect_ratio() {
    let mut editor = Editor::default();
    let id = editor
        .insert(Node::from_template(NodeKind::Image).at(pos2(0.0, 0.0)), None)
        .unwrap();
    editor.select(Some(id));

    assert_eq!(
        editor.pointer_down(pos2(300.0, 200.0)),
        PointerDown::Resize(id, ResizeHandle::SE)
    );
    editor.pointer_move(pos2(350.0, 210.0));
    editor.pointer_up();

    assert_eq!(editor.find(id).unwrap().geometry.size(), vec2(352.0, 198.0));
}

#[test]
fn one_gesture_is_one_checkpoint() {
    let mut editor = Editor::default();
    shape_at(&mut editor, 0.0, 0.0);
    let before = editor.history().len();

    editor.pointer_down(pos2(10.0, 10.0));
    for step in 1..=30 {
        editor.pointer_move(pos2(10.0 + step as f32 * 3.0, 10.0));
    }
    editor.pointer_up();

    assert_eq!(editor.history().len(), before + 1);
}

#[test]
fn undo_and_redo_round_trip_a_gesture() {
    let mut editor = Editor::default();
    let section = editor
        .insert(
            Node::from_template(NodeKind::Section).at(pos2(0.0, 300.0)),
            None,
        )
        .unwrap();
    let id = shape_at(&mut editor, 0.0, 0.0);
    let before = editor.tree().clone();

    // drag the shape into the section
    editor.pointer_down(pos2(20.0, 20.0));
    editor.pointer_move(pos2(60.0, 340.0));
    assert_eq!(editor.drop_candidate().and_then(|t| t.parent), Some(section));
    editor.pointer_up();
    assert_eq!(editor.tree().parent_of(id), Some(section));
    let after = editor.tree().clone();

    assert!(editor.undo());
    assert_eq!(editor.tree(), &before);
    assert!(editor.redo());
    assert_eq!(editor.tree(), &after);
}

#[test]
fn history_keeps_the_latest_fifty_states() {
    let mut editor = Editor::default();
    let mut seed = page_blocks::ElementTree::new();
    let id = seed
        .insert(Node::from_template(NodeKind::Shape).at(pos2(0.0, 0.0)), None)
        .unwrap();
    editor.load_document(Document::from_tree(&seed));

    for i in 0..60 {
        let x = i as f32 * 8.0;
        editor.pointer_down(pos2(x + 10.0, 10.0));
        editor.pointer_move(pos2(x + 18.0, 10.0));
        assert!(editor.pointer_up(), "gesture {i} did not commit");
    }
    assert_eq!(editor.find(id).unwrap().geometry.origin(), pos2(480.0, 0.0));
    assert!(editor.history().len() <= 50);

    for _ in 0..50 {
        editor.undo();
    }
    // 61 states were recorded; the first 11 were evicted
    assert_eq!(editor.find(id).unwrap().geometry.origin(), pos2(88.0, 0.0));
    assert!(!editor.can_undo());
}

#[test]
fn edit_after_undo_drops_redo() {
    let mut editor = Editor::default();
    let id = shape_at(&mut editor, 0.0, 0.0);
    editor.update(id, &NodePatch::style(Style::new().with("opacity", 0.5)));
    editor.undo();
    assert!(editor.can_redo());

    editor.update(id, &NodePatch::style(Style::new().with("opacity", 0.25)));
    assert!(!editor.can_redo());
}

#[test]
fn no_op_update_records_nothing() {
    let mut editor = Editor::default();
    let id = shape_at(&mut editor, 0.0, 0.0);
    let before = editor.history().len();
    assert!(!editor.update(id, &NodePatch::position(pos2(0.0, 0.0))));
    assert!(!editor.update(page_blocks::NodeId::new(), &NodePatch::text("ghost")));
    assert_eq!(editor.history().len(), before);
}

#[test]
fn deleting_selected_node_clears_selection() {
    let mut editor = Editor::default();
    let id = shape_at(&mut editor, 0.0, 0.0);
    editor.select(Some(id));
    assert!(editor.remove_selected().is_some());
    assert_eq!(editor.selected(), None);
    assert!(editor.remove(id).is_none());
}

#[test]
fn cancelled_gesture_restores_geometry_and_records_nothing() {
    let mut editor = Editor::default();
    let id = editor
        .insert(Node::from_template(NodeKind::Image).at(pos2(40.0, 40.0)), None)
        .unwrap();
    editor.select(Some(id));
    let before = editor.tree().clone();
    let checkpoints = editor.history().len();

    editor.pointer_down(pos2(40.0, 40.0));
    assert!(editor.resizing().is_some());
    editor.pointer_move(pos2(-100.0, -100.0));
    assert!(editor.cancel_gesture());
    assert!(!editor.pointer_up());

    assert_eq!(editor.tree(), &before);
    assert_eq!(editor.history().len(), checkpoints);
}

#[test]
fn zoomed_drag_converts_pointer_delta() {
    let mut editor = Editor::default();
    editor.set_canvas_origin(pos2(32.0, 32.0));
    editor.set_zoom(2.0);
    let id = shape_at(&mut editor, 0.0, 0.0);

    // document (10,10) is screen (52,52)
    editor.pointer_down(pos2(52.0, 52.0));
    editor.pointer_move(pos2(52.0 + 64.0, 52.0 + 32.0));
    editor.pointer_up();
    assert_eq!(editor.find(id).unwrap().geometry.origin(), pos2(32.0, 16.0));
}

#[test]
fn document_survives_a_save_and_load() {
    let mut editor = Editor::default();
    let section = editor
        .insert(Node::from_template(NodeKind::Section).at(pos2(0.0, 0.0)), None)
        .unwrap();
    editor
        .insert(Node::from_template(NodeKind::Button), Some(section))
        .unwrap();
    editor
        .insert(Node::from_template(NodeKind::Video).at(pos2(0.0, 240.0)), None)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.json");
    editor.document().save(&path).unwrap();

    let mut reopened = Editor::default();
    reopened.load_document(Document::load(&path).unwrap());
    assert_eq!(reopened.tree(), editor.tree());
    assert!(!reopened.can_undo());
}
