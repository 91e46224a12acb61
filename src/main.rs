use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Vec2};
use egui::vec2;
use page_blocks::constants::*;
use page_blocks::paths::AppPaths;
use page_blocks::{Document, Editor, EditorConfig, Node, NodeKind, Viewport};
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT]),
        ..Default::default()
    };

    eframe::run_native(
        "PageBlocks",
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(PageBlocksApp::new(cc)))
        }),
    )
}

struct PageBlocksApp {
    editor: Editor,
    paths: Option<AppPaths>,
    document_file: Option<PathBuf>,
    /// Kind being dragged out of the palette, if any.
    palette_drag: Option<NodeKind>,
}

impl PageBlocksApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let paths = AppPaths::from_project_dirs();
        let config = match &paths {
            Some(paths) => {
                if let Err(err) = paths.ensure_dirs_exist() {
                    log::warn!("could not create app directories: {err}");
                }
                EditorConfig::load_or_default(&paths.settings_file())
            }
            None => EditorConfig::default(),
        };

        Self {
            editor: Editor::new(config),
            paths,
            document_file: None,
            palette_drag: None,
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let shift_command = egui::Modifiers::COMMAND | egui::Modifiers::SHIFT;
        // redo first: consume_key(COMMAND, Z) would also match Shift+Z
        if ctx.input_mut(|i| i.consume_key(shift_command, egui::Key::Z))
            || ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Y))
        {
            self.editor.redo();
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z)) {
            self.editor.undo();
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::S)) {
            self.save_document();
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::D)) {
            if let Some(id) = self.editor.selected() {
                self.editor.duplicate(id);
            }
        }
        if ctx.input_mut(|i| {
            i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
        }) {
            self.editor.remove_selected();
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape))
            && !self.editor.cancel_gesture()
        {
            self.editor.select(None);
        }

        // egui turns the platform copy/paste shortcuts into events rather than key presses
        let (copy, paste) = ctx.input(|i| {
            let copy = i.events.iter().any(|e| matches!(e, egui::Event::Copy));
            let paste = i.events.iter().any(|e| matches!(e, egui::Event::Paste(_)));
            (copy, paste)
        });
        if copy {
            if let Some(id) = self.editor.selected() {
                self.editor.copy(id);
            }
        }
        if paste {
            let parent = self
                .editor
                .selected()
                .filter(|id| self.editor.find(*id).is_some_and(Node::is_container));
            self.editor.paste(parent);
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            if toolbar_button(ui, "💾", "Save Document").clicked() {
                self.save_document();
            }
            if toolbar_button(ui, "📂", "Open Document").clicked() {
                self.open_document();
            }
            ui.separator();

            let can_undo = self.editor.can_undo();
            let can_redo = self.editor.can_redo();
            if ui
                .add_enabled_ui(can_undo, |ui| toolbar_button(ui, "↶", "Undo"))
                .inner
                .clicked()
            {
                self.editor.undo();
            }
            if ui
                .add_enabled_ui(can_redo, |ui| toolbar_button(ui, "↷", "Redo"))
                .inner
                .clicked()
            {
                self.editor.redo();
            }
            ui.separator();

            let current = self.editor.viewport();
            for viewport in Viewport::ALL {
                let text = RichText::new(viewport.label()).color(Color32::LIGHT_GRAY);
                if ui.selectable_label(current == viewport, text).clicked() {
                    self.editor.set_viewport(viewport);
                }
            }
            ui.separator();

            let zoom_percent = self.editor.transform().zoom_percent();
            egui::ComboBox::from_id_salt("zoom")
                .selected_text(format!("{zoom_percent}%"))
                .show_ui(ui, |ui| {
                    for preset in ZOOM_PRESETS {
                        if ui
                            .selectable_label(preset == zoom_percent, format!("{preset}%"))
                            .clicked()
                        {
                            self.editor.set_zoom_percent(preset);
                        }
                    }
                });

            let mut snap = self.editor.config().snap_to_grid;
            if ui
                .checkbox(&mut snap, RichText::new("Snap").color(Color32::LIGHT_GRAY))
                .changed()
            {
                self.editor.set_snap_to_grid(snap);
            }
        });
    }

    fn palette(&mut self, ui: &mut egui::Ui) {
        ui.heading("Blocks");
        ui.separator();
        for kind in NodeKind::ALL {
            let response = ui.add_sized(
                [ui.available_width(), 28.0],
                egui::Button::new(kind.label()).sense(Sense::click_and_drag()),
            );
            if response.drag_started() {
                self.palette_drag = Some(kind);
            }
            if response.clicked() {
                let origin = Pos2::from(PALETTE_DROP_ORIGIN);
                if let Err(err) = self.editor.drop_new(kind, origin) {
                    log::debug!("could not add {}: {err}", kind.label());
                }
            }
        }
    }

    fn layers(&mut self, ui: &mut egui::Ui) {
        ui.heading("Layers");
        ui.separator();
        let selected = self.editor.selected();
        let mut clicked = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (depth, node) in self.editor.tree().layers() {
                ui.horizontal(|ui| {
                    ui.add_space(depth as f32 * 12.0);
                    let label = format!("{} · {}", node.kind.label(), node.label());
                    if ui
                        .selectable_label(selected == Some(node.id), label)
                        .clicked()
                    {
                        clicked = Some(node.id);
                    }
                });
            }
        });
        if let Some(id) = clicked {
            self.editor.select(Some(id));
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let zoom_delta = ui.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.editor.set_zoom(self.editor.zoom() * zoom_delta);
        }
        let zoom = self.editor.zoom();

        let page_width = self.editor.viewport().canvas_width();
        let content_height = self
            .editor
            .tree()
            .placements()
            .iter()
            .map(|p| p.rect.max.y)
            .fold(0.0, f32::max);
        let page_height = (content_height + CANVAS_PADDING).max(CANVAS_MIN_HEIGHT);
        let page_size = vec2(page_width, page_height);

        let padding = Vec2::splat(CANVAS_PADDING);
        let (canvas_rect, _) = ui.allocate_exact_size(
            page_size * zoom + padding * 2.0,
            Sense::click_and_drag(),
        );
        let page_rect = Rect::from_min_size(canvas_rect.min + padding, page_size * zoom);
        self.editor.set_canvas_origin(page_rect.min);

        self.route_pointer(ui, canvas_rect);

        let painter = ui.painter_at(canvas_rect);
        painter.rect_filled(page_rect, egui::Rounding::ZERO, COLOR_CANVAS_BG);
        self.paint_nodes(ui, &painter);
        self.paint_overlays(ui, &painter);
    }

    fn route_pointer(&mut self, ui: &egui::Ui, canvas_rect: Rect) {
        let (pointer, pressed, released, focused) = ui.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.focused,
            )
        });

        // losing the window mid-gesture means the release will never arrive
        if self.editor.is_gesturing() && !focused {
            self.editor.cancel_gesture();
            return;
        }

        let visible = canvas_rect.intersect(ui.clip_rect());
        if let Some(pos) = pointer {
            if pressed && self.palette_drag.is_none() && visible.contains(pos) {
                self.editor.pointer_down(pos);
            } else {
                self.editor.pointer_move(pos);
            }
        }

        if released {
            if let Some(kind) = self.palette_drag.take() {
                if let Some(pos) = pointer.filter(|p| visible.contains(*p)) {
                    let point = self.editor.transform().to_document(pos);
                    if let Err(err) = self.editor.drop_new(kind, point) {
                        log::debug!("palette drop rejected: {err}");
                    }
                }
            }
            self.editor.pointer_up();
        }

        let cursor = if let Some((_, handle)) = self.editor.resizing() {
            Some(handle.cursor_icon())
        } else if self.editor.dragging().is_some() || self.palette_drag.is_some() {
            Some(egui::CursorIcon::Grabbing)
        } else {
            pointer
                .map(|p| self.editor.transform().to_document(p))
                .and_then(|p| self.editor.handle_at(p))
                .map(|h| h.cursor_icon())
        };
        if let Some(cursor) = cursor {
            ui.ctx().set_cursor_icon(cursor);
        }
    }

    fn paint_nodes(&self, ui: &egui::Ui, painter: &egui::Painter) {
        let transform = self.editor.transform();
        let zoom = transform.zoom;
        for placement in self.editor.tree().placements() {
            let Some(node) = self.editor.find(placement.id) else {
                continue;
            };
            let rect = transform.rect_to_screen(placement.rect);
            let radius = node.style.number("borderRadius").unwrap_or(0.0) as f32 * zoom;
            let rounding = egui::Rounding::same(radius);

            if let Some(fill) = style_color(node, "backgroundColor") {
                painter.rect_filled(rect, rounding, fill);
            }
            if node.is_container() {
                painter.rect_stroke(rect, rounding, Stroke::new(1.0, COLOR_CONTAINER_BORDER));
            }

            match node.kind {
                NodeKind::Image => match node.content.src.as_deref() {
                    Some(src) if !src.is_empty() => {
                        egui::Image::new(src)
                            .rounding(rounding)
                            .paint_at(ui, rect);
                    }
                    _ => paint_placeholder(painter, rect, rounding, "🖼", zoom),
                },
                NodeKind::Video => paint_placeholder(painter, rect, rounding, "▶", zoom),
                kind if kind.has_text() => {
                    let size = node.style.number("fontSize").unwrap_or(DEFAULT_FONT_SIZE as f64);
                    let color = style_color(node, "color").unwrap_or(COLOR_DEFAULT_TEXT);
                    let (anchor, pos) = if kind == NodeKind::Button {
                        (Align2::CENTER_CENTER, rect.center())
                    } else {
                        (Align2::LEFT_CENTER, rect.left_center() + vec2(8.0 * zoom, 0.0))
                    };
                    painter.text(
                        pos,
                        anchor,
                        node.label(),
                        FontId::proportional(size as f32 * zoom),
                        color,
                    );
                }
                kind if kind.is_container() && node.children.is_empty() => {
                    painter.text(
                        rect.left_top() + vec2(8.0, 6.0) * zoom,
                        Align2::LEFT_TOP,
                        kind.label(),
                        FontId::proportional(LABEL_FONT_SIZE * zoom),
                        COLOR_CONTAINER_BORDER,
                    );
                }
                _ => {}
            }
        }
    }

    fn paint_overlays(&self, ui: &egui::Ui, painter: &egui::Painter) {
        let transform = self.editor.transform();
        let tree = self.editor.tree();
        let rounding = egui::Rounding::same(NODE_CORNER_RADIUS);

        let drop_parent = match self.palette_drag {
            Some(_) => ui
                .input(|i| i.pointer.hover_pos())
                .map(|p| self.editor.drop_target(transform.to_document(p)))
                .and_then(|t| t.parent),
            None => self.editor.drop_candidate().and_then(|t| t.parent),
        };
        if let Some(rect) = drop_parent.and_then(|id| tree.absolute_rect(id)) {
            let rect = transform.rect_to_screen(rect);
            painter.rect_filled(rect, rounding, COLOR_DROP_TARGET_FILL);
            let stroke = Stroke::new(OUTLINE_WIDTH, COLOR_DROP_TARGET);
            painter.rect_stroke(rect, rounding, stroke);
        }

        let selected = self.editor.selected();
        if let Some(hovered) = self.editor.hovered().filter(|h| Some(*h) != selected) {
            if let Some(rect) = tree.absolute_rect(hovered) {
                painter.rect_stroke(
                    transform.rect_to_screen(rect),
                    rounding,
                    Stroke::new(1.0, COLOR_HOVER),
                );
            }
        }

        let Some(rect) = selected.and_then(|id| tree.absolute_rect(id)) else {
            return;
        };
        let rect = transform.rect_to_screen(rect);
        let stroke = Stroke::new(OUTLINE_WIDTH, COLOR_SELECTION);
        painter.rect_stroke(rect, egui::Rounding::ZERO, stroke);
        let handle_size = self.editor.config().handle_size;
        for handle in page_blocks::ResizeHandle::ALL {
            let handle_rect = handle.hit_rect(rect, handle_size);
            painter.rect_filled(handle_rect, egui::Rounding::same(2.0), COLOR_HANDLE_FILL);
            let stroke = Stroke::new(1.0, COLOR_SELECTION);
            painter.rect_stroke(handle_rect, egui::Rounding::same(2.0), stroke);
        }
    }

    fn save_document(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("Page", &["json"])
            .set_file_name("page.json");
        if let Some(dir) = self.dialog_dir() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };
        match self.editor.document().save(&path) {
            Ok(()) => self.document_file = Some(path),
            Err(err) => log::error!("failed to save {}: {err}", path.display()),
        }
    }

    fn open_document(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("Page", &["json"]);
        if let Some(dir) = self.dialog_dir() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };
        match Document::load(&path) {
            Ok(document) => {
                self.editor.load_document(document);
                self.document_file = Some(path);
            }
            Err(err) => log::error!("failed to open {}: {err}", path.display()),
        }
    }

    fn dialog_dir(&self) -> Option<PathBuf> {
        self.document_file
            .as_ref()
            .and_then(|f| f.parent().map(|p| p.to_path_buf()))
            .or_else(|| self.paths.as_ref().map(|p| p.documents.clone()))
    }
}

impl eframe::App for PageBlocksApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::default()
                    .fill(COLOR_TOOLBAR_BG)
                    .inner_margin(4.0)
                    .outer_margin(0.0),
            )
            .show(ctx, |ui| self.toolbar(ui));

        egui::SidePanel::left("palette")
            .resizable(false)
            .default_width(140.0)
            .show(ctx, |ui| self.palette(ui));

        egui::SidePanel::right("layers")
            .default_width(LAYERS_PANEL_WIDTH)
            .show(ctx, |ui| self.layers(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(COLOR_WORKSPACE_BG))
            .show(ctx, |ui| {
                egui::ScrollArea::both()
                    .id_salt("page_canvas")
                    .drag_to_scroll(false)
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.canvas(ui));
            });

        if self.editor.is_gesturing() || self.palette_drag.is_some() {
            ctx.request_repaint();
        }
    }

    /// Keeps the snap toggle and viewport choice for the next launch.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let Some(paths) = &self.paths else {
            return;
        };
        let file = paths.settings_file();
        match self.editor.config().save(&file) {
            Ok(()) => log::info!("saved settings to {}", file.display()),
            Err(err) => log::warn!("could not save settings to {}: {err}", file.display()),
        }
    }
}

fn toolbar_button(ui: &mut egui::Ui, icon: &str, hover: &str) -> egui::Response {
    ui.add(
        egui::Button::new(RichText::new(icon).size(22.0).color(Color32::WHITE))
            .min_size(Vec2::new(32.0, 32.0))
            .frame(false),
    )
    .on_hover_text(hover)
}

fn paint_placeholder(
    painter: &egui::Painter,
    rect: Rect,
    rounding: egui::Rounding,
    icon: &str,
    zoom: f32,
) {
    painter.rect_filled(rect, rounding, COLOR_MEDIA_PLACEHOLDER);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        icon,
        FontId::proportional(24.0 * zoom),
        Color32::GRAY,
    );
}

/// Reads a `#rgb`/`#rrggbb` style value; anything else (e.g. `transparent`) paints nothing.
fn style_color(node: &Node, key: &str) -> Option<Color32> {
    let value = node.style.get_or_default(key)?;
    let hex = value.as_str()?.trim();
    if !hex.starts_with('#') {
        return None;
    }
    Color32::from_hex(hex).ok()
}
