use crate::constants::{
    CONTAINER_BOUNDS, MEDIA_ASPECT_RATIO, MEDIA_BOUNDS, OTHER_BOUNDS, TEXT_BOUNDS,
};
use egui::{pos2, vec2, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Opaque, stable identifier of a placed node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The "not yet assigned" id. Insertion replaces it with a fresh one.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Text,
    Heading,
    Image,
    Button,
    Video,
    Section,
    Container,
    Navbar,
    Footer,
    Shape,
}

impl NodeKind {
    pub const ALL: [NodeKind; 10] = [
        NodeKind::Text,
        NodeKind::Heading,
        NodeKind::Image,
        NodeKind::Button,
        NodeKind::Video,
        NodeKind::Section,
        NodeKind::Container,
        NodeKind::Navbar,
        NodeKind::Footer,
        NodeKind::Shape,
    ];

    /// Container-like kinds are the only ones allowed to hold children, of any kind.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeKind::Section | NodeKind::Container | NodeKind::Navbar | NodeKind::Footer
        )
    }

    pub fn has_text(self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::Heading | NodeKind::Button)
    }

    pub fn has_media_source(self) -> bool {
        matches!(self, NodeKind::Image | NodeKind::Video)
    }

    pub fn bounds(self) -> SizeBounds {
        let [min_width, max_width, min_height, max_height] = match self {
            NodeKind::Text | NodeKind::Heading => TEXT_BOUNDS,
            NodeKind::Image | NodeKind::Video => MEDIA_BOUNDS,
            k if k.is_container() => CONTAINER_BOUNDS,
            _ => OTHER_BOUNDS,
        };
        SizeBounds {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    pub fn aspect_ratio(self) -> Option<f32> {
        self.has_media_source().then_some(MEDIA_ASPECT_RATIO)
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Text => "Text",
            NodeKind::Heading => "Heading",
            NodeKind::Image => "Image",
            NodeKind::Button => "Button",
            NodeKind::Video => "Video",
            NodeKind::Section => "Section",
            NodeKind::Container => "Container",
            NodeKind::Navbar => "Navbar",
            NodeKind::Footer => "Footer",
            NodeKind::Shape => "Shape",
        }
    }
}

/// Inclusive width/height range a node kind may occupy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeBounds {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl SizeBounds {
    pub fn clamp_width(&self, width: f32) -> f32 {
        clamp_finite(width, self.min_width, self.max_width)
    }

    pub fn clamp_height(&self, height: f32) -> f32 {
        clamp_finite(height, self.min_height, self.max_height)
    }

    pub fn contains(&self, size: Vec2) -> bool {
        (self.min_width..=self.max_width).contains(&size.x)
            && (self.min_height..=self.max_height).contains(&size.y)
    }
}

fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Position and size in the parent's coordinate space.
///
/// `x`/`y` are absent for nodes placed by flow layout; they read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    pub width: f32,
    pub height: f32,
}

impl Geometry {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            x: None,
            y: None,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Pos2 {
        pos2(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }

    pub fn set_origin(&mut self, origin: Pos2) {
        self.x = Some(origin.x);
        self.y = Some(origin.y);
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn local_rect(&self) -> Rect {
        Rect::from_min_size(self.origin(), self.size())
    }
}

/// A single style value: either a bare number or a CSS-like string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Numeric reading of the value, accepting unit suffixes such as `"16px"`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            StyleValue::Text(s) => {
                let trimmed = s.trim();
                let end = trimmed
                    .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
                    .unwrap_or(trimmed.len());
                trimmed[..end].parse().ok()
            }
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            StyleValue::Number(_) => None,
        }
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Text(s)
    }
}

/// Open mapping of presentation attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(BTreeMap<String, StyleValue>);

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<StyleValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.0.get(key)
    }

    /// Value for `key`, falling back to the default of a known key.
    pub fn get_or_default(&self, key: &str) -> Option<StyleValue> {
        self.0.get(key).cloned().or_else(|| known_default(key))
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get_or_default(key).and_then(|v| v.as_number())
    }

    /// Overlays every key of `patch` onto this style.
    pub fn merge(&mut self, patch: &Style) -> bool {
        let mut changed = false;
        for (key, value) in &patch.0 {
            if self.0.get(key) != Some(value) {
                self.0.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn known_default(key: &str) -> Option<StyleValue> {
    let value = match key {
        "opacity" => StyleValue::Number(1.0),
        "fontSize" => StyleValue::Number(16.0),
        "fontWeight" => StyleValue::Text("400".into()),
        "color" => StyleValue::Text("#111827".into()),
        "backgroundColor" => StyleValue::Text("transparent".into()),
        "padding" | "margin" | "borderRadius" | "borderWidth" => StyleValue::Number(0.0),
        "textAlign" => StyleValue::Text("left".into()),
        _ => return None,
    };
    Some(value)
}

/// Variant-specific payload. Only the fields a kind uses are set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Content {
    fn merge(&mut self, patch: &Content) -> bool {
        let mut changed = false;
        for (slot, value) in [
            (&mut self.text, &patch.text),
            (&mut self.src, &patch.src),
            (&mut self.alt, &patch.alt),
            (&mut self.href, &patch.href),
        ] {
            if value.is_some() && *slot != *value {
                *slot = value.clone();
                changed = true;
            }
        }
        changed
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: NodeId,
    pub kind: NodeKind,
    pub geometry: Geometry,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub content: Content,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Instantiates the default template of `kind` with a fresh id.
    pub fn from_template(kind: NodeKind) -> Self {
        let (geometry, style, content) = template(kind);
        Self {
            id: NodeId::new(),
            kind,
            geometry,
            style,
            content,
            children: Vec::new(),
        }
    }

    pub fn at(mut self, origin: Pos2) -> Self {
        self.geometry.set_origin(origin);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// Text content when present, otherwise the kind name.
    pub fn label(&self) -> String {
        match &self.content.text {
            Some(text) if !text.trim().is_empty() => text.clone(),
            _ => self.kind.label().to_string(),
        }
    }

    /// Forces width/height into the kind's bounds. Returns true if anything moved.
    pub fn clamp_to_bounds(&mut self) -> bool {
        let bounds = self.kind.bounds();
        let width = bounds.clamp_width(self.geometry.width);
        let height = bounds.clamp_height(self.geometry.height);
        let changed = width != self.geometry.width || height != self.geometry.height;
        self.geometry.width = width;
        self.geometry.height = height;
        changed
    }

    /// Pre-order walk over this node and its descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.walk(&mut |n| ids.push(n.id));
        ids
    }

    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

/// Geometry fields to overwrite. `None` leaves the field as it is.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeometryPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

/// Partial update applied by `ElementTree::update`.
///
/// Style keys are merged into the existing style; content fields and geometry
/// fields that are set replace the current ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePatch {
    pub geometry: GeometryPatch,
    pub style: Option<Style>,
    pub content: Option<Content>,
    /// Skips size clamping. Only aspect-locked resizes set this, since the
    /// ratio may push the derived axis past its bound.
    pub allow_oversize: bool,
}

impl NodePatch {
    pub fn position(origin: Pos2) -> Self {
        Self {
            geometry: GeometryPatch {
                x: Some(origin.x),
                y: Some(origin.y),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn rect(rect: Rect) -> Self {
        Self {
            geometry: GeometryPatch {
                x: Some(rect.min.x),
                y: Some(rect.min.y),
                width: Some(rect.width()),
                height: Some(rect.height()),
            },
            ..Default::default()
        }
    }

    /// Geometry produced by a resize gesture, already constrained by the caller.
    pub fn resized(rect: Rect) -> Self {
        Self {
            allow_oversize: true,
            ..Self::rect(rect)
        }
    }

    pub fn style(style: Style) -> Self {
        Self {
            style: Some(style),
            ..Default::default()
        }
    }

    pub fn content(content: Content) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::content(Content {
            text: Some(text.into()),
            ..Default::default()
        })
    }

    /// Applies the patch, clamping the resulting size. Returns true if the node changed.
    pub fn apply(&self, node: &mut Node) -> bool {
        let before = node.geometry;
        let g = &self.geometry;
        if g.x.is_some() {
            node.geometry.x = g.x;
        }
        if g.y.is_some() {
            node.geometry.y = g.y;
        }
        if let Some(width) = g.width {
            node.geometry.width = width;
        }
        if let Some(height) = g.height {
            node.geometry.height = height;
        }
        if !self.allow_oversize {
            node.clamp_to_bounds();
        }
        let mut changed = node.geometry != before;

        if let Some(style) = &self.style {
            changed |= node.style.merge(style);
        }
        if let Some(content) = &self.content {
            changed |= node.content.merge(content);
        }
        changed
    }
}

fn template(kind: NodeKind) -> (Geometry, Style, Content) {
    match kind {
        NodeKind::Text => (
            Geometry::sized(240.0, 40.0),
            Style::new()
                .with("fontSize", 16.0)
                .with("color", "#374151")
                .with("padding", 8.0),
            Content {
                text: Some("Your text here".into()),
                ..Default::default()
            },
        ),
        NodeKind::Heading => (
            Geometry::sized(320.0, 56.0),
            Style::new()
                .with("fontSize", 32.0)
                .with("fontWeight", "600")
                .with("color", "#111827"),
            Content {
                text: Some("New Heading".into()),
                ..Default::default()
            },
        ),
        NodeKind::Image => (
            Geometry::sized(300.0, 200.0),
            Style::new().with("borderRadius", 8.0),
            Content {
                src: Some(
                    "https://images.unsplash.com/photo-1498050108023-c5249f4df085?w=300&h=200&fit=crop"
                        .into(),
                ),
                alt: Some("Sample Image".into()),
                ..Default::default()
            },
        ),
        NodeKind::Button => (
            Geometry::sized(128.0, 48.0),
            Style::new()
                .with("backgroundColor", "#2563eb")
                .with("color", "#ffffff")
                .with("borderRadius", 8.0)
                .with("fontSize", 16.0)
                .with("fontWeight", "500"),
            Content {
                text: Some("Click Me".into()),
                href: Some("#".into()),
                ..Default::default()
            },
        ),
        NodeKind::Video => (
            Geometry::sized(480.0, 270.0),
            Style::new().with("borderRadius", 8.0),
            Content {
                src: Some("https://www.w3schools.com/html/mov_bbb.mp4".into()),
                ..Default::default()
            },
        ),
        NodeKind::Section => (
            Geometry::sized(800.0, 200.0),
            Style::new()
                .with("padding", 32.0)
                .with("backgroundColor", "#f9fafb")
                .with("borderRadius", 8.0)
                .with("border", "2px dashed #d1d5db"),
            Content::default(),
        ),
        NodeKind::Container => (
            Geometry::sized(960.0, 320.0),
            Style::new().with("padding", 16.0),
            Content::default(),
        ),
        NodeKind::Navbar => (
            Geometry::sized(1200.0, 100.0),
            Style::new()
                .with("backgroundColor", "#ffffff")
                .with("padding", 16.0)
                .with("borderBottom", "1px solid #e5e7eb"),
            Content::default(),
        ),
        NodeKind::Footer => (
            Geometry::sized(1200.0, 160.0),
            Style::new()
                .with("backgroundColor", "#374151")
                .with("color", "#ffffff")
                .with("padding", 32.0)
                .with("textAlign", "center"),
            Content::default(),
        ),
        NodeKind::Shape => (
            Geometry::sized(120.0, 120.0),
            Style::new()
                .with("backgroundColor", "#93c5fd")
                .with("borderRadius", 0.0),
            Content::default(),
        ),
    }
}
