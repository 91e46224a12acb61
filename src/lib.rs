//! Editing core for a visual page builder: a nested tree of typed blocks plus
//! the pointer-driven drag, resize, selection and undo machinery around it.

pub mod config;
pub mod constants;
pub mod document;
pub mod drag;
pub mod drop_zone;
pub mod editor;
pub mod error;
pub mod history;
pub mod node;
pub mod paths;
pub mod resize;
pub mod selection;
pub mod snap;
pub mod tree;
pub mod viewport;

pub use config::EditorConfig;
pub use document::Document;
pub use drop_zone::DropTarget;
pub use editor::{Editor, PointerDown};
pub use error::{DocumentError, TreeError, TreeResult};
pub use history::History;
pub use node::{Content, Geometry, Node, NodeId, NodeKind, NodePatch, Style, StyleValue};
pub use resize::ResizeHandle;
pub use tree::ElementTree;
pub use viewport::{CanvasTransform, Viewport};
