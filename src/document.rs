//! The persisted `{ "elements": [...] }` form of a page.

use crate::error::DocumentError;
use crate::node::Node;
use crate::tree::ElementTree;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub elements: Vec<Node>,
}

impl Document {
    pub fn from_tree(tree: &ElementTree) -> Self {
        Self {
            elements: tree.roots().to_vec(),
        }
    }

    /// Rebuilds a tree, normalizing ids and sizes the way `insert` does.
    pub fn into_tree(self) -> ElementTree {
        ElementTree::from_roots(self.elements)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let file = File::open(path)?;
        let document: Self = serde_json::from_reader(BufReader::new(file))?;
        log::info!(
            "loaded {} root elements from {}",
            document.elements.len(),
            path.display()
        );
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        log::info!("saved document to {}", path.display());
        Ok(())
    }
}
