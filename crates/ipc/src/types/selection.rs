//! Selection id sets sent by the editor shell.

use serde::{Deserialize, Serialize};

/// Selected element ids, as tracked by the shell's selection state.
///
/// Any of the lists may be empty; which ones a command reads depends on the
/// selection mode it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionIds {
    pub vertices: Vec<u32>,
    pub edges: Vec<u32>,
    pub faces: Vec<u32>,
}

impl SelectionIds {
    pub fn vertices(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            vertices: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn edges(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            edges: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn faces(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }
}
