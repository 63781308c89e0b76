// filepath: src/target.rs
//! What a showcase points at

use crate::geometry::Rect;
use crate::scene::{BarItemId, HostLayout, ViewId};
use serde::{Deserialize, Serialize};

/// Row and section of a table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IndexPath {
    pub row: usize,
    #[serde(default)]
    pub section: usize,
}

impl IndexPath {
    pub const fn new(row: usize, section: usize) -> Self {
        Self { row, section }
    }
}

/// The screen element a showcase highlights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    /// A laid-out view, highlighted at its window frame
    View { view: ViewId },
    /// One row of a table view
    TableCell {
        table: ViewId,
        #[serde(default)]
        index: IndexPath,
    },
    /// The view backing a bar button item
    BarButton { item: BarItemId },
    /// An explicit rectangle in window coordinates
    Location { rect: Rect },
}

impl Target {
    /// Window-space rect of the target, `None` when the host cannot place it yet.
    pub fn resolve(&self, host: &dyn HostLayout) -> Option<Rect> {
        match self {
            Target::View { view } => host.view_frame(view),
            Target::TableCell { table, index } => host.table_row_rect(table, *index),
            Target::BarButton { item } => host.bar_item_frame(item),
            Target::Location { rect } => Some(*rect),
        }
    }
}
