// filepath: src/scene.rs
//! Host layout description
//!
//! The showcase never owns the UI it points at. It asks a [`HostLayout`]
//! where things are. [`Scene`] is a declarative implementation: a tree of
//! frames, table views with uniform row metrics, and bar items backed by
//! views. It can be built in code or loaded from the `[scene]` section of
//! the configuration file.

use crate::geometry::{Point, Rect};
use crate::target::IndexPath;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarItemId(pub String);

impl From<&str> for ViewId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for BarItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for BarItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where targets live on screen. All results are in window coordinates.
pub trait HostLayout {
    /// Frame of a view, converted to window coordinates
    fn view_frame(&self, view: &ViewId) -> Option<Rect>;

    /// Rect of the row at `index` in `table`, converted to window coordinates
    fn table_row_rect(&self, table: &ViewId, index: IndexPath) -> Option<Rect>;

    /// Frame of the view backing a bar button item
    fn bar_item_frame(&self, item: &BarItemId) -> Option<Rect>;
}

/// A view in the host tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneView {
    pub id: ViewId,
    /// Parent view; `None` means the view sits directly in the window
    #[serde(default)]
    pub parent: Option<ViewId>,
    /// Frame in the parent's coordinate space. `None` until laid out.
    #[serde(default)]
    pub frame: Option<Rect>,
    /// Scroll offset of the view's content (bounds origin)
    #[serde(default)]
    pub content_offset: Point,
}

/// Row metrics of a table view. Rows have uniform height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTable {
    pub view: ViewId,
    /// Number of rows in each section
    pub sections: Vec<usize>,
    pub row_height: f32,
    #[serde(default)]
    pub header_height: f32,
    #[serde(default)]
    pub footer_height: f32,
}

impl SceneTable {
    /// Row rect in the table's content coordinates
    pub fn row_rect(&self, index: IndexPath, width: f32) -> Option<Rect> {
        let rows = *self.sections.get(index.section)?;
        if index.row >= rows {
            return None;
        }
        let preceding: f32 = self.sections[..index.section]
            .iter()
            .map(|&n| self.header_height + n as f32 * self.row_height + self.footer_height)
            .sum();
        let y = preceding + self.header_height + index.row as f32 * self.row_height;
        Some(Rect::new(0.0, y, width, self.row_height))
    }
}

/// A bar button item and the view that renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneBarItem {
    pub id: BarItemId,
    /// `None` while the bar has not realized the item
    #[serde(default)]
    pub view: Option<ViewId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub views: Vec<SceneView>,
    #[serde(default)]
    pub tables: Vec<SceneTable>,
    #[serde(default)]
    pub bar_items: Vec<SceneBarItem>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a laid-out view
    pub fn add_view(&mut self, id: &str, parent: Option<&str>, frame: Rect) -> &mut Self {
        self.views.push(SceneView {
            id: id.into(),
            parent: parent.map(ViewId::from),
            frame: Some(frame),
            content_offset: Point::default(),
        });
        self
    }

    /// Add a table backed by the view `id`, which must also be added as a view
    pub fn add_table(&mut self, id: &str, sections: Vec<usize>, row_height: f32) -> &mut Self {
        self.tables.push(SceneTable {
            view: id.into(),
            sections,
            row_height,
            header_height: 0.0,
            footer_height: 0.0,
        });
        self
    }

    pub fn add_bar_item(&mut self, id: &str, view: Option<&str>) -> &mut Self {
        self.bar_items.push(SceneBarItem {
            id: id.into(),
            view: view.map(ViewId::from),
        });
        self
    }

    pub fn view(&self, id: &ViewId) -> Option<&SceneView> {
        self.views.iter().find(|v| &v.id == id)
    }

    pub fn view_mut(&mut self, id: &ViewId) -> Option<&mut SceneView> {
        self.views.iter_mut().find(|v| &v.id == id)
    }

    pub fn table(&self, id: &ViewId) -> Option<&SceneTable> {
        self.tables.iter().find(|t| &t.view == id)
    }

    /// Origin of a view's content coordinate space, in window coordinates.
    fn content_origin(&self, id: &ViewId) -> Option<Point> {
        let frame = self.window_frame(id)?;
        let view = self.view(id)?;
        Some(Point::new(
            frame.x - view.content_offset.x,
            frame.y - view.content_offset.y,
        ))
    }

    /// Walk the parent chain summing origins. Unlaid ancestors, unknown
    /// parents and cycles all make the view unresolvable.
    fn window_frame(&self, id: &ViewId) -> Option<Rect> {
        let mut view = self.view(id)?;
        let mut rect = view.frame?;
        let mut depth = 0;
        while let Some(parent_id) = &view.parent {
            depth += 1;
            if depth > self.views.len() {
                log::warn!("View hierarchy cycle through {}", id);
                return None;
            }
            view = self.view(parent_id)?;
            let parent_frame = view.frame?;
            rect = rect.offset(
                parent_frame.x - view.content_offset.x,
                parent_frame.y - view.content_offset.y,
            );
        }
        Some(rect)
    }
}

impl HostLayout for Scene {
    fn view_frame(&self, view: &ViewId) -> Option<Rect> {
        self.window_frame(view)
    }

    fn table_row_rect(&self, table: &ViewId, index: IndexPath) -> Option<Rect> {
        let metrics = self.table(table)?;
        let frame = self.view(table)?.frame?;
        let origin = self.content_origin(table)?;
        let row = metrics.row_rect(index, frame.width)?;
        Some(row.offset(origin.x, origin.y))
    }

    fn bar_item_frame(&self, item: &BarItemId) -> Option<Rect> {
        let item = self.bar_items.iter().find(|b| &b.id == item)?;
        self.window_frame(item.view.as_ref()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Scene {
        let mut scene = Scene::new();
        scene
            .add_view("root", None, Rect::new(0.0, 64.0, 400.0, 700.0))
            .add_view("button", Some("root"), Rect::new(20.0, 30.0, 100.0, 40.0))
            .add_view("table", Some("root"), Rect::new(0.0, 100.0, 400.0, 500.0))
            .add_table("table", vec![3, 4], 44.0)
            .add_view("nav-item", None, Rect::new(340.0, 20.0, 44.0, 44.0))
            .add_bar_item("share", Some("nav-item"))
            .add_bar_item("pending", None);
        scene
    }

    #[test]
    fn view_frame_is_converted_to_window_coordinates() {
        let scene = sample();
        assert_eq!(
            scene.view_frame(&"button".into()),
            Some(Rect::new(20.0, 94.0, 100.0, 40.0))
        );
    }

    #[test]
    fn scrolled_parent_shifts_children() {
        let mut scene = sample();
        scene.view_mut(&"root".into()).unwrap().content_offset = Point::new(0.0, 10.0);
        assert_eq!(
            scene.view_frame(&"button".into()),
            Some(Rect::new(20.0, 84.0, 100.0, 40.0))
        );
    }

    #[test]
    fn unlaid_view_does_not_resolve() {
        let mut scene = sample();
        scene.view_mut(&"root".into()).unwrap().frame = None;
        assert_eq!(scene.view_frame(&"button".into()), None);
        assert_eq!(scene.view_frame(&"missing".into()), None);
    }

    #[test]
    fn table_rows_account_for_preceding_sections() {
        let scene = sample();
        let table = ViewId::from("table");
        // table origin in window: (0, 164)
        assert_eq!(
            scene.table_row_rect(&table, IndexPath::new(0, 0)),
            Some(Rect::new(0.0, 164.0, 400.0, 44.0))
        );
        assert_eq!(
            scene.table_row_rect(&table, IndexPath::new(2, 1)),
            Some(Rect::new(0.0, 164.0 + 3.0 * 44.0 + 2.0 * 44.0, 400.0, 44.0))
        );
        assert_eq!(scene.table_row_rect(&table, IndexPath::new(3, 0)), None);
        assert_eq!(scene.table_row_rect(&table, IndexPath::new(0, 2)), None);
    }

    #[test]
    fn bar_items_resolve_through_their_view() {
        let scene = sample();
        assert_eq!(
            scene.bar_item_frame(&"share".into()),
            Some(Rect::new(340.0, 20.0, 44.0, 44.0))
        );
        assert_eq!(scene.bar_item_frame(&"pending".into()), None);
    }

    #[test]
    fn parent_cycle_is_unresolvable() {
        let mut scene = Scene::new();
        scene
            .add_view("a", Some("b"), Rect::new(0.0, 0.0, 1.0, 1.0))
            .add_view("b", Some("a"), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(scene.view_frame(&"a".into()), None);
    }
}
