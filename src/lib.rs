pub mod color;
pub mod config;
pub mod draw;
pub mod geometry;
pub mod layout;
pub mod mask;
pub mod registry;
pub mod scene;
pub mod showcase;
pub mod target;
pub mod text;

// Re-export for embedders
pub use crate::color::{Color, ColorParseError};
pub use crate::draw::Canvas;
pub use crate::geometry::{Point, Rect, Size};
pub use crate::registry::{FileRegistry, MemoryRegistry, SingleShotRegistry};
pub use crate::scene::{HostLayout, Scene};
pub use crate::showcase::{
    Callbacks, HighlightStyle, Overlay, OverlayContainer, OverlayState, ShowEnv, ShowOutcome,
    Showcase, ShowcaseObserver,
};
pub use crate::target::{IndexPath, Target};
