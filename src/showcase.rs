// filepath: src/showcase.rs
//! The showcase overlay
//!
//! A [`Showcase`] is configured with a style and a target, then shown once
//! into an [`OverlayContainer`]. Showing resolves the target against the
//! host layout, composes the backdrop mask, outline and text into an
//! [`Overlay`], and hands it to the container. A tap removes it again.
//!
//! Lifecycle: `Unconfigured -> Configured -> Shown -> Dismissed`. A
//! dismissed showcase stays dismissed; present a new instance instead.

use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::layout::{layout_text, TextAlignment, TextLayout, TextSpec};
use crate::mask::{self, HighlightShape, MaskPath, Stroke};
use crate::registry::SingleShotRegistry;
use crate::scene::{BarItemId, HostLayout, ViewId};
use crate::target::{IndexPath, Target};
use crate::text::{FontSpec, TextMeasure};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Appearance of a showcase
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightStyle {
    pub background_color: Color,
    pub highlight_color: Color,
    pub title_color: Color,
    pub details_color: Color,
    pub title_font: FontSpec,
    pub details_font: FontSpec,
    pub title_alignment: TextAlignment,
    pub details_alignment: TextAlignment,
    pub shape: HighlightShape,
    /// Radius of the circle cutout
    pub radius: f32,
    /// Corner radius of the rectangle cutout
    pub corner_radius: f32,
    /// Opacity applied to the background color of the backdrop
    pub mask_opacity: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            background_color: Color::BLACK,
            highlight_color: Color::HIGHLIGHT,
            title_color: Color::WHITE,
            details_color: Color::WHITE,
            title_font: FontSpec::bold(24.0),
            details_font: FontSpec::regular(16.0),
            title_alignment: TextAlignment::Center,
            details_alignment: TextAlignment::Center,
            shape: HighlightShape::Rectangle,
            radius: 25.0,
            corner_radius: 0.0,
            mask_opacity: 0.75,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Unconfigured,
    Configured,
    Shown,
    Dismissed,
}

/// What a call to [`Showcase::show`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    /// The overlay was inserted into the container
    Shown,
    /// The single-shot identifier was already recorded
    Skipped,
    /// The showcase was not in the `Configured` state
    Ignored,
}

/// Notifications about a showcase's lifecycle
pub trait ShowcaseObserver {
    fn on_shown(&mut self) {}
    fn on_dismissed(&mut self) {}
}

impl<T: ShowcaseObserver> ShowcaseObserver for Rc<RefCell<T>> {
    fn on_shown(&mut self) {
        self.borrow_mut().on_shown();
    }

    fn on_dismissed(&mut self) {
        self.borrow_mut().on_dismissed();
    }
}

/// Closure-based observer
#[derive(Default)]
pub struct Callbacks {
    shown: Option<Box<dyn FnMut()>>,
    dismissed: Option<Box<dyn FnMut()>>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_shown(mut self, f: impl FnMut() + 'static) -> Self {
        self.shown = Some(Box::new(f));
        self
    }

    pub fn on_dismissed(mut self, f: impl FnMut() + 'static) -> Self {
        self.dismissed = Some(Box::new(f));
        self
    }
}

impl ShowcaseObserver for Callbacks {
    fn on_shown(&mut self) {
        if let Some(f) = &mut self.shown {
            f();
        }
    }

    fn on_dismissed(&mut self) {
        if let Some(f) = &mut self.dismissed {
            f();
        }
    }
}

/// Surface the overlay is presented on, topmost over the host UI
pub trait OverlayContainer {
    /// Bounds of the container; the overlay covers all of it
    fn bounds(&self) -> Rect;

    fn insert_overlay(&mut self, overlay: Overlay);

    /// Take the current overlay out, if there is one
    fn remove_overlay(&mut self) -> Option<Overlay>;
}

/// A composed overlay, ready to rasterize
#[derive(Debug, Clone)]
pub struct Overlay {
    pub bounds: Rect,
    /// Resolved target, clipped to `bounds`; zero when unresolvable
    pub highlight: Rect,
    pub mask: MaskPath,
    pub outline: Vec<Stroke>,
    pub text: TextLayout,
    pub style: HighlightStyle,
    pub title: String,
    pub details: String,
}

/// Everything `show()` talks to on the host side
pub struct ShowEnv<'a> {
    pub layout: &'a dyn HostLayout,
    pub container: &'a mut dyn OverlayContainer,
    pub registry: &'a mut dyn SingleShotRegistry,
    pub measure: &'a dyn TextMeasure,
}

#[derive(Debug, Clone, PartialEq)]
struct Content {
    target: Target,
    title: String,
    details: String,
}

pub struct Showcase {
    style: HighlightStyle,
    content: Option<Content>,
    single_shot_id: Option<i64>,
    observer: Option<Box<dyn ShowcaseObserver>>,
    state: OverlayState,
}

impl Default for Showcase {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Showcase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Showcase")
            .field("style", &self.style)
            .field("content", &self.content)
            .field("single_shot_id", &self.single_shot_id)
            .field("has_observer", &self.observer.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl Showcase {
    pub fn new() -> Self {
        Self::with_style(HighlightStyle::default())
    }

    pub fn with_style(style: HighlightStyle) -> Self {
        Self {
            style,
            content: None,
            single_shot_id: None,
            observer: None,
            state: OverlayState::Unconfigured,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn style(&self) -> &HighlightStyle {
        &self.style
    }

    pub fn target(&self) -> Option<&Target> {
        self.content.as_ref().map(|c| &c.target)
    }

    pub fn single_shot_id(&self) -> Option<i64> {
        self.single_shot_id
    }

    pub fn set_background_color(&mut self, color: Color) -> &mut Self {
        self.style.background_color = color;
        self
    }

    pub fn set_highlight_color(&mut self, color: Color) -> &mut Self {
        self.style.highlight_color = color;
        self
    }

    pub fn set_title_color(&mut self, color: Color) -> &mut Self {
        self.style.title_color = color;
        self
    }

    pub fn set_details_color(&mut self, color: Color) -> &mut Self {
        self.style.details_color = color;
        self
    }

    pub fn set_title_font(&mut self, font: FontSpec) -> &mut Self {
        self.style.title_font = font;
        self
    }

    pub fn set_details_font(&mut self, font: FontSpec) -> &mut Self {
        self.style.details_font = font;
        self
    }

    pub fn set_title_alignment(&mut self, alignment: TextAlignment) -> &mut Self {
        self.style.title_alignment = alignment;
        self
    }

    pub fn set_details_alignment(&mut self, alignment: TextAlignment) -> &mut Self {
        self.style.details_alignment = alignment;
        self
    }

    pub fn set_shape(&mut self, shape: HighlightShape) -> &mut Self {
        self.style.shape = shape;
        self
    }

    pub fn set_radius(&mut self, radius: f32) -> &mut Self {
        self.style.radius = radius;
        self
    }

    pub fn set_corner_radius(&mut self, corner_radius: f32) -> &mut Self {
        self.style.corner_radius = corner_radius;
        self
    }

    pub fn set_single_shot_id(&mut self, id: i64) -> &mut Self {
        self.single_shot_id = Some(id);
        self
    }

    pub fn set_observer(&mut self, observer: impl ShowcaseObserver + 'static) -> &mut Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Bind the showcase to `target`. Replaces any earlier binding.
    pub fn setup(&mut self, target: Target, title: &str, details: &str) -> &mut Self {
        match self.state {
            OverlayState::Unconfigured | OverlayState::Configured => {
                debug!("Showcase bound to {:?}", target);
                self.content = Some(Content {
                    target,
                    title: title.to_string(),
                    details: details.to_string(),
                });
                self.state = OverlayState::Configured;
            }
            state => warn!("Ignoring setup on a showcase in state {:?}", state),
        }
        self
    }

    pub fn setup_for_view(&mut self, view: impl Into<ViewId>, title: &str, details: &str) -> &mut Self {
        self.setup(Target::View { view: view.into() }, title, details)
    }

    /// Highlight the first row of the first section
    pub fn setup_for_table(&mut self, table: impl Into<ViewId>, title: &str, details: &str) -> &mut Self {
        self.setup_for_table_row(table, 0, 0, title, details)
    }

    pub fn setup_for_table_row(
        &mut self,
        table: impl Into<ViewId>,
        row: usize,
        section: usize,
        title: &str,
        details: &str,
    ) -> &mut Self {
        let target = Target::TableCell {
            table: table.into(),
            index: IndexPath::new(row, section),
        };
        self.setup(target, title, details)
    }

    pub fn setup_for_bar_button(
        &mut self,
        item: impl Into<BarItemId>,
        title: &str,
        details: &str,
    ) -> &mut Self {
        self.setup(Target::BarButton { item: item.into() }, title, details)
    }

    pub fn setup_for_location(&mut self, rect: Rect, title: &str, details: &str) -> &mut Self {
        self.setup(Target::Location { rect }, title, details)
    }

    /// Compose the overlay for `highlight` over `bounds` without presenting it.
    pub fn compose(&self, bounds: Rect, highlight: Rect, measure: &dyn TextMeasure) -> Overlay {
        let style = &self.style;
        let (title, details) = self
            .content
            .as_ref()
            .map(|c| (c.title.clone(), c.details.clone()))
            .unwrap_or_default();

        let cutout = mask::cutout(style.shape, highlight, style.radius, style.corner_radius);
        let mask = MaskPath::backdrop(bounds, cutout);
        let outline = mask::outline(style.shape, highlight, style.radius, style.corner_radius);

        // The target picks the side; the text also clears everything drawn around it
        let avoid = outline
            .iter()
            .map(|s| s.path.bounds().inflate(s.width / 2.0))
            .fold(highlight, |acc, r| acc.union(&r));

        let text = layout_text(
            measure,
            bounds,
            highlight,
            avoid,
            &TextSpec {
                text: &title,
                font: &style.title_font,
                alignment: style.title_alignment,
            },
            &TextSpec {
                text: &details,
                font: &style.details_font,
                alignment: style.details_alignment,
            },
        );

        Overlay {
            bounds,
            highlight,
            mask,
            outline,
            text,
            style: style.clone(),
            title,
            details,
        }
    }

    /// Present the showcase. Never fails: unresolvable targets degrade to
    /// an overlay without a cutout, registry write errors are logged.
    pub fn show(&mut self, env: ShowEnv<'_>) -> ShowOutcome {
        if self.state != OverlayState::Configured {
            warn!("show() called on a showcase in state {:?}", self.state);
            return ShowOutcome::Ignored;
        }
        let Some(content) = &self.content else {
            return ShowOutcome::Ignored;
        };

        if let Some(id) = self.single_shot_id {
            if env.registry.is_recorded(id) {
                info!("Showcase {} already shown, skipping", id);
                self.state = OverlayState::Dismissed;
                return ShowOutcome::Skipped;
            }
        }

        let bounds = env.container.bounds();
        let highlight = resolve_highlight(&content.target, env.layout, bounds);
        let overlay = self.compose(bounds, highlight, env.measure);
        env.container.insert_overlay(overlay);
        self.state = OverlayState::Shown;
        info!("Showcase shown");

        if let Some(observer) = &mut self.observer {
            observer.on_shown();
        }

        if let Some(id) = self.single_shot_id {
            if let Err(e) = env.registry.record(id) {
                warn!("Failed to record showcase {}: {}", id, e);
            }
        }

        ShowOutcome::Shown
    }

    /// Recompose the shown overlay for the container's current bounds.
    /// Returns false when nothing is shown.
    pub fn relayout(
        &self,
        layout: &dyn HostLayout,
        container: &mut dyn OverlayContainer,
        measure: &dyn TextMeasure,
    ) -> bool {
        if self.state != OverlayState::Shown {
            return false;
        }
        let Some(content) = &self.content else {
            return false;
        };
        let bounds = container.bounds();
        let highlight = resolve_highlight(&content.target, layout, bounds);
        let overlay = self.compose(bounds, highlight, measure);
        container.remove_overlay();
        container.insert_overlay(overlay);
        true
    }

    /// A tap on the overlay dismisses it. Returns whether it was dismissed.
    pub fn handle_tap(&mut self, point: Point, container: &mut dyn OverlayContainer) -> bool {
        if self.state != OverlayState::Shown {
            return false;
        }
        if !container.bounds().contains(point) {
            debug!("Tap at {:?} outside the overlay", point);
            return false;
        }
        self.dismiss(container)
    }

    /// Remove the overlay and notify the observer. No-op unless shown.
    pub fn dismiss(&mut self, container: &mut dyn OverlayContainer) -> bool {
        if self.state != OverlayState::Shown {
            debug!("dismiss() on a showcase in state {:?}", self.state);
            return false;
        }
        if container.remove_overlay().is_none() {
            warn!("Container held no overlay on dismiss");
        }
        self.state = OverlayState::Dismissed;
        info!("Showcase dismissed");
        if let Some(observer) = &mut self.observer {
            observer.on_dismissed();
        }
        true
    }
}

/// Target rect clipped to `bounds`; zero when it cannot be resolved or
/// lies outside.
fn resolve_highlight(target: &Target, layout: &dyn HostLayout, bounds: Rect) -> Rect {
    let resolved = target.resolve(layout).unwrap_or_else(|| {
        warn!("Could not resolve {:?}, showing without a cutout", target);
        Rect::ZERO
    });
    let highlight = resolved.intersection(&bounds).unwrap_or(Rect::ZERO);
    debug!("Resolved highlight {:?} within {:?}", highlight, bounds);
    highlight
}
