// filepath: src/layout.rs
//! Title/description placement around the highlight
//!
//! The text block goes on whichever side of the highlight (above or below)
//! has more room, so it never covers the target. Title lines come first,
//! description lines under them.

use crate::geometry::{Point, Rect};
use crate::text::{block_size, wrap, FontSpec, TextMeasure};
use serde::{Deserialize, Serialize};

/// Horizontal inset of text from the overlay edges
pub const TEXT_MARGIN: f32 = 16.0;
/// Vertical gap between the title and description
pub const TEXT_GAP: f32 = 8.0;
/// Text never goes above a highlight with less room than this over it
pub const MIN_TEXT_SPACE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// One laid out line; `origin` is the top-left of its line box
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub origin: Point,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Label {
    pub lines: Vec<TextLine>,
    /// Union of the line boxes; zero for empty text
    pub frame: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub placement: Placement,
    /// Free area on the chosen side
    pub region: Rect,
    pub title: Label,
    pub details: Label,
}

/// Text parameters for one label
pub struct TextSpec<'a> {
    pub text: &'a str,
    pub font: &'a FontSpec,
    pub alignment: TextAlignment,
}

/// Pick the side of `highlight` with more vertical room inside `bounds`.
/// Ties, including a highlight spanning the full height, go below.
pub fn choose_placement(bounds: Rect, highlight: Rect) -> Placement {
    let above = (highlight.top() - bounds.top()).max(0.0);
    let below = (bounds.bottom() - highlight.bottom()).max(0.0);
    if above >= MIN_TEXT_SPACE && above > below {
        Placement::Above
    } else {
        Placement::Below
    }
}

/// Lay out title and description around `highlight`. The side comes from
/// `highlight` alone; the region on that side stops at `avoid`, which must
/// contain `highlight` (its outline, say).
pub fn layout_text(
    measure: &dyn TextMeasure,
    bounds: Rect,
    highlight: Rect,
    avoid: Rect,
    title: &TextSpec<'_>,
    details: &TextSpec<'_>,
) -> TextLayout {
    let placement = choose_placement(bounds, highlight);
    let region = match placement {
        Placement::Above => Rect::new(
            bounds.x,
            bounds.top(),
            bounds.width,
            (avoid.top() - bounds.top()).max(0.0),
        ),
        Placement::Below => {
            let top = avoid.bottom().clamp(bounds.top(), bounds.bottom());
            Rect::new(bounds.x, top, bounds.width, bounds.bottom() - top)
        }
    };
    log::debug!("Text placement {:?} in {:?}", placement, region);

    let max_width = (bounds.width - 2.0 * TEXT_MARGIN).max(0.0);
    let title_lines = wrap(measure, title.text, title.font, max_width);
    let details_lines = wrap(measure, details.text, details.font, max_width);
    let title_size = block_size(measure, &title_lines, title.font);
    let details_size = block_size(measure, &details_lines, details.font);

    let gap = if title_size.height > 0.0 && details_size.height > 0.0 {
        TEXT_GAP
    } else {
        0.0
    };
    let block_height = title_size.height + gap + details_size.height;

    // Center in the region, then keep the block on screen
    let mut top = region.y + (region.height - block_height) / 2.0;
    top = top.min(bounds.bottom() - TEXT_MARGIN - block_height);
    top = top.max(bounds.top() + TEXT_MARGIN);

    let title_label = place_lines(measure, &title_lines, title, bounds, top);
    let details_top = top + title_size.height + gap;
    let details_label = place_lines(measure, &details_lines, details, bounds, details_top);

    TextLayout {
        placement,
        region,
        title: title_label,
        details: details_label,
    }
}

fn place_lines(
    measure: &dyn TextMeasure,
    lines: &[String],
    spec: &TextSpec<'_>,
    bounds: Rect,
    top: f32,
) -> Label {
    let line_height = measure.line_height(spec.font);
    let mut label = Label::default();
    if lines.iter().all(|l| l.is_empty()) {
        return label;
    }

    let mut left = f32::MAX;
    let mut right = f32::MIN;
    for (i, text) in lines.iter().enumerate() {
        let width = measure.text_width(text, spec.font);
        let x = match spec.alignment {
            TextAlignment::Left => bounds.left() + TEXT_MARGIN,
            TextAlignment::Center => bounds.center().x - width / 2.0,
            TextAlignment::Right => bounds.right() - TEXT_MARGIN - width,
        };
        left = left.min(x);
        right = right.max(x + width);
        label.lines.push(TextLine {
            text: text.clone(),
            origin: Point::new(x, top + i as f32 * line_height),
            width,
        });
    }
    label.frame = Rect::new(left, top, right - left, lines.len() as f32 * line_height);
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FixedMetrics;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);

    fn layout(highlight: Rect) -> TextLayout {
        let title_font = FontSpec::bold(24.0);
        let details_font = FontSpec::regular(16.0);
        layout_text(
            &FixedMetrics,
            SCREEN,
            highlight,
            highlight,
            &TextSpec {
                text: "Share",
                font: &title_font,
                alignment: TextAlignment::Center,
            },
            &TextSpec {
                text: "Send this page to a friend",
                font: &details_font,
                alignment: TextAlignment::Center,
            },
        )
    }

    #[test]
    fn more_room_above_places_text_above() {
        let highlight = Rect::new(100.0, 600.0, 200.0, 50.0);
        let text = layout(highlight);
        assert_eq!(text.placement, Placement::Above);
        assert!(text.details.frame.bottom() <= highlight.top());
        assert!(text.title.frame.bottom() <= text.details.frame.top());
    }

    #[test]
    fn more_room_below_places_text_below() {
        let highlight = Rect::new(100.0, 100.0, 200.0, 50.0);
        let text = layout(highlight);
        assert_eq!(text.placement, Placement::Below);
        assert!(text.title.frame.top() >= highlight.bottom());
    }

    #[test]
    fn full_height_highlight_defaults_below() {
        assert_eq!(choose_placement(SCREEN, SCREEN), Placement::Below);
        assert_eq!(
            choose_placement(SCREEN, Rect::new(0.0, 0.0, 50.0, 800.0)),
            Placement::Below
        );
    }

    #[test]
    fn edge_hugging_highlight_forces_other_side() {
        // 4px below, 780px above
        let highlight = Rect::new(0.0, 780.0, 400.0, 16.0);
        assert_eq!(choose_placement(SCREEN, highlight), Placement::Above);
        // 4px above, plenty below
        let highlight = Rect::new(0.0, 4.0, 400.0, 40.0);
        assert_eq!(choose_placement(SCREEN, highlight), Placement::Below);
    }

    #[test]
    fn cramped_above_goes_below_even_with_less_room() {
        // 5px above, 3px below
        let highlight = Rect::new(0.0, 5.0, 400.0, 792.0);
        assert_eq!(choose_placement(SCREEN, highlight), Placement::Below);
        // 9px above, 3px below
        let highlight = Rect::new(0.0, 9.0, 400.0, 788.0);
        assert_eq!(choose_placement(SCREEN, highlight), Placement::Above);
    }

    #[test]
    fn region_stops_at_avoid_rect() {
        let font = FontSpec::regular(16.0);
        let spec = TextSpec {
            text: "hi",
            font: &font,
            alignment: TextAlignment::Center,
        };
        let highlight = Rect::new(100.0, 600.0, 200.0, 50.0);
        let text = layout_text(&FixedMetrics, SCREEN, highlight, highlight.inflate(20.0), &spec, &spec);
        assert_eq!(text.placement, Placement::Above);
        assert_eq!(text.region, Rect::new(0.0, 0.0, 400.0, 580.0));
    }

    #[test]
    fn lines_are_centered_horizontally() {
        let text = layout(Rect::new(100.0, 100.0, 200.0, 50.0));
        let line = &text.title.lines[0];
        assert!((line.origin.x + line.width / 2.0 - SCREEN.center().x).abs() < 1e-3);
    }

    #[test]
    fn left_alignment_uses_margin() {
        let font = FontSpec::regular(16.0);
        let spec = TextSpec {
            text: "hello",
            font: &font,
            alignment: TextAlignment::Left,
        };
        let empty = TextSpec {
            text: "",
            font: &font,
            alignment: TextAlignment::Center,
        };
        let text = layout_text(&FixedMetrics, SCREEN, Rect::ZERO, Rect::ZERO, &spec, &empty);
        assert_eq!(text.title.lines[0].origin.x, TEXT_MARGIN);
        assert!(text.details.lines.is_empty());
    }
}
