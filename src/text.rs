// filepath: src/text.rs
//! Text measurement and glyph rasterization
//!
//! Layout only needs advances and line heights, so it works against the
//! [`TextMeasure`] trait. [`FixedMetrics`] derives both from the point size
//! and needs no font file. [`FontText`] uses `fontdue` for fonts named in
//! the configuration, then for a sans-serif face found with `fontdb` among
//! the system fonts, and falls back to fixed metrics for the rest.

use crate::geometry::Size;
use fontdb::{Database, Family, Query, Weight};
use fontdue::{Font, FontSettings};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub size: f32,
    #[serde(default)]
    pub weight: FontWeight,
    /// TTF/OTF file to render with; metrics are estimated without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl FontSpec {
    pub fn regular(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
            path: None,
        }
    }

    pub fn bold(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Bold,
            path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse font {path}: {reason}")]
    Parse { path: PathBuf, reason: &'static str },
    #[error("no usable sans-serif system font")]
    NoSystemFont,
}

/// Tried in order before the generic sans-serif family
const SYSTEM_FAMILIES: &[&str] = &["DejaVu Sans", "Noto Sans", "Liberation Sans", "Cantarell"];

impl From<FontWeight> for Weight {
    fn from(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Regular => Weight::NORMAL,
            FontWeight::Bold => Weight::BOLD,
        }
    }
}

/// Coverage bitmap of one glyph
#[derive(Debug, Clone)]
pub struct Glyph {
    pub width: usize,
    pub height: usize,
    /// Offset from the pen position to the bitmap's left edge
    pub xmin: i32,
    /// Offset from the baseline to the bitmap's bottom edge, y up
    pub ymin: i32,
    pub coverage: Vec<u8>,
}

pub trait TextMeasure {
    /// Horizontal advance of `ch`
    fn advance(&self, ch: char, font: &FontSpec) -> f32;

    /// Distance between consecutive baselines
    fn line_height(&self, font: &FontSpec) -> f32;

    /// Distance from the top of a line box to its baseline
    fn ascent(&self, font: &FontSpec) -> f32 {
        font.size * 0.8
    }

    /// Coverage bitmap for `ch`, `None` when glyphs are not available.
    fn rasterize(&self, _ch: char, _font: &FontSpec) -> Option<Glyph> {
        None
    }

    fn text_width(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars().map(|ch| self.advance(ch, font)).sum()
    }
}

/// Size-derived metrics, no font file needed
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMetrics;

impl TextMeasure for FixedMetrics {
    fn advance(&self, ch: char, font: &FontSpec) -> f32 {
        let em = match font.weight {
            FontWeight::Regular => 0.5,
            FontWeight::Bold => 0.55,
        };
        if ch.is_whitespace() {
            font.size * 0.3
        } else {
            font.size * em
        }
    }

    fn line_height(&self, font: &FontSpec) -> f32 {
        font.size * 1.2
    }
}

/// `fontdue` backed text, keyed by font file path, with system faces per
/// weight for specs that name no file
#[derive(Default)]
pub struct FontText {
    fonts: HashMap<PathBuf, Font>,
    system: HashMap<FontWeight, Font>,
}

impl FontText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the font file of every spec that names one.
    pub fn load<'a>(specs: impl IntoIterator<Item = &'a FontSpec>) -> Result<Self, FontError> {
        let mut text = Self::new();
        for spec in specs {
            if let Some(path) = &spec.path {
                text.load_file(path)?;
            }
        }
        Ok(text)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), FontError> {
        if self.fonts.contains_key(path) {
            return Ok(());
        }
        let bytes = std::fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| {
            FontError::Parse {
                path: path.to_path_buf(),
                reason,
            }
        })?;
        log::info!("Loaded font {}", path.display());
        self.fonts.insert(path.to_path_buf(), font);
        Ok(())
    }

    /// Find a regular and a bold sans-serif face among the installed fonts.
    /// Succeeds when at least one weight was loaded; a missing bold face
    /// renders bold text with the regular one.
    pub fn load_system_fonts(&mut self) -> Result<(), FontError> {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("fontdb found {} system faces", db.len());

        let mut families: Vec<Family<'_>> = SYSTEM_FAMILIES.iter().map(|name| Family::Name(name)).collect();
        families.push(Family::SansSerif);

        for weight in [FontWeight::Regular, FontWeight::Bold] {
            let query = Query {
                families: &families,
                weight: weight.into(),
                ..Query::default()
            };
            let Some(id) = db.query(&query) else {
                log::warn!("No {:?} system font found", weight);
                continue;
            };
            let settings = |index| FontSettings {
                collection_index: index,
                ..FontSettings::default()
            };
            let family = db
                .face(id)
                .and_then(|face| face.families.first())
                .map(|(name, _lang)| name.clone())
                .unwrap_or_default();
            match db.with_face_data(id, |data, index| Font::from_bytes(data, settings(index))) {
                Some(Ok(font)) => {
                    log::info!("Using system font {:?} for {:?} text", family, weight);
                    self.system.insert(weight, font);
                }
                Some(Err(reason)) => log::warn!("Failed to parse {:?} system font: {}", weight, reason),
                None => log::warn!("Failed to read {:?} system font", weight),
            }
        }

        if self.system.is_empty() {
            Err(FontError::NoSystemFont)
        } else {
            Ok(())
        }
    }

    fn font_for(&self, spec: &FontSpec) -> Option<&Font> {
        spec.path
            .as_ref()
            .and_then(|p| self.fonts.get(p))
            .or_else(|| self.system.get(&spec.weight))
            .or_else(|| self.system.get(&FontWeight::Regular))
    }
}

impl TextMeasure for FontText {
    fn advance(&self, ch: char, font: &FontSpec) -> f32 {
        match self.font_for(font) {
            Some(f) => f.metrics(ch, font.size).advance_width,
            None => FixedMetrics.advance(ch, font),
        }
    }

    fn line_height(&self, font: &FontSpec) -> f32 {
        self.font_for(font)
            .and_then(|f| f.horizontal_line_metrics(font.size))
            .map(|m| m.new_line_size)
            .unwrap_or_else(|| FixedMetrics.line_height(font))
    }

    fn ascent(&self, font: &FontSpec) -> f32 {
        self.font_for(font)
            .and_then(|f| f.horizontal_line_metrics(font.size))
            .map(|m| m.ascent)
            .unwrap_or(font.size * 0.8)
    }

    fn rasterize(&self, ch: char, font: &FontSpec) -> Option<Glyph> {
        let f = self.font_for(font)?;
        let (metrics, coverage) = f.rasterize(ch, font.size);
        Some(Glyph {
            width: metrics.width,
            height: metrics.height,
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            coverage,
        })
    }
}

/// Greedy word wrap into lines no wider than `max_width`. Words wider than
/// a whole line are broken between characters. Explicit newlines are kept.
pub fn wrap(measure: &dyn TextMeasure, text: &str, font: &FontSpec, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let space = measure.advance(' ', font);

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = measure.text_width(word, font);
            let needed = if line.is_empty() { word_width } else { width + space + word_width };

            if needed <= max_width {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
                width = needed;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }

            if word_width <= max_width {
                line.push_str(word);
                width = word_width;
                continue;
            }

            for ch in word.chars() {
                let w = measure.advance(ch, font);
                if width + w > max_width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    width = 0.0;
                }
                line.push(ch);
                width += w;
            }
        }
        lines.push(line);
    }

    // Trailing empty paragraphs carry no text
    while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Size of wrapped `lines`: widest line by line count times line height.
pub fn block_size(measure: &dyn TextMeasure, lines: &[String], font: &FontSpec) -> Size {
    let non_empty = lines.iter().any(|l| !l.is_empty());
    if !non_empty {
        return Size::default();
    }
    let width = lines
        .iter()
        .map(|l| measure.text_width(l, font))
        .fold(0.0, f32::max);
    Size::new(width, lines.len() as f32 * measure.line_height(font))
}
