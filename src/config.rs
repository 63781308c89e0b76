// filepath: src/config.rs
//! Configuration handling for hypr-showcase
//!
//! This file defines the configuration structure and provides
//! functionality to load and save configuration from/to files.
//! A configuration describes one showcase: its text, its style,
//! what it points at, and the host layout the target lives in.

use crate::color::{Color, ColorParseError};
use crate::geometry::Rect;
use crate::layout::TextAlignment;
use crate::mask::HighlightShape;
use crate::scene::Scene;
use crate::showcase::{HighlightStyle, Showcase};
use crate::target::Target;
use crate::text::FontSpec;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid color for {field}: {source}")]
    Color {
        field: &'static str,
        source: ColorParseError,
    },
}

/// Style overrides; unset fields keep the showcase defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StyleConfig {
    pub background_color: Option<String>,
    pub highlight_color: Option<String>,
    pub title_color: Option<String>,
    pub details_color: Option<String>,
    pub shape: Option<HighlightShape>,
    pub radius: Option<f32>,
    pub corner_radius: Option<f32>,
    pub mask_opacity: Option<f32>,
    pub title_alignment: Option<TextAlignment>,
    pub details_alignment: Option<TextAlignment>,
    pub title_font: Option<FontSpec>,
    pub details_font: Option<FontSpec>,
}

/// Configuration for one showcase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowcaseConfig {
    pub title: String,

    #[serde(default)]
    pub details: String,

    /// Present at most once per identifier
    #[serde(default)]
    pub single_shot_id: Option<i64>,

    #[serde(default)]
    pub style: StyleConfig,

    pub target: Target,

    #[serde(default)]
    pub scene: Scene,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            title: "Welcome".to_string(),
            details: "Tap anywhere to continue".to_string(),
            single_shot_id: None,
            style: StyleConfig {
                background_color: Some("#000000".to_string()),
                highlight_color: Some("#1397C5".to_string()),
                title_color: Some("#FFFFFF".to_string()),
                details_color: Some("#FFFFFF".to_string()),
                shape: Some(HighlightShape::Rectangle),
                radius: Some(25.0),
                ..StyleConfig::default()
            },
            target: Target::Location {
                rect: Rect::new(40.0, 40.0, 200.0, 60.0),
            },
            scene: Scene::default(),
        }
    }
}

fn parse_color(field: &'static str, value: &Option<String>, fallback: Color) -> Result<Color, ConfigError> {
    match value {
        Some(hex) => Color::from_hex(hex).map_err(|source| ConfigError::Color { field, source }),
        None => Ok(fallback),
    }
}

impl ShowcaseConfig {
    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        let config_dir = if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("hypr-showcase")
        } else {
            PathBuf::from(".config/hypr-showcase")
        };

        config_dir.join("config.toml")
    }

    /// Load configuration from `path`, writing and returning the default if
    /// the file does not exist yet
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No config at {}, writing defaults", path.display());
                let default_config = Self::default();
                default_config.save_to_file(path)?;
                Ok(default_config)
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        // Create the directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)
    }

    /// Resolve the style overrides on top of the defaults
    pub fn style(&self) -> Result<HighlightStyle, ConfigError> {
        let s = &self.style;
        let d = HighlightStyle::default();
        Ok(HighlightStyle {
            background_color: parse_color("background_color", &s.background_color, d.background_color)?,
            highlight_color: parse_color("highlight_color", &s.highlight_color, d.highlight_color)?,
            title_color: parse_color("title_color", &s.title_color, d.title_color)?,
            details_color: parse_color("details_color", &s.details_color, d.details_color)?,
            title_font: s.title_font.clone().unwrap_or(d.title_font),
            details_font: s.details_font.clone().unwrap_or(d.details_font),
            title_alignment: s.title_alignment.unwrap_or(d.title_alignment),
            details_alignment: s.details_alignment.unwrap_or(d.details_alignment),
            shape: s.shape.unwrap_or(d.shape),
            radius: s.radius.unwrap_or(d.radius),
            corner_radius: s.corner_radius.unwrap_or(d.corner_radius),
            mask_opacity: s.mask_opacity.unwrap_or(d.mask_opacity).clamp(0.0, 1.0),
        })
    }

    /// Build a configured showcase from this configuration
    pub fn build_showcase(&self) -> Result<Showcase, ConfigError> {
        let mut showcase = Showcase::with_style(self.style()?);
        showcase.setup(self.target.clone(), &self.title, &self.details);
        if let Some(id) = self.single_shot_id {
            showcase.set_single_shot_id(id);
        }
        Ok(showcase)
    }
}
