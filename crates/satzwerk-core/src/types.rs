// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Satzwerk template filler.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Default body font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 11.0;
/// Font size at or above which single-line text renders in the title style.
pub const TITLE_FONT_SIZE: f64 = 14.0;
/// Heading font size in points.
pub const HEADING_FONT_SIZE: f64 = 12.0;

/// The four kinds of fillable region a template can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single line of text, truncated with an ellipsis when too wide.
    Text,
    /// Multi-line text with adaptive font-size fitting.
    TextArea,
    /// Raster image scaled under a fit policy.
    Image,
    /// Fixed ordered list of labeled yes/no outcomes.
    Table,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::TextArea => "textarea",
            Self::Image => "image",
            Self::Table => "table",
        };
        f.pad(name)
    }
}

/// Horizontal text alignment within a field box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// How an image is scaled into its target box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Preserve full visibility; the image fits inside the box, possibly
    /// leaving padding on one axis.
    #[default]
    Contain,
    /// Fill the box completely; the image may overflow one axis and is
    /// clipped to the box.
    Cover,
}

/// Dimensions of one template page, taken from the loaded document rather
/// than from any assumed constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// 1-indexed page number.
    pub number: u32,
    /// Page width in points.
    pub width: f64,
    /// Page height in points.
    pub height: f64,
}

/// An axis-aligned rectangle in page-local coordinates, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// An RGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    /// Near-black used for titles.
    pub const TITLE: Rgb = Rgb {
        r: 0.1,
        g: 0.1,
        b: 0.1,
    };
    /// Dark gray used for body text.
    pub const BODY: Rgb = Rgb {
        r: 0.15,
        g: 0.15,
        b: 0.15,
    };
    /// Green for affirmative table indicators.
    pub const YES: Rgb = Rgb {
        r: 0.0,
        g: 0.6,
        b: 0.0,
    };
    /// Red for negative table indicators.
    pub const NO: Rgb = Rgb {
        r: 0.8,
        g: 0.0,
        b: 0.0,
    };

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// Where an image payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on disk, resolved at layout time.
    Path(PathBuf),
    /// Already-encoded bytes (PNG, JPEG, ...).
    Bytes(Vec<u8>),
}

/// One value supplied for a named field. Owned by the caller; the core only
/// reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderValue {
    Text(String),
    Image(ImageSource),
    Table(HashMap<String, bool>),
}

/// The flat `field_name → value` map supplied per render call.
#[derive(Debug, Clone, Default)]
pub struct RenderValues {
    entries: HashMap<String, RenderValue>,
}

impl RenderValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .insert(name.into(), RenderValue::Text(value.into()));
    }

    pub fn insert_image_path(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.insert(
            name.into(),
            RenderValue::Image(ImageSource::Path(path.into())),
        );
    }

    pub fn insert_image_bytes(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.entries
            .insert(name.into(), RenderValue::Image(ImageSource::Bytes(bytes)));
    }

    pub fn insert_table(&mut self, name: impl Into<String>, answers: HashMap<String, bool>) {
        self.entries.insert(name.into(), RenderValue::Table(answers));
    }

    pub fn get(&self, name: &str) -> Option<&RenderValue> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of all supplied fields, in no particular order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_kind_display_matches_wire_names() {
        assert_eq!(FieldKind::TextArea.to_string(), "textarea");
        assert_eq!(FieldKind::Image.to_string(), "image");
    }

    #[test]
    fn alignment_defaults_to_left() {
        assert_eq!(Alignment::default(), Alignment::Left);
    }

    #[test]
    fn render_values_round_trip() {
        let mut values = RenderValues::new();
        values.insert_text("student_name", "Ada");
        values.insert_image_bytes("drawing", vec![1, 2, 3]);

        assert_eq!(values.len(), 2);
        assert!(matches!(
            values.get("student_name"),
            Some(RenderValue::Text(t)) if t == "Ada"
        ));
        assert!(values.get("missing").is_none());
    }
}
