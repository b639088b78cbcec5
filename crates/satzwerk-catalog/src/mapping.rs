// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field mappings — the static description of one fillable region's position,
// size, and style. Styling is a closed, explicitly-typed variant per field
// kind: there are no loose key/value style maps, so a malformed mapping is a
// load-time error instead of a mid-render surprise.

use satzwerk_core::types::{Alignment, FieldKind, FitMode};
use serde::{Deserialize, Serialize};

/// One fillable region on a template page.
///
/// Coordinates are page-local points with a top-left origin (x grows right,
/// y grows down). Mappings are immutable once loaded into a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Field name, unique within its page.
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    /// Kind-specific styling, tagged by `field_type` on the wire.
    #[serde(flatten)]
    pub style: FieldStyle,
    /// Free-form authoring note; carried through but never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldMapping {
    pub fn kind(&self) -> FieldKind {
        match self.style {
            FieldStyle::Text(_) => FieldKind::Text,
            FieldStyle::TextArea(_) => FieldKind::TextArea,
            FieldStyle::Image(_) => FieldKind::Image,
            FieldStyle::Table(_) => FieldKind::Table,
        }
    }
}

/// Closed per-kind style variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field_type", rename_all = "snake_case")]
pub enum FieldStyle {
    Text(TextStyle),
    #[serde(rename = "textarea")]
    TextArea(TextAreaStyle),
    Image(ImageStyle),
    Table(TableStyle),
}

/// Style for single-line text fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f64,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub bold: bool,
}

/// Style for multi-line text areas with adaptive fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAreaStyle {
    pub font_size: f64,
    /// Smallest size the fitting search may fall back to.
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f64,
    pub max_lines: u32,
    /// Baseline-to-baseline distance at the base font size. When absent,
    /// `max(14, round(font_size * 1.35))` is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default = "default_padding_top")]
    pub padding_top: f64,
    /// Combined left+right padding subtracted from the wrap width.
    #[serde(default = "default_padding_lr")]
    pub padding_lr: f64,
}

impl TextAreaStyle {
    /// Line height at the base font size, applying the default when the
    /// mapping does not pin one.
    pub fn base_line_height(&self) -> f64 {
        self.line_height
            .unwrap_or_else(|| (self.font_size * 1.35).round().max(14.0))
    }
}

/// Style for image fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageStyle {
    #[serde(default)]
    pub fit: FitMode,
    /// Padding in pixels kept around the content bounding box when
    /// auto-cropping blank margins.
    #[serde(default = "default_crop_padding")]
    pub crop_padding: u32,
}

/// Style for the yes/no outcome table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStyle {
    /// Ordered row labels; each is looked up in the supplied answer map.
    pub rows: Vec<String>,
    #[serde(default = "default_cell_height")]
    pub cell_height: f64,
    #[serde(default = "default_table_font_size")]
    pub font_size: f64,
}

fn default_height() -> f64 {
    50.0
}

fn default_min_font_size() -> f64 {
    7.0
}

fn default_padding_top() -> f64 {
    2.0
}

fn default_padding_lr() -> f64 {
    8.0
}

fn default_crop_padding() -> u32 {
    10
}

fn default_cell_height() -> f64 {
    30.0
}

fn default_table_font_size() -> f64 {
    10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textarea_mapping_deserializes_with_defaults() {
        let json = r#"{
            "name": "problem_statement",
            "x": 240, "y": 120, "width": 470, "height": 135,
            "field_type": "textarea",
            "font_size": 12, "max_lines": 6, "line_height": 20
        }"#;
        let mapping: FieldMapping = serde_json::from_str(json).expect("deserialize");
        assert_eq!(mapping.kind(), FieldKind::TextArea);
        let FieldStyle::TextArea(style) = &mapping.style else {
            panic!("expected textarea style");
        };
        assert_eq!(style.min_font_size, 7.0);
        assert_eq!(style.padding_lr, 8.0);
        assert_eq!(style.base_line_height(), 20.0);
    }

    #[test]
    fn default_line_height_scales_with_font_size() {
        let style = TextAreaStyle {
            font_size: 12.0,
            min_font_size: 7.0,
            max_lines: 6,
            line_height: None,
            alignment: Alignment::Left,
            padding_top: 2.0,
            padding_lr: 8.0,
        };
        // round(12 * 1.35) = 16, above the 14pt floor.
        assert_eq!(style.base_line_height(), 16.0);

        let small = TextAreaStyle {
            font_size: 9.0,
            ..style
        };
        // round(9 * 1.35) = 12, clamped up to 14.
        assert_eq!(small.base_line_height(), 14.0);
    }

    #[test]
    fn height_defaults_when_absent() {
        let json = r#"{
            "name": "student_name",
            "x": 180, "y": 375, "width": 400,
            "field_type": "text", "font_size": 20, "alignment": "center"
        }"#;
        let mapping: FieldMapping = serde_json::from_str(json).expect("deserialize");
        assert_eq!(mapping.height, 50.0);
        assert_eq!(mapping.kind(), FieldKind::Text);
    }

    #[test]
    fn mapping_serializes_round_trip() {
        let mapping = FieldMapping {
            name: "sketch".into(),
            x: 40.0,
            y: 60.0,
            width: 300.0,
            height: 200.0,
            style: FieldStyle::Image(ImageStyle {
                fit: FitMode::Cover,
                crop_padding: 10,
            }),
            description: None,
        };
        let json = serde_json::to_string(&mapping).expect("serialize");
        let back: FieldMapping = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, mapping);
    }
}
