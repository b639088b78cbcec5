// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table layout — a fixed ordered list of labeled yes/no outcomes. Row order
// comes from the mapping, never from the answer map; labels with no answer
// default to "No".

use satzwerk_catalog::mapping::{FieldMapping, FieldStyle};
use satzwerk_core::error::{Result, SatzwerkError};
use satzwerk_core::types::Rgb;
use std::collections::HashMap;

use crate::metrics::measure_text;
use crate::text::{FittedLine, truncate_to_width};

/// Width of the right-hand indicator column.
const INDICATOR_COLUMN: f64 = 40.0;
/// Gap reserved between the label column and the indicator column.
const LABEL_GUTTER: f64 = 10.0;

/// One laid-out table row: its label, its colored indicator, and the answer
/// that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub label: FittedLine,
    pub indicator: FittedLine,
    pub value: bool,
}

/// Lay out the answer map into the table's declared rows.
pub fn layout_table(
    answers: &HashMap<String, bool>,
    mapping: &FieldMapping,
) -> Result<Vec<PlacedRow>> {
    let FieldStyle::Table(style) = &mapping.style else {
        return Err(SatzwerkError::ValueMismatch(format!(
            "field '{}' is {}, not a table field",
            mapping.name,
            mapping.kind()
        )));
    };

    let label_width = mapping.width - INDICATOR_COLUMN - LABEL_GUTTER;
    if label_width <= 0.0 {
        return Err(SatzwerkError::InvalidGeometry(format!(
            "field '{}': width {} cannot hold a label and indicator column",
            mapping.name, mapping.width
        )));
    }

    let indicator_size = style.font_size + 1.0;
    let mut rows = Vec::with_capacity(style.rows.len());
    let mut cursor_y = mapping.y;

    for label in &style.rows {
        let value = answers.get(label).copied().unwrap_or(false);
        let label_text = truncate_to_width(label, false, style.font_size, label_width);
        let label_line = FittedLine {
            text: label_text,
            x: mapping.x,
            y: cursor_y + style.font_size,
            font_size: style.font_size,
            bold: false,
            color: Rgb::BODY,
        };

        let (indicator_text, color) = if value {
            ("Yes", Rgb::YES)
        } else {
            ("No", Rgb::NO)
        };
        // Right-aligned within the indicator column.
        let indicator_width = measure_text(indicator_text, true, indicator_size);
        let indicator_line = FittedLine {
            text: indicator_text.to_string(),
            x: mapping.x + mapping.width - indicator_width,
            y: cursor_y + indicator_size,
            font_size: indicator_size,
            bold: true,
            color,
        };

        rows.push(PlacedRow {
            label: label_line,
            indicator: indicator_line,
            value,
        });
        cursor_y += style.cell_height;
    }
    Ok(rows)
}
