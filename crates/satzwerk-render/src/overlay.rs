// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Debug overlay — an authoring aid that draws every catalog field's box on
// its page, color-coded by kind, with a small label naming the field and
// previewing the supplied data. Rendered onto its own template instance so
// the real output stays clean.

use satzwerk_catalog::catalog::FieldCatalog;
use satzwerk_catalog::mapping::FieldMapping;
use satzwerk_core::error::Result;
use satzwerk_core::types::{FieldKind, Rect, RenderValue, RenderValues, Rgb};
use satzwerk_layout::text::FittedLine;

use crate::template::TemplateInstance;

/// Text field with data.
const TEXT_WITH_DATA: Rgb = Rgb::new(0.0, 0.6, 0.0);
/// Text field still waiting for data.
const TEXT_MISSING: Rgb = Rgb::new(0.85, 0.6, 0.0);
const IMAGE_BOX: Rgb = Rgb::new(0.0, 0.3, 0.9);
const TABLE_BOX: Rgb = Rgb::new(0.6, 0.0, 0.6);

const LABEL_FONT_SIZE: f64 = 8.0;
const LABEL_STRIP_HEIGHT: f64 = 10.0;
/// Longest value preview shown in a label.
const PREVIEW_CHARS: usize = 50;

fn field_color(kind: FieldKind, has_data: bool) -> Rgb {
    match kind {
        FieldKind::Text | FieldKind::TextArea => {
            if has_data {
                TEXT_WITH_DATA
            } else {
                TEXT_MISSING
            }
        }
        FieldKind::Image => IMAGE_BOX,
        FieldKind::Table => TABLE_BOX,
    }
}

fn preview(value: Option<&RenderValue>) -> String {
    match value {
        None => "[NO DATA]".to_string(),
        Some(RenderValue::Text(text)) => {
            let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if flat.chars().count() > PREVIEW_CHARS {
                let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
                format!("{cut}...")
            } else {
                flat
            }
        }
        Some(RenderValue::Image(_)) => "[image]".to_string(),
        Some(RenderValue::Table(answers)) => format!("[{} answers]", answers.len()),
    }
}

/// Draw the overlay for every catalog field onto `instance`.
pub fn annotate_instance(
    instance: &mut TemplateInstance,
    catalog: &FieldCatalog,
    values: &RenderValues,
) -> Result<()> {
    for (page, field) in catalog.iter() {
        annotate_field(instance, page, field, values.get(&field.name))?;
    }
    Ok(())
}

fn annotate_field(
    instance: &mut TemplateInstance,
    page: u32,
    field: &FieldMapping,
    value: Option<&RenderValue>,
) -> Result<()> {
    let color = field_color(field.kind(), value.is_some());
    let box_rect = Rect::new(field.x, field.y, field.width, field.height);
    instance.stroke_rect(page, box_rect, color, 1.0)?;

    // White strip inside the top edge keeps the label readable over the
    // template's own artwork.
    let strip = Rect::new(field.x, field.y, field.width, LABEL_STRIP_HEIGHT);
    instance.fill_rect(page, strip, Rgb::new(1.0, 1.0, 1.0))?;

    let label = format!(
        "{} ({}): {}",
        field.name,
        field.kind(),
        preview(value)
    );
    let fitted = satzwerk_layout::text::truncate_to_width(
        &label,
        false,
        LABEL_FONT_SIZE,
        (field.width - 4.0).max(LABEL_FONT_SIZE),
    );
    instance.commit_lines(
        page,
        &[FittedLine {
            text: fitted,
            x: field.x + 2.0,
            y: field.y + LABEL_FONT_SIZE,
            font_size: LABEL_FONT_SIZE,
            bold: false,
            color,
        }],
    )
}
