// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Catalog validation against live template geometry.
//
// Page dimensions come from the loaded template, never from assumed
// constants — a swapped or regenerated template can silently shift geometry,
// and that must surface here, before any render is attempted.

use satzwerk_core::types::PageGeometry;
use tracing::{error, info, instrument, warn};

use crate::catalog::FieldCatalog;
use crate::mapping::FieldStyle;

/// Result of validating a catalog: hard errors and non-fatal warnings.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate every mapping in the catalog against the template's actual page
/// geometry. Never mutates the catalog; callers treat any error as fatal.
#[instrument(skip_all, fields(fields = catalog.field_count(), pages = pages.len()))]
pub fn validate(catalog: &FieldCatalog, pages: &[PageGeometry]) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for page in catalog.pages() {
        let Some(geometry) = pages.iter().find(|g| g.number == page.number) else {
            outcome.errors.push(format!(
                "page {} mapped but template has only {} pages",
                page.number,
                pages.len()
            ));
            continue;
        };

        for field in &page.fields {
            validate_field(page.number, field, geometry, &mut outcome);
        }
    }

    if outcome.is_valid() {
        info!(
            warnings = outcome.warnings.len(),
            "Field catalog validated"
        );
        for warning in &outcome.warnings {
            warn!("{warning}");
        }
    } else {
        error!(errors = outcome.errors.len(), "Field catalog is invalid");
        for err in &outcome.errors {
            error!("{err}");
        }
    }

    outcome
}

fn validate_field(
    page_number: u32,
    field: &crate::mapping::FieldMapping,
    geometry: &PageGeometry,
    outcome: &mut ValidationOutcome,
) {
    let at = format!("page {}, field '{}'", page_number, field.name);

    if field.width <= 0.0 {
        outcome
            .errors
            .push(format!("{at}: invalid width {}", field.width));
    }

    if field.x < 0.0 || field.x >= geometry.width {
        outcome.errors.push(format!(
            "{at}: x={} outside page width {}",
            field.x, geometry.width
        ));
    }
    if field.y < 0.0 || field.y >= geometry.height {
        outcome.errors.push(format!(
            "{at}: y={} outside page height {}",
            field.y, geometry.height
        ));
    }

    // Edge bleed off the right or bottom is tolerated but worth flagging.
    if field.x + field.width > geometry.width {
        outcome.warnings.push(format!(
            "{at}: bounding box exceeds page width ({} + {} > {})",
            field.x, field.width, geometry.width
        ));
    }
    if field.y + field.height > geometry.height {
        outcome.warnings.push(format!(
            "{at}: bounding box exceeds page height ({} + {} > {})",
            field.y, field.height, geometry.height
        ));
    }

    match &field.style {
        FieldStyle::Text(style) => {
            if style.font_size <= 0.0 {
                outcome
                    .errors
                    .push(format!("{at}: font_size must be positive"));
            }
        }
        FieldStyle::TextArea(style) => {
            if style.font_size <= 0.0 {
                outcome
                    .errors
                    .push(format!("{at}: font_size must be positive"));
            }
            if style.max_lines == 0 {
                outcome
                    .errors
                    .push(format!("{at}: textarea requires max_lines > 0"));
            }
            if style.min_font_size > style.font_size {
                outcome.errors.push(format!(
                    "{at}: min_font_size {} exceeds font_size {}",
                    style.min_font_size, style.font_size
                ));
            }
        }
        FieldStyle::Image(_) => {
            if field.height <= 0.0 {
                outcome
                    .errors
                    .push(format!("{at}: image field needs height > 0"));
            }
        }
        FieldStyle::Table(style) => {
            if style.rows.is_empty() {
                outcome
                    .warnings
                    .push(format!("{at}: table declares no rows"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogPage;
    use crate::mapping::{FieldMapping, TextAreaStyle, TextStyle};
    use satzwerk_core::types::Alignment;

    const PAGE: PageGeometry = PageGeometry {
        number: 1,
        width: 768.0,
        height: 576.0,
    };

    fn catalog_with(field: FieldMapping) -> FieldCatalog {
        FieldCatalog::from_pages(vec![CatalogPage {
            number: 1,
            fields: vec![field],
        }])
        .expect("catalog")
    }

    fn text_field(x: f64, y: f64, width: f64) -> FieldMapping {
        FieldMapping {
            name: "title".into(),
            x,
            y,
            width,
            height: 50.0,
            style: FieldStyle::Text(TextStyle {
                font_size: 14.0,
                alignment: Alignment::Left,
                bold: false,
            }),
            description: None,
        }
    }

    #[test]
    fn in_bounds_field_passes() {
        let outcome = validate(&catalog_with(text_field(100.0, 100.0, 200.0)), &[PAGE]);
        assert!(outcome.is_valid());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn x_beyond_page_width_is_fatal() {
        let outcome = validate(&catalog_with(text_field(800.0, 100.0, 200.0)), &[PAGE]);
        assert!(!outcome.is_valid());
        assert!(outcome.errors[0].contains("outside page width"));
    }

    #[test]
    fn right_edge_bleed_is_only_a_warning() {
        let outcome = validate(&catalog_with(text_field(700.0, 100.0, 100.0)), &[PAGE]);
        assert!(outcome.is_valid());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("exceeds page width"));
    }

    #[test]
    fn unknown_page_is_fatal() {
        let catalog = FieldCatalog::from_pages(vec![CatalogPage {
            number: 9,
            fields: vec![text_field(10.0, 10.0, 50.0)],
        }])
        .expect("catalog");
        let outcome = validate(&catalog, &[PAGE]);
        assert!(!outcome.is_valid());
    }

    #[test]
    fn textarea_without_lines_is_fatal() {
        let field = FieldMapping {
            name: "notes".into(),
            x: 10.0,
            y: 10.0,
            width: 400.0,
            height: 100.0,
            style: FieldStyle::TextArea(TextAreaStyle {
                font_size: 12.0,
                min_font_size: 7.0,
                max_lines: 0,
                line_height: None,
                alignment: Alignment::Left,
                padding_top: 2.0,
                padding_lr: 8.0,
            }),
            description: None,
        };
        let outcome = validate(&catalog_with(field), &[PAGE]);
        assert!(!outcome.is_valid());
        assert!(outcome.errors[0].contains("max_lines"));
    }
}
