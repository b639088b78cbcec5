// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coverage diagnostics — which catalog fields have data, which supplied
// values have no mapping. Consumed by tooling; the render contract itself
// does not depend on this.

use satzwerk_core::types::{FieldKind, RenderValues};
use serde::Serialize;
use std::fmt::Write as _;

use crate::catalog::FieldCatalog;

/// A catalog field the caller supplied no value for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingField {
    pub page: u32,
    pub name: String,
    pub kind: FieldKind,
}

/// Comparison of expected catalog fields against supplied values.
#[derive(Debug, Clone, Serialize)]
pub struct Coverage {
    /// Expected fields with no supplied value, in page then declaration order.
    pub missing: Vec<MissingField>,
    /// Supplied field names with no catalog mapping, sorted.
    pub unmapped: Vec<String>,
    /// Total fields the catalog expects.
    pub expected: usize,
    /// Total values supplied.
    pub provided: usize,
}

impl Coverage {
    /// Share of expected fields that received mapped data, in percent.
    pub fn percentage(&self) -> f64 {
        if self.expected == 0 {
            return 0.0;
        }
        (self.provided.saturating_sub(self.unmapped.len()) as f64 / self.expected as f64) * 100.0
    }

    /// Human-readable multi-line summary for logs and authoring tools.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "field coverage report");
        let _ = writeln!(out, "  expected fields: {}", self.expected);
        let _ = writeln!(out, "  provided values: {}", self.provided);
        let _ = writeln!(out, "  coverage:        {:.1}%", self.percentage());

        if self.missing.is_empty() {
            let _ = writeln!(out, "  all expected fields have data");
        } else {
            let _ = writeln!(out, "  missing data ({} fields):", self.missing.len());
            for field in &self.missing {
                let _ = writeln!(
                    out,
                    "    page {:2} | {:8} | {}",
                    field.page, field.kind, field.name
                );
            }
        }

        if self.unmapped.is_empty() {
            let _ = writeln!(out, "  no unmapped data provided");
        } else {
            let _ = writeln!(out, "  unmapped data ({} fields):", self.unmapped.len());
            for name in &self.unmapped {
                let _ = writeln!(out, "    {name}");
            }
        }

        out
    }
}

/// Compare supplied values against the catalog's expected fields.
pub fn coverage(catalog: &FieldCatalog, values: &RenderValues) -> Coverage {
    let missing = catalog
        .iter()
        .filter(|(_, field)| values.get(&field.name).is_none())
        .map(|(page, field)| MissingField {
            page,
            name: field.name.clone(),
            kind: field.kind(),
        })
        .collect();

    let mut unmapped: Vec<String> = values
        .field_names()
        .filter(|name| catalog.iter().all(|(_, field)| field.name != *name))
        .map(str::to_string)
        .collect();
    unmapped.sort();

    Coverage {
        missing,
        unmapped,
        expected: catalog.field_count(),
        provided: values.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogPage;
    use crate::mapping::{FieldMapping, FieldStyle, TextStyle};
    use satzwerk_core::types::Alignment;

    fn two_field_catalog() -> FieldCatalog {
        let field = |name: &str| FieldMapping {
            name: name.into(),
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 50.0,
            style: FieldStyle::Text(TextStyle {
                font_size: 11.0,
                alignment: Alignment::Left,
                bold: false,
            }),
            description: None,
        };
        FieldCatalog::from_pages(vec![CatalogPage {
            number: 1,
            fields: vec![field("title"), field("subtitle")],
        }])
        .expect("catalog")
    }

    #[test]
    fn missing_and_unmapped_are_detected() {
        let catalog = two_field_catalog();
        let mut values = RenderValues::new();
        values.insert_text("title", "hello");
        values.insert_text("stray", "not in catalog");

        let report = coverage(&catalog, &values);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].name, "subtitle");
        assert_eq!(report.unmapped, vec!["stray".to_string()]);
        // 2 provided, 1 unmapped, 2 expected → 50%.
        assert!((report.percentage() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn full_coverage_reaches_hundred_percent() {
        let catalog = two_field_catalog();
        let mut values = RenderValues::new();
        values.insert_text("title", "a");
        values.insert_text("subtitle", "b");

        let report = coverage(&catalog, &values);
        assert!(report.missing.is_empty());
        assert!(report.unmapped.is_empty());
        assert!((report.percentage() - 100.0).abs() < f64::EPSILON);
        assert!(report.summary().contains("100.0%"));
    }

    #[test]
    fn empty_catalog_reports_zero_percent() {
        let catalog = FieldCatalog::from_pages(vec![]).expect("catalog");
        let report = coverage(&catalog, &RenderValues::new());
        assert_eq!(report.percentage(), 0.0);
    }
}
