// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The field catalog — every fillable region of a template, keyed by
// (page_number, field_name). Built once at template-load time and never
// mutated during rendering; pages and fields keep their declaration order so
// rendering and reports are deterministic.

use satzwerk_core::error::{Result, SatzwerkError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

use crate::mapping::FieldMapping;

/// All mappings declared for one template page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    /// 1-indexed page number.
    pub number: u32,
    /// Fields in declaration order.
    pub fields: Vec<FieldMapping>,
}

/// The full set of field mappings for a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCatalog {
    pages: Vec<CatalogPage>,
}

/// On-disk catalog shape.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    pages: Vec<CatalogPage>,
}

impl FieldCatalog {
    /// Build a catalog from page declarations.
    ///
    /// Rejects page numbers of 0, duplicate page declarations, and duplicate
    /// field names within a page. Pages are sorted by number; field order
    /// within a page is preserved.
    pub fn from_pages(mut pages: Vec<CatalogPage>) -> Result<Self> {
        pages.sort_by_key(|p| p.number);

        for window in pages.windows(2) {
            if window[0].number == window[1].number {
                return Err(SatzwerkError::Catalog(format!(
                    "page {} declared more than once",
                    window[0].number
                )));
            }
        }

        for page in &pages {
            if page.number == 0 {
                return Err(SatzwerkError::Catalog(
                    "page numbers are 1-indexed; found page 0".into(),
                ));
            }
            for (i, field) in page.fields.iter().enumerate() {
                if page.fields[..i].iter().any(|f| f.name == field.name) {
                    return Err(SatzwerkError::Catalog(format!(
                        "page {}: field '{}' declared more than once",
                        page.number, field.name
                    )));
                }
            }
        }

        Ok(Self { pages })
    }

    /// Load a catalog from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_pages(file.pages)
    }

    /// Load a catalog from a JSON file on disk.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json_str(&json)?;
        debug!(
            pages = catalog.pages.len(),
            fields = catalog.field_count(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    // -- Lookup ---------------------------------------------------------------

    /// Look up one mapping by page number and field name.
    pub fn get(&self, page_number: u32, field_name: &str) -> Option<&FieldMapping> {
        self.pages
            .iter()
            .find(|p| p.number == page_number)
            .and_then(|p| p.fields.iter().find(|f| f.name == field_name))
    }

    /// Pages in ascending page order.
    pub fn pages(&self) -> &[CatalogPage] {
        &self.pages
    }

    /// Fields of one page in declaration order; empty when the page has none.
    pub fn fields_for_page(&self, page_number: u32) -> &[FieldMapping] {
        self.pages
            .iter()
            .find(|p| p.number == page_number)
            .map(|p| p.fields.as_slice())
            .unwrap_or(&[])
    }

    /// All mappings in page order then declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &FieldMapping)> {
        self.pages
            .iter()
            .flat_map(|p| p.fields.iter().map(move |f| (p.number, f)))
    }

    /// Total number of mapped fields.
    pub fn field_count(&self) -> usize {
        self.pages.iter().map(|p| p.fields.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{FieldStyle, TextStyle};
    use satzwerk_core::types::Alignment;

    fn text_field(name: &str) -> FieldMapping {
        FieldMapping {
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
        }
    }

    #[test]
    fn pages_sort_and_iterate_in_order() {
        let catalog = FieldCatalog::from_pages(vec![
            CatalogPage {
                number: 3,
                fields: vec![text_field("c")],
            },
            CatalogPage {
                number: 1,
                fields: vec![text_field("a"), text_field("b")],
            },
        ])
        .expect("catalog");

        let order: Vec<(u32, &str)> = catalog.iter().map(|(p, f)| (p, f.name.as_str())).collect();
        assert_eq!(order, vec![(1, "a"), (1, "b"), (3, "c")]);
        assert_eq!(catalog.field_count(), 3);
    }

    #[test]
    fn duplicate_field_name_rejected() {
        let result = FieldCatalog::from_pages(vec![CatalogPage {
            number: 1,
            fields: vec![text_field("dup"), text_field("dup")],
        }]);
        assert!(matches!(result, Err(SatzwerkError::Catalog(_))));
    }

    #[test]
    fn duplicate_page_rejected() {
        let result = FieldCatalog::from_pages(vec![
            CatalogPage {
                number: 2,
                fields: vec![],
            },
            CatalogPage {
                number: 2,
                fields: vec![],
            },
        ]);
        assert!(matches!(result, Err(SatzwerkError::Catalog(_))));
    }

    #[test]
    fn json_catalog_loads() {
        let json = r#"{
            "pages": [
                {
                    "number": 1,
                    "fields": [
                        {
                            "name": "student_name",
                            "x": 180, "y": 375, "width": 400, "height": 50,
                            "field_type": "text",
                            "font_size": 20, "alignment": "center"
                        }
                    ]
                }
            ]
        }"#;
        let catalog = FieldCatalog::from_json_str(json).expect("load");
        assert!(catalog.get(1, "student_name").is_some());
        assert!(catalog.get(2, "student_name").is_none());
    }

    #[test]
    fn json_catalog_loads_from_disk() {
        use std::io::Write as _;

        let catalog = FieldCatalog::from_pages(vec![CatalogPage {
            number: 1,
            fields: vec![text_field("title")],
        }])
        .expect("catalog");
        let json = serde_json::to_string(&catalog).expect("serialize");

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write");

        let loaded = FieldCatalog::from_json_file(file.path()).expect("load");
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn missing_catalog_file_is_an_io_error() {
        let result = FieldCatalog::from_json_file("/nonexistent/catalog.json");
        assert!(matches!(result, Err(SatzwerkError::Io(_))));
    }
}
