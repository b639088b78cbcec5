// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// satzwerk-catalog — field mapping model, catalog validation, and coverage
// diagnostics for the Satzwerk template filler.

pub mod catalog;
pub mod coverage;
pub mod mapping;
pub mod validator;

pub use catalog::{CatalogPage, FieldCatalog};
pub use coverage::{Coverage, MissingField, coverage};
pub use mapping::{FieldMapping, FieldStyle, ImageStyle, TableStyle, TextAreaStyle, TextStyle};
pub use validator::{ValidationOutcome, validate};
