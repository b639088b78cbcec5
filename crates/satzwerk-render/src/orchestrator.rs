// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The render orchestrator. One `Renderer` owns a validated template/catalog
// pair and turns value maps into filled PDFs, isolating per-field failures
// so a single bad value never loses the rest of the document. When failures
// outnumber successes the render is judged systemic and aborted instead of
// shipping a mostly-empty document.

use satzwerk_catalog::catalog::FieldCatalog;
use satzwerk_catalog::coverage::{Coverage, coverage};
use satzwerk_catalog::mapping::FieldMapping;
use satzwerk_catalog::validator::validate;
use satzwerk_core::config::RenderOptions;
use satzwerk_core::error::{Result, SatzwerkError};
use satzwerk_core::types::{FieldKind, RenderValue, RenderValues};
use satzwerk_layout::{decode_image, layout_image, layout_table, layout_text};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::overlay::annotate_instance;
use crate::report::{ErrorKind, FieldFailure, RenderReport, SkipReason, SkippedField};
use crate::template::{Template, TemplateInstance};

/// Result of one render call.
pub enum RenderOutcome {
    /// The filled document, its accounting, and the debug overlay when one
    /// was requested.
    Serialized {
        bytes: Vec<u8>,
        report: RenderReport,
        debug_overlay: Option<Vec<u8>>,
    },
    /// Failures outnumbered successes; nothing was serialized.
    Aborted { report: RenderReport, reason: String },
}

/// A validated template/catalog pair, reusable across render calls.
pub struct Renderer {
    template: Template,
    catalog: FieldCatalog,
    options: RenderOptions,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("template", &self.template)
            .field("fields", &self.catalog.field_count())
            .field("options", &self.options)
            .finish()
    }
}

impl Renderer {
    /// Bind a catalog to a template. The catalog is validated against the
    /// template's real page geometry here, so every later render starts
    /// from a known-consistent pair.
    #[instrument(skip_all)]
    pub fn new(template: Template, catalog: FieldCatalog, options: RenderOptions) -> Result<Self> {
        let outcome = validate(&catalog, template.page_geometries());
        if !outcome.is_valid() {
            return Err(SatzwerkError::Catalog(format!(
                "catalog failed validation: {}",
                outcome.errors.join("; ")
            )));
        }
        Ok(Self {
            template,
            catalog,
            options,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Coverage of `values` against this renderer's catalog.
    pub fn coverage(&self, values: &RenderValues) -> Coverage {
        coverage(&self.catalog, values)
    }

    /// Fill the template with `values`.
    ///
    /// Fields without data are skipped. A field that has data but cannot be
    /// rendered is recorded as a failure and the render continues; only
    /// when failures outnumber rendered fields does the call return
    /// `Aborted` with no output bytes.
    #[instrument(skip_all, fields(trace_id))]
    pub fn render(&self, values: &RenderValues) -> Result<RenderOutcome> {
        let trace_id: String = Uuid::new_v4().simple().to_string()[..8].to_string();
        tracing::Span::current().record("trace_id", trace_id.as_str());

        let mut report = RenderReport::new(trace_id, self.template.fingerprint().to_string());
        let mut instance = self.template.instance();

        for (page, field) in self.catalog.iter() {
            let Some(value) = values.get(&field.name) else {
                report.skipped.push(SkippedField {
                    page,
                    name: field.name.clone(),
                    kind: field.kind(),
                    reason: SkipReason::NoValue,
                });
                continue;
            };
            if value_is_empty(value) {
                debug!(field = %field.name, "skipping field with empty value");
                report.skipped.push(SkippedField {
                    page,
                    name: field.name.clone(),
                    kind: field.kind(),
                    reason: SkipReason::EmptyValue,
                });
                continue;
            }

            match self.render_field(&mut instance, page, field, value) {
                Ok(()) => {
                    debug!(field = %field.name, page, "field rendered");
                    report.rendered.push(field.name.clone());
                }
                Err(err) => {
                    warn!(field = %field.name, page, error = %err, "field failed to render");
                    report.failed.push(FieldFailure {
                        page,
                        name: field.name.clone(),
                        kind: field.kind(),
                        error_kind: ErrorKind::classify(&err),
                        message: err.to_string(),
                    });
                }
            }
        }

        if report.is_systemic_failure() {
            let reason = SatzwerkError::SystemicFailure {
                failed: report.failed_count(),
                rendered: report.rendered_count(),
            }
            .to_string();
            error!(
                failed = report.failed_count(),
                rendered = report.rendered_count(),
                "aborting render"
            );
            return Ok(RenderOutcome::Aborted { report, reason });
        }

        let debug_overlay = if self.options.debug_overlay {
            let mut overlay_instance = self.template.instance();
            annotate_instance(&mut overlay_instance, &self.catalog, values)?;
            Some(overlay_instance.finish()?)
        } else {
            None
        };

        let bytes = instance.finish()?;
        info!(
            rendered = report.rendered_count(),
            skipped = report.skipped.len(),
            failed = report.failed_count(),
            bytes = bytes.len(),
            "render complete"
        );
        Ok(RenderOutcome::Serialized {
            bytes,
            report,
            debug_overlay,
        })
    }

    fn render_field(
        &self,
        instance: &mut TemplateInstance,
        page: u32,
        field: &FieldMapping,
        value: &RenderValue,
    ) -> Result<()> {
        // Catalog validation ran at construction, but the commit target is
        // the live instance; confirm the page is really there.
        if instance.page_geometry(page).is_none() {
            return Err(SatzwerkError::InvalidGeometry(format!(
                "field '{}': page {page} is not in the template",
                field.name
            )));
        }
        match (field.kind(), value) {
            (FieldKind::Text | FieldKind::TextArea, RenderValue::Text(text)) => {
                let lines = layout_text(text, field)?;
                instance.commit_lines(page, &lines)
            }
            (FieldKind::Image, RenderValue::Image(source)) => {
                let decoded = decode_image(source)?;
                let placed = layout_image(&decoded, field, self.options.auto_crop_images)?;
                instance.commit_image(page, &placed)
            }
            (FieldKind::Table, RenderValue::Table(answers)) => {
                let rows = layout_table(answers, field)?;
                instance.commit_rows(page, &rows)
            }
            (FieldKind::Table, RenderValue::Text(text)) => {
                // Callers sometimes hand the answer map pre-encoded as JSON.
                let answers: HashMap<String, bool> =
                    serde_json::from_str(text).map_err(|_| {
                        SatzwerkError::ValueMismatch(format!(
                            "field '{}' expects a table answer map",
                            field.name
                        ))
                    })?;
                let rows = layout_table(&answers, field)?;
                instance.commit_rows(page, &rows)
            }
            (kind, _) => Err(SatzwerkError::ValueMismatch(format!(
                "field '{}' is {kind}, the supplied value does not match",
                field.name
            ))),
        }
    }
}

fn value_is_empty(value: &RenderValue) -> bool {
    match value {
        RenderValue::Text(text) => text.trim().is_empty(),
        RenderValue::Table(answers) => answers.is_empty(),
        RenderValue::Image(_) => false,
    }
}
