// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-render accounting. Every field the orchestrator touches ends up in
// exactly one of three buckets: rendered, skipped, or failed. The report is
// serializable so callers can log or persist it alongside the output.

use chrono::{DateTime, Utc};
use satzwerk_core::error::SatzwerkError;
use satzwerk_core::types::FieldKind;
use serde::Serialize;

/// Coarse classification of a per-field failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The field box cannot hold any content.
    InvalidGeometry,
    /// An image payload was missing or undecodable.
    Asset,
    /// The supplied value does not match the field kind.
    ValueMismatch,
    /// The layout engine rejected the value.
    Layout,
    /// Writing to the PDF failed.
    Commit,
}

impl ErrorKind {
    /// Map a field-level error to its report bucket.
    pub fn classify(err: &SatzwerkError) -> Self {
        match err {
            SatzwerkError::InvalidGeometry(_) => Self::InvalidGeometry,
            SatzwerkError::Asset(_) => Self::Asset,
            SatzwerkError::ValueMismatch(_) => Self::ValueMismatch,
            SatzwerkError::Template(_) | SatzwerkError::Io(_) => Self::Commit,
            _ => Self::Layout,
        }
    }
}

/// Why a field was passed over without rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No value was supplied for the field.
    NoValue,
    /// The supplied value was empty (blank text, empty answer map).
    EmptyValue,
}

/// A field that rendered nothing, by design rather than by failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedField {
    pub page: u32,
    pub name: String,
    pub kind: FieldKind,
    pub reason: SkipReason,
}

/// A field that had data but could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub page: u32,
    pub name: String,
    pub kind: FieldKind,
    pub error_kind: ErrorKind,
    pub message: String,
}

/// Full accounting of one render call.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    /// Short correlation id, shared with every log line of the render.
    pub trace_id: String,
    /// SHA-256 of the template the render started from.
    pub template_fingerprint: String,
    pub started_at: DateTime<Utc>,
    /// Names of fields committed to the output, in catalog order.
    pub rendered: Vec<String>,
    pub skipped: Vec<SkippedField>,
    pub failed: Vec<FieldFailure>,
}

impl RenderReport {
    pub fn new(trace_id: String, template_fingerprint: String) -> Self {
        Self {
            trace_id,
            template_fingerprint,
            started_at: Utc::now(),
            rendered: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// True when failures outnumber successes, the signal for a systemic
    /// problem rather than isolated bad fields.
    pub fn is_systemic_failure(&self) -> bool {
        self.failed_count() > self.rendered_count()
    }
}
