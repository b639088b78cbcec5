// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Satzwerk.

use thiserror::Error;

/// Top-level error type for all Satzwerk operations.
#[derive(Debug, Error)]
pub enum SatzwerkError {
    // -- Catalog errors --
    /// Malformed or out-of-bounds field mapping. Fatal at load time; never
    /// produced mid-render.
    #[error("invalid field catalog: {0}")]
    Catalog(String),

    // -- Per-field layout errors --
    /// A field's resolved box cannot accommodate any layout (e.g. the
    /// effective width after padding is non-positive).
    #[error("invalid field geometry: {0}")]
    InvalidGeometry(String),

    /// Missing, unreadable, or undecodable image payload.
    #[error("asset error: {0}")]
    Asset(String),

    /// A field was asked to render a value with no usable content. Treated
    /// as a skip by the orchestrator, never as a failure.
    #[error("empty value: {0}")]
    EmptyValue(String),

    /// The supplied value's variant does not match the field's kind.
    #[error("value does not match field kind: {0}")]
    ValueMismatch(String),

    // -- Document errors --
    #[error("template error: {0}")]
    Template(String),

    /// More fields failed than rendered — the whole render is aborted
    /// rather than returning a mostly-blank document.
    #[error("systemic render failure: {failed} fields failed, only {rendered} rendered")]
    SystemicFailure { failed: usize, rendered: usize },

    // -- Infrastructure --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SatzwerkError>;
