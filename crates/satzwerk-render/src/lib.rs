// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// satzwerk-render — template loading, render orchestration, and PDF
// serialization for the Satzwerk template filler.

pub mod orchestrator;
pub mod overlay;
pub mod report;
pub mod template;

pub use orchestrator::{RenderOutcome, Renderer};
pub use report::{ErrorKind, FieldFailure, RenderReport, SkipReason, SkippedField};
pub use template::{Template, TemplateInfo, TemplateInstance};
